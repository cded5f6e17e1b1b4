use serde::{Deserialize, Serialize};

use crate::models::metadata::ProductMetadata;
use crate::models::role::ImageRole;

#[derive(Debug, Clone, Deserialize)]
pub struct SubmitRequest {
    pub barcode: String,
    pub nutrition: String,
    pub label: String,
    #[serde(default)]
    pub manual_barcode: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SubmitResponse {
    Accepted {
        success: bool,
        product_id: String,
        barcode: Option<String>,
        barcode_type: Option<String>,
    },
    Rejected {
        success: bool,
        error: String,
    },
}

impl SubmitResponse {
    pub fn accepted(metadata: ProductMetadata) -> Self {
        SubmitResponse::Accepted {
            success: true,
            product_id: metadata.product_id,
            barcode: metadata.barcode_data,
            barcode_type: metadata.barcode_type,
        }
    }

    pub fn rejected(error: impl Into<String>) -> Self {
        SubmitResponse::Rejected {
            success: false,
            error: error.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmitResponse::Accepted { .. })
    }
}

/// One row of the product listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductSummary {
    pub id: String,
    pub timestamp: String,
    pub barcode: Option<String>,
    pub barcode_type: Option<String>,
    pub barcode_url: String,
    pub nutrition_url: String,
    pub label_url: String,
}

impl ProductSummary {
    /// The id comes from the directory name, not from the record.
    pub fn from_metadata(id: String, metadata: ProductMetadata) -> Self {
        ProductSummary {
            barcode_url: ImageRole::Barcode.url(&id),
            nutrition_url: ImageRole::Nutrition.url(&id),
            label_url: ImageRole::Label.url(&id),
            id,
            timestamp: metadata.created_at,
            barcode: metadata.barcode_data,
            barcode_type: metadata.barcode_type,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductListing {
    /// Newest first.
    pub products: Vec<ProductSummary>,
    /// Directories whose metadata could not be read or parsed.
    pub skipped: usize,
}
