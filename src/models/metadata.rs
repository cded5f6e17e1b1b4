use std::path::{Component, Path};

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::common::PRODUCT_ID_PREFIX;
use crate::common::errors::ProductError;
use crate::models::barcode::BarcodeInfo;

/// Contents of `metadata.json`. Written once at submission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductMetadata {
    pub product_id: String,
    #[serde(default)]
    pub timestamp: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub barcode_data: Option<String>,
    #[serde(default)]
    pub barcode_type: Option<String>,
}

impl ProductMetadata {
    /// `barcode_data` and `barcode_type` are either both set or both null.
    pub fn new(
        product_id: impl Into<String>,
        created: NaiveDateTime,
        barcode: Option<&BarcodeInfo>,
    ) -> Self {
        ProductMetadata {
            product_id: product_id.into(),
            timestamp: created.format("%Y-%m-%dT%H:%M:%S%.6f").to_string(),
            created_at: created.format("%Y-%m-%d %H:%M:%S").to_string(),
            barcode_data: barcode.map(|info| info.data.clone()),
            barcode_type: barcode.map(|info| info.barcode_type.clone()),
        }
    }
}

/// `product_<YYYYMMDD_HHMMSS>`; second granularity.
pub fn product_id_for(created: NaiveDateTime) -> String {
    format!("{}{}", PRODUCT_ID_PREFIX, created.format("%Y%m%d_%H%M%S"))
}

/// Id used when `base` is already taken. Zero padding keeps reverse
/// lexicographic order equal to creation order.
pub fn suffixed_product_id(base: &str, attempt: u32) -> String {
    format!("{}_{:03}", base, attempt)
}

/// A product id names exactly one directory directly under the products root.
pub fn validate_product_id(product_id: &str) -> Result<(), ProductError> {
    let mut components = Path::new(product_id).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(name)), None) if name == product_id => Ok(()),
        _ => Err(ProductError::InvalidProductId(product_id.to_string())),
    }
}
