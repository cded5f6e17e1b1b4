//! Product catalog - metadata records and the product listing
//!
//! Includes:
//! - Product id allocation
//! - Metadata write for a completed submission
//! - Newest-first listing rebuilt from `metadata.json` files
//! - Stored image lookup

pub mod listing;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::NaiveDateTime;
use log::{error, info};

use crate::common::errors::ProductError;
use crate::common::{MAX_ID_SUFFIX, METADATA_FILE_NAME};
use crate::config::AppConfig;
use crate::models::barcode::BarcodeInfo;
use crate::models::dto::ProductListing;
use crate::models::metadata::{
    ProductMetadata, product_id_for, suffixed_product_id, validate_product_id,
};
use crate::models::role::ImageRole;
use crate::operations::image::SaveOutcome;

/// The three save outcomes of one submission.
#[derive(Debug)]
pub struct SubmittedImages {
    pub barcode: SaveOutcome,
    pub nutrition: SaveOutcome,
    pub label: SaveOutcome,
}

impl SubmittedImages {
    /// Roles whose failure sinks the submission. The barcode photo only
    /// contributes data.
    fn failed_required_roles(&self) -> Vec<ImageRole> {
        [
            (ImageRole::Nutrition, &self.nutrition),
            (ImageRole::Label, &self.label),
        ]
        .into_iter()
        .filter(|(_, outcome)| !outcome.is_saved())
        .map(|(role, _)| role)
        .collect()
    }
}

#[derive(Debug, Clone)]
pub struct ProductCatalog {
    products_dir: PathBuf,
}

impl ProductCatalog {
    pub fn new(config: &AppConfig) -> Self {
        ProductCatalog {
            products_dir: config.products_dir.clone(),
        }
    }

    pub fn products_dir(&self) -> &Path {
        &self.products_dir
    }

    pub fn metadata_path(&self, product_id: &str) -> PathBuf {
        self.products_dir.join(product_id).join(METADATA_FILE_NAME)
    }

    /// Claim a fresh product directory for a submission created at `created`.
    /// Falls back to `_002`, `_003`, ... when another submission already holds
    /// the timestamp id.
    pub fn allocate_product_id(&self, created: NaiveDateTime) -> Result<String, ProductError> {
        fs::create_dir_all(&self.products_dir).map_err(|source| ProductError::Storage {
            path: self.products_dir.clone(),
            source,
        })?;

        let base = product_id_for(created);
        let mut candidate = base.clone();
        for attempt in 2..=MAX_ID_SUFFIX + 1 {
            let product_dir = self.products_dir.join(&candidate);
            match fs::create_dir(&product_dir) {
                Ok(()) => return Ok(candidate),
                Err(source) if source.kind() == io::ErrorKind::AlreadyExists => {
                    candidate = suffixed_product_id(&base, attempt);
                }
                Err(source) => {
                    return Err(ProductError::Storage {
                        path: product_dir,
                        source,
                    });
                }
            }
        }

        Err(ProductError::Storage {
            path: self.products_dir.join(&base),
            source: io::Error::new(
                io::ErrorKind::AlreadyExists,
                format!("{} submissions already share this timestamp", MAX_ID_SUFFIX),
            ),
        })
    }

    /// Write `metadata.json` for a submission whose images have been saved.
    /// `created` is the instant the product id was allocated for.
    ///
    /// A non-empty `manual_barcode` replaces whatever was recognized. Fails
    /// without writing anything when the nutrition or label image is missing.
    pub fn submit(
        &self,
        product_id: &str,
        created: NaiveDateTime,
        images: &SubmittedImages,
        manual_barcode: Option<&str>,
    ) -> Result<ProductMetadata, ProductError> {
        validate_product_id(product_id)?;

        let manual_barcode = manual_barcode.filter(|value| !value.is_empty());
        let manual_info = manual_barcode.map(|value| {
            info!("Manual barcode provided: {}", value);
            BarcodeInfo::manual(value)
        });
        let barcode_info = manual_info.as_ref().or_else(|| images.barcode.barcode());

        let failed = images.failed_required_roles();
        if !failed.is_empty() {
            error!("Failed to save all images for product: {}", product_id);
            return Err(ProductError::IncompleteSubmission { failed });
        }

        let metadata = ProductMetadata::new(product_id, created, barcode_info);
        self.write_metadata(&metadata)?;

        info!("Product submitted successfully: {}", product_id);
        Ok(metadata)
    }

    fn write_metadata(&self, metadata: &ProductMetadata) -> Result<(), ProductError> {
        let json = serde_json::to_string_pretty(metadata)?;
        let path = self.metadata_path(&metadata.product_id);
        fs::write(&path, json).map_err(|source| ProductError::Metadata { path, source })
    }

    /// Every readable product, newest first.
    pub fn list(&self) -> ProductListing {
        listing::list_products(&self.products_dir)
    }

    /// Location of a stored image, if it exists.
    pub fn image_path(&self, product_id: &str, role: ImageRole) -> Result<PathBuf, ProductError> {
        validate_product_id(product_id)
            .map_err(|_| ProductError::NotFound(format!("product {product_id:?}")))?;

        let path = self.products_dir.join(product_id).join(role.file_name());
        if path.is_file() {
            Ok(path)
        } else {
            Err(ProductError::NotFound(format!(
                "{} image for {}",
                role, product_id
            )))
        }
    }
}
