use std::path::PathBuf;
use std::time::Instant;

use chrono::Local;
use log::{error, info};

use crate::common::errors::{ProductError, error_chain};
use crate::config::AppConfig;
use crate::models::dto::{ProductListing, SubmitRequest, SubmitResponse};
use crate::models::role::ImageRole;
use crate::operations::catalog::{ProductCatalog, SubmittedImages};
use crate::operations::image::ImageStore;

/// Image store and catalog wired to the same products root.
#[derive(Debug, Clone)]
pub struct ProductService {
    pub store: ImageStore,
    pub catalog: ProductCatalog,
}

impl ProductService {
    pub fn new(config: &AppConfig) -> Self {
        ProductService {
            store: ImageStore::new(config),
            catalog: ProductCatalog::new(config),
        }
    }

    /// Run one submission end to end: claim an id, save the three images in
    /// order, then record the metadata.
    pub fn submit(&self, request: &SubmitRequest) -> SubmitResponse {
        let start_time = Instant::now();
        match self.try_submit(request) {
            Ok(response) => {
                info!(
                    duration = &*format!("{:?}", start_time.elapsed());
                    "Submission finished"
                );
                response
            }
            Err(submit_error) => {
                let message = error_chain(&submit_error);
                error!("Error submitting product: {}", message);
                SubmitResponse::rejected(message)
            }
        }
    }

    fn try_submit(&self, request: &SubmitRequest) -> Result<SubmitResponse, ProductError> {
        let created = Local::now().naive_local();
        let product_id = self.catalog.allocate_product_id(created)?;

        let images = SubmittedImages {
            barcode: self
                .store
                .save(&request.barcode, &product_id, ImageRole::Barcode),
            nutrition: self
                .store
                .save(&request.nutrition, &product_id, ImageRole::Nutrition),
            label: self.store.save(&request.label, &product_id, ImageRole::Label),
        };

        let metadata = self.catalog.submit(
            &product_id,
            created,
            &images,
            request.manual_barcode.as_deref(),
        )?;
        Ok(SubmitResponse::accepted(metadata))
    }

    pub fn list(&self) -> ProductListing {
        self.catalog.list()
    }

    pub fn image_path(&self, product_id: &str, role: &str) -> Result<PathBuf, ProductError> {
        let role: ImageRole = role.parse()?;
        self.catalog.image_path(product_id, role)
    }
}
