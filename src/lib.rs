//! Product photo capture service.
//!
//! A submission carries three photos of a product (barcode, nutrition facts,
//! front label) as base64 data URIs. Each photo is decoded, the barcode photo
//! is scanned, all three are resized and stored as JPEG under
//! `<products_dir>/<product_id>/`, and a `metadata.json` record is written
//! next to them. Stored products can be listed and their images served back.

pub mod api;
pub mod bootstrap;
pub mod common;
pub mod config;
pub mod models;
pub mod operations;

use rocket::{Build, Rocket};

use crate::api::handlers::{generate_media_routes, generate_product_routes};
use crate::config::AppConfig;
use crate::operations::submission::ProductService;

pub fn build_rocket(config: &AppConfig) -> Rocket<Build> {
    let figment = rocket::Config::figment()
        .merge(("address", config.address))
        .merge(("port", config.port))
        .merge(("limits.json", config.submission_limit.as_str()))
        .merge(("shutdown.ctrlc", true));

    rocket::custom(figment)
        .manage(ProductService::new(config))
        .mount("/", generate_product_routes())
        .mount("/", generate_media_routes())
}
