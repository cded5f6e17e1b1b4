//! Image store - turns one submitted photo into `<product_dir>/<role>.jpg`
//!
//! Includes:
//! - Data-URI decoding and orientation correction
//! - Barcode recognition (barcode role only, on the full-resolution image)
//! - Bounded Lanczos resize
//! - JPEG encoding and persistence

pub mod barcode;
pub mod decode;
pub mod resize;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use image::DynamicImage;
use jpeg_encoder::{ColorType, Encoder};
use log::{error, info};

use crate::common::errors::{ProductError, error_chain};
use crate::config::AppConfig;
use crate::models::barcode::BarcodeInfo;
use crate::models::metadata::validate_product_id;
use crate::models::role::ImageRole;

use self::barcode::read_barcode;
use self::decode::decode_data_uri;
use self::resize::resize_to_fit;

/// What happened to one submitted image.
#[derive(Debug)]
pub enum SaveOutcome {
    /// Nutrition or label image written.
    Saved,
    /// Barcode image written; `None` when no symbol could be read.
    Scanned(Option<BarcodeInfo>),
    /// Nothing usable was written.
    Failed(ProductError),
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        !matches!(self, SaveOutcome::Failed(_))
    }

    pub fn barcode(&self) -> Option<&BarcodeInfo> {
        match self {
            SaveOutcome::Scanned(barcode) => barcode.as_ref(),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&ProductError> {
        match self {
            SaveOutcome::Failed(error) => Some(error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct ImageStore {
    products_dir: PathBuf,
    max_dimension: u32,
    jpeg_quality: u8,
}

impl ImageStore {
    pub fn new(config: &AppConfig) -> Self {
        ImageStore {
            products_dir: config.products_dir.clone(),
            max_dimension: config.max_dimension,
            jpeg_quality: config.jpeg_quality,
        }
    }

    pub fn products_dir(&self) -> &Path {
        &self.products_dir
    }

    pub fn image_path(&self, product_id: &str, role: ImageRole) -> PathBuf {
        self.products_dir.join(product_id).join(role.file_name())
    }

    /// Decode, optionally scan, resize and persist one image. Never panics on
    /// bad input; every failure comes back as `SaveOutcome::Failed`.
    pub fn save(&self, encoded_image: &str, product_id: &str, role: ImageRole) -> SaveOutcome {
        let start_time = Instant::now();
        match self.try_save(encoded_image, product_id, role) {
            Ok(barcode_info) => {
                info!(
                    duration = &*format!("{:?}", start_time.elapsed());
                    "Saved {} to: {}",
                    role,
                    self.image_path(product_id, role).display()
                );
                match role {
                    ImageRole::Barcode => SaveOutcome::Scanned(barcode_info),
                    ImageRole::Nutrition | ImageRole::Label => SaveOutcome::Saved,
                }
            }
            Err(save_error) => {
                error!("Error saving {} for {}: {}", role, product_id, error_chain(&save_error));
                SaveOutcome::Failed(save_error)
            }
        }
    }

    fn try_save(
        &self,
        encoded_image: &str,
        product_id: &str,
        role: ImageRole,
    ) -> Result<Option<BarcodeInfo>, ProductError> {
        validate_product_id(product_id)?;

        let dynamic_image = decode_data_uri(encoded_image)
            .map_err(|decode_error| ProductError::decode(format!("{:#}", decode_error)))?;

        let barcode_info = match role {
            ImageRole::Barcode => read_barcode(&dynamic_image),
            ImageRole::Nutrition | ImageRole::Label => None,
        };

        let resized_image = resize_to_fit(dynamic_image, self.max_dimension);

        let file_path = self.image_path(product_id, role);
        let jpeg = encode_jpeg(&resized_image, self.jpeg_quality)?;

        // Ensure the directory exists
        let product_dir = self.products_dir.join(product_id);
        fs::create_dir_all(&product_dir).map_err(|source| ProductError::Storage {
            path: product_dir.clone(),
            source,
        })?;

        fs::write(&file_path, jpeg).map_err(|source| ProductError::Storage {
            path: file_path.clone(),
            source,
        })?;

        Ok(barcode_info)
    }
}

/// JPEG at `quality` with optimized Huffman tables; alpha is dropped.
pub fn encode_jpeg(dynamic_image: &DynamicImage, quality: u8) -> Result<Vec<u8>, ProductError> {
    encode_jpeg_with_tables(dynamic_image, quality, true)
}

fn encode_jpeg_with_tables(
    dynamic_image: &DynamicImage,
    quality: u8,
    optimized_tables: bool,
) -> Result<Vec<u8>, ProductError> {
    let (width, height) = (dynamic_image.width(), dynamic_image.height());
    let (Ok(jpeg_width), Ok(jpeg_height)) = (u16::try_from(width), u16::try_from(height)) else {
        return Err(ProductError::Oversize { width, height });
    };

    let rgb = dynamic_image.to_rgb8();
    let mut buffer = Vec::new();
    let mut encoder = Encoder::new(&mut buffer, quality);
    encoder.set_optimized_huffman_tables(optimized_tables);
    encoder.encode(rgb.as_raw(), jpeg_width, jpeg_height, ColorType::Rgb)?;
    Ok(buffer)
}
