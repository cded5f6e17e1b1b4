use serde::{Deserialize, Serialize};

use crate::common::MANUAL_BARCODE_TYPE;

/// Bounding box of a recognized symbol, in pixels of the full-resolution image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeRect {
    pub left: u32,
    pub top: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarcodeInfo {
    pub data: String,
    #[serde(rename = "type")]
    pub barcode_type: String,
    pub rect: Option<BarcodeRect>,
}

impl BarcodeInfo {
    /// A barcode the user typed in; it has no location in any image.
    pub fn manual(data: impl Into<String>) -> Self {
        BarcodeInfo {
            data: data.into(),
            barcode_type: MANUAL_BARCODE_TYPE.to_string(),
            rect: None,
        }
    }
}
