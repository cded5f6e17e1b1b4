use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::common::errors::ProductError;

/// Which of the three required photos an image is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageRole {
    Barcode,
    Nutrition,
    Label,
}

impl ImageRole {
    pub const ALL: [ImageRole; 3] = [ImageRole::Barcode, ImageRole::Nutrition, ImageRole::Label];

    pub fn as_str(self) -> &'static str {
        match self {
            ImageRole::Barcode => "barcode",
            ImageRole::Nutrition => "nutrition",
            ImageRole::Label => "label",
        }
    }

    pub fn file_name(self) -> String {
        format!("{}.jpg", self.as_str())
    }

    /// Retrieval path served by the image route.
    pub fn url(self, product_id: &str) -> String {
        format!("/image/{}/{}", product_id, self.as_str())
    }
}

impl fmt::Display for ImageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImageRole {
    type Err = ProductError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "barcode" => Ok(ImageRole::Barcode),
            "nutrition" => Ok(ImageRole::Nutrition),
            "label" => Ok(ImageRole::Label),
            other => Err(ProductError::NotFound(format!("image role {other:?}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_roles_only() {
        for role in ImageRole::ALL {
            assert_eq!(role.as_str().parse::<ImageRole>().unwrap(), role);
        }
        assert!("thumbnail".parse::<ImageRole>().unwrap_err().is_not_found());
        assert!("Barcode".parse::<ImageRole>().is_err());
    }

    #[test]
    fn url_is_role_addressed() {
        assert_eq!(
            ImageRole::Nutrition.url("product_20250110_163128"),
            "/image/product_20250110_163128/nutrition"
        );
        assert_eq!(ImageRole::Label.file_name(), "label.jpg");
    }
}
