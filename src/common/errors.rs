use std::error::Error as StdError;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::models::role::ImageRole;

/// Failures of the ingestion pipeline. None of these escape the store or the
/// catalog as panics; they travel back as values and the HTTP layer turns them
/// into `success: false` responses.
#[derive(Debug, Error)]
pub enum ProductError {
    #[error("failed to decode image payload: {reason}")]
    Decode { reason: String },

    #[error("failed to write {}", path.display())]
    Storage {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to encode JPEG")]
    Encode(#[from] jpeg_encoder::EncodingError),

    #[error("image {width}x{height} exceeds the JPEG size limit")]
    Oversize { width: u32, height: u32 },

    #[error("failed to save images: {}", join_roles(failed))]
    IncompleteSubmission { failed: Vec<ImageRole> },

    #[error("failed to write metadata {}", path.display())]
    Metadata {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to serialize metadata")]
    Serialize(#[from] serde_json::Error),

    #[error("invalid product id {0:?}")]
    InvalidProductId(String),

    #[error("{0} not found")]
    NotFound(String),
}

impl ProductError {
    pub fn decode(reason: impl Into<String>) -> Self {
        ProductError::Decode {
            reason: reason.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ProductError::NotFound(_))
    }
}

fn join_roles(roles: &[ImageRole]) -> String {
    roles
        .iter()
        .map(|role| role.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Render an error and all of its sources as `outer: inner: root`.
pub fn error_chain(error: &(dyn StdError + 'static)) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_includes_io_source() {
        let error = ProductError::Storage {
            path: PathBuf::from("/products/p/label.jpg"),
            source: io::Error::new(io::ErrorKind::PermissionDenied, "read-only volume"),
        };
        assert_eq!(
            error_chain(&error),
            "failed to write /products/p/label.jpg: read-only volume"
        );
    }

    #[test]
    fn incomplete_submission_names_roles() {
        let error = ProductError::IncompleteSubmission {
            failed: vec![ImageRole::Nutrition, ImageRole::Label],
        };
        assert_eq!(error.to_string(), "failed to save images: nutrition, label");
    }
}
