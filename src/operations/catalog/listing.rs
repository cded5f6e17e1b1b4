use std::cmp::Reverse;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use log::{debug, info, warn};
use walkdir::WalkDir;

use crate::common::METADATA_FILE_NAME;
use crate::models::dto::{ProductListing, ProductSummary};
use crate::models::metadata::ProductMetadata;

/// Rebuild the product list from the immediate subdirectories of
/// `products_dir`. Ids embed their creation time, so reverse name order is
/// newest first. Directories without a record are ignored; unreadable records
/// are skipped and counted.
pub fn list_products(products_dir: &Path) -> ProductListing {
    let mut listing = ProductListing::default();
    if !products_dir.is_dir() {
        return listing;
    }

    let mut product_ids: Vec<String> = WalkDir::new(products_dir)
        .min_depth(1)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry),
            Err(walk_error) => {
                warn!("Failed to read product directory entry: {}", walk_error);
                None
            }
        })
        .filter(|entry| entry.file_type().is_dir())
        .filter_map(|entry| entry.file_name().to_str().map(str::to_string))
        .collect();
    product_ids.sort_by_key(|product_id| Reverse(product_id.to_lowercase()));

    for product_id in product_ids {
        let metadata_path = products_dir.join(&product_id).join(METADATA_FILE_NAME);
        if !metadata_path.is_file() {
            debug!("Skipping {}: no {}", product_id, METADATA_FILE_NAME);
            continue;
        }

        match read_metadata(&metadata_path) {
            Ok(metadata) => listing
                .products
                .push(ProductSummary::from_metadata(product_id, metadata)),
            Err(read_error) => {
                warn!("Skipping {}: {:#}", product_id, read_error);
                listing.skipped += 1;
            }
        }
    }

    info!("Found {} products", listing.products.len());
    if listing.skipped > 0 {
        warn!("Skipped {} products with unreadable metadata", listing.skipped);
    }
    listing
}

fn read_metadata(metadata_path: &Path) -> Result<ProductMetadata> {
    let bytes = fs::read(metadata_path)
        .context(format!("failed to read {}", metadata_path.display()))?;
    serde_json::from_slice(&bytes).context(format!("failed to parse {}", metadata_path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn write_product(root: &Path, product_id: &str, created_at: &str) {
        let dir = root.join(product_id);
        fs::create_dir_all(&dir).unwrap();
        let record = json!({
            "product_id": product_id,
            "timestamp": "2025-01-10T16:31:28.000000",
            "created_at": created_at,
            "barcode_data": "4006381333931",
            "barcode_type": "EAN13"
        });
        fs::write(dir.join(METADATA_FILE_NAME), record.to_string()).unwrap();
    }

    #[test]
    fn missing_root_lists_nothing() {
        let root = tempfile::tempdir().unwrap();
        let listing = list_products(&root.path().join("absent"));
        assert_eq!(listing, ProductListing::default());
    }

    #[test]
    fn newest_product_comes_first() {
        let root = tempfile::tempdir().unwrap();
        write_product(root.path(), "product_20250110_163128", "2025-01-10 16:31:28");
        write_product(root.path(), "product_20250111_090000", "2025-01-11 09:00:00");
        write_product(root.path(), "product_20250110_163128_002", "2025-01-10 16:31:28");

        let ids: Vec<_> = list_products(root.path())
            .products
            .into_iter()
            .map(|product| product.id)
            .collect();
        assert_eq!(
            ids,
            [
                "product_20250111_090000",
                "product_20250110_163128_002",
                "product_20250110_163128"
            ]
        );
    }

    #[test]
    fn order_ignores_case() {
        let root = tempfile::tempdir().unwrap();
        write_product(root.path(), "b", "");
        write_product(root.path(), "A", "");
        write_product(root.path(), "C", "");

        let ids: Vec<_> = list_products(root.path())
            .products
            .into_iter()
            .map(|product| product.id)
            .collect();
        assert_eq!(ids, ["C", "b", "A"]);
    }

    #[test]
    fn summary_points_at_role_urls() {
        let root = tempfile::tempdir().unwrap();
        write_product(root.path(), "product_20250110_163128", "2025-01-10 16:31:28");

        let listing = list_products(root.path());
        let product = &listing.products[0];
        assert_eq!(product.timestamp, "2025-01-10 16:31:28");
        assert_eq!(product.barcode.as_deref(), Some("4006381333931"));
        assert_eq!(product.barcode_type.as_deref(), Some("EAN13"));
        assert_eq!(product.label_url, "/image/product_20250110_163128/label");
    }

    #[test]
    fn incomplete_and_corrupt_products_are_skipped() {
        let root = tempfile::tempdir().unwrap();
        write_product(root.path(), "product_20250110_163128", "2025-01-10 16:31:28");
        fs::create_dir_all(root.path().join("product_20250110_170000")).unwrap();
        let corrupt = root.path().join("product_20250110_180000");
        fs::create_dir_all(&corrupt).unwrap();
        fs::write(corrupt.join(METADATA_FILE_NAME), b"{\"product_id\": ").unwrap();
        fs::write(root.path().join("stray.txt"), b"not a product").unwrap();

        let listing = list_products(root.path());
        assert_eq!(listing.products.len(), 1);
        assert_eq!(listing.products[0].id, "product_20250110_163128");
        assert_eq!(listing.skipped, 1);
    }
}
