use anyhow::Context;
use log::warn;
use rocket::fs::NamedFile;
use rocket::http::ContentType;
use rocket::{State, get};

use crate::api::{AppResult, product_error};
use crate::operations::submission::ProductService;

#[get("/image/<product_id>/<role>")]
pub async fn serve_image(
    service: &State<ProductService>,
    product_id: &str,
    role: &str,
) -> AppResult<(ContentType, NamedFile)> {
    let image_path = service.image_path(product_id, role).map_err(|lookup_error| {
        warn!("Image not found: {}/{}", product_id, role);
        product_error(lookup_error)
    })?;

    let named_file = NamedFile::open(&image_path)
        .await
        .context(format!("Failed to open JPG file: {}", image_path.display()))?;
    Ok((ContentType::JPEG, named_file))
}
