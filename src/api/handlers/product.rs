use log::{info, warn};
use rocket::http::Status;
use rocket::serde::json::{self, Json};
use rocket::{State, get, post};

use crate::api::AppResult;
use crate::models::dto::{ProductSummary, SubmitRequest, SubmitResponse};
use crate::operations::submission::ProductService;

#[post("/submit_product", format = "json", data = "<request>")]
pub async fn submit_product(
    service: &State<ProductService>,
    request: Result<Json<SubmitRequest>, json::Error<'_>>,
) -> AppResult<(Status, Json<SubmitResponse>)> {
    let request = match request {
        Ok(request) => request.into_inner(),
        Err(parse_error) => {
            warn!("Rejected submission body: {}", parse_error);
            return Ok((
                Status::BadRequest,
                Json(SubmitResponse::rejected(parse_error.to_string())),
            ));
        }
    };

    let service = service.inner().clone();
    let response = tokio::task::spawn_blocking(move || service.submit(&request)).await?;

    let status = if response.is_success() {
        Status::Ok
    } else {
        Status::InternalServerError
    };
    Ok((status, Json(response)))
}

#[get("/products")]
pub async fn list_products(service: &State<ProductService>) -> AppResult<Json<Vec<ProductSummary>>> {
    let service = service.inner().clone();
    let listing = tokio::task::spawn_blocking(move || service.list()).await?;
    if listing.skipped > 0 {
        info!("Listing omitted {} unreadable products", listing.skipped);
    }
    Ok(Json(listing.products))
}
