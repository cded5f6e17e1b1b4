use rocket::{Route, routes};

pub mod media;
pub mod product;

pub fn generate_product_routes() -> Vec<Route> {
    routes![product::submit_product, product::list_products]
}

pub fn generate_media_routes() -> Vec<Route> {
    routes![media::serve_image]
}
