//! Product payload for the back-office.

use serde::Serialize;

use chowline_core::image::ImageResolver;
use chowline_db::models::Product;

/// A product with both the stored image reference and the resolved URL.
///
/// The edit form needs the raw `image_url`; the product grid shows `image`.
#[derive(Debug, Clone, Serialize)]
pub struct AdminProduct {
    #[serde(flatten)]
    pub product: Product,
    pub image: String,
}

impl AdminProduct {
    #[must_use]
    pub fn new(product: Product, images: &ImageResolver) -> Self {
        let image = images.resolve(
            product.image_url.as_deref(),
            &product.name,
            &product.updated_at.timestamp().to_string(),
        );
        Self { product, image }
    }
}
