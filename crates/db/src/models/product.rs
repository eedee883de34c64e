//! Menu products.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use chowline_core::{Price, ProductId};

use super::{InputError, optional_text, required_text};

/// Maximum length of a product name.
pub const MAX_NAME_LENGTH: usize = 120;

/// Maximum length of a product description.
pub const MAX_DESCRIPTION_LENGTH: usize = 2000;

/// A menu item.
///
/// `image_url` is the raw stored reference: an absolute URL, an
/// `/uploads/...` path or nothing. Resolve it with
/// [`chowline_core::image::ImageResolver`] before sending it to a browser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: String,
    pub price: Price,
    pub image_url: Option<String>,
    pub available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

const fn default_available() -> bool {
    true
}

/// Data for a new product (admin form, menu seed file).
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewProduct {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub price: Price,
    #[serde(default, alias = "image")]
    pub image_url: Option<String>,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl NewProduct {
    /// Trim fields and check name and price.
    ///
    /// # Errors
    ///
    /// Returns `InputError` for a blank or overlong name, an overlong
    /// description or a negative price.
    pub fn validate(self) -> Result<Self, InputError> {
        let name = required_text("name", &self.name, MAX_NAME_LENGTH)?;
        let description = self.description.trim().to_string();
        if description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(InputError(format!(
                "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }
        if self.price.is_negative() {
            return Err(InputError("price cannot be negative".to_string()));
        }

        Ok(Self {
            name,
            description,
            price: self.price,
            image_url: optional_text(self.image_url),
            available: self.available,
        })
    }
}

/// Partial product update. `None` leaves a field unchanged; an empty
/// `image_url` clears the image.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    #[serde(alias = "image")]
    pub image_url: Option<String>,
    pub available: Option<bool>,
}

impl ProductUpdate {
    /// Trim provided fields and check them like [`NewProduct::validate`].
    ///
    /// # Errors
    ///
    /// Returns `InputError` if a provided field is invalid.
    pub fn validate(self) -> Result<Self, InputError> {
        let name = self
            .name
            .map(|n| required_text("name", &n, MAX_NAME_LENGTH))
            .transpose()?;
        let description = self.description.map(|d| d.trim().to_string());
        if description
            .as_ref()
            .is_some_and(|d| d.chars().count() > MAX_DESCRIPTION_LENGTH)
        {
            return Err(InputError(format!(
                "description must be at most {MAX_DESCRIPTION_LENGTH} characters"
            )));
        }
        if self.price.is_some_and(|p| p.is_negative()) {
            return Err(InputError("price cannot be negative".to_string()));
        }

        Ok(Self {
            name,
            description,
            price: self.price,
            image_url: self.image_url.map(|u| u.trim().to_string()),
            available: self.available,
        })
    }
}

/// Product totals for the admin dashboard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, sqlx::FromRow)]
pub struct ProductCounts {
    pub total: i64,
    pub available: i64,
}
