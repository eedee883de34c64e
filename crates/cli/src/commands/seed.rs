//! Seed the menu from a YAML file.
//!
//! ```yaml
//! products:
//!   - name: Jollof Rice
//!     description: Smoky party jollof with fried plantain
//!     price: 2500
//!     image: https://cdn.example.com/jollof.jpg
//!   - name: Zobo
//!     price: 800
//!     available: false
//! ```
//!
//! The whole file is parsed and validated before the database is touched.

use std::path::Path;

use serde::Deserialize;
use tracing::{error, info};

use chowline_db::ProductRepository;
use chowline_db::models::NewProduct;

use super::connect;

/// Top-level shape of a menu file.
#[derive(Debug, Deserialize)]
pub struct MenuFile {
    pub products: Vec<NewProduct>,
}

/// Parse a menu file and validate every product.
///
/// # Errors
///
/// Returns one message per invalid product (1-based position and name), or
/// a single message if the YAML does not parse.
pub fn parse_menu(content: &str) -> Result<Vec<NewProduct>, Vec<String>> {
    let file: MenuFile = serde_yaml::from_str(content).map_err(|e| vec![e.to_string()])?;

    let mut products = Vec::with_capacity(file.products.len());
    let mut errors = Vec::new();
    for (i, product) in file.products.into_iter().enumerate() {
        let name = product.name.clone();
        match product.validate() {
            Ok(p) => products.push(p),
            Err(e) => errors.push(format!("product {} ({name}): {e}", i + 1)),
        }
    }

    if errors.is_empty() {
        Ok(products)
    } else {
        Err(errors)
    }
}

/// Insert the products from `file_path`.
///
/// # Arguments
///
/// * `file_path` - Path to the YAML menu file
/// * `replace` - Delete every existing product first (order history keeps
///   its snapshots)
///
/// # Errors
///
/// Returns an error if the file cannot be read or validated, or a database
/// operation fails.
pub async fn menu(file_path: &str, replace: bool) -> Result<(), Box<dyn std::error::Error>> {
    let path = Path::new(file_path);
    if !path.exists() {
        return Err(format!("File not found: {file_path}").into());
    }

    info!(path = %file_path, "Loading menu from file");
    let content = tokio::fs::read_to_string(path).await?;

    let products = match parse_menu(&content) {
        Ok(products) => products,
        Err(errors) => {
            error!("Menu validation failed:");
            for err in &errors {
                error!("  - {err}");
            }
            return Err(format!("{} validation errors found", errors.len()).into());
        }
    };
    info!(products = products.len(), "Menu validated");

    let pool = connect().await?;
    let repo = ProductRepository::new(&pool);

    if replace {
        let removed = repo.delete_all().await?;
        info!(removed, "Existing products removed");
    }

    for product in &products {
        let created = repo.create(product).await?;
        info!(id = %created.id, name = %created.name, "Product created");
    }

    info!("Seeding complete! {} products inserted", products.len());
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chowline_core::Price;

    use super::*;

    #[test]
    fn test_parse_menu() {
        let yaml = r"
products:
  - name: '  Jollof Rice '
    description: Smoky party jollof
    price: 2500
    image: https://cdn.example.com/jollof.jpg
  - name: Zobo
    price: '800.50'
    available: false
";
        let products = parse_menu(yaml).unwrap();
        assert_eq!(products.len(), 2);
        assert_eq!(products[0].name, "Jollof Rice");
        assert_eq!(products[0].price, Price::from_units(2500));
        assert_eq!(
            products[0].image_url.as_deref(),
            Some("https://cdn.example.com/jollof.jpg")
        );
        assert!(products[0].available);
        assert!(!products[1].available);
        assert_eq!(products[1].description, "");
    }

    #[test]
    fn test_parse_menu_collects_every_invalid_product() {
        let yaml = r"
products:
  - name: ''
    price: 100
  - name: Suya
    price: 1200
  - name: Refund
    price: -5
";
        let errors = parse_menu(yaml).unwrap_err();
        assert_eq!(errors.len(), 2);
        assert!(errors[0].starts_with("product 1"));
        assert!(errors[1].starts_with("product 3 (Refund)"));
    }

    #[test]
    fn test_parse_menu_rejects_malformed_yaml() {
        let errors = parse_menu("products: [name: ").unwrap_err();
        assert_eq!(errors.len(), 1);
    }

    #[tokio::test]
    async fn test_missing_file_fails_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("menu.yaml");
        let err = menu(missing.to_str().unwrap(), false).await.unwrap_err();
        assert!(err.to_string().starts_with("File not found"));
    }

    #[tokio::test]
    async fn test_invalid_file_fails_before_connecting() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("menu.yaml");
        std::fs::write(&path, "products:\n  - name: ''\n    price: 1\n").unwrap();
        let err = menu(path.to_str().unwrap(), true).await.unwrap_err();
        assert_eq!(err.to_string(), "1 validation errors found");
    }
}
