//! Product image URL resolution.
//!
//! Product records store whatever the admin entered: an absolute URL to a
//! CDN, a path returned by the upload endpoint (`/uploads/...`), or nothing.
//! [`ImageResolver`] turns that into a URL a browser can load.

/// Path prefix under which uploaded images are served.
pub const UPLOADS_PREFIX: &str = "/uploads/";

/// Generic image used when no keyword matches.
pub const DEFAULT_FALLBACK_IMAGE: &str = "/static/fallback/default.jpg";

/// Keyword table for fallback images.
///
/// Matching is case-insensitive and the first entry whose keyword appears in
/// the product name wins, so more specific dishes come before generic ones
/// ("Chicken Burger" is a chicken dish before it is a burger).
pub const FALLBACK_IMAGES: &[(&str, &str)] = &[
    ("chicken", "/static/fallback/chicken.jpg"),
    ("fish", "/static/fallback/fish.jpg"),
    ("beef", "/static/fallback/beef.jpg"),
    ("suya", "/static/fallback/beef.jpg"),
    ("jollof", "/static/fallback/rice.jpg"),
    ("rice", "/static/fallback/rice.jpg"),
    ("pizza", "/static/fallback/pizza.jpg"),
    ("burger", "/static/fallback/burger.jpg"),
    ("shawarma", "/static/fallback/shawarma.jpg"),
    ("pasta", "/static/fallback/pasta.jpg"),
    ("spaghetti", "/static/fallback/pasta.jpg"),
    ("salad", "/static/fallback/salad.jpg"),
    ("soup", "/static/fallback/soup.jpg"),
    ("cake", "/static/fallback/dessert.jpg"),
    ("ice cream", "/static/fallback/dessert.jpg"),
    ("juice", "/static/fallback/drink.jpg"),
    ("smoothie", "/static/fallback/drink.jpg"),
    ("zobo", "/static/fallback/drink.jpg"),
    ("drink", "/static/fallback/drink.jpg"),
];

/// Pick a fallback image path for a product by keyword.
///
/// ```
/// use chowline_core::image::fallback_image;
///
/// assert_eq!(fallback_image("Spicy Chicken Burger"), "/static/fallback/chicken.jpg");
/// assert_eq!(fallback_image("Mystery Box"), "/static/fallback/default.jpg");
/// ```
#[must_use]
pub fn fallback_image(product_name: &str) -> &'static str {
    let name = product_name.to_lowercase();
    FALLBACK_IMAGES
        .iter()
        .find(|(keyword, _)| name.contains(keyword))
        .map_or(DEFAULT_FALLBACK_IMAGE, |&(_, path)| path)
}

/// Whether the reference is an absolute http(s) or protocol-relative URL.
fn is_absolute(reference: &str) -> bool {
    let lower = reference.get(..8).unwrap_or(reference).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://") || lower.starts_with("//")
}

/// Append a `v=<version>` query parameter, keeping any fragment last.
fn with_cache_buster(url: &str, version: &str) -> String {
    let (base, fragment) = url
        .split_once('#')
        .map_or((url, None), |(b, f)| (b, Some(f)));
    let separator = if base.contains('?') { '&' } else { '?' };
    let mut out = format!("{base}{separator}v={version}");
    if let Some(fragment) = fragment {
        out.push('#');
        out.push_str(fragment);
    }
    out
}

/// Resolves stored image references against the public asset origin.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageResolver {
    origin: String,
}

impl ImageResolver {
    /// Create a resolver for the given origin (e.g., `https://api.example.com`).
    ///
    /// A trailing slash is removed.
    #[must_use]
    pub fn new(origin: &str) -> Self {
        Self {
            origin: origin.trim().trim_end_matches('/').to_string(),
        }
    }

    /// The origin relative paths are resolved against.
    #[must_use]
    pub fn origin(&self) -> &str {
        &self.origin
    }

    /// Resolve a product's stored image reference to a loadable URL.
    ///
    /// - Absolute `http(s)` and protocol-relative `//host/...` URLs get a
    ///   `v=<version>` cache-busting parameter.
    /// - `/uploads/...` paths are prefixed with the origin.
    /// - Other relative references are treated as upload file names.
    /// - Missing or blank references resolve to the keyword fallback, served
    ///   from the same origin.
    #[must_use]
    pub fn resolve(&self, image: Option<&str>, product_name: &str, version: &str) -> String {
        let reference = image.map(str::trim).unwrap_or_default();

        if reference.is_empty() {
            return format!("{}{}", self.origin, fallback_image(product_name));
        }

        if is_absolute(reference) {
            return with_cache_buster(reference, version);
        }

        if reference.starts_with(UPLOADS_PREFIX) {
            return format!("{}{reference}", self.origin);
        }

        let file_name = reference
            .trim_start_matches('/')
            .trim_start_matches("uploads/");
        format!("{}{UPLOADS_PREFIX}{file_name}", self.origin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ImageResolver {
        ImageResolver::new("https://api.chowline.test/")
    }

    #[test]
    fn test_absolute_url_gets_cache_buster() {
        let url = resolver().resolve(
            Some("https://cdn.example.com/jollof.png"),
            "Jollof",
            "1700000000",
        );
        assert_eq!(url, "https://cdn.example.com/jollof.png?v=1700000000");
    }

    #[test]
    fn test_absolute_url_with_query_and_fragment() {
        let url = resolver().resolve(
            Some("http://cdn.example.com/a.png?w=200#top"),
            "Jollof",
            "5",
        );
        assert_eq!(url, "http://cdn.example.com/a.png?w=200&v=5#top");
    }

    #[test]
    fn test_scheme_match_is_case_insensitive() {
        let url = resolver().resolve(Some("HTTPS://CDN.example.com/a.png"), "x", "1");
        assert_eq!(url, "HTTPS://CDN.example.com/a.png?v=1");
    }

    #[test]
    fn test_protocol_relative_url_stays_on_its_host() {
        let url = resolver().resolve(Some("//cdn.example.com/a.png"), "x", "1");
        assert_eq!(url, "//cdn.example.com/a.png?v=1");
    }

    #[test]
    fn test_upload_path_is_prefixed_with_origin() {
        let url = resolver().resolve(Some("/uploads/abc.jpg"), "Jollof", "1");
        assert_eq!(url, "https://api.chowline.test/uploads/abc.jpg");
    }

    #[test]
    fn test_bare_file_name_is_treated_as_upload() {
        let r = resolver();
        assert_eq!(
            r.resolve(Some("abc.jpg"), "Jollof", "1"),
            "https://api.chowline.test/uploads/abc.jpg"
        );
        assert_eq!(
            r.resolve(Some("uploads/abc.jpg"), "Jollof", "1"),
            "https://api.chowline.test/uploads/abc.jpg"
        );
    }

    #[test]
    fn test_missing_image_uses_keyword_fallback() {
        let r = resolver();
        assert_eq!(
            r.resolve(None, "Spicy Chicken Burger", "1"),
            "https://api.chowline.test/static/fallback/chicken.jpg"
        );
        assert_eq!(
            r.resolve(Some("   "), "Classic Burger", "1"),
            "https://api.chowline.test/static/fallback/burger.jpg"
        );
    }

    #[test]
    fn test_fallback_prefers_earlier_keywords() {
        assert_eq!(
            fallback_image("Spicy Chicken Burger"),
            "/static/fallback/chicken.jpg"
        );
        assert_eq!(
            fallback_image("Beef Burger Deluxe"),
            "/static/fallback/beef.jpg"
        );
        assert_eq!(fallback_image("PIZZA MARGHERITA"), "/static/fallback/pizza.jpg");
    }

    #[test]
    fn test_fallback_default() {
        assert_eq!(fallback_image(""), DEFAULT_FALLBACK_IMAGE);
        assert_eq!(fallback_image("Chef's Special"), DEFAULT_FALLBACK_IMAGE);
    }

    #[test]
    fn test_origin_is_normalized() {
        assert_eq!(
            ImageResolver::new(" http://localhost:3000// ").origin(),
            "http://localhost:3000"
        );
    }
}
