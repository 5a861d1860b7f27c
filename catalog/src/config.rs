//! Catalog configuration.

/// Backend used when `STOREFRONT_API_BASE_URL` is unset.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8000";

/// Posts per blog page; the backend paginates in tens.
pub const DEFAULT_BLOG_PAGE_SIZE: u32 = 10;

/// Catalog client configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogConfig {
    /// API base URL, without a trailing slash.
    pub base_url: String,
    /// Posts per blog page, used to derive the page count.
    pub blog_page_size: u32,
}

impl CatalogConfig {
    /// Configuration for `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            blog_page_size: DEFAULT_BLOG_PAGE_SIZE,
        }
    }

    /// Read `STOREFRONT_API_BASE_URL`, falling back to [`DEFAULT_BASE_URL`].
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("STOREFRONT_API_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
        )
    }

    /// Override the blog page size. Zero is treated as one.
    #[must_use]
    pub fn with_blog_page_size(mut self, size: u32) -> Self {
        self.blog_page_size = size.max(1);
        self
    }

    /// Absolute URL for an API path.
    #[must_use]
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
