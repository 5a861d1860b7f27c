//! # Storefront Catalog
//!
//! Read models for everything the storefront shows but never mutates:
//! products, categories, blog posts and their comments.
//!
//! ## Envelope normalization
//!
//! List endpoints answer in several shapes (a bare array, or an object
//! wrapping the array under `data`, `items` or `results`).
//! [`envelope::normalize_list`] is the only place that knows this; it
//! returns [`envelope::Normalized::Malformed`] instead of failing so callers
//! can fall back to an empty list.
//!
//! ## Example
//!
//! ```rust,ignore
//! use storefront_catalog::{CatalogClient, CatalogConfig, ProductFilter};
//!
//! let client = CatalogClient::new(CatalogConfig::from_env());
//! let featured = client.filtered_products(ProductFilter::Featured).await?;
//! for product in &featured.products {
//!     println!("{} {}", product.name, product.effective_price());
//! }
//! ```

pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod media;
pub mod types;

pub use client::{BlogPage, CatalogClient};
pub use config::CatalogConfig;
pub use envelope::{Normalized, normalize_list};
pub use error::{CatalogError, Result};
pub use media::resolve_media_url;
pub use types::{
    BlogAuthor, BlogCategory, BlogComment, BlogImage, BlogPost, Category, FilteredProducts,
    NewComment, Page, Product, ProductFilter, ProductImage,
};
