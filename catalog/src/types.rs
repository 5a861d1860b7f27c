//! Catalog read models.
//!
//! Field names follow the backend's snake_case JSON. Everything optional on
//! the wire defaults, so partial payloads (cart lines embed a trimmed
//! product) still decode.

use crate::error::CatalogError;
use crate::media::resolve_media_url;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use storefront_core::ids::ProductId;

/// Product category.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Category {
    /// Category id.
    #[serde(default)]
    pub id: Option<u64>,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
}

/// One product image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductImage {
    /// Image path or URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Display order, ascending.
    #[serde(default)]
    pub order: i32,
    /// Alt text.
    #[serde(default)]
    pub alt_text: Option<String>,
    /// Whether the image is shown.
    #[serde(default = "default_true")]
    pub is_active: bool,
}

const fn default_true() -> bool {
    true
}

/// A product as listed, shown in detail, or embedded in a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Product id.
    pub id: ProductId,
    /// Name.
    pub name: String,
    /// Description.
    #[serde(default)]
    pub description: Option<String>,
    /// List price.
    pub price: Decimal,
    /// Sale price, when discounted.
    #[serde(default)]
    pub discounted_price: Option<Decimal>,
    /// Discount percentage.
    #[serde(default)]
    pub percentage_discount: Option<Decimal>,
    /// On sale.
    #[serde(default)]
    pub is_on_sale: bool,
    /// Newly added.
    #[serde(default)]
    pub is_new: bool,
    /// Featured.
    #[serde(default)]
    pub is_featured: bool,
    /// Average rating.
    #[serde(default)]
    pub rating: Option<Decimal>,
    /// Review count.
    #[serde(default)]
    pub total_reviews: u32,
    /// Images, in backend order.
    #[serde(default)]
    pub images: Vec<ProductImage>,
    /// Category.
    #[serde(default)]
    pub category: Option<Category>,
}

impl Product {
    /// A plain product: no sale, no images, no category.
    #[must_use]
    pub fn new(id: impl Into<ProductId>, name: impl Into<String>, price: Decimal) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            price,
            discounted_price: None,
            percentage_discount: None,
            is_on_sale: false,
            is_new: false,
            is_featured: false,
            rating: None,
            total_reviews: 0,
            images: Vec::new(),
            category: None,
        }
    }

    /// Price a shopper pays: the sale price while on sale, the list price otherwise.
    #[must_use]
    pub fn effective_price(&self) -> Decimal {
        match self.discounted_price {
            Some(sale) if self.is_on_sale => sale,
            _ => self.price,
        }
    }

    /// Active images sorted by `order`.
    #[must_use]
    pub fn sorted_images(&self) -> Vec<&ProductImage> {
        let mut images: Vec<&ProductImage> = self
            .images
            .iter()
            .filter(|image| image.is_active && image.image.is_some())
            .collect();
        images.sort_by_key(|image| image.order);
        images
    }

    /// Absolute URL of the first image, if any.
    #[must_use]
    pub fn primary_image_url(&self, base_url: &str) -> Option<String> {
        self.sorted_images()
            .first()
            .and_then(|image| image.image.as_deref())
            .map(|path| resolve_media_url(base_url, path))
    }
}

/// Server-side product filters behind `/product/filter/?type=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductFilter {
    /// On sale.
    Discounted,
    /// Featured.
    Featured,
    /// Newly added.
    New,
    /// Best sellers.
    BestSelling,
}

impl ProductFilter {
    /// Value of the `type` query parameter.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Discounted => "discounted",
            Self::Featured => "featured",
            Self::New => "new",
            Self::BestSelling => "best_selling",
        }
    }
}

/// Result of a filtered product query.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FilteredProducts {
    /// Display name reported by the backend.
    pub filter_name: Option<String>,
    /// Matching products.
    pub products: Vec<Product>,
}

/// Django REST page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    /// Total number of results across all pages.
    pub count: u64,
    /// URL of the next page.
    #[serde(default)]
    pub next: Option<String>,
    /// URL of the previous page.
    #[serde(default)]
    pub previous: Option<String>,
    /// Results on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Number of pages at `page_size` results per page.
    #[must_use]
    pub fn total_pages(&self, page_size: u32) -> u64 {
        self.count.div_ceil(u64::from(page_size.max(1)))
    }

    /// Whether another page follows.
    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.next.is_some()
    }
}

/// Author or commenter.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BlogAuthor {
    /// User id.
    #[serde(default)]
    pub id: Option<u64>,
    /// Username.
    #[serde(default)]
    pub username: String,
    /// Given name.
    #[serde(default)]
    pub first_name: String,
    /// Family name.
    #[serde(default)]
    pub last_name: String,
    /// Email, when exposed.
    #[serde(default)]
    pub email: Option<String>,
}

impl BlogAuthor {
    /// Full name, or the username when no name is set.
    #[must_use]
    pub fn display_name(&self) -> String {
        let full = format!("{} {}", self.first_name, self.last_name);
        let full = full.trim();
        if full.is_empty() {
            self.username.clone()
        } else {
            full.to_string()
        }
    }
}

/// Blog image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogImage {
    /// Image path or URL.
    #[serde(default)]
    pub image: Option<String>,
    /// Alt text.
    #[serde(default)]
    pub alt_text: Option<String>,
    /// Display order.
    #[serde(default)]
    pub order: i32,
}

/// Blog comment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogComment {
    /// Comment id.
    #[serde(default)]
    pub id: Option<u64>,
    /// Post id.
    pub blog: u64,
    /// Commenter.
    #[serde(default)]
    pub user: Option<BlogAuthor>,
    /// Text.
    pub comment: String,
    /// Posted at.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// Blog post, as listed or in detail.
///
/// `comments` is only populated by the detail endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogPost {
    /// Post id.
    pub id: u64,
    /// Title.
    pub title: String,
    /// URL slug.
    #[serde(default)]
    pub slug: String,
    /// Body HTML.
    #[serde(default)]
    pub content: String,
    /// Author.
    #[serde(default)]
    pub author: Option<BlogAuthor>,
    /// Published at.
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
    /// Category name.
    #[serde(default)]
    pub category: Option<String>,
    /// Comma-separated tags.
    #[serde(default)]
    pub tags: Option<String>,
    /// Newly published.
    #[serde(default)]
    pub is_new: bool,
    /// View count.
    #[serde(default)]
    pub number_of_views: u64,
    /// Like count.
    #[serde(default)]
    pub number_of_likes: u64,
    /// Images.
    #[serde(default)]
    pub images: Vec<BlogImage>,
    /// Active comment count.
    #[serde(default)]
    pub comments_count: u64,
    /// Active comments.
    #[serde(default)]
    pub comments: Vec<BlogComment>,
}

/// Blog category with its post count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlogCategory {
    /// Category name.
    pub name: String,
    /// Posts in the category.
    #[serde(default)]
    pub post_count: u64,
}

/// Anonymous comment submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewComment {
    /// Post id.
    pub blog: u64,
    /// Comment text.
    pub comment: String,
    /// Commenter name.
    pub name: String,
    /// Commenter email.
    pub email: String,
}

impl NewComment {
    /// Check the submission before sending.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] naming every blank field and an
    /// invalid email.
    pub fn validate(&self) -> Result<(), CatalogError> {
        let mut invalid = Vec::new();
        if self.comment.trim().is_empty() {
            invalid.push("comment".to_string());
        }
        if self.name.trim().is_empty() {
            invalid.push("name".to_string());
        }
        if !storefront_auth::utils::is_valid_email(self.email.trim()) {
            invalid.push("email".to_string());
        }

        if invalid.is_empty() {
            Ok(())
        } else {
            Err(CatalogError::Validation(invalid))
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use serde_json::json;
    use std::str::FromStr;

    fn dec(text: &str) -> Decimal {
        Decimal::from_str(text).unwrap()
    }

    fn product() -> Product {
        serde_json::from_value(json!({
            "id": 7,
            "name": "Linen shirt",
            "price": "49.90",
            "discounted_price": 39.92,
            "is_on_sale": true,
            "images": [
                { "image": "/media/b.jpg", "order": 2 },
                { "image": "/media/hidden.jpg", "order": 0, "is_active": false },
                { "image": "/media/a.jpg", "order": 1 }
            ]
        }))
        .unwrap()
    }

    #[test]
    fn test_decodes_string_and_numeric_money() {
        let product = product();
        assert_eq!(product.id, ProductId::from("7"));
        assert_eq!(product.price, dec("49.90"));
        assert_eq!(product.discounted_price, Some(dec("39.92")));
    }

    #[test]
    fn test_effective_price_respects_sale_flag() {
        let mut product = product();
        assert_eq!(product.effective_price(), dec("39.92"));

        product.is_on_sale = false;
        assert_eq!(product.effective_price(), dec("49.90"));
    }

    #[test]
    fn test_primary_image_is_lowest_active_order() {
        assert_eq!(
            product().primary_image_url("http://api.example"),
            Some("http://api.example/media/a.jpg".to_string())
        );
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let page: Page<BlogPost> = Page {
            count: 21,
            next: Some("?page=2".into()),
            previous: None,
            results: vec![],
        };
        assert_eq!(page.total_pages(10), 3);
        assert!(page.has_next());
    }

    #[test]
    fn test_filter_query_values() {
        assert_eq!(ProductFilter::BestSelling.as_str(), "best_selling");
        assert_eq!(
            serde_json::to_value(ProductFilter::Discounted).unwrap(),
            json!("discounted")
        );
    }

    #[test]
    fn test_comment_validation_lists_fields() {
        let comment = NewComment {
            blog: 1,
            comment: " ".into(),
            name: "Ada".into(),
            email: "not-an-email".into(),
        };

        assert_eq!(
            comment.validate(),
            Err(CatalogError::Validation(vec!["comment".into(), "email".into()]))
        );
    }

    #[test]
    fn test_author_display_name_falls_back_to_username() {
        let author = BlogAuthor {
            username: "ada".into(),
            ..BlogAuthor::default()
        };
        assert_eq!(author.display_name(), "ada");
    }
}
