//! Catalog HTTP client.

use crate::config::CatalogConfig;
use crate::envelope::normalize_list;
use crate::error::{CatalogError, Result};
use crate::types::{
    BlogCategory, BlogComment, BlogPost, FilteredProducts, NewComment, Page, Product,
    ProductFilter,
};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

#[derive(Debug, Deserialize)]
struct CategoriesResponse {
    #[serde(default)]
    categories: Vec<BlogCategory>,
}

/// Posts and sidebar categories for one blog page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BlogPage {
    /// The requested page of posts.
    pub posts: Page<BlogPost>,
    /// Number of pages at the configured page size.
    pub total_pages: u64,
    /// Categories; empty if they failed to load.
    pub categories: Vec<BlogCategory>,
}

/// Read-only client for products and the blog.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    config: CatalogConfig,
}

impl CatalogClient {
    /// Create a client.
    #[must_use]
    pub fn new(config: CatalogConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    /// Client configuration.
    #[must_use]
    pub const fn config(&self) -> &CatalogConfig {
        &self.config
    }

    /// All products, plain or paginated.
    ///
    /// # Errors
    ///
    /// Returns transport and HTTP errors. An unrecognized body yields an
    /// empty list.
    pub async fn products(&self) -> Result<Vec<Product>> {
        let request = self.client.get(self.config.url("/product/products/"));
        let body: Value = self.get_json(request).await?;
        Ok(normalize_list(body).into_items_or_empty("products"))
    }

    /// One product.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id, and transport,
    /// HTTP or decoding errors otherwise.
    pub async fn product(&self, id: &str) -> Result<Product> {
        let url = self.config.url(&format!("/product/products/{id}/"));
        self.get_json(self.client.get(url)).await
    }

    /// Products matching a server-side filter.
    ///
    /// # Errors
    ///
    /// Returns transport and HTTP errors.
    pub async fn filtered_products(&self, filter: ProductFilter) -> Result<FilteredProducts> {
        let request = self
            .client
            .get(self.config.url("/product/filter/"))
            .query(&[("type", filter.as_str())]);
        let body: Value = self.get_json(request).await?;

        let filter_name = body
            .get("filter_name")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(FilteredProducts {
            filter_name,
            products: normalize_list(body).into_items_or_empty("filtered products"),
        })
    }

    /// One page of blog posts, optionally within a category.
    ///
    /// # Errors
    ///
    /// Returns transport, HTTP or decoding errors.
    pub async fn blog_posts(&self, page: u32, category: Option<&str>) -> Result<Page<BlogPost>> {
        let mut query = vec![("page", page.max(1).to_string())];
        if let Some(category) = category.filter(|c| !c.is_empty()) {
            query.push(("category", category.to_string()));
        }

        let request = self
            .client
            .get(self.config.url("/blog/posts/"))
            .query(&query);
        self.get_json(request).await
    }

    /// One blog post with its comments.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::NotFound`] for an unknown id, and transport,
    /// HTTP or decoding errors otherwise.
    pub async fn blog_post(&self, id: u64) -> Result<BlogPost> {
        let url = self.config.url(&format!("/blog/posts/{id}/"));
        self.get_json(self.client.get(url)).await
    }

    /// Blog categories with post counts.
    ///
    /// # Errors
    ///
    /// Returns transport, HTTP or decoding errors.
    pub async fn blog_categories(&self) -> Result<Vec<BlogCategory>> {
        let response: CategoriesResponse = self
            .get_json(self.client.get(self.config.url("/blog/categories/")))
            .await?;
        Ok(response.categories)
    }

    /// Load a page of posts and the categories concurrently.
    ///
    /// A category failure is logged and leaves the sidebar empty; a post
    /// failure fails the whole page.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`CatalogClient::blog_posts`].
    pub async fn load_blog_page(&self, page: u32, category: Option<&str>) -> Result<BlogPage> {
        let (posts, categories) =
            futures::join!(self.blog_posts(page, category), self.blog_categories());

        let posts = posts?;
        let categories = categories.unwrap_or_else(|error| {
            tracing::warn!(%error, "Failed to load blog categories");
            Vec::new()
        });

        Ok(BlogPage {
            total_pages: posts.total_pages(self.config.blog_page_size),
            posts,
            categories,
        })
    }

    /// Post an anonymous comment.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::Validation`] without sending anything when the
    /// comment is incomplete, and transport, HTTP or decoding errors
    /// otherwise.
    pub async fn post_comment(&self, comment: &NewComment) -> Result<BlogComment> {
        comment.validate()?;

        let request = self
            .client
            .post(self.config.url("/blog/comments/"))
            .json(comment);
        let created: BlogComment = self.get_json(request).await?;

        tracing::info!(blog = comment.blog, "Comment posted");
        Ok(created)
    }

    async fn get_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .send()
            .await
            .map_err(|e| CatalogError::Transport(e.to_string()))?;
        let response = check_status(response).await?;

        response
            .json::<T>()
            .await
            .map_err(|e| CatalogError::MalformedResponse(e.to_string()))
    }
}

async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    tracing::debug!(url = %response.url(), status = status.as_u16(), "Catalog response");

    match status {
        s if s.is_success() => Ok(response),
        StatusCode::NOT_FOUND => Err(CatalogError::NotFound(response.url().path().to_string())),
        status => {
            let body = response.text().await.unwrap_or_default();
            Err(CatalogError::Http {
                status: status.as_u16(),
                message: detail_message(&body),
            })
        },
    }
}

/// `detail` or `error` from a DRF error body, else the raw body.
fn detail_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|value| {
            ["detail", "error"]
                .iter()
                .find_map(|key| value.get(*key).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or_else(|| body.to_string())
}
