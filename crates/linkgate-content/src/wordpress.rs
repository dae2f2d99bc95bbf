//! WordPress REST API content source.
//!
//! Uses two endpoints of the `wp/v2` API:
//!
//! ```text
//! GET {base}/posts?search={query}&per_page={n}   → [post, ...]
//! GET {base}/posts/{id}                          → post
//! ```

use linkgate_protocol::ContentItem;
use reqwest::{Client, StatusCode};
use serde::Deserialize;

use crate::text::display_title;
use crate::{ContentConfig, ContentError, ContentSource, RawContent};

/// The `{ "rendered": "..." }` wrapper WordPress puts around text fields.
#[derive(Debug, Deserialize)]
struct Rendered {
    #[serde(default)]
    rendered: String,
}

/// The subset of a WordPress post we read.
#[derive(Debug, Deserialize)]
struct WpPost {
    id: u64,
    #[serde(default)]
    title: Option<Rendered>,
    #[serde(default)]
    content: Option<Rendered>,
}

impl WpPost {
    fn display_title(&self) -> String {
        display_title(self.title.as_ref().map(|t| t.rendered.as_str()))
    }
}

/// A [`ContentSource`] backed by a WordPress site.
#[derive(Clone)]
pub struct WordPressSource {
    client: Client,
    base_url: String,
    per_page: u32,
}

impl WordPressSource {
    /// Builds a source from configuration.
    ///
    /// # Errors
    /// `ContentError::Config` if the HTTP client cannot be constructed.
    pub fn new(config: &ContentConfig) -> Result<Self, ContentError> {
        let client = Client::builder()
            .timeout(config.timeout())
            .user_agent(concat!("linkgate/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ContentError::Config(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            per_page: config.per_page,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl std::fmt::Debug for WordPressSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WordPressSource")
            .field("base_url", &self.base_url)
            .field("per_page", &self.per_page)
            .finish_non_exhaustive()
    }
}

impl ContentSource for WordPressSource {
    async fn search(&self, query: &str) -> Result<Vec<ContentItem>, ContentError> {
        let url = format!(
            "{}/posts?search={}&per_page={}",
            self.base_url,
            urlencoding::encode(query),
            self.per_page
        );

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            tracing::warn!(status = response.status().as_u16(), "search request rejected");
            return Err(ContentError::Status(response.status().as_u16()));
        }

        let posts: Vec<WpPost> = response.json().await?;
        tracing::debug!(results = posts.len(), "search completed");

        Ok(posts
            .iter()
            .map(|post| ContentItem {
                id: post.id.to_string(),
                title: post.display_title(),
            })
            .collect())
    }

    async fn fetch(&self, id: &str) -> Result<Option<RawContent>, ContentError> {
        let url = format!("{}/posts/{}", self.base_url, urlencoding::encode(id));

        let response = self.client.get(&url).send().await?;
        match response.status() {
            StatusCode::NOT_FOUND => {
                tracing::debug!(id, "content not found");
                return Ok(None);
            }
            status if !status.is_success() => {
                tracing::warn!(id, status = status.as_u16(), "content request rejected");
                return Err(ContentError::Status(status.as_u16()));
            }
            _ => {}
        }

        let post: WpPost = response.json().await?;
        let title = post.display_title();
        Ok(Some(RawContent {
            id: post.id.to_string(),
            title,
            body: post.content.map(|c| c.rendered).unwrap_or_default(),
        }))
    }
}
