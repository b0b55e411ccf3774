//! Client for the demo storefront API (posts and products).

use reqwest::Client;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, instrument};
use url::Url;

use crate::{
    config::{Config, DEFAULT_CONTENT_BASE_URL},
    error::GatewayError,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub title: String,
    pub image: String,
    pub excerpt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    pub image: String,
    pub price: f64,
}

#[derive(Debug, Clone)]
pub struct ContentClient {
    base_url: String,
    http: Client,
}

impl Default for ContentClient {
    fn default() -> Self {
        Self::new(DEFAULT_CONTENT_BASE_URL)
    }
}

impl ContentClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    /// Client pointed at the content API configured in `config.toml`.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.content_base_url)
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn posts(&self) -> Result<Vec<Post>, GatewayError> {
        self.get_list("/api/posts").await
    }

    #[instrument(skip(self), level = "debug")]
    pub async fn products(&self) -> Result<Vec<Product>, GatewayError> {
        self.get_list("/api/products").await
    }

    /// Absolute address of an item image, which the API may give relative to its root.
    pub fn image_url(&self, image: &str) -> Option<String> {
        resolve_image(&self.base_url, image)
    }

    async fn get_list<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, GatewayError> {
        let url = format!("{}{}", self.base_url, path);
        debug!(%url, "fetching content");

        let res = self.http.get(&url).send().await?;
        let status = res.status();
        if !status.is_success() {
            return Err(GatewayError::RequestFailed(status.as_u16()));
        }

        res.json()
            .await
            .map_err(|e| GatewayError::Parse(format!("{path}: {e}")))
    }
}

/// Join a possibly relative image path onto the API root.
pub fn resolve_image(base_url: &str, image: &str) -> Option<String> {
    let base = Url::parse(base_url).ok()?;
    base.join(image).ok().map(String::from)
}

/// Price label as the storefront shows it.
pub fn format_price(price: f64) -> String {
    format!("{price} €")
}
