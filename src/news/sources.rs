use super::{Headline, NewsSource};
use crate::error::ProviderError;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const PAGE_SIZE: usize = 10;

fn news_http_client() -> Client {
    Client::builder()
        .timeout(std::time::Duration::from_secs(20))
        .connect_timeout(std::time::Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

// ── NewsAPI (primary) ────────────────────────────────────────────

pub struct NewsApiSource {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct NewsApiResponse {
    articles: Vec<NewsApiArticle>,
}

#[derive(Debug, Deserialize)]
struct NewsApiArticle {
    title: Option<String>,
    source: Option<NewsApiSourceRef>,
}

#[derive(Debug, Deserialize)]
struct NewsApiSourceRef {
    name: Option<String>,
}

impl NewsApiSource {
    pub fn new(api_key: Option<&str>, base_url: &str) -> Self {
        Self {
            api_key: api_key.map(str::to_string),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: news_http_client(),
        }
    }

    fn key(&self) -> anyhow::Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ProviderError::missing_key("NewsAPI", "NOVAX_NEWS_API_KEY").into())
    }

    async fn fetch(&self, request: reqwest::RequestBuilder) -> anyhow::Result<Vec<Headline>> {
        let response = request
            .header("X-Api-Key", self.key()?)
            // NewsAPI rejects requests without a user agent
            .header(reqwest::header::USER_AGENT, "novax/0.1")
            .send()
            .await
            .context("NewsAPI request failed")?;

        if !response.status().is_success() {
            return Err(crate::providers::api_error("NewsAPI", response).await);
        }

        let parsed: NewsApiResponse = response
            .json()
            .await
            .context("NewsAPI response JSON decode failed")?;

        Ok(parsed
            .articles
            .into_iter()
            .filter_map(|a| {
                a.title.map(|title| Headline {
                    title,
                    source: a.source.and_then(|s| s.name),
                })
            })
            .collect())
    }
}

#[async_trait]
impl NewsSource for NewsApiSource {
    fn name(&self) -> &'static str {
        "newsapi"
    }

    async fn by_topic(&self, topic: &str) -> anyhow::Result<Vec<Headline>> {
        let request = self
            .client
            .get(format!("{}/v2/everything", self.base_url))
            .query(&[("q", topic), ("language", "en"), ("sortBy", "publishedAt")])
            .query(&[("pageSize", PAGE_SIZE)]);
        self.fetch(request).await
    }

    async fn by_country(&self, country_code: &str) -> anyhow::Result<Vec<Headline>> {
        let request = self
            .client
            .get(format!("{}/v2/top-headlines", self.base_url))
            .query(&[("country", country_code)])
            .query(&[("pageSize", PAGE_SIZE)]);
        self.fetch(request).await
    }
}

// ── GNews (fallback) ─────────────────────────────────────────────

pub struct GnewsSource {
    api_key: Option<String>,
    base_url: String,
    client: Client,
}

#[derive(Debug, Deserialize)]
struct GnewsResponse {
    articles: Vec<GnewsArticle>,
}

#[derive(Debug, Deserialize)]
struct GnewsArticle {
    title: Option<String>,
    source: Option<GnewsSourceRef>,
}

#[derive(Debug, Deserialize)]
struct GnewsSourceRef {
    name: Option<String>,
}

impl GnewsSource {
    pub fn new(api_key: Option<&str>, base_url: &str) -> Self {
        Self {
            api_key: api_key.map(str::to_string),
            base_url: base_url.trim_end_matches('/').to_string(),
            client: news_http_client(),
        }
    }

    fn key(&self) -> anyhow::Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| ProviderError::missing_key("GNews", "NOVAX_GNEWS_API_KEY").into())
    }

    async fn fetch(&self, request: reqwest::RequestBuilder) -> anyhow::Result<Vec<Headline>> {
        let response = request
            .query(&[("apikey", self.key()?)])
            .send()
            .await
            .context("GNews request failed")?;

        if !response.status().is_success() {
            return Err(crate::providers::api_error("GNews", response).await);
        }

        let parsed: GnewsResponse = response
            .json()
            .await
            .context("GNews response JSON decode failed")?;

        Ok(parsed
            .articles
            .into_iter()
            .filter_map(|a| {
                a.title.map(|title| Headline {
                    title,
                    source: a.source.and_then(|s| s.name),
                })
            })
            .collect())
    }
}

#[async_trait]
impl NewsSource for GnewsSource {
    fn name(&self) -> &'static str {
        "gnews"
    }

    async fn by_topic(&self, topic: &str) -> anyhow::Result<Vec<Headline>> {
        let request = self
            .client
            .get(format!("{}/api/v4/search", self.base_url))
            .query(&[("q", topic), ("lang", "en")])
            .query(&[("max", PAGE_SIZE)]);
        self.fetch(request).await
    }

    async fn by_country(&self, country_code: &str) -> anyhow::Result<Vec<Headline>> {
        let request = self
            .client
            .get(format!("{}/api/v4/top-headlines", self.base_url))
            .query(&[("country", country_code), ("lang", "en")])
            .query(&[("max", PAGE_SIZE)]);
        self.fetch(request).await
    }
}
