//! News lookup by topic or country, with a secondary-provider fallback.
//!
//! The primary source (NewsAPI) is tried first; a thrown error or an empty
//! result set falls through to the fallback source (GNews) filtered by the
//! same keyword or country. Country names are mapped through a fixed lookup
//! table before any network call.

mod sources;

pub use sources::{GnewsSource, NewsApiSource};

use crate::error::NewsError;
use async_trait::async_trait;
use std::sync::Arc;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Headline {
    pub title: String,
    pub source: Option<String>,
}

/// Seam over a hosted news provider.
#[async_trait]
pub trait NewsSource: Send + Sync {
    fn name(&self) -> &'static str;

    async fn by_topic(&self, topic: &str) -> anyhow::Result<Vec<Headline>>;

    async fn by_country(&self, country_code: &str) -> anyhow::Result<Vec<Headline>>;
}

/// Fixed country-name table. Unmapped names fail before any network call.
pub fn country_code(name: &str) -> Result<&'static str, NewsError> {
    let normalized = name.trim().to_lowercase();
    let code = match normalized.as_str() {
        "argentina" => "ar",
        "australia" => "au",
        "brazil" => "br",
        "canada" => "ca",
        "china" => "cn",
        "egypt" => "eg",
        "france" => "fr",
        "germany" => "de",
        "greece" => "gr",
        "india" => "in",
        "ireland" => "ie",
        "israel" => "il",
        "italy" => "it",
        "japan" => "jp",
        "mexico" => "mx",
        "netherlands" => "nl",
        "nigeria" => "ng",
        "norway" => "no",
        "pakistan" => "pk",
        "philippines" => "ph",
        "russia" => "ru",
        "saudi arabia" => "sa",
        "singapore" => "sg",
        "south africa" => "za",
        "south korea" => "kr",
        "sweden" => "se",
        "switzerland" => "ch",
        "turkey" => "tr",
        "uae" | "united arab emirates" => "ae",
        "uk" | "united kingdom" => "gb",
        "us" | "usa" | "united states" => "us",
        _ => return Err(NewsError::UnknownCountry(name.trim().to_string())),
    };
    Ok(code)
}

/// Join headlines into the single response string the gateway returns.
pub fn format_headlines(headlines: &[Headline]) -> String {
    headlines
        .iter()
        .enumerate()
        .map(|(i, h)| match &h.source {
            Some(source) => format!("{}. {} ({source})", i + 1, h.title),
            None => format!("{}. {}", i + 1, h.title),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Primary-then-fallback lookup over two [`NewsSource`]s.
pub struct NewsService {
    primary: Arc<dyn NewsSource>,
    fallback: Arc<dyn NewsSource>,
}

impl NewsService {
    pub fn new(primary: Arc<dyn NewsSource>, fallback: Arc<dyn NewsSource>) -> Self {
        Self { primary, fallback }
    }

    pub async fn topic_headlines(&self, topic: &str) -> Result<Vec<Headline>, NewsError> {
        match self.primary.by_topic(topic).await {
            Ok(headlines) if !headlines.is_empty() => Ok(headlines),
            Ok(_) => {
                tracing::info!(topic, source = self.primary.name(), "empty result, trying fallback");
                self.fallback_topic(topic).await
            }
            Err(e) => {
                tracing::warn!(topic, source = self.primary.name(), error = %e, "primary news lookup failed");
                self.fallback_topic(topic).await
            }
        }
    }

    pub async fn country_headlines(&self, country_code: &str) -> Result<Vec<Headline>, NewsError> {
        match self.primary.by_country(country_code).await {
            Ok(headlines) if !headlines.is_empty() => Ok(headlines),
            Ok(_) => {
                tracing::info!(country_code, source = self.primary.name(), "empty result, trying fallback");
                self.fallback_country(country_code).await
            }
            Err(e) => {
                tracing::warn!(country_code, source = self.primary.name(), error = %e, "primary news lookup failed");
                self.fallback_country(country_code).await
            }
        }
    }

    async fn fallback_topic(&self, topic: &str) -> Result<Vec<Headline>, NewsError> {
        match self.fallback.by_topic(topic).await {
            Ok(headlines) if !headlines.is_empty() => Ok(headlines),
            Ok(_) => Err(NewsError::Empty(topic.to_string())),
            Err(e) => Err(NewsError::Request {
                source_name: self.fallback.name().to_string(),
                message: e.to_string(),
            }),
        }
    }

    async fn fallback_country(&self, country_code: &str) -> Result<Vec<Headline>, NewsError> {
        match self.fallback.by_country(country_code).await {
            Ok(headlines) if !headlines.is_empty() => Ok(headlines),
            Ok(_) => Err(NewsError::Empty(country_code.to_string())),
            Err(e) => Err(NewsError::Request {
                source_name: self.fallback.name().to_string(),
                message: e.to_string(),
            }),
        }
    }
}
