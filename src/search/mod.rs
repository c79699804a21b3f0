//! Keyword web search by scraping the DuckDuckGo HTML results page.
//!
//! Result anchors carry a redirect URL whose `uddg` query parameter holds the
//! real destination; [`unwrap_redirect`] recovers it. An empty scrape yields a
//! single human-readable [`SearchOutcome::Notice`] instead of an empty list,
//! so the wire shape is a mixed list of objects and one string.

use anyhow::Context;
use serde::Serialize;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchHit {
    pub title: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SearchOutcome {
    Hit(SearchHit),
    Notice(String),
}

/// Fetch and scrape one results page. `base_url` points at the search
/// engine's HTML frontend (overridable for tests).
pub async fn search_web(
    client: &reqwest::Client,
    base_url: &str,
    query: &str,
    max_results: usize,
) -> anyhow::Result<Vec<SearchOutcome>> {
    let url = format!("{}/html/", base_url.trim_end_matches('/'));
    let response = client
        .get(url)
        .query(&[("q", query)])
        .header(reqwest::header::USER_AGENT, "Mozilla/5.0 (compatible; novax/0.1)")
        .send()
        .await
        .context("search request failed")?;

    if !response.status().is_success() {
        anyhow::bail!("search engine returned {}", response.status());
    }

    let html = response.text().await.context("search body read failed")?;
    let hits = parse_results(&html, max_results);

    if hits.is_empty() {
        return Ok(vec![SearchOutcome::Notice(format!(
            "No results found for \"{query}\"."
        ))]);
    }

    Ok(hits.into_iter().map(SearchOutcome::Hit).collect())
}

fn parse_results(html: &str, max_results: usize) -> Vec<SearchHit> {
    use scraper::{Html, Selector};

    let document = Html::parse_document(html);
    let Ok(anchor_sel) = Selector::parse("a.result__a") else {
        return Vec::new();
    };

    document
        .select(&anchor_sel)
        .filter_map(|el| {
            let title = el.text().collect::<String>().trim().to_string();
            let href = el.value().attr("href")?;
            let url = unwrap_redirect(href)?;
            if title.is_empty() {
                return None;
            }
            Some(SearchHit { title, url })
        })
        .take(max_results)
        .collect()
}

/// Recover the destination from a result anchor. Redirect links look like
/// `//duckduckgo.com/l/?uddg=<escaped url>&rut=…`; direct links pass through.
fn unwrap_redirect(href: &str) -> Option<String> {
    let absolute = if let Some(rest) = href.strip_prefix("//") {
        format!("https://{rest}")
    } else {
        href.to_string()
    };

    let parsed = Url::parse(&absolute).ok()?;

    if parsed.path().starts_with("/l/") {
        return parsed
            .query_pairs()
            .find(|(k, _)| k == "uddg")
            .map(|(_, v)| v.into_owned());
    }

    match parsed.scheme() {
        "http" | "https" => Some(absolute),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RESULTS_PAGE: &str = r#"
        <html><body>
          <div class="result">
            <a class="result__a" href="//duckduckgo.com/l/?uddg=https%3A%2F%2Fwww.rust-lang.org%2F&amp;rut=abc">Rust Programming Language</a>
          </div>
          <div class="result">
            <a class="result__a" href="https://doc.rust-lang.org/book/">The Rust Book</a>
          </div>
        </body></html>
    "#;

    #[test]
    fn parses_titles_and_unwraps_redirects() {
        let hits = parse_results(RESULTS_PAGE, 10);
        assert_eq!(hits.len(), 2);
        assert_eq!(hits[0].title, "Rust Programming Language");
        assert_eq!(hits[0].url, "https://www.rust-lang.org/");
        assert_eq!(hits[1].url, "https://doc.rust-lang.org/book/");
    }

    #[test]
    fn respects_max_results() {
        let hits = parse_results(RESULTS_PAGE, 1);
        assert_eq!(hits.len(), 1);
    }

    #[test]
    fn empty_page_yields_no_hits() {
        assert!(parse_results("<html><body></body></html>", 10).is_empty());
    }

    #[test]
    fn anchors_without_href_are_skipped() {
        let html = r#"<a class="result__a">No link</a>"#;
        assert!(parse_results(html, 10).is_empty());
    }

    #[test]
    fn unwrap_redirect_decodes_uddg() {
        let href = "//duckduckgo.com/l/?uddg=https%3A%2F%2Fexample.com%2Fpage%3Fa%3D1&rut=xyz";
        assert_eq!(
            unwrap_redirect(href).as_deref(),
            Some("https://example.com/page?a=1")
        );
    }

    #[test]
    fn unwrap_redirect_passes_direct_links() {
        assert_eq!(
            unwrap_redirect("https://example.com/x").as_deref(),
            Some("https://example.com/x")
        );
    }

    #[test]
    fn unwrap_redirect_rejects_other_schemes() {
        assert!(unwrap_redirect("javascript:alert(1)").is_none());
    }

    #[test]
    fn notice_serializes_as_bare_string() {
        let outcome = SearchOutcome::Notice("No results found for \"x\".".into());
        let json = serde_json::to_string(&outcome).unwrap();
        assert_eq!(json, "\"No results found for \\\"x\\\".\"");
    }

    #[test]
    fn hit_serializes_as_object() {
        let outcome = SearchOutcome::Hit(SearchHit {
            title: "T".into(),
            url: "https://example.com".into(),
        });
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["title"], "T");
        assert_eq!(json["url"], "https://example.com");
    }

    #[test]
    fn mixed_list_shape_matches_wire_contract() {
        let list = vec![
            SearchOutcome::Hit(SearchHit {
                title: "T".into(),
                url: "https://example.com".into(),
            }),
            SearchOutcome::Notice("note".into()),
        ];
        let json = serde_json::to_value(&list).unwrap();
        assert!(json[0].is_object());
        assert!(json[1].is_string());
    }
}
