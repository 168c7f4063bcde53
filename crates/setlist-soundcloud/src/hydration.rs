//! Track page scraping
//!
//! The web app embeds its initial state as `window.__sc_hydration = [...];`
//! in an inline script. The `sound` entry of that array holds the same
//! track resource the API returns, plus publisher metadata.

use async_trait::async_trait;
use regex::Regex;
use reqwest::{Client, StatusCode};
use scraper::{Html, Selector};
use serde_json::Value;

use crate::error::{MetadataError, Result};
use crate::models::ScrapedTrack;

const HYDRATION_MARKER: &str = "window.__sc_hydration";
const PUBLISH_DATE_SELECTOR: &str =
    r#"article[itemtype="http://schema.org/MusicRecording"] time[pubdate]"#;

/// Page scraping collaborator
#[async_trait]
pub trait TrackPageScraper: Send + Sync {
    async fn scrape(&self, url: &str) -> Result<ScrapedTrack>;
}

/// Fetches the track page over HTTP and extracts its hydration data
#[derive(Debug, Clone)]
pub struct HttpTrackScraper {
    client: Client,
}

impl HttpTrackScraper {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl TrackPageScraper for HttpTrackScraper {
    async fn scrape(&self, url: &str) -> Result<ScrapedTrack> {
        log::debug!("Scraping track page {}", url);

        // Transport failures and non-2xx statuses are upstream outages
        let response = self.client.get(url).send().await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Err(MetadataError::NotFound);
        }

        let html = response.error_for_status()?.text().await?;

        extract_track_from_html(&html)
    }
}

/// Extract the `sound` hydration entry and publish date from a track page
pub fn extract_track_from_html(html: &str) -> Result<ScrapedTrack> {
    let document = Html::parse_document(html);

    let script_selector = Selector::parse("script")
        .map_err(|e| MetadataError::scrape_error(format!("Invalid selector: {:?}", e)))?;
    let script = document
        .select(&script_selector)
        .map(|el| el.text().collect::<String>())
        .find(|text| text.contains(HYDRATION_MARKER))
        .ok_or_else(|| MetadataError::scrape_error("Could not find hydration script."))?;

    let pattern = Regex::new(r"(?s)window\.__sc_hydration\s*=\s*(\[.*\]);")
        .map_err(|e| MetadataError::scrape_error(e.to_string()))?;
    let json = pattern
        .captures(&script)
        .and_then(|caps| caps.get(1))
        .ok_or_else(|| MetadataError::scrape_error("Could not parse hydration JSON."))?;

    let hydration: Vec<Value> = serde_json::from_str(json.as_str())
        .map_err(|e| MetadataError::scrape_error(format!("Invalid hydration JSON: {}", e)))?;

    let sound = hydration
        .into_iter()
        .find(|entry| entry.get("hydratable").and_then(Value::as_str) == Some("sound"))
        .and_then(|mut entry| entry.get_mut("data").map(Value::take))
        .ok_or(MetadataError::NotFound)?;

    let publish_date = Selector::parse(PUBLISH_DATE_SELECTOR)
        .ok()
        .and_then(|selector| {
            document
                .select(&selector)
                .next()
                .map(|el| el.text().collect::<String>().trim().to_string())
        })
        .filter(|date| !date.is_empty());

    Ok(ScrapedTrack { sound, publish_date })
}
