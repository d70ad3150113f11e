use reqwest::StatusCode;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::models::MovieMetadata;

/// Client for the OMDb title lookup.
///
/// Every failure mode (no match, bad status, transport error, unreadable
/// body) comes back as `None`. Callers cannot tell them apart; the log can.
pub struct OmdbClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, thiserror::Error)]
enum LookupError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
}

impl OmdbClient {
    pub fn new(client: reqwest::Client, api_key: String, base_url: String) -> Self {
        if api_key.trim().is_empty() {
            warn!("no OMDB_API_KEY provided, movie lookups will find nothing");
        }
        Self { client, api_key, base_url }
    }

    pub async fn fetch_movie(&self, title: &str) -> Option<MovieMetadata> {
        if self.api_key.trim().is_empty() {
            return None;
        }

        match self.lookup(title).await {
            Ok(found) => found,
            Err(err) => {
                warn!(title, error = %err, "movie lookup failed");
                None
            },
        }
    }

    async fn lookup(&self, title: &str) -> Result<Option<MovieMetadata>, LookupError> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str()), ("t", title)])
            .send()
            .await?;

        if resp.status() != StatusCode::OK {
            return Err(LookupError::Status(resp.status()));
        }

        let body: OmdbResponse = resp.json().await?;
        if body.response != "True" {
            debug!(title, error = body.error.as_deref().unwrap_or("none given"), "movie not found");
            return Ok(None);
        }

        Ok(Some(body.into_metadata(title)))
    }
}

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Response")]
    response: String,
    #[serde(rename = "Title")]
    title: Option<String>,
    #[serde(rename = "Year")]
    year: Option<Loose>,
    #[serde(rename = "imdbRating")]
    imdb_rating: Option<Loose>,
    #[serde(rename = "Poster")]
    poster: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

/// OMDb sends numbers as strings, and sometimes as "N/A".
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Loose {
    Number(f64),
    Text(String),
}

impl OmdbResponse {
    fn into_metadata(self, queried_title: &str) -> MovieMetadata {
        MovieMetadata {
            title: self
                .title
                .filter(|t| !t.trim().is_empty())
                .unwrap_or_else(|| queried_title.to_string()),
            year: self.year.as_ref().map(parse_year).unwrap_or(0),
            rating: self.imdb_rating.as_ref().map(parse_rating).unwrap_or(0.0),
            poster: self.poster.filter(|p| !p.trim().is_empty() && p != "N/A"),
        }
    }
}

/// Takes the leading year, so a series range like "2010–2013" yields 2010.
fn parse_year(value: &Loose) -> i32 {
    match value {
        Loose::Number(n) => *n as i32,
        Loose::Text(s) => {
            let s = s.trim();
            let end = s.find(|c: char| !c.is_ascii_digit()).unwrap_or(s.len());
            s[..end].parse().unwrap_or(0)
        },
    }
}

fn parse_rating(value: &Loose) -> f64 {
    match value {
        Loose::Number(n) => *n,
        Loose::Text(s) => s.trim().parse().ok().filter(|r: &f64| r.is_finite()).unwrap_or(0.0),
    }
}
