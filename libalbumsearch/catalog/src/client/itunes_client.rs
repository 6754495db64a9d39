use async_trait::async_trait;
use reqwest::{Client, Response, Url};
use tracing::{debug, info, warn};

use super::search_response::SearchResponse;
use super::{CatalogClient, CatalogError};
use crate::album::Album;
use crate::consts::{SEARCH_ATTRIBUTE, SEARCH_ENTITY, SEARCH_MEDIA};
use crate::settings::Settings;

/// Album lookups against the iTunes Search API.
#[derive(Clone, Debug)]
pub struct ITunesClient {
    client: Client,
    base_url: Url,
    country: Option<String>,
    limit: Option<u32>,
}

impl ITunesClient {
    pub fn new(settings: &Settings) -> Result<Self, CatalogError> {
        let base_url = Url::parse(&settings.api_base_url).map_err(|e| {
            CatalogError::new(format!(
                "Invalid catalog url {:?}: {e}",
                settings.api_base_url
            ))
        })?;
        let client = Client::builder()
            .user_agent(settings.user_agent.as_str())
            .timeout(settings.request_timeout)
            .build()
            .map_err(|e| CatalogError::new(format!("Failed to create http client: {e}")))?;

        Ok(Self {
            client,
            base_url,
            country: settings.country.clone(),
            limit: settings.result_limit,
        })
    }

    pub(crate) fn search_url(&self, term: &str) -> Result<Url, CatalogError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| CatalogError::new(format!("{} cannot be a base url", self.base_url)))?
            .pop_if_empty()
            .push("search");

        {
            let mut query = url.query_pairs_mut();
            query
                .append_pair("term", term)
                .append_pair("media", SEARCH_MEDIA)
                .append_pair("entity", SEARCH_ENTITY)
                .append_pair("attribute", SEARCH_ATTRIBUTE);
            if let Some(country) = &self.country {
                query.append_pair("country", country);
            }
            if let Some(limit) = self.limit {
                query.append_pair("limit", &limit.to_string());
            }
        }

        Ok(url)
    }

    async fn get(&self, url: Url) -> Result<Response, CatalogError> {
        debug!("Catalog request: {url}");
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| CatalogError::new(format!("Request to {url} failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_owned());
            warn!("Catalog error response ({status}): {error_text}");
            return Err(CatalogError::new(format!(
                "Catalog returned status {status}: {error_text}"
            )));
        }

        Ok(response)
    }
}

#[async_trait]
impl CatalogClient for ITunesClient {
    async fn fetch_albums(&self, term: &str) -> Result<Vec<Album>, CatalogError> {
        let url = self.search_url(term)?;
        let body = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| CatalogError::new(format!("Failed to read catalog response: {e}")))?;

        let response: SearchResponse = serde_json::from_slice(&body)
            .map_err(|e| CatalogError::new(format!("Malformed catalog response: {e}")))?;
        debug!(
            "Catalog reported {} results for {term:?}",
            response.result_count
        );

        // A record that doesn't look like an album is skipped rather than failing the whole search
        let albums: Vec<Album> = response
            .results
            .into_iter()
            .filter_map(|record| {
                serde_json::from_value(record)
                    .map_err(|e| warn!("Skipping malformed album record: {e}"))
                    .ok()
            })
            .collect();

        info!("Fetched {} albums for {term:?}", albums.len());
        Ok(albums)
    }

    async fn fetch_artwork(&self, url: &str) -> Result<Vec<u8>, CatalogError> {
        let url = Url::parse(url)
            .map_err(|e| CatalogError::new(format!("Invalid artwork url {url:?}: {e}")))?;
        let bytes = self
            .get(url)
            .await?
            .bytes()
            .await
            .map_err(|e| CatalogError::new(format!("Failed to read artwork: {e}")))?;

        Ok(bytes.to_vec())
    }
}
