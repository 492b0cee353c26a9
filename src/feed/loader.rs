// src/feed/loader.rs
//! Async feed fetching over HTTP

use super::{parse_earthquakes, parse_plate_boundaries, EarthquakeRecord, PlateBoundaries};
use crate::error::{QuakeMapError, Result};
use geojson::{FeatureCollection, GeoJson};
use log::{debug, info};
use std::time::Duration;

/// Fetches GeoJSON feeds. Each call issues exactly one GET, with no retry.
#[derive(Clone)]
pub struct FeedLoader {
    client: reqwest::Client,
}

impl FeedLoader {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent("QuakeMap/0.1 (Rust earthquake viewer)")
            .timeout(timeout)
            .build()?;

        Ok(Self { client })
    }

    #[cfg(test)]
    pub(crate) fn from_client(client: reqwest::Client) -> Self {
        Self { client }
    }

    /// Fetch a URL and parse the body as a GeoJSON FeatureCollection
    pub async fn fetch_feed(&self, url: &str) -> Result<FeatureCollection> {
        info!("Fetching feed {}", url);

        let response = self.client.get(url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuakeMapError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await?;
        debug!("Received {} bytes from {}", body.len(), url);

        let collection = parse_feature_collection(&body)?;
        info!("Loaded {} features from {}", collection.features.len(), url);

        Ok(collection)
    }

    /// Fetch the earthquake feed and decode its records
    pub async fn fetch_earthquakes(&self, url: &str) -> Result<Vec<EarthquakeRecord>> {
        let collection = self.fetch_feed(url).await?;
        Ok(parse_earthquakes(&collection))
    }

    /// Fetch the tectonic plate feed and decode its boundary lines
    pub async fn fetch_plates(&self, url: &str) -> Result<PlateBoundaries> {
        let collection = self.fetch_feed(url).await?;
        Ok(parse_plate_boundaries(&collection))
    }
}

/// Parse a response body that must hold a FeatureCollection
pub fn parse_feature_collection(body: &str) -> Result<FeatureCollection> {
    match body.parse::<GeoJson>()? {
        GeoJson::FeatureCollection(collection) => Ok(collection),
        GeoJson::Feature(_) => Err(QuakeMapError::GeoJson(
            "expected a FeatureCollection, found a single Feature".to_string(),
        )),
        GeoJson::Geometry(_) => Err(QuakeMapError::GeoJson(
            "expected a FeatureCollection, found a bare Geometry".to_string(),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feed::testing::{closed_port_url, local_loader, serve_once};

    #[test]
    fn test_parse_feature_collection() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{},
             "geometry":{"type":"Point","coordinates":[1.0,2.0,3.0]}}
        ]}"#;

        let collection = parse_feature_collection(body).unwrap();
        assert_eq!(collection.features.len(), 1);
    }

    #[test]
    fn test_rejects_single_feature() {
        let body = r#"{"type":"Feature","properties":{},"geometry":null}"#;

        let result = parse_feature_collection(body);
        assert!(matches!(result, Err(QuakeMapError::GeoJson(_))));
    }

    #[test]
    fn test_rejects_malformed_body() {
        let result = parse_feature_collection(r#"{"type": "FeatureCollection", "features": ["#);
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_fetch_feed_ok() {
        let body = r#"{"type":"FeatureCollection","features":[
            {"type":"Feature","properties":{"mag":3.1,"place":"Here","time":1700000000000},
             "geometry":{"type":"Point","coordinates":[-150.0,61.0,40.0]}}
        ]}"#;
        let url = serve_once("200 OK", body).await;

        let records = local_loader().fetch_earthquakes(&url).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].place.as_deref(), Some("Here"));
        assert_eq!(records[0].depth_km, 40.0);
    }

    #[tokio::test]
    async fn test_fetch_feed_error_status() {
        let url = serve_once("500 Internal Server Error", "oops").await;

        let result = local_loader().fetch_feed(&url).await;
        match result {
            Err(QuakeMapError::Status { url: failed, status }) => {
                assert_eq!(status, 500);
                assert_eq!(failed, url);
            }
            other => panic!("expected a status error, got {:?}", other.map(|_| ())),
        }
    }

    #[tokio::test]
    async fn test_fetch_feed_malformed_body() {
        let url = serve_once("200 OK", "<html>not geojson</html>").await;

        let result = local_loader().fetch_feed(&url).await;
        assert!(matches!(result, Err(QuakeMapError::GeoJson(_))));
    }

    #[tokio::test]
    async fn test_fetch_feed_connection_refused() {
        let url = closed_port_url().await;

        let result = local_loader().fetch_feed(&url).await;
        assert!(matches!(result, Err(QuakeMapError::Http(_))));
    }
}
