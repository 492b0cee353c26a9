// src/session.rs
//! Feed loading and map composition for one run

use crate::{
    config::MapConfig,
    error::Result,
    feed::FeedLoader,
    map::{compose_map, MapComposition},
    style::{style_features, StyledMarker},
};
use log::info;
use tokio::runtime::Handle;

/// Ties the configuration, the feed loader and the async runtime together
pub struct MapSession {
    config: MapConfig,
    loader: FeedLoader,
    handle: Handle,
}

impl MapSession {
    pub fn new(config: MapConfig, handle: Handle) -> Result<Self> {
        config.validate()?;
        let loader = FeedLoader::new(config.request_timeout())?;

        Ok(Self {
            config,
            loader,
            handle,
        })
    }

    pub fn config(&self) -> &MapConfig {
        &self.config
    }

    /// Fetch the earthquake feed and style every record
    pub async fn load_markers(&self) -> Result<Vec<StyledMarker>> {
        let records = self
            .loader
            .fetch_earthquakes(&self.config.earthquake_url)
            .await?;

        let markers = style_features(&records);
        info!("Styled {} earthquake markers", markers.len());
        Ok(markers)
    }

    /// Compose the map. The plate feed is requested from here and lands in
    /// the composition whenever it resolves.
    pub fn compose(&self, markers: Vec<StyledMarker>) -> Result<MapComposition> {
        compose_map(
            markers,
            self.config.initial_view(),
            self.config.base_layer()?,
            &self.loader,
            &self.config.plates_url,
            &self.handle,
        )
    }

    /// Earthquakes first, then the composition. An earthquake failure is
    /// returned to the caller; nothing is drawn without them.
    pub fn build(&self) -> Result<MapComposition> {
        let markers = self.handle.block_on(self.load_markers())?;
        self.compose(markers)
    }
}
