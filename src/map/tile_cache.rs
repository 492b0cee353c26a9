// src/map/tile_cache.rs
//! Base-layer tile downloading and caching with resource management

use super::layers::BaseLayer;
use super::projection::lat_lon_to_tile;
use crate::error::{QuakeMapError, Result};
use log::{debug, warn};
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub type TileKey = (BaseLayer, u8, u32, u32);

/// How long a failed tile is left alone before it is requested again
pub const FAILURE_BACKOFF: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, Default)]
struct DiskUsage {
    tiles: usize,
    bytes: u64,
}

#[derive(Clone)]
pub struct TileCache {
    cache_dir: PathBuf,
    client: reqwest::blocking::Client,
    memory_cache: Arc<Mutex<HashMap<TileKey, Arc<Vec<u8>>>>>,
    downloading: Arc<Mutex<HashSet<TileKey>>>,
    failed: Arc<Mutex<HashMap<TileKey, Instant>>>,
    disk_usage: Arc<Mutex<DiskUsage>>,
    max_memory_tiles: usize,
    max_concurrent_downloads: usize,
    failure_backoff: Duration,
}

impl TileCache {
    pub fn new(cache_dir: PathBuf) -> Result<Self> {
        std::fs::create_dir_all(&cache_dir).map_err(|e| {
            QuakeMapError::Other(format!("Failed to create cache directory: {}", e))
        })?;

        let client = reqwest::blocking::Client::builder()
            .user_agent("QuakeMap/0.1 (Rust earthquake viewer)")
            .timeout(Duration::from_secs(10))
            .build()?;

        // Walk the directory once; afterwards the counters track writes
        let mut usage = DiskUsage::default();
        Self::walk_dir(&cache_dir, &mut usage);

        Ok(Self {
            cache_dir,
            client,
            memory_cache: Arc::new(Mutex::new(HashMap::new())),
            downloading: Arc::new(Mutex::new(HashSet::new())),
            failed: Arc::new(Mutex::new(HashMap::new())),
            disk_usage: Arc::new(Mutex::new(usage)),
            max_memory_tiles: 200,
            max_concurrent_downloads: 6,
            failure_backoff: FAILURE_BACKOFF,
        })
    }

    pub fn with_failure_backoff(mut self, backoff: Duration) -> Self {
        self.failure_backoff = backoff;
        self
    }

    /// Get tile from memory or disk. Returns None when it must be downloaded.
    pub fn get_tile(&self, key: TileKey) -> Result<Option<Arc<Vec<u8>>>> {
        if let Ok(cache) = self.memory_cache.lock() {
            if let Some(tile) = cache.get(&key) {
                return Ok(Some(Arc::clone(tile)));
            }
        }

        let path = Self::tile_path(&self.cache_dir, key);
        if !path.exists() {
            return Ok(None);
        }

        let bytes = std::fs::read(&path)
            .map_err(|e| QuakeMapError::Other(format!("Failed to read cached tile: {}", e)))?;
        let tile = Arc::new(bytes);
        Self::insert_bounded(&self.memory_cache, self.max_memory_tiles, key, Arc::clone(&tile));
        Ok(Some(tile))
    }

    /// True while a failed download of `key` is still inside its backoff window
    pub fn is_failed(&self, key: TileKey) -> bool {
        let Ok(failed) = self.failed.lock() else {
            return false;
        };
        failed
            .get(&key)
            .is_some_and(|at| at.elapsed() < self.failure_backoff)
    }

    /// Download tile in background (non-blocking) with concurrency limit.
    /// Tiles that failed recently are skipped until their backoff expires.
    pub fn download_tile_async(&self, key: TileKey) {
        if !self.claim(key) {
            return;
        }

        let cache = self.clone();
        std::thread::spawn(move || {
            let result = cache.download_tile(key);
            cache.finish_download(key, result);
        });
    }

    /// Reserve a download slot for `key`
    fn claim(&self, key: TileKey) -> bool {
        if self.is_failed(key) {
            return false;
        }

        let Ok(mut downloading) = self.downloading.lock() else {
            return false;
        };

        if downloading.len() >= self.max_concurrent_downloads || downloading.contains(&key) {
            return false;
        }

        downloading.insert(key)
    }

    fn finish_download(&self, key: TileKey, result: Result<Vec<u8>>) {
        match result {
            Ok(bytes) => {
                self.store_tile(key, bytes);
                if let Ok(mut failed) = self.failed.lock() {
                    failed.remove(&key);
                }
            }
            Err(e) => {
                debug!("Tile {:?} unavailable: {}", key, e);
                if let Ok(mut failed) = self.failed.lock() {
                    failed.insert(key, Instant::now());
                }
            }
        }

        if let Ok(mut downloading) = self.downloading.lock() {
            downloading.remove(&key);
        }
    }

    fn download_tile(&self, key: TileKey) -> Result<Vec<u8>> {
        let (layer, zoom, x, y) = key;
        let url = layer.tile_source().tile_url(zoom, x, y);

        let response = self.client.get(&url).send()?;

        if !response.status().is_success() {
            return Err(QuakeMapError::Status {
                url,
                status: response.status().as_u16(),
            });
        }

        let bytes = response.bytes()?.to_vec();

        // Respect tile server usage policies
        std::thread::sleep(Duration::from_millis(100));

        Ok(bytes)
    }

    /// Write a tile to disk and memory, keeping the disk counters current
    fn store_tile(&self, key: TileKey, bytes: Vec<u8>) {
        let path = Self::tile_path(&self.cache_dir, key);
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }

        let existed = path.exists();
        match std::fs::write(&path, &bytes) {
            Ok(()) if !existed => {
                if let Ok(mut usage) = self.disk_usage.lock() {
                    usage.tiles += 1;
                    usage.bytes += bytes.len() as u64;
                }
            }
            Ok(()) => {}
            Err(e) => warn!("Failed to write tile {}: {}", path.display(), e),
        }

        Self::insert_bounded(&self.memory_cache, self.max_memory_tiles, key, Arc::new(bytes));
    }

    fn tile_path(cache_dir: &Path, key: TileKey) -> PathBuf {
        let (layer, zoom, x, y) = key;
        cache_dir.join(format!(
            "{}/{}/{}/{}.{}",
            layer.id(),
            zoom,
            x,
            y,
            layer.tile_source().extension
        ))
    }

    fn insert_bounded(
        cache: &Mutex<HashMap<TileKey, Arc<Vec<u8>>>>,
        capacity: usize,
        key: TileKey,
        tile: Arc<Vec<u8>>,
    ) {
        let Ok(mut cache) = cache.lock() else {
            return;
        };

        // Evict an arbitrary entry once full
        if cache.len() >= capacity {
            if let Some(first_key) = cache.keys().next().cloned() {
                cache.remove(&first_key);
            }
        }

        cache.insert(key, tile);
    }

    fn walk_dir(path: &Path, usage: &mut DiskUsage) {
        if let Ok(entries) = std::fs::read_dir(path) {
            for entry in entries.flatten() {
                if let Ok(metadata) = entry.metadata() {
                    if metadata.is_file() {
                        usage.tiles += 1;
                        usage.bytes += metadata.len();
                    } else if metadata.is_dir() {
                        Self::walk_dir(&entry.path(), usage);
                    }
                }
            }
        }
    }

    /// Queue downloads for the tiles around a location
    pub fn preload_area(
        &self,
        layer: BaseLayer,
        center_lat: f64,
        center_lon: f64,
        zoom: u8,
        radius: u32,
    ) {
        let (center_x, center_y) = lat_lon_to_tile(center_lat, center_lon, zoom);
        let limit = (1u32 << zoom) - 1;
        let radius = radius.min(2);

        for x in center_x.saturating_sub(radius)..=(center_x + radius).min(limit) {
            for y in center_y.saturating_sub(radius)..=(center_y + radius).min(limit) {
                self.download_tile_async((layer, zoom, x, y));
            }
        }
    }

    /// Clear memory cache and forget failed downloads
    pub fn clear_memory_cache(&self) {
        if let Ok(mut cache) = self.memory_cache.lock() {
            cache.clear();
        }
        if let Ok(mut failed) = self.failed.lock() {
            failed.clear();
        }
    }

    /// Get cache statistics. Cheap enough to call every frame.
    pub fn get_stats(&self) -> CacheStats {
        let memory_tiles = self.memory_cache.lock().map(|c| c.len()).unwrap_or(0);
        let usage = self.disk_usage.lock().map(|u| *u).unwrap_or_default();

        CacheStats {
            memory_tiles,
            disk_tiles: usage.tiles,
            disk_size_mb: usage.bytes as f64 / 1_048_576.0,
        }
    }

    /// Clear entire disk cache
    pub fn clear_disk_cache(&self) -> Result<()> {
        std::fs::remove_dir_all(&self.cache_dir)
            .map_err(|e| QuakeMapError::Other(format!("Failed to clear cache: {}", e)))?;
        std::fs::create_dir_all(&self.cache_dir).map_err(|e| {
            QuakeMapError::Other(format!("Failed to recreate cache directory: {}", e))
        })?;

        if let Ok(mut usage) = self.disk_usage.lock() {
            *usage = DiskUsage::default();
        }
        Ok(())
    }
}

#[derive(Debug, Clone)]
pub struct CacheStats {
    pub memory_tiles: usize,
    pub disk_tiles: usize,
    pub disk_size_mb: f64,
}
