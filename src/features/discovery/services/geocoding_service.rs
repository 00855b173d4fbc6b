use async_trait::async_trait;
use futures::future::join_all;
use moka::future::Cache;
use rand::Rng;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::core::config::GeocodingConfig;
use crate::core::error::{AppError, Result};
use crate::features::discovery::address::{parse_address, ParsedAddress};
use crate::features::discovery::distance::LatLon;
use crate::features::discovery::models::{GeocodedPoint, GeocodingSource};

/// Forward geocoding backend
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// First candidate for a free-form query, `None` when nothing matched
    async fn search(&self, query: &str) -> Result<Option<LatLon>>;
}

/// Nominatim search candidate; coordinates arrive as strings
#[derive(Debug, Deserialize)]
pub struct NominatimResponse {
    pub lat: String,
    pub lon: String,
    #[serde(default)]
    pub display_name: Option<String>,
}

impl NominatimResponse {
    pub fn position(&self) -> Option<LatLon> {
        let lat = self.lat.trim().parse::<f64>().ok()?;
        let lon = self.lon.trim().parse::<f64>().ok()?;
        Some(LatLon::new(lat, lon))
    }
}

/// Nominatim-compatible HTTP provider
pub struct NominatimProvider {
    client: reqwest::Client,
    base_url: String,
}

impl NominatimProvider {
    pub fn new(config: &GeocodingConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
        })
    }

    fn search_url(&self, query: &str) -> String {
        format!(
            "{}/search?q={}&format=json&limit=1",
            self.base_url,
            urlencoding::encode(query)
        )
    }
}

#[async_trait]
impl GeocodeProvider for NominatimProvider {
    async fn search(&self, query: &str) -> Result<Option<LatLon>> {
        let url = self.search_url(query);
        tracing::debug!("Geocoding: {} -> {}", query, url);

        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Nominatim request failed: {}", e))
        })?;

        if !response.status().is_success() {
            tracing::warn!("Nominatim returned status: {}", response.status());
            return Ok(None);
        }

        let results: Vec<NominatimResponse> = response.json().await.map_err(|e| {
            AppError::ExternalServiceError(format!("Failed to parse Nominatim response: {}", e))
        })?;

        let Some(first) = results.into_iter().next() else {
            return Ok(None);
        };

        match first.position() {
            Some(position) => Ok(Some(position)),
            None => {
                tracing::warn!(
                    "Nominatim returned unparseable coordinates for {:?}: {} / {}",
                    first.display_name,
                    first.lat,
                    first.lon
                );
                Ok(None)
            }
        }
    }
}

/// Cache key: normalized "city, state", or the normalized address when unparseable
pub fn cache_key(address: &str, parsed: &ParsedAddress) -> String {
    parsed
        .city_state()
        .unwrap_or_else(|| address.to_string())
        .trim()
        .to_lowercase()
}

/// Best-effort geocoder: cache, then full address, then "city, state", then a
/// synthetic point near the default center. Never fails to the caller.
///
/// The cache holds at most `cache_capacity` coordinates; beyond that moka
/// evicts the least valuable entries.
pub struct GeocodingService {
    provider: Arc<dyn GeocodeProvider>,
    cache: Cache<String, GeocodedPoint>,
    config: GeocodingConfig,
}

impl GeocodingService {
    pub fn new(provider: Arc<dyn GeocodeProvider>, config: GeocodingConfig) -> Self {
        let cache = Cache::builder()
            .max_capacity(config.cache_capacity)
            .build();

        Self {
            provider,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &GeocodingConfig {
        &self.config
    }

    pub fn default_center(&self) -> LatLon {
        LatLon::new(self.config.default_center_lat, self.config.default_center_lon)
    }

    /// Resolve one address. `None` only when every tier failed and synthetic
    /// points are disabled.
    pub async fn resolve(&self, address: &str) -> Option<GeocodedPoint> {
        let parsed = parse_address(address);
        let key = cache_key(address, &parsed);

        if key.is_empty() {
            return self.unlocated_point();
        }

        if let Some(point) = self.cache.get(&key).await {
            tracing::debug!("Geocode cache hit for '{}'", key);
            return Some(point);
        }

        let point = match self.lookup(address, &parsed).await {
            Some(point) => point,
            None if self.config.allow_synthetic => {
                tracing::debug!("Using synthetic coordinate for '{}'", key);
                self.synthetic_point()
            }
            None => {
                tracing::debug!("No coordinate for '{}' and synthetic points are disabled", key);
                return None;
            }
        };

        self.cache.insert(key, point).await;
        Some(point)
    }

    /// Resolve many addresses in sequential batches of concurrent lookups.
    /// Results line up with `addresses`; addresses sharing a cache key are
    /// looked up once, blank ones each get their own uncached point.
    pub async fn resolve_many(&self, addresses: &[String]) -> Vec<Option<GeocodedPoint>> {
        let keys: Vec<String> = addresses
            .iter()
            .map(|a| cache_key(a, &parse_address(a)))
            .collect();

        let mut seen: HashSet<&str> = HashSet::with_capacity(keys.len());
        let mut unique: Vec<(&str, &str)> = Vec::new();
        for (key, address) in keys.iter().zip(addresses) {
            if !key.is_empty() && seen.insert(key.as_str()) {
                unique.push((key.as_str(), address.as_str()));
            }
        }

        let mut resolved: HashMap<&str, Option<GeocodedPoint>> =
            HashMap::with_capacity(unique.len());
        for batch in unique.chunks(self.config.batch_size.max(1)) {
            let results = join_all(batch.iter().map(|(_, address)| self.resolve(address))).await;
            for ((key, _), point) in batch.iter().zip(results) {
                resolved.insert(*key, point);
            }
        }

        keys.iter()
            .map(|key| {
                if key.is_empty() {
                    self.unlocated_point()
                } else {
                    resolved.get(key.as_str()).copied().flatten()
                }
            })
            .collect()
    }

    pub async fn cached_len(&self) -> u64 {
        self.cache.run_pending_tasks().await;
        self.cache.entry_count()
    }

    pub fn cache_capacity(&self) -> u64 {
        self.config.cache_capacity
    }

    /// Drop every cached coordinate; returns how many were removed
    pub async fn clear(&self) -> u64 {
        let mut removed = 0;
        for (key, _) in self.cache.iter() {
            self.cache.invalidate(key.as_str()).await;
            removed += 1;
        }
        self.cache.run_pending_tasks().await;
        tracing::info!("Geocode cache cleared ({} entries)", removed);
        removed
    }

    /// Point for a vendor with no address at all: a fresh synthetic pin, never
    /// cached, so such vendors do not stack on one shared key
    fn unlocated_point(&self) -> Option<GeocodedPoint> {
        self.config
            .allow_synthetic
            .then(|| self.synthetic_point())
    }

    async fn lookup(&self, address: &str, parsed: &ParsedAddress) -> Option<GeocodedPoint> {
        let address = address.trim();
        if !address.is_empty() {
            if let Some(position) = self.query(address).await {
                return Some(GeocodedPoint::new(position, GeocodingSource::Address));
            }
        }

        if let Some(city_state) = parsed.city_state() {
            if let Some(position) = self.query(&city_state).await {
                return Some(GeocodedPoint::new(position, GeocodingSource::CityState));
            }
        }

        None
    }

    /// One provider query bounded by the configured timeout; failures are logged and swallowed
    async fn query(&self, query: &str) -> Option<LatLon> {
        match tokio::time::timeout(self.config.timeout, self.provider.search(query)).await {
            Ok(Ok(Some(position))) if position.is_valid() => Some(position),
            Ok(Ok(Some(position))) => {
                tracing::warn!("Ignoring out-of-range coordinate for '{}': {:?}", query, position);
                None
            }
            Ok(Ok(None)) => {
                tracing::debug!("No geocoding result for '{}'", query);
                None
            }
            Ok(Err(e)) => {
                tracing::warn!("Geocoding '{}' failed: {}", query, e);
                None
            }
            Err(_) => {
                tracing::warn!(
                    "Geocoding '{}' timed out after {:?}",
                    query,
                    self.config.timeout
                );
                None
            }
        }
    }

    fn synthetic_point(&self) -> GeocodedPoint {
        let jitter = self.config.synthetic_jitter_deg.abs();
        let mut rng = rand::thread_rng();
        let center = self.default_center();

        GeocodedPoint::new(
            LatLon::new(
                center.lat + rng.gen_range(-jitter..=jitter),
                center.lon + rng.gen_range(-jitter..=jitter),
            ),
            GeocodingSource::Synthetic,
        )
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use std::time::Duration;

    const SPRINGFIELD: LatLon = LatLon {
        lat: 39.7817,
        lon: -89.6501,
    };

    fn service(provider: Arc<FakeProvider>, config: GeocodingConfig) -> GeocodingService {
        GeocodingService::new(provider, config)
    }

    #[test]
    fn test_cache_key_prefers_city_state() {
        let address = "123 Main St, Springfield, IL 62701";
        assert_eq!(cache_key(address, &parse_address(address)), "springfield, il");
        assert_eq!(cache_key("  Somewhere ", &parse_address("  Somewhere ")), "somewhere");
    }

    #[test]
    fn test_nominatim_response_parses_string_coordinates() {
        let results: Vec<NominatimResponse> = serde_json::from_str(
            r#"[{"lat": "39.7817", "lon": "-89.6501", "display_name": "Springfield"}]"#,
        )
        .unwrap();
        assert_eq!(results[0].position(), Some(SPRINGFIELD));

        let bad = NominatimResponse {
            lat: "north".to_string(),
            lon: "0".to_string(),
            display_name: None,
        };
        assert_eq!(bad.position(), None);
    }

    #[tokio::test]
    async fn test_full_address_match() {
        let address = "123 Main St, Springfield, IL 62701";
        let provider = Arc::new(FakeProvider::with_answers(&[(address, SPRINGFIELD)]));
        let geocoder = service(provider.clone(), test_config());

        let point = geocoder.resolve(address).await.unwrap();
        assert_eq!(point.source, GeocodingSource::Address);
        assert_eq!(point.position(), SPRINGFIELD);
        assert_eq!(provider.call_count(), 1);
    }

    #[tokio::test]
    async fn test_second_lookup_with_same_city_state_hits_cache() {
        let provider = Arc::new(FakeProvider::with_answers(&[(
            "123 Main St, Springfield, IL 62701",
            SPRINGFIELD,
        )]));
        let geocoder = service(provider.clone(), test_config());

        geocoder.resolve("123 Main St, Springfield, IL 62701").await;
        let calls_after_first = provider.call_count();
        let second = geocoder.resolve("9 Oak Ave, Springfield, IL").await.unwrap();

        assert_eq!(provider.call_count(), calls_after_first);
        assert_eq!(second.position(), SPRINGFIELD);
        assert_eq!(geocoder.cached_len().await, 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_city_state() {
        let provider = Arc::new(FakeProvider::with_answers(&[("Springfield, IL", SPRINGFIELD)]));
        let geocoder = service(provider.clone(), test_config());

        let point = geocoder.resolve("1 Nowhere Rd, Springfield, IL").await.unwrap();
        assert_eq!(point.source, GeocodingSource::CityState);
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_provider_errors_fall_back_to_synthetic() {
        let provider = Arc::new(FakeProvider {
            fail: true,
            ..Default::default()
        });
        let geocoder = service(provider.clone(), test_config());

        let point = geocoder.resolve("1 Main St, Springfield, IL").await.unwrap();
        assert!(point.is_synthetic());
        assert!((point.lat - 34.0522).abs() <= 0.05 + 1e-9);
        assert!((point.lon + 118.2437).abs() <= 0.05 + 1e-9);
    }

    #[tokio::test]
    async fn test_timeout_counts_as_failure() {
        let provider = Arc::new(FakeProvider {
            delay: Some(Duration::from_secs(5)),
            answers: [("1 Main St, Springfield, IL".to_string(), SPRINGFIELD)]
                .into_iter()
                .collect(),
            ..Default::default()
        });
        let config = GeocodingConfig {
            timeout: Duration::from_millis(20),
            ..GeocodingConfig::default()
        };
        let geocoder = service(provider, config);

        let point = geocoder.resolve("1 Main St, Springfield, IL").await.unwrap();
        assert!(point.is_synthetic());
    }

    #[tokio::test]
    async fn test_synthetic_disabled_returns_none_and_skips_cache() {
        let provider = Arc::new(FakeProvider::default());
        let config = GeocodingConfig {
            allow_synthetic: false,
            ..test_config()
        };
        let geocoder = service(provider, config);

        assert!(geocoder.resolve("1 Main St, Springfield, IL").await.is_none());
        assert_eq!(geocoder.cached_len().await, 0);
    }

    #[tokio::test]
    async fn test_blank_address_makes_no_request() {
        let provider = Arc::new(FakeProvider::default());
        let geocoder = service(provider.clone(), test_config());

        let point = geocoder.resolve("   ").await.unwrap();
        assert!(point.is_synthetic());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_resolve_many_aligns_and_dedupes() {
        let provider = Arc::new(FakeProvider::with_answers(&[
            ("1 Main St, Springfield, IL", SPRINGFIELD),
            ("2 Main St, Springfield, IL", SPRINGFIELD),
        ]));
        let geocoder = service(provider.clone(), test_config());

        let addresses = vec![
            "1 Main St, Springfield, IL".to_string(),
            "2 Main St, Springfield, IL".to_string(),
            "Unknown Place".to_string(),
        ];
        let points = geocoder.resolve_many(&addresses).await;

        assert_eq!(points.len(), 3);
        assert_eq!(points[0], points[1]);
        assert!(points[2].unwrap().is_synthetic());
        // One lookup for the shared key plus one for the unparseable address
        assert_eq!(provider.call_count(), 2);
    }

    #[tokio::test]
    async fn test_resolve_many_empty_makes_no_request() {
        let provider = Arc::new(FakeProvider::default());
        let geocoder = service(provider.clone(), test_config());

        assert!(geocoder.resolve_many(&[]).await.is_empty());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cache_never_exceeds_capacity() {
        let provider = Arc::new(FakeProvider::default());
        let config = GeocodingConfig {
            cache_capacity: 10,
            ..test_config()
        };
        let geocoder = service(provider.clone(), config);

        for i in 0..200 {
            geocoder.resolve(&format!("junk-{}", i)).await;
        }

        let cached = geocoder.cached_len().await;
        assert!(cached <= 10, "cache grew to {}", cached);
        assert!(cached > 0);
        assert_eq!(provider.call_count(), 200);
    }

    #[tokio::test]
    async fn test_blank_addresses_get_separate_uncached_points() {
        let provider = Arc::new(FakeProvider::default());
        let geocoder = service(provider.clone(), test_config());

        let addresses = vec![
            String::new(),
            "  ".to_string(),
            "1 Main St, Springfield, IL".to_string(),
        ];
        let points = geocoder.resolve_many(&addresses).await;

        let first = points[0].unwrap();
        let second = points[1].unwrap();
        assert!(first.is_synthetic() && second.is_synthetic());
        assert_ne!(first.position(), second.position());
        // Only the real address reaches the provider and the cache
        assert_eq!(geocoder.cached_len().await, 1);
    }

    #[tokio::test]
    async fn test_blank_address_without_synthetic_points_is_unresolved() {
        let config = GeocodingConfig {
            allow_synthetic: false,
            ..test_config()
        };
        let geocoder = service(Arc::new(FakeProvider::default()), config);

        assert_eq!(geocoder.resolve_many(&[String::new()]).await, vec![None]);
    }

    #[tokio::test]
    async fn test_clear_empties_cache() {
        let provider = Arc::new(FakeProvider::default());
        let geocoder = service(provider, test_config());

        geocoder.resolve("A St, Town, ST").await;
        geocoder.resolve("B St, Other, ST").await;
        assert_eq!(geocoder.clear().await, 2);
        assert_eq!(geocoder.cached_len().await, 0);
    }
}
