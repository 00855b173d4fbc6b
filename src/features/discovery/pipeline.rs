//! Vendor list and map markers from a single filtered collection.
//!
//! filter -> geocode (batched, cached) -> radius -> distance order -> cards and
//! markers. Cards and markers share `vendor_id`; the map center is chosen
//! explicitly from the request instead of a shared callback.

use uuid::Uuid;

use crate::features::discovery::distance::{haversine_miles, within_radius, LatLon};
use crate::features::discovery::dtos::{DiscoveryResultDto, MapMarkerDto, VendorCardDto};
use crate::features::discovery::filter::VendorFilter;
use crate::features::discovery::models::GeocodedPoint;
use crate::features::discovery::services::GeocodingService;
use crate::features::vendors::models::Vendor;

#[derive(Debug, Clone, Default)]
pub struct DiscoveryRequest {
    pub filter: VendorFilter,
    pub user_location: Option<LatLon>,
    pub radius_miles: f64,
    pub focus_vendor_id: Option<Uuid>,
}

struct Located {
    vendor: Vendor,
    point: Option<GeocodedPoint>,
    distance: Option<f64>,
}

/// Address sent to the geocoder: the stored address, else the parsed "city, state"
fn geocode_query(vendor: &Vendor) -> String {
    if !vendor.address.trim().is_empty() {
        return vendor.address.clone();
    }
    [vendor.city.as_deref(), vendor.state.as_deref()]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
}

pub async fn discover(
    geocoder: &GeocodingService,
    vendors: Vec<Vendor>,
    request: &DiscoveryRequest,
) -> DiscoveryResultDto {
    let vendors = request.filter.apply(vendors);

    if vendors.is_empty() {
        return DiscoveryResultDto {
            cards: Vec::new(),
            markers: Vec::new(),
            center: request
                .user_location
                .unwrap_or_else(|| geocoder.default_center()),
            focus_vendor_id: None,
            total: 0,
        };
    }

    let queries: Vec<String> = vendors.iter().map(geocode_query).collect();
    let points = geocoder.resolve_many(&queries).await;

    let located: Vec<Located> = vendors
        .into_iter()
        .zip(points)
        .map(|(vendor, point)| Located {
            distance: request
                .user_location
                .zip(point)
                .map(|(origin, p)| haversine_miles(origin, p.position())),
            vendor,
            point,
        })
        .collect();

    // Synthetic pins are not real locations and never count as nearby
    let mut located = within_radius(
        request.user_location,
        located,
        request.radius_miles,
        |item| item.point.filter(|p| !p.is_synthetic()).map(|p| p.position()),
    );

    if request.user_location.is_some() {
        located.sort_by(|a, b| {
            a.distance
                .unwrap_or(f64::INFINITY)
                .total_cmp(&b.distance.unwrap_or(f64::INFINITY))
        });
    }

    let markers: Vec<MapMarkerDto> = located
        .iter()
        .filter_map(|item| {
            item.point.map(|p| MapMarkerDto {
                vendor_id: item.vendor.id,
                business_name: item.vendor.business_name.clone(),
                lat: p.lat,
                lon: p.lon,
                source: p.source,
            })
        })
        .collect();

    let cards: Vec<VendorCardDto> = located
        .iter()
        .map(|item| VendorCardDto::new(&item.vendor, item.point, item.distance))
        .collect();

    let focused = request
        .focus_vendor_id
        .and_then(|id| markers.iter().find(|m| m.vendor_id == id));

    let center = focused
        .map(|m| LatLon::new(m.lat, m.lon))
        .or(request.user_location)
        .or_else(|| markers.first().map(|m| LatLon::new(m.lat, m.lon)))
        .unwrap_or_else(|| geocoder.default_center());

    tracing::debug!(
        cards = cards.len(),
        markers = markers.len(),
        "Discovery search completed"
    );

    DiscoveryResultDto {
        total: cards.len(),
        focus_vendor_id: focused.map(|m| m.vendor_id),
        cards,
        markers,
        center,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::GeocodingConfig;
    use crate::features::discovery::models::GeocodingSource;
    use crate::features::discovery::services::geocoding_service::testing::{
        test_config, FakeProvider,
    };
    use crate::features::vendors::models::vendor::fixtures::vendor_with_tags;
    use std::sync::Arc;

    const LOS_ANGELES: LatLon = LatLon {
        lat: 34.0522,
        lon: -118.2437,
    };
    const PASADENA: LatLon = LatLon {
        lat: 34.1478,
        lon: -118.1445,
    };
    const SAN_DIEGO: LatLon = LatLon {
        lat: 32.7157,
        lon: -117.1611,
    };

    fn vendors() -> Vec<Vendor> {
        vec![
            vendor_with_tags("San Diego", "CA", &["Hair"]),
            vendor_with_tags("Pasadena", "CA", &["Hair", "Color"]),
            vendor_with_tags("Los Angeles", "CA", &["Nails"]),
        ]
    }

    fn provider() -> Arc<FakeProvider> {
        let vendors = vendors();
        Arc::new(FakeProvider::with_answers(&[
            (vendors[0].address.as_str(), SAN_DIEGO),
            (vendors[1].address.as_str(), PASADENA),
            (vendors[2].address.as_str(), LOS_ANGELES),
        ]))
    }

    fn request() -> DiscoveryRequest {
        DiscoveryRequest {
            radius_miles: 25.0,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_empty_list_makes_no_network_calls() {
        let provider = Arc::new(FakeProvider::default());
        let geocoder = GeocodingService::new(provider.clone(), test_config());

        let result = discover(&geocoder, Vec::new(), &request()).await;

        assert!(result.cards.is_empty());
        assert!(result.markers.is_empty());
        assert_eq!(result.total, 0);
        assert_eq!(result.center, geocoder.default_center());
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_filtered_out_vendors_are_not_geocoded() {
        let provider = Arc::new(FakeProvider::default());
        let geocoder = GeocodingService::new(provider.clone(), test_config());
        let request = DiscoveryRequest {
            filter: VendorFilter::from_query(Some("Makeup"), None, None),
            ..request()
        };

        let result = discover(&geocoder, vendors(), &request).await;

        assert_eq!(result.total, 0);
        assert_eq!(provider.call_count(), 0);
    }

    #[tokio::test]
    async fn test_cards_and_markers_share_vendor_ids() {
        let geocoder = GeocodingService::new(provider(), test_config());
        let request = DiscoveryRequest {
            filter: VendorFilter::from_query(Some("Hair"), None, None),
            ..request()
        };

        let result = discover(&geocoder, vendors(), &request).await;

        assert_eq!(result.total, 2);
        let card_ids: Vec<Uuid> = result.cards.iter().map(|c| c.vendor_id).collect();
        let marker_ids: Vec<Uuid> = result.markers.iter().map(|m| m.vendor_id).collect();
        assert_eq!(card_ids, marker_ids);
        assert!(result
            .markers
            .iter()
            .all(|m| m.source == GeocodingSource::Address));
        // No user location or focus: first marker
        assert_eq!(result.center, SAN_DIEGO);
    }

    #[tokio::test]
    async fn test_user_location_applies_radius_and_sorts_by_distance() {
        let geocoder = GeocodingService::new(provider(), test_config());
        let request = DiscoveryRequest {
            user_location: Some(LatLon::new(34.06, -118.25)),
            ..request()
        };

        let result = discover(&geocoder, vendors(), &request).await;

        let cities: Vec<&str> = result
            .cards
            .iter()
            .filter_map(|c| c.city.as_deref())
            .collect();
        assert_eq!(cities, vec!["Los Angeles", "Pasadena"]);
        assert!(result.cards[0].distance_miles.unwrap() < 1.0);
        assert_eq!(result.center, LatLon::new(34.06, -118.25));
    }

    #[tokio::test]
    async fn test_focus_vendor_centers_map() {
        let vendors = vendors();
        let focus = vendors[1].id;
        let geocoder = GeocodingService::new(provider(), test_config());
        let request = DiscoveryRequest {
            user_location: Some(LOS_ANGELES),
            focus_vendor_id: Some(focus),
            ..request()
        };

        let result = discover(&geocoder, vendors, &request).await;

        assert_eq!(result.focus_vendor_id, Some(focus));
        assert_eq!(result.center, PASADENA);
    }

    #[tokio::test]
    async fn test_unknown_focus_falls_back_to_user_location() {
        let geocoder = GeocodingService::new(provider(), test_config());
        let request = DiscoveryRequest {
            user_location: Some(LOS_ANGELES),
            focus_vendor_id: Some(Uuid::new_v4()),
            ..request()
        };

        let result = discover(&geocoder, vendors(), &request).await;

        assert_eq!(result.focus_vendor_id, None);
        assert_eq!(result.center, LOS_ANGELES);
    }

    #[tokio::test]
    async fn test_unresolved_vendors_stay_listed_without_marker() {
        let geocoder = GeocodingService::new(
            Arc::new(FakeProvider::default()),
            GeocodingConfig {
                allow_synthetic: false,
                ..test_config()
            },
        );

        let result = discover(&geocoder, vendors(), &request()).await;

        assert_eq!(result.cards.len(), 3);
        assert!(result.markers.is_empty());
        assert!(result.cards.iter().all(|c| c.position.is_none()));
        assert_eq!(result.center, geocoder.default_center());
    }

    #[tokio::test]
    async fn test_synthetic_pins_are_marked_and_not_nearby() {
        let geocoder = GeocodingService::new(Arc::new(FakeProvider::default()), test_config());

        let listed = discover(&geocoder, vendors(), &request()).await;
        assert_eq!(listed.markers.len(), 3);
        assert!(listed
            .markers
            .iter()
            .all(|m| m.source == GeocodingSource::Synthetic));

        let nearby = DiscoveryRequest {
            user_location: Some(LOS_ANGELES),
            ..request()
        };
        let result = discover(&geocoder, vendors(), &nearby).await;
        assert_eq!(result.total, 0);
    }
    #[tokio::test]
    async fn test_vendors_without_any_location_get_separate_pins() {
        let provider = Arc::new(FakeProvider::default());
        let geocoder = GeocodingService::new(provider.clone(), test_config());
        let unlocated: Vec<Vendor> = (0..2)
            .map(|_| {
                let mut vendor = vendor_with_tags("Nowhere", "CA", &["Hair"]);
                vendor.address = String::new();
                vendor.city = None;
                vendor.state = None;
                vendor
            })
            .collect();

        let result = discover(&geocoder, unlocated, &request()).await;

        assert_eq!(result.markers.len(), 2);
        let (a, b) = (&result.markers[0], &result.markers[1]);
        assert!((a.lat, a.lon) != (b.lat, b.lon));
        assert_eq!(provider.call_count(), 0);
        assert_eq!(geocoder.cached_len().await, 0);
    }
}
