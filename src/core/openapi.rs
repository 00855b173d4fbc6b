use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::features::auth;
use crate::features::discovery::{
    distance as discovery_distance, dtos as discovery_dtos, handlers as discovery_handlers,
    models as discovery_models,
};
use crate::features::profiles::{dtos as profiles_dtos, handlers as profiles_handlers};
use crate::features::reviews::{dtos as reviews_dtos, handlers as reviews_handlers};
use crate::features::vendors::{
    catalog as vendors_catalog, dtos as vendors_dtos, handlers as vendors_handlers,
    models as vendors_models, social as vendors_social,
};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        // Auth
        auth::handlers::send_code,
        auth::handlers::verify_code,
        auth::handlers::sign_up,
        auth::handlers::refresh_token,
        auth::handlers::get_me,
        // Profiles
        profiles_handlers::get_my_profile,
        profiles_handlers::update_my_profile,
        profiles_handlers::check_username_availability,
        // Vendors
        vendors_handlers::list_vendors,
        vendors_handlers::list_featured_vendors,
        vendors_handlers::get_vendor,
        vendors_handlers::create_vendor,
        vendors_handlers::update_vendor,
        vendors_handlers::set_vendor_service,
        vendors_handlers::upload_vendor_image,
        vendors_handlers::remove_vendor_image,
        vendors_handlers::list_service_catalog,
        // Reviews
        reviews_handlers::list_reviews,
        reviews_handlers::create_review,
        reviews_handlers::create_verified_review,
        // Discovery
        discovery_handlers::search_vendors,
        discovery_handlers::geocode_address,
        discovery_handlers::get_geocode_cache_stats,
        discovery_handlers::clear_geocode_cache,
    ),
    components(
        schemas(
            // Shared
            Meta,
            // Auth
            auth::model::AuthenticatedUser,
            auth::dtos::SendCodeRequestDto,
            auth::dtos::SendCodeResponseDto,
            auth::dtos::VerifyCodeRequestDto,
            auth::dtos::SignUpRequestDto,
            auth::dtos::SignUpResponseDto,
            auth::dtos::RefreshTokenRequestDto,
            auth::dtos::RefreshTokenResponseDto,
            auth::dtos::AuthResponseDto,
            auth::dtos::AuthUserDto,
            auth::dtos::MeResponseDto,
            ApiResponse<auth::dtos::SendCodeResponseDto>,
            ApiResponse<auth::dtos::AuthResponseDto>,
            ApiResponse<auth::dtos::SignUpResponseDto>,
            ApiResponse<auth::dtos::RefreshTokenResponseDto>,
            ApiResponse<auth::dtos::MeResponseDto>,
            // Profiles
            profiles_dtos::ProfileResponseDto,
            profiles_dtos::UpdateProfileDto,
            profiles_dtos::UsernameAvailabilityDto,
            ApiResponse<profiles_dtos::ProfileResponseDto>,
            ApiResponse<profiles_dtos::UsernameAvailabilityDto>,
            // Vendors
            vendors_models::PaymentMethod,
            vendors_models::PaymentOptions,
            vendors_social::SocialPlatform,
            vendors_social::SocialLink,
            vendors_catalog::CatalogService,
            vendors_catalog::ServiceCategory,
            vendors_dtos::CreateVendorDto,
            vendors_dtos::UpdateVendorDto,
            vendors_dtos::SetServiceDto,
            vendors_dtos::RemoveImageDto,
            vendors_dtos::UploadImageDto,
            vendors_dtos::VendorResponseDto,
            vendors_dtos::VendorDetailDto,
            ApiResponse<vendors_dtos::VendorResponseDto>,
            ApiResponse<Vec<vendors_dtos::VendorResponseDto>>,
            ApiResponse<vendors_dtos::VendorDetailDto>,
            ApiResponse<Vec<vendors_catalog::ServiceCategory>>,
            // Reviews
            reviews_dtos::CreateReviewDto,
            reviews_dtos::ReviewResponseDto,
            reviews_dtos::ReviewSummaryDto,
            ApiResponse<reviews_dtos::ReviewResponseDto>,
            ApiResponse<Vec<reviews_dtos::ReviewResponseDto>>,
            // Discovery
            discovery_distance::LatLon,
            discovery_models::GeocodingSource,
            discovery_models::GeocodedPoint,
            discovery_dtos::VendorCardDto,
            discovery_dtos::MapMarkerDto,
            discovery_dtos::DiscoveryResultDto,
            discovery_dtos::GeocodeCacheClearedDto,
            discovery_dtos::GeocodeCacheStatsDto,
            ApiResponse<discovery_dtos::DiscoveryResultDto>,
            ApiResponse<discovery_models::GeocodedPoint>,
            ApiResponse<discovery_dtos::GeocodeCacheClearedDto>,
            ApiResponse<discovery_dtos::GeocodeCacheStatsDto>,
        )
    ),
    tags(
        (name = "auth", description = "Phone one-time-code sign-in and sign-up"),
        (name = "profiles", description = "User profiles"),
        (name = "vendors", description = "Vendor directory, services and images"),
        (name = "reviews", description = "Vendor reviews"),
        (name = "discovery", description = "Vendor search, geocoding and map data"),
    ),
    modifiers(&SecurityAddon),
    info(
        title = "EPOK API",
        version = "0.1.0",
        description = "API documentation for the EPOK beauty vendor directory",
    )
)]
pub struct ApiDoc;

/// Adds Bearer JWT security scheme to the OpenAPI document
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
