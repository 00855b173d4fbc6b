use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::features::reviews::dtos::ReviewSummaryDto;
use crate::features::vendors::catalog::find_category;
use crate::features::vendors::models::{PaymentMethod, PaymentOptions, ServiceMap, Vendor};
use crate::features::vendors::social::{parse_social_link, SocialLink};
use crate::features::vendors::tags::{dedupe_tags, toggle_service};

// =============================================================================
// REQUEST DTOs
// =============================================================================

/// Request DTO for the vendor sign-up form
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_signup"))]
pub struct CreateVendorDto {
    #[validate(length(min = 1, max = 120, message = "Business name is required"))]
    pub business_name: String,

    /// Free-text address, required when `offers_home` is set
    #[serde(default)]
    #[validate(length(max = 300, message = "Address must be at most 300 characters"))]
    pub address: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 7, max = 15, message = "Business phone must be 7-15 digits"),
        regex(
            path = "*crate::shared::validation::BUSINESS_PHONE_REGEX",
            message = "Business phone must contain digits only"
        )
    )]
    pub phone_number: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    /// Catalog category ids, e.g. `["hair", "nails"]`
    #[validate(length(min = 1, message = "Select at least one service category"))]
    pub categories: Vec<String>,

    /// Selected services per category id, e.g. `{"hair": ["color", "wax"]}`
    #[serde(default)]
    pub services: BTreeMap<String, Vec<String>>,

    #[validate(length(min = 1, message = "Select at least one payment option"))]
    pub payment_methods: Vec<PaymentMethod>,

    #[serde(default)]
    pub offers_home: bool,

    #[serde(default)]
    pub offers_drive: bool,

    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

fn validate_signup(dto: &CreateVendorDto) -> Result<(), ValidationError> {
    if !dto.offers_home && !dto.offers_drive {
        return Err(ValidationError::new("delivery_options")
            .with_message("Select at least one delivery option".into()));
    }

    require_address(dto.offers_home, &dto.address)?;

    for id in &dto.categories {
        if find_category(id).is_none() {
            return Err(ValidationError::new("categories")
                .with_message(format!("Unknown service category '{}'", id).into()));
        }
    }

    for (category_id, service_ids) in &dto.services {
        let category = dto
            .categories
            .iter()
            .any(|c| c.eq_ignore_ascii_case(category_id))
            .then(|| find_category(category_id))
            .flatten()
            .ok_or_else(|| {
                ValidationError::new("services").with_message(
                    format!("Services given for unselected category '{}'", category_id).into(),
                )
            })?;

        if let Some(unknown) = service_ids
            .iter()
            .find(|s| category.find_service(s).is_none())
        {
            return Err(ValidationError::new("services").with_message(
                format!("Unknown service '{}' in category '{}'", unknown, category.id).into(),
            ));
        }
    }

    Ok(())
}

fn require_address(offers_home: bool, address: &str) -> Result<(), ValidationError> {
    if offers_home && address.trim().is_empty() {
        return Err(ValidationError::new("address")
            .with_message("Address is required for at-home service".into()));
    }
    Ok(())
}

impl CreateVendorDto {
    /// Tags and service map for a validated form: every selected service is
    /// switched on, and each selected category is tagged even with no services.
    pub fn tags_and_services(&self) -> (Vec<String>, ServiceMap) {
        let mut tags = Vec::new();
        let mut services = ServiceMap::new();

        for category in self.categories.iter().filter_map(|id| find_category(id)) {
            let selected = self
                .services
                .iter()
                .filter(|(id, _)| id.eq_ignore_ascii_case(category.id))
                .flat_map(|(_, ids)| ids.iter())
                .filter_map(|id| category.find_service(id));

            for service in selected {
                toggle_service(&mut tags, &mut services, category, service, true);
            }
            tags.push(category.name.to_string());
        }

        (dedupe_tags(tags), services)
    }
}

/// Request DTO for the dashboard save: replaces every editable field at once
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[validate(schema(function = "validate_update"))]
pub struct UpdateVendorDto {
    #[validate(length(min = 1, max = 120, message = "Business name is required"))]
    pub business_name: String,

    #[serde(default)]
    #[validate(length(max = 300, message = "Address must be at most 300 characters"))]
    pub address: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    #[validate(
        length(min = 7, max = 15, message = "Business phone must be 7-15 digits"),
        regex(
            path = "*crate::shared::validation::BUSINESS_PHONE_REGEX",
            message = "Business phone must contain digits only"
        )
    )]
    pub phone_number: String,

    #[validate(length(max = 2000, message = "Description must be at most 2000 characters"))]
    pub description: Option<String>,

    #[serde(default)]
    pub tags: Vec<String>,

    #[serde(default)]
    pub offers_home: bool,

    #[serde(default)]
    pub offers_drive: bool,

    #[validate(length(min = 1, message = "Select at least one payment option"))]
    pub payment_methods: Vec<PaymentMethod>,

    #[serde(default)]
    pub social_links: Vec<SocialLink>,
}

fn validate_update(dto: &UpdateVendorDto) -> Result<(), ValidationError> {
    require_address(dto.offers_home, &dto.address)
}

/// Toggle one catalog service on or off
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SetServiceDto {
    pub enabled: bool,
}

/// Remove an image by its public URL
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
pub struct RemoveImageDto {
    #[validate(url(message = "Invalid image URL"))]
    pub url: String,
}

/// Multipart form for image upload (documentation only)
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct UploadImageDto {
    /// Image file (jpeg, png, gif or webp, at most 10MB)
    #[schema(value_type = String, format = Binary)]
    pub file: Vec<u8>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
pub struct FeaturedQuery {
    /// Number of vendors to return (default: 12, max: 100)
    pub limit: Option<i64>,
}

// =============================================================================
// RESPONSE DTOs
// =============================================================================

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VendorResponseDto {
    pub id: Uuid,
    pub owner_uid: String,
    pub business_name: String,
    pub address: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub email: String,
    pub phone_number: String,
    pub description: Option<String>,
    pub images: Vec<String>,
    pub tags: Vec<String>,
    pub offers_home: bool,
    pub offers_drive: bool,
    pub payment_options: PaymentOptions,
    /// Stored URLs with their detected platform
    pub social_links: Vec<SocialLink>,
    /// Category id -> service id -> enabled
    #[schema(value_type = Object)]
    pub services: ServiceMap,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Vendor> for VendorResponseDto {
    fn from(v: Vendor) -> Self {
        Self {
            social_links: v.social_links.iter().map(|l| parse_social_link(l)).collect(),
            id: v.id,
            owner_uid: v.owner_uid,
            business_name: v.business_name,
            address: v.address,
            city: v.city,
            state: v.state,
            email: v.email,
            phone_number: v.phone_number,
            description: v.description,
            images: v.images,
            tags: v.tags,
            offers_home: v.offers_home,
            offers_drive: v.offers_drive,
            payment_options: v.payment_options.0,
            services: v.services.0,
            created_at: v.created_at,
            updated_at: v.updated_at,
        }
    }
}

/// Vendor page: the vendor plus its review summary
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct VendorDetailDto {
    #[serde(flatten)]
    pub vendor: VendorResponseDto,
    pub reviews: ReviewSummaryDto,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::discovery::address::parse_address;
    use crate::features::vendors::social::SocialPlatform;

    fn signup() -> CreateVendorDto {
        CreateVendorDto {
            business_name: "Glow Studio".to_string(),
            address: "1 Main St, Los Angeles, CA 90001".to_string(),
            email: "glow@example.com".to_string(),
            phone_number: "3105550100".to_string(),
            description: None,
            categories: vec!["hair".to_string(), "nails".to_string()],
            services: BTreeMap::from([(
                "hair".to_string(),
                vec!["color".to_string(), "wax".to_string()],
            )]),
            payment_methods: vec![PaymentMethod::Cash],
            offers_home: false,
            offers_drive: true,
            social_links: vec![],
        }
    }

    fn field_error(dto: &CreateVendorDto) -> String {
        dto.validate().unwrap_err().to_string()
    }

    #[test]
    fn test_valid_signup() {
        assert!(signup().validate().is_ok());
    }

    #[test]
    fn test_long_city_stays_within_address_width() {
        let city = "L".repeat(150);
        let mut dto = signup();
        dto.address = format!("1 A St, {}, CA", city);
        assert!(dto.validate().is_ok());

        // city and state columns are VARCHAR(300), the same width as address
        let parsed = parse_address(&dto.address);
        assert_eq!(parsed.city.as_deref(), Some(city.as_str()));
        assert!(parsed.city.unwrap().chars().count() <= 300);

        dto.address = format!("1 A St, Town, {}", "S".repeat(290));
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_signup_requires_category_payment_and_delivery() {
        let mut dto = signup();
        dto.categories.clear();
        dto.services.clear();
        assert!(field_error(&dto).contains("Select at least one service category"));

        let mut dto = signup();
        dto.payment_methods.clear();
        assert!(field_error(&dto).contains("Select at least one payment option"));

        let mut dto = signup();
        dto.offers_drive = false;
        assert!(field_error(&dto).contains("Select at least one delivery option"));
    }

    #[test]
    fn test_signup_requires_address_for_home_service() {
        let mut dto = signup();
        dto.offers_home = true;
        dto.address = "   ".to_string();
        assert!(field_error(&dto).contains("Address is required for at-home service"));

        dto.offers_home = false;
        assert!(dto.validate().is_ok());
    }

    #[test]
    fn test_signup_rejects_services_outside_catalog() {
        let mut dto = signup();
        dto.categories.push("spa".to_string());
        assert!(field_error(&dto).contains("Unknown service category 'spa'"));

        let mut dto = signup();
        dto.services
            .insert("makeup".to_string(), vec!["bridal".to_string()]);
        assert!(field_error(&dto).contains("unselected category 'makeup'"));

        let mut dto = signup();
        dto.services
            .insert("nails".to_string(), vec!["balayage".to_string()]);
        assert!(field_error(&dto).contains("Unknown service 'balayage'"));
    }

    #[test]
    fn test_signup_phone_must_be_digits() {
        let mut dto = signup();
        dto.phone_number = "(310) 555-0100".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_tags_and_services_from_signup() {
        let (tags, services) = signup().tags_and_services();

        assert_eq!(tags, vec!["Color", "Hair", "Wax", "Nails"]);
        assert_eq!(services["hair"]["color"], true);
        assert_eq!(services["hair"]["wax"], true);
        assert!(!services.contains_key("nails"));
    }

    #[test]
    fn test_response_parses_social_links() {
        let mut vendor = crate::features::vendors::models::vendor::fixtures::vendor_with_tags(
            "Los Angeles",
            "CA",
            &["Hair"],
        );
        vendor.social_links = vec![
            "https://instagram.com/glow".to_string(),
            "https://glow.example.com".to_string(),
        ];

        let dto = VendorResponseDto::from(vendor);
        assert_eq!(dto.social_links[0].platform, SocialPlatform::Instagram);
        assert_eq!(dto.social_links[1].platform, SocialPlatform::Website);
        assert_eq!(dto.city.as_deref(), Some("Los Angeles"));
    }
}
