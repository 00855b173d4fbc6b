use sqlx::types::Json;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::features::auth::model::AuthenticatedUser;
use crate::features::discovery::address::parse_address;
use crate::features::reviews::ReviewService;
use crate::features::vendors::catalog::find_category;
use crate::features::vendors::dtos::{
    CreateVendorDto, UpdateVendorDto, VendorDetailDto, VendorResponseDto,
};
use crate::features::vendors::models::{PaymentOptions, Vendor};
use crate::features::vendors::social::normalize_social_links;
use crate::features::vendors::tags::{dedupe_tags, toggle_service};
use crate::modules::storage::{sanitize_file_name, MinIOClient};
use crate::shared::constants::MAX_PAGE_SIZE;
use crate::shared::types::PaginationQuery;

const VENDOR_COLUMNS: &str = r#"
    id, owner_uid, business_name, address, city, state, email, phone_number,
    description, images, tags, offers_home, offers_drive, payment_options,
    social_links, services, created_at, updated_at
"#;

fn db_error(context: &str) -> impl FnOnce(sqlx::Error) -> AppError + '_ {
    move |e| {
        tracing::error!("Failed to {}: {:?}", context, e);
        AppError::Database(e)
    }
}

/// Owners and admins may edit a vendor
fn ensure_can_edit(vendor: &Vendor, user: &AuthenticatedUser) -> Result<()> {
    if vendor.is_owned_by(&user.uid) || user.is_admin() {
        Ok(())
    } else {
        Err(AppError::Forbidden(
            "Only the vendor's owner can change it".to_string(),
        ))
    }
}

fn vendor_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Vendor '{}' not found", id))
}

/// Service for vendor records and their images
pub struct VendorService {
    pool: PgPool,
    storage: Arc<MinIOClient>,
    reviews: Arc<ReviewService>,
}

impl VendorService {
    pub fn new(pool: PgPool, storage: Arc<MinIOClient>, reviews: Arc<ReviewService>) -> Self {
        Self {
            pool,
            storage,
            reviews,
        }
    }

    /// Register a vendor from the sign-up form in a single insert
    pub async fn create(
        &self,
        owner: &AuthenticatedUser,
        dto: CreateVendorDto,
    ) -> Result<VendorResponseDto> {
        let (tags, services) = dto.tags_and_services();
        let address = dto.address.trim().to_string();
        let parsed = parse_address(&address);

        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            r#"
            INSERT INTO vendors (
                id, owner_uid, business_name, address, city, state, email, phone_number,
                description, images, tags, offers_home, offers_drive, payment_options,
                social_links, services
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, '{{}}', $10, $11, $12, $13, $14, $15)
            RETURNING {}
            "#,
            VENDOR_COLUMNS
        ))
        .bind(Uuid::now_v7())
        .bind(&owner.uid)
        .bind(dto.business_name.trim())
        .bind(&address)
        .bind(&parsed.city)
        .bind(&parsed.state)
        .bind(dto.email.trim())
        .bind(&dto.phone_number)
        .bind(dto.description.as_deref().map(str::trim))
        .bind(&tags)
        .bind(dto.offers_home)
        .bind(dto.offers_drive)
        .bind(Json(PaymentOptions::from_methods(&dto.payment_methods)))
        .bind(normalize_social_links(&dto.social_links))
        .bind(Json(services))
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("create vendor"))?;

        tracing::info!(vendor_id = %vendor.id, owner = %owner.uid, "Vendor registered");
        Ok(vendor.into())
    }

    async fn find(&self, id: Uuid) -> Result<Vendor> {
        sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {} FROM vendors WHERE id = $1",
            VENDOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("get vendor"))?
        .ok_or_else(|| vendor_not_found(id))
    }

    /// Vendor with its review count and average rating
    pub async fn get_detail(&self, id: Uuid) -> Result<VendorDetailDto> {
        let vendor = self.find(id).await?;
        let reviews = self.reviews.summary(id).await?;

        Ok(VendorDetailDto {
            vendor: vendor.into(),
            reviews,
        })
    }

    /// Vendors newest first
    pub async fn list(&self, pagination: &PaginationQuery) -> Result<(Vec<VendorResponseDto>, i64)> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vendors")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count vendors"))?;

        let vendors = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {} FROM vendors ORDER BY created_at DESC, id DESC LIMIT $1 OFFSET $2",
            VENDOR_COLUMNS
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list vendors"))?;

        Ok((vendors.into_iter().map(Into::into).collect(), total))
    }

    /// Every vendor, for the discovery pipeline
    pub async fn list_all(&self) -> Result<Vec<Vendor>> {
        sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {} FROM vendors ORDER BY business_name, id",
            VENDOR_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list vendors"))
    }

    /// A random selection of vendors for the home page
    pub async fn featured(&self, limit: i64) -> Result<Vec<VendorResponseDto>> {
        let vendors = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {} FROM vendors ORDER BY random() LIMIT $1",
            VENDOR_COLUMNS
        ))
        .bind(limit.clamp(1, MAX_PAGE_SIZE))
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("list featured vendors"))?;

        Ok(vendors.into_iter().map(Into::into).collect())
    }

    /// Dashboard save: every editable field in a single update
    pub async fn update(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
        dto: UpdateVendorDto,
    ) -> Result<VendorResponseDto> {
        let address = dto.address.trim().to_string();
        let parsed = parse_address(&address);

        let updated = sqlx::query_as::<_, Vendor>(&format!(
            r#"
            UPDATE vendors
            SET business_name = $3,
                address = $4,
                city = $5,
                state = $6,
                email = $7,
                phone_number = $8,
                description = $9,
                tags = $10,
                offers_home = $11,
                offers_drive = $12,
                payment_options = $13,
                social_links = $14,
                updated_at = NOW()
            WHERE id = $1 AND (owner_uid = $2 OR $15)
            RETURNING {}
            "#,
            VENDOR_COLUMNS
        ))
        .bind(id)
        .bind(&user.uid)
        .bind(dto.business_name.trim())
        .bind(&address)
        .bind(&parsed.city)
        .bind(&parsed.state)
        .bind(dto.email.trim())
        .bind(&dto.phone_number)
        .bind(dto.description.as_deref().map(str::trim))
        .bind(dedupe_tags(&dto.tags))
        .bind(dto.offers_home)
        .bind(dto.offers_drive)
        .bind(Json(PaymentOptions::from_methods(&dto.payment_methods)))
        .bind(normalize_social_links(&dto.social_links))
        .bind(user.is_admin())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("update vendor"))?;

        match updated {
            Some(vendor) => {
                tracing::info!(vendor_id = %id, "Vendor profile saved");
                Ok(vendor.into())
            }
            None => {
                // Missing row or not the owner
                let vendor = self.find(id).await?;
                ensure_can_edit(&vendor, user)?;
                Err(vendor_not_found(id))
            }
        }
    }

    /// Switch one catalog service on or off, keeping tags in step
    pub async fn set_service(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
        category_id: &str,
        service_id: &str,
        enabled: bool,
    ) -> Result<VendorResponseDto> {
        let category = find_category(category_id).ok_or_else(|| {
            AppError::NotFound(format!("Service category '{}' not found", category_id))
        })?;
        let service = category.find_service(service_id).ok_or_else(|| {
            AppError::NotFound(format!(
                "Service '{}' not found in category '{}'",
                service_id, category.id
            ))
        })?;

        let mut tx = self.pool.begin().await.map_err(db_error("begin transaction"))?;

        let mut vendor = sqlx::query_as::<_, Vendor>(&format!(
            "SELECT {} FROM vendors WHERE id = $1 FOR UPDATE",
            VENDOR_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(db_error("lock vendor"))?
        .ok_or_else(|| vendor_not_found(id))?;

        ensure_can_edit(&vendor, user)?;

        toggle_service(
            &mut vendor.tags,
            &mut vendor.services.0,
            category,
            service,
            enabled,
        );

        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            r#"
            UPDATE vendors
            SET tags = $2, services = $3, updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VENDOR_COLUMNS
        ))
        .bind(id)
        .bind(&vendor.tags)
        .bind(&vendor.services)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("update vendor services"))?;

        tx.commit().await.map_err(db_error("commit transaction"))?;

        tracing::info!(
            vendor_id = %id,
            category = category.id,
            service = service.id,
            enabled,
            "Vendor service toggled"
        );
        Ok(vendor.into())
    }

    /// Upload an image to public storage and append its URL
    pub async fn add_image(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
        file_name: &str,
        data: Vec<u8>,
        content_type: &str,
    ) -> Result<VendorResponseDto> {
        let vendor = self.find(id).await?;
        ensure_can_edit(&vendor, user)?;

        let path = image_path(id, chrono::Utc::now().timestamp_millis(), file_name);
        let url = self.storage.upload_public(&path, data, content_type).await?;

        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            r#"
            UPDATE vendors
            SET images = array_append(images, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VENDOR_COLUMNS
        ))
        .bind(id)
        .bind(&url)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("add vendor image"))?
        .ok_or_else(|| vendor_not_found(id))?;

        tracing::info!(vendor_id = %id, url = %url, "Vendor image added");
        Ok(vendor.into())
    }

    /// Delete an image object and drop its URL
    pub async fn remove_image(
        &self,
        id: Uuid,
        user: &AuthenticatedUser,
        url: &str,
    ) -> Result<VendorResponseDto> {
        let vendor = self.find(id).await?;
        ensure_can_edit(&vendor, user)?;

        if !vendor.images.iter().any(|u| u == url) {
            return Err(AppError::NotFound("Image not found on this vendor".to_string()));
        }

        match self.storage.extract_key_from_url(url) {
            Some(key) => self.storage.delete(&key).await?,
            None => tracing::warn!(vendor_id = %id, "Image URL is not in our bucket: {}", url),
        }

        let vendor = sqlx::query_as::<_, Vendor>(&format!(
            r#"
            UPDATE vendors
            SET images = array_remove(images, $2), updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            VENDOR_COLUMNS
        ))
        .bind(id)
        .bind(url)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("remove vendor image"))?
        .ok_or_else(|| vendor_not_found(id))?;

        tracing::info!(vendor_id = %id, "Vendor image removed");
        Ok(vendor.into())
    }
}

/// Object path for a vendor image, below the public prefix
fn image_path(vendor_id: Uuid, millis: i64, file_name: &str) -> String {
    format!(
        "vendors/{}/{}_{}",
        vendor_id,
        millis,
        sanitize_file_name(file_name)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::vendors::models::vendor::fixtures::vendor_with_tags;
    use crate::shared::test_helpers::{create_admin_user, create_customer_user};

    #[test]
    fn test_image_path() {
        let id = Uuid::nil();
        assert_eq!(
            image_path(id, 1700000000000, "my photo (1).JPG"),
            "vendors/00000000-0000-0000-0000-000000000000/1700000000000_my_photo__1_.JPG"
        );
    }

    #[test]
    fn test_only_owner_or_admin_can_edit() {
        let customer = create_customer_user();
        let mut vendor = vendor_with_tags("Los Angeles", "CA", &[]);

        assert!(matches!(
            ensure_can_edit(&vendor, &customer),
            Err(AppError::Forbidden(_))
        ));
        assert!(ensure_can_edit(&vendor, &create_admin_user()).is_ok());

        vendor.owner_uid = customer.uid.clone();
        assert!(ensure_can_edit(&vendor, &customer).is_ok());
    }
}
