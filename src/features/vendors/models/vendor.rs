use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use std::collections::BTreeMap;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::vendors::tags::tags_match;

/// Category id -> service id -> enabled
pub type ServiceMap = BTreeMap<String, BTreeMap<String, bool>>;

/// Database model for vendors table
#[derive(Debug, Clone, FromRow)]
pub struct Vendor {
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
    pub payment_options: Json<PaymentOptions>,
    pub social_links: Vec<String>,
    pub services: Json<ServiceMap>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Vendor {
    pub fn is_owned_by(&self, uid: &str) -> bool {
        self.owner_uid == uid
    }

    /// Whether any service under `category` is switched on
    pub fn has_enabled_service_in(&self, category: &str) -> bool {
        self.services
            .iter()
            .filter(|(key, _)| tags_match(key, category))
            .any(|(_, services)| services.values().any(|enabled| *enabled))
    }
}

/// Accepted payment methods
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum PaymentMethod {
    Cash,
    Cashapp,
    Credit,
    Debit,
    Paypal,
    Tap,
    Venmo,
    Zelle,
}

/// Payment flag set stored as JSONB
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(default)]
pub struct PaymentOptions {
    pub cash: bool,
    pub cashapp: bool,
    pub credit: bool,
    pub debit: bool,
    pub paypal: bool,
    pub tap: bool,
    pub venmo: bool,
    pub zelle: bool,
}

impl PaymentOptions {
    pub fn from_methods(methods: &[PaymentMethod]) -> Self {
        let mut options = Self::default();
        for method in methods {
            options.set(*method, true);
        }
        options
    }

    pub fn set(&mut self, method: PaymentMethod, accepted: bool) {
        let flag = match method {
            PaymentMethod::Cash => &mut self.cash,
            PaymentMethod::Cashapp => &mut self.cashapp,
            PaymentMethod::Credit => &mut self.credit,
            PaymentMethod::Debit => &mut self.debit,
            PaymentMethod::Paypal => &mut self.paypal,
            PaymentMethod::Tap => &mut self.tap,
            PaymentMethod::Venmo => &mut self.venmo,
            PaymentMethod::Zelle => &mut self.zelle,
        };
        *flag = accepted;
    }
}

#[cfg(test)]
pub mod fixtures {
    use super::*;
    use fake::faker::address::en::CityName;
    use fake::faker::company::en::CompanyName;
    use fake::Fake;

    /// Vendor in a parsed city/state with the given tags and no services
    pub fn vendor_with_tags(city: &str, state: &str, tags: &[&str]) -> Vendor {
        let name: String = CompanyName().fake();
        let now = Utc::now();
        Vendor {
            id: Uuid::new_v4(),
            owner_uid: "owner-uid".to_string(),
            business_name: name,
            address: format!("1 Main St, {}, {} 90001", city, state),
            city: Some(city.to_string()),
            state: Some(state.to_string()),
            email: "studio@example.com".to_string(),
            phone_number: "3105550100".to_string(),
            description: None,
            images: vec![],
            tags: tags.iter().map(|t| t.to_string()).collect(),
            offers_home: false,
            offers_drive: true,
            payment_options: Json(PaymentOptions::from_methods(&[PaymentMethod::Cash])),
            social_links: vec![],
            services: Json(ServiceMap::new()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn random_vendor(tags: &[&str]) -> Vendor {
        let city: String = CityName().fake();
        vendor_with_tags(&city, "CA", tags)
    }
}
