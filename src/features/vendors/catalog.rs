//! Fixed catalog of service categories and the services offered under each.

use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct CatalogService {
    pub id: &'static str,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, Serialize, ToSchema)]
pub struct ServiceCategory {
    pub id: &'static str,
    pub name: &'static str,
    #[schema(value_type = Vec<CatalogService>)]
    pub services: &'static [CatalogService],
}

const fn service(id: &'static str, name: &'static str) -> CatalogService {
    CatalogService { id, name }
}

pub static SERVICE_CATALOG: &[ServiceCategory] = &[
    ServiceCategory {
        id: "hair",
        name: "Hair",
        services: &[
            service("brazilian", "Brazilian"),
            service("brows", "Brows"),
            service("color", "Color"),
            service("extensions", "Extensions"),
            service("haircuts", "Haircuts"),
            service("laser", "Laser"),
            service("restoration", "Restoration"),
            service("treatments", "Treatments"),
            service("wax", "Wax"),
        ],
    },
    ServiceCategory {
        id: "nails",
        name: "Nails",
        services: &[
            service("acrylics", "Acrylics"),
            service("manicure", "Manicure"),
            service("pedicure", "Pedicure"),
        ],
    },
    ServiceCategory {
        id: "makeup",
        name: "Makeup",
        services: &[
            service("bridal", "Bridal"),
            service("natural", "Natural"),
            service("prom", "Prom"),
            service("tattooCover", "Tattoo Cover"),
        ],
    },
];

/// Case-insensitive category lookup
pub fn find_category(id: &str) -> Option<&'static ServiceCategory> {
    SERVICE_CATALOG
        .iter()
        .find(|c| c.id.eq_ignore_ascii_case(id))
}

impl ServiceCategory {
    pub fn find_service(&self, id: &str) -> Option<&'static CatalogService> {
        self.services.iter().find(|s| s.id.eq_ignore_ascii_case(id))
    }
}
