//! Category, sub-tag and location filtering of vendors.
//!
//! A vendor passes when the location query matches AND, if any categories are
//! selected, at least one selected category matches including its selected
//! sub-tags.

use std::collections::BTreeMap;

use crate::features::vendors::models::Vendor;
use crate::features::vendors::tags::{normalize_tag, tags_match};

#[derive(Debug, Clone, Default)]
pub struct VendorFilter {
    /// Selected categories, e.g. "Hair"
    pub categories: Vec<String>,
    /// Selected sub-tags keyed by normalized category
    pub sub_tags: BTreeMap<String, Vec<String>>,
    /// Substring matched against city or state
    pub location: Option<String>,
}

impl VendorFilter {
    /// Build from comma-separated query values. Sub-tags are `category:sub` pairs.
    pub fn from_query(
        categories: Option<&str>,
        sub_tags: Option<&str>,
        location: Option<&str>,
    ) -> Self {
        let split = |value: Option<&str>| -> Vec<String> {
            value
                .unwrap_or_default()
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut sub_tag_map: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for pair in split(sub_tags) {
            if let Some((category, sub)) = pair.split_once(':') {
                let (category, sub) = (category.trim(), sub.trim());
                if !category.is_empty() && !sub.is_empty() {
                    sub_tag_map
                        .entry(normalize_tag(category))
                        .or_default()
                        .push(sub.to_string());
                }
            }
        }

        Self {
            categories: split(categories),
            sub_tags: sub_tag_map,
            location: location
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .map(str::to_string),
        }
    }

    pub fn matches(&self, vendor: &Vendor) -> bool {
        self.matches_location(vendor) && self.matches_categories(vendor)
    }

    pub fn apply(&self, vendors: Vec<Vendor>) -> Vec<Vendor> {
        vendors.into_iter().filter(|v| self.matches(v)).collect()
    }

    fn matches_location(&self, vendor: &Vendor) -> bool {
        let Some(query) = &self.location else {
            return true;
        };
        let query = query.to_lowercase();

        [&vendor.city, &vendor.state]
            .into_iter()
            .flatten()
            .any(|part| part.to_lowercase().contains(&query))
    }

    fn matches_categories(&self, vendor: &Vendor) -> bool {
        if self.categories.is_empty() {
            return true;
        }

        self.categories.iter().any(|category| {
            if !vendor_has_category(vendor, category) {
                return false;
            }
            match self.sub_tags.get(&normalize_tag(category)) {
                Some(subs) if !subs.is_empty() => {
                    subs.iter().any(|sub| vendor_has_sub_tag(vendor, category, sub))
                }
                _ => true,
            }
        })
    }
}

fn vendor_has_tag(vendor: &Vendor, tag: &str) -> bool {
    vendor.tags.iter().any(|t| tags_match(t, tag))
}

fn vendor_has_category(vendor: &Vendor, category: &str) -> bool {
    vendor_has_tag(vendor, category) || vendor.has_enabled_service_in(category)
}

fn vendor_has_sub_tag(vendor: &Vendor, category: &str, sub: &str) -> bool {
    vendor_has_tag(vendor, sub)
        || vendor
            .services
            .iter()
            .filter(|(key, _)| tags_match(key, category))
            .flat_map(|(_, services)| services.iter())
            .any(|(service, on)| *on && tags_match(service, sub))
}
