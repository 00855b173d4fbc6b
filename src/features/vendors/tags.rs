//! Tag list maintenance. Tags compare case-insensitively and are kept
//! trimmed with no case-insensitive duplicates.

use super::catalog::{CatalogService, ServiceCategory};
use super::models::ServiceMap;

/// Canonical form used for tag comparison: trimmed and lowercased
pub fn normalize_tag(tag: &str) -> String {
    tag.trim().to_lowercase()
}

pub fn tags_match(a: &str, b: &str) -> bool {
    normalize_tag(a) == normalize_tag(b)
}

/// Trim, drop empties and remove case-insensitive duplicates, keeping first occurrence
pub fn dedupe_tags<I, S>(tags: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut result: Vec<String> = Vec::new();
    for tag in tags {
        let tag = tag.as_ref().trim();
        if tag.is_empty() || result.iter().any(|t| tags_match(t, tag)) {
            continue;
        }
        result.push(tag.to_string());
    }
    result
}

fn add_tag(tags: &mut Vec<String>, tag: &str) {
    if !tags.iter().any(|t| tags_match(t, tag)) {
        tags.push(tag.to_string());
    }
}

fn remove_tag(tags: &mut Vec<String>, tag: &str) {
    tags.retain(|t| !tags_match(t, tag));
}

/// Switch a single service on or off, keeping `tags` and `services` consistent.
///
/// Enabling adds the service name and the category name as tags. Disabling
/// removes the service tag, and the category tag too once no other service in
/// that category remains enabled.
pub fn toggle_service(
    tags: &mut Vec<String>,
    services: &mut ServiceMap,
    category: &ServiceCategory,
    service: &CatalogService,
    enabled: bool,
) {
    services
        .entry(category.id.to_string())
        .or_default()
        .insert(service.id.to_string(), enabled);

    if enabled {
        add_tag(tags, service.name);
        add_tag(tags, category.name);
        return;
    }

    remove_tag(tags, service.name);

    let any_enabled = services
        .get(category.id)
        .is_some_and(|s| s.values().any(|on| *on));
    if !any_enabled {
        remove_tag(tags, category.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::vendors::catalog::find_category;

    #[test]
    fn test_normalize_tag() {
        assert_eq!(normalize_tag(" Tattoo Cover "), "tattoo cover");
        assert!(tags_match("HAIR", " hair"));
        assert!(!tags_match("Make-up", "makeup"));
        assert!(!tags_match("Tattoo Cover", "tattoocover"));
    }

    #[test]
    fn test_dedupe_tags() {
        let tags = dedupe_tags(["Hair", " hair ", "", "Color", "color", "Nails"]);
        assert_eq!(tags, vec!["Hair", "Color", "Nails"]);
    }

    #[test]
    fn test_toggle_service_adds_and_removes_category_tag() {
        let hair = find_category("hair").unwrap();
        let color = hair.find_service("color").unwrap();
        let wax = hair.find_service("wax").unwrap();

        let mut tags = vec![];
        let mut services = ServiceMap::new();

        toggle_service(&mut tags, &mut services, hair, color, true);
        toggle_service(&mut tags, &mut services, hair, wax, true);
        assert_eq!(tags, vec!["Color", "Hair", "Wax"]);

        toggle_service(&mut tags, &mut services, hair, color, false);
        assert_eq!(tags, vec!["Hair", "Wax"]);
        assert_eq!(services["hair"]["color"], false);

        toggle_service(&mut tags, &mut services, hair, wax, false);
        assert!(tags.is_empty());
    }

    #[test]
    fn test_enabling_twice_does_not_duplicate_tags() {
        let nails = find_category("nails").unwrap();
        let manicure = nails.find_service("manicure").unwrap();

        let mut tags = vec!["nails".to_string()];
        let mut services = ServiceMap::new();
        toggle_service(&mut tags, &mut services, nails, manicure, true);
        toggle_service(&mut tags, &mut services, nails, manicure, true);

        assert_eq!(tags, vec!["nails", "Manicure"]);
    }
}
