//! Social link detection and URL normalization.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SocialPlatform {
    Instagram,
    Facebook,
    Twitter,
    Youtube,
    Tiktok,
    Linkedin,
    Website,
}

/// A social link as edited on the dashboard: platform plus handle or URL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SocialLink {
    pub platform: SocialPlatform,
    pub value: String,
}

/// Host of a URL-ish string without scheme, `www.` or path
fn host_of(link: &str) -> String {
    let without_scheme = link
        .split_once("://")
        .map(|(_, rest)| rest)
        .unwrap_or(link);
    let host = without_scheme
        .split(['/', '?', '#'])
        .next()
        .unwrap_or_default()
        .to_ascii_lowercase();
    host.strip_prefix("www.").map(str::to_string).unwrap_or(host)
}

fn host_is(host: &str, domain: &str) -> bool {
    host == domain || host.ends_with(&format!(".{}", domain))
}

/// Detect the platform of a stored link
pub fn parse_social_link(link: &str) -> SocialLink {
    let link = link.trim();

    if link.starts_with('@') {
        return SocialLink {
            platform: SocialPlatform::Instagram,
            value: link.to_string(),
        };
    }

    let host = host_of(link);
    let platform = if host_is(&host, "instagram.com") {
        SocialPlatform::Instagram
    } else if host_is(&host, "facebook.com") {
        SocialPlatform::Facebook
    } else if host_is(&host, "twitter.com") || host_is(&host, "x.com") {
        SocialPlatform::Twitter
    } else if host_is(&host, "youtube.com") {
        SocialPlatform::Youtube
    } else if host_is(&host, "tiktok.com") {
        SocialPlatform::Tiktok
    } else if host_is(&host, "linkedin.com") {
        SocialPlatform::Linkedin
    } else {
        SocialPlatform::Website
    };

    let value = match platform {
        // Instagram links are edited as bare handles
        SocialPlatform::Instagram => link
            .trim_end_matches('/')
            .rsplit('/')
            .next()
            .unwrap_or_default()
            .to_string(),
        _ => link.to_string(),
    };

    SocialLink { platform, value }
}

/// Build the full URL for a link
pub fn format_social_link(link: &SocialLink) -> String {
    let value = link.value.trim();
    let is_url = value.starts_with("http");

    match link.platform {
        SocialPlatform::Instagram => {
            if is_url && host_is(&host_of(value), "instagram.com") {
                return value.to_string();
            }
            format!("https://instagram.com/{}", value.trim_start_matches('@'))
        }
        _ if is_url => value.to_string(),
        SocialPlatform::Facebook => format!("https://facebook.com/{}", value),
        SocialPlatform::Twitter => format!("https://twitter.com/{}", value),
        SocialPlatform::Youtube => format!("https://youtube.com/{}", value),
        SocialPlatform::Tiktok => format!("https://tiktok.com/@{}", value.trim_start_matches('@')),
        SocialPlatform::Linkedin => format!("https://linkedin.com/in/{}", value),
        SocialPlatform::Website => format!("https://{}", value),
    }
}

/// Normalize user-entered links into full URLs, dropping blanks and duplicates
pub fn normalize_social_links(links: &[SocialLink]) -> Vec<String> {
    let mut urls: Vec<String> = Vec::new();
    for link in links.iter().filter(|l| !l.value.trim().is_empty()) {
        let url = format_social_link(link);
        if !urls.contains(&url) {
            urls.push(url);
        }
    }
    urls
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_detects_platforms() {
        let cases = [
            ("@glowstudio", SocialPlatform::Instagram),
            ("https://instagram.com/glowstudio", SocialPlatform::Instagram),
            ("https://www.facebook.com/glow", SocialPlatform::Facebook),
            ("https://x.com/glow", SocialPlatform::Twitter),
            ("https://twitter.com/glow", SocialPlatform::Twitter),
            ("https://youtube.com/@glow", SocialPlatform::Youtube),
            ("https://www.tiktok.com/@glow", SocialPlatform::Tiktok),
            ("https://linkedin.com/in/glow", SocialPlatform::Linkedin),
            ("https://glowstudio.com", SocialPlatform::Website),
            ("https://netflix.com", SocialPlatform::Website),
        ];

        for (link, expected) in cases {
            assert_eq!(parse_social_link(link).platform, expected, "{}", link);
        }
    }

    #[test]
    fn test_instagram_url_parses_to_handle() {
        let link = parse_social_link("https://instagram.com/glowstudio/");
        assert_eq!(link.value, "glowstudio");
        assert_eq!(format_social_link(&link), "https://instagram.com/glowstudio");
    }

    #[test]
    fn test_format_builds_full_urls() {
        let link = |platform, value: &str| SocialLink {
            platform,
            value: value.to_string(),
        };

        assert_eq!(
            format_social_link(&link(SocialPlatform::Instagram, "@glow")),
            "https://instagram.com/glow"
        );
        assert_eq!(
            format_social_link(&link(SocialPlatform::Tiktok, "glow")),
            "https://tiktok.com/@glow"
        );
        assert_eq!(
            format_social_link(&link(SocialPlatform::Linkedin, "glow")),
            "https://linkedin.com/in/glow"
        );
        assert_eq!(
            format_social_link(&link(SocialPlatform::Website, "glow.com")),
            "https://glow.com"
        );
        assert_eq!(
            format_social_link(&link(SocialPlatform::Facebook, "https://facebook.com/glow")),
            "https://facebook.com/glow"
        );
    }

    #[test]
    fn test_normalize_drops_blanks_and_duplicates() {
        let links = vec![
            SocialLink {
                platform: SocialPlatform::Instagram,
                value: "@glow".to_string(),
            },
            SocialLink {
                platform: SocialPlatform::Instagram,
                value: "glow".to_string(),
            },
            SocialLink {
                platform: SocialPlatform::Website,
                value: "  ".to_string(),
            },
        ];

        assert_eq!(normalize_social_links(&links), vec!["https://instagram.com/glow"]);
    }
}
