//! Naive free-text address parsing.

/// City and state extracted from a free-text address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedAddress {
    pub city: Option<String>,
    pub state: Option<String>,
}

impl ParsedAddress {
    /// Normalized "city, state" used as the geocode cache key and coarse query
    pub fn city_state(&self) -> Option<String> {
        match (&self.city, &self.state) {
            (Some(city), Some(state)) => Some(format!("{}, {}", city, state)),
            _ => None,
        }
    }
}

/// Comma split: with at least two non-empty parts the city is the
/// second-to-last part and the state is the first token of the last part.
pub fn parse_address(address: &str) -> ParsedAddress {
    let parts: Vec<&str> = address
        .split(',')
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() < 2 {
        return ParsedAddress::default();
    }

    let city = parts[parts.len() - 2].to_string();
    let state = parts[parts.len() - 1]
        .split_whitespace()
        .next()
        .map(str::to_string);

    ParsedAddress {
        city: Some(city),
        state,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_address() {
        let parsed = parse_address("123 Main St, Springfield, IL 62701");
        assert_eq!(parsed.city.as_deref(), Some("Springfield"));
        assert_eq!(parsed.state.as_deref(), Some("IL"));
        assert_eq!(parsed.city_state().as_deref(), Some("Springfield, IL"));
    }

    #[test]
    fn test_parse_city_state_only() {
        let parsed = parse_address("Los Angeles, CA");
        assert_eq!(parsed.city.as_deref(), Some("Los Angeles"));
        assert_eq!(parsed.state.as_deref(), Some("CA"));
    }

    #[test]
    fn test_parse_without_commas() {
        assert_eq!(parse_address("123 Main St"), ParsedAddress::default());
        assert_eq!(parse_address(""), ParsedAddress::default());
        assert_eq!(parse_address(" , , "), ParsedAddress::default());
    }

    #[test]
    fn test_parse_ignores_trailing_comma() {
        let parsed = parse_address("9 Sunset Blvd, Hollywood, CA,");
        assert_eq!(parsed.city.as_deref(), Some("Hollywood"));
        assert_eq!(parsed.state.as_deref(), Some("CA"));
    }
}
