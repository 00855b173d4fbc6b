use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    /// Profile usernames: letters, digits and underscores only
    /// - Valid: "jane_doe", "Nails4U", "_studio"
    /// - Invalid: "jane doe", "jane-doe", "jané"
    pub static ref USERNAME_REGEX: Regex = Regex::new(r"^[A-Za-z0-9_]+$").unwrap();

    /// Business phone numbers are stored as bare digits
    pub static ref BUSINESS_PHONE_REGEX: Regex = Regex::new(r"^\d+$").unwrap();

    /// E.164 phone numbers used for OTP sign-in, e.g. "+13105550100"
    pub static ref PHONE_E164_REGEX: Regex = Regex::new(r"^\+[1-9]\d{7,14}$").unwrap();

    /// SMS one-time codes are six digits
    pub static ref OTP_CODE_REGEX: Regex = Regex::new(r"^\d{6}$").unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_username_regex() {
        assert!(USERNAME_REGEX.is_match("jane_doe"));
        assert!(USERNAME_REGEX.is_match("Nails4U"));
        assert!(USERNAME_REGEX.is_match("_studio"));
        assert!(!USERNAME_REGEX.is_match("jane doe"));
        assert!(!USERNAME_REGEX.is_match("jane-doe"));
        assert!(!USERNAME_REGEX.is_match(""));
    }

    #[test]
    fn test_business_phone_regex() {
        assert!(BUSINESS_PHONE_REGEX.is_match("3105550100"));
        assert!(!BUSINESS_PHONE_REGEX.is_match("(310) 555-0100"));
        assert!(!BUSINESS_PHONE_REGEX.is_match(""));
    }

    #[test]
    fn test_phone_e164_regex() {
        assert!(PHONE_E164_REGEX.is_match("+13105550100"));
        assert!(!PHONE_E164_REGEX.is_match("13105550100"));
        assert!(!PHONE_E164_REGEX.is_match("+0123456789"));
        assert!(!PHONE_E164_REGEX.is_match("+1310"));
    }
}
