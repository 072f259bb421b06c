//! Phone number utilities

use once_cell::sync::Lazy;
use regex::Regex;

// Chinese mobile phone number regex
static CHINA_MOBILE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^1[3-9]\d{9}$").expect("valid mobile regex"));

// International phone number regex (E.164 format)
static INTERNATIONAL_PHONE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+[1-9]\d{1,14}$").expect("valid E.164 regex"));

/// Normalize a phone number by removing common formatting characters
pub fn normalize_phone_number(phone: &str) -> String {
    phone
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

/// Check if a phone number is a valid Chinese mobile number
pub fn is_valid_chinese_mobile(phone: &str) -> bool {
    CHINA_MOBILE_REGEX.is_match(&normalize_phone_number(phone))
}

/// Check if a phone number is valid in international E.164 format
pub fn is_valid_international_phone(phone: &str) -> bool {
    INTERNATIONAL_PHONE_REGEX.is_match(&normalize_phone_number(phone))
}

/// Check if a phone number is valid (either Chinese mobile or E.164)
pub fn is_valid_phone(phone: &str) -> bool {
    is_valid_chinese_mobile(phone) || is_valid_international_phone(phone)
}

/// Mask a phone number for logging, keeping only the last 4 characters
///
/// Recipients never appear in logs in clear text.
pub fn mask_phone_number(phone: &str) -> String {
    let chars: Vec<char> = phone.chars().collect();
    if chars.len() <= 4 {
        "****".to_string()
    } else {
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("***{}", tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone_number() {
        assert_eq!(normalize_phone_number("138-1234-5678"), "13812345678");
        assert_eq!(normalize_phone_number("+86 138 1234 5678"), "+8613812345678");
        assert_eq!(normalize_phone_number("(138) 1234-5678"), "13812345678");
    }

    #[test]
    fn test_is_valid_chinese_mobile() {
        assert!(is_valid_chinese_mobile("13812345678"));
        assert!(is_valid_chinese_mobile("18612345678"));
        assert!(!is_valid_chinese_mobile("12812345678")); // Invalid prefix
        assert!(!is_valid_chinese_mobile("1381234567")); // Too short
    }

    #[test]
    fn test_is_valid_international_phone() {
        assert!(is_valid_international_phone("+15551234"));
        assert!(is_valid_international_phone("+14155552671"));
        assert!(!is_valid_international_phone("13812345678")); // Missing +
        assert!(!is_valid_international_phone("+0123456789")); // Invalid country code
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("+1555"));
        assert!(is_valid_phone("13812345678"));
        assert!(!is_valid_phone("not-a-phone"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_mask_phone_number() {
        assert_eq!(mask_phone_number("+15551234"), "***1234");
        assert_eq!(mask_phone_number("13812345678"), "***5678");
        assert_eq!(mask_phone_number("1234"), "****");
        assert_eq!(mask_phone_number(""), "****");
    }
}
