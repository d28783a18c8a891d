//! Form Validators

use std::sync::OnceLock;

use regex::Regex;

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid"))
}

pub fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

pub fn is_email_valid(email: &str) -> bool {
    email_regex().is_match(email)
}

/// At least 8 ASCII letters/digits, with at least one of each
pub fn is_password_valid(password: &str) -> bool {
    password.len() >= 8
        && password.chars().all(|c| c.is_ascii_alphanumeric())
        && password.chars().any(|c| c.is_ascii_alphabetic())
        && password.chars().any(|c| c.is_ascii_digit())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email() {
        assert!(is_email_valid("cook@foodmind.app"));
        assert!(!is_email_valid("cook@foodmind"));
        assert!(!is_email_valid("co ok@foodmind.app"));
        assert!(!is_email_valid(""));
    }

    #[test]
    fn test_password() {
        assert!(is_password_valid("tortilla42"));
        assert!(!is_password_valid("short1"));
        assert!(!is_password_valid("onlyletters"));
        assert!(!is_password_valid("12345678"));
        assert!(!is_password_valid("with space 1"));
    }

    #[test]
    fn test_blank() {
        assert!(is_blank("   "));
        assert!(!is_blank(" Ana "));
    }
}
