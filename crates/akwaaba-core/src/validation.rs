//! Input normalization and validation rules.

use std::sync::OnceLock;

use regex::Regex;

/// Minimum characters in a full name.
pub const MIN_NAME_LEN: usize = 2;
/// Minimum characters in a password.
pub const MIN_PASSWORD_LEN: usize = 8;
/// Minimum characters in an event title.
pub const MIN_TITLE_LEN: usize = 3;

fn slug_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[a-z0-9-]{1,40}$").expect("static pattern compiles"))
}

fn subscriber_email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static pattern compiles"))
}

/// Trims and lower-cases an email address.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Keeps a leading `+` and the digits of a phone number.
pub fn normalize_phone(phone: &str) -> String {
    let trimmed = phone.trim();
    let mut out = String::with_capacity(trimmed.len());
    if trimmed.starts_with('+') {
        out.push('+');
    }
    out.extend(trimmed.chars().filter(|c| c.is_ascii_digit()));
    out
}

/// Account email rule: one `@`, non-empty local part, a dot in the domain.
pub fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    !local.is_empty()
        && !domain.contains('@')
        && domain.contains('.')
        && !domain.starts_with('.')
        && !domain.ends_with('.')
        && !email.chars().any(char::is_whitespace)
}

/// Newsletter email rule.
pub fn is_valid_subscriber_email(email: &str) -> bool {
    subscriber_email_re().is_match(email)
}

/// Phone rule on a normalized number: 7 to 15 digits.
pub fn is_valid_phone(normalized: &str) -> bool {
    let digits = normalized.trim_start_matches('+');
    (7..=15).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// Collects every password problem.
pub fn password_problems(password: &str, confirm: &str) -> Vec<String> {
    let mut problems = Vec::new();
    if password.chars().count() < MIN_PASSWORD_LEN {
        problems.push(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LEN
        ));
    }
    if !password.chars().any(|c| c.is_alphabetic()) || !password.chars().any(|c| c.is_ascii_digit())
    {
        problems.push("Password must contain a letter and a digit".to_string());
    }
    if password != confirm {
        problems.push("Passwords do not match".to_string());
    }
    problems
}

/// Returns true if `slug` is a valid category slug.
pub fn is_valid_slug(slug: &str) -> bool {
    slug_re().is_match(slug)
}

/// Splits a comma list into distinct, valid, lower-cased slugs.
///
/// Invalid entries are dropped silently.
pub fn parse_slugs(raw: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for part in raw.split(',') {
        let slug = part.trim().to_lowercase();
        if is_valid_slug(&slug) && !out.contains(&slug) {
            out.push(slug);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_phone() {
        assert_eq!(normalize_phone(" +233 (24) 123-4567 "), "+233241234567");
        assert_eq!(normalize_phone("024 123 4567"), "0241234567");
    }

    #[test]
    fn test_is_valid_phone() {
        assert!(is_valid_phone("0241234567"));
        assert!(is_valid_phone("+233241234567"));
        assert!(!is_valid_phone("12345"));
        assert!(!is_valid_phone("+1234567890123456"));
        assert!(!is_valid_phone(""));
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("ama@example.com"));
        assert!(!is_valid_email("ama.example.com"));
        assert!(!is_valid_email("ama@localhost"));
        assert!(!is_valid_email("@example.com"));
        assert!(!is_valid_email("a@b@example.com"));
        assert!(!is_valid_email("ama @example.com"));
    }

    #[test]
    fn test_subscriber_email() {
        assert!(is_valid_subscriber_email("news@example.org"));
        assert!(!is_valid_subscriber_email("news@example"));
        assert!(!is_valid_subscriber_email("a b@example.org"));
    }

    #[test]
    fn test_password_problems() {
        assert!(password_problems("abc12345", "abc12345").is_empty());
        assert_eq!(password_problems("short1", "short1").len(), 1);
        assert_eq!(password_problems("allletters", "allletters").len(), 1);
        let all = password_problems("abc", "xyz");
        assert_eq!(all.len(), 3);
    }

    #[test]
    fn test_parse_slugs_drops_invalid() {
        assert_eq!(
            parse_slugs("Music, arts,,bad slug,music,x_y"),
            vec!["music".to_string(), "arts".to_string()]
        );
        assert!(parse_slugs("").is_empty());
        assert!(!is_valid_slug(&"a".repeat(41)));
    }
}
