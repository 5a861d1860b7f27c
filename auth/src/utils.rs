//! Utility functions for authentication.

use rand::Rng;

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Random lowercase base-36 string of `len` characters.
///
/// # Examples
///
/// ```
/// use storefront_auth::utils::random_base36;
///
/// let suffix = random_base36(9);
/// assert_eq!(suffix.len(), 9);
/// assert!(suffix.chars().all(|c| c.is_ascii_digit() || c.is_ascii_lowercase()));
/// ```
#[must_use]
pub fn random_base36(len: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..len)
        .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
        .collect()
}

/// Validate email address format.
///
/// Accepts `local@domain.tld`: no whitespace, exactly one `@`, and a dot in
/// the domain with at least one character on each side of it.
///
/// # Examples
///
/// ```
/// use storefront_auth::utils::is_valid_email;
///
/// assert!(is_valid_email("user@example.com"));
/// assert!(is_valid_email("user+tag@subdomain.example.com"));
/// assert!(!is_valid_email("invalid"));
/// assert!(!is_valid_email("@example.com"));
/// assert!(!is_valid_email("user@"));
/// assert!(!is_valid_email("user@example"));
/// assert!(!is_valid_email("us er@example.com"));
/// ```
#[must_use]
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    // a dot that is neither the first nor the last character of the domain
    domain
        .char_indices()
        .any(|(idx, c)| c == '.' && idx > 0 && idx + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_requires_dot_inside_domain() {
        assert!(is_valid_email("a@b.c"));
        assert!(is_valid_email("a@b..c"));
        assert!(!is_valid_email("a@.c"));
        assert!(!is_valid_email("a@b."));
    }

    #[test]
    fn test_email_rejects_multiple_at_signs() {
        assert!(!is_valid_email("a@b@c.d"));
    }

    #[test]
    fn test_email_rejects_tabs_and_newlines() {
        assert!(!is_valid_email("a@b.c\n"));
        assert!(!is_valid_email("a\t@b.c"));
    }

    #[test]
    fn test_base36_length() {
        assert_eq!(random_base36(0), "");
        assert_eq!(random_base36(32).len(), 32);
    }
}
