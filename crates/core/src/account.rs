//! Account identity rules shared by registration, login and profile edits.

/// Minimum accepted password length at registration.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Canonical form of an email address: surrounding whitespace removed and
/// lowercased. Uniqueness of `users.email` is enforced on this form.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Message returned for every failed login, whether the account exists or not.
pub const INVALID_CREDENTIALS: &str = "Invalid credentials";
