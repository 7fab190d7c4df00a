//! Intern ID generation and format checks.
//!
//! An intern ID is a 9-character token drawn from uppercase ASCII letters and
//! digits. IDs are not checked for collisions.

use rand::Rng;

/// Number of characters in an intern ID.
pub const INTERN_ID_LENGTH: usize = 9;

const ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Generates a fresh random intern ID.
///
/// # Examples
///
/// ```ignore
/// let id = generate_intern_id();
/// assert_eq!(id.len(), 9);
/// assert!(id.chars().all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
/// ```
pub fn generate_intern_id() -> String {
    let mut rng = rand::rng();

    (0..INTERN_ID_LENGTH)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
        .collect()
}

/// Returns true if `value` has the shape of a generated intern ID.
///
/// Used to reject path parameters before they touch the filesystem.
pub fn is_valid_intern_id(value: &str) -> bool {
    value.len() == INTERN_ID_LENGTH
        && value
            .bytes()
            .all(|b| b.is_ascii_uppercase() || b.is_ascii_digit())
}
