use rand::{rng, Rng};

/// Length of generated short identifiers
pub const SHORT_ID_LENGTH: usize = 6;

const CHARSET: &[u8] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Generates a random base62 identifier (0-9, A-Z, a-z) of `length` characters
pub fn generate_short_id(length: usize) -> String {
    let mut rng = rng();
    (0..length)
        .map(|_| CHARSET[rng.random_range(0..CHARSET.len())] as char)
        .collect()
}
