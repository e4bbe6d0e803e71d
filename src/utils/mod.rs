pub mod url_validator;

/// Longest short code accepted anywhere in the service.
pub const MAX_CODE_LENGTH: usize = 64;

pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    // 短码统一小写，只用小写字母和数字
    let chars = b"abcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// Canonical form of a short code: surrounding whitespace trimmed, ASCII lowercase.
pub fn canonicalize_code(code: &str) -> String {
    code.trim().to_ascii_lowercase()
}

/// Checks an already canonicalised code: 1..=64 chars of `[a-z0-9_-]`.
pub fn is_valid_short_code(code: &str) -> bool {
    !code.is_empty()
        && code.len() <= MAX_CODE_LENGTH
        && code
            .bytes()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'_' || b == b'-')
}
