//! Random identifier generation in the platform's ID shapes.
//!
//! Each identifier kind is an explicit charset-plus-length scheme: a
//! fixed prefix followed by characters sampled uniformly from the
//! charset the platform uses for that field.

use rand::Rng;
use rand::rngs::ThreadRng;

const LOWER_ALNUM: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";
const UPPER_ALNUM: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const UPPER_ALNUM_UNDERSCORE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789_";
const LOWER_HEX: &[u8] = b"0123456789abcdef";
const DIGITS: &[u8] = b"0123456789";

/// Group lengths of the generic platform token, dashes between groups.
/// Each group additionally ends in one digit.
const TOKEN_GROUPS: [usize; 5] = [7, 3, 3, 3, 11];

fn sample(rng: &mut ThreadRng, charset: &[u8], len: usize, out: &mut String) {
    for _ in 0..len {
        let idx = rng.gen_range(0..charset.len());
        out.push(charset[idx] as char);
    }
}

fn prefixed(prefix: &str, charset: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(prefix.len() + len);
    out.push_str(prefix);
    sample(&mut rng, charset, len, &mut out);
    out
}

/// Generic platform token: five dash-separated groups of lowercase
/// alphanumerics, each group ending in a digit
/// (`xxxxxxx0-xxx0-xxx0-xxx0-xxxxxxxxxxx0`).
pub fn platform_token(prefix: &str) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(prefix.len() + 40);
    out.push_str(prefix);
    for (i, group) in TOKEN_GROUPS.into_iter().enumerate() {
        if i > 0 {
            out.push('-');
        }
        sample(&mut rng, LOWER_ALNUM, group, &mut out);
        sample(&mut rng, DIGITS, 1, &mut out);
    }
    out
}

/// Session identifier: `amzn1.ask.session.` + platform token.
pub fn session_id() -> String {
    platform_token("amzn1.ask.session.")
}

/// Skill identifier: `amzn1.ask.skill.` + platform token.
pub fn application_id() -> String {
    platform_token("amzn1.ask.skill.")
}

/// Request identifier: `amzn1.echo-api.request.` + platform token.
pub fn request_id() -> String {
    platform_token("amzn1.echo-api.request.")
}

/// Account identifier: fixed prefix + 207 uppercase alphanumerics.
pub fn user_id() -> String {
    prefixed("amzn1.ask.account.", UPPER_ALNUM, 207)
}

/// Device identifier: fixed prefix + 156 uppercase alphanumerics.
pub fn device_id() -> String {
    prefixed("amzn1.ask.device.", UPPER_ALNUM, 156)
}

/// API access token: 50 chars of `[0-9A-Z_]`, no prefix.
pub fn api_access_token() -> String {
    prefixed("", UPPER_ALNUM_UNDERSCORE, 50)
}

/// Entity-resolution value identifier: 32 lowercase hex chars.
pub fn resolution_value_id() -> String {
    prefixed("", LOWER_HEX, 32)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_charset(s: &str, charset: &[u8]) {
        for byte in s.bytes() {
            assert!(
                charset.contains(&byte),
                "unexpected byte '{}' in '{s}'",
                byte as char
            );
        }
    }

    #[test]
    fn test_platform_token_shape() {
        let token = platform_token("amzn1.ask.session.");
        let body = token.strip_prefix("amzn1.ask.session.").unwrap();
        // 5 groups + 5 trailing digits + 4 dashes.
        assert_eq!(body.len(), 7 + 3 + 3 + 3 + 11 + 5 + 4);

        let groups: Vec<&str> = body.split('-').collect();
        assert_eq!(groups.len(), 5);
        for (group, len) in groups.iter().zip(TOKEN_GROUPS) {
            assert_eq!(group.len(), len + 1);
            assert_charset(group, LOWER_ALNUM);
            assert!(group.ends_with(|c: char| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_user_id_shape() {
        let id = user_id();
        let body = id.strip_prefix("amzn1.ask.account.").unwrap();
        assert_eq!(body.len(), 207);
        assert_charset(body, UPPER_ALNUM);
    }

    #[test]
    fn test_device_id_shape() {
        let id = device_id();
        let body = id.strip_prefix("amzn1.ask.device.").unwrap();
        assert_eq!(body.len(), 156);
        assert_charset(body, UPPER_ALNUM);
    }

    #[test]
    fn test_api_access_token_shape() {
        let token = api_access_token();
        assert_eq!(token.len(), 50);
        assert_charset(&token, UPPER_ALNUM_UNDERSCORE);
    }

    #[test]
    fn test_resolution_value_id_shape() {
        let id = resolution_value_id();
        assert_eq!(id.len(), 32);
        assert_charset(&id, LOWER_HEX);
    }

    #[test]
    fn test_tokens_are_distinct() {
        assert_ne!(session_id(), session_id());
        assert_ne!(user_id(), user_id());
        assert_ne!(resolution_value_id(), resolution_value_id());
    }
}
