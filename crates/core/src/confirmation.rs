//! Email confirmation codes.
//!
//! A code proves that the caller can read mail sent to a user's address. It
//! is an HMAC-SHA256 over the user's identity, their `last_login_at` and the
//! issue time, so it is stateless on the server side and stops verifying as
//! soon as `last_login_at` changes (which happens when the code is exchanged
//! for a token). Format: `<issued_at in base36>-<20 hex chars>`.

use hmac::{Hmac, Mac};
use sha2::Sha256;

use crate::types::{DbId, Timestamp};

type HmacSha256 = Hmac<Sha256>;

/// Default code lifetime: three days.
pub const DEFAULT_CODE_TTL_SECS: i64 = 3 * 24 * 60 * 60;

/// Number of MAC bytes kept in the code (hex-encoded to twice as many chars).
const MAC_BYTES: usize = 10;

/// The user state a code is bound to.
#[derive(Debug, Clone, Copy)]
pub struct CodeSubject<'a> {
    pub user_id: DbId,
    pub email: &'a str,
    pub last_login_at: Option<Timestamp>,
}

fn mac_for(subject: &CodeSubject<'_>, secret: &str, issued_at: i64) -> HmacSha256 {
    let last_login = subject
        .last_login_at
        .map(|t| t.timestamp_micros().to_string())
        .unwrap_or_default();
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(
        format!(
            "{}:{}:{}:{}",
            subject.user_id, subject.email, last_login, issued_at
        )
        .as_bytes(),
    );
    mac
}

/// Issue a code for `subject` at `issued_at` (Unix seconds).
pub fn make_code(subject: &CodeSubject<'_>, secret: &str, issued_at: i64) -> String {
    let digest = mac_for(subject, secret, issued_at).finalize().into_bytes();
    format!(
        "{}-{}",
        base36::encode(issued_at),
        hex::encode(&digest[..MAC_BYTES])
    )
}

/// Check `code` against `subject` at time `now` (Unix seconds).
///
/// Fails for malformed codes, codes issued in the future, codes older than
/// `ttl_secs`, and codes minted for a different user state.
pub fn check_code(
    subject: &CodeSubject<'_>,
    secret: &str,
    code: &str,
    now: i64,
    ttl_secs: i64,
) -> bool {
    let Some((ts_part, mac_part)) = code.split_once('-') else {
        return false;
    };
    let Some(issued_at) = base36::decode(ts_part) else {
        return false;
    };
    if issued_at > now || now - issued_at > ttl_secs {
        return false;
    }
    let Some(expected) = hex::decode(mac_part) else {
        return false;
    };
    if expected.len() != MAC_BYTES {
        return false;
    }
    mac_for(subject, secret, issued_at)
        .verify_truncated_left(&expected)
        .is_ok()
}

mod base36 {
    const DIGITS: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

    pub fn encode(mut value: i64) -> String {
        if value <= 0 {
            return "0".into();
        }
        let mut out = Vec::new();
        while value > 0 {
            out.push(DIGITS[(value % 36) as usize]);
            value /= 36;
        }
        out.reverse();
        String::from_utf8(out).unwrap_or_default()
    }

    pub fn decode(s: &str) -> Option<i64> {
        if s.is_empty() || s.len() > 12 {
            return None;
        }
        i64::from_str_radix(s, 36).ok().filter(|v| *v >= 0)
    }
}

mod hex {
    /// Encode bytes as a lowercase hex string.
    pub fn encode(bytes: impl AsRef<[u8]>) -> String {
        bytes.as_ref().iter().map(|b| format!("{b:02x}")).collect()
    }

    pub fn decode(s: &str) -> Option<Vec<u8>> {
        if s.len() % 2 != 0 || !s.is_ascii() {
            return None;
        }
        (0..s.len())
            .step_by(2)
            .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::*;

    const SECRET: &str = "confirmation-test-secret";
    const NOW: i64 = 1_760_000_000;

    fn subject(last_login_at: Option<Timestamp>) -> CodeSubject<'static> {
        CodeSubject {
            user_id: 42,
            email: "a@b.com",
            last_login_at,
        }
    }

    #[test]
    fn fresh_code_verifies() {
        let s = subject(None);
        let code = make_code(&s, SECRET, NOW);
        assert!(check_code(&s, SECRET, &code, NOW + 60, DEFAULT_CODE_TTL_SECS));
    }

    #[test]
    fn code_shape() {
        let code = make_code(&subject(None), SECRET, NOW);
        let (ts, mac) = code.split_once('-').unwrap();
        assert_eq!(base36::decode(ts), Some(NOW));
        assert_eq!(mac.len(), MAC_BYTES * 2);
    }

    #[test]
    fn login_invalidates_code() {
        let before = subject(None);
        let code = make_code(&before, SECRET, NOW);
        let after = subject(Some(Utc.timestamp_opt(NOW + 5, 0).unwrap()));
        assert!(!check_code(&after, SECRET, &code, NOW + 10, DEFAULT_CODE_TTL_SECS));
    }

    #[test]
    fn expired_code_fails() {
        let s = subject(None);
        let code = make_code(&s, SECRET, NOW);
        assert!(!check_code(&s, SECRET, &code, NOW + 3601, 3600));
    }

    #[test]
    fn future_code_fails() {
        let s = subject(None);
        let code = make_code(&s, SECRET, NOW + 100);
        assert!(!check_code(&s, SECRET, &code, NOW, DEFAULT_CODE_TTL_SECS));
    }

    #[test]
    fn other_user_or_secret_fails() {
        let s = subject(None);
        let code = make_code(&s, SECRET, NOW);
        let other = CodeSubject { user_id: 43, ..s };
        assert!(!check_code(&other, SECRET, &code, NOW, DEFAULT_CODE_TTL_SECS));
        assert!(!check_code(&s, "another-secret", &code, NOW, DEFAULT_CODE_TTL_SECS));
    }

    #[test]
    fn garbage_fails() {
        let s = subject(None);
        for code in ["", "abc", "zz-zz", "-", "1-xyz", "1-00"] {
            assert!(!check_code(&s, SECRET, code, NOW, DEFAULT_CODE_TTL_SECS), "{code}");
        }
    }

    #[test]
    fn base36_roundtrip_known_value() {
        assert_eq!(base36::encode(35), "z");
        assert_eq!(base36::encode(36), "10");
        assert_eq!(base36::decode("10"), Some(36));
    }
}
