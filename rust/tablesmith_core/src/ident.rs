//! Identifier and timestamp generation.

use chrono::{SecondsFormat, Utc};
use rand::Rng;

/// Generate a collision-resistant table id: milliseconds since the epoch
/// in base36 followed by a random base36 suffix.
pub fn new_table_id() -> String {
    let millis = Utc::now().timestamp_millis().max(0) as u128;
    let suffix: u64 = rand::thread_rng().gen();
    format!("{}{}", to_base36(millis), to_base36(suffix as u128))
}

/// Current time as an ISO-8601 string, e.g. `2026-08-06T09:30:00.000Z`.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn to_base36(mut n: u128) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut buf = [0u8; 26];
    let mut i = buf.len();
    while n > 0 {
        i -= 1;
        buf[i] = DIGITS[(n % 36) as usize];
        n /= 36;
    }
    buf[i..].iter().map(|&b| b as char).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_and_base36() {
        let a = new_table_id();
        let b = new_table_id();
        assert_ne!(a, b);
        assert!(a.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }

    #[test]
    fn base36_round_trip() {
        assert_eq!(to_base36(0), "0");
        assert_eq!(to_base36(35), "z");
        assert_eq!(to_base36(36), "10");
        assert_eq!(u128::from_str_radix(&to_base36(123_456_789), 36).unwrap(), 123_456_789);
    }

    #[test]
    fn timestamps_are_rfc3339_utc() {
        let ts = now_iso();
        assert!(ts.ends_with('Z'));
        assert!(chrono::DateTime::parse_from_rfc3339(&ts).is_ok());
    }
}
