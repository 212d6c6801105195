//! Random identifiers and payloads for seeded documents

use once_cell::sync::Lazy;
use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Length of every generated identifier
pub const IDENTIFIER_LENGTH: usize = 32;

/// Symbols used for identifiers and payloads
pub const CHARSET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

// One generator for the whole process, seeded from OS entropy on first use.
// Not suitable for anything security related.
static RNG: Lazy<Mutex<StdRng>> = Lazy::new(|| Mutex::new(StdRng::from_os_rng()));

fn random_string(len: usize) -> String {
    let mut rng = RNG.lock();
    (0..len)
        .map(|_| char::from(CHARSET[rng.random_range(0..CHARSET.len())]))
        .collect()
}

/// A fresh 32-character alphanumeric identifier
pub fn generate_identifier() -> String {
    random_string(IDENTIFIER_LENGTH)
}

/// Filler of exactly `size_kb * 1024` characters
pub fn generate_payload(size_kb: u32) -> String {
    random_string(size_kb as usize * 1024)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn in_charset(s: &str) -> bool {
        s.bytes().all(|b| CHARSET.contains(&b))
    }

    #[test]
    fn charset_has_62_distinct_symbols() {
        let distinct: HashSet<_> = CHARSET.iter().collect();
        assert_eq!(distinct.len(), 62);
    }

    #[test]
    fn empty_payload_for_zero_kb() {
        assert_eq!(generate_payload(0), "");
    }

    #[test]
    fn identifiers_do_not_repeat_in_practice() {
        let ids: HashSet<_> = (0..1_000).map(|_| generate_identifier()).collect();
        assert_eq!(ids.len(), 1_000);
    }

    proptest! {
        #[test]
        fn identifiers_are_32_charset_symbols(_seed in any::<u8>()) {
            let id = generate_identifier();
            prop_assert_eq!(id.len(), IDENTIFIER_LENGTH);
            prop_assert!(in_charset(&id));
        }

        #[test]
        fn payload_length_is_exact(size_kb in 0u32..16) {
            let payload = generate_payload(size_kb);
            prop_assert_eq!(payload.len(), size_kb as usize * 1024);
            prop_assert!(in_charset(&payload));
        }
    }
}
