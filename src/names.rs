//! Collision-free database name minting.

use chrono::Utc;
use rand::rngs::OsRng;
use rand::RngCore;

use crate::config::DEFAULT_DB_PREFIX;
use crate::error::{Error, Result};

/// Mint a unique database name of the form `{prefix}_{unix_ns}_{rand_hex}`.
///
/// `unix_ns` is the current wall-clock time in nanoseconds and `rand_hex` is
/// 8 lowercase hex characters from the OS random source, so two mints collide
/// with probability below 2^-32 even within the same nanosecond. An empty
/// prefix falls back to `"test"`.
///
/// Example: `test_1699564231000000000_a1b2c3d4`
pub(crate) fn mint(prefix: &str) -> Result<String> {
    let prefix = if prefix.is_empty() {
        DEFAULT_DB_PREFIX
    } else {
        prefix
    };

    // timestamp_nanos_opt is None only for dates outside 1677..=2262
    let unix_ns = Utc::now().timestamp_nanos_opt().unwrap_or_default();

    let mut raw = [0u8; 4];
    OsRng
        .try_fill_bytes(&mut raw)
        .map_err(|source| Error::RandomSourceUnavailable { source })?;

    Ok(format!(
        "{prefix}_{unix_ns}_{:08x}",
        u32::from_be_bytes(raw)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn minted_name_shape() {
        let name = mint("myapp").unwrap();
        assert!(name.starts_with("myapp_"));

        // suffix is exactly 8 lowercase hex characters
        let suffix = name.rsplit('_').next().unwrap();
        assert_eq!(suffix.len(), 8);
        assert!(suffix.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));

        // timestamp is a decimal integer
        let timestamp = name.rsplit('_').nth(1).unwrap();
        assert!(timestamp.parse::<i64>().is_ok());
    }

    #[test]
    fn empty_prefix_defaults_to_test() {
        let name = mint("").unwrap();
        assert!(name.starts_with("test_"));
    }

    #[test]
    fn max_prefix_stays_within_identifier_limit() {
        let prefix = "L".repeat(34);
        let name = mint(&prefix).unwrap();
        assert!(name.len() <= 63, "name too long: {} ({})", name, name.len());
    }

    #[test]
    fn names_are_unique() {
        let mut seen = HashSet::new();
        for _ in 0..10_000 {
            let name = mint("test").unwrap();
            assert!(seen.insert(name.clone()), "duplicate name: {name}");
        }
    }
}
