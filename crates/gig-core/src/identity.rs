//! Participant identities.
//!
//! An [`Address`] is an opaque, comparable token for an employer or a
//! freelancer (a wallet-address equivalent). Addresses are normalized
//! exactly once, at construction: `parse` validates the hex form and
//! lowercases it, so every later comparison is plain exact equality.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Length of an address in raw bytes.
const ADDRESS_BYTES: usize = 20;

/// A participant address (lowercase `0x`-prefixed hex, 20 bytes).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address(String);

impl Address {
    /// Parse and normalize an address from its hex string form.
    ///
    /// Accepts mixed-case input and stores the lowercase form, so two
    /// addresses that differ only in case compare equal afterwards.
    ///
    /// # Errors
    ///
    /// Returns error if the string is not `0x` followed by 40 hex digits.
    pub fn parse(s: &str) -> Result<Self> {
        let hex = s
            .strip_prefix("0x")
            .or_else(|| s.strip_prefix("0X"))
            .ok_or_else(|| CoreError::invalid_address("address must start with 0x"))?;

        if hex.len() != ADDRESS_BYTES * 2 {
            return Err(CoreError::invalid_address(format!(
                "address must be {} hex digits, got {}",
                ADDRESS_BYTES * 2,
                hex.len()
            )));
        }

        if let Some(bad) = hex.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(CoreError::invalid_address(format!(
                "invalid hex digit '{bad}'"
            )));
        }

        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    /// Create an address from raw bytes.
    #[must_use]
    pub fn from_bytes(bytes: &[u8; ADDRESS_BYTES]) -> Self {
        let mut s = String::with_capacity(2 + ADDRESS_BYTES * 2);
        s.push_str("0x");
        for byte in bytes {
            use std::fmt::Write;
            // Writing to a String cannot fail.
            let _ = write!(s, "{byte:02x}");
        }
        Self(s)
    }

    /// Get the normalized address string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Address {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MIXED: &str = "0xAb5801a7D398351b8bE11C439e05C5B3259aeC9B";
    const LOWER: &str = "0xab5801a7d398351b8be11c439e05c5b3259aec9b";

    #[test]
    fn test_parse_normalizes_case() {
        let a = Address::parse(MIXED).expect("parse mixed");
        let b = Address::parse(LOWER).expect("parse lower");
        assert_eq!(a, b);
        assert_eq!(a.as_str(), LOWER);
    }

    #[test]
    fn test_parse_rejects_missing_prefix() {
        let result = Address::parse("ab5801a7d398351b8be11c439e05c5b3259aec9b");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_rejects_wrong_length() {
        assert!(Address::parse("0xabcd").is_err());
        assert!(Address::parse(&format!("{LOWER}00")).is_err());
    }

    #[test]
    fn test_parse_rejects_non_hex() {
        let result = Address::parse("0xzz5801a7d398351b8be11c439e05c5b3259aec9b");
        assert!(result.is_err());
    }

    #[test]
    fn test_from_bytes() {
        let addr = Address::from_bytes(&[0xab; 20]);
        assert_eq!(addr.as_str(), format!("0x{}", "ab".repeat(20)));
    }

    #[test]
    fn test_display() {
        let addr = Address::parse(MIXED).expect("parse");
        assert_eq!(format!("{addr}"), LOWER);
    }

    #[test]
    fn test_serialization() {
        let addr = Address::parse(MIXED).expect("parse");
        let json = serde_json::to_string(&addr).expect("serialize");
        let parsed: Address = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(addr, parsed);
    }
}
