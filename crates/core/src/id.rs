//! Strongly-typed identifiers used across the portal.
//!
//! The directory service issues opaque string identifiers (document ids), so
//! these wrap a trimmed, non-empty `String` rather than a UUID.

use core::str::FromStr;
use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Identifier of a branch (campus/location a user account is scoped to).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BranchId(String);

/// Identifier of a student document.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StudentId(String);

macro_rules! impl_string_newtype {
    ($t:ty, $name:literal) => {
        impl $t {
            /// Parse an identifier, trimming surrounding whitespace.
            ///
            /// Blank input is rejected.
            pub fn parse(raw: &str) -> Result<Self, DomainError> {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    return Err(DomainError::invalid_id(format!("{} must not be blank", $name)));
                }
                Ok(Self(trimmed.to_string()))
            }

            /// Parse an optional raw value, mapping blank input to `None`.
            pub fn parse_optional(raw: Option<&str>) -> Option<Self> {
                raw.and_then(|s| Self::parse(s).ok())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl core::fmt::Display for $t {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl FromStr for $t {
            type Err = DomainError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl AsRef<str> for $t {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }
    };
}

impl_string_newtype!(BranchId, "BranchId");
impl_string_newtype!(StudentId, "StudentId");

/// Opaque invite credential issued out-of-band.
///
/// The directory service reserves `"-1"` to mean "no invite, manual setup".
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InviteToken(String);

impl InviteToken {
    /// Sentinel value sent when the user sets up their account manually.
    pub const MANUAL_SENTINEL: &'static str = "-1";

    /// Parse a user-supplied token. Returns `None` for blank input or the
    /// manual sentinel.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == Self::MANUAL_SENTINEL {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn manual() -> Self {
        Self(Self::MANUAL_SENTINEL.to_string())
    }

    pub fn is_manual(&self) -> bool {
        self.0 == Self::MANUAL_SENTINEL
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

// Tokens are credentials; keep them out of logs.
impl core::fmt::Debug for InviteToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.is_manual() {
            f.write_str("InviteToken(manual)")
        } else {
            f.write_str("InviteToken(***)")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_id_is_trimmed() {
        let id = BranchId::parse("  branch_001 ").unwrap();
        assert_eq!(id.as_str(), "branch_001");
    }

    #[test]
    fn blank_branch_id_is_rejected() {
        let err = BranchId::parse("   ").unwrap_err();
        assert!(matches!(err, DomainError::InvalidId(msg) if msg.contains("BranchId")));
        assert_eq!(BranchId::parse_optional(Some("")), None);
        assert_eq!(BranchId::parse_optional(None), None);
    }

    #[test]
    fn invite_token_treats_sentinel_as_absent() {
        assert!(InviteToken::parse("-1").is_none());
        assert!(InviteToken::parse(" -1 ").is_none());
        assert!(InviteToken::parse("").is_none());
        assert_eq!(InviteToken::parse(" abc ").unwrap().as_str(), "abc");
        assert!(InviteToken::manual().is_manual());
    }

    #[test]
    fn invite_token_debug_is_redacted() {
        let token = InviteToken::parse("secret-value").unwrap();
        assert!(!format!("{token:?}").contains("secret-value"));
    }

    #[test]
    fn ids_round_trip_as_plain_json_strings() {
        let id: StudentId = serde_json::from_str("\"stu_42\"").unwrap();
        assert_eq!(id.as_str(), "stu_42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"stu_42\"");
    }
}
