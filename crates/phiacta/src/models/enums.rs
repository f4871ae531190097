//! Enumeration types for API fields and command parameters.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ParseEnumError;

/// Output format for command responses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseFormat {
    /// Human-readable Markdown format.
    #[default]
    Markdown,
    /// Machine-readable JSON format.
    Json,
}

impl FromStr for ResponseFormat {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            _ => Err(ParseEnumError::new("format", s)),
        }
    }
}

/// Kind of scientific claim.
///
/// Unknown kinds coming from the API are preserved in [`ClaimType::Other`]
/// rather than rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ClaimType {
    #[default]
    Assertion,
    Definition,
    Theorem,
    Proof,
    Evidence,
    Conjecture,
    Refutation,
    Other(String),
}

impl ClaimType {
    /// Kinds a contributor can choose when submitting.
    pub const SUBMITTABLE: [Self; 7] = [
        Self::Assertion,
        Self::Definition,
        Self::Theorem,
        Self::Proof,
        Self::Evidence,
        Self::Conjecture,
        Self::Refutation,
    ];

    /// Wire name of this kind.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Assertion => "assertion",
            Self::Definition => "definition",
            Self::Theorem => "theorem",
            Self::Proof => "proof",
            Self::Evidence => "evidence",
            Self::Conjecture => "conjecture",
            Self::Refutation => "refutation",
            Self::Other(other) => other,
        }
    }
}

impl From<String> for ClaimType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "assertion" => Self::Assertion,
            "definition" => Self::Definition,
            "theorem" => Self::Theorem,
            "proof" => Self::Proof,
            "evidence" => Self::Evidence,
            "conjecture" => Self::Conjecture,
            "refutation" => Self::Refutation,
            _ => Self::Other(value),
        }
    }
}

impl From<ClaimType> for String {
    fn from(value: ClaimType) -> Self {
        match value {
            ClaimType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl FromStr for ClaimType {
    type Err = ParseEnumError;

    /// Parse a user-supplied kind; only the submittable kinds are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match Self::from(s.trim().to_ascii_lowercase()) {
            Self::Other(_) => Err(ParseEnumError::new("claim type", s)),
            known => Ok(known),
        }
    }
}

impl fmt::Display for ClaimType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reviewer verdict on a claim.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    #[default]
    Endorse,
    Dispute,
    Neutral,
}

impl Verdict {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Endorse => "endorse",
            Self::Dispute => "dispute",
            Self::Neutral => "neutral",
        }
    }
}

impl FromStr for Verdict {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "endorse" => Ok(Self::Endorse),
            "dispute" => Ok(Self::Dispute),
            "neutral" => Ok(Self::Neutral),
            _ => Err(ParseEnumError::new("verdict", s)),
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How far a claim's attached code has been verified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum VerificationLevel {
    Unverified,
    SyntaxVerified,
    ExecutionVerified,
    OutputVerifiedDeterministic,
    OutputVerifiedStatistical,
    IndependentlyReplicated,
    FormallyProven,
}

impl VerificationLevel {
    /// Parse the API's level code (e.g. `L2_EXECUTION_VERIFIED`).
    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "L0_UNVERIFIED" => Some(Self::Unverified),
            "L1_SYNTAX_VERIFIED" => Some(Self::SyntaxVerified),
            "L2_EXECUTION_VERIFIED" => Some(Self::ExecutionVerified),
            "L3_OUTPUT_VERIFIED_DETERMINISTIC" => Some(Self::OutputVerifiedDeterministic),
            "L4_OUTPUT_VERIFIED_STATISTICAL" => Some(Self::OutputVerifiedStatistical),
            "L5_INDEPENDENTLY_REPLICATED" => Some(Self::IndependentlyReplicated),
            "L6_FORMALLY_PROVEN" => Some(Self::FormallyProven),
            _ => None,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Unverified => "Unverified",
            Self::SyntaxVerified => "Syntax Verified",
            Self::ExecutionVerified => "Execution Verified",
            Self::OutputVerifiedDeterministic => "Output Matched (Deterministic)",
            Self::OutputVerifiedStatistical => "Output Matched (Statistical)",
            Self::IndependentlyReplicated => "Independently Replicated",
            Self::FormallyProven => "Formally Proven",
        }
    }
}

/// Badge text for a verification level/status pair.
///
/// Returns `None` when neither is known. Unknown level codes are shown as-is.
#[must_use]
pub fn verification_badge(level: Option<&str>, status: Option<&str>) -> Option<String> {
    if level.is_none() && status.is_none() {
        return None;
    }

    let label = match level {
        Some(code) => match VerificationLevel::from_code(code) {
            Some(known) => known.label(),
            None => code,
        },
        None => "Unknown",
    };
    let suffix = match status {
        Some("pending") => " (Pending)",
        Some("failed") => " (Failed)",
        _ => "",
    };

    Some(format!("{label}{suffix}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_claim_type_roundtrips_unknown() {
        let parsed: ClaimType = serde_json::from_value(serde_json::json!("lemma")).unwrap();
        assert_eq!(parsed, ClaimType::Other("lemma".to_string()));
        assert_eq!(serde_json::to_value(&parsed).unwrap(), "lemma");
    }

    #[test]
    fn test_claim_type_from_str_rejects_unknown() {
        assert_eq!("Theorem".parse::<ClaimType>().unwrap(), ClaimType::Theorem);
        assert!("lemma".parse::<ClaimType>().is_err());
    }

    #[test]
    fn test_verification_badge() {
        assert_eq!(verification_badge(None, None), None);
        assert_eq!(
            verification_badge(Some("L6_FORMALLY_PROVEN"), None).as_deref(),
            Some("Formally Proven")
        );
        assert_eq!(
            verification_badge(Some("L1_SYNTAX_VERIFIED"), Some("pending")).as_deref(),
            Some("Syntax Verified (Pending)")
        );
        assert_eq!(verification_badge(None, Some("failed")).as_deref(), Some("Unknown (Failed)"));
        assert_eq!(verification_badge(Some("L9_CUSTOM"), None).as_deref(), Some("L9_CUSTOM"));
    }

    #[test]
    fn test_verification_badge_borrowed_level() {
        let level = String::from("L2_EXECUTION_VERIFIED");
        let unknown = String::from("L7_PEER_CHECKED");
        assert_eq!(
            verification_badge(Some(level.as_str()), Some("failed")).as_deref(),
            Some("Execution Verified (Failed)")
        );
        assert_eq!(
            verification_badge(Some(unknown.as_str()), None).as_deref(),
            Some("L7_PEER_CHECKED")
        );
    }
}
