//! Closed set of inquiry categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InquiryCategory {
    Complaint,
    Proposal,
    RefundExchange,
    Compliment,
    Other,
}

impl InquiryCategory {
    /// Every category, in display order.
    pub const ALL: [InquiryCategory; 5] = [
        Self::Complaint,
        Self::Proposal,
        Self::RefundExchange,
        Self::Compliment,
        Self::Other,
    ];

    /// Stable code, used on the wire and in storage.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Complaint => "COMPLAINT",
            Self::Proposal => "PROPOSAL",
            Self::RefundExchange => "REFUND_EXCHANGE",
            Self::Compliment => "COMPLIMENT",
            Self::Other => "OTHER",
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Complaint => "Complaint",
            Self::Proposal => "Proposal",
            Self::RefundExchange => "Refund/Exchange",
            Self::Compliment => "Compliment",
            Self::Other => "Other inquiry",
        }
    }
}

impl FromStr for InquiryCategory {
    type Err = DomainError;

    /// Case-insensitive match against [`InquiryCategory::code`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|category| category.code().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::UnknownCategory(s.to_owned()))
    }
}

impl fmt::Display for InquiryCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "complaint".parse::<InquiryCategory>().unwrap(),
            InquiryCategory::Complaint
        );
        assert_eq!(
            "Refund_Exchange".parse::<InquiryCategory>().unwrap(),
            InquiryCategory::RefundExchange
        );
        assert_eq!(
            " OTHER ".parse::<InquiryCategory>().unwrap(),
            InquiryCategory::Other
        );
    }

    #[test]
    fn test_parse_unknown() {
        let err = "shipping".parse::<InquiryCategory>().unwrap_err();
        assert!(matches!(err, DomainError::UnknownCategory(s) if s == "shipping"));
        assert!("".parse::<InquiryCategory>().is_err());
    }

    #[test]
    fn test_display_uses_code() {
        for category in InquiryCategory::ALL {
            assert_eq!(category.to_string(), category.code());
            assert_eq!(category.code().parse::<InquiryCategory>().unwrap(), category);
        }
        assert_eq!(InquiryCategory::RefundExchange.label(), "Refund/Exchange");
    }
}
