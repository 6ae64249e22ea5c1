//! Inquiry domain entity.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::identity::id::UserId;
use crate::inquiry::answer::Answer;
use crate::inquiry::category::InquiryCategory;
use crate::inquiry::file::FileInfo;

/// Store-assigned identifier of an inquiry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct InquiryId(i64);

impl InquiryId {
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    #[inline]
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for InquiryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A customer-submitted support ticket.
///
/// Owner, creation time and attachments are fixed at construction; the
/// answer slot is the only part that changes afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct Inquiry {
    id: Option<InquiryId>,
    title: String,
    content: String,
    category: InquiryCategory,
    created_at: DateTime<Utc>,
    customer: UserId,
    answer: Option<Answer>,
    attachments: Vec<FileInfo>,
}

impl Inquiry {
    /// Create a new, unsaved and unanswered [`Inquiry`].
    pub fn new(
        title: impl Into<String>,
        content: impl Into<String>,
        category: InquiryCategory,
        customer: UserId,
        created_at: DateTime<Utc>,
        attachments: Vec<FileInfo>,
    ) -> Self {
        Self {
            id: None,
            title: title.into(),
            content: content.into(),
            category,
            created_at,
            customer,
            answer: None,
            attachments,
        }
    }

    /// Rebuild a persisted [`Inquiry`] from storage.
    #[allow(clippy::too_many_arguments)]
    pub fn restore(
        id: InquiryId,
        title: String,
        content: String,
        category: InquiryCategory,
        created_at: DateTime<Utc>,
        customer: UserId,
        answer: Option<Answer>,
        attachments: Vec<FileInfo>,
    ) -> Self {
        Self {
            id: Some(id),
            title,
            content,
            category,
            created_at,
            customer,
            answer,
            attachments,
        }
    }

    /// Assign the store identifier. Only stores call this, once.
    pub fn with_id(mut self, id: InquiryId) -> Self {
        self.id = Some(id);
        self
    }

    /// Set the answer, returning the one it replaces.
    pub fn answer_with(&mut self, answer: Answer) -> Option<Answer> {
        self.answer.replace(answer)
    }

    pub fn id(&self) -> Option<InquiryId> {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn category(&self) -> InquiryCategory {
        self.category
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn customer(&self) -> UserId {
        self.customer
    }

    pub fn answer(&self) -> Option<&Answer> {
        self.answer.as_ref()
    }

    pub fn attachments(&self) -> &[FileInfo] {
        &self.attachments
    }

    #[inline]
    pub fn is_answered(&self) -> bool {
        self.answer.is_some()
    }

    /// Ownership is decided by user identity only.
    #[inline]
    pub fn is_owned_by(&self, user: UserId) -> bool {
        self.customer == user
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inquiry() -> Inquiry {
        Inquiry::new(
            "Shipping delayed",
            "Three days and still nothing.",
            InquiryCategory::Complaint,
            UserId::new(1),
            Utc::now(),
            vec![FileInfo::new("img.png", "uuid_img.png", "uploads/uuid_img.png")],
        )
    }

    #[test]
    fn test_new_inquiry_is_unanswered() {
        let inquiry = inquiry();
        assert!(inquiry.id().is_none());
        assert!(!inquiry.is_answered());
        assert_eq!(inquiry.attachments().len(), 1);
        assert!(inquiry.is_owned_by(UserId::new(1)));
        assert!(!inquiry.is_owned_by(UserId::new(2)));
    }

    #[test]
    fn test_answer_with_overwrites() {
        let mut inquiry = inquiry();
        let first = Answer::new("first", UserId::new(9), Utc::now());
        let second = Answer::new("second", UserId::new(9), Utc::now());

        assert!(inquiry.answer_with(first.clone()).is_none());
        assert_eq!(inquiry.answer_with(second), Some(first));
        assert_eq!(inquiry.answer().map(Answer::content), Some("second"));
        assert!(inquiry.is_answered());
    }
}
