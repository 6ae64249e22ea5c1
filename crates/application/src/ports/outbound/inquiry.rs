//! Inquiry repository port.

use async_trait::async_trait;
use domain::identity::id::UserId;
use domain::inquiry::{Inquiry, InquiryCategory, InquiryId};

use crate::error::Result;

/// Port for inquiry persistence operations.
///
/// Lists are sorted on `created_at`; equal timestamps keep id order.
#[async_trait]
pub trait InquiryRepository: Send + Sync {
    /// Upsert: assigns an id when absent, otherwise overwrites that record.
    async fn save(&self, inquiry: Inquiry) -> Result<Inquiry>;

    /// Find an inquiry by id.
    async fn find_by_id(&self, id: InquiryId) -> Result<Option<Inquiry>>;

    /// Inquiries owned by `customer`, newest first.
    async fn find_by_customer(&self, customer: UserId) -> Result<Vec<Inquiry>>;

    /// Inquiries owned by `customer` in `category`, newest first.
    async fn find_by_customer_and_category(
        &self,
        customer: UserId,
        category: InquiryCategory,
    ) -> Result<Vec<Inquiry>>;

    /// Inquiries without an answer, oldest first.
    async fn find_unanswered(&self) -> Result<Vec<Inquiry>>;
}
