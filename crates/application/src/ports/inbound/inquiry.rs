//! Inquiry board use case port.

use async_trait::async_trait;
use domain::identity::user::Principal;
use domain::inquiry::InquiryId;

use crate::dto::{
    AdminInquirySummaryDto, CreateInquiryRequestDto, FileUploadDto,
    InquiryDetailDto, InquirySummaryDto,
};
use crate::error::Result;

/// Inbound port for the inquiry lifecycle.
///
/// Customer operations reject admin principals and vice versa with
/// `ApplicationError::AccessDenied`.
#[async_trait]
pub trait InquiryService: Send + Sync {
    /// Validate and store attachments, then persist a new inquiry.
    async fn create_inquiry(
        &self,
        customer: &Principal,
        request: CreateInquiryRequestDto,
        files: Vec<FileUploadDto>,
    ) -> Result<InquiryId>;

    /// The customer's inquiries, newest first.
    ///
    /// A blank category lists everything; an unknown one lists nothing.
    async fn get_my_inquiries(
        &self,
        customer: &Principal,
        category: Option<&str>,
    ) -> Result<Vec<InquirySummaryDto>>;

    /// Detail of an inquiry owned by `customer`.
    async fn get_inquiry_detail(
        &self,
        id: InquiryId,
        customer: &Principal,
    ) -> Result<InquiryDetailDto>;

    /// Unanswered inquiries, oldest first.
    async fn get_unanswered_inquiries(
        &self,
    ) -> Result<Vec<AdminInquirySummaryDto>>;

    /// Detail of any inquiry, without ownership check.
    async fn get_inquiry_detail_for_admin(
        &self,
        id: InquiryId,
    ) -> Result<InquiryDetailDto>;

    /// Set or overwrite the answer of an inquiry.
    async fn add_answer(
        &self,
        id: InquiryId,
        content: String,
        admin: &Principal,
    ) -> Result<()>;
}
