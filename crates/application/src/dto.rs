//! Data Transfer Objects for the application layer.
//!
//! DTOs are used to transfer data between layers without exposing domain
//! entities.

use domain::inquiry::InquiryCategory;
use serde::Serialize;

/// Day precision, used in customer lists.
pub const DATE_FORMAT: &str = "%Y-%m-%d";
/// Minute precision, used in details and the admin queue.
pub const DATE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Request DTO for authentication.
#[derive(Debug, Clone)]
pub struct AuthRequestDto {
    /// Login identifier, case-sensitive.
    pub login_id: String,
    /// Password.
    pub password: String,
}

/// Request DTO for inquiry creation.
#[derive(Debug, Clone)]
pub struct CreateInquiryRequestDto {
    pub title: String,
    pub content: String,
    pub category: InquiryCategory,
}

/// One uploaded file, as received by the boundary.
#[derive(Debug, Clone, Default)]
pub struct FileUploadDto {
    /// Client-supplied filename, possibly a full path.
    pub filename: Option<String>,
    /// Declared MIME type.
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl FileUploadDto {
    /// An upload field left blank by the client.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

/// Row of a customer's own inquiry list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InquirySummaryDto {
    pub id: i64,
    pub title: String,
    /// Category label.
    pub category: String,
    /// `YYYY-MM-DD`.
    pub created_at: String,
    pub answered: bool,
}

/// Row of the admin queue of unanswered inquiries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AdminInquirySummaryDto {
    pub id: i64,
    pub title: String,
    /// Category label.
    pub category: String,
    /// Display name of the customer.
    pub author_name: String,
    /// `YYYY-MM-DD HH:MM`.
    pub created_at: String,
}

/// Attachment reference shown in a detail view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AttachmentDto {
    pub original_filename: String,
    pub saved_filename: String,
}

/// Full view of one inquiry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InquiryDetailDto {
    pub inquiry_id: i64,
    pub title: String,
    /// Category label.
    pub category: String,
    pub content: String,
    pub created_at: String,
    pub answered: bool,
    pub answer_content: Option<String>,
    pub answer_created_at: Option<String>,
    pub answer_admin_name: Option<String>,
    pub attachments: Vec<AttachmentDto>,
}

/// Category choice offered by the inquiry form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryDto {
    pub code: &'static str,
    pub label: &'static str,
}

impl From<InquiryCategory> for CategoryDto {
    fn from(category: InquiryCategory) -> Self {
        Self {
            code: category.code(),
            label: category.label(),
        }
    }
}
