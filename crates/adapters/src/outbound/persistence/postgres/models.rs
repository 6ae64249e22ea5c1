//! Database models for PostgreSQL.

use std::collections::HashMap;

use application::error::{Result, ToInternal};
use chrono::{DateTime, Utc};
use domain::auth::password::PasswordHash;
use domain::identity::id::{LoginId, UserId};
use domain::identity::user::{Role, User};
use domain::inquiry::{Answer, FileInfo, Inquiry, InquiryCategory, InquiryId};
use sqlx::FromRow;

/// User record as stored in the database.
#[derive(Debug, Clone, FromRow)]
pub struct UserRecord {
    pub id: i64,
    pub login_id: String,
    pub password: String,
    pub name: String,
    pub role: String,
}

/// Inquiry row joined with its optional answer.
#[derive(Debug, Clone, FromRow)]
pub struct InquiryRecord {
    pub id: i64,
    pub title: String,
    pub content: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub customer_id: i64,
    pub answer_content: Option<String>,
    pub answer_created_at: Option<DateTime<Utc>>,
    pub answer_admin_id: Option<i64>,
}

/// Attachment record.
#[derive(Debug, Clone, FromRow)]
pub struct AttachmentRecord {
    pub inquiry_id: i64,
    pub original_filename: String,
    pub saved_filename: String,
    pub file_path: String,
}

impl UserRecord {
    /// Convert to a domain [`User`].
    pub fn try_into_user(self) -> Result<User> {
        Ok(User {
            id: Some(UserId::new(self.id)),
            login_id: LoginId::parse(self.login_id).catch()?,
            password: PasswordHash::parse(self.password).catch()?,
            name: self.name,
            role: self.role.parse::<Role>().catch()?,
        })
    }
}

impl InquiryRecord {
    /// Convert to a domain [`Inquiry`], taking its attachments from `files`.
    pub fn try_into_inquiry(
        self,
        files: &mut HashMap<i64, Vec<FileInfo>>,
    ) -> Result<Inquiry> {
        let answer = match (
            self.answer_content,
            self.answer_created_at,
            self.answer_admin_id,
        ) {
            (Some(content), Some(created_at), Some(admin)) => {
                Some(Answer::new(content, UserId::new(admin), created_at))
            },
            _ => None,
        };

        Ok(Inquiry::restore(
            InquiryId::new(self.id),
            self.title,
            self.content,
            self.category.parse::<InquiryCategory>().catch()?,
            self.created_at,
            UserId::new(self.customer_id),
            answer,
            files.remove(&self.id).unwrap_or_default(),
        ))
    }
}

impl From<AttachmentRecord> for FileInfo {
    fn from(record: AttachmentRecord) -> Self {
        FileInfo::new(
            record.original_filename,
            record.saved_filename,
            record.file_path,
        )
    }
}
