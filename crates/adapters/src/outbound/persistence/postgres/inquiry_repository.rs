//! PostgreSQL implementation for inquiry repository.

use std::collections::HashMap;

use application::error::{ApplicationError, Result, ToInternal};
use application::ports::outbound::InquiryRepository;
use async_trait::async_trait;
use domain::identity::id::UserId;
use domain::inquiry::{FileInfo, Inquiry, InquiryCategory, InquiryId};
use sqlx::PgPool;

use super::models::{AttachmentRecord, InquiryRecord};

const SELECT_INQUIRY: &str = r#"
    SELECT
        i.id, i.title, i.content, i.category, i.created_at, i.customer_id,
        a.content AS answer_content,
        a.created_at AS answer_created_at,
        a.admin_id AS answer_admin_id
    FROM inquiries i
    LEFT JOIN answers a ON a.inquiry_id = i.id
"#;

/// PostgreSQL inquiry repository.
pub struct PgInquiryRepository {
    pool: PgPool,
}

impl PgInquiryRepository {
    /// Create a new [`PgInquiryRepository`].
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Attach files to already fetched rows, preserving row order.
    async fn hydrate(&self, records: Vec<InquiryRecord>) -> Result<Vec<Inquiry>> {
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<i64> = records.iter().map(|r| r.id).collect();
        let attachments = sqlx::query_as::<_, AttachmentRecord>(
            r#"
            SELECT inquiry_id, original_filename, saved_filename, file_path
            FROM attachments
            WHERE inquiry_id = ANY($1)
            ORDER BY id
            "#,
        )
        .bind(&ids)
        .fetch_all(&self.pool)
        .await
        .catch()?;

        let mut files: HashMap<i64, Vec<FileInfo>> = HashMap::new();
        for attachment in attachments {
            files
                .entry(attachment.inquiry_id)
                .or_default()
                .push(attachment.into());
        }

        records
            .into_iter()
            .map(|record| record.try_into_inquiry(&mut files))
            .collect()
    }
}

#[async_trait]
impl InquiryRepository for PgInquiryRepository {
    async fn save(&self, inquiry: Inquiry) -> Result<Inquiry> {
        let mut tx = self.pool.begin().await.catch()?;

        let id = match inquiry.id() {
            Some(id) => {
                // Owner, creation time and attachments never change.
                let updated = sqlx::query(
                    r#"
                    UPDATE inquiries
                    SET title = $2, content = $3, category = $4
                    WHERE id = $1
                    "#,
                )
                .bind(id.get())
                .bind(inquiry.title())
                .bind(inquiry.content())
                .bind(inquiry.category().code())
                .execute(&mut *tx)
                .await
                .catch()?;

                if updated.rows_affected() == 0 {
                    return Err(ApplicationError::InquiryNotFound(id));
                }

                id
            },
            None => {
                let id: i64 = sqlx::query_scalar(
                    r#"
                    INSERT INTO inquiries (title, content, category, created_at, customer_id)
                    VALUES ($1, $2, $3, $4, $5)
                    RETURNING id
                    "#,
                )
                .bind(inquiry.title())
                .bind(inquiry.content())
                .bind(inquiry.category().code())
                .bind(inquiry.created_at())
                .bind(inquiry.customer().get())
                .fetch_one(&mut *tx)
                .await
                .catch()?;

                for file in inquiry.attachments() {
                    sqlx::query(
                        r#"
                        INSERT INTO attachments (inquiry_id, original_filename, saved_filename, file_path)
                        VALUES ($1, $2, $3, $4)
                        "#,
                    )
                    .bind(id)
                    .bind(file.original_filename())
                    .bind(file.saved_filename())
                    .bind(file.file_path())
                    .execute(&mut *tx)
                    .await
                    .catch()?;
                }

                InquiryId::new(id)
            },
        };
        let inquiry = inquiry.with_id(id);
        let id = id.get();

        match inquiry.answer() {
            Some(answer) => {
                sqlx::query(
                    r#"
                    INSERT INTO answers (inquiry_id, content, created_at, admin_id)
                    VALUES ($1, $2, $3, $4)
                    ON CONFLICT (inquiry_id) DO UPDATE
                    SET
                        content = EXCLUDED.content,
                        created_at = EXCLUDED.created_at,
                        admin_id = EXCLUDED.admin_id
                    "#,
                )
                .bind(id)
                .bind(answer.content())
                .bind(answer.created_at())
                .bind(answer.admin().get())
                .execute(&mut *tx)
                .await
                .catch()?;
            },
            None => {
                sqlx::query("DELETE FROM answers WHERE inquiry_id = $1")
                    .bind(id)
                    .execute(&mut *tx)
                    .await
                    .catch()?;
            },
        }

        tx.commit().await.catch()?;

        Ok(inquiry)
    }

    async fn find_by_id(&self, id: InquiryId) -> Result<Option<Inquiry>> {
        let record = sqlx::query_as::<_, InquiryRecord>(&format!(
            "{SELECT_INQUIRY} WHERE i.id = $1"
        ))
        .bind(id.get())
        .fetch_optional(&self.pool)
        .await
        .catch()?;

        Ok(self.hydrate(record.into_iter().collect()).await?.pop())
    }

    async fn find_by_customer(&self, customer: UserId) -> Result<Vec<Inquiry>> {
        let records = sqlx::query_as::<_, InquiryRecord>(&format!(
            "{SELECT_INQUIRY} WHERE i.customer_id = $1 ORDER BY i.created_at DESC, i.id"
        ))
        .bind(customer.get())
        .fetch_all(&self.pool)
        .await
        .catch()?;

        self.hydrate(records).await
    }

    async fn find_by_customer_and_category(
        &self,
        customer: UserId,
        category: InquiryCategory,
    ) -> Result<Vec<Inquiry>> {
        let records = sqlx::query_as::<_, InquiryRecord>(&format!(
            "{SELECT_INQUIRY} WHERE i.customer_id = $1 AND i.category = $2 \
             ORDER BY i.created_at DESC, i.id"
        ))
        .bind(customer.get())
        .bind(category.code())
        .fetch_all(&self.pool)
        .await
        .catch()?;

        self.hydrate(records).await
    }

    async fn find_unanswered(&self) -> Result<Vec<Inquiry>> {
        let records = sqlx::query_as::<_, InquiryRecord>(&format!(
            "{SELECT_INQUIRY} WHERE a.inquiry_id IS NULL ORDER BY i.created_at, i.id"
        ))
        .fetch_all(&self.pool)
        .await
        .catch()?;

        self.hydrate(records).await
    }
}
