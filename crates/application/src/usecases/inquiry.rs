//! Inquiry lifecycle use case implementation.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use domain::identity::id::UserId;
use domain::identity::user::Principal;
use domain::inquiry::invariants::{validate_content, validate_title};
use domain::inquiry::{Answer, Inquiry, InquiryCategory, InquiryId};

use crate::dto::{
    AdminInquirySummaryDto, AttachmentDto, CreateInquiryRequestDto,
    DATE_FORMAT, DATE_TIME_FORMAT, FileUploadDto, InquiryDetailDto,
    InquirySummaryDto,
};
use crate::error::{ApplicationError, Result};
use crate::ports::inbound::InquiryService;
use crate::ports::outbound::{
    Clock, InquiryRepository, TelemetryPort, UserRepository,
};
use crate::usecases::AttachmentHandler;

/// Inquiry use case service.
pub struct InquiryUseCase {
    inquiry_repo: Arc<dyn InquiryRepository>,
    user_repo: Arc<dyn UserRepository>,
    attachments: Arc<AttachmentHandler>,
    clock: Arc<dyn Clock>,
    telemetry: Arc<dyn TelemetryPort>,
}

impl InquiryUseCase {
    pub fn new(
        inquiry_repo: Arc<dyn InquiryRepository>,
        user_repo: Arc<dyn UserRepository>,
        attachments: Arc<AttachmentHandler>,
        clock: Arc<dyn Clock>,
        telemetry: Arc<dyn TelemetryPort>,
    ) -> Self {
        Self {
            inquiry_repo,
            user_repo,
            attachments,
            clock,
            telemetry,
        }
    }

    async fn find(&self, id: InquiryId) -> Result<Inquiry> {
        self.inquiry_repo
            .find_by_id(id)
            .await?
            .ok_or(ApplicationError::InquiryNotFound(id))
    }

    async fn display_name(&self, id: UserId) -> Result<Option<String>> {
        Ok(self.user_repo.find_by_id(id).await?.map(|user| user.name))
    }

    async fn detail(
        &self,
        id: InquiryId,
        inquiry: Inquiry,
    ) -> Result<InquiryDetailDto> {
        let (answer_content, answer_created_at, answer_admin_name) =
            match inquiry.answer() {
                Some(answer) => (
                    Some(answer.content().to_owned()),
                    Some(answer.created_at().format(DATE_TIME_FORMAT).to_string()),
                    self.display_name(answer.admin()).await?,
                ),
                None => (None, None, None),
            };

        Ok(InquiryDetailDto {
            inquiry_id: id.get(),
            title: inquiry.title().to_owned(),
            category: inquiry.category().label().to_owned(),
            content: inquiry.content().to_owned(),
            created_at: inquiry.created_at().format(DATE_TIME_FORMAT).to_string(),
            answered: inquiry.is_answered(),
            answer_content,
            answer_created_at,
            answer_admin_name,
            attachments: inquiry
                .attachments()
                .iter()
                .map(|file| AttachmentDto {
                    original_filename: file.original_filename().to_owned(),
                    saved_filename: file.saved_filename().to_owned(),
                })
                .collect(),
        })
    }
}

#[async_trait]
impl InquiryService for InquiryUseCase {
    async fn create_inquiry(
        &self,
        customer: &Principal,
        request: CreateInquiryRequestDto,
        files: Vec<FileUploadDto>,
    ) -> Result<InquiryId> {
        require_customer(customer)?;
        validate_title(&request.title)?;
        validate_content(&request.content)?;

        let attachments = self.attachments.store_all(&files).await?;
        let inquiry = Inquiry::new(
            request.title,
            request.content,
            request.category,
            customer.id,
            self.clock.now(),
            attachments.clone(),
        );

        let saved = self
            .inquiry_repo
            .save(inquiry)
            .await
            .and_then(|saved| id_of(&saved));
        let id = match saved {
            Ok(id) => id,
            Err(err) => {
                for file in &attachments {
                    self.attachments.remove(file).await;
                }
                return Err(err);
            },
        };

        self.telemetry
            .record_inquiry_created(id.get(), attachments.len());
        tracing::info!(
            inquiry_id = %id,
            customer = %customer.id,
            attachments = attachments.len(),
            "inquiry created"
        );

        Ok(id)
    }

    async fn get_my_inquiries(
        &self,
        customer: &Principal,
        category: Option<&str>,
    ) -> Result<Vec<InquirySummaryDto>> {
        require_customer(customer)?;

        let inquiries = match category.map(str::trim).filter(|c| !c.is_empty()) {
            None => self.inquiry_repo.find_by_customer(customer.id).await?,
            Some(raw) => match raw.parse::<InquiryCategory>() {
                Ok(category) => {
                    self.inquiry_repo
                        .find_by_customer_and_category(customer.id, category)
                        .await?
                },
                Err(_) => return Ok(Vec::new()),
            },
        };

        inquiries
            .iter()
            .map(|inquiry| {
                Ok(InquirySummaryDto {
                    id: id_of(inquiry)?.get(),
                    title: inquiry.title().to_owned(),
                    category: inquiry.category().label().to_owned(),
                    created_at: inquiry
                        .created_at()
                        .format(DATE_FORMAT)
                        .to_string(),
                    answered: inquiry.is_answered(),
                })
            })
            .collect()
    }

    async fn get_inquiry_detail(
        &self,
        id: InquiryId,
        customer: &Principal,
    ) -> Result<InquiryDetailDto> {
        require_customer(customer)?;

        let inquiry = self.find(id).await?;
        if !inquiry.is_owned_by(customer.id) {
            self.telemetry
                .record_access_denied(id.get(), customer.id.get());
            tracing::warn!(
                inquiry_id = %id,
                user = %customer.id,
                "customer tried to read an inquiry they do not own"
            );
            return Err(ApplicationError::AccessDenied);
        }

        self.detail(id, inquiry).await
    }

    async fn get_unanswered_inquiries(
        &self,
    ) -> Result<Vec<AdminInquirySummaryDto>> {
        let inquiries = self.inquiry_repo.find_unanswered().await?;

        let mut names: HashMap<UserId, String> = HashMap::new();
        let mut summaries = Vec::with_capacity(inquiries.len());
        for inquiry in &inquiries {
            let author = inquiry.customer();
            if !names.contains_key(&author) {
                let name = self.display_name(author).await?.unwrap_or_default();
                names.insert(author, name);
            }

            summaries.push(AdminInquirySummaryDto {
                id: id_of(inquiry)?.get(),
                title: inquiry.title().to_owned(),
                category: inquiry.category().label().to_owned(),
                author_name: names.get(&author).cloned().unwrap_or_default(),
                created_at: inquiry
                    .created_at()
                    .format(DATE_TIME_FORMAT)
                    .to_string(),
            });
        }

        Ok(summaries)
    }

    async fn get_inquiry_detail_for_admin(
        &self,
        id: InquiryId,
    ) -> Result<InquiryDetailDto> {
        let inquiry = self.find(id).await?;
        self.detail(id, inquiry).await
    }

    async fn add_answer(
        &self,
        id: InquiryId,
        content: String,
        admin: &Principal,
    ) -> Result<()> {
        if !admin.is_admin() {
            return Err(ApplicationError::AccessDenied);
        }
        validate_content(&content)?;

        let mut inquiry = self.find(id).await?;
        let previous = inquiry
            .answer_with(Answer::new(content, admin.id, self.clock.now()));

        if let Some(previous) = &previous {
            tracing::warn!(
                inquiry_id = %id,
                previous_admin = %previous.admin(),
                admin = %admin.id,
                "overwriting existing answer"
            );
        }

        self.inquiry_repo.save(inquiry).await?;
        self.telemetry.record_answer_added(id.get(), previous.is_some());
        tracing::info!(inquiry_id = %id, admin = %admin.id, "answer added");

        Ok(())
    }
}

fn require_customer(principal: &Principal) -> Result<()> {
    if principal.is_customer() {
        Ok(())
    } else {
        Err(ApplicationError::AccessDenied)
    }
}

/// Id of an inquiry handed back by the store.
fn id_of(inquiry: &Inquiry) -> Result<InquiryId> {
    inquiry.id().ok_or_else(|| {
        ApplicationError::internal(std::io::Error::other(
            "inquiry store returned an inquiry without id",
        ))
    })
}
