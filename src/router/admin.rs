//! Admin pages: unanswered queue and answering.

use application::dto::{AdminInquirySummaryDto, InquiryDetailDto};
use axum::Json;
use axum::extract::State;
use axum::response::Redirect;
use domain::inquiry::InquiryId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::middleware::CurrentAdmin;
use crate::router::{Query, Valid};

const QUEUE_PATH: &str = "/cs/admin";

#[derive(Debug, Deserialize)]
pub struct AnswerQuery {
    #[serde(rename = "inquiryId")]
    pub inquiry_id: i64,
}

#[derive(Debug, Serialize, Deserialize, Validate)]
pub struct AnswerBody {
    #[validate(
        length(max = 40000, message = "Answer must be at most 40000 characters."),
        custom(function = "crate::router::not_blank", message = "Answer is required.")
    )]
    pub content: String,
}

/// `GET /cs/admin`: unanswered inquiries, oldest first.
pub async fn queue(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
) -> Result<Json<Vec<AdminInquirySummaryDto>>> {
    Ok(Json(state.inquiries.get_unanswered_inquiries().await?))
}

/// `GET /cs/admin/answer?inquiryId=`: any inquiry, for answering.
pub async fn detail(
    State(state): State<AppState>,
    CurrentAdmin(_): CurrentAdmin,
    Query(query): Query<AnswerQuery>,
) -> Result<Json<InquiryDetailDto>> {
    let detail = state
        .inquiries
        .get_inquiry_detail_for_admin(InquiryId::new(query.inquiry_id))
        .await?;

    Ok(Json(detail))
}

/// `POST /cs/admin/answer?inquiryId=`: set the answer, back to the queue.
pub async fn answer(
    State(state): State<AppState>,
    CurrentAdmin(admin): CurrentAdmin,
    Query(query): Query<AnswerQuery>,
    Valid(body): Valid<AnswerBody>,
) -> Result<Redirect> {
    state
        .inquiries
        .add_answer(InquiryId::new(query.inquiry_id), body.content, &admin)
        .await?;

    Ok(Redirect::to(QUEUE_PATH))
}
