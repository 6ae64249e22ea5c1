//! Customer pages: own inquiries, inquiry form and detail.

use application::dto::{
    CategoryDto, CreateInquiryRequestDto, FileUploadDto, InquiryDetailDto,
    InquirySummaryDto,
};
use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use domain::inquiry::{InquiryCategory, InquiryId};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::AppState;
use crate::error::Result;
use crate::middleware::CurrentCustomer;
use crate::router::{Path, Query, field_error};

const FILES_FIELD: &str = "files";

#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub category: Option<String>,
}

/// `GET /cs`: the customer's inquiries, newest first.
pub async fn list(
    State(state): State<AppState>,
    CurrentCustomer(customer): CurrentCustomer,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<InquirySummaryDto>>> {
    let inquiries = state
        .inquiries
        .get_my_inquiries(&customer, query.category.as_deref())
        .await?;

    Ok(Json(inquiries))
}

#[derive(Debug, Serialize)]
pub struct Form {
    pub categories: Vec<CategoryDto>,
    pub max_upload_size: usize,
}

/// `GET /cs/inquiry`: what the inquiry form accepts.
pub async fn form(
    State(state): State<AppState>,
    CurrentCustomer(_): CurrentCustomer,
) -> Json<Form> {
    Json(Form {
        categories: InquiryCategory::ALL.into_iter().map(CategoryDto::from).collect(),
        max_upload_size: state.config.max_upload_size,
    })
}

/// Text fields of the multipart inquiry form.
#[derive(Debug, Default, Validate)]
pub struct InquiryForm {
    #[validate(
        length(
            min = 2,
            max = 200,
            message = "Title must be between 2 and 200 characters."
        ),
        custom(function = "crate::router::not_blank", message = "Title is required.")
    )]
    pub title: String,
    #[validate(
        length(max = 40000, message = "Content must be at most 40000 characters."),
        custom(function = "crate::router::not_blank", message = "Content is required.")
    )]
    pub content: String,
    #[validate(required(message = "Category is required."))]
    pub category: Option<String>,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Created {
    pub id: InquiryId,
}

/// `POST /cs/inquiry`: multipart `title`, `content`, `category` and any
/// number of `files`.
pub async fn create(
    State(state): State<AppState>,
    CurrentCustomer(customer): CurrentCustomer,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Created>)> {
    let mut form = InquiryForm::default();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_owned();
        match name.as_str() {
            "title" => form.title = field.text().await?,
            "content" => form.content = field.text().await?,
            "category" => form.category = Some(field.text().await?),
            FILES_FIELD => {
                let filename = field.file_name().map(str::to_owned);
                let content_type = field.content_type().map(str::to_owned);
                let bytes = field.bytes().await?.to_vec();
                files.push(FileUploadDto {
                    filename,
                    content_type,
                    bytes,
                });
            },
            other => tracing::debug!(field = other, "ignoring unknown form field"),
        }
    }

    form.validate()?;
    let category = form
        .category
        .as_deref()
        .unwrap_or_default()
        .parse::<InquiryCategory>()
        .map_err(|_| field_error("category", "Unknown category."))?;

    let id = state
        .inquiries
        .create_inquiry(
            &customer,
            CreateInquiryRequestDto {
                title: form.title,
                content: form.content,
                category,
            },
            files,
        )
        .await?;

    Ok((StatusCode::CREATED, Json(Created { id })))
}

/// `GET /cs/inquiry/{id}`: detail of one of the customer's inquiries.
pub async fn detail(
    State(state): State<AppState>,
    CurrentCustomer(customer): CurrentCustomer,
    Path(id): Path<i64>,
) -> Result<Json<InquiryDetailDto>> {
    let detail = state
        .inquiries
        .get_inquiry_detail(InquiryId::new(id), &customer)
        .await?;

    Ok(Json(detail))
}

#[cfg(test)]
mod tests {
    use axum::http::{Method, header};
    use http_body_util::BodyExt;
    use serde_json::Value;

    use super::*;
    use crate::tests::{Part, TestApp};

    async fn json(response: axum::response::Response) -> Value {
        let body = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&body).unwrap()
    }

    fn text_parts(title: &str, category: &str) -> Vec<Part> {
        vec![
            Part::text("title", title),
            Part::text("content", "The box arrived crushed."),
            Part::text("category", category),
        ]
    }

    #[tokio::test]
    async fn test_requires_session() {
        let app = TestApp::new().await;

        let response = app.get("/cs", None).await;
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/cs/login");
    }

    #[tokio::test]
    async fn test_admin_is_forbidden() {
        let app = TestApp::new().await;
        let cookie = app.login("a1234").await;

        let response = app.get("/cs", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[tokio::test]
    async fn test_seeded_inquiry_is_listed() {
        let app = TestApp::new().await;
        let cookie = app.login("c1234").await;

        let list = json(app.get("/cs", Some(&cookie)).await).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(list[0]["category"], "Complaint");
        assert_eq!(list[0]["answered"], false);

        let list = json(app.get("/cs?category=proposal", Some(&cookie)).await).await;
        assert!(list.as_array().unwrap().is_empty());

        let list = json(app.get("/cs?category=nonsense", Some(&cookie)).await).await;
        assert!(list.as_array().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_form_lists_categories() {
        let app = TestApp::new().await;
        let cookie = app.login("c1234").await;

        let form = json(app.get("/cs/inquiry", Some(&cookie)).await).await;
        assert_eq!(form["categories"].as_array().unwrap().len(), 5);
        assert_eq!(form["categories"][2]["label"], "Refund/Exchange");
    }

    #[tokio::test]
    async fn test_create_with_attachment_then_download() {
        let app = TestApp::new().await;
        let cookie = app.login("c1234").await;

        let mut parts = text_parts("Crushed box", "REFUND_EXCHANGE");
        parts.push(Part::file("files", "photos/box.png", "image/png", b"\x89PNG"));
        let response = app.multipart("/cs/inquiry", &cookie, parts).await;
        assert_eq!(response.status(), StatusCode::CREATED);
        let id = json(response).await["id"].as_i64().unwrap();

        let detail = json(app.get(&format!("/cs/inquiry/{id}"), Some(&cookie)).await).await;
        assert_eq!(detail["title"], "Crushed box");
        assert_eq!(detail["category"], "Refund/Exchange");
        assert_eq!(detail["attachments"][0]["original_filename"], "box.png");

        let saved = detail["attachments"][0]["saved_filename"].as_str().unwrap();
        let response = app.get(&format!("/files/{saved}"), Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()[header::CONTENT_TYPE], "image/png");
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&bytes[..], b"\x89PNG");
    }

    #[tokio::test]
    async fn test_create_rejects_non_image() {
        let app = TestApp::new().await;
        let cookie = app.login("c1234").await;

        let mut parts = text_parts("Notes attached", "OTHER");
        parts.push(Part::file("files", "notes.txt", "text/plain", b"hello"));
        let response = app.multipart("/cs/inquiry", &cookie, parts).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let list = json(app.get("/cs", Some(&cookie)).await).await;
        assert_eq!(list.as_array().unwrap().len(), 1);
        assert_eq!(app.stored_files(), 1);
    }

    #[tokio::test]
    async fn test_create_validates_fields() {
        let app = TestApp::new().await;
        let cookie = app.login("c1234").await;

        let response = app
            .multipart("/cs/inquiry", &cookie, text_parts("x", "OTHER"))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["errors"][0]["field"], "title");

        let response = app
            .multipart("/cs/inquiry", &cookie, text_parts("Valid title", "SHIPPING"))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json(response).await["errors"][0]["field"], "category");

        let response = app
            .multipart("/cs/inquiry", &cookie, vec![Part::text("title", "No category")])
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_detail_of_someone_else() {
        let app = TestApp::new().await;
        app.add_customer("c5678", "Customer 2").await;
        let cookie = app.login("c5678").await;

        let response = app.get("/cs/inquiry/1", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);

        let response = app.get("/cs/inquiry/999", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = app.get("/cs/inquiry/abc", Some(&cookie)).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unused_method() {
        let app = TestApp::new().await;
        let cookie = app.login("c1234").await;

        let response = app.request(Method::DELETE, "/cs", Some(&cookie), String::new()).await;
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
