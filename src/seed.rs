//! Demo data inserted on start.

use application::dto::FileUploadDto;
use application::error::Result;
use application::ports::outbound::{
    Clock, InquiryRepository, PasswordHasher, UserRepository,
};
use application::usecases::AttachmentHandler;
use chrono::Duration;
use domain::auth::password::Password;
use domain::identity::id::LoginId;
use domain::identity::user::{Role, User};
use domain::inquiry::{Inquiry, InquiryCategory};

const CUSTOMER_LOGIN_ID: &str = "c1234";
const ADMIN_LOGIN_ID: &str = "a1234";
const DEMO_PASSWORD: &str = "1234";

/// 1x1 transparent PNG.
const SAMPLE_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D,
    0x49, 0x48, 0x44, 0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01,
    0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4, 0x89, 0x00, 0x00, 0x00,
    0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

/// Stores used by [`seed`].
pub struct Seeder<'a> {
    pub users: &'a dyn UserRepository,
    pub inquiries: &'a dyn InquiryRepository,
    pub attachments: &'a AttachmentHandler,
    pub hasher: &'a dyn PasswordHasher,
    pub clock: &'a dyn Clock,
}

impl Seeder<'_> {
    /// Insert a demo customer, a demo admin and one complaint filed a day
    /// ago. Does nothing when the demo customer already exists.
    pub async fn seed(&self) -> Result<()> {
        let customer_login = LoginId::parse(CUSTOMER_LOGIN_ID)?;
        if self.users.find_by_login_id(&customer_login).await?.is_some() {
            tracing::debug!("demo data already present");
            return Ok(());
        }

        let password = self.hasher.hash(&Password::new(DEMO_PASSWORD)?)?;
        let customer = self
            .users
            .save(User::new(customer_login, password.clone(), "고객1", Role::Customer))
            .await?;
        self.users
            .save(User::new(
                LoginId::parse(ADMIN_LOGIN_ID)?,
                password,
                "관리자1",
                Role::Admin,
            ))
            .await?;

        let image = self
            .attachments
            .store(&FileUploadDto {
                filename: Some("img.png".into()),
                content_type: Some("image/png".into()),
                bytes: SAMPLE_PNG.to_vec(),
            })
            .await?;

        if let Some(owner) = customer.id {
            self.inquiries
                .save(Inquiry::new(
                    "Late delivery",
                    "My order has not arrived yet. The photo shows the tracking page.",
                    InquiryCategory::Complaint,
                    owner,
                    self.clock.now() - Duration::days(1),
                    vec![image],
                ))
                .await?;
        }

        tracing::info!(
            customer = CUSTOMER_LOGIN_ID,
            admin = ADMIN_LOGIN_ID,
            "demo data inserted"
        );

        Ok(())
    }
}
