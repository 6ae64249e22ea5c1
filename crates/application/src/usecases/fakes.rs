//! In-process adapters for use case tests.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use domain::auth::password::{Password, PasswordHash};
use domain::error::DomainError;
use domain::identity::id::{LoginId, UserId};
use domain::identity::user::User;
use domain::inquiry::{Inquiry, InquiryCategory, InquiryId};

use crate::dto::FileUploadDto;
use crate::error::{ApplicationError, Result};
use crate::ports::outbound::*;

#[derive(Default)]
pub struct FakeUsers {
    seq: AtomicI64,
    users: Mutex<BTreeMap<i64, User>>,
}

#[async_trait]
impl UserRepository for FakeUsers {
    async fn save(&self, mut user: User) -> Result<User> {
        let mut users = self.users.lock().unwrap();
        if users
            .values()
            .any(|u| u.login_id == user.login_id && u.id != user.id)
        {
            return Err(ApplicationError::LoginIdTaken(
                user.login_id.to_string(),
            ));
        }
        let id = user.id.unwrap_or_else(|| {
            UserId::new(self.seq.fetch_add(1, Ordering::SeqCst) + 1)
        });
        user.id = Some(id);
        users.insert(id.get(), user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>> {
        Ok(self.users.lock().unwrap().get(&id.get()).cloned())
    }

    async fn find_by_login_id(&self, login_id: &LoginId) -> Result<Option<User>> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| &u.login_id == login_id)
            .cloned())
    }
}

#[derive(Default)]
pub struct FakeInquiries {
    seq: AtomicI64,
    inquiries: Mutex<BTreeMap<i64, Inquiry>>,
}

impl FakeInquiries {
    pub fn count(&self) -> usize {
        self.inquiries.lock().unwrap().len()
    }

    fn filtered(
        &self,
        keep: impl Fn(&Inquiry) -> bool,
        newest_first: bool,
    ) -> Vec<Inquiry> {
        let mut found: Vec<Inquiry> = self
            .inquiries
            .lock()
            .unwrap()
            .values()
            .filter(|i| keep(i))
            .cloned()
            .collect();
        found.sort_by_key(|i| (i.created_at(), i.id()));
        if newest_first {
            found.reverse();
        }
        found
    }
}

#[async_trait]
impl InquiryRepository for FakeInquiries {
    async fn save(&self, inquiry: Inquiry) -> Result<Inquiry> {
        let mut inquiries = self.inquiries.lock().unwrap();
        let id = match inquiry.id() {
            Some(id) if inquiries.contains_key(&id.get()) => id,
            Some(id) => return Err(ApplicationError::InquiryNotFound(id)),
            None => InquiryId::new(self.seq.fetch_add(1, Ordering::SeqCst) + 1),
        };
        let inquiry = inquiry.with_id(id);
        inquiries.insert(id.get(), inquiry.clone());
        Ok(inquiry)
    }

    async fn find_by_id(&self, id: InquiryId) -> Result<Option<Inquiry>> {
        Ok(self.inquiries.lock().unwrap().get(&id.get()).cloned())
    }

    async fn find_by_customer(&self, customer: UserId) -> Result<Vec<Inquiry>> {
        Ok(self.filtered(|i| i.is_owned_by(customer), true))
    }

    async fn find_by_customer_and_category(
        &self,
        customer: UserId,
        category: InquiryCategory,
    ) -> Result<Vec<Inquiry>> {
        Ok(self.filtered(
            |i| i.is_owned_by(customer) && i.category() == category,
            true,
        ))
    }

    async fn find_unanswered(&self) -> Result<Vec<Inquiry>> {
        Ok(self.filtered(|i| !i.is_answered(), false))
    }
}

/// Storage keeping files in a map, failing every write after `fail_after`.
#[derive(Default)]
pub struct FakeStorage {
    pub files: Mutex<HashMap<String, Vec<u8>>>,
    writes: AtomicUsize,
    fail_after: Option<usize>,
}

impl FakeStorage {
    pub fn failing_after(writes: usize) -> Self {
        Self {
            fail_after: Some(writes),
            ..Default::default()
        }
    }

    pub fn names(&self) -> Vec<String> {
        self.files.lock().unwrap().keys().cloned().collect()
    }
}

#[async_trait]
impl AttachmentStorage for FakeStorage {
    async fn write(&self, saved_filename: &str, bytes: &[u8]) -> Result<String> {
        let n = self.writes.fetch_add(1, Ordering::SeqCst);
        if self.fail_after.is_some_and(|limit| n >= limit) {
            return Err(ApplicationError::StorageFailure(std::io::Error::other(
                "disk full",
            )));
        }
        self.files
            .lock()
            .unwrap()
            .insert(saved_filename.to_owned(), bytes.to_vec());
        Ok(format!("mem/{saved_filename}"))
    }

    async fn read(&self, saved_filename: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.files.lock().unwrap().get(saved_filename).cloned())
    }

    async fn delete(&self, saved_filename: &str) -> Result<()> {
        self.files.lock().unwrap().remove(saved_filename);
        Ok(())
    }
}

/// Stores the password in clear inside a PHC-shaped string.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &Password) -> Result<PasswordHash> {
        Ok(PasswordHash::parse(format!("$plain$salt${}", password.as_str()))?)
    }

    fn verify(&self, password: &Password, hash: &PasswordHash) -> Result<()> {
        if hash.as_str().rsplit('$').next() == Some(password.as_str()) {
            Ok(())
        } else {
            Err(DomainError::InvalidCredentials.into())
        }
    }
}

/// Clock moving one minute forward on every read.
pub struct SteppingClock {
    ticks: AtomicI64,
    start: DateTime<Utc>,
}

impl Default for SteppingClock {
    fn default() -> Self {
        Self {
            ticks: AtomicI64::new(0),
            start: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
        }
    }
}

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let tick = self.ticks.fetch_add(1, Ordering::SeqCst);
        self.start + Duration::minutes(tick)
    }
}

pub struct NoopTelemetry;

impl TelemetryPort for NoopTelemetry {
    fn record_auth_success(&self, _: &str, _: &str) {}
    fn record_auth_failure(&self, _: &str) {}
    fn record_inquiry_created(&self, _: i64, _: usize) {}
    fn record_answer_added(&self, _: i64, _: bool) {}
    fn record_access_denied(&self, _: i64, _: i64) {}
}

/// A small PNG upload named `name`.
pub fn png(name: &str) -> FileUploadDto {
    FileUploadDto {
        filename: Some(name.into()),
        content_type: Some("image/png".into()),
        bytes: vec![0x89, b'P', b'N', b'G'],
    }
}
