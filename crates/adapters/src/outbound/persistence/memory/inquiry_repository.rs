//! In-memory implementation for inquiry repository.

use std::collections::BTreeMap;
use std::sync::RwLock;
use std::sync::atomic::{AtomicI64, Ordering};

use application::error::{ApplicationError, Result};
use application::ports::outbound::InquiryRepository;
use async_trait::async_trait;
use domain::identity::id::UserId;
use domain::inquiry::{Inquiry, InquiryCategory, InquiryId};

use super::poisoned;

/// Inquiry repository kept in process memory.
#[derive(Default)]
pub struct MemoryInquiryRepository {
    sequence: AtomicI64,
    inquiries: RwLock<BTreeMap<i64, Inquiry>>,
}

enum Order {
    OldestFirst,
    NewestFirst,
}

impl MemoryInquiryRepository {
    /// Create a new, empty [`MemoryInquiryRepository`].
    pub fn new() -> Self {
        Self::default()
    }

    fn scan(
        &self,
        keep: impl Fn(&Inquiry) -> bool,
        order: Order,
    ) -> Result<Vec<Inquiry>> {
        let inquiries = self.inquiries.read().map_err(poisoned)?;

        // The map iterates in id order and the sort is stable, so ties on
        // `created_at` keep id order.
        let mut found: Vec<Inquiry> =
            inquiries.values().filter(|i| keep(i)).cloned().collect();
        match order {
            Order::OldestFirst => found.sort_by_key(Inquiry::created_at),
            Order::NewestFirst => {
                found.sort_by(|a, b| b.created_at().cmp(&a.created_at()))
            },
        }

        Ok(found)
    }
}

#[async_trait]
impl InquiryRepository for MemoryInquiryRepository {
    async fn save(&self, inquiry: Inquiry) -> Result<Inquiry> {
        let mut inquiries = self.inquiries.write().map_err(poisoned)?;

        let id = match inquiry.id() {
            Some(id) if inquiries.contains_key(&id.get()) => id,
            Some(id) => return Err(ApplicationError::InquiryNotFound(id)),
            None => InquiryId::new(self.sequence.fetch_add(1, Ordering::SeqCst) + 1),
        };
        let inquiry = inquiry.with_id(id);
        inquiries.insert(id.get(), inquiry.clone());

        Ok(inquiry)
    }

    async fn find_by_id(&self, id: InquiryId) -> Result<Option<Inquiry>> {
        let inquiries = self.inquiries.read().map_err(poisoned)?;
        Ok(inquiries.get(&id.get()).cloned())
    }

    async fn find_by_customer(&self, customer: UserId) -> Result<Vec<Inquiry>> {
        self.scan(|i| i.is_owned_by(customer), Order::NewestFirst)
    }

    async fn find_by_customer_and_category(
        &self,
        customer: UserId,
        category: InquiryCategory,
    ) -> Result<Vec<Inquiry>> {
        self.scan(
            |i| i.is_owned_by(customer) && i.category() == category,
            Order::NewestFirst,
        )
    }

    async fn find_unanswered(&self) -> Result<Vec<Inquiry>> {
        self.scan(|i| !i.is_answered(), Order::OldestFirst)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{DateTime, Duration, TimeZone, Utc};
    use domain::inquiry::Answer;

    use super::*;

    fn at(minutes: i64) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap() + Duration::minutes(minutes)
    }

    fn inquiry(
        title: &str,
        customer: i64,
        category: InquiryCategory,
        minutes: i64,
    ) -> Inquiry {
        Inquiry::new(
            title,
            "content",
            category,
            UserId::new(customer),
            at(minutes),
            Vec::new(),
        )
    }

    fn titles(list: Vec<Inquiry>) -> Vec<String> {
        list.iter().map(|i| i.title().to_owned()).collect()
    }

    #[tokio::test]
    async fn test_save_is_an_upsert() {
        let repo = MemoryInquiryRepository::new();

        let mut saved = repo
            .save(inquiry("One", 1, InquiryCategory::Other, 0))
            .await
            .unwrap();
        assert_eq!(saved.id(), Some(InquiryId::new(1)));

        saved.answer_with(Answer::new("Done", UserId::new(9), at(5)));
        let resaved = repo.save(saved).await.unwrap();

        assert_eq!(resaved.id(), Some(InquiryId::new(1)));
        let found = repo.find_by_id(InquiryId::new(1)).await.unwrap().unwrap();
        assert!(found.is_answered());
        assert!(repo.find_by_id(InquiryId::new(2)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_save_with_unknown_id_is_not_found() {
        let repo = MemoryInquiryRepository::new();

        let ghost = inquiry("Ghost", 1, InquiryCategory::Other, 0)
            .with_id(InquiryId::new(99));
        assert!(matches!(
            repo.save(ghost).await,
            Err(ApplicationError::InquiryNotFound(id)) if id == InquiryId::new(99)
        ));
        assert!(repo.find_by_id(InquiryId::new(99)).await.unwrap().is_none());
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_saves_get_distinct_ids() {
        const TASKS: i64 = 32;
        let repo = Arc::new(MemoryInquiryRepository::new());

        let handles: Vec<_> = (0..TASKS)
            .map(|n| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move {
                    repo.save(inquiry("Parallel", n, InquiryCategory::Other, n))
                        .await
                        .unwrap()
                        .id()
                        .unwrap()
                        .get()
                })
            })
            .collect();

        let mut ids = Vec::new();
        for handle in handles {
            ids.push(handle.await.unwrap());
        }
        ids.sort_unstable();

        assert_eq!(ids, (1..=TASKS).collect::<Vec<_>>());
        for id in 1..=TASKS {
            assert!(repo.find_by_id(InquiryId::new(id)).await.unwrap().is_some());
        }
    }

    #[tokio::test]
    async fn test_customer_queries_are_newest_first() {
        let repo = MemoryInquiryRepository::new();
        for (title, customer, category, minutes) in [
            ("old", 1, InquiryCategory::Complaint, 0),
            ("new", 1, InquiryCategory::Proposal, 10),
            ("mid", 1, InquiryCategory::Complaint, 5),
            ("other", 2, InquiryCategory::Complaint, 7),
        ] {
            repo.save(inquiry(title, customer, category, minutes))
                .await
                .unwrap();
        }

        let mine = repo.find_by_customer(UserId::new(1)).await.unwrap();
        assert_eq!(titles(mine), ["new", "mid", "old"]);

        let complaints = repo
            .find_by_customer_and_category(UserId::new(1), InquiryCategory::Complaint)
            .await
            .unwrap();
        assert_eq!(titles(complaints), ["mid", "old"]);
    }

    #[tokio::test]
    async fn test_unanswered_oldest_first_with_stable_ties() {
        let repo = MemoryInquiryRepository::new();
        repo.save(inquiry("late", 1, InquiryCategory::Other, 30))
            .await
            .unwrap();
        repo.save(inquiry("tie-a", 2, InquiryCategory::Other, 10))
            .await
            .unwrap();
        repo.save(inquiry("tie-b", 1, InquiryCategory::Other, 10))
            .await
            .unwrap();
        let mut answered = repo
            .save(inquiry("answered", 1, InquiryCategory::Other, 0))
            .await
            .unwrap();
        answered.answer_with(Answer::new("ok", UserId::new(9), at(40)));
        repo.save(answered).await.unwrap();

        let queue = repo.find_unanswered().await.unwrap();
        assert_eq!(titles(queue), ["tie-a", "tie-b", "late"]);
    }
}
