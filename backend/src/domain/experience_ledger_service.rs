//! Experience ledger service: credits, debits, and history reads.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;

use crate::domain::ports::{ExperienceQuery, ExperienceStore};
use crate::domain::service_errors::map_experience_error;
use crate::domain::{
    Error, ExperienceCause, ExperienceChange, ExperienceEntry, ExperiencePolicy, ExperienceReceipt,
    UserId,
};

/// Applies fixed rewards through an [`ExperienceStore`].
pub struct ExperienceLedgerService<X> {
    store: Arc<X>,
    policy: ExperiencePolicy,
    clock: Arc<dyn Clock>,
}

impl<X> ExperienceLedgerService<X> {
    pub fn new(store: Arc<X>, policy: ExperiencePolicy, clock: Arc<dyn Clock>) -> Self {
        Self {
            store,
            policy,
            clock,
        }
    }
}

impl<X> ExperienceLedgerService<X>
where
    X: ExperienceStore,
{
    /// Grant the reward for `cause` to `user`.
    pub async fn credit(
        &self,
        user: &UserId,
        cause: ExperienceCause,
    ) -> Result<ExperienceReceipt, Error> {
        self.apply(ExperienceChange::credit(user.clone(), cause)).await
    }

    /// Take back the reward for `cause`; the total never drops below zero.
    pub async fn debit(
        &self,
        user: &UserId,
        cause: ExperienceCause,
    ) -> Result<ExperienceReceipt, Error> {
        self.apply(ExperienceChange::debit(user.clone(), cause)).await
    }

    async fn apply(&self, change: ExperienceChange) -> Result<ExperienceReceipt, Error> {
        self.store
            .append(&change, self.policy, self.clock.utc())
            .await
            .map_err(map_experience_error)
    }
}

#[async_trait]
impl<X> ExperienceQuery for ExperienceLedgerService<X>
where
    X: ExperienceStore,
{
    async fn history(&self, user: &UserId) -> Result<Vec<ExperienceEntry>, Error> {
        self.store
            .history(user)
            .await
            .map_err(map_experience_error)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::ErrorCode;
    use crate::domain::ports::{ExperienceStoreError, MockExperienceStore};
    use chrono::{DateTime, Utc};
    use mockable::DefaultClock;
    use rstest::rstest;

    fn service(store: MockExperienceStore) -> ExperienceLedgerService<MockExperienceStore> {
        ExperienceLedgerService::new(
            Arc::new(store),
            ExperiencePolicy::default(),
            Arc::new(DefaultClock),
        )
    }

    fn receipt(user: &UserId, change: i32, new_total: u32) -> ExperienceReceipt {
        ExperienceReceipt {
            entry: ExperienceEntry {
                user: user.clone(),
                change,
                cause: ExperienceCause::Question,
                recorded_at: DateTime::<Utc>::UNIX_EPOCH,
            },
            new_total,
        }
    }

    #[rstest]
    #[tokio::test]
    async fn debit_passes_the_policy_and_direction() {
        let user = UserId::random();
        let expected = receipt(&user, -10, 0);
        let returned = expected.clone();
        let mut store = MockExperienceStore::new();
        store
            .expect_append()
            .withf(|change, policy, _| {
                change.cause == ExperienceCause::Question
                    && change.direction == crate::domain::Direction::Debit
                    && *policy == ExperiencePolicy::default()
            })
            .times(1)
            .return_once(move |_, _, _| Ok(returned));

        let got = service(store)
            .debit(&user, ExperienceCause::Question)
            .await
            .expect("debit succeeds");
        assert_eq!(got, expected);
    }

    #[rstest]
    #[tokio::test]
    async fn unknown_user_is_not_found() {
        let mut store = MockExperienceStore::new();
        store
            .expect_append()
            .return_once(|_, _, _| Err(ExperienceStoreError::user_missing()));

        let err = service(store)
            .credit(&UserId::random(), ExperienceCause::Answer)
            .await
            .expect_err("missing user");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn history_surfaces_connection_failures_as_unavailable() {
        let mut store = MockExperienceStore::new();
        store
            .expect_history()
            .return_once(|_| Err(ExperienceStoreError::connection("refused")));

        let err = service(store)
            .history(&UserId::random())
            .await
            .expect_err("store down");
        assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
    }
}
