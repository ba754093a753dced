//! Shared wiring for cross-layer tests.
//!
//! Builds the real domain services on top of [`InMemoryCommunityStore`] so
//! the suites exercise the same code paths as a server started without a
//! database URL.

use std::sync::Arc;

use backend::domain::ports::{NotificationDispatcher, UserRepository};
use backend::domain::{
    AccountService, AnnouncementService, ContentService, ContentServiceDeps, EmailAddress,
    ExperienceCause, ExperienceLedgerService, ExperiencePolicy, LevelTable, Nickname,
    NotificationService, PasswordDigest, RankingService, User, UserId, VoteLedgerService,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryCommunityStore;
use backend::outbound::notifications::SpawningNotificationDispatcher;
use backend::outbound::password::Argon2PasswordHashing;
use chrono::Utc;
use mockable::{Clock, DefaultClock};

/// Store plus the port bundle the HTTP handlers use.
pub struct Community {
    pub store: Arc<InMemoryCommunityStore>,
    pub state: HttpState,
    pub ledger: ExperienceLedgerService<InMemoryCommunityStore>,
}

impl Community {
    pub fn new(policy: ExperiencePolicy) -> Self {
        let store = Arc::new(InMemoryCommunityStore::new());
        let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
        let levels = Arc::new(LevelTable::default());
        let notifier: Arc<dyn NotificationDispatcher> = Arc::new(
            SpawningNotificationDispatcher::new(Arc::clone(&store), Arc::clone(&clock)),
        );
        let ledger =
            || ExperienceLedgerService::new(Arc::clone(&store), policy, Arc::clone(&clock));

        let content = Arc::new(ContentService::new(ContentServiceDeps {
            content: Arc::clone(&store),
            users: Arc::clone(&store),
            votes: Arc::clone(&store),
            ledger: ledger(),
            notifier: Arc::clone(&notifier),
            levels: Arc::clone(&levels),
            clock: Arc::clone(&clock),
        }));
        let state = HttpState {
            accounts: Arc::new(AccountService::new(
                Arc::clone(&store),
                Arc::new(Argon2PasswordHashing::default()),
                Arc::clone(&clock),
            )),
            content: content.clone(),
            content_query: content,
            votes: Arc::new(VoteLedgerService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                notifier,
                policy,
                Arc::clone(&clock),
            )),
            rankings: Arc::new(RankingService::new(
                Arc::clone(&store),
                Arc::clone(&store),
                levels,
                Arc::clone(&clock),
            )),
            experience: Arc::new(ledger()),
            notifications: Arc::new(NotificationService::new(Arc::clone(&store))),
            announcements: Arc::new(AnnouncementService::new(Arc::clone(&store))),
        };

        Self {
            ledger: ledger(),
            store,
            state,
        }
    }

    /// Insert a member directly, skipping password hashing, then credit
    /// `rewards` through the ledger so history replays to the stored total.
    pub async fn member(&self, nickname: &str, rewards: &[ExperienceCause]) -> UserId {
        let user = User::register(
            EmailAddress::new(format!("{nickname}@example.com")).expect("valid email"),
            Nickname::new(nickname).expect("valid nickname"),
            PasswordDigest::new("unused"),
            false,
            Utc::now(),
        );
        let id = user.id.clone();
        self.store.insert(&user).await.expect("member inserted");
        for cause in rewards {
            self.ledger.credit(&id, *cause).await.expect("reward credited");
        }
        id
    }

    /// Current total for `user`.
    pub async fn experience_of(&self, user: &UserId) -> u32 {
        self.store
            .find_by_id(user)
            .await
            .expect("lookup succeeds")
            .expect("member exists")
            .total_experience
    }
}

/// Rewards that add up to `total`, preferring the fewest entries.
///
/// # Panics
///
/// Panics when no combination of question, answer, and approval rewards
/// reaches `total`.
pub fn rewards_totalling(total: u32) -> Vec<ExperienceCause> {
    let approval = ExperienceCause::ApproveVote.reward();
    let answer = ExperienceCause::Answer.reward();
    let question = ExperienceCause::Question.reward();
    for approvals in (0..=total / approval).rev() {
        for answers in (0..=(total - approvals * approval) / answer).rev() {
            let rest = total - approvals * approval - answers * answer;
            if rest % question == 0 {
                return std::iter::repeat_n(ExperienceCause::ApproveVote, approvals as usize)
                    .chain(std::iter::repeat_n(ExperienceCause::Answer, answers as usize))
                    .chain(std::iter::repeat_n(
                        ExperienceCause::Question,
                        (rest / question) as usize,
                    ))
                    .collect();
            }
        }
    }
    panic!("{total} experience is not reachable through rewards");
}
