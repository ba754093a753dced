//! Wiring of domain services onto storage adapters.
//!
//! The same services run on either backend; only the adapter types differ.

use std::sync::Arc;

use actix_web::web;
use mockable::{Clock, DefaultClock};

use backend::domain::ports::{
    AnnouncementRepository, ContentRepository, ExperienceStore, NotificationDispatcher,
    NotificationRepository, UserRepository, VoteStore,
};
use backend::domain::{
    AccountService, AnnouncementService, ContentService, ContentServiceDeps,
    ExperienceLedgerService, LevelTable, NotificationService, RankingService, VoteLedgerService,
};
use backend::inbound::http::state::HttpState;
use backend::outbound::memory::InMemoryCommunityStore;
use backend::outbound::notifications::SpawningNotificationDispatcher;
use backend::outbound::password::Argon2PasswordHashing;
use backend::outbound::persistence::{
    DbPool, DieselAnnouncementRepository, DieselContentRepository, DieselExperienceStore,
    DieselNotificationRepository, DieselUserRepository, DieselVoteStore,
};

use super::ServerConfig;

/// One adapter per driven port.
struct Adapters<U, C, V, X, N, A> {
    users: Arc<U>,
    content: Arc<C>,
    votes: Arc<V>,
    experience: Arc<X>,
    notifications: Arc<N>,
    announcements: Arc<A>,
}

fn memory_adapters(
    store: &Arc<InMemoryCommunityStore>,
) -> Adapters<
    InMemoryCommunityStore,
    InMemoryCommunityStore,
    InMemoryCommunityStore,
    InMemoryCommunityStore,
    InMemoryCommunityStore,
    InMemoryCommunityStore,
> {
    Adapters {
        users: Arc::clone(store),
        content: Arc::clone(store),
        votes: Arc::clone(store),
        experience: Arc::clone(store),
        notifications: Arc::clone(store),
        announcements: Arc::clone(store),
    }
}

fn diesel_adapters(
    pool: &DbPool,
) -> Adapters<
    DieselUserRepository,
    DieselContentRepository,
    DieselVoteStore,
    DieselExperienceStore,
    DieselNotificationRepository,
    DieselAnnouncementRepository,
> {
    Adapters {
        users: Arc::new(DieselUserRepository::new(pool.clone())),
        content: Arc::new(DieselContentRepository::new(pool.clone())),
        votes: Arc::new(DieselVoteStore::new(pool.clone())),
        experience: Arc::new(DieselExperienceStore::new(pool.clone())),
        notifications: Arc::new(DieselNotificationRepository::new(pool.clone())),
        announcements: Arc::new(DieselAnnouncementRepository::new(pool.clone())),
    }
}

fn wire<U, C, V, X, N, A>(adapters: Adapters<U, C, V, X, N, A>, config: &ServerConfig) -> HttpState
where
    U: UserRepository + 'static,
    C: ContentRepository + 'static,
    V: VoteStore + 'static,
    X: ExperienceStore + 'static,
    N: NotificationRepository + 'static,
    A: AnnouncementRepository + 'static,
{
    let Adapters {
        users,
        content,
        votes,
        experience,
        notifications,
        announcements,
    } = adapters;
    let clock: Arc<dyn Clock> = Arc::new(DefaultClock);
    let levels = Arc::new(LevelTable::default());
    let notifier: Arc<dyn NotificationDispatcher> = Arc::new(SpawningNotificationDispatcher::new(
        Arc::clone(&notifications),
        Arc::clone(&clock),
    ));

    let content_service = Arc::new(ContentService::new(ContentServiceDeps {
        content: Arc::clone(&content),
        users: Arc::clone(&users),
        votes: Arc::clone(&votes),
        ledger: ExperienceLedgerService::new(
            Arc::clone(&experience),
            config.policy,
            Arc::clone(&clock),
        ),
        notifier: Arc::clone(&notifier),
        levels: Arc::clone(&levels),
        clock: Arc::clone(&clock),
    }));

    HttpState {
        accounts: Arc::new(AccountService::new(
            Arc::clone(&users),
            Arc::new(Argon2PasswordHashing::default()),
            Arc::clone(&clock),
        )),
        content: content_service.clone(),
        content_query: content_service,
        votes: Arc::new(VoteLedgerService::new(
            Arc::clone(&content),
            votes,
            notifier,
            config.policy,
            Arc::clone(&clock),
        )),
        rankings: Arc::new(RankingService::new(
            users,
            content,
            levels,
            Arc::clone(&clock),
        )),
        experience: Arc::new(ExperienceLedgerService::new(experience, config.policy, clock)),
        notifications: Arc::new(NotificationService::new(notifications)),
        announcements: Arc::new(AnnouncementService::new(announcements)),
    }
}

/// Which backend holds community state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(super) enum Storage {
    Postgres,
    Memory,
}

impl Storage {
    pub(super) fn from_config(config: &ServerConfig) -> Self {
        if config.db_pool.is_some() {
            Self::Postgres
        } else {
            Self::Memory
        }
    }

    pub(super) fn as_str(self) -> &'static str {
        match self {
            Self::Postgres => "postgres",
            Self::Memory => "memory",
        }
    }
}

/// Build the handler state, on PostgreSQL when a pool is configured and on a
/// fresh in-memory store otherwise.
pub(super) fn build_http_state(config: &ServerConfig) -> web::Data<HttpState> {
    let state = match &config.db_pool {
        Some(pool) => wire(diesel_adapters(pool), config),
        None => wire(memory_adapters(&Arc::new(InMemoryCommunityStore::new())), config),
    };
    web::Data::new(state)
}
