//! Everything `create_server` needs, gathered by `main`.

use std::net::SocketAddr;

use backend::domain::ExperiencePolicy;
use backend::inbound::http::session_config::SessionSettings;
use backend::outbound::persistence::DbPool;

/// Server configuration: session cookie, listen address, ledger policy, and
/// optional PostgreSQL pool.
pub struct ServerConfig {
    pub(crate) session: SessionSettings,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) policy: ExperiencePolicy,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// In-memory storage with the default ledger policy.
    #[must_use]
    pub fn new(session: SessionSettings, bind_addr: SocketAddr) -> Self {
        Self {
            session,
            bind_addr,
            policy: ExperiencePolicy::default(),
            db_pool: None,
        }
    }

    /// Back every port with PostgreSQL adapters sharing `pool`.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Override the experience ledger policy.
    #[must_use]
    pub fn with_policy(mut self, policy: ExperiencePolicy) -> Self {
        self.policy = policy;
        self
    }
}
