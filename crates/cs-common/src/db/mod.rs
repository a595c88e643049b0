pub mod candidates;
pub mod migrations;
pub mod pool;
pub mod util;

pub use candidates::PgCandidateStore;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPoolError, PgPool, PoolSettings, create_pool_from_url};
