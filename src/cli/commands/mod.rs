mod export;
mod init;
mod inspect;
mod merge;
mod stats;

pub use export::cmd_export;
pub use init::cmd_init;
pub use inspect::cmd_inspect;
pub use merge::cmd_merge;
pub use stats::cmd_stats;

use crate::config::Config;
use crate::db::Store;

async fn open_store(config: &Config) -> anyhow::Result<Store> {
    Store::with_pool_options(
        &config.general.database_path,
        config.general.max_db_connections,
        config.general.min_db_connections,
    )
    .await
}
