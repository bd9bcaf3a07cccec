use std::sync::Arc;

use crate::catalog::QuoteCatalog;
use crate::config::AppConfig;
use crate::database::Store;
use crate::ledger::VoteLedger;

#[derive(Clone)]
pub struct AppState {
    pub store: Store,
    pub ledger: VoteLedger,
    pub catalog: QuoteCatalog,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Wire the ledger and catalog onto `store` using the configured write
    /// timeout and retry policy.
    pub fn new(store: Store, config: AppConfig) -> Self {
        let ledger = VoteLedger::new(
            store.clone(),
            config.ledger,
            std::time::Duration::from_millis(config.database.write_timeout_ms),
        );
        let catalog = QuoteCatalog::new(store.clone(), ledger.clone());
        Self {
            store,
            ledger,
            catalog,
            config: Arc::new(config),
        }
    }
}
