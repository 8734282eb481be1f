use anyhow::Result;
use xydocs_core::Config;

use crate::server::{self, AppState};
use crate::utils::store::open_store;

/// Run the HTTP server until Ctrl-C.
pub async fn execute(mut config: Config, bind: Option<String>) -> Result<()> {
    if let Some(bind) = bind {
        config.server.bind = bind;
    }
    let addr = config.server.bind.clone();
    let store = open_store(&config);
    server::serve(&addr, AppState::new(config, store)).await
}
