use std::sync::Arc;

use crate::client::AdsClient;
use crate::config::Config;

#[derive(Clone)]
pub struct AppState {
    pub client: Arc<AdsClient>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            client: Arc::new(AdsClient::new(&config)),
            config: Arc::new(config),
        }
    }
}
