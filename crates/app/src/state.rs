//! Application state management

use std::sync::Arc;

use sonatina_net::{AuthContext, NotificationHub, RestClient, SlotFilters};

use crate::config::{AppConfig, PortalRole};
use crate::error::{Error, Result};

/// Main application state
pub struct AppState {
    pub config: AppConfig,
    pub auth: AuthContext,
    pub api: Arc<RestClient>,
    pub hub: NotificationHub,
}

impl AppState {
    pub fn new(config: AppConfig, token: Option<String>) -> Result<Self> {
        let account_id = config
            .account
            .id
            .ok_or_else(|| Error::Config("account.id is not set".into()))?;
        let token = token.ok_or_else(|| Error::Config("No API token given".into()))?;

        let api = RestClient::new(config.api.base_url.clone(), config.api.timeout())?;

        Ok(Self {
            auth: AuthContext::new(account_id, token),
            api: Arc::new(api),
            hub: NotificationHub::default(),
            config,
        })
    }

    /// The slots the signed-in account's portal shows
    pub fn slot_filters(&self) -> SlotFilters {
        match self.config.account.role {
            PortalRole::Student => SlotFilters::for_student(self.auth.account_id),
            PortalRole::Teacher => SlotFilters::for_teacher(self.auth.account_id),
            PortalRole::Staff => SlotFilters::default(),
        }
    }
}
