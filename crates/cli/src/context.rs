//! Per-invocation state shared by every command.

use std::sync::Arc;

use anyhow::bail;
use civic_client::{CivicClient, ClientError, FileTokenStore};
use civic_core::user::UserProfile;
use civic_session::Session;

use crate::output::Output;

pub struct Context {
    pub session: Session,
    pub output: Output,
}

impl Context {
    /// Open the token file, build the client, and hydrate the session.
    pub async fn build(global: &crate::GlobalArgs) -> anyhow::Result<Self> {
        let config = crate::config::client_config(global.api_url.as_deref())?;
        let token_file = crate::config::token_file(global.token_file.clone())?;
        let store = FileTokenStore::open(&token_file)?;

        tracing::debug!(
            api_url = %config.base_url,
            token_file = %token_file.display(),
            "Starting",
        );

        let client = CivicClient::new(config, Arc::new(store))?;
        let session = Session::new(client);
        session.hydrate().await;

        Ok(Self {
            session,
            output: Output::new(global.json),
        })
    }

    pub fn client(&self) -> &CivicClient {
        self.session.client()
    }

    /// The signed-in user, or an error telling the caller to log in.
    pub fn require_login(&self) -> anyhow::Result<UserProfile> {
        match self.session.state().user() {
            Some(user) => Ok(user.clone()),
            None => bail!("Not logged in. Run `civic login` first."),
        }
    }

    /// The signed-in user when they are staff.
    pub fn require_admin(&self) -> anyhow::Result<UserProfile> {
        let user = self.require_login()?;
        if !user.is_staff {
            bail!("This command requires an administrator account.");
        }
        Ok(user)
    }
}

/// Convert a client error into a report that leads with the backend's own
/// message.
pub fn report(err: ClientError) -> anyhow::Error {
    match err.status() {
        Some(status) if matches!(err, ClientError::Api { .. }) => {
            anyhow::anyhow!("{} (HTTP {})", err.message(), status.as_u16())
        }
        _ => anyhow::Error::new(err),
    }
}
