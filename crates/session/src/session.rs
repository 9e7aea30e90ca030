use std::sync::Arc;

use civic_client::{AuthEvent, CivicClient, ClientResult};
use civic_core::tokens::{TokenKind, TokenPair};
use civic_core::user::{AuthResponse, Credentials, Registration, UserProfile};
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;

use crate::state::{SessionPhase, SessionState};

/// Identity lifecycle bound to one [`CivicClient`] and its token store.
///
/// ```text
/// Uninitialized -> Hydrating -> Authenticated(user) | Anonymous
/// ```
///
/// `login`, `register`, and `adopt_tokens` move to `Authenticated`;
/// `logout` and session expiry move to `Anonymous`.
pub struct Session {
    client: CivicClient,
    state: Arc<watch::Sender<SessionState>>,
}

impl Session {
    /// Start `Uninitialized`; call [`hydrate`](Self::hydrate) next.
    pub fn new(client: CivicClient) -> Self {
        let (state, _) = watch::channel(SessionState::default());
        Self {
            client,
            state: Arc::new(state),
        }
    }

    /// Client whose token store this session manages.
    pub fn client(&self) -> &CivicClient {
        &self.client
    }

    /// Current snapshot.
    pub fn state(&self) -> SessionState {
        self.state.borrow().clone()
    }

    /// Receiver that observes every transition.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// Resolve the stored tokens into an identity.
    ///
    /// With an access token stored, `GET /auth/me/` decides between
    /// `Authenticated` and `Anonymous`; a failure clears the tokens.
    /// Without one the session goes straight to `Anonymous`.
    pub async fn hydrate(&self) -> SessionState {
        if self.client.tokens().get(TokenKind::Access).is_none() {
            self.transition(SessionPhase::Anonymous);
            return self.state();
        }

        self.transition(SessionPhase::Hydrating);
        match self.client.auth().me().await {
            Ok(user) => self.transition(SessionPhase::Authenticated(user)),
            Err(e) => {
                tracing::warn!(error = %e, "Session hydration failed, signing out");
                self.clear_tokens();
                self.transition(SessionPhase::Anonymous);
            }
        }
        self.state()
    }

    /// Sign in with a username and password. Errors are returned untouched
    /// and leave the session as it was.
    pub async fn login(&self, username: &str, password: &str) -> ClientResult<UserProfile> {
        let response = self
            .client
            .auth()
            .login(&Credentials::new(username, password))
            .await?;
        self.establish(response)
    }

    /// Create an account and sign in with it.
    pub async fn register(&self, input: &Registration) -> ClientResult<UserProfile> {
        let response = self.client.auth().register(input).await?;
        self.establish(response)
    }

    /// Complete a sign-in whose tokens arrived out of band, such as the
    /// Google OAuth redirect. The tokens are stored, then verified with
    /// `GET /auth/me/`; on failure they are cleared again.
    pub async fn adopt_tokens(&self, tokens: &TokenPair) -> ClientResult<UserProfile> {
        self.client.tokens().set(tokens)?;
        match self.client.auth().me().await {
            Ok(user) => {
                self.transition(SessionPhase::Authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Adopted tokens were rejected");
                self.clear_tokens();
                self.transition(SessionPhase::Anonymous);
                Err(e)
            }
        }
    }

    /// Re-fetch the profile of the signed-in user.
    pub async fn reload_profile(&self) -> ClientResult<UserProfile> {
        let user = self.client.auth().me().await?;
        self.transition(SessionPhase::Authenticated(user.clone()));
        Ok(user)
    }

    /// Sign out. The remote call is best effort; local tokens are always
    /// cleared and the session always ends `Anonymous`.
    pub async fn logout(&self) {
        if let Err(e) = self.client.auth().logout().await {
            tracing::warn!(error = %e, "Remote logout failed, clearing local session anyway");
        }
        self.clear_tokens();
        self.transition(SessionPhase::Anonymous);
    }

    /// Demote the session to `Anonymous` whenever the client reports
    /// [`AuthEvent::SessionExpired`].
    ///
    /// Events are observed from the moment this is called. The task runs
    /// until the client is dropped or the handle is aborted.
    pub fn spawn_expiry_listener(&self) -> JoinHandle<()> {
        let mut events = self.client.subscribe();
        let state = Arc::clone(&self.state);

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(AuthEvent::SessionExpired) => {
                        if state.borrow().is_authenticated() {
                            tracing::info!("Session expired, signing out");
                        }
                        state.send_replace(SessionState::anonymous());
                    }
                    Ok(AuthEvent::TokenRefreshed) => {
                        tracing::debug!("Access token refreshed");
                    }
                    Err(broadcast::error::RecvError::Lagged(n)) => {
                        tracing::warn!(skipped = n, "Session expiry listener lagged");
                    }
                    Err(broadcast::error::RecvError::Closed) => break,
                }
            }
        })
    }

    // ---- private helpers ----

    fn establish(&self, response: AuthResponse) -> ClientResult<UserProfile> {
        self.client.tokens().set(&response.tokens)?;
        self.transition(SessionPhase::Authenticated(response.user.clone()));
        Ok(response.user)
    }

    fn clear_tokens(&self) {
        if let Err(e) = self.client.tokens().clear() {
            tracing::warn!(error = %e, "Failed to clear stored tokens");
        }
    }

    fn transition(&self, phase: SessionPhase) {
        match &phase {
            SessionPhase::Authenticated(user) => tracing::info!(
                user_id = user.id,
                username = %user.username,
                is_staff = user.is_staff,
                "Session authenticated",
            ),
            other => tracing::info!(phase = other.name(), "Session transition"),
        }
        self.state.send_replace(SessionState::new(phase));
    }
}
