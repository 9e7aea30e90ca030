use civic_core::user::UserProfile;

/// Where the session is in its lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionPhase {
    #[default]
    Uninitialized,
    /// Stored tokens are being checked against the backend.
    Hydrating,
    Authenticated(UserProfile),
    Anonymous,
}

impl SessionPhase {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Uninitialized => "uninitialized",
            Self::Hydrating => "hydrating",
            Self::Authenticated(_) => "authenticated",
            Self::Anonymous => "anonymous",
        }
    }
}

/// Snapshot of the session. Every flag is derived from the phase.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SessionState {
    phase: SessionPhase,
}

impl SessionState {
    pub fn new(phase: SessionPhase) -> Self {
        Self { phase }
    }

    pub fn authenticated(user: UserProfile) -> Self {
        Self::new(SessionPhase::Authenticated(user))
    }

    pub fn anonymous() -> Self {
        Self::new(SessionPhase::Anonymous)
    }

    pub fn phase(&self) -> &SessionPhase {
        &self.phase
    }

    pub fn user(&self) -> Option<&UserProfile> {
        match &self.phase {
            SessionPhase::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user().is_some()
    }

    /// Staff users are administrators; nobody is an admin while signed out.
    pub fn is_admin(&self) -> bool {
        self.user().is_some_and(|user| user.is_staff)
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.phase, SessionPhase::Hydrating)
    }
}
