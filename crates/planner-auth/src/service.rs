//! Authentication service: registration, login, session lookup and
//! logout.

use chrono::{DateTime, Duration, Utc};
use planner_core::error::{PlannerError, PlannerResult};
use planner_core::models::profile::Profile;
use planner_core::models::session::CreateSession;
use planner_core::models::user::{CreateUser, User};
use planner_core::repository::{ProfileRepository, SessionRepository, UserRepository};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use uuid::Uuid;
use validator::Validate;

use crate::config::AuthConfig;
use crate::error::AuthError;
use crate::password;
use crate::token;

/// Input for account registration.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, max = 150))]
    pub username: String,
    pub password: String,
}

/// A freshly registered account.
#[derive(Debug, Clone, Serialize)]
pub struct Registered {
    pub user: User,
    pub profile: Profile,
}

/// Input for the login flow.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginInput {
    pub username: String,
    pub password: String,
}

/// Successful login result.
#[derive(Debug, Clone, Serialize)]
pub struct LoginOutput {
    /// Raw opaque session token (returned to the client, never stored).
    pub session_token: String,
    pub session_id: Uuid,
    pub expires_at: DateTime<Utc>,
    pub user_id: Uuid,
    pub profile_id: Uuid,
}

/// The account behind a valid session token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub profile_id: Uuid,
    pub username: String,
    pub session_id: Uuid,
}

/// Authentication service.
///
/// Generic over repository implementations so that the auth layer
/// has no dependency on the database crate.
pub struct AuthService<U: UserRepository, P: ProfileRepository, S: SessionRepository> {
    user_repo: U,
    profile_repo: P,
    session_repo: S,
    config: AuthConfig,
}

impl<U: UserRepository, P: ProfileRepository, S: SessionRepository> AuthService<U, P, S> {
    pub fn new(user_repo: U, profile_repo: P, session_repo: S, config: AuthConfig) -> Self {
        Self {
            user_repo,
            profile_repo,
            session_repo,
            config,
        }
    }

    /// Create a user and its profile.
    pub async fn register(&self, input: RegisterInput) -> PlannerResult<Registered> {
        input.validate()?;
        password::check_policy(&input.password, self.config.min_password_length)?;

        match self.user_repo.get_by_username(&input.username).await {
            Ok(_) => {
                return Err(PlannerError::AlreadyExists {
                    entity: "user".into(),
                });
            }
            Err(PlannerError::NotFound { .. }) => {}
            Err(e) => return Err(e),
        }

        let password_hash =
            password::hash_password(&input.password, self.config.pepper.as_deref())?;

        let user = self
            .user_repo
            .create(CreateUser {
                username: input.username,
                password_hash,
            })
            .await?;
        let profile = self.profile_repo.get_by_user_id(user.id).await?;

        info!(user_id = %user.id, profile_id = %profile.id, "Account registered");

        Ok(Registered { user, profile })
    }

    /// Verify a username and password and open a session.
    pub async fn login(&self, input: LoginInput) -> PlannerResult<LoginOutput> {
        // 1. Look up user. Unknown usernames look like bad passwords.
        let user = match self.user_repo.get_by_username(&input.username).await {
            Ok(u) => u,
            Err(PlannerError::NotFound { .. }) => {
                debug!(username = %input.username, "Login for unknown username");
                return Err(AuthError::InvalidCredentials.into());
            }
            Err(e) => return Err(e),
        };

        // 2. Verify password.
        let valid = password::verify_password(
            &input.password,
            &user.password_hash,
            self.config.pepper.as_deref(),
        )?;

        if !valid {
            warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(AuthError::InvalidCredentials.into());
        }

        let profile = self.profile_repo.get_by_user_id(user.id).await?;

        // 3. Generate session token and persist only its hash.
        let raw_token = token::generate_session_token();
        let token_hash = token::hash_session_token(&raw_token);
        let expires_at = session_expiry(Utc::now(), self.config.session_lifetime_secs)?;

        let session = self
            .session_repo
            .create(CreateSession {
                user_id: user.id,
                token_hash,
                expires_at,
            })
            .await?;

        info!(user_id = %user.id, session_id = %session.id, "Login succeeded");

        Ok(LoginOutput {
            session_token: raw_token,
            session_id: session.id,
            expires_at: session.expires_at,
            user_id: user.id,
            profile_id: profile.id,
        })
    }

    /// Resolve a raw session token to the account it belongs to.
    ///
    /// Expired sessions are invalidated on sight.
    pub async fn authenticate(&self, raw_token: &str) -> PlannerResult<Identity> {
        let token_hash = token::hash_session_token(raw_token);
        let session = self
            .session_repo
            .get_by_token_hash(&token_hash)
            .await
            .map_err(|e| match e {
                PlannerError::NotFound { .. } => AuthError::SessionInvalid.into(),
                other => other,
            })?;

        if session.expires_at <= Utc::now() {
            if let Err(e) = self.session_repo.invalidate(session.id).await {
                warn!(session_id = %session.id, error = %e, "Failed to drop expired session");
            }
            return Err(AuthError::SessionExpired.into());
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .map_err(|e| match e {
                PlannerError::NotFound { .. } => AuthError::SessionInvalid.into(),
                other => other,
            })?;
        let profile = self.profile_repo.get_by_user_id(user.id).await?;

        Ok(Identity {
            user_id: user.id,
            profile_id: profile.id,
            username: user.username,
            session_id: session.id,
        })
    }

    /// Invalidate the session behind a raw token (logout).
    pub async fn logout(&self, raw_token: &str) -> PlannerResult<()> {
        let identity = self.authenticate(raw_token).await?;
        self.session_repo.invalidate(identity.session_id).await?;
        info!(user_id = %identity.user_id, session_id = %identity.session_id, "Logged out");
        Ok(())
    }

    /// Revoke all sessions for a user.
    pub async fn revoke_all_sessions(&self, user_id: Uuid) -> PlannerResult<()> {
        self.session_repo.invalidate_user_sessions(user_id).await
    }
}

/// `now + lifetime_secs`, or `Internal` when that is not representable.
fn session_expiry(now: DateTime<Utc>, lifetime_secs: u64) -> PlannerResult<DateTime<Utc>> {
    i64::try_from(lifetime_secs)
        .ok()
        .and_then(Duration::try_seconds)
        .and_then(|lifetime| now.checked_add_signed(lifetime))
        .ok_or_else(|| {
            PlannerError::Internal(format!("session lifetime of {lifetime_secs}s is out of range"))
        })
}
