//! # Authentication Store
//!
//! Holds the current session (token + user) and answers permission checks.
//!
//! ## Login Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  AuthStore                 Backend                  SessionStorage      │
//! │      │                        │                           │             │
//! │      │  POST /auth/login      │                           │             │
//! │      │  {email, password}     │                           │             │
//! │      │───────────────────────►│                           │             │
//! │      │  {token, user}         │                           │             │
//! │      │◄───────────────────────│                           │             │
//! │      │                                                    │             │
//! │      │  set "token", set "user"                           │             │
//! │      │───────────────────────────────────────────────────►│             │
//! │                                                                         │
//! │  [Next start]                                                           │
//! │      │  restore(): both keys present and user decodes → session        │
//! │      │◄───────────────────────────────────────────────────│             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Login goes straight to the auth endpoint with its own HTTP client rather
//! than through [`crate::api::ApiClient`]: no bearer header, no key casing,
//! and its own fallback message. The token is never refreshed or checked
//! for expiry here; the backend answers 401 when it is no longer valid.

use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use gestock_core::{LoginResponse, Role, User};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::storage::{SessionStorage, TOKEN_KEY, USER_KEY};

/// Fallback message when a failed login carries none.
pub const LOGIN_ERROR_MESSAGE: &str = "Erreur de connexion";

/// An authenticated session.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user: User,
}

#[derive(Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone)]
pub struct AuthStore {
    http: reqwest::Client,
    auth_url: String,
    storage: SessionStorage,
    session: Arc<RwLock<Option<Session>>>,
}

impl AuthStore {
    pub fn new(config: &ClientConfig, storage: SessionStorage) -> ClientResult<Self> {
        config.validate()?;
        let http = reqwest::Client::builder()
            .user_agent(config.api.user_agent.clone())
            .build()?;

        Ok(Self {
            http,
            auth_url: config.auth_url().to_string(),
            storage,
            session: Arc::new(RwLock::new(None)),
        })
    }

    /// Restores the session persisted by a previous login.
    ///
    /// Returns true when a session was restored. Nothing is restored unless
    /// both the token and a decodable user are present.
    pub async fn restore(&self) -> bool {
        let token = self.storage.get_item(TOKEN_KEY);
        let user = self.storage.get_json::<User>(USER_KEY);

        match (token, user) {
            (Some(token), Some(user)) => {
                debug!(user_id = user.id, role = %user.role, "Session restored");
                *self.session.write().await = Some(Session { token, user });
                true
            }
            _ => {
                debug!("No stored session");
                false
            }
        }
    }

    /// Logs in and persists the session.
    pub async fn login(&self, email: &str, password: &str) -> ClientResult<User> {
        let url = format!("{}/auth/login", self.auth_url);
        debug!(%url, email, "Login attempt");

        let response = self
            .http
            .post(&url)
            .json(&Credentials { email, password })
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<Value>(&text)
                .ok()
                .as_ref()
                .and_then(|v| v.get("message"))
                .and_then(Value::as_str)
                .filter(|m| !m.trim().is_empty())
                .unwrap_or(LOGIN_ERROR_MESSAGE)
                .to_string();
            warn!(status = status.as_u16(), email, "Login rejected");
            return Err(ClientError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let LoginResponse { token, user } = serde_json::from_str(&text)?;

        let encoded_user = serde_json::to_string(&user)?;
        self.storage.set_items(&[(TOKEN_KEY, token.clone()), (USER_KEY, encoded_user)])?;

        info!(user_id = user.id, role = %user.role, client_id = ?user.client_id, "Logged in");

        *self.session.write().await = Some(Session {
            token,
            user: user.clone(),
        });
        Ok(user)
    }

    /// Forgets the session, in memory and in storage.
    pub async fn logout(&self) -> ClientResult<()> {
        self.storage.remove_item(TOKEN_KEY)?;
        self.storage.remove_item(USER_KEY)?;
        *self.session.write().await = None;
        info!("Logged out");
        Ok(())
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub async fn session(&self) -> Option<Session> {
        self.session.read().await.clone()
    }

    pub async fn user(&self) -> Option<User> {
        self.session.read().await.as_ref().map(|s| s.user.clone())
    }

    pub async fn token(&self) -> Option<String> {
        self.session.read().await.as_ref().map(|s| s.token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.session.read().await.is_some()
    }

    async fn role(&self) -> Option<Role> {
        self.session.read().await.as_ref().map(|s| s.user.role)
    }

    // =========================================================================
    // Permissions (all false when logged out)
    // =========================================================================

    pub async fn has_role(&self, role: Role) -> bool {
        self.role().await == Some(role)
    }

    pub async fn has_any_role(&self, roles: &[Role]) -> bool {
        self.role().await.map(|r| roles.contains(&r)).unwrap_or(false)
    }

    pub async fn is_super_admin(&self) -> bool {
        self.role().await.map(|r| r.is_super_admin()).unwrap_or(false)
    }

    pub async fn is_admin(&self) -> bool {
        self.role().await.map(|r| r.is_admin()).unwrap_or(false)
    }

    pub async fn can_manage(&self) -> bool {
        self.role().await.map(|r| r.can_manage()).unwrap_or(false)
    }

    pub async fn can_sell(&self) -> bool {
        self.role().await.map(|r| r.can_sell()).unwrap_or(false)
    }

    pub async fn can_buy(&self) -> bool {
        self.role().await.map(|r| r.can_buy()).unwrap_or(false)
    }

    /// Fails with `NotAuthenticated` when logged out.
    pub async fn require_user(&self) -> ClientResult<User> {
        self.user().await.ok_or(ClientError::NotAuthenticated)
    }
}
