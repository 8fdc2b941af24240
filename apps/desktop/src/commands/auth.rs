//! # Auth Commands
//!
//! ```text
//! login(username, password)
//!   │
//!   ├─ blank fields?                  ──► VALIDATION_ERROR (no call)
//!   ├─ authenticate_user ─► None      ──► UNAUTHORIZED
//!   └─ Some(user) ──► Session { user, started_at } ──► { user, menu }
//! ```
//!
//! Logging out also empties the cart and the sale form so the next cashier
//! starts clean.

use chrono::Utc;
use salesys_client::Operation;
use salesys_core::validation::validate_password;
use salesys_core::{MenuEntry, Session, ValidationError};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::{BackendState, CartState, SaleFormState, SessionState};

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInfo {
    pub session: Session,
    pub menu: Vec<MenuEntry>,
}

impl From<Session> for SessionInfo {
    fn from(session: Session) -> Self {
        SessionInfo {
            menu: session.menu(),
            session,
        }
    }
}

pub async fn login(
    backend: &BackendState,
    session: &SessionState,
    username: String,
    password: String,
) -> Result<SessionInfo, ApiError> {
    let username = username.trim().to_string();
    debug!(username = %username, "login command");
    if username.is_empty() {
        return Err(ValidationError::Required {
            field: "username".to_string(),
        }
        .into());
    }
    validate_password(&password)?;

    let user = backend
        .call(
            Operation::AuthenticateUser,
            backend.inner().authenticate_user(&username, &password),
        )
        .await?
        .ok_or_else(|| {
            warn!(username = %username, "Login rejected");
            ApiError::unauthorized("Invalid username or password")
        })?;

    info!(user_id = user.id, role = %user.role, "User logged in");
    let started = Session::new(user, Utc::now());
    session.begin(started.clone());
    Ok(started.into())
}

pub fn logout(session: &SessionState, cart: &CartState, form: &SaleFormState) {
    debug!("logout command");
    if let Some(ended) = session.end() {
        info!(user_id = ended.user.id, "User logged out");
    }
    cart.with_cart_mut(|c| c.clear());
    form.with_meta_mut(|meta| meta.reset());
}

pub fn get_session(session: &SessionState) -> Option<SessionInfo> {
    session.current().map(SessionInfo::from)
}
