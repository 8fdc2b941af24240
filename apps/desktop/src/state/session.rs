//! # Session State
//!
//! The logged-in user, if any. Commands that need a user go through
//! [`SessionState::require`], which also checks the role menu.

use std::sync::RwLock;

use salesys_core::{MenuSection, Session};

use crate::error::ApiError;

#[derive(Debug, Default)]
pub struct SessionState {
    session: RwLock<Option<Session>>,
}

impl SessionState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn begin(&self, session: Session) {
        *self.session.write().expect("Session lock poisoned") = Some(session);
    }

    /// Ends the session, returning it if there was one.
    pub fn end(&self) -> Option<Session> {
        self.session.write().expect("Session lock poisoned").take()
    }

    pub fn current(&self) -> Option<Session> {
        self.session.read().expect("Session lock poisoned").clone()
    }

    /// The current session, provided its role may use `section`.
    pub fn require(&self, section: MenuSection) -> Result<Session, ApiError> {
        let session = self
            .current()
            .ok_or_else(|| ApiError::unauthorized("Log in to continue"))?;
        session.require(section)?;
        Ok(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use chrono::Utc;
    use salesys_core::{User, UserRole};

    fn session(role: UserRole) -> Session {
        Session::new(
            User {
                id: 1,
                username: "ana".to_string(),
                email: "ana@example.com".to_string(),
                role,
                full_name: "Ana".to_string(),
                is_active: true,
            },
            Utc::now(),
        )
    }

    #[test]
    fn test_require_without_login() {
        let state = SessionState::new();
        let err = state.require(MenuSection::Dashboard).unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }

    #[test]
    fn test_require_checks_role() {
        let state = SessionState::new();
        state.begin(session(UserRole::Manager));

        assert!(state.require(MenuSection::Invoices).is_ok());
        let err = state.require(MenuSection::NewSale).unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[test]
    fn test_end_clears_session() {
        let state = SessionState::new();
        state.begin(session(UserRole::Seller));

        assert!(state.end().is_some());
        assert!(state.current().is_none());
        assert!(state.end().is_none());
    }
}
