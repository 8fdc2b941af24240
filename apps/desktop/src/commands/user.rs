//! # User Commands
//!
//! User administration, Admin only.

use salesys_client::Operation;
use salesys_core::validation::{validate_email, validate_new_user, validate_username};
use salesys_core::{MenuSection, NewUser, User, UserId};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{BackendState, SessionState};

pub async fn list_users(
    session: &SessionState,
    backend: &BackendState,
) -> Result<Vec<User>, ApiError> {
    debug!("list_users command");
    session.require(MenuSection::Users)?;

    Ok(backend
        .call(Operation::GetAllUsers, backend.inner().get_all_users())
        .await?)
}

pub async fn create_user(
    session: &SessionState,
    backend: &BackendState,
    user: NewUser,
) -> Result<UserId, ApiError> {
    debug!(username = %user.username, "create_user command");
    session.require(MenuSection::Users)?;
    validate_new_user(&user)?;

    let id = backend
        .call(Operation::CreateUser, backend.inner().create_user(&user))
        .await?;
    info!(id, username = %user.username, role = %user.role, "User created");
    Ok(id)
}

/// Updates profile, role and active flag. Passwords are not changed here.
pub async fn update_user(
    session: &SessionState,
    backend: &BackendState,
    user: User,
) -> Result<(), ApiError> {
    debug!(id = user.id, "update_user command");
    let current = session.require(MenuSection::Users)?;
    validate_username(&user.username)?;
    validate_email(&user.email)?;
    if user.id == current.user.id && (!user.is_active || user.role != current.user.role) {
        return Err(ApiError::validation(
            "You cannot deactivate or change the role of your own account",
        ));
    }

    backend
        .call(Operation::UpdateUser, backend.inner().update_user(&user))
        .await?;
    info!(id = user.id, "User updated");
    Ok(())
}

pub async fn delete_user(
    session: &SessionState,
    backend: &BackendState,
    id: UserId,
) -> Result<bool, ApiError> {
    debug!(id, "delete_user command");
    let current = session.require(MenuSection::Users)?;
    if id == current.user.id {
        return Err(ApiError::validation("You cannot delete your own account"));
    }

    let deleted = backend
        .call(Operation::DeleteUser, backend.inner().delete_user(id))
        .await?;
    info!(id, deleted, "User deleted");
    Ok(deleted)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{backend_state, logged_in, seeded_backend};
    use crate::error::ErrorCode;
    use salesys_core::UserRole;

    fn cashier() -> NewUser {
        NewUser {
            username: "caja1".to_string(),
            email: "caja1@salesys.com".to_string(),
            password: "secret".to_string(),
            role: UserRole::Seller,
            full_name: "Caja Uno".to_string(),
        }
    }

    #[tokio::test]
    async fn test_admin_manages_users() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let session = logged_in(UserRole::Admin);

        let id = create_user(&session, &backend, cashier()).await.unwrap();
        let mut user = list_users(&session, &backend)
            .await
            .unwrap()
            .into_iter()
            .find(|u| u.id == id)
            .unwrap();

        user.role = UserRole::Manager;
        update_user(&session, &backend, user).await.unwrap();

        assert!(delete_user(&session, &backend, id).await.unwrap());
        let err = delete_user(&session, &backend, id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_seller_cannot_manage_users() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let session = logged_in(UserRole::Seller);

        let err = create_user(&session, &backend, cashier()).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::Forbidden);
    }

    #[tokio::test]
    async fn test_cannot_delete_self() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let session = logged_in(UserRole::Admin);

        let err = delete_user(&session, &backend, 1).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(memory.calls(Operation::DeleteUser).await, 0);
    }
}
