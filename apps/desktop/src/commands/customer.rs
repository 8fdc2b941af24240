//! # Customer Commands

use salesys_client::Operation;
use salesys_core::validation::{validate_new_customer, validate_search_query};
use salesys_core::{Customer, CustomerId, MenuSection, NewCustomer};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{BackendState, SessionState};

/// Optional fields arrive as empty strings from forms.
fn normalize(mut customer: NewCustomer) -> NewCustomer {
    fn blank_to_none(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
    customer.name = customer.name.trim().to_string();
    customer.email = blank_to_none(customer.email);
    customer.phone = blank_to_none(customer.phone);
    customer.address = blank_to_none(customer.address);
    customer.rfc = blank_to_none(customer.rfc).map(|rfc| rfc.to_uppercase());
    customer
}

pub async fn list_customers(
    session: &SessionState,
    backend: &BackendState,
) -> Result<Vec<Customer>, ApiError> {
    debug!("list_customers command");
    session.require(MenuSection::Customers)?;

    Ok(backend
        .call(Operation::GetAllCustomers, backend.inner().get_all_customers())
        .await?)
}

/// Customers whose name, e-mail or RFC contains `query`, ignoring case.
pub async fn search_customers(
    session: &SessionState,
    backend: &BackendState,
    query: String,
) -> Result<Vec<Customer>, ApiError> {
    debug!(query = %query, "search_customers command");
    session.require(MenuSection::Customers)?;
    let needle = validate_search_query(&query)?.to_lowercase();

    let customers = backend
        .call(Operation::GetAllCustomers, backend.inner().get_all_customers())
        .await?;

    let matches = |field: &Option<String>| {
        field
            .as_deref()
            .is_some_and(|v| v.to_lowercase().contains(&needle))
    };
    Ok(customers
        .into_iter()
        .filter(|c| {
            needle.is_empty()
                || c.name.to_lowercase().contains(&needle)
                || matches(&c.email)
                || matches(&c.rfc)
        })
        .collect())
}

pub async fn create_customer(
    session: &SessionState,
    backend: &BackendState,
    customer: NewCustomer,
) -> Result<CustomerId, ApiError> {
    debug!("create_customer command");
    session.require(MenuSection::Customers)?;
    let customer = normalize(customer);
    validate_new_customer(&customer)?;

    let id = backend
        .call(Operation::AddCustomer, backend.inner().add_customer(&customer))
        .await?;
    info!(id, "Customer created");
    Ok(id)
}

pub async fn update_customer(
    session: &SessionState,
    backend: &BackendState,
    id: CustomerId,
    customer: NewCustomer,
) -> Result<(), ApiError> {
    debug!(id, "update_customer command");
    session.require(MenuSection::Customers)?;
    let customer = normalize(customer);
    validate_new_customer(&customer)?;

    backend
        .call(
            Operation::UpdateCustomer,
            backend.inner().update_customer(id, &customer),
        )
        .await?;
    info!(id, "Customer updated");
    Ok(())
}

pub async fn delete_customer(
    session: &SessionState,
    backend: &BackendState,
    id: CustomerId,
) -> Result<(), ApiError> {
    debug!(id, "delete_customer command");
    session.require(MenuSection::Customers)?;

    backend
        .call(Operation::DeleteCustomer, backend.inner().delete_customer(id))
        .await?;
    info!(id, "Customer deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{backend_state, logged_in, seeded_backend};
    use crate::error::ErrorCode;
    use salesys_core::UserRole;

    #[tokio::test]
    async fn test_blank_optionals_are_dropped() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let session = logged_in(UserRole::Seller);

        let id = create_customer(
            &session,
            &backend,
            NewCustomer {
                name: " Lucía Pérez ".to_string(),
                email: Some("".to_string()),
                phone: Some("  ".to_string()),
                address: None,
                rfc: Some("pelu800101ab1".to_string()),
            },
        )
        .await
        .unwrap();

        let stored = list_customers(&session, &backend).await.unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].id, id);
        assert_eq!(stored[0].name, "Lucía Pérez");
        assert_eq!(stored[0].email, None);
        assert_eq!(stored[0].phone, None);
        assert_eq!(stored[0].rfc.as_deref(), Some("PELU800101AB1"));

        let found = search_customers(&session, &backend, "lucía".to_string())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[tokio::test]
    async fn test_invalid_email_rejected() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let session = logged_in(UserRole::Seller);

        let err = create_customer(
            &session,
            &backend,
            NewCustomer {
                name: "Lucía".to_string(),
                email: Some("not-an-email".to_string()),
                ..NewCustomer::default()
            },
        )
        .await
        .unwrap_err();

        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(memory.calls(Operation::AddCustomer).await, 0);
    }
}
