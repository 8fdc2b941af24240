//! # Product Commands
//!
//! Catalog listing and maintenance. Input is validated locally before any
//! backend call; uniqueness of codes is left to the backend.

use salesys_client::Operation;
use salesys_core::validation::{validate_new_product, validate_search_query};
use salesys_core::{MenuSection, NewProduct, Product, ProductId};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::{BackendState, SessionState};

pub async fn list_products(
    session: &SessionState,
    backend: &BackendState,
) -> Result<Vec<Product>, ApiError> {
    debug!("list_products command");
    session.require(MenuSection::Products)?;

    Ok(backend
        .call(Operation::GetAllProducts, backend.inner().get_all_products())
        .await?)
}

/// Products whose name or code contains `query`, ignoring case.
pub async fn search_products(
    session: &SessionState,
    backend: &BackendState,
    query: String,
) -> Result<Vec<Product>, ApiError> {
    debug!(query = %query, "search_products command");
    session.require(MenuSection::Products)?;
    let needle = validate_search_query(&query)?.to_lowercase();

    let products = backend
        .call(Operation::GetAllProducts, backend.inner().get_all_products())
        .await?;

    Ok(products
        .into_iter()
        .filter(|p| {
            needle.is_empty()
                || p.name.to_lowercase().contains(&needle)
                || p.code.to_lowercase().contains(&needle)
        })
        .collect())
}

pub async fn get_product(
    session: &SessionState,
    backend: &BackendState,
    id: ProductId,
) -> Result<Product, ApiError> {
    debug!(id, "get_product command");
    session.require(MenuSection::Products)?;

    Ok(backend
        .call(Operation::GetProduct, backend.inner().get_product(id))
        .await?)
}

pub async fn create_product(
    session: &SessionState,
    backend: &BackendState,
    product: NewProduct,
) -> Result<ProductId, ApiError> {
    debug!(code = %product.code, "create_product command");
    session.require(MenuSection::Products)?;
    validate_new_product(&product)?;

    let id = backend
        .call(Operation::AddProduct, backend.inner().add_product(&product))
        .await?;
    info!(id, code = %product.code, "Product created");
    Ok(id)
}

pub async fn update_product(
    session: &SessionState,
    backend: &BackendState,
    id: ProductId,
    product: NewProduct,
) -> Result<(), ApiError> {
    debug!(id, "update_product command");
    session.require(MenuSection::Products)?;
    validate_new_product(&product)?;

    backend
        .call(
            Operation::UpdateProduct,
            backend.inner().update_product(id, &product),
        )
        .await?;
    info!(id, "Product updated");
    Ok(())
}

pub async fn delete_product(
    session: &SessionState,
    backend: &BackendState,
    id: ProductId,
) -> Result<(), ApiError> {
    debug!(id, "delete_product command");
    session.require(MenuSection::Products)?;

    backend
        .call(Operation::DeleteProduct, backend.inner().delete_product(id))
        .await?;
    info!(id, "Product deleted");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::testing::{backend_state, logged_in, seeded_backend};
    use crate::error::ErrorCode;
    use salesys_core::{Money, UserRole};

    fn tea() -> NewProduct {
        NewProduct {
            name: "Green Tea".to_string(),
            code: "TEA-01".to_string(),
            price: Money::from_cents(800),
            stock: 12,
        }
    }

    #[tokio::test]
    async fn test_create_and_search() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let session = logged_in(UserRole::Admin);

        let id = create_product(&session, &backend, tea()).await.unwrap();
        assert_eq!(get_product(&session, &backend, id).await.unwrap().name, "Green Tea");

        let found = search_products(&session, &backend, "tea".to_string())
            .await
            .unwrap();
        assert_eq!(found.len(), 1);

        let all = search_products(&session, &backend, "  ".to_string())
            .await
            .unwrap();
        assert_eq!(all.len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_product_never_reaches_backend() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let session = logged_in(UserRole::Admin);

        let mut product = tea();
        product.code = "bad code!".to_string();

        let err = create_product(&session, &backend, product).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(memory.calls(Operation::AddProduct).await, 0);
    }

    #[tokio::test]
    async fn test_duplicate_code_is_a_backend_error() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);
        let session = logged_in(UserRole::Seller);

        let mut product = tea();
        product.code = "CAF-01".to_string();

        let err = create_product(&session, &backend, product).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::BackendError);
    }

    #[tokio::test]
    async fn test_requires_login() {
        let memory = seeded_backend().await;
        let backend = backend_state(&memory);

        let err = list_products(&SessionState::new(), &backend)
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::Unauthorized);
    }
}
