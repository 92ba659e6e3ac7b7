use chrono::Utc;
use crate::{
    error::{AppError, Result},
    models::{
        object_id::ObjectId,
        product::{Product, ProductDocument, ProductInput},
    },
    state::AppState,
    validation::product::parse_product_id,
};

/// Lists every product in storage order.
///
/// # Arguments
///
/// * `state` - The application state.
///
/// # Returns
///
/// A `Result` containing all stored products.
pub async fn list_products(state: &AppState) -> Result<Vec<Product>> {
    state.products.find_all().await
}

/// Gets a product by its identifier.
///
/// The identifier is validated before the store is queried.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `id` - The raw identifier from the request.
///
/// # Returns
///
/// The product, `AppError::InvalidIdentifier` or `AppError::NotFound`.
pub async fn get_product(state: &AppState, id: &str) -> Result<Product> {
    let id = parse_product_id(id)?;
    state
        .products
        .find_by_id(&id)
        .await?
        .ok_or(AppError::NotFound)
}

/// Creates a new product.
///
/// # Arguments
///
/// * `state` - The application state.
/// * `input` - The client-supplied fields.
///
/// # Returns
///
/// A `Result` containing the new product's identifier.
pub async fn create_product(state: &AppState, input: ProductInput) -> Result<ObjectId> {
    let document = ProductDocument::stamped(input, Utc::now());
    let id = state.products.insert(&document).await?;
    tracing::info!("✅ Product created with ID: {}", id);
    Ok(id)
}
