use crate::error::{AppError, Result};
use crate::models::object_id::ObjectId;
use crate::models::product::ProductInput;

/// Validates a product identifier taken from a request path.
///
/// # Arguments
///
/// * `id` - The raw identifier.
///
/// # Returns
///
/// The parsed `ObjectId`, or `AppError::InvalidIdentifier`.
pub fn parse_product_id(id: &str) -> Result<ObjectId> {
    ObjectId::parse_str(id).map_err(|_| AppError::InvalidIdentifier(id.to_string()))
}

/// Parses a create-product request body.
///
/// Only the shape is checked: empty names or odd prices are accepted.
pub fn parse_product_input(body: &[u8]) -> Result<ProductInput> {
    sonic_rs::from_slice(body).map_err(|e| AppError::MalformedInput(e.to_string()))
}
