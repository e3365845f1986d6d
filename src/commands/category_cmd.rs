//! Commands for categories

use crate::domain::{Category, DomainError};
use crate::repository::Repository;
use crate::AppState;

/// List all categories
pub async fn list_categories(state: &AppState) -> Result<Vec<Category>, String> {
    state.category_repo.list().await.map_err(|e| e.to_string())
}

/// Create a new category
pub async fn create_category(state: &AppState, name: String) -> Result<Category, String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(DomainError::InvalidInput("Category name cannot be empty".into()).to_string());
    }
    state
        .category_repo
        .create(&Category::new(0, name.to_string()))
        .await
        .map_err(|e| e.to_string())
}
