//! Defines the JSON endpoints for managing categories.

use axum::{
    Json,
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use axum_extra::extract::WithRejection;
use serde_json::json;

use crate::{
    AppState, Error,
    category::{Category, CategoryPayload, predefined_categories},
    database_id::{DatabaseId, parse_id},
    endpoints::{self, format_endpoint},
    routing::created_response,
    store::SharedStore,
};

/// The state needed to manage categories.
#[derive(Clone)]
pub struct CategoryState {
    /// The store holding the categories.
    pub store: SharedStore,
}

impl FromRef<AppState> for CategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            store: state.store.clone(),
        }
    }
}

/// A route handler that lists all categories.
///
/// An empty store is seeded with the predefined categories first. If the
/// store cannot be read, the predefined categories are listed instead so that
/// forms still have something to offer.
pub async fn get_categories_endpoint(State(state): State<CategoryState>) -> Response {
    let result = state
        .store
        .initialize_categories(&predefined_categories())
        .and_then(|seeded| {
            if seeded {
                tracing::info!("Seeded the store with the predefined categories");
            }

            state.store.get_categories()
        });

    match result {
        Ok(categories) => Json(categories).into_response(),
        Err(error) => {
            tracing::error!(
                "Could not fetch categories, responding with the predefined categories: {error}"
            );
            Json(unsaved_predefined_categories()).into_response()
        }
    }
}

/// The predefined categories numbered in the order they would be seeded.
fn unsaved_predefined_categories() -> Vec<Category> {
    predefined_categories()
        .into_iter()
        .zip(1..)
        .map(|(category, id): (_, DatabaseId)| category.into_category(id))
        .collect()
}

/// A route handler for creating a new category, responds with the stored category.
pub async fn create_category_endpoint(
    State(state): State<CategoryState>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryPayload>, Error>,
) -> Response {
    let result = payload
        .into_new_category()
        .and_then(|new_category| state.store.create_category(new_category));

    match result {
        Ok(category) => {
            tracing::info!("Created category {} ({})", category.id, category.name);
            created_response(format_endpoint(endpoints::CATEGORY, category.id), category)
        }
        Err(error) => error.into_json_response("Failed to create category"),
    }
}

/// A route handler for getting a single category.
pub async fn get_category_endpoint(
    State(state): State<CategoryState>,
    Path(category_id): Path<String>,
) -> Response {
    let result = parse_id(&category_id)
        .ok_or(Error::CategoryNotFound)
        .and_then(|id| state.store.get_category(id));

    match result {
        Ok(category) => Json(category).into_response(),
        Err(error) => error.into_json_response("Failed to fetch category"),
    }
}

/// A route handler for changing the name, color or budget of a category.
pub async fn update_category_endpoint(
    State(state): State<CategoryState>,
    Path(category_id): Path<String>,
    WithRejection(Json(payload), _): WithRejection<Json<CategoryPayload>, Error>,
) -> Response {
    let result = parse_id(&category_id)
        .ok_or(Error::CategoryNotFound)
        .and_then(|id| Ok((id, payload.into_update()?)))
        .and_then(|(id, update)| state.store.update_category(id, update));

    match result {
        Ok(category) => Json(category).into_response(),
        Err(error) => error.into_json_response("Failed to update category"),
    }
}

/// A route handler for deleting a category.
///
/// Transactions and budgets refer to categories by name and are left as they are.
pub async fn delete_category_endpoint(
    State(state): State<CategoryState>,
    Path(category_id): Path<String>,
) -> Response {
    let result = parse_id(&category_id)
        .ok_or(Error::CategoryNotFound)
        .and_then(|id| state.store.delete_category(id));

    match result {
        Ok(()) => Json(json!({ "message": "Category deleted successfully" })).into_response(),
        Err(error) => error.into_json_response("Failed to delete category"),
    }
}
