// crates/server/src/routes/models.rs
//! Model listing endpoint. Exposes the registry's selector table so the
//! chat UI can populate its model picker.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// One selectable model.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelEntry {
    /// Short selector the client sends back in `selectedModelId`.
    pub id: String,
    /// Fully qualified remote model name.
    pub name: String,
    /// Whether this model is the fallback default.
    pub default: bool,
}

/// GET /api/models - List selectable models.
pub async fn list_models(State(state): State<Arc<AppState>>) -> Json<Vec<ModelEntry>> {
    let default_model = state.registry.default_model();
    let mut models: Vec<ModelEntry> = state
        .registry
        .entries()
        .map(|(id, name)| ModelEntry {
            id: id.to_string(),
            name: name.to_string(),
            default: name == default_model,
        })
        .collect();
    models.sort_by(|a, b| a.id.cmp(&b.id));
    Json(models)
}

/// Create the models routes router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/models", get(list_models))
}
