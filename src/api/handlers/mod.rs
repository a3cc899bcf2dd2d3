use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};

use crate::bot::{CommandRouter, Reply};
use crate::models::*;

// ============================================================
// Request bodies
// ============================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddRootInput {
    pub name: String,
}

/// Parent and child names as one space-separated string, e.g. `"Fruit Apple"`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddChildInput {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageInput {
    pub text: String,
}

/// A table already decoded from the uploaded file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentInput {
    pub file_name: Option<String>,
    pub rows: Vec<TableRow>,
}

// ============================================================
// Error Handling
// ============================================================

/// Map a tree error to a status code.
///
/// Rejections caused by the request carry their message to the client.
/// Storage failures are logged in full and answered with a generic message.
fn tree_error(e: TreeError) -> (StatusCode, String) {
    let status = match &e {
        TreeError::NotFound { .. } | TreeError::ParentNotFound => StatusCode::NOT_FOUND,
        TreeError::AlreadyExists { .. }
        | TreeError::AlreadyChild { .. }
        | TreeError::WouldCreateCycle { .. } => StatusCode::CONFLICT,
        TreeError::EmptyName
        | TreeError::ReservedName { .. }
        | TreeError::SelfParent { .. } => StatusCode::BAD_REQUEST,
        TreeError::MalformedTable(_) => StatusCode::UNPROCESSABLE_ENTITY,
        TreeError::Storage(_) => {
            tracing::error!("Internal error: {:#}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            );
        }
    };

    tracing::warn!("Rejected request ({}): {}", e.kind(), e);
    (status, e.to_string())
}

// ============================================================
// Health
// ============================================================

pub async fn health() -> impl IntoResponse {
    Json(serde_json::json!({ "status": "ok" }))
}

// ============================================================
// Tree views
// ============================================================

pub async fn get_tree(
    State(router): State<CommandRouter>,
    Path(owner): Path<OwnerId>,
) -> Result<Json<Vec<CategoryTreeNode>>, (StatusCode, String)> {
    router.tree().forest(owner).map(Json).map_err(tree_error)
}

pub async fn list_roots(
    State(router): State<CommandRouter>,
    Path(owner): Path<OwnerId>,
) -> Result<Json<Vec<Category>>, (StatusCode, String)> {
    router.tree().roots(owner).map(Json).map_err(tree_error)
}

pub async fn get_tree_text(
    State(router): State<CommandRouter>,
    Path(owner): Path<OwnerId>,
) -> Result<String, (StatusCode, String)> {
    router.tree().render(owner).map_err(tree_error)
}

// ============================================================
// Categories
// ============================================================

pub async fn add_root(
    State(router): State<CommandRouter>,
    Path(owner): Path<OwnerId>,
    Json(input): Json<AddRootInput>,
) -> Result<(StatusCode, Json<Outcome>), (StatusCode, String)> {
    router
        .tree()
        .add_root(owner, &input.name)
        .map(|o| (StatusCode::CREATED, Json(o)))
        .map_err(tree_error)
}

pub async fn add_child(
    State(router): State<CommandRouter>,
    Path(owner): Path<OwnerId>,
    Json(input): Json<AddChildInput>,
) -> Result<(StatusCode, Json<Outcome>), (StatusCode, String)> {
    router
        .tree()
        .add_child_text(owner, &input.path)
        .map(|o| (StatusCode::CREATED, Json(o)))
        .map_err(tree_error)
}

pub async fn remove_category(
    State(router): State<CommandRouter>,
    Path((owner, name)): Path<(OwnerId, String)>,
) -> Result<Json<Outcome>, (StatusCode, String)> {
    router
        .tree()
        .remove(owner, &name)
        .map(Json)
        .map_err(tree_error)
}

// ============================================================
// Table exchange
// ============================================================

pub async fn export_table(
    State(router): State<CommandRouter>,
    Path(owner): Path<OwnerId>,
) -> Result<Json<Vec<TableRow>>, (StatusCode, String)> {
    router.tree().export(owner).map(Json).map_err(tree_error)
}

pub async fn import_table(
    State(router): State<CommandRouter>,
    Path(owner): Path<OwnerId>,
    Json(rows): Json<Vec<TableRow>>,
) -> Result<Json<Outcome>, (StatusCode, String)> {
    router
        .tree()
        .import(owner, rows)
        .map(Json)
        .map_err(tree_error)
}

// ============================================================
// Chat transport bridge
// ============================================================

pub async fn post_message(
    State(router): State<CommandRouter>,
    Path(owner): Path<OwnerId>,
    Json(input): Json<MessageInput>,
) -> Json<Reply> {
    Json(router.handle_text(owner, &input.text))
}

pub async fn post_document(
    State(router): State<CommandRouter>,
    Path(owner): Path<OwnerId>,
    Json(input): Json<DocumentInput>,
) -> Json<Reply> {
    Json(router.handle_document(owner, input.file_name.as_deref(), input.rows))
}
