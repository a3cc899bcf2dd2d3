mod handlers;

use axum::{
    routing::{delete, get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::bot::CommandRouter;

pub use handlers::{AddChildInput, AddRootInput, DocumentInput, MessageInput};

pub fn create_router(router: CommandRouter) -> Router {
    let api = Router::new()
        // Tree views
        .route("/owners/{owner}/tree", get(handlers::get_tree))
        .route("/owners/{owner}/tree/text", get(handlers::get_tree_text))
        .route("/owners/{owner}/roots", get(handlers::list_roots))
        // Single-category edits
        .route("/owners/{owner}/categories", post(handlers::add_root))
        .route(
            "/owners/{owner}/categories/children",
            post(handlers::add_child),
        )
        .route(
            "/owners/{owner}/categories/{name}",
            delete(handlers::remove_category),
        )
        // Table exchange
        .route("/owners/{owner}/table", get(handlers::export_table))
        .route("/owners/{owner}/table", post(handlers::import_table))
        // Chat transport bridge
        .route("/owners/{owner}/messages", post(handlers::post_message))
        .route("/owners/{owner}/documents", post(handlers::post_document))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(router)
}
