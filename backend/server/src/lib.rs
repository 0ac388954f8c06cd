//! Gateway for the Christmas tree note board.
//!
//! # General Infrastructure
//! - Browser talks to this gateway only
//! - Gateway forwards to the note-board REST API (`BOARD_API_URL`)
//! - The note-board API owns users, trees, notes, likes, comments and the moderation log
//! - Gateway owns the coordinate scheme and the checks that need it
//!
//!
//!
//! # Coordinates
//!
//! **Goal**: a note pinned on a phone shows up on the same branch on a desktop.
//!
//! - Browser sends the click in canvas pixels along with the canvas size
//! - Gateway rejects clicks that miss the tree triangle
//! - Gateway stores `round(ratio * 10000) + 1000000` per axis
//! - On read, browser sends its current canvas size and gets pixel positions back
//! - Old notes stored as raw pixels on a 660×860 canvas are rescaled from that size
//!
//!
//!
//! # Routes
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | GET | `/trees/{tree_id}/notes?user_id&width&height` | members only, hidden notes dropped |
//! | POST | `/trees/{tree_id}/notes` | `{ user_id, message, x, y, width, height }` |
//! | POST | `/trees` | creates then joins the owner |
//! | POST | `/trees/join` | `{ user_id, tree_key }` |
//! | GET | `/users/{user_id}/trees` | |
//! | GET | `/users/{user_id}/trees/public` | first public tree |
//! | GET, POST | `/notes/{note_id}/comments` | |
//! | POST, DELETE | `/notes/{note_id}/likes` | `{ user_id }` → `{ likeCount }` |
//! | GET | `/admin/users`, `/admin/logs` | `x-user-id` header |
//! | GET | `/admin/users/{user_id}/notes`, `/admin/users/{user_id}/comments` | |
//! | PATCH | `/admin/notes/{id}/{show,hide}`, `/admin/comments/{id}/{show,hide}` | |
//! | DELETE | `/admin/notes/{id}`, `/admin/comments/{id}` | |
//! | PATCH | `/admin/users/{id}/{block,unblock}` | |
//!
//!
//!
//! # Environment
//!
//! - `RUST_PORT`, default 3001
//! - `BOARD_API_URL`, default `http://localhost:3000`
//! - `BOARD_API_TIMEOUT_MS`, default 5000
//! - `CORS_MAX_AGE_SECS`, default 3600
//! - `LIKE_FETCH_CONCURRENCY`, default 8
//! - `RUST_LOG` for the log filter
use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderName, Method, header::CONTENT_TYPE},
    routing::{delete, get, patch, post},
};

use board::constants::ADMIN_HEADER;
use signal::{
    ctrl_c,
    unix::{SignalKind, signal},
};
use tokio::{net::TcpListener, signal};
use tower_http::cors::{Any, CorsLayer};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt};

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod utils;

use routes::{
    admin_logs_handler, admin_user_comments_handler, admin_user_notes_handler,
    admin_users_handler, comments_handler, create_comment_handler, create_note_handler,
    create_tree_handler, delete_comment_handler, delete_note_handler, join_tree_handler,
    like_handler, moderate_comment_handler, moderate_note_handler, public_tree_handler,
    sanction_user_handler, tree_notes_handler, unlike_handler, user_trees_handler,
};
use state::State;

pub async fn start_server() -> anyhow::Result<()> {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    info!("Initializing state...");
    let state = State::new()?;

    info!("Starting server...");
    let app = router(state.clone());

    let address = format!("0.0.0.0:{}", state.config.port);
    info!("Binding to {address}");

    let listener = TcpListener::bind(&address).await?;
    info!(
        "Server running on {address}, forwarding to {}",
        state.remote.base_url()
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shut down");

    Ok(())
}

pub fn router(state: Arc<State>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, HeaderName::from_static(ADMIN_HEADER)])
        .max_age(state.config.cors_max_age);

    Router::new()
        .route("/trees", post(create_tree_handler))
        .route("/trees/join", post(join_tree_handler))
        .route(
            "/trees/{tree_id}/notes",
            get(tree_notes_handler).post(create_note_handler),
        )
        .route("/users/{user_id}/trees", get(user_trees_handler))
        .route("/users/{user_id}/trees/public", get(public_tree_handler))
        .route(
            "/notes/{note_id}/comments",
            get(comments_handler).post(create_comment_handler),
        )
        .route(
            "/notes/{note_id}/likes",
            post(like_handler).delete(unlike_handler),
        )
        .route("/admin/users", get(admin_users_handler))
        .route("/admin/users/{user_id}/notes", get(admin_user_notes_handler))
        .route(
            "/admin/users/{user_id}/comments",
            get(admin_user_comments_handler),
        )
        .route("/admin/users/{user_id}/{action}", patch(sanction_user_handler))
        .route("/admin/notes/{note_id}", delete(delete_note_handler))
        .route("/admin/notes/{note_id}/{action}", patch(moderate_note_handler))
        .route("/admin/comments/{comment_id}", delete(delete_comment_handler))
        .route(
            "/admin/comments/{comment_id}/{action}",
            patch(moderate_comment_handler),
        )
        .route("/admin/logs", get(admin_logs_handler))
        .layer(cors)
        .with_state(state)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
