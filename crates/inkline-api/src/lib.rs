//! JSON REST API for the Inkline engine.
//!
//! Exposes an axum [`Router`] over a shared [`Engine`]. Mutations return
//! the uniform `{ ok, data?, error? }` envelope; reads return plain
//! projections. Authentication transport is the caller's responsibility —
//! the verified account id arrives in the `x-account-id` header.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = inkline_api::router(Arc::new(Engine::new()));
//! ```

pub mod accounts;
pub mod content;
pub mod engagement;
pub mod error;
pub mod extract;
pub mod feed;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, patch, post, put},
};
use inkline_engine::Engine;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

pub use error::{ApiError, Mutation};

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and the
/// `INKLINE_*` environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host: String,
  #[serde(default = "default_port")]
  pub port: u16,
}

fn default_host() -> String {
  "127.0.0.1".to_string()
}

fn default_port() -> u16 {
  8750
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API router for `engine`.
pub fn router(engine: Arc<Engine>) -> Router {
  Router::new()
    // Session & accounts
    .route("/session/login", post(accounts::login))
    .route("/accounts/{id}", get(accounts::get_account))
    .route("/profile", patch(accounts::update_profile))
    .route("/notifications", get(accounts::notifications))
    .route("/notifications/read", post(accounts::mark_notifications_read))
    .route("/creators", get(accounts::creators))
    .route("/creators/{id}", get(accounts::creator_profile))
    .route(
      "/creators/{id}/follow",
      post(accounts::follow).delete(accounts::unfollow),
    )
    // Content lifecycle
    .route("/series", get(content::list_series).post(content::create_series))
    .route(
      "/series/{id}",
      get(content::series_detail).patch(content::update_series),
    )
    .route(
      "/series/{id}/chapters",
      get(content::chapters_of_series).post(content::create_chapter_draft),
    )
    .route("/drafts", get(content::draft_chapters))
    .route("/chapters/{id}", get(content::get_chapter))
    .route(
      "/chapters/{id}/pages",
      get(content::chapter_pages).post(content::add_page),
    )
    .route("/chapters/{id}/pages/reorder", post(content::reorder_pages))
    .route("/chapters/{id}/pages/{n}/asset", put(content::replace_page_asset))
    .route("/chapters/{id}/publish", post(content::publish_chapter))
    .route("/chapters/{id}/unpublish", post(content::unpublish_chapter))
    .route("/chapters/{id}/view", post(content::record_view))
    // Engagement
    .route("/chapters/{id}/pages/{n}/thread", get(engagement::page_thread))
    .route("/chapters/{id}/pages/{n}/overlay", get(engagement::overlay))
    .route("/chapters/{id}/pages/{n}/comments", post(engagement::add_comment))
    .route("/chapters/{id}/pages/{n}/reactions", post(engagement::add_reaction))
    .route("/comments/{id}", delete(engagement::delete_comment))
    .route("/comments/{id}/vote", post(engagement::vote_comment))
    .route("/comments/{id}/pin", put(engagement::pin_comment))
    .route("/reports", post(engagement::report))
    // Discovery
    .route("/feed", get(feed::home_feed))
    .route("/search", get(feed::search))
    .route(
      "/rankings/{period}/{kind}",
      get(feed::rankings).put(feed::install_rollup),
    )
    .layer(TraceLayer::new_for_http())
    .with_state(engine)
}

// ─── Integration tests ────────────────────────────────────────────────────────
