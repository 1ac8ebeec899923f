//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health            - Health check (registered in main)
//! POST /api/revalidate    - Shopify webhook, invalidates cache tags
//! ```

pub mod revalidate;

use axum::{Router, routing::post};

use crate::state::AppState;

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/revalidate", post(revalidate::revalidate))
}
