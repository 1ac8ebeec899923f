//! Business logic services for storefront.
//!
//! # Services
//!
//! - `revalidation` - Webhook-driven cache invalidation

pub mod revalidation;

pub use revalidation::{RevalidationOutcome, WebhookTopic, revalidate};
