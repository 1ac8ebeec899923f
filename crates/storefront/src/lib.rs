//! Shopfront storefront library.
//!
//! Typed access to the Shopify Storefront API with a tag-invalidated
//! response cache, plus the webhook endpoint that invalidates it.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod routes;
pub mod services;
pub mod shopify;
pub mod state;
