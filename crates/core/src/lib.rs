//! Shopfront Core - Shared types library.
//!
//! This crate provides common types used across all Shopfront components:
//! - `storefront` - Storefront API client, response cache and revalidation webhook
//! - `integration-tests` - End-to-end tests against a mocked upstream
//!
//! # Architecture
//!
//! The core crate contains only types and pure helpers - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Money values, product sort catalogue, storefront URL helper

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
