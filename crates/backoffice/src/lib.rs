//! Acme Back Office library.
//!
//! This crate provides the back office functionality as a library,
//! allowing it to be tested and reused.
//!
//! # Architecture
//!
//! The service is a query-and-mutate resource layer over three related
//! resources: customers, products, and invoices (read-only). Every mutation
//! follows the same shape: validate untrusted form input, persist any
//! uploaded asset, write a single parameterized statement to `PostgreSQL`,
//! then invalidate the cached list view for that resource.
//!
//! - [`forms`] - Per-resource validation schemas for untrusted form fields
//! - [`assets`] - Image uploads written under a resource-scoped public path
//! - [`db`] - Filtered, paginated, optionally aggregated read queries and
//!   the single-statement write queries
//! - [`cache`] - Cached list views, invalidated after every mutation
//! - [`actions`] - Mutation orchestration (validate, asset, write, invalidate)
//! - [`routes`] - HTTP entry points consumed by the presentation layer

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod actions;
pub mod assets;
pub mod cache;
pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod routes;
pub mod state;
