//! # Database module — PostgreSQL profile persistence
//!
//! Entirely gated behind `#[cfg(feature = "server")]` so that client (WASM) builds
//! never pull in SQLx or Tokio networking code.
//!
//! ## Design
//!
//! The pool is a **lazy, process-wide singleton** backed by a [`tokio::sync::OnceCell`].
//! The first call to [`get_pool`] reads `DATABASE_URL` from the environment (via `dotenvy`),
//! opens a connection pool with up to 5 connections, and caches the result for all
//! subsequent callers.
//!
//! [`PgProfileStore`] implements [`store::ProfileStore`] on top of the pool. Its insert
//! uses `ON CONFLICT (id) DO NOTHING`, so a lost provisioning race shows up as
//! [`store::StoreError::DuplicateKey`] instead of a database error.

#[cfg(feature = "server")]
mod pool;
#[cfg(feature = "server")]
mod profiles;

#[cfg(feature = "server")]
pub use pool::get_pool;
#[cfg(feature = "server")]
pub use profiles::PgProfileStore;
