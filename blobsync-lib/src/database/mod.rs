//! PostgreSQL bindings; the `blobs` table definition lives in `sql/blobs.sql` and mirrors `schema.rs`.

pub mod handler;
pub mod schema;

/// Idempotent DDL creating the `blobs` table if absent.
pub(crate) const BLOBS_TABLE: &str = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/sql/blobs.sql"));
