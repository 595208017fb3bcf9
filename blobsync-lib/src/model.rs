//! Structs that are both used in the Celenium API as well as the Database schema / bindings.

#![allow(clippy::extra_unused_lifetimes)] // Clippy complains about the Insertable proc-macro

use crate::database::schema::*;
use chrono::DateTime;
use chrono::Utc;
use diesel::Insertable;
use diesel::Queryable;
use serde::Deserialize;
use serde::Serialize;

/// A blob published by a rollup, as returned by the `/v1/rollup/{id}/blobs` endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Blob {
    pub id: i64,
    pub commitment: String,
    pub size: i64,
    pub height: i64,
    pub time: DateTime<Utc>,
    pub signer: String,
    pub content_type: String,
    pub namespace: Namespace,
    pub tx: BlobTx,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    pub namespace_id: String,
}

/// Transaction the blob was published with.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct BlobTx {
    pub id: i64,
    pub height: i64,
    pub position: i32,
    pub hash: String,
}

impl Blob {
    pub fn to_insertable(&self) -> BlobDatabase {
        BlobDatabase {
            id: self.id,
            commitment: self.commitment.clone(),
            size: self.size,
            height: self.height,
            time: self.time,
            signer: self.signer.clone(),
            content_type: self.content_type.clone(),
            namespace_id: self.namespace.namespace_id.clone(),
            tx_id: self.tx.id,
            tx_height: self.tx.height,
            tx_position: self.tx.position,
            tx_hash: self.tx.hash.clone(),
        }
    }
}

/// Flattened row of the `blobs` table; namespace and transaction attributes become top-level columns.
#[derive(Queryable, Insertable, Debug, Clone, PartialEq, Eq)]
#[table_name = "blobs"]
pub struct BlobDatabase {
    pub id: i64,
    pub commitment: String,
    pub size: i64,
    pub height: i64,
    pub time: DateTime<Utc>,
    pub signer: String,
    pub content_type: String,
    pub namespace_id: String,
    pub tx_id: i64,
    pub tx_height: i64,
    pub tx_position: i32,
    pub tx_hash: String,
}
