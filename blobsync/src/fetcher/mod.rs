//! Polls Celenium for the most recent rollup blob and stores it in the database.

pub mod ingestor;

use blobsync_lib::api::celenium::CeleniumClient;
use blobsync_lib::database::handler::blob::InsertOutcome;
use blobsync_lib::database::handler::DatabaseClient;
use blobsync_lib::error::Error;
use blobsync_lib::model::Blob;

/// Where blobs come from.
pub trait BlobSource {
    /// Returns the most recent blobs, newest first.
    fn fetch_latest(&self) -> Result<Vec<Blob>, Error>;
}

/// Where blobs go to.
pub trait BlobSink {
    /// Stores the blob unless a blob with the same ID has already been stored.
    fn save(&self, blob: &Blob) -> Result<InsertOutcome, Error>;
}

impl BlobSource for CeleniumClient {
    fn fetch_latest(&self) -> Result<Vec<Blob>, Error> {
        self.get_latest_blobs()
    }
}

impl BlobSink for DatabaseClient {
    fn save(&self, blob: &Blob) -> Result<InsertOutcome, Error> {
        self.blob().insert(blob)
    }
}
