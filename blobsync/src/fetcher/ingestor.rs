//! The ingestion loop.
//!
//! Each cycle fetches the latest blob, saves the first (most recent) one if any and then sleeps for the
//! poll interval. Errors never leave a cycle; they are logged and the next cycle starts after the sleep as
//! usual. The sleep doubles as the shutdown check, i.e. a shutdown request interrupts it immediately.

use crate::fetcher::BlobSink;
use crate::fetcher::BlobSource;
use blobsync_lib::database::handler::blob::InsertOutcome;
use log::debug;
use log::error;
use log::info;
use std::sync::mpsc::Receiver;
use std::sync::mpsc::RecvTimeoutError;
use std::time::Duration;

/// What happened during a single cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cycle {
    Inserted(i64),
    Duplicate(i64),
    Empty,
    FetchFailed,
    PersistFailed(i64),
}

pub struct Ingestor<S, K> {
    source: S,
    sink: K,
    poll_interval: Duration,
}

impl<S: BlobSource, K: BlobSink> Ingestor<S, K> {
    pub fn new(source: S, sink: K, poll_interval: Duration) -> Self {
        Ingestor { source, sink, poll_interval }
    }

    pub fn run_cycle(&self) -> Cycle {
        let blobs = match self.source.fetch_latest() {
            Ok(blobs) => blobs,
            Err(why) => {
                error!("Error fetching blobs; {why}");
                return Cycle::FetchFailed;
            }
        };

        // Only the first blob is of interest, the query never asks for more than one
        let blob = match blobs.first() {
            Some(blob) => blob,
            None => {
                debug!("No blobs returned, skipping");
                return Cycle::Empty;
            }
        };

        match self.sink.save(blob) {
            Ok(InsertOutcome::Inserted) => {
                info!("Successfully saved blob ID {}", blob.id);
                Cycle::Inserted(blob.id)
            }

            Ok(InsertOutcome::Skipped) => {
                debug!("Blob ID {} already saved, skipping", blob.id);
                Cycle::Duplicate(blob.id)
            }

            Err(why) => {
                error!("Error saving blob to PostgreSQL; {why}");
                Cycle::PersistFailed(blob.id)
            }
        }
    }

    /// Runs cycles until a message is received on (or the sender of) `shutdown` is dropped.
    pub fn run(&self, shutdown: &Receiver<()>) {
        loop {
            self.run_cycle();

            match shutdown.recv_timeout(self.poll_interval) {
                Err(RecvTimeoutError::Timeout) => continue,

                Ok(()) | Err(RecvTimeoutError::Disconnected) => {
                    info!("Shutdown requested, stopping ingestion");
                    return;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use blobsync_lib::error::Error;
    use blobsync_lib::model::Blob;
    use blobsync_lib::model::BlobTx;
    use blobsync_lib::model::Namespace;
    use std::cell::Cell;
    use std::cell::RefCell;
    use std::collections::HashSet;
    use std::collections::VecDeque;
    use std::sync::mpsc;
    use std::sync::mpsc::Sender;

    fn blob(id: i64) -> Blob {
        Blob {
            id,
            commitment: "abc".to_string(),
            size: 100,
            height: 5000,
            time: "2024-01-01T00:00:00Z".parse().unwrap(),
            signer: "sgn1".to_string(),
            content_type: "application/octet".to_string(),
            namespace: Namespace { namespace_id: "ns1".to_string() },
            tx: BlobTx { id: 7, height: 5000, position: 1, hash: "0xdead".to_string() },
        }
    }

    fn status_error() -> Error {
        Error::HttpStatus { code: 500, reason: "Internal Server Error".to_string() }
    }

    /// Replays queued responses and requests a shutdown once they're exhausted.
    struct FakeSource {
        responses: RefCell<VecDeque<Result<Vec<Blob>, Error>>>,
        calls: Cell<usize>,
        shutdown: Option<Sender<()>>,
    }

    impl FakeSource {
        fn new(responses: Vec<Result<Vec<Blob>, Error>>) -> Self {
            FakeSource { responses: RefCell::new(responses.into()), calls: Cell::new(0), shutdown: None }
        }

        fn with_shutdown(mut self, shutdown: Sender<()>) -> Self {
            self.shutdown = Some(shutdown);
            self
        }
    }

    impl BlobSource for FakeSource {
        fn fetch_latest(&self) -> Result<Vec<Blob>, Error> {
            self.calls.set(self.calls.get() + 1);

            let response = self.responses.borrow_mut().pop_front().unwrap_or_else(|| Ok(Vec::new()));
            if self.responses.borrow().is_empty() {
                if let Some(shutdown) = &self.shutdown {
                    let _ = shutdown.send(());
                }
            }

            response
        }
    }

    /// In-memory sink with insert-or-ignore semantics.
    #[derive(Default)]
    struct FakeSink {
        saved: RefCell<Vec<i64>>,
        ids: RefCell<HashSet<i64>>,
        failing: bool,
    }

    impl BlobSink for FakeSink {
        fn save(&self, blob: &Blob) -> Result<InsertOutcome, Error> {
            if self.failing {
                return Err(Error::DatabasePersist(blob.id, diesel_error()));
            }

            self.saved.borrow_mut().push(blob.id);
            match self.ids.borrow_mut().insert(blob.id) {
                true => Ok(InsertOutcome::Inserted),
                false => Ok(InsertOutcome::Skipped),
            }
        }
    }

    fn diesel_error() -> diesel::result::Error {
        diesel::result::Error::NotFound
    }

    fn ingestor(source: FakeSource, sink: FakeSink) -> Ingestor<FakeSource, FakeSink> {
        Ingestor::new(source, sink, Duration::ZERO)
    }

    #[test]
    fn fetch_error_persists_nothing() {
        let ingestor = ingestor(FakeSource::new(vec![Err(status_error())]), FakeSink::default());

        assert_eq!(ingestor.run_cycle(), Cycle::FetchFailed);
        assert!(ingestor.sink.saved.borrow().is_empty());
    }

    #[test]
    fn empty_response_persists_nothing() {
        let ingestor = ingestor(FakeSource::new(vec![Ok(Vec::new())]), FakeSink::default());

        assert_eq!(ingestor.run_cycle(), Cycle::Empty);
        assert!(ingestor.sink.saved.borrow().is_empty());
    }

    #[test]
    fn only_first_blob_is_persisted() {
        let ingestor =
            ingestor(FakeSource::new(vec![Ok(vec![blob(3), blob(2), blob(1)])]), FakeSink::default());

        assert_eq!(ingestor.run_cycle(), Cycle::Inserted(3));
        assert_eq!(*ingestor.sink.saved.borrow(), vec![3]);
    }

    #[test]
    fn duplicate_blob_is_skipped() {
        let ingestor = ingestor(FakeSource::new(vec![Ok(vec![blob(42)]), Ok(vec![blob(42)])]), FakeSink::default());

        assert_eq!(ingestor.run_cycle(), Cycle::Inserted(42));
        assert_eq!(ingestor.run_cycle(), Cycle::Duplicate(42));
        assert_eq!(ingestor.sink.ids.borrow().len(), 1);
    }

    #[test]
    fn persist_error_is_contained() {
        let sink = FakeSink { failing: true, ..FakeSink::default() };
        let ingestor = ingestor(FakeSource::new(vec![Ok(vec![blob(42)]), Ok(vec![blob(43)])]), sink);

        assert_eq!(ingestor.run_cycle(), Cycle::PersistFailed(42));
        assert_eq!(ingestor.run_cycle(), Cycle::PersistFailed(43));
    }

    #[test]
    fn run_resumes_after_fetch_error() {
        let (tx, rx) = mpsc::channel();
        let source = FakeSource::new(vec![Err(status_error()), Ok(vec![blob(42)])]).with_shutdown(tx);
        let ingestor = ingestor(source, FakeSink::default());

        ingestor.run(&rx);

        assert_eq!(ingestor.source.calls.get(), 2);
        assert_eq!(*ingestor.sink.saved.borrow(), vec![42]);
    }

    #[test]
    fn run_stops_on_shutdown() {
        let (tx, rx) = mpsc::channel();
        tx.send(()).unwrap();

        let ingestor = Ingestor::new(FakeSource::new(Vec::new()), FakeSink::default(), Duration::from_secs(3600));
        ingestor.run(&rx);

        assert_eq!(ingestor.source.calls.get(), 1);
    }

    #[test]
    fn run_stops_when_sender_is_dropped() {
        let (tx, rx) = mpsc::channel::<()>();
        drop(tx);

        let ingestor = Ingestor::new(FakeSource::new(Vec::new()), FakeSink::default(), Duration::from_secs(3600));
        ingestor.run(&rx);

        assert_eq!(ingestor.source.calls.get(), 1);
    }
}
