use super::{MappingStore, StorePersister};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc::{channel, error::TrySendError, Receiver, Sender};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

const QUEUE_DEPTH: usize = 8;

/// Sending half of the mapping-file writer.
///
/// Every request carries the full store, so dropping one when the queue is full
/// loses nothing the next request does not repeat.
#[derive(Clone, Debug)]
pub struct PersistenceHandle {
    tx: Sender<MappingStore>,
}

pub struct PersistenceWorker {
    handle: JoinHandle<()>,
    cancel: CancellationToken,
}

impl PersistenceHandle {
    /// Spawns the writer task for `path` and returns its handle plus the worker.
    pub fn spawn(path: PathBuf) -> (Self, PersistenceWorker) {
        let (tx, rx) = channel::<MappingStore>(QUEUE_DEPTH);
        let cancel = CancellationToken::new();
        let token = cancel.clone();

        info!("Starting persistence worker for {:?}", path);
        let handle = tokio::spawn(run_worker(path, rx, token));

        (Self { tx }, PersistenceWorker { handle, cancel })
    }
}

impl StorePersister for PersistenceHandle {
    fn persist(&mut self, store: &MappingStore) {
        match self.tx.try_send(store.clone()) {
            Ok(()) => debug!("Save requested"),
            Err(TrySendError::Full(_)) => warn!("Persistence queue full, save request dropped"),
            Err(TrySendError::Closed(_)) => error!("Persistence worker gone, save request lost"),
        }
    }
}

impl PersistenceWorker {
    /// Stops the worker after it has written every queued request.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.handle.await {
            error!("Persistence worker panicked: {}", e);
        }
    }
}

async fn run_worker(path: PathBuf, mut rx: Receiver<MappingStore>, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            request = rx.recv() => match request {
                Some(store) => write_latest(&path, store, &mut rx).await,
                None => break,
            },
        }
    }

    rx.close();
    let mut pending = None;
    while let Ok(store) = rx.try_recv() {
        pending = Some(store);
    }
    if let Some(store) = pending {
        debug!("Flushing pending save on shutdown");
        write(&path, &store).await;
    }
    info!("Persistence worker stopped");
}

// Skip to the newest queued state before touching the disk
async fn write_latest(path: &Path, mut store: MappingStore, rx: &mut Receiver<MappingStore>) {
    while let Ok(newer) = rx.try_recv() {
        store = newer;
    }
    write(path, &store).await;
}

async fn write(path: &Path, store: &MappingStore) {
    if let Err(e) = store.save(path).await {
        error!("{}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn shutdown_flushes_queued_saves() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mapping.conf");
        let (mut handle, worker) = PersistenceHandle::spawn(path.clone());

        let mut store = MappingStore::defaults();
        store.set_mouse_sensitivity(1.6);
        handle.persist(&store);
        store.set_mouse_sensitivity(1.8);
        handle.persist(&store);

        worker.shutdown().await;

        let saved = MappingStore::load(&path).await.unwrap();
        assert_eq!(saved.mouse_sensitivity(), 1.8);
    }

    #[tokio::test]
    async fn persist_after_shutdown_is_harmless() {
        let dir = tempfile::tempdir().unwrap();
        let (mut handle, worker) = PersistenceHandle::spawn(dir.path().join("mapping.conf"));
        worker.shutdown().await;
        handle.persist(&MappingStore::defaults());
    }
}
