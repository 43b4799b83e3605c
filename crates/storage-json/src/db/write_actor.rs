use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, RwLock};

use log::error;
use tokio::sync::{mpsc, oneshot};

use super::{DataFiles, Tables};
use crate::errors::StorageError;
use caixinha_core::Result;

// A job edits a draft copy of the tables. The draft is published only after
// the changed tables were written to disk.
type Job<T> = Box<dyn FnOnce(&mut Tables) -> Result<T> + Send + 'static>;

type Erased = Box<dyn Any + Send + 'static>;

enum Command {
    Exec(Job<Erased>, oneshot::Sender<Result<Erased>>),
    Flush(oneshot::Sender<Result<()>>),
}

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Command>,
}

impl WriteHandle {
    /// Executes a job on the writer actor.
    ///
    /// The job runs against a copy of the tables; returning an error discards
    /// the copy, so a failed job never changes memory or disk.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut Tables) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();
        let job: Job<Erased> = Box::new(move |tables| job(tables).map(|v| Box::new(v) as Erased));

        self.tx
            .send(Command::Exec(job, ret_tx))
            .await
            .map_err(|_| StorageError::WriterStopped)?;

        let boxed = ret_rx.await.map_err(|_| StorageError::WriterStopped)??;
        boxed
            .downcast::<T>()
            .map(|value| *value)
            .map_err(|_| caixinha_core::Error::Unexpected("Writer returned an unexpected type".into()))
    }

    /// Rewrites both table files from the current in-memory state.
    pub async fn flush(&self) -> Result<()> {
        let (ret_tx, ret_rx) = oneshot::channel();
        self.tx
            .send(Command::Flush(ret_tx))
            .await
            .map_err(|_| StorageError::WriterStopped)?;
        ret_rx.await.map_err(|_| StorageError::WriterStopped)?
    }
}

/// Spawns a background Tokio task that is the single writer of both tables.
///
/// The task ends when every `WriteHandle` has been dropped.
pub fn spawn_writer(files: DataFiles, state: Arc<RwLock<Tables>>) -> WriteHandle {
    // The channel is bounded; 1024 is an arbitrary size.
    let (tx, mut rx) = mpsc::channel::<Command>(1024);

    tokio::spawn(async move {
        while let Some(command) = rx.recv().await {
            match command {
                Command::Exec(job, reply_tx) => {
                    let result = run_job(&files, &state, job);
                    // The requester may have gone away (timeout, cancellation).
                    let _ = reply_tx.send(result);
                }
                Command::Flush(reply_tx) => {
                    let result: Result<()> = read_snapshot(&state)
                        .and_then(|tables| files.write_all(&tables))
                        .map_err(|e| {
                            error!("Flushing tables failed: {}", e);
                            e.into()
                        });
                    let _ = reply_tx.send(result);
                }
            }
        }
    });

    WriteHandle { tx }
}

fn read_snapshot(state: &RwLock<Tables>) -> std::result::Result<Tables, StorageError> {
    state
        .read()
        .map(|tables| tables.clone())
        .map_err(|_| StorageError::LockPoisoned)
}

fn run_job(files: &DataFiles, state: &RwLock<Tables>, job: Job<Erased>) -> Result<Erased> {
    let before = read_snapshot(state)?;
    let mut draft = before.clone();
    let value = match panic::catch_unwind(AssertUnwindSafe(|| job(&mut draft))) {
        Ok(result) => result?,
        Err(_) => {
            error!("Writer job panicked; its changes were discarded");
            return Err(StorageError::JobPanicked.into());
        }
    };

    if draft == before {
        return Ok(value);
    }

    // A job touching both tables can leave the first file written when the
    // second write fails; memory keeps the old state in that case.
    if let Err(e) = files.write_changes(&before, &draft) {
        error!("Persisting tables failed: {}", e);
        return Err(e.into());
    }

    let mut current = state.write().map_err(|_| StorageError::LockPoisoned)?;
    *current = draft;
    Ok(value)
}
