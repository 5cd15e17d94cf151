use super::DbPool;
use crate::errors::StorageError;
use diesel::SqliteConnection;
use homebook_core::errors::{DatabaseError, Error, Result};
use log::error;
use std::any::Any;
use tokio::sync::{mpsc, oneshot};

// A write job runs on the actor's connection and returns a core Result.
type Job<T> = Box<dyn FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static>;
type ErasedResult = Result<Box<dyn Any + Send + 'static>>;
type Envelope = (Job<Box<dyn Any + Send + 'static>>, oneshot::Sender<ErasedResult>);

/// Handle for sending jobs to the writer actor.
#[derive(Clone)]
pub struct WriteHandle {
    tx: mpsc::Sender<Envelope>,
}

fn actor_stopped() -> Error {
    Error::Database(DatabaseError::Internal(
        "The database writer is not running".to_string(),
    ))
}

impl WriteHandle {
    /// Executes `job` on the writer's dedicated connection inside an
    /// immediate transaction. An error returned by the job rolls it back.
    pub async fn exec<F, T>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut SqliteConnection) -> Result<T> + Send + 'static,
        T: Send + 'static + Any,
    {
        let (ret_tx, ret_rx) = oneshot::channel();

        self.tx
            .send((
                Box::new(move |c| job(c).map(|v| Box::new(v) as Box<dyn Any + Send>)),
                ret_tx,
            ))
            .await
            .map_err(|_| actor_stopped())?;

        let boxed = ret_rx.await.map_err(|_| actor_stopped())??;
        boxed.downcast::<T>().map(|value| *value).map_err(|_| {
            Error::Unexpected("Writer actor returned a value of an unexpected type".to_string())
        })
    }
}

/// Spawns the single writer task. It holds one pooled connection for its
/// whole lifetime and processes jobs strictly one after another.
pub fn spawn_writer(pool: DbPool) -> WriteHandle {
    let (tx, mut rx) = mpsc::channel::<Envelope>(1024);

    tokio::spawn(async move {
        let mut conn = match pool.get() {
            Ok(conn) => conn,
            Err(e) => {
                error!("Database writer could not acquire a connection: {}", e);
                while let Some((_, reply_tx)) = rx.recv().await {
                    let _ = reply_tx.send(Err(Error::Database(DatabaseError::ConnectionFailed(
                        e.to_string(),
                    ))));
                }
                return;
            }
        };

        while let Some((job, reply_tx)) = rx.recv().await {
            let result: ErasedResult = conn
                .immediate_transaction::<_, StorageError, _>(|c| job(c).map_err(StorageError::from))
                .map_err(Error::from);

            // The requester may have gone away (timeout, cancelled request).
            let _ = reply_tx.send(result);
        }
    });

    WriteHandle { tx }
}
