use std::sync::mpsc;

use super::load::{DecodedLoad, PendingLoad};

/// Runs `work` on a background thread and returns the channel its result arrives on.
pub fn spawn_worker_action<T, W>(work: W) -> mpsc::Receiver<T>
where
    T: Send + 'static,
    W: FnOnce() -> T + Send + 'static,
{
    let (tx, rx) = mpsc::channel::<T>();
    std::thread::spawn(move || {
        let result = work();
        let _ = tx.send(result);
    });
    rx
}

/// Decodes `pending` off the editing thread. Feed the result to `finish_load`.
pub fn spawn_decode(pending: PendingLoad) -> mpsc::Receiver<DecodedLoad> {
    let generation = pending.generation();
    tracing::debug!(generation, "decode dispatched to worker");
    spawn_worker_action(move || pending.decode())
}
