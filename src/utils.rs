use std::future::Future;

use futures::future::{self, AbortHandle};
use tokio::task::spawn_local;

/// Handle of a task spawned with [`spawn_abortable`].
///
/// The task is aborted once this handle is dropped.
#[derive(Debug)]
pub struct TaskHandle(AbortHandle);

impl Drop for TaskHandle {
    fn drop(&mut self) {
        self.0.abort();
    }
}

/// Spawns the provided future on the current [`LocalSet`] and returns the
/// [`TaskHandle`] owning it.
///
/// # Panics
///
/// If called outside of a [`LocalSet`].
///
/// [`LocalSet`]: tokio::task::LocalSet
pub fn spawn_abortable<F>(fut: F) -> TaskHandle
where
    F: Future<Output = ()> + 'static,
{
    let (fut, handle) = future::abortable(fut);
    spawn_local(async move {
        let _ = fut.await;
    });
    TaskHandle(handle)
}
