//! The worker-pool contract (spec §6) and a ready-to-use default pool.
//!
//! The library never constructs a pool on its own — `WorkerPool` is the
//! capability the parallel executor requires from whatever the caller
//! injects. `ThreadPool` is provided as a default implementation behind
//! that trait, so the rest of the crate stays generic over it.

use arrowline_core::Error;
use crate::parallel::Deferred;
use crossbeam::channel::{Receiver, Sender};
use parking_lot::Mutex;
use std::any::Any;
use std::sync::Arc;
use std::thread::JoinHandle;

/// `submit(task) ⟶ Future[r]` (spec §3, §6). Implementors may run `task`
/// however they like; the only contract is that the returned `Deferred`
/// eventually resolves to `task`'s return value, or to the panic it raised.
pub trait WorkerPool: Send + Sync {
    fn submit<F, T>(&self, task: F) -> Deferred<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static;

    /// Submit work whose result nobody will force. Used by `cons_split_wire`
    /// to broadcast one computed value to two independently-owned channels
    /// without keeping a `Deferred` around for the broadcasting task itself.
    fn submit_detached(&self, task: impl FnOnce() + Send + 'static)
    where
        Self: Sized,
    {
        let _ = self.submit(task);
    }
}

type Job = Box<dyn FnOnce() + Send + 'static>;

struct ThreadPoolInner {
    sender: Mutex<Option<Sender<Job>>>,
    workers: Mutex<Vec<JoinHandle<()>>>,
}

impl Drop for ThreadPoolInner {
    fn drop(&mut self) {
        self.sender.lock().take();
        let mut workers = self.workers.lock();
        for handle in workers.drain(..) {
            let _ = handle.join();
        }
    }
}

/// A small fixed-size thread pool. Configured via [`ThreadPoolBuilder`].
#[derive(Clone)]
pub struct ThreadPool {
    inner: Arc<ThreadPoolInner>,
}

impl ThreadPool {
    /// The worker-pool contract's `shutdown(wait=bool)` equivalent: close
    /// the job channel so idle workers exit, optionally blocking until they
    /// have.
    pub fn shutdown(&self, wait: bool) {
        self.inner.sender.lock().take();
        if wait {
            let mut workers = self.inner.workers.lock();
            for handle in workers.drain(..) {
                let _ = handle.join();
            }
        }
    }
}

impl WorkerPool for ThreadPool {
    fn submit<F, T>(&self, task: F) -> Deferred<T>
    where
        F: FnOnce() -> T + Send + 'static,
        T: Send + 'static,
    {
        let (tx, rx) = crossbeam::channel::bounded(1);
        let job: Job = Box::new(move || {
            let result =
                std::panic::catch_unwind(std::panic::AssertUnwindSafe(task)).map_err(downcast_panic);
            let _ = tx.send(result);
        });

        let sender = self.inner.sender.lock();
        match sender.as_ref() {
            Some(sender) => {
                tracing::trace!("submitting task to thread pool");
                if sender.send(job).is_err() {
                    tracing::error!("thread pool's job channel is disconnected");
                }
            }
            None => tracing::error!("submit called on a shut-down thread pool"),
        }
        Deferred::pending(rx)
    }
}

pub(crate) fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked with a non-string payload".to_string()
    }
}

/// Recover a task's panic as an `Error`, preserving its original variant
/// when the payload is one of our own (e.g. `cons_dictionary_wire`'s
/// `Error::ContractViolation` panicking through `Deferred::result()`
/// somewhere inside the task body). Anything else — a plain `panic!("boom")`
/// from user code — still becomes `Error::UserTaskFailure` via its rendered
/// message, as before.
pub(crate) fn downcast_panic(payload: Box<dyn Any + Send>) -> Error {
    match payload.downcast::<Error>() {
        Ok(err) => *err,
        Err(payload) => Error::user_task_failure(panic_message(payload)),
    }
}

fn spawn_workers(receiver: Receiver<Job>, count: usize, name_prefix: &str) -> Vec<JoinHandle<()>> {
    (0..count)
        .map(|i| {
            let receiver = receiver.clone();
            std::thread::Builder::new()
                .name(format!("{name_prefix}-{i}"))
                .spawn(move || {
                    while let Ok(job) = receiver.recv() {
                        job();
                    }
                })
                .expect("failed to spawn worker thread")
        })
        .collect()
}

/// Configures a [`ThreadPool`] (spec §10.3): `.workers()` defaults to
/// available parallelism, `.name_prefix()` names worker threads for
/// `tracing` spans and panic messages.
pub struct ThreadPoolBuilder {
    workers: usize,
    name_prefix: String,
}

impl Default for ThreadPoolBuilder {
    fn default() -> Self {
        ThreadPoolBuilder {
            workers: num_cpus::get().max(1),
            name_prefix: "arrowline-worker".to_string(),
        }
    }
}

impl ThreadPoolBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn name_prefix(mut self, name_prefix: impl Into<String>) -> Self {
        self.name_prefix = name_prefix.into();
        self
    }

    pub fn build(self) -> ThreadPool {
        let (sender, receiver) = crossbeam::channel::unbounded();
        let workers = spawn_workers(receiver, self.workers, &self.name_prefix);
        tracing::debug!(
            workers = self.workers,
            name_prefix = %self.name_prefix,
            "built thread pool"
        );
        ThreadPool {
            inner: Arc::new(ThreadPoolInner {
                sender: Mutex::new(Some(sender)),
                workers: Mutex::new(workers),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn submit_runs_the_task_and_resolves_the_future() {
        let pool = ThreadPoolBuilder::new().workers(2).build();
        let future = pool.submit(|| 2 + 2);
        assert_eq!(future.result(), 4);
        pool.shutdown(true);
    }

    #[test]
    fn a_panicking_task_surfaces_as_a_user_task_failure_at_result() {
        let pool = ThreadPoolBuilder::new().workers(1).build();
        let future: Deferred<i32> = pool.submit(|| panic!("boom"));
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| future.result()));
        let err = *outcome.unwrap_err().downcast::<Error>().expect("payload should carry an Error");
        assert!(matches!(err, Error::UserTaskFailure { .. }));
        assert!(err.to_string().contains("boom"));
        pool.shutdown(true);
    }

    #[test]
    fn a_contract_violation_panic_keeps_its_variant_through_submit() {
        let pool = ThreadPoolBuilder::new().workers(1).build();
        let future: Deferred<i32> =
            pool.submit(|| std::panic::panic_any(Error::contract_violation("missing key 'pi'")));
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| future.result()));
        let err = *outcome.unwrap_err().downcast::<Error>().expect("payload should carry an Error");
        assert!(matches!(err, Error::ContractViolation { .. }));
        pool.shutdown(true);
    }

    #[test]
    fn shutdown_lets_in_flight_workers_drain_before_joining() {
        let pool = ThreadPoolBuilder::new().workers(1).build();
        let futures: Vec<_> = (0..8).map(|i| pool.submit(move || i * i)).collect();
        let results: Vec<i32> = futures.into_iter().map(Deferred::result).collect();
        assert_eq!(results, vec![0, 1, 4, 9, 16, 25, 36, 49]);
        pool.shutdown(true);
    }
}
