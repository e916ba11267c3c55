//! `Deferred<T>` (spec §3 "Deferred value (`Future[a]`)"): a handle to an
//! in-flight or already-completed task.

use arrowline_core::Error;
use crossbeam::channel::Receiver;
use std::thread;

enum Inner<T> {
    Pending(Receiver<Result<T, Error>>),
    Ready(Result<T, Error>),
}

/// A `Future[a]`. `result()` blocks until the task has produced a value;
/// `Deferred::ready` constructs one with an immediately-set result, as §3
/// permits.
pub struct Deferred<T> {
    inner: Inner<T>,
}

impl<T> Deferred<T> {
    pub fn ready(value: T) -> Self {
        Deferred {
            inner: Inner::Ready(Ok(value)),
        }
    }

    pub(crate) fn pending(receiver: Receiver<Result<T, Error>>) -> Self {
        Deferred {
            inner: Inner::Pending(receiver),
        }
    }

    /// Resolve without panicking, for internal plumbing (`unsplit`,
    /// `cons_if_component`'s dispatch) that wants to keep propagating a
    /// task failure as a value rather than unwind immediately.
    pub(crate) fn into_result(self) -> Result<T, Error> {
        match self.inner {
            Inner::Ready(r) => r,
            Inner::Pending(rx) => rx
                .recv()
                .unwrap_or_else(|_| Err(Error::pool_submission("worker dropped without a result"))),
        }
    }

    /// Block until the task has produced a value and return it; a failed
    /// task's error propagates here as a panic, mirroring the Python
    /// original's `Future.result()` re-raising the worker's exception on
    /// the forcing thread (spec §7 "User-task failure"). The panic payload
    /// is the `Error` value itself, not its rendered message — a
    /// `catch_unwind` boundary further up (`ThreadPool::submit`,
    /// `run_pipeline`) can downcast it back and recover the original error
    /// kind instead of collapsing everything to `UserTaskFailure`.
    pub fn result(self) -> T {
        match self.into_result() {
            Ok(value) => value,
            Err(err) => std::panic::panic_any(err),
        }
    }
}

impl<T> Deferred<(T, T)>
where
    T: Send + 'static,
{
    /// `split_future(f)`: project a `Deferred` of a homogeneous pair into an
    /// independent pair of `Deferred`s, each resolving once `f` does. The
    /// typed equivalent of the original's monkey-patched `Future.__getitem__`
    /// (`f[0]`/`f[1]` forcing `f.result()` and indexing into it — spec §6,
    /// §9's "Deferred values and `Future` indexing" open note); unlike the
    /// dynamically-typed original, this only typechecks when both elements
    /// of the pair share a type, which is the shape `split`/`cons_split_wire`
    /// actually produce. A plain background thread does the one-time force
    /// and broadcast — this is a standalone convenience, not something that
    /// needs a `WorkerPool` of its own.
    pub fn split_future(self) -> (Deferred<T>, Deferred<T>) {
        let (tx0, rx0) = crossbeam::channel::bounded(1);
        let (tx1, rx1) = crossbeam::channel::bounded(1);
        thread::spawn(move || match self.into_result() {
            Ok((a, b)) => {
                let _ = tx0.send(Ok(a));
                let _ = tx1.send(Ok(b));
            }
            Err(err) => {
                let _ = tx0.send(Err(Error::user_task_failure(err.to_string())));
                let _ = tx1.send(Err(Error::user_task_failure(err.to_string())));
            }
        });
        (Deferred::pending(rx0), Deferred::pending(rx1))
    }

    /// `result_indexed(i)`: force and project in one call, the direct
    /// equivalent of the original's `f[i] == f.result()[i]`. `i` must be `0`
    /// or `1`; anything else panics, the way an out-of-range Python sequence
    /// index would.
    pub fn result_indexed(self, index: usize) -> T {
        let (a, b) = self.result();
        match index {
            0 => a,
            1 => b,
            other => panic!("tuple future index out of range: {other}"),
        }
    }
}
