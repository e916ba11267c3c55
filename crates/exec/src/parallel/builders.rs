//! The parallel executor (spec §4.F): the same builder names as
//! `crate::sequential`, but over a pool-wrapped state and with component
//! bodies submitted to the pool as tasks instead of run inline.
//!
//! Two suspension points are named explicitly by spec §5 besides the final
//! output forcing: `unsplit`'s task awaiting both of its inputs, and
//! `cons_if_component`'s dispatch forcing the tagged `Either` to decide
//! which branch to run. Every other component (`cons_function_component`,
//! `cons_wire`) defers its own `Deferred::result()` call into the task body
//! it submits, so dispatching stage `n+1` never blocks the orchestrator on
//! stage `n` — only a *data* dependency exists between them, carried by the
//! `Deferred` each task closes over.

use super::deferred::Deferred;
use super::pool::WorkerPool;
use arrowline_algebra::Kleisli;
use arrowline_core::{Either, State};
use indexmap::IndexMap;
use std::hash::Hash;
use std::sync::Arc;

/// `(pool, s)` (spec §3 "Wrapped state"). Threaded in place of the bare
/// state through the parallel executor.
pub struct WrappedState<P, S> {
    pub pool: P,
    pub state: S,
}

/// Builder for the parallel `cons_function_component(f, in?, out?, mut?)`.
/// `.build::<P>()` picks the pool type; it is usually inferred from the
/// surrounding pipeline.
pub struct FunctionComponentBuilder<S, A, B> {
    function: Arc<dyn Fn(A, &S) -> B + Send + Sync>,
    mutator: Option<Arc<dyn Fn(S) -> S + Send + Sync>>,
}

impl<S, A, B> FunctionComponentBuilder<S, A, B>
where
    S: 'static,
    A: 'static,
    B: 'static,
{
    pub fn new(function: impl Fn(A, &S) -> B + Send + Sync + 'static) -> Self {
        FunctionComponentBuilder {
            function: Arc::new(function),
            mutator: None,
        }
    }

    pub fn input_forming<A0>(
        self,
        forming: impl Fn(A0, &S) -> A + Send + Sync + 'static,
    ) -> FunctionComponentBuilder<S, A0, B>
    where
        A0: 'static,
    {
        let function = self.function;
        FunctionComponentBuilder {
            function: Arc::new(move |a0: A0, s: &S| function(forming(a0, s), s)),
            mutator: self.mutator,
        }
    }

    pub fn output_forming<B2>(
        self,
        forming: impl Fn(B, &S) -> B2 + Send + Sync + 'static,
    ) -> FunctionComponentBuilder<S, A, B2>
    where
        B2: 'static,
    {
        let function = self.function;
        FunctionComponentBuilder {
            function: Arc::new(move |a: A, s: &S| forming(function(a, s), s)),
            mutator: self.mutator,
        }
    }

    pub fn state_mutator(mut self, mutator: impl Fn(S) -> S + Send + Sync + 'static) -> Self {
        self.mutator = Some(Arc::new(mutator));
        self
    }

    /// Component bodies receive a snapshot of the state captured at dispatch
    /// time (spec §5); the mutator itself runs synchronously on the
    /// orchestrator thread, before the submitted task necessarily completes.
    pub fn build<P>(self) -> Kleisli<WrappedState<P, S>, Deferred<A>, Deferred<B>>
    where
        P: WorkerPool + 'static,
        S: Clone + Send,
        A: Send,
        B: Send,
    {
        let function = self.function;
        let mutator = self.mutator;
        tracing::debug!("constructing parallel function component");
        Kleisli::new(move |input: Deferred<A>| {
            let function = function.clone();
            let mutator = mutator.clone();
            State::make(move |wrapped: WrappedState<P, S>| {
                let WrappedState { pool, state } = wrapped;
                let state_snapshot = state.clone();
                let next_state = match mutator {
                    Some(m) => m(state),
                    None => state,
                };
                let output = pool.submit(move || {
                    let a = input.result();
                    tracing::trace!("parallel function component task running");
                    function(a, &state_snapshot)
                });
                (
                    output,
                    WrappedState {
                        pool,
                        state: next_state,
                    },
                )
            })
        })
    }
}

pub fn cons_function_component<S, A, B>(
    function: impl Fn(A, &S) -> B + Send + Sync + 'static,
) -> FunctionComponentBuilder<S, A, B>
where
    S: 'static,
    A: 'static,
    B: 'static,
{
    FunctionComponentBuilder::new(function)
}

/// `cons_wire(g)`: re-box the transformed value into a fresh `Deferred`.
/// The input is forced inside the submitted task, not on the orchestrator.
pub fn cons_wire<P, S, A, B>(
    g: impl Fn(A, &S) -> B + Send + Sync + 'static,
) -> Kleisli<WrappedState<P, S>, Deferred<A>, Deferred<B>>
where
    P: WorkerPool + 'static,
    S: Clone + Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
{
    let g = Arc::new(g);
    tracing::debug!("constructing parallel wire");
    Kleisli::new(move |input: Deferred<A>| {
        let g = g.clone();
        State::make(move |wrapped: WrappedState<P, S>| {
            let WrappedState { pool, state } = wrapped;
            let state_snapshot = state.clone();
            let output = pool.submit(move || {
                let a = input.result();
                tracing::trace!("parallel wire task running");
                g(a, &state_snapshot)
            });
            (output, WrappedState { pool, state })
        })
    })
}

/// `cons_dictionary_wire(m)`, parallel variant. The missing-key contract
/// violation (spec §4.E, §7) now surfaces inside a task body rather than on
/// the orchestrator thread, but it still reaches the caller as
/// `Error::ContractViolation`: the panic payload is the `Error` value
/// itself, and `ThreadPool::submit`'s `catch_unwind` downcasts it back
/// instead of collapsing it to a generic `UserTaskFailure`, so the parallel
/// and sequential executors agree on error kind for the same violation.
pub fn cons_dictionary_wire<P, S, K, V>(
    conversions: IndexMap<K, K>,
) -> Kleisli<WrappedState<P, S>, Deferred<IndexMap<K, V>>, Deferred<IndexMap<K, V>>>
where
    P: WorkerPool + 'static,
    S: Clone + Send + 'static,
    K: Hash + Eq + Clone + std::fmt::Debug + Send + Sync + 'static,
    V: Clone + Send + 'static,
{
    cons_wire(move |a: IndexMap<K, V>, _s: &S| {
        let mut out = IndexMap::with_capacity(conversions.len());
        for (src, dst) in conversions.iter() {
            match a.get(src) {
                Some(v) => {
                    out.insert(dst.clone(), v.clone());
                }
                None => {
                    let err = arrowline_core::Error::contract_violation(format!(
                        "dictionary wire missing source key {src:?}"
                    ));
                    std::panic::panic_any(err);
                }
            }
        }
        out
    })
}

/// `cons_split_wire`: duplicate a scalar `Deferred<B>` into a pair of fresh
/// `Deferred<B>`s, both ultimately resolving to the same value. A single
/// detached task forces the input once and broadcasts it down two
/// independent channels — this does not block the orchestrator, matching
/// spec §5 (`split` is not one of the named suspension points).
pub fn cons_split_wire<P, S, B>(
) -> Kleisli<WrappedState<P, S>, Deferred<B>, (Deferred<B>, Deferred<B>)>
where
    P: WorkerPool + 'static,
    S: 'static,
    B: Clone + Send + 'static,
{
    Kleisli::new(move |input: Deferred<B>| {
        State::make(move |wrapped: WrappedState<P, S>| {
            let (tx1, rx1) = crossbeam::channel::bounded(1);
            let (tx2, rx2) = crossbeam::channel::bounded(1);
            wrapped.pool.submit_detached(move || match input.into_result() {
                Ok(value) => {
                    let _ = tx1.send(Ok(value.clone()));
                    let _ = tx2.send(Ok(value));
                }
                Err(err) => {
                    let _ = tx1.send(Err(arrowline_core::Error::user_task_failure(
                        err.to_string(),
                    )));
                    let _ = tx2.send(Err(arrowline_core::Error::user_task_failure(
                        err.to_string(),
                    )));
                }
            });
            (
                (Deferred::pending(rx1), Deferred::pending(rx2)),
                wrapped,
            )
        })
    })
}

/// `cons_unsplit_wire(g)`: a task that awaits both inputs via `result()`
/// and returns `g(top, bottom)` (spec §4.F) — one of §5's named suspension
/// points, though the blocking happens inside the submitted task, not on
/// the orchestrator thread.
pub fn cons_unsplit_wire<P, S, C, D, E>(
    g: impl Fn(C, D) -> E + Send + Sync + 'static,
) -> Kleisli<WrappedState<P, S>, (Deferred<C>, Deferred<D>), Deferred<E>>
where
    P: WorkerPool + 'static,
    S: 'static,
    C: Send + 'static,
    D: Send + 'static,
    E: Send + 'static,
{
    let g = Arc::new(g);
    Kleisli::new(move |(top, bottom): (Deferred<C>, Deferred<D>)| {
        let g = g.clone();
        State::make(move |wrapped: WrappedState<P, S>| {
            let output = wrapped.pool.submit(move || {
                tracing::trace!("unsplit task forcing both input futures");
                let c = top.result();
                let d = bottom.result();
                g(c, d)
            });
            (output, wrapped)
        })
    })
}

/// `cons_if_component(p, t, e)`: one background task computes the predicate
/// and tags the (passed-through) input as `Left`/`Right`; the component's
/// *dispatch* then forces that tag synchronously on the orchestrator thread
/// — the other of §5's named suspension points — and runs only the taken
/// branch's `.run()`, so only the taken branch's state mutator fires (spec
/// §9's open question on `cons_if_component`).
pub fn cons_if_component<P, S, B, C>(
    predicate: impl Fn(&B, &S) -> bool + Send + Sync + 'static,
    then_branch: Kleisli<WrappedState<P, S>, Deferred<B>, Deferred<C>>,
    else_branch: Kleisli<WrappedState<P, S>, Deferred<B>, Deferred<C>>,
) -> Kleisli<WrappedState<P, S>, Deferred<B>, Deferred<C>>
where
    P: WorkerPool + 'static,
    S: Clone + Send + 'static,
    B: Send + 'static,
    C: Send + 'static,
{
    let predicate = Arc::new(predicate);
    Kleisli::new(move |input: Deferred<B>| {
        let predicate = predicate.clone();
        let then_branch = then_branch.clone();
        let else_branch = else_branch.clone();
        State::make(move |wrapped: WrappedState<P, S>| {
            let state_snapshot = wrapped.state.clone();
            let tagged: Deferred<Either<B, B>> = wrapped.pool.submit(move || {
                let b = input.result();
                if predicate(&b, &state_snapshot) {
                    Either::Left(b)
                } else {
                    Either::Right(b)
                }
            });

            tracing::trace!("cons_if_component dispatch forcing the tagged branch");
            match tagged.result() {
                Either::Left(b) => then_branch.run(Deferred::ready(b)).run(wrapped),
                Either::Right(b) => else_branch.run(Deferred::ready(b)).run(wrapped),
            }
        })
    })
}

/// `run_pipeline(pool, pipeline, input, state)`: wrap `input` in an
/// already-resolved `Deferred`, drive the morphism, force the output
/// `Deferred` — the last of §5's named suspension points — and convert a
/// worker or dispatch panic into a `Result` at this boundary rather than
/// letting it unwind into the caller. Like `ThreadPool::submit`, the panic
/// payload is downcast back to `Error` first, so a contract or branch-tag
/// violation that reaches this boundary directly (e.g. via
/// `cons_if_component`'s inline dispatch `.result()`, which runs on the
/// orchestrator thread rather than inside a submitted task) keeps its
/// variant too.
pub fn run_pipeline<P, S, A, C>(
    pool: P,
    pipeline: &Kleisli<WrappedState<P, S>, Deferred<A>, Deferred<C>>,
    input: A,
    state: S,
) -> arrowline_core::Result<(C, S)>
where
    P: WorkerPool + 'static,
    S: 'static,
    A: Send + 'static,
    C: Send + 'static,
{
    let span = tracing::info_span!("run_pipeline_parallel");
    let _guard = span.enter();
    let wrapped = WrappedState { pool, state };
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let (deferred_output, final_wrapped) = pipeline.run(Deferred::ready(input)).run(wrapped);
        (deferred_output.result(), final_wrapped.state)
    }))
    .map_err(super::pool::downcast_panic)
}

/// `eval_pipeline(pool, pipeline, input, state)` ⟶ `value`.
pub fn eval_pipeline<P, S, A, C>(
    pool: P,
    pipeline: &Kleisli<WrappedState<P, S>, Deferred<A>, Deferred<C>>,
    input: A,
    state: S,
) -> arrowline_core::Result<C>
where
    P: WorkerPool + 'static,
    S: 'static,
    A: Send + 'static,
    C: Send + 'static,
{
    run_pipeline(pool, pipeline, input, state).map(|(value, _)| value)
}

/// `exec_pipeline(pool, pipeline, input, state)` ⟶ `state`.
pub fn exec_pipeline<P, S, A, C>(
    pool: P,
    pipeline: &Kleisli<WrappedState<P, S>, Deferred<A>, Deferred<C>>,
    input: A,
    state: S,
) -> arrowline_core::Result<S>
where
    P: WorkerPool + 'static,
    S: 'static,
    A: Send + 'static,
    C: Send + 'static,
{
    run_pipeline(pool, pipeline, input, state).map(|(_, state)| state)
}

/// `run_pipeline` for a pipeline whose top-level input is itself a pair
/// rather than one scalar value (spec §4.F: "a pair of futures for tuple
/// inputs") — the entry point for a pipeline built directly from
/// `cons_parallel_component`/`cons_unsplit_wire`, with no preceding
/// `cons_split_wire` to manufacture the pair. Each element of `input`
/// becomes its own already-resolved `Deferred`, independently of the
/// other, rather than one `Deferred` wrapping the whole tuple — the two
/// are not the same shape, and only the former lets `cons_parallel_component`
/// dispatch its two sides without first forcing a join.
pub fn run_pipeline_pair<P, S, A1, A2, C>(
    pool: P,
    pipeline: &Kleisli<WrappedState<P, S>, (Deferred<A1>, Deferred<A2>), Deferred<C>>,
    input: (A1, A2),
    state: S,
) -> arrowline_core::Result<(C, S)>
where
    P: WorkerPool + 'static,
    S: 'static,
    A1: Send + 'static,
    A2: Send + 'static,
    C: Send + 'static,
{
    let span = tracing::info_span!("run_pipeline_parallel_pair");
    let _guard = span.enter();
    let wrapped = WrappedState { pool, state };
    let (a1, a2) = input;
    std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
        let paired_input = (Deferred::ready(a1), Deferred::ready(a2));
        let (deferred_output, final_wrapped) = pipeline.run(paired_input).run(wrapped);
        (deferred_output.result(), final_wrapped.state)
    }))
    .map_err(super::pool::downcast_panic)
}

/// `eval_pipeline_pair(pool, pipeline, input, state)` ⟶ `value`.
pub fn eval_pipeline_pair<P, S, A1, A2, C>(
    pool: P,
    pipeline: &Kleisli<WrappedState<P, S>, (Deferred<A1>, Deferred<A2>), Deferred<C>>,
    input: (A1, A2),
    state: S,
) -> arrowline_core::Result<C>
where
    P: WorkerPool + 'static,
    S: 'static,
    A1: Send + 'static,
    A2: Send + 'static,
    C: Send + 'static,
{
    run_pipeline_pair(pool, pipeline, input, state).map(|(value, _)| value)
}

/// `exec_pipeline_pair(pool, pipeline, input, state)` ⟶ `state`.
pub fn exec_pipeline_pair<P, S, A1, A2, C>(
    pool: P,
    pipeline: &Kleisli<WrappedState<P, S>, (Deferred<A1>, Deferred<A2>), Deferred<C>>,
    input: (A1, A2),
    state: S,
) -> arrowline_core::Result<S>
where
    P: WorkerPool + 'static,
    S: 'static,
    A1: Send + 'static,
    A2: Send + 'static,
    C: Send + 'static,
{
    run_pipeline_pair(pool, pipeline, input, state).map(|(_, state)| state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::pool::{ThreadPool, ThreadPoolBuilder};
    use arrowline_core::Error;

    #[test]
    fn dictionary_wire_missing_key_surfaces_as_contract_violation_not_user_task_failure() {
        let mut conversions = IndexMap::new();
        conversions.insert("pi", "PI");
        let wire = cons_dictionary_wire::<ThreadPool, (), _, f64>(conversions);
        let pool = ThreadPoolBuilder::new().workers(2).build();

        let result = run_pipeline(pool, &wire, IndexMap::<&str, f64>::new(), ());

        assert!(matches!(result, Err(Error::ContractViolation { .. })));
    }
}
