//! The sequential executor (spec §4.E): builders over the bare state
//! effect, plus `run_pipeline`/`eval_pipeline`/`exec_pipeline`.
//!
//! Everything here is a thin, state-aware layer over
//! `arrowline_algebra::Kleisli` — no task submission, no `Deferred`. The
//! parallel executor (`crate::parallel`) presents the same builder names
//! over a pool-wrapped state instead.

use arrowline_algebra::{split, unsplit, Kleisli};
use arrowline_core::State;
use indexmap::IndexMap;
use std::hash::Hash;
use std::sync::Arc;

pub use arrowline_algebra::ifc as cons_if_component;

/// Builder for `cons_function_component(f, in?, out?, mut?)`. Rust has no
/// optional arguments, so the three optional forming/mutator steps are
/// fluent builder calls instead; `.build()` is the only step that actually
/// produces the `Kleisli`.
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

    /// `a' = in(a, s)`, applied before `f`.
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

    /// `b' = out(b, s)`, applied after `f`.
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

    /// `s' = mut(s)`, run after `f` has produced its output.
    pub fn state_mutator(mut self, mutator: impl Fn(S) -> S + Send + Sync + 'static) -> Self {
        self.mutator = Some(Arc::new(mutator));
        self
    }

    pub fn build(self) -> Kleisli<S, A, B>
    where
        S: Send,
        A: Send,
        B: Send,
    {
        let function = self.function;
        let mutator = self.mutator;
        tracing::debug!("constructing function component");
        Kleisli::new(move |a: A| {
            let function = function.clone();
            let mutator = mutator.clone();
            State::make(move |s: S| {
                tracing::trace!("function component invoked");
                let b = function(a, &s);
                let s = match mutator {
                    Some(m) => m(s),
                    None => s,
                };
                (b, s)
            })
        })
    }
}

/// `cons_function_component(f)` — call `.input_forming()`, `.output_forming()`
/// and/or `.state_mutator()` before `.build()` for the optional pieces.
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

/// `cons_wire(g)` — transform the value via `g(a, s)`, state unchanged.
pub fn cons_wire<S, A, B>(g: impl Fn(A, &S) -> B + Send + Sync + 'static) -> Kleisli<S, A, B>
where
    S: Send + 'static,
    A: Send + 'static,
    B: Send + 'static,
{
    let g = Arc::new(g);
    tracing::debug!("constructing wire");
    Kleisli::new(move |a: A| {
        let g = g.clone();
        State::make(move |s: S| {
            tracing::trace!("wire invoked");
            let b = g(a, &s);
            (b, s)
        })
    })
}

/// `cons_dictionary_wire(m)` — build a wire producing `{ m[k]: a[k] }` for
/// each `k` in `m`; a key in `m` missing from the input map is a contract
/// violation (spec §4.E, §7), reported the way the Python original's
/// uncaught `KeyError` would: logged, then the thread unwinds. Rust's
/// ordinary component bodies don't have a `Result`-typed escape hatch
/// (`cons_wire`'s `g` returns `B`, not `Result<B, _>`), so this is the one
/// place in the sequential executor where a contract violation surfaces as
/// a panic rather than as a typed error.
pub fn cons_dictionary_wire<S, K, V>(
    conversions: IndexMap<K, K>,
) -> Kleisli<S, IndexMap<K, V>, IndexMap<K, V>>
where
    S: Send + 'static,
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
                    let err =
                        arrowline_core::Error::contract_violation(format!(
                            "dictionary wire missing source key {src:?}"
                        ));
                    panic!("{err}");
                }
            }
        }
        out
    })
}

/// `cons_split_wire` — duplicate the input into a pair.
pub fn cons_split_wire<S, B>() -> Kleisli<S, B, (B, B)>
where
    S: 'static,
    B: Clone + Send + 'static,
{
    split()
}

/// `cons_unsplit_wire(g)` — join a pair with `g`.
pub fn cons_unsplit_wire<S, C, D, E>(
    g: impl Fn(C, D) -> E + Send + Sync + 'static,
) -> Kleisli<S, (C, D), E>
where
    S: 'static,
    C: 'static,
    D: 'static,
    E: Send + 'static,
{
    unsplit(g)
}

/// `cons_composed_component(c1, c2)` = `c1 >>> c2`.
pub fn cons_composed_component<S, A, B, C>(
    c1: Kleisli<S, A, B>,
    c2: Kleisli<S, B, C>,
) -> Kleisli<S, A, C>
where
    S: 'static,
    A: 'static,
    B: Send + 'static,
    C: Send + 'static,
{
    c1.then(c2)
}

/// `cons_parallel_component(top, bottom)` = `top *** bottom`.
pub fn cons_parallel_component<S, A1, B1, A2, B2>(
    top: Kleisli<S, A1, B1>,
    bottom: Kleisli<S, A2, B2>,
) -> Kleisli<S, (A1, A2), (B1, B2)>
where
    S: 'static,
    A1: 'static,
    B1: Send + 'static,
    A2: Send + 'static,
    B2: Send + 'static,
{
    top.product(bottom)
}

/// `cons_wired_components(c1, c2, w)` = `c1 >>> w >>> c2`.
pub fn cons_wired_components<S, A, B, W, C>(
    c1: Kleisli<S, A, B>,
    c2: Kleisli<S, W, C>,
    wire: Kleisli<S, B, W>,
) -> Kleisli<S, A, C>
where
    S: 'static,
    A: 'static,
    B: Send + 'static,
    W: Send + 'static,
    C: Send + 'static,
{
    c1.then(wire).then(c2)
}

/// `cons_pipeline(in, c, out)` = `in >>> c >>> out`.
pub fn cons_pipeline<S, I, A, C, O>(
    in_wire: Kleisli<S, I, A>,
    c: Kleisli<S, A, C>,
    out_wire: Kleisli<S, C, O>,
) -> Kleisli<S, I, O>
where
    S: 'static,
    I: 'static,
    A: Send + 'static,
    C: Send + 'static,
    O: Send + 'static,
{
    in_wire.then(c).then(out_wire)
}

/// `run_pipeline(pipeline, input, state)` ⟶ `(value, state)`.
pub fn run_pipeline<S, A, C>(pipeline: &Kleisli<S, A, C>, input: A, state: S) -> (C, S)
where
    S: 'static,
    A: 'static,
    C: 'static,
{
    let span = tracing::info_span!("run_pipeline");
    let _guard = span.enter();
    pipeline.run(input).run(state)
}

/// `eval_pipeline(pipeline, input, state)` ⟶ `value`.
pub fn eval_pipeline<S, A, C>(pipeline: &Kleisli<S, A, C>, input: A, state: S) -> C
where
    S: 'static,
    A: 'static,
    C: 'static,
{
    let span = tracing::info_span!("eval_pipeline");
    let _guard = span.enter();
    pipeline.run(input).eval(state)
}

/// `exec_pipeline(pipeline, input, state)` ⟶ `state`.
pub fn exec_pipeline<S, A, C>(pipeline: &Kleisli<S, A, C>, input: A, state: S) -> S
where
    S: 'static,
    A: 'static,
    C: 'static,
{
    let span = tracing::info_span!("exec_pipeline");
    let _guard = span.enter();
    pipeline.run(input).exec(state)
}
