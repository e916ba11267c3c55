//! The parallel executor (spec §4.F).

mod builders;
mod deferred;
mod pool;

pub use builders::{
    cons_dictionary_wire, cons_function_component, cons_if_component, cons_split_wire,
    cons_unsplit_wire, cons_wire, eval_pipeline, eval_pipeline_pair, exec_pipeline,
    exec_pipeline_pair, run_pipeline, run_pipeline_pair, FunctionComponentBuilder, WrappedState,
};
pub use deferred::Deferred;
pub use pool::{ThreadPool, ThreadPoolBuilder, WorkerPool};

// Mode-agnostic combinators (composition, product, wiring, pipelines) are
// identical over any state shape, `WrappedState<P, S>` included — no need
// to redefine them here.
pub use crate::sequential::{
    cons_composed_component, cons_parallel_component, cons_pipeline, cons_wired_components,
};
