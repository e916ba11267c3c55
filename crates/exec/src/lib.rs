//! Two executors over the same arrow algebra (spec §4.E, §4.F): sequential
//! (plain state) and parallel (pool-wrapped state, component bodies
//! submitted as tasks). Both present the builder names listed in spec §2 —
//! `cons_function_component`, `cons_wire`, `cons_split_wire`,
//! `cons_unsplit_wire`, `cons_if_component`, `run_pipeline`,
//! `eval_pipeline`, `exec_pipeline` — so user code targets one shape and
//! picks a module for the execution mode it wants.
//!
//! Sequential and parallel execution strategies live side by side behind
//! one public surface, each module presenting the same builder names.

pub mod parallel;
pub mod sequential;
pub mod subprocess;
