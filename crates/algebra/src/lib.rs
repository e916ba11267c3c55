//! The arrow algebra: the Kleisli morphism over the state carrier (spec
//! §4.C) and its choice extension (spec §4.D).
//!
//! This crate is pure — no I/O, no threads, no worker pools. Both
//! executors in `arrowline-exec` build their public builders on top of the
//! same `Kleisli`/`arr`/`split`/`unsplit`/choice operators defined here,
//! differing only in what concrete state type `S` they thread (a plain
//! user state for the sequential executor, a pool-wrapped state for the
//! parallel one).

pub mod choice;
pub mod kleisli;

pub use choice::{ifc, test};
pub use kleisli::{arr, id, split, unsplit, Kleisli};
