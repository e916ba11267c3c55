//! Foundational types shared by every other `arrowline` crate.
//!
//! ## Key components
//!
//! - **`error`**: the single `Error` enum and `Result` alias used across the
//!   workspace, covering the error taxonomy of contract violations,
//!   branch-tag violations, and user-task failures.
//! - **`either`**: `Either<B, C>`, the sum type used both as a generic
//!   tagged union and as the carrier of conditional branches in the arrow
//!   algebra.
//! - **`maybe`**: `Maybe<A>`, a small `Just`/`Nothing` sum type.
//! - **`state`**: `State<S, A>`, the deferred `(value, state) <- state`
//!   computation that the Kleisli morphism in `arrowline-algebra` is built
//!   over.

pub mod either;
pub mod error;
pub mod maybe;
pub mod state;

pub use either::Either;
pub use error::{Error, Result};
pub use maybe::Maybe;
pub use state::State;
