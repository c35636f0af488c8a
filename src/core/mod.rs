//! Pure derived-state computations over an in-memory task snapshot.
//!
//! Everything in this module is synchronous, side-effect free, and takes
//! its inputs (including the current time) from the caller. The HTTP and
//! database layers fetch, invoke, and persist around these functions.

pub mod analytics;
pub mod propagate;
pub mod query;
pub mod update;
pub mod validate;
