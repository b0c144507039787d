//! Scheduler facade -- heap plus identifier index as one unit.
//!
//! Split into focused submodules:
//! - `core`: Scheduler struct, constructors, and the mutating operations
//! - `inspect`: read-only accessors, ordered drain, and invariant checks

mod core;
mod inspect;
#[cfg(test)]
mod tests;

pub use self::core::Scheduler;
