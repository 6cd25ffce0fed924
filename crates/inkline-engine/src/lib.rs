//! The Inkline engagement and ranking engine.
//!
//! One [`Engine`] owns the shared store and is the single mutation
//! authority over it: every mutation runs its whole read-check-write unit
//! under one write lock, so concurrent mutations on the same entities are
//! serializable and a rejected mutation leaves no state behind. Reads take
//! snapshots under the read lock.
//!
//! Durability is not this crate's concern; the store is a plain
//! in-memory structure and persistence belongs to whatever hosts it.

pub mod clock;
pub mod engine;
pub mod guard;
pub mod ledger;
pub mod lifecycle;
pub mod limiter;
pub mod ranking;
pub mod store;
pub mod stream;

#[cfg(test)]
mod tests;

pub use clock::{Clock, ManualClock, SystemClock};
pub use engine::Engine;
