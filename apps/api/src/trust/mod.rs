// Trust engine: orchestration of compliance computation over the trust
// profile, batch recomputation, and the shared outcome/event types.

pub mod batch;
pub mod engine;
pub mod event;
pub mod handlers;
pub mod outcome;
pub mod profile;

pub use engine::TrustEngine;
