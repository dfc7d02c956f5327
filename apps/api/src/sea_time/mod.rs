// Sea-time ledger: overlap correction over employment contracts and the
// per-candidate rebuild that persists the corrected ledger and its summary.

pub mod calculator;
pub mod handlers;
pub mod operation_type;
pub mod overlap;
pub mod summary;

pub use calculator::SeaTimeCalculator;
