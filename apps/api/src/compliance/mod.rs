// Compliance scoring: composite score, status resolution and remediation advice.
// Pure functions over a trust profile; persistence lives in trust::engine.

pub mod pack;
pub mod recommendations;
pub mod score;
pub mod status;
