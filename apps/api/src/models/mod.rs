pub mod contract;
pub mod sea_time;
pub mod trust_profile;
