//! Serde adapters for [`std::time::Duration`] values expressed as float seconds.
//!
//! Configuration files and race snapshots exchange timings as plain seconds
//! (`2.5`) instead of serde's default `{ "secs": 2, "nanos": 500000000 }`.

pub mod seconds;
pub mod seconds_list;
pub mod seconds_option;
