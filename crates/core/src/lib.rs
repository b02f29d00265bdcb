//! Core of the playlist aggregator: channel records, the playlist parser,
//! first-seen-wins merging, partitioning and the ports the adapters implement.

pub mod application;
pub mod domain;
pub mod error;
pub mod merge;
pub mod parser;
pub mod partition;
pub mod ports;
pub mod utils;
