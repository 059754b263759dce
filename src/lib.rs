//! Packet Graph
//!
//! Stacked bar charts of packet traffic recorded by a proxy packet logger.
//!
//! The logger flushes per-interval counters into a SQLite file
//! (`batched_packets` plus a `packet_bound` direction table). This crate
//! aggregates those batches into time buckets per packet type and renders
//! them as an interactive chart with a count/volume toggle.
//!
//! This crate provides the core implementation for the
//! `packet-graph` CLI tool.
//!
//! ## Getting Started
//!
//! ```bash
//! packet-graph graph --db packets.sqlite --filter outgoing --granularity minute
//! packet-graph --help
//! ```

pub mod aggregator;
pub mod chart;
pub mod commands;
pub mod output;
pub mod store;
pub mod utils;
