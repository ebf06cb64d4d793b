//! Simple cli for keeping track of personal metrics. A tracker is a named
//! series of dated numbers, and the tool can record, list, summarize by
//! weekday, or plot them through gnuplot.
//!

pub mod cli;
pub mod plot;
pub mod stats;
pub mod storage;
pub mod utils;
