//! # kvcompat-resilience
//!
//! Storage access over a restricted host: the fallback-aware
//! [`ResilienceExecutor`], the range-scan [`RankingEngine`], and the
//! [`ScoreWriter`] for the write path.

pub mod executor;
pub mod ranking;
pub mod writer;

pub use executor::ResilienceExecutor;
pub use ranking::RankingEngine;
pub use writer::ScoreWriter;
