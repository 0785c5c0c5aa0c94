//! timedquiz-core — Exam session state machine, countdown timer, and scoring.
//!
//! This crate defines the question model, the session randomizer, the exam
//! engine loop, and the report every front end renders.

pub mod bank;
pub mod engine;
pub mod error;
pub mod model;
pub mod randomizer;
pub mod report;
pub mod session;
pub mod timer;
pub mod traits;
