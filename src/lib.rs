//! Vitalscope - Web Vitals attribution and analytics reporting
//!
//! This library turns Web Vitals metric reports into flat analytics events,
//! attributing slow interactions (INP/FID) to the long-animation-frame script
//! responsible for the delay, and annotating every event with ambient
//! environment signals.

pub mod capture;
pub mod cli;
pub mod config;
pub mod environment;
pub mod error;
pub mod long_task;
pub mod metric;
pub mod params;
pub mod reporter;
pub mod transport;
pub mod value;
