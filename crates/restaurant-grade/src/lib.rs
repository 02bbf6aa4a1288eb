//! Restaurant health grade prediction.
//!
//! The [`prediction`] module turns inspection attributes into a
//! [`prediction::GradeSymbol`] through a pre-trained model artifact,
//! [`messaging`] maps grades to role-specific text and [`report`] renders
//! CSV and PDF downloads.

pub mod config;
pub mod error;
pub mod messaging;
pub mod prediction;
pub mod report;
pub mod telemetry;
