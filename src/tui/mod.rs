//! TUI module: Terminal User Interface using Ratatui.
//!
//! Provides a clinic-themed interface for:
//! - Dashboard with system status
//! - Patient intake form
//! - Ranked recommendation results

mod app;
mod styles;
mod ui;
mod worker;

pub use app::App;
pub use styles::ClinicTheme;
pub use worker::{AssessmentProgress, AssessmentWorker, AssessmentWorkerHandle};
