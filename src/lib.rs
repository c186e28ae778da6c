//! Viewer for two-phase flow experiment files.
//!
//! The [`data`] module is the UI-independent core: it loads an experiment
//! file, windows it on the ordering column and derives statistics, reference
//! values and regression fits. Everything else renders those results with
//! egui.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod state;
pub mod ui;
