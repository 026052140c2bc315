//! Fit a linear regression to the numeric columns of a spreadsheet and write
//! a one-page PDF report with the fitted chart and the first predictions.

pub mod analysis;
pub mod app;
pub mod data;
pub mod report;
pub mod state;
pub mod ui;
pub mod workflow;

#[cfg(test)]
mod testutil;
