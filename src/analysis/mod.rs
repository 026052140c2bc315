//! Analysis layer: the single fixed model the report is built from.
//!
//! The last numeric column of the dataset is the target, every other column
//! is a feature.  The model is an ordinary-least-squares fit with intercept.
pub mod regression;
