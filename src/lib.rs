//! Feature encoding and ordinary least squares over the avocado sales
//! dataset.
//!
//! The run is a straight line: [`data::loader`] reads the CSV,
//! [`data::features`] types and encodes the columns, [`regression`] fits
//! the model and [`report`] prints it.  [`pipeline::run`] chains all four.

pub mod config;
pub mod data;
pub mod error;
pub mod pipeline;
pub mod regression;
pub mod report;
