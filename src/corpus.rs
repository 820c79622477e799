//! Main module for the pericope corpus pipeline

pub mod assemble;
pub mod pipeline;
pub mod records;
pub mod report;
pub mod tokens;
pub mod validate;
