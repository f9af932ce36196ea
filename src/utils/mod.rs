//! Small shared utilities.

pub mod code_generator;
