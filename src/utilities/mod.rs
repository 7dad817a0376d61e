//! Shared utilities: configuration, errors, keywords, paths, and output.

pub mod config;
pub mod errors;
pub mod keywords;
pub mod paths;
pub mod printer;
pub mod string_utils;
