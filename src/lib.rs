//! Transpose delimited text tables through a fixed-width element store

pub mod arena;
pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod logging;
pub mod output;
pub mod table;
