//! sheetline - command-line access to header-keyed grids.

pub mod cli;
pub mod config;
