//! Journal host: configuration, logging, wiring and the command-line interface.

pub mod bootstrap;
pub mod cli;
pub mod render;
