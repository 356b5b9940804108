#![deny(
    clippy::expect_used,
    clippy::panic,
    clippy::print_stdout,
    clippy::todo,
    clippy::unimplemented,
    clippy::unwrap_used
)]

pub mod app;
pub mod batch;
pub mod cli;
pub mod config;
pub mod congress;
pub mod export;
pub mod identity;
pub mod logging;
