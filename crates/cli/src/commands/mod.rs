//! CLI command implementations.

pub mod account;
pub mod catalog;
pub mod shop;

use std::io;

use eshop_pro_storefront::error::AppError;
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CommandError {
    /// The storefront rejected the request.
    #[error("{}", .0.user_message())]
    App(#[from] AppError),

    /// Terminal input or output failed.
    #[error("Terminal error: {0}")]
    Io(#[from] io::Error),

    /// The storefront task panicked.
    #[error("Storefront task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}
