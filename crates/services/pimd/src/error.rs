//! Error types for the PIM service.

/// Errors that can occur while starting or running `pimd`.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error(transparent)]
    IO(#[from] std::io::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error(transparent)]
    Model(#[from] pim_models::error::Error),
}
