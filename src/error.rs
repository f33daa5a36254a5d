//! Error type for the crate edges.
//!
//! The property store and the mutators never fail. Errors only show up where
//! the card meets the outside world: parsing colors and attribute names,
//! loading configuration, talking to the main context and to taffy.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CardError {
    #[error("invalid color: {0}")]
    InvalidColor(String),

    #[error("unknown attribute: {0}")]
    UnknownAttribute(String),

    #[error("invalid config: {0}")]
    InvalidConfig(String),

    #[error("config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("main context is closed")]
    DispatchClosed,

    #[error("layout error: {0}")]
    Layout(#[from] taffy::TaffyError),
}

pub type Result<T> = std::result::Result<T, CardError>;
