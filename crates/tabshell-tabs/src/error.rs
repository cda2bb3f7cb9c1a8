//! Tab error types

use thiserror::Error;

use crate::engine::EngineError;

#[derive(Error, Debug)]
pub enum TabError {
    #[error("Invalid state transition: {from} -> {to}")]
    InvalidTransition { from: String, to: String },

    #[error("Tab is closed: {0}")]
    Closed(String),

    #[error("Engine error: {0}")]
    Engine(#[from] EngineError),
}
