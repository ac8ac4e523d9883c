use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file not found: {0}")]
    FileNotFound(PathBuf),

    #[error("config parse error: {0}")]
    ParseError(String),

    #[error("config validation error: {0}")]
    ValidationError(String),
}

/// Errors raised while building or mutating an element tree.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TreeError {
    #[error("unknown node: {0}")]
    UnknownNode(usize),

    #[error("invalid tag name: {0:?}")]
    InvalidTag(String),

    #[error("node {0} is not an element")]
    NotAnElement(usize),

    #[error("node {0} cannot hold children")]
    NotAContainer(usize),
}

/// A presence envelope that failed validation at the inbound boundary.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    #[error("malformed presence message: {0}")]
    Malformed(String),

    #[error("unsupported presence event: {0}")]
    UnsupportedEvent(String),

    #[error("invalid field `{field}`: {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("transport already connected")]
    AlreadyConnected,

    #[error("transport closed")]
    Closed,

    #[error("connection failed: {0}")]
    ConnectFailed(String),
}

#[derive(Debug, thiserror::Error)]
pub enum CursorcastError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Tree(#[from] TreeError),

    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("session error: {0}")]
    Session(String),

    #[error("{0}")]
    Other(String),
}
