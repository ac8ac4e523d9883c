pub mod errors;
pub mod id;
pub mod types;

pub use errors::{ConfigError, CursorcastError, ProtocolError, TransportError, TreeError};
pub use id::{new_id, ParticipantId};
pub use types::{Color, Point, Rect};

pub type Result<T> = std::result::Result<T, CursorcastError>;
