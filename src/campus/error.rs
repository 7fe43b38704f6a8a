use thiserror::Error;

/// Errors raised at the campus data boundary.
///
/// An unreachable destination is not an error: searches report it as a
/// [`SearchOutcome`](super::pathfinding::SearchOutcome) value.
#[derive(Debug, Error)]
pub enum CampusError {
    #[error("id `{id}` is used by both {first} and {second}")]
    DuplicateId {
        id: String,
        first: &'static str,
        second: &'static str,
    },

    #[error("{what} `{id}` has a non-finite coordinate")]
    NonFiniteCoordinate { what: &'static str, id: String },

    #[error("no {what} with id `{id}`")]
    UnknownId { what: &'static str, id: String },

    #[error("cannot parse location `{0}` (expected building:<id>, room:<id>, checkpoint:<corridor>:<start|end> or geo:<lat>,<lng>)")]
    InvalidLocation(String),

    #[error("invalid initial config: {0}")]
    InvalidConfig(String),

    #[error("unsupported map version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },

    #[error("map file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("map encoding failed: {0}")]
    Encode(#[from] bincode::Error),

    #[error("map RON parse failed: {0}")]
    RonParse(#[from] ron::error::SpannedError),

    #[error("map RON write failed: {0}")]
    RonWrite(#[from] ron::Error),
}
