use thiserror::Error;

/// Errors returned when a log statement cannot be encoded. When one of these
/// is returned, no part of the message should be emitted.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum Error {
    #[error("unknown conversion `{conversion}` at offset {offset}")]
    UnknownConversion { conversion: char, offset: usize },
    #[error("format ends inside the specifier starting at offset {offset}")]
    UnterminatedSpecifier { offset: usize },
    #[error("annotation starting at offset {offset} is missing a closing brace")]
    UnterminatedAnnotation { offset: usize },
    #[error("no argument supplied for argument index {index}")]
    MissingArgument { index: usize },
}

/// Errors returned when building an encoder configuration.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum BuildError {
    #[error("initial capacity must be non-zero")]
    ZeroCapacity,
    #[error("initial capacity exceeds the maximum capacity")]
    InitialExceedsMax,
    #[error("maximum capacity must hold at least the message header")]
    MaxCapacityTooSmall,
    #[error("maximum capacity must fit in 32 bits")]
    MaxCapacityTooLarge,
    #[error("max commands must be in the range 1..=255")]
    InvalidMaxCommands,
}

/// Errors returned when decoding a command stream.
#[non_exhaustive]
#[derive(Error, Debug, PartialEq, Eq, Clone, Copy)]
pub enum DecodeError {
    #[error("buffer is too short to contain a header")]
    MissingHeader,
    #[error("command {index} extends past the end of the buffer")]
    TruncatedCommand { index: usize },
    #[error("command {index} has unknown type tag {tag}")]
    UnknownType { index: usize, tag: u8 },
    #[error("header declares {header} commands but the buffer holds {actual}")]
    CountMismatch { header: u8, actual: usize },
}
