//! This crate packs printf-style log statements into a compact, self-describing
//! binary form which a logging backend can store and render later.
//!
//! Encoding walks the format string from left to right. Each conversion
//! specifier consumes its argument from the caller-supplied list of `Value`s
//! and appends a command (a type tag, privacy flags, a size, and a payload) to
//! a growable buffer. The result is a `Message` holding the rewritten format
//! string and the command buffer, prefixed with a header that records how many
//! commands were written and whether any of them are private or non-scalar.
//!
//! ```
//! use logpack::{encode, CommandType};
//!
//! let message = encode("user %{private}@ failed with code %d", &["alice".into(), 42.into()], 0)
//!     .unwrap();
//!
//! assert_eq!(message.format(), "user %@ failed with code %d");
//!
//! let decoded = message.decode().unwrap();
//! assert_eq!(decoded.commands()[0].kind(), CommandType::Object);
//! assert_eq!(decoded.commands()[1].as_i64(), Some(42));
//! ```
//!
//! Encoding never panics. A message which outgrows the configured buffer, or
//! which has more arguments than the command ceiling allows, is truncated to
//! the arguments that fit and is still produced. Only a malformed format
//! string, or too few arguments, causes encoding to fail.

mod blob;
mod command;
mod config;
mod decode;
mod encoder;
mod error;
mod format;
mod message;
mod value;

pub use blob::Blob;
pub use command::{
    Command, CommandFlags, CommandType, Header, HeaderFlags, Privacy, DESCRIPTOR_SIZE,
    HEADER_SIZE, MAX_PAYLOAD,
};
pub use config::{
    Builder, Config, DEFAULT_INITIAL_CAPACITY, DEFAULT_MAX_CAPACITY, DEFAULT_MAX_COMMANDS,
};
pub use decode::{decode, Decoded};
pub use encoder::{Encoder, Packed, Width};
pub use error::{BuildError, DecodeError, Error};
pub use message::Message;
pub use value::{ObjectRef, Value};

/// Encode a log statement using the default `Config`.
///
/// `errno` is the error number captured at the call site, consumed by any
/// `%m` specifier in the format.
pub fn encode(format: &str, args: &[Value<'_>], errno: i32) -> Result<Message, Error> {
    Config::default().encode(format, args, errno)
}
