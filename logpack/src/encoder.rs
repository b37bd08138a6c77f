//! Serializes individual arguments into commands appended to a `Blob`.
//!
//! Every `add_*` method either writes one complete command (two for floats)
//! or writes nothing and returns false. Once a command has been refused for
//! lack of space or because the command ceiling was reached, every later
//! command is refused too, so the stream always holds a left-to-right prefix
//! of the arguments.

use crate::command::{descriptor, DESCRIPTOR_SIZE, HEADER_SIZE, MAX_PAYLOAD};
use crate::{Blob, CommandFlags, CommandType, Config, Header, HeaderFlags, ObjectRef};

/// Width class of an integer scalar.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Width {
    /// 4 bytes, used for `int` sized and smaller arguments
    Int,
    /// 8 bytes, used for `long`, `long long`, `size_t` and similar
    Long,
}

impl Width {
    pub fn bytes(self) -> usize {
        match self {
            Width::Int => 4,
            Width::Long => 8,
        }
    }
}

/// The finished output of an `Encoder`.
#[derive(Clone, Debug, PartialEq)]
pub struct Packed {
    pub(crate) buffer: Vec<u8>,
    pub(crate) header: Header,
    pub(crate) truncated: bool,
}

impl Packed {
    /// The header followed by the encoded commands.
    pub fn buffer(&self) -> &[u8] {
        &self.buffer
    }

    pub fn header(&self) -> Header {
        self.header
    }

    /// Returns true if any argument was dropped because the buffer or the
    /// command ceiling was exhausted.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

pub struct Encoder<'a> {
    blob: Blob<'a>,
    header: Header,
    max_commands: u8,
    overflowed: bool,
    staged: Vec<i32>,
}

impl Encoder<'static> {
    /// Create an encoder on a heap-backed blob sized by the config.
    pub fn with_config(config: &Config) -> Self {
        Encoder::new(
            Blob::new(config.initial_capacity(), config.max_capacity()),
            config.max_commands(),
        )
    }
}

impl<'a> Encoder<'a> {
    /// Create an encoder which starts in the provided buffer and moves to the
    /// heap only if the message outgrows it.
    pub fn with_buffer(config: &Config, buffer: &'a mut [u8]) -> Self {
        Encoder::new(
            Blob::with_buffer(buffer, config.max_capacity()),
            config.max_commands(),
        )
    }

    // the blob must be able to hold the header, which a validated `Config`
    // guarantees
    pub(crate) fn new(mut blob: Blob<'a>, max_commands: u8) -> Self {
        debug_assert!(blob.max_capacity() >= HEADER_SIZE);
        let overflowed = blob.append(&[0; HEADER_SIZE]) != HEADER_SIZE;

        Self {
            blob,
            header: Header::default(),
            max_commands,
            overflowed,
            staged: Vec::new(),
        }
    }

    /// The header as it stands so far.
    pub fn header(&self) -> Header {
        self.header
    }

    pub fn is_truncated(&self) -> bool {
        self.overflowed || self.blob.is_truncated()
    }

    /// Check that `commands` more commands totalling `bytes` bytes fit.
    fn has_room(&mut self, commands: usize, bytes: usize) -> bool {
        if self.overflowed {
            return false;
        }

        if self.header.count as usize + commands > self.max_commands as usize {
            self.overflowed = true;
            return false;
        }

        self.blob.reserve(bytes)
    }

    // callers must have checked `has_room` first
    fn write(&mut self, kind: CommandType, flags: CommandFlags, payload: &[u8]) {
        self.blob
            .append(&descriptor(kind, flags, payload.len() as u8));
        self.blob.append(payload);

        self.header.count += 1;

        if flags.contains(CommandFlags::PRIVATE) {
            self.header.flags.insert(HeaderFlags::HAS_PRIVATE);
        }

        if kind.is_non_scalar() {
            self.header.flags.insert(HeaderFlags::HAS_NON_SCALAR);
        }
    }

    /// Write any staged counts followed by one value command, all or none.
    fn encode(&mut self, kind: CommandType, flags: CommandFlags, payload: &[u8]) -> bool {
        let mut staged = core::mem::take(&mut self.staged);
        let written = self.encode_with_counts(&staged, kind, flags, payload);
        staged.clear();
        self.staged = staged;
        written
    }

    fn encode_with_counts(
        &mut self,
        counts: &[i32],
        kind: CommandType,
        flags: CommandFlags,
        payload: &[u8],
    ) -> bool {
        if payload.len() > MAX_PAYLOAD {
            return false;
        }

        let bytes = counts.len() * (DESCRIPTOR_SIZE + 4) + DESCRIPTOR_SIZE + payload.len();
        if !self.has_room(counts.len() + 1, bytes) {
            return false;
        }

        for count in counts {
            self.write(CommandType::Count, CommandFlags::empty(), &count.to_le_bytes());
        }
        self.write(kind, flags, payload);
        true
    }

    /// Stage a `count` command, such as a width or precision, to be written
    /// immediately before the next value command. Staged counts and their
    /// value are written together or not at all.
    pub fn stage_count(&mut self, count: i32) {
        self.staged.push(count);
    }

    /// Add a signed integer scalar of the given width. Values wider than the
    /// width are truncated to their low-order bytes.
    pub fn add_int(&mut self, value: i64, width: Width, flags: CommandFlags) -> bool {
        self.add_uint(value as u64, width, flags)
    }

    /// Add an unsigned integer scalar of the given width.
    pub fn add_uint(&mut self, value: u64, width: Width, flags: CommandFlags) -> bool {
        let bytes = value.to_le_bytes();
        self.encode(CommandType::Scalar, flags, &bytes[..width.bytes()])
    }

    /// Add a pointer-sized scalar.
    pub fn add_pointer(&mut self, address: u64, flags: CommandFlags) -> bool {
        self.encode(CommandType::Scalar, flags, &address.to_le_bytes())
    }

    /// Add a `count` command, used for widths and precisions.
    pub fn add_count(&mut self, count: i32) -> bool {
        self.encode_with_counts(&[], CommandType::Count, CommandFlags::empty(), &count.to_le_bytes())
    }

    /// Add a floating-point value as a precision `count` command followed by
    /// the 8 byte value. Either both commands are written or neither is. A
    /// negative precision means the reader should use its default.
    pub fn add_float(&mut self, value: f64, precision: i32, flags: CommandFlags) -> bool {
        self.stage_count(precision);
        self.encode(CommandType::Scalar, flags, &value.to_le_bytes())
    }

    /// Add an opaque object reference. The referenced object must outlive the
    /// delivery of the finished message.
    pub fn add_object(&mut self, object: ObjectRef, flags: CommandFlags) -> bool {
        self.encode(CommandType::Object, flags, &object.handle().to_le_bytes())
    }

    /// Add an object described by its textual representation, carried inline.
    /// Text longer than a payload allows is cut at a character boundary.
    pub fn add_object_text(&mut self, text: &str, flags: CommandFlags) -> bool {
        self.encode(CommandType::Object, flags, clip(text, MAX_PAYLOAD).as_bytes())
    }

    /// Add a UTF-8 string carried inline.
    pub fn add_string(&mut self, text: &str, flags: CommandFlags) -> bool {
        self.encode(CommandType::String, flags, clip(text, MAX_PAYLOAD).as_bytes())
    }

    /// Add a wide string, carried inline as UTF-32LE code units.
    pub fn add_wide_string(&mut self, text: &str, flags: CommandFlags) -> bool {
        let payload: Vec<u8> = text
            .chars()
            .take(MAX_PAYLOAD / 4)
            .flat_map(|c| (c as u32).to_le_bytes())
            .collect();
        self.encode(CommandType::WideString, flags, &payload)
    }

    /// Add a raw byte span of at most 255 bytes. Longer spans are refused.
    pub fn add_data(&mut self, bytes: &[u8], flags: CommandFlags) -> bool {
        self.encode(CommandType::Data, flags, bytes)
    }

    /// Add the `errno` value captured by the caller.
    pub fn add_errno(&mut self, errno: i32, flags: CommandFlags) -> bool {
        self.encode(CommandType::Errno, flags, &errno.to_le_bytes())
    }

    /// Patch the header into the reserved bytes and return the stream.
    pub fn finish(mut self) -> Packed {
        let truncated = self.is_truncated();
        let header = self.header;

        self.blob.patch(0, &header.to_bytes());

        Packed {
            buffer: self.blob.into_vec(),
            header,
            truncated,
        }
    }
}

/// Returns the longest prefix of `text` of at most `max` bytes which ends on a
/// character boundary.
pub(crate) fn clip(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }

    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}
