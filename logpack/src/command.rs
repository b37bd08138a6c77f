//! Wire layout of a packed message.
//!
//! A message begins with a two byte header: a flag byte followed by the
//! number of commands. Each command is a two byte descriptor followed by its
//! payload. The first descriptor byte carries the command flags in the low
//! nibble and the command type in the high nibble, the second byte carries
//! the payload size. Multi-byte payloads are little-endian.

use core::fmt;

/// Size of the message header in bytes.
pub const HEADER_SIZE: usize = 2;

/// Size of a command descriptor in bytes.
pub const DESCRIPTOR_SIZE: usize = 2;

/// Largest payload a single command can carry.
pub const MAX_PAYLOAD: usize = u8::MAX as usize;

/// The type tag of an encoded command.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CommandType {
    Scalar = 0,
    Count = 1,
    String = 2,
    Data = 3,
    Object = 4,
    WideString = 5,
    Errno = 6,
}

impl CommandType {
    pub fn from_tag(tag: u8) -> Option<Self> {
        match tag {
            0 => Some(Self::Scalar),
            1 => Some(Self::Count),
            2 => Some(Self::String),
            3 => Some(Self::Data),
            4 => Some(Self::Object),
            5 => Some(Self::WideString),
            6 => Some(Self::Errno),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    /// Returns true for commands whose payload is not a plain number. Any such
    /// command sets the `HAS_NON_SCALAR` header flag.
    pub fn is_non_scalar(self) -> bool {
        matches!(
            self,
            Self::String | Self::Data | Self::Object | Self::WideString
        )
    }
}

/// Per-command redaction flags. Only the low four bits are meaningful.
#[derive(Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct CommandFlags(u8);

impl CommandFlags {
    pub const PRIVATE: CommandFlags = CommandFlags(0x1);
    pub const PUBLIC: CommandFlags = CommandFlags(0x2);

    pub const fn empty() -> Self {
        Self(0)
    }

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0x0F)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: CommandFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl core::ops::BitOr for CommandFlags {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl fmt::Debug for CommandFlags {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.contains(Self::PRIVATE), self.contains(Self::PUBLIC)) {
            (true, true) => write!(f, "PRIVATE | PUBLIC"),
            (true, false) => write!(f, "PRIVATE"),
            (false, true) => write!(f, "PUBLIC"),
            (false, false) => write!(f, "(empty)"),
        }
    }
}

/// Privacy requested for a single argument.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Privacy {
    #[default]
    Unspecified,
    Private,
    Public,
}

impl Privacy {
    pub fn flags(self) -> CommandFlags {
        match self {
            Privacy::Unspecified => CommandFlags::empty(),
            Privacy::Private => CommandFlags::PRIVATE,
            Privacy::Public => CommandFlags::PUBLIC,
        }
    }
}

/// Flags carried in the first header byte.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct HeaderFlags(u8);

impl HeaderFlags {
    pub const HAS_PRIVATE: HeaderFlags = HeaderFlags(0x01);
    pub const HAS_NON_SCALAR: HeaderFlags = HeaderFlags(0x02);

    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, other: HeaderFlags) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn insert(&mut self, other: HeaderFlags) {
        self.0 |= other.0;
    }
}

/// The message header, written at offset zero of every command stream.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub(crate) flags: HeaderFlags,
    pub(crate) count: u8,
}

impl Header {
    pub fn from_bytes(bytes: [u8; HEADER_SIZE]) -> Self {
        Self {
            flags: HeaderFlags::from_bits(bytes[0]),
            count: bytes[1],
        }
    }

    pub fn to_bytes(self) -> [u8; HEADER_SIZE] {
        [self.flags.bits(), self.count]
    }

    pub fn flags(&self) -> HeaderFlags {
        self.flags
    }

    /// Returns the number of commands which follow the header.
    pub fn count(&self) -> u8 {
        self.count
    }

    pub fn has_private(&self) -> bool {
        self.flags.contains(HeaderFlags::HAS_PRIVATE)
    }

    pub fn has_non_scalar(&self) -> bool {
        self.flags.contains(HeaderFlags::HAS_NON_SCALAR)
    }
}

pub(crate) fn descriptor(kind: CommandType, flags: CommandFlags, size: u8) -> [u8; DESCRIPTOR_SIZE] {
    [(kind.tag() << 4) | flags.bits(), size]
}

/// A borrowed view of one decoded command.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Command<'a> {
    pub(crate) kind: CommandType,
    pub(crate) flags: CommandFlags,
    pub(crate) payload: &'a [u8],
}

impl<'a> Command<'a> {
    pub fn kind(&self) -> CommandType {
        self.kind
    }

    pub fn flags(&self) -> CommandFlags {
        self.flags
    }

    pub fn payload(&self) -> &'a [u8] {
        self.payload
    }

    /// The privacy that applies to this command: the explicit flag if one was
    /// set, otherwise numbers are public and everything else is private.
    pub fn privacy(&self) -> Privacy {
        if self.flags.contains(CommandFlags::PRIVATE) {
            Privacy::Private
        } else if self.flags.contains(CommandFlags::PUBLIC) || !self.kind.is_non_scalar() {
            Privacy::Public
        } else {
            Privacy::Private
        }
    }

    /// Interpret a 1, 2, 4 or 8 byte payload as a sign-extended integer.
    pub fn as_i64(&self) -> Option<i64> {
        match self.payload.len() {
            1 => Some(self.payload[0] as i8 as i64),
            2 => Some(i16::from_le_bytes(self.payload.try_into().ok()?) as i64),
            4 => Some(i32::from_le_bytes(self.payload.try_into().ok()?) as i64),
            8 => Some(i64::from_le_bytes(self.payload.try_into().ok()?)),
            _ => None,
        }
    }

    /// Interpret a 1, 2, 4 or 8 byte payload as a zero-extended integer.
    pub fn as_u64(&self) -> Option<u64> {
        match self.payload.len() {
            1 => Some(self.payload[0] as u64),
            2 => Some(u16::from_le_bytes(self.payload.try_into().ok()?) as u64),
            4 => Some(u32::from_le_bytes(self.payload.try_into().ok()?) as u64),
            8 => Some(u64::from_le_bytes(self.payload.try_into().ok()?)),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        Some(f64::from_le_bytes(self.payload.try_into().ok()?))
    }

    /// Returns the payload as text if it is valid UTF-8.
    pub fn as_str(&self) -> Option<&'a str> {
        core::str::from_utf8(self.payload).ok()
    }

    /// Decode a wide string payload made of UTF-32LE code units.
    pub fn as_wide_string(&self) -> Option<String> {
        if self.payload.len() % 4 != 0 {
            return None;
        }

        self.payload
            .chunks_exact(4)
            .map(|unit| {
                let unit = u32::from_le_bytes([unit[0], unit[1], unit[2], unit[3]]);
                char::from_u32(unit)
            })
            .collect()
    }
}
