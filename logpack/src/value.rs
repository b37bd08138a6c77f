//! Arguments supplied alongside a format string.

use std::borrow::Cow;
use std::fmt;

/// An opaque pointer-sized reference to some object owned by the caller. The
/// encoder only records the handle; the caller must keep the referenced
/// object alive until the message has been handed to a sink.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ObjectRef(u64);

impl ObjectRef {
    pub const fn new(handle: u64) -> Self {
        Self(handle)
    }

    /// Use the address of a value as its handle.
    pub fn from_ref<T: ?Sized>(value: &T) -> Self {
        Self(value as *const T as *const () as usize as u64)
    }

    pub const fn handle(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<object 0x{:x}>", self.0)
    }
}

/// A single log statement argument.
#[derive(Clone, Debug, PartialEq)]
pub enum Value<'a> {
    Signed(i64),
    Unsigned(u64),
    /// A floating-point value with an optional decimal precision which is used
    /// when the format string does not supply one.
    Float(f64, Option<i32>),
    Text(Cow<'a, str>),
    Object(ObjectRef),
    Bytes(Cow<'a, [u8]>),
}

impl Value<'_> {
    /// Returns the value as an integer if it is one.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Signed(v) => Some(*v),
            Value::Unsigned(v) => Some(*v as i64),
            _ => None,
        }
    }

    pub fn into_owned(self) -> Value<'static> {
        match self {
            Value::Signed(v) => Value::Signed(v),
            Value::Unsigned(v) => Value::Unsigned(v),
            Value::Float(v, p) => Value::Float(v, p),
            Value::Text(v) => Value::Text(Cow::Owned(v.into_owned())),
            Value::Object(v) => Value::Object(v),
            Value::Bytes(v) => Value::Bytes(Cow::Owned(v.into_owned())),
        }
    }
}

impl fmt::Display for Value<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Signed(v) => write!(f, "{v}"),
            Value::Unsigned(v) => write!(f, "{v}"),
            // the formatter rejects precisions beyond u16::MAX
            Value::Float(v, Some(p)) if *p >= 0 => {
                write!(f, "{v:.*}", (*p).min(u16::MAX as i32) as usize)
            }
            Value::Float(v, _) => write!(f, "{v}"),
            Value::Text(v) => f.write_str(v),
            Value::Object(v) => write!(f, "{v}"),
            Value::Bytes(v) => {
                for byte in v.iter() {
                    write!(f, "{byte:02x}")?;
                }
                Ok(())
            }
        }
    }
}

macro_rules! from_signed {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(v: $t) -> Self {
                Value::Signed(v as i64)
            }
        })*
    };
}

macro_rules! from_unsigned {
    ($($t:ty),*) => {
        $(impl From<$t> for Value<'_> {
            fn from(v: $t) -> Self {
                Value::Unsigned(v as u64)
            }
        })*
    };
}

from_signed!(i8, i16, i32, i64, isize);
from_unsigned!(u8, u16, u32, u64, usize);

impl From<bool> for Value<'_> {
    fn from(v: bool) -> Self {
        Value::Signed(v as i64)
    }
}

impl From<char> for Value<'_> {
    fn from(v: char) -> Self {
        Value::Unsigned(v as u64)
    }
}

impl From<f32> for Value<'_> {
    fn from(v: f32) -> Self {
        Value::Float(v as f64, None)
    }
}

impl From<f64> for Value<'_> {
    fn from(v: f64) -> Self {
        Value::Float(v, None)
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(v: &'a str) -> Self {
        Value::Text(Cow::Borrowed(v))
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(v: &'a String) -> Self {
        Value::Text(Cow::Borrowed(v.as_str()))
    }
}

impl From<String> for Value<'_> {
    fn from(v: String) -> Self {
        Value::Text(Cow::Owned(v))
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(v: &'a [u8]) -> Self {
        Value::Bytes(Cow::Borrowed(v))
    }
}

impl From<Vec<u8>> for Value<'_> {
    fn from(v: Vec<u8>) -> Self {
        Value::Bytes(Cow::Owned(v))
    }
}

impl From<ObjectRef> for Value<'_> {
    fn from(v: ObjectRef) -> Self {
        Value::Object(v)
    }
}
