// Copyright 2023 IOP Systems, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! Signposts mark points of interest and intervals for performance analysis.
//! A signpost is a log statement with a name, a kind and an id which ties
//! the begin and end of an interval together.

use core::fmt;
use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

/// Whether a signpost marks a single point or one end of an interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SignpostType {
    Event,
    IntervalBegin,
    IntervalEnd,
}

impl SignpostType {
    pub fn as_str(self) -> &'static str {
        match self {
            SignpostType::Event => "event",
            SignpostType::IntervalBegin => "begin",
            SignpostType::IntervalEnd => "end",
        }
    }
}

impl fmt::Display for SignpostType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Identifies the interval a signpost belongs to. Begin and end signposts
/// with the same name and id form one interval.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SignpostId(u64);

impl SignpostId {
    /// Not a valid id for an interval.
    pub const NULL: SignpostId = SignpostId(0);
    /// Returned when no id could be produced.
    pub const INVALID: SignpostId = SignpostId(u64::MAX);
    /// For intervals that never overlap within their category.
    pub const EXCLUSIVE: SignpostId = SignpostId(0xEEEE_B0B5_B2B2_EEEE);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns an id which is unique within the process.
    pub fn generate() -> Self {
        let id = NEXT_ID.fetch_add(1, Ordering::Relaxed);
        if id == Self::EXCLUSIVE.0 || id == Self::INVALID.0 {
            return Self::INVALID;
        }
        Self(id)
    }

    /// Derive an id from the address of a value which lives for the whole
    /// interval.
    pub fn from_ref<T: ?Sized>(value: &T) -> Self {
        Self(value as *const T as *const () as usize as u64)
    }

    pub const fn get(self) -> u64 {
        self.0
    }

    /// Returns true for ids which can tie an interval together.
    pub fn is_valid(self) -> bool {
        self != Self::NULL && self != Self::INVALID
    }
}

impl fmt::Display for SignpostId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:x}", self.0)
    }
}

/// The signpost part of a `Record`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Signpost<'a> {
    kind: SignpostType,
    name: &'a str,
    id: SignpostId,
}

impl<'a> Signpost<'a> {
    pub fn new(kind: SignpostType, name: &'a str, id: SignpostId) -> Self {
        Self { kind, name, id }
    }

    pub fn kind(&self) -> SignpostType {
        self.kind
    }

    pub fn name(&self) -> &'a str {
        self.name
    }

    pub fn id(&self) -> SignpostId {
        self.id
    }
}

impl fmt::Display for Signpost<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} ({})", self.kind, self.name, self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = SignpostId::generate();
        let b = SignpostId::generate();
        assert_ne!(a, b);
        assert!(a.is_valid());
        assert!(b.is_valid());
        assert!(!SignpostId::NULL.is_valid());
        assert!(!SignpostId::INVALID.is_valid());
    }

    #[test]
    fn ids_from_refs() {
        let value = 5u64;
        assert_eq!(SignpostId::from_ref(&value), SignpostId::from_ref(&value));
        assert!(SignpostId::from_ref(&value).is_valid());
    }

    #[test]
    fn display() {
        let signpost = Signpost::new(SignpostType::IntervalBegin, "fetch", SignpostId::new(0x2a));
        assert_eq!(signpost.to_string(), "begin fetch (0x2a)");
        assert_eq!(format!("{:<6}|", SignpostType::IntervalEnd), "end   |");
    }
}
