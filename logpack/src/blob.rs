//! An append-only byte buffer with a hard size ceiling.
//!
//! A `Blob` starts with a small capacity, either on a caller-provided slice
//! (for example a stack array) or on the heap, and doubles on demand up to a
//! fixed maximum. Once an append cannot be satisfied even after growing, the
//! blob keeps whatever prefix fit, marks itself as truncated, and silently
//! ignores every append that follows.

use core::cmp::{max, min};

enum Storage<'a> {
    Borrowed(&'a mut [u8]),
    Owned(Vec<u8>),
}

impl Storage<'_> {
    fn as_slice(&self) -> &[u8] {
        match self {
            Storage::Borrowed(buf) => buf,
            Storage::Owned(buf) => buf,
        }
    }

    fn as_mut_slice(&mut self) -> &mut [u8] {
        match self {
            Storage::Borrowed(buf) => buf,
            Storage::Owned(buf) => buf,
        }
    }
}

/// A growable, truncating byte buffer.
pub struct Blob<'a> {
    storage: Storage<'a>,
    len: usize,
    max: usize,
    truncated: bool,
    binary: bool,
}

impl Blob<'static> {
    /// Create a heap-backed blob with the provided initial capacity which may
    /// grow up to `max` bytes. The initial capacity is clamped to `max`.
    pub fn new(capacity: usize, max: usize) -> Self {
        let capacity = min(capacity, max);

        Self {
            storage: Storage::Owned(vec![0; capacity]),
            len: 0,
            max,
            truncated: false,
            binary: true,
        }
    }
}

impl<'a> Blob<'a> {
    /// Create a blob which writes into the provided buffer until it needs to
    /// grow, at which point the contents move to the heap. Only the first
    /// `max` bytes of the buffer are used.
    pub fn with_buffer(buffer: &'a mut [u8], max: usize) -> Self {
        let capacity = min(buffer.len(), max);

        Self {
            storage: Storage::Borrowed(&mut buffer[..capacity]),
            len: 0,
            max,
            truncated: false,
            binary: true,
        }
    }

    /// Switch between binary mode and text mode. Text mode reserves one byte
    /// of capacity to keep a NUL terminator after the written bytes.
    pub fn binary(mut self, binary: bool) -> Self {
        self.binary = binary;
        if !binary {
            self.terminate();
        }
        self
    }

    /// Returns the number of bytes written.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the current capacity in bytes.
    pub fn capacity(&self) -> usize {
        self.storage.as_slice().len()
    }

    /// Returns the capacity this blob may never grow beyond.
    pub fn max_capacity(&self) -> usize {
        self.max
    }

    /// Returns true once an append has been cut short. A truncated blob
    /// accepts no further bytes.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Returns true if the contents live in a heap allocation owned by the
    /// blob rather than in a caller-provided buffer.
    pub fn needs_free(&self) -> bool {
        matches!(self.storage, Storage::Owned(_))
    }

    pub fn is_binary(&self) -> bool {
        self.binary
    }

    fn available(&self) -> usize {
        self.capacity()
            .saturating_sub(!self.binary as usize)
            .saturating_sub(self.len)
    }

    fn terminate(&mut self) {
        let len = self.len;
        if let Some(byte) = self.storage.as_mut_slice().get_mut(len) {
            *byte = 0;
        }
    }

    /// Grow the storage so that `additional` more bytes would fit, doubling
    /// the capacity where possible and never exceeding the maximum.
    fn grow(&mut self, additional: usize) {
        let capacity = self.capacity();
        if capacity >= self.max {
            return;
        }

        let needed = self.len + additional + !self.binary as usize;
        let target = min(self.max, max(capacity.saturating_mul(2), needed));
        if target <= capacity {
            return;
        }

        match &mut self.storage {
            Storage::Owned(buf) => buf.resize(target, 0),
            Storage::Borrowed(buf) => {
                let mut owned = vec![0; target];
                owned[..capacity].copy_from_slice(buf);
                self.storage = Storage::Owned(owned);
            }
        }
    }

    /// Ensure that `additional` bytes can be appended without truncation,
    /// growing if needed. If they cannot fit, the blob is marked truncated and
    /// false is returned. Nothing is written either way.
    pub fn reserve(&mut self, additional: usize) -> bool {
        if self.truncated {
            return false;
        }

        if additional > self.available() {
            self.grow(additional);
        }

        if additional > self.available() {
            self.truncated = true;
            return false;
        }

        true
    }

    /// Append bytes to the blob, returning how many were written. A partial
    /// write marks the blob as truncated.
    pub fn append(&mut self, bytes: &[u8]) -> usize {
        if self.truncated {
            return 0;
        }

        if bytes.len() > self.available() {
            self.grow(bytes.len());
        }

        let count = min(bytes.len(), self.available());
        let start = self.len;
        self.storage.as_mut_slice()[start..start + count].copy_from_slice(&bytes[..count]);
        self.len += count;

        if !self.binary {
            self.terminate();
        }

        if count < bytes.len() {
            self.truncated = true;
        }

        count
    }

    /// Overwrite bytes that were already written, starting at `offset`.
    /// Returns false without writing if the range is not fully written yet.
    pub fn patch(&mut self, offset: usize, bytes: &[u8]) -> bool {
        match offset.checked_add(bytes.len()) {
            Some(end) if end <= self.len => {
                self.storage.as_mut_slice()[offset..end].copy_from_slice(bytes);
                true
            }
            _ => false,
        }
    }

    /// Returns the written prefix of the buffer.
    pub fn finalize(&self) -> &[u8] {
        &self.storage.as_slice()[..self.len]
    }

    /// Consume the blob and return the written bytes as an owned vector.
    pub fn into_vec(self) -> Vec<u8> {
        match self.storage {
            Storage::Owned(mut buf) => {
                buf.truncate(self.len);
                buf
            }
            Storage::Borrowed(buf) => buf[..self.len].to_vec(),
        }
    }
}
