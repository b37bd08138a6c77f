// Copyright 2023 IOP Systems, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{Record, Sink};

/// A sink which drops all log messages.
#[derive(Copy, Clone, Debug, Default)]
pub struct NopSink {}

impl NopSink {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Sink for NopSink {
    fn send(&self, _record: &Record<'_>) {}
}
