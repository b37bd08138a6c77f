// Copyright 2023 IOP Systems, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{render, Category, Location, LogType, Signpost};
use logpack::Message;

/// A destination for packed log messages.
///
/// `send` is called on the logging thread for every enabled statement that
/// encoded successfully, so implementations should avoid blocking for long.
pub trait Sink: Send + Sync {
    fn send(&self, record: &Record<'_>);

    /// Flush any buffered output.
    fn flush(&self) {}
}

/// Everything a sink receives about one log statement.
#[derive(Copy, Clone, Debug)]
pub struct Record<'a> {
    category: &'a Category,
    log_type: LogType,
    location: &'a Location,
    message: &'a Message,
    signpost: Option<Signpost<'a>>,
}

impl<'a> Record<'a> {
    pub fn new(
        category: &'a Category,
        log_type: LogType,
        location: &'a Location,
        message: &'a Message,
    ) -> Self {
        Self {
            category,
            log_type,
            location,
            message,
            signpost: None,
        }
    }

    /// Marks this record as a signpost.
    pub fn with_signpost(mut self, signpost: Signpost<'a>) -> Self {
        self.signpost = Some(signpost);
        self
    }

    pub fn category(&self) -> &'a Category {
        self.category
    }

    pub fn log_type(&self) -> LogType {
        self.log_type
    }

    pub fn location(&self) -> &'a Location {
        self.location
    }

    pub fn message(&self) -> &'a Message {
        self.message
    }

    /// The signpost kind, name and id, if the statement was logged with
    /// `Logger::signpost`.
    pub fn signpost(&self) -> Option<Signpost<'a>> {
        self.signpost
    }

    /// Render the message as text. See `render`.
    pub fn render(&self, redact: bool) -> String {
        render(self.message, redact)
    }
}
