// Copyright 2023 IOP Systems, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

//! This crate provides category-scoped loggers which pack each log statement
//! with `logpack` and hand the packed message to a `Sink`.
//!
//! A `Logger` is constructed with a `LoggerBuilder` which names the subsystem
//! and category it logs under, the `Sink` that receives its messages, and the
//! encoder `Config` used to pack them. Categories are interned in a
//! process-wide registry, so every logger built for the same subsystem and
//! category shares one `Category`.
//!
//! Messages are kept in their packed form until a sink needs text. The
//! `WriterSink` renders them to any `Write` using a `FormatFunction`, and the
//! `FacadeSink` renders them into the `log` crate so they reach whatever
//! logger the application has installed. Both redact private arguments as
//! `<private>` unless told otherwise.
//!
//! ```
//! use logsink::*;
//!
//! let logger = Logger::builder()
//!     .subsystem("com.example.cache")
//!     .category("eviction")
//!     .sink(WriterSink::new(std::io::sink()))
//!     .build();
//!
//! oslog!(logger, LogType::Default, "evicted %d items for %{public}s", 12, "tenant-a");
//! ```

#[macro_use]
mod macros;

mod category;
mod format;
mod logger;
mod nop;
mod outputs;
mod render;
mod signpost;
mod traits;

pub use category::*;
pub use format::*;
pub use logger::*;
pub use nop::*;
pub use outputs::*;
pub use render::*;
pub use signpost::*;
pub use traits::*;

pub use logpack::{Config, Message, ObjectRef, Value};

#[cfg(feature = "metrics")]
mod metrics;

use core::fmt;
use log::Level;

/// The kind of a log statement, from routine to unrecoverable.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum LogType {
    Default,
    Info,
    Debug,
    Error,
    Fault,
}

impl LogType {
    /// The `log` level used to filter and forward statements of this type.
    pub fn level(self) -> Level {
        match self {
            LogType::Default | LogType::Info => Level::Info,
            LogType::Debug => Level::Debug,
            LogType::Error | LogType::Fault => Level::Error,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LogType::Default => "DEFAULT",
            LogType::Info => "INFO",
            LogType::Debug => "DEBUG",
            LogType::Error => "ERROR",
            LogType::Fault => "FAULT",
        }
    }
}

impl fmt::Display for LogType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// The source location of a log statement. Use the `location!` macro to
/// capture it at the call site.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub module_path: &'static str,
    pub file: &'static str,
    pub line: u32,
}

/// Returns the calling thread's current OS error number, or 0 if there is
/// none.
pub fn errno() -> i32 {
    std::io::Error::last_os_error().raw_os_error().unwrap_or(0)
}
