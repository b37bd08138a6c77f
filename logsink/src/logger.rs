// Copyright 2023 IOP Systems, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{
    errno, Category, FacadeSink, Location, LogType, Record, Signpost, SignpostId, SignpostType,
    Sink,
};
use log::LevelFilter;
use logpack::{Config, Value};
use std::sync::Arc;

#[cfg(feature = "metrics")]
use crate::metrics::*;

/// Packs log statements for one category and hands them to a sink.
///
/// Logging never panics and never returns an error to the caller. A statement
/// whose format string is malformed is dropped, and one which does not fit
/// the encoder limits is delivered truncated.
#[derive(Clone)]
pub struct Logger {
    category: Arc<Category>,
    sink: Arc<dyn Sink>,
    config: Config,
    level_filter: LevelFilter,
}

impl Default for Logger {
    fn default() -> Self {
        LoggerBuilder::default().build()
    }
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    pub fn category(&self) -> &Category {
        &self.category
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn level_filter(&self) -> LevelFilter {
        self.level_filter
    }

    /// Returns true if statements of this type would be encoded.
    pub fn enabled(&self, log_type: LogType) -> bool {
        log_type.level() <= self.level_filter
    }

    /// Log a statement, using the calling thread's current OS error number
    /// for any `%m`. Returns true if the message was handed to the sink.
    pub fn log(
        &self,
        log_type: LogType,
        location: &Location,
        format: &str,
        args: &[Value<'_>],
    ) -> bool {
        let errno = errno();
        self.log_with_errno(log_type, location, format, args, errno)
    }

    /// Log a statement with an OS error number captured by the caller.
    pub fn log_with_errno(
        &self,
        log_type: LogType,
        location: &Location,
        format: &str,
        args: &[Value<'_>],
        errno: i32,
    ) -> bool {
        self.send(log_type, location, format, args, errno, None)
    }

    /// Log a signpost, which marks a point of interest or one end of an
    /// interval. Signposts are logged with the `Default` type, and the sink
    /// receives the kind, name and id through `Record::signpost`.
    pub fn signpost(
        &self,
        kind: SignpostType,
        id: SignpostId,
        name: &str,
        location: &Location,
        format: &str,
        args: &[Value<'_>],
    ) -> bool {
        let errno = errno();
        let signpost = Signpost::new(kind, name, id);
        self.send(LogType::Default, location, format, args, errno, Some(signpost))
    }

    fn send(
        &self,
        log_type: LogType,
        location: &Location,
        format: &str,
        args: &[Value<'_>],
        errno: i32,
        signpost: Option<Signpost<'_>>,
    ) -> bool {
        if !self.enabled(log_type) {
            metrics! {
                LOG_SKIP.increment();
            }
            return false;
        }

        let message = match self.config.encode(format, args, errno) {
            Ok(message) => message,
            Err(_) => {
                metrics! {
                    LOG_DROP.increment();
                }
                return false;
            }
        };

        if message.is_truncated() {
            metrics! {
                LOG_TRUNCATE.increment();
            }
        }

        let mut record = Record::new(&self.category, log_type, location, &message);
        if let Some(signpost) = signpost {
            record = record.with_signpost(signpost);
        }
        self.sink.send(&record);

        metrics! {
            LOG_SEND.increment();
        }

        true
    }

    pub fn flush(&self) {
        self.sink.flush()
    }
}

/// A type to construct a `Logger`.
///
/// By default the logger uses the `default` category of an unnamed subsystem,
/// forwards to the `log` crate through a `FacadeSink`, and has debug
/// statements disabled.
pub struct LoggerBuilder {
    subsystem: String,
    category: String,
    sink: Option<Arc<dyn Sink>>,
    config: Config,
    level_filter: LevelFilter,
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            subsystem: String::new(),
            category: "default".to_string(),
            sink: None,
            config: Config::default(),
            level_filter: LevelFilter::Info,
        }
    }
}

impl LoggerBuilder {
    /// Create a new logger builder.
    pub fn new() -> Self {
        Default::default()
    }

    /// Sets the subsystem, typically a reverse-DNS name for the component.
    pub fn subsystem(mut self, subsystem: &str) -> Self {
        self.subsystem = subsystem.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = category.to_string();
        self
    }

    pub fn sink<T: Sink + 'static>(mut self, sink: T) -> Self {
        self.sink = Some(Arc::new(sink));
        self
    }

    /// Use a sink which is shared with other loggers.
    pub fn shared_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Sets the encoder limits applied to each statement.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    /// Statements whose log type maps to a less severe level than this are
    /// skipped without being encoded.
    pub fn level_filter(mut self, level_filter: LevelFilter) -> Self {
        self.level_filter = level_filter;
        self
    }

    /// Consumes the builder and returns a `Logger`.
    pub fn build(self) -> Logger {
        Logger {
            category: Category::get(&self.subsystem, &self.category),
            sink: self
                .sink
                .unwrap_or_else(|| Arc::new(FacadeSink::default())),
            config: self.config,
            level_filter: self.level_filter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::NopSink;

    #[test]
    fn defaults() {
        let logger = Logger::default();
        assert_eq!(logger.category().name(), "default");
        assert_eq!(logger.category().subsystem(), "");
        assert_eq!(logger.config(), &Config::default());
        assert!(logger.enabled(LogType::Default));
        assert!(logger.enabled(LogType::Fault));
        assert!(!logger.enabled(LogType::Debug));
    }

    #[test]
    fn filtering() {
        let logger = Logger::builder()
            .sink(NopSink::new())
            .level_filter(LevelFilter::Error)
            .build();

        assert!(!logger.log(LogType::Info, &crate::location!(), "skipped", &[]));
        assert!(logger.log(LogType::Fault, &crate::location!(), "sent", &[]));
    }

    #[test]
    fn malformed_is_dropped() {
        let logger = Logger::builder().sink(NopSink::new()).build();
        assert!(!logger.log(LogType::Error, &crate::location!(), "%d", &[]));
        assert!(!logger.log(LogType::Error, &crate::location!(), "50%", &[]));
    }

    #[test]
    fn signposts_follow_the_default_type() {
        let logger = Logger::builder()
            .sink(NopSink::new())
            .level_filter(LevelFilter::Error)
            .build();
        let location = crate::location!();
        assert!(!logger.signpost(
            SignpostType::Event,
            SignpostId::generate(),
            "skipped",
            &location,
            "",
            &[]
        ));
    }
}
