// Copyright 2023 IOP Systems, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::{default_format, FormatFunction, Record, Sink};
use clocksource::precise::UnixInstant;
use parking_lot::Mutex;
use std::io::{Error, Write};

#[cfg(feature = "metrics")]
use crate::metrics::*;

/// A sink which renders each record as a line of text and writes it to a
/// `Write` such as a file or standard error.
pub struct WriterSink {
    writer: Mutex<Box<dyn Write + Send>>,
    format: FormatFunction,
    redact: bool,
}

impl WriterSink {
    pub fn new<T: Write + Send + 'static>(writer: T) -> Self {
        Self {
            writer: Mutex::new(Box::new(writer)),
            format: default_format,
            redact: true,
        }
    }

    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }

    pub fn stderr() -> Self {
        Self::new(std::io::stderr())
    }

    /// Sets the format function used to write each record.
    pub fn format(mut self, format: FormatFunction) -> Self {
        self.format = format;
        self
    }

    /// Controls whether private arguments are written as `<private>`. This is
    /// on by default.
    pub fn redact(mut self, redact: bool) -> Self {
        self.redact = redact;
        self
    }

    fn write(&self, record: &Record<'_>) -> Result<(), Error> {
        let text = record.render(self.redact);

        // format outside of the lock
        let mut buffer = Vec::with_capacity(text.len() + 64);
        (self.format)(&mut buffer, UnixInstant::now(), record, &text)?;

        self.writer.lock().write_all(&buffer)?;

        metrics! {
            LOG_WRITE.increment();
            LOG_WRITE_BYTE.add(buffer.len() as _);
        }

        Ok(())
    }
}

impl Sink for WriterSink {
    fn send(&self, record: &Record<'_>) {
        if self.write(record).is_err() {
            metrics! {
                LOG_WRITE_EX.increment();
            }
        }
    }

    fn flush(&self) {
        match self.writer.lock().flush() {
            Ok(()) => {
                metrics! {
                    LOG_FLUSH.increment();
                }
            }
            Err(_) => {
                metrics! {
                    LOG_FLUSH_EX.increment();
                }
            }
        }
    }
}

/// A sink which renders each record and forwards it to the `log` crate, using
/// the category as the target.
#[derive(Copy, Clone, Debug)]
pub struct FacadeSink {
    redact: bool,
}

impl Default for FacadeSink {
    fn default() -> Self {
        Self { redact: true }
    }
}

impl FacadeSink {
    pub fn new() -> Self {
        Default::default()
    }

    /// Controls whether private arguments are forwarded as `<private>`. This
    /// is on by default.
    pub fn redact(mut self, redact: bool) -> Self {
        self.redact = redact;
        self
    }
}

impl Sink for FacadeSink {
    fn send(&self, record: &Record<'_>) {
        let level = record.log_type().level();
        let target = record.category().to_string();

        if level > log::max_level() {
            return;
        }

        let mut text = record.render(self.redact);
        if let Some(signpost) = record.signpost() {
            text = format!("[{signpost}] {text}");
        }
        let location = record.location();

        log::logger().log(
            &log::Record::builder()
                .args(format_args!("{text}"))
                .level(level)
                .target(&target)
                .module_path_static(Some(location.module_path))
                .file_static(Some(location.file))
                .line(Some(location.line))
                .build(),
        );
    }

    fn flush(&self) {
        log::logger().flush()
    }
}
