// Copyright 2023 IOP Systems, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use crate::Record;
use clocksource::datetime::DateTime;
use clocksource::precise::UnixInstant;

/// Writes one rendered record. `text` is the message with its arguments
/// substituted and any redaction already applied.
pub type FormatFunction = fn(
    write: &mut dyn std::io::Write,
    now: UnixInstant,
    record: &Record,
    text: &str,
) -> Result<(), std::io::Error>;

pub fn default_format(
    w: &mut dyn std::io::Write,
    now: UnixInstant,
    record: &Record,
    text: &str,
) -> Result<(), std::io::Error> {
    match record.signpost() {
        Some(signpost) => writeln!(
            w,
            "{} SIGNPOST [{}] {} {}",
            DateTime::from(now),
            record.category(),
            signpost,
            text
        ),
        None => writeln!(
            w,
            "{} {} [{}] {}",
            DateTime::from(now),
            record.log_type(),
            record.category(),
            text
        ),
    }
}

pub fn compact_format(
    w: &mut dyn std::io::Write,
    now: UnixInstant,
    _record: &Record,
    text: &str,
) -> Result<(), std::io::Error> {
    writeln!(w, "{} {}", DateTime::from(now), text)
}

/// Includes the source location of the statement.
pub fn location_format(
    w: &mut dyn std::io::Write,
    now: UnixInstant,
    record: &Record,
    text: &str,
) -> Result<(), std::io::Error> {
    let location = record.location();
    writeln!(
        w,
        "{} {} [{}] {}:{} {}",
        DateTime::from(now),
        record.log_type(),
        record.category(),
        location.file,
        location.line,
        text
    )
}
