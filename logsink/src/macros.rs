// Copyright 2023 IOP Systems, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

/// Captures the `Location` of the call site.
#[macro_export]
macro_rules! location {
    () => {
        $crate::Location {
            module_path: module_path!(),
            file: file!(),
            line: line!(),
        }
    };
}

/// Logs a printf-style statement through a `Logger`.
///
/// The OS error number is captured before any argument is evaluated, so a
/// `%m` in the format reports the error that was current at the call site.
/// Arguments are converted with `Value::from`, and nothing is encoded if the
/// logger does not have the log type enabled.
#[macro_export]
macro_rules! oslog {
    ($logger:expr, $log_type:expr, $format:expr $(, $arg:expr)* $(,)?) => {{
        let errno = $crate::errno();
        let logger = &$logger;
        let log_type: $crate::LogType = $log_type;
        if logger.enabled(log_type) {
            logger.log_with_errno(
                log_type,
                &$crate::location!(),
                $format,
                &[$($crate::Value::from($arg)),*],
                errno,
            );
        }
    }};
}

#[macro_export]
macro_rules! os_default {
    ($logger:expr, $($arg:tt)+) => {
        $crate::oslog!($logger, $crate::LogType::Default, $($arg)+)
    };
}

#[macro_export]
macro_rules! os_info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::oslog!($logger, $crate::LogType::Info, $($arg)+)
    };
}

#[macro_export]
macro_rules! os_debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::oslog!($logger, $crate::LogType::Debug, $($arg)+)
    };
}

#[macro_export]
macro_rules! os_error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::oslog!($logger, $crate::LogType::Error, $($arg)+)
    };
}

#[macro_export]
macro_rules! os_fault {
    ($logger:expr, $($arg:tt)+) => {
        $crate::oslog!($logger, $crate::LogType::Fault, $($arg)+)
    };
}

/// Logs a signpost through a `Logger`. The kind is one of the `SignpostType`
/// variants, given by name.
///
/// ```
/// use logsink::*;
///
/// let logger = Logger::builder().sink(NopSink::new()).build();
/// let id = SignpostId::generate();
/// os_signpost!(logger, IntervalBegin, id, "fetch", "key %{public}s", "k1");
/// os_signpost!(logger, IntervalEnd, id, "fetch", "");
/// ```
#[macro_export]
macro_rules! os_signpost {
    ($logger:expr, $kind:ident, $id:expr, $name:expr, $format:expr $(, $arg:expr)* $(,)?) => {{
        let logger = &$logger;
        if logger.enabled($crate::LogType::Default) {
            logger.signpost(
                $crate::SignpostType::$kind,
                $id,
                $name,
                &$crate::location!(),
                $format,
                &[$($crate::Value::from($arg)),*],
            );
        }
    }};
}

#[cfg(feature = "metrics")]
macro_rules! metrics {
    { $( $tt:tt )* } => { $( $tt )* }
}

#[cfg(not(feature = "metrics"))]
macro_rules! metrics {
    { $( $tt:tt)* } => {}
}
