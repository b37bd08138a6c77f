// Copyright 2023 IOP Systems, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use metriken::{metric, Counter};

#[metric(name = "log_create", description = "logging categories registered")]
pub static LOG_CREATE: Counter = Counter::new();

#[metric(name = "log_send", description = "log messages handed to a sink")]
pub static LOG_SEND: Counter = Counter::new();

#[metric(
    name = "log_skip",
    description = "number of log messages skipped because their type is disabled"
)]
pub static LOG_SKIP: Counter = Counter::new();

#[metric(
    name = "log_drop",
    description = "number of log messages dropped due to a malformed format"
)]
pub static LOG_DROP: Counter = Counter::new();

#[metric(
    name = "log_truncate",
    description = "number of log messages truncated to fit the encoder limits"
)]
pub static LOG_TRUNCATE: Counter = Counter::new();

#[metric(
    name = "log_write",
    description = "number of writes to all logging destinations"
)]
pub static LOG_WRITE: Counter = Counter::new();

#[metric(
    name = "log_write_byte",
    description = "number of bytes written to all logging destinations"
)]
pub static LOG_WRITE_BYTE: Counter = Counter::new();

#[metric(
    name = "log_write_ex",
    description = "number of exceptions while writing to logging destinations"
)]
pub static LOG_WRITE_EX: Counter = Counter::new();

#[metric(
    name = "log_flush",
    description = "number of times logging destinations have been flushed"
)]
pub static LOG_FLUSH: Counter = Counter::new();

#[metric(
    name = "log_flush_ex",
    description = "number of exceptions while flushing logging destinations"
)]
pub static LOG_FLUSH_EX: Counter = Counter::new();
