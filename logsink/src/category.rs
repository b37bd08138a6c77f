// Copyright 2023 IOP Systems, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use ahash::RandomState;
use core::fmt;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

#[cfg(feature = "metrics")]
use crate::metrics::*;

type Registry = HashMap<(String, String), Arc<Category>, RandomState>;

static REGISTRY: OnceLock<Mutex<Registry>> = OnceLock::new();

/// A named category of log statements within a subsystem.
///
/// Categories are interned: every call to `Category::get` with the same
/// subsystem and name returns the same instance, which lives for the rest of
/// the process.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct Category {
    subsystem: String,
    name: String,
}

impl Category {
    /// Look up a category, registering it on first use.
    pub fn get(subsystem: &str, name: &str) -> Arc<Category> {
        let registry =
            REGISTRY.get_or_init(|| Mutex::new(HashMap::with_hasher(RandomState::new())));

        registry
            .lock()
            .entry((subsystem.to_owned(), name.to_owned()))
            .or_insert_with(|| {
                metrics! {
                    LOG_CREATE.increment();
                }
                Arc::new(Category {
                    subsystem: subsystem.to_owned(),
                    name: name.to_owned(),
                })
            })
            .clone()
    }

    /// The number of categories registered so far.
    pub fn registered() -> usize {
        REGISTRY.get().map(|r| r.lock().len()).unwrap_or(0)
    }

    pub fn subsystem(&self) -> &str {
        &self.subsystem
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.subsystem.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}:{}", self.subsystem, self.name)
        }
    }
}
