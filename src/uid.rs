// Copyright (c) 2024 Mike Tsao. All rights reserved.

use derive_more::Display;
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicUsize, Ordering};

/// A [Uid] identifies a note, block, or track uniquely within a project.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
pub struct Uid(pub usize);
impl From<usize> for Uid {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

/// Mints [Uid]s. The counter is atomic so a factory can be shared without a
/// mutable borrow.
#[derive(Debug, Serialize, Deserialize)]
pub struct UidFactory {
    next_uid_value: AtomicUsize,
}
impl Default for UidFactory {
    fn default() -> Self {
        Self::new(1)
    }
}
impl UidFactory {
    /// Creates a factory whose first minted [Uid] is `first_uid`.
    pub fn new(first_uid: usize) -> Self {
        Self {
            next_uid_value: AtomicUsize::new(first_uid),
        }
    }

    /// Returns the next unique [Uid].
    pub fn mint_next(&self) -> Uid {
        Uid(self.next_uid_value.fetch_add(1, Ordering::Relaxed))
    }

    /// Guarantees that subsequent [Uid]s won't be lower than `next_uid_value`.
    /// Needed after deserializing a project that already contains ids.
    pub fn notify_externally_minted_uid(&self, uid: Uid) {
        self.next_uid_value.fetch_max(uid.0 + 1, Ordering::Relaxed);
    }
}
