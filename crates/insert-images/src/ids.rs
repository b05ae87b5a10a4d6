// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Stable identities. Ids are allocated from per-addon counters and never
//! reused, so a stale id can only ever miss, never alias a newer entity.

use std::fmt;

macro_rules! stable_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            /// Rebuild an id that crossed a binding boundary.
            pub fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            pub fn raw(self) -> u32 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

stable_id!(PlaceholderId);
stable_id!(BlockId);
stable_id!(NoticeId);
stable_id!(
    /// One upload task, from type filtering to its terminal outcome.
    TaskId
);
stable_id!(LinkSessionId);
stable_id!(TimerId);

#[derive(Default, Debug)]
pub(crate) struct IdCounter(u32);

impl IdCounter {
    pub(crate) fn next<T>(&mut self, make: fn(u32) -> T) -> T {
        let id = self.0;
        self.0 = self.0.wrapping_add(1);
        make(id)
    }
}
