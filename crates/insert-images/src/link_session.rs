// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

use crate::ids::TimerId;
use crate::registry::BlockId;
use crate::LinkSessionId;

/// The link micro-form, open on one block.
///
/// The session only holds what the user typed. Nothing reaches the block
/// until the session is committed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LinkSession {
    id: LinkSessionId,
    block: BlockId,
    text: String,
    /// Close scheduled by a blur, cancelled if focus comes back.
    pub(crate) pending_close: Option<TimerId>,
}

impl LinkSession {
    pub(crate) fn new(id: LinkSessionId, block: BlockId) -> Self {
        Self {
            id,
            block,
            text: String::new(),
            pending_close: None,
        }
    }

    pub fn id(&self) -> LinkSessionId {
        self.id
    }

    pub fn block(&self) -> BlockId {
        self.block
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub(crate) fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn is_closing(&self) -> bool {
        self.pending_close.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_starts_with_an_empty_field() {
        let session =
            LinkSession::new(LinkSessionId::from_raw(0), BlockId::from_raw(3));
        assert_eq!(session.text(), "");
        assert_eq!(session.block(), BlockId::from_raw(3));
        assert!(!session.is_closing());
    }

    #[test]
    fn typing_replaces_the_text() {
        let mut session =
            LinkSession::new(LinkSessionId::from_raw(0), BlockId::from_raw(3));
        session.set_text("https://");
        session.set_text("https://x");
        assert_eq!(session.text(), "https://x");
    }
}
