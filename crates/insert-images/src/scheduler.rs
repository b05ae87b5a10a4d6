// Copyright (c) 2026 Element Creations Ltd
//
// SPDX-License-Identifier: AGPL-3.0-only OR LicenseRef-Element-Commercial
// Please see LICENSE in the repository root for full details.

//! Cancellable delayed tasks on a clock the host advances.
//!
//! The addon never reads wall-clock time. The host reports elapsed time
//! through [`crate::ImagesAddon::advance_time`], which makes the timers
//! deterministic under test.

use std::time::Duration;

use crate::ids::{IdCounter, TimerId};

#[derive(Debug)]
struct Scheduled<T> {
    id: TimerId,
    due: Duration,
    task: T,
}

#[derive(Debug)]
pub(crate) struct Scheduler<T> {
    now: Duration,
    ids: IdCounter,
    pending: Vec<Scheduled<T>>,
}

impl<T> Default for Scheduler<T> {
    fn default() -> Self {
        Self {
            now: Duration::ZERO,
            ids: IdCounter::default(),
            pending: Vec::new(),
        }
    }
}

impl<T> Scheduler<T> {
    pub(crate) fn schedule(&mut self, delay: Duration, task: T) -> TimerId {
        let id = self.ids.next(TimerId::from_raw);
        self.pending.push(Scheduled {
            id,
            due: self.now.saturating_add(delay),
            task,
        });
        id
    }

    /// Returns `false` if the timer already fired or was cancelled.
    pub(crate) fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|s| s.id != id);
        self.pending.len() != before
    }

    /// Move the clock forward and hand back every task that became due,
    /// earliest first. Tasks due at the same instant keep scheduling order.
    pub(crate) fn advance(&mut self, by: Duration) -> Vec<T> {
        // The host supplies `by`; the clock stops at its maximum.
        self.now = self.now.saturating_add(by);
        let now = self.now;
        let (mut due, pending): (Vec<_>, Vec<_>) =
            self.pending.drain(..).partition(|s| s.due <= now);
        self.pending = pending;
        due.sort_by_key(|s| (s.due, s.id));
        due.into_iter().map(|s| s.task).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: Duration = Duration::from_millis(1);

    #[test]
    fn nothing_fires_before_its_delay() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(MS * 250, "blur");
        assert!(scheduler.advance(MS * 249).is_empty());
        assert_eq!(scheduler.advance(MS), vec!["blur"]);
        assert!(scheduler.advance(MS * 1000).is_empty());
    }

    #[test]
    fn due_tasks_come_back_in_deadline_order() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(Duration::from_secs(3), "notice");
        scheduler.schedule(MS * 250, "blur");
        scheduler.schedule(MS * 250, "blur again");
        assert_eq!(
            scheduler.advance(Duration::from_secs(5)),
            vec!["blur", "blur again", "notice"]
        );
    }

    #[test]
    fn cancelled_tasks_never_fire() {
        let mut scheduler = Scheduler::default();
        let id = scheduler.schedule(MS * 10, "gone");
        assert!(scheduler.cancel(id));
        assert!(!scheduler.cancel(id));
        assert!(scheduler.advance(MS * 10).is_empty());
    }

    #[test]
    fn delays_are_relative_to_the_current_time() {
        let mut scheduler = Scheduler::default();
        scheduler.advance(MS * 100);
        scheduler.schedule(MS * 50, "late");
        assert!(scheduler.advance(MS * 49).is_empty());
        assert_eq!(scheduler.advance(MS), vec!["late"]);
    }

    #[test]
    fn clock_saturates_instead_of_overflowing() {
        let mut scheduler = Scheduler::default();
        scheduler.schedule(MS * 250, "blur");
        assert_eq!(scheduler.advance(Duration::MAX), vec!["blur"]);
        assert!(scheduler.advance(Duration::MAX).is_empty());

        scheduler.schedule(Duration::from_secs(3), "notice");
        assert_eq!(scheduler.advance(Duration::ZERO), vec!["notice"]);
    }
}
