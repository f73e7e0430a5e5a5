//! Update batching and flush scheduling.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fmt;

use crate::adapter::{navigate, Adapter, Location};
use crate::update::{updated_search_string, PendingUpdate, ReconcileContext};

/// A deferred unit of work.
pub type Task = Box<dyn FnOnce()>;

/// Runs flush tasks, now or later.
pub trait Scheduler {
    fn schedule(&self, task: Task);
}

/// Runs every task as soon as it is scheduled.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl Scheduler for ImmediateScheduler {
    fn schedule(&self, task: Task) {
        task();
    }
}

/// Holds tasks until the host drains them, typically at the end of its
/// current turn.
#[derive(Default)]
pub struct TaskQueue {
    tasks: RefCell<VecDeque<Task>>,
}

impl fmt::Debug for TaskQueue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TaskQueue")
            .field("pending", &self.pending())
            .finish()
    }
}

impl TaskQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Runs queued tasks, including any they schedule, until none are left.
    /// Returns how many ran.
    pub fn run_pending(&self) -> usize {
        let mut ran = 0;
        loop {
            let next = self.tasks.borrow_mut().pop_front();
            let Some(task) = next else {
                return ran;
            };
            task();
            ran += 1;
        }
    }
}

impl Scheduler for TaskQueue {
    fn schedule(&self, task: Task) {
        self.tasks.borrow_mut().push_back(task);
    }
}

/// Updates waiting for the next flush, in arrival order.
#[derive(Debug, Default)]
pub struct UpdateQueue {
    pending: RefCell<Vec<PendingUpdate>>,
}

impl UpdateQueue {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues an update. Returns `true` if the queue was empty, meaning a
    /// flush needs scheduling.
    pub fn push(&self, update: PendingUpdate) -> bool {
        let mut pending = self.pending.borrow_mut();
        pending.push(update);
        pending.len() == 1
    }

    /// Removes and returns every queued update.
    pub fn take(&self) -> Vec<PendingUpdate> {
        std::mem::take(&mut *self.pending.borrow_mut())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

/// Applies `updates` in order and performs at most one navigation.
///
/// Each update starts from the result of the previous one; the first starts
/// from the search string it captured. The last update decides push versus
/// replace, and its `skip_update_when_no_change` alone decides whether an
/// unchanged result skips navigation; earlier updates' flags are ignored.
pub fn flush_updates(
    updates: Vec<PendingUpdate>,
    adapter: &dyn Adapter,
    cx: ReconcileContext<'_>,
) {
    let Some(first) = updates.first() else {
        return;
    };
    let initial = first.current_search.clone();
    let count = updates.len();

    let mut search = initial.clone();
    let mut last = None;
    for update in updates {
        last = Some((update.update_type, update.skip_update_when_no_change));
        search = updated_search_string(update, &search, cx);
    }
    let Some((update_type, skip_when_unchanged)) = last else {
        return;
    };

    if skip_when_unchanged && search == initial {
        tracing::debug!(updates = count, %search, "search unchanged, skipping navigation");
        return;
    }

    let state = adapter.location().state;
    tracing::debug!(updates = count, %update_type, %search, "navigating");
    navigate(adapter, update_type, Location { search, state });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    use crate::adapter::MemoryAdapter;
    use crate::cache::DecodedParamCache;
    use crate::types::UpdateType;
    use crate::update::ChangeSet;
    use schema::{DecodedQuery, ParamConfigMap};
    use serialize::{number, Value};
    use wire::{url_search_format, ParseCache};

    fn set(name: &str, value: i32, current: &str, update_type: UpdateType) -> PendingUpdate {
        let mut changes = DecodedQuery::new();
        changes.insert(name.to_string(), Some(Value::from(value)));
        PendingUpdate {
            changes: ChangeSet::Values(changes),
            params: ParamConfigMap::builder()
                .param(name, number())
                .build()
                .unwrap(),
            inherited: ParamConfigMap::new(),
            search_format: url_search_format(),
            update_type,
            remove_defaults_from_url: false,
            skip_update_when_no_change: true,
            current_search: current.to_string(),
        }
    }

    #[test]
    fn immediate_scheduler_runs_now() {
        let ran = Rc::new(RefCell::new(false));
        let flag = Rc::clone(&ran);
        ImmediateScheduler.schedule(Box::new(move || *flag.borrow_mut() = true));
        assert!(*ran.borrow());
    }

    #[test]
    fn task_queue_defers_until_drained() {
        let queue = Rc::new(TaskQueue::new());
        let count = Rc::new(RefCell::new(0));
        for _ in 0..2 {
            let count = Rc::clone(&count);
            queue.schedule(Box::new(move || *count.borrow_mut() += 1));
        }
        assert_eq!(*count.borrow(), 0);
        assert_eq!(queue.pending(), 2);
        assert_eq!(queue.run_pending(), 2);
        assert_eq!(*count.borrow(), 2);
    }

    #[test]
    fn task_queue_runs_tasks_scheduled_by_tasks() {
        let queue = Rc::new(TaskQueue::new());
        let inner = Rc::clone(&queue);
        queue.schedule(Box::new(move || inner.schedule(Box::new(|| {}))));
        assert_eq!(queue.run_pending(), 2);
    }

    #[test]
    fn update_queue_reports_first_push() {
        let queue = UpdateQueue::new();
        assert!(queue.push(set("a", 1, "", UpdateType::PushIn)));
        assert!(!queue.push(set("b", 2, "", UpdateType::PushIn)));
        assert_eq!(queue.take().len(), 2);
        assert!(queue.is_empty());
    }

    #[test]
    fn flush_navigates_once_with_last_update_type() {
        let adapter = MemoryAdapter::new("?z=0");
        let cache = DecodedParamCache::new();
        let parse_cache = ParseCache::new();
        let cx = ReconcileContext {
            cache: &cache,
            parse_cache: &parse_cache,
        };
        let updates = vec![
            set("a", 1, "?z=0", UpdateType::PushIn),
            set("b", 2, "?z=0", UpdateType::PushIn),
            set("c", 3, "?z=0", UpdateType::ReplaceIn),
        ];
        flush_updates(updates, &adapter, cx);
        let log = adapter.navigations();
        assert_eq!(log.len(), 1);
        assert!(!log[0].push);
        assert_eq!(log[0].location.search, "?a=1&b=2&c=3&z=0");
    }

    #[test]
    fn flush_skips_unchanged() {
        let adapter = MemoryAdapter::new("?a=1");
        let cache = DecodedParamCache::new();
        let parse_cache = ParseCache::new();
        let cx = ReconcileContext {
            cache: &cache,
            parse_cache: &parse_cache,
        };
        flush_updates(vec![set("a", 1, "?a=1", UpdateType::PushIn)], &adapter, cx);
        assert_eq!(adapter.navigation_count(), 0);
    }

    #[test]
    fn last_update_decides_skip() {
        let cache = DecodedParamCache::new();
        let parse_cache = ParseCache::new();
        let cx = ReconcileContext {
            cache: &cache,
            parse_cache: &parse_cache,
        };

        let skipped = MemoryAdapter::new("?a=1");
        let mut first = set("a", 1, "?a=1", UpdateType::PushIn);
        first.skip_update_when_no_change = false;
        let last = set("a", 1, "?a=1", UpdateType::PushIn);
        flush_updates(vec![first, last], &skipped, cx);
        assert_eq!(skipped.navigation_count(), 0);

        let navigated = MemoryAdapter::new("?a=1");
        let first = set("a", 1, "?a=1", UpdateType::PushIn);
        let mut last = set("a", 1, "?a=1", UpdateType::PushIn);
        last.skip_update_when_no_change = false;
        flush_updates(vec![first, last], &navigated, cx);
        assert_eq!(navigated.navigation_count(), 1);
        assert_eq!(navigated.location().search, "?a=1");
    }

    #[test]
    fn flush_of_nothing_is_noop() {
        let adapter = MemoryAdapter::default();
        let cache = DecodedParamCache::new();
        let parse_cache = ParseCache::new();
        flush_updates(
            Vec::new(),
            &adapter,
            ReconcileContext {
                cache: &cache,
                parse_cache: &parse_cache,
            },
        );
        assert_eq!(adapter.navigation_count(), 0);
    }
}
