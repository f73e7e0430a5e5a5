//! Host navigation contract and an in-memory implementation.

use std::cell::RefCell;

use crate::types::UpdateType;

/// The part of a location the bindings read and write.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Search string, empty or starting with `?`.
    pub search: String,
    /// Opaque history state, carried through navigations.
    pub state: Option<serde_json::Value>,
}

impl Location {
    #[must_use]
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            search: search.into(),
            state: None,
        }
    }
}

/// Reads and navigates the host's location.
///
/// Implementations are called without any provider state borrowed, so they
/// may call back into bindings.
pub trait Adapter {
    fn location(&self) -> Location;
    /// Navigates, creating a history entry.
    fn push(&self, location: Location);
    /// Navigates, replacing the current history entry.
    fn replace(&self, location: Location);
}

/// Calls `push` or `replace` depending on the update type.
pub fn navigate(adapter: &dyn Adapter, update_type: UpdateType, location: Location) {
    if update_type.is_push() {
        adapter.push(location);
    } else {
        adapter.replace(location);
    }
}

/// One navigation recorded by [`MemoryAdapter`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Navigation {
    pub push: bool,
    pub location: Location,
}

#[derive(Debug)]
struct History {
    entries: Vec<Location>,
    index: usize,
    log: Vec<Navigation>,
}

/// An in-memory history stack.
///
/// `push` drops any forward entries; `replace` overwrites the current one.
/// Every navigation is also appended to a log.
#[derive(Debug)]
pub struct MemoryAdapter {
    history: RefCell<History>,
}

impl Default for MemoryAdapter {
    fn default() -> Self {
        Self::new("")
    }
}

impl MemoryAdapter {
    /// Creates a history whose only entry has the given search string.
    #[must_use]
    pub fn new(search: impl Into<String>) -> Self {
        Self {
            history: RefCell::new(History {
                entries: vec![Location::new(search)],
                index: 0,
                log: Vec::new(),
            }),
        }
    }

    /// Number of history entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.history.borrow().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.history.borrow().entries.is_empty()
    }

    /// Index of the current entry.
    #[must_use]
    pub fn index(&self) -> usize {
        self.history.borrow().index
    }

    /// Moves one entry back. Returns `false` at the start of history.
    pub fn back(&self) -> bool {
        let mut history = self.history.borrow_mut();
        if history.index == 0 {
            return false;
        }
        history.index -= 1;
        true
    }

    /// Moves one entry forward. Returns `false` at the end of history.
    pub fn forward(&self) -> bool {
        let mut history = self.history.borrow_mut();
        if history.index + 1 >= history.entries.len() {
            return false;
        }
        history.index += 1;
        true
    }

    /// Every navigation so far, oldest first.
    #[must_use]
    pub fn navigations(&self) -> Vec<Navigation> {
        self.history.borrow().log.clone()
    }

    #[must_use]
    pub fn navigation_count(&self) -> usize {
        self.history.borrow().log.len()
    }
}

impl Adapter for MemoryAdapter {
    fn location(&self) -> Location {
        let history = self.history.borrow();
        history.entries[history.index].clone()
    }

    fn push(&self, location: Location) {
        let mut history = self.history.borrow_mut();
        let keep = history.index + 1;
        history.entries.truncate(keep);
        history.entries.push(location.clone());
        history.index = keep;
        history.log.push(Navigation {
            push: true,
            location,
        });
    }

    fn replace(&self, location: Location) {
        let mut history = self.history.borrow_mut();
        let index = history.index;
        history.entries[index] = location.clone();
        history.log.push(Navigation {
            push: false,
            location,
        });
    }
}
