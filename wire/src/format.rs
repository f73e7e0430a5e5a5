//! Pluggable search-string formats and the memoized parser.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::search::{object_to_search_string, search_string_to_object, EncodedQuery};

/// Parse/stringify pair for search strings.
///
/// `stringify` output carries no leading `?`; callers add it.
pub trait SearchFormat: fmt::Debug {
    fn parse(&self, search: &str) -> EncodedQuery;
    fn stringify(&self, query: &EncodedQuery) -> String;
}

/// The default `application/x-www-form-urlencoded`-style format.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlSearchFormat;

impl SearchFormat for UrlSearchFormat {
    fn parse(&self, search: &str) -> EncodedQuery {
        search_string_to_object(search)
    }

    fn stringify(&self, query: &EncodedQuery) -> String {
        object_to_search_string(query)
    }
}

/// Shared handle to a search format. The `Rc` identity distinguishes formats
/// in the [`ParseCache`].
pub type SharedSearchFormat = Rc<dyn SearchFormat>;

/// Returns the default search format.
#[must_use]
pub fn url_search_format() -> SharedSearchFormat {
    Rc::new(UrlSearchFormat)
}

fn same_format(a: &SharedSearchFormat, b: &SharedSearchFormat) -> bool {
    Rc::as_ptr(a).cast::<()>() == Rc::as_ptr(b).cast::<()>()
}

struct Memo {
    search: String,
    format: SharedSearchFormat,
    parsed: Rc<EncodedQuery>,
}

/// Remembers the most recent parse.
///
/// Parsing the same string with the same format returns the same `Rc`, so
/// downstream consumers can detect "nothing changed" by pointer. Values are
/// not shared across different parses; the decoded-value cache compares
/// encoded values by equality, so it does not need them to be.
#[derive(Default)]
pub struct ParseCache {
    last: RefCell<Option<Memo>>,
}

impl fmt::Debug for ParseCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let last = self.last.borrow();
        f.debug_struct("ParseCache")
            .field("search", &last.as_ref().map(|memo| memo.search.as_str()))
            .finish()
    }
}

impl ParseCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `search`, reusing the previous result when possible.
    ///
    /// The format runs without any internal borrow held.
    pub fn parse(&self, search: &str, format: &SharedSearchFormat) -> Rc<EncodedQuery> {
        if let Some(memo) = self.last.borrow().as_ref() {
            if memo.search == search && same_format(&memo.format, format) {
                return Rc::clone(&memo.parsed);
            }
        }
        let parsed = Rc::new(format.parse(search));
        *self.last.borrow_mut() = Some(Memo {
            search: search.to_string(),
            format: Rc::clone(format),
            parsed: Rc::clone(&parsed),
        });
        parsed
    }

    /// Forgets the remembered parse.
    pub fn clear(&self) {
        self.last.borrow_mut().take();
    }
}
