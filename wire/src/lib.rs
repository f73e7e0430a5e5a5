//! Search-string framing for qsync.
//!
//! This crate turns a URL search string into an [`EncodedQuery`] (URL key to
//! [`serialize::EncodedValue`]) and back. It knows nothing about parameter
//! types; decoding values is the job of the codecs in `serialize`.
//!
//! # Design Principles
//!
//! - **Deterministic output** - Keys serialize in sorted order.
//! - **Lossless nullity** - `?a` (null), `?a=` (empty) and a missing key stay
//!   distinguishable.
//! - **Pluggable format** - [`SearchFormat`] replaces both directions at once.

mod format;
mod search;

pub use format::{url_search_format, ParseCache, SearchFormat, SharedSearchFormat, UrlSearchFormat};
pub use search::{
    decode_component, encode_component, object_to_search_string, search_string_to_object,
    EncodedQuery,
};

#[cfg(test)]
mod tests {
    use super::*;
    use serialize::EncodedValue;

    #[test]
    fn public_api_exports() {
        let _ = UrlSearchFormat;
        let _ = ParseCache::new();
        let _: SharedSearchFormat = url_search_format();
        let _ = EncodedQuery::new();
    }

    #[test]
    fn format_roundtrip() {
        let format = UrlSearchFormat;
        let parsed = format.parse("?b=2&a=1&a=3&c");
        assert_eq!(parsed.get("c"), Some(&EncodedValue::Null));
        assert_eq!(format.stringify(&parsed), "a=1&a=3&b=2&c");
    }
}
