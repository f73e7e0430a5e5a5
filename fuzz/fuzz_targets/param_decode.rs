#![no_main]

use codec::{
    updated_search_string, ChangeSet, DecodedParamCache, PendingUpdate, ReconcileContext,
    UpdateType,
};
use libfuzzer_sys::fuzz_target;
use schema::{decode_query_params, ParamConfig, ParamConfigMap};
use serialize::{
    boolean, date, date_time, delimited_array, delimited_numeric_array, enumeration, json,
    number, numeric_object, object, string,
};
use wire::{search_string_to_object, url_search_format, ParseCache};

fn all_codecs() -> ParamConfigMap {
    ParamConfigMap::builder()
        .param("s", string())
        .param("n", ParamConfig::new(number()).with_default(1))
        .param("b", boolean())
        .param("d", date())
        .param("t", date_time())
        .param("j", json())
        .param("a", delimited_array())
        .param("na", delimited_numeric_array())
        .param("o", object())
        .param("no", numeric_object())
        .param("e", enumeration(["x", "y"]))
        .build()
        .unwrap()
}

fuzz_target!(|data: &[u8]| {
    let search = String::from_utf8_lossy(data);
    let map = all_codecs();
    let parsed = search_string_to_object(&search);
    let decoded = decode_query_params(&map, &parsed);

    // Writing the decoded values back must never panic.
    let cache = DecodedParamCache::new();
    let parse_cache = ParseCache::new();
    let cx = ReconcileContext {
        cache: &cache,
        parse_cache: &parse_cache,
    };
    let format = url_search_format();
    let update = |changes, current: &str| PendingUpdate {
        changes: ChangeSet::Values(changes),
        params: map.clone(),
        inherited: ParamConfigMap::new(),
        search_format: format.clone(),
        update_type: UpdateType::Replace,
        remove_defaults_from_url: true,
        skip_update_when_no_change: true,
        current_search: current.to_string(),
    };
    let once = updated_search_string(update(decoded, &search), &search, cx);
    assert!(once.is_empty() || once.starts_with('?'));
    let again = decode_query_params(&map, &search_string_to_object(&once));
    let twice = updated_search_string(update(again, &once), &once, cx);
    assert!(twice.is_empty() || twice.starts_with('?'));
});
