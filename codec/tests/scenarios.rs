//! End-to-end scenarios through a provider and an in-memory history.

use std::rc::Rc;

use codec::{
    Adapter, Location, MemoryAdapter, OptionsOverride, QueryParamOptions, QueryParamProvider,
    UpdateType,
};
use schema::{decode_query_params, encode_query_params, DecodedQuery, ParamConfig, ParamConfigMap};
use serialize::{boolean, date, delimited_array, number, string, EncodedValue, Value};
use wire::EncodedQuery;

fn setup(search: &str, options: QueryParamOptions) -> (Rc<MemoryAdapter>, QueryParamProvider) {
    let adapter = Rc::new(MemoryAdapter::new(search));
    let provider = QueryParamProvider::new(Rc::clone(&adapter) as Rc<dyn Adapter>, options);
    (adapter, provider)
}

fn xy_numbers() -> ParamConfigMap {
    ParamConfigMap::builder()
        .param("x", number())
        .param("y", number())
        .build()
        .unwrap()
}

fn changes(pairs: &[(&str, Option<Value>)]) -> DecodedQuery {
    pairs
        .iter()
        .map(|(name, value)| ((*name).to_string(), value.clone()))
        .collect()
}

#[test]
fn number_param_decodes_from_query() {
    let map = ParamConfigMap::builder().param("foo", number()).build().unwrap();
    let mut encoded = EncodedQuery::new();
    encoded.insert("foo".into(), EncodedValue::single("42"));
    let decoded = decode_query_params(&map, &encoded);
    assert_eq!(decoded["foo"], Some(Value::from(42)));
}

#[test]
fn boolean_false_encodes_as_zero() {
    let map = ParamConfigMap::builder().param("bar", boolean()).build().unwrap();
    let encoded = encode_query_params(&map, &changes(&[("bar", Some(Value::Bool(false)))]));
    assert_eq!(encoded["bar"], EncodedValue::single("0"));
}

#[test]
fn year_only_date_is_first_of_january() {
    let decoded = date().decode(&EncodedValue::single("2019"));
    assert_eq!(decoded, Value::date(2019, 1, 1));
}

#[test]
fn delimited_array_keeps_empty_segments() {
    let decoded = delimited_array().decode(&EncodedValue::single("a__b"));
    assert_eq!(decoded, Some(Value::strings(["a", "", "b"])));
}

#[test]
fn replace_in_merges_into_current_search() {
    let (adapter, provider) = setup("?x=3&y=9", QueryParamOptions::default());
    let params = provider
        .bind(xy_numbers().into(), &OptionsOverride::default())
        .unwrap();
    params
        .set(changes(&[("x", Some(Value::from(5)))]), Some(UpdateType::ReplaceIn))
        .unwrap();
    assert_eq!(adapter.location().search, "?x=5&y=9");
    assert_eq!(adapter.len(), 1);
}

#[test]
fn replace_drops_unchanged_keys() {
    let (adapter, provider) = setup("?x=3&y=9", QueryParamOptions::default());
    let params = provider
        .bind(xy_numbers().into(), &OptionsOverride::default())
        .unwrap();
    params
        .set(changes(&[("x", Some(Value::from(5)))]), Some(UpdateType::Replace))
        .unwrap();
    assert_eq!(adapter.location().search, "?x=5");
}

#[test]
fn push_creates_history_entry() {
    let (adapter, provider) = setup("?x=3", QueryParamOptions::default());
    let params = provider
        .bind(xy_numbers().into(), &OptionsOverride::default())
        .unwrap();
    params
        .set(changes(&[("y", Some(Value::from(1)))]), Some(UpdateType::Push))
        .unwrap();
    assert_eq!(adapter.len(), 2);
    assert_eq!(adapter.location().search, "?y=1");
    assert!(adapter.back());
    assert_eq!(params.values().unwrap()["x"].as_deref(), Some(&Value::from(3)));
}

#[test]
fn repeated_replace_in_is_idempotent() {
    let (adapter, provider) = setup("?x=3&y=9", QueryParamOptions::default());
    let params = provider
        .bind(xy_numbers().into(), &OptionsOverride::default())
        .unwrap();
    for _ in 0..2 {
        params
            .set(changes(&[("x", Some(Value::from(5)))]), Some(UpdateType::ReplaceIn))
            .unwrap();
    }
    assert_eq!(adapter.location().search, "?x=5&y=9");
    // The second call produced the same string and was skipped.
    assert_eq!(adapter.navigation_count(), 1);
}

#[test]
fn unchanged_params_keep_their_references() {
    let (adapter, provider) = setup("?x=3&y=9", QueryParamOptions::default());
    let params = provider
        .bind(xy_numbers().into(), &OptionsOverride::default())
        .unwrap();
    let before = params.values().unwrap();
    adapter.replace(Location::new("?x=4&y=9"));
    let after = params.values().unwrap();

    assert!(Rc::ptr_eq(
        before["y"].as_ref().unwrap(),
        after["y"].as_ref().unwrap()
    ));
    assert!(!Rc::ptr_eq(
        before["x"].as_ref().unwrap(),
        after["x"].as_ref().unwrap()
    ));
    assert_eq!(after["x"].as_deref(), Some(&Value::from(4)));
}

#[test]
fn bindings_share_the_provider_cache() {
    let (_adapter, provider) = setup("?x=3", QueryParamOptions::default());
    let first = provider
        .bind_param("x", Some(ParamConfig::new(number())), &OptionsOverride::default())
        .unwrap();
    let second = provider
        .bind_param("x", Some(ParamConfig::new(number())), &OptionsOverride::default())
        .unwrap();
    let a = first.value().unwrap().unwrap();
    let b = second.value().unwrap().unwrap();
    // Distinct codec instances without an equality override decode afresh.
    assert_eq!(a, b);
    assert_eq!(provider.cache().registered_count("x"), 2);
}

#[test]
fn default_is_elided_and_read_back() {
    let options = QueryParamOptions {
        remove_defaults_from_url: true,
        ..QueryParamOptions::default()
    };
    let (adapter, provider) = setup("?page=3&q=z", options);
    let page = provider
        .bind_param(
            "page",
            Some(ParamConfig::new(number()).with_default(1)),
            &OptionsOverride::default(),
        )
        .unwrap();
    page.set(Some(Value::from(1)), Some(UpdateType::ReplaceIn))
        .unwrap();
    assert_eq!(adapter.location().search, "?q=z");
    assert_eq!(page.value().unwrap().as_deref(), Some(&Value::from(1)));
}

#[test]
fn null_is_absent_unless_kept() {
    let (_adapter, provider) = setup("?x", QueryParamOptions::default());
    let dropped = provider
        .bind(xy_numbers().into(), &OptionsOverride::default())
        .unwrap();
    assert_eq!(dropped.values().unwrap()["x"], None);

    let kept = provider
        .bind(xy_numbers().into(), &OptionsOverride::default().keep_null(true))
        .unwrap();
    assert_eq!(kept.values().unwrap()["x"].as_deref(), Some(&Value::Null));
}

#[test]
fn empty_string_is_absent_unless_kept() {
    let (_adapter, provider) = setup("?q=", QueryParamOptions::default());
    let dropped = provider
        .bind_param("q", Some(ParamConfig::new(string())), &OptionsOverride::default())
        .unwrap();
    assert_eq!(dropped.value().unwrap(), None);

    let kept = provider
        .bind_param(
            "q",
            Some(ParamConfig::new(string())),
            &OptionsOverride::default().keep_empty_string(true),
        )
        .unwrap();
    assert_eq!(kept.value().unwrap().as_deref(), Some(&Value::from("")));
}

#[test]
fn inherited_url_names_apply_to_name_only_bindings() {
    let options = QueryParamOptions {
        params: ParamConfigMap::builder()
            .param("page", ParamConfig::new(number()).url_name("p"))
            .build()
            .unwrap(),
        ..QueryParamOptions::default()
    };
    let (adapter, provider) = setup("?p=2", options);
    let page = provider
        .bind_param("page", None, &OptionsOverride::default())
        .unwrap();
    assert_eq!(page.value().unwrap().as_deref(), Some(&Value::from(2)));
    page.set(Some(Value::from(7)), None).unwrap();
    assert_eq!(adapter.location().search, "?p=7");
}

#[test]
fn location_state_survives_updates() {
    let adapter = Rc::new(MemoryAdapter::default());
    adapter.replace(Location {
        search: "?x=1".into(),
        state: Some(serde_json::json!({"from": "list"})),
    });
    let provider = QueryParamProvider::new(
        Rc::clone(&adapter) as Rc<dyn Adapter>,
        QueryParamOptions::default(),
    );
    let params = provider
        .bind(xy_numbers().into(), &OptionsOverride::default())
        .unwrap();
    params
        .set(changes(&[("x", Some(Value::from(2)))]), Some(UpdateType::ReplaceIn))
        .unwrap();
    assert_eq!(
        adapter.location().state,
        Some(serde_json::json!({"from": "list"}))
    );
}
