//! The provider that owns shared state, and the bindings it hands out.

use std::borrow::Cow;
use std::cell::RefCell;
use std::collections::BTreeSet;
use std::fmt;
use std::rc::{Rc, Weak};

use schema::{
    extend_for_keys, resolve_params_input, DecodedQuery, ParamConfig, ParamConfigMap,
    ParamsInput,
};
use serialize::{string, SharedCodec, Value};
use wire::{EncodedQuery, ParseCache};

use crate::adapter::Adapter;
use crate::batch::{flush_updates, Scheduler, TaskQueue, UpdateQueue};
use crate::cache::DecodedParamCache;
use crate::error::{SyncError, SyncResult};
use crate::latest::{get_latest_decoded_values, LatestValues, StableDecoder, ValuePolicy};
use crate::options::{OptionsOverride, QueryParamOptions};
use crate::types::UpdateType;
use crate::update::{ChangeSet, PendingUpdate, ReconcileContext};

struct ProviderInner {
    adapter: Rc<dyn Adapter>,
    options: QueryParamOptions,
    cache: DecodedParamCache,
    parse_cache: ParseCache,
    queue: UpdateQueue,
    scheduler: Rc<dyn Scheduler>,
}

impl fmt::Debug for ProviderInner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderInner")
            .field("queued", &self.queue.len())
            .finish_non_exhaustive()
    }
}

impl ProviderInner {
    const fn context(&self) -> ReconcileContext<'_> {
        ReconcileContext {
            cache: &self.cache,
            parse_cache: &self.parse_cache,
        }
    }

    fn parse_current(&self, options: &QueryParamOptions) -> Rc<EncodedQuery> {
        let search = self.adapter.location().search;
        self.parse_cache.parse(&search, &options.search_format)
    }

    fn flush(&self) {
        let updates = self.queue.take();
        flush_updates(updates, self.adapter.as_ref(), self.context());
    }

    fn enqueue(self: &Rc<Self>, update: PendingUpdate, options: &QueryParamOptions) {
        if !options.enable_batching {
            flush_updates(vec![update], self.adapter.as_ref(), self.context());
            return;
        }
        let first = self.queue.push(update);
        if options.immediate_flush {
            self.flush();
        } else if first {
            let provider = Rc::downgrade(self);
            self.scheduler.schedule(Box::new(move || {
                if let Some(provider) = provider.upgrade() {
                    provider.flush();
                }
            }));
        }
    }
}

/// Owns the decoded-value cache, the parse cache and the update queue for
/// one host location.
///
/// Cloning is cheap and yields a handle to the same provider.
#[derive(Clone)]
pub struct QueryParamProvider {
    inner: Rc<ProviderInner>,
}

impl fmt::Debug for QueryParamProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QueryParamProvider")
            .field("options", &self.inner.options)
            .field("cached", &self.inner.cache.len())
            .field("queued", &self.inner.queue.len())
            .finish_non_exhaustive()
    }
}

impl QueryParamProvider {
    /// Creates a provider whose batches are deferred to a fresh [`TaskQueue`].
    ///
    /// With batching enabled, call [`QueryParamProvider::flush`] (or use
    /// [`QueryParamProvider::with_scheduler`]) to write queued updates.
    #[must_use]
    pub fn new(adapter: Rc<dyn Adapter>, options: QueryParamOptions) -> Self {
        Self::with_scheduler(adapter, options, Rc::new(TaskQueue::new()))
    }

    #[must_use]
    pub fn with_scheduler(
        adapter: Rc<dyn Adapter>,
        options: QueryParamOptions,
        scheduler: Rc<dyn Scheduler>,
    ) -> Self {
        Self {
            inner: Rc::new(ProviderInner {
                adapter,
                options,
                cache: DecodedParamCache::new(),
                parse_cache: ParseCache::new(),
                queue: UpdateQueue::new(),
                scheduler,
            }),
        }
    }

    #[must_use]
    pub fn options(&self) -> &QueryParamOptions {
        &self.inner.options
    }

    #[must_use]
    pub fn cache(&self) -> &DecodedParamCache {
        &self.inner.cache
    }

    /// Number of updates waiting for a flush.
    #[must_use]
    pub fn pending_updates(&self) -> usize {
        self.inner.queue.len()
    }

    /// Writes every queued update now.
    pub fn flush(&self) {
        self.inner.flush();
    }

    /// Binds a set of parameters.
    pub fn bind(
        &self,
        input: ParamsInput,
        overrides: &OptionsOverride,
    ) -> SyncResult<QueryParams> {
        let options = self.inner.options.merge(overrides);
        let params = resolve_params_input(&input, &options.params)?;
        let include_known = options
            .include_known_params
            .unwrap_or_else(|| input.is_no_config());
        self.inner.cache.register_params(params.names());
        let registered = params.names().map(str::to_string).collect();
        Ok(QueryParams {
            provider: Rc::downgrade(&self.inner),
            params,
            options,
            include_known,
            fallback: string(),
            registered: RefCell::new(registered),
            stable: StableDecoder::new(),
        })
    }

    /// Binds a single parameter. Without a config the inherited one is used,
    /// falling back to a string codec.
    pub fn bind_param(
        &self,
        name: impl Into<String>,
        config: Option<ParamConfig>,
        overrides: &OptionsOverride,
    ) -> SyncResult<QueryParam> {
        let name = name.into();
        let input = match config {
            None => ParamsInput::Names(vec![name.clone()]),
            Some(config) => ParamsInput::Map(
                ParamConfigMap::builder()
                    .param(name.clone(), config)
                    .build()?,
            ),
        };
        let overrides = OptionsOverride {
            include_known_params: Some(false),
            include_all_params: Some(false),
            ..overrides.clone()
        };
        let params = self.bind(input, &overrides)?;
        Ok(QueryParam { name, params })
    }
}

/// A binding to a set of parameters.
///
/// Holds only a weak reference to its provider; using it after the provider
/// is dropped fails with [`SyncError::ProviderDropped`].
#[derive(Debug)]
pub struct QueryParams {
    provider: Weak<ProviderInner>,
    params: ParamConfigMap,
    options: QueryParamOptions,
    include_known: bool,
    /// Codec for URL keys added by `include_all_params`. Kept for the
    /// binding's lifetime so cached decodes of those keys stay valid.
    fallback: SharedCodec,
    registered: RefCell<BTreeSet<String>>,
    stable: StableDecoder,
}

impl QueryParams {
    fn provider(&self) -> SyncResult<Rc<ProviderInner>> {
        self.provider.upgrade().ok_or(SyncError::ProviderDropped)
    }

    /// The binding's own params.
    #[must_use]
    pub const fn params(&self) -> &ParamConfigMap {
        &self.params
    }

    #[must_use]
    pub const fn options(&self) -> &QueryParamOptions {
        &self.options
    }

    /// The binding's params widened with what the current URL carries.
    fn effective_params(&self, parsed: &EncodedQuery) -> Cow<'_, ParamConfigMap> {
        let inherited = &self.options.params;
        let include_all = self.options.include_all_params;
        if !include_all && !self.include_known {
            return Cow::Borrowed(&self.params);
        }
        let mut keys: Vec<String> = inherited
            .iter()
            .filter(|(name, config)| parsed.contains_key(config.url_key(name)))
            .map(|(name, _)| name.clone())
            .collect();
        if include_all {
            keys.extend(
                parsed
                    .keys()
                    .filter(|key| inherited.name_for_url_key(key).is_none())
                    .cloned(),
            );
        }
        let fallback = include_all.then_some(&self.fallback);
        extend_for_keys(&self.params, keys, inherited, fallback)
    }

    fn register_new(&self, provider: &ProviderInner, map: &ParamConfigMap) {
        let mut registered = self.registered.borrow_mut();
        let added: Vec<&str> = map
            .names()
            .filter(|name| !registered.contains(*name))
            .collect();
        if added.is_empty() {
            return;
        }
        provider.cache.register_params(added.iter().copied());
        registered.extend(added.into_iter().map(str::to_string));
    }

    /// Current decoded values.
    ///
    /// The returned `Rc` is the previous one when nothing changed, and each
    /// unchanged value keeps its `Rc`.
    pub fn values(&self) -> SyncResult<Rc<LatestValues>> {
        let provider = self.provider()?;
        let parsed = provider.parse_current(&self.options);
        let map = self.effective_params(&parsed);
        self.register_new(&provider, &map);
        let latest = get_latest_decoded_values(&parsed, &map, &provider.cache);
        let policy = ValuePolicy::new(self.options.keep_null, self.options.keep_empty_string);
        Ok(self.stable.stabilize(policy.apply_all(latest)))
    }

    /// Writes `changes` to the URL.
    pub fn set(
        &self,
        changes: impl Into<ChangeSet>,
        update_type: Option<UpdateType>,
    ) -> SyncResult<()> {
        let provider = self.provider()?;
        let current_search = provider.adapter.location().search;
        let parsed = provider
            .parse_cache
            .parse(&current_search, &self.options.search_format);
        let params = self.effective_params(&parsed).into_owned();
        let update = PendingUpdate {
            changes: changes.into(),
            params,
            inherited: self.options.params.clone(),
            search_format: self.options.search_format.clone(),
            update_type: update_type.unwrap_or(self.options.update_type),
            remove_defaults_from_url: self.options.remove_defaults_from_url,
            skip_update_when_no_change: self.options.skip_update_when_no_change,
            current_search,
        };
        provider.enqueue(update, &self.options);
        Ok(())
    }

    /// Writes changes computed from the latest decoded values at the time the
    /// update is applied.
    pub fn set_with(
        &self,
        f: impl FnOnce(&LatestValues) -> DecodedQuery + 'static,
        update_type: Option<UpdateType>,
    ) -> SyncResult<()> {
        self.set(ChangeSet::from_fn(f), update_type)
    }
}

impl Drop for QueryParams {
    fn drop(&mut self) {
        if let Some(provider) = self.provider.upgrade() {
            provider
                .cache
                .unregister_params(self.registered.borrow().iter());
        }
    }
}

/// A binding to one parameter.
#[derive(Debug)]
pub struct QueryParam {
    name: String,
    params: QueryParams,
}

impl QueryParam {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Current decoded value.
    pub fn value(&self) -> SyncResult<Option<Rc<Value>>> {
        let values = self.params.values()?;
        Ok(values.get(&self.name).cloned().flatten())
    }

    /// Writes a new value; `None` removes the parameter.
    pub fn set(&self, value: Option<Value>, update_type: Option<UpdateType>) -> SyncResult<()> {
        let mut changes = DecodedQuery::new();
        changes.insert(self.name.clone(), value);
        self.params.set(changes, update_type)
    }

    /// Writes a value computed from the latest one when the update applies.
    pub fn set_with(
        &self,
        f: impl FnOnce(Option<&Value>) -> Option<Value> + 'static,
        update_type: Option<UpdateType>,
    ) -> SyncResult<()> {
        let name = self.name.clone();
        self.params.set_with(
            move |latest| {
                let current = latest.get(&name).and_then(Option::as_deref);
                let next = f(current);
                let mut changes = DecodedQuery::new();
                changes.insert(name, next);
                changes
            },
            update_type,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapter::MemoryAdapter;
    use serialize::number;

    fn provider(search: &str) -> (Rc<MemoryAdapter>, QueryParamProvider) {
        let adapter = Rc::new(MemoryAdapter::new(search));
        let provider = QueryParamProvider::new(
            Rc::clone(&adapter) as Rc<dyn Adapter>,
            QueryParamOptions::default(),
        );
        (adapter, provider)
    }

    fn numbers(names: &[&str]) -> ParamsInput {
        names
            .iter()
            .fold(ParamConfigMap::builder(), |builder, name| {
                builder.param(*name, number())
            })
            .build()
            .unwrap()
            .into()
    }

    #[test]
    fn values_decode_current_location() {
        let (_adapter, provider) = provider("?x=3&y=9");
        let params = provider
            .bind(numbers(&["x"]), &OptionsOverride::default())
            .unwrap();
        let values = params.values().unwrap();
        assert_eq!(values["x"].as_deref(), Some(&Value::from(3)));
        assert!(!values.contains_key("y"));
    }

    #[test]
    fn values_are_stable_until_url_changes() {
        let (adapter, provider) = provider("?x=3");
        let params = provider
            .bind(numbers(&["x"]), &OptionsOverride::default())
            .unwrap();
        let a = params.values().unwrap();
        let b = params.values().unwrap();
        assert!(Rc::ptr_eq(&a, &b));
        adapter.push(crate::adapter::Location::new("?x=4"));
        let c = params.values().unwrap();
        assert!(!Rc::ptr_eq(&b, &c));
    }

    #[test]
    fn set_navigates_with_default_push_in() {
        let (adapter, provider) = provider("?x=3&y=9");
        let params = provider
            .bind(numbers(&["x"]), &OptionsOverride::default())
            .unwrap();
        let mut changes = DecodedQuery::new();
        changes.insert("x".into(), Some(Value::from(5)));
        params.set(changes, None).unwrap();
        let log = adapter.navigations();
        assert_eq!(log.len(), 1);
        assert!(log[0].push);
        assert_eq!(log[0].location.search, "?x=5&y=9");
    }

    #[test]
    fn registration_follows_binding_lifetime() {
        let (_adapter, provider) = provider("?x=1");
        let params = provider
            .bind(numbers(&["x"]), &OptionsOverride::default())
            .unwrap();
        params.values().unwrap();
        assert_eq!(provider.cache().registered_count("x"), 1);
        assert_eq!(provider.cache().len(), 1);
        drop(params);
        assert_eq!(provider.cache().registered_count("x"), 0);
        assert!(provider.cache().is_empty());
    }

    #[test]
    fn binding_outliving_provider_errors() {
        let (_adapter, provider) = provider("?x=1");
        let params = provider
            .bind(numbers(&["x"]), &OptionsOverride::default())
            .unwrap();
        drop(provider);
        assert_eq!(params.values().unwrap_err(), SyncError::ProviderDropped);
        assert_eq!(
            params.set(DecodedQuery::new(), None).unwrap_err(),
            SyncError::ProviderDropped
        );
    }

    #[test]
    fn no_config_includes_known_params() {
        let adapter = Rc::new(MemoryAdapter::new("?page=2&other=x"));
        let options = QueryParamOptions {
            params: ParamConfigMap::builder().param("page", number()).build().unwrap(),
            ..QueryParamOptions::default()
        };
        let provider = QueryParamProvider::new(adapter, options);
        let params = provider
            .bind(ParamsInput::NoConfig, &OptionsOverride::default())
            .unwrap();
        let values = params.values().unwrap();
        assert_eq!(values["page"].as_deref(), Some(&Value::from(2)));
        assert!(!values.contains_key("other"));
    }

    #[test]
    fn include_all_params_adds_string_params() {
        let (_adapter, provider) = provider("?x=1&other=x");
        let params = provider
            .bind(
                numbers(&["x"]),
                &OptionsOverride::default().include_all_params(true),
            )
            .unwrap();
        let values = params.values().unwrap();
        assert_eq!(values["other"].as_deref(), Some(&Value::from("x")));
        assert_eq!(values["x"].as_deref(), Some(&Value::from(1)));
    }

    #[test]
    fn include_all_params_keep_references_when_others_change() {
        let (adapter, provider) = provider("?x=1&other=a");
        let params = provider
            .bind(
                numbers(&["x"]),
                &OptionsOverride::default().include_all_params(true),
            )
            .unwrap();
        let first = params.values().unwrap();
        adapter.replace(crate::adapter::Location::new("?x=2&other=a"));
        let second = params.values().unwrap();
        assert!(!Rc::ptr_eq(&first, &second));
        assert!(Rc::ptr_eq(
            first["other"].as_ref().unwrap(),
            second["other"].as_ref().unwrap()
        ));
    }

    #[test]
    fn single_param_binding() {
        let (adapter, provider) = provider("?n=1");
        let param = provider
            .bind_param("n", Some(ParamConfig::new(number())), &OptionsOverride::default())
            .unwrap();
        assert_eq!(param.value().unwrap().as_deref(), Some(&Value::from(1)));
        param
            .set_with(
                |current| Some(Value::from(current.and_then(Value::as_f64).unwrap_or(0.0) + 1.0)),
                Some(UpdateType::ReplaceIn),
            )
            .unwrap();
        assert_eq!(adapter.location().search, "?n=2");
        assert!(!adapter.navigations()[0].push);
        param.set(None, None).unwrap();
        assert_eq!(adapter.location().search, "");
    }

    #[test]
    fn single_param_without_config_is_string() {
        let (_adapter, provider) = provider("?q=hello");
        let param = provider
            .bind_param("q", None, &OptionsOverride::default())
            .unwrap();
        assert_eq!(param.name(), "q");
        assert_eq!(param.value().unwrap().as_deref(), Some(&Value::from("hello")));
    }
}
