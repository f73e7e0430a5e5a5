//! Benchmarks for decoding and reconciling search strings.
//!
//! Run with: cargo bench -p qsync-codec --bench reconcile

use std::hint::black_box;

use codec::{
    get_latest_decoded_values, updated_search_string, ChangeSet, DecodedParamCache,
    PendingUpdate, ReconcileContext, UpdateType,
};
use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use schema::{DecodedQuery, ParamConfigMap};
use serialize::{delimited_array, number, Value};
use wire::{search_string_to_object, url_search_format, ParseCache};

fn params(count: usize) -> ParamConfigMap {
    (0..count)
        .fold(ParamConfigMap::builder(), |builder, i| {
            let codec = if i % 2 == 0 {
                number()
            } else {
                delimited_array()
            };
            builder.param(format!("p{i}"), codec)
        })
        .build()
        .unwrap()
}

fn search(count: usize) -> String {
    let pairs: Vec<String> = (0..count)
        .map(|i| {
            if i % 2 == 0 {
                format!("p{i}={i}")
            } else {
                format!("p{i}=a_b_c")
            }
        })
        .collect();
    format!("?{}", pairs.join("&"))
}

fn bench_latest_values(c: &mut Criterion) {
    let mut group = c.benchmark_group("latest_values");

    for count in [4, 16, 64] {
        group.throughput(Throughput::Elements(count as u64));
        let map = params(count);
        let parsed = search_string_to_object(&search(count));

        group.bench_with_input(BenchmarkId::new("cold", count), &(), |b, ()| {
            b.iter(|| {
                let cache = DecodedParamCache::new();
                black_box(get_latest_decoded_values(&parsed, &map, &cache))
            });
        });

        let cache = DecodedParamCache::new();
        get_latest_decoded_values(&parsed, &map, &cache);
        group.bench_with_input(BenchmarkId::new("warm", count), &(), |b, ()| {
            b.iter(|| black_box(get_latest_decoded_values(&parsed, &map, &cache)));
        });
    }

    group.finish();
}

fn bench_updated_search(c: &mut Criterion) {
    let mut group = c.benchmark_group("updated_search");

    for count in [4, 16, 64] {
        group.throughput(Throughput::Elements(count as u64));
        let map = params(count);
        let current = search(count);
        let cache = DecodedParamCache::new();
        let parse_cache = ParseCache::new();
        let format = url_search_format();
        let cx = ReconcileContext {
            cache: &cache,
            parse_cache: &parse_cache,
        };

        group.bench_with_input(BenchmarkId::new("replace_in", count), &(), |b, ()| {
            b.iter(|| {
                let mut changes = DecodedQuery::new();
                changes.insert("p0".into(), Some(Value::from(42)));
                let update = PendingUpdate {
                    changes: ChangeSet::Values(changes),
                    params: map.clone(),
                    inherited: ParamConfigMap::new(),
                    search_format: format.clone(),
                    update_type: UpdateType::ReplaceIn,
                    remove_defaults_from_url: false,
                    skip_update_when_no_change: true,
                    current_search: current.clone(),
                };
                black_box(updated_search_string(update, &current, cx))
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_latest_values, bench_updated_search);
criterion_main!(benches);
