//! Benchmark for snapshot building and classification.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use semtype_core::types::SourceFile;
use semtype_core::{differ, MemoryDiagnostics, SnapshotBuilder};

const SOURCE: &str = r#"
package store

import (
	"context"
	"errors"
)

// ErrNotFound is returned when a key is missing.
var ErrNotFound = errors.New("not found")

type Option func(*Options)

type Options struct {
	Capacity int
	Eviction string `json:"eviction,omitempty"`
	metrics  *collector
}

type Store[K comparable, V any] struct {
	Options
	mu    sync.Mutex
	items map[K]V
}

type Reader interface {
	Get(ctx context.Context, key string) ([]byte, error)
	Has(key string) bool
}

func New[K comparable, V any](opts ...Option) *Store[K, V] {
	return &Store[K, V]{}
}

func (s *Store[K, V]) Get(key K) (V, bool) {
	s.mu.Lock()
	defer s.mu.Unlock()
	v, ok := s.items[key]
	return v, ok
}

func (s *Store[K, V]) Put(key K, value V) {
	s.items[key] = value
}

func WithCapacity(n int) Option {
	return func(o *Options) { o.Capacity = n }
}

func helper(a, b int) int { return a + b }
"#;

fn sources(count: usize) -> Vec<SourceFile> {
    (0..count)
        .map(|i| SourceFile::new(format!("file_{}.go", i), SOURCE))
        .collect()
}

fn bench_build_single_file(c: &mut Criterion) {
    let files = sources(1);
    c.bench_function("snapshot_single_file", |b| {
        b.iter(|| {
            let diagnostics = MemoryDiagnostics::new();
            let snapshot = SnapshotBuilder::new(&diagnostics)
                .build_from_sources(black_box(&files))
                .unwrap();
            black_box(snapshot)
        })
    });
}

fn bench_build_package(c: &mut Criterion) {
    let files = sources(100);
    c.bench_function("snapshot_100_files", |b| {
        b.iter(|| {
            let diagnostics = MemoryDiagnostics::new();
            let snapshot = SnapshotBuilder::new(&diagnostics)
                .build_from_sources(black_box(&files))
                .unwrap();
            black_box(snapshot)
        })
    });
}

fn bench_diff(c: &mut Criterion) {
    let diagnostics = MemoryDiagnostics::new();
    let builder = SnapshotBuilder::new(&diagnostics);
    let before = builder.build_from_sources(&sources(1)).unwrap();
    let changed = SOURCE.replace("Has(key string) bool", "Has(key string) (bool, error)");
    let after = builder
        .build_from_sources(&[SourceFile::new("file_0.go", changed)])
        .unwrap();

    c.bench_function("diff_snapshots", |b| {
        b.iter(|| black_box(differ::diff(black_box(&before), black_box(&after))))
    });
}

criterion_group!(benches, bench_build_single_file, bench_build_package, bench_diff);
criterion_main!(benches);
