// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025-2026 natyamatsya contributors
//
// Uncontended lock/unlock cycle benchmarks.
//
// Run with:
//   cargo bench --bench lock
//
// Groups:
//   lock_unlock/shared_memory   — sem_t in a mapped shm object
//   lock_unlock/named_semaphore — POSIX named semaphore via sem_open

use criterion::{criterion_group, criterion_main, Criterion};

use named_mutex::NamedMutex;

const MODES: &[(&str, bool)] = &[("shared_memory", true), ("named_semaphore", false)];

fn bench_lock_unlock(c: &mut Criterion) {
    let mut group = c.benchmark_group("lock_unlock");

    for &(label, shared) in MODES {
        let name = format!("bench_lock_{label}_{}", std::process::id());
        NamedMutex::clear_storage(&name, shared);

        let mut mtx = NamedMutex::new(name.as_str(), shared);
        mtx.init().expect("init");

        group.bench_function(label, |b| {
            b.iter(|| {
                mtx.lock();
                mtx.unlock();
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_lock_unlock);
criterion_main!(benches);
