// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use criterion::{criterion_group, criterion_main, Criterion};
use std::hint::black_box;
use tidings_queue::{EventQueue, Timeout, UserEventSource};

fn bench_queue(c: &mut Criterion) {
    let mut group = c.benchmark_group("Event Queue");

    group.bench_function("emit + get_next (1 queue)", |b| {
        let queue = EventQueue::new();
        let source = UserEventSource::new();
        queue.register(source.clone());
        b.iter(|| {
            source.emit(1, [1, 2, 3, 4]);
            black_box(queue.get_next());
        });
    });

    group.bench_function("emit + get_next (4 queues)", |b| {
        let queues: Vec<_> = (0..4).map(|_| EventQueue::new()).collect();
        let source = UserEventSource::new();
        for queue in &queues {
            queue.register(source.clone());
        }
        b.iter(|| {
            source.emit(1, [1, 2, 3, 4]);
            for queue in &queues {
                black_box(queue.get_next());
            }
        });
    });

    group.bench_function("fill 512 + flush", |b| {
        let queue = EventQueue::new();
        let source = UserEventSource::new();
        queue.register(source.clone());
        b.iter(|| {
            for n in 0..512 {
                source.emit(1, [n, 0, 0, 0]);
            }
            queue.flush();
        });
    });

    group.bench_function("wait (non-empty)", |b| {
        let queue = EventQueue::new();
        let source = UserEventSource::new();
        queue.register(source.clone());
        b.iter(|| {
            source.emit(1, [0; 4]);
            black_box(queue.wait(Timeout::Forever));
        });
    });

    group.finish();
}

criterion_group!(benches, bench_queue);
criterion_main!(benches);
