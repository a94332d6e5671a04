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

// Tidings Sandbox
// Producer/consumer demo: a timer thread and a fake keyboard feed one queue,
// the primary thread drains it with timed waits.
//
// Usage: sandbox [queue-config.ron|queue-config.json]

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use tidings_core::event::KeyPayload;
use tidings_queue::{
    Event, EventKind, EventPayload, EventQueue, EventSource, QueueConfig, Timeout,
    UserEventSource,
};

const QUIT_EVENT: u32 = 1024;
const TIMER_TICKS: i64 = 20;
const KEYS: &str = "tidings";

fn load_config() -> Result<QueueConfig> {
    match std::env::args().nth(1) {
        Some(path) => QueueConfig::load(&path)
            .with_context(|| format!("failed to load queue config from '{path}'")),
        None => Ok(QueueConfig::default()),
    }
}

fn spawn_timer(source: Arc<UserEventSource>, running: Arc<AtomicBool>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for count in 1..=TIMER_TICKS {
            if !running.load(Ordering::Relaxed) {
                break;
            }
            thread::sleep(Duration::from_millis(10));
            source.emit_event(Event::timer(source.id(), count));
        }
        log::debug!("Timer thread finished.");
    })
}

fn spawn_keyboard(source: Arc<UserEventSource>) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        for c in KEYS.chars() {
            thread::sleep(Duration::from_millis(25));
            let key = EventPayload::Key(KeyPayload {
                keycode: c as u32,
                unichar: c as u32,
                modifiers: 0,
            });
            for kind in [EventKind::KeyDown, EventKind::KeyUp] {
                if let Some(event) = Event::now(kind, source.id(), key) {
                    source.emit_event(event);
                }
            }
        }
        // Ask the consumer to stop once the typing is done.
        source.emit(QUIT_EVENT, [0; 4]);
        log::debug!("Keyboard thread finished.");
    })
}

/// What the primary thread saw while draining the queue.
#[derive(Debug, Default)]
struct Drained {
    typed: String,
    ticks: usize,
}

/// Drains `queue` until the quit event arrives, or until every producer is
/// done and nothing is left to read. The quit event itself can be lost to an
/// overflow on a small queue.
fn drain(queue: &EventQueue, producers_done: impl Fn() -> bool) -> Drained {
    let mut drained = Drained::default();
    loop {
        let Some(event) = queue.wait(Timeout::from_millis(100)) else {
            if producers_done() && queue.is_empty() {
                log::info!("Producers finished without a quit event, stopping.");
                break;
            }
            log::info!("No event within 100ms, still waiting...");
            continue;
        };
        match (event.kind(), event.payload()) {
            (EventKind::Timer, EventPayload::Timer(timer)) => {
                drained.ticks += 1;
                log::trace!("Tick {}", timer.count);
            }
            (EventKind::KeyDown, EventPayload::Key(key)) => {
                if let Some(c) = char::from_u32(key.unichar) {
                    drained.typed.push(c);
                }
            }
            (EventKind::User(QUIT_EVENT), _) => break,
            (kind, _) => log::debug!("Ignoring {kind:?}"),
        }
    }
    drained
}

fn main() -> Result<()> {
    env_logger::init();

    let config = load_config()?;
    let queue = EventQueue::with_config(config);

    let timer = UserEventSource::new();
    let keyboard = UserEventSource::new();
    queue.register(timer.clone());
    queue.register(keyboard.clone());

    let running = Arc::new(AtomicBool::new(true));
    let timer_thread = spawn_timer(timer.clone(), Arc::clone(&running));
    let keyboard_thread = spawn_keyboard(keyboard.clone());

    let drained = drain(&queue, || {
        timer_thread.is_finished() && keyboard_thread.is_finished()
    });

    running.store(false, Ordering::Relaxed);
    keyboard_thread
        .join()
        .map_err(|_| anyhow::anyhow!("keyboard thread panicked"))?;
    timer_thread
        .join()
        .map_err(|_| anyhow::anyhow!("timer thread panicked"))?;

    log::info!(
        "Typed '{}', saw {} timer ticks.",
        drained.typed,
        drained.ticks
    );
    log::info!("Queue stats: {:?}", queue.stats());

    // Leftover timer ticks are purged here.
    queue.destroy();
    log::info!(
        "Timer source: {} emitted, {} released.",
        timer.emitted_count(),
        timer.released_count()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drain_stops_on_quit_event() {
        let queue = EventQueue::new();
        let keyboard = UserEventSource::new();
        queue.register(keyboard.clone());

        keyboard.emit(QUIT_EVENT, [0; 4]);
        // Would be read after the quit event, so it stays queued.
        keyboard.emit(1, [0; 4]);

        drain(&queue, || false);
        assert_eq!(queue.len(), 1);
        queue.flush();
    }

    #[test]
    fn test_drain_stops_when_quit_event_overflowed() {
        let queue = EventQueue::with_config(QueueConfig { capacity: 1 });
        let keyboard = UserEventSource::new();
        queue.register(keyboard.clone());

        let key = EventPayload::Key(KeyPayload {
            keycode: 't' as u32,
            unichar: 't' as u32,
            modifiers: 0,
        });
        if let Some(event) = Event::now(EventKind::KeyDown, keyboard.id(), key) {
            keyboard.emit_event(event);
        }
        // The buffer is full, so the quit event is dropped.
        keyboard.emit(QUIT_EVENT, [0; 4]);
        assert_eq!(queue.stats().overflowed, 1);

        let drained = drain(&queue, || true);
        assert_eq!(drained.typed, "t");
        assert!(queue.is_empty());
    }
}
