//! Frame clock driving the simulation
//!
//! Targets 60 Hz. The host calls `tick` from its display loop (or `advance`
//! with its own elapsed time); the clock clamps the measured delta and
//! broadcasts it to subscribers in subscription order, synchronously. It
//! never blocks or spawns threads itself; `sleep_budget` supports hosts that
//! pace with a sleep.
//!
//! Simulation state mutation happens inside subscriber callbacks, so the
//! whole game advances on one cooperative context. A misbehaving subscriber
//! is isolated: its panic is caught and logged, and the remaining
//! subscribers still receive the tick.

use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

use crate::consts::{MAX_DT, TARGET_DT};

/// Handle identifying one clock subscription
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u32);

type Callback = Box<dyn FnMut(f32)>;

/// Fixed-target-rate scheduler producing clamped delta-time ticks
pub struct FrameClock {
    subscribers: Vec<(Subscription, Callback)>,
    next_id: u32,
    running: bool,
    /// Timebase for `tick`; meaningful only while running
    last_tick: Instant,
    target_dt: f32,
    max_dt: f32,
    // Once-per-second FPS accounting
    frames: u32,
    fps_window: f32,
}

impl FrameClock {
    pub fn new() -> Self {
        Self {
            subscribers: Vec::new(),
            next_id: 1,
            running: false,
            last_tick: Instant::now(),
            target_dt: TARGET_DT,
            max_dt: MAX_DT,
            frames: 0,
            fps_window: 0.0,
        }
    }

    /// Override the delta clamp (default 100 ms)
    pub fn with_max_dt(mut self, max_dt: f32) -> Self {
        self.max_dt = max_dt;
        self
    }

    /// Register a callback invoked with the clamped delta on every tick
    ///
    /// Callbacks fire in subscription order. Subscription changes never
    /// affect a broadcast already in flight; they apply from the next tick.
    pub fn subscribe(&mut self, callback: impl FnMut(f32) + 'static) -> Subscription {
        let id = Subscription(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Remove a subscription; unknown or stale handles are ignored
    pub fn unsubscribe(&mut self, subscription: Subscription) {
        self.subscribers.retain(|(id, _)| *id != subscription);
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    /// Arm the timebase and begin accepting ticks; no-op if already running
    pub fn start(&mut self) {
        if self.running {
            return;
        }
        self.running = true;
        self.last_tick = Instant::now();
        self.frames = 0;
        self.fps_window = 0.0;
        log::info!("frame clock started");
    }

    /// Stop ticking; idempotent, and later `tick`/`advance` calls no-op
    pub fn stop(&mut self) {
        if !self.running {
            return;
        }
        self.running = false;
        log::info!("frame clock stopped");
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Measure elapsed wall time and broadcast one tick
    ///
    /// Returns the clamped delta that was broadcast, or `None` while stopped.
    pub fn tick(&mut self) -> Option<f32> {
        if !self.running {
            return None;
        }
        let now = Instant::now();
        let elapsed = (now - self.last_tick).as_secs_f32();
        self.last_tick = now;
        self.advance(elapsed)
    }

    /// Broadcast one tick for a host-measured elapsed time
    ///
    /// Applies the same clamp as `tick`; the timebase is untouched, so hosts
    /// driving the clock this way own their own time measurement.
    pub fn advance(&mut self, elapsed: f32) -> Option<f32> {
        if !self.running {
            return None;
        }
        let dt = elapsed.clamp(0.0, self.max_dt);

        for (id, callback) in self.subscribers.iter_mut() {
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| callback(dt)));
            if outcome.is_err() {
                log::error!("clock subscriber {id:?} panicked, skipping it this tick");
            }
        }

        self.frames += 1;
        self.fps_window += dt;
        if self.fps_window >= 1.0 {
            log::debug!("{:.0} fps", self.frames as f32 / self.fps_window);
            self.frames = 0;
            self.fps_window = 0.0;
        }

        Some(dt)
    }

    /// Remaining time in the current frame for sleep-paced hosts
    #[inline]
    pub fn sleep_budget(&self, work: Duration) -> Duration {
        Duration::from_secs_f32(self.target_dt).saturating_sub(work)
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}
