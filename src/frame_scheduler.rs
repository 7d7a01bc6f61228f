//! Tick scheduling and timing utilities.
//!
//! Provides portable tick pacing without async/await or platform-specific timers.
//! The caller is responsible for sleeping/waiting between ticks.

use embassy_time::{Duration, Instant};

use crate::{fixture::Fixture, output::RgbwwOutput, request::RequestQueue};

/// Default tick rate (50 Hz).
pub const DEFAULT_TICK_RATE: u32 = 50;

/// Default tick duration based on the tick rate.
pub const DEFAULT_TICK_DURATION: Duration = Duration::from_millis(1000 / DEFAULT_TICK_RATE as u64);

/// Result of a tick.
#[derive(Debug, Clone, Copy)]
pub struct TickResult {
    /// The deadline for the next tick.
    pub next_deadline: Instant,
    /// How long to wait until the next tick (may be zero if behind schedule).
    pub sleep_duration: Duration,
    /// Whether the outputs were written during this tick.
    pub wrote_output: bool,
}

/// Drives a fixture at a fixed rate.
///
/// Each tick drains the request queue, advances the fixture and returns
/// timing info so the caller can sleep appropriately.
///
/// # Usage
///
/// ```ignore
/// static REQUESTS: RequestQueue<8> = RequestQueue::new();
/// let mut scheduler = FrameScheduler::new(fixture, &REQUESTS);
///
/// loop {
///     let result = scheduler.tick(Instant::now());
///     Timer::at(result.next_deadline).await;
/// }
/// ```
pub struct FrameScheduler<'a, O: RgbwwOutput, const QUEUE_SIZE: usize> {
    fixture: Fixture<O>,
    requests: &'a RequestQueue<QUEUE_SIZE>,
    next_tick: Instant,
    tick_duration: Duration,
}

impl<'a, O: RgbwwOutput, const QUEUE_SIZE: usize> FrameScheduler<'a, O, QUEUE_SIZE> {
    /// Uses `DEFAULT_TICK_DURATION` (50 Hz) for tick timing.
    pub fn new(fixture: Fixture<O>, requests: &'a RequestQueue<QUEUE_SIZE>) -> Self {
        Self::with_tick_duration(fixture, requests, DEFAULT_TICK_DURATION)
    }

    pub fn with_tick_duration(
        fixture: Fixture<O>,
        requests: &'a RequestQueue<QUEUE_SIZE>,
        tick_duration: Duration,
    ) -> Self {
        Self {
            fixture,
            requests,
            next_tick: Instant::from_millis(0),
            tick_duration,
        }
    }

    /// Process one tick and return timing information.
    ///
    /// If the caller fell behind by more than two ticks the schedule restarts
    /// from `now` instead of catching up.
    pub fn tick(&mut self, now: Instant) -> TickResult {
        if now > self.next_tick + self.tick_duration * 2 {
            self.next_tick = now;
        }

        self.fixture.process_requests(self.requests, now);
        let wrote_output = self.fixture.tick(now);

        self.next_tick += self.tick_duration;
        let sleep_duration = self.next_tick.saturating_duration_since(now);

        TickResult {
            next_deadline: self.next_tick,
            sleep_duration,
            wrote_output,
        }
    }

    pub fn fixture(&self) -> &Fixture<O> {
        &self.fixture
    }

    pub fn fixture_mut(&mut self) -> &mut Fixture<O> {
        &mut self.fixture
    }
}
