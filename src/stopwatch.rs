use stopwatch_core::{Snapshot, StopwatchCore, TimerState};

use crate::clock::Clock;
use crate::pump::{PumpConfig, PumpHandle};

/// A start or resume that took effect. The pump must be handed back to
/// [`Stopwatch::stop`] or dropped on teardown.
pub struct Started {
    pub snapshot: Snapshot,
    pub pump: PumpHandle,
}

/// The stopwatch as the screen sees it: parameterless commands, a clock,
/// and a pump for refreshes while running.
pub struct Stopwatch<C, E> {
    core: StopwatchCore,
    clock: C,
    pumps: PumpConfig<E>,
}

impl<C: Clock, E: Clone + Send + 'static> Stopwatch<C, E> {
    pub fn new(clock: C, pumps: PumpConfig<E>) -> Self {
        Self {
            core: StopwatchCore::new(),
            clock,
            pumps,
        }
    }

    pub fn state(&self) -> TimerState {
        self.core.state()
    }

    pub fn snapshot(&self) -> Snapshot {
        self.core.snapshot()
    }

    pub fn start(&mut self) -> anyhow::Result<Option<Started>> {
        if self.core.state() != TimerState::Idle {
            log::debug!("start ignored while {:?}", self.core.state());
            return Ok(None);
        }
        let pump = self.pumps.spawn()?;
        self.core.start(self.clock.now_ms());
        log::info!("stopwatch started");
        Ok(Some(Started {
            snapshot: self.core.snapshot(),
            pump,
        }))
    }

    pub fn resume(&mut self) -> anyhow::Result<Option<Started>> {
        if self.core.state() != TimerState::Paused {
            log::debug!("resume ignored while {:?}", self.core.state());
            return Ok(None);
        }
        let pump = self.pumps.spawn()?;
        self.core.resume(self.clock.now_ms());
        log::info!("stopwatch resumed at {} ms", self.core.elapsed_ms());
        Ok(Some(Started {
            snapshot: self.core.snapshot(),
            pump,
        }))
    }

    pub fn lap(&mut self) -> Option<Snapshot> {
        let now = self.clock.now_ms();
        if !self.core.lap(now) {
            log::debug!("lap ignored while {:?}", self.core.state());
            return None;
        }
        log::info!("lap {} started at {} ms", self.core.lap_count(), self.core.elapsed_ms());
        Some(self.core.snapshot())
    }

    /// Stop the clock and the pump that was refreshing it.
    pub fn stop(&mut self, pump: PumpHandle) -> Option<Snapshot> {
        let now = self.clock.now_ms();
        pump.cancel();
        if !self.core.stop(now) {
            log::debug!("stop ignored while {:?}", self.core.state());
            return None;
        }
        log::info!("stopwatch stopped at {} ms", self.core.elapsed_ms());
        Some(self.core.snapshot())
    }

    pub fn reset(&mut self) -> Option<Snapshot> {
        if !self.core.reset() {
            log::debug!("reset ignored while {:?}", self.core.state());
            return None;
        }
        log::info!("stopwatch reset");
        Some(self.core.snapshot())
    }

    pub fn tick(&mut self) -> Snapshot {
        self.core.tick(self.clock.now_ms());
        self.core.snapshot()
    }
}
