use crate::laps::{lap_table, LapEntry};

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum TimerState {
    Idle,
    Running,
    /// Stopped with lap history still on screen.
    Paused,
}

/// Everything a display needs, computed at the last observed tick.
#[derive(Clone, PartialEq, Eq, Debug)]
pub struct Snapshot {
    pub state: TimerState,
    pub total_ms: u64,
    /// Most recent lap first.
    pub laps: Vec<LapEntry>,
}

#[derive(Clone, Copy, Debug)]
struct Segment {
    start_ms: u64,
    now_ms: u64,
}

impl Segment {
    fn at(now_ms: u64) -> Self {
        Self {
            start_ms: now_ms,
            now_ms,
        }
    }

    fn elapsed_ms(&self) -> u64 {
        self.now_ms - self.start_ms
    }
}

/// Stopwatch state machine with a lap log.
///
/// `laps` holds stored lap bases oldest first; the last one is the current lap.
/// While running, the current lap's effective duration is its base plus the
/// open segment. Commands that do not apply in the current state return `false`
/// and change nothing.
#[derive(Clone, Debug, Default)]
pub struct StopwatchCore {
    segment: Option<Segment>,
    laps: Vec<u64>,
}

impl StopwatchCore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> TimerState {
        if self.laps.is_empty() {
            TimerState::Idle
        } else if self.segment.is_some() {
            TimerState::Running
        } else {
            TimerState::Paused
        }
    }

    pub fn start(&mut self, now_ms: u64) -> bool {
        if self.state() != TimerState::Idle {
            return false;
        }
        self.segment = Some(Segment::at(now_ms));
        self.laps.push(0);
        true
    }

    pub fn lap(&mut self, now_ms: u64) -> bool {
        let Some(end_ms) = self.close_segment(now_ms) else {
            return false;
        };
        self.laps.push(0);
        self.segment = Some(Segment::at(end_ms));
        true
    }

    pub fn stop(&mut self, now_ms: u64) -> bool {
        self.close_segment(now_ms).is_some()
    }

    pub fn resume(&mut self, now_ms: u64) -> bool {
        if self.state() != TimerState::Paused {
            return false;
        }
        self.segment = Some(Segment::at(now_ms));
        true
    }

    pub fn reset(&mut self) -> bool {
        if self.state() != TimerState::Paused {
            return false;
        }
        self.laps.clear();
        true
    }

    /// Advance the observed time. Earlier timestamps are ignored.
    pub fn tick(&mut self, now_ms: u64) -> bool {
        match self.segment.as_mut() {
            Some(segment) => {
                segment.now_ms = segment.now_ms.max(now_ms);
                true
            }
            None => false,
        }
    }

    pub fn lap_count(&self) -> usize {
        self.laps.len()
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.laps.iter().sum::<u64>() + self.open_ms()
    }

    pub fn snapshot(&self) -> Snapshot {
        let open = self.open_ms();
        let display: Vec<u64> = self
            .laps
            .iter()
            .rev()
            .enumerate()
            .map(|(i, &base)| if i == 0 { base + open } else { base })
            .collect();

        Snapshot {
            state: self.state(),
            total_ms: self.elapsed_ms(),
            laps: lap_table(&display),
        }
    }

    fn open_ms(&self) -> u64 {
        self.segment.map(|s| s.elapsed_ms()).unwrap_or(0)
    }

    /// Fold the open segment into the current lap, measured up to `now_ms`
    /// but never before the last tick. Returns where the segment ended.
    fn close_segment(&mut self, now_ms: u64) -> Option<u64> {
        let mut segment = self.segment.take()?;
        segment.now_ms = segment.now_ms.max(now_ms);
        if let Some(current) = self.laps.last_mut() {
            *current += segment.elapsed_ms();
        }
        Some(segment.now_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn durations(snapshot: &Snapshot) -> Vec<u64> {
        snapshot.laps.iter().map(|l| l.duration_ms).collect()
    }

    #[test]
    fn test_new_is_idle_and_empty() {
        let sw = StopwatchCore::new();
        let snap = sw.snapshot();
        assert_eq!(snap.state, TimerState::Idle);
        assert_eq!(snap.total_ms, 0);
        assert!(snap.laps.is_empty());
    }

    #[test]
    fn test_start_then_snapshot() {
        let mut sw = StopwatchCore::new();
        assert!(sw.start(1000));

        let snap = sw.snapshot();
        assert_eq!(snap.state, TimerState::Running);
        assert_eq!(snap.total_ms, 0);
        assert_eq!(snap.laps.len(), 1);
        assert!(snap.laps[0].current);
        assert_eq!(snap.laps[0].number, 1);
    }

    #[test]
    fn test_start_at_time_zero_is_running() {
        let mut sw = StopwatchCore::new();
        assert!(sw.start(0));
        assert_eq!(sw.state(), TimerState::Running);
        sw.tick(250);
        assert_eq!(sw.elapsed_ms(), 250);
    }

    #[test]
    fn test_tick_advances_total() {
        let mut sw = StopwatchCore::new();
        sw.start(1000);
        sw.tick(1100);
        assert_eq!(sw.snapshot().total_ms, 100);
        sw.tick(1550);
        assert_eq!(sw.snapshot().total_ms, 550);
        assert_eq!(sw.snapshot().laps[0].duration_ms, 550);
    }

    #[test]
    fn test_total_is_monotonic_across_ticks_and_laps() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        let mut last = 0;
        for t in (100..3000).step_by(100) {
            if t % 700 == 0 {
                sw.lap(t + 30);
            } else {
                sw.tick(t);
            }
            let total = sw.snapshot().total_ms;
            assert!(total >= last, "total went from {} to {} at {}", last, total, t);
            last = total;
        }
    }

    #[test]
    fn test_tick_backwards_is_ignored() {
        let mut sw = StopwatchCore::new();
        sw.start(1000);
        sw.tick(2000);
        sw.tick(1500);
        assert_eq!(sw.elapsed_ms(), 1000);
    }

    #[test]
    fn test_lap_n_times() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.lap(300);
        sw.lap(400);
        sw.lap(900);

        let snap = sw.snapshot();
        assert_eq!(snap.laps.len(), 4);
        assert_eq!(durations(&snap), vec![0, 500, 100, 300]);
        assert!(snap.laps[0].current);
        assert!(snap.laps[1..].iter().all(|l| !l.current));
        let numbers: Vec<usize> = snap.laps.iter().map(|l| l.number).collect();
        assert_eq!(numbers, vec![4, 3, 2, 1]);
        assert_eq!(snap.total_ms, 900);
    }

    #[test]
    fn test_lap_keeps_running_total() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.tick(1000);
        let before = sw.elapsed_ms();
        sw.lap(1000);
        assert_eq!(sw.elapsed_ms(), before);
        sw.tick(1250);
        assert_eq!(sw.elapsed_ms(), 1250);
        assert_eq!(sw.snapshot().laps[0].duration_ms, 250);
    }

    #[test]
    fn test_lap_uses_command_time_not_last_tick() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.tick(100);
        sw.lap(180);
        assert_eq!(durations(&sw.snapshot()), vec![0, 180]);
    }

    #[test]
    fn test_lap_before_last_tick_is_clamped() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.tick(1000);
        assert!(sw.lap(900));
        assert_eq!(sw.elapsed_ms(), 1000);
        assert_eq!(durations(&sw.snapshot()), vec![0, 1000]);

        // No real time passed since the last tick.
        sw.tick(1000);
        assert_eq!(sw.elapsed_ms(), 1000);
        sw.tick(1100);
        assert_eq!(sw.elapsed_ms(), 1100);
        assert_eq!(durations(&sw.snapshot()), vec![100, 1000]);
    }

    #[test]
    fn test_lap_before_start_is_clamped() {
        let mut sw = StopwatchCore::new();
        sw.start(500);
        assert!(sw.lap(200));
        assert_eq!(sw.elapsed_ms(), 0);
        assert_eq!(durations(&sw.snapshot()), vec![0, 0]);

        sw.tick(500);
        assert_eq!(sw.elapsed_ms(), 0);
        sw.tick(800);
        assert_eq!(sw.elapsed_ms(), 300);
    }

    #[test]
    fn test_stop_before_last_tick_is_clamped() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.tick(700);
        assert!(sw.stop(400));
        assert_eq!(sw.elapsed_ms(), 700);

        sw.resume(2000);
        sw.tick(2100);
        assert_eq!(sw.elapsed_ms(), 800);
    }

    #[test]
    fn test_stop_freezes_current_lap() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.lap(400);
        sw.tick(600);
        assert!(sw.stop(650));

        let snap = sw.snapshot();
        assert_eq!(snap.state, TimerState::Paused);
        assert_eq!(durations(&snap), vec![250, 400]);
        assert_eq!(snap.total_ms, 650);

        // Ticks after stop change nothing.
        assert!(!sw.tick(5000));
        assert_eq!(sw.snapshot(), snap);
    }

    #[test]
    fn test_stop_then_resume_preserves_total() {
        let mut sw = StopwatchCore::new();
        sw.start(1000);
        sw.tick(3000);
        sw.stop(3000);
        let before = sw.elapsed_ms();

        assert!(sw.resume(10_000));
        assert_eq!(sw.state(), TimerState::Running);
        assert_eq!(sw.elapsed_ms(), before);

        sw.tick(10_500);
        assert_eq!(sw.elapsed_ms(), before + 500);
        // The head lap keeps accumulating from its frozen base.
        let snap = sw.snapshot();
        assert_eq!(snap.laps.len(), 1);
        assert_eq!(snap.laps[0].duration_ms, 2500);
    }

    #[test]
    fn test_reset_after_stop() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.lap(100);
        sw.stop(200);
        assert!(sw.reset());

        let snap = sw.snapshot();
        assert_eq!(snap.state, TimerState::Idle);
        assert!(snap.laps.is_empty());
        assert_eq!(snap.total_ms, 0);

        // Can start over.
        assert!(sw.start(500));
        assert_eq!(sw.lap_count(), 1);
    }

    #[test]
    fn test_reset_while_running_is_noop() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.tick(300);
        let before = sw.snapshot();
        assert!(!sw.reset());
        assert_eq!(sw.snapshot(), before);
    }

    #[test]
    fn test_invalid_commands_leave_snapshot_unchanged() {
        let mut sw = StopwatchCore::new();
        let idle = sw.snapshot();
        assert!(!sw.lap(100));
        assert!(!sw.stop(100));
        assert!(!sw.resume(100));
        assert!(!sw.reset());
        assert!(!sw.tick(100));
        assert_eq!(sw.snapshot(), idle);

        sw.start(0);
        sw.tick(200);
        let running = sw.snapshot();
        assert!(!sw.start(300));
        assert!(!sw.resume(300));
        assert_eq!(sw.snapshot(), running);

        sw.stop(400);
        let paused = sw.snapshot();
        assert!(!sw.start(500));
        assert!(!sw.lap(500));
        assert!(!sw.stop(500));
        assert_eq!(sw.snapshot(), paused);
    }

    #[test]
    fn test_marks_fastest_and_slowest_finalized_laps() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.lap(500);
        sw.lap(600);
        sw.lap(900);
        sw.tick(950);

        // Finalized, most recent first: [300, 100, 500].
        let snap = sw.snapshot();
        assert_eq!(durations(&snap), vec![50, 300, 100, 500]);
        let fastest: Vec<u64> = snap.laps.iter().filter(|l| l.fastest).map(|l| l.duration_ms).collect();
        let slowest: Vec<u64> = snap.laps.iter().filter(|l| l.slowest).map(|l| l.duration_ms).collect();
        assert_eq!(fastest, vec![100]);
        assert_eq!(slowest, vec![500]);
        assert!(!snap.laps[0].fastest && !snap.laps[0].slowest);
    }

    #[test]
    fn test_single_finalized_lap_is_not_marked() {
        let mut sw = StopwatchCore::new();
        sw.start(0);
        sw.lap(400);
        sw.tick(450);
        let snap = sw.snapshot();
        assert!(snap.laps.iter().all(|l| !l.fastest && !l.slowest));
    }
}
