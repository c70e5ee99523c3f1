/// One row of the lap table.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LapEntry {
    /// 1 for the oldest lap.
    pub number: usize,
    pub duration_ms: u64,
    /// The head lap, accumulating while running and frozen while paused.
    pub current: bool,
    pub fastest: bool,
    pub slowest: bool,
}

/// Build lap rows from durations in display order (most recent first).
///
/// The first duration is the current lap and never takes part in the
/// fastest/slowest comparison.
pub fn lap_table(durations: &[u64]) -> Vec<LapEntry> {
    let count = durations.len();
    let marks = durations.get(1..).and_then(extremes);

    durations
        .iter()
        .enumerate()
        .map(|(i, &duration_ms)| LapEntry {
            number: count - i,
            duration_ms,
            current: i == 0,
            fastest: marks.map(|(fast, _)| fast + 1 == i).unwrap_or(false),
            slowest: marks.map(|(_, slow)| slow + 1 == i).unwrap_or(false),
        })
        .collect()
}

/// Indices of the fastest and slowest of `finalized`, first match on ties.
/// Needs at least two laps to compare.
pub fn extremes(finalized: &[u64]) -> Option<(usize, usize)> {
    if finalized.len() < 2 {
        return None;
    }
    let mut fastest = 0;
    let mut slowest = 0;
    for (i, &lap) in finalized.iter().enumerate().skip(1) {
        if lap < finalized[fastest] {
            fastest = i;
        }
        if lap > finalized[slowest] {
            slowest = i;
        }
    }
    Some((fastest, slowest))
}
