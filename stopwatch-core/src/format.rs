use std::fmt;

/// A duration split into display components.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct DurationParts {
    /// Total minutes, not wrapped at the hour.
    pub minutes: u64,
    pub seconds: u64,
    pub hundredths: u64,
}

impl DurationParts {
    pub fn from_ms(ms: u64) -> Self {
        let total_secs = ms / 1000;
        Self {
            minutes: total_secs / 60,
            seconds: total_secs % 60,
            hundredths: (ms % 1000) / 10,
        }
    }
}

impl fmt::Display for DurationParts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{},{}",
            pad2(self.minutes),
            pad2(self.seconds),
            pad2(self.hundredths)
        )
    }
}

/// Zero-pad to two digits when below 10.
pub fn pad2(n: u64) -> String {
    format!("{:02}", n)
}

/// Format milliseconds as "MM:SS,cc" (hundredths)
pub fn format_lap_time(ms: u64) -> String {
    DurationParts::from_ms(ms).to_string()
}
