use std::fmt;

use crate::error::{Error, SimResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeUnit {
    Ps,
    Ns,
    Us,
    Ms,
    S,
}

impl TimeUnit {
    pub fn ps_per_unit(&self) -> u64 {
        match self {
            TimeUnit::Ps => 1,
            TimeUnit::Ns => 1_000,
            TimeUnit::Us => 1_000_000,
            TimeUnit::Ms => 1_000_000_000,
            TimeUnit::S => 1_000_000_000_000,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let unit = match self {
            TimeUnit::Ps => "ps",
            TimeUnit::Ns => "ns",
            TimeUnit::Us => "us",
            TimeUnit::Ms => "ms",
            TimeUnit::S => "s",
        };
        write!(f, "{unit}")
    }
}

/// A free-running clock on a single-bit input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clock {
    pub signal_name: String,
    pub period: u64,
    pub unit: TimeUnit,
}

impl Clock {
    pub fn new(signal_name: &str, period: u64, unit: TimeUnit) -> Self {
        Self {
            signal_name: signal_name.to_string(),
            period,
            unit,
        }
    }

    pub fn period_ps(&self) -> SimResult<u64> {
        self.period
            .checked_mul(self.unit.ps_per_unit())
            .ok_or(Error::TimeOverflow)
    }

    /// Time between two toggles of the clock line.
    pub fn half_period_ps(&self) -> SimResult<u64> {
        let period = self.period_ps()?;
        if period == 0 || period % 2 != 0 {
            return Err(Error::InvalidClockPeriod(period));
        }
        Ok(period / 2)
    }

    /// Nominal toggle frequency in hertz.
    pub fn frequency_hz(&self) -> SimResult<f64> {
        let period = self.period_ps()?;
        if period == 0 {
            return Err(Error::InvalidClockPeriod(period));
        }
        Ok(1e12 / period as f64)
    }
}

impl fmt::Display for Clock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.signal_name, self.period, self.unit)
    }
}

#[cfg(test)]
mod test {
    use super::{Clock, TimeUnit};
    use crate::Error;

    #[test]
    fn test_period_conversion() {
        let clock = Clock::new("clk", 1, TimeUnit::Us);
        assert_eq!(clock.period_ps().unwrap(), 1_000_000);
        assert_eq!(clock.half_period_ps().unwrap(), 500_000);
        assert_eq!(clock.frequency_hz().unwrap(), 1e6);
    }

    #[test]
    fn test_odd_period_is_rejected() {
        let clock = Clock::new("clk", 3, TimeUnit::Ps);
        assert!(matches!(
            clock.half_period_ps(),
            Err(Error::InvalidClockPeriod(3))
        ));
    }

    #[test]
    fn test_zero_period_is_rejected() {
        let clock = Clock::new("clk", 0, TimeUnit::Ns);
        assert!(matches!(
            clock.half_period_ps(),
            Err(Error::InvalidClockPeriod(0))
        ));
    }

    #[test]
    fn test_overflow() {
        let clock = Clock::new("clk", u64::MAX, TimeUnit::S);
        assert!(matches!(clock.period_ps(), Err(Error::TimeOverflow)));
    }

    #[test]
    fn test_display() {
        assert_eq!(Clock::new("clk", 1, TimeUnit::Us).to_string(), "clk (1 us)");
    }
}
