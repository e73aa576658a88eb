pub type SimResult<T> = Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no clock is driving signal {}", _0)]
    NoClock(String),
    #[error("invalid clock period: {} ps (must be non-zero and even)", _0)]
    InvalidClockPeriod(u64),
    #[error("clock period overflows simulation time")]
    TimeOverflow,
    #[error("DUT made no progress at {} ps", _0)]
    Stalled(u64),
    #[error("snd_rs: {}", _0)]
    Dut(snd_rs::Error),
}

impl From<snd_rs::Error> for Error {
    fn from(value: snd_rs::Error) -> Self {
        Self::Dut(value)
    }
}
