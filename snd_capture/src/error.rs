pub type CaptureResult<T> = Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("DUT does not expose signal {}", _0)]
    MissingSignal(String),
    #[error("capture driver already ran")]
    AlreadyRan,
    #[error("VCD variable {} not found", _0)]
    VcdVarNotFound(String),
    #[error("VCD: {}", _0)]
    Vcd(String),
    #[error("invalid configuration: {}", _0)]
    Config(String),
    #[error("snd_sim: {}", _0)]
    Sim(snd_sim::Error),
    #[error("hound: {}", _0)]
    Wav(hound::Error),
    #[error("IO error: {}", _0)]
    Io(std::io::Error),
}

impl From<snd_sim::Error> for Error {
    fn from(value: snd_sim::Error) -> Self {
        Self::Sim(value)
    }
}

impl From<snd_rs::Error> for Error {
    fn from(value: snd_rs::Error) -> Self {
        Self::Sim(value.into())
    }
}

impl From<hound::Error> for Error {
    fn from(value: hound::Error) -> Self {
        Self::Wav(value)
    }
}

impl From<std::io::Error> for Error {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}
