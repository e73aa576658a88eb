use crate::dut;

pub type SndResult<T> = Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("snd_rs: dut: {}", _0)]
    Dut(dut::Error),
    #[error("snd_rs: internal error: {}", _0)]
    InternalError(String),
}

impl From<std::ffi::NulError> for Error {
    fn from(value: std::ffi::NulError) -> Self {
        Error::InternalError(value.to_string())
    }
}

impl From<std::str::Utf8Error> for Error {
    fn from(value: std::str::Utf8Error) -> Self {
        Error::InternalError(value.to_string())
    }
}
