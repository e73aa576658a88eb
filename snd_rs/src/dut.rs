use bitvec::vec::BitVec;
use dut_sys::SigT;
use std::ffi::{CStr, CString, OsStr};

use crate::SndResult;

mod dut_sys;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("failed to query signals")]
    Query,
    #[error("failed to run for {} time steps", _0)]
    Run(u64),
    #[error("failed to set signal {} with value {}", _0, _1)]
    Set(String, BitVec<u32>),
    #[error("failed to get signal {}", _0)]
    Get(String),
    #[error("libloading: {}", _0)]
    Libloading(libloading::Error),
}

impl From<Error> for crate::Error {
    fn from(value: Error) -> Self {
        crate::Error::Dut(value)
    }
}

impl From<libloading::Error> for crate::Error {
    fn from(value: libloading::Error) -> Self {
        Error::Libloading(value).into()
    }
}

/// A DUT model loaded from a shared library.
pub struct Dut {
    lib: dut_sys::DutLib,
}

impl Dut {
    pub fn new<P: AsRef<OsStr>>(lib_path: P) -> SndResult<Self> {
        let lib = dut_sys::DutLib::new(lib_path.as_ref())?;
        Ok(Dut { lib })
    }

    pub fn query(&self) -> SndResult<Vec<Signal>> {
        let mut num_of_signals: u64 = 0;
        let sig_t_ptr = self.lib.query(&mut num_of_signals as *mut u64)?;
        if sig_t_ptr.is_null() {
            return Err(Error::Query.into());
        }
        Ok(Self::signals_from(sig_t_ptr, num_of_signals as usize))
    }

    /// Runs the model for `duration` time steps and returns the time it stopped at.
    pub fn run(&self, duration: u64) -> SndResult<u64> {
        let mut current_time: u64 = 0;
        match self.lib.run(duration, &mut current_time as *mut u64)? {
            0 => Ok(current_time),
            _ => Err(Error::Run(duration).into()),
        }
    }

    pub fn set(&self, sig_name: &str, bit_vec: &BitVec<u32>) -> SndResult<()> {
        let c_str = CString::new(sig_name)?;
        let words = bit_vec.as_raw_slice();
        match self
            .lib
            .set(c_str.as_ptr(), words.as_ptr(), words.len() as u64)?
        {
            0 => Ok(()),
            _ => Err(Error::Set(sig_name.to_string(), bit_vec.clone()).into()),
        }
    }

    pub fn get(&self, sig_name: &str) -> SndResult<BitVec<u32>> {
        let sig_name_cstr = CString::new(sig_name)?;
        let mut n_bits: u64 = 0;
        let words_ptr = self
            .lib
            .get(sig_name_cstr.as_ptr(), &mut n_bits as *mut u64)?;
        if words_ptr.is_null() {
            return Err(Error::Get(sig_name.to_string()).into());
        }
        Ok(Self::bitvec_from(words_ptr, n_bits as usize))
    }

    fn bitvec_from(words_ptr: *const u32, n_bits: usize) -> BitVec<u32> {
        let slice = unsafe { std::slice::from_raw_parts(words_ptr, num_of_words(n_bits)) };
        let mut bit_vec = BitVec::from_slice(slice);
        bit_vec.truncate(n_bits);
        bit_vec
    }

    fn signals_from(sig_t_ptr: *const SigT, num_of_signals: usize) -> Vec<Signal> {
        let sig_t_slice = unsafe { std::slice::from_raw_parts(sig_t_ptr, num_of_signals) };
        sig_t_slice.iter().map(Signal::from).collect()
    }
}

fn num_of_words(n_bits: usize) -> usize {
    n_bits / 32 + if n_bits % 32 != 0 { 1 } else { 0 }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub name: String,
    pub width: u64,
    pub get: bool,
    pub set: bool,
}

impl Signal {
    pub fn new(name: &str, width: u64, get: bool, set: bool) -> Self {
        Self {
            name: name.to_string(),
            width,
            get,
            set,
        }
    }
}

impl From<&SigT> for Signal {
    fn from(value: &SigT) -> Self {
        let name =
            String::from_utf8_lossy((unsafe { CStr::from_ptr(value.name) }).to_bytes()).to_string();
        let get = value.get == 1;
        let set = value.set == 1;
        Signal {
            name,
            width: value.width,
            get,
            set,
        }
    }
}

#[cfg(test)]
mod test {
    use std::ffi::CString;

    use bitvec::prelude::*;

    use super::{dut_sys::SigT, num_of_words, Dut, Error, Signal};
    use crate::Error as SndError;

    #[test]
    fn test_num_of_words() {
        assert_eq!(num_of_words(0), 0);
        assert_eq!(num_of_words(1), 1);
        assert_eq!(num_of_words(32), 1);
        assert_eq!(num_of_words(33), 2);
    }

    #[test]
    fn test_bitvec_from_truncates_to_width() {
        let words: [u32; 2] = [0xffff_ffff, 0b101];
        let bit_vec = Dut::bitvec_from(words.as_ptr(), 35);
        assert_eq!(bit_vec.len(), 35);
        assert!(bit_vec[..32].all());
        assert_eq!(&bit_vec[32..], bits![u32, Lsb0; 1, 0, 1]);
    }

    #[test]
    fn test_signal_from_sig_t() {
        let name = CString::new("snd_out").unwrap();
        let sig_t = SigT {
            name: name.as_ptr(),
            width: 1,
            get: 1,
            set: 0,
        };
        assert_eq!(Signal::from(&sig_t), Signal::new("snd_out", 1, true, false));
    }

    #[test]
    fn test_missing_library() {
        assert!(Dut::new("/nonexistent/libdut.so").is_err());
    }

    #[cfg(unix)]
    #[test]
    fn test_non_utf8_path_is_passed_through() {
        use std::{ffi::OsStr, os::unix::ffi::OsStrExt, path::Path};

        let path = Path::new(OsStr::from_bytes(b"/nonexistent/lib\xffdut.so"));
        assert!(matches!(
            Dut::new(path),
            Err(SndError::Dut(Error::Libloading(_)))
        ));
    }
}
