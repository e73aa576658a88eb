use libloading::{Library, Symbol};
use std::ffi::{c_char, c_int, OsStr};

use crate::error::SndResult;

pub struct DutLib {
    lib: Library,
}

impl DutLib {
    pub fn new(lib_path: &OsStr) -> SndResult<Self> {
        let lib = unsafe { Library::new(lib_path)? };
        Ok(DutLib { lib })
    }

    pub fn query(&self, num_of_signals: *mut u64) -> SndResult<*const SigT> {
        let f: Symbol<unsafe extern "C" fn(*mut u64) -> *const SigT> =
            unsafe { self.lib.get(b"sim_query")? };
        Ok(unsafe { f(num_of_signals) })
    }

    pub fn run(&self, duration: u64, current_time_o: *mut u64) -> SndResult<c_int> {
        let f: Symbol<unsafe extern "C" fn(u64, *mut u64) -> c_int> =
            unsafe { self.lib.get(b"sim_run")? };
        Ok(unsafe { f(duration, current_time_o) })
    }

    pub fn set(
        &self,
        sig_name: *const c_char,
        words: *const u32,
        num_of_words: u64,
    ) -> SndResult<c_int> {
        let f: Symbol<unsafe extern "C" fn(*const c_char, *const u32, u64) -> c_int> =
            unsafe { self.lib.get(b"sim_set")? };
        Ok(unsafe { f(sig_name, words, num_of_words) })
    }

    pub fn get(&self, sig_name: *const c_char, n_bits: *mut u64) -> SndResult<*const u32> {
        let f: Symbol<unsafe extern "C" fn(*const c_char, *mut u64) -> *const u32> =
            unsafe { self.lib.get(b"sim_get")? };
        Ok(unsafe { f(sig_name, n_bits) })
    }
}

#[repr(C)]
pub struct SigT {
    pub name: *const c_char,
    pub width: u64,
    pub get: u8,
    pub set: u8,
}
