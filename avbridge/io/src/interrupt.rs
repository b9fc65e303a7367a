/*!
    Cooperative cancellation for blocking native I/O.
*/

use std::ffi::{c_int, c_void};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use ffmpeg_next::ffi::AVIOInterruptCB;

/**
    A shared flag the native I/O layer polls between blocking steps.

    The application owns and flips the flag; the native side only reads
    it. This is a best-effort signal, not a synchronization primitive: a
    blocking operation aborts the next time it polls, not immediately, and
    the only ordering promise is that a set flag is eventually observed.
*/
#[derive(Clone, Default)]
pub struct Interrupter {
    flag: Arc<AtomicBool>,
}

impl Interrupter {
    pub fn new() -> Self {
        Self::default()
    }

    /**
        Request that the current blocking operation abort.
    */
    pub fn interrupt(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /**
        Clear the flag so later operations proceed.
    */
    pub fn resume(&self) {
        self.flag.store(false, Ordering::Relaxed);
    }

    /**
        Current state of the flag.
    */
    pub fn interrupted(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    /**
        The callback struct to place in a format context.

        The returned value points at this interrupter's flag; it must not
        be used after the last clone of this interrupter is dropped.
    */
    pub fn callback(&self) -> AVIOInterruptCB {
        AVIOInterruptCB {
            callback: Some(poll),
            opaque: Arc::as_ptr(&self.flag).cast_mut().cast::<c_void>(),
        }
    }
}

unsafe extern "C" fn poll(opaque: *mut c_void) -> c_int {
    let flag = unsafe { &*opaque.cast_const().cast::<AtomicBool>() };
    c_int::from(flag.load(Ordering::Relaxed))
}
