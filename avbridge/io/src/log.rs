/*!
    Native log stream bridging.

    The native logger emits `printf`-style varargs through a process-wide
    callback. This module installs a fixed trampoline that renders each
    event with the library's own line formatter, derives the emitting
    context's class name when one is attached, and forwards the finished
    line to a single registered Rust sink.
*/

use std::ffi::{CStr, CString, c_char, c_int, c_void};
use std::ptr;
use std::sync::Arc;

use ffmpeg_next::ffi;
use parking_lot::RwLock;

/**
    Log severities, mirroring the native `AV_LOG_*` levels.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
#[repr(i32)]
pub enum Level {
    Quiet = -8,
    Panic = 0,
    Fatal = 8,
    Error = 16,
    Warning = 24,
    Info = 32,
    Verbose = 40,
    Debug = 48,
    Trace = 56,
}

impl Level {
    /**
        Map a raw native level to the nearest named severity.
    */
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            i32::MIN..=-1 => Self::Quiet,
            0..=7 => Self::Panic,
            8..=15 => Self::Fatal,
            16..=23 => Self::Error,
            24..=31 => Self::Warning,
            32..=39 => Self::Info,
            40..=47 => Self::Verbose,
            48..=55 => Self::Debug,
            _ => Self::Trace,
        }
    }

    /**
        The raw native level value.
    */
    pub const fn into_raw(self) -> i32 {
        self as i32
    }
}

/**
    Set the process-wide severity threshold; events above it are dropped.
*/
pub fn set_level(level: Level) {
    unsafe { ffi::av_log_set_level(level.into_raw()) };
}

/**
    The current process-wide severity threshold.
*/
pub fn level() -> Level {
    Level::from_raw(unsafe { ffi::av_log_get_level() })
}

/**
    The registered log sink.

    Receives the emitting context's class item name when one can be
    derived, the severity, and the pre-rendered message with trailing
    newlines removed. Runs on whatever native thread emitted the event:
    keep it quick and do not emit through the native logger from inside
    it. Installing or resetting the sink from inside is allowed; the
    registration lock is not held while the sink runs.
*/
pub type Callback = Box<dyn Fn(Option<String>, Level, &str) + Send + Sync>;

type Sink = Arc<dyn Fn(Option<String>, Level, &str) + Send + Sync>;

static SINK: RwLock<Option<Sink>> = RwLock::new(None);

/**
    Install `callback` as the process-wide log sink.

    Exactly one sink is active at a time; installing replaces the previous
    one. The underlying library is not safe against concurrent
    reconfiguration, so install and reset from a single thread, before the
    pipeline starts.
*/
pub fn set_callback(callback: Callback) {
    *SINK.write() = Some(Arc::from(callback));
    unsafe { ffi::av_log_set_callback(Some(bridge)) };
}

/**
    Restore the native default log handler and drop the registered sink.
*/
pub fn reset_callback() {
    unsafe { ffi::av_log_set_callback(Some(ffi::av_log_default_callback)) };
    *SINK.write() = None;
}

/**
    Emit a message through the native logger.

    The message is passed as a single pre-rendered argument, never as a
    format string.
*/
pub fn log(level: Level, message: &str) {
    let Ok(message) = CString::new(message) else {
        return;
    };
    unsafe {
        ffi::av_log(
            ptr::null_mut(),
            level.into_raw(),
            c"%s\n".as_ptr(),
            message.as_ptr(),
        );
    }
}

unsafe extern "C" fn bridge(
    avcl: *mut c_void,
    level: c_int,
    fmt: *const c_char,
    vl: *mut ffi::__va_list_tag,
) {
    if level > unsafe { ffi::av_log_get_level() } {
        return;
    }

    // Render the varargs with the library's own formatter; the context
    // prefix is omitted because the class name travels separately.
    let mut line = [0 as c_char; 1024];
    let mut print_prefix: c_int = 0;
    unsafe {
        ffi::av_log_format_line(
            avcl,
            level,
            fmt,
            vl,
            line.as_mut_ptr(),
            line.len() as c_int,
            &mut print_prefix,
        );
    }
    let message = unsafe { CStr::from_ptr(line.as_ptr()) }.to_string_lossy();

    // Clone the sink out so the registration lock is released before it
    // runs; a sink reconfiguring the bridge would otherwise deadlock.
    let sink = SINK.read().clone();
    if let Some(sink) = sink {
        (*sink)(
            unsafe { class_name(avcl) },
            Level::from_raw(level),
            message.trim_end_matches(['\n', '\r']),
        );
    }
}

/// Class item name of the emitting context, per its `AVClass`.
unsafe fn class_name(avcl: *mut c_void) -> Option<String> {
    if avcl.is_null() {
        return None;
    }
    let class = unsafe { *avcl.cast::<*const ffi::AVClass>() };
    if class.is_null() {
        return None;
    }
    let item_name = unsafe { (*class).item_name }?;
    let name = unsafe { item_name(avcl) };
    if name.is_null() {
        return None;
    }
    Some(
        unsafe { CStr::from_ptr(name) }
            .to_string_lossy()
            .into_owned(),
    )
}
