/*!
    Audio frame fill helper.
*/

use std::ffi::c_int;

use avbridge_types::{Error, Result, SampleFormat};
use ffmpeg_next::{ffi, frame};

/**
    Point an audio frame's data planes at a caller-held flat buffer.

    Thin wrapper over `avcodec_fill_audio_frame`: the native call derives
    the plane layout from the channel count, format and alignment, and sets
    the frame's data pointers and line sizes into `buf` without copying.
    The frame's `nb_samples` must already be set.

    Ownership of `buf` stays with the caller; it must stay alive and
    unmoved for as long as the frame references it.

    Returns the native call's non-negative result.

    # Errors

    The native status is propagated unmodified.
*/
pub fn fill_frame(
    frame: &mut frame::Audio,
    nb_channels: i32,
    format: SampleFormat,
    buf: &[u8],
    align: i32,
) -> Result<i32> {
    let ret = unsafe {
        ffi::avcodec_fill_audio_frame(
            frame.as_mut_ptr(),
            nb_channels as c_int,
            format.into_raw(),
            buf.as_ptr(),
            buf.len() as c_int,
            align as c_int,
        )
    };
    if ret < 0 {
        return Err(Error::from_raw(ret));
    }
    Ok(ret)
}
