/*!
    Subtitle bridging helpers.
*/

use std::ffi::c_int;
use std::mem;
use std::ptr::NonNull;

use avbridge_types::{Error, Result};
use ffmpeg_next::Packet;
use ffmpeg_next::ffi::{self, AVCodecContext, AVSubtitle};
use ffmpeg_next::packet::Ref as PacketRef;

/**
    An owned `AVSubtitle`.

    Subtitle decoding fills a caller-allocated struct and attaches rects
    the native side owns; this wrapper keeps the allocation and the
    mandatory `avsubtitle_free` together so neither leg can be forgotten.
*/
pub struct Subtitle {
    ptr: NonNull<AVSubtitle>,
}

impl Subtitle {
    /**
        Allocate a zeroed subtitle.

        # Errors

        `Error::Allocation` when the native allocator returns null.
    */
    pub fn new() -> Result<Self> {
        let ptr = unsafe { ffi::av_mallocz(mem::size_of::<AVSubtitle>()) };
        NonNull::new(ptr.cast::<AVSubtitle>())
            .map(|ptr| Self { ptr })
            .ok_or(Error::Allocation)
    }

    /**
        The raw struct, for native calls that read it.
    */
    pub fn as_ptr(&self) -> *const AVSubtitle {
        self.ptr.as_ptr()
    }

    /**
        The raw struct, for native calls that fill it.
    */
    pub fn as_mut_ptr(&mut self) -> *mut AVSubtitle {
        self.ptr.as_ptr()
    }

    /**
        Decode `packet` into this subtitle.

        Returns `Ok(true)` when the decoder produced a subtitle, `Ok(false)`
        when the packet held none.

        # Safety

        `ctx` must point to a valid, opened subtitle decoder context.

        # Errors

        The native status is propagated unmodified.
    */
    pub unsafe fn decode_from(&mut self, ctx: *mut AVCodecContext, packet: &Packet) -> Result<bool> {
        let mut got: c_int = 0;
        let ret = unsafe {
            ffi::avcodec_decode_subtitle2(ctx, self.ptr.as_ptr(), &mut got, packet.as_ptr().cast_mut())
        };
        if ret < 0 {
            return Err(Error::from_raw(ret));
        }
        Ok(got != 0)
    }

    /**
        Encode this subtitle into `buf`, returning the number of bytes
        used.

        # Safety

        `ctx` must point to a valid, opened subtitle encoder context.

        # Errors

        The native status is propagated unmodified.
    */
    pub unsafe fn encode_into(&self, ctx: *mut AVCodecContext, buf: &mut [u8]) -> Result<usize> {
        let ret = unsafe {
            ffi::avcodec_encode_subtitle(ctx, buf.as_mut_ptr(), buf.len() as c_int, self.ptr.as_ptr())
        };
        if ret < 0 {
            return Err(Error::from_raw(ret));
        }
        Ok(ret as usize)
    }
}

impl Drop for Subtitle {
    fn drop(&mut self) {
        unsafe {
            ffi::avsubtitle_free(self.ptr.as_ptr());
            ffi::av_free(self.ptr.as_ptr().cast());
        }
    }
}
