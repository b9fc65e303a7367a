/*!
    Raw format newtypes.

    The bridge hands formats across the FFI boundary as plain values; these
    newtypes keep call sites typed without re-enumerating FFmpeg's format
    tables, and stay layout-compatible with the raw enums so slices of them
    can view native candidate lists directly.
*/

use ffmpeg_next::ffi::{self, AVPixelFormat, AVSampleFormat};

/**
    A pixel format value as used by the native decoder.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct PixelFormat(AVPixelFormat);

impl PixelFormat {
    /// The sentinel value terminating native candidate lists.
    pub const NONE: Self = Self(AVPixelFormat::AV_PIX_FMT_NONE);

    /**
        Wrap a raw pixel format value.
    */
    pub const fn new(raw: AVPixelFormat) -> Self {
        Self(raw)
    }

    /**
        The raw value, for handing back to native calls.
    */
    pub const fn into_raw(self) -> AVPixelFormat {
        self.0
    }

    /**
        Returns true if this is the sentinel "none" value.
    */
    pub fn is_none(self) -> bool {
        self.0 == AVPixelFormat::AV_PIX_FMT_NONE
    }
}

impl From<AVPixelFormat> for PixelFormat {
    fn from(raw: AVPixelFormat) -> Self {
        Self(raw)
    }
}

impl From<PixelFormat> for AVPixelFormat {
    fn from(format: PixelFormat) -> Self {
        format.0
    }
}

/**
    An audio sample format value.

    Whether samples are packed (channels interleaved in one plane) or
    planar (one plane per channel) is a property of the format; consumers
    query it here instead of branching on format identity.
*/
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(transparent)]
pub struct SampleFormat(AVSampleFormat);

impl SampleFormat {
    /// The sentinel "none" value.
    pub const NONE: Self = Self(AVSampleFormat::AV_SAMPLE_FMT_NONE);
    /// Unsigned 8-bit, packed.
    pub const U8: Self = Self(AVSampleFormat::AV_SAMPLE_FMT_U8);
    /// Signed 16-bit, packed.
    pub const S16: Self = Self(AVSampleFormat::AV_SAMPLE_FMT_S16);
    /// Signed 16-bit, planar.
    pub const S16P: Self = Self(AVSampleFormat::AV_SAMPLE_FMT_S16P);
    /// 32-bit float, packed.
    pub const FLT: Self = Self(AVSampleFormat::AV_SAMPLE_FMT_FLT);
    /// 32-bit float, planar.
    pub const FLTP: Self = Self(AVSampleFormat::AV_SAMPLE_FMT_FLTP);

    /**
        Wrap a raw sample format value.
    */
    pub const fn new(raw: AVSampleFormat) -> Self {
        Self(raw)
    }

    /**
        The raw value, for handing back to native calls.
    */
    pub const fn into_raw(self) -> AVSampleFormat {
        self.0
    }

    /**
        Returns true if the format stores each channel in its own plane.
    */
    pub fn is_planar(self) -> bool {
        unsafe { ffi::av_sample_fmt_is_planar(self.0) == 1 }
    }

    /**
        Bytes per single sample, or 0 for the sentinel value.
    */
    pub fn bytes_per_sample(self) -> usize {
        unsafe { ffi::av_get_bytes_per_sample(self.0) as usize }
    }
}

impl From<AVSampleFormat> for SampleFormat {
    fn from(raw: AVSampleFormat) -> Self {
        Self(raw)
    }
}

impl From<SampleFormat> for AVSampleFormat {
    fn from(format: SampleFormat) -> Self {
        format.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pixel_format_sentinel() {
        assert!(PixelFormat::NONE.is_none());
        assert!(!PixelFormat::new(AVPixelFormat::AV_PIX_FMT_YUV420P).is_none());
    }

    #[test]
    fn sample_format_planarity() {
        assert!(!SampleFormat::S16.is_planar());
        assert!(SampleFormat::S16P.is_planar());
        assert!(!SampleFormat::FLT.is_planar());
        assert!(SampleFormat::FLTP.is_planar());
    }

    #[test]
    fn sample_format_bytes_per_sample() {
        assert_eq!(SampleFormat::U8.bytes_per_sample(), 1);
        assert_eq!(SampleFormat::S16.bytes_per_sample(), 2);
        assert_eq!(SampleFormat::FLT.bytes_per_sample(), 4);
        assert_eq!(SampleFormat::NONE.bytes_per_sample(), 0);
    }

    #[test]
    fn raw_roundtrip() {
        let raw = AVSampleFormat::AV_SAMPLE_FMT_S16;
        assert_eq!(SampleFormat::new(raw).into_raw(), raw);
        assert_eq!(SampleFormat::from(raw), SampleFormat::S16);
    }
}
