/*!
    Error types for the avbridge crate ecosystem.
*/

use std::ffi::{CStr, c_char};
use std::fmt;

use ffmpeg_next::ffi;

/**
    Result type for the avbridge crate ecosystem.
*/
pub type Result<T> = std::result::Result<T, Error>;

/**
    Error type for the avbridge crate ecosystem.

    The native libraries report failures as negative status codes; this type
    carries them across the boundary without reinterpretation. The only
    errors the ecosystem raises itself are argument rejections and
    allocation failures.
*/
#[derive(Debug)]
pub enum Error {
    /// An argument combination the native sizing rules reject, or a buffer
    /// that cannot hold the requested data.
    InvalidArgument { message: String },
    /// A status code propagated unmodified from a native call.
    Ffmpeg { code: i32 },
    /// The native allocator could not satisfy a request.
    Allocation,
}

impl Error {
    /**
        Create an invalid argument error with the given message.
    */
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    /**
        Wrap a negative status code returned by a native call.
    */
    pub fn from_raw(code: i32) -> Self {
        Self::Ffmpeg { code }
    }

    /**
        The native status code for this error.

        Propagated codes are returned unmodified; errors raised by the
        ecosystem itself map to the closest `AVERROR` value.
    */
    pub fn raw(&self) -> i32 {
        match self {
            Self::InvalidArgument { .. } => ffi::AVERROR(libc::EINVAL),
            Self::Ffmpeg { code } => *code,
            Self::Allocation => ffi::AVERROR(libc::ENOMEM),
        }
    }

    /**
        Returns true if this is an invalid argument error.
    */
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { message } => write!(f, "invalid argument: {message}"),
            Self::Ffmpeg { code } => write!(f, "ffmpeg error {}: {}", code, strerror(*code)),
            Self::Allocation => write!(f, "allocation failed"),
        }
    }
}

impl std::error::Error for Error {}

/**
    Render a native status code through `av_strerror`.
*/
fn strerror(code: i32) -> String {
    let mut buf = [0 as c_char; 64];
    let ret = unsafe { ffi::av_strerror(code, buf.as_mut_ptr(), buf.len()) };
    if ret < 0 {
        return format!("unknown error code {code}");
    }
    unsafe { CStr::from_ptr(buf.as_ptr()) }
        .to_string_lossy()
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_argument_maps_to_einval() {
        let err = Error::invalid_argument("too small");
        assert_eq!(err.raw(), ffi::AVERROR(libc::EINVAL));
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn allocation_maps_to_enomem() {
        assert_eq!(Error::Allocation.raw(), ffi::AVERROR(libc::ENOMEM));
    }

    #[test]
    fn native_codes_pass_through_unmodified() {
        let code = ffi::AVERROR(libc::EAGAIN);
        assert_eq!(Error::from_raw(code).raw(), code);
    }

    #[test]
    fn display_includes_message() {
        let err = Error::invalid_argument("destination too small");
        assert_eq!(err.to_string(), "invalid argument: destination too small");
    }
}
