/*!
    Shared types for the avbridge crate ecosystem.

    This crate defines the vocabulary that crosses crate boundaries: the
    ecosystem's error type, thin newtypes over the raw format enums, and
    the named channel layouts the C headers only provide as macros.

    # Core Types

    - [`Error`] and [`Result`] - native-status-code error handling
    - [`PixelFormat`] and [`SampleFormat`] - raw format newtypes
    - [`ChannelLayout`] - the bridged named channel layout table
*/

mod channel_layout;
mod error;
mod format;

pub use channel_layout::ChannelLayout;
pub use error::{Error, Result};
pub use format::{PixelFormat, SampleFormat};
