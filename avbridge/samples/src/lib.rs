/*!
    Audio sample buffer bridging for the avbridge crate ecosystem.

    Decoded audio arrives either packed (one plane, channels interleaved)
    or planar (one plane per channel). This crate flattens plane data into
    a single caller-supplied buffer and points audio frames at caller-held
    buffers, in both directions driven entirely by the native sizing rule
    so no per-format branching exists here.

    # Operations

    - [`copy_to_buffer`] - flatten plane data into one contiguous buffer
    - [`fill_frame`] - attach a flat buffer to an audio frame's planes
*/

pub use avbridge_types::{Error, Result, SampleFormat};

mod buffer;
mod frame;

pub use buffer::copy_to_buffer;
pub use frame::fill_frame;
