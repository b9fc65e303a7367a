/*!
    Codec-layer bridging for the avbridge crate ecosystem.

    Covers the codec seams that cannot be expressed directly across the
    FFI boundary:

    - [`install_format_chooser`] / [`reset_format_chooser`] relay the
      decoder's pixel-format negotiation to application policy through a
      fixed C trampoline.
    - [`Subtitle`] pairs the subtitle struct allocation with its mandatory
      native free.
    - [`option`] reads and writes named options on AVOptions-enabled
      objects.
*/

pub use avbridge_types::{Error, PixelFormat, Result};

mod negotiate;
pub mod option;
mod subtitle;

pub use negotiate::{FormatChooser, install_format_chooser, reset_format_chooser};
pub use subtitle::Subtitle;
