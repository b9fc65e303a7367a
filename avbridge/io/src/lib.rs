/*!
    Custom I/O, cancellation and log bridging for the avbridge crate
    ecosystem.

    Three native seams live here, all of the same shape: the native side
    accepts a fixed C function pointer plus an opaque context, and the
    fixed trampoline resolves the opaque back to Rust state on every call.

    - [`IoContext`] feeds demuxers and muxers from any `Read`/`Write` +
      `Seek` value.
    - [`Interrupter`] gives blocking native I/O a cooperative cancellation
      flag to poll.
    - [`log`] routes the native log stream, pre-rendered, into a single
      registered Rust sink.
*/

pub use avbridge_types::{Error, Result};

mod context;
mod interrupt;
pub mod log;

pub use context::{IoContext, IoContextBuilder};
pub use interrupt::Interrupter;
