//! Byte-sink abstraction for small-MTU radio links.
//!
//! The protocol core never talks to a radio directly. It pushes bounded
//! frames into a [`FrameSink`] and receives frames through whatever entry
//! point the driver calls. This crate provides:
//! - The [`FrameSink`] contract, plus [`FnSink`] for driver callbacks
//! - [`MemorySink`] for loopback setups and tests
//! - [`WriteSink`] for any blocking `io::Write` stream (serial ports, pipes)
//!
//! This is the lowest layer of telelink. Everything else builds on top of
//! the [`FrameSink`] trait provided here.

pub mod error;
pub mod memory;
pub mod stream;
pub mod traits;

pub use error::{Result, TransportError};
pub use memory::{memory_sink, FrameTap, MemorySink};
pub use stream::WriteSink;
pub use traits::{FnSink, FrameSink, MAX_FRAME_LEN};
