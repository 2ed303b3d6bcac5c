//! Packet dispatch and the application-facing telemetry link.
//!
//! This is the "just works" layer. A [`Link`] declares fields, writes
//! values, ships records and schema announcements, and turns inbound radio
//! frames back into the latest record plus `updated`/`synced` status.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod link;

pub use config::LinkConfig;
pub use dispatch::Dispatcher;
pub use error::{PeerError, Result};
pub use link::{FrameOutcome, Link};
