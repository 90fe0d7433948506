//! Routing layer for the kernel Connector message multiplexer.
//!
//! The Connector multiplexes several kernel subsystems over one netlink
//! socket. Each message carries an inner header naming the target
//! subsystem `(idx, val)` plus `seq`/`ack` words for correlation: the
//! kernel mirrors every user request back as an *echo* (same `seq`) and
//! answers with one or more *replies* (`ack = seq + 1`), in arbitrary
//! order. [`Connector`] tags outgoing requests with a monotonic sequence
//! and classifies whatever comes back.

pub mod codec;
pub mod error;
pub mod session;

pub use codec::{CbId, ConnectorMsg, HEADER_SIZE, W1};
pub use error::{ConnectorError, Result};
pub use session::{Connector, RequestId, Response};
