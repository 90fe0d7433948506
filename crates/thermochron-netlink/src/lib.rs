//! Netlink datagram transport for the kernel Connector subsystem.
//!
//! This is the lowest layer of thermochron. It owns the `AF_NETLINK`
//! socket and the envelope framing: every payload travels inside a
//! little-endian Netlink header, and received datagrams are unframed and
//! stripped of their trailing padding before anything above sees them.
//!
//! Everything else builds on the [`Transport`] trait provided here;
//! [`NetlinkSocket`] is the production implementation.

pub mod codec;
pub mod error;
pub mod socket;
pub mod traits;

pub use codec::{decode, encode, NetlinkHeader, HEADER_SIZE, NLMSG_DONE};
pub use error::{NetlinkError, Result};
pub use socket::NetlinkSocket;
pub use traits::Transport;
