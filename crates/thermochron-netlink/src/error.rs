/// Errors that can occur on the Netlink transport.
#[derive(Debug, thiserror::Error)]
pub enum NetlinkError {
    /// Creating the `AF_NETLINK` socket failed.
    #[error("could not create netlink socket: {0}")]
    Socket(#[source] std::io::Error),

    /// Binding the socket failed.
    #[error("could not bind netlink socket: {0}")]
    Bind(#[source] std::io::Error),

    /// Transmitting a datagram failed.
    #[error("netlink send failed: {0}")]
    Send(#[source] std::io::Error),

    /// Receiving a datagram failed.
    #[error("netlink receive failed: {0}")]
    Recv(#[source] std::io::Error),

    /// The kernel sent a datagram larger than the receive buffer.
    #[error("netlink datagram truncated ({size} bytes exceeds receive buffer)")]
    Truncated { size: usize },

    /// The datagram is too short to hold a message header.
    #[error("short netlink frame ({len} bytes)")]
    ShortFrame { len: usize },

    /// Non-zero bytes found after the framed payload.
    #[error("truncated data after netlink payload")]
    TrailingData,
}

pub type Result<T> = std::result::Result<T, NetlinkError>;
