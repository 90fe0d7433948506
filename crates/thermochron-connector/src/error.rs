use crate::session::Response;

/// Errors that can occur in the Connector routing layer.
#[derive(Debug, thiserror::Error)]
pub enum ConnectorError {
    /// Transport-level error.
    #[error("transport error: {0}")]
    Netlink(#[from] thermochron_netlink::NetlinkError),

    /// The datagram is too short to hold a connector header.
    #[error("short connector frame ({len} bytes)")]
    ShortFrame { len: usize },

    /// The header length field disagrees with the payload.
    #[error("connector length mismatch (header says {expected}, got {actual})")]
    LengthMismatch { expected: usize, actual: usize },

    /// A request saw something other than a reply.
    #[error("unexpected response type {0:?}")]
    UnexpectedResponse(Response),
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
