/// Errors from the 1-Wire request/reply protocol.
#[derive(Debug, thiserror::Error)]
pub enum W1Error {
    /// Routing-layer error.
    #[error("connector error: {0}")]
    Connector(#[from] thermochron_connector::ConnectorError),

    /// The kernel reported a non-zero status for a sub-command.
    #[error("status error {0}")]
    Status(u8),

    /// A message unrelated to the outstanding request arrived.
    #[error("received unexpected unrelated response")]
    Unrelated,

    /// A reply arrived where none was expected.
    #[error("received unexpected request response")]
    UnexpectedReply,

    /// A message body is too short to parse.
    #[error("short 1-wire message ({len} bytes)")]
    ShortMessage { len: usize },

    /// A message carried an unknown type byte.
    #[error("unknown 1-wire message type {0}")]
    UnknownType(u8),

    /// A reply body is shorter than its command header.
    #[error("short 1-wire command reply ({len} bytes)")]
    ShortReply { len: usize },
}

pub type Result<T> = std::result::Result<T, W1Error>;
