/// Errors from the iButton device layer.
#[derive(Debug, thiserror::Error)]
pub enum ButtonError {
    /// 1-Wire protocol error.
    #[error("1-wire error: {0}")]
    W1(#[from] thermochron_w1::W1Error),

    /// The kernel reported no bus masters.
    #[error("no bus masters found")]
    NoMaster,

    /// No slave with the iButton family code was found.
    #[error("no ibuttons found")]
    NoButton,

    /// A memory page failed its CRC check.
    #[error("crc check failed on page {page}")]
    Crc { page: usize },

    /// The device returned fewer bytes than requested.
    #[error("short device read ({got} bytes, wanted {wanted})")]
    ShortRead { got: usize, wanted: usize },

    /// The scratchpad transfer status byte did not confirm the write.
    #[error("scratchpad verification failed (transfer status {got:#04x})")]
    ScratchpadVerify { got: u8 },

    /// The mission log cannot be decoded for this device model.
    #[error("unsupported device model {0}")]
    Unsupported(String),

    /// A status timestamp did not form a valid calendar date.
    #[error("invalid device timestamp")]
    InvalidTimestamp,
}

pub type Result<T> = std::result::Result<T, ButtonError>;
