//! 1-Wire protocol over the kernel Connector.
//!
//! A single user request fans out into one or more sub-commands bundled in
//! one message body. The kernel acknowledges every sub-command with a
//! status echo and answers reads with reply messages; the two streams
//! interleave in arbitrary order. [`Bus`] hides that dance behind four
//! operations: list masters, list a master's slaves, read from a slave,
//! write to a slave.

pub mod bus;
pub mod cmd;
pub mod error;
pub mod msg;

pub use bus::{Bus, PAGE_READ_SIZE};
pub use cmd::{CmdType, W1Cmd, CMD_HEADER_SIZE};
pub use error::{Result, W1Error};
pub use msg::{Master, MsgType, SlaveId, Target, W1Msg};
