use bytes::BufMut;

/// 1-Wire sub-command types, from drivers/w1/w1_netlink.h.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum CmdType {
    Read = 0,
    Write = 1,
    Search = 2,
    AlarmSearch = 3,
    Touch = 4,
    Reset = 5,
    SlaveAdd = 6,
    SlaveRemove = 7,
    ListSlaves = 8,
}

/// Header size of a serialised sub-command: cmd + res + len.
pub const CMD_HEADER_SIZE: usize = 4;

/// A 1-Wire sub-command. Several may concatenate into one message body;
/// reply bodies start with the same 4-byte header, which consumers skip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct W1Cmd {
    pub cmd: CmdType,
    pub data: Vec<u8>,
}

impl W1Cmd {
    pub fn new(cmd: CmdType, data: Vec<u8>) -> Self {
        Self { cmd, data }
    }

    /// Append the serialised form: `{cmd:u8, res:u8 = 0, len:u16, data}`.
    pub fn encode_into(&self, buf: &mut Vec<u8>) {
        buf.put_u8(self.cmd as u8);
        buf.put_u8(0);
        buf.put_u16_le(self.data.len() as u16);
        buf.put_slice(&self.data);
    }
}
