use std::fmt;

use bytes::{Buf, BufMut};

use crate::error::{Result, W1Error};

/// 1-Wire message types, from drivers/w1/w1_netlink.h.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum MsgType {
    SlaveAdd = 0,
    SlaveRemove = 1,
    MasterAdd = 2,
    MasterRemove = 3,
    MasterCmd = 4,
    SlaveCmd = 5,
    ListMasters = 6,
}

impl TryFrom<u8> for MsgType {
    type Error = W1Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::SlaveAdd),
            1 => Ok(Self::SlaveRemove),
            2 => Ok(Self::MasterAdd),
            3 => Ok(Self::MasterRemove),
            4 => Ok(Self::MasterCmd),
            5 => Ok(Self::SlaveCmd),
            6 => Ok(Self::ListMasters),
            other => Err(W1Error::UnknownType(other)),
        }
    }
}

/// A 1-Wire bus controller, identified by its kernel id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Master {
    pub id: u32,
}

/// A 1-Wire slave device id: family code, unique id, crc.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaveId {
    pub family: u8,
    pub uid: [u8; 6],
    pub crc: u8,
}

impl SlaveId {
    /// True if this slave belongs to the given device family.
    pub fn is_family(&self, family: u8) -> bool {
        self.family == family
    }

    pub fn from_bytes(bs: &[u8; 8]) -> Self {
        let mut uid = [0u8; 6];
        uid.copy_from_slice(&bs[1..7]);
        Self {
            family: bs[0],
            uid,
            crc: bs[7],
        }
    }

    pub fn to_bytes(&self) -> [u8; 8] {
        let mut bs = [0u8; 8];
        bs[0] = self.family;
        bs[1..7].copy_from_slice(&self.uid);
        bs[7] = self.crc;
        bs
    }
}

impl fmt::Display for SlaveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}-", self.family)?;
        for b in self.uid.iter().rev() {
            write!(f, "{b:02x}")?;
        }
        Ok(())
    }
}

/// Addressing for the 8-byte id region of a message.
///
/// Message construction fills the region based on the variant; parsing
/// picks the interpretation from the message type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// No device; the id region is all zeros.
    None,
    /// A bus master: its id word plus a reserved word.
    Master(u32),
    /// A slave device descriptor.
    Slave(SlaveId),
}

/// A 1-Wire message, from drivers/w1/w1_netlink.h.
///
/// Wire format (little-endian):
/// ```text
/// ┌───────────┬─────────────┬──────────┬──────────┬────────────┐
/// │ type (1B) │ status (1B) │ len (2B) │ id (8B)  │ data (len) │
/// └───────────┴─────────────┴──────────┴──────────┴────────────┘
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct W1Msg {
    pub msg_type: MsgType,
    pub status: u8,
    pub target: Target,
    pub data: Vec<u8>,
}

/// Message header size: type + status + len + the 8-byte id region.
pub const MSG_HEADER_SIZE: usize = 12;

impl W1Msg {
    pub fn new(msg_type: MsgType, target: Target, data: Vec<u8>) -> Self {
        Self {
            msg_type,
            status: 0,
            target,
            data,
        }
    }

    /// Serialise for transmission. The 8-byte id region is always emitted.
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(MSG_HEADER_SIZE + self.data.len());
        buf.put_u8(self.msg_type as u8);
        buf.put_u8(self.status);
        buf.put_u16_le(self.data.len() as u16);
        match self.target {
            Target::None => {
                buf.put_u32_le(0);
                buf.put_u32_le(0);
            }
            Target::Master(id) => {
                buf.put_u32_le(id);
                buf.put_u32_le(0);
            }
            Target::Slave(slave) => buf.put_slice(&slave.to_bytes()),
        }
        buf.put_slice(&self.data);
        buf
    }

    pub fn decode(bs: &[u8]) -> Result<Self> {
        if bs.len() < MSG_HEADER_SIZE {
            return Err(W1Error::ShortMessage { len: bs.len() });
        }

        let mut buf = bs;
        let msg_type = MsgType::try_from(buf.get_u8())?;
        let status = buf.get_u8();
        let len = buf.get_u16_le() as usize;

        // the id region is a master id or a slave descriptor depending
        // on the message type
        let target = match msg_type {
            MsgType::SlaveAdd | MsgType::SlaveRemove | MsgType::SlaveCmd => {
                let mut id = [0u8; 8];
                buf.copy_to_slice(&mut id);
                Target::Slave(SlaveId::from_bytes(&id))
            }
            MsgType::MasterAdd | MsgType::MasterRemove | MsgType::MasterCmd => {
                let id = buf.get_u32_le();
                buf.advance(4);
                Target::Master(id)
            }
            MsgType::ListMasters => {
                buf.advance(8);
                Target::None
            }
        };

        if buf.len() < len {
            return Err(W1Error::ShortMessage { len: bs.len() });
        }

        Ok(Self {
            msg_type,
            status,
            target,
            data: buf[..len].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn slave() -> SlaveId {
        SlaveId {
            family: 0x41,
            uid: [1, 2, 3, 4, 5, 6],
            crc: 0x7f,
        }
    }

    #[test]
    fn roundtrip_slave_cmd() {
        let msg = W1Msg::new(MsgType::SlaveCmd, Target::Slave(slave()), b"cmd".to_vec());
        assert_eq!(W1Msg::decode(&msg.encode()).unwrap(), msg);
    }

    #[test]
    fn roundtrip_master_cmd() {
        let msg = W1Msg::new(MsgType::MasterCmd, Target::Master(7), b"x".to_vec());
        assert_eq!(W1Msg::decode(&msg.encode()).unwrap(), msg);
    }

    #[test]
    fn roundtrip_list_masters() {
        let msg = W1Msg::new(MsgType::ListMasters, Target::None, Vec::new());
        assert_eq!(W1Msg::decode(&msg.encode()).unwrap(), msg);
    }

    #[test]
    fn id_region_is_always_emitted() {
        let msg = W1Msg::new(MsgType::ListMasters, Target::None, Vec::new());
        assert_eq!(msg.encode().len(), MSG_HEADER_SIZE);
    }

    #[test]
    fn unknown_type_rejected() {
        let mut bs = W1Msg::new(MsgType::ListMasters, Target::None, Vec::new()).encode();
        bs[0] = 99;
        assert!(matches!(W1Msg::decode(&bs), Err(W1Error::UnknownType(99))));
    }

    #[test]
    fn slave_descriptor_roundtrip() {
        let s = slave();
        assert_eq!(SlaveId::from_bytes(&s.to_bytes()), s);
        assert!(s.is_family(0x41));
        assert!(!s.is_family(0x28));
    }
}
