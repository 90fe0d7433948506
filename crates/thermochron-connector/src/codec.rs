use bytes::{Buf, BufMut};

use crate::error::{ConnectorError, Result};

/// Connector header: idx (4) + val (4) + seq (4) + ack (4) + len (2) + flags (2).
pub const HEADER_SIZE: usize = 20;

/// Identifies a kernel Connector subsystem, from uapi/linux/connector.h.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CbId {
    pub idx: u32,
    pub val: u32,
}

/// The 1-Wire subsystem id.
pub const W1: CbId = CbId { idx: 3, val: 1 };

/// A Connector message.
///
/// The wire `len` field is computed on encode and checked on decode; it
/// counts the trailing payload bytes only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectorMsg {
    pub id: CbId,
    pub seq: u32,
    pub ack: u32,
    pub flags: u16,
    pub data: Vec<u8>,
}

impl ConnectorMsg {
    pub fn encode(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(HEADER_SIZE + self.data.len());
        buf.put_u32_le(self.id.idx);
        buf.put_u32_le(self.id.val);
        buf.put_u32_le(self.seq);
        buf.put_u32_le(self.ack);
        buf.put_u16_le(self.data.len() as u16);
        buf.put_u16_le(self.flags);
        buf.put_slice(&self.data);
        buf
    }

    pub fn decode(bs: &[u8]) -> Result<Self> {
        if bs.len() < HEADER_SIZE {
            return Err(ConnectorError::ShortFrame { len: bs.len() });
        }

        let mut buf = bs;
        let id = CbId {
            idx: buf.get_u32_le(),
            val: buf.get_u32_le(),
        };
        let seq = buf.get_u32_le();
        let ack = buf.get_u32_le();
        let len = buf.get_u16_le() as usize;
        let flags = buf.get_u16_le();

        if buf.len() < len {
            return Err(ConnectorError::LengthMismatch {
                expected: len,
                actual: buf.len(),
            });
        }

        Ok(Self {
            id,
            seq,
            ack,
            flags,
            data: buf[..len].to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_connector_message() {
        let mut bs = vec![14, 0, 0, 0, 86, 4, 0, 0];
        bs.extend_from_slice(&[57, 48, 0, 0]);
        bs.extend_from_slice(&[58, 48, 0, 0]);
        bs.extend_from_slice(&[10, 0, 0, 0]);
        bs.extend_from_slice(b"test reply");

        let msg = ConnectorMsg::decode(&bs).unwrap();
        assert_eq!(msg.id, CbId { idx: 14, val: 1110 });
        assert_eq!(msg.seq, 12345);
        assert_eq!(msg.ack, 12346);
        assert_eq!(msg.flags, 0);
        assert_eq!(msg.data, b"test reply");
    }

    #[test]
    fn roundtrip() {
        let msg = ConnectorMsg {
            id: W1,
            seq: 0xdead,
            ack: 0,
            flags: 0,
            data: b"body".to_vec(),
        };
        assert_eq!(ConnectorMsg::decode(&msg.encode()).unwrap(), msg);
    }

    #[test]
    fn short_payload_rejected() {
        let msg = ConnectorMsg {
            id: W1,
            seq: 1,
            ack: 0,
            flags: 0,
            data: b"body".to_vec(),
        };
        let mut bs = msg.encode();
        bs.truncate(bs.len() - 1);
        assert!(matches!(
            ConnectorMsg::decode(&bs),
            Err(ConnectorError::LengthMismatch {
                expected: 4,
                actual: 3
            })
        ));
    }

    #[test]
    fn short_header_rejected() {
        assert!(matches!(
            ConnectorMsg::decode(&[0; 8]),
            Err(ConnectorError::ShortFrame { len: 8 })
        ));
    }
}
