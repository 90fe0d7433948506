use bytes::{Buf, BufMut};

use crate::error::{NetlinkError, Result};

/// Netlink header: length (4) + type (2) + flags (2) + seq (4) + pid (4).
pub const HEADER_SIZE: usize = 16;

/// `NLMSG_DONE`, the only message type this transport emits.
pub const NLMSG_DONE: u16 = libc::NLMSG_DONE as u16;

/// A parsed Netlink envelope header.
///
/// `len` counts the header itself plus the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NetlinkHeader {
    pub len: u32,
    pub msg_type: u16,
    pub flags: u16,
    pub seq: u32,
    pub pid: u32,
}

/// Frame a payload for transmission.
///
/// Wire format (little-endian):
/// ```text
/// ┌──────────┬──────────┬───────────┬──────────┬──────────┬─────────┐
/// │ len (4B) │ type (2B)│ flags (2B)│ seq (4B) │ pid (4B) │ payload │
/// └──────────┴──────────┴───────────┴──────────┴──────────┴─────────┘
/// ```
pub fn encode(seq: u32, pid: u32, payload: &[u8]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(HEADER_SIZE + payload.len());
    buf.put_u32_le((HEADER_SIZE + payload.len()) as u32);
    buf.put_u16_le(NLMSG_DONE);
    buf.put_u16_le(0);
    buf.put_u32_le(seq);
    buf.put_u32_le(pid);
    buf.put_slice(payload);
    buf
}

/// Unframe one received datagram.
///
/// Returns the header and the payload bytes. A datagram may end before the
/// advertised length; the payload is whatever is present. The kernel pads
/// datagrams to a 4-byte boundary, so bytes past the advertised length are
/// tolerated as long as they are zero.
pub fn decode(datagram: &[u8]) -> Result<(NetlinkHeader, Vec<u8>)> {
    if datagram.len() < HEADER_SIZE {
        return Err(NetlinkError::ShortFrame {
            len: datagram.len(),
        });
    }

    let mut buf = datagram;
    let header = NetlinkHeader {
        len: buf.get_u32_le(),
        msg_type: buf.get_u16_le(),
        flags: buf.get_u16_le(),
        seq: buf.get_u32_le(),
        pid: buf.get_u32_le(),
    };

    if (header.len as usize) < HEADER_SIZE {
        return Err(NetlinkError::ShortFrame {
            len: header.len as usize,
        });
    }

    let end = (header.len as usize - HEADER_SIZE).min(buf.len());
    let payload = buf[..end].to_vec();
    if buf[end..].iter().any(|&b| b != 0) {
        return Err(NetlinkError::TrailingData);
    }

    Ok((header, payload))
}
