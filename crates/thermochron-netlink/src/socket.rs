use std::io;
use std::os::fd::RawFd;

use tracing::debug;

use crate::codec;
use crate::error::{NetlinkError, Result};
use crate::traits::Transport;

/// Receive buffer size. W1 subsystem datagrams are far smaller; anything
/// larger surfaces as [`NetlinkError::Truncated`].
const RECV_BUF_SIZE: usize = 8192;

/// Initial envelope sequence number for a session.
const SEQ_COOKIE: u32 = 0xaffe;

/// A connection-less `AF_NETLINK` socket bound to the Connector protocol.
///
/// Bound with groups = 0 and pid = 0 so the kernel assigns the local
/// address. The socket is exclusively owned by its session and closed on
/// drop. Not safe for concurrent use; callers wanting parallelism open
/// independent sockets.
pub struct NetlinkSocket {
    fd: RawFd,
    seq: u32,
    pid: u32,
}

impl NetlinkSocket {
    /// Open and bind a datagram socket to the Connector netlink family.
    pub fn open() -> Result<Self> {
        let fd = unsafe {
            libc::socket(
                libc::AF_NETLINK,
                libc::SOCK_DGRAM,
                libc::NETLINK_CONNECTOR,
            )
        };
        if fd < 0 {
            return Err(NetlinkError::Socket(io::Error::last_os_error()));
        }

        let mut addr: libc::sockaddr_nl = unsafe { std::mem::zeroed() };
        addr.nl_family = libc::AF_NETLINK as libc::sa_family_t;
        addr.nl_groups = 0;
        addr.nl_pid = 0;
        let rc = unsafe {
            libc::bind(
                fd,
                &addr as *const libc::sockaddr_nl as *const libc::sockaddr,
                std::mem::size_of::<libc::sockaddr_nl>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            let err = io::Error::last_os_error();
            unsafe { libc::close(fd) };
            return Err(NetlinkError::Bind(err));
        }

        debug!(fd, "netlink socket open");
        Ok(Self {
            fd,
            seq: SEQ_COOKIE,
            pid: std::process::id(),
        })
    }
}

impl Transport for NetlinkSocket {
    fn send(&mut self, payload: &[u8]) -> Result<()> {
        let frame = codec::encode(self.seq, self.pid, payload);
        debug!(seq = self.seq, bytes = frame.len(), "netlink send");
        self.seq = self.seq.wrapping_add(1);

        let mut addr: libc::sockaddr_nl = unsafe { std::mem::zeroed() };
        addr.nl_family = libc::AF_NETLINK as libc::sa_family_t;
        let rc = unsafe {
            libc::sendto(
                self.fd,
                frame.as_ptr() as *const libc::c_void,
                frame.len(),
                0,
                &addr as *const libc::sockaddr_nl as *const libc::sockaddr,
                std::mem::size_of::<libc::sockaddr_nl>() as libc::socklen_t,
            )
        };
        if rc < 0 {
            return Err(NetlinkError::Send(io::Error::last_os_error()));
        }
        Ok(())
    }

    fn recv(&mut self) -> Result<Vec<u8>> {
        let mut buf = [0u8; RECV_BUF_SIZE];
        let rc = unsafe {
            libc::recv(
                self.fd,
                buf.as_mut_ptr() as *mut libc::c_void,
                buf.len(),
                libc::MSG_TRUNC,
            )
        };
        if rc < 0 {
            return Err(NetlinkError::Recv(io::Error::last_os_error()));
        }

        // With MSG_TRUNC the kernel reports the full datagram length even
        // when it did not fit the buffer.
        let size = rc as usize;
        if size > buf.len() {
            return Err(NetlinkError::Truncated { size });
        }

        let (header, payload) = codec::decode(&buf[..size])?;
        debug!(seq = header.seq, bytes = payload.len(), "netlink receive");
        Ok(payload)
    }
}

impl Drop for NetlinkSocket {
    fn drop(&mut self) {
        unsafe { libc::close(self.fd) };
    }
}
