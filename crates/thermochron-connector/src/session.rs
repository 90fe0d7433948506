use tracing::debug;

use thermochron_netlink::{NetlinkSocket, Transport};

use crate::codec::{CbId, ConnectorMsg};
use crate::error::{ConnectorError, Result};

/// Initial connector sequence number for a session.
const SEQ_COOKIE: u32 = 0xdead;

/// Classification of a received message against an outstanding request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Response {
    /// Bears `ack == request seq + 1`.
    Reply,
    /// Mirrors the request's own sequence number.
    Echo,
    /// Belongs to no outstanding request.
    Unrelated,
}

/// Correlation token for an in-flight request.
#[derive(Debug, Clone, Copy)]
pub struct RequestId {
    seq: u32,
}

impl RequestId {
    /// Classify a received message against this request.
    pub fn classify(&self, msg: &ConnectorMsg) -> Response {
        if msg.ack == self.seq.wrapping_add(1) {
            Response::Reply
        } else if msg.seq == self.seq {
            Response::Echo
        } else {
            Response::Unrelated
        }
    }
}

/// A session with one kernel Connector subsystem.
///
/// Owns the transport; the sequence counter starts at a session cookie
/// and is strictly monotonic. One outstanding request at a time.
#[derive(Debug)]
pub struct Connector<T> {
    transport: T,
    id: CbId,
    seq: u32,
}

impl Connector<NetlinkSocket> {
    /// Open a session against a subsystem over a fresh netlink socket.
    pub fn open(id: CbId) -> Result<Self> {
        Ok(Self::new(NetlinkSocket::open()?, id))
    }
}

impl<T: Transport> Connector<T> {
    /// Wrap an existing transport.
    pub fn new(transport: T, id: CbId) -> Self {
        Self {
            transport,
            id,
            seq: SEQ_COOKIE,
        }
    }

    /// Send a payload to the subsystem; returns the correlation token.
    pub fn send(&mut self, data: &[u8]) -> Result<RequestId> {
        let msg = ConnectorMsg {
            id: self.id,
            seq: self.seq,
            ack: 0,
            flags: 0,
            data: data.to_vec(),
        };
        debug!(seq = msg.seq, bytes = data.len(), "connector send");
        self.transport.send(&msg.encode())?;

        let token = RequestId { seq: self.seq };
        self.seq = self.seq.wrapping_add(1);
        Ok(token)
    }

    /// Receive one message and classify it against the given request.
    pub fn receive(&mut self, token: &RequestId) -> Result<(Vec<u8>, Response)> {
        let msg = ConnectorMsg::decode(&self.transport.recv()?)?;
        let response = token.classify(&msg);
        debug!(seq = msg.seq, ack = msg.ack, ?response, "connector receive");
        Ok((msg.data, response))
    }

    /// Send a payload and require a single reply.
    pub fn request(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        let token = self.send(data)?;
        let (body, response) = self.receive(&token)?;
        if response != Response::Reply {
            return Err(ConnectorError::UnexpectedResponse(response));
        }
        Ok(body)
    }
}
