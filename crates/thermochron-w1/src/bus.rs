use tracing::debug;

use thermochron_connector::{Connector, Response, W1};
use thermochron_netlink::{NetlinkSocket, Transport};

use crate::cmd::{CmdType, W1Cmd, CMD_HEADER_SIZE};
use crate::error::{Result, W1Error};
use crate::msg::{Master, MsgType, SlaveId, Target, W1Msg};

/// Bytes carried by one memory-page read sub-command: 32 data bytes plus
/// the trailing 16-bit CRC.
pub const PAGE_READ_SIZE: usize = 34;

/// A session with the kernel's 1-Wire subsystem.
#[derive(Debug)]
pub struct Bus<T> {
    connector: Connector<T>,
}

impl Bus<NetlinkSocket> {
    /// Open a 1-Wire session over a fresh netlink socket.
    pub fn open() -> Result<Self> {
        Ok(Self::new(Connector::open(W1)?))
    }
}

impl<T: Transport> Bus<T> {
    /// Wrap an existing connector session.
    pub fn new(connector: Connector<T>) -> Self {
        Self { connector }
    }

    /// List the bus masters known to the kernel.
    pub fn list_masters(&mut self) -> Result<Vec<Master>> {
        debug!("w1 list masters");

        let req = W1Msg::new(MsgType::ListMasters, Target::None, Vec::new());
        let replies = self.transact(&req, 0, 1)?;

        let mut masters = Vec::new();
        for chunk in replies[0].data.chunks_exact(4) {
            masters.push(Master {
                id: u32::from_le_bytes(chunk.try_into().unwrap()),
            });
        }
        Ok(masters)
    }

    /// List the slave devices attached to a master.
    pub fn list_slaves(&mut self, master: Master) -> Result<Vec<SlaveId>> {
        debug!(master = master.id, "w1 list slaves");

        let mut body = Vec::new();
        W1Cmd::new(CmdType::ListSlaves, Vec::new()).encode_into(&mut body);
        let req = W1Msg::new(MsgType::MasterCmd, Target::Master(master.id), body);
        let replies = self.transact(&req, 1, 1)?;

        let mut slaves = Vec::new();
        for chunk in strip_cmd_header(&replies[0])?.chunks_exact(8) {
            slaves.push(SlaveId::from_bytes(chunk.try_into().unwrap()));
        }
        Ok(slaves)
    }

    /// Write a command to a slave and read back `len` bytes.
    pub fn read_slave(&mut self, slave: SlaveId, cmd: &[u8], len: usize) -> Result<Vec<u8>> {
        debug!(slave = %slave, len, "w1 read slave");

        let mut body = Vec::new();
        W1Cmd::new(CmdType::Write, cmd.to_vec()).encode_into(&mut body);
        W1Cmd::new(CmdType::Read, vec![0; len]).encode_into(&mut body);
        let req = W1Msg::new(MsgType::SlaveCmd, Target::Slave(slave), body);

        let replies = self.transact(&req, 2, 2)?;
        collect_reply_data(&replies)
    }

    /// Write a command to a slave and read back `pages` memory pages of
    /// [`PAGE_READ_SIZE`] bytes each.
    pub fn read_slave_paged(&mut self, slave: SlaveId, cmd: &[u8], pages: usize) -> Result<Vec<u8>> {
        debug!(slave = %slave, pages, "w1 read slave paged");

        let mut body = Vec::new();
        W1Cmd::new(CmdType::Write, cmd.to_vec()).encode_into(&mut body);
        for _ in 0..pages {
            W1Cmd::new(CmdType::Read, vec![0; PAGE_READ_SIZE]).encode_into(&mut body);
        }
        let req = W1Msg::new(MsgType::SlaveCmd, Target::Slave(slave), body);

        let replies = self.transact(&req, pages + 1, pages + 1)?;
        collect_reply_data(&replies)
    }

    /// Write a command to a slave; no data comes back.
    pub fn write_slave(&mut self, slave: SlaveId, data: &[u8]) -> Result<()> {
        debug!(slave = %slave, bytes = data.len(), "w1 write slave");

        let mut body = Vec::new();
        W1Cmd::new(CmdType::Write, data.to_vec()).encode_into(&mut body);
        let req = W1Msg::new(MsgType::SlaveCmd, Target::Slave(slave), body);

        self.transact(&req, 1, 0)?;
        Ok(())
    }

    /// Send a request and drain its kernel responses.
    ///
    /// Loops until the expected echo tally is met and all expected replies
    /// have been collected; echoes and replies interleave in arbitrary
    /// order, while replies arrive in sub-command issue order. An echo with
    /// a non-zero status byte is fatal for the request, as is any
    /// unrelated message.
    fn transact(&mut self, req: &W1Msg, echoes: usize, reply_count: usize) -> Result<Vec<W1Msg>> {
        let token = self.connector.send(&req.encode())?;

        let mut awaiting_echoes = echoes;
        let mut replies = Vec::with_capacity(reply_count);
        while awaiting_echoes > 0 || replies.len() < reply_count {
            let (body, response) = self.connector.receive(&token)?;
            let msg = W1Msg::decode(&body)?;
            match response {
                Response::Reply => {
                    if replies.len() >= reply_count {
                        return Err(W1Error::UnexpectedReply);
                    }
                    debug!(bytes = msg.data.len(), "w1 reply");
                    replies.push(msg);
                }
                Response::Echo => {
                    debug!(status = msg.status, "w1 status echo");
                    if msg.status != 0 {
                        return Err(W1Error::Status(msg.status));
                    }
                    // some kernels echo even where no sub-command warrants
                    // one; surplus echoes are tolerated
                    awaiting_echoes = awaiting_echoes.saturating_sub(1);
                }
                Response::Unrelated => return Err(W1Error::Unrelated),
            }
        }
        Ok(replies)
    }
}

/// Drop the leading 4-byte command header from a reply body.
fn strip_cmd_header(msg: &W1Msg) -> Result<&[u8]> {
    if msg.data.len() < CMD_HEADER_SIZE {
        return Err(W1Error::ShortReply {
            len: msg.data.len(),
        });
    }
    Ok(&msg.data[CMD_HEADER_SIZE..])
}

/// Concatenate reply payloads, each minus its command header, in arrival
/// order.
fn collect_reply_data(replies: &[W1Msg]) -> Result<Vec<u8>> {
    let mut data = Vec::new();
    for reply in replies {
        data.extend_from_slice(strip_cmd_header(reply)?);
    }
    Ok(data)
}
