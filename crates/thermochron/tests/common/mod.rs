//! An in-memory DS1922L served over the connector wire format.

use std::collections::VecDeque;
use std::io;

use thermochron::crc16;
use thermochron_connector::{ConnectorMsg, W1};
use thermochron_netlink::{NetlinkError, Transport};
use thermochron_w1::{CmdType, MsgType, SlaveId, Target, W1Cmd, W1Msg};

pub const MASTER_ID: u32 = 1;

const PAGE_SIZE: usize = 32;

pub fn ibutton() -> SlaveId {
    SlaveId {
        family: 0x41,
        uid: [0xAA, 0xBB, 0xCC, 0xDD, 0xEE, 0xFF],
        crc: 0x3C,
    }
}

/// A non-iButton device sharing the bus.
pub fn thermometer() -> SlaveId {
    SlaveId {
        family: 0x28,
        uid: [1, 2, 3, 4, 5, 6],
        crc: 0x99,
    }
}

/// Scripted kernel fake: answers 1-Wire requests from an in-memory
/// device image, echo-then-reply per sub-command.
#[derive(Debug)]
pub struct FakeKernel {
    pub masters: Vec<u32>,
    pub slaves: Vec<SlaveId>,
    /// Status register image served from address 0x0200.
    pub status: [u8; 96],
    /// Raw sample bytes served from address 0x1000.
    pub log: Vec<u8>,
    /// Transfer-status byte of a scratchpad read-back.
    pub transfer_status: u8,
    /// Device commands received via write sub-commands, in order.
    pub writes: Vec<Vec<u8>>,
    /// Corrupt the stored CRC of every page served.
    pub corrupt_crc: bool,
    scratchpad: [u8; 32],
    incoming: VecDeque<Vec<u8>>,
}

impl FakeKernel {
    pub fn new(status: [u8; 96], log: Vec<u8>) -> Self {
        Self {
            masters: vec![MASTER_ID],
            slaves: vec![thermometer(), ibutton()],
            status,
            log,
            transfer_status: 0x1F,
            writes: Vec::new(),
            corrupt_crc: false,
            scratchpad: [0; 32],
            incoming: VecDeque::new(),
        }
    }

    fn echo(&mut self, seq: u32, req: &W1Msg) {
        self.frame(seq, 0, req.clone());
    }

    fn reply(&mut self, seq: u32, msg_type: MsgType, target: Target, data: Vec<u8>) {
        self.frame(0, seq.wrapping_add(1), W1Msg::new(msg_type, target, data));
    }

    fn frame(&mut self, seq: u32, ack: u32, msg: W1Msg) {
        let frame = ConnectorMsg {
            id: W1,
            seq,
            ack,
            flags: 0,
            data: msg.encode(),
        };
        self.incoming.push_back(frame.encode());
    }

    fn handle(&mut self, seq: u32, req: &W1Msg) {
        match req.msg_type {
            MsgType::ListMasters => {
                let mut ids = Vec::new();
                for id in &self.masters {
                    ids.extend_from_slice(&id.to_le_bytes());
                }
                self.reply(seq, MsgType::ListMasters, Target::None, ids);
            }
            MsgType::MasterCmd => {
                self.echo(seq, req);
                let mut descriptors = Vec::new();
                for slave in &self.slaves {
                    descriptors.extend_from_slice(&slave.to_bytes());
                }
                let mut body = Vec::new();
                W1Cmd::new(CmdType::ListSlaves, descriptors).encode_into(&mut body);
                self.reply(seq, MsgType::MasterCmd, req.target, body);
            }
            MsgType::SlaveCmd => self.handle_slave_cmd(seq, req),
            other => panic!("fake kernel got unexpected message type {other:?}"),
        }
    }

    fn handle_slave_cmd(&mut self, seq: u32, req: &W1Msg) {
        let cmds = parse_cmds(&req.data);
        let write_only = cmds.iter().all(|(cmd, _)| *cmd == CmdType::Write as u8);
        let device_cmd = cmds
            .first()
            .map(|(_, data)| data.clone())
            .unwrap_or_default();

        let mut page = 0;
        for (cmd, data) in cmds {
            if cmd == CmdType::Write as u8 {
                self.apply_write(&data);
                self.echo(seq, req);
                if !write_only {
                    let mut body = Vec::new();
                    W1Cmd::new(CmdType::Write, Vec::new()).encode_into(&mut body);
                    self.reply(seq, MsgType::SlaveCmd, req.target, body);
                }
            } else {
                self.echo(seq, req);
                let response = self.serve_read(&device_cmd, page, data.len());
                page += 1;
                let mut body = Vec::new();
                W1Cmd::new(CmdType::Read, response).encode_into(&mut body);
                self.reply(seq, MsgType::SlaveCmd, req.target, body);
            }
        }
    }

    fn apply_write(&mut self, data: &[u8]) {
        self.writes.push(data.to_vec());
        if data.len() == 35 && data[0] == 0x0F {
            self.scratchpad.copy_from_slice(&data[3..35]);
        }
    }

    /// Serve one read sub-command for the device command that opened the
    /// exchange: a scratchpad read-back or one page of memory.
    fn serve_read(&self, device_cmd: &[u8], page: usize, len: usize) -> Vec<u8> {
        match device_cmd.first() {
            Some(&0xAA) => {
                let mut out = vec![0x00, 0x02, self.transfer_status];
                out.extend_from_slice(&self.scratchpad);
                assert_eq!(out.len(), len);
                out
            }
            Some(&0x69) => {
                let address = u16::from_le_bytes([device_cmd[1], device_cmd[2]]);
                let body = self.memory(address as usize + page * PAGE_SIZE);
                let crc = if page == 0 {
                    let mut covered = device_cmd[..3].to_vec();
                    covered.extend_from_slice(&body);
                    crc16::checksum(&covered)
                } else {
                    crc16::checksum(&body)
                };
                let mut stored = 0xFFFF ^ crc;
                if self.corrupt_crc {
                    stored ^= 0x00FF;
                }
                let mut out = body.to_vec();
                out.extend_from_slice(&stored.to_le_bytes());
                assert_eq!(out.len(), len);
                out
            }
            other => panic!("fake kernel got unexpected device command {other:?}"),
        }
    }

    /// One 32-byte page of the device memory map, zero-filled past the
    /// backing data.
    fn memory(&self, offset: usize) -> [u8; PAGE_SIZE] {
        let (base, data): (usize, &[u8]) = if offset >= 0x1000 {
            (0x1000, &self.log)
        } else {
            (0x0200, &self.status)
        };
        let mut page = [0u8; PAGE_SIZE];
        let start = offset - base;
        for (i, slot) in page.iter_mut().enumerate() {
            if let Some(&b) = data.get(start + i) {
                *slot = b;
            }
        }
        page
    }
}

impl Transport for &mut FakeKernel {
    fn send(&mut self, payload: &[u8]) -> thermochron_netlink::Result<()> {
        let frame = ConnectorMsg::decode(payload).expect("fake kernel got bad connector frame");
        let req = W1Msg::decode(&frame.data).expect("fake kernel got bad w1 message");
        self.handle(frame.seq, &req);
        Ok(())
    }

    fn recv(&mut self) -> thermochron_netlink::Result<Vec<u8>> {
        self.incoming.pop_front().ok_or_else(|| {
            NetlinkError::Recv(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "fake kernel has nothing to deliver",
            ))
        })
    }
}

fn parse_cmds(mut data: &[u8]) -> Vec<(u8, Vec<u8>)> {
    let mut cmds = Vec::new();
    while data.len() >= 4 {
        let cmd = data[0];
        let len = u16::from_le_bytes([data[2], data[3]]) as usize;
        cmds.push((cmd, data[4..4 + len].to_vec()));
        data = &data[4 + len..];
    }
    cmds
}

/// A DS1922L status image: error-free calibration points, the given
/// sample count, 10-minute rate, mission started 2015-01-01 00:00:00.
pub fn ds1922l_status(sample_count: u32, high_resolution: bool) -> [u8; 96] {
    let mut bs = [0u8; 96];
    // device clock: 2015-01-01 12:00:00
    bs[0x00..0x06].copy_from_slice(&[0x00, 0x00, 0x12, 0x01, 0x01, 0x15]);
    // rate: 10 minutes (EHSS=0)
    bs[0x06] = 10;
    bs[0x13] = if high_resolution { 1 << 2 } else { 0 };
    bs[0x15] = 1 << 1;
    // mission start: 2015-01-01 00:00:00
    bs[0x19..0x1F].copy_from_slice(&[0x00, 0x00, 0x00, 0x01, 0x01, 0x15]);
    bs[0x20..0x23].copy_from_slice(&sample_count.to_le_bytes()[..3]);
    // DS1922L
    bs[0x26] = 0x40;
    // calibration points with no error
    bs[0x40..0x42].copy_from_slice(&[0x20, 0x00]);
    bs[0x42..0x44].copy_from_slice(&[0x20, 0x00]);
    bs[0x44..0x46].copy_from_slice(&[0xA0, 0x00]);
    bs[0x46..0x48].copy_from_slice(&[0xA0, 0x00]);
    bs
}
