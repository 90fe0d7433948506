use chrono::NaiveDateTime;
use tracing::{debug, info};

use thermochron_connector::{Connector, W1};
use thermochron_netlink::{NetlinkSocket, Transport};
use thermochron_w1::{Bus, SlaveId, PAGE_READ_SIZE};

use crate::clock::DeviceClock;
use crate::crc16;
use crate::device::Temperature;
use crate::error::{ButtonError, Result};
use crate::status::{Status, STATUS_SIZE};

// iButton command codes, from the DS1922 datasheet
const WRITE_SCRATCHPAD: u8 = 0x0F;
const READ_SCRATCHPAD: u8 = 0xAA;
const COPY_SCRATCHPAD: u8 = 0x99;
const READ_MEMORY: u8 = 0x69;
const CLEAR_MEMORY: u8 = 0x96;
const STOP_MISSION: u8 = 0x33;
const START_MISSION: u8 = 0xCC;

/// The 1-Wire family code shared by DS192x loggers.
pub const IBUTTON_FAMILY: u8 = 0x41;

const STATUS_ADDR: u16 = 0x0200;
const LOG_ADDR: u16 = 0x1000;

/// Bytes of payload per memory page, once the CRC is stripped.
const PAGE_SIZE: usize = 32;

/// One mission log entry.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: NaiveDateTime,
    pub temperature: Temperature,
}

/// A DS192x temperature-logging iButton on a 1-Wire bus.
///
/// Holds the bus session and the selected slave; dropping the button
/// closes the underlying socket.
#[derive(Debug)]
pub struct Button<T> {
    bus: Bus<T>,
    slave: SlaveId,
}

impl Button<NetlinkSocket> {
    /// Open the first iButton on the first bus master.
    pub fn open() -> Result<Self> {
        Self::with_bus(Bus::open()?)
    }
}

impl<T: Transport> Button<T> {
    /// Run device discovery over an existing transport.
    pub fn with_transport(transport: T) -> Result<Self> {
        Self::with_bus(Bus::new(Connector::new(transport, W1)))
    }

    /// Run device discovery over an existing 1-Wire session: take the
    /// first master, then the first slave with the iButton family code.
    pub fn with_bus(mut bus: Bus<T>) -> Result<Self> {
        let masters = bus.list_masters()?;
        let master = *masters.first().ok_or(ButtonError::NoMaster)?;

        let slave = bus
            .list_slaves(master)?
            .into_iter()
            .find(|s| s.is_family(IBUTTON_FAMILY))
            .ok_or(ButtonError::NoButton)?;
        info!(slave = %slave, "ibutton found");

        Ok(Self::new(bus, slave))
    }

    /// Use a specific slave on an existing session.
    pub fn new(bus: Bus<T>, slave: SlaveId) -> Self {
        Self { bus, slave }
    }

    /// Read the status register pages.
    pub fn status(&mut self) -> Result<Status> {
        let bytes = self.read_memory(STATUS_ADDR, 3)?;
        let bytes: [u8; STATUS_SIZE] = bytes.try_into().map_err(|v: Vec<u8>| {
            ButtonError::ShortRead {
                got: v.len(),
                wanted: STATUS_SIZE,
            }
        })?;
        Ok(Status::new(bytes))
    }

    /// Send a command opcode with the trailing 0xFF marker byte.
    fn command(&mut self, opcode: u8) -> Result<()> {
        let mut data = [0u8; 10];
        data[0] = opcode;
        data[9] = 0xFF;
        self.bus.write_slave(self.slave, &data)?;
        Ok(())
    }

    /// Clear the sample memory.
    pub fn clear_memory(&mut self) -> Result<()> {
        self.command(CLEAR_MEMORY)
    }

    /// Start a mission with the programmed configuration.
    pub fn start_mission(&mut self) -> Result<()> {
        self.command(START_MISSION)
    }

    /// Stop the running mission.
    pub fn stop_mission(&mut self) -> Result<()> {
        self.command(STOP_MISSION)
    }

    /// Program the mission configuration into the scratchpad.
    ///
    /// Field layout per the DS1922 register map: the current time in
    /// packed BCD, a 10-minute sample rate, alarm thresholds, alarms off,
    /// the oscillator running, 16-bit logging without rollover, and no
    /// start delay.
    pub fn write_scratchpad(&mut self, now: &NaiveDateTime) -> Result<()> {
        let mut data = [0u8; 35];
        data[0] = WRITE_SCRATCHPAD;

        // target address (the RTC register page)
        data[1] = 0x00;
        data[2] = 0x02;

        data[3..9].copy_from_slice(&DeviceClock::from_datetime(now).to_bytes());

        // sample rate: 10 units, minutes while EHSS=0
        data[9] = 0x0A;
        data[10] = 0x00;

        // alarm thresholds
        data[11] = 0x52;
        data[12] = 0x99;

        // alarm control, both alarms disabled
        data[19] = 0x00;

        // R/W but should read 0xFC per the register map
        data[20] = 0xFC;

        // EHSS=0 (low sample rate), EOSC=1 (oscillator running)
        data[21] = 0x01;

        // 16-bit samples, logging on, no alarm, no rollover
        data[22] = 0xC5;

        // no mission start delay
        data[25] = 0x00;
        data[26] = 0x00;
        data[27] = 0x00;

        // write through the end of the scratchpad
        data[28..35].fill(0xFF);

        self.bus.write_slave(self.slave, &data)?;
        Ok(())
    }

    /// Read back the scratchpad: target address, transfer status, and the
    /// 32 staged bytes.
    pub fn read_scratchpad(&mut self) -> Result<Vec<u8>> {
        Ok(self.bus.read_slave(self.slave, &[READ_SCRATCHPAD], 35)?)
    }

    /// Commit the scratchpad to the mission registers.
    pub fn copy_scratchpad(&mut self) -> Result<()> {
        let mut data = [0u8; 12];
        data[0] = COPY_SCRATCHPAD;
        // authorisation pattern: target address and ending offset
        data[1] = 0x00;
        data[2] = 0x02;
        data[3] = 0x1F;
        self.bus.write_slave(self.slave, &data)?;
        Ok(())
    }

    /// Program a mission and start it: write the scratchpad, read it
    /// back, verify the transfer status, commit, start.
    pub fn program_mission(&mut self, now: &NaiveDateTime) -> Result<()> {
        self.write_scratchpad(now)?;

        let data = self.read_scratchpad()?;
        let transfer_status = data.get(2).copied().unwrap_or(0);
        if transfer_status != 0x1F {
            return Err(ButtonError::ScratchpadVerify {
                got: transfer_status,
            });
        }

        self.copy_scratchpad()?;
        self.start_mission()
    }

    /// Read `pages` 32-byte pages of device memory starting at `address`.
    ///
    /// Every page travels with a complemented CRC-16; the first page's
    /// checksum also covers the three command bytes.
    pub fn read_memory(&mut self, address: u16, pages: usize) -> Result<Vec<u8>> {
        let mut cmd = [0u8; 11];
        cmd[0] = READ_MEMORY;
        cmd[1..3].copy_from_slice(&address.to_le_bytes());

        let data = self.bus.read_slave_paged(self.slave, &cmd, pages)?;
        if data.len() < pages * PAGE_READ_SIZE {
            return Err(ButtonError::ShortRead {
                got: data.len(),
                wanted: pages * PAGE_READ_SIZE,
            });
        }

        let mut result = Vec::with_capacity(pages * PAGE_SIZE);
        for (index, block) in data.chunks_exact(PAGE_READ_SIZE).take(pages).enumerate() {
            let body = &block[..PAGE_SIZE];
            let expected = 0xFFFF ^ u16::from_le_bytes([block[32], block[33]]);
            let actual = if index == 0 {
                let mut covered = Vec::with_capacity(3 + PAGE_SIZE);
                covered.extend_from_slice(&cmd[..3]);
                covered.extend_from_slice(body);
                crc16::checksum(&covered)
            } else {
                crc16::checksum(body)
            };
            if actual != expected {
                debug!(page = index + 1, "crc mismatch");
                return Err(ButtonError::Crc { page: index + 1 });
            }
            result.extend_from_slice(body);
        }
        Ok(result)
    }

    /// Read the mission log: one timestamped temperature per recorded
    /// sample, corrected through the device calibration curve.
    pub fn read_log(&mut self) -> Result<Vec<Sample>> {
        let status = self.status()?;

        let sample_bytes = if status.high_resolution() { 2 } else { 1 };
        let count = status.sample_count() as usize;
        if count == 0 {
            return Ok(Vec::new());
        }

        let byte_count = count * sample_bytes;
        let pages = byte_count.div_ceil(PAGE_SIZE);

        let bytes = self.read_memory(LOG_ADDR, pages)?;
        if bytes.len() < byte_count {
            return Err(ButtonError::ShortRead {
                got: bytes.len(),
                wanted: byte_count,
            });
        }

        let (a, b, c) = status.correction_factors()?;
        let start = status.mission_timestamp()?;
        let rate = status.sample_rate();

        let mut samples = Vec::with_capacity(count);
        for index in 0..count {
            let raw = &bytes[index * sample_bytes..(index + 1) * sample_bytes];
            let tc = status.decode_temp(raw)?.celsius();
            samples.push(Sample {
                time: start + rate * index as i32,
                temperature: Temperature(tc - (a * tc * tc + b * tc + c)),
            });
        }
        Ok(samples)
    }
}
