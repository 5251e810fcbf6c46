//! Serial transport for a hardware sensor.
//!
//! One command/reply round trip per trait method: encode the frame, write
//! it, give the module a short settle interval, then drain and parse the
//! acknowledge packet. `serialport` is blocking; the individual reads and
//! writes here are small and bounded by the port timeout, so they run
//! inline on the async runtime.

use crate::config::SensorConfig;
use crate::traits::{CharBuffer, SearchHit, SensorDevice};
use fingate_core::constants::SETTLE_INTERVAL_MS;
use fingate_core::{Error, Result};
use fingate_protocol::{
    led_command, CommandFrame, ConfirmationCode, Instruction, LedColor, LedMode, Reply,
};
use std::fmt;
use std::io::{Read, Write};
use std::time::Duration;
use tracing::{debug, trace};

/// Offset of the capacity word inside the ReadSysPara payload.
const SYS_PARA_CAPACITY_OFFSET: usize = 4;

/// A hardware sensor behind a serial port.
pub struct SerialSensor {
    port: Box<dyn serialport::SerialPort>,
    address: u32,
    password: u32,
}

impl fmt::Debug for SerialSensor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SerialSensor")
            .field("port", &self.port.name())
            .field("address", &format_args!("0x{:08X}", self.address))
            .finish()
    }
}

impl SerialSensor {
    /// Open the serial port named in the configuration.
    ///
    /// # Errors
    /// Returns `Error::LinkFailure` when the port cannot be opened.
    pub fn open(config: &SensorConfig) -> Result<Self> {
        let port = serialport::new(&config.port, config.baud_rate)
            .timeout(Duration::from_millis(SETTLE_INTERVAL_MS * 10))
            .open()
            .map_err(|err| Error::link(format!("Cannot open {}: {err}", config.port)))?;
        debug!(port = %config.port, baud = config.baud_rate, "Serial port opened");

        Ok(SerialSensor {
            port,
            address: config.address,
            password: config.password,
        })
    }

    /// Write a frame, wait the settle interval, and drain whatever the
    /// module answered. `Ok(None)` means the module stayed silent, which
    /// is normal for some LED commands.
    async fn send(&mut self, frame: &CommandFrame) -> Result<Option<Vec<u8>>> {
        let bytes = frame.encode();
        trace!(instruction = ?frame.instruction(), len = bytes.len(), "Sending frame");
        self.port.write_all(&bytes)?;
        self.port.flush()?;

        tokio::time::sleep(Duration::from_millis(SETTLE_INTERVAL_MS)).await;

        let pending = self
            .port
            .bytes_to_read()
            .map_err(|err| Error::link(format!("Cannot poll serial buffer: {err}")))?;
        if pending == 0 {
            return Ok(None);
        }

        let mut buffer = vec![0u8; pending as usize];
        self.port.read_exact(&mut buffer)?;
        trace!(len = buffer.len(), "Drained reply");
        Ok(Some(buffer))
    }

    /// Run one command and parse the mandatory acknowledge.
    async fn command(&mut self, instruction: Instruction, params: Vec<u8>) -> Result<Reply> {
        let frame = CommandFrame::new(self.address, instruction, params);
        match self.send(&frame).await? {
            Some(bytes) => Reply::parse(&bytes),
            None => Err(Error::protocol(format!(
                "No response to {instruction:?}"
            ))),
        }
    }

    /// Require a success confirmation, mapping anything else to a
    /// device rejection.
    fn expect_ok(instruction: Instruction, reply: &Reply) -> Result<()> {
        if reply.confirmation.is_ok() {
            Ok(())
        } else {
            Err(Error::rejected(format!(
                "{instruction:?} answered {:?}",
                reply.confirmation
            )))
        }
    }
}

impl SensorDevice for SerialSensor {
    async fn verify_password(&mut self) -> Result<bool> {
        let reply = self
            .command(Instruction::VfyPwd, self.password.to_be_bytes().to_vec())
            .await?;
        Ok(reply.confirmation.is_ok())
    }

    async fn capture_image(&mut self) -> Result<bool> {
        let reply = self.command(Instruction::GenImg, Vec::new()).await?;
        match reply.confirmation {
            ConfirmationCode::Ok => Ok(true),
            ConfirmationCode::NoFinger => Ok(false),
            other => Err(Error::rejected(format!("GenImg answered {other:?}"))),
        }
    }

    async fn convert_image(&mut self, buffer: CharBuffer) -> Result<()> {
        let reply = self
            .command(Instruction::Img2Tz, vec![buffer.code()])
            .await?;
        Self::expect_ok(Instruction::Img2Tz, &reply)
    }

    async fn search(&mut self, buffer: CharBuffer) -> Result<Option<SearchHit>> {
        // Search covers the whole library, from slot 0 through capacity.
        let capacity = self.capacity().await?;
        let [pages_hi, pages_lo] = capacity.to_be_bytes();
        let reply = self
            .command(
                Instruction::Search,
                vec![buffer.code(), 0x00, 0x00, pages_hi, pages_lo],
            )
            .await?;

        match reply.confirmation {
            ConfirmationCode::Ok => {
                if reply.payload.len() < 4 {
                    return Err(Error::protocol(format!(
                        "Search payload too short: {} bytes",
                        reply.payload.len()
                    )));
                }
                let slot = u16::from_be_bytes([reply.payload[0], reply.payload[1]]);
                let accuracy = u16::from_be_bytes([reply.payload[2], reply.payload[3]]);
                debug!(slot, accuracy, "Search hit");
                Ok(Some(SearchHit { slot, accuracy }))
            }
            ConfirmationCode::NotFound => Ok(None),
            other => Err(Error::rejected(format!("Search answered {other:?}"))),
        }
    }

    async fn create_template(&mut self) -> Result<()> {
        let reply = self.command(Instruction::RegModel, Vec::new()).await?;
        Self::expect_ok(Instruction::RegModel, &reply)
    }

    async fn store_template(&mut self, slot: u16) -> Result<()> {
        let [slot_hi, slot_lo] = slot.to_be_bytes();
        let reply = self
            .command(
                Instruction::Store,
                vec![CharBuffer::One.code(), slot_hi, slot_lo],
            )
            .await?;
        Self::expect_ok(Instruction::Store, &reply)
    }

    async fn delete_template(&mut self, slot: u16) -> Result<()> {
        let [slot_hi, slot_lo] = slot.to_be_bytes();
        // Trailing word is the number of consecutive templates to delete.
        let reply = self
            .command(Instruction::DeleteChar, vec![slot_hi, slot_lo, 0x00, 0x01])
            .await?;
        Self::expect_ok(Instruction::DeleteChar, &reply)
    }

    async fn clear_database(&mut self) -> Result<()> {
        let reply = self.command(Instruction::Empty, Vec::new()).await?;
        Self::expect_ok(Instruction::Empty, &reply)
    }

    async fn template_count(&mut self) -> Result<u16> {
        let reply = self.command(Instruction::TemplateNum, Vec::new()).await?;
        Self::expect_ok(Instruction::TemplateNum, &reply)?;
        if reply.payload.len() < 2 {
            return Err(Error::protocol("TemplateNum payload too short"));
        }
        Ok(u16::from_be_bytes([reply.payload[0], reply.payload[1]]))
    }

    async fn capacity(&mut self) -> Result<u16> {
        let reply = self.command(Instruction::ReadSysPara, Vec::new()).await?;
        Self::expect_ok(Instruction::ReadSysPara, &reply)?;
        if reply.payload.len() < SYS_PARA_CAPACITY_OFFSET + 2 {
            return Err(Error::protocol("ReadSysPara payload too short"));
        }
        Ok(u16::from_be_bytes([
            reply.payload[SYS_PARA_CAPACITY_OFFSET],
            reply.payload[SYS_PARA_CAPACITY_OFFSET + 1],
        ]))
    }

    async fn set_led(&mut self, mode: LedMode, color: LedColor) -> Result<()> {
        let frame = led_command(self.address, mode, color);
        // Some firmware revisions do not acknowledge LED commands; a
        // silent module is still a success here.
        if let Some(bytes) = self.send(&frame).await? {
            let reply = Reply::parse(&bytes)?;
            Self::expect_ok(Instruction::AuraLedConfig, &reply)?;
        }
        Ok(())
    }
}
