//! High-level sensor interface

use std::time::Duration;

use tracing::{debug, trace, warn};

use sonarust_core::{Command, Frame, Session, StreamDecoder};
use sonarust_transport::{SerialTransport, Transport};
use sonarust_types::{
    BROADCAST_ADDRESS, BaudRate, CommModeVariant, DistanceSample, LedMode, MAX_ADDRESS, RelayMode,
    ResetKind, UploadMode,
};

use crate::error::{Error, Result};

/// Default bound on waiting for a response frame
pub const DEFAULT_TIMEOUT: Duration = Duration::from_millis(500);

/// Bound on reading bytes the transport already reports as available
const DRAIN_TIMEOUT: Duration = Duration::from_millis(20);

/// An ultrasonic ranging module on the other end of a transport
///
/// One `Sensor` owns one transport and the session state for the module
/// behind it. All configuration commands and distance queries go through
/// the same request/response exchange: build a frame, write it, wait for a
/// full 9-byte response within the timeout, validate it against the command
/// that was sent. In auto-upload mode the module pushes distance frames
/// unsolicited instead; drain those with [`poll_stream`](Self::poll_stream).
///
/// Callers changing the port or rate must ensure no exchange or poll is in
/// flight; the sensor never reads the transport from two places at once,
/// and on-demand queries are refused outright while auto-upload is active.
///
/// # Examples
///
/// ```no_run
/// use sonarust::Sensor;
///
/// #[tokio::main]
/// async fn main() -> sonarust::Result<()> {
///     let mut sensor = Sensor::serial("/dev/ttyUSB0", 9600);
///
///     sensor.open().await?;
///     let sample = sensor.read_distance().await?;
///     println!("{}", sample);
///
///     sensor.close().await?;
///     Ok(())
/// }
/// ```
pub struct Sensor {
    transport: Box<dyn Transport>,
    session: Session,
    decoder: StreamDecoder,
    timeout: Duration,
    address: u16,
    comm_mode_variant: CommModeVariant,
}

impl Sensor {
    /// Create a sensor over any transport (e.g. a test double)
    pub fn new(transport: Box<dyn Transport>) -> Self {
        Self {
            transport,
            session: Session::new(),
            decoder: StreamDecoder::new(),
            timeout: DEFAULT_TIMEOUT,
            address: BROADCAST_ADDRESS,
            comm_mode_variant: CommModeVariant::default(),
        }
    }

    /// Create a sensor over a serial port
    pub fn serial(path: impl Into<String>, baud: u32) -> Self {
        Self::new(Box::new(SerialTransport::new(path, baud)))
    }

    /// Set the response timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Address outgoing frames to a specific module instead of broadcast
    pub fn with_address(mut self, address: u16) -> Self {
        self.address = address;
        self
    }

    /// Select the communication-mode command encoding the target firmware
    /// answers to
    pub fn with_comm_mode_variant(mut self, variant: CommModeVariant) -> Self {
        self.comm_mode_variant = variant;
        self
    }

    /// Open the underlying transport
    pub async fn open(&mut self) -> Result<()> {
        debug!("Opening {}...", self.transport.endpoint());
        self.transport.open().await?;
        Ok(())
    }

    /// Close the underlying transport
    pub async fn close(&mut self) -> Result<()> {
        self.transport.close().await?;
        Ok(())
    }

    /// Check if the transport is open
    pub fn is_open(&self) -> bool {
        self.transport.is_open()
    }

    /// Address outgoing frames are currently sent to
    pub fn target_address(&self) -> u16 {
        self.address
    }

    /// Current upload mode as last confirmed by the module
    pub fn upload_mode(&self) -> UploadMode {
        self.session.upload_mode()
    }

    /// Check if the module is pushing unsolicited distance frames
    pub fn is_auto_upload(&self) -> bool {
        self.session.is_auto_upload()
    }

    /// Last validated distance sample, query or streamed
    pub fn last_sample(&self) -> Option<DistanceSample> {
        self.session.last_sample()
    }

    /// Bytes dropped so far while realigning the auto-upload stream
    pub fn stream_discarded(&self) -> u64 {
        self.decoder.discarded()
    }

    /// Assign a new module address (0x0000..=0xFFFE)
    ///
    /// On confirmation, subsequent frames are addressed to the new value.
    pub async fn set_address(&mut self, address: u16) -> Result<()> {
        if address > MAX_ADDRESS {
            return Err(sonarust_types::Error::AddressReserved(address).into());
        }

        debug!("Assigning module address 0x{:04X}...", address);

        self.command_ack(Command::SetAddress, &address.to_be_bytes())
            .await?;
        self.address = address;

        Ok(())
    }

    /// Change the serial rate
    ///
    /// Transport-mutating: on confirmation the port is closed and reopened
    /// at the new rate before this returns.
    pub async fn set_baud_rate(&mut self, rate: BaudRate) -> Result<()> {
        debug!("Changing rate to {} (index {})...", rate, rate.index());

        self.command_ack(Command::SetBaudRate, &[rate.index()])
            .await?;

        // Follow the module to its new rate
        self.transport.reconfigure(rate.bits_per_second()).await?;

        Ok(())
    }

    /// Switch between manual queries and auto-upload
    pub async fn set_upload_mode(&mut self, mode: UploadMode) -> Result<()> {
        debug!("Setting upload mode to {:?}...", mode);

        self.command_ack(Command::SetUploadMode, &[mode as u8])
            .await?;

        // Only the module's confirmation flips the local flag
        self.session.set_upload_mode(mode);
        if mode == UploadMode::Manual {
            self.decoder.clear();
        }

        Ok(())
    }

    /// Set the auto-upload push interval, in units of 100 ms
    pub async fn set_upload_interval(&mut self, interval: u8) -> Result<()> {
        debug!("Setting upload interval to {} x 100 ms...", interval);

        self.command_ack(Command::SetUploadInterval, &[interval])
            .await?;
        Ok(())
    }

    /// Measurement indicator LED on/off
    pub async fn set_led(&mut self, mode: LedMode) -> Result<()> {
        self.command_ack(Command::SetLed, &[mode as u8]).await?;
        Ok(())
    }

    /// Threshold relay output on/off
    pub async fn set_relay(&mut self, mode: RelayMode) -> Result<()> {
        self.command_ack(Command::SetRelay, &[mode as u8]).await?;
        Ok(())
    }

    /// Set the communication mode (value is firmware-defined)
    ///
    /// Uses whichever command encoding was selected with
    /// [`with_comm_mode_variant`](Self::with_comm_mode_variant).
    pub async fn set_comm_mode(&mut self, mode: u8) -> Result<()> {
        let command = match self.comm_mode_variant {
            CommModeVariant::VariantA => Command::SetCommModeA,
            CommModeVariant::VariantB => Command::SetCommModeB,
        };

        self.command_ack(command, &[mode]).await?;
        Ok(())
    }

    /// Reboot the module
    ///
    /// Fire-and-forget: the module restarts without answering, so no
    /// response is awaited and the session falls back to power-on defaults.
    pub async fn reset(&mut self, kind: ResetKind) -> Result<()> {
        warn!("Resetting module ({:?})...", kind);

        let request = Frame::request(Command::Reset, self.address, &[kind as u8]);
        self.transport.write(&request.encode()).await?;

        self.session.reset();
        self.decoder.clear();

        Ok(())
    }

    /// Query one distance measurement
    ///
    /// Refused while auto-upload is active: the module does not answer
    /// on-demand queries in that mode, so failing fast beats waiting out
    /// the timeout.
    pub async fn read_distance(&mut self) -> Result<DistanceSample> {
        if self.session.is_auto_upload() {
            return Err(Error::AutoUploadActive);
        }

        let response = self.exchange(Command::ReadDistance, &[]).await?;
        let sample = DistanceSample::new(response.address, response.value());

        self.session.record_sample(sample);
        debug!(%sample, "Distance query complete");

        Ok(sample)
    }

    /// One opportunistic poll of the auto-upload stream
    ///
    /// Drains whatever the transport has received, then makes a single
    /// decode attempt: `Ok(Some(..))` for a validated sample, `Ok(None)`
    /// when no complete frame is buffered yet or one misaligned byte was
    /// dropped. Never blocks waiting for the module. Call at a cadence
    /// faster than the configured upload interval to keep up.
    pub async fn poll_stream(&mut self) -> Result<Option<DistanceSample>> {
        if !self.session.is_auto_upload() {
            return Err(Error::StreamingInactive);
        }

        let available = self.transport.bytes_available()?;
        if available > 0 {
            let chunk = self.transport.read_exact(available, DRAIN_TIMEOUT).await?;
            self.decoder.extend(&chunk);
        }

        match self.decoder.try_decode() {
            Some(sample) => {
                self.session.record_sample(sample);
                Ok(Some(sample))
            }
            None => Ok(None),
        }
    }

    // Helper methods

    /// One request/response exchange: full frame back or an error, never a
    /// short read
    async fn exchange(&mut self, command: Command, payload: &[u8]) -> Result<Frame> {
        let request = Frame::request(command, self.address, payload);

        trace!("Sending: {:?}", request);
        self.transport.write(&request.encode()).await?;

        let raw = match self.transport.read_exact(Frame::SIZE, self.timeout).await {
            Ok(raw) => raw,
            Err(sonarust_transport::Error::ReadTimeout { millis }) => {
                return Err(Error::Timeout { millis });
            }
            Err(err) => return Err(err.into()),
        };

        let response = Frame::decode(&raw, command)?;
        trace!("Received: {:?}", response);

        Ok(response)
    }

    /// Exchange that additionally requires the acknowledgement sentinel
    async fn command_ack(&mut self, command: Command, payload: &[u8]) -> Result<Frame> {
        let response = self.exchange(command, payload).await?;

        if !response.is_ack() {
            warn!("{} refused (status 0x{:02X})", command, response.status);
            return Err(sonarust_core::Error::Rejected {
                command,
                status: response.status,
            }
            .into());
        }

        Ok(response)
    }
}
