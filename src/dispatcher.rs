//! Command dispatch and VFO state tracking.
//!
//! The board has a single hardware VFO and tracks nothing else, but
//! the controller-facing CAT surface expects two logical VFO slots,
//! split/swap flags, and transmit state. The [`Dispatcher`] owns that
//! derived state, translates controller commands into the native
//! vocabulary, and relays device replies.
//!
//! All VFO state mutation happens here, through dispatch of recognized
//! commands; the framers never touch it.

use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info, warn};

use crate::bands::{BandId, BandPlan};
use crate::command::{parse_command, CatCommand, Vfo};
use crate::error::{Error, Result};
use crate::framer::{CommandFramer, CommandLine, ReplyFramer, ReplyLine, CMD_CAPACITY};
use crate::transport::{Link, Transport};
use crate::types::Frequency;
use crate::vocab::{encode_raw, NativeCommand, WireCommand};

/// How long to wait for a device reply to a query.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Wait {
    /// Return immediately with whatever is already pending.
    NonBlocking,
    /// Poll the transport until a full reply arrives or the deadline
    /// passes. Never an unbounded wait.
    Timeout(Duration),
}

/// The derived state the device itself does not track.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VfoState {
    vfo_a: Frequency,
    vfo_b: Frequency,
    active_is_a: bool,
    split: bool,
    transmit: bool,
    current_band: Option<BandId>,
}

impl VfoState {
    pub fn vfo_a(&self) -> Frequency {
        self.vfo_a
    }

    pub fn vfo_b(&self) -> Frequency {
        self.vfo_b
    }

    /// The frequency of whichever slot is active per the swap flag.
    pub fn active(&self) -> Frequency {
        if self.active_is_a {
            self.vfo_a
        } else {
            self.vfo_b
        }
    }

    pub fn active_is_a(&self) -> bool {
        self.active_is_a
    }

    pub fn split(&self) -> bool {
        self.split
    }

    pub fn transmit(&self) -> bool {
        self.transmit
    }

    /// Band of the last accepted frequency, `None` until one resolves.
    pub fn current_band(&self) -> Option<BandId> {
        self.current_band
    }
}

/// Mode flags mutated locally, never forwarded to the device.
#[derive(PartialEq, Eq, Debug, Copy, Clone)]
pub enum Flag {
    Transmit,
    Split,
    Swap,
}

/// What a dispatched command did.
///
/// Every classified command produces one of these or an [`Error`];
/// nothing is silently dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// A frequency was accepted, applied, and sent to the device.
    FrequencySet {
        vfo: Vfo,
        freq: Frequency,
        band: BandId,
    },
    /// Answered from local VFO state; the device was not involved.
    LocalReply(ReplyLine),
    /// A mode flag changed.
    FlagChanged { flag: Flag, value: bool },
    /// Forwarded to the device and a reply line was relayed.
    DeviceReply(ReplyLine),
    /// Forwarded to the device; no reply collected (none pending, or
    /// none expected for this command class).
    Forwarded,
    /// A non-blocking query found nothing pending.
    NoReply,
}

/// Protocol translator between a CAT controller and the board.
///
/// Generic over the device [`Transport`]; the controller side is fed
/// byte-wise through [`feed`](Self::feed) or line-wise through
/// [`dispatch`](Self::dispatch).
#[derive(Debug)]
pub struct Dispatcher<T: Transport> {
    transport: T,
    bands: BandPlan,
    state: VfoState,
    commands: CommandFramer,
    replies: ReplyFramer,
    wait: Wait,
}

impl<T: Transport> Dispatcher<T> {
    /// Create a dispatcher with the stock band plan.
    ///
    /// Both VFO slots start at `initial`; `current_band` is resolved
    /// from it if it lies inside a band.
    pub fn new(transport: T, initial: Frequency, wait: Wait) -> Self {
        Self::with_band_plan(transport, BandPlan::default(), initial, wait)
    }

    /// Create a dispatcher with a caller-supplied band plan.
    pub fn with_band_plan(transport: T, bands: BandPlan, initial: Frequency, wait: Wait) -> Self {
        let current_band = bands.resolve(initial);
        Self {
            transport,
            bands,
            state: VfoState {
                vfo_a: initial,
                vfo_b: initial,
                active_is_a: true,
                split: false,
                transmit: false,
                current_band,
            },
            commands: CommandFramer::new(),
            replies: ReplyFramer::new(),
            wait,
        }
    }

    pub fn state(&self) -> &VfoState {
        &self.state
    }

    pub fn band_plan(&self) -> &BandPlan {
        &self.bands
    }

    /// Feed one byte from the controller channel. When the byte
    /// completes a command line, the line is dispatched and the
    /// outcome returned.
    pub fn feed(&mut self, byte: u8) -> Option<Result<DispatchOutcome>> {
        self.commands.push_byte(byte);
        let line = self.commands.take_line()?;
        Some(self.dispatch(&line))
    }

    /// Dispatch one completed command line.
    ///
    /// The line is consumed regardless of success; a failed command
    /// never lingers to merge with a later one.
    ///
    /// # Errors
    /// All errors are recoverable; the caller's loop should report
    /// them and keep feeding bytes.
    pub fn dispatch(&mut self, line: &CommandLine) -> Result<DispatchOutcome> {
        if line.truncated() {
            // The body lost bytes before its terminator; acting on the
            // mangled remainder could move the VFO somewhere unintended.
            return Err(Error::BufferOverflow {
                capacity: CMD_CAPACITY - 1,
            });
        }
        debug!("dispatching command: {:?}", line.as_str());
        match parse_command(line.as_str()) {
            CatCommand::SetFrequency { vfo, digits } => {
                let freq: Frequency = digits.parse()?;
                let (freq, band) = self.apply_frequency(vfo, freq)?;
                Ok(DispatchOutcome::FrequencySet { vfo, freq, band })
            }
            CatCommand::Step(delta) => {
                let (freq, band) = self.step_active(delta)?;
                Ok(DispatchOutcome::FrequencySet {
                    vfo: Vfo::Active,
                    freq,
                    band,
                })
            }
            CatCommand::QueryVfo(vfo) => Ok(DispatchOutcome::LocalReply(self.local_vfo_reply(vfo))),
            CatCommand::Transmit(on) => {
                self.state.transmit = on;
                info!("transmit {}", if on { "on" } else { "off" });
                Ok(DispatchOutcome::FlagChanged {
                    flag: Flag::Transmit,
                    value: on,
                })
            }
            CatCommand::Split(on) => {
                self.state.split = on;
                info!("split mode {}", if on { "on" } else { "off" });
                Ok(DispatchOutcome::FlagChanged {
                    flag: Flag::Split,
                    value: on,
                })
            }
            CatCommand::SwapVfo => {
                let swapped = self.toggle_swap();
                Ok(DispatchOutcome::FlagChanged {
                    flag: Flag::Swap,
                    value: swapped,
                })
            }
            CatCommand::SetBitFrequency(digits) => {
                let freq: Frequency = digits.parse()?;
                self.send(NativeCommand::SetBitFrequency.encode_with(&freq.to_digits()))?;
                Ok(self.collect_pending_reply())
            }
            CatCommand::SetExtFrequency(digits) => {
                let freq: Frequency = digits.parse()?;
                self.send(NativeCommand::SetExtFrequency.encode_with(&freq.to_digits()))?;
                Ok(self.collect_pending_reply())
            }
            CatCommand::SetOffset(digits) => {
                // The board, not this layer, validates the offset range;
                // the digits go out unmodified.
                self.send(NativeCommand::SetOffset.encode_with(digits.as_bytes()))?;
                Ok(self.collect_pending_reply())
            }
            CatCommand::Query(q) => {
                self.send(encode_raw(q.as_bytes()))?;
                match self.await_reply()? {
                    Some(reply) => Ok(DispatchOutcome::DeviceReply(reply)),
                    None => Ok(DispatchOutcome::NoReply),
                }
            }
            CatCommand::Raw(r) => {
                // Unknown but maybe valid native command; the board is
                // the authority on its own vocabulary.
                self.send(encode_raw(r.as_bytes()))?;
                Ok(self.collect_pending_reply())
            }
        }
    }

    /// Validate `hz` against the band plan and, on success, apply it to
    /// the targeted VFO slot and send the native set-frequency command.
    ///
    /// # Errors
    /// [`Error::FrequencyOutOfBand`] leaves every part of the VFO state
    /// untouched. This is the load-bearing guarantee of the whole
    /// translator: a bad frequency must never desynchronize VFO A/B.
    pub fn set_frequency(&mut self, vfo: Vfo, hz: u32) -> Result<Frequency> {
        let freq = Frequency::new(hz)?;
        self.apply_frequency(vfo, freq).map(|(freq, _)| freq)
    }

    /// Move the active VFO by a signed step (Hz), through the same
    /// validation path as a full set-frequency command.
    pub fn step_frequency(&mut self, delta: i32) -> Result<Frequency> {
        self.step_active(delta).map(|(freq, _)| freq)
    }

    /// Forward a recognized query verbatim and relay the reply, per the
    /// configured wait policy.
    ///
    /// # Errors
    /// [`Error::DeviceTimeout`] if a blocking wait expires, or
    /// [`Error::Disconnected`] if the link is down.
    pub fn query(&mut self, native: &str) -> Result<Option<ReplyLine>> {
        self.send(encode_raw(native.as_bytes()))?;
        self.await_reply()
    }

    pub fn set_transmit(&mut self, on: bool) {
        self.state.transmit = on;
    }

    pub fn set_split(&mut self, on: bool) {
        self.state.split = on;
    }

    /// Toggle the A/B swap flag. Returns true when B is now active.
    pub fn toggle_swap(&mut self) -> bool {
        self.state.active_is_a = !self.state.active_is_a;
        info!(
            "VFO swap: active is now {}",
            if self.state.active_is_a { "A" } else { "B" }
        );
        !self.state.active_is_a
    }

    /// Forward an offset-set command with the raw digit string.
    pub fn set_offset(&mut self, raw_digits: &str) -> Result<()> {
        self.send(NativeCommand::SetOffset.encode_with(raw_digits.as_bytes()))
    }

    fn apply_frequency(&mut self, vfo: Vfo, freq: Frequency) -> Result<(Frequency, BandId)> {
        let band = self.bands.resolve(freq).ok_or_else(|| {
            warn!("rejected {}: outside every configured band", freq);
            Error::FrequencyOutOfBand { hz: *freq }
        })?;
        self.send(NativeCommand::SetFrequency.encode_with(&freq.to_digits()))?;
        let slot = match vfo {
            Vfo::A => &mut self.state.vfo_a,
            Vfo::B => &mut self.state.vfo_b,
            Vfo::Active => {
                if self.state.active_is_a {
                    &mut self.state.vfo_a
                } else {
                    &mut self.state.vfo_b
                }
            }
        };
        *slot = freq;
        self.state.current_band = Some(band);
        info!("{:?} set to {} ({})", vfo, freq, band);
        Ok((freq, band))
    }

    fn step_active(&mut self, delta: i32) -> Result<(Frequency, BandId)> {
        let current = self.state.active();
        let stepped = current
            .checked_step(delta)
            .ok_or(Error::FrequencyOutOfBand { hz: *current })?;
        self.apply_frequency(Vfo::Active, stepped)
    }

    /// Format the `*FA<9 digits>` / `*FB<9 digits>` reply for the
    /// locally answered VFO queries.
    fn local_vfo_reply(&self, vfo: Vfo) -> ReplyLine {
        let (tag, freq) = match vfo {
            Vfo::B => (b"*FB", self.state.vfo_b),
            _ => (b"*FA", self.state.vfo_a),
        };
        let mut out = [0u8; 12];
        out[..3].copy_from_slice(tag);
        out[3..].copy_from_slice(&freq.to_padded());
        ReplyLine::from_slice(&out)
    }

    fn send(&mut self, cmd: WireCommand) -> Result<()> {
        if self.transport.connection_state() == Link::Disconnected {
            warn!("device link down, dropping {:?}", cmd.as_slice());
            return Err(Error::Disconnected);
        }
        debug!("-> device: {:?}", cmd.as_slice());
        self.transport.write(&cmd);
        Ok(())
    }

    /// Drain whatever the device has already sent, returning a reply
    /// line if one completes. Used after set-style commands, where the
    /// board may or may not echo a status line.
    fn collect_pending_reply(&mut self) -> DispatchOutcome {
        match self.poll_reply() {
            Some(reply) => DispatchOutcome::DeviceReply(reply),
            None => DispatchOutcome::Forwarded,
        }
    }

    fn poll_reply(&mut self) -> Option<ReplyLine> {
        while let Some(byte) = self.transport.read_byte() {
            if let Some(line) = self.replies.push_byte(byte) {
                debug!("<- device: {:?}", line.as_str());
                return Some(line);
            }
        }
        None
    }

    /// Wait for a reply per the configured policy. A blocking wait
    /// polls with a deadline; a silently dead device surfaces as
    /// [`Error::DeviceTimeout`] instead of freezing the control loop.
    fn await_reply(&mut self) -> Result<Option<ReplyLine>> {
        match self.wait {
            Wait::NonBlocking => Ok(self.poll_reply()),
            Wait::Timeout(timeout) => {
                let deadline = Instant::now() + timeout;
                loop {
                    if let Some(reply) = self.poll_reply() {
                        return Ok(Some(reply));
                    }
                    if Instant::now() >= deadline {
                        warn!("no device reply within {:?}", timeout);
                        return Err(Error::DeviceTimeout { waited: timeout });
                    }
                    thread::yield_now();
                }
            }
        }
    }
}
