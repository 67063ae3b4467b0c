//! Sans-io CAT protocol translator for the RS-HFIQ transceiver board.
//!
//! Sits between a generic CAT control surface (logging and rig-control
//! software) and the board's native ASCII command set. Controller
//! commands arrive as `*<cmd><CR/LF>` lines; this crate frames them,
//! validates frequencies against a band plan, tracks the VFO/mode
//! state the single-VFO hardware does not, and relays device replies.
//!
//! The byte transport is a collaborator supplied by the caller via the
//! [`Transport`] trait; this crate never opens ports or enumerates USB.
//!
//! # Example
//!
//! ```no_run
//! use rshfiq_cat::{freq, Dispatcher, Wait};
//! use std::time::Duration;
//! # struct Port;
//! # impl rshfiq_cat::Transport for Port {
//! #     fn bytes_available(&self) -> usize { 0 }
//! #     fn read_byte(&mut self) -> Option<u8> { None }
//! #     fn write(&mut self, _: &[u8]) {}
//! #     fn connection_state(&self) -> rshfiq_cat::Link { rshfiq_cat::Link::Connected }
//! # }
//! # fn open_device_port() -> Port { Port }
//!
//! let port = open_device_port();
//! let mut cat = Dispatcher::new(port, freq(7_074_000), Wait::Timeout(Duration::from_millis(250)));
//!
//! // Per byte from the controller channel:
//! for &byte in b"*FA7074000\r" {
//!     if let Some(outcome) = cat.feed(byte) {
//!         println!("{:?}", outcome);
//!     }
//! }
//! ```

pub mod bands;
pub mod command;
pub mod dispatcher;
mod error;
pub mod framer;
pub mod transport;
mod types;
pub mod vocab;

pub use crate::bands::{BandEntry, BandId, BandPlan, BandPlanError};
pub use crate::command::{parse_command, CatCommand, Vfo};
pub use crate::dispatcher::{DispatchOutcome, Dispatcher, Flag, VfoState, Wait};
pub use crate::error::{Error, Result};
pub use crate::framer::{CommandFramer, CommandLine, ReplyFramer, ReplyLine};
pub use crate::transport::{Link, Transport};
pub use crate::types::{freq, Frequency};
