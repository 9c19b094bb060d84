//! Control node of the smart lock.
//!
//! The control node is the responder on the link. It owns the stored
//! credential, compares every candidate the interface node sends, drives the
//! door motor on a verified open request and sounds the buzzer when the
//! retry budget runs out.
//!
//! # Example
//!
//! ```no_run
//! use smartlock_control::{ControlConfig, ControlNode};
//! use smartlock_hardware::TokioClock;
//! use smartlock_hardware::mock::{MockBuzzer, MockEeprom, MockMotor};
//! use smartlock_protocol::Link;
//!
//! # async fn example(stream: tokio::io::DuplexStream) -> smartlock_control::Result<()> {
//! let (eeprom, _) = MockEeprom::new();
//! let (motor, _) = MockMotor::new();
//! let (buzzer, _) = MockBuzzer::new();
//!
//! let mut node = ControlNode::new(
//!     Link::new(stream),
//!     eeprom,
//!     motor,
//!     buzzer,
//!     TokioClock,
//!     ControlConfig::default(),
//! );
//! let mut session = node.session();
//! node.run(&mut session).await?;
//! # Ok(())
//! # }
//! ```

pub mod actuator;
pub mod config;
pub mod error;
pub mod node;
pub mod store;

pub use actuator::{Actuators, DoorStep, door_sequence};
pub use config::ControlConfig;
pub use error::{NodeError, Result};
pub use node::ControlNode;
pub use store::CredentialStore;
