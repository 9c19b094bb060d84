//! Interface node of the smart lock.
//!
//! The interface node is the initiator on the link. It owns the keypad and
//! the 16x2 display, collects credentials and menu choices from the user,
//! forwards them to the control node and shows the verdicts it gets back.
//! It never sees the stored credential.
//!
//! # Example
//!
//! ```no_run
//! use smartlock_hardware::TokioClock;
//! use smartlock_hardware::mock::{MockDisplay, MockKeypad};
//! use smartlock_interface::{InterfaceConfig, InterfaceNode};
//! use smartlock_protocol::Link;
//!
//! # async fn example(stream: tokio::io::DuplexStream) -> smartlock_interface::Result<()> {
//! let keypad = MockKeypad::from_keys("12345= 12345= +12345=");
//! let (display, _screen) = MockDisplay::new();
//!
//! let mut node = InterfaceNode::new(
//!     Link::new(stream),
//!     keypad,
//!     display,
//!     TokioClock,
//!     InterfaceConfig::default(),
//! );
//! let mut session = node.session();
//! node.run(&mut session).await?;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod entry;
pub mod error;
pub mod node;
pub mod screens;

pub use config::InterfaceConfig;
pub use entry::{Prompt, read_credential};
pub use error::{NodeError, Result};
pub use node::InterfaceNode;
pub use screens::Screen;
