//! Both nodes of the lock wired together in one process.
//!
//! The serial line becomes a `tokio::io::duplex` pair and every peripheral
//! is a mock whose handle stays observable after the run. Each node runs
//! until its own input is exhausted: the interface node until the keypad
//! has no more keys, the control node until the interface node hangs up.

use tokio::io::{DuplexStream, duplex};
use tracing::{Instrument, info, info_span};

use smartlock_control::ControlNode;
use smartlock_core::Session;
use smartlock_hardware::TokioClock;
use smartlock_hardware::mock::{
    MockBuzzer, MockBuzzerHandle, MockDisplay, MockDisplayHandle, MockEeprom, MockEepromHandle,
    MockKeypad, MockKeypadHandle, MockMotor, MockMotorHandle,
};
use smartlock_interface::InterfaceNode;
use smartlock_protocol::Link;

use crate::config::LockConfig;
use crate::error::Result;

/// Bytes buffered in each direction of the simulated serial line.
const LINE_BUFFER: usize = 64;

type Control = ControlNode<DuplexStream, MockEeprom, MockMotor, MockBuzzer>;
type Interface = InterfaceNode<DuplexStream, MockKeypad, MockDisplay>;

/// Observation handles for the simulated peripherals.
#[derive(Debug, Clone)]
pub struct Monitors {
    pub display: MockDisplayHandle,
    pub motor: MockMotorHandle,
    pub buzzer: MockBuzzerHandle,
    pub eeprom: MockEepromHandle,
}

/// Both sessions as they were when the run ended.
#[derive(Debug, Clone)]
pub struct LockReport {
    pub control: Session,
    pub interface: Session,
}

impl LockReport {
    /// Whether the two nodes agree on phase, remaining attempts and
    /// lockout count.
    pub fn in_lockstep(&self) -> bool {
        self.control.phase() == self.interface.phase()
            && self.control.retries().remaining() == self.interface.retries().remaining()
            && self.control.lockouts() == self.interface.lockouts()
    }
}

/// An interface node and a control node talking over an in-memory line.
///
/// ```
/// use smartlock_emulator::SimulatedLock;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> smartlock_emulator::Result<()> {
/// let lock = SimulatedLock::builder().build()?;
/// let monitors = lock.monitors().clone();
///
/// let report = lock.run_script("12345= 12345=").await?;
///
/// assert_eq!(monitors.eeprom.read(1, 5), vec![1, 2, 3, 4, 5]);
/// assert!(report.in_lockstep());
/// # Ok(())
/// # }
/// ```
pub struct SimulatedLock {
    control: Control,
    interface: Interface,
    keypad: MockKeypadHandle,
    monitors: Monitors,
}

impl SimulatedLock {
    pub fn builder() -> SimulatedLockBuilder {
        SimulatedLockBuilder::default()
    }

    pub fn monitors(&self) -> &Monitors {
        &self.monitors
    }

    /// The keypad feeding the interface node.
    ///
    /// Clones kept past [`SimulatedLock::run`] keep the keypad connected, so
    /// the run only ends once they are dropped too.
    pub fn keypad(&self) -> &MockKeypadHandle {
        &self.keypad
    }

    /// Queue `keys` (`0-9 = + - c`, whitespace ignored) and run to the end
    /// of the script.
    ///
    /// # Errors
    /// See [`SimulatedLock::run`].
    pub async fn run_script(self, keys: &str) -> Result<LockReport> {
        self.keypad.send_keys(keys)?;
        self.run().await
    }

    /// Run both nodes until the keypad is exhausted.
    ///
    /// A node that stops hangs up its end of the line, which in turn stops
    /// the other one once it next touches the link.
    ///
    /// # Errors
    /// The first node failure other than a clean shutdown.
    pub async fn run(self) -> Result<LockReport> {
        let SimulatedLock {
            mut control,
            mut interface,
            keypad,
            ..
        } = self;
        drop(keypad);

        let control_side = async move {
            let mut session = control.session();
            let result = control.run(&mut session).await;
            drop(control);
            (result, session)
        }
        .instrument(info_span!("node", role = "control"));

        let interface_side = async move {
            let mut session = interface.session();
            let result = interface.run(&mut session).await;
            drop(interface);
            (result, session)
        }
        .instrument(info_span!("node", role = "interface"));

        let ((control_result, control), (interface_result, interface)) =
            tokio::join!(control_side, interface_side);
        control_result?;
        interface_result?;

        let report = LockReport { control, interface };
        info!(
            phase = %report.interface.phase(),
            lockstep = report.in_lockstep(),
            "simulation finished"
        );
        Ok(report)
    }
}

/// Builder for [`SimulatedLock`].
#[derive(Debug, Default)]
pub struct SimulatedLockBuilder {
    config: LockConfig,
    store: Option<MockEepromHandle>,
}

impl SimulatedLockBuilder {
    pub fn with_config(mut self, config: LockConfig) -> Self {
        self.config = config;
        self
    }

    /// Reuse the EEPROM cells of an earlier lock, as after a power cycle.
    pub fn with_store(mut self, store: &MockEepromHandle) -> Self {
        self.store = Some(store.clone());
        self
    }

    /// Validate the configuration and wire the two nodes.
    ///
    /// # Errors
    /// Returns `EmulatorError::Config` when the configuration is rejected.
    pub fn build(self) -> Result<SimulatedLock> {
        self.config.validate()?;

        let (eeprom, eeprom_handle) = match self.store {
            Some(handle) => (MockEeprom::reopen(&handle), handle),
            None => MockEeprom::new(),
        };
        let (motor, motor_handle) = MockMotor::new();
        let (buzzer, buzzer_handle) = MockBuzzer::new();
        let (keypad, keypad_handle) = MockKeypad::new();
        let (display, display_handle) = MockDisplay::new();

        let (control_end, interface_end) = duplex(LINE_BUFFER);
        let control = ControlNode::new(
            Link::with_config(control_end, &self.config.link),
            eeprom,
            motor,
            buzzer,
            TokioClock,
            self.config.control,
        );
        let interface = InterfaceNode::new(
            Link::with_config(interface_end, &self.config.link),
            keypad,
            display,
            TokioClock,
            self.config.interface,
        );

        Ok(SimulatedLock {
            control,
            interface,
            keypad: keypad_handle,
            monitors: Monitors {
                display: display_handle,
                motor: motor_handle,
                buzzer: buzzer_handle,
                eeprom: eeprom_handle,
            },
        })
    }
}
