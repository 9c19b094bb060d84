//! The stored credential survives a control node restart.

use smartlock_control::{ControlConfig, ControlNode};
use smartlock_core::{MenuOption, SessionPhase, Verdict};
use smartlock_hardware::TokioClock;
use smartlock_hardware::mock::{MockBuzzer, MockEeprom, MockMotor};
use smartlock_protocol::Link;
use tokio::io::{AsyncReadExt, AsyncWriteExt, duplex};

#[tokio::test]
async fn test_credential_survives_restart() {
    let (eeprom, eeprom_handle) = MockEeprom::new();

    // First power-up: provision 2-4-6-8-0.
    {
        let (ours, mut peer) = duplex(64);
        let (motor, _) = MockMotor::new();
        let (buzzer, _) = MockBuzzer::new();
        let mut node = ControlNode::new(
            Link::new(ours),
            eeprom,
            motor,
            buzzer,
            TokioClock,
            ControlConfig::default(),
        );
        let mut session = node.session();

        let interface = async move {
            assert_eq!(peer.read_u8().await.unwrap(), 0x01);
            peer.write_all(&[2, 4, 6, 8, 0, 2, 4, 6, 8, 0, 0x05])
                .await
                .unwrap();
            peer.read_u8().await.unwrap()
        };
        let (verdict, result) = tokio::join!(interface, node.run(&mut session));

        assert_eq!(verdict, 0x03);
        result.unwrap();
    }

    assert_eq!(eeprom_handle.read(1, 5), vec![2, 4, 6, 8, 0]);

    // Second power-up on the same cells, checked without re-provisioning.
    let (ours, mut peer) = duplex(64);
    let (motor, _) = MockMotor::new();
    let (buzzer, _) = MockBuzzer::new();
    let mut node = ControlNode::new(
        Link::new(ours),
        MockEeprom::reopen(&eeprom_handle),
        motor,
        buzzer,
        TokioClock,
        ControlConfig::default(),
    );
    let mut session = node.session();
    session.settle_provisioning(Verdict::Correct).unwrap();
    session.choose(MenuOption::ChangePassword).unwrap();

    let interface = async move {
        assert_eq!(peer.read_u8().await.unwrap(), 0x06);
        peer.write_all(&[2, 4, 6, 8, 0, 0x04]).await.unwrap();
        peer.read_u8().await.unwrap()
    };
    let (verdict, phase) = tokio::join!(interface, node.step(&mut session));

    assert_eq!(verdict, 0x03);
    assert_eq!(phase.unwrap(), SessionPhase::Provisioning);
}
