//! Randomised end-to-end checks of the credential round trip.

use proptest::prelude::*;
use smartlock_emulator::SimulatedLock;

fn keys(digits: &[u8; 5]) -> String {
    digits.iter().map(|d| char::from(b'0' + d)).collect()
}

fn simulate(script: String) -> (Vec<u8>, usize, usize) {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .start_paused(true)
        .build()
        .unwrap();
    runtime.block_on(async move {
        let lock = SimulatedLock::builder().build().unwrap();
        let monitors = lock.monitors().clone();
        lock.run_script(&script).await.unwrap();
        (
            monitors.eeprom.read(1, 5),
            monitors.motor.events().len(),
            monitors.display.occurrences("Wrong Password"),
        )
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn stored_credential_opens_the_door(digits in proptest::array::uniform5(0u8..=9)) {
        let entry = keys(&digits);
        let (stored, motor_events, wrong) =
            simulate(format!("{entry}= {entry}= +{entry}="));

        prop_assert_eq!(stored, digits.to_vec());
        prop_assert_eq!(motor_events, 4);
        prop_assert_eq!(wrong, 0);
    }

    #[test]
    fn any_other_candidate_is_refused(
        digits in proptest::array::uniform5(0u8..=9),
        candidate in proptest::array::uniform5(0u8..=9),
    ) {
        prop_assume!(digits != candidate);
        let entry = keys(&digits);
        let (_, motor_events, wrong) =
            simulate(format!("{entry}= {entry}= +{}=", keys(&candidate)));

        prop_assert_eq!(motor_events, 0);
        prop_assert_eq!(wrong, 1);
    }
}
