//! Stored credential on the control node's EEPROM.
//!
//! The five digits live at fixed offsets 1..=5, one byte each, with no
//! checksum or version tag. Digits are stored in plaintext; anyone able to
//! read the EEPROM can read the credential.

use tracing::debug;

use smartlock_core::Credential;
use smartlock_core::constants::{CREDENTIAL_LEN, STORE_BASE_ADDRESS};
use smartlock_hardware::NonVolatileStore;

use crate::error::Result;

/// Credential persistence over a byte-addressed store.
#[derive(Debug)]
pub struct CredentialStore<S> {
    store: S,
}

impl<S: NonVolatileStore> CredentialStore<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Overwrite the stored credential, one digit per offset.
    pub async fn persist(&mut self, credential: &Credential) -> Result<()> {
        for (address, &digit) in addresses().zip(credential.digits()) {
            self.store.write_byte(address, digit).await?;
        }
        debug!(len = CREDENTIAL_LEN, "credential persisted");
        Ok(())
    }

    /// Read the stored credential back.
    ///
    /// Bytes are taken as-is: an erased store yields a credential no keypad
    /// entry can match.
    pub async fn load(&mut self) -> Result<Credential> {
        let mut digits = [0u8; CREDENTIAL_LEN];
        for (address, slot) in addresses().zip(digits.iter_mut()) {
            *slot = self.store.read_byte(address).await?;
        }
        Ok(Credential::from_raw(digits))
    }
}

fn addresses() -> impl Iterator<Item = u16> {
    (0..CREDENTIAL_LEN as u16).map(|offset| STORE_BASE_ADDRESS + offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use smartlock_hardware::mock::MockEeprom;

    #[tokio::test]
    async fn test_persist_uses_offsets_one_to_five() {
        let (eeprom, handle) = MockEeprom::new();
        let mut store = CredentialStore::new(eeprom);

        store.persist(&"12345".parse().unwrap()).await.unwrap();

        assert_eq!(
            handle.writes(),
            vec![(1, 1), (2, 2), (3, 3), (4, 4), (5, 5)]
        );
        assert_eq!(handle.read(0, 7), vec![0xFF, 1, 2, 3, 4, 5, 0xFF]);
    }

    #[tokio::test]
    async fn test_persist_then_load_round_trips() {
        let (eeprom, _handle) = MockEeprom::new();
        let mut store = CredentialStore::new(eeprom);
        let credential: Credential = "90210".parse().unwrap();

        store.persist(&credential).await.unwrap();
        assert_eq!(store.load().await.unwrap(), credential);
    }

    #[tokio::test]
    async fn test_later_persist_overwrites() {
        let (eeprom, handle) = MockEeprom::new();
        let mut store = CredentialStore::new(eeprom);

        store.persist(&"11111".parse().unwrap()).await.unwrap();
        store.persist(&"22222".parse().unwrap()).await.unwrap();

        assert_eq!(store.load().await.unwrap(), "22222".parse::<Credential>().unwrap());
        assert_eq!(handle.write_count(), 10);
    }

    #[tokio::test]
    async fn test_erased_store_matches_nothing() {
        let (eeprom, _handle) = MockEeprom::new();
        let mut store = CredentialStore::new(eeprom);

        let stored = store.load().await.unwrap();
        assert_eq!(stored.digits(), &[0xFF; 5]);
        assert!(!stored.compare(&"00000".parse().unwrap()).verdict().is_correct());
    }
}
