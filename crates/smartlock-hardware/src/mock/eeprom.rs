//! Mock EEPROM.

use std::sync::{Arc, Mutex};

use super::lock;
use crate::{HardwareError, Result, traits::NonVolatileStore, types::EEPROM_CAPACITY};

/// Value of an erased EEPROM cell.
pub const ERASED: u8 = 0xFF;

#[derive(Debug)]
struct EepromState {
    cells: Vec<u8>,
    writes: Vec<(u16, u8)>,
}

/// In-memory EEPROM with an observable write log.
///
/// Cells start erased (`0xFF`). Clone the handle before moving the store
/// into a node to inspect its contents afterwards.
#[derive(Debug)]
pub struct MockEeprom {
    state: Arc<Mutex<EepromState>>,
}

impl MockEeprom {
    pub fn new() -> (Self, MockEepromHandle) {
        Self::with_capacity(EEPROM_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> (Self, MockEepromHandle) {
        let state = Arc::new(Mutex::new(EepromState {
            cells: vec![ERASED; capacity],
            writes: Vec::new(),
        }));
        let handle = MockEepromHandle {
            state: Arc::clone(&state),
        };
        (Self { state }, handle)
    }

    /// Attach another store to the same cells, as after a power cycle.
    pub fn reopen(handle: &MockEepromHandle) -> Self {
        Self {
            state: Arc::clone(&handle.state),
        }
    }
}

impl NonVolatileStore for MockEeprom {
    async fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        let mut state = lock(&self.state);
        let capacity = state.cells.len();
        let cell = state
            .cells
            .get_mut(usize::from(address))
            .ok_or_else(|| HardwareError::address_out_of_range(address, capacity))?;
        *cell = value;
        state.writes.push((address, value));
        Ok(())
    }

    async fn read_byte(&mut self, address: u16) -> Result<u8> {
        let state = lock(&self.state);
        state
            .cells
            .get(usize::from(address))
            .copied()
            .ok_or_else(|| HardwareError::address_out_of_range(address, state.cells.len()))
    }
}

/// Observer for a [`MockEeprom`].
#[derive(Debug, Clone)]
pub struct MockEepromHandle {
    state: Arc<Mutex<EepromState>>,
}

impl MockEepromHandle {
    /// Bytes at `address..address + len`.
    pub fn read(&self, address: u16, len: usize) -> Vec<u8> {
        let state = lock(&self.state);
        let start = usize::from(address).min(state.cells.len());
        let end = (start + len).min(state.cells.len());
        state.cells[start..end].to_vec()
    }

    /// Every write so far as (address, value), oldest first.
    pub fn writes(&self) -> Vec<(u16, u8)> {
        lock(&self.state).writes.clone()
    }

    pub fn write_count(&self) -> usize {
        lock(&self.state).writes.len()
    }

    /// Seed cells directly, bypassing the write log.
    pub fn preload(&self, address: u16, bytes: &[u8]) {
        let mut state = lock(&self.state);
        let start = usize::from(address);
        for (offset, &byte) in bytes.iter().enumerate() {
            if let Some(cell) = state.cells.get_mut(start + offset) {
                *cell = byte;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_then_read() {
        let (mut eeprom, handle) = MockEeprom::new();

        eeprom.write_byte(1, 7).await.unwrap();
        assert_eq!(eeprom.read_byte(1).await.unwrap(), 7);
        assert_eq!(handle.read(0, 3), vec![ERASED, 7, ERASED]);
        assert_eq!(handle.writes(), vec![(1, 7)]);
    }

    #[tokio::test]
    async fn test_out_of_range_address() {
        let (mut eeprom, handle) = MockEeprom::with_capacity(8);

        let err = eeprom.write_byte(8, 1).await.unwrap_err();
        assert!(matches!(
            err,
            HardwareError::AddressOutOfRange { address: 8, capacity: 8 }
        ));
        assert!(eeprom.read_byte(100).await.is_err());
        assert_eq!(handle.write_count(), 0);
    }

    #[tokio::test]
    async fn test_reopen_shares_cells() {
        let (mut eeprom, handle) = MockEeprom::new();
        eeprom.write_byte(3, 9).await.unwrap();
        drop(eeprom);

        let mut reopened = MockEeprom::reopen(&handle);
        assert_eq!(reopened.read_byte(3).await.unwrap(), 9);
    }

    #[tokio::test]
    async fn test_preload_skips_write_log() {
        let (mut eeprom, handle) = MockEeprom::new();
        handle.preload(1, &[1, 2, 3, 4, 5]);

        assert_eq!(eeprom.read_byte(5).await.unwrap(), 5);
        assert_eq!(handle.write_count(), 0);
    }
}
