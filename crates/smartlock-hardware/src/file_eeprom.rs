//! EEPROM image persisted to a file.
//!
//! Gives the control node a store that survives process restarts the way the
//! real EEPROM survives power cycles. The whole image is held in memory and
//! written through to disk on every byte write.

use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    HardwareError, Result, mock::eeprom::ERASED, traits::NonVolatileStore,
    types::EEPROM_CAPACITY,
};

/// File-backed EEPROM image.
///
/// # Examples
///
/// ```no_run
/// use smartlock_hardware::FileEeprom;
/// use smartlock_hardware::traits::NonVolatileStore;
///
/// # async fn example() -> smartlock_hardware::Result<()> {
/// let mut eeprom = FileEeprom::open("lock-eeprom.bin").await?;
/// eeprom.write_byte(1, 4).await?;
/// assert_eq!(eeprom.read_byte(1).await?, 4);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct FileEeprom {
    path: PathBuf,
    image: Vec<u8>,
}

impl FileEeprom {
    /// Open an image, creating an erased one if the file does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or created, or holds more
    /// bytes than the EEPROM.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();

        let image = match tokio::fs::read(&path).await {
            Ok(mut bytes) => {
                if bytes.len() > EEPROM_CAPACITY {
                    return Err(HardwareError::invalid_data(format!(
                        "EEPROM image {} is {} bytes, capacity is {EEPROM_CAPACITY}",
                        path.display(),
                        bytes.len()
                    )));
                }
                bytes.resize(EEPROM_CAPACITY, ERASED);
                debug!(path = %path.display(), "loaded EEPROM image");
                bytes
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let image = vec![ERASED; EEPROM_CAPACITY];
                tokio::fs::write(&path, &image).await?;
                info!(path = %path.display(), "created erased EEPROM image");
                image
            }
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, image })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl NonVolatileStore for FileEeprom {
    async fn write_byte(&mut self, address: u16, value: u8) -> Result<()> {
        let cell = self
            .image
            .get_mut(usize::from(address))
            .ok_or_else(|| HardwareError::address_out_of_range(address, EEPROM_CAPACITY))?;
        *cell = value;
        tokio::fs::write(&self.path, &self.image).await?;
        Ok(())
    }

    async fn read_byte(&mut self, address: u16) -> Result<u8> {
        self.image
            .get(usize::from(address))
            .copied()
            .ok_or_else(|| HardwareError::address_out_of_range(address, EEPROM_CAPACITY))
    }
}
