//! Persistent settings storage
//!
//! The camera persists exactly three user settings as 32-bit integers.
//! Backends (ESP-IDF NVS, a sequential-storage map on raw flash, ...) are
//! board specific; the pipeline only sees [`SettingsStore`].

/// Keys of the persisted user settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum SettingKey {
    /// Palette and marker combination (0..=3)
    PaletteMarker = 0,
    /// Emissivity in percent (one of the enumerated values 10..=100)
    Emissivity = 1,
    /// Display units (0 = imperial, 1 = metric)
    Units = 2,
}

impl SettingKey {
    /// All keys in index order
    pub const ALL: [SettingKey; 3] = [
        SettingKey::PaletteMarker,
        SettingKey::Emissivity,
        SettingKey::Units,
    ];

    /// Get the key as a byte value
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Create a key from a byte value
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(SettingKey::PaletteMarker),
            1 => Some(SettingKey::Emissivity),
            2 => Some(SettingKey::Units),
            _ => None,
        }
    }

    /// Value written when the key does not exist yet
    pub fn default_value(self) -> i32 {
        match self {
            SettingKey::PaletteMarker => 0,
            SettingKey::Emissivity => 97,
            SettingKey::Units => 0,
        }
    }

    /// Name of the entry in a named key/value backend
    pub fn name(self) -> &'static str {
        match self {
            SettingKey::PaletteMarker => "palette_marker",
            SettingKey::Emissivity => "emissivity",
            SettingKey::Units => "units",
        }
    }
}

/// Errors from settings storage operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum StorageError {
    /// Key not found
    NotFound,
    /// Backend read or write failed
    Storage,
    /// Stored data corrupted or invalid
    Corrupted,
    /// Storage is full
    Full,
}

/// Persistent key/value store for user settings
pub trait SettingsStore {
    /// Read the value stored under `key`
    ///
    /// Returns [`StorageError::NotFound`] if the key was never written.
    fn read(&mut self, key: SettingKey) -> impl core::future::Future<Output = Result<i32, StorageError>>;

    /// Write (create or replace) the value stored under `key`
    fn write(&mut self, key: SettingKey, value: i32) -> impl core::future::Future<Output = Result<(), StorageError>>;

    /// Erase all stored settings
    fn erase_all(&mut self) -> impl core::future::Future<Output = Result<(), StorageError>>;
}

// Implement the sequential-storage Key trait when the feature is enabled
#[cfg(feature = "sequential-storage")]
impl sequential_storage::map::Key for SettingKey {
    fn serialize_into(
        &self,
        buffer: &mut [u8],
    ) -> Result<usize, sequential_storage::map::SerializationError> {
        match buffer.first_mut() {
            Some(slot) => {
                *slot = self.as_u8();
                Ok(1)
            }
            None => Err(sequential_storage::map::SerializationError::BufferTooSmall),
        }
    }

    fn deserialize_from(
        buffer: &[u8],
    ) -> Result<(Self, usize), sequential_storage::map::SerializationError> {
        let byte = buffer
            .first()
            .ok_or(sequential_storage::map::SerializationError::BufferTooSmall)?;
        SettingKey::from_u8(*byte)
            .map(|key| (key, 1))
            .ok_or(sequential_storage::map::SerializationError::InvalidFormat)
    }
}
