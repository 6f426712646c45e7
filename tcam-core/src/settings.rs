//! Cached user settings and their persistence
//!
//! The store is read once at boot; afterwards the cache answers every read
//! and writes go through to the store.

use tcam_hal::{SettingKey, SettingsStore, StorageError};

/// In-memory copy of the persisted settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Settings {
    palette_marker: i32,
    emissivity: i32,
    units: i32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            palette_marker: SettingKey::PaletteMarker.default_value(),
            emissivity: SettingKey::Emissivity.default_value(),
            units: SettingKey::Units.default_value(),
        }
    }
}

impl Settings {
    pub fn get(&self, key: SettingKey) -> i32 {
        match key {
            SettingKey::PaletteMarker => self.palette_marker,
            SettingKey::Emissivity => self.emissivity,
            SettingKey::Units => self.units,
        }
    }

    pub fn set(&mut self, key: SettingKey, value: i32) {
        match key {
            SettingKey::PaletteMarker => self.palette_marker = value,
            SettingKey::Emissivity => self.emissivity = value,
            SettingKey::Units => self.units = value,
        }
    }

    /// Read by raw index; unsupported indices read as 0
    pub fn get_index(&self, index: u8) -> i32 {
        match SettingKey::from_u8(index) {
            Some(key) => self.get(key),
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Read of unsupported setting index {}", index);
                0
            }
        }
    }

    /// Write by raw index; unsupported indices are ignored
    pub fn set_index(&mut self, index: u8, value: i32) {
        match SettingKey::from_u8(index) {
            Some(key) => self.set(key, value),
            None => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Write of unsupported setting index {}", index);
            }
        }
    }

    /// Emissivity clamped to the range the sensor accepts
    pub fn emissivity_percent(&self) -> u8 {
        self.emissivity.clamp(1, 100) as u8
    }
}

/// A settings change to be written to the store
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Commit {
    pub key: SettingKey,
    pub value: i32,
}

/// Load every setting, creating missing entries with their defaults
///
/// Corrupted storage is erased and rebuilt from defaults. A key that
/// cannot be read for another reason keeps its default in the cache and is
/// left untouched in the store.
pub async fn load_or_init<S: SettingsStore>(store: &mut S) -> Settings {
    let mut settings = Settings::default();

    for key in SettingKey::ALL {
        match store.read(key).await {
            Ok(value) => settings.set(key, value),
            Err(StorageError::NotFound) => create(store, key).await,
            Err(StorageError::Corrupted) => {
                #[cfg(feature = "defmt")]
                defmt::warn!("Settings corrupted at {}, erasing", key.name());
                reset_to_defaults(store).await;
                return Settings::default();
            }
            Err(_e) => {
                #[cfg(feature = "defmt")]
                defmt::error!("Error reading setting {}: {}", key.name(), _e);
            }
        }
    }

    settings
}

async fn create<S: SettingsStore>(store: &mut S, key: SettingKey) {
    let value = key.default_value();
    #[cfg(feature = "defmt")]
    defmt::info!("Creating setting {} = {}", key.name(), value);
    if let Err(_e) = store.write(key, value).await {
        #[cfg(feature = "defmt")]
        defmt::error!("Failed to create setting {}: {}", key.name(), _e);
    }
}

async fn reset_to_defaults<S: SettingsStore>(store: &mut S) {
    if let Err(_e) = store.erase_all().await {
        #[cfg(feature = "defmt")]
        defmt::error!("Failed to erase settings: {}", _e);
        return;
    }
    for key in SettingKey::ALL {
        create(store, key).await;
    }
}

/// Write a commit to the store
///
/// The cache was already updated by whoever produced the commit, so a
/// failed write only loses the value at power-off.
pub async fn persist<S: SettingsStore>(store: &mut S, commit: Commit) -> Result<(), StorageError> {
    store.write(commit.key, commit.value).await
}
