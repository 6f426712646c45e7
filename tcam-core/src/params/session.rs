//! Button-driven parameter session
//!
//! A long press walks through the parameter groups, a short press steps
//! the active group's value. Changes preview live and are committed when
//! the group is left, either by a long press or by the inactivity timeout.

use core::fmt::Write;

use heapless::String;
use tcam_hal::SettingKey;

use crate::config::SessionConfig;
use crate::notify::VideoNotify;
use crate::render::RenderOptions;
use crate::settings::{Commit, Settings};

use super::emissivity::{emissivity_at, emissivity_index, EMISSIVITY_VALUES};

/// Longest HUD string
pub const HUD_TEXT_LEN: usize = 24;

/// Parameter groups in selection order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ParamGroup {
    /// Palette and markers; the resting group
    PaletteMarker,
    Emissivity,
    Units,
}

impl ParamGroup {
    pub fn index(self) -> u8 {
        match self {
            ParamGroup::PaletteMarker => 0,
            ParamGroup::Emissivity => 1,
            ParamGroup::Units => 2,
        }
    }

    /// Following group, wrapping to the resting group
    pub fn next(self) -> Self {
        match self {
            ParamGroup::PaletteMarker => ParamGroup::Emissivity,
            ParamGroup::Emissivity => ParamGroup::Units,
            ParamGroup::Units => ParamGroup::PaletteMarker,
        }
    }

    pub fn key(self) -> SettingKey {
        match self {
            ParamGroup::PaletteMarker => SettingKey::PaletteMarker,
            ParamGroup::Emissivity => SettingKey::Emissivity,
            ParamGroup::Units => SettingKey::Units,
        }
    }

    /// Largest value before wrapping to 0
    pub fn max_value(self) -> i32 {
        match self {
            ParamGroup::PaletteMarker => 3,
            ParamGroup::Emissivity => EMISSIVITY_VALUES.len() as i32 - 1,
            ParamGroup::Units => 1,
        }
    }
}

/// Button events relevant to the session
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionInput {
    /// Short press
    pub value_change: bool,
    /// Long press
    pub select: bool,
}

impl SessionInput {
    pub fn from_notify(notify: VideoNotify) -> Self {
        Self {
            value_change: notify.contains(VideoNotify::PARAM_VALUE),
            select: notify.contains(VideoNotify::PARAM_SELECT),
        }
    }
}

/// Side effects the caller has to carry out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SessionOutcome {
    /// Value to write to the settings store
    pub commit: Option<Commit>,
    /// Emissivity (percent) to apply to the sensor right away
    pub emissivity: Option<u8>,
}

/// Parameter selection state
#[derive(Debug, Clone)]
pub struct ParameterSession {
    timeout_ms: u64,
    group: ParamGroup,
    value: i32,
    previous: i32,
    deadline_ms: Option<u64>,
    /// Long press that arrived together with a short press
    select_pending: bool,
}

impl ParameterSession {
    /// Start in the resting group and apply the stored settings to `options`
    pub fn new(config: &SessionConfig, settings: &Settings, options: &mut RenderOptions) -> Self {
        let value = settings.get(SettingKey::PaletteMarker);
        options.apply_palette_marker(value);
        options.apply_units(settings.get(SettingKey::Units));

        Self {
            timeout_ms: config.entry_timeout_ms,
            group: ParamGroup::PaletteMarker,
            value,
            previous: value,
            deadline_ms: None,
            select_pending: false,
        }
    }

    pub fn group(&self) -> ParamGroup {
        self.group
    }

    /// Current value of the active group (table index for emissivity)
    pub fn value(&self) -> i32 {
        self.value
    }

    pub fn deadline_ms(&self) -> Option<u64> {
        self.deadline_ms
    }

    /// Handle at most one of: value change, group select, timeout
    ///
    /// A select that comes in with a value change is held back and handled
    /// by the next call.
    pub fn update(
        &mut self,
        input: SessionInput,
        now_ms: u64,
        settings: &mut Settings,
        options: &mut RenderOptions,
    ) -> SessionOutcome {
        let mut outcome = SessionOutcome::default();
        let select = input.select || core::mem::take(&mut self.select_pending);

        if input.value_change {
            outcome.emissivity = self.step_value(options);
            self.deadline_ms = Some(now_ms + self.timeout_ms);
            self.select_pending = select;
        } else if select {
            outcome.commit = self.take_commit(settings);
            self.enter(self.group.next(), settings);
            self.deadline_ms = match self.group {
                ParamGroup::PaletteMarker => None,
                _ => Some(now_ms + self.timeout_ms),
            };
        } else if let Some(deadline) = self.deadline_ms {
            if now_ms >= deadline {
                outcome.commit = self.take_commit(settings);
                self.enter(ParamGroup::PaletteMarker, settings);
                self.deadline_ms = None;
            }
        }

        outcome
    }

    /// HUD text for the active group, `None` in the resting group
    pub fn hud_text(&self) -> Option<String<HUD_TEXT_LEN>> {
        let mut text = String::new();
        let written = match self.group {
            ParamGroup::PaletteMarker => return None,
            ParamGroup::Emissivity => {
                write!(text, "Emissivity: {}", emissivity_at(self.value as u8))
            }
            ParamGroup::Units => {
                let name = if self.value == 0 { "Imperial" } else { "Metric" };
                write!(text, "Units: {}", name)
            }
        };
        written.ok().map(|_| text)
    }

    fn step_value(&mut self, options: &mut RenderOptions) -> Option<u8> {
        self.value += 1;
        if self.value > self.group.max_value() || self.value < 0 {
            self.value = 0;
        }

        match self.group {
            ParamGroup::PaletteMarker => {
                options.apply_palette_marker(self.value);
                None
            }
            ParamGroup::Emissivity => Some(emissivity_at(self.value as u8)),
            ParamGroup::Units => {
                options.apply_units(self.value);
                None
            }
        }
    }

    fn take_commit(&mut self, settings: &mut Settings) -> Option<Commit> {
        if self.value == self.previous {
            return None;
        }
        let value = match self.group {
            ParamGroup::Emissivity => emissivity_at(self.value as u8) as i32,
            _ => self.value,
        };
        let commit = Commit {
            key: self.group.key(),
            value,
        };
        settings.set(commit.key, commit.value);
        self.previous = self.value;
        Some(commit)
    }

    fn enter(&mut self, group: ParamGroup, settings: &Settings) {
        self.group = group;
        self.value = match group {
            ParamGroup::Emissivity => emissivity_index(settings.get(SettingKey::Emissivity)) as i32,
            _ => settings.get(group.key()),
        };
        self.previous = self.value;
    }
}
