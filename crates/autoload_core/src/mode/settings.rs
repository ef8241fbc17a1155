//! Per-user toggles persisted in the host settings store.

use crate::host::SettingsStore;

/// Settings-store group holding the toggles.
pub const SETTINGS_GROUP: &str = "SLINGSHOT_AUTO_LOADER";

/// A user-facing toggle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeToggle {
    LoadPlates,
    LoadLuts,
    Debug,
}

impl ModeToggle {
    pub const ALL: [ModeToggle; 3] = [
        ModeToggle::LoadPlates,
        ModeToggle::LoadLuts,
        ModeToggle::Debug,
    ];

    /// Key in the settings store.
    pub fn key(&self) -> &'static str {
        match self {
            ModeToggle::LoadPlates => "load_plates_enabled",
            ModeToggle::LoadLuts => "load_luts_enabled",
            ModeToggle::Debug => "debug",
        }
    }

    /// Menu label.
    pub fn label(&self) -> &'static str {
        match self {
            ModeToggle::LoadPlates => "Autoload Plates/v000s",
            ModeToggle::LoadLuts => "Autoload LUTs/CDLs",
            ModeToggle::Debug => "Debug Logging",
        }
    }

    fn default_value(&self) -> bool {
        match self {
            ModeToggle::LoadPlates | ModeToggle::LoadLuts => true,
            ModeToggle::Debug => false,
        }
    }
}

/// Snapshot of the toggles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModeSettings {
    pub load_plates_enabled: bool,
    pub load_luts_enabled: bool,
    pub debug: bool,
}

impl Default for ModeSettings {
    fn default() -> Self {
        Self {
            load_plates_enabled: ModeToggle::LoadPlates.default_value(),
            load_luts_enabled: ModeToggle::LoadLuts.default_value(),
            debug: ModeToggle::Debug.default_value(),
        }
    }
}

impl ModeSettings {
    /// Read all toggles, using defaults for unset keys.
    pub fn read<S: SettingsStore + ?Sized>(store: &S) -> Self {
        let read = |t: ModeToggle| store.read_bool(SETTINGS_GROUP, t.key(), t.default_value());
        Self {
            load_plates_enabled: read(ModeToggle::LoadPlates),
            load_luts_enabled: read(ModeToggle::LoadLuts),
            debug: read(ModeToggle::Debug),
        }
    }

    pub fn get(&self, toggle: ModeToggle) -> bool {
        match toggle {
            ModeToggle::LoadPlates => self.load_plates_enabled,
            ModeToggle::LoadLuts => self.load_luts_enabled,
            ModeToggle::Debug => self.debug,
        }
    }

    /// Copy with one toggle flipped.
    pub fn toggled(self, toggle: ModeToggle) -> Self {
        let mut next = self;
        match toggle {
            ModeToggle::LoadPlates => next.load_plates_enabled = !self.load_plates_enabled,
            ModeToggle::LoadLuts => next.load_luts_enabled = !self.load_luts_enabled,
            ModeToggle::Debug => next.debug = !self.debug,
        }
        next
    }

    /// Persist one toggle's current value.
    pub fn write<S: SettingsStore + ?Sized>(&self, store: &mut S, toggle: ModeToggle) {
        store.write_bool(SETTINGS_GROUP, toggle.key(), self.get(toggle));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::InMemoryHost;

    #[test]
    fn defaults_when_store_is_empty() {
        let host = InMemoryHost::new();
        let settings = ModeSettings::read(&host);
        assert_eq!(settings, ModeSettings::default());
        assert!(settings.load_plates_enabled);
        assert!(settings.load_luts_enabled);
        assert!(!settings.debug);
    }

    #[test]
    fn toggled_flips_only_one_flag() {
        let settings = ModeSettings::default().toggled(ModeToggle::LoadLuts);
        assert!(settings.load_plates_enabled);
        assert!(!settings.load_luts_enabled);
        assert!(!settings.debug);
        assert_eq!(settings.toggled(ModeToggle::LoadLuts), ModeSettings::default());
    }

    #[test]
    fn written_values_are_read_back() {
        let mut host = InMemoryHost::new();
        let settings = ModeSettings::default().toggled(ModeToggle::Debug);
        settings.write(&mut host, ModeToggle::Debug);

        assert!(host.read_bool(SETTINGS_GROUP, "debug", false));
        assert_eq!(ModeSettings::read(&host), settings);
    }
}
