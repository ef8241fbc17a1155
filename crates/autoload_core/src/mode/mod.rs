//! Host-facing mode: event bindings, toggles and menu.
//!
//! [`AutoloadMode`] is the object the host plugin holds for the session.
//! It owns the [`Orchestrator`], routes the two bound events to it and
//! keeps the user toggles in sync with the host settings store.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use autoload_core::host::{InMemoryHost, RecordedEvent};
//! use autoload_core::logging::{init_tracing, LogLevel};
//! use autoload_core::mode::AutoloadMode;
//!
//! let mut host = InMemoryHost::new();
//! let log = init_tracing(LogLevel::Info);
//! let mut mode = AutoloadMode::start(Path::new("/opt/rv/support"), &host, log).unwrap();
//!
//! let mut event = RecordedEvent::new("sourceGroup000000;;new");
//! mode.dispatch("source-group-complete", &mut host, &mut event).unwrap();
//! ```

mod menu;
mod settings;

pub use menu::{build_menu, Menu, MenuEntry, MenuItem, MenuState, MENU_TITLE};
pub use settings::{ModeSettings, ModeToggle, SETTINGS_GROUP};

use std::path::{Path, PathBuf};

use crate::color::{ColorCatalog, OcioCatalog, ResolvedColorSettings};
use crate::config::{AutoloaderConfig, ConfigManager};
use crate::host::{HostEvent, NodeGraph, SettingsStore};
use crate::logging::{LogHandle, LogLevel};
use crate::orchestrator::{
    AutoloadResult, DrainReport, GroupOutcome, Orchestrator, AFTER_PROGRESSIVE_LOADING,
    SOURCE_GROUP_COMPLETE,
};

/// Name the mode registers under.
pub const MODE_NAME: &str = "rv-auto-loader";

/// Ordering among host packages; runs after the defaults.
pub const MODE_ORDERING: i32 = 30;

/// An event the mode listens to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EventBinding {
    pub event: &'static str,
    pub description: &'static str,
}

/// Events bound by the mode, in registration order.
pub const BINDINGS: [EventBinding; 2] = [
    EventBinding {
        event: SOURCE_GROUP_COMPLETE,
        description: "Auto detect plates and v000s",
    },
    EventBinding {
        event: AFTER_PROGRESSIVE_LOADING,
        description: "Load additional v000/plate media representations",
    },
];

/// What a dispatched event did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    GroupComplete(GroupOutcome),
    Drained(DrainReport),
    /// Not one of the bound events.
    Ignored,
}

/// Session state of the auto loader inside the host.
#[derive(Debug)]
pub struct AutoloadMode {
    orchestrator: Orchestrator,
    settings: ModeSettings,
    config_path: PathBuf,
    log: LogHandle,
}

impl AutoloadMode {
    /// Load the user config and the color catalog, then build the mode.
    ///
    /// Color settings are validated here, so an unknown colorspace stops
    /// the plugin from loading at all.
    pub fn start<S>(support_dir: &Path, store: &S, log: LogHandle) -> AutoloadResult<Self>
    where
        S: SettingsStore + ?Sized,
    {
        let mut manager = ConfigManager::at_default_location()?;
        manager.load_or_create()?;
        let catalog = OcioCatalog::locate(support_dir)?;
        let config_path = manager.path().to_path_buf();
        Self::new(manager.into_config(), config_path, &catalog, store, log)
    }

    /// Build the mode from an already loaded config.
    pub fn new<S>(
        config: AutoloaderConfig,
        config_path: PathBuf,
        catalog: &dyn ColorCatalog,
        store: &S,
        log: LogHandle,
    ) -> AutoloadResult<Self>
    where
        S: SettingsStore + ?Sized,
    {
        let settings = ModeSettings::read(store);
        log.set_level(LogLevel::for_debug(settings.debug));
        tracing::debug!("Mode settings: {:?}", settings);

        let color = ResolvedColorSettings::validate(&config.color, catalog)?;
        let orchestrator = Orchestrator::new(config, color)?;

        Ok(Self {
            orchestrator,
            settings,
            config_path,
            log,
        })
    }

    pub fn settings(&self) -> ModeSettings {
        self.settings
    }

    pub fn orchestrator(&self) -> &Orchestrator {
        &self.orchestrator
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Route a host event to its handler.
    ///
    /// Unknown events are rejected so the rest of the chain still runs.
    pub fn dispatch<G, E>(
        &mut self,
        event_name: &str,
        graph: &mut G,
        event: &mut E,
    ) -> AutoloadResult<Dispatched>
    where
        G: NodeGraph + ?Sized,
        E: HostEvent + ?Sized,
    {
        match event_name {
            SOURCE_GROUP_COMPLETE => self
                .orchestrator
                .on_source_group_complete(graph, event, &self.settings)
                .map(Dispatched::GroupComplete),
            AFTER_PROGRESSIVE_LOADING => Ok(Dispatched::Drained(
                self.orchestrator.after_progressive_loading(graph, event),
            )),
            other => {
                tracing::debug!("Ignoring unbound event '{}'", other);
                event.reject();
                Ok(Dispatched::Ignored)
            }
        }
    }

    /// Flip a toggle and persist it.
    pub fn toggle<S>(&mut self, toggle: ModeToggle, store: &mut S) -> ModeSettings
    where
        S: SettingsStore + ?Sized,
    {
        self.settings = self.settings.toggled(toggle);
        self.settings.write(store, toggle);
        tracing::info!("{}: {}", toggle.label(), self.settings.get(toggle));

        if toggle == ModeToggle::Debug {
            self.log.set_level(LogLevel::for_debug(self.settings.debug));
        }
        self.settings
    }

    /// Current menu.
    pub fn menu(&self) -> Menu {
        build_menu(self.orchestrator.config(), &self.settings, &self.config_path)
    }
}
