//! Menu model contributed to the host.

use std::path::Path;

use super::settings::{ModeSettings, ModeToggle};
use crate::config::{AutoloaderConfig, PlateVariant};

/// Title of the top-level menu.
pub const MENU_TITLE: &str = "Slingshot Auto Loader";

const NOT_SET: &str = "(not set)";

/// Display state of a menu item.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Checked,
    Unchecked,
    Disabled,
}

impl MenuState {
    fn from_bool(value: bool) -> Self {
        if value {
            MenuState::Checked
        } else {
            MenuState::Unchecked
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuItem {
    pub label: String,
    pub state: MenuState,
    /// Toggle triggered when the item is selected.
    pub toggle: Option<ModeToggle>,
}

impl MenuItem {
    fn info(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            state: MenuState::Disabled,
            toggle: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuEntry {
    Item(MenuItem),
    Submenu(Menu),
    Separator,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Menu {
    pub label: String,
    pub entries: Vec<MenuEntry>,
}

impl Menu {
    /// Items of this menu, not descending into submenus.
    pub fn items(&self) -> impl Iterator<Item = &MenuItem> {
        self.entries.iter().filter_map(|e| match e {
            MenuEntry::Item(item) => Some(item),
            _ => None,
        })
    }

    /// Submenu with the given label.
    pub fn submenu(&self, label: &str) -> Option<&Menu> {
        self.entries.iter().find_map(|e| match e {
            MenuEntry::Submenu(menu) if menu.label == label => Some(menu),
            _ => None,
        })
    }
}

/// Build the menu for the current config and toggles.
pub fn build_menu(config: &AutoloaderConfig, settings: &ModeSettings, config_path: &Path) -> Menu {
    let mut entries = vec![
        MenuEntry::Submenu(current_configuration(config)),
        MenuEntry::Item(MenuItem::info(format!(
            "Edit {} to change settings",
            config_path.display()
        ))),
        MenuEntry::Separator,
    ];

    for toggle in ModeToggle::ALL {
        entries.push(MenuEntry::Item(MenuItem {
            label: toggle.label().to_string(),
            state: MenuState::from_bool(settings.get(toggle)),
            toggle: Some(toggle),
        }));
    }

    Menu {
        label: MENU_TITLE.to_string(),
        entries,
    }
}

/// Read-only listing of the loaded config.
fn current_configuration(config: &AutoloaderConfig) -> Menu {
    let opt = |value: Option<&str>| value.unwrap_or(NOT_SET).to_string();
    let frame = |value: Option<i32>| value.map_or_else(|| NOT_SET.to_string(), |v| v.to_string());
    let color = &config.color;

    let mut lines = vec![
        "Color:".to_string(),
        format!("  Movie colorspace: {}", color.mov_colorspace),
        format!("  Input colorspace: {}", color.exr_colorspace),
        format!("  Working space: {}", color.working_space),
        format!("  Look CDL: {}", opt(color.look_cdl.as_deref())),
        format!("  Look LUT: {}", opt(color.look_lut.as_deref())),
        "Plates:".to_string(),
    ];
    for variant in PlateVariant::ALL {
        lines.push(format!(
            "  {}: {}",
            variant.representation_name(),
            opt(config.plates.pattern(variant))
        ));
    }
    lines.push(format!(
        "  First frame in file: {}",
        frame(config.plates.plate_first_frame_in_file)
    ));
    lines.push(format!("  Cut in frame: {}", frame(config.plates.plate_cut_in_frame)));
    if !config.other.is_empty() {
        lines.push("Other:".to_string());
        for (name, pattern) in &config.other {
            lines.push(format!("  {}: {}", name, pattern));
        }
    }

    Menu {
        label: "Current Configuration".to_string(),
        entries: lines
            .into_iter()
            .map(|line| MenuEntry::Item(MenuItem::info(line)))
            .collect(),
    }
}
