//! The theme store: palette registry, current selection and change
//! notification.
//!
//! Palettes are immutable once registered. The active palette lives behind
//! an `ArcSwap` so readers (the render pipeline) never block, and every swap
//! is published to subscribers as a [`ThemeChange`].

use super::css::{StyleSink, css_variable_name};
use super::mode::{DefaultMode, ThemeMode};
use super::palette::{self, FALLBACK_PALETTE, ThemePalette};
use super::ThemeSource;
use crate::config::ThemeConfig;
use arc_swap::ArcSwap;
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Handle returned by [`ThemeStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Published after every palette swap.
#[derive(Debug, Clone)]
pub struct ThemeChange {
    pub mode: ThemeMode,
    pub palette: Arc<ThemePalette>,
    pub high_contrast: bool,
}

type Listener = Arc<dyn Fn(&ThemeChange) + Send + Sync>;

#[derive(Debug, Default)]
struct Selection {
    mode: ThemeMode,
    high_contrast: bool,
    /// The mode came from an explicit user choice rather than detection.
    user_choice: bool,
}

pub struct ThemeStore {
    palettes: BTreeMap<String, Arc<ThemePalette>>,
    light: String,
    dark: String,
    default_mode: DefaultMode,
    system_detection: bool,
    transition: Option<u32>,
    selection: Mutex<Selection>,
    current: ArcSwap<ThemePalette>,
    listeners: Mutex<Vec<(SubscriptionId, Listener)>>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for ThemeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeStore")
            .field("palettes", &self.palettes.keys().collect::<Vec<_>>())
            .field("current", &self.current.load().name)
            .finish_non_exhaustive()
    }
}

impl Default for ThemeStore {
    fn default() -> Self {
        Self::new(&ThemeConfig::default())
    }
}

impl ThemeStore {
    /// Build the registry from configuration.
    ///
    /// The built-in `day` and `dark` palettes are always present; configured
    /// palettes of the same name replace them. Starts in light mode.
    pub fn new(config: &ThemeConfig) -> Self {
        let mut palettes = BTreeMap::new();
        for builtin in [ThemePalette::day(), ThemePalette::dark()] {
            palettes.insert(builtin.name.clone(), Arc::new(builtin));
        }
        let defaults = palette::default_colors();
        for (name, raw) in &config.palettes {
            palettes.insert(
                name.clone(),
                Arc::new(palette::sanitize(name, raw, &defaults)),
            );
        }

        let mut store = Self {
            palettes,
            light: config.light.clone(),
            dark: config.dark.clone(),
            default_mode: config.default_mode,
            system_detection: config.enable_system_detection,
            transition: config
                .enable_transitions
                .then_some(config.transition_duration),
            selection: Mutex::new(Selection::default()),
            current: ArcSwap::from_pointee(ThemePalette::day()),
            listeners: Mutex::new(Vec::new()),
            next_id: AtomicU64::new(1),
        };
        let initial = store.resolve_palette(ThemeMode::Light);
        store.current = ArcSwap::new(initial);
        store
    }

    // ========================================================================
    // Registry
    // ========================================================================

    pub fn palette(&self, name: &str) -> Option<Arc<ThemePalette>> {
        self.palettes.get(name).cloned()
    }

    pub fn palettes(&self) -> impl Iterator<Item = &Arc<ThemePalette>> {
        self.palettes.values()
    }

    /// Palette name configured for `mode`.
    pub fn palette_name(&self, mode: ThemeMode) -> &str {
        match mode {
            ThemeMode::Light => &self.light,
            ThemeMode::Dark => &self.dark,
        }
    }

    /// Look up the palette configured for `mode`.
    ///
    /// Unknown names resolve to `day` with a warning.
    pub fn resolve_palette(&self, mode: ThemeMode) -> Arc<ThemePalette> {
        let name = self.palette_name(mode);
        if let Some(palette) = self.palettes.get(name) {
            return Arc::clone(palette);
        }
        crate::log!("warn"; "theme palette '{}' not found, falling back to '{}'", name, FALLBACK_PALETTE);
        self.palettes
            .get(FALLBACK_PALETTE)
            .cloned()
            .unwrap_or_else(|| Arc::new(ThemePalette::day()))
    }

    // ========================================================================
    // Selection
    // ========================================================================

    pub fn mode(&self) -> ThemeMode {
        self.selection.lock().mode
    }

    pub fn is_high_contrast(&self) -> bool {
        self.selection.lock().high_contrast
    }

    pub fn current(&self) -> Arc<ThemePalette> {
        self.current.load_full()
    }

    /// Pick the startup mode: a saved preference wins, then the configured
    /// default (which may consult the system preference).
    pub fn initialize(&self, saved: Option<ThemeMode>, system_prefers_dark: Option<bool>) -> ThemeMode {
        let (mode, user_choice) = match saved {
            Some(mode) => (mode, true),
            None => (
                self.default_mode
                    .resolve(self.system_detection, system_prefers_dark),
                false,
            ),
        };
        self.select(mode, user_choice);
        mode
    }

    /// Explicit user choice.
    pub fn set_mode(&self, mode: ThemeMode) {
        self.select(mode, true);
    }

    pub fn toggle(&self) -> ThemeMode {
        let mode = self.mode().toggled();
        self.set_mode(mode);
        mode
    }

    /// Drop the user choice and follow the system preference again.
    pub fn reset_to_system(&self, system_prefers_dark: Option<bool>) -> ThemeMode {
        let mode = DefaultMode::System.resolve(self.system_detection, system_prefers_dark);
        self.select(mode, false);
        mode
    }

    /// Host preference changed. Ignored while a user choice is active.
    pub fn on_system_change(&self, prefers_dark: bool) {
        if !self.system_detection || self.selection.lock().user_choice {
            return;
        }
        let mode = if prefers_dark {
            ThemeMode::Dark
        } else {
            ThemeMode::Light
        };
        self.select(mode, false);
    }

    pub fn set_high_contrast(&self, enabled: bool) {
        let mode = {
            let mut sel = self.selection.lock();
            sel.high_contrast = enabled;
            sel.mode
        };
        self.swap(mode, enabled);
    }

    fn select(&self, mode: ThemeMode, user_choice: bool) {
        let high_contrast = {
            let mut sel = self.selection.lock();
            sel.mode = mode;
            sel.user_choice = user_choice;
            sel.high_contrast
        };
        self.swap(mode, high_contrast);
    }

    fn swap(&self, mode: ThemeMode, high_contrast: bool) {
        let resolved = self.resolve_palette(mode);
        let palette = if high_contrast {
            Arc::new(resolved.high_contrast())
        } else {
            resolved
        };
        self.current.store(Arc::clone(&palette));
        crate::debug!("theme"; "selected '{}' ({}{})", palette.name, mode, if high_contrast { ", high contrast" } else { "" });

        self.publish(&ThemeChange {
            mode,
            palette,
            high_contrast,
        });
    }

    // ========================================================================
    // Output
    // ========================================================================

    /// Write the current palette to `sink`.
    ///
    /// A failing property is logged and skipped; the remaining properties are
    /// still written. Returns the number of properties written.
    pub fn apply(&self, sink: &mut dyn StyleSink) -> usize {
        let palette = self.current();
        let high_contrast = self.is_high_contrast();

        if let Err(e) = sink.set_attribute("data-theme", &palette.name) {
            crate::log!("warn"; "{}", e);
        }
        let contrast_attr = if high_contrast {
            sink.set_attribute("data-high-contrast", "true")
        } else {
            sink.remove_attribute("data-high-contrast")
        };
        if let Err(e) = contrast_attr {
            crate::log!("warn"; "{}", e);
        }

        let mut written = 0;
        for (key, value) in &palette.colors {
            match sink.set_property(&css_variable_name(key), value) {
                Ok(()) => written += 1,
                Err(e) => crate::log!("warn"; "{}", e),
            }
        }
        if let Some(ms) = self.transition {
            match sink.set_property("--theme-transition-duration", &format!("{ms}ms")) {
                Ok(()) => written += 1,
                Err(e) => crate::log!("warn"; "{}", e),
            }
        }

        crate::debug!("theme"; "applied '{}' ({} properties)", palette.name, written);
        written
    }

    // ========================================================================
    // Subscription
    // ========================================================================

    pub fn subscribe(&self, listener: impl Fn(&ThemeChange) + Send + Sync + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners.lock().push((id, Arc::new(listener)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut listeners = self.listeners.lock();
        let before = listeners.len();
        listeners.retain(|(lid, _)| *lid != id);
        listeners.len() != before
    }

    fn publish(&self, change: &ThemeChange) {
        // Snapshot so listeners may (un)subscribe while being notified
        let listeners: Vec<Listener> = self
            .listeners
            .lock()
            .iter()
            .map(|(_, l)| Arc::clone(l))
            .collect();
        for listener in listeners {
            listener(change);
        }
    }
}

impl ThemeSource for ThemeStore {
    fn current_palette(&self) -> Arc<ThemePalette> {
        self.current()
    }
}

/// Configuration problems that are substituted at runtime.
pub fn validate_config(config: &ThemeConfig) -> Vec<String> {
    let mut warnings = Vec::new();
    let known = |name: &str| {
        config.palettes.contains_key(name) || matches!(name, "day" | "dark")
    };

    for builtin in ["day", "dark"] {
        if !config.palettes.contains_key(builtin) {
            warnings.push(format!("no '{builtin}' palette configured, using the built-in one"));
        }
    }
    for (key, name) in [("light", &config.light), ("dark", &config.dark)] {
        if !known(name) {
            warnings.push(format!(
                "theme.{key} names unknown palette '{name}', '{FALLBACK_PALETTE}' will be used"
            ));
        }
    }
    if config.transition_duration > 5000 {
        warnings.push(format!(
            "theme.transition_duration of {}ms is unusually long",
            config.transition_duration
        ));
    }

    warnings
}
