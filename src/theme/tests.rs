use super::*;
use crate::config::ThemeConfig;
use parking_lot::Mutex;
use std::sync::Arc;

fn config_with_night() -> ThemeConfig {
    let mut config = ThemeConfig::default();
    config.palettes.insert(
        "night".into(),
        RawPalette {
            display_name: Some("Night".into()),
            colors: [
                ("bodyBackground".to_string(), "#000000".to_string()),
                ("bodyText".to_string(), "#ffffff".to_string()),
            ]
            .into(),
            accessibility: None,
        },
    );
    config.dark = "night".into();
    config
}

#[test]
fn test_resolve_by_mode() {
    let store = ThemeStore::new(&config_with_night());
    assert_eq!(store.resolve_palette(ThemeMode::Light).name, "day");
    assert_eq!(store.resolve_palette(ThemeMode::Dark).name, "night");
}

#[test]
fn test_unknown_palette_falls_back_to_day() {
    let mut config = ThemeConfig::default();
    config.dark = "does-not-exist".into();
    let store = ThemeStore::new(&config);

    assert_eq!(store.resolve_palette(ThemeMode::Dark).name, "day");
    let warnings = validate_config(&config);
    assert!(warnings.iter().any(|w| w.contains("does-not-exist")));
}

#[test]
fn test_configured_palette_is_sanitized() {
    let store = ThemeStore::new(&config_with_night());
    let night = store.palette("night").unwrap();
    for key in REQUIRED_COLORS {
        assert!(night.color(key).is_some(), "{key}");
    }
}

#[test]
fn test_swap_by_reference() {
    let store = ThemeStore::default();
    let before = store.current();
    store.set_mode(ThemeMode::Dark);
    let after = store.current();

    assert_eq!(before.name, "day");
    assert_eq!(after.name, "dark");
    // The old palette is untouched
    assert_eq!(before.color("bodyBackground"), Some("#ffffff"));
    assert!(Arc::ptr_eq(&after, &store.palette("dark").unwrap()));
}

#[test]
fn test_toggle_and_theme_name() {
    let store = ThemeStore::default();
    assert_eq!(store.current_theme_name(), "day");
    assert_eq!(store.toggle(), ThemeMode::Dark);
    assert_eq!(store.current_theme_name(), "dark");
    assert_eq!(store.toggle(), ThemeMode::Light);
}

#[test]
fn test_initialize_preferences() {
    let store = ThemeStore::default();
    assert_eq!(store.initialize(Some(ThemeMode::Dark), Some(false)), ThemeMode::Dark);
    // A user choice ignores later system changes
    store.on_system_change(false);
    assert_eq!(store.mode(), ThemeMode::Dark);

    assert_eq!(store.reset_to_system(Some(false)), ThemeMode::Light);
    store.on_system_change(true);
    assert_eq!(store.mode(), ThemeMode::Dark);

    let mut config = ThemeConfig::default();
    config.enable_system_detection = false;
    let store = ThemeStore::new(&config);
    assert_eq!(store.initialize(None, Some(true)), ThemeMode::Light);
}

#[test]
fn test_subscribe_publishes_each_swap() {
    let store = ThemeStore::default();
    let seen = Arc::new(Mutex::new(Vec::new()));

    let sink = Arc::clone(&seen);
    let id = store.subscribe(move |change| sink.lock().push(change.palette.name.clone()));

    store.set_mode(ThemeMode::Dark);
    store.set_mode(ThemeMode::Light);
    assert!(store.unsubscribe(id));
    store.set_mode(ThemeMode::Dark);

    assert_eq!(*seen.lock(), ["dark", "day"]);
    assert!(!store.unsubscribe(id));
}

#[test]
fn test_high_contrast_swap() {
    let store = ThemeStore::default();
    store.set_high_contrast(true);
    assert_eq!(store.current().color("linkColor"), Some("#0000ff"));

    let mut root = CssRoot::new();
    store.apply(&mut root);
    assert_eq!(root.attribute("data-high-contrast"), Some("true"));

    store.set_high_contrast(false);
    store.apply(&mut root);
    assert_eq!(root.attribute("data-high-contrast"), None);
    assert_eq!(root.property("--theme-link-color"), Some("#667eea"));
}

#[test]
fn test_apply_writes_mapped_properties() {
    let store = ThemeStore::default();
    let mut root = CssRoot::new();
    let written = store.apply(&mut root);

    assert_eq!(root.attribute("data-theme"), Some("day"));
    assert_eq!(root.property("--theme-body-bg"), Some("#ffffff"));
    assert_eq!(root.property("--theme-primary"), Some("#667eea"));
    assert_eq!(root.property("--theme-transition-duration"), Some("300ms"));
    assert_eq!(written, 21);
}

/// Sink that rejects one property.
struct FlakySink {
    inner: CssRoot,
    reject: &'static str,
}

impl StyleSink for FlakySink {
    fn set_property(&mut self, name: &str, value: &str) -> Result<(), StyleError> {
        if name == self.reject {
            return Err(StyleError::new(name, "rejected"));
        }
        self.inner.set_property(name, value)
    }

    fn set_attribute(&mut self, name: &str, value: &str) -> Result<(), StyleError> {
        self.inner.set_attribute(name, value)
    }

    fn remove_attribute(&mut self, name: &str) -> Result<(), StyleError> {
        self.inner.remove_attribute(name)
    }
}

#[test]
fn test_apply_skips_failing_property() {
    let store = ThemeStore::default();
    let mut sink = FlakySink {
        inner: CssRoot::new(),
        reject: "--theme-body-text",
    };
    let written = store.apply(&mut sink);

    assert_eq!(written, 20);
    assert_eq!(sink.inner.property("--theme-body-text"), None);
    assert_eq!(sink.inner.property("--theme-panel-text"), Some("#000000"));
    assert_eq!(sink.inner.property("--theme-info"), Some("#3b82f6"));
}

#[test]
fn test_fixed_theme_source() {
    let source = FixedTheme::new(ThemePalette::dark());
    assert_eq!(source.current_theme_name(), "dark");
}
