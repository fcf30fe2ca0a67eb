//! Viewer settings and logger start-up.

use std::{path::PathBuf, sync::Once};

/// Overrides the directory textures are read from.
pub const ASSETS_ENV: &str = "REACTOR_VIEWER_ASSETS";
/// `env_logger` filter, e.g. `info` or `reactor_viewer=debug,wgpu=warn`.
pub const LOG_ENV: &str = "RUST_LOG";

#[derive(Debug, Clone)]
pub struct ViewerConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub asset_root: PathBuf,
    /// Projection aspect ratio. Fixed, it does not follow the window.
    pub aspect_ratio: f32,
    pub clear_colour: wgpu::Color,
    pub log_filter: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            title: "Reactor Viewer".to_string(),
            width: 1000,
            height: 800,
            asset_root: PathBuf::from(env!("REACTOR_ASSET_DIR")),
            aspect_ratio: 800.0 / 600.0,
            clear_colour: wgpu::Color::BLACK,
            log_filter: None,
        }
    }
}

impl ViewerConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for [`ASSETS_ENV`]
    /// and [`LOG_ENV`]. Empty values are ignored.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        let lookup = |key: &str| lookup(key).filter(|value: &String| !value.is_empty());
        if let Some(root) = lookup(ASSETS_ENV) {
            config.asset_root = PathBuf::from(root);
        }
        config.log_filter = lookup(LOG_ENV);
        config
    }
}

static INIT: Once = Once::new();

/// Initialise `env_logger` once; later calls are ignored.
///
/// Without a filter the level defaults to `info`.
pub fn init_logging(filter: Option<&str>) {
    INIT.call_once(|| {
        let mut builder = env_logger::Builder::new();
        match filter {
            Some(filter) => {
                builder.parse_filters(filter);
            }
            None => {
                builder.filter_level(log::LevelFilter::Info);
            }
        }
        if let Err(e) = builder.try_init() {
            eprintln!("Warning: Could not initialize logger: {}", e);
        }
        log::debug!("logging initialized");
    });
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn defaults_match_the_demo() {
        let config = ViewerConfig::default();
        assert_eq!((config.width, config.height), (1000, 800));
        assert_eq!(config.title, "Reactor Viewer");
        assert!((config.aspect_ratio - 4.0 / 3.0).abs() < 1e-6);
        assert!(config.asset_root.ends_with("assets"));
    }

    #[test]
    fn environment_overrides() {
        let vars: HashMap<&str, &str> =
            HashMap::from([(ASSETS_ENV, "/srv/textures"), (LOG_ENV, "debug")]);
        let config = ViewerConfig::from_lookup(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.asset_root, PathBuf::from("/srv/textures"));
        assert_eq!(config.log_filter.as_deref(), Some("debug"));
    }

    #[test]
    fn empty_values_are_ignored() {
        let config = ViewerConfig::from_lookup(|_| Some(String::new()));
        assert_eq!(config.asset_root, ViewerConfig::default().asset_root);
        assert_eq!(config.log_filter, None);
    }
}
