//! Application configuration for the demo.

use std::path::PathBuf;

/// Runtime configuration for the Scribble demo, read from the environment.
#[derive(Debug, Clone, Default)]
pub struct AppConfig {
    /// JSON file with the canvas configuration (`SCRIBBLE_CONFIG`).
    pub canvas_config: Option<PathBuf>,
    /// ONNX model file (`SCRIBBLE_MODEL`).
    pub model_path: Option<PathBuf>,
    /// PNG to seed the canvas with (`SCRIBBLE_SEED_IMAGE`).
    pub seed_image: Option<PathBuf>,
    /// Directory for canvas/model-input snapshots (`SCRIBBLE_EXPORT_DIR`).
    pub export_dir: Option<PathBuf>,
    /// Force per-frame classification (`SCRIBBLE_CLASSIFY`).
    pub classify_every_frame: bool,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let path = |key: &str| lookup(key).filter(|s| !s.is_empty()).map(PathBuf::from);
        Self {
            canvas_config: path("SCRIBBLE_CONFIG"),
            model_path: path("SCRIBBLE_MODEL"),
            seed_image: path("SCRIBBLE_SEED_IMAGE"),
            export_dir: path("SCRIBBLE_EXPORT_DIR"),
            classify_every_frame: lookup("SCRIBBLE_CLASSIFY")
                .is_some_and(|v| matches!(v.as_str(), "1" | "true" | "yes")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn test_lookup_maps_variables() {
        let vars: HashMap<&str, &str> = [
            ("SCRIBBLE_MODEL", "mnist.onnx"),
            ("SCRIBBLE_EXPORT_DIR", ""),
            ("SCRIBBLE_CLASSIFY", "true"),
        ]
        .into_iter()
        .collect();
        let config = AppConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.model_path, Some(PathBuf::from("mnist.onnx")));
        assert_eq!(config.export_dir, None);
        assert_eq!(config.canvas_config, None);
        assert!(config.classify_every_frame);
    }

    #[test]
    fn test_classify_flag_defaults_off() {
        let config = AppConfig::from_lookup(|_| None);
        assert!(!config.classify_every_frame);
    }
}
