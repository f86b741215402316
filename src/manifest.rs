//! Targets manifest: the markup binding contract.
//!
//! A host page is described as a JSON document listing its image elements:
//!
//! ```json
//! {
//!   "targets": [
//!     {
//!       "id": "hero",
//!       "classes": ["swap-img", "wide"],
//!       "srcset": "hero_480.jpg 480w, hero_768.jpg 768w, hero_768_2x.jpg 768w 2x",
//!       "src": "hero_768.jpg"
//!     },
//!     { "id": "logo", "classes": ["logo"], "src": "logo.svg" }
//!   ]
//! }
//! ```
//!
//! Only entries whose `classes` contain the configured `image_container` class
//! are bound. `srcset`, `src` and `hidden` are optional. An entry without
//! `srcset` still binds, and the orchestrator reports it as a target with a
//! missing descriptor list.

use crate::config::SwapConfig;
use crate::target::SwapTarget;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetsManifest {
    pub targets: Vec<TargetEntry>,
}

/// One image element as described by the host page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetEntry {
    pub id: String,
    #[serde(default)]
    pub classes: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub srcset: Option<String>,
    #[serde(default)]
    pub src: String,
    #[serde(default)]
    pub hidden: bool,
}

pub fn load_manifest(path: &Path) -> Result<TargetsManifest, ManifestError> {
    let content = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&content)?)
}

/// Bind every entry carrying the container class, in document order.
pub fn bind_targets(manifest: &TargetsManifest, config: &SwapConfig) -> Vec<SwapTarget> {
    let class = config.container_class();
    manifest
        .targets
        .iter()
        .filter(|entry| entry.classes.iter().any(|c| c == class))
        .map(|entry| {
            SwapTarget::new(
                entry.id.clone(),
                entry.classes.clone(),
                entry.srcset.clone(),
                entry.src.clone(),
                entry.hidden,
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const MANIFEST: &str = r#"{
        "targets": [
            { "id": "hero", "classes": ["swap-img"], "srcset": "a.jpg 480w", "src": "a.jpg" },
            { "id": "logo", "classes": ["logo"], "src": "logo.svg" },
            { "id": "bare", "classes": ["swap-img", "wide"], "hidden": true }
        ]
    }"#;

    #[test]
    fn binds_only_container_class() {
        let manifest: TargetsManifest = serde_json::from_str(MANIFEST).unwrap();
        let targets = bind_targets(&manifest, &SwapConfig::default());
        let ids: Vec<&str> = targets.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["hero", "bare"]);
    }

    #[test]
    fn optional_fields_default() {
        let manifest: TargetsManifest = serde_json::from_str(MANIFEST).unwrap();
        let targets = bind_targets(&manifest, &SwapConfig::default());
        let bare = &targets[1];
        assert!(bare.srcset.is_none());
        assert_eq!(bare.src, "");
        assert!(bare.hidden);
        assert_eq!(bare.classes, vec!["swap-img", "wide"]);
    }

    #[test]
    fn custom_container_class() {
        let manifest: TargetsManifest = serde_json::from_str(MANIFEST).unwrap();
        let config = SwapConfig {
            image_container: ".logo".into(),
            ..SwapConfig::default()
        };
        let targets = bind_targets(&manifest, &config);
        assert_eq!(targets.len(), 1);
        assert_eq!(targets[0].id, "logo");
    }

    #[test]
    fn load_manifest_reads_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("targets.json");
        fs::write(&path, MANIFEST).unwrap();
        let manifest = load_manifest(&path).unwrap();
        assert_eq!(manifest.targets.len(), 3);
    }

    #[test]
    fn load_manifest_invalid_json() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("targets.json");
        fs::write(&path, "{ not json").unwrap();
        assert!(matches!(load_manifest(&path), Err(ManifestError::Json(_))));
    }

    #[test]
    fn load_manifest_missing_file() {
        let tmp = TempDir::new().unwrap();
        assert!(matches!(
            load_manifest(&tmp.path().join("nope.json")),
            Err(ManifestError::Io(_))
        ));
    }

    #[test]
    fn unknown_entry_field_rejected() {
        let result: Result<TargetsManifest, _> =
            serde_json::from_str(r#"{ "targets": [ { "id": "a", "srcsett": "x" } ] }"#);
        assert!(result.is_err());
    }
}
