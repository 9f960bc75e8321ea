//! Build manifest for containers
//!
//! A manifest is the JSON form of the builder's inputs. Relative paths are
//! resolved against the manifest's own directory.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Inputs for one container build
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct BuildManifest {
    /// Main image (PNG)
    pub image: PathBuf,
    /// Script file, stored verbatim
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script: Option<PathBuf>,
    /// Inline script text; wins over `script` when both are set
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub script_text: Option<String>,
    /// Window icon (PNG)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<PathBuf>,
}

impl BuildManifest {
    /// Parse a manifest from JSON text
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    /// Rebase every relative path onto `base`
    pub fn resolve_paths(mut self, base: &Path) -> Self {
        let rebase = |p: PathBuf| if p.is_relative() { base.join(p) } else { p };
        self.image = rebase(self.image);
        self.script = self.script.map(rebase);
        self.icon = self.icon.map(rebase);
        self
    }
}
