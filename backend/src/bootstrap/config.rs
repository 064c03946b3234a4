//! Bootstrap configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

/// Settings controlling user provisioning at startup.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "BOOTSTRAP")]
pub struct BootstrapSettings {
    /// Provision the roster on startup.
    #[ortho_config(default = false)]
    pub enabled: bool,
    /// JSON roster replacing the built-in demo users.
    pub roster_path: Option<PathBuf>,
}
