//! Cargo manifest reading.
//!
//! Only the handful of keys needed to name the crate and to detect virtual
//! workspace manifests are deserialized; everything else is ignored.

use crate::error::LoadCause;
use serde::Deserialize;

/// The subset of `Cargo.toml` the resolver cares about.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Manifest {
    /// `[package]` table.
    pub package: Option<PackageSection>,
    /// `[lib]` table.
    pub lib: Option<LibSection>,
    /// `[workspace]` table.
    pub workspace: Option<WorkspaceSection>,
}

/// `[package]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PackageSection {
    /// Package name. Optional so that a nameless table is reported as a load
    /// error rather than a TOML error.
    pub name: Option<String>,
}

/// `[lib]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LibSection {
    /// Library crate name override.
    pub name: Option<String>,
}

/// `[workspace]` table.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct WorkspaceSection {
    /// Member globs.
    #[serde(default)]
    pub members: Vec<String>,
}

/// What a manifest resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ManifestKind {
    /// A manifest with a `[package]` table, naming one crate.
    Package {
        /// Crate name, as used in paths (`-` replaced by `_`).
        crate_name: String,
    },
    /// A virtual workspace manifest listing `members` packages.
    Virtual {
        /// Number of listed members.
        members: usize,
    },
}

impl Manifest {
    /// Parses manifest text.
    ///
    /// # Errors
    /// Returns `LoadCause::Manifest` if the text is not valid TOML.
    pub fn parse(text: &str) -> Result<Self, LoadCause> {
        Ok(toml::from_str(text)?)
    }

    /// Classifies the manifest.
    ///
    /// # Errors
    /// Returns `LoadCause::MissingPackageName` for a `[package]` table without
    /// a name, or for a manifest with neither a package nor a workspace.
    pub fn kind(&self) -> Result<ManifestKind, LoadCause> {
        match (&self.package, &self.workspace) {
            (Some(package), _) => {
                let name = self
                    .lib
                    .as_ref()
                    .and_then(|lib| lib.name.clone())
                    .or_else(|| package.name.clone())
                    .filter(|name| !name.trim().is_empty())
                    .ok_or(LoadCause::MissingPackageName)?;
                Ok(ManifestKind::Package {
                    crate_name: name.replace('-', "_"),
                })
            }
            (None, Some(workspace)) => Ok(ManifestKind::Virtual {
                members: workspace.members.len(),
            }),
            (None, None) => Err(LoadCause::MissingPackageName),
        }
    }
}
