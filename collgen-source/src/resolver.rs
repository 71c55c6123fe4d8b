//! Compilation-unit resolution.
//!
//! Loads the Cargo package rooted at a directory: its crate name from
//! `Cargo.toml` and, when requested, the parsed syntax of every `.rs` file
//! under `src/`.

use crate::error::{LoadCause, SourceError};
use crate::manifest::{Manifest, ManifestKind};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Manifest file name.
pub const MANIFEST_FILE: &str = "Cargo.toml";

/// Source root directory, relative to the manifest.
pub const SOURCE_DIR: &str = "src";

/// How much of the package to load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Only the crate name.
    NameOnly,
    /// The crate name and every source file's syntax tree.
    #[default]
    Syntax,
}

/// One parsed source file.
#[derive(Debug, Clone)]
pub struct ParsedFile {
    /// Path relative to the source root.
    pub path: PathBuf,
    /// Module path from the crate root to this file.
    pub module_path: Vec<String>,
    /// Parsed file.
    pub syntax: syn::File,
}

/// A loaded package.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    /// Crate name.
    pub name: String,
    /// Directory holding `Cargo.toml`.
    pub manifest_dir: PathBuf,
    /// Directory holding the crate sources.
    pub source_root: PathBuf,
    /// Parsed files, sorted by path. Empty in [`LoadMode::NameOnly`].
    pub files: Vec<ParsedFile>,
}

/// Resolves the package rooted at `dir`.
///
/// # Arguments
/// * `dir` - Directory containing `Cargo.toml`
/// * `mode` - Whether to parse source files
///
/// # Errors
/// Returns `SourceError::Load` if the directory cannot be read as a single
/// package, and `SourceError::AmbiguousPackage` if the manifest is a virtual
/// workspace manifest.
pub fn resolve(dir: impl AsRef<Path>, mode: LoadMode) -> Result<CompilationUnit, SourceError> {
    let dir = dir.as_ref();
    if !dir.is_dir() {
        return Err(SourceError::load(dir, LoadCause::NotADirectory));
    }

    let manifest_path = dir.join(MANIFEST_FILE);
    if !manifest_path.is_file() {
        return Err(SourceError::load(dir, LoadCause::MissingManifest));
    }

    let text = fs::read_to_string(&manifest_path).map_err(|e| SourceError::load(dir, e))?;
    let manifest = Manifest::parse(&text).map_err(|e| SourceError::load(dir, e))?;

    let name = match manifest.kind().map_err(|e| SourceError::load(dir, e))? {
        ManifestKind::Package { crate_name } => crate_name,
        ManifestKind::Virtual { members } => {
            return Err(SourceError::AmbiguousPackage {
                dir: dir.to_path_buf(),
                found: members,
            });
        }
    };

    let source_root = dir.join(SOURCE_DIR);
    let files = match mode {
        LoadMode::NameOnly => Vec::new(),
        LoadMode::Syntax => {
            if !source_root.is_dir() {
                return Err(SourceError::load(
                    dir,
                    LoadCause::MissingSourceRoot {
                        path: source_root.clone(),
                    },
                ));
            }
            parse_sources(&source_root).map_err(|e| SourceError::load(dir, e))?
        }
    };

    info!(
        "Resolved crate {} in {} ({} files)",
        name,
        dir.display(),
        files.len()
    );

    Ok(CompilationUnit {
        name,
        manifest_dir: dir.to_path_buf(),
        source_root,
        files,
    })
}

/// Directory of extra binary targets, relative to the source root.
const BIN_DIR: &str = "bin";

/// Reads and parses every `.rs` file of the library target below `root`.
///
/// `bin/` holds separate crates and is skipped. `main.rs` is a separate
/// crate root when `lib.rs` exists, and is skipped too.
fn parse_sources(root: &Path) -> Result<Vec<ParsedFile>, LoadCause> {
    let mut paths = Vec::new();
    collect_sources(root, root, &mut paths)?;
    if paths.iter().any(|p| p == Path::new("lib.rs")) {
        paths.retain(|p| p != Path::new("main.rs"));
    }
    paths.sort();

    let mut files = Vec::with_capacity(paths.len());
    for relative in paths {
        let text = fs::read_to_string(root.join(&relative))?;
        let syntax = syn::parse_file(&text).map_err(|e| LoadCause::syntax(&relative, &e))?;
        debug!("Parsed {} ({} items)", relative.display(), syntax.items.len());
        files.push(ParsedFile {
            module_path: module_path(&relative),
            path: relative,
            syntax,
        });
    }

    Ok(files)
}

/// Collects `.rs` paths below `dir`, relative to `root`.
fn collect_sources(root: &Path, dir: &Path, out: &mut Vec<PathBuf>) -> Result<(), LoadCause> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_type = entry.file_type()?;

        if file_type.is_dir() {
            if dir == root && entry.file_name() == BIN_DIR {
                debug!("Skipping binary targets in {}", path.display());
                continue;
            }
            collect_sources(root, &path, out)?;
        } else if file_type.is_file() && path.extension().is_some_and(|ext| ext == "rs") {
            if let Ok(relative) = path.strip_prefix(root) {
                out.push(relative.to_path_buf());
            }
        }
    }
    Ok(())
}

/// Derives the module path of a file from its location under the source root.
///
/// `lib.rs` and `main.rs` are crate roots, `mod.rs` names its directory, and
/// any other file names a module of the same stem.
#[must_use]
pub fn module_path(relative: &Path) -> Vec<String> {
    let mut segments: Vec<String> = relative
        .parent()
        .into_iter()
        .flat_map(Path::components)
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    let stem = relative
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();

    let is_root = segments.is_empty() && (stem == "lib" || stem == "main");
    if !is_root && stem != "mod" {
        segments.push(stem);
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, relative: &str, contents: &str) {
        let path = dir.join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent dir");
        }
        fs::write(path, contents).expect("Failed to write file");
    }

    fn package(name: &str) -> TempDir {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write(
            dir.path(),
            MANIFEST_FILE,
            &format!("[package]\nname = \"{name}\"\nversion = \"0.1.0\"\n"),
        );
        dir
    }

    #[test]
    fn test_module_path() {
        assert!(module_path(Path::new("lib.rs")).is_empty());
        assert!(module_path(Path::new("main.rs")).is_empty());
        assert_eq!(module_path(Path::new("user.rs")), vec!["user"]);
        assert_eq!(module_path(Path::new("model/mod.rs")), vec!["model"]);
        assert_eq!(
            module_path(Path::new("model/user.rs")),
            vec!["model", "user"]
        );
        assert_eq!(module_path(Path::new("bin/lib.rs")), vec!["bin", "lib"]);
    }

    #[test]
    fn test_resolve_name_only() {
        let dir = package("user-store");

        let unit = resolve(dir.path(), LoadMode::NameOnly).expect("Failed to resolve");

        assert_eq!(unit.name, "user_store");
        assert!(unit.files.is_empty());
    }

    #[test]
    fn test_resolve_syntax_sorted() {
        let dir = package("shop");
        write(dir.path(), "src/lib.rs", "pub mod model;\n");
        write(dir.path(), "src/model/mod.rs", "pub mod order;\n");
        write(dir.path(), "src/model/order.rs", "pub struct Order { id: u64 }\n");
        write(dir.path(), "src/README.md", "not rust\n");

        let unit = resolve(dir.path(), LoadMode::Syntax).expect("Failed to resolve");

        let paths: Vec<_> = unit.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![
                PathBuf::from("lib.rs"),
                PathBuf::from("model/mod.rs"),
                PathBuf::from("model/order.rs"),
            ]
        );
        assert_eq!(unit.files[2].module_path, vec!["model", "order"]);
        assert_eq!(unit.source_root, dir.path().join("src"));
    }

    #[test]
    fn test_resolve_skips_other_crate_roots() {
        let dir = package("tool");
        write(dir.path(), "src/lib.rs", "pub struct Job { pub id: u64 }\n");
        write(dir.path(), "src/main.rs", "struct Job { name: String }\nfn main() {}\n");
        write(dir.path(), "src/bin/worker.rs", "struct Job;\nfn main() {}\n");
        write(dir.path(), "src/bin/admin/main.rs", "fn main() {}\n");
        write(dir.path(), "src/jobs/bin.rs", "pub struct Batch;\n");

        let unit = resolve(dir.path(), LoadMode::Syntax).expect("Failed to resolve");

        let paths: Vec<_> = unit.files.iter().map(|f| f.path.clone()).collect();
        assert_eq!(
            paths,
            vec![PathBuf::from("jobs/bin.rs"), PathBuf::from("lib.rs")]
        );
    }

    #[test]
    fn test_resolve_binary_only_package_keeps_main() {
        let dir = package("app");
        write(dir.path(), "src/main.rs", "struct Config { port: u16 }\nfn main() {}\n");

        let unit = resolve(dir.path(), LoadMode::Syntax).expect("Failed to resolve");

        assert_eq!(unit.files.len(), 1);
        assert!(unit.files[0].module_path.is_empty());
    }

    #[test]
    fn test_unit_debug_output() {
        let dir = package("shop");
        write(dir.path(), "src/lib.rs", "pub struct Order { id: u64 }\n");

        let unit = resolve(dir.path(), LoadMode::Syntax).expect("Failed to resolve");

        let debug = format!("{unit:?}");
        assert!(debug.contains("CompilationUnit"));
        assert!(debug.contains("\"shop\""));
        assert!(debug.contains("Order"));
    }

    #[test]
    fn test_resolve_missing_manifest() {
        let dir = TempDir::new().expect("Failed to create temp dir");

        let err = resolve(dir.path(), LoadMode::Syntax).expect_err("no manifest");

        assert!(matches!(
            err,
            SourceError::Load {
                cause: LoadCause::MissingManifest,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_not_a_directory() {
        let dir = package("solo");
        let err = resolve(dir.path().join(MANIFEST_FILE), LoadMode::NameOnly)
            .expect_err("file is not a directory");
        assert!(matches!(
            err,
            SourceError::Load {
                cause: LoadCause::NotADirectory,
                ..
            }
        ));
    }

    #[test]
    fn test_resolve_virtual_workspace_is_ambiguous() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write(
            dir.path(),
            MANIFEST_FILE,
            "[workspace]\nmembers = [\"a\", \"b\"]\n",
        );

        let err = resolve(dir.path(), LoadMode::Syntax).expect_err("virtual manifest");

        match err {
            SourceError::AmbiguousPackage { found, .. } => assert_eq!(found, 2),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_empty_workspace_is_ambiguous() {
        let dir = TempDir::new().expect("Failed to create temp dir");
        write(dir.path(), MANIFEST_FILE, "[workspace]\n");

        let err = resolve(dir.path(), LoadMode::NameOnly).expect_err("virtual manifest");

        assert!(matches!(err, SourceError::AmbiguousPackage { found: 0, .. }));
    }

    #[test]
    fn test_resolve_syntax_error() {
        let dir = package("broken");
        write(dir.path(), "src/lib.rs", "pub struct User {\n    id: i64,\n");

        let err = resolve(dir.path(), LoadMode::Syntax).expect_err("invalid source");

        match err {
            SourceError::Load {
                cause: LoadCause::Syntax { path, .. },
                ..
            } => assert_eq!(path, PathBuf::from("lib.rs")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_resolve_missing_source_root() {
        let dir = package("empty");

        let err = resolve(dir.path(), LoadMode::Syntax).expect_err("no src dir");

        assert!(matches!(
            err,
            SourceError::Load {
                cause: LoadCause::MissingSourceRoot { .. },
                ..
            }
        ));
    }
}
