//! Injector configuration
//!
//! Settings can be built in code or picked up from the environment:
//! - `JAIF_NULLABILITY`: enable nullability-driven output (`1`/`true`)
//! - `JAIF_STRIP_REFLECTION`: strip reflection metadata by default
//! - `JAIF_ANNOTATIONS`: `:`-separated list of index files or directories

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::consts::INDEX_FILE_EXTENSION;
use crate::error::{Error, Result};

/// Where an annotation index fragment comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexSource {
    /// Index text supplied directly; `name` is only used in log messages
    Inline { name: String, contents: String },
    /// A single file, or a directory scanned recursively for `*.jaif`
    Path(PathBuf),
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Config {
    /// Emit nullability attributes from `@NonNull`/`@Nullable`-style annotations
    pub nullability: bool,
    /// Drop reflection metadata unless a class asks for it with `@ReflectionSupport(FULL)`
    pub strip_reflection: bool,
    /// Index fragments, loaded and concatenated in order
    pub annotation_sources: Vec<IndexSource>,
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_nullability(mut self, enabled: bool) -> Self {
        self.nullability = enabled;
        self
    }

    pub fn with_strip_reflection(mut self, strip: bool) -> Self {
        self.strip_reflection = strip;
        self
    }

    pub fn with_index_text(mut self, name: impl Into<String>, contents: impl Into<String>) -> Self {
        self.annotation_sources.push(IndexSource::Inline { name: name.into(), contents: contents.into() });
        self
    }

    pub fn with_index_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.annotation_sources.push(IndexSource::Path(path.into()));
        self
    }

    /// Defaults overridden by `JAIF_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::default().apply_env()
    }

    pub fn apply_env(mut self) -> Result<Self> {
        if let Some(value) = env_flag("JAIF_NULLABILITY")? {
            self.nullability = value;
        }
        if let Some(value) = env_flag("JAIF_STRIP_REFLECTION")? {
            self.strip_reflection = value;
        }
        if let Ok(paths) = std::env::var("JAIF_ANNOTATIONS") {
            for path in paths.split(':').filter(|p| !p.trim().is_empty()) {
                self.annotation_sources.push(IndexSource::Path(PathBuf::from(path.trim())));
            }
        }
        Ok(self)
    }

    /// Read every source in order, returning `(origin, text)` pairs.
    ///
    /// Directories contribute their `*.jaif` files in path order so runs are
    /// reproducible.
    pub fn load_sources(&self) -> Result<Vec<(String, String)>> {
        let mut out = Vec::new();
        for source in &self.annotation_sources {
            match source {
                IndexSource::Inline { name, contents } => out.push((name.clone(), contents.clone())),
                IndexSource::Path(path) if path.is_dir() => {
                    for file in index_files(path)? {
                        out.push((file.display().to_string(), read_index(&file)?));
                    }
                }
                IndexSource::Path(path) => out.push((path.display().to_string(), read_index(path)?)),
            }
        }
        Ok(out)
    }
}

fn env_flag(name: &str) -> Result<Option<bool>> {
    let Ok(raw) = std::env::var(name) else {
        return Ok(None);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(Some(true)),
        "0" | "false" | "no" | "off" | "" => Ok(Some(false)),
        other => Err(Error::config_error(format!("{} must be a boolean, got '{}'", name, other))),
    }
}

fn index_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).sort_by_file_name() {
        let entry = entry?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().map(|e| e == INDEX_FILE_EXTENSION).unwrap_or(false) {
            files.push(path.to_path_buf());
        }
    }
    log::debug!("CONFIG: {} index files under {}", files.len(), dir.display());
    Ok(files)
}

fn read_index(path: &Path) -> Result<String> {
    fs::read_to_string(path).map_err(|source| Error::IndexSource { path: path.display().to_string(), source })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_source_order() {
        let config = Config::new()
            .with_nullability(true)
            .with_index_text("a", "package a:")
            .with_index_text("b", "package b:");
        let loaded = config.load_sources().expect("inline sources load");
        assert!(config.nullability);
        assert_eq!(loaded.iter().map(|(n, _)| n.as_str()).collect::<Vec<_>>(), ["a", "b"]);
    }

    #[test]
    fn test_missing_file_is_fatal() {
        let config = Config::new().with_index_path("/nonexistent/annotations.jaif");
        assert!(matches!(config.load_sources(), Err(Error::IndexSource { .. })));
    }
}
