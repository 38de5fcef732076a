//! Loading templates and data sources from disk.

use std::fs;
use std::path::Path;

use serde_json::Value;

use crate::data::SourceRegistry;
use crate::error::{Error, Result};
use crate::template::Template;

/// Namespace names and the file each is read from by [`SourceRegistry::load_dir`].
pub const DEFAULT_SOURCE_FILES: &[(&str, &str)] = &[
    ("cfr", "cfr_data.json"),
    ("cyc", "cyc_data.json"),
    ("illustration", "illustration_data.json"),
    ("ceding_info", "ceding_info.json"),
    ("user_input", "user_input.json"),
];

/// Read and parse a template file.
///
/// Parse failures are reported as [`Error::Template`] naming the file.
pub fn load_template(path: impl AsRef<Path>) -> Result<Template> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    Template::from_json_str(&text).map_err(|err| match err {
        Error::Json(e) => Error::Template(format!("{}: {}", path.display(), e)),
        other => other,
    })
}

/// Read and parse one data source file.
pub fn load_source(path: impl AsRef<Path>) -> Result<Value> {
    let text = fs::read_to_string(path.as_ref())?;
    Ok(serde_json::from_str(&text)?)
}

impl SourceRegistry {
    /// Register every default namespace from files in `dir`.
    ///
    /// A missing file registers an empty mapping and logs a warning, so
    /// placeholders into it surface as resolution markers rather than a
    /// failed run. A file that exists but is not valid JSON is an error.
    pub fn load_dir(dir: impl AsRef<Path>) -> Result<Self> {
        Self::load_files(dir, DEFAULT_SOURCE_FILES.iter().copied())
    }

    /// Register namespaces from `(name, file name)` pairs relative to `dir`.
    pub fn load_files<'f>(
        dir: impl AsRef<Path>,
        files: impl IntoIterator<Item = (&'f str, &'f str)>,
    ) -> Result<Self> {
        let dir = dir.as_ref();
        let mut registry = SourceRegistry::new();

        for (name, file) in files {
            let path = dir.join(file);
            let root = if path.exists() {
                load_source(&path)?
            } else {
                log::warn!(
                    "Data file {} not found, registering '{}' as empty",
                    path.display(),
                    name
                );
                Value::Object(Default::default())
            };
            registry.register(name, root);
        }

        Ok(registry)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn test_load_dir_with_missing_files() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("cfr_data.json"),
            r#"{"recipient": {"title_and_name": "Mr J Smith"}}"#,
        )
        .unwrap();

        let registry = SourceRegistry::load_dir(dir.path()).unwrap();
        assert_eq!(registry.len(), DEFAULT_SOURCE_FILES.len());
        assert_eq!(
            registry.lookup("cfr").unwrap()["recipient"]["title_and_name"],
            "Mr J Smith"
        );
        assert_eq!(registry.lookup("cyc").unwrap(), &json!({}));
    }

    #[test]
    fn test_load_source_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(load_source(&path), Err(Error::Json(_))));
    }

    #[test]
    fn test_load_template_unknown_node() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("letter.json");
        fs::write(
            &path,
            r#"{"sections": [{"children": [{"type": "chart"}]}]}"#,
        )
        .unwrap();

        match load_template(&path) {
            Err(Error::Template(message)) => assert!(message.contains("letter.json")),
            other => panic!("expected template error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_template_missing_file() {
        let dir = TempDir::new().unwrap();
        let result = load_template(dir.path().join("nope.json"));
        assert!(matches!(result, Err(Error::Io(_))));
    }
}
