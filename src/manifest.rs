//! Reads scanned-resource manifests (TOML or JSON) into [`ResourceEntry`] lists.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::error::{GenError, Result};
use crate::model::{ResourceKey, ResourceKind};
use crate::plan::ResourceEntry;

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestFile {
    #[serde(default, alias = "resources")]
    resource: Vec<ManifestEntry>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ManifestEntry {
    kind: ResourceKind,
    name: String,
    #[serde(default)]
    qualifiers: Vec<String>,
    path: String,
}

/// Expands glob patterns into a sorted, deduplicated list of files.
/// A pattern that matches nothing is logged, not an error.
pub fn expand_patterns(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut out: Vec<PathBuf> = Vec::new();

    for pattern in patterns {
        let paths = glob::glob(pattern).map_err(|source| GenError::Pattern {
            pattern: pattern.clone(),
            source,
        })?;

        let mut matched: Vec<PathBuf> = Vec::new();
        for entry in paths {
            let path = entry.map_err(|e| {
                let path = e.path().to_path_buf();
                GenError::io(path, e.into())
            })?;
            if path.is_file() {
                matched.push(path);
            }
        }

        if matched.is_empty() {
            warn!(pattern = %pattern, "manifest pattern matched no files");
        }
        matched.sort();
        out.extend(matched);
    }

    // keep first occurrence so pattern order decides entry order
    let mut seen = std::collections::BTreeSet::new();
    out.retain(|p| seen.insert(p.clone()));
    Ok(out)
}

/// Parses one manifest; the format follows the file extension
/// (`.json` is JSON, anything else TOML).
pub fn load_manifest(path: &Path) -> Result<Vec<ResourceEntry>> {
    let text = fs::read_to_string(path).map_err(|e| GenError::io(path, e))?;
    let bad = |message: String| GenError::Manifest {
        path: path.to_path_buf(),
        message,
    };

    let file: ManifestFile = match path.extension().and_then(|e| e.to_str()) {
        Some("json") => serde_json::from_str(&text).map_err(|e| bad(e.to_string()))?,
        _ => toml::from_str(&text).map_err(|e| bad(e.to_string()))?,
    };

    let mut entries = Vec::with_capacity(file.resource.len());
    for raw in file.resource {
        let key = ResourceKey::new(raw.kind, &raw.name)
            .map_err(|e| bad(e.to_string()))?;
        if raw.path.trim().is_empty() {
            return Err(bad(format!("{key}: empty path")));
        }
        entries.push(ResourceEntry {
            key,
            qualifiers: raw.qualifiers,
            path: raw.path,
        });
    }

    if entries.is_empty() {
        warn!(path = %path.display(), "manifest declares no resources");
    }
    debug!(path = %path.display(), entries = entries.len(), "loaded manifest");
    Ok(entries)
}

/// Loads every manifest in order and concatenates the entries.
pub fn load_all(paths: &[PathBuf]) -> Result<Vec<ResourceEntry>> {
    let mut entries = Vec::new();
    for path in paths {
        entries.extend(load_manifest(path)?);
    }
    info!(manifests = paths.len(), entries = entries.len(), "loaded manifests");
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn reads_toml_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("drawables.toml");
        fs::write(
            &path,
            r#"
[[resource]]
kind = "drawable"
name = "icon_6"
path = "drawable/icon_6.xml"

[[resource]]
kind = "drawable"
name = "logo"
qualifiers = ["night"]
path = "drawable-night/logo.png"
"#,
        )
        .unwrap();

        let entries = load_manifest(&path).unwrap();
        assert_eq!(
            entries,
            vec![
                ResourceEntry::new(
                    ResourceKey::new(ResourceKind::Drawable, "icon_6").unwrap(),
                    "drawable/icon_6.xml"
                ),
                ResourceEntry::new(
                    ResourceKey::new(ResourceKind::Drawable, "logo").unwrap(),
                    "drawable-night/logo.png"
                )
                .with_qualifiers(["night"]),
            ]
        );
    }

    #[test]
    fn reads_json_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("strings.json");
        fs::write(
            &path,
            r#"{"resources": [
                {"kind": "string", "name": "app_name", "path": "values/strings.xml"}
            ]}"#,
        )
        .unwrap();

        let entries = load_manifest(&path).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].key.to_string(), "string:app_name");
    }

    #[test]
    fn invalid_name_names_the_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(
            &path,
            "[[resource]]\nkind = \"drawable\"\nname = \"icon-6\"\npath = \"x.xml\"\n",
        )
        .unwrap();

        let err = load_manifest(&path).unwrap_err();
        match err {
            GenError::Manifest { path: p, message } => {
                assert_eq!(p, path);
                assert!(message.contains("drawable:icon-6"), "{message}");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(
            &path,
            "[[resource]]\nkind = \"sprite\"\nname = \"a\"\npath = \"x.xml\"\n",
        )
        .unwrap();
        assert!(matches!(load_manifest(&path), Err(GenError::Manifest { .. })));
    }

    #[test]
    fn misspelled_table_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("typo.toml");
        fs::write(
            &path,
            "[[resouce]]\nkind = \"drawable\"\nname = \"icon_6\"\npath = \"x.xml\"\n",
        )
        .unwrap();

        match load_manifest(&path).unwrap_err() {
            GenError::Manifest { message, .. } => assert!(message.contains("resouce"), "{message}"),
            other => panic!("unexpected error: {other}"),
        }

        let json = dir.path().join("typo.json");
        fs::write(&json, r#"{"resorces": []}"#).unwrap();
        assert!(matches!(load_manifest(&json), Err(GenError::Manifest { .. })));
    }

    #[test]
    fn empty_manifest_loads_as_no_entries() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.toml");
        fs::write(&path, "# nothing scanned yet\n").unwrap();
        assert!(load_manifest(&path).unwrap().is_empty());
    }

    #[test]
    fn patterns_expand_sorted_and_deduplicated() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["b.toml", "a.toml", "c.json"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        let root = dir.path().display().to_string();

        let paths = expand_patterns(&[format!("{root}/*.toml"), format!("{root}/*")]).unwrap();
        let names: Vec<String> = paths
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, ["a.toml", "b.toml", "c.json"]);
    }

    #[test]
    fn malformed_pattern_is_an_error() {
        let err = expand_patterns(&["[".to_string()]).unwrap_err();
        assert!(matches!(err, GenError::Pattern { .. }));
    }
}
