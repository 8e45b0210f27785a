//! Loading, rendering and storing manifests.

use super::{Kind, ManifestError, SUPPORTED_KINDS};
use crate::fieldpath::AccessError;
use crate::value::{self, Map, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Format is the on-disk encoding of a manifest, chosen by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Yaml,
    Json,
}

impl Format {
    /// Returns the format for `.yaml`, `.yml` or `.json` paths.
    pub fn from_path(path: &Path) -> Option<Format> {
        match path.extension()?.to_str()? {
            "yaml" | "yml" => Some(Format::Yaml),
            "json" => Some(Format::Json),
            _ => None,
        }
    }
}

/// Manifest is a parsed resource description with a supported `kind`.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    path: Option<PathBuf>,
    kind: Kind,
    content: Map,
}

impl Manifest {
    /// Reads and parses the manifest at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ManifestError> {
        let path = path.as_ref();
        let metadata = fs::metadata(path)
            .map_err(|e| ManifestError::file_access(path, format!("could not get file info: {}", e)))?;
        if !metadata.is_file() {
            return Err(ManifestError::file_access(
                path,
                format!("'{}' is not a regular file", path.display()),
            ));
        }
        let text = fs::read_to_string(path)
            .map_err(|e| ManifestError::file_access(path, format!("reading manifest file: {}", e)))?;

        let mut manifest = Manifest::parse(&text)?;
        debug!(path = %path.display(), kind = %manifest.kind, "loaded manifest");
        manifest.path = Some(path.to_path_buf());
        Ok(manifest)
    }

    /// Parses manifest text. YAML and JSON are both accepted.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        let value = value::from_yaml(text).map_err(ManifestError::Parse)?;
        Manifest::from_value(value)
    }

    /// Wraps an already parsed document, checking its `kind`.
    pub fn from_value(value: Value) -> Result<Self, ManifestError> {
        let content = match value {
            Value::Map(map) => map,
            other => return Err(AccessError::type_mismatch("<root>", &other).into()),
        };
        let kind = match content.get("kind") {
            None => return Err(ManifestError::UnsupportedKind { kind: None }),
            Some(Value::String(kind)) => Kind::new(kind.as_str()),
            Some(other) => {
                return Err(ManifestError::UnsupportedKind {
                    kind: serde_json::to_string(other).ok(),
                })
            }
        };
        if !SUPPORTED_KINDS.contains(&kind.as_str()) {
            return Err(ManifestError::UnsupportedKind {
                kind: Some(kind.as_str().to_string()),
            });
        }

        Ok(Manifest {
            path: None,
            kind,
            content,
        })
    }

    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Returns the path the manifest was loaded from, if any.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn content(&self) -> &Map {
        &self.content
    }

    pub fn content_mut(&mut self) -> &mut Map {
        &mut self.content
    }

    pub fn into_content(self) -> Map {
        self.content
    }

    /// Renders the manifest in the format of its own path, YAML otherwise.
    pub fn render(&self) -> Result<String, ManifestError> {
        let format = self
            .path
            .as_deref()
            .and_then(Format::from_path)
            .unwrap_or(Format::Yaml);
        self.render_as(format)
    }

    /// Renders the manifest in `format`.
    pub fn render_as(&self, format: Format) -> Result<String, ManifestError> {
        let value = Value::Map(self.content.clone());
        let rendered = match format {
            Format::Yaml => value::to_yaml(&value),
            Format::Json => value::to_json(&value),
        };
        rendered.map_err(ManifestError::Serialize)
    }

    /// Writes the manifest to `path`, overwriting it in place.
    ///
    /// The write is not atomic; a failure part way through can leave a
    /// truncated file.
    pub fn store(&self, path: impl AsRef<Path>) -> Result<(), ManifestError> {
        let path = path.as_ref();
        let format =
            Format::from_path(path).ok_or_else(|| ManifestError::InvalidExtension(path.to_path_buf()))?;
        let rendered = self.render_as(format)?;
        fs::write(path, rendered)
            .map_err(|e| ManifestError::file_access(path, format!("writing file to disk: {}", e)))?;
        info!(path = %path.display(), "wrote manifest");
        Ok(())
    }

    /// Writes the manifest back to the path it was loaded from.
    pub fn write(&self) -> Result<(), ManifestError> {
        match &self.path {
            Some(path) => self.store(path),
            None => Err(ManifestError::file_access(
                PathBuf::new(),
                "manifest was not loaded from a file",
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    const DEPLOYMENT: &str = "apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  namespace: prod
spec:
  replicas: 3
  selector:
    matchLabels:
      app: web
  template:
    metadata:
      labels:
        app: web
    spec:
      containers:
      - name: web
        image: repo/web:1.0
        ports:
        - containerPort: 8080
";

    fn write_temp(dir: &Path, name: &str, contents: &str) -> PathBuf {
        let path = dir.join(name);
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_parse_deployment() {
        let manifest = Manifest::parse(DEPLOYMENT).unwrap();
        assert!(manifest.kind().is_deployment());
        assert_eq!(manifest.path(), None);
        assert_eq!(
            manifest.content().keys().collect::<Vec<_>>(),
            vec!["apiVersion", "kind", "metadata", "spec"]
        );
    }

    #[test]
    fn test_parse_rejects_other_kinds() {
        let err = Manifest::parse("kind: Service\nmetadata:\n  name: web\n").unwrap_err();
        assert!(matches!(
            err,
            ManifestError::UnsupportedKind { kind: Some(ref k) } if k == "Service"
        ));
        assert!(matches!(
            Manifest::parse("metadata:\n  name: web\n"),
            Err(ManifestError::UnsupportedKind { kind: None })
        ));
    }

    #[test]
    fn test_parse_rejects_non_string_kind() {
        assert!(matches!(
            Manifest::parse("kind: 5\nmetadata:\n  name: web\n"),
            Err(ManifestError::UnsupportedKind { kind: Some(ref k) }) if k == "5"
        ));
        assert!(matches!(
            Manifest::parse("kind: [Deployment]\n"),
            Err(ManifestError::UnsupportedKind { kind: Some(ref k) }) if k == r#"["Deployment"]"#
        ));
    }

    #[test]
    fn test_parse_rejects_non_map_documents() {
        assert!(matches!(
            Manifest::parse("- a\n- b\n"),
            Err(ManifestError::Access(AccessError::TypeMismatch { .. }))
        ));
        assert!(matches!(
            Manifest::parse("kind: Deployment\nspec: [\n"),
            Err(ManifestError::Parse(_))
        ));
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            Manifest::load(dir.path().join("missing.yaml")),
            Err(ManifestError::FileAccess { .. })
        ));
    }

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        let err = Manifest::load(dir.path()).unwrap_err();
        assert!(matches!(err, ManifestError::FileAccess { .. }));
        assert!(err.to_string().contains("not a regular file"));
    }

    #[test]
    fn test_roundtrip_without_patches() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_temp(dir.path(), "deployment.yaml", DEPLOYMENT);

        let manifest = Manifest::load(&path).unwrap();
        assert_eq!(manifest.path(), Some(path.as_path()));
        manifest.write().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), DEPLOYMENT);
        assert_eq!(Manifest::load(&path).unwrap(), manifest);
    }

    #[test]
    fn test_store_rejects_unknown_extension() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::parse(DEPLOYMENT).unwrap();
        let target = dir.path().join("deployment.txt");
        assert!(matches!(
            manifest.store(&target),
            Err(ManifestError::InvalidExtension(_))
        ));
        assert!(!target.exists());
    }

    #[test]
    fn test_store_json() {
        let dir = tempfile::tempdir().unwrap();
        let manifest = Manifest::parse(DEPLOYMENT).unwrap();
        let target = dir.path().join("deployment.json");
        manifest.store(&target).unwrap();

        let text = fs::read_to_string(&target).unwrap();
        assert!(text.starts_with("{\n  \"apiVersion\": \"apps/v1\",\n  \"kind\": \"Deployment\""));
        let reloaded = Manifest::load(&target).unwrap();
        assert_eq!(reloaded.content(), manifest.content());
        assert_eq!(reloaded.render().unwrap(), text);
    }

    #[test]
    fn test_write_without_path() {
        let manifest = Manifest::parse(DEPLOYMENT).unwrap();
        assert!(matches!(
            manifest.write(),
            Err(ManifestError::FileAccess { .. })
        ));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(Format::from_path(Path::new("a.yaml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("dir/a.yml")), Some(Format::Yaml));
        assert_eq!(Format::from_path(Path::new("a.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("a.yaml.bak")), None);
        assert_eq!(Format::from_path(Path::new("yaml")), None);
    }
}
