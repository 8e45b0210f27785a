//! Deployment view over a manifest.

use super::annotations::{set_annotation, AnnotationScope, CHANGE_CAUSE_ANNOTATION};
use super::image::set_image_tag;
use super::{Manifest, ManifestError};
use crate::fieldpath::{self, Path};
use crate::value::Value;

/// Path of the pod template's container list.
pub const CONTAINERS_PATH: &str = "spec.template.spec.containers";

/// Deployment is a manifest whose kind is `Deployment`.
#[derive(Debug, Clone, PartialEq)]
pub struct Deployment {
    manifest: Manifest,
}

impl Deployment {
    /// Loads a deployment manifest from `path`.
    pub fn load(path: impl AsRef<std::path::Path>) -> Result<Self, ManifestError> {
        Deployment::from_manifest(Manifest::load(path)?)
    }

    /// Parses deployment manifest text.
    pub fn parse(text: &str) -> Result<Self, ManifestError> {
        Deployment::from_manifest(Manifest::parse(text)?)
    }

    pub fn from_manifest(manifest: Manifest) -> Result<Self, ManifestError> {
        if !manifest.kind().is_deployment() {
            return Err(ManifestError::UnsupportedKind {
                kind: Some(manifest.kind().to_string()),
            });
        }
        Ok(Deployment { manifest })
    }

    pub fn manifest(&self) -> &Manifest {
        &self.manifest
    }

    pub fn into_manifest(self) -> Manifest {
        self.manifest
    }

    /// Sets one annotation in the given scope.
    pub fn set_annotation(
        &mut self,
        scope: AnnotationScope,
        key: &str,
        value: &str,
    ) -> Result<(), ManifestError> {
        set_annotation(self.manifest.content_mut(), scope, key, value)?;
        Ok(())
    }

    /// Records `cause` as the change cause on the deployment and its pod template.
    pub fn set_change_cause(&mut self, cause: &str) -> Result<(), ManifestError> {
        for scope in AnnotationScope::ALL {
            self.set_annotation(scope, CHANGE_CAUSE_ANNOTATION, cause)?;
        }
        Ok(())
    }

    /// Returns the pod template's containers.
    pub fn containers(&self) -> Result<&[Value], ManifestError> {
        let path = Path::parse(CONTAINERS_PATH)?;
        let value = fieldpath::get(self.manifest.content(), &path)?;
        match value {
            Value::List(list) => Ok(list.as_slice()),
            other => Err(fieldpath::AccessError::TypeMismatch {
                path: path.to_string(),
                expected: "list",
                actual: other.type_name(),
            }
            .into()),
        }
    }

    /// Rewrites the image tag of the container selected by `image_name`.
    pub fn set_image_tag(
        &mut self,
        image_name: Option<&str>,
        tag: &str,
    ) -> Result<usize, ManifestError> {
        let path = Path::parse(CONTAINERS_PATH)?;
        let containers = fieldpath::get_list_mut(self.manifest.content_mut(), &path)?;
        set_image_tag(containers, image_name, tag)
    }

    pub fn render(&self) -> Result<String, ManifestError> {
        self.manifest.render()
    }

    pub fn store(&self, path: impl AsRef<std::path::Path>) -> Result<(), ManifestError> {
        self.manifest.store(path)
    }

    pub fn write(&self) -> Result<(), ManifestError> {
        self.manifest.write()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Map;
    use pretty_assertions::assert_eq;

    const DEPLOYMENT: &str = "apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
spec:
  template:
    metadata:
      labels:
        app: web
    spec:
      containers:
      - name: web
        image: repo/web:1.0
      - name: sidecar
        image: repo/proxy:0.3
";

    fn image_at(deployment: &Deployment, index: usize) -> String {
        deployment.containers().unwrap()[index]
            .as_map()
            .and_then(|m| m.get("image"))
            .and_then(Value::as_str)
            .unwrap()
            .to_string()
    }

    #[test]
    fn test_parse_rejects_service() {
        assert!(matches!(
            Deployment::parse("kind: Service\n"),
            Err(ManifestError::UnsupportedKind { .. })
        ));
    }

    #[test]
    fn test_set_image_tag_in_deployment() {
        let mut deployment = Deployment::parse(DEPLOYMENT).unwrap();
        assert_eq!(deployment.set_image_tag(Some("repo/proxy"), "0.4").unwrap(), 1);
        assert_eq!(image_at(&deployment, 0), "repo/web:1.0");
        assert_eq!(image_at(&deployment, 1), "repo/proxy:0.4");
    }

    #[test]
    fn test_set_change_cause_on_both_scopes() {
        let mut deployment = Deployment::parse(DEPLOYMENT).unwrap();
        deployment.set_change_cause("deploy v2").unwrap();

        let content = deployment.manifest().content();
        let mut expected = Map::new();
        expected.set(CHANGE_CAUSE_ANNOTATION, "deploy v2");
        for scope in AnnotationScope::ALL {
            let annotations = fieldpath::get_map(content, &Path::parse(scope.path()).unwrap()).unwrap();
            assert_eq!(annotations, &expected);
        }
    }

    #[test]
    fn test_containers_must_be_a_list() {
        let mut deployment =
            Deployment::parse("kind: Deployment\nspec:\n  template:\n    spec:\n      containers: {}\n").unwrap();
        assert!(matches!(
            deployment.containers(),
            Err(ManifestError::Access(fieldpath::AccessError::TypeMismatch { .. }))
        ));
        assert!(matches!(
            deployment.set_image_tag(None, "1"),
            Err(ManifestError::Access(fieldpath::AccessError::TypeMismatch { .. }))
        ));
    }

    #[test]
    fn test_failed_image_patch_keeps_annotations() {
        let mut deployment = Deployment::parse(DEPLOYMENT).unwrap();
        deployment
            .set_annotation(AnnotationScope::Manifest, "team", "web")
            .unwrap();
        assert!(deployment.set_image_tag(Some("missing"), "2").is_err());

        let annotations = fieldpath::get_map(
            deployment.manifest().content(),
            &Path::parse("metadata.annotations").unwrap(),
        )
        .unwrap();
        assert_eq!(annotations.get("team"), Some(&Value::from("web")));
    }
}
