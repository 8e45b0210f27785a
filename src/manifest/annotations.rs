//! Annotation patching.

use crate::fieldpath::{self, AccessError, Path};
use crate::value::Map;
use tracing::debug;

/// Annotation recording why a rollout happened.
pub const CHANGE_CAUSE_ANNOTATION: &str = "kubernetes.io/change-cause";

/// AnnotationScope selects which annotations map a patch targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationScope {
    /// `metadata.annotations` of the resource itself.
    Manifest,
    /// `spec.template.metadata.annotations`; changing these starts a rollout.
    PodTemplate,
}

impl AnnotationScope {
    pub const ALL: [AnnotationScope; 2] = [AnnotationScope::Manifest, AnnotationScope::PodTemplate];

    /// Returns the dotted path of the scope's annotations map.
    pub fn path(&self) -> &'static str {
        match self {
            AnnotationScope::Manifest => "metadata.annotations",
            AnnotationScope::PodTemplate => "spec.template.metadata.annotations",
        }
    }
}

/// Sets `key` to `value` in the scope's annotations, creating the map if needed.
///
/// Any previous value is replaced. Parents of the annotations map must exist.
pub fn set_annotation(
    doc: &mut Map,
    scope: AnnotationScope,
    key: &str,
    value: &str,
) -> Result<(), AccessError> {
    let path = Path::parse(scope.path())?;
    let annotations = fieldpath::get_or_create_map(doc, &path)?;
    annotations.set(key, value);
    debug!(scope = ?scope, key, value, "set annotation");
    Ok(())
}
