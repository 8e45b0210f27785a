//! Container image references and image tag patching.

use super::ManifestError;
use crate::fieldpath::AccessError;
use crate::value::Value;
use std::fmt;
use tracing::info;

/// ImageRef is a container image split at its first `:`.
///
/// An image without a `:` is a bare name with no tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    pub name: String,
    pub tag: Option<String>,
}

impl ImageRef {
    /// Creates a reference from a name and a tag.
    pub fn new(name: impl Into<String>, tag: impl Into<String>) -> Self {
        ImageRef {
            name: name.into(),
            tag: Some(tag.into()),
        }
    }

    pub fn parse(image: &str) -> Self {
        match image.split_once(':') {
            Some((name, tag)) => ImageRef {
                name: name.to_string(),
                tag: Some(tag.to_string()),
            },
            None => ImageRef {
                name: image.to_string(),
                tag: None,
            },
        }
    }
}

impl fmt::Display for ImageRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.tag {
            Some(tag) => write!(f, "{}:{}", self.name, tag),
            None => write!(f, "{}", self.name),
        }
    }
}

/// Rewrites the tag of one container's image, returning the index patched.
///
/// With a single container, `target_name` may be omitted and the existing
/// image name is kept; when given it must match. With several containers,
/// `target_name` is required and only the first container whose image name
/// matches is patched. An empty `target_name` counts as omitted.
pub fn set_image_tag(
    containers: &mut [Value],
    target_name: Option<&str>,
    new_tag: &str,
) -> Result<usize, ManifestError> {
    let target_name = target_name.filter(|name| !name.is_empty());

    let index = match containers.len() {
        0 => return Err(ManifestError::NoContainers),
        1 => {
            let existing = ImageRef::parse(image_of(&containers[0], 0)?);
            if let Some(target) = target_name {
                if target != existing.name {
                    return Err(ManifestError::NameMismatch {
                        expected: target.to_string(),
                        actual: existing.name,
                    });
                }
            }
            0
        }
        _ => {
            let target = target_name.ok_or(ManifestError::ImageNameRequired)?;
            let mut matched = None;
            for (index, container) in containers.iter().enumerate() {
                if ImageRef::parse(image_of(container, index)?).name == target {
                    matched = Some(index);
                    break;
                }
            }
            matched.ok_or_else(|| ManifestError::NoMatchingContainer(target.to_string()))?
        }
    };

    let container = &mut containers[index];
    let name = ImageRef::parse(image_of(container, index)?).name;
    let image = ImageRef::new(name, new_tag).to_string();
    if let Some(map) = container.as_map_mut() {
        map.set("image", image.as_str());
    }
    info!(container = index, image = %image, "set container image");
    Ok(index)
}

fn image_of(container: &Value, index: usize) -> Result<&str, AccessError> {
    let at = format!("containers[{}]", index);
    let map = container
        .as_map()
        .ok_or_else(|| AccessError::type_mismatch(at.as_str(), container))?;
    let image = map
        .get("image")
        .ok_or_else(|| AccessError::key_not_found("image", at.as_str()))?;
    image.as_str().ok_or_else(|| AccessError::TypeMismatch {
        path: format!("{}.image", at),
        expected: "string",
        actual: image.type_name(),
    })
}
