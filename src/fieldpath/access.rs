//! Navigation of nested maps by [`Path`].
//!
//! Two modes are offered: strict lookups ([`get`], [`get_mut`]) that fail on
//! the first missing key, and [`get_or_create_map`], which creates the final
//! map when it is absent but still requires every parent to exist.

use super::{AccessError, Path};
use crate::value::{Map, Value};

/// Returns the value at `path`.
pub fn get<'a>(root: &'a Map, path: &Path) -> Result<&'a Value, AccessError> {
    let (last, parents) = path.split_last();
    let mut current = root;
    for (depth, segment) in parents.iter().enumerate() {
        let value = current
            .get(segment)
            .ok_or_else(|| AccessError::key_not_found(segment, path.prefix(depth)))?;
        current = value
            .as_map()
            .ok_or_else(|| AccessError::type_mismatch(path.prefix(depth + 1), value))?;
    }
    current
        .get(last)
        .ok_or_else(|| AccessError::key_not_found(last, path.prefix(parents.len())))
}

/// Returns the value at `path` for in-place mutation.
pub fn get_mut<'a>(root: &'a mut Map, path: &Path) -> Result<&'a mut Value, AccessError> {
    let (last, parents) = path.split_last();
    let parent = descend_mut(root, path, parents)?;
    parent
        .get_mut(last)
        .ok_or_else(|| AccessError::key_not_found(last, path.prefix(parents.len())))
}

/// Returns the map at `path`.
pub fn get_map<'a>(root: &'a Map, path: &Path) -> Result<&'a Map, AccessError> {
    let value = get(root, path)?;
    value
        .as_map()
        .ok_or_else(|| AccessError::type_mismatch(path.to_string(), value))
}

/// Returns the list at `path` for in-place mutation.
pub fn get_list_mut<'a>(root: &'a mut Map, path: &Path) -> Result<&'a mut Vec<Value>, AccessError> {
    match get_mut(root, path)? {
        Value::List(list) => Ok(list),
        other => Err(AccessError::TypeMismatch {
            path: path.to_string(),
            expected: "list",
            actual: other.type_name(),
        }),
    }
}

/// Returns the map at `path`, inserting an empty one when the final key is
/// absent or null. Missing parents are an error.
pub fn get_or_create_map<'a>(root: &'a mut Map, path: &Path) -> Result<&'a mut Map, AccessError> {
    let (last, parents) = path.split_last();
    let parent = descend_mut(root, path, parents)?;
    let entry = parent
        .fields
        .entry(last.to_string())
        .or_insert_with(|| Value::Map(Map::new()));
    if entry.is_null() {
        *entry = Value::Map(Map::new());
    }
    match entry {
        Value::Map(map) => Ok(map),
        other => Err(AccessError::type_mismatch(path.to_string(), other)),
    }
}

fn descend_mut<'a>(
    root: &'a mut Map,
    path: &Path,
    segments: &[String],
) -> Result<&'a mut Map, AccessError> {
    let mut current = root;
    for (depth, segment) in segments.iter().enumerate() {
        let value = current
            .get_mut(segment)
            .ok_or_else(|| AccessError::key_not_found(segment, path.prefix(depth)))?;
        current = match value {
            Value::Map(map) => map,
            other => return Err(AccessError::type_mismatch(path.prefix(depth + 1), other)),
        };
    }
    Ok(current)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::from_yaml;
    use pretty_assertions::assert_eq;

    fn doc(yaml: &str) -> Map {
        match from_yaml(yaml).unwrap() {
            Value::Map(map) => map,
            other => panic!("expected map, got {:?}", other),
        }
    }

    fn path(p: &str) -> Path {
        Path::parse(p).unwrap()
    }

    const DEPLOYMENT: &str = r#"
metadata:
  name: web
spec:
  replicas: 2
  template:
    metadata:
      labels:
        app: web
    spec:
      containers:
      - name: web
        image: repo/web:1.0
"#;

    #[test]
    fn test_get_nested_value() {
        let root = doc(DEPLOYMENT);
        assert_eq!(get(&root, &path("metadata.name")).unwrap(), &Value::from("web"));
        assert_eq!(get(&root, &path("spec.replicas")).unwrap(), &Value::Int(2));
        assert!(get_map(&root, &path("spec.template.metadata.labels")).is_ok());
    }

    #[test]
    fn test_get_missing_key_reports_path_so_far() {
        let root = doc(DEPLOYMENT);
        assert_eq!(
            get(&root, &path("spec.template.metadata.annotations")),
            Err(AccessError::KeyNotFound {
                key: "annotations".into(),
                path_so_far: "spec.template.metadata".into(),
            })
        );
        assert_eq!(
            get(&root, &path("status.replicas")),
            Err(AccessError::KeyNotFound {
                key: "status".into(),
                path_so_far: "".into(),
            })
        );
    }

    #[test]
    fn test_get_through_scalar_is_type_mismatch() {
        let root = doc(DEPLOYMENT);
        assert_eq!(
            get(&root, &path("metadata.name.first")),
            Err(AccessError::TypeMismatch {
                path: "metadata.name".into(),
                expected: "map",
                actual: "string",
            })
        );
        assert!(matches!(
            get_map(&root, &path("spec.replicas")),
            Err(AccessError::TypeMismatch { actual: "int", .. })
        ));
    }

    #[test]
    fn test_get_list_mut() {
        let mut root = doc(DEPLOYMENT);
        let containers = get_list_mut(&mut root, &path("spec.template.spec.containers")).unwrap();
        assert_eq!(containers.len(), 1);
        assert!(matches!(
            get_list_mut(&mut root, &path("spec.template")),
            Err(AccessError::TypeMismatch { expected: "list", actual: "map", .. })
        ));
    }

    #[test]
    fn test_get_or_create_map_creates_leaf() {
        let mut root = doc(DEPLOYMENT);
        let annotations =
            get_or_create_map(&mut root, &path("spec.template.metadata.annotations")).unwrap();
        assert!(annotations.is_empty());
        annotations.set("k", "v");

        let metadata = get_map(&root, &path("spec.template.metadata")).unwrap();
        assert_eq!(metadata.keys().collect::<Vec<_>>(), vec!["labels", "annotations"]);
        assert_eq!(
            get(&root, &path("spec.template.metadata.annotations.k")).unwrap(),
            &Value::from("v")
        );
    }

    #[test]
    fn test_get_or_create_map_returns_existing() {
        let mut root = doc(DEPLOYMENT);
        let labels = get_or_create_map(&mut root, &path("spec.template.metadata.labels")).unwrap();
        assert_eq!(labels.get("app"), Some(&Value::from("web")));
    }

    #[test]
    fn test_get_or_create_map_replaces_null_leaf() {
        let mut root = doc("metadata:\n  annotations:\n");
        let annotations = get_or_create_map(&mut root, &path("metadata.annotations")).unwrap();
        assert!(annotations.is_empty());
    }

    #[test]
    fn test_get_or_create_map_does_not_create_parents() {
        let mut root = doc("kind: Deployment\n");
        assert_eq!(
            get_or_create_map(&mut root, &path("spec.template.metadata.annotations")),
            Err(AccessError::KeyNotFound {
                key: "spec".into(),
                path_so_far: "".into(),
            })
        );
        assert_eq!(root.len(), 1);
    }

    #[test]
    fn test_get_or_create_map_rejects_scalar_leaf() {
        let mut root = doc("metadata:\n  annotations: none\n");
        assert_eq!(
            get_or_create_map(&mut root, &path("metadata.annotations")),
            Err(AccessError::TypeMismatch {
                path: "metadata.annotations".into(),
                expected: "map",
                actual: "string",
            })
        );
    }

    #[test]
    fn test_get_mut_updates_in_place() {
        let mut root = doc(DEPLOYMENT);
        *get_mut(&mut root, &path("spec.replicas")).unwrap() = Value::Int(5);
        assert_eq!(get(&root, &path("spec.replicas")).unwrap(), &Value::Int(5));
    }
}
