//! Normalisation of the path keys carried by change records.

use super::error::{PathError, PathResult};

const MAX_PATH_LENGTH: usize = 4096;
const MAX_COMPONENT_LENGTH: usize = 255;

/// Normalise `path` into the canonical key form used by materialized states.
///
/// Keys are absolute, `/`-separated and carry no empty, `.` or `..`
/// components. Duplicate and trailing slashes are collapsed.
pub fn normalize_path(path: &str) -> PathResult<String> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    if path.contains('\0') {
        return Err(PathError::ContainsNul);
    }
    if path.len() > MAX_PATH_LENGTH {
        return Err(PathError::PathTooLong(path.len()));
    }
    if !path.starts_with('/') {
        return Err(PathError::NotAbsolute(path.to_string()));
    }

    let mut components = Vec::new();
    for component in path.split('/').filter(|c| !c.is_empty()) {
        if component == "." || component == ".." {
            return Err(PathError::RelativeComponent(path.to_string()));
        }
        if component.len() > MAX_COMPONENT_LENGTH {
            return Err(PathError::ComponentTooLong(component.len()));
        }
        components.push(component);
    }

    Ok(format!("/{}", components.join("/")))
}
