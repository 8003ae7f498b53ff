//! Path-parsing helpers shared by the arena walk and the namespace facade.

/// Returns true for paths that resolve from the root rather than the
/// current directory.
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/')
}

/// Ordered, non-empty segments of a `/`-separated path.
///
/// Repeated separators collapse, so `a//b` walks the same segments as
/// `a/b` and `/` has none at all.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|segment| !segment.is_empty())
}

/// A creatable child name: non-empty and free of separators.
pub fn is_valid_name(name: &str) -> bool {
    !name.is_empty() && !name.contains('/')
}
