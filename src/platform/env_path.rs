//! Windows `Path` value manipulation. Pure string logic, built everywhere.

/// Segment separator of the Windows `Path` value
pub const PATH_SEPARATOR: char = ';';

/// Append `segment` to `current`.
///
/// A separator is inserted before the new segment unless `current` already
/// ends with one; in that case the separator goes after the new segment
/// instead, so the result keeps a trailing separator. Empty segments inside
/// `current` are left alone.
pub fn join_path_value(current: &str, segment: &str) -> String {
    if current.is_empty() {
        return segment.to_string();
    }

    let mut joined = String::with_capacity(current.len() + segment.len() + 1);
    joined.push_str(current);
    if current.ends_with(PATH_SEPARATOR) {
        joined.push_str(segment);
        joined.push(PATH_SEPARATOR);
    } else {
        joined.push(PATH_SEPARATOR);
        joined.push_str(segment);
    }
    joined
}
