//! Console text formatting helpers.

/// A run of `count` spaces.
pub fn indent(count: usize) -> String {
    " ".repeat(count)
}
