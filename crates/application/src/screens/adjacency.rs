//! Adjacent-element lookup
//!
//! Used when removing the currently selected favorite: the neighbor takes
//! over the selection.

/// Find the element adjacent to `target` in `items`
///
/// Prefers the neighbor on the `prefer_before` side and falls back to the
/// other side. Returns `None` when the target is absent or has no neighbor.
pub fn find_adjacent<'a, T: PartialEq>(
    items: &'a [T],
    target: &T,
    prefer_before: bool,
) -> Option<&'a T> {
    let index = items.iter().position(|item| item == target)?;
    let before = index.checked_sub(1).and_then(|i| items.get(i));
    let after = items.get(index + 1);

    if prefer_before {
        before.or(after)
    } else {
        after.or(before)
    }
}
