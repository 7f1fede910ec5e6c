/// The number of tiles in a `width` x `height` grid.
///
/// Returns `None` for empty grids and grids too large to be addressed.
pub(crate) fn grid_len(width: u32, height: u32) -> Option<usize> {
    if width == 0 || height == 0 {
        return None;
    }
    (width as usize).checked_mul(height as usize)
}
