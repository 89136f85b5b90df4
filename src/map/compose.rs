//! OR-composition of per-source boolean maps into the derived map.

use crate::map::StatusMap;

/// OR-reduce the given maps into a fresh map of `len` channels.
///
/// Logical OR is commutative and idempotent, so the result is independent
/// of source ordering and of repeated composition with unchanged inputs.
/// With no maps selected the result is all-`false`: no channel is marked
/// excluded. Every map must cover `len` channels.
pub fn compose<'a, I>(maps: I, len: usize) -> StatusMap
where
    I: IntoIterator<Item = &'a StatusMap>,
{
    let mut out = StatusMap::new(len);
    for map in maps {
        out.or_assign(map);
    }
    out
}
