//! H3 cell operations used by the geocoder.
//!
//! All of the spatial math is delegated to `h3o`; this module only adapts it to
//! the string cell ids and integer resolutions the lookup tables are keyed by.

use h3o::{CellIndex, LatLng, Resolution};

/// Parse a cell id, returning `None` if it is not a valid H3 cell.
pub fn parse_cell(cell_id: &str) -> Option<CellIndex> {
    cell_id.trim().parse::<CellIndex>().ok()
}

pub fn is_valid_cell(cell_id: &str) -> bool {
    parse_cell(cell_id).is_some()
}

/// Native resolution of a cell.
pub fn cell_resolution(cell: CellIndex) -> u8 {
    u8::from(cell.resolution())
}

/// Ancestor of `cell` at `resolution`, or `None` when `resolution` is not
/// coarser than (or equal to) the cell's own resolution.
pub fn cell_to_ancestor(cell: CellIndex, resolution: u8) -> Option<CellIndex> {
    let resolution = Resolution::try_from(resolution).ok()?;
    cell.parent(resolution)
}

/// Cell containing a coordinate (degrees) at `resolution`.
pub fn coordinate_to_cell(lat: f64, lon: f64, resolution: u8) -> Option<CellIndex> {
    let resolution = Resolution::try_from(resolution).ok()?;
    let point = LatLng::new(lat, lon).ok()?;
    Some(point.to_cell(resolution))
}
