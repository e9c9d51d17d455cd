//! Heightfield relief construction.
//!
//! Turns a 2D intensity grid into a closed solid: a relief top
//! surface whose height encodes sample intensity, a flat bottom at
//! z = 0, and ruled side walls connecting the two along the full
//! perimeter. Every exit is either an error before any geometry is
//! emitted or a watertight mesh.

use facet_types::{FacetMesh, Point3};
use tracing::debug;

use crate::error::{ReliefError, ReliefResult};
use crate::grid::SampleGrid;
use crate::params::ReliefParams;

/// Build a relief solid from an intensity grid.
///
/// The grid is fitted to the output area (downscaling preserves
/// aspect ratio), optionally collapsed to two tones and inverted,
/// then padded with the rim. Sample values map to extrusion heights
/// as `z(v) = thickest - v * (thickest - thinnest) / 255`, so darker
/// samples produce thicker output unless `invert` is set. X and Y
/// coordinates are centred on the origin; row 0 of the grid is the
/// +Y edge.
///
/// # Errors
///
/// Returns [`ReliefError::EmptyGrid`] when the grid (before or after
/// fitting) cannot form a surface, and [`ReliefError::InvalidParams`]
/// when the configuration is out of range. Validation happens before
/// any facet is emitted; a partial mesh is never returned.
///
/// # Example
///
/// ```
/// use relief_mesh::{build_relief, ReliefParams, SampleGrid};
///
/// let grid = SampleGrid::filled(0, 4, 4);
/// let params = ReliefParams::new()
///     .with_size_mm(30.0, 30.0)
///     .with_border_mm(0.0);
///
/// let mesh = build_relief(&grid, &params).unwrap();
/// // 2 triangles per cell on top, 2 on the bottom, plus walls
/// assert_eq!(mesh.facet_count(), 18 + 2 + 24);
/// ```
pub fn build_relief(grid: &SampleGrid, params: &ReliefParams) -> ReliefResult<FacetMesh> {
    params.validate()?;
    if grid.is_empty() {
        return Err(ReliefError::EmptyGrid {
            width: grid.width(),
            height: grid.height(),
        });
    }

    let processed = prepare_grid(grid, params)?;
    let (w, h) = (processed.width(), processed.height());
    if w < 2 || h < 2 {
        // A single row or column of samples has no surface area
        return Err(ReliefError::EmptyGrid {
            width: w,
            height: h,
        });
    }

    let heights = tone_map(&processed, params);

    let mut mesh = FacetMesh::with_capacity(2 * (w - 1) * (h - 1) + 2 + 4 * (w - 1 + h - 1));
    emit_top(&mut mesh, &heights, w, h, params);
    emit_bottom(&mut mesh, params);
    emit_walls(&mut mesh, &heights, w, h, params);

    Ok(mesh)
}

/// Fit, tone-collapse, invert, and pad the grid.
///
/// Padding happens after inversion so the rim keeps its constant
/// value whatever the invert flag says.
fn prepare_grid(grid: &SampleGrid, params: &ReliefParams) -> ReliefResult<SampleGrid> {
    let border_px = px(params.border_mm * params.samples_per_mm);
    let plate_w = px(params.width_mm * params.samples_per_mm);
    let plate_h = px(params.height_mm * params.samples_per_mm);

    let max_w = plate_w.saturating_sub(2 * border_px);
    let max_h = plate_h.saturating_sub(2 * border_px);
    if max_w == 0 || max_h == 0 {
        return Err(ReliefError::invalid_params(format!(
            "border of {} mm leaves no image area on a {}x{} mm plate",
            params.border_mm, params.width_mm, params.height_mm
        )));
    }

    let mut grid = grid.clone();
    if grid.width() > max_w || grid.height() > max_h {
        // Downscale by the binding axis, preserving aspect ratio
        #[allow(clippy::cast_precision_loss)]
        let x_ratio = max_w as f64 / grid.width() as f64;
        #[allow(clippy::cast_precision_loss)]
        let y_ratio = max_h as f64 / grid.height() as f64;
        let (new_w, new_h) = if x_ratio < y_ratio {
            (max_w, scaled(grid.height(), x_ratio))
        } else {
            (scaled(grid.width(), y_ratio), max_h)
        };
        debug!(
            from_w = grid.width(),
            from_h = grid.height(),
            new_w,
            new_h,
            "downscaling grid to fit output area"
        );
        grid = grid.resized(new_w, new_h);
    }

    if params.two_tone {
        let threshold = params.threshold_value();
        grid = grid.map(|v| if v >= threshold { 255 } else { 0 });
    }

    if params.invert {
        grid = grid.map(|v| 255 - v);
    }

    if border_px > 0 {
        debug!(border_px, "padding grid with rim");
        grid = grid.padded(border_px, RIM_SAMPLE);
    }

    Ok(grid)
}

/// Rim samples stay at the darkest value, which tone-maps to the
/// full `thickest` depth. Applied after inversion, so the rim height
/// never flips.
const RIM_SAMPLE: u8 = 0;

/// Map every sample to an extrusion height in mm, row-major.
fn tone_map(grid: &SampleGrid, params: &ReliefParams) -> Vec<f32> {
    let span = params.thickest_mm - params.thinnest_mm;
    grid.samples()
        .iter()
        .map(|&v| params.thickest_mm - f32::from(v) * span / 255.0)
        .collect()
}

/// Top relief surface: two CCW-from-above triangles per sample cell.
fn emit_top(mesh: &mut FacetMesh, heights: &[f32], w: usize, h: usize, params: &ReliefParams) {
    for j in 0..h - 1 {
        for i in 0..w - 1 {
            let p00 = surface_point(i, j, heights, w, h, params);
            let p01 = surface_point(i, j + 1, heights, w, h, params);
            let p11 = surface_point(i + 1, j + 1, heights, w, h, params);
            let p10 = surface_point(i + 1, j, heights, w, h, params);
            mesh.push_quad([p00, p01, p11, p10]);
        }
    }
}

/// Bottom face: one full-footprint quad at z = 0, wound so the
/// normal points down.
fn emit_bottom(mesh: &mut FacetMesh, params: &ReliefParams) {
    let (hw, hh) = (params.width_mm / 2.0, params.height_mm / 2.0);
    mesh.push_quad([
        Point3::new(-hw, -hh, 0.0),
        Point3::new(-hw, hh, 0.0),
        Point3::new(hw, hh, 0.0),
        Point3::new(hw, -hh, 0.0),
    ]);
}

/// Side walls: one ruled quad per perimeter segment, connecting each
/// boundary top vertex to its projection at z = 0.
///
/// The boundary is walked counter-clockwise viewed from above, so a
/// segment `a -> b` emits the outward-wound quad
/// `[a@0, b@0, b@top, a@top]`.
fn emit_walls(mesh: &mut FacetMesh, heights: &[f32], w: usize, h: usize, params: &ReliefParams) {
    let mut rim: Vec<Point3<f32>> = Vec::with_capacity(2 * (w - 1) + 2 * (h - 1));

    // South edge, west to east
    for i in 0..w - 1 {
        rim.push(surface_point(i, h - 1, heights, w, h, params));
    }
    // East edge, south to north
    for j in (1..h).rev() {
        rim.push(surface_point(w - 1, j, heights, w, h, params));
    }
    // North edge, east to west
    for i in (1..w).rev() {
        rim.push(surface_point(i, 0, heights, w, h, params));
    }
    // West edge, north to south
    for j in 0..h - 1 {
        rim.push(surface_point(0, j, heights, w, h, params));
    }

    for k in 0..rim.len() {
        let a = rim[k];
        let b = rim[(k + 1) % rim.len()];
        mesh.push_quad([
            Point3::new(a.x, a.y, 0.0),
            Point3::new(b.x, b.y, 0.0),
            b,
            a,
        ]);
    }
}

/// Physical position of sample `(i, j)`, centred on the origin with
/// row 0 at the +Y edge.
fn surface_point(
    i: usize,
    j: usize,
    heights: &[f32],
    w: usize,
    h: usize,
    params: &ReliefParams,
) -> Point3<f32> {
    #[allow(clippy::cast_precision_loss)]
    // Grid dimensions are far below f32's integer range
    let (i_f, j_f) = (i as f32, j as f32);
    #[allow(clippy::cast_precision_loss)]
    let (w_f, h_f) = ((w - 1) as f32, (h - 1) as f32);

    let x = -params.width_mm / 2.0 + i_f * params.width_mm / w_f;
    let y = params.height_mm / 2.0 - j_f * params.height_mm / h_f;
    Point3::new(x, y, heights[j * w + i])
}

/// Round a physical extent to a whole sample count.
fn px(value: f32) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    // Negative values are rejected by validation before this runs
    {
        value.round() as usize
    }
}

/// Scale a dimension by a ratio, keeping at least one sample.
fn scaled(dim: usize, ratio: f64) -> usize {
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    #[allow(clippy::cast_precision_loss)]
    {
        ((dim as f64 * ratio) as usize).max(1)
    }
}
