//! Shape rasterization onto a bounded grid.
//!
//! Converts continuous shapes (lines, circles, disks, rectangles) into
//! discrete grid-cell coordinate lists, clipped to the grid bounds.
//! Disk shapes recur constantly with the same few radii, so their
//! offset lists are memoized process-wide in [`DiskOffsetCache`];
//! translating a cached disk by a structure position is O(cells)
//! instead of a fresh rasterization.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, OnceLock, RwLock};

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::geometry::{GridPoint, PlanePoint};

/// Cardinal 4-neighborhood offsets used by flood-fill callers.
pub const CARDINAL_OFFSETS: [GridPoint; 4] = [
    GridPoint::new(-1, 0),
    GridPoint::new(0, -1),
    GridPoint::new(0, 1),
    GridPoint::new(1, 0),
];

/// Validated bounding grid shape for rasterization.
///
/// All clipped rasterizers evaluate against `[0, width) x [0, height)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridShape {
    /// Grid width in cells.
    pub width: usize,
    /// Grid height in cells.
    pub height: usize,
}

impl GridShape {
    /// Create a grid shape from known dimensions.
    #[must_use]
    pub const fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    /// Build a grid shape from a dimension slice.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidGridShape`] unless the slice has
    /// exactly two entries.
    pub fn from_dims(dims: &[usize]) -> Result<Self> {
        match dims {
            [width, height] => Ok(Self::new(*width, *height)),
            other => Err(CoreError::InvalidGridShape(other.len())),
        }
    }

    /// Check if a cell lies within the grid bounds.
    #[must_use]
    pub fn contains(self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }
}

/// All cells on the discrete line between two endpoints, inclusive.
///
/// Standard Bresenham walk; cells are ordered from `(x0, y0)` to
/// `(x1, y1)`. No clipping is performed, the caller owns the
/// coordinate space.
#[must_use]
pub fn line(x0: i32, y0: i32, x1: i32, y1: i32) -> Vec<GridPoint> {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;
    let mut x = x0;
    let mut y = y0;
    let mut cells = Vec::with_capacity((dx.max(-dy) + 1) as usize);

    loop {
        cells.push(GridPoint::new(x, y));
        if x == x1 && y == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
    cells
}

/// Cells forming a circle's outline only, clipped to `dims`.
///
/// Midpoint circle with eightfold symmetry; duplicate octant-boundary
/// cells are collapsed.
///
/// # Errors
///
/// Returns [`CoreError::InvalidGridShape`] if `dims` is not
/// two-dimensional.
pub fn circle_perimeter(x0: i32, y0: i32, r: i32, dims: &[usize]) -> Result<Vec<GridPoint>> {
    let shape = GridShape::from_dims(dims)?;
    let mut cells = BTreeSet::new();
    let mut x = r;
    let mut y = 0;
    let mut decision = 1 - r;

    while y <= x {
        for (dx, dy) in [
            (x, y),
            (y, x),
            (-y, x),
            (-x, y),
            (-x, -y),
            (-y, -x),
            (y, -x),
            (x, -y),
        ] {
            cells.insert(GridPoint::new(x0 + dx, y0 + dy));
        }
        y += 1;
        if decision < 0 {
            decision += 2 * y + 1;
        } else {
            x -= 1;
            decision += 2 * (y - x) + 1;
        }
    }

    Ok(cells
        .into_iter()
        .filter(|c| shape.contains(c.x, c.y))
        .collect())
}

/// All cells inside and on the boundary of a disk, clipped to `dims`.
///
/// # Errors
///
/// Returns [`CoreError::InvalidGridShape`] if `dims` is not
/// two-dimensional.
pub fn disk(x0: i32, y0: i32, r: i32, dims: &[usize]) -> Result<Vec<GridPoint>> {
    let shape = GridShape::from_dims(dims)?;
    let r_sq = i64::from(r) * i64::from(r);
    let mut cells = Vec::new();
    for x in (x0 - r)..=(x0 + r) {
        for y in (y0 - r)..=(y0 + r) {
            let dx = i64::from(x - x0);
            let dy = i64::from(y - y0);
            if dx * dx + dy * dy <= r_sq && shape.contains(x, y) {
                cells.push(GridPoint::new(x, y));
            }
        }
    }
    Ok(cells)
}

/// Flattened parallel x/y coordinate arrays for an axis-aligned
/// rectangle spanning `[start, start + extent)`, clipped to `dims`.
///
/// Cells are emitted row-major (all y for the first x, then the next x),
/// matching a flattened coordinate mesh.
///
/// # Errors
///
/// Returns [`CoreError::InvalidGridShape`] if `dims` is not
/// two-dimensional.
pub fn rectangle(
    start: GridPoint,
    extent: GridPoint,
    dims: &[usize],
) -> Result<(Vec<i32>, Vec<i32>)> {
    let shape = GridShape::from_dims(dims)?;
    let mut xs = Vec::new();
    let mut ys = Vec::new();
    for x in start.x..(start.x + extent.x) {
        for y in start.y..(start.y + extent.y) {
            if shape.contains(x, y) {
                xs.push(x);
                ys.push(y);
            }
        }
    }
    Ok((xs, ys))
}

/// Memoized cache of origin-centered disk offsets, keyed by exact radius.
///
/// Offsets for a given radius are computed once and shared for the
/// lifetime of the process; entries are immutable once inserted and
/// never evicted. Races to populate the same radius are benign since
/// the computed offsets are deterministic.
#[derive(Debug, Default)]
pub struct DiskOffsetCache {
    offsets: RwLock<HashMap<u32, Arc<[GridPoint]>>>,
}

impl DiskOffsetCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the cached offsets for `radius`, computing them on first use.
    pub fn get(&self, radius: f32) -> Arc<[GridPoint]> {
        let key = radius.to_bits();
        if let Some(hit) = self
            .offsets
            .read()
            .expect("disk offset cache lock poisoned")
            .get(&key)
        {
            return Arc::clone(hit);
        }

        let computed: Arc<[GridPoint]> = compute_disk_offsets(radius).into();
        let mut map = self
            .offsets
            .write()
            .expect("disk offset cache lock poisoned");
        // Insert-if-absent: the first writer wins, later computations
        // of the same radius are value-identical and dropped.
        Arc::clone(map.entry(key).or_insert(computed))
    }

    /// Number of distinct radii cached so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.offsets
            .read()
            .expect("disk offset cache lock poisoned")
            .len()
    }

    /// Whether the cache is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Rasterize the offsets of a disk of the given radius, centered so the
/// center cell sits at the rounded radius position.
fn compute_disk_offsets(radius: f32) -> Vec<GridPoint> {
    let r = (radius + 0.5).floor() as i32;
    let n = 2 * r + 1;
    let mut offsets = Vec::new();
    for i in 0..n {
        let dx = i as f32 - radius;
        for j in 0..n {
            let dy = j as f32 - radius;
            if dx * dx + dy * dy <= radius * radius {
                offsets.push(GridPoint::new(i - r, j - r));
            }
        }
    }
    tracing::debug!(radius, cells = offsets.len(), "computed disk offsets");
    offsets
}

/// Process-wide disk-offset cache.
static DISK_OFFSETS: OnceLock<DiskOffsetCache> = OnceLock::new();

/// Cached, origin-centered integer offsets describing a disk of the
/// given radius.
///
/// This is the single memoization point of the rasterizer: repeated
/// queries for the same radius never recompute geometry.
pub fn disk_offsets(radius: f32) -> Arc<[GridPoint]> {
    DISK_OFFSETS.get_or_init(DiskOffsetCache::new).get(radius)
}

/// Grid cells occupied by a structure with the given position and
/// radius: the cached disk offsets translated by the rounded position.
#[must_use]
pub fn structure_cells(position: PlanePoint, radius: f32) -> Vec<GridPoint> {
    let origin = position.rounded();
    disk_offsets(radius)
        .iter()
        .map(|offset| origin + *offset)
        .collect()
}
