use indexmap::IndexMap;
use indexmap::map::Entry;
use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::core::delaunay::{Triangulation, distance_sq};
use crate::core::{Bounds, ScaledPoint};

/// Coordinates closer than this (in pixels) share one site.
const SITE_RESOLUTION_PX: f64 = 1e-6;

/// Hover lookup over one series' rendered points.
///
/// Built once per render from the scaled coordinates; every point owns the
/// Voronoi cell of its pixel position, clipped to `bounds`. Points that land
/// on the same pixel site collapse onto the first one supplied, so lookups
/// resolve duplicates consistently.
#[derive(Debug, Clone)]
pub struct SpatialIndex<T> {
    points: Vec<ScaledPoint<T>>,
    bounds: Bounds,
    triangulation: Triangulation,
    site_point: Vec<usize>,
    point_site: Vec<Option<usize>>,
    sites_by_x: Vec<usize>,
}

/// One clipped Voronoi cell, in plot-area pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct VoronoiCell {
    pub point_index: usize,
    pub polygon: Vec<(f64, f64)>,
}

impl<T> SpatialIndex<T> {
    #[must_use]
    pub fn build(points: Vec<ScaledPoint<T>>, bounds: Bounds) -> Self {
        let mut site_keys: IndexMap<(i64, i64), usize> = IndexMap::with_capacity(points.len());
        let mut site_point = Vec::with_capacity(points.len());
        let mut point_site = Vec::with_capacity(points.len());
        let mut sites = Vec::with_capacity(points.len());
        let mut skipped = 0_usize;

        for (index, point) in points.iter().enumerate() {
            if !point.x.is_finite() || !point.y.is_finite() {
                skipped += 1;
                point_site.push(None);
                continue;
            }
            match site_keys.entry(site_key(point.x, point.y)) {
                Entry::Occupied(entry) => point_site.push(Some(*entry.get())),
                Entry::Vacant(entry) => {
                    let site = sites.len();
                    entry.insert(site);
                    sites.push((point.x, point.y));
                    site_point.push(index);
                    point_site.push(Some(site));
                }
            }
        }

        if skipped > 0 {
            warn!(skipped, "spatial index skipped points with non-finite coordinates");
        }

        let triangulation = Triangulation::new(&sites, bounds);
        let mut sites_by_x: Vec<usize> = (0..sites.len()).collect();
        sites_by_x.sort_by(|&a, &b| sites[a].0.total_cmp(&sites[b].0));

        debug!(
            points = points.len(),
            sites = sites.len(),
            triangles = triangulation.triangle_count(),
            "built spatial index"
        );

        Self {
            points,
            bounds,
            triangulation,
            site_point,
            point_site,
            sites_by_x,
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    #[must_use]
    pub fn points(&self) -> &[ScaledPoint<T>] {
        &self.points
    }

    /// Number of distinct pixel sites after collapsing duplicates.
    #[must_use]
    pub fn site_count(&self) -> usize {
        self.site_point.len()
    }

    /// Datum whose Voronoi cell contains `(px, py)`.
    #[must_use]
    pub fn nearest(&self, px: f64, py: f64) -> Option<&T> {
        self.nearest_point(px, py).map(|point| &point.data)
    }

    #[must_use]
    pub fn nearest_point(&self, px: f64, py: f64) -> Option<&ScaledPoint<T>> {
        self.nearest_index(px, py).map(|index| &self.points[index])
    }

    /// Index into [`SpatialIndex::points`] of the point nearest to `(px, py)`.
    #[must_use]
    pub fn nearest_index(&self, px: f64, py: f64) -> Option<usize> {
        if !px.is_finite() || !py.is_finite() {
            return None;
        }
        let start = self.start_site(px)?;
        let mut vertex = self.triangulation.walk_to_nearest(start, px, py);
        if !self.triangulation.is_site(vertex) {
            // Far outside the plot a super vertex can win the walk.
            vertex = self.nearest_site_linear(px, py)?;
        }
        Some(self.site_point[vertex])
    }

    /// Voronoi cell of `point_index` clipped to the index bounds.
    ///
    /// Returns `None` for unknown or skipped points and for cells that do not
    /// intersect the bounds.
    #[must_use]
    pub fn cell_polygon(&self, point_index: usize) -> Option<Vec<(f64, f64)>> {
        let site = (*self.point_site.get(point_index)?)?;
        let origin = self.triangulation.position(site);

        let mut polygon = vec![
            (0.0, 0.0),
            (self.bounds.width, 0.0),
            (self.bounds.width, self.bounds.height),
            (0.0, self.bounds.height),
        ];
        for neighbor in self.triangulation.site_neighbors(site) {
            polygon = clip_to_closer_half(&polygon, origin, self.triangulation.position(neighbor));
            if polygon.len() < 3 {
                return None;
            }
        }
        Some(polygon)
    }

    /// Cells for every distinct site, keyed by the first point at that site.
    #[must_use]
    pub fn cells(&self) -> Vec<VoronoiCell> {
        self.site_point
            .iter()
            .filter_map(|&point_index| {
                self.cell_polygon(point_index)
                    .map(|polygon| VoronoiCell {
                        point_index,
                        polygon,
                    })
            })
            .collect()
    }

    fn start_site(&self, px: f64) -> Option<usize> {
        if self.sites_by_x.is_empty() {
            return None;
        }
        let slot = self
            .sites_by_x
            .partition_point(|&site| self.triangulation.position(site).0 < px);
        let right = self.sites_by_x.get(slot).copied();
        let left = slot
            .checked_sub(1)
            .and_then(|slot| self.sites_by_x.get(slot).copied());
        match (left, right) {
            (Some(left), Some(right)) => {
                let left_gap = px - self.triangulation.position(left).0;
                let right_gap = self.triangulation.position(right).0 - px;
                Some(if left_gap <= right_gap { left } else { right })
            }
            (Some(site), None) | (None, Some(site)) => Some(site),
            (None, None) => None,
        }
    }

    fn nearest_site_linear(&self, px: f64, py: f64) -> Option<usize> {
        (0..self.triangulation.site_count()).min_by_key(|&site| {
            OrderedFloat(distance_sq(self.triangulation.position(site), (px, py)))
        })
    }
}

fn site_key(x: f64, y: f64) -> (i64, i64) {
    (
        (x / SITE_RESOLUTION_PX).round() as i64,
        (y / SITE_RESOLUTION_PX).round() as i64,
    )
}

/// Sutherland-Hodgman clip keeping the half-plane closer to `origin` than `other`.
fn clip_to_closer_half(
    polygon: &[(f64, f64)],
    origin: (f64, f64),
    other: (f64, f64),
) -> Vec<(f64, f64)> {
    let normal = (other.0 - origin.0, other.1 - origin.1);
    let offset = (distance_sq(other, (0.0, 0.0)) - distance_sq(origin, (0.0, 0.0))) / 2.0;
    // Signed distance, <= 0 on the kept side.
    let side = |point: (f64, f64)| normal.0 * point.0 + normal.1 * point.1 - offset;

    let mut clipped = Vec::with_capacity(polygon.len() + 1);
    for (index, &current) in polygon.iter().enumerate() {
        let next = polygon[(index + 1) % polygon.len()];
        let current_side = side(current);
        let next_side = side(next);
        if current_side <= 0.0 {
            clipped.push(current);
        }
        if (current_side <= 0.0) != (next_side <= 0.0) {
            let t = current_side / (current_side - next_side);
            clipped.push((
                current.0 + t * (next.0 - current.0),
                current.1 + t * (next.1 - current.1),
            ));
        }
    }
    clipped
}

#[cfg(test)]
mod tests {
    use super::clip_to_closer_half;

    #[test]
    fn clip_keeps_half_closer_to_origin() {
        let square = [(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)];
        let clipped = clip_to_closer_half(&square, (2.0, 5.0), (8.0, 5.0));
        assert_eq!(clipped.len(), 4);
        assert!(clipped.iter().all(|&(x, _)| x <= 5.0 + 1e-12));
        assert!(clipped.iter().any(|&(x, y)| (x - 5.0).abs() <= 1e-12 && y == 0.0));
    }
}
