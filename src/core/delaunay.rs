//! Incremental Bowyer-Watson Delaunay triangulation over pixel sites.
//!
//! The triangulation is seeded with a super triangle far outside the sites
//! and the plot bounds. Its three vertices stay in the vertex graph: inside
//! the bounds they are never the closest vertex, and keeping them means the
//! graph is the full Delaunay graph of `sites + super vertices`, which is
//! what the greedy nearest-site walk requires.
//!
//! Each insertion walks from the newest triangle to the one containing the
//! site, then flood-fills the cavity through triangle adjacency, so the cost
//! per site is proportional to the walk and the cavity.

use indexmap::IndexMap;
use smallvec::SmallVec;

use crate::core::Bounds;

/// Distance factor between the site extent and the super triangle vertices.
const SUPER_TRIANGLE_SCALE: f64 = 10.0;

type Neighbors = SmallVec<[usize; 8]>;

/// Counter-clockwise triangle. Edge `i` runs from `vertices[i]` to
/// `vertices[(i + 1) % 3]` and `adjacent[i]` is the triangle across it.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Triangle {
    vertices: [usize; 3],
    adjacent: [Option<usize>; 3],
    alive: bool,
}

impl Triangle {
    fn edges(self) -> [(usize, usize); 3] {
        let [a, b, c] = self.vertices;
        [(a, b), (b, c), (c, a)]
    }
}

/// Delaunay graph of distinct sites plus three super vertices.
///
/// Vertex ids `0..site_count()` are the sites in input order; the super
/// vertices follow.
#[derive(Debug, Clone)]
pub struct Triangulation {
    vertices: Vec<(f64, f64)>,
    site_count: usize,
    neighbors: Vec<Neighbors>,
    triangle_count: usize,
}

impl Triangulation {
    /// Triangulates `sites`, which must be finite and pairwise distinct.
    #[must_use]
    pub fn new(sites: &[(f64, f64)], bounds: Bounds) -> Self {
        let site_count = sites.len();
        let mut vertices = Vec::with_capacity(site_count + 3);
        vertices.extend_from_slice(sites);
        vertices.extend(super_triangle(sites, bounds));

        // Inserting left to right keeps each walk short.
        let mut order: Vec<usize> = (0..site_count).collect();
        order.sort_by(|&a, &b| {
            sites[a]
                .0
                .total_cmp(&sites[b].0)
                .then(sites[a].1.total_cmp(&sites[b].1))
        });

        let mut mesh = Mesh::new(&vertices, [site_count, site_count + 1, site_count + 2]);
        for site in order {
            mesh.insert(site);
        }

        let mut neighbors = vec![Neighbors::new(); vertices.len()];
        let mut triangle_count = 0;
        for triangle in mesh.alive() {
            triangle_count += 1;
            for (from, to) in triangle.edges() {
                link(&mut neighbors, from, to);
            }
        }

        Self {
            vertices,
            site_count,
            neighbors,
            triangle_count,
        }
    }

    #[must_use]
    pub fn site_count(&self) -> usize {
        self.site_count
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.triangle_count
    }

    #[must_use]
    pub fn is_site(&self, vertex: usize) -> bool {
        vertex < self.site_count
    }

    #[must_use]
    pub fn position(&self, vertex: usize) -> (f64, f64) {
        self.vertices[vertex]
    }

    /// Delaunay neighbors of `vertex`, super vertices included.
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        &self.neighbors[vertex]
    }

    /// Neighbors of `site` that are themselves sites.
    pub fn site_neighbors(&self, site: usize) -> impl Iterator<Item = usize> + '_ {
        self.neighbors[site]
            .iter()
            .copied()
            .filter(|&vertex| self.is_site(vertex))
    }

    /// Walks the Delaunay graph from `start` towards `(x, y)`.
    ///
    /// Each step moves to a strictly closer neighbor, so the walk ends at a
    /// vertex whose Voronoi cell contains the query. The result may be a super
    /// vertex when the query lies far outside the triangulated area.
    #[must_use]
    pub fn walk_to_nearest(&self, start: usize, x: f64, y: f64) -> usize {
        let mut current = start;
        let mut best = distance_sq(self.vertices[current], (x, y));
        loop {
            let mut moved = false;
            for &candidate in &self.neighbors[current] {
                let distance = distance_sq(self.vertices[candidate], (x, y));
                if distance < best {
                    best = distance;
                    current = candidate;
                    moved = true;
                }
            }
            if !moved {
                return current;
            }
        }
    }
}

/// Triangle store with adjacency, used while sites are inserted.
#[derive(Debug)]
struct Mesh<'a> {
    vertices: &'a [(f64, f64)],
    triangles: Vec<Triangle>,
    /// Insertion stamp of the last cavity each triangle joined.
    cavity_stamp: Vec<usize>,
    stamp: usize,
    newest: usize,
}

impl<'a> Mesh<'a> {
    fn new(vertices: &'a [(f64, f64)], super_vertices: [usize; 3]) -> Self {
        Self {
            vertices,
            triangles: vec![Triangle {
                vertices: super_vertices,
                adjacent: [None; 3],
                alive: true,
            }],
            cavity_stamp: vec![0],
            stamp: 0,
            newest: 0,
        }
    }

    fn alive(&self) -> impl Iterator<Item = &Triangle> + '_ {
        self.triangles.iter().filter(|triangle| triangle.alive)
    }

    fn insert(&mut self, site: usize) {
        let point = self.vertices[site];
        let seed = self.locate(point);
        self.stamp += 1;
        let cavity = self.carve_cavity(seed, point);
        let boundary = self.cavity_boundary(&cavity);
        self.fill_cavity(site, &cavity, &boundary);
    }

    /// Triangle containing `point`, found by walking across the edges that
    /// separate the current triangle from it.
    fn locate(&self, point: (f64, f64)) -> usize {
        let mut current = self.newest;
        for _ in 0..self.triangles.len() {
            let triangle = self.triangles[current];
            let next = triangle
                .edges()
                .into_iter()
                .zip(triangle.adjacent)
                .find_map(|((from, to), adjacent)| {
                    (orientation(self.vertices[from], self.vertices[to], point) < 0.0)
                        .then_some(adjacent)
                        .flatten()
                });
            match next {
                Some(next) => current = next,
                None => return current,
            }
        }

        // Rounding can make the walk cycle; any triangle whose circumcircle
        // holds the point seeds a valid cavity.
        self.triangles
            .iter()
            .position(|triangle| triangle.alive && self.circumcircle_contains(*triangle, point))
            .unwrap_or(self.newest)
    }

    /// Triangles whose circumcircle holds `point`, connected to `seed`.
    fn carve_cavity(&mut self, seed: usize, point: (f64, f64)) -> Vec<usize> {
        let mut cavity = vec![seed];
        self.cavity_stamp[seed] = self.stamp;

        let mut cursor = 0;
        while let Some(&current) = cavity.get(cursor) {
            cursor += 1;
            for neighbor in self.triangles[current].adjacent.into_iter().flatten() {
                if self.cavity_stamp[neighbor] == self.stamp {
                    continue;
                }
                if self.circumcircle_contains(self.triangles[neighbor], point) {
                    self.cavity_stamp[neighbor] = self.stamp;
                    cavity.push(neighbor);
                }
            }
        }
        cavity
    }

    /// Cavity outline as `(from, to, outer triangle)`, counter-clockwise.
    fn cavity_boundary(&self, cavity: &[usize]) -> Vec<(usize, usize, Option<usize>)> {
        let mut boundary = Vec::with_capacity(cavity.len() + 2);
        for &index in cavity {
            let triangle = self.triangles[index];
            for ((from, to), adjacent) in triangle.edges().into_iter().zip(triangle.adjacent) {
                let inside = adjacent.is_some_and(|other| self.cavity_stamp[other] == self.stamp);
                if !inside {
                    boundary.push((from, to, adjacent));
                }
            }
        }
        boundary
    }

    /// Replaces the cavity with a fan of triangles around `site`.
    fn fill_cavity(
        &mut self,
        site: usize,
        cavity: &[usize],
        boundary: &[(usize, usize, Option<usize>)],
    ) {
        let mut fan_by_start: IndexMap<usize, usize> = IndexMap::with_capacity(boundary.len());

        for (slot, &(from, to, outer)) in boundary.iter().enumerate() {
            let triangle = Triangle {
                vertices: [from, to, site],
                adjacent: [outer, None, None],
                alive: true,
            };
            let index = match cavity.get(slot) {
                Some(&reused) => {
                    self.triangles[reused] = triangle;
                    reused
                }
                None => {
                    self.triangles.push(triangle);
                    self.cavity_stamp.push(0);
                    self.triangles.len() - 1
                }
            };
            if let Some(outer) = outer {
                self.relink(outer, (to, from), index);
            }
            fan_by_start.insert(from, index);
        }

        for &unused in cavity.iter().skip(boundary.len()) {
            self.triangles[unused].alive = false;
            self.triangles[unused].adjacent = [None; 3];
        }

        // Fan triangle `from -> to -> site` shares `to -> site` with the fan
        // triangle starting at `to`.
        for &index in fan_by_start.values() {
            let to = self.triangles[index].vertices[1];
            if let Some(&next) = fan_by_start.get(&to) {
                self.triangles[index].adjacent[1] = Some(next);
                self.triangles[next].adjacent[2] = Some(index);
            }
        }

        if let Some(&newest) = fan_by_start.values().last() {
            self.newest = newest;
        }
    }

    fn relink(&mut self, triangle: usize, edge: (usize, usize), across: usize) {
        let target = &mut self.triangles[triangle];
        if let Some(slot) = target.edges().iter().position(|&candidate| candidate == edge) {
            target.adjacent[slot] = Some(across);
        }
    }

    fn circumcircle_contains(&self, triangle: Triangle, point: (f64, f64)) -> bool {
        let [a, b, c] = triangle.vertices;
        in_circumcircle(self.vertices[a], self.vertices[b], self.vertices[c], point)
    }
}

fn link(neighbors: &mut [Neighbors], from: usize, to: usize) {
    if !neighbors[from].contains(&to) {
        neighbors[from].push(to);
    }
    if !neighbors[to].contains(&from) {
        neighbors[to].push(from);
    }
}

/// Counter-clockwise super triangle enclosing `sites` and the bounds rectangle.
fn super_triangle(sites: &[(f64, f64)], bounds: Bounds) -> [(f64, f64); 3] {
    let mut min_x = 0.0_f64.min(bounds.width);
    let mut max_x = 0.0_f64.max(bounds.width);
    let mut min_y = 0.0_f64.min(bounds.height);
    let mut max_y = 0.0_f64.max(bounds.height);
    for &(x, y) in sites {
        min_x = min_x.min(x);
        max_x = max_x.max(x);
        min_y = min_y.min(y);
        max_y = max_y.max(y);
    }

    let span = (max_x - min_x).max(max_y - min_y).max(1.0);
    let center_x = (min_x + max_x) / 2.0;
    let center_y = (min_y + max_y) / 2.0;
    let reach = SUPER_TRIANGLE_SCALE * span;

    [
        (center_x - reach, center_y - span),
        (center_x + reach, center_y - span),
        (center_x, center_y + reach),
    ]
}

fn orientation(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> f64 {
    (b.0 - a.0) * (c.1 - a.1) - (b.1 - a.1) * (c.0 - a.0)
}

/// Whether `d` lies strictly inside the circumcircle of triangle `abc`.
fn in_circumcircle(a: (f64, f64), b: (f64, f64), c: (f64, f64), d: (f64, f64)) -> bool {
    let adx = a.0 - d.0;
    let ady = a.1 - d.1;
    let bdx = b.0 - d.0;
    let bdy = b.1 - d.1;
    let cdx = c.0 - d.0;
    let cdy = c.1 - d.1;

    let ad = adx * adx + ady * ady;
    let bd = bdx * bdx + bdy * bdy;
    let cd = cdx * cdx + cdy * cdy;

    let det = adx * (bdy * cd - bd * cdy) - ady * (bdx * cd - bd * cdx)
        + ad * (bdx * cdy - bdy * cdx);

    // The determinant sign flips with the triangle's winding.
    if orientation(a, b, c) > 0.0 {
        det > 0.0
    } else {
        det < 0.0
    }
}

pub(crate) fn distance_sq(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    dx * dx + dy * dy
}
