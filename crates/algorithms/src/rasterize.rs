//! Vector-to-grid burning
//!
//! Polygons burn every cell whose center lies inside them (even-odd rule per
//! polygon, so holes are respected and overlapping features do not cancel).
//! Lines and points burn every cell they touch. [`rasterize_outlined`] also
//! burns the cells a polygon's rings pass through, so a polygon narrower
//! than a cell still leaves a hit.

use crate::maybe_rayon::*;
use geo::{Coord, Geometry, LineString, Polygon};
use std::borrow::Cow;
use landex_core::GeoTransform;
use ndarray::Array2;

/// Geometry decomposed into the three burn modes
#[derive(Debug, Default)]
struct Parts<'a> {
    polygons: Vec<Cow<'a, Polygon<f64>>>,
    segments: Vec<(Coord<f64>, Coord<f64>)>,
    points: Vec<Coord<f64>>,
}

impl<'a> Parts<'a> {
    fn collect(&mut self, geom: &'a Geometry<f64>) {
        match geom {
            Geometry::Point(p) => self.points.push(p.0),
            Geometry::MultiPoint(mp) => self.points.extend(mp.iter().map(|p| p.0)),
            Geometry::Line(l) => self.segments.push((l.start, l.end)),
            Geometry::LineString(ls) => self.push_line(ls),
            Geometry::MultiLineString(mls) => mls.iter().for_each(|ls| self.push_line(ls)),
            Geometry::Polygon(p) => self.polygons.push(Cow::Borrowed(p)),
            Geometry::MultiPolygon(mp) => self.polygons.extend(mp.iter().map(Cow::Borrowed)),
            Geometry::Rect(r) => self.polygons.push(Cow::Owned(r.to_polygon())),
            Geometry::Triangle(t) => self.polygons.push(Cow::Owned(t.to_polygon())),
            Geometry::GeometryCollection(gc) => gc.iter().for_each(|g| self.collect(g)),
        }
    }

    /// Add every polygon ring to the burnt segments
    fn outline_polygons(&mut self) {
        let rings: Vec<(Coord<f64>, Coord<f64>)> = self
            .polygons
            .iter()
            .flat_map(|p| std::iter::once(p.exterior()).chain(p.interiors()))
            .flat_map(|ring| ring.lines())
            .map(|l| (l.start, l.end))
            .collect();
        self.segments.extend(rings);
    }

    fn push_line(&mut self, line: &LineString<f64>) {
        match line.0.as_slice() {
            [] => {}
            [only] => self.points.push(*only),
            _ => self.segments.extend(line.lines().map(|l| (l.start, l.end))),
        }
    }
}

/// Half-open row span `[c0, c1)` to burn
type Span = (usize, usize, usize);

/// Polygon edge in fractional pixel space, covering the rows whose centers
/// fall in `[first_row, last_row]`
#[derive(Debug, Clone, Copy)]
struct Edge {
    x0: f64,
    y0: f64,
    slope: f64,
    first_row: usize,
    last_row: usize,
}

/// Burn `geometries` (already in the grid's CRS) into a `rows` x `cols`
/// boolean grid described by `transform`.
pub fn rasterize<'a, I>(geometries: I, transform: &GeoTransform, rows: usize, cols: usize) -> Array2<bool>
where
    I: IntoIterator<Item = &'a Geometry<f64>>,
{
    burn(geometries, transform, rows, cols, false)
}

/// Like [`rasterize`], with every polygon ring also burnt as a line.
///
/// Used to seed buffers: a feature must reach out by the buffer distance
/// even when it contains no cell center.
pub fn rasterize_outlined<'a, I>(geometries: I, transform: &GeoTransform, rows: usize, cols: usize) -> Array2<bool>
where
    I: IntoIterator<Item = &'a Geometry<f64>>,
{
    burn(geometries, transform, rows, cols, true)
}

fn burn<'a, I>(geometries: I, transform: &GeoTransform, rows: usize, cols: usize, outline: bool) -> Array2<bool>
where
    I: IntoIterator<Item = &'a Geometry<f64>>,
{
    let mut parts = Parts::default();
    for geom in geometries {
        parts.collect(geom);
    }
    if outline {
        parts.outline_polygons();
    }

    let mut grid = Array2::from_elem((rows, cols), false);
    if rows == 0 || cols == 0 {
        return grid;
    }

    let spans: Vec<Span> = (&parts.polygons)
        .into_par_iter()
        .flat_map(|polygon| polygon_spans(polygon, transform, rows, cols))
        .collect();

    for (row, c0, c1) in spans {
        grid.row_mut(row)
            .slice_mut(ndarray::s![c0..c1])
            .fill(true);
    }

    for &(start, end) in &parts.segments {
        burn_segment(&mut grid, transform, start, end);
    }

    for point in &parts.points {
        if let Some(cell) = transform.cell_index(point.x, point.y, rows, cols) {
            grid[cell] = true;
        }
    }

    grid
}

fn polygon_spans(polygon: &Polygon<f64>, transform: &GeoTransform, rows: usize, cols: usize) -> Vec<Span> {
    let mut edges: Vec<Edge> = std::iter::once(polygon.exterior())
        .chain(polygon.interiors())
        .flat_map(|ring| ring.lines())
        .filter_map(|line| {
            let (x0, y0) = transform.geo_to_pixel(line.start.x, line.start.y);
            let (x1, y1) = transform.geo_to_pixel(line.end.x, line.end.y);
            make_edge(x0, y0, x1, y1, rows)
        })
        .collect();

    if edges.is_empty() {
        return Vec::new();
    }
    edges.sort_by_key(|e| e.first_row);

    let start = edges[0].first_row;
    let end = edges.iter().map(|e| e.last_row).max().unwrap_or(start);

    let mut spans = Vec::new();
    let mut active: Vec<Edge> = Vec::new();
    let mut next = 0;
    let mut xs: Vec<f64> = Vec::new();

    for row in start..=end {
        while next < edges.len() && edges[next].first_row <= row {
            active.push(edges[next]);
            next += 1;
        }
        active.retain(|e| e.last_row >= row);

        let yc = row as f64 + 0.5;
        xs.clear();
        xs.extend(active.iter().map(|e| e.x0 + (yc - e.y0) * e.slope));
        xs.sort_by(|a, b| a.total_cmp(b));

        for pair in xs.chunks_exact(2) {
            let c0 = (pair[0] - 0.5).ceil().max(0.0);
            let c1 = (pair[1] - 0.5).ceil().min(cols as f64);
            if c1 > c0 {
                spans.push((row, c0 as usize, c1 as usize));
            }
        }
    }

    spans
}

/// Edge crossing the centers `yc` with `min_y <= yc < max_y`, clipped to the grid rows
fn make_edge(x0: f64, y0: f64, x1: f64, y1: f64, rows: usize) -> Option<Edge> {
    if !(x0.is_finite() && y0.is_finite() && x1.is_finite() && y1.is_finite()) || y0 == y1 {
        return None;
    }
    let (min_y, max_y) = (y0.min(y1), y0.max(y1));

    let first = (min_y - 0.5).ceil().max(0.0);
    let last = ((max_y - 0.5).ceil() - 1.0).min(rows as f64 - 1.0);
    if last < first {
        return None;
    }

    Some(Edge {
        x0,
        y0,
        slope: (x1 - x0) / (y1 - y0),
        first_row: first as usize,
        last_row: last as usize,
    })
}

/// Mark every cell a segment passes through
fn burn_segment(grid: &mut Array2<bool>, transform: &GeoTransform, start: Coord<f64>, end: Coord<f64>) {
    let (rows, cols) = grid.dim();
    let (c0, r0) = transform.geo_to_pixel(start.x, start.y);
    let (c1, r1) = transform.geo_to_pixel(end.x, end.y);
    if !(c0.is_finite() && r0.is_finite() && c1.is_finite() && r1.is_finite()) {
        return;
    }

    // Quarter-pixel steps never skip a cell the segment crosses by more than a sliver
    let length = ((c1 - c0).powi(2) + (r1 - r0).powi(2)).sqrt();
    let steps = (length * 4.0).ceil().max(1.0) as usize;

    for i in 0..=steps {
        let t = i as f64 / steps as f64;
        let c = c0 + t * (c1 - c0);
        let r = r0 + t * (r1 - r0);
        if c >= 0.0 && r >= 0.0 {
            let (row, col) = (r.floor() as usize, c.floor() as usize);
            if row < rows && col < cols {
                grid[(row, col)] = true;
            }
        }
    }
}
