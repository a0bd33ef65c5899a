use crate::error::{MapError, Result};
use crate::map::renderer::{Region, Ring};
use glam::DVec2;
use shapefile::Shape;
use std::path::Path;

/// Rings whose bounding box fits inside this extent (in the shapefile's
/// native units) in both dimensions are dropped as invisible at map scale
const MIN_RING_EXTENT: f64 = 1.0;

/// Rings with more points than this get arc-length resampled
const RESAMPLE_THRESHOLD: usize = 100;

/// Width and height of a ring's bounding box
pub fn ring_extent(ring: &[DVec2]) -> (f64, f64) {
    let mut min = DVec2::splat(f64::INFINITY);
    let mut max = DVec2::splat(f64::NEG_INFINITY);
    for p in ring {
        min = min.min(*p);
        max = max.max(*p);
    }
    (max.x - min.x, max.y - min.y)
}

/// A ring survives filtering when either bounding-box dimension exceeds
/// the threshold; only rings small in both directions are dropped
fn keep_ring(ring: &[DVec2]) -> bool {
    let (width, height) = ring_extent(ring);
    width > MIN_RING_EXTENT || height > MIN_RING_EXTENT
}

/// Resample a ring to at most max(100, n/1000) points, evenly spaced
/// along cumulative chord length, interpolating linearly between the
/// original points. Rings with 100 or fewer points pass through
/// untouched, as do rings of zero total length (a repeated point).
/// The first and last points are always preserved exactly.
pub fn resample_ring(ring: &[DVec2]) -> Ring {
    if ring.len() <= RESAMPLE_THRESHOLD {
        return ring.to_vec();
    }

    // Cumulative Euclidean arc length at each point
    let mut arc = Vec::with_capacity(ring.len());
    arc.push(0.0);
    for pair in ring.windows(2) {
        let last = *arc.last().unwrap();
        arc.push(last + pair[0].distance(pair[1]));
    }

    let total = *arc.last().unwrap();
    if total == 0.0 {
        // Degenerate ring: every point identical, nothing to redistribute
        return ring.to_vec();
    }

    let target = RESAMPLE_THRESHOLD.max(ring.len() / 1000);
    let mut out = Vec::with_capacity(target);
    for i in 0..target {
        let t = total * i as f64 / (target - 1) as f64;
        out.push(point_at(ring, &arc, t));
    }

    // Pin the endpoints against interpolation rounding
    out[0] = ring[0];
    *out.last_mut().unwrap() = *ring.last().unwrap();
    out
}

/// Point at arc-length position t, by linear interpolation within the
/// segment that spans t
fn point_at(ring: &[DVec2], arc: &[f64], t: f64) -> DVec2 {
    let hi = arc.partition_point(|&v| v < t).clamp(1, arc.len() - 1);
    let lo = hi - 1;

    let seg = arc[hi] - arc[lo];
    if seg == 0.0 {
        return ring[hi];
    }
    ring[lo].lerp(ring[hi], (t - arc[lo]) / seg)
}

/// Filter and resample one shape's rings, preserving their order
pub fn simplify_rings(rings: Vec<Ring>) -> Vec<Ring> {
    rings
        .into_iter()
        .filter(|ring| keep_ring(ring))
        .map(|ring| resample_ring(&ring))
        .collect()
}

/// Rings of a single shape record. Part splitting is done by the
/// shapefile crate; polygons and polylines both contribute their loops,
/// other shape types none.
fn shape_rings(shape: &Shape) -> Vec<Ring> {
    match shape {
        Shape::Polygon(polygon) => polygon
            .rings()
            .iter()
            .map(|ring| {
                ring.points()
                    .iter()
                    .map(|p| DVec2::new(p.x, p.y))
                    .collect()
            })
            .collect(),
        Shape::Polyline(polyline) => polyline
            .parts()
            .iter()
            .map(|part| part.iter().map(|p| DVec2::new(p.x, p.y)).collect())
            .collect(),
        _ => Vec::new(),
    }
}

/// Turn parsed shape records into simplified regions, in record order
pub fn extract_regions(shapes: &[Shape]) -> Vec<Region> {
    shapes
        .iter()
        .map(|shape| Region::new(simplify_rings(shape_rings(shape))))
        .collect()
}

/// Read and simplify the boundary geometry for one country and
/// administrative level from `{ISO3}_adm{level}.shp/.shx/.dbf` under the
/// data directory. All three files must be present; populating them
/// (the GADM download) is the caller's responsibility and the error
/// says so.
pub fn country_regions(data_dir: &Path, country: &str, level: u8) -> Result<Vec<Region>> {
    let base = data_dir.join(format!("{country}_adm{level}"));

    for ext in ["shp", "shx", "dbf"] {
        if !base.with_extension(ext).is_file() {
            return Err(MapError::MissingSourceData {
                country: country.to_string(),
                level,
            });
        }
    }

    let shapes = shapefile::read_shapes(base.with_extension("shp"))?;
    Ok(extract_regions(&shapes))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ring(points: &[(f64, f64)]) -> Ring {
        points.iter().map(|&(x, y)| DVec2::new(x, y)).collect()
    }

    /// n points along the unit circle (not closed)
    fn circle(n: usize) -> Ring {
        (0..n)
            .map(|i| {
                let a = std::f64::consts::TAU * i as f64 / n as f64;
                DVec2::new(a.cos(), a.sin()) * 50.0
            })
            .collect()
    }

    #[test]
    fn test_short_ring_passes_through() {
        let r = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        assert_eq!(resample_ring(&r), r);

        let r = circle(100);
        assert_eq!(resample_ring(&r), r);
    }

    #[test]
    fn test_long_ring_resampled_to_cap() {
        let r = circle(150);
        let resampled = resample_ring(&r);
        assert_eq!(resampled.len(), 100);
        assert_eq!(resampled[0], r[0]);
        assert_eq!(*resampled.last().unwrap(), *r.last().unwrap());
    }

    #[test]
    fn test_huge_ring_keeps_one_point_per_thousand() {
        let r = circle(250_000);
        assert_eq!(resample_ring(&r).len(), 250);
    }

    #[test]
    fn test_resampled_points_stay_on_the_curve() {
        // Resampling a straight line keeps every point on it
        let r: Ring = (0..200).map(|i| DVec2::new(i as f64, 0.0)).collect();
        let resampled = resample_ring(&r);
        assert_eq!(resampled.len(), 100);
        for w in resampled.windows(2) {
            assert!(w[1].x > w[0].x);
            assert_eq!(w[0].y, 0.0);
        }
    }

    #[test]
    fn test_degenerate_ring_does_not_divide_by_zero() {
        let r = ring(&[(5.0, 5.0), (5.0, 5.0), (5.0, 5.0)]);
        assert_eq!(resample_ring(&r), r);

        // Same guard past the resampling threshold
        let r: Ring = vec![DVec2::new(5.0, 5.0); 150];
        assert_eq!(resample_ring(&r), r);
    }

    #[test]
    fn test_micro_rings_filtered_out() {
        let big = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 10.0), (0.0, 10.0)]);
        let small = ring(&[(0.0, 0.0), (0.5, 0.0), (0.5, 0.5), (0.0, 0.5)]);
        // Wide but flat: one dimension above threshold is enough to keep
        let sliver = ring(&[(0.0, 0.0), (10.0, 0.0), (10.0, 0.5), (0.0, 0.5)]);

        let kept = simplify_rings(vec![big.clone(), small, sliver.clone()]);
        assert_eq!(kept, vec![big, sliver]);
    }

    #[test]
    fn test_ring_extent() {
        let (w, h) = ring_extent(&ring(&[(-3.0, 1.0), (4.0, 1.0), (0.0, 3.5)]));
        assert_eq!(w, 7.0);
        assert_eq!(h, 2.5);
    }

    #[test]
    fn test_missing_files_name_the_download_step() {
        let err = country_regions(Path::new("/nonexistent"), "BEL", 2).unwrap_err();
        assert!(matches!(err, MapError::MissingSourceData { .. }));

        let msg = err.to_string();
        assert!(msg.contains("BEL"));
        assert!(msg.contains("level 2"));
        assert!(msg.contains("download"));
    }
}
