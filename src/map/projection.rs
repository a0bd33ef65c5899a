use glam::DVec2;

/// Robinson reference parallels, 0° to 90° in 5° steps.
const ROBINSON_LAT: [f64; 19] = [
    0.0, 5.0, 10.0, 15.0, 20.0, 25.0, 30.0, 35.0, 40.0, 45.0, 50.0, 55.0, 60.0, 65.0, 70.0, 75.0,
    80.0, 85.0, 90.0,
];

/// Relative length of the parallel at each reference latitude.
const ROBINSON_PLEN: [f64; 19] = [
    1.0000, 0.9986, 0.9954, 0.9900, 0.9822, 0.9730, 0.9600, 0.9427, 0.9216, 0.8962, 0.8679,
    0.8350, 0.7986, 0.7597, 0.7186, 0.6732, 0.6213, 0.5722, 0.5322,
];

/// Perpendicular distance from the equator at each reference latitude.
const ROBINSON_PDFE: [f64; 19] = [
    0.0000, 0.0620, 0.1240, 0.1860, 0.2480, 0.3100, 0.3720, 0.4340, 0.4958, 0.5571, 0.6176,
    0.6769, 0.7346, 0.7903, 0.8435, 0.8936, 0.9394, 0.9761, 1.0000,
];

/// Scale factor applied to the pdfe table so the projected world is
/// roughly 2x1 (x in [-1, 1], y in [-0.5072, 0.5072]).
const ROBINSON_PDFE_SCALE: f64 = 0.5072;

/// Cartographic projection from (lon, lat) in degrees to normalized
/// plot coordinates, with the whole world in roughly [-1, 1] x [-1, 1].
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum Projection {
    /// Linear fallback: x = lon/180, y = lat/90
    #[default]
    Linear,
    /// Table-driven pseudo-cylindrical projection
    Robinson,
    /// Closed-form pseudo-cylindrical projection
    WagnerVi,
}

impl Projection {
    /// Project a single (lon, lat) pair.
    pub fn project(&self, lon: f64, lat: f64) -> DVec2 {
        match self {
            Projection::Linear => linear(lon, lat),
            Projection::Robinson => robinson(lon, lat),
            Projection::WagnerVi => wagner_vi(lon, lat),
        }
    }

    /// Project a whole ring of (lon, lat) points.
    pub fn project_ring(&self, ring: &[DVec2]) -> Vec<DVec2> {
        ring.iter().map(|p| self.project(p.x, p.y)).collect()
    }

    /// Next projection in display order (for the `p` key)
    pub fn cycle(&self) -> Self {
        match self {
            Projection::Linear => Projection::Robinson,
            Projection::Robinson => Projection::WagnerVi,
            Projection::WagnerVi => Projection::Linear,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Projection::Linear => "linear",
            Projection::Robinson => "robinson",
            Projection::WagnerVi => "wagner-vi",
        }
    }
}

/// Linear lon/lat scaling, the default whenever no projection is chosen.
pub fn linear(lon: f64, lat: f64) -> DVec2 {
    DVec2::new(lon / 180.0, lat / 90.0)
}

/// Robinson projection via linear interpolation of the reference tables.
/// https://en.wikipedia.org/wiki/Robinson_projection
pub fn robinson(lon: f64, lat: f64) -> DVec2 {
    let plen = interp(lat.abs(), &ROBINSON_LAT, &ROBINSON_PLEN);
    let pdfe = interp(lat.abs(), &ROBINSON_LAT, &ROBINSON_PDFE) * ROBINSON_PDFE_SCALE;

    DVec2::new(lon / 180.0 * plen, sign(lat) * pdfe)
}

/// Wagner VI projection: x = lon * sqrt(1 - 3 (lat/180)^2), y = lat/90
/// https://en.wikipedia.org/wiki/Wagner_VI_projection
pub fn wagner_vi(lon: f64, lat: f64) -> DVec2 {
    let x = lon * (1.0 - 3.0 * (lat / 180.0).powi(2)).sqrt();
    let y = lat / 90.0;
    DVec2::new(x, y)
}

/// Sign with sign(0) = 0, so the equator projects to y = 0 exactly.
/// (f64::signum returns 1.0 for +0.0, which is not what we want here.)
fn sign(v: f64) -> f64 {
    if v > 0.0 {
        1.0
    } else if v < 0.0 {
        -1.0
    } else {
        0.0
    }
}

/// Piecewise-linear interpolation of y(x) against sorted breakpoints,
/// clamped to the table ends.
fn interp(x: f64, xs: &[f64], ys: &[f64]) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());

    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[xs.len() - 1] {
        return ys[ys.len() - 1];
    }

    // First breakpoint strictly greater than x; x is inside the table
    let hi = xs.partition_point(|&v| v <= x);
    let lo = hi - 1;
    let t = (x - xs[lo]) / (xs[hi] - xs[lo]);
    ys[lo] + t * (ys[hi] - ys[lo])
}

/// Viewport mapping normalized plot coordinates to canvas pixels
#[derive(Clone)]
pub struct Viewport {
    /// Plot-space center of the view
    pub center: DVec2,
    /// Zoom level (higher = more zoomed in)
    pub zoom: f64,
    /// Canvas pixel width
    pub width: usize,
    /// Canvas pixel height
    pub height: usize,
}

impl Viewport {
    pub fn new(center: DVec2, zoom: f64, width: usize, height: usize) -> Self {
        Self {
            center,
            zoom,
            width,
            height,
        }
    }

    /// Create a world view (shows the entire projected world)
    pub fn world(width: usize, height: usize) -> Self {
        Self::new(DVec2::ZERO, 1.0, width, height)
    }

    /// Pixels per plot-space unit at the current zoom
    fn scale(&self) -> f64 {
        self.zoom * (self.width.min(self.height) as f64) / 2.0
    }

    /// Map a plot-space point to pixel coordinates (y axis flipped)
    pub fn to_pixels(&self, p: DVec2) -> (i32, i32) {
        let scale = self.scale();
        let px = ((p.x - self.center.x) * scale + self.width as f64 / 2.0) as i32;
        let py = ((self.center.y - p.y) * scale + self.height as f64 / 2.0) as i32;
        (px, py)
    }

    /// Map pixel coordinates back to plot space
    pub fn from_pixels(&self, px: i32, py: i32) -> DVec2 {
        let scale = self.scale();
        DVec2::new(
            (px as f64 - self.width as f64 / 2.0) / scale + self.center.x,
            self.center.y - (py as f64 - self.height as f64 / 2.0) / scale,
        )
    }

    /// Pan the viewport by pixel delta
    pub fn pan(&mut self, dx: i32, dy: i32) {
        let scale = self.scale();
        self.center.x += dx as f64 / scale;
        self.center.y -= dy as f64 / scale;

        // Keep the world frame reachable
        self.center.x = self.center.x.clamp(-2.0, 2.0);
        self.center.y = self.center.y.clamp(-2.0, 2.0);
    }

    /// Zoom in by a factor
    pub fn zoom_in(&mut self) {
        self.zoom = (self.zoom * 1.5).min(100.0);
    }

    /// Zoom out by a factor
    pub fn zoom_out(&mut self) {
        self.zoom = (self.zoom / 1.5).max(0.5);
    }

    /// Zoom in towards a specific pixel location
    pub fn zoom_in_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.5);
    }

    /// Zoom out from a specific pixel location
    pub fn zoom_out_at(&mut self, px: i32, py: i32) {
        self.zoom_at(px, py, 1.0 / 1.5);
    }

    /// Zoom by factor towards a specific pixel location
    fn zoom_at(&mut self, px: i32, py: i32, factor: f64) {
        // Get the plot-space point under the cursor
        let p = self.from_pixels(px, py);

        // Apply the zoom
        self.zoom = (self.zoom * factor).clamp(0.5, 100.0);

        // Calculate where that point would now land
        let (new_px, new_py) = self.to_pixels(p);

        // Pan to bring it back under the cursor
        self.pan(new_px - px, new_py - py);
    }

    /// Check if a pixel is visible in the viewport (small margin)
    pub fn is_visible(&self, px: i32, py: i32) -> bool {
        px >= -10 && px < self.width as i32 + 10 && py >= -10 && py < self.height as i32 + 10
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-12;

    #[test]
    fn test_linear_default() {
        let p = Projection::default().project(90.0, -45.0);
        assert!((p.x - 0.5).abs() < EPS);
        assert!((p.y + 0.5).abs() < EPS);
    }

    #[test]
    fn test_robinson_equator_is_flat() {
        for lon in [-180.0, -90.0, 0.0, 45.0, 180.0] {
            let p = robinson(lon, 0.0);
            assert_eq!(p.y, 0.0);
            assert!((p.x - lon / 180.0).abs() < EPS);
        }
    }

    #[test]
    fn test_robinson_central_meridian() {
        for lat in [-90.0, -30.0, 0.0, 12.5, 90.0] {
            assert_eq!(robinson(0.0, lat).x, 0.0);
        }
    }

    #[test]
    fn test_robinson_odd_in_latitude() {
        for lat in [5.0, 17.3, 42.0, 88.0] {
            for lon in [-120.0, 0.0, 60.0] {
                let north = robinson(lon, lat);
                let south = robinson(lon, -lat);
                assert!((north.y + south.y).abs() < EPS);
                assert!((north.x - south.x).abs() < EPS);
            }
        }
    }

    #[test]
    fn test_robinson_table_breakpoints() {
        // At a table latitude no interpolation happens
        let p = robinson(180.0, 90.0);
        assert!((p.x - 0.5322).abs() < EPS);
        assert!((p.y - 0.5072).abs() < EPS);
    }

    #[test]
    fn test_robinson_interpolates_between_breakpoints() {
        // Halfway between the 0° and 5° parallels
        let p = robinson(180.0, 2.5);
        assert!((p.x - (1.0 + 0.9986) / 2.0).abs() < EPS);
        assert!((p.y - 0.0620 / 2.0 * 0.5072).abs() < EPS);
    }

    #[test]
    fn test_wagner_vi_closed_form() {
        let p = wagner_vi(90.0, 60.0);
        let expected_x = 90.0 * (1.0 - 3.0 * (60.0f64 / 180.0).powi(2)).sqrt();
        assert!((p.x - expected_x).abs() < EPS);
        assert!((p.y - 60.0 / 90.0).abs() < EPS);
    }

    #[test]
    fn test_project_ring_matches_scalar() {
        let ring = vec![DVec2::new(10.0, 20.0), DVec2::new(-30.0, -40.0)];
        let projected = Projection::Robinson.project_ring(&ring);
        assert_eq!(projected[0], robinson(10.0, 20.0));
        assert_eq!(projected[1], robinson(-30.0, -40.0));
    }

    #[test]
    fn test_viewport_center_pixel() {
        let vp = Viewport::world(100, 100);
        let (px, py) = vp.to_pixels(DVec2::ZERO);
        assert_eq!(px, 50);
        assert_eq!(py, 50);
    }

    #[test]
    fn test_viewport_roundtrip() {
        let vp = Viewport::new(DVec2::new(0.2, -0.1), 3.0, 200, 120);
        let p = DVec2::new(-0.4, 0.3);
        let (px, py) = vp.to_pixels(p);
        let back = vp.from_pixels(px, py);
        // Pixel quantization bounds the error
        assert!((back.x - p.x).abs() < 0.02);
        assert!((back.y - p.y).abs() < 0.02);
    }

    #[test]
    fn test_viewport_pan() {
        let mut vp = Viewport::world(100, 100);
        vp.pan(10, 0);
        assert!(vp.center.x > 0.0);
        vp.pan(0, -5);
        assert!(vp.center.y > 0.0);
    }
}
