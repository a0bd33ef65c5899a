use crate::braille::BrailleCanvas;
use crate::error::{MapError, Result};
use crate::map::geometry::{draw_polygon, fill_polygon};
use crate::map::projection::{Projection, Viewport};
use glam::DVec2;
use ratatui::style::Color;

/// One boundary loop of a region, as raw lon/lat points
pub type Ring = Vec<DVec2>;

/// All rings belonging to one shape record (a country or admin unit
/// may be a single polygon or several, e.g. islands)
#[derive(Clone, Debug, Default)]
pub struct Region {
    pub rings: Vec<Ring>,
}

impl Region {
    pub fn new(rings: Vec<Ring>) -> Self {
        Self { rings }
    }
}

/// Styling applied uniformly to every ring of one region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PatchStyle {
    /// Fill color; None leaves the interior empty
    pub face: Option<Color>,
    pub edge: Color,
    pub line_width: f64,
}

impl Default for PatchStyle {
    fn default() -> Self {
        Self {
            face: Some(Color::Rgb(0x22, 0x22, 0x22)),
            edge: Color::Black,
            line_width: 0.2,
        }
    }
}

/// Style attribute input: either one value applied to every region, or
/// one value per region. The explicit tag avoids guessing from lengths,
/// which is ambiguous when the region count happens to match an
/// RGB/RGBA tuple length.
#[derive(Clone, Debug)]
pub enum StyleInput<T> {
    Single(T),
    PerRegion(Vec<T>),
}

impl<T: Clone> StyleInput<T> {
    /// Resolve to one value per region.
    /// A `PerRegion` input whose length disagrees with the region count
    /// fails immediately; it is never truncated or padded.
    pub fn broadcast(&self, regions: usize) -> Result<Vec<T>> {
        match self {
            StyleInput::Single(v) => Ok(vec![v.clone(); regions]),
            StyleInput::PerRegion(vs) => {
                if vs.len() == regions {
                    Ok(vs.clone())
                } else {
                    Err(MapError::StyleCountMismatch {
                        expected: regions,
                        got: vs.len(),
                    })
                }
            }
        }
    }
}

/// One region's rings, projected into plot space, with its style.
/// Batches are rebuilt from the source lon/lat rings on every render
/// pass; projected coordinates are never cached.
#[derive(Clone, Debug)]
pub struct PolygonBatch {
    pub polygons: Vec<Vec<DVec2>>,
    pub style: PatchStyle,
}

/// Build one batch per region, projecting each ring through the given
/// projection immediately before polygon construction.
pub fn build_batches(
    regions: &[Region],
    projection: Projection,
    faces: &StyleInput<Option<Color>>,
    edges: &StyleInput<Color>,
    line_widths: &StyleInput<f64>,
) -> Result<Vec<PolygonBatch>> {
    let faces = faces.broadcast(regions.len())?;
    let edges = edges.broadcast(regions.len())?;
    let line_widths = line_widths.broadcast(regions.len())?;

    let batches = regions
        .iter()
        .zip(faces)
        .zip(edges)
        .zip(line_widths)
        .map(|(((region, face), edge), line_width)| PolygonBatch {
            polygons: region
                .rings
                .iter()
                .map(|ring| projection.project_ring(ring))
                .collect(),
            style: PatchStyle {
                face,
                edge,
                line_width,
            },
        })
        .collect();

    Ok(batches)
}

/// Samples per side of the world frame
const OUTLINE_SAMPLES: usize = 30;

/// The closed lon/lat frame of the world: ±180° longitude, ±90°
/// latitude, 30 samples per side so curved projections stay smooth.
pub fn world_outline_ring() -> Ring {
    let mut ring = Vec::with_capacity(4 * OUTLINE_SAMPLES);

    // East edge going north, north edge going west,
    // west edge going south, south edge going east
    for lat in linspace(-90.0, 90.0, OUTLINE_SAMPLES) {
        ring.push(DVec2::new(180.0, lat));
    }
    for lon in linspace(180.0, -180.0, OUTLINE_SAMPLES) {
        ring.push(DVec2::new(lon, 90.0));
    }
    for lat in linspace(90.0, -90.0, OUTLINE_SAMPLES) {
        ring.push(DVec2::new(-180.0, lat));
    }
    for lon in linspace(-180.0, 180.0, OUTLINE_SAMPLES) {
        ring.push(DVec2::new(lon, -90.0));
    }

    ring
}

/// Build the world frame as a single styled batch: no fill and a
/// neutral dark edge unless the caller says otherwise. Stateless and
/// independent of any region data.
pub fn world_outline(projection: Projection, style: PatchStyle) -> PolygonBatch {
    PolygonBatch {
        polygons: vec![projection.project_ring(&world_outline_ring())],
        style,
    }
}

fn linspace(a: f64, b: f64, n: usize) -> Vec<f64> {
    let step = (b - a) / (n - 1) as f64;
    (0..n).map(|i| a + step * i as f64).collect()
}

/// Display settings for map layers
#[derive(Clone)]
pub struct DisplaySettings {
    pub show_outline: bool,
    pub show_fill: bool,
    pub show_edges: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_outline: true,
            show_fill: true,
            show_edges: true,
        }
    }
}

/// Map renderer holding extracted region geometry and per-region styles
pub struct MapRenderer {
    regions: Vec<Region>,
    faces: StyleInput<Option<Color>>,
    edges: StyleInput<Color>,
    line_widths: StyleInput<f64>,
    pub projection: Projection,
    pub settings: DisplaySettings,
    pub outline_style: PatchStyle,
}

impl MapRenderer {
    pub fn new() -> Self {
        let default = PatchStyle::default();
        Self {
            regions: Vec::new(),
            faces: StyleInput::Single(default.face),
            edges: StyleInput::Single(default.edge),
            line_widths: StyleInput::Single(default.line_width),
            projection: Projection::default(),
            settings: DisplaySettings::default(),
            outline_style: PatchStyle {
                face: None,
                edge: Color::DarkGray,
                line_width: 0.2,
            },
        }
    }

    /// Replace the region set and its styles. Per-region style lengths
    /// are validated here, before any rendering happens.
    pub fn set_regions(
        &mut self,
        regions: Vec<Region>,
        faces: StyleInput<Option<Color>>,
        edges: StyleInput<Color>,
        line_widths: StyleInput<f64>,
    ) -> Result<()> {
        faces.broadcast(regions.len())?;
        edges.broadcast(regions.len())?;
        line_widths.broadcast(regions.len())?;

        self.regions = regions;
        self.faces = faces;
        self.edges = edges;
        self.line_widths = line_widths;
        Ok(())
    }

    pub fn region_count(&self) -> usize {
        self.regions.len()
    }

    /// Check if any region data is loaded
    pub fn has_data(&self) -> bool {
        !self.regions.is_empty()
    }

    /// Build the per-region polygon batches for the current projection
    pub fn build_batches(&self) -> Vec<PolygonBatch> {
        // Lengths were validated in set_regions
        build_batches(
            &self.regions,
            self.projection,
            &self.faces,
            &self.edges,
            &self.line_widths,
        )
        .unwrap_or_default()
    }

    /// Render the world frame and all region batches to a fresh canvas
    pub fn render(&self, width: usize, height: usize, viewport: &Viewport) -> BrailleCanvas {
        let mut canvas = BrailleCanvas::new(width, height);

        if self.settings.show_outline {
            let frame = world_outline(self.projection, self.outline_style);
            self.draw_batch(&mut canvas, &frame, viewport);
        }

        for batch in self.build_batches() {
            self.draw_batch(&mut canvas, &batch, viewport);
        }

        canvas
    }

    /// Draw one batch: fill first, then stroke, per polygon
    fn draw_batch(&self, canvas: &mut BrailleCanvas, batch: &PolygonBatch, viewport: &Viewport) {
        for polygon in &batch.polygons {
            let pts: Vec<(i32, i32)> = polygon.iter().map(|&p| viewport.to_pixels(p)).collect();

            if !pixel_bbox_visible(&pts, viewport) {
                continue;
            }

            if self.settings.show_fill {
                if let Some(face) = batch.style.face {
                    fill_polygon(canvas, &pts, face);
                }
            }
            if self.settings.show_edges {
                let thick = batch.style.line_width > 1.0;
                draw_polygon(canvas, &pts, batch.style.edge, thick);
            }
        }
    }

    pub fn toggle_outline(&mut self) {
        self.settings.show_outline = !self.settings.show_outline;
    }

    pub fn toggle_fill(&mut self) {
        self.settings.show_fill = !self.settings.show_fill;
    }

    pub fn toggle_edges(&mut self) {
        self.settings.show_edges = !self.settings.show_edges;
    }

    pub fn cycle_projection(&mut self) {
        self.projection = self.projection.cycle();
    }
}

impl Default for MapRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// Rough pixel bounding-box check against the viewport
fn pixel_bbox_visible(pts: &[(i32, i32)], viewport: &Viewport) -> bool {
    if pts.is_empty() {
        return false;
    }

    let min_x = pts.iter().map(|p| p.0).min().unwrap_or(0);
    let max_x = pts.iter().map(|p| p.0).max().unwrap_or(0);
    let min_y = pts.iter().map(|p| p.1).min().unwrap_or(0);
    let max_y = pts.iter().map(|p| p.1).max().unwrap_or(0);

    max_x >= 0 && min_x < viewport.width as i32 && max_y >= 0 && min_y < viewport.height as i32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::map::projection::robinson;

    fn square(size: f64) -> Region {
        Region::new(vec![vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(size, 0.0),
            DVec2::new(size, size),
            DVec2::new(0.0, size),
        ]])
    }

    fn regions(n: usize) -> Vec<Region> {
        (0..n).map(|_| square(10.0)).collect()
    }

    #[test]
    fn test_single_style_broadcasts_to_all() {
        let color = Color::Rgb(10, 20, 30);
        let batches = build_batches(
            &regions(5),
            Projection::Linear,
            &StyleInput::Single(Some(color)),
            &StyleInput::Single(Color::Black),
            &StyleInput::Single(0.2),
        )
        .unwrap();

        assert_eq!(batches.len(), 5);
        for batch in &batches {
            assert_eq!(batch.style.face, Some(color));
        }
    }

    #[test]
    fn test_per_region_styles_are_positional() {
        let colors: Vec<Option<Color>> = (0..5u8).map(|i| Some(Color::Indexed(i))).collect();
        let batches = build_batches(
            &regions(5),
            Projection::Linear,
            &StyleInput::PerRegion(colors.clone()),
            &StyleInput::Single(Color::Black),
            &StyleInput::Single(0.2),
        )
        .unwrap();

        for (i, batch) in batches.iter().enumerate() {
            assert_eq!(batch.style.face, colors[i]);
        }
    }

    #[test]
    fn test_style_count_mismatch_is_an_error() {
        let err = StyleInput::PerRegion(vec![0.2, 0.4]).broadcast(5).unwrap_err();
        match err {
            MapError::StyleCountMismatch { expected, got } => {
                assert_eq!(expected, 5);
                assert_eq!(got, 2);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_single_color_tuple_not_split_over_matching_region_count() {
        // The historical ambiguity: 3 regions and one RGB color. The
        // tag makes the intent explicit, so all 3 regions get the color.
        let color = Color::Rgb(200, 100, 50);
        let faces = StyleInput::Single(Some(color)).broadcast(3).unwrap();
        assert_eq!(faces, vec![Some(color); 3]);
    }

    #[test]
    fn test_batches_project_at_build_time() {
        let batches = build_batches(
            &regions(1),
            Projection::Robinson,
            &StyleInput::Single(None),
            &StyleInput::Single(Color::White),
            &StyleInput::Single(0.2),
        )
        .unwrap();

        assert_eq!(batches[0].polygons.len(), 1);
        assert_eq!(batches[0].polygons[0][1], robinson(10.0, 0.0));
    }

    #[test]
    fn test_world_outline_ring_is_closed() {
        let ring = world_outline_ring();
        assert_eq!(ring.len(), 120);
        assert_eq!(ring[0], DVec2::new(180.0, -90.0));
        assert_eq!(*ring.last().unwrap(), DVec2::new(180.0, -90.0));
    }

    #[test]
    fn test_world_outline_defaults() {
        let batch = world_outline(
            Projection::Linear,
            PatchStyle {
                face: None,
                edge: Color::DarkGray,
                line_width: 0.2,
            },
        );
        assert_eq!(batch.polygons.len(), 1);
        assert!(batch.style.face.is_none());
        // Linear projection keeps the frame corners on the unit box
        assert_eq!(batch.polygons[0][0], DVec2::new(1.0, -1.0));
    }

    #[test]
    fn test_render_smoke() {
        let mut renderer = MapRenderer::new();
        renderer
            .set_regions(
                vec![square(90.0)],
                StyleInput::Single(Some(Color::Green)),
                StyleInput::Single(Color::White),
                StyleInput::Single(0.2),
            )
            .unwrap();

        let viewport = Viewport::world(80, 48);
        let canvas = renderer.render(40, 12, &viewport);
        let drawn = canvas.to_string().chars().any(|c| c != '⠀' && c != '\n');
        assert!(drawn);
    }

    #[test]
    fn test_set_regions_rejects_bad_lengths() {
        let mut renderer = MapRenderer::new();
        let result = renderer.set_regions(
            regions(4),
            StyleInput::Single(None),
            StyleInput::PerRegion(vec![Color::White; 3]),
            StyleInput::Single(0.2),
        );
        assert!(matches!(
            result,
            Err(MapError::StyleCountMismatch { expected: 4, got: 3 })
        ));
    }
}
