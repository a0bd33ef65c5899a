use crate::braille::BrailleCanvas;
use ratatui::style::Color;

/// Draw a line using Bresenham's algorithm
pub fn draw_line(canvas: &mut BrailleCanvas, x0: i32, y0: i32, x1: i32, y1: i32, color: Color) {
    let dx = (x1 - x0).abs();
    let dy = -(y1 - y0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = x0;
    let mut y = y0;

    loop {
        canvas.set_pixel_signed(x, y, color);

        if x == x1 && y == y1 {
            break;
        }

        let e2 = 2 * err;

        if e2 >= dy {
            if x == x1 {
                break;
            }
            err += dy;
            x += sx;
        }

        if e2 <= dx {
            if y == y1 {
                break;
            }
            err += dx;
            y += sy;
        }
    }
}

/// Draw a thicker line (for wide stroke widths)
pub fn draw_thick_line(
    canvas: &mut BrailleCanvas,
    x0: i32,
    y0: i32,
    x1: i32,
    y1: i32,
    color: Color,
) {
    draw_line(canvas, x0, y0, x1, y1, color);
    draw_line(canvas, x0 + 1, y0, x1 + 1, y1, color);
    draw_line(canvas, x0, y0 + 1, x1, y1 + 1, color);
}

/// Stroke a polygon outline, including the closing edge
pub fn draw_polygon(canvas: &mut BrailleCanvas, pts: &[(i32, i32)], color: Color, thick: bool) {
    if pts.len() < 2 {
        return;
    }

    for i in 0..pts.len() {
        let (x0, y0) = pts[i];
        let (x1, y1) = pts[(i + 1) % pts.len()];
        if thick {
            draw_thick_line(canvas, x0, y0, x1, y1, color);
        } else {
            draw_line(canvas, x0, y0, x1, y1, color);
        }
    }
}

/// Fill a polygon using even-odd scanline rasterization.
/// Scanlines are sampled at pixel centers (y + 0.5) so that edges
/// shared between adjacent polygons are not filled twice.
pub fn fill_polygon(canvas: &mut BrailleCanvas, pts: &[(i32, i32)], color: Color) {
    if pts.len() < 3 {
        return;
    }

    let max_px = (canvas.width() * 2) as i32;
    let max_py = (canvas.height() * 4) as i32;

    let min_y = pts.iter().map(|p| p.1).min().unwrap_or(0).max(0);
    let max_y = pts.iter().map(|p| p.1).max().unwrap_or(0).min(max_py - 1);

    let mut crossings: Vec<f64> = Vec::new();

    for y in min_y..=max_y {
        let yc = y as f64 + 0.5;
        crossings.clear();

        for i in 0..pts.len() {
            let (xa, ya) = pts[i];
            let (xb, yb) = pts[(i + 1) % pts.len()];
            let (ya, yb) = (ya as f64, yb as f64);

            // Half-open edge test avoids double counting at vertices
            if (ya <= yc && yb > yc) || (yb <= yc && ya > yc) {
                let t = (yc - ya) / (yb - ya);
                crossings.push(xa as f64 + t * (xb - xa) as f64);
            }
        }

        crossings.sort_by(|a, b| a.partial_cmp(b).unwrap());

        for pair in crossings.chunks_exact(2) {
            let x0 = (pair[0].ceil() as i32).max(0);
            let x1 = (pair[1].floor() as i32).min(max_px - 1);
            for x in x0..=x1 {
                canvas.set_pixel_signed(x, y, color);
            }
        }
    }
}
