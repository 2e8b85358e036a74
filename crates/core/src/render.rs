//! Terminal presentation helpers
//!
//! Values are drawn at grid vertices: a vertex averages the up to four cells
//! that touch it, so an `R x C` grid renders as `(R+1) x (C+1)` glyphs. Colour
//! uses a symmetric scale around zero, blue for negative and red for positive.

use std::fmt::Write;

use crate::core_types::FieldData;

/// Shading glyphs from faint to saturated
pub const SHADES: [char; 5] = ['·', '░', '▒', '▓', '█'];

/// Smallest colour scale, so an all-zero grid still renders
pub const MIN_SCALE: f32 = 1e-6;

/// Largest absolute finite value, never below [`MIN_SCALE`]
#[must_use]
pub fn symmetric_scale(values: &[f32]) -> f32 {
    values
        .iter()
        .filter(|v| v.is_finite())
        .fold(MIN_SCALE, |acc, v| acc.max(v.abs()))
}

/// Mean of the cells touching vertex `(vi, vj)`
///
/// Vertex `(vi, vj)` touches cells `(vi-1..=vi, vj-1..=vj)` that are in bounds.
#[must_use]
pub fn vertex_average(values: &[f32], rows: usize, cols: usize, vi: usize, vj: usize) -> f32 {
    let mut sum = 0.0;
    let mut count = 0u32;
    for ci in vi.saturating_sub(1)..=vi {
        for cj in vj.saturating_sub(1)..=vj {
            if ci < rows && cj < cols {
                sum += values[ci * cols + cj];
                count += 1;
            }
        }
    }
    if count == 0 {
        0.0
    } else {
        sum / count as f32
    }
}

/// Vertex-averaged copy of a row-major array, shape `(rows+1) x (cols+1)`
#[must_use]
pub fn vertex_values(values: &[f32], rows: usize, cols: usize) -> FieldData {
    let mut out = FieldData::new(rows + 1, cols + 1);
    for vi in 0..=rows {
        for vj in 0..=cols {
            out.set(vi, vj, vertex_average(values, rows, cols, vi, vj));
        }
    }
    out
}

/// Hue in degrees: 240 (blue) at `vmin`, 0 (red) at `vmax`
#[must_use]
pub fn hue(value: f32, vmin: f32, vmax: f32) -> f32 {
    let half = (vmax - vmin) / 2.0;
    let t = if half > 0.0 && value.is_finite() {
        ((value - (vmin + vmax) / 2.0) / half).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    240.0 * (1.0 - (t + 1.0) / 2.0)
}

/// RGB for `hsl(hue, 100%, 50%)`
#[must_use]
pub fn hue_to_rgb(hue: f32) -> (u8, u8, u8) {
    let sector = hue.rem_euclid(360.0) / 60.0;
    let ramp = 1.0 - ((sector % 2.0) - 1.0).abs();
    let (red, green, blue) = match sector as u32 {
        0 => (1.0, ramp, 0.0),
        1 => (ramp, 1.0, 0.0),
        2 => (0.0, 1.0, ramp),
        3 => (0.0, ramp, 1.0),
        4 => (ramp, 0.0, 1.0),
        _ => (1.0, 0.0, ramp),
    };
    let to_byte = |c: f32| (c * 255.0).round() as u8;
    (to_byte(red), to_byte(green), to_byte(blue))
}

/// Glyph for `|value| / scale`, clamped to `[0, 1]`
#[must_use]
pub fn shade(value: f32, scale: f32) -> char {
    let mag = if scale > 0.0 && value.is_finite() {
        (value.abs() / scale).min(1.0)
    } else {
        0.0
    };
    let last = SHADES.len() - 1;
    SHADES[((mag * last as f32).round() as usize).min(last)]
}

/// Render a row-major array as vertex glyphs, one text line per vertex row
///
/// With `color` set each glyph is wrapped in a 24-bit ANSI foreground escape.
#[must_use]
pub fn render_heatmap(values: &[f32], rows: usize, cols: usize, color: bool) -> String {
    let vertices = vertex_values(values, rows, cols);
    let scale = symmetric_scale(vertices.as_slice());
    let mut out = String::with_capacity((rows + 1) * (cols + 2) * if color { 24 } else { 2 });

    for vi in 0..vertices.rows {
        for vj in 0..vertices.cols {
            let value = vertices.get(vi, vj);
            let glyph = shade(value, scale);
            if color {
                let (r, g, b) = hue_to_rgb(hue(value, -scale, scale));
                let _ = write!(out, "\x1b[38;2;{r};{g};{b}m{glyph}\x1b[0m");
            } else {
                out.push(glyph);
            }
            out.push(' ');
        }
        out.push('\n');
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_vertex_average_corners_and_interior() {
        let values = [1.0, 2.0, 3.0, 4.0];
        // Corner vertex touches one cell
        assert_eq!(vertex_average(&values, 2, 2, 0, 0), 1.0);
        assert_eq!(vertex_average(&values, 2, 2, 2, 2), 4.0);
        // Edge vertex touches two
        assert_eq!(vertex_average(&values, 2, 2, 0, 1), 1.5);
        // Centre vertex touches all four
        assert_eq!(vertex_average(&values, 2, 2, 1, 1), 2.5);
    }

    #[test]
    fn test_vertex_values_shape() {
        let field = vertex_values(&[0.0; 12], 3, 4);
        assert!(field.has_shape(4, 5));
    }

    #[test]
    fn test_hue_endpoints() {
        assert_relative_eq!(hue(-1.0, -1.0, 1.0), 240.0);
        assert_relative_eq!(hue(0.0, -1.0, 1.0), 120.0);
        assert_relative_eq!(hue(1.0, -1.0, 1.0), 0.0);
        // Out of range clamps
        assert_relative_eq!(hue(5.0, -1.0, 1.0), 0.0);
        // Degenerate range sits at the midpoint
        assert_relative_eq!(hue(3.0, 0.0, 0.0), 120.0);
    }

    #[test]
    fn test_hue_to_rgb_primaries() {
        assert_eq!(hue_to_rgb(0.0), (255, 0, 0));
        assert_eq!(hue_to_rgb(120.0), (0, 255, 0));
        assert_eq!(hue_to_rgb(240.0), (0, 0, 255));
    }

    #[test]
    fn test_symmetric_scale_ignores_non_finite() {
        assert_eq!(symmetric_scale(&[0.5, -2.0, f32::NAN]), 2.0);
        assert_eq!(symmetric_scale(&[0.0, 0.0]), MIN_SCALE);
    }

    #[test]
    fn test_shade_levels() {
        assert_eq!(shade(0.0, 1.0), '·');
        assert_eq!(shade(-1.0, 1.0), '█');
        assert_eq!(shade(0.5, 1.0), '▒');
        assert_eq!(shade(10.0, 1.0), '█');
    }

    #[test]
    fn test_render_heatmap_plain() {
        let text = render_heatmap(&[0.0, 0.0, 0.0, 1.0], 2, 2, false);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "· · · ");
        assert!(lines[2].ends_with("█ "));
    }
}
