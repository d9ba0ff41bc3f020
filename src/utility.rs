use macroquad::color::{Color, BLACK};
use macroquad::math::Vec2;

/// Diverging blue-white-red map. `scale` is the magnitude drawn fully saturated.
pub(crate) fn vorticity_color(vorticity: f64, scale: f64) -> Color {
    let t = (vorticity / scale).clamp(-1.0, 1.0) as f32;
    if t.is_nan() {
        return BLACK;
    }
    if t >= 0.0 {
        Color::new(1.0, 1.0 - t, 1.0 - t, 1.0)
    } else {
        Color::new(1.0 + t, 1.0 + t, 1.0, 1.0)
    }
}

/// Lattice cell under a screen position. Lattice `y` grows upwards, screen `y` downwards.
pub(crate) fn cell_under(
    screen: Vec2,
    cell_size: f32,
    (nx, ny): (usize, usize),
) -> Option<(usize, usize)> {
    if screen.x < 0.0 || screen.y < 0.0 {
        return None;
    }
    let col = (screen.x / cell_size) as usize;
    let row = (screen.y / cell_size) as usize;
    if col >= nx || row >= ny {
        return None;
    }
    Some((col, ny - 1 - row))
}

/// Image row holding lattice row `y`.
pub(crate) fn image_row(y: usize, ny: usize) -> u32 {
    (ny - 1 - y) as u32
}
