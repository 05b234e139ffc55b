use serde::{Deserialize, Serialize};

use crate::{CanvasError, History, Snapshot};

const HEADER_LEN: usize = 8;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum Tool {
    Brush,
    Eraser,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StrokeColor {
    Red,
    Green,
    Blue,
}

impl StrokeColor {
    pub fn rgba(self) -> [u8; 4] {
        match self {
            StrokeColor::Red => [0xef, 0x44, 0x44, 0xff],
            StrokeColor::Green => [0x10, 0xb9, 0x81, 0xff],
            StrokeColor::Blue => [0x3b, 0x82, 0xf6, 0xff],
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Brush {
    pub tool: Tool,
    pub color: StrokeColor,
    pub size: u32,
}

impl Default for Brush {
    fn default() -> Self {
        Self {
            tool: Tool::Brush,
            color: StrokeColor::Red,
            size: 5,
        }
    }
}

/// RGBA raster the edit modal draws on, paired with its snapshot history.
///
/// A stroke is begin -> extend* -> finish; finishing pushes exactly one
/// snapshot, matching save-on-pointer-up. `clear` pushes a fresh blank
/// snapshot so it is itself undoable.
pub struct Surface {
    width: u32,
    height: u32,
    pixels: Vec<u8>,
    brush: Brush,
    history: History,
    last_point: Option<(f32, f32)>,
}

impl Surface {
    pub fn new(width: u32, height: u32) -> Self {
        let mut surface = Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
            brush: Brush::default(),
            history: History::new(),
            last_point: None,
        };
        // Baseline snapshot: the blank surface is always reachable by undo.
        let initial = surface.snapshot();
        surface.history.push(initial);
        surface
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn brush(&self) -> Brush {
        self.brush
    }

    pub fn set_brush(&mut self, brush: Brush) {
        self.brush = brush;
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y * self.width + x) * 4) as usize;
        let mut rgba = [0; 4];
        rgba.copy_from_slice(&self.pixels[offset..offset + 4]);
        Some(rgba)
    }

    /// Fill the surface from an opaque image reference (a thumbnail URL in
    /// the mock) and record the loaded state as the editing baseline. The
    /// fill color is derived from the reference so distinct images produce
    /// distinct rasters.
    pub fn load_reference(&mut self, reference: &str) {
        let seed = fnv1a(reference.as_bytes());
        let rgba = [
            (seed >> 16) as u8,
            (seed >> 8) as u8,
            seed as u8,
            0xff,
        ];
        for chunk in self.pixels.chunks_exact_mut(4) {
            chunk.copy_from_slice(&rgba);
        }
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    pub fn begin_stroke(&mut self, x: f32, y: f32) {
        self.last_point = Some((x, y));
        self.stamp(x, y);
    }

    pub fn stroke_to(&mut self, x: f32, y: f32) {
        let Some((last_x, last_y)) = self.last_point else {
            return;
        };
        self.draw_segment(last_x, last_y, x, y);
        self.last_point = Some((x, y));
    }

    /// Pointer-up: one snapshot per completed stroke.
    pub fn end_stroke(&mut self) {
        if self.last_point.take().is_some() {
            let snapshot = self.snapshot();
            self.history.push(snapshot);
        }
    }

    /// Wipe the raster and push the blank state onto the history.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
        let snapshot = self.snapshot();
        self.history.push(snapshot);
    }

    /// Step back one snapshot and redraw from it. Returns false at the
    /// undo floor.
    pub fn undo(&mut self) -> Result<bool, CanvasError> {
        let Some(snapshot) = self.history.undo().cloned() else {
            return Ok(false);
        };
        self.apply_snapshot(&snapshot)?;
        Ok(true)
    }

    /// Step forward one snapshot and redraw from it. Returns false at the
    /// end of history.
    pub fn redo(&mut self) -> Result<bool, CanvasError> {
        let Some(snapshot) = self.history.redo().cloned() else {
            return Ok(false);
        };
        self.apply_snapshot(&snapshot)?;
        Ok(true)
    }

    /// Serialize the full raster: dimensions header followed by raw RGBA.
    pub fn snapshot(&self) -> Snapshot {
        let mut bytes = Vec::with_capacity(HEADER_LEN + self.pixels.len());
        bytes.extend_from_slice(&self.width.to_le_bytes());
        bytes.extend_from_slice(&self.height.to_le_bytes());
        bytes.extend_from_slice(&self.pixels);
        Snapshot::new(bytes)
    }

    /// Redraw the raster from a snapshot produced by this surface.
    pub fn apply_snapshot(&mut self, snapshot: &Snapshot) -> Result<(), CanvasError> {
        let bytes = snapshot.bytes();
        let expected = HEADER_LEN + self.pixels.len();
        if bytes.len() != expected {
            return Err(CanvasError::SnapshotSize {
                len: bytes.len(),
                expected,
            });
        }
        let width = u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]);
        let height = u32::from_le_bytes([bytes[4], bytes[5], bytes[6], bytes[7]]);
        if width != self.width || height != self.height {
            return Err(CanvasError::SnapshotDimensions { width, height });
        }
        self.pixels.copy_from_slice(&bytes[HEADER_LEN..]);
        Ok(())
    }

    fn draw_segment(&mut self, x0: f32, y0: f32, x1: f32, y1: f32) {
        // Bresenham over rounded endpoints, stamping the brush disc at each
        // step so thick strokes stay round-capped.
        let mut x = x0.round() as i64;
        let mut y = y0.round() as i64;
        let end_x = x1.round() as i64;
        let end_y = y1.round() as i64;

        let dx = (end_x - x).abs();
        let dy = -(end_y - y).abs();
        let step_x = if x < end_x { 1 } else { -1 };
        let step_y = if y < end_y { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.stamp(x as f32, y as f32);
            if x == end_x && y == end_y {
                break;
            }
            let doubled = 2 * err;
            if doubled >= dy {
                err += dy;
                x += step_x;
            }
            if doubled <= dx {
                err += dx;
                y += step_y;
            }
        }
    }

    fn stamp(&mut self, x: f32, y: f32) {
        let rgba = match self.brush.tool {
            Tool::Brush => self.brush.color.rgba(),
            Tool::Eraser => [0, 0, 0, 0],
        };
        let radius = (self.brush.size / 2).max(1) as i64;
        let cx = x.round() as i64;
        let cy = y.round() as i64;
        for oy in -radius..=radius {
            for ox in -radius..=radius {
                if ox * ox + oy * oy > radius * radius {
                    continue;
                }
                let px = cx + ox;
                let py = cy + oy;
                if px < 0 || py < 0 || px >= self.width as i64 || py >= self.height as i64 {
                    continue;
                }
                let offset = ((py as u32 * self.width + px as u32) * 4) as usize;
                self.pixels[offset..offset + 4].copy_from_slice(&rgba);
            }
        }
    }
}

fn fnv1a(bytes: &[u8]) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in bytes {
        hash ^= u32::from(*byte);
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stroke(surface: &mut Surface, from: (f32, f32), to: (f32, f32)) {
        surface.begin_stroke(from.0, from.1);
        surface.stroke_to(to.0, to.1);
        surface.end_stroke();
    }

    #[test]
    fn stroke_paints_and_pushes_one_snapshot() {
        let mut surface = Surface::new(64, 64);
        assert_eq!(surface.history().len(), 1);

        stroke(&mut surface, (10.0, 10.0), (30.0, 10.0));
        assert_eq!(surface.history().len(), 2);
        assert_eq!(surface.pixel(20, 10), Some(StrokeColor::Red.rgba()));
    }

    #[test]
    fn undo_restores_the_previous_raster() {
        let mut surface = Surface::new(64, 64);
        stroke(&mut surface, (10.0, 10.0), (30.0, 10.0));

        assert!(surface.undo().unwrap());
        assert_eq!(surface.pixel(20, 10), Some([0, 0, 0, 0]));

        assert!(surface.redo().unwrap());
        assert_eq!(surface.pixel(20, 10), Some(StrokeColor::Red.rgba()));
    }

    #[test]
    fn undo_at_the_floor_is_a_noop() {
        let mut surface = Surface::new(16, 16);
        assert!(!surface.undo().unwrap());
        assert!(!surface.redo().unwrap());
    }

    #[test]
    fn eraser_clears_painted_pixels() {
        let mut surface = Surface::new(64, 64);
        stroke(&mut surface, (10.0, 10.0), (30.0, 10.0));

        surface.set_brush(Brush {
            tool: Tool::Eraser,
            ..Brush::default()
        });
        stroke(&mut surface, (10.0, 10.0), (30.0, 10.0));
        assert_eq!(surface.pixel(20, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn clear_is_undoable() {
        let mut surface = Surface::new(64, 64);
        stroke(&mut surface, (10.0, 10.0), (30.0, 10.0));
        surface.clear();
        assert_eq!(surface.pixel(20, 10), Some([0, 0, 0, 0]));

        assert!(surface.undo().unwrap());
        assert_eq!(surface.pixel(20, 10), Some(StrokeColor::Red.rgba()));
    }

    #[test]
    fn load_reference_is_deterministic_per_reference() {
        let mut a = Surface::new(8, 8);
        let mut b = Surface::new(8, 8);
        a.load_reference("thumb-1");
        b.load_reference("thumb-1");
        assert_eq!(a.pixel(0, 0), b.pixel(0, 0));

        let mut c = Surface::new(8, 8);
        c.load_reference("thumb-2");
        assert_ne!(a.pixel(0, 0), c.pixel(0, 0));
    }
}
