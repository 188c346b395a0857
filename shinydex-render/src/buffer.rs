/// An RGBA pixel buffer representing a captured image.
#[derive(Debug, Clone)]
pub struct RenderBuffer {
    pub width: u32,
    pub height: u32,
    /// RGBA pixel data, 4 bytes per pixel, row-major order.
    pub pixels: Vec<u8>,
}

impl RenderBuffer {
    /// Create a new opaque buffer filled with `background`.
    pub fn filled(width: u32, height: u32, background: [u8; 3]) -> Self {
        let [r, g, b] = background;
        let pixels = [r, g, b, 255].repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// The RGBA value at `(x, y)`, or `None` outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = &self.pixels[idx..idx + 4];
        Some([px[0], px[1], px[2], px[3]])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filled_buffer_is_opaque_background() {
        let buf = RenderBuffer::filled(3, 2, [0x1a, 0x1a, 0x1a]);
        assert_eq!(buf.pixels.len(), 3 * 2 * 4);
        for chunk in buf.pixels.chunks_exact(4) {
            assert_eq!(chunk, &[0x1a, 0x1a, 0x1a, 255]);
        }
        assert_eq!(buf.pixel(2, 1), Some([0x1a, 0x1a, 0x1a, 255]));
        assert_eq!(buf.pixel(3, 0), None);
    }
}
