//! Frame assembly: packs the color buffer into a 24-bit BGR bitmap,
//! bottom-up source flipped to top-down rows, with the row bands fanned
//! out over a fixed pool of scoped worker threads.

use std::io::{self, BufWriter, Write};
use std::path::Path;

use byteorder::{LittleEndian as LE, WriteBytesExt};

use super::PixelFormat;
use crate::render::buffer::Buffer2D;
use crate::render::color::{Rgba, channels};

/// A finished frame: tightly packed B,G,R bytes, top-down row order.
#[derive(Clone, Debug, PartialEq)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub format: PixelFormat,
    pub data: Vec<u8>,
}

impl Frame {
    /// Pixel color at top-down (x, y).
    pub fn pixel(&self, x: u32, y: u32) -> Rgba {
        let i = ((y * self.width + x) * 3) as usize;
        let (b, g, r) = (self.data[i], self.data[i + 1], self.data[i + 2]);
        crate::render::color::rgb(r, g, b)
    }

    /// Re-pack into 0x00RRGGBB words for `minifb`-style presenters.
    pub fn to_argb_words(&self) -> Vec<u32> {
        self.data
            .chunks_exact(3)
            .map(|px| crate::render::color::rgb(px[2], px[1], px[0]))
            .collect()
    }

    /// Write a standard BITMAPINFOHEADER `.bmp` (rows padded to 4
    /// bytes, stored bottom-up as the format wants).
    pub fn write_bmp(&self, path: &Path) -> io::Result<()> {
        let mut out = BufWriter::new(std::fs::File::create(path)?);
        let row_bytes = self.width as usize * 3;
        let padding = (4 - row_bytes % 4) % 4;
        let image_size = (row_bytes + padding) * self.height as usize;

        // File header (14 bytes).
        out.write_all(b"BM")?;
        out.write_u32::<LE>(14 + 40 + image_size as u32)?;
        out.write_u32::<LE>(0)?;
        out.write_u32::<LE>(54)?;
        // BITMAPINFOHEADER (40 bytes).
        out.write_u32::<LE>(40)?;
        out.write_i32::<LE>(self.width as i32)?;
        out.write_i32::<LE>(self.height as i32)?;
        out.write_u16::<LE>(1)?; // planes
        out.write_u16::<LE>(24)?; // bits per pixel
        out.write_u32::<LE>(0)?; // BI_RGB, uncompressed
        out.write_u32::<LE>(image_size as u32)?;
        out.write_i32::<LE>(2835)?; // 72 dpi
        out.write_i32::<LE>(2835)?;
        out.write_u32::<LE>(0)?;
        out.write_u32::<LE>(0)?;

        let pad = [0u8; 3];
        for y in (0..self.height as usize).rev() {
            let row = &self.data[y * row_bytes..(y + 1) * row_bytes];
            out.write_all(row)?;
            out.write_all(&pad[..padding])?;
        }
        out.flush()
    }
}

/// Pack the color buffer. Source row 0 is the bottom of the image; the
/// output is top-down, so source row `y` lands on output row
/// `height - 1 - y`.
///
/// `workers` caps the scoped-thread fan-out; each worker owns a
/// disjoint band of output rows and only reads the shared source, so
/// the single join at scope exit is the only synchronization.
pub(crate) fn pack_frame(color: &Buffer2D<Rgba>, workers: usize) -> Frame {
    let (width, height) = (color.width(), color.height());
    let row_bytes = width * 3;
    let mut data = vec![0u8; row_bytes * height];

    let band_rows = height.div_ceil(workers.max(1)).max(1);
    std::thread::scope(|scope| {
        for (band, chunk) in data.chunks_mut(band_rows * row_bytes).enumerate() {
            scope.spawn(move || {
                for (local, row) in chunk.chunks_mut(row_bytes).enumerate() {
                    let y_out = band * band_rows + local;
                    let y_src = height - 1 - y_out;
                    for x in 0..width {
                        let (r, g, b) = channels(color.get(x, y_src));
                        row[x * 3] = b;
                        row[x * 3 + 1] = g;
                        row[x * 3 + 2] = r;
                    }
                }
            });
        }
    });

    Frame {
        width: width as u32,
        height: height as u32,
        format: PixelFormat::Bgr24,
        data,
    }
}
