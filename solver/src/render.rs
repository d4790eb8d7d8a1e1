use std::{borrow::Cow, io::Write};

use image::{codecs::png::PngEncoder, ColorType, ImageEncoder, RgbImage};
use log::debug;

use crate::error::{MazeError, MazeResult};
use crate::grid::{GridMap, Point};
use crate::palette::{Label, Palette};

pub const FRAMES_PER_SECOND: u32 = 25;

/// Delay of every frame, in hundredths of a second
pub const FRAME_DELAY: u16 = (100 / FRAMES_PER_SECOND) as u16;

/// One indexed-color snapshot. Each byte of `pixels` is a palette index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub pixels: Vec<u8>,
    pub delay: u16,
}

/// A frame sequence where all frames share one palette
#[derive(Debug, Clone)]
pub struct Animation {
    pub width: u32,
    pub height: u32,
    pub palette: Palette,
    pub frames: Vec<Frame>,
}

impl Animation {
    /// Total play time in hundredths of a second
    pub fn total_delay(&self) -> u32 {
        self.frames.iter().map(|f| f.delay as u32).sum()
    }

    /// Write the animation as a looping GIF with the palette as its global color table
    pub fn encode_gif<W: Write>(&self, writer: W) -> MazeResult<()> {
        let too_large = || {
            MazeError::encode(format!(
                "{}x{} is larger than a GIF can hold",
                self.width, self.height
            ))
        };
        let width = u16::try_from(self.width).map_err(|_| too_large())?;
        let height = u16::try_from(self.height).map_err(|_| too_large())?;

        let mut encoder = gif::Encoder::new(writer, width, height, &self.palette.to_bytes())?;
        encoder.set_repeat(gif::Repeat::Infinite)?;

        for frame in &self.frames {
            let mut gif_frame = gif::Frame::default();
            gif_frame.width = width;
            gif_frame.height = height;
            gif_frame.delay = frame.delay;
            gif_frame.buffer = Cow::Borrowed(&frame.pixels);
            encoder.write_frame(&gif_frame)?;
        }

        Ok(())
    }
}

/// Palette indices of the labeled grid, row-major
fn base_frame(map: &GridMap) -> Vec<u8> {
    map.cells
        .iter()
        .flat_map(|row| row.iter().map(|label| label.index()))
        .collect()
}

/// Reveal `path` step by step at a fixed frame rate so that playback takes
/// roughly `duration` seconds.
///
/// A snapshot is taken whenever less than one step is left in the current
/// frame's budget, and always before the last step. The last step itself is
/// never shown. Short paths therefore play faster than requested, one frame
/// per step.
pub fn animate(map: &GridMap, path: &[Point], palette: &Palette, duration: f64) -> Animation {
    let mut base = base_frame(map);
    let mut frames = Vec::new();

    let steps_per_frame = path.len() as f64 / (FRAMES_PER_SECOND as f64 * duration);
    let mut remaining = steps_per_frame;

    for (i, point) in path.iter().enumerate() {
        if remaining < 1.0 || i == path.len() - 1 {
            remaining += steps_per_frame;
            frames.push(Frame {
                pixels: base.clone(),
                delay: FRAME_DELAY,
            });
        }

        base[point.row * map.columns + point.col] = Label::Path.index();
        remaining -= 1.0;
    }

    if frames.is_empty() {
        frames.push(Frame {
            pixels: base,
            delay: FRAME_DELAY,
        });
    }

    debug!(
        "{} frames for {} steps ({:.3} steps per frame)",
        frames.len(),
        path.len(),
        steps_per_frame
    );

    Animation {
        width: map.columns as u32,
        height: map.rows as u32,
        palette: *palette,
        frames,
    }
}

/// Paint the grid with its palette colors and draw the path over it. The
/// destination ends up in the path color, the source keeps its own.
pub fn still(map: &GridMap, path: &[Point], palette: &Palette) -> RgbImage {
    let mut img = RgbImage::new(map.columns as u32, map.rows as u32);

    for (point, label) in map.iter() {
        img.put_pixel(point.col as u32, point.row as u32, palette.color(label));
    }
    for point in path {
        img.put_pixel(
            point.col as u32,
            point.row as u32,
            palette.color(Label::Path),
        );
    }

    img
}

pub fn encode_png(img: &RgbImage) -> MazeResult<Vec<u8>> {
    let mut bytes = Vec::new();
    PngEncoder::new(&mut bytes)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgb8)
        .map_err(|e| MazeError::encode(e.to_string()))?;
    Ok(bytes)
}
