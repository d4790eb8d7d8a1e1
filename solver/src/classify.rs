use image::{Rgb, RgbaImage};
use log::{debug, trace};

use crate::error::{MazeError, MazeResult};
use crate::grid::{GridMap, Point};
use crate::palette::{color_distance, Label, Palette};

/// The labeled grid together with the chosen endpoints
#[derive(Debug, Clone)]
pub struct Classified {
    pub map: GridMap,
    pub source: Point,
    pub destination: Point,
}

/// Tracks the pixel with the smallest distance to one marker color. Only a
/// strictly smaller distance replaces the current best, so the first pixel in
/// scan order wins ties.
#[derive(Debug, Default)]
struct Closest(Option<(i32, Point)>);

impl Closest {
    fn offer(&mut self, distance: i32, point: Point) {
        match self.0 {
            Some((best, _)) if best <= distance => {}
            _ => self.0 = Some((distance, point)),
        }
    }
}

/// The label whose color is nearest, ties going to the earlier label
pub fn nearest_label(color: Rgb<u8>, palette: &Palette) -> Label {
    let mut best = Label::Space;
    let mut best_distance = i32::MAX;

    for label in Label::CLASSIFIED {
        let d = color_distance(color, palette.color(label));
        if d < best_distance {
            best = label;
            best_distance = d;
        }
    }

    best
}

/// Turn a decoded image into a labeled grid. Alpha is ignored.
///
/// Every pixel becomes a wall or open space depending on its nearest palette
/// color. The source is the single pixel closest to the source color over the
/// whole image, even if some other label is nearer for that pixel; the same
/// goes for the destination.
pub fn classify(img: &RgbaImage, palette: &Palette) -> MazeResult<Classified> {
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(MazeError::EmptyImage { width, height });
    }

    let mut map = GridMap::new(height as usize, width as usize);
    let mut source = Closest::default();
    let mut destination = Closest::default();

    // enumerate_pixels walks in row-major order, which the tie-break relies on
    for (x, y, pixel) in img.enumerate_pixels() {
        let point = Point {
            row: y as usize,
            col: x as usize,
        };
        let color = Rgb([pixel.0[0], pixel.0[1], pixel.0[2]]);

        source.offer(color_distance(color, palette.color(Label::Source)), point);
        destination.offer(
            color_distance(color, palette.color(Label::Destination)),
            point,
        );

        // pixels nearest to a marker color that are not chosen as the marker are open space
        if nearest_label(color, palette) == Label::Block {
            map.set(point, Label::Block);
        }
    }

    // both are always set for a non-empty image
    let (Some((_, source)), Some((_, destination))) = (source.0, destination.0) else {
        return Err(MazeError::EmptyImage { width, height });
    };

    map.set(source, Label::Source);
    map.set(destination, Label::Destination);

    debug!("source {}, destination {}", source, destination);
    trace!("labeled grid:\n{}", map);

    Ok(Classified {
        map,
        source,
        destination,
    })
}
