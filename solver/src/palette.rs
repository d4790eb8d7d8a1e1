use std::fmt::Display;

use image::Rgb;

use crate::error::{MazeError, MazeResult};

/// The semantic role of a pixel. The discriminant doubles as the palette index.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Label {
    #[default]
    Space = 0,
    Block = 1,
    Source = 2,
    Destination = 3,
    /// Only ever introduced by the renderers, never by the classifier
    Path = 4,
}

impl Label {
    /// The labels a pixel can be classified as, in tie-breaking order
    pub const CLASSIFIED: [Label; 4] = [
        Label::Space,
        Label::Block,
        Label::Source,
        Label::Destination,
    ];

    pub fn index(self) -> u8 {
        self as u8
    }
}

impl Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Label::Space => " ",
                Label::Block => "X",
                Label::Source => "S",
                Label::Destination => "D",
                Label::Path => "*",
            }
        )
    }
}

/// The five reference colors, stored at their semantic indices
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Palette([Rgb<u8>; 5]);

impl Palette {
    pub const LEN: usize = 5;

    pub fn new(colors: Vec<Rgb<u8>>) -> MazeResult<Self> {
        let colors: [Rgb<u8>; Self::LEN] = colors
            .try_into()
            .map_err(|c: Vec<Rgb<u8>>| MazeError::BadPalette(c.len()))?;
        Ok(Self(colors))
    }

    pub fn color(&self, label: Label) -> Rgb<u8> {
        self.0[label.index() as usize]
    }

    /// The palette as consecutive r, g, b bytes, the layout indexed-color encoders expect
    pub fn to_bytes(&self) -> Vec<u8> {
        self.0.iter().flat_map(|c| c.0).collect()
    }
}

/// Squared euclidean distance over the color channels
pub fn color_distance(a: Rgb<u8>, b: Rgb<u8>) -> i32 {
    let dr = a.0[0] as i32 - b.0[0] as i32;
    let dg = a.0[1] as i32 - b.0[1] as i32;
    let db = a.0[2] as i32 - b.0[2] as i32;
    dr * dr + dg * dg + db * db
}

/// Parse a color written as `R,G,B`, e.g. `255,128,0`
pub fn parse_color(s: &str) -> MazeResult<Rgb<u8>> {
    let bad = || MazeError::BadColor(s.to_string());

    let fields: Vec<&str> = s.split(',').collect();
    if fields.len() != 3 {
        return Err(bad());
    }

    let mut rgb = [0u8; 3];
    for (channel, field) in rgb.iter_mut().zip(fields) {
        // u8::from_str would accept a leading '+'
        if field.is_empty() || !field.bytes().all(|b| b.is_ascii_digit()) {
            return Err(bad());
        }
        *channel = field.parse().map_err(|_| bad())?;
    }

    Ok(Rgb(rgb))
}
