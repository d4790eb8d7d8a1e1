use std::{
    fs,
    io::{Cursor, ErrorKind},
    path::{Path, PathBuf},
};

use image::{io::Reader as ImageReader, RgbaImage};
use log::{info, warn};

use crate::classify::classify;
use crate::error::{MazeError, MazeResult};
use crate::palette::{parse_color, Label, Palette};
use crate::render::{animate, encode_png, still};

/// What to write, chosen by the output file suffix
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum OutputKind {
    /// Animated GIF revealing the path step by step
    Animation,
    /// Single PNG with the whole path drawn
    Still,
}

impl OutputKind {
    pub fn from_path(path: &Path) -> MazeResult<Self> {
        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");

        if ext.eq_ignore_ascii_case("gif") {
            Ok(OutputKind::Animation)
        } else if ext.eq_ignore_ascii_case("png") {
            Ok(OutputKind::Still)
        } else {
            Err(MazeError::bad_args(format!(
                "output file '{}' must end in .gif or .png",
                path.display()
            )))
        }
    }
}

/// Animation length in seconds; must be a finite number above zero
pub fn parse_duration(s: &str) -> MazeResult<f64> {
    match s.parse::<f64>() {
        Ok(d) if d.is_finite() && d > 0.0 => Ok(d),
        _ => Err(MazeError::BadDuration(s.to_string())),
    }
}

/// Validated settings for one run
#[derive(Debug, Clone)]
pub struct SolveConfig {
    pub input: PathBuf,
    pub output: PathBuf,
    pub kind: OutputKind,
    pub duration: f64,
    pub palette: Palette,
}

impl SolveConfig {
    /// Validate the raw arguments. Colors are given in label order: space, block,
    /// source, destination, path.
    pub fn new<S: AsRef<str>>(
        input: PathBuf,
        output: PathBuf,
        duration: &str,
        colors: &[S],
    ) -> MazeResult<Self> {
        let kind = OutputKind::from_path(&output)?;
        let duration = parse_duration(duration)?;
        let colors = colors
            .iter()
            .map(|c| parse_color(c.as_ref()))
            .collect::<MazeResult<Vec<_>>>()?;
        let palette = Palette::new(colors)?;

        Ok(Self {
            input,
            output,
            kind,
            duration,
            palette,
        })
    }
}

/// Read and decode an image, sniffing the format from its content
pub fn load_image(path: &Path) -> MazeResult<RgbaImage> {
    let bytes = fs::read(path)?;

    let reader = ImageReader::new(Cursor::new(bytes)).with_guessed_format()?;
    let Some(format) = reader.format() else {
        return Err(MazeError::Decode(format!(
            "'{}' is not a recognized image format",
            path.display()
        )));
    };
    info!("input file: {}, format: {:?}", path.display(), format);

    Ok(reader.decode()?.to_rgba8())
}

/// Run the whole pipeline and return the encoded output
pub fn solve_image(img: &RgbaImage, config: &SolveConfig) -> MazeResult<Vec<u8>> {
    let palette = &config.palette;
    for label in Label::CLASSIFIED {
        info!("{:<12} color: {:?}", format!("{:?}", label), palette.color(label).0);
    }

    info!("parsing image into graph...");
    let classified = classify(img, palette)?;
    info!(
        "source {}, destination {}",
        classified.source, classified.destination
    );

    info!("calculating shortest path...");
    let result = classified
        .map
        .shortest_path(classified.source, classified.destination)?;
    info!("found a path of {} steps", result.hops());

    match config.kind {
        OutputKind::Animation => {
            info!("animation duration: {} s", config.duration);
            let animation = animate(&classified.map, &result.path, palette, config.duration);
            let mut bytes = Vec::new();
            animation.encode_gif(&mut bytes)?;
            Ok(bytes)
        }
        OutputKind::Still => encode_png(&still(&classified.map, &result.path, palette)),
    }
}

/// Load, solve and write; a failed write leaves no output file behind
pub fn solve(config: &SolveConfig) -> MazeResult<()> {
    let img = load_image(&config.input)?;
    let bytes = solve_image(&img, config)?;

    info!("generating {}...", config.output.display());
    if let Err(e) = fs::write(&config.output, bytes) {
        match fs::remove_file(&config.output) {
            Err(remove) if remove.kind() != ErrorKind::NotFound => warn!(
                "could not remove partial output {}: {}",
                config.output.display(),
                remove
            ),
            _ => {}
        }
        return Err(e.into());
    }

    info!("completed");
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use image::Rgba;

    const COLORS: [&str; 5] = ["255,255,255", "0,0,0", "255,0,0", "0,0,255", "0,255,0"];

    fn config(output: &str) -> SolveConfig {
        SolveConfig::new("in.png".into(), output.into(), "1.0", &COLORS).unwrap()
    }

    /// White 4x4 with a wall hanging down the second column, red top left, blue top right
    fn maze() -> RgbaImage {
        RgbaImage::from_fn(4, 4, |x, y| match (x, y) {
            (0, 0) => Rgba([255, 0, 0, 255]),
            (3, 0) => Rgba([0, 0, 255, 255]),
            (1, 0..=2) => Rgba([0, 0, 0, 255]),
            _ => Rgba([255, 255, 255, 255]),
        })
    }

    #[test]
    fn test_output_kind() {
        assert_eq!(
            OutputKind::from_path(Path::new("out.gif")).unwrap(),
            OutputKind::Animation
        );
        assert_eq!(
            OutputKind::from_path(Path::new("a/b/out.PNG")).unwrap(),
            OutputKind::Still
        );
        for bad in ["out.jpg", "out", "gif", "out.gif.bak"] {
            assert!(matches!(
                OutputKind::from_path(Path::new(bad)),
                Err(MazeError::BadArgs(_))
            ));
        }
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("2.5").unwrap(), 2.5);
        assert_eq!(parse_duration("3").unwrap(), 3.0);
        for bad in ["0", "-1", "abc", "", "inf", "NaN"] {
            assert!(matches!(parse_duration(bad), Err(MazeError::BadDuration(_))));
        }
    }

    #[test]
    fn test_config_validation() {
        let c = config("out.gif");
        assert_eq!(c.kind, OutputKind::Animation);
        assert_eq!(c.palette.color(Label::Path).0, [0, 255, 0]);

        assert!(matches!(
            SolveConfig::new("in.png".into(), "out.gif".into(), "1", &COLORS[..4]),
            Err(MazeError::BadPalette(4))
        ));
        assert!(matches!(
            SolveConfig::new(
                "in.png".into(),
                "out.gif".into(),
                "1",
                &["1,2,3", "1,2,3", "1,2", "1,2,3", "1,2,3"]
            ),
            Err(MazeError::BadColor(_))
        ));
        assert!(matches!(
            SolveConfig::new("in.png".into(), "out.bmp".into(), "1", &COLORS),
            Err(MazeError::BadArgs(_))
        ));
    }

    #[test]
    fn test_solve_image_still() {
        let bytes = solve_image(&maze(), &config("out.png")).unwrap();
        let out = image::load_from_memory(&bytes).unwrap().to_rgb8();

        assert_eq!(out.dimensions(), (4, 4));
        assert_eq!(out.get_pixel(0, 0).0, [255, 0, 0]);
        assert_eq!(out.get_pixel(3, 0).0, [0, 255, 0]);
        assert_eq!(out.get_pixel(1, 1).0, [0, 0, 0]);
        // the path has to go around the wall through row 3
        assert_eq!(out.get_pixel(1, 3).0, [0, 255, 0]);
    }

    #[test]
    fn test_solve_image_animation() {
        let bytes = solve_image(&maze(), &config("out.gif")).unwrap();
        assert_eq!(&bytes[..6], b"GIF89a");
    }

    #[test]
    fn test_solve_image_unreachable() {
        let mut img = maze();
        img.put_pixel(1, 3, Rgba([0, 0, 0, 255]));

        assert!(matches!(
            solve_image(&img, &config("out.png")),
            Err(MazeError::NotFound)
        ));
    }

    #[test]
    fn test_load_image_errors() {
        let dir = tempfile::tempdir().unwrap();

        let missing = dir.path().join("missing.png");
        assert!(matches!(load_image(&missing), Err(MazeError::Io(_))));

        let garbage = dir.path().join("garbage.png");
        fs::write(&garbage, b"definitely not an image").unwrap();
        assert!(matches!(load_image(&garbage), Err(MazeError::Decode(_))));
    }

    #[test]
    fn test_jpeg_input() {
        // solid 4x4 markers survive lossy compression
        let img = image::RgbImage::from_fn(16, 16, |x, y| match (x, y) {
            (0..=3, 0..=3) => image::Rgb([255, 0, 0]),
            (12..=15, 0..=3) => image::Rgb([0, 0, 255]),
            (6..=9, 0..=11) => image::Rgb([0, 0, 0]),
            _ => image::Rgb([255, 255, 255]),
        });
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maze.jpg");
        img.save(&path).unwrap();

        let loaded = load_image(&path).unwrap();
        assert_eq!(loaded.dimensions(), (16, 16));

        let c = classify(&loaded, &config("out.png").palette).unwrap();
        assert!(c.source.row < 4 && c.source.col < 4, "source {}", c.source);
        assert!(
            c.destination.row < 4 && c.destination.col >= 12,
            "destination {}",
            c.destination
        );

        let bytes = solve_image(&loaded, &config("out.png")).unwrap();
        let out = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(out.dimensions(), (16, 16));
        // the path has to pass under the wall
        assert!((12..16).any(|y| out.get_pixel(7, y).0 == [0, 255, 0]));
    }

    #[test]
    fn test_failed_write_leaves_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("maze.png");
        maze().save(&input).unwrap();

        let output = dir.path().join("missing").join("solved.png");
        let config = SolveConfig::new(input, output.clone(), "1", &COLORS).unwrap();

        assert!(matches!(solve(&config), Err(MazeError::Io(_))));
        assert!(!output.exists());
    }

    #[test]
    fn test_solve_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("maze.png");
        maze().save(&input).unwrap();

        let output = dir.path().join("solved.gif");
        let config = SolveConfig::new(input, output.clone(), "1", &COLORS).unwrap();

        solve(&config).unwrap();
        assert_eq!(&fs::read(&output).unwrap()[..6], b"GIF89a");
    }

    #[test]
    fn test_load_image_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("maze.png");
        maze().save(&path).unwrap();

        assert_eq!(load_image(&path).unwrap(), maze());
    }
}
