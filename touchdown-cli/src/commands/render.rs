//! Render command - draws the glide slope overlay of a trace to a PNG.
//!
//! Overlay geometry uses a y-up window frame; the pixmap transform flips it
//! so the runway sits at the bottom of the image.

use std::path::{Path, PathBuf};

use console::style;
use tiny_skia::{Color, FillRule, Paint, PathBuilder, Pixmap, Stroke, Transform};
use touchdown::glide_slope::{GlidePath, Line, PathMode, Point};
use touchdown::GlideSlope;

use super::common::{overlay_frame, print_setting_warnings, replay_trace, ResolvedSettings};
use crate::error::CliError;

/// RGBA colour.
type Rgba = [u8; 4];

const BACKGROUND: Rgba = [0, 0, 0, 192];
const FRAME: Rgba = [255, 255, 255, 128];
const GRID: Rgba = [255, 255, 255, 51];
const SLOPE_OUTER: Rgba = [255, 255, 255, 51];
const SLOPE_INNER: Rgba = [255, 255, 255, 64];
const SLOPE_CENTER: Rgba = [255, 255, 255, 77];
const PATH_BEFORE: Rgba = [255, 0, 0, 255];
const PATH_AFTER: Rgba = [0, 255, 0, 255];

const LINE_WIDTH: f32 = 1.0;

/// Arguments for the render command.
pub struct RenderArgs {
    pub trace: PathBuf,
    pub output: PathBuf,
    pub width: u32,
    pub height: u32,
    pub settings: ResolvedSettings,
}

/// Run the render command.
pub fn run(args: RenderArgs) -> Result<(), CliError> {
    print_setting_warnings(&args.settings);
    let frame = overlay_frame(args.width, args.height)?;
    let replay = replay_trace(&args.trace, &args.settings.loaded.settings, frame)?;

    let glide_slope = replay.session.glide_slope(frame);
    let path = &replay.path;
    let pixmap = draw_overlay(&glide_slope, path)?;
    save(&pixmap, &args.output)?;

    println!(
        "{} {} ({}x{}, {} path)",
        style("Wrote").green().bold(),
        args.output.display(),
        args.width,
        args.height,
        path.mode
    );

    // Text is not rasterized; the info block goes to stdout instead.
    if let Some(last) = replay.session.history().last() {
        for line in glide_slope.info_lines(last) {
            println!("  {}", line);
        }
    }

    Ok(())
}

/// Draw frame, grid, slope wedges and flight path.
pub fn draw_overlay(glide_slope: &GlideSlope, path: &GlidePath) -> Result<Pixmap, CliError> {
    let frame = glide_slope.frame();
    let width = frame.width().round() as u32;
    let height = frame.height().round() as u32;
    let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
        CliError::Render(format!("invalid image size {}x{}", width, height))
    })?;
    pixmap.fill(Color::from_rgba8(
        BACKGROUND[0],
        BACKGROUND[1],
        BACKGROUND[2],
        BACKGROUND[3],
    ));

    let mut canvas = Canvas {
        pixmap: &mut pixmap,
        transform: Transform::from_row(1.0, 0.0, 0.0, -1.0, 0.0, frame.height()),
    };

    canvas.stroke_polygon(
        &[
            frame.bottom_left(),
            Point::new(frame.left, frame.top),
            frame.top_right(),
            Point::new(frame.right, frame.bottom),
        ],
        FRAME,
    );

    for line in glide_slope.grid_lines() {
        canvas.stroke_line(&line, GRID);
    }

    let wedges = glide_slope.slope_wedges();
    canvas.fill_polygon(&wedges.outer, SLOPE_OUTER);
    canvas.fill_polygon(&wedges.inner, SLOPE_INNER);
    canvas.stroke_line(&wedges.center, SLOPE_CENTER);

    canvas.stroke_polyline(&path.pre_landing, PATH_BEFORE);
    if path.mode == PathMode::Landing {
        canvas.stroke_polyline(&path.post_landing, PATH_AFTER);
    }

    Ok(pixmap)
}

fn save(pixmap: &Pixmap, output: &Path) -> Result<(), CliError> {
    pixmap.save_png(output).map_err(|e| {
        CliError::Render(format!("failed to write {}: {}", output.display(), e))
    })
}

/// Pixmap plus the window-to-image transform.
struct Canvas<'a> {
    pixmap: &'a mut Pixmap,
    transform: Transform,
}

impl Canvas<'_> {
    fn paint(color: Rgba) -> Paint<'static> {
        let mut paint = Paint::default();
        paint.set_color_rgba8(color[0], color[1], color[2], color[3]);
        paint.anti_alias = true;
        paint
    }

    fn stroke(&mut self, path: Option<tiny_skia::Path>, color: Rgba) {
        // Fewer than two points yield no path.
        let Some(path) = path else {
            return;
        };
        let stroke = Stroke {
            width: LINE_WIDTH,
            ..Stroke::default()
        };
        self.pixmap
            .stroke_path(&path, &Self::paint(color), &stroke, self.transform, None);
    }

    fn stroke_line(&mut self, line: &Line, color: Rgba) {
        self.stroke_polyline(&[line.from, line.to], color);
    }

    fn stroke_polyline(&mut self, points: &[Point], color: Rgba) {
        self.stroke(build_path(points, false), color);
    }

    fn stroke_polygon(&mut self, points: &[Point], color: Rgba) {
        self.stroke(build_path(points, true), color);
    }

    fn fill_polygon(&mut self, points: &[Point], color: Rgba) {
        if let Some(path) = build_path(points, true) {
            self.pixmap.fill_path(
                &path,
                &Self::paint(color),
                FillRule::Winding,
                self.transform,
                None,
            );
        }
    }
}

fn build_path(points: &[Point], closed: bool) -> Option<tiny_skia::Path> {
    let (first, rest) = points.split_first()?;
    let mut builder = PathBuilder::new();
    builder.move_to(first.x, first.y);
    for point in rest {
        builder.line_to(point.x, point.y);
    }
    if closed {
        builder.close();
    }
    builder.finish()
}
