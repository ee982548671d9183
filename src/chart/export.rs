//! Chart export to png, jpg, svg and pdf
//!
//! Every format renders the same 10 x 6 inch figure at 300 DPI with
//! plotters. Raster output goes through the `image` encoders; a pdf is a
//! single page holding the figure as a JPEG image.

use std::fs::File;
use std::io::BufWriter;
use std::ops::Range;
use std::path::Path;
use std::sync::OnceLock;

use image::codecs::jpeg::JpegEncoder;
use image::{ExtendedColorType, ImageFormat};
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};
use plotters::coord::Shift;
use plotters::coord::types::RangedCoordf64;
use plotters::drawing::DrawingAreaErrorKind;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use plotters::style::{FontStyle, register_font};
use thiserror::Error;

use crate::constants::chart::{FACE_COLOR, TITLE_COLOR};
use crate::constants::export::{
    DPI, FIGURE_HEIGHT_IN, FIGURE_WIDTH_IN, JPEG_QUALITY, POINTS_PER_INCH,
};
use crate::data::stats::{BoxSummary, Histogram};

use super::{
    Chart, ChartData, Slice, annotation, category_tick, diverging_color, format_axis_value,
    format_timestamp, palette, wedge_angles, wedge_outline,
};

const FONT_FAMILY: &str = "sans-serif";

#[derive(Debug, Error)]
pub enum SaveError {
    #[error("There is no chart to save")]
    NoChart,

    #[error("Unsupported export format: {0}")]
    UnsupportedFormat(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Rendering error: {0}")]
    Render(String),

    #[error("Font error: {0}")]
    Font(String),
}

impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for SaveError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        SaveError::Render(e.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    Png,
    Jpeg,
    Pdf,
    Svg,
}

impl ExportFormat {
    pub fn from_path(path: &Path) -> Result<Self, SaveError> {
        let extension = path
            .extension()
            .and_then(|s| s.to_str())
            .ok_or_else(|| SaveError::UnsupportedFormat("no file extension".to_string()))?;

        match extension.to_lowercase().as_str() {
            "png" => Ok(ExportFormat::Png),
            "jpg" | "jpeg" => Ok(ExportFormat::Jpeg),
            "pdf" => Ok(ExportFormat::Pdf),
            "svg" => Ok(ExportFormat::Svg),
            ext => Err(SaveError::UnsupportedFormat(format!(".{}", ext))),
        }
    }
}

/// Figure size in pixels at the export resolution
pub fn figure_pixels() -> (u32, u32) {
    (
        (FIGURE_WIDTH_IN * DPI as f64).round() as u32,
        (FIGURE_HEIGHT_IN * DPI as f64).round() as u32,
    )
}

/// Write `chart` to `path` in the format named by its extension
pub fn export(chart: Option<&Chart>, path: &Path) -> Result<(), SaveError> {
    profiling::scope!("chart::export");

    let chart = chart.ok_or(SaveError::NoChart)?;
    let format = ExportFormat::from_path(path)?;
    ensure_fonts()?;
    let (width, height) = figure_pixels();

    match format {
        ExportFormat::Png => {
            let pixels = render_rgb(chart, width, height)?;
            image::save_buffer_with_format(
                path,
                &pixels,
                width,
                height,
                ExtendedColorType::Rgb8,
                ImageFormat::Png,
            )?;
        }
        ExportFormat::Jpeg => {
            let pixels = render_rgb(chart, width, height)?;
            let file = BufWriter::new(File::create(path)?);
            JpegEncoder::new_with_quality(file, JPEG_QUALITY).encode(
                &pixels,
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
        }
        ExportFormat::Svg => {
            let root = SVGBackend::new(path, (width, height)).into_drawing_area();
            draw_chart(&root, chart)?;
            root.present()?;
        }
        ExportFormat::Pdf => {
            let pixels = render_rgb(chart, width, height)?;
            let mut jpeg = Vec::new();
            JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY).encode(
                &pixels,
                width,
                height,
                ExtendedColorType::Rgb8,
            )?;
            std::fs::write(path, pdf_document(&jpeg, width, height))?;
        }
    }

    tracing::info!(path = %path.display(), ?format, "chart exported");
    Ok(())
}

/// plotters' text rendering needs its fonts registered once per process
fn ensure_fonts() -> Result<(), SaveError> {
    static FONTS: OnceLock<Result<(), String>> = OnceLock::new();

    FONTS
        .get_or_init(|| {
            for style in [FontStyle::Normal, FontStyle::Bold] {
                register_font(FONT_FAMILY, style, epaint_default_fonts::UBUNTU_LIGHT)
                    .map_err(|_| format!("could not load the {} font", FONT_FAMILY))?;
            }
            Ok(())
        })
        .clone()
        .map_err(SaveError::Font)
}

fn render_rgb(chart: &Chart, width: u32, height: u32) -> Result<Vec<u8>, SaveError> {
    profiling::scope!("render_rgb");

    let mut pixels = vec![0u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut pixels, (width, height)).into_drawing_area();
        draw_chart(&root, chart)?;
        root.present()?;
    }
    Ok(pixels)
}

/// Font sizes are given in points and scaled to the export resolution
struct Fonts {
    scale: f64,
}

impl Fonts {
    fn new() -> Self {
        Self {
            scale: DPI as f64 / POINTS_PER_INCH,
        }
    }

    fn px(&self, points: f64) -> u32 {
        (points * self.scale).round() as u32
    }

    fn title(&self) -> TextStyle<'static> {
        (FONT_FAMILY, 14.0 * self.scale)
            .into_font()
            .style(FontStyle::Bold)
            .color(&rgb(TITLE_COLOR))
    }

    fn label(&self) -> TextStyle<'static> {
        (FONT_FAMILY, 11.0 * self.scale).into_font().color(&BLACK)
    }

    fn tick(&self) -> TextStyle<'static> {
        (FONT_FAMILY, 9.0 * self.scale).into_font().color(&BLACK)
    }

    fn annotation(&self) -> TextStyle<'static> {
        (FONT_FAMILY, 8.0 * self.scale).into_font().color(&BLACK)
    }
}

fn rgb((r, g, b): (u8, u8, u8)) -> RGBColor {
    RGBColor(r, g, b)
}

type Context<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn draw_chart<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
) -> Result<(), SaveError> {
    root.fill(&WHITE)?;
    let fonts = Fonts::new();

    match &chart.data {
        ChartData::Bars { categories, values } => draw_bars(root, chart, &fonts, categories, values),
        ChartData::Line {
            points,
            tick_labels,
            x_temporal,
        } => draw_line(root, chart, &fonts, points, tick_labels.as_deref(), *x_temporal),
        ChartData::Pie(slices) => draw_pie(root, chart, &fonts, slices),
        ChartData::Scatter(points) => draw_scatter(root, chart, &fonts, points),
        ChartData::Histogram(hist) => draw_histogram(root, chart, &fonts, hist),
        ChartData::Boxplot(summary) => draw_boxplot(root, chart, &fonts, summary),
        ChartData::Heatmap { columns, values } => draw_heatmap(root, chart, &fonts, columns, values),
    }
}

/// Titled cartesian chart with the face colour filled in
fn cartesian<'a, DB: DrawingBackend>(
    root: &'a DrawingArea<DB, Shift>,
    chart: &Chart,
    fonts: &Fonts,
    x: Range<f64>,
    y: Range<f64>,
) -> Result<Context<'a, DB>, SaveError> {
    let ctx = ChartBuilder::on(root)
        .caption(&chart.title, fonts.title())
        .margin(fonts.px(8.0))
        .x_label_area_size(fonts.px(36.0))
        .y_label_area_size(fonts.px(48.0))
        .build_cartesian_2d(x, y)?;
    ctx.plotting_area().fill(&rgb(FACE_COLOR))?;
    Ok(ctx)
}

/// Draw the mesh with the chart's axis titles and an x tick formatter
fn draw_mesh<DB: DrawingBackend>(
    ctx: &mut Context<'_, DB>,
    chart: &Chart,
    fonts: &Fonts,
    x_labels: usize,
    x_formatter: &dyn Fn(&f64) -> String,
) -> Result<(), SaveError> {
    let y_formatter = |v: &f64| format_axis_value(*v);
    let mut mesh = ctx.configure_mesh();
    mesh.label_style(fonts.tick())
        .axis_desc_style(fonts.label())
        .light_line_style(WHITE.mix(0.0))
        .x_labels(x_labels)
        .x_label_formatter(x_formatter)
        .y_label_formatter(&y_formatter);
    if let Some(label) = &chart.x_label {
        mesh.x_desc(label.as_str());
    }
    if let Some(label) = &chart.y_label {
        mesh.y_desc(label.as_str());
    }
    mesh.draw()?;
    Ok(())
}

/// Span of the finite values, widened by 5% on both sides
fn padded_span(values: impl IntoIterator<Item = f64>) -> Range<f64> {
    let (lo, hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| (lo.min(v), hi.max(v)));
    if lo > hi {
        return 0.0..1.0;
    }
    if lo == hi {
        return (lo - 1.0)..(hi + 1.0);
    }
    let pad = (hi - lo) * 0.05;
    (lo - pad)..(hi + pad)
}

fn draw_bars<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    fonts: &Fonts,
    categories: &[String],
    values: &[f64],
) -> Result<(), SaveError> {
    let n = categories.len();
    let y = padded_span(values.iter().copied().chain([0.0]));
    let mut ctx = cartesian(root, chart, fonts, -0.5..(n as f64 - 0.5), y)?;

    let x_formatter = |v: &f64| category_tick(categories, *v).unwrap_or_default().to_string();
    draw_mesh(&mut ctx, chart, fonts, n.max(1), &x_formatter)?;

    let color = rgb(palette(0));
    ctx.draw_series(
        values
            .iter()
            .enumerate()
            .filter(|(_, v)| v.is_finite())
            .map(|(i, &v)| {
                let x = i as f64;
                Rectangle::new([(x - 0.4, 0.0), (x + 0.4, v)], color.filled())
            }),
    )?;
    Ok(())
}

fn draw_line<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    fonts: &Fonts,
    points: &[[f64; 2]],
    tick_labels: Option<&[String]>,
    x_temporal: bool,
) -> Result<(), SaveError> {
    let x = padded_span(points.iter().map(|p| p[0]));
    let y = padded_span(points.iter().map(|p| p[1]));
    let mut ctx = cartesian(root, chart, fonts, x, y)?;

    let x_formatter = |v: &f64| match tick_labels {
        Some(labels) => category_tick(labels, *v).unwrap_or_default().to_string(),
        None if x_temporal => format_timestamp(*v),
        None => format_axis_value(*v),
    };
    draw_mesh(&mut ctx, chart, fonts, 10, &x_formatter)?;

    ctx.draw_series(LineSeries::new(
        points.iter().map(|p| (p[0], p[1])),
        rgb(palette(1)).stroke_width(fonts.px(1.5)),
    ))?;
    Ok(())
}

fn draw_scatter<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    fonts: &Fonts,
    points: &[[f64; 2]],
) -> Result<(), SaveError> {
    let x = padded_span(points.iter().map(|p| p[0]));
    let y = padded_span(points.iter().map(|p| p[1]));
    let mut ctx = cartesian(root, chart, fonts, x, y)?;

    let x_formatter = |v: &f64| format_axis_value(*v);
    draw_mesh(&mut ctx, chart, fonts, 10, &x_formatter)?;

    let color = rgb(palette(4));
    let radius = fonts.px(3.0);
    ctx.draw_series(
        points
            .iter()
            .map(|p| Circle::new((p[0], p[1]), radius, color.filled())),
    )?;
    Ok(())
}

fn draw_histogram<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    fonts: &Fonts,
    hist: &Histogram,
) -> Result<(), SaveError> {
    let x = padded_span(hist.edges.iter().copied());
    let y = 0.0..(hist.max_count().max(1) as f64 * 1.05);
    let mut ctx = cartesian(root, chart, fonts, x, y)?;

    let x_formatter = |v: &f64| format_axis_value(*v);
    draw_mesh(&mut ctx, chart, fonts, 10, &x_formatter)?;

    let bins = || {
        hist.edges
            .windows(2)
            .zip(&hist.counts)
            .map(|(edge, &count)| [(edge[0], 0.0), (edge[1], count as f64)])
    };
    let color = rgb(palette(2));
    ctx.draw_series(bins().map(|corners| Rectangle::new(corners, color.filled())))?;
    ctx.draw_series(bins().map(|corners| Rectangle::new(corners, BLACK.stroke_width(1))))?;
    Ok(())
}

fn draw_boxplot<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    fonts: &Fonts,
    summary: &BoxSummary,
) -> Result<(), SaveError> {
    let y = padded_span(
        [summary.lower_whisker, summary.upper_whisker]
            .into_iter()
            .chain(summary.outliers.iter().copied()),
    );
    let mut ctx = cartesian(root, chart, fonts, 0.5..1.5, y)?;

    let name = chart.y_label.clone().unwrap_or_default();
    let x_formatter = |v: &f64| {
        if (v - 1.0).abs() < 1e-6 {
            name.clone()
        } else {
            String::new()
        }
    };
    draw_mesh(&mut ctx, chart, fonts, 3, &x_formatter)?;

    let color = rgb(palette(0));
    let line = color.stroke_width(fonts.px(1.0));
    let (left, right) = (0.75, 1.25);

    ctx.draw_series(std::iter::once(Rectangle::new(
        [(left, summary.q1), (right, summary.q3)],
        color.mix(0.2).filled(),
    )))?;
    ctx.draw_series(std::iter::once(Rectangle::new(
        [(left, summary.q1), (right, summary.q3)],
        line,
    )))?;
    ctx.draw_series(std::iter::once(PathElement::new(
        vec![(left, summary.median), (right, summary.median)],
        rgb(palette(3)).stroke_width(fonts.px(2.0)),
    )))?;

    // Whiskers with their caps
    for (from, to) in [
        (summary.q1, summary.lower_whisker),
        (summary.q3, summary.upper_whisker),
    ] {
        ctx.draw_series(std::iter::once(PathElement::new(vec![(1.0, from), (1.0, to)], line)))?;
        ctx.draw_series(std::iter::once(PathElement::new(
            vec![(0.875, to), (1.125, to)],
            line,
        )))?;
    }

    let radius = fonts.px(3.0);
    ctx.draw_series(
        summary
            .outliers
            .iter()
            .map(|&v| Circle::new((1.0, v), radius, line)),
    )?;
    Ok(())
}

fn draw_pie<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    fonts: &Fonts,
    slices: &[Slice],
) -> Result<(), SaveError> {
    let area = root.titled(&chart.title, fonts.title())?;
    let (width, height) = area.dim_in_pixel();
    let (cx, cy) = (width as f64 / 2.0, height as f64 / 2.0);
    let radius = width.min(height) as f64 * 0.4;
    // y grows downwards in pixel space
    let to_pixel = |(x, y): (f64, f64), r: f64| ((cx + x * r) as i32, (cy - y * r) as i32);

    let centered = Pos::new(HPos::Center, VPos::Center);
    for (i, (slice, (start, end))) in slices.iter().zip(wedge_angles(slices)).enumerate() {
        let outline: Vec<(i32, i32)> = wedge_outline(start, end)
            .into_iter()
            .map(|p| to_pixel(p, radius))
            .collect();
        area.draw(&Polygon::new(outline, rgb(palette(i)).filled()))?;

        let mid = (start + end) / 2.0;
        let direction = (mid.cos(), mid.sin());
        area.draw(&Text::new(
            slice.percent_label(),
            to_pixel(direction, radius * 0.6),
            fonts.tick().pos(centered),
        ))?;
        area.draw(&Text::new(
            slice.label.clone(),
            to_pixel(direction, radius * 1.12),
            fonts.label().pos(centered),
        ))?;
    }
    Ok(())
}

fn draw_heatmap<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    chart: &Chart,
    fonts: &Fonts,
    columns: &[String],
    values: &[Vec<f64>],
) -> Result<(), SaveError> {
    let n = columns.len() as f64;
    let mut ctx = ChartBuilder::on(root)
        .caption(&chart.title, fonts.title())
        .margin(fonts.px(8.0))
        .x_label_area_size(fonts.px(36.0))
        .y_label_area_size(fonts.px(96.0))
        .build_cartesian_2d(0.0..n, 0.0..n)?;

    // Row 0 is drawn at the top
    let x_formatter = |v: &f64| category_tick(columns, *v - 0.5).unwrap_or_default().to_string();
    let y_formatter = |v: &f64| category_tick(columns, n - 0.5 - *v).unwrap_or_default().to_string();
    ctx.configure_mesh()
        .disable_mesh()
        .label_style(fonts.tick())
        .x_labels(columns.len() * 2 + 1)
        .y_labels(columns.len() * 2 + 1)
        .x_label_formatter(&x_formatter)
        .y_label_formatter(&y_formatter)
        .draw()?;

    let cells = || {
        values.iter().enumerate().flat_map(|(row, line)| {
            line.iter().enumerate().map(move |(col, &v)| {
                let top = n - row as f64;
                (col as f64, top, v)
            })
        })
    };

    ctx.draw_series(cells().map(|(left, top, v)| {
        Rectangle::new([(left, top - 1.0), (left + 1.0, top)], rgb(diverging_color(v)).filled())
    }))?;

    let centered = Pos::new(HPos::Center, VPos::Center);
    ctx.draw_series(cells().map(|(left, top, v)| {
        let color: &RGBColor = if v.abs() > 0.6 { &WHITE } else { &BLACK };
        Text::new(
            annotation(v),
            (left + 0.5, top - 0.5),
            fonts.annotation().color(color).pos(centered),
        )
    }))?;
    Ok(())
}

/// Single-page PDF showing a JPEG image across the whole figure-sized page
pub fn pdf_document(jpeg: &[u8], width_px: u32, height_px: u32) -> Vec<u8> {
    let page_w = (FIGURE_WIDTH_IN * POINTS_PER_INCH) as f32;
    let page_h = (FIGURE_HEIGHT_IN * POINTS_PER_INCH) as f32;

    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let page_id = Ref::new(3);
    let image_id = Ref::new(4);
    let content_id = Ref::new(5);
    let image_name = Name(b"Im0");

    let mut pdf = Pdf::new();
    pdf.catalog(catalog_id).pages(page_tree_id);
    pdf.pages(page_tree_id).kids([page_id]).count(1);

    let mut page = pdf.page(page_id);
    page.media_box(Rect::new(0.0, 0.0, page_w, page_h));
    page.parent(page_tree_id);
    page.contents(content_id);
    page.resources().x_objects().pair(image_name, image_id);
    page.finish();

    // JPEG bytes are already DCT-encoded
    let mut image = pdf.image_xobject(image_id, jpeg);
    image.filter(Filter::DctDecode);
    image.width(width_px as i32);
    image.height(height_px as i32);
    image.color_space().device_rgb();
    image.bits_per_component(8);
    image.finish();

    let mut content = Content::new();
    content.save_state();
    content.transform([page_w, 0.0, 0.0, page_h, 0.0, 0.0]);
    content.x_object(image_name);
    content.restore_state();
    pdf.stream(content_id, &content.finish());

    pdf.finish()
}
