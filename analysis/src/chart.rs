use itertools::{Itertools, MinMaxResult};
use plotters::{prelude::*, style::register_font};
use sketchbench_runner::database::{read_all, ResultTable, StoreError, TimingResult};
use std::{fmt::Display, ops::Range, path::Path};
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

const FONT: &str = "sans-serif";
const FONT_DATA: &[u8] = include_bytes!("../assets/DejaVuSans.ttf");
const X_LABELS: usize = 6;
// matplotlib's first two cycle colors, so charts line up with earlier plots of the same records
const REFERENCE_COLOR: RGBColor = RGBColor(31, 119, 180);
const CANDIDATE_COLOR: RGBColor = RGBColor(255, 127, 14);

#[derive(Error, Debug)]
pub enum ChartError {
    #[error("Failed to read records")]
    Store(#[from] StoreError),
    #[error("Failed to draw chart: {0}")]
    Draw(String),
}

fn draw_error<E: Display>(error: E) -> ChartError {
    ChartError::Draw(error.to_string())
}

/// make the bundled font available to every text element drawn under `FONT`
fn register_fonts() -> Result<(), ChartError> {
    register_font(FONT, FontStyle::Normal, FONT_DATA)
        .map_err(|_| ChartError::Draw("bundled font is not a valid TrueType font".to_owned()))
}

#[derive(Debug, Clone, PartialEq)]
pub struct ChartConfig {
    pub dpi: u32,
    /// edge length of a single square panel
    pub panel_inches: f64,
    /// upper bound of every y-axis, `None` scales to the slowest run
    pub y_max: Option<f64>,
    pub y_label: String,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            dpi: 1200,
            panel_inches: 3.0,
            y_max: Some(150.0),
            y_label: "Time(s)".to_owned(),
        }
    }
}

impl ChartConfig {
    /// typographic points to pixels at the configured resolution
    fn px(&self, points: f64) -> f64 {
        points * f64::from(self.dpi) / 72.0
    }

    pub fn panel_px(&self) -> u32 {
        ((self.panel_inches * f64::from(self.dpi)).round() as u32).max(1)
    }
}

/// Rows sharing a single scaled value, ordered by k-mer size
#[derive(Debug, Clone, PartialEq)]
pub struct ChartGroup {
    pub scaled: u64,
    pub rows: Vec<TimingResult>,
}

impl ChartGroup {
    fn reference(&self) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .map(|row| (f64::from(row.point.kmer_size), row.reference_seconds))
            .collect()
    }

    fn candidate(&self) -> Vec<(f64, f64)> {
        self.rows
            .iter()
            .map(|row| (f64::from(row.point.kmer_size), row.candidate_seconds))
            .collect()
    }

    fn x_range(&self) -> Range<f64> {
        let (min, max) = match self.rows.iter().map(|row| row.point.kmer_size).minmax() {
            MinMaxResult::NoElements => (0.0, 0.0),
            MinMaxResult::OneElement(k) => (f64::from(k), f64::from(k)),
            MinMaxResult::MinMax(min, max) => (f64::from(min), f64::from(max)),
        };
        let pad = ((max - min) * 0.05).max(1.0);

        (min - pad)..(max + pad)
    }

    fn slowest(&self) -> f64 {
        self.rows
            .iter()
            .flat_map(|row| [row.reference_seconds, row.candidate_seconds])
            .fold(0.0, f64::max)
    }
}

/// Partition `table` by scaled value in order of first appearance
pub fn group_by_scaled(table: &ResultTable) -> Vec<ChartGroup> {
    table
        .iter()
        .map(|row| row.point.scaled)
        .unique()
        .map(|scaled| ChartGroup {
            scaled,
            rows: table
                .iter()
                .filter(|row| row.point.scaled == scaled)
                .copied()
                .sorted_by_key(|row| row.point.kmer_size)
                .collect(),
        })
        .collect()
}

/// Draw one panel per scaled value side by side and save the figure as an image at `output`.
///
/// Returns the number of panels. An empty table produces a single blank panel and 0.
#[instrument(skip(table, config), level = "info")]
pub fn render(
    table: &ResultTable,
    output: &Path,
    config: &ChartConfig,
) -> Result<usize, ChartError> {
    let groups = group_by_scaled(table);
    let panel = config.panel_px();
    let width = panel * (groups.len().max(1) as u32);

    debug!("Rendering {} panels into {width}x{panel} px", groups.len());

    register_fonts()?;

    let root = BitMapBackend::new(output, (width, panel)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_error)?;

    if groups.is_empty() {
        warn!("No records to plot, writing an empty chart");
        root.present().map_err(draw_error)?;

        return Ok(0);
    }

    let y_max = config.y_max.unwrap_or_else(|| {
        let slowest = groups.iter().map(ChartGroup::slowest).fold(0.0, f64::max);
        if slowest > 0.0 {
            slowest * 1.1
        } else {
            1.0
        }
    });

    let font = config.px(10.0);
    let stroke = config.px(1.5).round().max(1.0) as u32;
    let marker = config.px(3.0).round().max(1.0) as u32;
    let glyph_slot = config.px(12.0).round().max(2.0) as i32;
    let glyph_half = (config.px(4.0).round() as i32).max(1);
    let reference_label = table.header.reference().to_owned();
    let candidate_label = table.header.candidate().to_owned();
    let kmer_label = |kmer_size: &f64| format!("{kmer_size:.0}");

    let areas = root.split_evenly((1, groups.len()));
    for (index, (area, group)) in areas.iter().zip(groups.iter()).enumerate() {
        let mut chart = ChartBuilder::on(area)
            .caption(format!("Scaled = {}", group.scaled), (FONT, config.px(12.0)))
            .margin(config.px(6.0).round() as u32)
            .x_label_area_size(config.px(28.0).round() as u32)
            .y_label_area_size(config.px(36.0).round() as u32)
            .build_cartesian_2d(group.x_range(), 0f64..y_max)
            .map_err(draw_error)?;

        let mut mesh = chart.configure_mesh();
        mesh.x_desc("kmer_size")
            .x_labels(X_LABELS)
            .x_label_formatter(&kmer_label)
            .label_style((FONT, font))
            .axis_desc_style((FONT, font))
            .disable_mesh();
        if index == 0 {
            mesh.y_desc(config.y_label.as_str());
        }
        mesh.draw().map_err(draw_error)?;

        let reference = group.reference();
        let candidate = group.candidate();

        chart
            .draw_series(LineSeries::new(
                reference.iter().copied(),
                REFERENCE_COLOR.stroke_width(stroke),
            ))
            .map_err(draw_error)?
            .label(reference_label.as_str())
            .legend(move |(x, y)| {
                EmptyElement::at((x + glyph_slot / 2, y))
                    + PathElement::new(
                        vec![(-glyph_half, 0), (glyph_half, 0)],
                        REFERENCE_COLOR.stroke_width(stroke),
                    )
                    + Circle::new((0, 0), marker, REFERENCE_COLOR.filled())
            });
        chart
            .draw_series(
                reference
                    .iter()
                    .map(|&point| Circle::new(point, marker, REFERENCE_COLOR.filled())),
            )
            .map_err(draw_error)?;

        chart
            .draw_series(LineSeries::new(
                candidate.iter().copied(),
                CANDIDATE_COLOR.stroke_width(stroke),
            ))
            .map_err(draw_error)?
            .label(candidate_label.as_str())
            .legend(move |(x, y)| {
                EmptyElement::at((x + glyph_slot / 2, y))
                    + PathElement::new(
                        vec![(-glyph_half, 0), (glyph_half, 0)],
                        CANDIDATE_COLOR.stroke_width(stroke),
                    )
                    + Cross::new((0, 0), marker, CANDIDATE_COLOR.stroke_width(stroke))
            });
        chart
            .draw_series(
                candidate
                    .iter()
                    .map(|&point| Cross::new(point, marker, CANDIDATE_COLOR.stroke_width(stroke))),
            )
            .map_err(draw_error)?;

        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .legend_area_size(glyph_slot)
            .label_font((FONT, font))
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()
            .map_err(draw_error)?;
    }

    root.present().map_err(draw_error)?;

    info!("Saved {} panels to {}", groups.len(), output.to_string_lossy());

    Ok(groups.len())
}

/// Read the result store at `records` and render it to `output`
pub fn render_records(
    records: &Path,
    output: &Path,
    config: &ChartConfig,
) -> Result<usize, ChartError> {
    let table = read_all(records)?;

    info!("Read {} rows from {}", table.len(), records.to_string_lossy());

    render(&table, output, config)
}

#[cfg(test)]
mod chart_test;
