//! Rendering of the comparison grid
//!
//! One row per dataset, one column per algorithm. Every cell is a scatter plot of the scaled
//! records coloured by cluster, with the fit time in its bottom right corner.
use std::path::Path;

use anyhow::{anyhow, bail, Result};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::runner::{Cell, Row};

/// Both axes of every cell span `[-AXIS_LIMIT, AXIS_LIMIT]`
pub const AXIS_LIMIT: f64 = 2.5;
/// Side of a cell in pixels
pub const CELL_SIZE: u32 = 200;
/// Height of the band holding the column titles
pub const TITLE_HEIGHT: u32 = 30;

/// Cluster colours, cycled when there are more clusters than colours
pub const PALETTE: [RGBColor; 9] = [
    RGBColor(0x37, 0x7e, 0xb8),
    RGBColor(0xff, 0x7f, 0x00),
    RGBColor(0x4d, 0xaf, 0x4a),
    RGBColor(0xf7, 0x81, 0xbf),
    RGBColor(0xa6, 0x56, 0x28),
    RGBColor(0x98, 0x4e, 0xa3),
    RGBColor(0x99, 0x99, 0x99),
    RGBColor(0xe4, 0x1a, 0x1c),
    RGBColor(0xde, 0xde, 0x00),
];

/// Colour of a cluster, noise is black
pub fn color_for(label: Option<usize>) -> RGBColor {
    match label {
        Some(label) => PALETTE[label % PALETTE.len()],
        None => BLACK,
    }
}

pub fn time_label(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Png,
    Svg,
}

impl Format {
    /// Image format picked from the file extension
    pub fn from_path(path: &Path) -> Result<Format> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| e.to_ascii_lowercase());
        match extension.as_deref() {
            Some("png") => Ok(Format::Png),
            Some("svg") => Ok(Format::Svg),
            _ => bail!(
                "cannot tell the image format of {}, use a .png or .svg extension",
                path.display()
            ),
        }
    }
}

/// Size in pixels of a grid with `n_rows` datasets and `n_cols` algorithms
pub fn image_size(n_rows: usize, n_cols: usize) -> (u32, u32) {
    (
        n_cols as u32 * CELL_SIZE,
        n_rows as u32 * CELL_SIZE + TITLE_HEIGHT,
    )
}

/// Draw the grid of `rows` to `path`, as PNG or SVG depending on the extension
pub fn render(rows: &[Row], path: &Path) -> Result<()> {
    let n_cols = rows.first().map(|row| row.cells.len()).unwrap_or(0);
    if n_cols == 0 {
        bail!("no dataset or no algorithm selected, nothing to draw");
    }
    let size = image_size(rows.len(), n_cols);
    let failed = |e: String| anyhow!("cannot draw {}: {}", path.display(), e);

    match Format::from_path(path)? {
        Format::Png => {
            let root = BitMapBackend::new(path, size).into_drawing_area();
            draw_grid(&root, rows).map_err(|e| failed(format!("{:?}", e)))?;
            root.present().map_err(|e| failed(format!("{:?}", e)))?;
        }
        Format::Svg => {
            let root = SVGBackend::new(path, size).into_drawing_area();
            draw_grid(&root, rows).map_err(|e| failed(format!("{:?}", e)))?;
            root.present().map_err(|e| failed(format!("{:?}", e)))?;
        }
    }
    log::info!("comparison grid written to {}", path.display());
    Ok(())
}

fn draw_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    rows: &[Row],
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    root.fill(&WHITE)?;
    let n_cols = rows.first().map(|row| row.cells.len()).unwrap_or(0);
    let (header, grid) = root.split_vertically(TITLE_HEIGHT);

    let title_style =
        TextStyle::from(("sans-serif", 16).into_font()).pos(Pos::new(HPos::Center, VPos::Center));
    if let Some(first) = rows.first() {
        for (area, cell) in header.split_evenly((1, n_cols)).iter().zip(&first.cells) {
            let (width, height) = area.dim_in_pixel();
            area.draw(&Text::new(
                cell.algorithm.title(),
                ((width / 2) as i32, (height / 2) as i32),
                title_style.clone(),
            ))?;
        }
    }

    let areas = grid.split_evenly((rows.len(), n_cols));
    for (i, row) in rows.iter().enumerate() {
        for (j, cell) in row.cells.iter().enumerate() {
            draw_cell(&areas[i * n_cols + j], row, cell)?;
        }
    }
    Ok(())
}

fn draw_cell<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    row: &Row,
    cell: &Cell,
) -> std::result::Result<(), DrawingAreaErrorKind<DB::ErrorType>> {
    let mut chart = ChartBuilder::on(area)
        .margin(4)
        .build_cartesian_2d(-AXIS_LIMIT..AXIS_LIMIT, -AXIS_LIMIT..AXIS_LIMIT)?;

    chart.draw_series(std::iter::once(Rectangle::new(
        [(-AXIS_LIMIT, AXIS_LIMIT), (AXIS_LIMIT, -AXIS_LIMIT)],
        BLACK.stroke_width(1),
    )))?;
    chart.draw_series(
        row.records
            .rows()
            .into_iter()
            .zip(cell.labels.iter())
            .map(|(point, &label)| Circle::new((point[0], point[1]), 2, color_for(label).filled())),
    )?;

    let time_style =
        TextStyle::from(("sans-serif", 14).into_font()).pos(Pos::new(HPos::Right, VPos::Bottom));
    chart.draw_series(std::iter::once(Text::new(
        time_label(cell.seconds),
        (AXIS_LIMIT - 0.1, -AXIS_LIMIT + 0.1),
        time_style,
    )))?;
    Ok(())
}
