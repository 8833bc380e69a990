//! SVG rendering of the backend-neutral figure model.

use anyhow::anyhow;
use collide_core::modules::figure::{Figure, MarkerGlyph, Panel, SeriesStyle};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

const PANEL_SIZE: (u32, u32) = (800, 600);
const TITLE_FONT: (&str, f64) = ("sans-serif", 28.0);
const CAPTION_FONT: (&str, f64) = ("sans-serif", 22.0);
const LINE_WIDTH: u32 = 2;

const PALETTE: [RGBColor; 8] = [
    RGBColor(31, 119, 180),
    RGBColor(255, 127, 14),
    RGBColor(44, 160, 44),
    RGBColor(214, 39, 40),
    RGBColor(148, 103, 189),
    RGBColor(140, 86, 75),
    RGBColor(227, 119, 194),
    RGBColor(127, 127, 127),
];

pub(super) fn render_figure(path: &Path, figure: &Figure) -> anyhow::Result<()> {
    let rows = figure.rows.max(1);
    let cols = figure.cols.max(1);
    let size = (PANEL_SIZE.0 * cols as u32, PANEL_SIZE.1 * rows as u32);

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;
    let body = if figure.panels.len() > 1 {
        root.titled(&figure.title, TITLE_FONT).map_err(plot_error)?
    } else {
        root.clone()
    };
    for (area, panel) in body.split_evenly((rows, cols)).iter().zip(&figure.panels) {
        draw_panel(area, panel)?;
    }
    root.present().map_err(plot_error)?;
    Ok(())
}

fn draw_panel(area: &DrawingArea<SVGBackend<'_>, Shift>, panel: &Panel) -> anyhow::Result<()> {
    let Some(bounds) = panel.bounds() else {
        tracing::warn!(panel = %panel.title, "no positive values to plot; panel left empty");
        area.titled(&panel.title, CAPTION_FONT).map_err(plot_error)?;
        return Ok(());
    };

    let mut chart = ChartBuilder::on(area)
        .margin(16)
        .caption(&panel.title, CAPTION_FONT)
        .x_label_area_size(40)
        .y_label_area_size(70)
        .build_cartesian_2d(
            bounds.x.0..bounds.x.1,
            (bounds.y.0..bounds.y.1).log_scale(),
        )
        .map_err(plot_error)?;
    chart
        .configure_mesh()
        .x_desc(panel.x_label.as_str())
        .y_desc(panel.y_label.as_str())
        .draw()
        .map_err(plot_error)?;

    for (index, series) in panel.series.iter().enumerate() {
        let color = PALETTE[index % PALETTE.len()];
        let points = series.plottable_points().collect::<Vec<_>>();
        let connect = match series.style {
            SeriesStyle::Smooth => true,
            SeriesStyle::Markers(style) => style.connect,
        };

        if connect {
            chart
                .draw_series(LineSeries::new(
                    points.iter().copied(),
                    color.stroke_width(LINE_WIDTH),
                ))
                .map_err(plot_error)?
                .label(series.label.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(LINE_WIDTH)));
        }

        if let SeriesStyle::Markers(style) = series.style {
            let size = style.size as i32;
            let annotation = match style.glyph {
                MarkerGlyph::Dot => chart.draw_series(
                    points
                        .iter()
                        .map(|&point| Circle::new(point, size, color.filled())),
                ),
                MarkerGlyph::Star => chart.draw_series(
                    points.iter().map(|&point| Cross::new(point, size, color.stroke_width(1))),
                ),
            }
            .map_err(plot_error)?;
            if !connect {
                annotation
                    .label(series.label.as_str())
                    .legend(move |(x, y)| Circle::new((x + 10, y), size, color.filled()));
            }
        }
    }

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperRight)
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;
    Ok(())
}

fn plot_error(error: impl std::fmt::Display) -> anyhow::Error {
    anyhow!("plot backend error: {error}")
}

#[cfg(test)]
mod tests {
    use super::render_figure;
    use collide_core::modules::figure::{Figure, MarkerStyle, Panel, Series, SeriesStyle};
    use tempfile::TempDir;

    #[test]
    fn grid_figure_renders_to_svg() {
        let temp = TempDir::new().expect("tempdir should be created");
        let path = temp.path().join("grid.svg");
        let series = |label: &str, style| {
            Series::new(label, vec![(1.0, 0.5), (2.0, 0.25), (3.0, 0.0)], style)
        };
        let panels = vec![
            Panel::new("a", "x", "y", vec![series("s", SeriesStyle::Smooth)]),
            Panel::new(
                "b",
                "x",
                "y",
                vec![series("m", SeriesStyle::Markers(MarkerStyle::from_flags(false, true, 3)))],
            ),
            Panel::new("c", "x", "y", vec![]),
        ];
        let figure = Figure::grid("grid", "Grid", 2, 2, panels);

        render_figure(&path, &figure).expect("render should succeed");

        let svg = std::fs::read_to_string(&path).expect("svg should be written");
        assert!(svg.starts_with("<svg"));
    }
}
