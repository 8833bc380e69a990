//! Backend-neutral description of the diagnostic figures.
//!
//! Readers build `Figure` values; the binary decides how to draw them. Every
//! diagnostic is drawn against a logarithmic count/ratio axis, so panels only
//! carry points with `y > 0` into their bounds.

use serde::Serialize;

pub const DEFAULT_MARKER_SIZE: u32 = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum MarkerGlyph {
    Dot,
    Star,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MarkerStyle {
    pub connect: bool,
    pub glyph: MarkerGlyph,
    pub size: u32,
}

impl MarkerStyle {
    /// Dots stand alone unless `line` is set; stars are always joined.
    pub fn from_flags(line: bool, dot: bool, size: u32) -> Self {
        Self {
            connect: line || !dot,
            glyph: if dot { MarkerGlyph::Dot } else { MarkerGlyph::Star },
            size,
        }
    }
}

impl Default for MarkerStyle {
    fn default() -> Self {
        Self::from_flags(false, false, DEFAULT_MARKER_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SeriesStyle {
    Markers(MarkerStyle),
    Smooth,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
    pub style: SeriesStyle,
}

impl Series {
    pub fn new(label: impl Into<String>, points: Vec<(f64, f64)>, style: SeriesStyle) -> Self {
        Self {
            label: label.into(),
            points,
            style,
        }
    }

    /// Points that can be placed on a log-y axis.
    pub fn plottable_points(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.points
            .iter()
            .copied()
            .filter(|(x, y)| x.is_finite() && y.is_finite() && *y > 0.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlotBounds {
    pub x: (f64, f64),
    pub y: (f64, f64),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub series: Vec<Series>,
}

impl Panel {
    pub fn new(
        title: impl Into<String>,
        x_label: impl Into<String>,
        y_label: impl Into<String>,
        series: Vec<Series>,
    ) -> Self {
        Self {
            title: title.into(),
            x_label: x_label.into(),
            y_label: y_label.into(),
            series,
        }
    }

    /// Data extent over every plottable point, widened when degenerate.
    pub fn bounds(&self) -> Option<PlotBounds> {
        let mut points = self
            .series
            .iter()
            .flat_map(Series::plottable_points);
        let (x0, y0) = points.next()?;
        let (mut x, mut y) = ((x0, x0), (y0, y0));
        for (px, py) in points {
            x = (x.0.min(px), x.1.max(px));
            y = (y.0.min(py), y.1.max(py));
        }

        if x.0 == x.1 {
            x = (x.0 - 0.5, x.1 + 0.5);
        }
        if y.0 == y.1 {
            y = (y.0 / 10.0, y.1 * 10.0);
        }
        Some(PlotBounds { x, y })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// Short identifier used to name the rendered file.
    pub name: String,
    pub title: String,
    pub rows: usize,
    pub cols: usize,
    pub panels: Vec<Panel>,
}

impl Figure {
    pub fn single(name: impl Into<String>, panel: Panel) -> Self {
        Self {
            name: name.into(),
            title: panel.title.clone(),
            rows: 1,
            cols: 1,
            panels: vec![panel],
        }
    }

    pub fn grid(
        name: impl Into<String>,
        title: impl Into<String>,
        rows: usize,
        cols: usize,
        panels: Vec<Panel>,
    ) -> Self {
        Self {
            name: name.into(),
            title: title.into(),
            rows,
            cols,
            panels,
        }
    }
}

/// File-name friendly form of a species label (`He++` -> `Hepp`).
pub fn file_safe_label(label: &str) -> String {
    label
        .chars()
        .map(|c| match c {
            '+' => 'p',
            c if c.is_ascii_alphanumeric() || c == '-' || c == '_' => c,
            _ => '_',
        })
        .collect()
}
