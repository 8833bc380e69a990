pub mod figure;
pub mod histo_e;
pub mod ion_coll;

pub use figure::{Figure, MarkerGlyph, MarkerStyle, Panel, PlotBounds, Series, SeriesStyle};
