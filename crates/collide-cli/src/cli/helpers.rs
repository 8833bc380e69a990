use super::render::render_figure;
use anyhow::Context;
use collide_core::domain::AnalysisTool;
use collide_core::modules::figure::Figure;
use std::fs;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_LEVEL: &str = "warn";
const VERBOSE_LOG_LEVEL: &str = "debug";
const FALLBACK_STEM: &str = "figure";

/// Stderr subscriber; `RUST_LOG` wins over `--verbose`.
pub(super) fn init_logging(verbose: bool) {
    let level = if verbose {
        VERBOSE_LOG_LEVEL
    } else {
        DEFAULT_LOG_LEVEL
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    // A second initialisation in the same process keeps the first subscriber.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub(super) fn input_path_for(tool: AnalysisTool, runtag: &str) -> PathBuf {
    match tool.input_suffix() {
        Some(suffix) => PathBuf::from(format!("{runtag}{suffix}")),
        None => PathBuf::from(runtag),
    }
}

/// File-name stem shared by every figure of one input (`out/run2` -> `run2`).
pub(super) fn figure_stem(tag: &Path) -> String {
    tag.file_name()
        .and_then(|name| name.to_str())
        .filter(|name| !name.is_empty())
        .unwrap_or(FALLBACK_STEM)
        .to_string()
}

pub(super) fn write_figures(
    plot_dir: &Path,
    stem: &str,
    figures: &[Figure],
) -> anyhow::Result<Vec<PathBuf>> {
    fs::create_dir_all(plot_dir)
        .with_context(|| format!("failed to create plot directory '{}'", plot_dir.display()))?;
    figures
        .iter()
        .map(|figure| {
            let path = plot_dir.join(format!("{stem}.{}.svg", figure.name));
            render_figure(&path, figure)
                .with_context(|| format!("failed to render figure '{}'", path.display()))?;
            tracing::debug!(figure = %figure.name, path = %path.display(), "figure written");
            Ok(path)
        })
        .collect()
}
