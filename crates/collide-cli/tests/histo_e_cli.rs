use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

const HISTOGRAM: &str = "\
# Energy Total_i Total_e (1,1)_e (1,2)_e (2,1)_e (2,2)_e (2,3)_e
# ------ ------- ------- ------- ------- ------- ------- -------
0.25 12 30 4 0 1 0 0
0.75 20 41 9 0 2 0 0
1.25 15 22 6 0 1 0 0
1.75 8 9 2 0 0 0 0
2.25 Overflow 1 0 0 0 0 0
";

fn write_histogram(dir: &Path) -> std::path::PathBuf {
    let path = dir.join("run.pspHistoE");
    fs::write(&path, HISTOGRAM).expect("histogram should be written");
    path
}

fn run_collide(working_dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_collide-diag"))
        .current_dir(working_dir)
        .env_remove("RUST_LOG")
        .args(args)
        .output()
        .expect("collide-diag should run")
}

#[test]
fn list_prints_labels_without_temperature() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_histogram(temp.path());

    let output = run_collide(temp.path(), &["histo-e", "run.pspHistoE", "--list"]);

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines = stdout.lines().collect::<Vec<_>>();
    assert_eq!(lines.len(), 2, "eight labels wrap onto two lines");
    assert!(lines[0].starts_with("Energy     Total_i    Total_e"));
    assert!(lines[1].starts_with("(2,2)_e    (2,3)_e"));
}

#[test]
fn default_preset_renders_species_totals() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_histogram(temp.path());

    let output = run_collide(
        temp.path(),
        &["histo-e", "run.pspHistoE", "-T", "1e4", "--plot-dir", "out"],
    );

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let svg = temp.path().join("out/run.pspHistoE.energy.svg");
    assert!(svg.is_file(), "{} should be written", svg.display());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Figure: out"));
}

#[test]
fn electron_preset_and_explicit_fields_are_accepted() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_histogram(temp.path());

    let preset = run_collide(
        temp.path(),
        &["histo-e", "run.pspHistoE", "--temp", "2e4", "--preset", "electrons"],
    );
    assert!(preset.status.success());

    let fields = run_collide(
        temp.path(),
        &[
            "histo-e",
            "run.pspHistoE",
            "--temp",
            "2e4",
            "--field",
            "Total_e",
            "--field",
            "(2,1)_e",
        ],
    );
    assert!(fields.status.success());
}

#[test]
fn missing_field_prints_listing_and_exits_one() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_histogram(temp.path());

    let output = run_collide(
        temp.path(),
        &["histo-e", "run.pspHistoE", "-T", "1e4", "--preset", "ions"],
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("No such field, available data is:"));
    assert!(stdout.contains("Total_i"));
    assert!(!temp.path().join("run.pspHistoE.energy.svg").exists());
}

#[test]
fn temperature_is_required_for_plotting() {
    let temp = TempDir::new().expect("tempdir should be created");
    write_histogram(temp.path());

    let output = run_collide(temp.path(), &["histo-e", "run.pspHistoE"]);

    assert_eq!(output.status.code(), Some(2));
    assert!(String::from_utf8_lossy(&output.stderr).contains("--temp"));
}

#[test]
fn missing_histogram_is_an_io_error() {
    let temp = TempDir::new().expect("tempdir should be created");
    let output = run_collide(temp.path(), &["histo-e", "absent.pspHistoE", "--list"]);

    assert_eq!(output.status.code(), Some(3));
    assert!(String::from_utf8_lossy(&output.stderr).contains("ERROR: [IO.HISTO_OPEN]"));
}
