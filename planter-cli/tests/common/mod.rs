/// Common test utilities and macros for CLI integration tests
use std::{fs, path::Path};

use image::{Rgb, RgbImage};

pub const CREAM: Rgb<u8> = Rgb([255, 251, 240]);

/// A 200x100 sheet holding two "plants": a green square on the left and a
/// terracotta pot with two dark eyes on the right.
pub fn write_sheet(path: &Path) {
    let mut sheet = RgbImage::from_pixel(200, 100, CREAM);
    for y in 20..80 {
        for x in 20..80 {
            sheet.put_pixel(x, y, Rgb([40, 150, 60]));
        }
    }
    for y in 30..90 {
        for x in 120..180 {
            sheet.put_pixel(x, y, Rgb([214, 160, 118]));
        }
    }
    for cx in [138, 162] {
        for y in 50..54 {
            for x in cx - 2..cx + 2 {
                sheet.put_pixel(x, y, Rgb([20, 20, 20]));
            }
        }
    }
    sheet.save(path).expect("write sheet");
}

/// Settings file describing the two plants drawn by [`write_sheet`].
pub fn write_config(path: &Path, extra_plant: bool) {
    let mut plants = vec![
        serde_json::json!({
            "name": "01_square",
            "crop": [0, 0, 100, 100],
            "pot_regions": []
        }),
        serde_json::json!({
            "name": "02_pot",
            "crop": [100, 0, 200, 100],
            "pot_regions": [[20, 30, 80, 90]]
        }),
    ];
    if extra_plant {
        plants.push(serde_json::json!({
            "name": "03_offsheet",
            "crop": [400, 400, 500, 500],
            "pot_regions": []
        }));
    }
    let settings = serde_json::json!({ "plants": plants });
    fs::write(path, serde_json::to_string_pretty(&settings).expect("json")).expect("write config");
}

/// Macro to set up a temp directory holding a synthetic sheet and settings file.
///
/// Creates:
/// - `temp_dir: TempDir` - temporary directory (also the working directory for the binary)
/// - `input_path: PathBuf` - the sheet PNG
/// - `config_path: PathBuf` - the settings JSON
/// - `output_dir: PathBuf` - where placeholders are written
///
/// # Usage
///
/// ```ignore
/// cli_test_setup!(); // two on-sheet plants
/// cli_test_setup!(with_offsheet); // plus one plant whose crop misses the sheet
/// ```
#[macro_export]
macro_rules! cli_test_setup {
    () => {
        $crate::cli_test_setup!(@build false)
    };
    (with_offsheet) => {
        $crate::cli_test_setup!(@build true)
    };
    (@build $extra:expr) => {{
        let temp_dir = tempfile::TempDir::new().expect("create temp dir");
        let input_path = temp_dir.path().join("sheet.png");
        let config_path = temp_dir.path().join("settings.json");
        let output_dir = temp_dir.path().join("placeholders");
        $crate::common::write_sheet(&input_path);
        $crate::common::write_config(&config_path, $extra);
        (temp_dir, input_path, config_path, output_dir)
    }};
}

/// Build a `Command` for the CLI binary running inside `dir`.
pub fn planter_cli(dir: &Path) -> std::process::Command {
    let mut cmd = std::process::Command::new(env!("CARGO_BIN_EXE_planter-cli"));
    cmd.current_dir(dir).env("RUST_LOG", "info");
    cmd
}
