/// End-to-end tests that run the planter-cli binary on synthetic sheets.
mod common;

use common::planter_cli;
use image::GenericImageView;

#[test]
fn extracts_configured_plants_with_report() {
    let (temp_dir, input_path, config_path, output_dir) = cli_test_setup!();
    let report_path = temp_dir.path().join("reports/run.json");

    let output = planter_cli(temp_dir.path())
        .arg("--input")
        .arg(&input_path)
        .arg("--config")
        .arg(&config_path)
        .arg("--output-dir")
        .arg(&output_dir)
        .arg("--report")
        .arg(&report_path)
        .output()
        .expect("run planter-cli");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    for name in ["01_square", "02_pot"] {
        let img = image::open(output_dir.join(format!("{name}.png"))).expect("placeholder png");
        assert_eq!(img.dimensions(), (512, 512));
        let rgba = img.to_rgba8();
        assert_eq!(rgba.get_pixel(0, 0)[3], 0);
        assert_eq!(rgba.get_pixel(256, 300)[3], 255);
        assert!(rgba.pixels().all(|px| px[3] == 0 || px[3] == 255));
    }

    let report: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&report_path).expect("report written"))
            .expect("report json");
    assert_eq!(report["mode"], "refined");
    assert_eq!(report["source_size"], serde_json::json!([200, 100]));
    let succeeded = report["succeeded"].as_array().expect("succeeded list");
    assert_eq!(succeeded.len(), 2);
    assert_eq!(succeeded[1]["name"], "02_pot");
    assert_eq!(succeeded[1]["pots"][0]["dark_replaced"], 32);
    assert!(report["failed"].as_array().expect("failed list").is_empty());
}

#[test]
fn failed_plant_does_not_block_others_but_fails_run() {
    let (temp_dir, input_path, config_path, output_dir) = cli_test_setup!(with_offsheet);

    let output = planter_cli(temp_dir.path())
        .arg("--input")
        .arg(&input_path)
        .arg("--config")
        .arg(&config_path)
        .arg("--output-dir")
        .arg(&output_dir)
        .arg("--max-dimension")
        .arg("64")
        .output()
        .expect("run planter-cli");

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("03_offsheet"), "stderr: {stderr}");
    assert!(output_dir.join("01_square.png").is_file());
    assert!(output_dir.join("02_pot.png").is_file());
    assert!(!output_dir.join("03_offsheet.png").exists());
}

#[test]
fn only_flag_limits_extraction() {
    let (temp_dir, input_path, config_path, output_dir) = cli_test_setup!(with_offsheet);

    let output = planter_cli(temp_dir.path())
        .arg("--input")
        .arg(&input_path)
        .arg("--config")
        .arg(&config_path)
        .arg("--output-dir")
        .arg(&output_dir)
        .args(["--only", "pot", "--no-upscale", "--max-dimension", "600"])
        .output()
        .expect("run planter-cli");

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    let img = image::open(output_dir.join("02_pot.png")).expect("pot png");
    assert_eq!(img.dimensions(), (100, 100));
    assert!(!output_dir.join("01_square.png").exists());
}

#[test]
fn unknown_plant_name_is_rejected() {
    let (temp_dir, input_path, config_path, output_dir) = cli_test_setup!();

    let output = planter_cli(temp_dir.path())
        .arg("--input")
        .arg(&input_path)
        .arg("--config")
        .arg(&config_path)
        .arg("--output-dir")
        .arg(&output_dir)
        .args(["--only", "cactus"])
        .output()
        .expect("run planter-cli");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown plant 'cactus'"));
    assert!(!output_dir.exists());
}

#[test]
fn list_plants_prints_builtin_table() {
    let temp_dir = tempfile::TempDir::new().expect("create temp dir");

    let output = planter_cli(temp_dir.path())
        .args(["--list-plants", "--mode", "legacy"])
        .output()
        .expect("run planter-cli");

    assert!(output.status.success());
    let table: serde_json::Value =
        serde_json::from_slice(&output.stdout).expect("plant table json");
    let plants = table.as_array().expect("array");
    assert_eq!(plants.len(), 5);
    assert_eq!(plants[0]["name"], "01_yellow_flowers");
    assert_eq!(plants[0]["crop"], serde_json::json!([200, 300, 2800, 3800]));
    assert_eq!(plants[0]["pot_regions"], serde_json::json!([[550, 1700, 1650, 2600]]));
    assert_eq!(plants[0]["pot_sample"], serde_json::json!([700, 2200]));
}

#[test]
fn missing_input_is_a_usage_error() {
    let temp_dir = tempfile::TempDir::new().expect("create temp dir");

    let output = planter_cli(temp_dir.path())
        .output()
        .expect("run planter-cli");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--input"));
}

#[test]
fn nonexistent_input_fails_before_any_plant_runs() {
    let (temp_dir, _input_path, config_path, output_dir) = cli_test_setup!();

    let output = planter_cli(temp_dir.path())
        .arg("--input")
        .arg(temp_dir.path().join("no_such_sheet.png"))
        .arg("--config")
        .arg(&config_path)
        .arg("--output-dir")
        .arg(&output_dir)
        .output()
        .expect("run planter-cli");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no_such_sheet.png"));
    assert!(!output_dir.exists());
}

#[test]
fn undecodable_input_fails_before_any_plant_runs() {
    let (temp_dir, _input_path, config_path, output_dir) = cli_test_setup!();
    let bogus = temp_dir.path().join("notes.png");
    std::fs::write(&bogus, "this is not a picture").expect("write bogus input");

    let output = planter_cli(temp_dir.path())
        .arg("--input")
        .arg(&bogus)
        .arg("--config")
        .arg(&config_path)
        .arg("--output-dir")
        .arg(&output_dir)
        .output()
        .expect("run planter-cli");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("failed to open image"));
    assert!(!output_dir.exists());
}

#[test]
fn plant_name_with_path_separator_is_rejected() {
    let (temp_dir, input_path, _config_path, output_dir) = cli_test_setup!();
    let config_path = temp_dir.path().join("escape.json");
    let settings = serde_json::json!({
        "plants": [
            { "name": "../escaped", "crop": [0, 0, 100, 100], "pot_regions": [] },
            { "name": "01_square", "crop": [0, 0, 100, 100], "pot_regions": [] }
        ]
    });
    std::fs::write(&config_path, settings.to_string()).expect("write config");

    let output = planter_cli(temp_dir.path())
        .arg("--input")
        .arg(&input_path)
        .arg("--config")
        .arg(&config_path)
        .arg("--output-dir")
        .arg(&output_dir)
        .args(["--max-dimension", "32"])
        .output()
        .expect("run planter-cli");

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("../escaped"));
    assert!(!temp_dir.path().join("escaped.png").exists());
    assert!(output_dir.join("01_square.png").is_file());
}
