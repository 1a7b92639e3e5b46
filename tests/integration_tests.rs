use std::fs;
use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Stdio};

/// Helper function to run the sociograph binary with the given arguments
fn run_sociograph(args: &[&str]) -> Result<Vec<u8>, String> {
    let output = Command::new("cargo")
        .args(["run", "--bin", "sociograph", "--"])
        .args(args)
        .output()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Same, but with CSV content piped through stdin
fn run_sociograph_with_stdin(args: &[&str], csv_content: &str) -> Result<Vec<u8>, String> {
    let mut child = Command::new("cargo")
        .args(["run", "--bin", "sociograph", "--"])
        .args(args)
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| format!("Failed to spawn process: {}", e))?;

    if let Some(mut stdin) = child.stdin.take() {
        stdin
            .write_all(csv_content.as_bytes())
            .map_err(|e| format!("Failed to write to stdin: {}", e))?;
    }

    let output = child
        .wait_with_output()
        .map_err(|e| format!("Failed to wait for process: {}", e))?;

    if output.status.success() {
        Ok(output.stdout)
    } else {
        Err(String::from_utf8_lossy(&output.stderr).to_string())
    }
}

/// Check if bytes are a valid PNG
fn is_valid_png(bytes: &[u8]) -> bool {
    bytes.len() > 8 && bytes[0..8] == [137, 80, 78, 71, 13, 10, 26, 10]
}

fn temp_path(name: &str) -> PathBuf {
    std::env::temp_dir().join(format!("sociograph_test_{}", name))
}

#[test]
fn test_end_to_end_line_chart() {
    let out = temp_path("line.png");
    let result = run_sociograph(&[
        "chart",
        "--input",
        "test/timeseries.csv",
        "--x",
        "year",
        "--y",
        "score",
        "--kind",
        "line",
        "--title",
        "Score over time",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let png = fs::read(&out).expect("Failed to read output PNG");
    assert!(is_valid_png(&png), "Output is not a valid PNG");
}

#[test]
fn test_end_to_end_percent_bar_chart() {
    let out = temp_path("bar.png");
    let records = temp_path("bar_records.json");
    let result = run_sociograph(&[
        "chart",
        "--input",
        "test/crosstab.csv",
        "--x",
        "SEX",
        "--y",
        "YES",
        "NO",
        "--kind",
        "bar",
        "--percent",
        "--dump-records",
        records.to_str().unwrap(),
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let png = fs::read(&out).expect("Failed to read output PNG");
    assert!(is_valid_png(&png));

    let json = fs::read_to_string(&records).expect("Failed to read records JSON");
    assert!(json.contains("\"group\": \"MALE\""));
    assert!(json.contains("\"category\": \"YES\""));
}

#[test]
fn test_end_to_end_filter_with_latin1_input() {
    let out = temp_path("filtered.png");
    let result = run_sociograph(&[
        "chart",
        "--input",
        "data/happiness_2005_2023.csv",
        "--encoding",
        "iso-8859-1",
        "--filter",
        r#""Country name" == "United States" & year in 2010..2023"#,
        "--x",
        "year",
        "--y",
        "Life Ladder",
        "--kind",
        "line",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let png = fs::read(&out).expect("Failed to read output PNG");
    assert!(is_valid_png(&png));
}

#[test]
fn test_end_to_end_stdin_input() {
    let out = temp_path("stdin.png");
    let result = run_sociograph_with_stdin(
        &[
            "chart",
            "--input",
            "-",
            "--x",
            "year",
            "--y",
            "score",
            "--kind",
            "line",
            "-o",
            out.to_str().unwrap(),
        ],
        "year,score\n2010,7.16\n2011,7.12\n2012,7.03\n",
    );
    assert!(result.is_ok(), "Failed: {:?}", result.err());
    let png = fs::read(&out).expect("Failed to read output PNG");
    assert!(is_valid_png(&png));
}

#[test]
fn test_end_to_end_column_not_found() {
    let out = temp_path("missing_col.png");
    let result = run_sociograph(&[
        "chart",
        "--input",
        "test/timeseries.csv",
        "--x",
        "date",
        "--y",
        "score",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(result.is_err(), "Should have failed with column not found");
    assert!(result.unwrap_err().contains("not found"));
}

#[test]
fn test_end_to_end_invalid_filter() {
    let out = temp_path("bad_filter.png");
    let result = run_sociograph(&[
        "chart",
        "--input",
        "test/timeseries.csv",
        "--filter",
        "year >>> 2010",
        "--x",
        "year",
        "--y",
        "score",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(result.is_err(), "Should have failed with a filter error");
    let stderr = result.unwrap_err();
    assert!(
        stderr.contains("filter parse error") || stderr.contains("unparsed filter input"),
        "Unexpected error: {}",
        stderr
    );
}

#[test]
fn test_end_to_end_unknown_encoding() {
    let out = temp_path("bad_encoding.png");
    let result = run_sociograph(&[
        "chart",
        "--input",
        "test/timeseries.csv",
        "--encoding",
        "not-a-charset",
        "--x",
        "year",
        "--y",
        "score",
        "-o",
        out.to_str().unwrap(),
    ]);
    assert!(result.is_err(), "Should have failed with unknown encoding");
    assert!(result.unwrap_err().contains("unknown encoding"));
}

#[test]
fn test_end_to_end_story() {
    let out_dir = temp_path("story_out");
    let result = run_sociograph(&[
        "story",
        "--data-dir",
        "data",
        "--out-dir",
        out_dir.to_str().unwrap(),
    ]);
    assert!(result.is_ok(), "Failed: {:?}", result.err());

    let report = fs::read_to_string(out_dir.join("report.md")).expect("report.md missing");
    assert!(report.contains("# Are men really more lonely?"));
    assert!(report.contains("![")); // chart links present

    for slug in [
        "ladder_score",
        "social_support",
        "life_satisfaction",
        "socializing_with_friends",
        "evenings_at_bar",
        "calling_best_friend",
        "visiting_best_friend",
        "needy_friend",
        "close_friends",
        "romantic_partner",
    ] {
        let png = fs::read(out_dir.join(format!("{}.png", slug)))
            .unwrap_or_else(|_| panic!("missing panel {}", slug));
        assert!(is_valid_png(&png), "panel {} is not a valid PNG", slug);
    }
}
