use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const INSTANCE: &str = "c two overlapping edges\np htd 3 2\n1 1 2\n2 2 3\n";

const NARROW: &str = "s htd 2 1 3 2\n1 2\nb 1 1 2\nb 2 2 3\nw 1 1 1\nw 2 2 1\n";

const WIDE: &str = "s htd 1 2 3 2\nb 1 1 2 3\nw 1 1 1\nw 1 2 1\n";

fn htd_check(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_htd-check"))
        .args(args)
        .env("RUST_LOG", "off")
        .output()
        .expect("run htd-check")
}

fn write(dir: &Path, name: &str, contents: &str) -> String {
    let path = dir.join(name);
    fs::write(&path, contents).unwrap();
    path.to_string_lossy().into_owned()
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn valid_submission_scores_elapsed_time() {
    let dir = tempfile::tempdir().unwrap();
    let instance = write(dir.path(), "a.hgr", INSTANCE);
    let solution = write(dir.path(), "a.htd", NARROW);

    let output = htd_check(&["check", &instance, &solution, "--elapsed", "12.5"]);
    assert!(output.status.success());
    assert_eq!(stdout(&output), "12.50000000|SUCCESS\n");

    let output = htd_check(&["check", &instance, &solution]);
    assert_eq!(stdout(&output), "0.00000000|SUCCESS\n");
}

#[test]
fn wrong_answer_hides_diagnostic_unless_verbose() {
    let dir = tempfile::tempdir().unwrap();
    let instance = write(dir.path(), "a.hgr", INSTANCE);
    let solution = write(dir.path(), "a.htd", "s htd 1 1 3 2\nb 1 1 2 3\nw 1 1 1\n");

    let output = htd_check(&["check", &instance, &solution]);
    assert_eq!(output.status.code(), Some(0));
    assert_eq!(stdout(&output), "-18000.00000000|Wrong Answer\n");

    let output = htd_check(&["--verbose", "check", &instance, &solution]);
    assert_eq!(
        stdout(&output),
        "-18000.00000000|Not all bags are covered by width function\n"
    );
}

#[test]
fn parse_failures_are_wrong_answers() {
    let dir = tempfile::tempdir().unwrap();
    let instance = write(dir.path(), "a.hgr", INSTANCE);
    let solution = write(dir.path(), "a.htd", "s htd 1 3 3 2\nb 1 1 2 3\nw 1 1 1\nw 1 2 1\n");

    let output = htd_check(&["check", "--verbose", &instance, &solution]);
    assert_eq!(stdout(&output), "-18000.00000000|Width differs with header\n");
}

#[test]
fn reference_width_decides_optimality() {
    let dir = tempfile::tempdir().unwrap();
    let instance = write(dir.path(), "a.hgr", INSTANCE);
    let wide = write(dir.path(), "wide.htd", WIDE);
    let narrow = write(dir.path(), "narrow.htd", NARROW);

    let output = htd_check(&["check", "--verbose", &instance, &wide, "--reference", &narrow]);
    assert_eq!(
        stdout(&output),
        "-18000.00000000|Reported hypertree decomposition is not optimal\n"
    );

    let output = htd_check(&["check", &instance, &narrow, "--reference", &wide]);
    assert_eq!(stdout(&output), "0.00000000|SUCCESS\n");
}

#[test]
fn time_limit_is_checked_before_parsing() {
    let dir = tempfile::tempdir().unwrap();
    let instance = write(dir.path(), "a.hgr", "garbage\n");
    let solution = write(dir.path(), "a.htd", "garbage\n");

    let output = htd_check(&["check", &instance, &solution, "--elapsed", "1800.5"]);
    assert_eq!(stdout(&output), "-3600.00000000|Time Limit Exceeded\n");

    let output = htd_check(&[
        "check",
        "--time-budget",
        "10",
        &instance,
        &solution,
        "--elapsed",
        "11",
    ]);
    assert_eq!(stdout(&output), "-20.00000000|Time Limit Exceeded\n");
}

#[test]
fn missing_solution_means_no_output() {
    let dir = tempfile::tempdir().unwrap();
    let instance = write(dir.path(), "a.hgr", INSTANCE);
    let missing = dir.path().join("absent.htd");

    let output = htd_check(&[
        "--verbose",
        "check",
        &instance,
        missing.to_str().unwrap(),
    ]);
    assert_eq!(stdout(&output), "-18000.00000000|No output produced by user\n");
}

#[test]
fn instance_errors_exit_with_status_two() {
    let dir = tempfile::tempdir().unwrap();
    let instance = write(dir.path(), "a.hgr", "p htd 3 2\n1 1 2\n");
    let solution = write(dir.path(), "a.htd", NARROW);

    let output = htd_check(&["check", &instance, &solution]);
    assert_eq!(output.status.code(), Some(2));
    assert!(output.stdout.is_empty());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("Instance Error (-1): Hyperedge number differs from actual"),
        "unexpected stderr: {stderr}"
    );
}

#[test]
fn report_is_written_as_json() {
    let dir = tempfile::tempdir().unwrap();
    let instance = write(dir.path(), "a.hgr", INSTANCE);
    let solution = write(dir.path(), "a.htd", NARROW);
    let report = dir.path().join("out").join("report.json");

    let output = htd_check(&[
        "check",
        &instance,
        &solution,
        "--report",
        report.to_str().unwrap(),
    ]);
    assert!(output.status.success());
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    assert_eq!(json["num_bags"], 2);
    assert_eq!(json["width"], 1);
    assert!(json["structural"].is_null());
}

#[test]
fn batch_reports_one_line_per_pair() {
    let dir = tempfile::tempdir().unwrap();
    write(dir.path(), "good.hgr", INSTANCE);
    write(dir.path(), "good.htd", NARROW);
    write(dir.path(), "lonely.hgr", INSTANCE);

    let output = htd_check(&["batch", dir.path().to_str().unwrap()]);
    assert!(output.status.success());
    assert_eq!(
        stdout(&output),
        "good.hgr\t0.00000000|SUCCESS\nlonely.hgr\t-18000.00000000|Wrong Answer\n"
    );
}

#[test]
fn config_file_sets_budget_and_verbosity() {
    let dir = tempfile::tempdir().unwrap();
    let config = write(dir.path(), "checker.yaml", "time_budget_secs: 100\nverbose: true\n");
    let instance = write(dir.path(), "a.hgr", INSTANCE);
    let missing = dir.path().join("absent.htd");

    let output = htd_check(&[
        "--config",
        &config,
        "check",
        &instance,
        missing.to_str().unwrap(),
    ]);
    assert_eq!(stdout(&output), "-1000.00000000|No output produced by user\n");
}

#[test]
fn normalize_and_inspect_decomposition() {
    let dir = tempfile::tempdir().unwrap();
    let reversed = write(
        dir.path(),
        "r.htd",
        "c reversed edge\ns htd 2 1 3 2\n2 1\nb 2 2 3\nb 1 1 2\nw 2 2 1\nw 1 1 1\nw 1 1 1\n",
    );

    let output = htd_check(&["normalize", "--kind", "decomposition", &reversed]);
    assert!(output.status.success());
    let text = stdout(&output);
    assert!(text.starts_with("s htd 2 1 3 2\n2 1\n"), "unexpected normal form: {text}");

    let output = htd_check(&["inspect", &reversed]);
    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(json["kind"], "hypertree");
    assert_eq!(json["root"], 2);
    assert_eq!(json["depth"], 2);
    assert_eq!(json["width"], 1);
    assert_eq!(json["bags"][0]["parent"], 2);
    assert!(json["bags"][1]["parent"].is_null());
}

#[test]
fn generalized_decomposition_skips_descendant_condition() {
    let dir = tempfile::tempdir().unwrap();
    let instance = write(dir.path(), "pair.hgr", "p htd 2 2\n1 1 2\n2 1\n");
    let leaking = "2 1 2 2\n1 2\nb 1 1\nb 2 1 2\nw 1 1 1\nw 2 1 1\n";
    let ghtd = write(dir.path(), "pair.ghtd", &format!("s ghtd {leaking}"));
    let htd = write(dir.path(), "pair.htd", &format!("s htd {leaking}"));

    let output = htd_check(&["check", &instance, &ghtd]);
    assert_eq!(stdout(&output), "0.00000000|SUCCESS\n");

    let output = htd_check(&["--verbose", "check", &instance, &htd]);
    assert_eq!(
        stdout(&output),
        "-18000.00000000|Not all descendant condition satisfied\n"
    );
}
