use std::{fs, path::PathBuf};

use tempfile::tempdir;

use trackscheme_cli::{Args, run};

/// Collects all .toml files from a directory
fn collect_lineage_files(dir: PathBuf) -> Vec<PathBuf> {
    let mut files = if let Ok(entries) = fs::read_dir(&dir) {
        entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().and_then(|s| s.to_str()) == Some("toml")
            })
            .collect()
    } else {
        Vec::new()
    };

    // Sort for consistent test output
    files.sort();
    files
}

/// Demo lineages live at the workspace root, not in the crate.
fn demos_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .parent()
        .unwrap()
        .join("demos")
}

fn args_for(input: &PathBuf, output: PathBuf, report: Option<PathBuf>) -> Args {
    Args {
        input: input.to_string_lossy().to_string(),
        output: output.to_string_lossy().to_string(),
        report: report.map(|path| path.to_string_lossy().to_string()),
        config: None,
        log_level: "off".to_string(),
    }
}

#[test]
fn e2e_smoke_test_valid_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let demos = collect_lineage_files(demos_path());

    assert!(!demos.is_empty(), "No demo lineages found in demos/");

    let mut failed = Vec::new();

    for demo in &demos {
        let stem = demo.file_stem().unwrap().to_string_lossy().to_string();
        let output = temp_dir.path().join(format!("{stem}.svg"));
        let report = temp_dir.path().join(format!("{stem}.layout.toml"));

        match run(&args_for(demo, output.clone(), Some(report.clone()))) {
            Ok(()) => {
                let svg = fs::read_to_string(&output).unwrap();
                assert!(svg.contains("<svg"), "{} produced no SVG", demo.display());
                assert!(report.exists(), "{} produced no report", demo.display());
            }
            Err(e) => failed.push((demo.clone(), e)),
        }
    }

    if !failed.is_empty() {
        eprintln!("\nDemos that failed:");
        for (path, err) in &failed {
            eprintln!("  - {}: {}", path.display(), err);
        }
        panic!("{} demo(s) failed unexpectedly", failed.len());
    }
}

#[test]
fn e2e_smoke_test_error_demos() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let error_demos = collect_lineage_files(demos_path().join("errors"));

    assert!(
        !error_demos.is_empty(),
        "No error demos found in demos/errors/"
    );

    let mut unexpectedly_succeeded = Vec::new();

    for demo in &error_demos {
        let output = temp_dir.path().join(format!(
            "error_{}.svg",
            demo.file_stem().unwrap().to_string_lossy()
        ));

        if run(&args_for(demo, output.clone(), None)).is_ok() {
            unexpectedly_succeeded.push(demo.clone());
        }
        assert!(!output.exists(), "{} wrote output", demo.display());
    }

    if !unexpectedly_succeeded.is_empty() {
        eprintln!("\nError demos that unexpectedly succeeded:");
        for path in &unexpectedly_succeeded {
            eprintln!("  - {}", path.display());
        }
        panic!(
            "{} error demo(s) succeeded unexpectedly",
            unexpectedly_succeeded.len()
        );
    }
}

#[test]
fn e2e_report_matches_chain_layout() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let chain = demos_path().join("chain.toml");
    let report = temp_dir.path().join("chain.layout.toml");

    run(&args_for(
        &chain,
        temp_dir.path().join("chain.svg"),
        Some(report.clone()),
    ))
    .expect("chain demo should lay out");

    let parsed: toml::Table = toml::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    let placements = parsed["placements"].as_array().unwrap();
    assert_eq!(placements.len(), 3);
    for (row, placement) in placements.iter().enumerate() {
        assert_eq!(placement["column"].as_integer(), Some(1));
        assert_eq!(placement["row"].as_integer(), Some(row as i64));
    }
    assert_eq!(
        parsed["column_widths"].as_array().unwrap(),
        &vec![toml::Value::Integer(1)]
    );
}

#[test]
fn e2e_explicit_config_is_applied() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = temp_dir.path().join("config.toml");
    fs::write(
        &config,
        "[geometry]\ncolumn_width = 100.0\ncell_width = 50.0\n",
    )
    .unwrap();
    let report = temp_dir.path().join("chain.layout.toml");

    let mut args = args_for(
        &demos_path().join("chain.toml"),
        temp_dir.path().join("chain.svg"),
        Some(report.clone()),
    );
    args.config = Some(config.to_string_lossy().to_string());
    run(&args).expect("chain demo should lay out");

    let parsed: toml::Table = toml::from_str(&fs::read_to_string(report).unwrap()).unwrap();
    let x = parsed["placements"][0]["x"].as_float().unwrap();
    assert!((x - 75.0).abs() < 1e-6);
}
