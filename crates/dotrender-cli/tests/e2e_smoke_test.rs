use std::{
    fs,
    path::{Path, PathBuf},
};

use clap::Parser;
use tempfile::tempdir;

use dotrender::{RenderError, parameter::ParameterKind};
use dotrender_cli::{Args, list_values, run};

/// Writes a config file pointing the backend at `binary`.
fn write_config(dir: &Path, binary: &Path) -> PathBuf {
    let config = dir.join("config.toml");
    fs::write(
        &config,
        format!(
            "[backend]\nbinary = {:?}\n\n[registry]\nformat = [\"webp2\"]\n",
            binary.display().to_string()
        ),
    )
    .expect("Failed to write config");
    config
}

fn write_source(dir: &Path) -> PathBuf {
    let source = dir.join("spam.gv");
    fs::write(&source, "digraph { spam -> eggs }").expect("Failed to write source");
    source
}

fn args(config: &Path, rest: &[&str]) -> Args {
    let config = config.to_string_lossy();
    let mut argv = vec!["dotrender", "--log-level", "off", "-c", config.as_ref()];
    argv.extend_from_slice(rest);
    Args::try_parse_from(argv).expect("Failed to parse arguments")
}

#[cfg(unix)]
fn write_script(path: &Path, body: &str) {
    use std::os::unix::fs::PermissionsExt;

    fs::write(path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    fs::set_permissions(path, fs::Permissions::from_mode(0o755))
        .expect("Failed to make script executable");
}

/// Every test that spawns a process lives here, so that no other test thread
/// forks while a script is still open for writing.
#[cfg(unix)]
#[test]
fn e2e_smoke_test_engine_runs() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let dir = temp_dir.path();
    let source = write_source(dir);

    // Stands in for `dot`: writes the result the real engine would write.
    let engine = dir.join("fake-dot");
    write_script(
        &engine,
        r#"case "$3" in
  -o) printf 'rendered' > "$4" ;;
  -O) printf 'rendered' > "$4.${2#-T}" ;;
esac"#,
    );
    let config = write_config(dir, &engine);

    // Explicit outfile
    let outfile = dir.join("out.png");
    let rendered = run(&args(
        &config,
        &["-o", &outfile.to_string_lossy(), &source.to_string_lossy()],
    ))
    .expect("Failed to render with outfile");
    assert_eq!(rendered.path(), outfile);
    assert_eq!(fs::read_to_string(&outfile).unwrap(), "rendered");

    // Engine-chosen name next to the source
    let rendered = run(&args(&config, &["-T", "png", &source.to_string_lossy()]))
        .expect("Failed to render with default naming");
    assert_eq!(rendered.path(), dir.join("spam.gv.png"));
    assert!(rendered.path().exists());

    // --no-clobber refuses the existing result
    let err = run(&args(
        &config,
        &["--no-clobber", "-T", "png", &source.to_string_lossy()],
    ))
    .unwrap_err();
    assert!(matches!(err, RenderError::ResultExists(_)));

    // A failing engine
    let failing = dir.join("failing-dot");
    write_script(&failing, "echo 'Error: syntax error in line 1' >&2\nexit 1");
    let config = write_config(dir, &failing);
    let err = run(&args(&config, &["-q", "-T", "svg", &source.to_string_lossy()])).unwrap_err();
    match err {
        RenderError::ProcessFailed { code, stderr, .. } => {
            assert_eq!(code, Some(1));
            assert!(stderr.contains("syntax error"));
        }
        other => panic!("Expected ProcessFailed, got {other:?}"),
    }

    // No engine at all
    let config = write_config(dir, &dir.join("missing-dot"));
    let err = run(&args(&config, &["-T", "svg", &source.to_string_lossy()])).unwrap_err();
    assert!(matches!(err, RenderError::ExecutableNotFound { .. }));
}

#[test]
fn e2e_smoke_test_dry_run_writes_nothing() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let dir = temp_dir.path();
    let config = write_config(dir, &dir.join("missing-dot"));
    let outfile = dir.join("spam.pdf");

    let rendered = run(&args(
        &config,
        &["--dry-run", "-o", &outfile.to_string_lossy()],
    ))
    .expect("Dry run failed");

    assert_eq!(rendered.path(), outfile);
    assert!(!outfile.exists());
}

#[test]
fn e2e_smoke_test_configuration_errors() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let dir = temp_dir.path();

    let missing = dir.join("nope.toml");
    let err = run(&args(&missing, &["-o", "spam.pdf"])).unwrap_err();
    assert!(matches!(err, RenderError::Config(_)));

    let config = write_config(dir, Path::new("dot"));
    let err = run(&args(&config, &["--dry-run", "-T", "png"])).unwrap_err();
    assert!(matches!(err, RenderError::RequiredArgument(_)));
    assert!(err.is_configuration_error());
}

#[test]
fn e2e_smoke_test_list_includes_configured_values() {
    let temp_dir = tempdir().expect("Failed to create temp directory");
    let config = write_config(temp_dir.path(), Path::new("dot"));

    let values = list_values(&args(&config, &[]), ParameterKind::Format)
        .expect("Failed to list formats");

    assert!(values.iter().any(|v| v == "png"));
    assert!(values.iter().any(|v| v == "webp2"));
    assert!(values.windows(2).all(|w| w[0] <= w[1]));
}
