#![cfg(all(unix, feature = "cli"))]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::thread;
use std::time::Duration;

const BANNER_ONLY_ISPELL: &str = r#"#!/bin/sh
echo "@(#) International Ispell Version 3.1.20 10/10/95"
while IFS= read -r line; do
  echo ""
done
"#;

fn unique_temp_dir(tag: &str) -> PathBuf {
    let dir = PathBuf::from(format!(
        "/tmp/gspell-opt-{tag}-{}-{}",
        std::process::id(),
        std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .expect("time should be after epoch")
            .as_nanos()
    ));
    std::fs::create_dir_all(&dir).expect("temp dir should be creatable");
    dir
}

fn install_engine(dir: &Path) -> PathBuf {
    let path = dir.join("ispell");
    std::fs::write(&path, BANNER_ONLY_ISPELL).expect("engine script should be writable");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
        .expect("engine script should be executable");
    path
}

fn gspell(args: &[&str], path_var: Option<&Path>) -> Output {
    for _ in 0..20 {
        let mut command = Command::new(env!("CARGO_BIN_EXE_gspell"));
        command
            .args(args)
            .env_remove("GSPELL_ISPELL")
            .stdin(Stdio::null());
        if let Some(path_var) = path_var {
            command.env("PATH", path_var);
        }
        let output = command.output().expect("gspell should run");
        if !String::from_utf8_lossy(&output.stderr).contains("Text file busy") {
            return output;
        }
        thread::sleep(Duration::from_millis(10));
    }
    panic!("engine script stayed busy");
}

#[test]
fn ispell_version_prints_banner_version() {
    let dir = unique_temp_dir("ispell-version");
    let engine = install_engine(&dir);

    let output = gspell(&["-i", engine.to_str().unwrap(), "-I"], None);

    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "gspell: Ispell version 3.1.20\n"
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn engine_is_found_on_path() {
    let dir = unique_temp_dir("path");
    install_engine(&dir);

    let output = gspell(&["--ispell-version"], Some(&dir));

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Ispell version 3.1.20"));
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn missing_engine_exits_1() {
    let dir = unique_temp_dir("no-engine");

    let output = gspell(&[], Some(&dir));

    assert_eq!(output.status.code(), Some(1));
    assert_eq!(
        String::from_utf8_lossy(&output.stderr),
        "gspell: unable to locate Ispell\n"
    );
    let _ = std::fs::remove_dir_all(&dir);
}

#[test]
fn unexecutable_engine_exits_1() {
    let output = gspell(&["-i", "/no/such/ispell"], None);

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr)
        .starts_with("gspell: error executing /no/such/ispell: "));
}

#[test]
fn version_and_help_exit_0() {
    let version = gspell(&["-V"], None);
    assert!(version.status.success());
    assert!(String::from_utf8_lossy(&version.stderr).starts_with("gspell: version "));

    let help = gspell(&["--help"], None);
    assert!(help.status.success());
    let usage = String::from_utf8_lossy(&help.stdout);
    assert!(usage.contains("--ispell-version"));
    assert!(usage.contains("--print-file-name"));
}

#[test]
fn bad_option_exits_1() {
    let output = gspell(&["--no-such-option"], None);
    assert_eq!(output.status.code(), Some(1));
    assert!(!output.stderr.is_empty());
}
