//! End-to-end tests that hand control to a real delegate and observe the
//! environment it inherits. Unix-only: they rely on shebang scripts and
//! exec-style process replacement.
#![cfg(unix)]

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::PathBuf;
use tempfile::TempDir;

/// Test fixture with a library directory and a delegate script that
/// reports what it sees: the library search path, the module path, and
/// its argument vector.
struct LauncherFixture {
    temp_dir: TempDir,
    lib_dir: PathBuf,
    script: PathBuf,
}

impl LauncherFixture {
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("failed to create temp dir");
        let lib_dir = temp_dir.path().join("libs");
        fs::create_dir(&lib_dir).expect("failed to create lib dir");

        let script = temp_dir.path().join("run.sh");
        fs::write(
            &script,
            "#!/bin/sh\n\
             printf 'libpath=%s\\n' \"$LD_LIBRARY_PATH\"\n\
             printf 'modpath=%s\\n' \"$PYTHONPATH\"\n\
             printf 'args=%s\\n' \"$*\"\n",
        )
        .expect("failed to write delegate script");
        let mut perms = fs::metadata(&script).expect("missing script").permissions();
        perms.set_mode(0o755);
        fs::set_permissions(&script, perms).expect("failed to chmod script");

        Self {
            temp_dir,
            lib_dir,
            script,
        }
    }

    /// Run dlldir with a clean search-path environment
    fn command(&self) -> Command {
        let mut cmd = Command::cargo_bin("dlldir").expect("failed to find dlldir binary");
        cmd.env_remove("LD_LIBRARY_PATH");
        cmd.env_remove("PYTHONPATH");
        cmd
    }

    fn canonical_lib_dir(&self) -> PathBuf {
        self.lib_dir.canonicalize().unwrap()
    }

    fn canonical_script_dir(&self) -> PathBuf {
        self.script.parent().unwrap().canonicalize().unwrap()
    }
}

#[test]
fn test_delegate_sees_injected_library_path() {
    let fixture = LauncherFixture::new();
    fixture
        .command()
        .arg(&fixture.lib_dir)
        .arg(&fixture.script)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "libpath={}\n",
            fixture.canonical_lib_dir().display()
        )));
}

#[test]
fn test_existing_library_path_kept_as_suffix() {
    let fixture = LauncherFixture::new();
    fixture
        .command()
        .env("LD_LIBRARY_PATH", "/existing")
        .arg(&fixture.lib_dir)
        .arg(&fixture.script)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "libpath={}:/existing\n",
            fixture.canonical_lib_dir().display()
        )));
}

#[test]
fn test_residual_arguments_reach_delegate_in_order() {
    let fixture = LauncherFixture::new();
    fixture
        .command()
        .arg(&fixture.lib_dir)
        .arg(&fixture.script)
        .args(["arg1", "arg2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("args=arg1 arg2\n"));
}

#[test]
fn test_hyphen_arguments_pass_through_unparsed() {
    let fixture = LauncherFixture::new();
    fixture
        .command()
        .arg(&fixture.lib_dir)
        .arg(&fixture.script)
        .args(["--flag", "-x"])
        .assert()
        .success()
        .stdout(predicate::str::contains("args=--flag -x\n"));
}

#[test]
fn test_script_directory_prepended_to_module_path() {
    let fixture = LauncherFixture::new();
    fixture
        .command()
        .arg(&fixture.lib_dir)
        .arg(&fixture.script)
        .assert()
        .success()
        .stdout(predicate::str::contains(format!(
            "modpath={}\n",
            fixture.canonical_script_dir().display()
        )));
}

#[test]
fn test_verbose_reports_both_mutations() {
    let fixture = LauncherFixture::new();
    fixture
        .command()
        .arg("-v")
        .arg(&fixture.lib_dir)
        .arg(&fixture.script)
        .assert()
        .success()
        .stderr(predicate::str::contains(format!(
            "dlldir: added {} to LD_LIBRARY_PATH",
            fixture.canonical_lib_dir().display()
        )))
        .stderr(predicate::str::contains(format!(
            "dlldir: added {} to PYTHONPATH",
            fixture.canonical_script_dir().display()
        )));
}

#[test]
fn test_quiet_by_default() {
    let fixture = LauncherFixture::new();
    fixture
        .command()
        .arg(&fixture.lib_dir)
        .arg(&fixture.script)
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_double_dash_makes_following_flag_positional() {
    // After `--`, `-v` is the dll directory, not the verbose flag.
    let fixture = LauncherFixture::new();
    fixture
        .command()
        .current_dir(fixture.temp_dir.path())
        .arg("--")
        .arg("-v")
        .arg(&fixture.script)
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains("/-v\n"));
}

#[test]
fn test_flag_after_first_positional_is_the_program() {
    // Flag scanning stops at the first positional: `-v` here is the
    // program to run, which does not exist, so the transfer fails.
    let fixture = LauncherFixture::new();
    fixture
        .command()
        .current_dir(fixture.temp_dir.path())
        .arg(&fixture.lib_dir)
        .arg("-v")
        .arg(&fixture.script)
        .assert()
        .failure()
        .code(127)
        .stderr(predicate::str::contains("failed to execute"))
        .stderr(predicate::str::contains("LD_LIBRARY_PATH").not());
}

#[test]
fn test_verbose_flag_after_both_positionals_reaches_delegate() {
    let fixture = LauncherFixture::new();
    fixture
        .command()
        .arg(&fixture.lib_dir)
        .arg(&fixture.script)
        .args(["-v", "arg1"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty())
        .stdout(predicate::str::contains("args=-v arg1\n"));
}

#[test]
fn test_zip_archive_target_gets_no_module_path_prelude() {
    // A zip archive is an importable root by itself, whatever its
    // extension; only plain script files get the PYTHONPATH prepend.
    let fixture = LauncherFixture::new();
    let archive = fixture.temp_dir.path().join("bundle.pyz");
    let mut payload = b"PK\x03\x04".to_vec();
    payload.extend_from_slice(&[0u8; 32]);
    fs::write(&archive, payload).expect("failed to write archive");

    fixture
        .command()
        .arg("-v")
        .arg(&fixture.lib_dir)
        .arg(&archive)
        .assert()
        .failure()
        .code(127)
        .stderr(predicate::str::contains("LD_LIBRARY_PATH"))
        .stderr(predicate::str::contains("PYTHONPATH").not());
}

#[test]
fn test_missing_delegate_exits_127() {
    let fixture = LauncherFixture::new();
    fixture
        .command()
        .arg(&fixture.lib_dir)
        .arg(fixture.temp_dir.path().join("missing.sh"))
        .assert()
        .failure()
        .code(127)
        .stderr(predicate::str::contains("failed to execute"));
}
