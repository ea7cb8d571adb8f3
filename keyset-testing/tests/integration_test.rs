use std::{fs, path::PathBuf};

use keyset_testing::config::KeysetTesting;

const BIN: &str = "keyset-testing-server";

// check that we can generate a config file
#[test]
fn generate_config() {
    let tmpdir = PathBuf::from(env!("CARGO_TARGET_TMPDIR")).join("gen-config");
    fs::create_dir_all(&tmpdir).unwrap();
    let config_path = tmpdir.join("keyset-testing.toml");
    let _ = fs::remove_file(&config_path);

    let output = test_bin::get_test_bin(BIN)
        .args(["gen-config"])
        .arg(&config_path)
        .output()
        .expect("Failed to start {BIN}");
    assert!(output.status.success());

    let config = KeysetTesting::load(&config_path).unwrap();
    config.validate().unwrap();

    // refuses to overwrite without --force
    let output = test_bin::get_test_bin(BIN)
        .args(["gen-config"])
        .arg(&config_path)
        .output()
        .expect("Failed to start {BIN}");
    assert!(!output.status.success());

    let output = test_bin::get_test_bin(BIN)
        .args(["gen-config", "--force"])
        .arg(&config_path)
        .output()
        .expect("Failed to start {BIN}");
    assert!(output.status.success());

    // cleanup
    fs::remove_dir_all(&tmpdir).unwrap();
}

// check that serving without anywhere to listen fails early
#[test]
fn serve_requires_listen_address() {
    let output = test_bin::get_test_bin(BIN)
        .args(["serve"])
        .output()
        .expect("Failed to start {BIN}");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("no listen address"));
}
