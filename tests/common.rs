#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn pha() -> Command {
    cargo_bin_cmd!("phainspect")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_phainspect.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB and create two inspections (SO 3184948 and 3184949)
pub fn init_db_with_data(db_path: &str) {
    pha()
        .args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    create_inspection(db_path, "041529", "901", "2025-05-02");
    create_inspection(db_path, "060001", "801", "2025-06-10");
}

pub fn create_inspection(db_path: &str, unit: &str, site: &str, date: &str) {
    pha()
        .args([
            "--db",
            db_path,
            "inspection",
            "create",
            "--unit",
            unit,
            "--site",
            site,
            "--address",
            &format!("{unit} Main St"),
            "--date",
            date,
        ])
        .assert()
        .success();
}
