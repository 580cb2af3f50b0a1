#![allow(dead_code)]

use assert_cmd::{assert::Assert, Command};
use assert_fs::{prelude::*, TempDir};

pub const FIXED_DATE: &str = "2024-05-15";

/// A throwaway SpendSmart home directory with sample seeding switched off.
pub struct TestHome {
    pub dir: TempDir,
}

impl TestHome {
    pub fn new() -> Self {
        let home = Self::seeded();
        home.dir
            .child("config/config.json")
            .write_str(r#"{"seed_sample_data": false, "ui_color_enabled": false}"#)
            .unwrap();
        home
    }

    /// A home without a config file, so the first run writes demo data.
    pub fn seeded() -> Self {
        Self {
            dir: TempDir::new().unwrap(),
        }
    }

    pub fn run(&self, script: &str) -> Assert {
        Command::cargo_bin("spendsmart_cli")
            .unwrap()
            .env("SPENDSMART_CLI_SCRIPT", "1")
            .env("SPENDSMART_HOME", self.dir.path())
            .env("SPENDSMART_FIXED_DATE", FIXED_DATE)
            .env("NO_COLOR", "1")
            .env_remove("API_KEY")
            .env_remove("RUST_LOG")
            .write_stdin(script.to_string())
            .assert()
    }

    pub fn stdout_of(&self, script: &str) -> String {
        let output = self.run(script).success().get_output().stdout.clone();
        String::from_utf8(output).unwrap()
    }
}
