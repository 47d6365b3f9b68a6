// Functional tests for the cra binary
// These run the built executable against an isolated home directory, offline

#[cfg(test)]
mod functional_tests {
    use std::path::Path;
    use std::process::{Command, Output};
    use tempfile::TempDir;

    // Runs cra with config, cache and data directories inside `home`
    fn run_cra(home: &Path, args: &[&str]) -> Output {
        Command::new(env!("CARGO_BIN_EXE_cra"))
            .args(args)
            .env("HOME", home)
            .env("XDG_CONFIG_HOME", home.join(".config"))
            .env("XDG_CACHE_HOME", home.join(".cache"))
            .env("XDG_DATA_HOME", home.join(".local/share"))
            .env("RUST_LOG", "error")
            .output()
            .expect("Failed to execute cra binary")
    }

    fn stdout(output: &Output) -> String {
        String::from_utf8_lossy(&output.stdout).to_string()
    }

    fn stderr(output: &Output) -> String {
        String::from_utf8_lossy(&output.stderr).to_string()
    }

    #[test]
    fn test_help_lists_commands() {
        let home = TempDir::new().unwrap();
        let output = run_cra(home.path(), &["--help"]);

        assert!(output.status.success());
        let text = stdout(&output);
        for command in ["show", "export", "holidays", "config"] {
            assert!(text.contains(command), "missing {} in help", command);
        }
    }

    #[test]
    fn test_version() {
        let home = TempDir::new().unwrap();
        let output = run_cra(home.path(), &["--version"]);

        assert!(output.status.success());
        assert!(stdout(&output).contains(env!("CARGO_PKG_VERSION")));
    }

    #[test]
    fn test_show_offline_without_cache() {
        let home = TempDir::new().unwrap();
        let output = run_cra(home.path(), &["show", "-m", "2024-05", "--offline"]);

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let text = stdout(&output);
        assert!(text.starts_with("CRA - May 2024"));
        assert!(text.contains("2024-05-04   Sa   weekend"));
        assert!(text.contains("2024-05-31   Fr   -"));
        assert!(text.contains("Total: 0 days (23 working days)"));
        assert!(stderr(&output).contains("public holidays for 2024 unavailable"));
    }

    #[test]
    fn test_show_rejects_invalid_month() {
        let home = TempDir::new().unwrap();
        let output = run_cra(home.path(), &["show", "-m", "2024-13", "--offline"]);

        assert!(!output.status.success());
        assert!(stderr(&output).contains("2024-13"));
    }

    #[test]
    fn test_export_writes_named_pdf() {
        let home = TempDir::new().unwrap();
        let out_dir = home.path().join("reports");
        let out = out_dir.to_str().unwrap();

        let output = run_cra(
            home.path(),
            &[
                "export", "-m", "2024-05", "--fill", "0.5", "--set", "2024-05-02=1", "-o", out,
                "--offline",
            ],
        );

        assert!(output.status.success(), "stderr: {}", stderr(&output));
        let pdf = out_dir.join("CRA May 2024.pdf");
        assert!(pdf.exists());
        assert!(std::fs::read(&pdf).unwrap().starts_with(b"%PDF"));
        assert!(stdout(&output).contains("total 12 days"));
    }

    #[test]
    fn test_export_rejects_weekend_assignment() {
        let home = TempDir::new().unwrap();
        let out_dir = home.path().join("reports");

        let output = run_cra(
            home.path(),
            &[
                "export",
                "-m",
                "2024-05",
                "--set",
                "2024-05-04=1",
                "-o",
                out_dir.to_str().unwrap(),
                "--offline",
            ],
        );

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).starts_with("Error:") || stderr(&output).contains("\nError:"));
        assert!(!out_dir.join("CRA May 2024.pdf").exists());
    }

    #[test]
    fn test_export_rejects_negative_fill() {
        let home = TempDir::new().unwrap();
        let output = run_cra(home.path(), &["export", "--fill=-1", "--offline"]);
        assert!(!output.status.success());
        assert!(stderr(&output).contains("Invalid activity value: -1"));

        let output = run_cra(home.path(), &["export", "--fill", "abc", "--offline"]);
        assert!(!output.status.success());
        assert!(stderr(&output).contains("Invalid activity value: abc"));
    }

    #[test]
    fn test_holidays_rejects_out_of_range_year() {
        let home = TempDir::new().unwrap();
        let output = run_cra(home.path(), &["holidays", "-y", "0"]);

        assert_eq!(output.status.code(), Some(1));
        assert!(stderr(&output).contains("Invalid year: 0"));
    }

    #[test]
    fn test_config_update_is_persisted() {
        let home = TempDir::new().unwrap();

        let output = run_cra(
            home.path(),
            &["config", "--employee-name", "Camille Martin", "--company-name", "Acme"],
        );
        assert!(output.status.success(), "stderr: {}", stderr(&output));
        assert!(stdout(&output).contains("Configuration saved to"));

        let output = run_cra(home.path(), &["config"]);
        assert!(output.status.success());
        let text = stdout(&output);
        assert!(text.contains("\"employee_name\": \"Camille Martin\""));
        assert!(text.contains("\"company_name\": \"Acme\""));
        assert!(text.contains("\"default_units\": 0.5"));
    }
}
