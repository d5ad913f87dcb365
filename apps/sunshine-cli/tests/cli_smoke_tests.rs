//! CLI smoke tests for the sunshine-cli binary
//!
//! These tests drive the real binary: help output, configuration validation,
//! one dashboard render against the demo data and both registration paths.

use std::path::Path;
use std::process::{Command, Stdio};
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

/// Helper to run the sunshine-cli binary with given arguments
fn run_sunshine_cli(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_sunshine-cli"))
        .args(args)
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .expect("Failed to execute sunshine-cli")
}

/// Helper to run the sunshine-cli binary with timeout
async fn run_sunshine_cli_with_timeout(
    args: &[&str],
    timeout_duration: Duration,
) -> Result<std::process::Output, Box<dyn std::error::Error>> {
    let mut cmd = tokio::process::Command::new(env!("CARGO_BIN_EXE_sunshine-cli"));
    cmd.args(args).stdout(Stdio::piped()).stderr(Stdio::piped());

    match timeout(timeout_duration, cmd.output()).await {
        Ok(result) => result.map_err(|e| e.into()),
        Err(elapsed) => Err(elapsed.into()),
    }
}

/// Minimal config whose home_dir (and therefore log files) lives in `dir`.
fn write_config(dir: &Path, extra: &str) -> String {
    let config_path = dir.join("sunshine.yaml");
    let config_content = format!(
        r#"
app:
  home_dir: "{}"

logging:
  default:
    console_level: error
    file: "logs/sunshine.log"
    file_level: info
    max_backups: 1
    max_size_mb: 1
{extra}"#,
        dir.display()
    );
    std::fs::write(&config_path, config_content).expect("Failed to write config file");
    config_path.to_str().unwrap().to_string()
}

#[test]
fn test_cli_help_command() {
    let output = run_sunshine_cli(&["--help"]);

    assert!(output.status.success(), "Help command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sunshine-cli"), "Should contain binary name");
    assert!(
        stdout.contains("Usage:") || stdout.contains("USAGE:"),
        "Should contain usage information"
    );
    assert!(stdout.contains("dashboard"), "Should contain 'dashboard' subcommand");
    assert!(stdout.contains("register"), "Should contain 'register' subcommand");
    assert!(stdout.contains("check"), "Should contain 'check' subcommand");
    assert!(stdout.contains("--config"), "Should mention config option");
}

#[test]
fn test_cli_version_command() {
    let output = run_sunshine_cli(&["--version"]);

    assert!(output.status.success(), "Version command should succeed");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sunshine-cli"), "Should contain binary name");
    assert!(
        stdout.chars().any(|c| c.is_ascii_digit()),
        "Should contain version numbers"
    );
}

#[test]
fn test_cli_invalid_command() {
    let output = run_sunshine_cli(&["invalid-command"]);

    assert!(!output.status.success(), "Invalid command should fail");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("error") || stderr.contains("invalid") || stderr.contains("unexpected"),
        "Should contain error message about invalid command"
    );
}

#[test]
fn test_cli_config_validation_missing_file() {
    let output = run_sunshine_cli(&["--config", "/nonexistent/config.yaml", "check"]);

    assert!(!output.status.success(), "Should fail with missing config");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("config") && stderr.contains("not found"),
        "Should mention config file issue: {}",
        stderr
    );
}

#[test]
fn test_cli_config_validation_invalid_yaml() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = temp_dir.path().join("invalid.yaml");

    std::fs::write(&config_path, "invalid: yaml: content: [unclosed")
        .expect("Failed to write file");

    let output = run_sunshine_cli(&["--config", config_path.to_str().unwrap(), "check"]);

    assert!(!output.status.success(), "Should fail with invalid YAML");

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("yaml") || stderr.contains("parse"),
        "Should mention YAML parsing issue: {}",
        stderr
    );
}

#[test]
fn test_cli_config_validation_valid_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
modules:
  psico_agenda:
    refresh_interval: 10s
    upcoming_limit: 3
"#,
    );

    let output = run_sunshine_cli(&["--config", &config_path, "check"]);

    if !output.status.success() {
        eprintln!("STDERR: {}", String::from_utf8_lossy(&output.stderr));
        eprintln!("STDOUT: {}", String::from_utf8_lossy(&output.stdout));
    }
    assert!(output.status.success(), "Should succeed with valid config");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Configuration check passed"), "{stdout}");
    assert!(stdout.contains("upcoming limit 3"), "{stdout}");
}

#[test]
fn test_cli_check_rejects_unknown_module_key() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(
        temp_dir.path(),
        r#"
modules:
  psico_agenda:
    refresh_every: 10s
"#,
    );

    let output = run_sunshine_cli(&["--config", &config_path, "check"]);

    assert!(!output.status.success(), "Unknown module keys must be rejected");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("psico_agenda"), "{stderr}");
}

#[test]
fn test_cli_print_config() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_sunshine_cli(&["--config", &config_path, "--print-config"]);

    assert!(output.status.success(), "Print config should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("home_dir"), "{stdout}");
    assert!(stdout.contains("Sunshine"), "{stdout}");
}

#[tokio::test]
async fn test_cli_dashboard_renders_demo_practice() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_sunshine_cli_with_timeout(
        &["--config", &config_path, "dashboard", "--user", "p1", "--cycles", "1"],
        Duration::from_secs(10),
    )
    .await
    .expect("dashboard should finish after one refresh");

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "STDOUT: {stdout}\nSTDERR: {stderr}");

    assert!(stdout.contains("Dashboard"), "{stdout}");
    assert!(stdout.contains("Bem-vindo, Dra. Ana Souza"), "{stdout}");
    assert!(stdout.contains("Pacientes Ativos:       3"), "{stdout}");
    assert!(stdout.contains("Sessões Concluídas:     2"), "{stdout}");
    assert!(stdout.contains("Solicitações Pendentes: 1"), "{stdout}");
    assert!(stdout.contains("Próximos Agendamentos"), "{stdout}");
    assert!(stdout.contains("Carla Mendes"), "{stdout}");
}

#[tokio::test]
async fn test_cli_dashboard_new_psychologist_sees_welcome() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_sunshine_cli_with_timeout(
        &["--config", &config_path, "dashboard", "--user", "p2"],
        Duration::from_secs(10),
    )
    .await
    .expect("dashboard should finish after one refresh");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Bem-vindo ao Sunshine!"), "{stdout}");
    assert!(!stdout.contains("Próximos Agendamentos"), "{stdout}");
}

#[test]
fn test_cli_dashboard_rejects_patient_account() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_sunshine_cli(&["--config", &config_path, "dashboard", "--user", "pt1"]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("psychologists"), "{stderr}");
}

#[test]
fn test_cli_register_password_mismatch() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_sunshine_cli(&[
        "--config",
        &config_path,
        "register",
        "--role",
        "paciente",
        "--name",
        "Gabi Nunes",
        "--email",
        "gabi@example.com",
        "--password",
        "segredo1",
        "--confirm",
        "segredo2",
        "--phone",
        "(11) 90000-0000",
        "--birth-date",
        "1995-01-01",
    ]);

    assert!(!output.status.success(), "Mismatched passwords must fail");
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Senhas não coincidem"), "{stderr}");
}

#[test]
fn test_cli_register_psychologist() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_sunshine_cli(&[
        "--config",
        &config_path,
        "register",
        "--role",
        "psicologo",
        "--name",
        "Helena Castro",
        "--email",
        "helena@example.com",
        "--password",
        "segredo",
        "--confirm",
        "segredo",
        "--phone",
        "(21) 97777-0000",
        "--crp",
        "05/11111",
        "--specialty",
        "TCC",
    ]);

    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(output.status.success(), "STDOUT: {stdout}\nSTDERR: {stderr}");
    assert!(stdout.contains("Conta criada com sucesso"), "{stdout}");
    assert!(stdout.contains("Helena Castro <helena@example.com> [psicologo]"), "{stdout}");
}

#[test]
fn test_cli_register_duplicate_email_shows_api_message() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let config_path = write_config(temp_dir.path(), "");

    let output = run_sunshine_cli(&[
        "--config",
        &config_path,
        "register",
        "--name",
        "Outra Ana",
        "--email",
        "ana@sunshine.app",
        "--password",
        "x",
        "--confirm",
        "x",
        "--phone",
        "1",
        "--birth-date",
        "2000-01-01",
    ]);

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("E-mail 'ana@sunshine.app' já está cadastrado"),
        "{stderr}"
    );
}

#[test]
fn test_cli_subcommand_help() {
    let output = run_sunshine_cli(&["dashboard", "--help"]);
    assert!(output.status.success(), "Dashboard help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--cycles"), "{stdout}");

    let output = run_sunshine_cli(&["register", "--help"]);
    assert!(output.status.success(), "Register help should succeed");
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("--crp"), "{stdout}");
}
