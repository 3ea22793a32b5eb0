use assert_cmd::Command;

fn posters(config_dir: &str) -> Command {
    let dir = std::env::temp_dir().join(config_dir);
    std::fs::create_dir_all(&dir).unwrap();

    let mut cmd = Command::cargo_bin("posters").unwrap();
    cmd.env("POSTERS_CONFIG_DIR", &dir)
        .env_remove("POSTERS_AUTH__SECRET")
        .env_remove("POSTERS_AUTH__EXPIRATION")
        .env_remove("SECURITY_JWT_SECRET")
        .env_remove("SECURITY_JWT_EXPIRATION")
        .env_remove("POSTERS_ENV");
    cmd
}

#[test]
fn help_lists_subcommands() {
    let output = posters("posters-cli-help").arg("--help").output().unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    for subcommand in ["seed", "serve", "token"] {
        assert!(stdout.contains(subcommand), "missing {subcommand} in:\n{stdout}");
    }
}

#[test]
fn token_without_secret_fails() {
    let output = posters("posters-cli-no-secret").arg("token").output().unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("invalid auth settings"), "{stderr}");
}

#[test]
fn token_is_printed_with_configured_secret() {
    let output = posters("posters-cli-token")
        .args(["token", "--subject", "ci", "--ttl", "5m"])
        .env("POSTERS_AUTH__SECRET", "cli-test-secret-long-enough-for-hs256")
        .env("POSTERS_AUTH__EXPIRATION", "1h")
        .output()
        .unwrap();
    assert!(output.status.success());

    let stdout = String::from_utf8(output.stdout).unwrap();
    let token = stdout.trim_end();
    assert_eq!(token.split('.').count(), 3, "not a JWT: {token}");
    assert!(stdout.ends_with('\n'));
}

#[test]
fn token_honours_legacy_security_variables() {
    let output = posters("posters-cli-legacy-token")
        .arg("token")
        .env("SECURITY_JWT_SECRET", "legacy-cli-secret-long-enough-for-hs256")
        .env("SECURITY_JWT_EXPIRATION", "15m")
        .output()
        .unwrap();
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8(output.stdout).unwrap();
    assert_eq!(stdout.trim_end().split('.').count(), 3);
}

#[test]
fn token_rejects_short_secret() {
    let output = posters("posters-cli-short-secret")
        .arg("token")
        .env("POSTERS_AUTH__SECRET", "too-short")
        .env("POSTERS_AUTH__EXPIRATION", "1h")
        .output()
        .unwrap();
    assert!(!output.status.success());

    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("at least 32 bytes"), "{stderr}");
}
