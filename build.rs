use std::env;
use std::process::Command;

/// Embeds git, toolchain and target details shown by `bookstore_cli --version`.
fn main() {
    for path in ["build.rs", ".git/HEAD", ".git/refs"] {
        println!("cargo:rerun-if-changed={path}");
    }

    let git_hash = command_output("git", &["rev-parse", "--short", "HEAD"])
        .filter(|hash| !hash.is_empty())
        .unwrap_or_else(|| "unknown".into());
    let git_status = match command_output("git", &["status", "--porcelain"]) {
        Some(changes) if changes.is_empty() => "clean",
        Some(_) => "dirty",
        None => "unknown",
    };
    let rustc = env::var("RUSTC").unwrap_or_else(|_| "rustc".into());
    let rustc_version = command_output(&rustc, &["--version"]).unwrap_or_else(|| "unknown".into());
    let timestamp = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);

    let vars = [
        ("HASH", git_hash),
        ("STATUS", git_status.to_string()),
        ("TIMESTAMP", timestamp),
        ("TARGET", env::var("TARGET").unwrap_or_else(|_| "unknown-target".into())),
        ("PROFILE", env::var("PROFILE").unwrap_or_else(|_| "unknown-profile".into())),
        ("RUSTC", rustc_version),
    ];
    for (name, value) in vars {
        println!("cargo:rustc-env=BOOKSTORE_BUILD_{name}={value}");
    }
}

/// Trimmed stdout of a successful command.
fn command_output(program: &str, args: &[&str]) -> Option<String> {
    let output = Command::new(program).args(args).output().ok()?;
    if !output.status.success() {
        return None;
    }
    String::from_utf8(output.stdout)
        .ok()
        .map(|text| text.trim().to_string())
}
