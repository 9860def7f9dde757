use std::env;
use std::process::Command;
use time::OffsetDateTime;

fn main() {
    println!("cargo:rerun-if-env-changed=SOURCE_DATE_EPOCH");
    println!("cargo:rerun-if-env-changed=CARGO_PKG_VERSION");

    let build_date = env::var("SOURCE_DATE_EPOCH")
        .ok()
        .and_then(|raw| raw.parse::<i64>().ok())
        .and_then(|epoch| OffsetDateTime::from_unix_timestamp(epoch).ok())
        .unwrap_or_else(OffsetDateTime::now_utc)
        .date();
    println!("cargo:rustc-env=KUBER_BUILD_DATE={build_date}");

    let package_version = env::var("CARGO_PKG_VERSION").unwrap_or_else(|_| "0.0.0".to_string());

    // Release builds skip the git lookup
    let profile = env::var("PROFILE").unwrap_or_default();
    let on_release_tag = profile == "release" || {
        println!("cargo:rerun-if-changed=.git/HEAD");
        println!("cargo:rerun-if-changed=.git/refs/tags");
        Command::new("git")
            .args(["describe", "--tags", "--exact-match"])
            .output()
            .ok()
            .filter(|output| output.status.success())
            .and_then(|output| String::from_utf8(output.stdout).ok())
            .is_some_and(|tag| tag.trim() == format!("v{package_version}"))
    };

    let display_version = if on_release_tag {
        package_version
    } else {
        format!("{package_version}-dev")
    };
    println!("cargo:rustc-env=KUBER_VERSION_DISPLAY={display_version}");
}
