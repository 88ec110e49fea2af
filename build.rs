// Embeds SCRAPE_VERSION for the /version endpoint and the CLI.
// Release pipelines stamp the patch segment through SCRAPE_PATCH_VERSION.

use std::env;

const PATCH_OVERRIDE: &str = "SCRAPE_PATCH_VERSION";

fn main() {
    let version = env::var("CARGO_PKG_VERSION").expect("CARGO_PKG_VERSION not set");
    let Some((major, minor, patch)) = split_version(&version) else {
        panic!("Invalid version format in Cargo.toml: {version}");
    };

    let patch = match env::var(PATCH_OVERRIDE) {
        Ok(stamped) if is_numeric(&stamped) => stamped,
        Ok(stamped) => {
            println!("cargo:warning={PATCH_OVERRIDE}={stamped:?} is not a number, using {patch}");
            patch.to_string()
        }
        Err(_) => patch.to_string(),
    };

    println!("cargo:rustc-env=SCRAPE_VERSION={major}.{minor}.{patch}");
    println!("cargo:rerun-if-changed=Cargo.toml");
    println!("cargo:rerun-if-env-changed={PATCH_OVERRIDE}");
}

/// `major.minor.patch`, ignoring any pre-release or build suffix on the patch
fn split_version(version: &str) -> Option<(&str, &str, &str)> {
    let mut parts = version.splitn(3, '.');
    let major = parts.next()?;
    let minor = parts.next()?;
    let patch = parts.next()?;
    let patch = patch.split(['-', '+']).next()?;
    (is_numeric(major) && is_numeric(minor) && is_numeric(patch)).then_some((major, minor, patch))
}

fn is_numeric(segment: &str) -> bool {
    !segment.is_empty() && segment.bytes().all(|b| b.is_ascii_digit())
}
