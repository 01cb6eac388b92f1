//! Build script embedding the installer bundle
//!
//! Scans the bundle directory (default `bundle/`, or `INSTALLER_BUNDLE_DIR`)
//! and generates `bundle_table.rs` in `OUT_DIR` with the manifest and one
//! `include_bytes!` entry per file of each category.

use std::env;
use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

const CATEGORIES: [&str; 4] = ["data", "program", "gui", "service"];

fn main() {
    println!("cargo:rerun-if-env-changed=INSTALLER_BUNDLE_DIR");

    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR").unwrap_or_default());
    let bundle_dir = match env::var_os("INSTALLER_BUNDLE_DIR") {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            if dir.is_relative() { manifest_dir.join(dir) } else { dir }
        }
        None => manifest_dir.join("bundle"),
    };
    println!("cargo:rerun-if-changed={}", bundle_dir.display());

    let manifest = bundle_dir.join("installer.toml");
    if !manifest.is_file() {
        panic!(
            "installer manifest not found at {} (set INSTALLER_BUNDLE_DIR to a bundle directory)",
            manifest.display()
        );
    }

    let mut table = String::new();
    let _ = writeln!(
        table,
        "pub(crate) static MANIFEST: &str = include_str!({:?});",
        manifest.display().to_string()
    );
    let _ = writeln!(table, "pub(crate) static ENTRIES: &[(&str, &str, &[u8])] = &[");
    for category in CATEGORIES {
        for (name, path) in category_files(&bundle_dir.join(category)) {
            let _ = writeln!(
                table,
                "    ({category:?}, {name:?}, include_bytes!({:?})),",
                path.display().to_string()
            );
        }
    }
    let _ = writeln!(table, "];");

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap_or_default());
    if let Err(e) = fs::write(out_dir.join("bundle_table.rs"), table) {
        panic!("failed to write bundle table: {e}");
    }
}

/// Regular, non-hidden files of one category directory, sorted by name
fn category_files(dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(entries) = fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut files: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| {
            let path = entry.path();
            match entry.file_name().into_string() {
                Ok(name) if !name.starts_with('.') => Some((name, path)),
                Ok(_) => None,
                Err(name) => {
                    println!("cargo:warning=skipping non UTF-8 bundle file {name:?}");
                    None
                }
            }
        })
        .collect();
    files.sort();
    files
}
