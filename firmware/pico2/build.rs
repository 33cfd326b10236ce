//! Build script for bench-pico2
//!
//! Puts `memory.x` on the linker search path for `link.x` (cortex-m-rt).

use std::path::PathBuf;
use std::{env, fs};

fn main() {
    // Host test builds link no firmware image
    if env::var("CARGO_CFG_TARGET_ARCH").unwrap_or_default() != "arm" {
        return;
    }

    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());
    fs::write(out_dir.join("memory.x"), include_bytes!("memory.x")).unwrap();
    println!("cargo:rustc-link-search={}", out_dir.display());
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}
