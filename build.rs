//! Build script for the TNC firmware
//!
//! Makes the project directory visible to the linker so a board-specific
//! `memory.x` placed next to `Cargo.toml` overrides the one provided by
//! `embassy-stm32`.

fn main() {
    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");

    if let Ok(dir) = std::env::var("CARGO_MANIFEST_DIR") {
        println!("cargo:rustc-link-search={dir}");
    }
}
