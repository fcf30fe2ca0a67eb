use anyhow::*;
use fs_extra::copy_items;
use fs_extra::dir::CopyOptions;
use std::env;
use std::path::PathBuf;

fn main() -> Result<()> {
    // This tells Cargo to rerun this script if something in /assets/ changes.
    println!("cargo:rerun-if-changed=assets");

    let out_dir = PathBuf::from(env::var("OUT_DIR")?);
    let manifest_dir = PathBuf::from(env::var("CARGO_MANIFEST_DIR")?);
    let assets_src = manifest_dir.join("assets");

    if assets_src.exists() {
        let mut copy_options = CopyOptions::new();
        copy_options.overwrite = true;
        copy_items(&[&assets_src], &out_dir, &copy_options)?;
    } else {
        println!("cargo:warning=no assets directory at {}", assets_src.display());
    }

    // Default texture root for the viewer, see `ViewerConfig`.
    println!(
        "cargo:rustc-env=REACTOR_ASSET_DIR={}",
        out_dir.join("assets").display()
    );

    Ok(())
}
