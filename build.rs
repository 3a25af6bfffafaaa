use std::env;
use std::fs;
use std::path::Path;
use vergen::{BuildBuilder, CargoBuilder, Emitter, RustcBuilder};

const PROFILES: [&str; 3] = ["default", "debug", "release"];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let build = BuildBuilder::default().build_timestamp(true).build()?;

    let cargo = CargoBuilder::default()
        .opt_level(true)
        .target_triple(true)
        .build()?;

    let rustc = RustcBuilder::default().semver(true).channel(true).build()?;

    Emitter::default()
        .add_instructions(&build)?
        .add_instructions(&cargo)?
        .add_instructions(&rustc)?
        .emit()?;

    copy_configs()?;

    Ok(())
}

/// Copies the engine profile files next to the built binaries so that
/// `EngineConfig::load` finds them regardless of the working directory.
fn copy_configs() -> Result<(), Box<dyn std::error::Error>> {
    let out_dir = env::var("OUT_DIR")?;

    // OUT_DIR is target/<profile>/build/<crate>-<hash>/out
    let target_dir = Path::new(&out_dir)
        .parent()
        .and_then(|p| p.parent())
        .and_then(|p| p.parent())
        .ok_or("Could not determine target directory")?;

    let config_out_dir = target_dir.join("config");
    fs::create_dir_all(&config_out_dir)?;

    for profile in PROFILES {
        let file = format!("config/{profile}.toml");
        let source = Path::new(&file);
        if source.exists() {
            fs::copy(source, config_out_dir.join(format!("{profile}.toml")))?;
            println!("cargo:rerun-if-changed={file}");
        }
    }

    Ok(())
}
