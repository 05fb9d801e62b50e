use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use common::TriMesh;
use creator::{output, SchParams};

/// Generates a strictly convex hull surface model from a closed triangle
/// mesh.
#[derive(Parser)]
#[command(version)]
struct Args {
    /// Input mesh (.obj)
    input: PathBuf,
    /// Output model file
    output: PathBuf,
    /// Small sphere radius
    #[arg(short, long, default_value_t = 0.02)]
    r: f64,
    /// Big sphere radius
    #[arg(short = 'R', long, default_value_t = 300.0)]
    big_r: f64,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let params = SchParams {
        r: args.r,
        big_r: args.big_r,
    };
    println!("creating hull with r = {}, R = {}", params.r, params.big_r);

    let tris = TriMesh::from_obj(&args.input)
        .with_context(|| format!("failed to load {}", args.input.display()))?;
    let model = creator::create_sch(&tris, &params)?;

    output::write_to_file(&model, &args.output)?;
    println!(
        "done: {} small spheres, {} big spheres, {} tori, written to {}",
        model.small_spheres.len(),
        model.big_spheres.len(),
        model.tori.len(),
        args.output.display()
    );
    Ok(())
}
