//! Meshport CLI - mesh conversion command-line tool.
//!
//! Usage: meshport <COMMAND> [OPTIONS] <INPUT> [OUTPUT]
//!
//! Run `meshport --help` for available commands.

use std::path::PathBuf;
use std::time::Instant;

use clap::{Parser, Subcommand};

use meshport::io::{self, idtf::IdtfExporter, ExporterRegistry};
use meshport::mesh::TriMesh;

#[derive(Parser)]
#[command(name = "meshport")]
#[command(author, version, about = "Mesh conversion CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display mesh information
    Info {
        /// Input mesh file
        input: PathBuf,
    },

    /// Convert a mesh to another format
    Convert {
        /// Input mesh file
        input: PathBuf,

        /// Output mesh file (format detected from extension)
        output: PathBuf,

        /// Remap positions from Y-up to Z-up when writing IDTF
        #[arg(long)]
        axis_remap: bool,
    },

    /// List supported formats
    Formats,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Info { input } => {
            cmd_info(&input)?;
        }

        Commands::Convert { input, output, axis_remap } => {
            cmd_convert(&input, &output, axis_remap)?;
        }

        Commands::Formats => {
            cmd_formats();
        }
    }

    Ok(())
}

fn cmd_info(input: &PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: TriMesh = io::load(input)?;

    println!("File: {}", input.display());
    println!("Vertices: {}", mesh.num_vertices());
    println!("Faces: {}", mesh.num_faces());
    println!("Materials: {}", mesh.num_materials());

    for mid in mesh.material_ids() {
        if let Some(mat) = mesh.material(mid) {
            let texture = mat.texture().unwrap_or("(none)");
            println!(
                "  Material {}: {} faces, {} UVs, texture {}",
                mid.index(),
                mat.num_faces(),
                mat.num_uvs(),
                texture
            );
        }
    }
    let unmapped = mesh.unmapped_faces().count();
    if unmapped > 0 {
        println!("  Unmapped faces: {}", unmapped);
    }

    if let Some((min, max)) = mesh.bounds() {
        println!("Bounding box: ({:.3}, {:.3}, {:.3}) to ({:.3}, {:.3}, {:.3})",
            min.x, min.y, min.z, max.x, max.y, max.z);
        let diag = max - min;
        println!("Dimensions: {:.3} x {:.3} x {:.3}", diag.x, diag.y, diag.z);
    }

    Ok(())
}

fn cmd_convert(
    input: &PathBuf,
    output: &PathBuf,
    axis_remap: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mesh: TriMesh = io::load(input)?;

    println!("Loaded: {} vertices, {} faces, {} materials",
        mesh.num_vertices(), mesh.num_faces(), mesh.num_materials());

    let mut registry = ExporterRegistry::with_defaults();
    if axis_remap {
        registry.register(Box::new(IdtfExporter::new().with_axis_remap(true)));
    }

    let start = Instant::now();
    registry.save(&mesh, output)?;
    let elapsed = start.elapsed();

    println!("Saved: {} ({:.2?})", output.display(), elapsed);

    Ok(())
}

fn cmd_formats() {
    let registry = ExporterRegistry::with_defaults();
    println!("Supported formats:");
    for format in registry.formats() {
        println!("  .{:<5} {}", format.extension(), format.description());
    }
}
