// SPDX-License-Identifier: MIT OR Apache-2.0
//! `shadergraph` - compile material graphs to WGSL from the command line.
//!
//! Materials are read from `.json` or `.ron` files. Log output is controlled
//! with `RUST_LOG`.

mod error;
mod textures;

use clap::{Parser, Subcommand};
use error::{CliError, Result};
use shadergraph::{
    build_graph, check_port_types, create_descriptor, generate_material, MaterialDescriptor, StageGraph,
};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[derive(Parser)]
#[command(name = "shadergraph")]
#[command(about = "Compile shader graphs to WGSL", version)]
struct Args {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a material into a WGSL module
    Compile {
        /// Material file (.json or .ron)
        material: PathBuf,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Force the lit template
        #[arg(long)]
        lit: bool,

        /// Load the material's textures before compiling
        #[arg(long)]
        textures: bool,
    },

    /// Report edges whose port types do not match
    Check {
        /// Material file (.json or .ron)
        material: PathBuf,
    },

    /// Rebuild the fragment graph and print its descriptor
    Descriptor {
        /// Material file (.json or .ron)
        material: PathBuf,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let mut env_filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "shadergraph=info".parse() {
        env_filter = env_filter.add_directive(directive);
    }

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = Args::parse();

    match run(args.command).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(command: Command) -> Result<()> {
    match command {
        Command::Compile {
            material,
            output,
            lit,
            textures,
        } => compile(&material, output.as_deref(), lit, textures).await,
        Command::Check { material } => check(&material).await,
        Command::Descriptor { material } => descriptor(&material).await,
    }
}

async fn compile(path: &Path, output: Option<&Path>, lit: bool, load_textures: bool) -> Result<()> {
    let mut material = load_material(path).await?;
    if lit {
        material.lit = Some(true);
    }

    if load_textures {
        let base = path.parent().unwrap_or_else(|| Path::new("."));
        let loaded = textures::load_textures(&material.properties, base).await?;
        for texture in &loaded {
            tracing::info!(
                "Texture '{}': {}x{} from {}",
                texture.name,
                texture.width,
                texture.height,
                texture.path.display()
            );
        }
    }

    let code = generate_material(&material)?;
    for (binding, property) in code.properties.iter().enumerate() {
        tracing::info!("Property {binding}: {} ({})", property.name, property.data_type());
    }

    match output {
        Some(output) => {
            tokio::fs::write(output, &code.source)
                .await
                .map_err(|source| CliError::Io {
                    path: output.to_path_buf(),
                    source,
                })?;
            tracing::info!("Wrote {}", output.display());
        }
        None => print!("{}", code.source),
    }

    Ok(())
}

async fn check(path: &Path) -> Result<()> {
    let fragment = fragment_graph(&load_material(path).await?)?;

    let diagnostics = check_port_types(&fragment);
    for diagnostic in &diagnostics {
        println!("{diagnostic}");
    }

    if diagnostics.is_empty() {
        tracing::info!("{} nodes, {} edges, no type errors", fragment.node_count(), fragment.edge_count());
        Ok(())
    } else {
        Err(CliError::TypeErrors(diagnostics.len()))
    }
}

async fn descriptor(path: &Path) -> Result<()> {
    let fragment = fragment_graph(&load_material(path).await?)?;

    println!("{}", serde_json::to_string_pretty(&create_descriptor(&fragment))?);
    Ok(())
}

fn fragment_graph(material: &MaterialDescriptor) -> Result<StageGraph> {
    let graph_descriptor = material.graph.clone().unwrap_or_default();
    build_graph(&graph_descriptor, &material.property_table())
        .fragment
        .ok_or(CliError::NoFragmentGraph)
}

async fn load_material(path: &Path) -> Result<MaterialDescriptor> {
    let text = tokio::fs::read_to_string(path)
        .await
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;

    let material = match path.extension().and_then(|e| e.to_str()) {
        Some("ron") => MaterialDescriptor::from_ron(&text)?,
        _ => MaterialDescriptor::from_json(&text)?,
    };

    tracing::debug!("Loaded {:?} material from {}", material.material_type, path.display());
    Ok(material)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Args::command().debug_assert();
    }

    #[test]
    fn test_parse_compile_flags() {
        let args = Args::parse_from(["shadergraph", "compile", "water.ron", "-o", "water.wgsl", "--lit"]);
        match args.command {
            Command::Compile {
                material,
                output,
                lit,
                textures,
            } => {
                assert_eq!(material, PathBuf::from("water.ron"));
                assert_eq!(output, Some(PathBuf::from("water.wgsl")));
                assert!(lit);
                assert!(!textures);
            }
            _ => panic!("expected compile"),
        }
    }
}
