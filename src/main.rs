use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};

use nanoedit::config::StudioConfig;
use nanoedit::mask::StrokeScript;

#[derive(Debug, Parser)]
#[command(name = "nanoedit", version, about = "Mask tools for the NanoEdit image editor")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Replay recorded strokes and write the resulting black/white mask PNG
    Mask {
        /// Displayed image width in pixels
        #[arg(long)]
        width: u32,
        /// Displayed image height in pixels
        #[arg(long)]
        height: u32,
        #[arg(long)]
        strokes: PathBuf,
        #[arg(long)]
        out: PathBuf,
    },
    /// Print the effective configuration
    Config,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    match Cli::parse().command {
        Commands::Mask {
            width,
            height,
            strokes,
            out,
        } => {
            let script = StrokeScript::load(&strokes)?;
            let mask = script.render(width, height)?;
            std::fs::write(&out, &mask.encoded().bytes)
                .with_context(|| format!("Failed to write mask: {}", out.display()))?;
            log::info!(
                "Wrote {}x{} mask with {} selected pixels to {}",
                mask.width(),
                mask.height(),
                mask.selected_pixels(),
                out.display()
            );
        }
        Commands::Config => {
            match StudioConfig::path() {
                Some(path) => println!("# {}", path.display()),
                None => println!("# no config directory"),
            }
            let config = StudioConfig::load();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
