mod script;

use std::fs;
use std::path::{Path, PathBuf};

use clap::{Args, Parser, Subcommand};
use rand::Rng;
use serde_json::json;
use squzzle::{PuzzleSettings, Session, SvgSurface};
use squzzle_core::grid::{plan_grid, GridCoord, GridPolicy};
use squzzle_core::outline::Outline;

use crate::script::{parse_script, ScriptStep};

#[derive(Parser)]
#[command(name = "squzzle-cli", version, about = "Plan, render and replay squzzle puzzles")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone)]
struct PuzzleArgs {
    #[arg(long)]
    width: u32,
    #[arg(long)]
    height: u32,
    /// Rows come from the difficulty, columns from difficulty times aspect.
    #[arg(long, conflicts_with = "pieces")]
    difficulty: Option<f32>,
    /// Aim for roughly this many pieces instead.
    #[arg(long)]
    pieces: Option<u32>,
    #[arg(long)]
    snap_threshold: Option<f32>,
    /// TOML settings file; explicit flags win over its values.
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the grid an image size produces.
    Plan {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        #[arg(long)]
        json: bool,
    },
    /// Print one piece's outline as an SVG path.
    Outline {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        #[arg(long)]
        row: u32,
        #[arg(long)]
        col: u32,
        #[arg(long)]
        json: bool,
    },
    /// Write an SVG of a freshly scattered board.
    Render {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        #[arg(long)]
        seed: Option<String>,
        #[arg(long, default_value = "puzzle.jpg")]
        image: String,
        #[arg(long)]
        out: Option<PathBuf>,
        /// Also print every piece's top-left position.
        #[arg(long)]
        list: bool,
    },
    /// Feed a pointer script through a session and report the result.
    Replay {
        #[command(flatten)]
        puzzle: PuzzleArgs,
        #[arg(long)]
        script: PathBuf,
        #[arg(long)]
        seed: Option<String>,
        #[arg(long)]
        view_width: Option<f32>,
        #[arg(long)]
        view_height: Option<f32>,
        #[arg(long)]
        wobble: bool,
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Plan { puzzle, json } => {
            let settings = load_settings(&puzzle)?;
            let config = plan_grid(
                puzzle.width,
                puzzle.height,
                settings.policy,
                settings.grid_limits(),
            );
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("grid: {}", config.label());
                println!(
                    "piece: {}x{} (nub {:.3}x{:.3})",
                    config.piece_width, config.piece_height, config.nub_width, config.nub_height
                );
                println!("snap_threshold: {}", config.snap_threshold);
                if config.is_degenerate() {
                    println!("note: image is smaller than the minimum piece size");
                }
            }
        }
        Commands::Outline {
            puzzle,
            row,
            col,
            json,
        } => {
            let settings = load_settings(&puzzle)?;
            let config = plan_grid(
                puzzle.width,
                puzzle.height,
                settings.policy,
                settings.grid_limits(),
            );
            let coord = GridCoord::new(row, col);
            if row >= config.rows || col >= config.columns {
                return Err(format!(
                    "piece {coord} is outside the {}x{} grid",
                    config.columns, config.rows
                )
                .into());
            }
            let outline = Outline::for_piece(&config, coord);
            if json {
                println!("{}", serde_json::to_string_pretty(&outline)?);
            } else {
                println!("{}", outline.to_svg_path());
            }
        }
        Commands::Render {
            puzzle,
            seed,
            image,
            out,
            list,
        } => {
            let mut settings = load_settings(&puzzle)?;
            settings.seed = match seed.as_deref() {
                Some(raw) => parse_seed_arg(raw)?,
                None => random_seed(),
            };
            let mut session = Session::new(
                settings.clone(),
                puzzle.width as f32,
                puzzle.height as f32,
                SvgSurface::new(image),
            );
            let config = session.setup_puzzle(puzzle.width, puzzle.height, settings.policy);
            eprintln!("seed: {:#x}", settings.seed);
            eprintln!("grid: {}", config.label());
            if list {
                for piece in session.registry().pieces() {
                    if let Some((x, y)) = session.registry().piece_position(piece.coord) {
                        println!("{} {:.1} {:.1}", piece.coord, x, y);
                    }
                }
            }
            write_document(out.as_deref(), &session.surface().to_svg_document())?;
        }
        Commands::Replay {
            puzzle,
            script,
            seed,
            view_width,
            view_height,
            wobble,
            out,
        } => {
            let mut settings = load_settings(&puzzle)?;
            if let Some(raw) = seed.as_deref() {
                settings.seed = parse_seed_arg(raw)?;
            }
            settings.wobble |= wobble;
            let steps = parse_script(&fs::read_to_string(&script)?)?;
            let mut session = Session::new(
                settings.clone(),
                view_width.unwrap_or(puzzle.width as f32),
                view_height.unwrap_or(puzzle.height as f32),
                SvgSurface::new("puzzle.jpg"),
            );
            let config = session.setup_puzzle(puzzle.width, puzzle.height, settings.policy);
            for step in steps {
                match step {
                    ScriptStep::Pointer { event } => session.dispatch(event),
                    ScriptStep::Wheel(wheel) => {
                        session.on_wheel(wheel);
                    }
                }
            }
            let report = json!({
                "grid": config.label(),
                "merges": session.merge_count(),
                "clusters": session.registry().cluster_count(),
                "solved": session.is_solved(),
                "zoom": session.viewport().zoom(),
                "pan": [session.viewport().pan().0, session.viewport().pan().1],
            });
            println!("{}", serde_json::to_string_pretty(&report)?);
            if out.is_some() {
                let view = session.viewport().visible_rect();
                session.surface_mut().set_view(view);
                write_document(out.as_deref(), &session.surface().to_svg_document())?;
            }
        }
    }

    Ok(())
}

fn load_settings(puzzle: &PuzzleArgs) -> Result<PuzzleSettings, Box<dyn std::error::Error>> {
    let mut settings = match &puzzle.config {
        Some(path) => PuzzleSettings::from_toml_str(&fs::read_to_string(path)?)?,
        None => PuzzleSettings::default(),
    };
    if let Some(difficulty) = puzzle.difficulty {
        settings.policy = GridPolicy::FixedMultiplier { difficulty };
    }
    if let Some(pieces) = puzzle.pieces {
        settings.policy = GridPolicy::AreaTarget { pieces };
    }
    if let Some(threshold) = puzzle.snap_threshold {
        settings.snap_threshold = threshold;
    }
    settings.validate()?;
    Ok(settings)
}

fn write_document(out: Option<&Path>, document: &str) -> Result<(), std::io::Error> {
    match out {
        Some(path) => {
            fs::write(path, document)?;
            eprintln!("wrote {}", path.display());
        }
        None => print!("{document}"),
    }
    Ok(())
}

fn random_seed() -> u32 {
    let mut rng = rand::rng();
    rng.random()
}

fn parse_seed_arg(raw: &str) -> Result<u32, Box<dyn std::error::Error>> {
    let trimmed = raw.trim();
    let value = if let Some(hex) = trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X"))
    {
        u32::from_str_radix(hex, 16)?
    } else {
        trimmed.parse::<u32>()?
    };
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeds_accept_decimal_and_hex() {
        assert_eq!(parse_seed_arg("42").unwrap(), 42);
        assert_eq!(parse_seed_arg(" 0x5EED2520 ").unwrap(), 0x5EED_2520);
        assert!(parse_seed_arg("0xZZ").is_err());
    }
}
