use std::fs;
use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand, ValueEnum};
use log::{info, warn};
use tessera_core::layout::{GRID_SEED_DEFAULT, TILE_SIZE_DEFAULT};
use tessera_core::{
    apply_action, grid_layout, ActionOutcome, CoreAction, GridSpec, InteractionSession,
    PuzzleLayout, PuzzleState, ReleaseOutcome, SNAP_DISTANCE_DEFAULT,
};

#[derive(Parser)]
#[command(name = "tessera-cli", version, about = "Layout and replay tools for tessera puzzles")]
struct Cli {
    /// Log every action outcome.
    #[arg(long, short, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a scattered grid layout.
    Grid {
        #[arg(long, default_value_t = 4)]
        cols: u32,
        #[arg(long, default_value_t = 3)]
        rows: u32,
        #[arg(long, default_value_t = TILE_SIZE_DEFAULT)]
        tile_size: f32,
        #[arg(long, default_value_t = SNAP_DISTANCE_DEFAULT)]
        snap_distance: f32,
        /// Scatter seed, decimal or `0x` hex.
        #[arg(long, env = "TESSERA_SEED", value_parser = parse_seed)]
        seed: Option<u32>,
        #[arg(long)]
        tabs: bool,
        #[arg(long, value_enum, default_value_t = Format::Toml)]
        format: Format,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run a JSON list of pointer actions against a layout and print the result.
    Replay {
        #[arg(long)]
        layout: PathBuf,
        #[arg(long)]
        script: PathBuf,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Format {
    Toml,
    Json,
}

impl Format {
    fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Format::Json,
            _ => Format::Toml,
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match cli.command {
        Commands::Grid {
            cols,
            rows,
            tile_size,
            snap_distance,
            seed,
            tabs,
            format,
            out,
        } => {
            let spec = GridSpec {
                cols,
                rows,
                tile_size,
                seed: seed.unwrap_or(GRID_SEED_DEFAULT),
                tabs,
                snap_distance,
            };
            let layout = grid_layout(&spec);
            layout.validate()?;
            let text = encode_layout(&layout, format)?;
            match out {
                Some(path) => {
                    fs::write(&path, text)?;
                    info!("wrote {} tiles to {}", layout.tiles.len(), path.display());
                }
                None => print!("{text}"),
            }
        }
        Commands::Replay { layout, script } => {
            let layout_text = fs::read_to_string(&layout)?;
            let layout = decode_layout(&layout_text, Format::from_path(&layout))?;
            let actions: Vec<CoreAction> = serde_json::from_str(&fs::read_to_string(&script)?)?;
            let state = replay(&layout, &actions)?;
            print!("{}", describe(&state));
        }
    }

    Ok(())
}

fn encode_layout(
    layout: &PuzzleLayout,
    format: Format,
) -> Result<String, Box<dyn std::error::Error>> {
    let text = match format {
        Format::Toml => toml::to_string_pretty(layout)?,
        Format::Json => {
            let mut text = serde_json::to_string_pretty(layout)?;
            text.push('\n');
            text
        }
    };
    Ok(text)
}

fn decode_layout(text: &str, format: Format) -> Result<PuzzleLayout, Box<dyn std::error::Error>> {
    let layout = match format {
        Format::Toml => toml::from_str(text)?,
        Format::Json => serde_json::from_str(text)?,
    };
    Ok(layout)
}

fn replay(
    layout: &PuzzleLayout,
    actions: &[CoreAction],
) -> Result<PuzzleState, Box<dyn std::error::Error>> {
    let mut state = PuzzleState::from_layout(layout)?;
    let mut session = InteractionSession::new();
    for (step, action) in actions.iter().enumerate() {
        let outcome = apply_action(&mut state, &mut session, action);
        match outcome {
            ActionOutcome::Released(ReleaseOutcome::Connected {
                tile,
                neighbor,
                edge,
                group,
            }) => info!("step {step}: {tile} snapped to {neighbor} ({edge}), group {group}"),
            ActionOutcome::Ignored => log::debug!("step {step}: {action:?} ignored"),
            other => log::debug!("step {step}: {other:?}"),
        }
    }
    if session.is_dragging() {
        warn!("script ended mid-drag; releasing");
        apply_action(&mut state, &mut session, &CoreAction::PointerUp);
    }
    Ok(state)
}

fn describe(state: &PuzzleState) -> String {
    let mut out = format!("groups: {}\n", state.group_count());
    for tile in state.tiles() {
        let connected: Vec<String> = tile.connected_to.iter().map(|id| id.to_string()).collect();
        out.push_str(&format!(
            "{} at ({:.1}, {:.1}) {} [{}]\n",
            tile.id,
            tile.pos.0,
            tile.pos.1,
            tile.group,
            connected.join(", ")
        ));
    }
    out
}

fn parse_seed(raw: &str) -> Result<u32, String> {
    let raw = raw.trim();
    let (digits, radix) = match raw.get(..2) {
        Some("0x" | "0X") => (&raw[2..], 16),
        _ => (raw, 10),
    };
    u32::from_str_radix(digits, radix).map_err(|err| format!("invalid seed `{raw}`: {err}"))
}
