use std::env;
use std::error::Error;
use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};

use fadeaway::data::{self, Season};
use fadeaway::file::WriteJsonFile;
use fadeaway::roster::Roster;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// player full name, as it appears in the roster
    #[clap(short = 'p', long)]
    player: String,

    /// season, e.g. 2023-24
    #[clap(short = 's', long)]
    season: Season,

    /// where to write the game-log JSON to
    #[clap(short = 'o', long)]
    out: PathBuf,

    /// roster snapshot to resolve players against (defaults to the bundled one)
    #[clap(long)]
    roster: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    if env::var("RUST_BACKTRACE").is_err() {
        env::set_var("RUST_BACKTRACE", "full")
    }
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info")
    }
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    debug!("args: {args:?}");

    let loaded_roster;
    let roster = match &args.roster {
        Some(path) => {
            loaded_roster = Roster::from_json_file(path)?;
            &loaded_roster
        }
        None => Roster::embedded(),
    };
    let player = roster
        .resolve(&args.player)
        .ok_or_else(|| format!("no roster entry for {:?}", args.player))?;

    let log = data::fetch_game_log(player.id, &args.season).await?;
    log.write_json_file(&args.out)?;
    info!(
        "wrote {} games for {} ({}) to {}",
        log.len(),
        player.full_name,
        args.season,
        args.out.display()
    );
    Ok(())
}
