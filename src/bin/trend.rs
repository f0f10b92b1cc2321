use std::env;
use std::error::Error;
use std::path::PathBuf;

use anyhow::bail;
use clap::Parser;
use stanza::renderer::console::Console;
use stanza::renderer::Renderer;
use tinyrand::{Seeded, StdRand};
use tracing::{debug, info};

use fadeaway::data::{self, GameLog, Season};
use fadeaway::file::ReadJsonFile;
use fadeaway::filter::{FilterSpec, Location, DEFAULT_WINDOW};
use fadeaway::forecast::default_methods;
use fadeaway::logos;
use fadeaway::print;
use fadeaway::query::{self, Query, QueryError};
use fadeaway::roster::Roster;
use fadeaway::stats::Stat;

#[derive(Debug, clap::Parser, Clone)]
struct Args {
    /// player full name, as it appears in the roster
    #[clap(short = 'p', long)]
    player: String,

    /// season, e.g. 2023-24
    #[clap(short = 's', long)]
    season: Season,

    /// game location subset
    #[clap(short = 'l', long, default_value = "overall")]
    location: Location,

    /// trailing window of games
    #[clap(short = 'w', long, default_value_t = DEFAULT_WINDOW)]
    window: usize,

    /// statistic to forecast
    #[clap(long)]
    forecast: Option<Stat>,

    /// file to source the game log from, skipping the live fetch
    #[clap(short = 'f', long)]
    file: Option<PathBuf>,

    /// roster snapshot to resolve players against (defaults to the bundled one)
    #[clap(long)]
    roster: Option<PathBuf>,

    /// fetch opposing-guard scoring context for the latest opponent
    #[clap(long)]
    defense: bool,

    /// seed for the stochastic forecasters
    #[clap(long)]
    seed: Option<u64>,
}
impl Args {
    fn validate(&self) -> anyhow::Result<()> {
        if self.window == 0 {
            bail!("window must be at least 1");
        }
        if self.defense && self.file.is_some() {
            bail!("defensive context requires a live fetch, not a snapshot file");
        }
        Ok(())
    }
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
    args.validate()?;
    debug!("args: {args:?}");

    let loaded_roster;
    let roster = match &args.roster {
        Some(path) => {
            loaded_roster = Roster::from_json_file(path)?;
            &loaded_roster
        }
        None => Roster::embedded(),
    };

    let query = Query {
        player: args.player.clone(),
        season: args.season.clone(),
        spec: FilterSpec::new(args.location, args.window),
        forecast_stat: args.forecast,
    };
    let methods = default_methods();
    let mut rand = match args.seed {
        Some(seed) => StdRand::seed(seed),
        None => StdRand::default(),
    };

    let snapshot = match &args.file {
        Some(path) => {
            let player = roster
                .resolve(&query.player)
                .ok_or_else(|| QueryError::PlayerNotFound(query.player.clone()))?
                .clone();
            let log = GameLog::read_json_file(path)?;
            query::assemble(player, log, &query, &methods, &mut rand)?
        }
        None => query::run(&query, roster, &methods, &mut rand).await?,
    };

    info!(
        "{}: last {} {} games of {}",
        snapshot.player.full_name,
        snapshot.games.len(),
        args.location,
        args.season
    );
    info!(
        "\n{}",
        Console::default().render(&print::tabulate_game_log(&snapshot.games))
    );
    info!(
        "\n{}",
        Console::default().render(&print::tabulate_means(&snapshot.means))
    );

    if !snapshot.forecasts.is_empty() || !snapshot.withheld.is_empty() {
        info!(
            "\n{}",
            Console::default().render(&print::tabulate_forecasts(
                &snapshot.forecasts,
                &snapshot.withheld
            ))
        );
        for (method, err) in &snapshot.withheld {
            info!("{method} prediction withheld: {err}");
        }
    }

    if let Some(game) = snapshot.games.last() {
        if let Some(opponent) = data::opponent(&game.base.matchup) {
            if let Some(url) = logos::logo_url(opponent) {
                info!("latest opponent {opponent}: {url}");
            }
            if args.defense {
                let scoring = data::fetch_guard_scoring(&args.season).await?;
                match scoring.get(opponent) {
                    Some(points) => {
                        info!("{opponent} guards average {points:.1} PTS per game")
                    }
                    None => info!("no defensive context for {opponent}"),
                }
            }
        }
    }

    Ok(())
}
