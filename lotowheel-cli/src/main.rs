mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::{Parser, Subcommand, ValueEnum};
use indicatif::{ProgressBar, ProgressStyle};

use lotowheel_core::checker::check_game;
use lotowheel_core::engine::{Engine, EngineRequest, MatrixRequest, Mode};
use lotowheel_core::stats::GameStats;
use lotowheel_core::strategies::all_strategies;
use lotowheel_core::wheel::{WheelConfig, WheelGenerator, WheelParams};
use lotowheel_db::db::{count_draws, db_path, fetch_last_draws, migrate, open_db};
use lotowheel_db::models::{LotteryKind, validate_draw};
use crate::display::{
    display_check, display_draws, display_games, display_import_summary, display_stats,
    display_wheel,
};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum GenerationMode {
    #[default]
    Random,
    Statistical,
    Delta,
    Matrix,
}

impl From<GenerationMode> for Mode {
    fn from(mode: GenerationMode) -> Self {
        match mode {
            GenerationMode::Random => Mode::Random,
            GenerationMode::Statistical => Mode::Statistical,
            GenerationMode::Delta => Mode::Delta,
            GenerationMode::Matrix => Mode::Matrix,
        }
    }
}

#[derive(Parser)]
#[command(name = "lotowheel", about = "Lottery game generator and covering wheels")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Import draws from a JSON export
    Import {
        #[arg(short, long, default_value = "megasena")]
        lottery: LotteryKind,

        /// JSON file: [{concurso, data, dezenas, is_virada}]
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Print the database path
    DbPath,

    /// List the latest draws
    List {
        #[arg(short, long, default_value = "megasena")]
        lottery: LotteryKind,

        #[arg(long, default_value = "10")]
        last: u32,
    },

    /// Frequency and delay of every number
    Stats {
        #[arg(short, long, default_value = "megasena")]
        lottery: LotteryKind,

        /// Number of draws analysed
        #[arg(short, long, default_value = "100")]
        window: u32,
    },

    /// Build a covering wheel over a pool of numbers
    Wheel {
        #[arg(short, long, default_value = "megasena")]
        lottery: LotteryKind,

        /// Pool to wheel, comma separated
        #[arg(short, long, conflicts_with = "hot")]
        numbers: Option<String>,

        /// Wheel the N most frequent numbers of the last `window` draws instead
        #[arg(long)]
        hot: Option<usize>,

        #[arg(short, long, default_value = "100")]
        window: u32,

        /// Numbers per ticket (defaults to the lottery's pick size)
        #[arg(short, long)]
        ticket_size: Option<usize>,

        /// Size of the sub-combination every ticket set must cover
        #[arg(short, long)]
        guarantee: usize,

        /// Drawn numbers inside the pool that trigger the guarantee
        #[arg(long)]
        condition: Option<usize>,

        /// Override the pool size limit
        #[arg(long)]
        max_pool: Option<usize>,

        /// JSON wheel settings file
        #[arg(short, long)]
        config: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Generate scored games
    Generate {
        #[arg(short, long, default_value = "megasena")]
        lottery: LotteryKind,

        #[arg(short, long, default_value = "random")]
        mode: GenerationMode,

        #[arg(short, long, default_value = "5")]
        count: usize,

        /// Seed for reproducibility (default: today's date YYYYMMDD)
        #[arg(long)]
        seed: Option<u64>,

        /// Numbers every game must contain, comma separated
        #[arg(long)]
        fixed: Option<String>,

        /// Numbers no game may contain, comma separated
        #[arg(long)]
        exclude: Option<String>,

        /// Draws used for hot numbers and history checks
        #[arg(short, long, default_value = "100")]
        window: u32,

        /// Matrix mode: pool to wheel, comma separated
        #[arg(long)]
        pool: Option<String>,

        /// Matrix mode: pool size when no pool is given
        #[arg(long, default_value = "10")]
        pool_size: usize,

        /// Matrix mode: guarantee
        #[arg(short, long, default_value = "4")]
        guarantee: usize,

        /// Matrix mode: condition
        #[arg(long)]
        condition: Option<usize>,

        /// JSON wheel settings file
        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long)]
        json: bool,
    },

    /// Best past match of a game
    Check {
        #[arg(short, long, default_value = "megasena")]
        lottery: LotteryKind,

        /// Minimum hits to report
        #[arg(long, default_value = "4")]
        min_hits: usize,

        numbers: Vec<u32>,
    },

    /// List the scoring strategies
    Strategies,
}

fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Import { lottery, file } => cmd_import(&conn, lottery, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { lottery, last } => cmd_list(&conn, lottery, last),
        Command::Stats { lottery, window } => cmd_stats(&conn, lottery, window),
        Command::Wheel {
            lottery,
            numbers,
            hot,
            window,
            ticket_size,
            guarantee,
            condition,
            max_pool,
            config,
            json,
        } => {
            let pool = match (numbers, hot) {
                (Some(raw), _) => parse_numbers(&raw)?,
                (None, Some(n)) => load_stats(&conn, lottery, window)?.top_numbers(n),
                (None, None) => bail!("Give a pool with --numbers or --hot"),
            };
            let mut wheel_config = load_wheel_config(config.as_deref())?;
            if let Some(bound) = max_pool {
                wheel_config.max_pool_size = bound;
            }
            let ticket_size = ticket_size.unwrap_or(lottery.config().picked_numbers);
            let mut params = WheelParams::new(ticket_size, guarantee);
            if let Some(m) = condition {
                params = params.with_condition(m);
            }
            cmd_wheel(&pool, params, wheel_config, json)
        }
        Command::Generate {
            lottery,
            mode,
            count,
            seed,
            fixed,
            exclude,
            window,
            pool,
            pool_size,
            guarantee,
            condition,
            config,
            json,
        } => {
            let wheel_config = load_wheel_config(config.as_deref())?;
            let mut request = EngineRequest::new(lottery, mode.into(), count, seed.unwrap_or_else(date_seed));
            request.fixed = fixed.as_deref().map(parse_numbers).transpose()?.unwrap_or_default();
            request.excluded = exclude.as_deref().map(parse_numbers).transpose()?.unwrap_or_default();
            if count_draws(&conn, lottery)? > 0 {
                request.stats = Some(load_stats(&conn, lottery, window)?);
            }
            if matches!(mode, GenerationMode::Matrix) {
                request.matrix = Some(MatrixRequest {
                    pool: pool.as_deref().map(parse_numbers).transpose()?,
                    pool_size,
                    guarantee,
                    condition,
                });
            }
            cmd_generate(&request, wheel_config, json)
        }
        Command::Check { lottery, min_hits, numbers } => cmd_check(&conn, lottery, min_hits, &numbers),
        Command::Strategies => {
            for s in all_strategies() {
                println!("{:<16} {:<18} {:?}, weight {}", s.id(), s.name(), s.kind(), s.weight());
            }
            Ok(())
        }
    }
}

fn parse_numbers(raw: &str) -> Result<Vec<u32>> {
    raw.split(|c: char| c == ',' || c.is_whitespace())
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<u32>().with_context(|| format!("Invalid number '{}'", s)))
        .collect()
}

fn load_wheel_config(path: Option<&Path>) -> Result<WheelConfig> {
    let Some(path) = path else {
        return Ok(WheelConfig::default());
    };
    let json = std::fs::read_to_string(path)
        .with_context(|| format!("Cannot read {:?}", path))?;
    let config: WheelConfig = serde_json::from_str(&json)
        .with_context(|| format!("Invalid JSON in {:?}", path))?;
    log::debug!("wheel settings from {:?}: {:?}", path, config);
    Ok(config)
}

fn load_stats(conn: &lotowheel_db::rusqlite::Connection, lottery: LotteryKind, window: u32) -> Result<GameStats> {
    let n = count_draws(conn, lottery)?;
    if n == 0 {
        bail!("No {} draws stored. Run first: lotowheel import --lottery {}", lottery, lottery);
    }
    let draws = fetch_last_draws(conn, lottery, window.min(n))?;
    Ok(GameStats::from_history(&draws, &lottery.config()))
}

fn cmd_import(conn: &lotowheel_db::rusqlite::Connection, lottery: LotteryKind, file: &Path) -> Result<()> {
    let result = import::import_json(conn, file, lottery)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_list(conn: &lotowheel_db::rusqlite::Connection, lottery: LotteryKind, last: u32) -> Result<()> {
    let n = count_draws(conn, lottery)?;
    if n == 0 {
        println!("Empty database. Run first: lotowheel import --lottery {}", lottery);
        return Ok(());
    }
    let draws = fetch_last_draws(conn, lottery, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &lotowheel_db::rusqlite::Connection, lottery: LotteryKind, window: u32) -> Result<()> {
    let n = count_draws(conn, lottery)?;
    if n == 0 {
        println!("Empty database. Run first: lotowheel import --lottery {}", lottery);
        return Ok(());
    }
    let effective_window = window.min(n);
    let stats = load_stats(conn, lottery, effective_window)?;
    display_stats(&stats.number_stats(), &lottery.config(), effective_window);
    println!("Hot : {:?}", stats.hot_numbers);
    println!("Cold: {:?}", stats.cold_numbers);
    Ok(())
}

fn cmd_wheel(pool: &[u32], params: WheelParams, config: WheelConfig, json: bool) -> Result<()> {
    let generator = WheelGenerator::new(config);

    let pb = ProgressBar::new(0);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} tuples covered",
        )?
        .progress_chars("=> "),
    );

    let result = generator.generate_with(pool, params, |step| {
        pb.set_length(step.target_count as u64);
        pb.set_position((step.target_count - step.remaining) as u64);
    });
    pb.finish_and_clear();
    let result = result?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    let mut sorted_pool = pool.to_vec();
    sorted_pool.sort_unstable();
    display_wheel(&sorted_pool, &result);
    if !result.complete {
        println!("The wheel is partial: no remaining ticket covers the missing tuples.");
    }
    Ok(())
}

fn cmd_generate(request: &EngineRequest, wheel_config: WheelConfig, json: bool) -> Result<()> {
    let engine = Engine::new(all_strategies(), wheel_config);
    let generation = engine.generate(request)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&generation.games)?);
        return Ok(());
    }

    println!(
        "\n{} games for {} (seed {}, {} attempts)\n",
        generation.games.len(),
        request.lottery.config().name,
        request.seed,
        generation.attempts,
    );
    display_games(&generation.games);
    if let Some(wheel) = &generation.wheel {
        println!(
            "Wheel: {} tickets, {}/{} tuples covered{}",
            wheel.tickets.len(),
            wheel.target_count - wheel.uncovered,
            wheel.target_count,
            if wheel.complete { "" } else { " (partial)" },
        );
    }
    Ok(())
}

fn cmd_check(conn: &lotowheel_db::rusqlite::Connection, lottery: LotteryKind, min_hits: usize, numbers: &[u32]) -> Result<()> {
    let config = lottery.config();
    let numbers: Vec<u32> = numbers.iter().map(|&n| config.normalize(n)).collect();
    validate_draw(&numbers, &config)?;
    let n = count_draws(conn, lottery)?;
    if n == 0 {
        println!("Empty database. Run first: lotowheel import --lottery {}", lottery);
        return Ok(());
    }
    let history = fetch_last_draws(conn, lottery, n)?;
    let result = check_game(&numbers, &history, min_hits);
    display_check(&numbers, result.as_ref());
    Ok(())
}
