use clap::{Args, Parser, Subcommand};
use realmgen::visit::enter_town_with;
use realmgen::{Position, WorldGenerationParams, find_starting_town, generate_world};
use std::path::PathBuf;

/// Генератор мира, городов и жителей
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Подробный лог (уровень debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Сгенерировать карту мира
    World(WorldArgs),
    /// Войти в город на карте мира
    Town(TownArgs),
}

/// Параметры мира: файл конфигурации и переопределения из командной строки
#[derive(Args, Debug)]
struct WorldSource {
    /// Путь к конфигурационному файлу в формате TOML
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Сид мира (перекрывает значение из конфигурации)
    #[arg(short, long)]
    seed: Option<u64>,

    #[arg(long)]
    width: Option<i32>,

    #[arg(long)]
    height: Option<i32>,
}

#[derive(Args, Debug)]
struct WorldArgs {
    #[command(flatten)]
    source: WorldSource,

    /// Сохранить превью в PNG
    #[arg(long)]
    png: Option<PathBuf>,

    /// Сохранить карту в JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct TownArgs {
    #[command(flatten)]
    source: WorldSource,

    /// Координата X города (по умолчанию - стартовый город)
    #[arg(short, long, requires = "y")]
    x: Option<i32>,

    #[arg(short, long, requires = "x")]
    y: Option<i32>,

    #[arg(long)]
    png: Option<PathBuf>,

    /// Сохранить карту города вместе с жителями в JSON
    #[arg(long)]
    json: Option<PathBuf>,
}

fn load_params(source: &WorldSource) -> Result<WorldGenerationParams, Box<dyn std::error::Error>> {
    let mut params = match &source.config {
        Some(path) => {
            log::info!("loading config from {}", path.display());
            WorldGenerationParams::from_toml_file(&path.to_string_lossy())?
        }
        None => WorldGenerationParams::default(),
    };
    if source.seed.is_some() {
        params.seed = source.seed;
    }
    if let Some(width) = source.width {
        params.width = width;
    }
    if let Some(height) = source.height {
        params.height = height;
    }
    Ok(params)
}

fn run_world(args: &WorldArgs) -> Result<(), Box<dyn std::error::Error>> {
    let params = load_params(&args.source)?;
    let world = generate_world(&params)?;

    println!("World seed {} ({}×{})", world.seed, world.width, world.height);
    println!("{}", world.to_ascii());

    if let Some(path) = &args.png {
        world.save_as_png(&path.to_string_lossy())?;
        println!("PNG saved to {}", path.display());
    }
    if let Some(path) = &args.json {
        std::fs::write(path, world.to_json()?)?;
        println!("JSON saved to {}", path.display());
    }
    Ok(())
}

fn run_town(args: &TownArgs) -> Result<(), Box<dyn std::error::Error>> {
    let params = load_params(&args.source)?;
    let world = generate_world(&params)?;
    let pos = match (args.x, args.y) {
        (Some(x), Some(y)) => Position::new(x, y),
        _ => find_starting_town(&world)?,
    };

    let visit = enter_town_with(&world, world.seed, pos, &params.town)?;
    let map = &visit.map;
    println!(
        "{} ({:?}, {}×{}) at {pos} in world {}",
        map.town_name, map.town_size, map.width, map.height, world.seed
    );
    println!("{}", map.to_ascii());
    println!();
    println!("Residents ({}):", visit.npcs.len());
    for npc in &visit.npcs {
        println!("  {npc}");
    }

    if let Some(path) = &args.png {
        map.save_as_png(&path.to_string_lossy())?;
        println!("PNG saved to {}", path.display());
    }
    if let Some(path) = &args.json {
        std::fs::write(path, serde_json::to_string_pretty(&visit)?)?;
        println!("JSON saved to {}", path.display());
    }
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    match &cli.command {
        Command::World(args) => run_world(args),
        Command::Town(args) => run_town(args),
    }
}
