//! Main application entry point.

use clap::{Parser, Subcommand};
use floorplan_app::{App, AppError, ShortcutRegistry, UiAction, create_plan};
use floorplan_core::config::EditorConfig;
use floorplan_core::storage::{FileStore, PlanStore};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Parser, Debug)]
#[command(name = "floorplan", about = "Office floor-plan editor")]
struct Cli {
    /// Editor configuration file (JSON).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory holding plan files. Defaults to the user data directory.
    #[arg(long, global = true)]
    store_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create an empty plan.
    New {
        #[arg(default_value = "Nouveau Plan")]
        name: String,
        #[arg(long, default_value_t = 1200)]
        width: i64,
        #[arg(long, default_value_t = 800)]
        height: i64,
    },
    /// List stored plans.
    List,
    /// Render a plan to SVG.
    Render {
        plan_id: String,
        /// Output file. Prints to stdout when omitted.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Apply a JSON script of editing actions to a plan and save it.
    Replay {
        plan_id: String,
        script: PathBuf,
        /// Also write the resulting canvas as SVG.
        #[arg(long, short)]
        output: Option<PathBuf>,
    },
    /// Copy a plan and its elements under a new name.
    Duplicate {
        plan_id: String,
        name: String,
        #[arg(long)]
        owner: Option<String>,
    },
    /// Show keyboard shortcuts.
    Shortcuts,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();
    if let Err(err) = pollster::block_on(run(cli)) {
        log::error!("{err}");
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), AppError> {
    if let Command::Shortcuts = cli.command {
        ShortcutRegistry::print_all();
        return Ok(());
    }

    let config = match &cli.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };
    let store = Arc::new(match cli.store_dir {
        Some(dir) => FileStore::new(dir)?,
        None => FileStore::default_location()?,
    });
    log::debug!("store at {}", store.base_path().display());

    match cli.command {
        Command::New { name, width, height } => {
            let plan = create_plan(&*store, &name, width, height, &config).await?;
            println!("{}", plan.id);
        }
        Command::List => {
            for plan in store.list_plans().await? {
                println!("{}\t{}\t{}x{}", plan.id, plan.name, plan.width, plan.height);
            }
        }
        Command::Render { plan_id, output } => {
            let app = App::open(store, &plan_id, config).await?;
            write_svg(&app.render_svg()?, output)?;
        }
        Command::Replay {
            plan_id,
            script,
            output,
        } => {
            let actions = UiAction::parse_script(&fs::read_to_string(&script)?)?;
            let mut app = App::open(store, &plan_id, config).await?;
            app.run_script(actions).await?;
            for failure in app.failures() {
                eprintln!("warning: {failure}");
            }
            if output.is_some() {
                write_svg(&app.render_svg()?, output)?;
            }
        }
        Command::Duplicate {
            plan_id,
            name,
            owner,
        } => {
            let copy = store.duplicate_plan(&plan_id, &name, owner.as_deref()).await?;
            println!("{}", copy.id);
        }
        Command::Shortcuts => {}
    }
    Ok(())
}

fn write_svg(svg: &str, output: Option<PathBuf>) -> Result<(), AppError> {
    match output {
        Some(path) => {
            fs::write(&path, svg)?;
            log::info!("wrote {}", path.display());
        }
        None => print!("{svg}"),
    }
    Ok(())
}
