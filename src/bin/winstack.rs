use std::io::{self, Write};
use std::path::PathBuf;
use std::process;

use clap::error::ErrorKind;
use clap::{Parser, Subcommand};
use log::*;

use winstack::backend::X11Desktop;
use winstack::config::Config;
use winstack::errors::WinResult;
use winstack::input::UserInput;
use winstack::layout::Arranger;
use winstack::shell::UnsupportedShell;
use winstack::source::WindowSource;
use winstack::store::{IconLayoutStore, LayoutDirs, LayoutStore};
use winstack::window::{ShowCommand, WindowSystem};

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Configuration file to use instead of the XDG one.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Tile windows over the screen.
    Stack {
        /// Page to stack when there are too many windows for one.
        #[arg(long, default_value_t = 0)]
        page: usize,
    },
    /// Overlap windows diagonally from the top-left corner.
    Cascade,
    /// Minimize windows left where cascade put them.
    Squish,
    /// Save window positions.
    #[command(name = "SaveLayout")]
    SaveLayout { name: Option<String> },
    /// Restore saved window positions.
    #[command(name = "ExecuteLayout")]
    ExecuteLayout { name: String },
    /// Save desktop icon positions.
    #[command(name = "SaveDesktop")]
    SaveDesktop { name: Option<String> },
    /// Restore saved desktop icon positions.
    #[command(name = "ExecuteDesktop")]
    ExecuteDesktop { name: String },
    /// List the windows layouts work on.
    List,
    /// List saved layouts.
    Layouts,
    /// Minimize the window with this title.
    Minimize { title: String },
    /// Maximize the window with this title.
    Maximize { title: String },
    /// Close the window with this title.
    Close { title: String },
}

/// Configure file logging.
fn setup_logger() -> Result<(), Box<dyn std::error::Error>> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("winstack")?;

    let mut log_path = xdg_dirs.get_cache_home();
    log_path.push("logs");

    if !log_path.exists() {
        std::fs::create_dir_all(&log_path)?;
    }

    // Log file with current timestamp.
    log_path.push(
        &format!(
            "{}.log",
            chrono::Local::now().format("winstack-%Y-%m-%d-%H:%M:%S")
        )[..],
    );

    #[cfg(debug_assertions)]
    let current_log_level = log::LevelFilter::Debug;

    #[cfg(not(debug_assertions))]
    let current_log_level = log::LevelFilter::Info;

    fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("[%Y-%m-%d][%H:%M:%S]"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(current_log_level)
        .chain(fern::log_file(log_path)?)
        .apply()?;

    Ok(())
}

fn load_config(path: Option<PathBuf>) -> WinResult<Config> {
    match path {
        Some(path) => Config::from_path(&path),
        None => {
            let found = xdg::BaseDirectories::with_prefix("winstack")
                .ok()
                .and_then(|dirs| dirs.find_config_file("config.json"));
            Config::load(found.as_deref())
        }
    }
}

/// Ask for a layout name on stdin.
fn prompt_name() -> WinResult<String> {
    print!("Layout name: ");
    io::stdout().flush()?;
    let answer = UserInput::read_line(&mut io::stdin().lock())?;
    Ok(answer.layout_name().to_owned())
}

/// Print saved layout names. Needs no display connection.
fn list_layouts(dirs: &LayoutDirs) -> WinResult<()> {
    println!("Window layouts:");
    for name in dirs.window_layouts()? {
        println!("  {}", name);
    }
    println!("Desktop layouts:");
    for name in dirs.desktop_layouts()? {
        println!("  {}", name);
    }
    Ok(())
}

fn run(cli: Option<Cli>) -> WinResult<()> {
    let (config_path, command) = match cli {
        Some(cli) => (cli.config, cli.command),
        None => (None, None),
    };

    let config = load_config(config_path)?;
    let dirs = LayoutDirs::from_config(&config)?;
    dirs.pin_working_dir()?;

    let command = command.unwrap_or(Command::List);
    if let Command::Layouts = command {
        return list_layouts(&dirs);
    }

    let desktop = X11Desktop::connect()?;
    let source = WindowSource::new(&desktop, &config);
    let arranger = Arranger::new(&desktop, &config);

    match command {
        Command::Stack { page } => {
            let pager = arranger.stack(&source.handles()?, page);
            println!("page {}/{}", pager.index() + 1, pager.count());
            if pager.has_prev() {
                println!("previous: winstack stack --page {}", pager.index() - 1);
            }
            if pager.has_next() {
                println!("next: winstack stack --page {}", pager.index() + 1);
            }
        }
        Command::Cascade => arranger.cascade(&source.handles()?),
        Command::Squish => {
            let minimized = arranger.squish(&source.handles()?);
            println!("minimized {} windows", minimized);
        }
        Command::SaveLayout { name } => {
            let name = match name {
                Some(name) => name,
                None => prompt_name()?,
            };
            let path = LayoutStore::new(&desktop, &dirs).save(&name, &source.handles()?)?;
            println!("saved {}", path.display());
        }
        Command::ExecuteLayout { name } => {
            let summary = LayoutStore::new(&desktop, &dirs).restore(&name, &source.handles()?)?;
            println!("restored {} windows", summary.matches.len());
        }
        Command::SaveDesktop { name } => {
            let name = match name {
                Some(name) => name,
                None => prompt_name()?,
            };
            let path = IconLayoutStore::new(&UnsupportedShell, &dirs).save(&name)?;
            println!("saved {}", path.display());
        }
        Command::ExecuteDesktop { name } => {
            let moved = IconLayoutStore::new(&UnsupportedShell, &dirs).restore(&name)?;
            println!("restored {} icons", moved);
        }
        Command::List => {
            for record in source.enumerate()? {
                println!("{:>3}  {:>10}  {}", record.index, record.handle, record.title);
            }
        }
        Command::Layouts => {}
        Command::Minimize { title } => desktop.show(source.find(&title)?, ShowCommand::Minimize)?,
        Command::Maximize { title } => desktop.show(source.find(&title)?, ShowCommand::Maximized)?,
        Command::Close { title } => desktop.close(source.find(&title)?)?,
    }

    Ok(())
}

fn main() {
    if let Err(e) = setup_logger() {
        eprintln!("winstack: logging disabled: {}", e);
    }

    // Anything unrecognized falls through to the window list.
    let cli = match Cli::try_parse() {
        Ok(cli) => Some(cli),
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            debug!("Unrecognized command line: {}", e.kind());
            None
        }
    };

    if let Err(e) = run(cli) {
        error!("{}", e);
        eprintln!("winstack: {}", e);
        process::exit(1);
    }
    info!("Done.");
}
