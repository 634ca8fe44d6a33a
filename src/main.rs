use caption_deck::scan::PairIndex;
use caption_deck::session::Session;
use caption_deck::terminal::{self, PromptPicker, TerminalSurface};
use caption_deck::{config, output};
use clap::{Parser, Subcommand};
use std::io;
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "caption-deck")]
#[command(about = "Edit image captions one pair at a time")]
#[command(long_about = "\
Edit image captions one pair at a time

Opens a folder of PNG images and their .txt captions and walks through them
in order. Edits are saved when you move to another pair or quit.

Folder layout:

  dataset/
  ├── caption-deck.toml   # Optional settings (see `caption-deck gen-config`)
  ├── 0001.png
  ├── 0001.txt            # Caption for 0001.png
  ├── 0002.png            # No caption yet: typing one creates 0002.txt
  └── notes.txt           # No matching image: listed as an orphan

Without FOLDER you are asked for one. Set RUST_LOG=debug to trace file access.")]
#[command(version)]
#[command(args_conflicts_with_subcommands = true)]
struct Cli {
    /// Folder to open at startup
    folder: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Print how the images and captions in a folder pair up
    List {
        /// Folder to list (defaults to the current directory)
        #[arg(default_value = ".")]
        folder: PathBuf,
        /// Print the pair index as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print a stock caption-deck.toml with all options documented
    GenConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Some(Command::List { folder, json }) => {
            let index = PairIndex::open(&folder);
            if json {
                println!("{}", serde_json::to_string_pretty(&index)?);
            } else {
                output::print_listing(&index);
            }
        }
        Some(Command::GenConfig) => {
            print!("{}", config::stock_config_toml());
        }
        None => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            let mut session = Session::new(TerminalSurface::new(io::stdout()));

            let opened = match &cli.folder {
                Some(folder) => session.open_folder_from_argument(folder),
                None => session.open_folder(&mut PromptPicker::new(&mut input, io::stdout())),
            };
            if let Err(err) = opened {
                debug!(%err, "startup folder not opened");
            }

            terminal::run(&mut session, &mut input)?;
        }
    }

    Ok(())
}

/// Log to stderr so events never interleave with the terminal surface.
///
/// `RUST_LOG` overrides the default `warn` level.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}
