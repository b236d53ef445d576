use clap::{Parser, Subcommand};
use collection_hub::fingerprint::{STATE_FILENAME, StateStore};
use collection_hub::generate::{self, Outcome};
use collection_hub::{config, logging, output};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "collection-hub")]
#[command(about = "Static dashboard for personal collection databases")]
#[command(long_about = "\
Static dashboard for personal collection databases

Reads one SQLite database per collection (books, albums, shows, restaurants)
and writes a single index.html with counts, ratings and recent additions.

Generation is skipped when no database has changed since the last run. Change
is detected by content: every database is hashed and compared with the
fingerprints saved in the state file.

  config.toml          # Site settings and the ordered list of collections
  .site_state.json     # Fingerprints from the last successful run
  site/index.html      # Generated dashboard (site.output_dir)

Run 'collection-hub gen-config' to generate a documented config.toml.")]
#[command(version)]
struct Cli {
    /// Configuration file
    #[arg(long, default_value = "config.toml", global = true)]
    config: PathBuf,

    /// Generation state file
    #[arg(long, default_value = STATE_FILENAME, global = true)]
    state: PathBuf,

    /// Log debug diagnostics to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Regenerate the dashboard if any database changed
    Generate {
        /// Regenerate even when nothing changed
        #[arg(short, long)]
        force: bool,
    },
    /// Show which databases changed since the last generation
    Status,
    /// Print a stock config.toml with all options documented
    GenConfig,
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(err) = run(cli).await {
        output::print_error(err.as_ref());
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Command::Generate { force } => {
            let site_config = config::load_config(&cli.config)?;
            let store = StateStore::new(cli.state);
            match generate::generate(&site_config, &store, force).await? {
                Outcome::Skipped(check) => output::print_skip_notice(&check),
                Outcome::Generated(report) => output::print_generate_output(&report),
            }
        }
        Command::Status => {
            let site_config = config::load_config(&cli.config)?;
            let check = generate::check(&site_config, &StateStore::new(cli.state));
            output::print_status(&check);
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }

    Ok(())
}
