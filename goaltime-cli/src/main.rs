//! Goal Time CLI Application
//!
//! Command-line front end for the goaltime-core attribution library. It
//! adds the glue the library deliberately leaves out:
//! - Environment-driven server configuration (.env aware)
//! - Session login against the remote goal-tracking server
//! - The HTTP event/goal sources backing the tracker
//! - Report rendering (text table or JSON)

use anyhow::{Context, Result};
use clap::Parser;
use goaltime_core::{AttributionConfig, Tracker};

mod client;
mod config;
mod report;

/// Goal Time - attribute tracked time to a hierarchy of goals
#[derive(Parser, Debug)]
#[command(name = "goaltime-cli")]
#[command(about = "Attribute tracked time to goals over a date range", long_about = None)]
#[command(version)]
struct Args {
    /// First day of the window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    from: String,

    /// Last day of the window, inclusive (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    to: String,

    /// Give every concurrently active goal full credit instead of splitting
    /// overlapping intervals evenly
    #[arg(long)]
    no_split: bool,

    /// Emit the report as JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Verbosity level (can be repeated: -v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long)]
    quiet: bool,
}

fn main() -> Result<()> {
    // A missing .env file is fine; the environment may be set directly
    let _ = dotenvy::dotenv();

    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    log::info!("Goal Time CLI v{}", env!("CARGO_PKG_VERSION"));
    log::info!("Using attribution library v{}", goaltime_core::VERSION);

    let server = config::ServerConfig::from_env()
        .context("Server configuration incomplete (see GOALTIME_* variables)")?;

    let password = match server.password {
        Some(password) => password,
        None => rpassword::prompt_password("Password: ")
            .context("Failed to read password from terminal")?,
    };

    let client = client::ApiClient::new(&server.hostname)
        .with_context(|| format!("Invalid server hostname {:?}", server.hostname))?;
    client
        .login(&server.username, &password)
        .context("Login failed")?;

    let tracker = Tracker::new(client.clone(), client);
    let attribution = AttributionConfig::new().with_split_overlapping(!args.no_split);

    let durations = tracker
        .goal_durations(&args.from, &args.to, attribution)
        .with_context(|| format!("Failed to attribute {} .. {}", args.from, args.to))?;

    if args.json {
        println!("{}", report::render_json(&durations)?);
    } else {
        print!("{}", report::render_table(&durations));
    }

    Ok(())
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: u8, quiet: bool) {
    use env_logger::Builder;
    use log::LevelFilter;
    use std::io::Write;

    let level = if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Info,
            2 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    };

    Builder::new()
        .filter_level(level)
        .format(|buf, record| {
            writeln!(
                buf,
                "[{} {}] {}",
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
