use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use rentaldb::config::{self, Config, EnvFile};
use rentaldb::connection::Connection;
use rentaldb::logger;
use rentaldb::menu::Menu;

#[derive(Debug, Parser)]
#[command(name = "rentaldb", version, about)]
struct Cli {
    /// KEY=VALUE file applied to the environment before credentials are read
    #[arg(long, value_name = "PATH", default_value = ".env")]
    env_file: PathBuf,

    /// Where to write the log; defaults to rentaldb.log in the app config dir
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Applied before the logger so the env file can set RENTALDB_LOG
    let env_file = config::load_env_file(&cli.env_file);

    // Logging is best effort; the menu works without it
    if let Some(path) = cli.log_file.clone().or_else(|| config::default_log_path().ok()) {
        let _ = logger::init(path);
    }

    match run(&cli, env_file) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("fatal error: {err:#}");
            eprintln!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn run(cli: &Cli, env_file: anyhow::Result<EnvFile>) -> anyhow::Result<()> {
    let env_file = env_file?;
    for key in &env_file.skipped {
        tracing::warn!(key = %key, "skipping malformed env assignment");
    }
    if env_file.applied > 0 {
        tracing::info!(
            path = %cli.env_file.display(),
            applied = env_file.applied,
            "env file applied"
        );
    }

    let config = Config::from_env()?;
    let connection = Connection::from_config(&config)?;
    tracing::info!(url = %connection.redacted_url(), "configuration loaded");

    let stdin = io::stdin().lock();
    let stdout = io::stdout().lock();
    let dialect = connection.r#type;
    Menu::new(stdin, stdout, connection, dialect).run()
}
