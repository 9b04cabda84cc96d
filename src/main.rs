use std::process::ExitCode;

use tracing::{info, warn};

use recent_branches::app::App;
use recent_branches::cli::Args;
use recent_branches::config::Config;
use recent_branches::git::Repository;
use recent_branches::logger::{self, LogBuffer};
use recent_branches::tui::{install_panic_hook, Terminal};
use recent_branches::Result;

fn main() -> ExitCode {
    let args = Args::parse_env();

    let config = match Config::load(args.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("warning: {}; using defaults", e);
            Config::default()
        }
    };

    let logs = match logger::init(config.log_file.as_deref(), &config.log_level) {
        Ok(logs) => logs,
        Err(e) => {
            eprintln!("warning: logging disabled: {}", e);
            LogBuffer::default()
        }
    };

    match run(args, config, logs) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e.user_message());
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args, config: Config, logs: LogBuffer) -> Result<()> {
    let options = args.list_options(&config);
    info!(
        limit = options.limit,
        include_remote = options.include_remote,
        filter = ?options.filter,
        "Starting"
    );

    let repo = Repository::discover(config.command_timeout())?;
    info!(repository = %repo.name(), "Opened repository");

    let mut app = App::new(repo, config, options, logs);
    if let Err(e) = app.load() {
        warn!(error = %e, "Could not list branches");
        return Err(e);
    }

    install_panic_hook();
    let mut terminal = Terminal::new()?;
    app.run(&mut terminal)
}
