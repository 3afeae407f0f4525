use clap::{CommandFactory, Parser};
use glyphcast::cli::{self, Args, Command};
use glyphcast::config::Config;
use glyphcast::{app, playback, AppError};

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            let code = if e.use_stderr() { 1 } else { 0 };
            std::process::exit(code);
        }
    };

    if let Err(e) = run(args) {
        eprintln!("Error: {}", e);
        if e.wants_usage() {
            eprintln!();
            eprintln!("{}", Args::command().render_usage());
        }
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), AppError> {
    if let Some(Command::Config { action }) = &args.command {
        return cli::handle_config_action(action.clone(), args.config.as_deref());
    }

    let config = Config::load(args.config.as_deref())?;
    let params = cli::resolve_params(&args, &config)?;

    if let Err(e) = playback::install_interrupt_handler() {
        log::warn!("Could not install Ctrl+C handler: {}", e);
    }

    app::run(&params)
}
