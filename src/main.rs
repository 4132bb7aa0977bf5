mod app;
mod config;
mod consts;
mod controls;
mod feedback;
mod game;
mod highscores;
mod input;
mod panel;
mod scheduler;
mod settings;
mod theme;
mod util;
use crate::app::App;
use crate::config::Config;
use crate::game::{GameMode, GridSize};
use anyhow::Context;
use lexopt::{Arg, Parser, ValueExt};
use simplelog::WriteLogger;
use std::io::{self, ErrorKind};
use std::path::PathBuf;
use std::process::ExitCode;

const HELP: &str = concat!(
    "Usage: snakex [<options>]\n",
    "\n",
    "Play snake in the terminal\n",
    "\n",
    "Options:\n",
    "  -c, --config <PATH>   Read configuration from <PATH>\n",
    "  -m, --mode <MODE>     Start in the given mode (classic, wrap, obstacles)\n",
    "  -g, --grid <N>        Use an N×N board (10 to 40)\n",
    "  -h, --help            Display this help message and exit\n",
    "  -V, --version         Show the program version and exit\n",
);

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Arguments),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut args = Arguments::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('c') | Arg::Long("config") => {
                    args.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('m') | Arg::Long("mode") => {
                    args.mode = Some(parser.value()?.parse::<GameMode>()?);
                }
                Arg::Short('g') | Arg::Long("grid") => {
                    let size = parser.value()?.parse::<u16>()?;
                    let size = GridSize::try_from(size)
                        .map_err(|e| lexopt::Error::Custom(Box::new(e)))?;
                    args.grid_size = Some(size);
                }
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(args))
    }
}

/// Options given on the command line, overriding the configuration file
#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Arguments {
    config: Option<PathBuf>,
    mode: Option<GameMode>,
    grid_size: Option<GridSize>,
}

impl Arguments {
    fn run(self) -> anyhow::Result<()> {
        let (config_path, allow_missing) = match self.config {
            Some(path) => (path, false),
            None => (Config::default_path()?, true),
        };
        let config = Config::load(&config_path, allow_missing).with_context(|| {
            format!(
                "failed to load configuration from {}",
                config_path.display()
            )
        })?;
        init_logging(&config);
        log::info!("Starting snakex {}", env!("CARGO_PKG_VERSION"));
        log::debug!("Configuration path: {}", config_path.display());

        let mut settings = config.settings();
        if let Some(mode) = self.mode {
            settings.mode = mode;
        }
        if let Some(grid_size) = self.grid_size {
            settings.grid_size = grid_size;
        }
        let app = App::new(settings, config.score_store());
        let terminal = ratatui::init();
        let r = app.run(terminal);
        ratatui::restore();
        log::info!("Exiting");
        r.map_err(Into::into)
    }
}

/// Send log messages to the configured log file.  Failure to open the file
/// only costs us the log.
fn init_logging(config: &Config) {
    let Some(path) = config.log_file() else {
        return;
    };
    let r = path
        .parent()
        .map_or(Ok(()), fs_err::create_dir_all)
        .and_then(|()| {
            fs_err::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&path)
        });
    match r {
        Ok(fp) => {
            if let Err(e) = WriteLogger::init(
                config.files.log_level.0,
                simplelog::Config::default(),
                fp,
            ) {
                eprintln!("snakex: failed to set up logging: {e}");
            }
        }
        Err(e) => eprintln!("snakex: failed to open log file: {e}"),
    }
}

fn main() -> ExitCode {
    match Command::from_parser(Parser::from_env()) {
        Ok(Command::Run(args)) => exit_with(args.run()),
        Ok(Command::Help) => {
            print!("{HELP}");
            ExitCode::SUCCESS
        }
        Ok(Command::Version) => {
            println!("snakex {}", env!("CARGO_PKG_VERSION"));
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("snakex: {e}");
            ExitCode::from(2)
        }
    }
}

fn exit_with(r: anyhow::Result<()>) -> ExitCode {
    match r {
        Ok(()) => ExitCode::SUCCESS,
        Err(e)
            if e
                .downcast_ref::<io::Error>()
                .is_some_and(|e| e.kind() == ErrorKind::BrokenPipe) =>
        {
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("snakex: {e:?}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn parse(args: &[&str]) -> Result<Command, lexopt::Error> {
        Command::from_parser(Parser::from_iter(
            std::iter::once("snakex").chain(args.iter().copied()),
        ))
    }

    #[test]
    fn no_args() {
        assert_eq!(parse(&[]).unwrap(), Command::Run(Arguments::default()));
    }

    #[test]
    fn all_args() {
        assert_eq!(
            parse(&["--config", "snakex.toml", "-m", "Wrap", "--grid=12"]).unwrap(),
            Command::Run(Arguments {
                config: Some(PathBuf::from("snakex.toml")),
                mode: Some(GameMode::Wrap),
                grid_size: GridSize::new(12),
            })
        );
    }

    #[rstest]
    #[case(&["-h"], Command::Help)]
    #[case(&["--version"], Command::Version)]
    #[case(&["-g", "20", "--help"], Command::Help)]
    fn info_commands(#[case] args: &[&str], #[case] cmd: Command) {
        assert_eq!(parse(args).unwrap(), cmd);
    }

    #[rstest]
    #[case(&["-g", "9"])]
    #[case(&["-g", "big"])]
    #[case(&["-m", "spiral"])]
    #[case(&["--frobnicate"])]
    #[case(&["extra"])]
    fn bad_args(#[case] args: &[&str]) {
        assert!(parse(args).is_err());
    }
}
