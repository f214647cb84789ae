use anyhow::Result;
use clap::{value_parser, Arg, ArgAction, Command};
use std::path::PathBuf;

use reelroute::commands;

fn main() -> Result<()> {
    reelroute::init_logging();

    let matches = Command::new("reelroute")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Converts, classifies, files and mirrors completed media downloads")
        .disable_version_flag(true)
        .arg(
            Arg::new("version")
                .short('v')
                .short_alias('V')
                .long("version")
                .help("Print version information")
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .help("Path to config.toml (defaults to the user config directory)")
                .value_parser(value_parser!(PathBuf))
                .global(true),
        )
        .subcommand(
            Command::new("run")
                .about("Watch the trigger files and process completed downloads"),
        )
        .subcommand(
            Command::new("classify")
                .about("Show where a movie would be routed, without moving anything")
                .arg(
                    Arg::new("tmdb")
                        .long("tmdb")
                        .value_name("ID")
                        .help("TMDB movie id")
                        .value_parser(value_parser!(u64))
                        .required(true),
                )
                .arg(
                    Arg::new("imdb")
                        .long("imdb")
                        .value_name("ID")
                        .help("IMDb id used for the fallback lookup"),
                )
                .arg(
                    Arg::new("uhd")
                        .long("uhd")
                        .help("Route as a UHD release")
                        .action(ArgAction::SetTrue),
                )
                .arg(
                    Arg::new("file")
                        .long("file")
                        .value_name("NAME")
                        .help("File name to place at the destination"),
                )
                .arg(
                    Arg::new("offline")
                        .long("offline")
                        .help("Skip the library refresh and use the cached index")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("refresh")
                .about("Refresh the cached library index from the media server")
                .arg(
                    Arg::new("full")
                        .long("full")
                        .help("Re-scan every movie instead of only recent additions")
                        .action(ArgAction::SetTrue),
                ),
        )
        .subcommand(
            Command::new("rotation")
                .about("Inspect or reset the upload remote rotation")
                .subcommand_required(true)
                .arg_required_else_help(true)
                .subcommand(Command::new("show").about("Show the remotes and the next one in line"))
                .subcommand(Command::new("reset").about("Start the rotation over from the first remote")),
        )
        .subcommand(Command::new("version").about("Shows version information"))
        .get_matches();

    if matches.get_flag("version") {
        return commands::version();
    }

    match matches.subcommand() {
        Some(("run", sub_matches)) => {
            let config = commands::load_config(sub_matches)?;
            commands::run(&config)?;
        }
        Some(("classify", sub_matches)) => {
            let config = commands::load_config(sub_matches)?;
            commands::classify(sub_matches, &config)?;
        }
        Some(("refresh", sub_matches)) => {
            let config = commands::load_config(sub_matches)?;
            commands::refresh(sub_matches, &config)?;
        }
        Some(("rotation", sub_matches)) => {
            let config = commands::load_config(sub_matches)?;
            commands::rotation(sub_matches, &config)?;
        }
        Some(("version", _)) => {
            commands::version()?;
        }
        _ => {
            println!("Use --help for more information.");
        }
    }

    Ok(())
}
