use anyhow::Result;
use colored::Colorize;

use crate::core::{Config, RemoteRotation};

pub fn execute(matches: &clap::ArgMatches, config: &Config) -> Result<()> {
    let rotation = RemoteRotation::load(config.remotes.clone(), config.rclone_state.clone())?;

    match matches.subcommand() {
        Some(("show", _)) => show(&rotation),
        Some(("reset", _)) => {
            rotation.reset()?;
            println!("{}", "Rotation reset to the first remote.".green());
            show(&rotation)
        }
        _ => {
            println!("Use 'reelroute rotation --help' for more information.");
            Ok(())
        }
    }
}

fn show(rotation: &RemoteRotation) -> Result<()> {
    let next = rotation.current_index();
    println!("{}", "Remotes:".cyan().bold());
    for (i, remote) in rotation.remotes().iter().enumerate() {
        if i == next {
            println!("  {} {}", "→".green(), remote.green().bold());
        } else {
            println!("    {}", remote);
        }
    }
    Ok(())
}
