mod config;
mod error;
mod marker;
mod utils;

use anyhow::{Context, Result};
use config::Config;
use log::{error, info};
use marker::{HiddenMarker, HideOutcome, UnhideOutcome};
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Hide,
    Unhide,
    Status,
}

#[derive(Debug, PartialEq, Eq)]
struct Invocation {
    command: Command,
    base_dir: Option<PathBuf>,
}

fn main() {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args: Vec<String> = env::args().skip(1).collect();

    if let Err(e) = run(&args) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

fn run(args: &[String]) -> Result<()> {
    let invocation = parse_args(args)?;
    let config = Config::load()?;

    // Command line wins over config, config over the home directory
    let base_dir = match invocation.base_dir.or(config.base_dir) {
        Some(dir) => dir,
        None => dirs::home_dir().context("Could not determine home directory")?,
    };

    let marker = HiddenMarker::for_current_user(base_dir)?
        .with_entry(&config.entry_name)
        .context("Invalid entry_name in config")?;

    info!(
        "Target folder {:?}, control file {:?}",
        marker.target_dir(),
        marker.control_file()
    );

    match invocation.command {
        Command::Hide => match marker.ensure_hidden()? {
            HideOutcome::Appended => info!("{} is now hidden", marker.entry()),
            HideOutcome::AlreadyPresent => info!("{} was already hidden", marker.entry()),
        },
        Command::Unhide => match marker.remove_hidden()? {
            UnhideOutcome::Removed => info!("{} is visible again", marker.entry()),
            UnhideOutcome::NotPresent => info!("{} was not hidden", marker.entry()),
        },
        Command::Status => {
            let state = if marker.is_hidden()? { "hidden" } else { "visible" };
            println!("{}", state);
        }
    }

    Ok(())
}

fn parse_args(args: &[String]) -> Result<Invocation> {
    let mut rest = args.iter();
    let mut command = Command::Hide;
    let mut base_dir = None;

    if let Some(first) = rest.next() {
        match first.as_str() {
            "hide" => command = Command::Hide,
            "unhide" => command = Command::Unhide,
            "status" => command = Command::Status,
            _ => base_dir = Some(PathBuf::from(first)),
        }
    }

    if base_dir.is_none() {
        base_dir = rest.next().map(PathBuf::from);
    }

    if let Some(extra) = rest.next() {
        anyhow::bail!(
            "Unexpected argument {:?}. Usage: hidemark [hide|unhide|status] [BASE_DIR]",
            extra
        );
    }

    Ok(Invocation { command, base_dir })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_defaults_to_hide() -> Result<()> {
        let invocation = parse_args(&[])?;
        assert_eq!(invocation.command, Command::Hide);
        assert_eq!(invocation.base_dir, None);
        Ok(())
    }

    #[test]
    fn test_bare_path_means_hide() -> Result<()> {
        let invocation = parse_args(&args(&["/data"]))?;
        assert_eq!(invocation.command, Command::Hide);
        assert_eq!(invocation.base_dir, Some(PathBuf::from("/data")));
        Ok(())
    }

    #[test]
    fn test_command_with_path() -> Result<()> {
        let invocation = parse_args(&args(&["unhide", "/data"]))?;
        assert_eq!(invocation.command, Command::Unhide);
        assert_eq!(invocation.base_dir, Some(PathBuf::from("/data")));

        let invocation = parse_args(&args(&["status"]))?;
        assert_eq!(invocation.command, Command::Status);
        assert_eq!(invocation.base_dir, None);
        Ok(())
    }

    #[test]
    fn test_extra_arguments_rejected() {
        assert!(parse_args(&args(&["hide", "/data", "more"])).is_err());
        assert!(parse_args(&args(&["/data", "more"])).is_err());
    }
}
