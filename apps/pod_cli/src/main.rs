//! pod-cli - 命令行工具
//!
//! 在模拟后端上驱动播放控制器，逐行输出控件状态（JSON）

mod runner;
mod script;

use std::path::{Path, PathBuf};

use pod_player::{ConfigError, PlayerConfig};

use crate::runner::{run_script, DEMO_SCRIPT};
use crate::script::parse_script;

/// 命令行错误
#[derive(thiserror::Error, Debug)]
pub enum CliError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("{0}")]
    Usage(String),
}

fn usage(program: &str) -> String {
    format!(
        "Usage:\n  {program} run <script> [--config <file.json>]\n  \
         {program} demo [--config <file.json>]"
    )
}

fn load_config(path: Option<&Path>) -> Result<PlayerConfig, CliError> {
    match path {
        Some(path) => Ok(PlayerConfig::from_json_file(path)?),
        None => Ok(PlayerConfig::default()),
    }
}

fn run(args: &[String]) -> Result<(), CliError> {
    let program = args.first().map(String::as_str).unwrap_or("pod-cli");
    let mut positional = Vec::new();
    let mut config_path: Option<PathBuf> = None;

    let mut rest = args.iter().skip(1);
    while let Some(arg) = rest.next() {
        if arg == "--config" {
            let path = rest.next().ok_or_else(|| CliError::Usage(usage(program)))?;
            config_path = Some(PathBuf::from(path));
        } else {
            positional.push(arg.as_str());
        }
    }

    let config = load_config(config_path.as_deref())?;
    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match positional.as_slice() {
        ["run", script_path] => {
            let text = std::fs::read_to_string(script_path)?;
            let commands = parse_script(&text)?;
            log::info!("running {} commands from {}", commands.len(), script_path);
            run_script(&commands, &config, &mut out)
        }
        ["demo"] => {
            let commands = parse_script(DEMO_SCRIPT)?;
            run_script(&commands, &config, &mut out)
        }
        _ => Err(CliError::Usage(usage(program))),
    }
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args: Vec<String> = std::env::args().collect();
    if let Err(e) = run(&args) {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
