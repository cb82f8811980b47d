//! 脚本解析
//!
//! 每行一条命令，`#` 开头为注释。

use std::str::FromStr;

use crate::CliError;

/// 脚本命令：用户操作或模拟后端事件
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ScriptCommand {
    /// 后端加载完成，参数为时长（秒）
    Load(f64),
    /// 后端报错
    Fail,
    Play,
    Pause,
    Toggle,
    Seek(f64),
    /// 进度条点击：位置、宽度
    Click(f64, f64),
    /// 推进后端时钟
    Tick(f64),
    /// 后端发出 ended
    End,
    Show,
}

impl FromStr for ScriptCommand {
    type Err = CliError;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let name = parts.next().unwrap_or_default();
        let args: Vec<&str> = parts.collect();

        let command = match (name, args.as_slice()) {
            ("load", [secs]) => Self::Load(number(secs)?),
            ("fail", []) => Self::Fail,
            ("play", []) => Self::Play,
            ("pause", []) => Self::Pause,
            ("toggle", []) => Self::Toggle,
            ("seek", [secs]) => Self::Seek(number(secs)?),
            ("click", [x, width]) => Self::Click(number(x)?, number(width)?),
            ("tick", [secs]) => Self::Tick(number(secs)?),
            ("end", []) => Self::End,
            ("show", []) => Self::Show,
            (
                "load" | "fail" | "play" | "pause" | "toggle" | "seek" | "click" | "tick" | "end"
                | "show",
                _,
            ) => return Err(CliError::InvalidArgument(line.to_string())),
            _ => return Err(CliError::UnknownCommand(name.to_string())),
        };
        Ok(command)
    }
}

fn number(s: &str) -> Result<f64, CliError> {
    s.parse::<f64>()
        .map_err(|_| CliError::InvalidArgument(s.to_string()))
}

/// 解析整个脚本，跳过空行与注释
pub fn parse_script(text: &str) -> Result<Vec<ScriptCommand>, CliError> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::parse)
        .collect()
}
