//! 在模拟后端上执行脚本

use std::io::Write;

use pod_player::{notification_channel, PlayerConfig, PlayerController, SimulatedBackend};

use crate::script::ScriptCommand;
use crate::CliError;

/// 内置演示：加载 180 秒，播放到 90 秒，点击进度条 170/180 处，结束
pub const DEMO_SCRIPT: &str = "\
load 180
play
tick 90
click 170 180
end
";

/// 每条命令执行后输出一行 `PlayerView` JSON
pub fn run_script(
    commands: &[ScriptCommand],
    config: &PlayerConfig,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let (evt_tx, evt_rx) = notification_channel(config.notification_capacity);
    let backend = SimulatedBackend::new(evt_tx, config.time_update_interval);
    let mut controller = PlayerController::mount(backend, evt_rx, config)?;

    for command in commands {
        log::debug!("script: {:?}", command);
        let handle = controller.backend().latest_handle();

        match *command {
            ScriptCommand::Load(duration) => {
                if let Some(h) = handle {
                    controller.backend().finish_loading(h, duration);
                }
            }
            ScriptCommand::Fail => {
                if let Some(h) = handle {
                    controller.backend().fail(h);
                }
            }
            ScriptCommand::End => {
                if let Some(h) = handle {
                    controller.backend().end(h);
                }
            }
            ScriptCommand::Tick(seconds) => controller.backend().advance(seconds),
            ScriptCommand::Play => {
                controller.play();
            }
            ScriptCommand::Pause => {
                controller.pause();
            }
            ScriptCommand::Toggle => {
                controller.toggle_play();
            }
            ScriptCommand::Seek(target) => {
                controller.seek(target);
            }
            ScriptCommand::Click(x, width) => {
                controller.seek_to_bar(x, width);
            }
            ScriptCommand::Show => {}
        }

        controller.pump();
        serde_json::to_writer(&mut *out, &controller.view())?;
        writeln!(out)?;
    }

    Ok(())
}
