//! 控件视图模型
//!
//! 渲染层只消费这里的派生值，不接触状态机内部

use serde::Serialize;

use crate::{
    duration_display, elapsed_display, progress_percent, remaining_display, PlaybackError,
    PlayerSnapshot,
};

/// 播放按钮
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ButtonAction {
    Play,
    Pause,
}

impl ButtonAction {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Play => "Play",
            Self::Pause => "Pause",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlayerView {
    #[serde(flatten)]
    pub snapshot: PlayerSnapshot,
    pub button: ButtonAction,
    pub controls_enabled: bool,
    pub elapsed: String,
    pub duration: String,
    pub remaining: String,
    pub progress_percent: f64,
    /// Failure 时显示的固定提示
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<PlayerSnapshot> for PlayerView {
    fn from(snapshot: PlayerSnapshot) -> Self {
        let elapsed = snapshot.elapsed_seconds;
        let duration = snapshot.duration_seconds;
        let message = snapshot
            .ensure_usable()
            .err()
            .map(|e: PlaybackError| e.to_string());

        Self {
            snapshot,
            button: if snapshot.state.is_playing() {
                ButtonAction::Pause
            } else {
                ButtonAction::Play
            },
            controls_enabled: message.is_none(),
            elapsed: elapsed_display(elapsed),
            duration: duration_display(duration),
            remaining: remaining_display(elapsed, duration),
            progress_percent: progress_percent(elapsed, duration),
            message,
        }
    }
}
