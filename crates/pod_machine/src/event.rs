//! 状态机事件与副作用定义

use crate::ResourceHandle;

/// 状态机事件（后端通知 / 用户操作 -> 状态机）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PlaybackEvent {
    /// 资源已可播放
    ResourceLoaded {
        handle: ResourceHandle,
        duration_seconds: f64,
    },
    /// 资源加载或播放失败
    ResourceFailed,
    PlayRequested,
    PauseRequested,
    /// 播放进度更新
    TimingUpdate { elapsed_seconds: f64 },
    PlaybackEnded,
    /// 跳转请求，目标会被限制在 `[0, duration]`
    SeekRequested { target_seconds: f64 },
}

impl PlaybackEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ResourceLoaded { .. } => "resource_loaded",
            Self::ResourceFailed => "resource_failed",
            Self::PlayRequested => "play_requested",
            Self::PauseRequested => "pause_requested",
            Self::TimingUpdate { .. } => "timing_update",
            Self::PlaybackEnded => "playback_ended",
            Self::SeekRequested { .. } => "seek_requested",
        }
    }
}

/// 副作用请求（状态机 -> 执行器）
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MediaEffect {
    Play,
    Pause,
    /// 跳转到指定秒数
    Seek(f64),
    /// 释放已绑定的资源
    Release,
}
