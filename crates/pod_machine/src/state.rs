//! 播放状态与上下文

use serde::Serialize;

use crate::PlaybackError;

/// 后端发放的资源句柄（不透明）
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ResourceHandle(pub u64);

/// Ready 下的子状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadyState {
    Paused,
    Playing,
    Ended,
}

/// 播放状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case", tag = "state", content = "ready")]
pub enum PlaybackState {
    /// 尚未绑定资源
    #[default]
    Loading,
    Ready(ReadyState),
    /// 终止态，资源不可用
    Failure,
}

impl PlaybackState {
    pub fn is_playing(&self) -> bool {
        matches!(self, Self::Ready(ReadyState::Playing))
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Failure)
    }

    /// 日志用的短名称
    pub fn name(&self) -> &'static str {
        match self {
            Self::Loading => "loading",
            Self::Ready(ReadyState::Paused) => "ready.paused",
            Self::Ready(ReadyState::Playing) => "ready.playing",
            Self::Ready(ReadyState::Ended) => "ready.ended",
            Self::Failure => "failure",
        }
    }
}

/// 附着在每个状态上的上下文
///
/// `elapsed_seconds` 始终位于 `[0, duration_seconds]`；Loading 时两者均为 0。
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlaybackContext {
    resource: Option<ResourceHandle>,
    duration_seconds: f64,
    elapsed_seconds: f64,
}

impl PlaybackContext {
    pub fn resource(&self) -> Option<ResourceHandle> {
        self.resource
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn elapsed_seconds(&self) -> f64 {
        self.elapsed_seconds
    }

    pub(crate) fn bind(handle: ResourceHandle, duration_seconds: f64) -> Self {
        Self {
            resource: Some(handle),
            duration_seconds: sanitize_duration(duration_seconds),
            elapsed_seconds: 0.0,
        }
    }

    pub(crate) fn with_elapsed(self, elapsed_seconds: f64) -> Self {
        Self {
            elapsed_seconds: clamp(elapsed_seconds, 0.0, self.duration_seconds),
            ..self
        }
    }

    pub(crate) fn released(self) -> Self {
        Self {
            resource: None,
            ..self
        }
    }
}

/// 把 `x` 限制到 `[lo, hi]`；NaN 视为 `lo`
pub fn clamp(x: f64, lo: f64, hi: f64) -> f64 {
    if x.is_nan() {
        return lo;
    }
    lo.max(x.min(hi))
}

/// 后端可能给出 NaN / Infinity（直播流）或负值，统一按 0 处理
fn sanitize_duration(secs: f64) -> f64 {
    if secs.is_finite() && secs > 0.0 {
        secs
    } else {
        0.0
    }
}

/// 交给渲染层的只读快照（不含资源句柄）
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayerSnapshot {
    #[serde(flatten)]
    pub state: PlaybackState,
    pub duration_seconds: f64,
    pub elapsed_seconds: f64,
}

impl PlayerSnapshot {
    pub fn ensure_usable(&self) -> Result<(), PlaybackError> {
        if self.state.is_terminal() {
            Err(PlaybackError::ResourceUnavailable)
        } else {
            Ok(())
        }
    }
}
