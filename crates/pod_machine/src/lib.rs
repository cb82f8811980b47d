//! pod_machine - 播放状态机
//!
//! 纯状态/转移逻辑：输入事件，输出新状态与副作用请求，不做任何 I/O。

mod display;
mod event;
mod machine;
mod state;
mod view;

pub use display::*;
pub use event::*;
pub use machine::*;
pub use state::*;
pub use view::*;

/// 播放错误
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackError {
    /// 后端报告加载或播放失败，状态机已进入 Failure
    #[error("resource not found")]
    ResourceUnavailable,
}
