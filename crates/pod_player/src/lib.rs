//! pod_player - 媒体命令执行与播放控制器
//!
//! 把状态机的副作用发给媒体后端，并把后端通知翻译成状态机事件。

mod backend;
mod config;
mod controller;
mod executor;
mod simulated;

pub use backend::*;
pub use config::*;
pub use controller::*;
pub use executor::*;
pub use simulated::*;
