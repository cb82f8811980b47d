//! 媒体后端接口和通知定义

use crossbeam_channel::{bounded, Receiver, Sender};
use pod_machine::ResourceHandle;

/// 媒体后端
///
/// 所有命令都是发出即忘：失败会稍后以 `Error` 通知的形式出现。
pub trait MediaBackend {
    /// 开始异步加载，立即返回句柄
    fn load(&mut self, url: &str) -> ResourceHandle;
    fn play(&mut self, handle: ResourceHandle);
    fn pause(&mut self, handle: ResourceHandle);
    fn seek(&mut self, handle: ResourceHandle, seconds: f64);
    fn release(&mut self, handle: ResourceHandle);
    /// 仅在 `CanPlay` 之后有效
    fn current_position(&self, handle: ResourceHandle) -> f64;
    /// 仅在 `CanPlay` 之后有效
    fn total_duration(&self, handle: ResourceHandle) -> f64;
}

/// 后端通知种类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    CanPlay,
    TimeUpdate,
    Error,
    Ended,
}

/// 后端通知（后端 -> 执行器）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendNotification {
    pub kind: NotificationKind,
    /// 触发通知的资源；`None` 表示当前资源
    pub handle: Option<ResourceHandle>,
}

impl BackendNotification {
    pub fn new(kind: NotificationKind) -> Self {
        Self { kind, handle: None }
    }

    pub fn from_resource(kind: NotificationKind, handle: ResourceHandle) -> Self {
        Self {
            kind,
            handle: Some(handle),
        }
    }
}

/// 创建通知通道
pub fn notification_channel(
    capacity: usize,
) -> (Sender<BackendNotification>, Receiver<BackendNotification>) {
    bounded(capacity)
}
