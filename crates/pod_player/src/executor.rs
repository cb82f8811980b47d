//! 媒体命令执行器
//!
//! 持有资源句柄；状态机只拿到事件里的句柄副本，渲染层完全看不到。

use pod_machine::{clamp, MediaEffect, PlaybackEvent, ResourceHandle};

use crate::{BackendNotification, MediaBackend, NotificationKind};

pub struct MediaCommandExecutor<B: MediaBackend> {
    backend: B,
    /// `load` 返回、尚未可播放的句柄
    pending: Option<ResourceHandle>,
    bound: Option<ResourceHandle>,
}

impl<B: MediaBackend> MediaCommandExecutor<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            pending: None,
            bound: None,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// 当前资源（已绑定优先）
    pub fn resource(&self) -> Option<ResourceHandle> {
        self.bound.or(self.pending)
    }

    pub fn is_bound(&self) -> bool {
        self.bound.is_some()
    }

    pub fn load(&mut self, url: &str) -> ResourceHandle {
        let handle = self.backend.load(url);
        log::info!("loading {} as {:?}", url, handle);
        self.pending = Some(handle);
        handle
    }

    /// 状态机离开 Loading 后调用；只接受 `load` 返回的句柄
    pub fn bind(&mut self, handle: ResourceHandle) -> bool {
        if self.bound == Some(handle) {
            return true;
        }
        if self.bound.is_some() || self.pending != Some(handle) {
            log::warn!("refusing to bind {:?}", handle);
            return false;
        }
        self.bound = Some(handle);
        self.pending = None;
        true
    }

    /// 把后端通知翻译成状态机事件
    ///
    /// 来自其他（旧）资源的通知返回 `None`。
    pub fn translate(&self, notification: &BackendNotification) -> Option<PlaybackEvent> {
        let Some(current) = self.resource() else {
            log::trace!("{:?} dropped: no resource", notification.kind);
            return None;
        };
        if let Some(source) = notification.handle {
            if source != current {
                log::trace!("{:?} dropped: stale {:?}", notification.kind, source);
                return None;
            }
        }

        let event = match notification.kind {
            NotificationKind::CanPlay => PlaybackEvent::ResourceLoaded {
                handle: current,
                duration_seconds: self.backend.total_duration(current),
            },
            NotificationKind::TimeUpdate => PlaybackEvent::TimingUpdate {
                elapsed_seconds: self.backend.current_position(current),
            },
            NotificationKind::Error => PlaybackEvent::ResourceFailed,
            NotificationKind::Ended => PlaybackEvent::PlaybackEnded,
        };
        Some(event)
    }

    /// 按顺序执行副作用
    pub fn apply(&mut self, effects: &[MediaEffect]) {
        for effect in effects {
            let Some(handle) = self.bound else {
                log::warn!("{:?} skipped: no bound resource", effect);
                continue;
            };
            match *effect {
                MediaEffect::Play => self.backend.play(handle),
                MediaEffect::Pause => self.backend.pause(handle),
                MediaEffect::Seek(seconds) => self.backend.seek(handle, seconds),
                MediaEffect::Release => self.release(),
            }
        }
    }

    /// 释放当前资源（包括仍在加载中的）
    pub fn release(&mut self) {
        if let Some(handle) = self.bound.take().or(self.pending.take()) {
            log::info!("releasing {:?}", handle);
            self.backend.release(handle);
        }
    }
}

impl<B: MediaBackend> Drop for MediaCommandExecutor<B> {
    fn drop(&mut self) {
        self.release();
    }
}

/// 进度条点击位置 -> 目标秒数
///
/// `position` 超出 `[0, width]` 时先限制；宽度非正时返回 0。
pub fn seek_target(position: f64, width: f64, duration: f64) -> f64 {
    if !(width.is_finite() && width > 0.0) {
        return 0.0;
    }
    let ratio = clamp(position, 0.0, width) / width;
    ratio * duration
}
