//! 模拟媒体后端
//!
//! 确定性的进程内后端，时钟由调用方推进。克隆共享同一份状态，
//! 测试可以在控制器持有后端时继续驱动时钟并检查调用记录。

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use crossbeam_channel::Sender;
use pod_machine::{clamp, ResourceHandle};

use crate::{BackendNotification, MediaBackend, NotificationKind};

/// 后端收到的命令记录
#[derive(Debug, Clone, PartialEq)]
pub enum BackendCall {
    Load(String),
    Play(ResourceHandle),
    Pause(ResourceHandle),
    Seek(ResourceHandle, f64),
    Release(ResourceHandle),
}

#[derive(Debug, Default)]
struct SimResource {
    ready: bool,
    released: bool,
    playing: bool,
    duration: f64,
    position: f64,
}

#[derive(Debug, Default)]
struct SimInner {
    next_handle: u64,
    resources: BTreeMap<ResourceHandle, SimResource>,
    calls: Vec<BackendCall>,
}

/// 非法 tick 时的回退值（秒）
const DEFAULT_TICK: f64 = 0.25;

/// 单次 `advance` 对每个资源最多推进的步数
const MAX_STEPS_PER_ADVANCE: f64 = 10_000.0;

#[derive(Clone)]
pub struct SimulatedBackend {
    inner: Rc<RefCell<SimInner>>,
    evt_tx: Sender<BackendNotification>,
    tick: f64,
}

impl SimulatedBackend {
    /// `tick` 必须为正的有限值，否则回退到 0.25 秒
    pub fn new(evt_tx: Sender<BackendNotification>, tick: f64) -> Self {
        let tick = if tick.is_finite() && tick > 0.0 {
            tick
        } else {
            log::warn!("invalid tick {}, using {}", tick, DEFAULT_TICK);
            DEFAULT_TICK
        };
        Self {
            inner: Rc::new(RefCell::new(SimInner::default())),
            evt_tx,
            tick,
        }
    }

    /// 最近一次 `load` 返回的句柄
    pub fn latest_handle(&self) -> Option<ResourceHandle> {
        self.inner.borrow().resources.keys().next_back().copied()
    }

    /// 模拟加载完成，发出 `CanPlay`
    pub fn finish_loading(&self, handle: ResourceHandle, duration: f64) {
        {
            let mut inner = self.inner.borrow_mut();
            let Some(res) = inner.resources.get_mut(&handle) else {
                return;
            };
            if res.released {
                return;
            }
            res.ready = true;
            res.duration = if duration.is_finite() {
                duration.max(0.0)
            } else {
                0.0
            };
        }
        self.notify(NotificationKind::CanPlay, handle);
    }

    /// 模拟加载或解码失败，发出 `Error`
    pub fn fail(&self, handle: ResourceHandle) {
        if let Some(res) = self.inner.borrow_mut().resources.get_mut(&handle) {
            res.playing = false;
        }
        self.notify(NotificationKind::Error, handle);
    }

    /// 流提前结束：停在当前位置并发出 `Ended`
    pub fn end(&self, handle: ResourceHandle) {
        if let Some(res) = self.inner.borrow_mut().resources.get_mut(&handle) {
            res.playing = false;
        }
        self.notify(NotificationKind::Ended, handle);
    }

    /// 推进时钟
    ///
    /// 每步发一次 `TimeUpdate`，到达时长时发 `Ended` 并停止。步长至少为 tick，
    /// 跨度过大时放宽，步数不超过 `MAX_STEPS_PER_ADVANCE`。
    pub fn advance(&self, seconds: f64) {
        let spans: Vec<(ResourceHandle, f64, f64)> = self
            .inner
            .borrow()
            .resources
            .iter()
            .filter(|(_, r)| r.playing)
            .map(|(h, r)| {
                let target = (r.position + seconds.max(0.0)).min(r.duration);
                (*h, r.position, target)
            })
            .collect();

        for (handle, start, target) in spans {
            let step = self.tick.max((target - start) / MAX_STEPS_PER_ADVANCE);
            let mut position = start;
            while position < target {
                let next = (position + step).min(target);
                // 大数值下 `position + step` 可能不变
                position = if next > position { next } else { target };

                let ended = {
                    let mut inner = self.inner.borrow_mut();
                    let Some(res) = inner.resources.get_mut(&handle) else {
                        break;
                    };
                    res.position = position;
                    if res.position >= res.duration {
                        res.playing = false;
                        true
                    } else {
                        false
                    }
                };

                self.notify_time_update(handle);
                if ended {
                    self.notify(NotificationKind::Ended, handle);
                    break;
                }
            }
        }
    }

    pub fn position(&self, handle: ResourceHandle) -> Option<f64> {
        self.inner.borrow().resources.get(&handle).map(|r| r.position)
    }

    pub fn is_playing(&self, handle: ResourceHandle) -> bool {
        self.inner
            .borrow()
            .resources
            .get(&handle)
            .is_some_and(|r| r.playing)
    }

    pub fn is_released(&self, handle: ResourceHandle) -> bool {
        self.inner
            .borrow()
            .resources
            .get(&handle)
            .is_some_and(|r| r.released)
    }

    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.borrow().calls.clone()
    }

    pub fn take_calls(&self) -> Vec<BackendCall> {
        std::mem::take(&mut self.inner.borrow_mut().calls)
    }

    fn notify(&self, kind: NotificationKind, handle: ResourceHandle) {
        if self
            .evt_tx
            .try_send(BackendNotification::from_resource(kind, handle))
            .is_err()
        {
            log::warn!("notification {:?} for {:?} dropped", kind, handle);
        }
    }

    // 进度通知可丢弃（位置在翻译时才读取），但要给其他通知留一个空位
    fn notify_time_update(&self, handle: ResourceHandle) {
        let has_room = self
            .evt_tx
            .capacity()
            .map_or(true, |cap| self.evt_tx.len() + 1 < cap);
        if !has_room {
            log::trace!("time update for {:?} skipped: channel nearly full", handle);
            return;
        }
        let notification = BackendNotification::from_resource(NotificationKind::TimeUpdate, handle);
        if self.evt_tx.try_send(notification).is_err() {
            log::trace!("time update for {:?} dropped", handle);
        }
    }

    fn with_resource(&mut self, handle: ResourceHandle, f: impl FnOnce(&mut SimResource)) {
        let mut inner = self.inner.borrow_mut();
        if let Some(res) = inner.resources.get_mut(&handle) {
            if res.ready && !res.released {
                f(res);
            }
        }
    }
}

impl MediaBackend for SimulatedBackend {
    fn load(&mut self, url: &str) -> ResourceHandle {
        let mut inner = self.inner.borrow_mut();
        inner.next_handle += 1;
        let handle = ResourceHandle(inner.next_handle);
        inner.resources.insert(handle, SimResource::default());
        inner.calls.push(BackendCall::Load(url.to_string()));
        handle
    }

    fn play(&mut self, handle: ResourceHandle) {
        self.inner.borrow_mut().calls.push(BackendCall::Play(handle));
        self.with_resource(handle, |r| {
            if r.position < r.duration {
                r.playing = true;
            }
        });
    }

    fn pause(&mut self, handle: ResourceHandle) {
        self.inner.borrow_mut().calls.push(BackendCall::Pause(handle));
        self.with_resource(handle, |r| r.playing = false);
    }

    fn seek(&mut self, handle: ResourceHandle, seconds: f64) {
        self.inner
            .borrow_mut()
            .calls
            .push(BackendCall::Seek(handle, seconds));
        self.with_resource(handle, |r| r.position = clamp(seconds, 0.0, r.duration));
    }

    fn release(&mut self, handle: ResourceHandle) {
        let mut inner = self.inner.borrow_mut();
        inner.calls.push(BackendCall::Release(handle));
        if let Some(res) = inner.resources.get_mut(&handle) {
            res.released = true;
            res.playing = false;
        }
    }

    fn current_position(&self, handle: ResourceHandle) -> f64 {
        self.position(handle).unwrap_or(0.0)
    }

    fn total_duration(&self, handle: ResourceHandle) -> f64 {
        self.inner
            .borrow()
            .resources
            .get(&handle)
            .map_or(0.0, |r| r.duration)
    }
}
