//! 播放控制器
//!
//! 渲染层唯一的入口：`dispatch` 注入事件，`subscribe` 接收每次转移后的快照。

use crossbeam_channel::Receiver;
use pod_machine::{PlaybackEvent, PlaybackState, PlayerMachine, PlayerSnapshot, PlayerView};

use crate::{
    seek_target, BackendNotification, ConfigError, MediaBackend, MediaCommandExecutor, PlayerConfig,
};

/// 观察者回调
pub type Observer = Box<dyn FnMut(&PlayerSnapshot)>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverId(u64);

/// 单曲播放控制器；drop 时释放资源
pub struct PlayerController<B: MediaBackend> {
    machine: PlayerMachine,
    executor: MediaCommandExecutor<B>,
    evt_rx: Receiver<BackendNotification>,
    observers: Vec<(ObserverId, Observer)>,
    next_observer: u64,
}

impl<B: MediaBackend> PlayerController<B> {
    /// 挂载：开始加载 `config.url`，状态为 Loading
    pub fn mount(
        backend: B,
        evt_rx: Receiver<BackendNotification>,
        config: &PlayerConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut executor = MediaCommandExecutor::new(backend);
        executor.load(&config.url);

        Ok(Self {
            machine: PlayerMachine::new(),
            executor,
            evt_rx,
            observers: Vec::new(),
            next_observer: 0,
        })
    }

    pub fn state(&self) -> PlaybackState {
        self.machine.state
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        self.machine.snapshot()
    }

    pub fn view(&self) -> PlayerView {
        PlayerView::from(self.snapshot())
    }

    pub fn backend(&self) -> &B {
        self.executor.backend()
    }

    pub fn subscribe(&mut self, observer: impl FnMut(&PlayerSnapshot) + 'static) -> ObserverId {
        let id = ObserverId(self.next_observer);
        self.next_observer += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    pub fn unsubscribe(&mut self, id: ObserverId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(oid, _)| *oid != id);
        self.observers.len() != before
    }

    /// 注入事件：转移 -> 执行副作用 -> 通知观察者
    ///
    /// 句柄不是执行器加载的 `ResourceLoaded` 会被忽略。
    pub fn dispatch(&mut self, event: PlaybackEvent) -> PlaybackState {
        let (next, effects) = if self.owns_event_handle(&event) {
            self.machine.transition(&event).into_parts()
        } else {
            (self.machine, Vec::new())
        };

        if let Some(handle) = next.context.resource() {
            self.executor.bind(handle);
        }
        self.executor.apply(&effects);
        self.machine = next;

        let snapshot = self.machine.snapshot();
        for (_, observer) in self.observers.iter_mut() {
            observer(&snapshot);
        }
        self.machine.state
    }

    fn owns_event_handle(&self, event: &PlaybackEvent) -> bool {
        match *event {
            PlaybackEvent::ResourceLoaded { handle, .. }
                if self.executor.resource() != Some(handle) =>
            {
                log::warn!("{} ignored: foreign {:?}", event.name(), handle);
                false
            }
            _ => true,
        }
    }

    /// 处理一条后端通知；无法翻译时返回 `None`
    pub fn handle_notification(
        &mut self,
        notification: BackendNotification,
    ) -> Option<PlaybackState> {
        let event = self.executor.translate(&notification)?;
        Some(self.dispatch(event))
    }

    /// 非阻塞地处理所有待处理通知，返回处理的条数
    pub fn pump(&mut self) -> usize {
        let pending: Vec<_> = self.evt_rx.try_iter().collect();
        let count = pending.len();
        for notification in pending {
            self.handle_notification(notification);
        }
        count
    }

    pub fn play(&mut self) -> PlaybackState {
        self.dispatch(PlaybackEvent::PlayRequested)
    }

    pub fn pause(&mut self) -> PlaybackState {
        self.dispatch(PlaybackEvent::PauseRequested)
    }

    /// 播放/暂停按钮
    pub fn toggle_play(&mut self) -> PlaybackState {
        if self.machine.state.is_playing() {
            self.pause()
        } else {
            self.play()
        }
    }

    pub fn seek(&mut self, target_seconds: f64) -> PlaybackState {
        self.dispatch(PlaybackEvent::SeekRequested { target_seconds })
    }

    /// 进度条点击：宽度 `width` 内的位置 `position`
    pub fn seek_to_bar(&mut self, position: f64, width: f64) -> PlaybackState {
        let duration = self.machine.context.duration_seconds();
        self.seek(seek_target(position, width, duration))
    }
}
