//! 播放状态机
//!
//! `transition` 是纯函数：相同的输入总是得到相同的 `(下一状态, 副作用)`。
//! 与当前状态无关的事件直接忽略（例如暂停后才到达的进度通知）。

use crate::{
    MediaEffect, PlaybackContext, PlaybackEvent, PlaybackState, PlayerSnapshot, ReadyState,
};

/// 状态 + 上下文
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PlayerMachine {
    pub state: PlaybackState,
    pub context: PlaybackContext,
}

/// 一次转移的结果
#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub next: PlayerMachine,
    pub effects: Vec<MediaEffect>,
}

impl Transition {
    fn to(next: PlayerMachine, effects: Vec<MediaEffect>) -> Self {
        Self { next, effects }
    }

    fn unchanged(current: &PlayerMachine) -> Self {
        Self {
            next: *current,
            effects: Vec::new(),
        }
    }

    pub fn into_parts(self) -> (PlayerMachine, Vec<MediaEffect>) {
        (self.next, self.effects)
    }
}

impl PlayerMachine {
    /// 初始状态：Loading，时长与进度均为 0
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> PlayerSnapshot {
        PlayerSnapshot {
            state: self.state,
            duration_seconds: self.context.duration_seconds(),
            elapsed_seconds: self.context.elapsed_seconds(),
        }
    }

    pub fn transition(&self, event: &PlaybackEvent) -> Transition {
        transition(self, event)
    }
}

/// 状态转移表
pub fn transition(current: &PlayerMachine, event: &PlaybackEvent) -> Transition {
    use PlaybackEvent as E;
    use PlaybackState as S;
    use ReadyState as R;

    let ctx = current.context;
    let at = |state: PlaybackState, context: PlaybackContext| PlayerMachine { state, context };

    let result = match (current.state, *event) {
        (
            S::Loading,
            E::ResourceLoaded {
                handle,
                duration_seconds,
            },
        ) => {
            let ctx = PlaybackContext::bind(handle, duration_seconds);
            Transition::to(at(S::Ready(R::Paused), ctx), Vec::new())
        }
        (S::Loading, E::ResourceFailed) => Transition::to(at(S::Failure, ctx), Vec::new()),

        (S::Ready(_), E::ResourceFailed) => {
            Transition::to(at(S::Failure, ctx.released()), vec![MediaEffect::Release])
        }

        (S::Ready(R::Paused), E::PlayRequested) => {
            Transition::to(at(S::Ready(R::Playing), ctx), vec![MediaEffect::Play])
        }

        (S::Ready(sub @ (R::Paused | R::Playing)), E::SeekRequested { target_seconds }) => {
            let ctx = ctx.with_elapsed(target_seconds);
            Transition::to(
                at(S::Ready(sub), ctx),
                vec![MediaEffect::Seek(ctx.elapsed_seconds())],
            )
        }

        (S::Ready(R::Playing), E::TimingUpdate { elapsed_seconds })
            if elapsed_seconds.is_finite() =>
        {
            Transition::to(
                at(S::Ready(R::Playing), ctx.with_elapsed(elapsed_seconds)),
                Vec::new(),
            )
        }
        (S::Ready(R::Playing), E::PauseRequested) => {
            Transition::to(at(S::Ready(R::Paused), ctx), vec![MediaEffect::Pause])
        }
        // 进度停在最后一次已知的位置，不强制设为时长
        (S::Ready(R::Playing), E::PlaybackEnded) => {
            Transition::to(at(S::Ready(R::Ended), ctx), Vec::new())
        }

        (S::Ready(R::Ended), E::PlayRequested) => Transition::to(
            at(S::Ready(R::Playing), ctx.with_elapsed(0.0)),
            vec![MediaEffect::Seek(0.0), MediaEffect::Play],
        ),

        _ => {
            log::trace!("ignored {} in {}", event.name(), current.state.name());
            return Transition::unchanged(current);
        }
    };

    log::debug!(
        "{} --{}--> {} effects={:?}",
        current.state.name(),
        event.name(),
        result.next.state.name(),
        result.effects
    );
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ResourceHandle;

    const HANDLE: ResourceHandle = ResourceHandle(7);

    fn all_events() -> Vec<PlaybackEvent> {
        vec![
            PlaybackEvent::ResourceLoaded {
                handle: ResourceHandle(99),
                duration_seconds: 60.0,
            },
            PlaybackEvent::ResourceFailed,
            PlaybackEvent::PlayRequested,
            PlaybackEvent::PauseRequested,
            PlaybackEvent::TimingUpdate {
                elapsed_seconds: 10.0,
            },
            PlaybackEvent::PlaybackEnded,
            PlaybackEvent::SeekRequested {
                target_seconds: 30.0,
            },
        ]
    }

    fn step(machine: PlayerMachine, event: PlaybackEvent) -> (PlayerMachine, Vec<MediaEffect>) {
        transition(&machine, &event).into_parts()
    }

    fn loaded(duration: f64) -> PlayerMachine {
        step(
            PlayerMachine::new(),
            PlaybackEvent::ResourceLoaded {
                handle: HANDLE,
                duration_seconds: duration,
            },
        )
        .0
    }

    fn playing(duration: f64) -> PlayerMachine {
        step(loaded(duration), PlaybackEvent::PlayRequested).0
    }

    fn ended(duration: f64, at: f64) -> PlayerMachine {
        let event = PlaybackEvent::TimingUpdate {
            elapsed_seconds: at,
        };
        let m = step(playing(duration), event).0;
        step(m, PlaybackEvent::PlaybackEnded).0
    }

    fn failed() -> PlayerMachine {
        step(playing(120.0), PlaybackEvent::ResourceFailed).0
    }

    fn reachable() -> Vec<PlayerMachine> {
        vec![
            PlayerMachine::new(),
            loaded(120.0),
            playing(120.0),
            ended(120.0, 100.0),
            failed(),
        ]
    }

    #[test]
    fn test_initial_state_is_loading() {
        let m = PlayerMachine::new();
        assert_eq!(m.state, PlaybackState::Loading);
        assert_eq!(m.context.resource(), None);
        assert_eq!(m.context.duration_seconds(), 0.0);
        assert_eq!(m.context.elapsed_seconds(), 0.0);
    }

    #[test]
    fn test_loaded_binds_handle_and_duration() {
        let m = loaded(180.0);
        assert_eq!(m.state, PlaybackState::Ready(ReadyState::Paused));
        assert_eq!(m.context.resource(), Some(HANDLE));
        assert_eq!(m.context.duration_seconds(), 180.0);
        assert_eq!(m.context.elapsed_seconds(), 0.0);
    }

    #[test]
    fn test_second_load_does_not_rebind() {
        let m = loaded(180.0);
        let (next, effects) = step(
            m,
            PlaybackEvent::ResourceLoaded {
                handle: ResourceHandle(8),
                duration_seconds: 10.0,
            },
        );
        assert_eq!(next, m);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_loading_failure_has_no_effects() {
        let (m, effects) = step(PlayerMachine::new(), PlaybackEvent::ResourceFailed);
        assert_eq!(m.state, PlaybackState::Failure);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_ready_failure_releases_resource() {
        for m in [loaded(60.0), playing(60.0), ended(60.0, 60.0)] {
            let (next, effects) = step(m, PlaybackEvent::ResourceFailed);
            assert_eq!(next.state, PlaybackState::Failure);
            assert_eq!(next.context.resource(), None);
            assert_eq!(effects, vec![MediaEffect::Release]);
        }
    }

    #[test]
    fn test_play_pause_effects() {
        let (m, effects) = step(loaded(60.0), PlaybackEvent::PlayRequested);
        assert_eq!(m.state, PlaybackState::Ready(ReadyState::Playing));
        assert_eq!(effects, vec![MediaEffect::Play]);

        let (m, effects) = step(m, PlaybackEvent::PauseRequested);
        assert_eq!(m.state, PlaybackState::Ready(ReadyState::Paused));
        assert_eq!(effects, vec![MediaEffect::Pause]);
    }

    #[test]
    fn test_determinism() {
        for m in reachable() {
            for e in all_events() {
                let first = transition(&m, &e);
                for _ in 0..5 {
                    assert_eq!(transition(&m, &e), first);
                }
            }
        }
    }

    #[test]
    fn test_seek_clamps_out_of_range() {
        for m in [loaded(120.0), playing(120.0)] {
            let event = PlaybackEvent::SeekRequested {
                target_seconds: -5.0,
            };
            let (low, effects) = step(m, event);
            assert_eq!(low.context.elapsed_seconds(), 0.0);
            assert_eq!(effects, vec![MediaEffect::Seek(0.0)]);
            assert_eq!(low.state, m.state);

            let event = PlaybackEvent::SeekRequested {
                target_seconds: 500.0,
            };
            let (high, effects) = step(m, event);
            assert_eq!(high.context.elapsed_seconds(), 120.0);
            assert_eq!(effects, vec![MediaEffect::Seek(120.0)]);
        }
    }

    #[test]
    fn test_invariant_holds_for_every_transition() {
        let targets = [-5.0, 0.0, 60.0, 500.0, f64::NAN, f64::NEG_INFINITY];
        for m in reachable() {
            let mut events = all_events();
            for t in targets {
                events.push(PlaybackEvent::SeekRequested { target_seconds: t });
                events.push(PlaybackEvent::TimingUpdate { elapsed_seconds: t });
            }
            for e in events {
                let next = transition(&m, &e).next;
                let elapsed = next.context.elapsed_seconds();
                assert!(elapsed >= 0.0, "{:?} after {:?}", next, e);
                assert!(elapsed <= next.context.duration_seconds(), "{:?} after {:?}", next, e);
            }
        }
    }

    #[test]
    fn test_failure_is_terminal() {
        let f = failed();
        for e in all_events() {
            let (next, effects) = step(f, e);
            assert_eq!(next, f);
            assert!(effects.is_empty());
        }

        let f = step(PlayerMachine::new(), PlaybackEvent::ResourceFailed).0;
        for e in all_events() {
            assert_eq!(step(f, e), (f, Vec::new()));
        }
    }

    #[test]
    fn test_restart_from_ended() {
        let m = ended(120.0, 118.0);
        let (next, effects) = step(m, PlaybackEvent::PlayRequested);
        assert_eq!(next.state, PlaybackState::Ready(ReadyState::Playing));
        assert_eq!(next.context.elapsed_seconds(), 0.0);
        assert_eq!(effects, vec![MediaEffect::Seek(0.0), MediaEffect::Play]);
    }

    #[test]
    fn test_timing_ignored_while_paused() {
        let event = PlaybackEvent::SeekRequested {
            target_seconds: 12.0,
        };
        let m = step(loaded(120.0), event).0;
        let event = PlaybackEvent::TimingUpdate {
            elapsed_seconds: 50.0,
        };
        let (next, effects) = step(m, event);
        assert_eq!(next, m);
        assert!(effects.is_empty());
    }

    #[test]
    fn test_non_finite_timing_ignored() {
        let event = PlaybackEvent::TimingUpdate {
            elapsed_seconds: 30.0,
        };
        let m = step(playing(120.0), event).0;
        let event = PlaybackEvent::TimingUpdate {
            elapsed_seconds: f64::NAN,
        };
        let (next, _) = step(m, event);
        assert_eq!(next, m);
    }

    #[test]
    fn test_timing_overshoot_clamped() {
        let event = PlaybackEvent::TimingUpdate {
            elapsed_seconds: 120.4,
        };
        let (m, _) = step(playing(120.0), event);
        assert_eq!(m.context.elapsed_seconds(), 120.0);
    }

    #[test]
    fn test_seek_ignored_when_ended_or_loading() {
        for m in [PlayerMachine::new(), ended(120.0, 100.0)] {
            let event = PlaybackEvent::SeekRequested {
                target_seconds: 5.0,
            };
            let (next, effects) = step(m, event);
            assert_eq!(next, m);
            assert!(effects.is_empty());
        }
    }

    #[test]
    fn test_end_to_end_scenario() {
        let m = PlayerMachine::new();
        let (m, _) = step(
            m,
            PlaybackEvent::ResourceLoaded {
                handle: HANDLE,
                duration_seconds: 180.0,
            },
        );
        assert_eq!(m.state, PlaybackState::Ready(ReadyState::Paused));
        assert_eq!(m.context.elapsed_seconds(), 0.0);
        assert_eq!(m.context.duration_seconds(), 180.0);

        let (m, effects) = step(m, PlaybackEvent::PlayRequested);
        assert_eq!(effects, vec![MediaEffect::Play]);

        let event = PlaybackEvent::TimingUpdate {
            elapsed_seconds: 90.0,
        };
        let (m, _) = step(m, event);
        assert_eq!(m.context.elapsed_seconds(), 90.0);

        let event = PlaybackEvent::SeekRequested {
            target_seconds: 170.0,
        };
        let (m, effects) = step(m, event);
        assert_eq!(m.state, PlaybackState::Ready(ReadyState::Playing));
        assert_eq!(m.context.elapsed_seconds(), 170.0);
        assert_eq!(effects, vec![MediaEffect::Seek(170.0)]);

        let (m, effects) = step(m, PlaybackEvent::PlaybackEnded);
        assert_eq!(m.state, PlaybackState::Ready(ReadyState::Ended));
        assert_eq!(m.context.elapsed_seconds(), 170.0);
        assert!(effects.is_empty());
    }
}
