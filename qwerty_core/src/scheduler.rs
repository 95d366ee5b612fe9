//! `scheduler`：可取消的定时任务（只读模式自动切词、错误高亮复位）。
//!
//! core 不读系统时钟：时间由宿主通过 `InputEvent::Tick(now_ms)` 注入。
//! 每种 `TimerKind` 同时最多只有一个实例。

use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TimerKind {
    /// 只读模式：按固定间隔自动完成当前单词
    ReadOnly,
    /// 输入错误：高亮结束后清空输入
    WrongFlash,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Timer {
    due_ms: u64,
    /// `None` 表示一次性定时器
    interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default)]
pub struct Scheduler {
    timers: BTreeMap<TimerKind, Timer>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// 安排一次性定时器；已存在的同类定时器会被替换。
    pub fn schedule_once(&mut self, kind: TimerKind, now_ms: u64, delay_ms: u64) {
        self.timers.insert(
            kind,
            Timer {
                due_ms: now_ms.saturating_add(delay_ms),
                interval_ms: None,
            },
        );
    }

    /// 安排周期定时器；同类定时器已存在时不做任何事，返回 false。
    pub fn schedule_interval(&mut self, kind: TimerKind, now_ms: u64, interval_ms: u64) -> bool {
        if self.timers.contains_key(&kind) {
            return false;
        }
        let interval_ms = interval_ms.max(1);
        self.timers.insert(
            kind,
            Timer {
                due_ms: now_ms.saturating_add(interval_ms),
                interval_ms: Some(interval_ms),
            },
        );
        true
    }

    /// 取消定时器；返回是否确实取消了一个活动定时器。
    pub fn cancel(&mut self, kind: TimerKind) -> bool {
        self.timers.remove(&kind).is_some()
    }

    pub fn clear(&mut self) {
        self.timers.clear();
    }

    pub fn is_active(&self, kind: TimerKind) -> bool {
        self.timers.contains_key(&kind)
    }

    pub fn active_count(&self) -> usize {
        self.timers.len()
    }

    /// 取出所有到期的定时器（按到期时间排序）。
    ///
    /// 周期定时器会补齐错过的周期，并重新挂到下一个周期；一次性定时器触发后移除。
    pub fn fire_due(&mut self, now_ms: u64) -> Vec<TimerKind> {
        let mut fired: Vec<(u64, TimerKind)> = Vec::new();
        self.timers.retain(|kind, timer| {
            match timer.interval_ms {
                None => {
                    if timer.due_ms <= now_ms {
                        fired.push((timer.due_ms, *kind));
                        return false;
                    }
                }
                Some(interval) => {
                    while timer.due_ms <= now_ms {
                        fired.push((timer.due_ms, *kind));
                        timer.due_ms = timer.due_ms.saturating_add(interval);
                    }
                }
            }
            true
        });
        fired.sort();
        fired.into_iter().map(|(_, kind)| kind).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn once_fires_a_single_time() {
        let mut s = Scheduler::new();
        s.schedule_once(TimerKind::WrongFlash, 0, 400);
        assert!(s.fire_due(399).is_empty());
        assert_eq!(s.fire_due(400), vec![TimerKind::WrongFlash]);
        assert!(s.fire_due(10_000).is_empty());
        assert!(!s.is_active(TimerKind::WrongFlash));
    }

    #[test]
    fn once_replaces_pending_instance() {
        let mut s = Scheduler::new();
        s.schedule_once(TimerKind::WrongFlash, 0, 400);
        s.schedule_once(TimerKind::WrongFlash, 300, 400);
        assert!(s.fire_due(500).is_empty());
        assert_eq!(s.fire_due(700), vec![TimerKind::WrongFlash]);
    }

    #[test]
    fn interval_keeps_single_instance() {
        let mut s = Scheduler::new();
        assert!(s.schedule_interval(TimerKind::ReadOnly, 0, 1_000));
        assert!(!s.schedule_interval(TimerKind::ReadOnly, 500, 10));
        assert_eq!(s.active_count(), 1);
        assert_eq!(s.fire_due(1_000), vec![TimerKind::ReadOnly]);
        assert!(s.is_active(TimerKind::ReadOnly));
    }

    #[test]
    fn interval_catches_up_missed_periods() {
        let mut s = Scheduler::new();
        s.schedule_interval(TimerKind::ReadOnly, 0, 1_000);
        assert_eq!(s.fire_due(3_500).len(), 3);
        assert_eq!(s.fire_due(3_999).len(), 0);
        assert_eq!(s.fire_due(4_000).len(), 1);
    }

    #[test]
    fn fired_in_due_order() {
        let mut s = Scheduler::new();
        s.schedule_interval(TimerKind::ReadOnly, 0, 300);
        s.schedule_once(TimerKind::WrongFlash, 0, 100);
        assert_eq!(
            s.fire_due(300),
            vec![TimerKind::WrongFlash, TimerKind::ReadOnly]
        );
    }

    #[test]
    fn cancel_removes_timer() {
        let mut s = Scheduler::new();
        s.schedule_interval(TimerKind::ReadOnly, 0, 100);
        assert!(s.cancel(TimerKind::ReadOnly));
        assert!(!s.cancel(TimerKind::ReadOnly));
        assert!(s.fire_due(1_000).is_empty());
    }
}
