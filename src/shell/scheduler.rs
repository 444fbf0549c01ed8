//! Deferred command queue driven by a virtual millisecond clock
//!
//! The event loop feeds elapsed time in through [`Scheduler::advance`]; due
//! commands come back ordered by due time and then by insertion order, so
//! two commands scheduled for the same instant always run in the order
//! they were queued.

use log::debug;
use std::cmp::Reverse;
use std::collections::{BinaryHeap, HashMap};

use super::actions::ShellCommand;

/// Identifier of a scheduled task
pub type TaskId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Slot {
    due: u64,
    seq: u64,
}

#[derive(Debug)]
struct Task {
    command: ShellCommand,
    period: Option<u64>,
}

/// Timer queue for one-shot and repeating commands
#[derive(Debug, Default)]
pub struct Scheduler {
    now: u64,
    next_seq: u64,
    queue: BinaryHeap<Reverse<(Slot, TaskId)>>,
    tasks: HashMap<TaskId, Task>,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `command` once, `delay_ms` from now
    pub fn schedule(&mut self, delay_ms: u64, command: ShellCommand) -> TaskId {
        self.insert(delay_ms, command, None)
    }

    /// Run `command` every `period_ms`, starting one period from now
    pub fn schedule_repeating(&mut self, period_ms: u64, command: ShellCommand) -> TaskId {
        let period = period_ms.max(1);
        self.insert(period, command, Some(period))
    }

    pub fn cancel(&mut self, id: TaskId) -> bool {
        self.tasks.remove(&id).is_some()
    }

    /// Time until the next task is due, if any
    pub fn next_due_in(&self) -> Option<u64> {
        self.queue
            .iter()
            .filter(|Reverse((_, id))| self.tasks.contains_key(id))
            .map(|Reverse((slot, _))| slot.due.saturating_sub(self.now))
            .min()
    }

    /// Move the clock forward and collect every command that became due
    pub fn advance(&mut self, elapsed_ms: u64) -> Vec<ShellCommand> {
        self.now = self.now.saturating_add(elapsed_ms);
        self.take_due()
    }

    /// Collect commands due at the current instant without moving the clock
    pub fn take_due(&mut self) -> Vec<ShellCommand> {
        let mut due = Vec::new();

        while let Some(Reverse((slot, id))) = self.queue.peek().copied() {
            if slot.due > self.now {
                break;
            }
            self.queue.pop();

            let Some(task) = self.tasks.get(&id) else {
                // cancelled
                continue;
            };
            let (command, period) = (task.command, task.period);
            match period {
                Some(period) => {
                    let seq = self.bump_seq();
                    let next = Slot {
                        due: slot.due + period,
                        seq,
                    };
                    self.queue.push(Reverse((next, id)));
                }
                None => {
                    self.tasks.remove(&id);
                }
            }
            debug!("Task {} due at {}ms: {:?}", id, slot.due, command);
            due.push(command);
        }

        due
    }

    fn insert(&mut self, delay_ms: u64, command: ShellCommand, period: Option<u64>) -> TaskId {
        let seq = self.bump_seq();
        let id = seq;
        let slot = Slot {
            due: self.now.saturating_add(delay_ms),
            seq,
        };
        self.tasks.insert(id, Task { command, period });
        self.queue.push(Reverse((slot, id)));
        id
    }

    fn bump_seq(&mut self) -> u64 {
        self.next_seq += 1;
        self.next_seq
    }
}
