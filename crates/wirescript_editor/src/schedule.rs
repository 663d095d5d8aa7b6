// SPDX-License-Identifier: MIT OR Apache-2.0
//! Deferred callbacks that run once the host has finished a frame.
//!
//! Some decisions, like resolving a selection box, must wait until the
//! rendering surface has settled its layout for the frame. The host calls
//! [`FrameScheduler::run_frame`] once per frame after layout, and anything
//! scheduled during that frame runs then.

type Task<Ctx, Env> = Box<dyn FnOnce(&mut Ctx, &Env)>;

/// Cancellation token for a scheduled callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TaskHandle(u64);

/// Single-threaded run-next-frame queue.
///
/// `Ctx` is the mutable state tasks operate on; `Env` is per-frame
/// read-only input the host supplies to the tick, typically the geometry
/// provider.
pub struct FrameScheduler<Ctx, Env: ?Sized = ()> {
    next_id: u64,
    pending: Vec<(u64, Task<Ctx, Env>)>,
}

impl<Ctx, Env: ?Sized> Default for FrameScheduler<Ctx, Env> {
    fn default() -> Self {
        Self::new()
    }
}

impl<Ctx, Env: ?Sized> std::fmt::Debug for FrameScheduler<Ctx, Env> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("pending", &self.pending.len())
            .finish()
    }
}

impl<Ctx, Env: ?Sized> FrameScheduler<Ctx, Env> {
    /// Empty scheduler
    pub fn new() -> Self {
        Self {
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Queue a callback for the next frame tick
    pub fn schedule(&mut self, task: impl FnOnce(&mut Ctx, &Env) + 'static) -> TaskHandle {
        let id = self.next_id;
        self.next_id += 1;
        self.pending.push((id, Box::new(task)));
        TaskHandle(id)
    }

    /// Drop a callback before it runs. Returns whether it was still
    /// pending.
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.pending.len();
        self.pending.retain(|(id, _)| *id != handle.0);
        self.pending.len() != before
    }

    /// Number of callbacks waiting for the next tick
    pub fn pending(&self) -> usize {
        self.pending.len()
    }

    /// Run everything scheduled so far, in scheduling order.
    ///
    /// Callbacks that schedule further work do not extend the current
    /// tick; that work waits for the next one.
    pub fn run_frame(&mut self, ctx: &mut Ctx, env: &Env) {
        let batch = std::mem::take(&mut self.pending);
        for (_, task) in batch {
            task(ctx, env);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runs_in_order_once() {
        let mut scheduler: FrameScheduler<Vec<u32>> = FrameScheduler::new();
        scheduler.schedule(|log, _| log.push(1));
        scheduler.schedule(|log, _| log.push(2));

        let mut log = Vec::new();
        scheduler.run_frame(&mut log, &());
        assert_eq!(log, [1, 2]);
        scheduler.run_frame(&mut log, &());
        assert_eq!(log, [1, 2]);
    }

    #[test]
    fn test_cancel_before_tick() {
        let mut scheduler: FrameScheduler<Vec<u32>> = FrameScheduler::new();
        let kept = scheduler.schedule(|log, _| log.push(1));
        let cancelled = scheduler.schedule(|log, _| log.push(2));

        assert!(scheduler.cancel(cancelled));
        assert!(!scheduler.cancel(cancelled));

        let mut log = Vec::new();
        scheduler.run_frame(&mut log, &());
        assert_eq!(log, [1]);
        assert!(!scheduler.cancel(kept));
    }

    #[test]
    fn test_env_passed_to_tasks() {
        let mut scheduler: FrameScheduler<Vec<u32>, u32> = FrameScheduler::new();
        scheduler.schedule(|log, env: &u32| log.push(*env));

        let mut log = Vec::new();
        scheduler.run_frame(&mut log, &7);
        assert_eq!(log, [7]);
    }
}
