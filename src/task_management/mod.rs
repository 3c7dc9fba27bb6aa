//! # Task Management System
//!
//! This module provides the worker pool that executes pipeline work
//! asynchronously across multiple threads.
//!
//! ## Architecture Overview
//!
//! The task management system consists of a few key components:
//! - `TaskManager`: Central coordinator for task distribution and worker management
//! - `Task`: A unit of work that can be executed asynchronously
//! - `TaskResult`: The typed result of a completed task
//! - `TaskChannel`: Communication channel between the coordinator and one worker
//!
//! ## Task Lifecycle
//! 1. Tasks are published via `TaskManager::publish_task()`
//! 2. The manager distributes tasks to available worker channels using round-robin
//! 3. Workers process tasks and send results back over their channel
//! 4. The coordinator drains results with `process_completed_tasks()` each tick
//! 5. Tasks that found no free worker wait in a FIFO queue and are re-dispatched
//!    by `process_queued_tasks()` as workers free up
//!
//! ## Performance Considerations
//! - **Task Granularity**: one chunk per task amortizes scheduling overhead well
//! - **Memory**: each task owns its data; shared inputs travel as frozen `Arc`s
//! - **Blocking**: workers only block on their own empty queue, never on peers

pub mod task;

use std::collections::VecDeque;
use std::sync::mpsc::{channel, Receiver, Sender};
use std::thread::{self, JoinHandle};

use task::{Task, TaskResult};

/// A communication channel between the coordinator and a worker thread.
///
/// # Fields
/// - `task_sender`: Sends tasks from the coordinator to the worker
/// - `result_receiver`: Receives task results from the worker
/// - `num_tasks_in_flight`: Tracks the number of tasks currently being processed
/// - `_worker`: Handle to the worker thread (kept alive by this struct)
///
/// # Implementation Notes
/// - Dropping the channel drops the sender, which ends the worker's receive
///   loop and lets the thread exit
pub struct TaskChannel {
    task_sender: Sender<Box<dyn Task + Send>>,
    result_receiver: Receiver<TaskResult>,
    num_tasks_in_flight: usize,
    _worker: JoinHandle<()>,
}

/// Manages a pool of worker threads and coordinates task execution.
///
/// The `TaskManager` is responsible for:
/// - Creating and managing worker threads
/// - Distributing tasks across available workers
/// - Collecting completed task results for the coordinator
/// - Queueing tasks when all workers are busy
pub struct TaskManager {
    channels: Vec<TaskChannel>,
    queued_tasks: VecDeque<Box<dyn Task + Send>>,
    current_channel: usize,
}

/// Maximum number of tasks that can be in flight per worker channel.
///
/// This is set to 1 to ensure tasks are processed in order within each channel.
/// Increasing this value would allow for pipelining but would require more
/// sophisticated task dependency management.
pub const MAX_TASKS_IN_FLIGHT: usize = 1;

impl TaskManager {
    /// Creates a new `TaskManager` with the specified number of worker threads.
    ///
    /// # Arguments
    /// * `num_workers` - Number of worker threads to create, typically the
    ///   number of CPU cores
    ///
    /// # Panics
    /// Panics if the underlying thread creation fails.
    pub fn new(num_workers: usize) -> Self {
        log::info!(
            "Starting task manager with {} workers (available parallelism: {:?})",
            num_workers,
            thread::available_parallelism()
        );

        let mut channels = Vec::with_capacity(num_workers);

        for _ in 0..num_workers {
            let (task_tx, task_rx) = channel::<Box<dyn Task + Send>>();
            let (result_tx, result_rx) = channel::<TaskResult>();

            let worker = thread::spawn(move || {
                while let Ok(task) = task_rx.recv() {
                    let result = task.process();
                    let _ = result_tx.send(result);
                }
            });

            channels.push(TaskChannel {
                task_sender: task_tx,
                result_receiver: result_rx,
                num_tasks_in_flight: 0,
                _worker: worker,
            });
        }

        TaskManager {
            channels,
            queued_tasks: VecDeque::new(),
            current_channel: 0,
        }
    }

    /// Attempts to send a task to a specific worker channel.
    ///
    /// # Arguments
    /// * `task` - The task to send to the worker
    /// * `channel_idx` - Index of the target worker channel (must be valid)
    ///
    /// # Returns
    /// - `Ok(())` if the task was successfully sent to the worker
    /// - `Err(task)` if the send failed (e.g., worker disconnected), returning
    ///   the original task so it can be requeued
    fn try_send_task(
        &mut self,
        task: Box<dyn Task + Send>,
        channel_idx: usize,
    ) -> Result<(), Box<dyn Task + Send>> {
        match self.channels[channel_idx].task_sender.send(task) {
            Ok(_) => {
                self.channels[channel_idx].num_tasks_in_flight += 1;
                Ok(())
            }
            Err(task) => Err(task.0),
        }
    }

    /// Finds an available worker channel that can accept a new task.
    ///
    /// This implements a round-robin scheduling strategy starting from the last
    /// used channel to ensure even distribution of tasks across all workers.
    /// Channels that have reached their maximum number of in-flight tasks are
    /// skipped.
    ///
    /// # Returns
    /// - `Some(usize)` index of an available channel that can accept a new task
    /// - `None` if all channels are busy or there are no channels available
    fn find_available_channel(&self) -> Option<usize> {
        if self.channels.is_empty() {
            return None;
        }

        if self
            .channels
            .iter()
            .all(|channel| channel.num_tasks_in_flight >= MAX_TASKS_IN_FLIGHT)
        {
            return None;
        }

        let start_channel = self.current_channel;
        let mut current = start_channel;

        loop {
            if self.channels[current].num_tasks_in_flight < MAX_TASKS_IN_FLIGHT {
                return Some(current);
            }
            current = (current + 1) % self.channels.len();
            if current == start_channel {
                // Unreachable after the all-full check above.
                log::info!("All channels are full, but missed the first check");
                return None;
            }
        }
    }

    /// Publishes a new task for execution.
    ///
    /// The task will be executed as soon as a worker becomes available, or
    /// queued if all workers are busy.
    ///
    /// # Arguments
    /// * `task` - The task to be executed
    ///
    /// # Returns
    /// - `true` if the task was immediately scheduled on an available worker
    /// - `false` if the task was queued because all workers are busy
    pub fn publish_task(&mut self, task: Box<dyn Task + Send>) -> bool {
        if self.channels.is_empty() {
            self.queued_tasks.push_back(task);
            return false;
        }

        match self.find_available_channel() {
            Some(channel_idx) => match self.try_send_task(task, channel_idx) {
                Ok(_) => {
                    self.current_channel = (channel_idx + 1) % self.channels.len();
                    true
                }
                Err(task) => {
                    self.queued_tasks.push_back(task);
                    false
                }
            },
            None => {
                self.queued_tasks.push_back(task);
                false
            }
        }
    }

    /// Processes any queued tasks if workers are available.
    ///
    /// This should be called periodically (typically once per tick) so queued
    /// tasks are dispatched as workers become available. Tasks are processed
    /// in FIFO order; dispatching stops at the first task that can't be
    /// scheduled.
    pub fn process_queued_tasks(&mut self) {
        if self.queued_tasks.is_empty() {
            return;
        }

        match self.find_available_channel() {
            None => {} // No available channels, keep tasks queued
            Some(mut channel_idx) => {
                while let Some(task) = self.queued_tasks.pop_front() {
                    match self.try_send_task(task, channel_idx) {
                        Ok(_) => match self.find_available_channel() {
                            Some(next_idx) => channel_idx = next_idx,
                            None => break, // No more available channels
                        },
                        Err(task) => {
                            // Channel is disconnected, put task back and stop processing
                            self.queued_tasks.push_front(task);
                            break;
                        }
                    }
                }
            }
        }
    }

    /// Collects all completed task results from worker threads.
    ///
    /// Must be called on the coordinator thread; the caller applies the
    /// returned results to its own state.
    ///
    /// # Returns
    /// Every result that has arrived since the previous call, in per-channel
    /// arrival order. No ordering is guaranteed between channels.
    pub fn process_completed_tasks(&mut self) -> Vec<TaskResult> {
        let mut results = Vec::new();

        for channel in &mut self.channels {
            while let Ok(result) = channel.result_receiver.try_recv() {
                channel.num_tasks_in_flight -= 1;
                results.push(result);
            }
        }

        results
    }

    /// Returns the number of tasks waiting for a free worker.
    pub fn queued_len(&self) -> usize {
        self.queued_tasks.len()
    }

    /// Returns the number of tasks currently running on workers.
    pub fn in_flight_len(&self) -> usize {
        self.channels
            .iter()
            .map(|channel| channel.num_tasks_in_flight)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::voxels::grid::VoxelGrid;
    use cgmath::Point2;
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    /// A task that tags its result with the id it was created with.
    struct TestTask {
        id: i32,
    }

    impl Task for TestTask {
        fn process(&self) -> TaskResult {
            TaskResult::ChunkGenerated {
                batch_id: 0,
                coord: Point2::new(self.id, 0),
                grid: Arc::new(VoxelGrid::new(1, 1)),
            }
        }
    }

    fn drain_all(manager: &mut TaskManager, expected: usize) -> Vec<i32> {
        let mut ids = Vec::new();
        let deadline = Instant::now() + Duration::from_secs(10);

        while ids.len() < expected {
            assert!(Instant::now() < deadline, "worker pool stalled");
            manager.process_queued_tasks();
            for result in manager.process_completed_tasks() {
                if let TaskResult::ChunkGenerated { coord, .. } = result {
                    ids.push(coord.x);
                }
            }
            thread::sleep(Duration::from_millis(1));
        }

        ids
    }

    #[test]
    fn test_excess_tasks_queue_and_drain() {
        let mut manager = TaskManager::new(2);

        let mut scheduled = 0;
        for id in 0..8 {
            if manager.publish_task(Box::new(TestTask { id })) {
                scheduled += 1;
            }
        }

        // Only one task per channel may be in flight; the rest wait in the queue.
        assert_eq!(scheduled, 2);
        assert_eq!(manager.queued_len(), 6);

        let mut ids = drain_all(&mut manager, 8);
        ids.sort_unstable();
        assert_eq!(ids, (0..8).collect::<Vec<_>>());
        assert_eq!(manager.queued_len(), 0);
        assert_eq!(manager.in_flight_len(), 0);
    }

    #[test]
    fn test_round_robin_rotates_channels() {
        let mut manager = TaskManager::new(4);

        for id in 0..4 {
            assert!(manager.publish_task(Box::new(TestTask { id })));
        }

        // Every channel took exactly one task.
        assert!(manager
            .channels
            .iter()
            .all(|channel| channel.num_tasks_in_flight == 1));

        drain_all(&mut manager, 4);
    }
}
