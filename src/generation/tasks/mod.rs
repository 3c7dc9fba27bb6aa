//! Tasks for running terrain generation on worker threads.

pub mod chunk_generation_task;
