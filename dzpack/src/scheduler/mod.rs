//! Bounded-concurrency execution of tasks.
//!
//! # Admission
//!
//! ```text
//! tasks (in sequence order)
//!   │
//!   ▼
//! acquire permit ──(W permits, waits while W jobs run)──► spawn_blocking
//!                                                            │
//!   ◄──────── permit released when the job finishes ─────────┘
//! ```
//!
//! A counting semaphore admits the next task as soon as *any* running task
//! finishes, so a slow image never holds back the rest of the queue.

mod runner;

pub use runner::TaskScheduler;
