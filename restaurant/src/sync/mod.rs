//! 同步原语 - counting rendezvous signals and the per-instance signal set

pub mod semaphore_set;
pub mod signal;

pub use semaphore_set::SemaphoreSet;
pub use signal::Signal;
