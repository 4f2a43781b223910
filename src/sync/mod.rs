pub mod barrier;

pub use barrier::PhaseBarrier;
