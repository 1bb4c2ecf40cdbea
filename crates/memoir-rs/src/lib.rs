//! Memoir SDK: conversation memory, config and agents behind one crate.

pub mod cli;

pub use memoir_rs_config as config;
pub use memoir_rs_core as core;
pub use memoir_rs_memory as memory;

/// Wire `log` output to env_logger (`RUST_LOG`) when the `logging` feature
/// is on. Safe to call more than once.
#[inline]
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
