//! End-to-end packet delay over a linear chain of links joined by routers.
//!
//! Each packet pays a transmission and a propagation delay on every link,
//! plus a processing delay and an accumulated queue delay at every router.

pub mod chain;
pub mod cli;
pub mod error;
pub mod report;
pub mod sim;

pub use chain::{ChainConfig, LinkSpec};
pub use error::{Error, Violation};
pub use report::{Format, Report};
pub use sim::{end_to_end_delay, simulate, PacketRecord, Scalar, Simulator};
