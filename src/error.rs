use thiserror::Error;

/// Errors raised while building or running a delay chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(#[from] Violation),
}

/// The precondition a configuration breaks.
///
/// Links are numbered from 1, the way they are named on the command line.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("the chain needs at least one link")]
    NoLinks,
    #[error("packet count must be at least 1")]
    NoPackets,
    #[error("packet size must be positive, got {0}")]
    PacketSize(String),
    #[error("propagation speed must be positive, got {0}")]
    PropagationSpeed(String),
    #[error("router processing delay must not be negative, got {0}")]
    ProcessingDelay(String),
    #[error("link {link}: rate must be positive when no transmission delay is fixed, got {value}")]
    Rate { link: usize, value: String },
    #[error("link {link}: distance must be positive when no propagation delay is fixed, got {value}")]
    Distance { link: usize, value: String },
    #[error("link {link}: fixed transmission delay must not be negative, got {value}")]
    TransmissionDelay { link: usize, value: String },
    #[error("link {link}: fixed propagation delay must not be negative, got {value}")]
    PropagationDelay { link: usize, value: String },
    #[error("{flag}: malformed number {value:?}")]
    Malformed { flag: &'static str, value: String },
    #[error("{flag}: expected 1 or {links} values, got {got}")]
    ListLength { flag: &'static str, links: usize, got: usize },
    #[error("{flag}: link {link} is outside 1..={links}")]
    LinkOutOfRange { flag: &'static str, link: usize, links: usize },
    #[error("{flag}: link {link} is given more than once")]
    DuplicateOverride { flag: &'static str, link: usize },
}

impl Violation {
    pub fn malformed(flag: &'static str, value: &str) -> Self {
        Violation::Malformed { flag, value: value.to_string() }
    }
}
