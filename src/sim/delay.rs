use super::Scalar;
use crate::chain::{ChainConfig, LinkSpec};

/// Where a per-link delay comes from.
#[derive(Clone, Debug, PartialEq)]
pub enum Delay<T> {
    /// Supplied by the user, in milliseconds.
    Fixed(T),
    /// Computed from a link property (rate in Mbps or distance in km).
    Derived(T),
}

/// Delays of one link, in milliseconds, constant for the whole run.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkDelays<T> {
    pub transmission: T,
    pub propagation: T,
}

/// Time to push a packet of `size` Mbits onto a link of `rate` Mbps, in ms.
pub fn transmission_delay<T: Scalar>(size: &T, rate: &T) -> T {
    let per_ms = (size.clone() / rate.clone()).rounded();
    (per_ms * T::from_u64(1000)).rounded()
}

/// Time for a signal to cross `distance` km at `speed` x 10^8 m/s, in ms.
pub fn propagation_delay<T: Scalar>(distance: &T, speed: &T) -> T {
    let scaled = (speed.clone() * T::from_u64(100)).rounded();
    (distance.clone() / scaled).rounded()
}

impl<T: Scalar> LinkDelays<T> {
    /// Resolve the override-or-compute choice of a single link.
    pub fn resolve(link: &LinkSpec<T>, packet_size: &T, speed: &T) -> Self {
        let transmission = match link.transmission() {
            Delay::Fixed(ms) => ms,
            Delay::Derived(rate) => transmission_delay(packet_size, &rate),
        };
        let propagation = match link.propagation() {
            Delay::Fixed(ms) => ms,
            Delay::Derived(distance) => propagation_delay(&distance, speed),
        };
        Self { transmission, propagation }
    }

    /// Resolve every link of the chain, in order.
    pub fn table(config: &ChainConfig<T>) -> Vec<Self> {
        config.links
            .iter()
            .map(|link| Self::resolve(link, &config.packet_size, &config.propagation_speed))
            .collect()
    }
}
