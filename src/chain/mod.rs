pub mod link;

pub use link::*;

use crate::error::{Error, Violation};
use crate::sim::Scalar;

/// A linear chain of links joined by identical routers.
///
/// All quantities share one numeric representation `T`:
/// sizes in Mbits, rates in Mbps, distances in km, speed in 10^8 m/s, delays in ms.
#[derive(Clone, Debug, PartialEq)]
pub struct ChainConfig<T> {
    pub links: Vec<LinkSpec<T>>, // In order from the source
    pub packet_size: T, // Size of every packet (Mbits)
    pub propagation_speed: T, // Shared by all links (10^8 m/s)
    pub packet_count: u64, // Packets to send
    pub processing_delay: T, // Per router (ms)
}

impl<T: Scalar> ChainConfig<T> {
    /// Chain of `links` identical 1 Mbps, 1 km links, sending one 1 Mbit packet.
    pub fn uniform(links: usize) -> Self {
        let one = T::from_u64(1);
        Self {
            links: vec![LinkSpec::new(one.clone(), one.clone()); links],
            packet_size: one.clone(),
            propagation_speed: one,
            packet_count: 1,
            processing_delay: T::zero(),
        }
    }

    pub fn l(&self) -> usize { self.links.len() }

    /// Count of intermediate routers
    pub fn routers(&self) -> usize { self.l().saturating_sub(1) }

    /// Check every precondition of a simulation run.
    pub fn validate(&self) -> Result<(), Error> {
        if self.links.is_empty() {
            return Err(Violation::NoLinks.into());
        }
        if self.packet_count == 0 {
            return Err(Violation::NoPackets.into());
        }
        if !self.packet_size.is_positive() {
            return Err(Violation::PacketSize(self.packet_size.to_string()).into());
        }
        if !self.propagation_speed.is_positive() {
            return Err(Violation::PropagationSpeed(self.propagation_speed.to_string()).into());
        }
        if self.processing_delay.is_negative() {
            return Err(Violation::ProcessingDelay(self.processing_delay.to_string()).into());
        }
        for (i, link) in self.links.iter().enumerate() {
            link.validate(i + 1)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;

    fn err(config: &ChainConfig<f64>) -> Violation {
        match config.validate() {
            Err(Error::InvalidConfiguration(v)) => v,
            Ok(()) => panic!("expected a violation"),
        }
    }

    #[test]
    fn uniform_is_valid() {
        let config = ChainConfig::<f64>::uniform(3);
        assert!(config.validate().is_ok());
        assert_eq!(config.l(), 3);
        assert_eq!(config.routers(), 2);
        assert!(ChainConfig::<BigDecimal>::uniform(2).validate().is_ok());
    }

    #[test]
    fn rejects() {
        let mut config = ChainConfig::<f64>::uniform(0);
        assert_eq!(err(&config), Violation::NoLinks);

        config = ChainConfig::uniform(2);
        config.packet_count = 0;
        assert_eq!(err(&config), Violation::NoPackets);

        config = ChainConfig::uniform(2);
        config.packet_size = 0.;
        assert!(matches!(err(&config), Violation::PacketSize(_)));

        config = ChainConfig::uniform(2);
        config.propagation_speed = -1.;
        assert!(matches!(err(&config), Violation::PropagationSpeed(_)));

        config = ChainConfig::uniform(2);
        config.processing_delay = -0.1;
        assert!(matches!(err(&config), Violation::ProcessingDelay(_)));

        config = ChainConfig::uniform(2);
        config.links[1].rate = 0.;
        assert!(matches!(err(&config), Violation::Rate { link: 2, .. }));
    }

    #[test]
    fn speed_is_checked_even_with_fixed_propagation() {
        let mut config = ChainConfig::<f64>::uniform(1);
        config.links[0].fixed_propagation_delay = Some(1.);
        config.propagation_speed = 0.;
        assert!(matches!(err(&config), Violation::PropagationSpeed(_)));
    }
}
