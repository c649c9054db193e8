use crate::sim::{Delay, Scalar};
use crate::error::Violation;

/// One link of the chain.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkSpec<T> {
    /// Transmission rate (Mbps), used when no transmission delay is fixed.
    pub rate: T,
    /// Physical length (km), used when no propagation delay is fixed.
    pub distance: T,
    /// Overrides the rate-derived transmission delay (ms).
    pub fixed_transmission_delay: Option<T>,
    /// Overrides the distance-derived propagation delay (ms).
    pub fixed_propagation_delay: Option<T>,
}

impl<T: Scalar> LinkSpec<T> {
    pub fn new(rate: T, distance: T) -> Self {
        Self {
            rate,
            distance,
            fixed_transmission_delay: None,
            fixed_propagation_delay: None,
        }
    }

    pub fn with_transmission_delay(mut self, ms: T) -> Self {
        self.fixed_transmission_delay = Some(ms);
        self
    }

    pub fn with_propagation_delay(mut self, ms: T) -> Self {
        self.fixed_propagation_delay = Some(ms);
        self
    }

    pub fn transmission(&self) -> Delay<T> {
        match &self.fixed_transmission_delay {
            Some(ms) => Delay::Fixed(ms.clone()),
            None => Delay::Derived(self.rate.clone()),
        }
    }

    pub fn propagation(&self) -> Delay<T> {
        match &self.fixed_propagation_delay {
            Some(ms) => Delay::Fixed(ms.clone()),
            None => Delay::Derived(self.distance.clone()),
        }
    }

    /// Check the link is usable. `index` is the 1-based position in the chain.
    ///
    /// Rate and distance are only checked when they are actually used as divisors.
    pub fn validate(&self, index: usize) -> Result<(), Violation> {
        match self.transmission() {
            Delay::Fixed(ms) if ms.is_negative() => {
                return Err(Violation::TransmissionDelay { link: index, value: ms.to_string() });
            }
            Delay::Derived(rate) if !rate.is_positive() => {
                return Err(Violation::Rate { link: index, value: rate.to_string() });
            }
            _ => {}
        }
        match self.propagation() {
            Delay::Fixed(ms) if ms.is_negative() => {
                Err(Violation::PropagationDelay { link: index, value: ms.to_string() })
            }
            Delay::Derived(distance) if !distance.is_positive() => {
                Err(Violation::Distance { link: index, value: distance.to_string() })
            }
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_rate_needs_override() {
        let link = LinkSpec::new(0., 1.);
        assert!(matches!(link.validate(1), Err(Violation::Rate { link: 1, .. })));
        let link = link.with_transmission_delay(5.);
        assert!(link.validate(1).is_ok());
    }

    #[test]
    fn zero_distance_needs_override() {
        let link = LinkSpec::new(1., 0.);
        assert!(matches!(link.validate(3), Err(Violation::Distance { link: 3, .. })));
        assert!(link.with_propagation_delay(0.).validate(3).is_ok());
    }

    #[test]
    fn negative_override() {
        let link = LinkSpec::new(1., 1.).with_transmission_delay(-1.);
        assert!(matches!(link.validate(2), Err(Violation::TransmissionDelay { link: 2, .. })));
        let link = LinkSpec::new(1., 1.).with_propagation_delay(-0.5);
        assert!(matches!(link.validate(2), Err(Violation::PropagationDelay { link: 2, .. })));
    }

    #[test]
    fn source() {
        let link = LinkSpec::new(2., 10.).with_propagation_delay(3.);
        assert_eq!(link.transmission(), Delay::Derived(2.));
        assert_eq!(link.propagation(), Delay::Fixed(3.));
    }
}
