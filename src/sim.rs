pub mod scalar;
pub mod delay;

pub use scalar::Scalar;
pub use delay::*;

use serde::Serialize;
use tracing::{debug, trace};
use crate::chain::ChainConfig;
use crate::error::Error;

/// Timing of one packet through the chain. All times are in ms,
/// relative to the injection of the first packet.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct PacketRecord<T> {
    /// Sequence number, starting at 1.
    pub index: u64,
    /// When the packet starts to be sent on the first link (A).
    pub injection_time: T,
    /// Arrival at the far end of each link.
    /// The last one is the end-to-end delay (B).
    pub arrival_times: Vec<T>,
    /// Queue delay applied to this packet at each intermediate router.
    pub queue_delays: Vec<T>,
}

impl<T> PacketRecord<T> {
    /// Arrival at the end of the last link (B).
    /// `None` only for a record with no arrival times.
    pub fn end_to_end(&self) -> Option<&T> {
        self.arrival_times.last()
    }
}

/// End-to-end delay of a whole run: the final arrival of its last packet.
pub fn end_to_end_delay<T>(records: &[PacketRecord<T>]) -> Option<&T> {
    records.last().and_then(PacketRecord::end_to_end)
}

/// Add terms left to right, rounding after every addition.
fn sum<T: Scalar>(terms: impl IntoIterator<Item = T>) -> T {
    terms
        .into_iter()
        .fold(None, |acc: Option<T>, t| match acc {
            Some(acc) => Some((acc + t).rounded()),
            None => Some(t),
        })
        .unwrap_or_else(T::zero)
}

/// Run the chain for every packet and collect the records.
///
/// Either all `packet_count` records are returned or the configuration is rejected.
pub fn simulate<T: Scalar>(config: &ChainConfig<T>) -> Result<Vec<PacketRecord<T>>, Error> {
    let sim = Simulator::new(config)?;
    Ok(sim.collect())
}

/// State of one simulation run.
///
/// Yields one `PacketRecord` per packet, in order.
pub struct Simulator<'a, T> {
    config: &'a ChainConfig<T>,
    /// Resolved delays of each link, constant for the run.
    delays: Vec<LinkDelays<T>>,
    /// Injection time of the next packet (A).
    injection: T,
    /// `queue[j]` is the accumulated queue delay of the router
    /// between link `j + 1` and link `j + 2`. Never decreases.
    queue: Vec<T>,
    /// Index of the next packet.
    next: u64,
}

impl<'a, T: Scalar> Simulator<'a, T> {
    pub fn new(config: &'a ChainConfig<T>) -> Result<Self, Error> {
        config.validate()?;
        let delays = LinkDelays::table(config);
        for (i, link) in delays.iter().enumerate() {
            debug!(
                link = i + 1,
                transmission = %link.transmission,
                propagation = %link.propagation,
                "resolved link delays"
            );
        }
        debug!(
            links = config.l(),
            packets = config.packet_count,
            precision = T::NAME,
            "starting simulation"
        );
        Ok(Self {
            config,
            delays,
            injection: T::zero(),
            queue: vec![T::zero(); config.routers()],
            next: 1,
        })
    }

    pub fn delays(&self) -> &[LinkDelays<T>] {
        &self.delays
    }

    /// Send the next packet through the chain.
    fn step(&mut self) -> PacketRecord<T> {
        let l = self.delays.len();
        let first = &self.delays[0];

        let mut arrivals = Vec::with_capacity(l);
        arrivals.push(sum([
            self.injection.clone(),
            first.transmission.clone(),
            first.propagation.clone(),
        ]));
        for i in 1..l {
            let link = &self.delays[i];
            let at = sum([
                arrivals[i - 1].clone(),
                self.queue[i - 1].clone(),
                self.config.processing_delay.clone(),
                link.transmission.clone(),
                link.propagation.clone(),
            ]);
            arrivals.push(at);
        }

        let record = PacketRecord {
            index: self.next,
            injection_time: self.injection.clone(),
            arrival_times: arrivals,
            queue_delays: self.queue.clone(),
        };
        trace!(
            packet = record.index,
            injection = %record.injection_time,
            end_to_end = ?record.end_to_end(),
            "packet delivered"
        );

        // A packet reaching router `j` before the downstream link could have
        // sent one packet makes every later packet wait for the service gap.
        for j in 0..self.queue.len() {
            let upstream = &self.delays[j].transmission;
            let downstream = &self.delays[j + 1].transmission;
            if record.arrival_times[j] < *downstream {
                let gap = (downstream.clone() - upstream.clone()).rounded();
                self.queue[j] = sum([self.queue[j].clone(), gap]);
                debug!(
                    packet = record.index,
                    router = j + 1,
                    queue = %self.queue[j],
                    "queue delay accrued"
                );
            }
        }

        self.injection = sum([self.injection.clone(), self.delays[0].transmission.clone()]);
        self.next += 1;
        record
    }
}

impl<'a, T: Scalar> Iterator for Simulator<'a, T> {
    type Item = PacketRecord<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next > self.config.packet_count {
            return None;
        }
        Some(self.step())
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.config.packet_count.saturating_add(1).saturating_sub(self.next) as usize;
        (left, Some(left))
    }
}


#[cfg(test)]
mod properties {
    use super::*;
    use crate::chain::LinkSpec;
    use bigdecimal::BigDecimal;
    use proptest::prelude::*;

    fn chain(rates: &[u32], distances: &[u32], packets: u64, p: u32) -> ChainConfig<BigDecimal> {
        let mut config = ChainConfig::uniform(rates.len());
        for (i, link) in config.links.iter_mut().enumerate() {
            *link = LinkSpec::new(
                BigDecimal::from(rates[i]),
                BigDecimal::from(distances[i % distances.len()]),
            );
        }
        config.packet_count = packets;
        config.processing_delay = BigDecimal::from(p);
        config
    }

    proptest! {
        #[test]
        fn deterministic(
            rates in prop::collection::vec(1u32..100, 1..5),
            distances in prop::collection::vec(1u32..5000, 1..5),
            packets in 1u64..30,
            p in 0u32..5,
        ) {
            let config = chain(&rates, &distances, packets, p);
            let a = simulate(&config).unwrap();
            let b = simulate(&config).unwrap();
            prop_assert_eq!(a.len() as u64, packets);
            prop_assert_eq!(a, b);
        }

        #[test]
        fn no_queue_without_slower_downstream(
            mut rates in prop::collection::vec(1u32..100, 1..5),
            packets in 1u64..30,
        ) {
            // Non-decreasing rates: no link is slower than the one before it.
            rates.sort();
            let config = chain(&rates, &[1], packets, 0);
            let zero = <BigDecimal as Scalar>::zero();
            for record in simulate(&config).unwrap() {
                prop_assert!(record.queue_delays.iter().all(|q| *q == zero));
            }
        }

        #[test]
        fn queue_grows_by_service_gap(
            transmission in prop::collection::vec(1u32..50, 2..5),
            packets in 1u64..40,
        ) {
            let mut config = ChainConfig::<f64>::uniform(transmission.len());
            for (link, ms) in config.links.iter_mut().zip(&transmission) {
                link.fixed_transmission_delay = Some(*ms as f64);
                link.fixed_propagation_delay = Some(0.);
            }
            config.packet_count = packets;
            let records = simulate(&config).unwrap();
            for pair in records.windows(2) {
                for j in 0..transmission.len() - 1 {
                    let step = pair[1].queue_delays[j] - pair[0].queue_delays[j];
                    let gap = transmission[j + 1] as f64 - transmission[j] as f64;
                    prop_assert!(step == 0. || step == gap);
                    prop_assert!(step >= 0.);
                }
            }
        }

        #[test]
        fn override_hides_rate_and_distance(
            rate_a in 1u32..100,
            rate_b in 1u32..100,
            distance_a in 1u32..5000,
            distance_b in 1u32..5000,
            fixed in 0u32..2000,
            packets in 1u64..20,
        ) {
            let build = |rate: u32, distance: u32| {
                let mut config = chain(&[rate, 3], &[distance, 10], packets, 1);
                config.links[0].fixed_transmission_delay = Some(BigDecimal::from(fixed));
                config.links[0].fixed_propagation_delay = Some(BigDecimal::from(fixed) / BigDecimal::from(7));
                config
            };
            let a = simulate(&build(rate_a, distance_a)).unwrap();
            let b = simulate(&build(rate_b, distance_b)).unwrap();
            prop_assert_eq!(a, b);
        }
    }
}
