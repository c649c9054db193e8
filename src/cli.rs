//! Command line front-end: turns flags into a `ChainConfig`.

use clap::{ArgAction, Parser, ValueEnum};
use crate::chain::{ChainConfig, LinkSpec};
use crate::error::{Error, Violation};
use crate::report::Format;
use crate::sim::Scalar;

/// Numeric representation of a run.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default, ValueEnum)]
pub enum Precision {
    /// Arbitrary-precision decimal.
    #[default]
    Decimal,
    /// Binary floating point.
    Float,
}

#[derive(Parser, Debug)]
#[command(
    name = "e2e-delay",
    version,
    about = "Calculate per-packet transmission, propagation and queuing delays over a chain of links."
)]
pub struct Args {
    /// Number of links in the chain
    #[arg(short = 'L', long, default_value_t = 2)]
    pub links: usize,

    /// Link speed in Mbps: one value for every link, or one per link
    #[arg(long, value_delimiter = ',', default_value = "1", allow_hyphen_values = true)]
    pub rate: Vec<String>,

    /// Link length in km: one value for every link, or one per link
    #[arg(long, value_delimiter = ',', default_value = "1", allow_hyphen_values = true)]
    pub distance: Vec<String>,

    /// Fixed transmission delay of a link in ms, overriding its rate
    #[arg(long = "trans-delay", value_name = "LINK=MS", allow_hyphen_values = true)]
    pub trans_delay: Vec<String>,

    /// Fixed propagation delay of a link in ms, overriding its distance
    #[arg(long = "prop-delay", value_name = "LINK=MS", allow_hyphen_values = true)]
    pub prop_delay: Vec<String>,

    /// Number of packets
    #[arg(short = 'N', default_value = "1", allow_hyphen_values = true)]
    pub packets: String,

    /// Packet size in Mbits
    #[arg(short = 'M', default_value = "1", allow_hyphen_values = true)]
    pub packet_size: String,

    /// Propagation speed in 10^8 m/s
    #[arg(short = 'S', default_value = "1", allow_hyphen_values = true)]
    pub speed: String,

    /// Router processing time in ms
    #[arg(short = 'p', default_value = "0", allow_hyphen_values = true)]
    pub processing: String,

    #[arg(long, value_enum, default_value_t = Precision::Decimal)]
    pub precision: Precision,

    /// Digits after the decimal point in the output
    #[arg(long)]
    pub places: Option<usize>,

    #[arg(long, value_enum, default_value_t = Format::Table)]
    pub format: Format,

    /// Print the end-to-end delay of the last packet
    #[arg(long)]
    pub summary: bool,

    /// Increase log verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

fn number<T: Scalar>(flag: &'static str, value: &str) -> Result<T, Violation> {
    T::parse(value).ok_or_else(|| Violation::malformed(flag, value))
}

/// One value per link, a single value being shared by all links.
fn per_link<T: Scalar>(flag: &'static str, values: &[String], links: usize) -> Result<Vec<T>, Violation> {
    let parsed = values
        .iter()
        .map(|v| number::<T>(flag, v))
        .collect::<Result<Vec<_>, _>>()?;
    match parsed.len() {
        1 => Ok(vec![parsed[0].clone(); links]),
        n if n == links => Ok(parsed),
        got => Err(Violation::ListLength { flag, links, got }),
    }
}

/// Parse `LINK=MS` entries into one optional override per link.
fn overrides<T: Scalar>(flag: &'static str, entries: &[String], links: usize) -> Result<Vec<Option<T>>, Violation> {
    let mut out: Vec<Option<T>> = vec![None; links];
    for entry in entries {
        let (link, ms) = entry
            .split_once('=')
            .ok_or_else(|| Violation::malformed(flag, entry))?;
        let link: usize = link
            .trim()
            .parse()
            .map_err(|_| Violation::malformed(flag, entry))?;
        if link == 0 || link > links {
            return Err(Violation::LinkOutOfRange { flag, link, links });
        }
        let slot = &mut out[link - 1];
        if slot.is_some() {
            return Err(Violation::DuplicateOverride { flag, link });
        }
        *slot = Some(number(flag, ms)?);
    }
    Ok(out)
}

impl Args {
    /// Build the chain described by the flags, parsing every number as `T`.
    pub fn chain_config<T: Scalar>(&self) -> Result<ChainConfig<T>, Error> {
        let l = self.links;
        let rates = per_link::<T>("--rate", &self.rate, l)?;
        let distances = per_link::<T>("--distance", &self.distance, l)?;
        let trans = overrides::<T>("--trans-delay", &self.trans_delay, l)?;
        let prop = overrides::<T>("--prop-delay", &self.prop_delay, l)?;

        let links = rates
            .into_iter()
            .zip(distances)
            .zip(trans.into_iter().zip(prop))
            .map(|((rate, distance), (trans, prop))| LinkSpec {
                rate,
                distance,
                fixed_transmission_delay: trans,
                fixed_propagation_delay: prop,
            })
            .collect();

        let packet_count = self.packets
            .trim()
            .parse::<u64>()
            .map_err(|_| Violation::malformed("-N", &self.packets))?;

        let config = ChainConfig {
            links,
            packet_size: number("-M", &self.packet_size)?,
            propagation_speed: number("-S", &self.speed)?,
            packet_count,
            processing_delay: number("-p", &self.processing)?,
        };
        config.validate()?;
        Ok(config)
    }
}
