//! Error types for topology planning

use ipnet::Ipv4Net;
use thiserror::Error;

/// Result type for planning operations
pub type Result<T> = std::result::Result<T, Error>;

/// Topology planner errors
///
/// The first four variants are fatal for a planning run and abort it before
/// anything external is touched. Their messages name the violated invariant
/// with concrete numbers, since early misconfiguration reporting is the main
/// reason the planner exists.
#[derive(Debug, Clone, Error)]
pub enum Error {
    // Partitioning errors
    #[error("subnet prefix /{child} must be longer than the network prefix /{base}")]
    InvalidPrefix { base: u8, child: u8 },

    #[error(
        "requested {requested} /{prefix} blocks in {base} but only {available} \
         disjoint blocks remain after excluding {occupied} occupied ranges"
    )]
    AddressSpaceExhausted {
        base: Ipv4Net,
        prefix: u8,
        requested: usize,
        available: usize,
        occupied: usize,
    },

    // Zone errors
    #[error("availability zone lookup returned no zones")]
    NoZonesAvailable,

    // Pairing errors
    #[error("{zones} zones need {required} blocks (one public, one private each) but only {given} were given")]
    InsufficientBlocks {
        zones: usize,
        required: usize,
        given: usize,
    },

    // CIDR errors
    #[error("invalid CIDR: {0}")]
    InvalidCidr(String),

    // External collaborator errors
    #[error("discovery failed: {0}")]
    Discovery(String),

    #[error("plan execution failed: {0}")]
    Execution(String),
}

impl From<ipnet::PrefixLenError> for Error {
    fn from(e: ipnet::PrefixLenError) -> Self {
        Error::InvalidCidr(e.to_string())
    }
}

impl From<std::net::AddrParseError> for Error {
    fn from(e: std::net::AddrParseError) -> Self {
        Error::InvalidCidr(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_exhaustion_message_names_the_numbers() {
        let err = Error::AddressSpaceExhausted {
            base: Ipv4Net::from_str("10.0.0.0/16").unwrap(),
            prefix: 24,
            requested: 6,
            available: 3,
            occupied: 2,
        };
        let msg = err.to_string();
        assert!(msg.contains("6"));
        assert!(msg.contains("/24"));
        assert!(msg.contains("only 3"));
        assert!(msg.contains("2 occupied"));
    }

    #[test]
    fn test_prefix_error_conversion() {
        let err: Error = ipnet::PrefixLenError.into();
        assert!(matches!(err, Error::InvalidCidr(_)));
    }
}
