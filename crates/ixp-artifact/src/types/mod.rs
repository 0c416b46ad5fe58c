//! Concrete document types

pub mod config;

pub use config::{
    AddressFamilies, DaemonKind, IxpConfig, PeeringConfiguration, PeeringSource, RibDumps,
    RouteServerEntry,
};
