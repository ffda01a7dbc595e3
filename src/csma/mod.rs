//! CSMA/CD shared-medium model.
//!
//! N nodes on a linear bus, each with its own Poisson stream of intended
//! transmission times. The model repeatedly picks the earliest pending
//! transmission and classifies every other node's head against the window
//! in which the sender's bits pass that node.

mod model;
mod node;

pub use model::CollisionDomainModel;
pub use node::{CollisionNode, NodeId};

use crate::error::{Result, SimError, check_rate};

pub const DEFAULT_LINE_RATE_BPS: f64 = 1_000_000.0;
pub const DEFAULT_PACKET_BITS: f64 = 1_500.0;
/// distance between adjacent nodes (m)
pub const DEFAULT_NODE_SPACING_M: f64 = 10.0;
/// 2/3 of the speed of light (m/s)
pub const DEFAULT_PROPAGATION_SPEED: f64 = 2.0e8;
/// backoff slot in bit-times
pub const DEFAULT_SLOT_BITS: f64 = 512.0;
pub const DEFAULT_MAX_RETRIES: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct CsmaParams {
    pub node_count: usize,
    /// per-node packet arrival rate (packets/s)
    pub arrival_rate: f64,
    /// 1-persistent when true, non-persistent otherwise
    pub persistent: bool,
    pub line_rate_bps: f64,
    pub packet_bits: f64,
    pub node_spacing_m: f64,
    pub propagation_speed: f64,
    pub slot_bits: f64,
    pub max_retries: u32,
    /// after a success, hold the sender's later packets until its own
    /// transmission ends (off: only the head is removed)
    pub hold_during_transmission: bool,
}

impl CsmaParams {
    pub fn new(node_count: usize, arrival_rate: f64, persistent: bool) -> Self {
        Self {
            node_count,
            arrival_rate,
            persistent,
            line_rate_bps: DEFAULT_LINE_RATE_BPS,
            packet_bits: DEFAULT_PACKET_BITS,
            node_spacing_m: DEFAULT_NODE_SPACING_M,
            propagation_speed: DEFAULT_PROPAGATION_SPEED,
            slot_bits: DEFAULT_SLOT_BITS,
            max_retries: DEFAULT_MAX_RETRIES,
            hold_during_transmission: false,
        }
    }

    pub fn transmission_delay(&self) -> f64 {
        self.packet_bits / self.line_rate_bps
    }

    /// one-hop propagation delay
    pub fn propagation_delay(&self) -> f64 {
        self.node_spacing_m / self.propagation_speed
    }

    pub fn slot_time(&self) -> f64 {
        self.slot_bits / self.line_rate_bps
    }

    pub fn validate(&self) -> Result<()> {
        if self.node_count == 0 {
            return Err(SimError::InvalidConfig(
                "node count must be > 0".to_string(),
            ));
        }
        check_rate(self.arrival_rate)?;
        check_rate(self.line_rate_bps)?;
        check_rate(self.packet_bits)?;
        check_rate(self.propagation_speed)?;
        check_rate(self.slot_bits)?;
        if !(self.node_spacing_m.is_finite() && self.node_spacing_m >= 0.0) {
            return Err(SimError::InvalidConfig(format!(
                "node spacing must be finite and >= 0, got {}",
                self.node_spacing_m
            )));
        }
        Ok(())
    }

    pub fn label(&self) -> String {
        format!(
            "A={} N={} {}",
            self.arrival_rate,
            self.node_count,
            if self.persistent { "persistent" } else { "non-persistent" }
        )
    }
}
