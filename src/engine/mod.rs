//! Core engine: settles a staked bet against a winning pocket.

pub mod payout;

pub use payout::{expected_net, payout, settle, Settlement};
