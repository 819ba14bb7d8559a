#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

//! Equipment load resolution and warm-up planning.

pub mod loadout;

mod equipment;
mod error;
mod exercise;
mod muscle;
mod service;
mod settings;
mod unit;
mod warmth;
mod warmup;

pub use equipment::*;
pub use error::*;
pub use exercise::*;
pub use loadout::{MachineSetting, MatchQuality, PlateBreakdown, ResolveResult};
pub use muscle::*;
pub use service::*;
pub use settings::*;
pub use unit::*;
pub use warmth::*;
pub use warmup::*;
