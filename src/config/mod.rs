//! Configuration: environment-driven settings plus fixed constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;
