//! Application lifecycle: construct → initialize → serve → shutdown

pub mod shutdown;
pub mod startup;
