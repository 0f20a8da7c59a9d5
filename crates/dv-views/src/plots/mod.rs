//! Plot builders

pub mod gof;
pub mod options;
pub mod qqline;
pub mod ticks;
