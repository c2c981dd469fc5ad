//! Reusable rendering helpers shared by the screens.

pub mod freshness_bar;
pub mod num_fmt;
pub mod seven_segment;
