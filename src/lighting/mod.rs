//! Scene darkness and ambient-light computation

pub mod color;
pub mod composer;
pub mod darkness;

pub use composer::{
    adjust_darkness, compose_lighting, moon_illumination_reduction, ComposeContext,
    EnvironmentLighting, LightingChannel,
};
pub use darkness::base_darkness;
