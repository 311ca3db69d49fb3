//! Flashlight module - the delayed switch, beam tracking, and the light cone
//! that enemies react to.

mod components;
pub mod perception;
mod plugin;
pub mod systems;

pub use components::{BeamTarget, Flashlight, LookProbe, Switch};
pub use perception::{RayCaster, RayHit, Viewpoint};
pub use plugin::FlashlightPlugin;
