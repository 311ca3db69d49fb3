//! Materials for the street, shared by everything the builder spawns.

use bevy::prelude::*;

/// Material handles for level geometry.
pub struct Palette {
    pub ground: Handle<StandardMaterial>,
    pub siding: Handle<StandardMaterial>,
    pub roof: Handle<StandardMaterial>,
    pub door: Handle<StandardMaterial>,
    pub fence: Handle<StandardMaterial>,
    pub lamp: Handle<StandardMaterial>,
}

impl Palette {
    pub fn new(materials: &mut Assets<StandardMaterial>) -> Self {
        Self {
            // Wet asphalt and dead grass
            ground: materials.add(StandardMaterial {
                base_color: Color::srgb(0.12, 0.13, 0.11),
                perceptual_roughness: 0.95,
                ..default()
            }),
            // Weathered clapboard, desaturated
            siding: materials.add(StandardMaterial {
                base_color: Color::srgb(0.36, 0.34, 0.31),
                perceptual_roughness: 0.85,
                ..default()
            }),
            roof: materials.add(StandardMaterial {
                base_color: Color::srgb(0.18, 0.16, 0.15),
                perceptual_roughness: 0.9,
                ..default()
            }),
            door: materials.add(StandardMaterial {
                base_color: Color::srgb(0.30, 0.22, 0.16),
                perceptual_roughness: 0.7,
                ..default()
            }),
            fence: materials.add(StandardMaterial {
                base_color: Color::srgb(0.26, 0.24, 0.22),
                perceptual_roughness: 0.8,
                ..default()
            }),
            lamp: materials.add(StandardMaterial {
                base_color: Color::srgb(0.9, 0.8, 0.6),
                emissive: LinearRgba::new(0.9, 0.7, 0.4, 1.0),
                ..default()
            }),
        }
    }

    /// Flat-coloured material for a piece of furniture.
    pub fn prop(materials: &mut Assets<StandardMaterial>, color: (f32, f32, f32)) -> Handle<StandardMaterial> {
        materials.add(StandardMaterial {
            base_color: Color::srgb(color.0, color.1, color.2),
            perceptual_roughness: 0.8,
            ..default()
        })
    }
}
