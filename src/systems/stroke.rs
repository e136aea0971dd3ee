//! Stroke lifecycle: begin, grow, finalize, clear.
//!
//! These functions are the public drawing API. Live pointer input
//! ([`pointer_input`](crate::systems::input::pointer_input)) and the demo
//! hand both go through them, so a scripted stroke behaves exactly like a
//! drawn one.
//!
//! While drawing, the stroke entity sits at the origin and its ribbon is in
//! world coordinates; its collider is a sensor so that a half-drawn stroke
//! never interacts with anything. On release the ribbon is recentered on its
//! vertex centroid, the entity moves there and becomes a dynamic body.

use bevy_ecs::prelude::*;
use glam::Vec2;
use log::{debug, info};

use crate::components::collider::{Collider, ColliderShape};
use crate::components::globaltransform2d::GlobalTransform2D;
use crate::components::mapposition::MapPosition;
use crate::components::ribbon::Ribbon;
use crate::components::rigidbody::RigidBody;
use crate::components::rotation::Rotation;
use crate::components::stroke::{Stroke, StrokeMesh};
use crate::events::stroke::{STROKES_DISCARDED_SIGNAL, StrokeCompletedEvent};
use crate::geometry::polygon_mass_properties;
use crate::resources::contactstate::ContactState;
use crate::resources::drawstate::{ActiveStroke, DrawState};
use crate::resources::gameconfig::GameConfig;
use crate::resources::tagregistry::TagRegistry;
use crate::resources::worldsignals::WorldSignals;
use crate::systems::attachment::release_joints_of;
use crate::systems::zone::{begin_if_inside, continue_if_same_zone, deactivate_zone};

/// Start a stroke at `point`.
///
/// Returns the new stroke entity, or `None` when a stroke is already in
/// progress or `point` is outside every active zone.
pub fn begin_stroke(world: &mut World, point: Vec2) -> Option<Entity> {
    if world.resource::<DrawState>().is_drawing() {
        debug!("begin_stroke ignored: a stroke is already in progress");
        return None;
    }
    let Some(zone) = begin_if_inside(world, point) else {
        debug!("begin_stroke ignored: {:?} is outside any active zone", point);
        return None;
    };

    let (mut ribbon, line_layer) = {
        let config = world.resource::<GameConfig>();
        (
            Ribbon::new(config.thickness, config.min_point_distance, config.uv_scale),
            config.layers.line.clone(),
        )
    };
    let tag = world.resource::<TagRegistry>().classify(&line_layer);
    ribbon.push_sample(point);

    let stroke = world
        .spawn((
            Stroke::new(ribbon, Some(zone)),
            StrokeMesh::default(),
            MapPosition::default(),
            Rotation::default(),
            GlobalTransform2D::default(),
            tag,
        ))
        .id();
    sync_buffers(world, stroke);

    world.resource_mut::<DrawState>().active = Some(ActiveStroke { stroke, zone });
    debug!("Stroke {:?} started in zone {:?}", stroke, zone);
    Some(stroke)
}

/// Extend the active stroke with `point`.
///
/// Returns false, leaving the stroke untouched, when nothing is being drawn,
/// the pointer left the stroke's zone, or `point` is too close to the last
/// sample.
pub fn add_stroke_point(world: &mut World, point: Vec2) -> bool {
    let Some(active) = world.resource::<DrawState>().active else {
        return false;
    };
    if !continue_if_same_zone(world, active.zone, point) {
        return false;
    }
    let Some(mut stroke) = world.get_mut::<Stroke>(active.stroke) else {
        return false;
    };
    if !stroke.ribbon.accepts(point) {
        return false;
    }
    stroke.ribbon.push_sample(point);
    sync_buffers(world, active.stroke);
    true
}

/// Release the active stroke.
///
/// Degenerate strokes are despawned; the rest become dynamic bodies and
/// trigger [`StrokeCompletedEvent`]. Either way the stroke's zone is retired.
/// Returns the finalized stroke. Calling it with no stroke in progress is a
/// no-op.
pub fn end_stroke(world: &mut World) -> Option<Entity> {
    let active = world.resource_mut::<DrawState>().active.take()?;
    deactivate_zone(world, active.zone);

    let degenerate = world
        .get::<Stroke>(active.stroke)
        .is_none_or(|s| s.ribbon.is_degenerate());
    if degenerate {
        if let Ok(entity) = world.get_entity_mut(active.stroke) {
            entity.despawn();
        }
        world.resource_mut::<WorldSignals>().increment(STROKES_DISCARDED_SIGNAL);
        info!("Stroke {:?} discarded (too short)", active.stroke);
        return None;
    }

    finalize(world, active.stroke);
    world.trigger(StrokeCompletedEvent {
        stroke: active.stroke,
    });
    world.flush();
    Some(active.stroke)
}

fn finalize(world: &mut World, entity: Entity) {
    let (gravity_scale, density, material, thickness) = {
        let config = world.resource::<GameConfig>();
        (
            config.gravity_scale,
            config.density,
            config.stroke_material(),
            config.thickness,
        )
    };

    let Some(mut stroke) = world.get_mut::<Stroke>(entity) else {
        return;
    };
    let centroid = stroke.ribbon.vertex_centroid();
    stroke.ribbon.recenter(centroid);
    stroke.finalized = true;

    let (mass, inertia) = match polygon_mass_properties(stroke.ribbon.outline(), density) {
        // The body origin is the vertex centroid; move inertia there.
        Some(props) => (
            props.mass,
            props.inertia + props.mass * props.center.length_squared(),
        ),
        None => {
            let length = stroke.ribbon.path_length().max(thickness);
            let mass = density * length * thickness;
            (mass, mass * length * length / 12.0)
        }
    };
    let outline = stroke.ribbon.outline().to_vec();

    let mut body = RigidBody::dynamic(mass, inertia);
    body.gravity_scale = gravity_scale;
    body.ccd = true;
    body.interpolate = true;
    body.prev_position = centroid;

    world.entity_mut(entity).insert((
        MapPosition::from_vec(centroid),
        GlobalTransform2D::new(centroid, 0.0),
        Collider::polygon(outline).with_material(material),
        body,
    ));
    sync_buffers(world, entity);
    info!(
        "Stroke {:?} finalized at {:?} (mass {:.3})",
        entity, centroid, mass
    );
}

/// Push the ribbon into the render mesh and, once it has an area, into the
/// collider.
fn sync_buffers(world: &mut World, entity: Entity) {
    let Some(stroke) = world.get::<Stroke>(entity) else {
        return;
    };
    let mesh = StrokeMesh::from_ribbon(&stroke.ribbon);
    let outline = stroke.ribbon.outline();
    let collider_points = (outline.len() >= 3).then(|| outline.to_vec());
    let finalized = stroke.finalized;

    let mut entity_mut = world.entity_mut(entity);
    entity_mut.insert(mesh);
    if let Some(points) = collider_points {
        if let Some(mut collider) = entity_mut.get_mut::<Collider>() {
            collider.shape = ColliderShape::Polygon(points);
        } else {
            let collider = Collider::polygon(points);
            entity_mut.insert(if finalized {
                collider
            } else {
                collider.as_sensor()
            });
        }
    }
}

/// Destroy every stroke (including one in progress) and all their joints.
///
/// Returns the number of strokes removed.
pub fn clear_all_strokes(world: &mut World) -> usize {
    world.resource_mut::<DrawState>().active = None;

    let strokes: Vec<Entity> = world
        .query_filtered::<Entity, With<Stroke>>()
        .iter(world)
        .collect();
    for stroke in &strokes {
        release_joints_of(world, *stroke);
        world.resource_mut::<ContactState>().forget(*stroke);
        if let Ok(entity) = world.get_entity_mut(*stroke) {
            entity.despawn();
        }
    }
    info!("Cleared {} strokes", strokes.len());
    strokes.len()
}
