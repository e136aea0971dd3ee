//! Drawing zone gate and zone lifecycle.
//!
//! Strokes may only start inside an active zone, and only keep growing while
//! the pointer stays in that same zone. Zones are sensors tagged
//! [`BodyTag::DrawZone`]; the gate asks the collider layer which shapes
//! contain the pointer.
//!
//! On release the zone is retired: immediately, or by fading out over
//! `fade_duration` seconds. The fade is a [`Timer`] whose expiry
//! ([`zone_timer_observer`]) marks the zone inactive.

use bevy_ecs::observer::On;
use bevy_ecs::prelude::*;
use glam::Vec2;
use log::debug;

use crate::components::bodytag::BodyTag;
use crate::components::collider::Collider;
use crate::components::drawzone::{DrawZone, ZoneState};
use crate::components::timer::{Timer, ZONE_FADED_SIGNAL};
use crate::events::timer::TimerEvent;
use crate::resources::gameconfig::GameConfig;
use crate::systems::propagate_transforms::world_transform;

/// Colliders containing `point` whose tag passes `filter`.
pub fn point_query(
    world: &mut World,
    point: Vec2,
    filter: impl Fn(BodyTag) -> bool,
) -> Vec<(Entity, BodyTag)> {
    let mut query = world.query::<(Entity, &Collider, Option<&BodyTag>)>();
    let world: &World = world;
    query
        .iter(world)
        .filter_map(|(entity, collider, tag)| {
            let tag = tag.copied().unwrap_or_default();
            if !filter(tag) {
                return None;
            }
            let transform = world_transform(world, entity)?;
            collider
                .contains_point(&transform, point)
                .then_some((entity, tag))
        })
        .collect()
}

/// Active drawing zones under `point`.
fn active_zones_at(world: &mut World, point: Vec2) -> Vec<Entity> {
    point_query(world, point, |tag| tag == BodyTag::DrawZone)
        .into_iter()
        .filter(|(entity, _)| {
            world
                .get::<DrawZone>(*entity)
                .is_some_and(|zone| zone.is_active())
        })
        .map(|(entity, _)| entity)
        .collect()
}

/// The zone a stroke starting at `point` would belong to.
pub fn begin_if_inside(world: &mut World, point: Vec2) -> Option<Entity> {
    active_zones_at(world, point).into_iter().next()
}

/// Whether `point` is still inside `zone` (and `zone` is still active).
pub fn continue_if_same_zone(world: &mut World, zone: Entity, point: Vec2) -> bool {
    active_zones_at(world, point).contains(&zone)
}

/// Retire `zone` after a stroke started in it was released.
pub fn deactivate_zone(world: &mut World, zone: Entity) {
    let (fade_out, fade_duration) = {
        let config = world.resource::<GameConfig>();
        (config.fade_out, config.fade_duration)
    };
    let fade = fade_out && fade_duration > 0.0;
    {
        let Some(mut draw_zone) = world.get_mut::<DrawZone>(zone) else {
            return;
        };
        if draw_zone.state != ZoneState::Active {
            return;
        }
        if fade {
            draw_zone.begin_fade();
        } else {
            draw_zone.deactivate();
        }
    }
    if fade {
        world
            .entity_mut(zone)
            .insert(Timer::new(fade_duration, ZONE_FADED_SIGNAL));
        debug!("Zone {:?} fading out over {}s", zone, fade_duration);
    } else {
        debug!("Zone {:?} deactivated", zone);
    }
}

/// Bring every zone back to the active state, cancelling fades.
pub fn reactivate_zones(world: &mut World) {
    let mut query = world.query::<(Entity, &mut DrawZone)>();
    let mut fading = Vec::new();
    for (entity, mut zone) in query.iter_mut(world) {
        if zone.state == ZoneState::Fading {
            fading.push(entity);
        }
        zone.reactivate();
    }
    for entity in fading {
        world.entity_mut(entity).remove::<Timer>();
    }
}

/// Lower the alpha of fading zones along their timer.
pub fn zone_fade_system(mut query: Query<(&mut DrawZone, &Timer)>) {
    for (mut zone, timer) in query.iter_mut() {
        if zone.state == ZoneState::Fading {
            zone.alpha = 1.0 - timer.progress();
        }
    }
}

/// Finish a zone fade when its timer fires.
pub fn zone_timer_observer(
    trigger: On<TimerEvent>,
    mut zones: Query<&mut DrawZone>,
    mut commands: Commands,
) {
    let event = trigger.event();
    if event.signal != ZONE_FADED_SIGNAL {
        return;
    }
    if let Ok(mut zone) = zones.get_mut(event.entity) {
        zone.deactivate();
        debug!("Zone {:?} faded out", event.entity);
    }
    commands.entity(event.entity).try_remove::<Timer>();
}
