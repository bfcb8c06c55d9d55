//! Gameplay flows across whole ticks: trigger zones, pickups, expiry, and
//! death, with their effects visible both in drained events and in the
//! frames a client receives.

use outbreak_client::RemoteWorld;
use outbreak_server::{EntityManager, SnapshotMode};
use outbreak_shared::ext::{Expirable, Inventory, Positionable, Triggerable};
use outbreak_shared::{Entity, EntityTypeId, FieldValue, GameEvent, Vec2};

use outbreak_test::{game_state, item, registry, survivor, zombie, CELL_SIZE, STEP, SURVIVOR};

#[test]
fn trigger_zone_fires_on_survivor_entering_radius() {
    let mut manager = EntityManager::new(CELL_SIZE);
    let s = manager.queue_spawn(|id| survivor(id, Vec2::new(200.0, 0.0)));
    let mine = manager.queue_spawn(|id| {
        Entity::new(id, EntityTypeId::new(3))
            .with_ext(Box::new(Positionable::new(Vec2::ZERO, Vec2::new(8.0, 8.0))))
            .with_ext(Box::new(Triggerable::one_time(24.0, vec![SURVIVOR])))
    });

    manager.tick(STEP);
    assert!(manager.drain_triggers().is_empty());

    manager
        .entity_mut(s)
        .unwrap()
        .get_ext_mut::<Positionable>()
        .unwrap()
        .set_position(Vec2::new(10.0, 0.0));
    manager.tick(STEP);

    let fires = manager.drain_triggers();
    assert_eq!(fires.len(), 1);
    assert_eq!(fires[0].source, mine);
    assert_eq!(fires[0].target, s);

    // One-time zone is now disarmed; staying inside does not re-fire.
    manager.tick(STEP);
    assert!(manager.drain_triggers().is_empty());
}

#[test]
fn pickup_flows_through_to_the_client_mirror() {
    let registry = registry();
    let mut manager = EntityManager::new(CELL_SIZE);
    let s = manager.queue_spawn(|id| survivor(id, Vec2::new(10.0, 10.0)));
    let bandage = manager.queue_spawn(|id| item(id, Vec2::new(12.0, 10.0), "bandage", 2));
    manager.tick(STEP);

    let mut world = RemoteWorld::new(8);
    let mut full = manager.snapshot(SnapshotMode::Full);
    full.game_state = game_state(1, 1);
    let bytes = full.encode(&registry).unwrap();
    world.apply(&outbreak_shared::Frame::decode(&bytes, &registry).unwrap());
    manager.clear_dirty();
    assert_eq!(world.len(), 2);

    assert!(manager.pickup(s, bandage).unwrap());
    manager.tick(STEP);

    let mut delta = manager.snapshot(SnapshotMode::Delta);
    delta.game_state = game_state(1, 2);
    let bytes = delta.encode(&registry).unwrap();
    world.apply(&outbreak_shared::Frame::decode(&bytes, &registry).unwrap());

    assert!(world.entity(bandage).is_none());
    let slots = world.entity(s).unwrap().field(Inventory::SLOTS).unwrap();
    match slots {
        FieldValue::List(entries) => assert_eq!(entries.len(), 1),
        other => panic!("expected slot list, got {other:?}"),
    }

    let events = manager.drain_events();
    assert!(events
        .iter()
        .any(|e| matches!(e, GameEvent::Pickup { item_key, quantity: 2, .. } if item_key == "bandage")));

    // Events travel out of band; they must survive their own wire format.
    let wire = events[0].encode().unwrap();
    assert_eq!(GameEvent::decode(&wire).unwrap(), events[0]);
}

#[test]
fn expired_flare_is_removed_and_broadcast_as_removed() {
    let mut manager = EntityManager::new(CELL_SIZE);
    let flare = manager.queue_spawn(|id| {
        Entity::new(id, EntityTypeId::new(3))
            .with_ext(Box::new(Positionable::new(Vec2::ZERO, Vec2::new(4.0, 4.0))))
            .with_ext(Box::new(Expirable::new(STEP * 1.5)))
    });

    manager.tick(STEP);
    assert!(manager.entity(flare).is_some());
    manager.tick(STEP);
    assert!(manager.entity(flare).is_none());

    let frame = manager.snapshot(SnapshotMode::Delta);
    assert_eq!(frame.removed, vec![flare]);
}

#[test]
fn zombie_death_emits_event_with_position() {
    let mut manager = EntityManager::new(CELL_SIZE);
    let z = manager.queue_spawn(|id| zombie(id, Vec2::new(40.0, 50.0)));
    manager.tick(STEP);
    manager.drain_events();

    manager.apply_damage(z, 60);
    manager.tick(STEP);

    let events = manager.drain_events();
    assert!(matches!(
        events.as_slice(),
        [GameEvent::Death { entity, position }] if *entity == z && *position == Vec2::new(40.0, 50.0)
    ));
    assert!(manager.entity(z).is_none());
}
