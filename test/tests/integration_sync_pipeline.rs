//! Server tick through the wire to a client mirror: snapshot, encode,
//! compress, decode, apply. Covers full frames, delta patches, delta-merge
//! equivalence, and removal propagation.

use outbreak_client::RemoteWorld;
use outbreak_server::{EntityManager, SnapshotSender};
use outbreak_shared::ext::{Destructible, Positionable};
use outbreak_shared::{FieldValue, Frame, FrameDecoder, Vec2};

use outbreak_test::{
    game_state, item, registry, survivor, zombie, CapturingTransport, ALIVE_COUNT, CELL_SIZE, STEP,
};

struct Harness {
    manager: EntityManager,
    sender: SnapshotSender,
    transport: CapturingTransport,
    decoder: FrameDecoder,
    registry: outbreak_shared::SchemaRegistry,
}

impl Harness {
    fn new(keyframe_interval: u32) -> Self {
        Self {
            manager: EntityManager::new(CELL_SIZE),
            sender: SnapshotSender::new(keyframe_interval, 0).unwrap(),
            transport: CapturingTransport::default(),
            decoder: FrameDecoder::try_new().unwrap(),
            registry: registry(),
        }
    }

    /// One server tick plus broadcast; returns the frame as the client
    /// decodes it.
    fn tick_and_receive(&mut self, alive: u16) -> Frame {
        self.manager.tick(STEP);
        let elapsed = u32::from(self.manager.tick_number());
        self.sender
            .send_tick(
                &mut self.manager,
                game_state(alive, elapsed),
                &self.registry,
                &mut self.transport,
            )
            .unwrap();
        let bytes = self.decoder.try_decode(self.transport.last()).unwrap();
        Frame::decode(bytes, &self.registry).unwrap()
    }
}

#[test]
fn keyframe_reconstructs_the_whole_world() {
    let mut harness = Harness::new(10);
    let s = harness
        .manager
        .queue_spawn(|id| survivor(id, Vec2::new(10.0, 10.0)));
    let z = harness
        .manager
        .queue_spawn(|id| zombie(id, Vec2::new(300.0, 300.0)));
    harness
        .manager
        .queue_spawn(|id| item(id, Vec2::new(50.0, 50.0), "bandage", 3));

    let frame = harness.tick_and_receive(1);
    let mut world = RemoteWorld::new(8);
    assert!(world.apply(&frame));

    assert_eq!(world.len(), 3);
    assert_eq!(
        world.game_state().get(ALIVE_COUNT),
        Some(&FieldValue::U16(1))
    );
    let remote_survivor = world.entity(s).unwrap();
    assert_eq!(remote_survivor.position().unwrap(), Vec2::new(10.0, 10.0));
    assert_eq!(
        remote_survivor.field(Destructible::HEALTH),
        Some(&FieldValue::U16(100))
    );
    assert_eq!(
        world.entity(z).unwrap().field(Destructible::HEALTH),
        Some(&FieldValue::U16(60))
    );
}

#[test]
fn delta_patch_touches_only_changed_fields() {
    let mut harness = Harness::new(100);
    let s = harness
        .manager
        .queue_spawn(|id| survivor(id, Vec2::new(10.0, 10.0)));

    let mut world = RemoteWorld::new(8);
    world.apply(&harness.tick_and_receive(1));

    harness.manager.apply_damage(s, 35);
    let delta = harness.tick_and_receive(1);
    assert_eq!(delta.entities.len(), 1);
    assert!(!delta.entities[0].full);
    assert!(world.apply(&delta));

    let entity = world.entity(s).unwrap();
    assert_eq!(
        entity.field(Destructible::HEALTH),
        Some(&FieldValue::U16(65))
    );
    // Untouched fields survive the patch.
    assert_eq!(entity.position().unwrap(), Vec2::new(10.0, 10.0));
}

#[test]
fn merged_deltas_equal_the_authoritative_full_state() {
    let mut harness = Harness::new(100);
    let s = harness
        .manager
        .queue_spawn(|id| survivor(id, Vec2::new(10.0, 10.0)));

    // Client A follows the delta stream from the start.
    let mut stream_world = RemoteWorld::new(8);
    stream_world.apply(&harness.tick_and_receive(1));

    for damage in [10, 20, 5] {
        harness.manager.apply_damage(s, damage);
        harness
            .manager
            .entity_mut(s)
            .unwrap()
            .get_ext_mut::<Positionable>()
            .unwrap()
            .set_position(Vec2::new(10.0 + f32::from(damage), 10.0));
        stream_world.apply(&harness.tick_and_receive(1));
    }

    // Client B joins late off a fresh full frame.
    let full = outbreak_server::full_frame(&harness.manager, game_state(1, 0));
    let mut late_world = RemoteWorld::new(8);
    assert!(late_world.apply(&full));

    let streamed = stream_world.entity(s).unwrap();
    let joined = late_world.entity(s).unwrap();
    assert_eq!(streamed.fields(), joined.fields());
}

#[test]
fn double_removal_reaches_the_client_once() {
    let mut harness = Harness::new(100);
    let s = harness
        .manager
        .queue_spawn(|id| survivor(id, Vec2::new(10.0, 10.0)));
    let z = harness
        .manager
        .queue_spawn(|id| zombie(id, Vec2::new(300.0, 300.0)));

    let mut world = RemoteWorld::new(8);
    world.apply(&harness.tick_and_receive(2));
    assert_eq!(world.len(), 2);

    harness.manager.mark_for_removal(z, 0);
    harness.manager.mark_for_removal(z, 0);
    let frame = harness.tick_and_receive(1);
    assert_eq!(frame.removed, vec![z]);

    assert!(world.apply(&frame));
    assert_eq!(world.len(), 1);
    assert!(world.entity(s).is_some());
    assert!(world.entity(z).is_none());
}

#[test]
fn out_of_order_frames_do_not_regress_the_mirror() {
    let mut harness = Harness::new(100);
    let s = harness
        .manager
        .queue_spawn(|id| survivor(id, Vec2::new(10.0, 10.0)));

    let mut world = RemoteWorld::new(8);
    let first = harness.tick_and_receive(1);

    harness.manager.apply_damage(s, 40);
    let second = harness.tick_and_receive(1);

    world.apply(&first);
    world.apply(&second);
    // The late duplicate of the first frame must be discarded.
    assert!(!world.apply(&first));
    assert_eq!(
        world.entity(s).unwrap().field(Destructible::HEALTH),
        Some(&FieldValue::U16(60))
    );
}

#[test]
fn moving_entity_interpolates_between_frames() {
    let mut harness = Harness::new(100);
    let z = harness
        .manager
        .queue_spawn(|id| zombie(id, Vec2::new(0.0, 0.0)));

    let mut world = RemoteWorld::new(8);
    world.apply(&harness.tick_and_receive(1));

    harness
        .manager
        .entity_mut(z)
        .unwrap()
        .get_ext_mut::<Positionable>()
        .unwrap()
        .set_position(Vec2::new(20.0, 0.0));
    world.apply(&harness.tick_and_receive(1));

    let latest = world.clock();
    let mid = world
        .render_position(z, latest as f64 - 0.5)
        .unwrap();
    assert!((mid.x - 10.0).abs() < 1e-3, "mid.x = {}", mid.x);
}
