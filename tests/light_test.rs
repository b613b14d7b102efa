use hanoi_ngin::{
    Matrix4, Scene, SquareMatrix, Vector3, Vector4,
    data_structures::light::{Light, LightKind, LightSlots, MAX_LIGHTS, OMNI_CUTOFF},
};

mod common;

#[test]
fn light_slots_are_capped_and_reused() {
    let mut scene = Scene::with_light_capacity(2);
    let a = scene.create_light("a", Matrix4::identity(), Light::omni());
    let b = scene.create_light("b", Matrix4::identity(), Light::omni());
    let dark = scene.create_light("dark", Matrix4::identity(), Light::omni());

    let slot = |scene: &Scene, id| scene.get(id).and_then(|n| n.as_light()).and_then(|l| l.slot());
    assert_eq!(slot(&scene, a).map(|s| s.index()), Some(0));
    assert_eq!(slot(&scene, b).map(|s| s.index()), Some(1));
    assert_eq!(slot(&scene, dark), None);

    assert!(scene.destroy(a));
    let again = scene.create_light("again", Matrix4::identity(), Light::omni());
    assert_eq!(slot(&scene, again).map(|s| s.index()), Some(0));
    assert_eq!(scene.light_slots().in_use(), 2);
}

#[test]
fn default_allocator_has_the_fixed_function_limit() {
    let mut slots = LightSlots::default();
    assert_eq!(slots.capacity(), MAX_LIGHTS);
    let taken: Vec<_> = (0..MAX_LIGHTS).filter_map(|_| slots.acquire()).collect();
    assert_eq!(taken.len(), MAX_LIGHTS);
    assert_eq!(slots.acquire(), None);

    slots.release(taken[3]);
    assert_eq!(slots.acquire(), Some(taken[3]));
}

#[test]
fn spot_cutoff_outside_the_valid_range_falls_back_to_zero() {
    let mut spot = Light::spot(120.0);
    assert_eq!(spot.cutoff(), 0.0);
    spot.set_cutoff(45.0);
    assert_eq!(spot.kind(), LightKind::Spot { cutoff: 45.0 });
    spot.set_cutoff(-3.0);
    assert_eq!(spot.cutoff(), 0.0);

    let mut omni = Light::omni();
    omni.set_cutoff(30.0);
    assert_eq!(omni.cutoff(), OMNI_CUTOFF);
}

#[test]
fn light_geometry_depends_on_the_kind() {
    assert_eq!(Light::omni().position(), Vector4::new(0.0, 0.0, 0.0, 1.0));
    assert_eq!(Light::infinite().position().w, 0.0);
    assert_eq!(Light::spot(30.0).direction(), Some(Vector3::new(0.0, -1.0, 0.0)));
    assert_eq!(Light::omni().direction(), None);
}
