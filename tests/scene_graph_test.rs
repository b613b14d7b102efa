use hanoi_ngin::{
    Deg, Matrix4, NodeKind, Scene, SquareMatrix, Vector3,
    data_structures::{light::Light, material::Material, mesh::Mesh},
    object::Object,
};

use crate::common::test_utils::{assert_matrix_eq, assert_vector_eq, translation, world_position};

mod common;

#[test]
fn object_ids_are_unique_and_increasing() {
    let a = Object::new("a");
    let b = Object::new("b");
    assert!(b.id() > a.id());
    assert!(a.id().value() >= 1);

    let mut c = Object::new("c");
    c.set_name("renamed");
    assert_eq!(c.name(), "renamed");
}

#[test]
fn root_world_matrix_is_its_local_matrix() {
    let mut scene = Scene::new();
    let local = translation(1.0, 2.0, 3.0) * Matrix4::from_angle_z(Deg(30.0));
    let root = scene.create_node("root", local);
    assert_matrix_eq(scene.world_matrix(root).unwrap(), local);
}

#[test]
fn world_matrix_inherits_only_parent_translation() {
    let mut scene = Scene::new();
    let parent = scene.create_node(
        "parent",
        translation(1.0, 2.0, 3.0) * Matrix4::from_angle_y(Deg(90.0)) * Matrix4::from_scale(2.0),
    );
    let child = scene.create_node("child", translation(1.0, 0.0, 0.0));
    assert!(scene.add_child(parent, child));

    assert_matrix_eq(scene.world_matrix(child).unwrap(), translation(2.0, 2.0, 3.0));

    let grandchild = scene.create_node("grandchild", translation(0.0, 1.0, 0.0));
    assert!(scene.add_child(child, grandchild));
    assert_vector_eq(world_position(&scene, grandchild), Vector3::new(2.0, 3.0, 3.0));
}

#[test]
fn add_child_moves_the_node_between_parents() {
    let mut scene = Scene::new();
    let a = scene.create_node("a", Matrix4::identity());
    let b = scene.create_node("b", Matrix4::identity());
    let child = scene.create_node("child", Matrix4::identity());

    assert!(scene.add_child(a, child));
    assert!(scene.add_child(b, child));
    assert_eq!(scene.child_count(a), 0);
    assert_eq!(scene.children(b), &[child]);
    assert_eq!(scene.parent(child), Some(b));
}

#[test]
fn add_child_refuses_duplicates_and_cycles() {
    let mut scene = Scene::new();
    let a = scene.create_node("a", Matrix4::identity());
    let b = scene.create_node("b", Matrix4::identity());
    assert!(scene.add_child(a, b));

    assert!(!scene.add_child(a, b));
    assert!(!scene.add_child(b, a));
    assert!(!scene.add_child(a, a));
    assert_eq!(scene.child_count(a), 1);
    assert_eq!(scene.parent(a), None);
}

#[test]
fn remove_child_detaches_by_index_and_by_id() {
    let mut scene = Scene::new();
    let root = scene.create_node("root", Matrix4::identity());
    let first = scene.create_node("first", Matrix4::identity());
    let second = scene.create_node("second", Matrix4::identity());
    scene.add_child(root, first);
    scene.add_child(root, second);

    assert!(!scene.remove_child_at(root, 5));
    assert!(scene.remove_child_at(root, 0));
    assert_eq!(scene.parent(first), None);
    assert_eq!(scene.child(root, 0), Some(second));

    assert!(!scene.remove_child(root, first));
    assert!(scene.remove_child(root, second));
    assert!(scene.children(root).is_empty());
}

#[test]
fn find_child_prefers_direct_children() {
    let mut scene = Scene::new();
    let root = scene.create_node("root", Matrix4::identity());
    let branch = scene.create_node("branch", Matrix4::identity());
    let deep = scene.create_node("target", Matrix4::identity());
    let direct = scene.create_node("target", Matrix4::identity());
    scene.add_child(root, branch);
    scene.add_child(branch, deep);
    scene.add_child(root, direct);

    assert_eq!(scene.find_child(root, "target"), Some(direct));
    assert_eq!(scene.find_child(branch, "target"), Some(deep));
    assert_eq!(scene.find_child(root, "missing"), None);
}

#[test]
fn destroy_removes_the_subtree_and_releases_light_slots() {
    let mut scene = Scene::new();
    let root = scene.create_node("root", Matrix4::identity());
    let group = scene.create_node("group", Matrix4::identity());
    let lamp = scene.create_light("lamp", Matrix4::identity(), Light::omni());
    let other = scene.create_light("other", Matrix4::identity(), Light::omni());
    scene.add_child(root, group);
    scene.add_child(group, lamp);
    scene.add_child(root, other);
    assert_eq!(scene.light_slots().in_use(), 2);

    assert!(scene.destroy(group));
    assert!(!scene.contains(group));
    assert!(!scene.contains(lamp));
    assert_eq!(scene.children(root), &[other]);
    assert_eq!(scene.light_slots().in_use(), 1);
    assert!(!scene.destroy(group));
}

#[test]
fn nodes_carry_their_payload() {
    let mut scene = Scene::new();
    let material = scene.add_material(Material::new("paint"));
    let mut mesh = Mesh::cuboid(1.0, 1.0, 1.0);
    mesh.material = Some(material);
    let faces = mesh.face_count();
    let cube = scene.create_mesh("cube", Matrix4::identity(), mesh);

    let node = scene.get(cube).unwrap();
    assert_eq!(node.as_mesh().map(|m| m.face_count()), Some(faces));
    assert!(node.as_light().is_none());
    assert!(matches!(node.kind, NodeKind::Mesh(_)));
    assert_eq!(scene.mesh_material(cube), Some(material));
    assert_eq!(scene.find_material("paint"), Some(material));

    assert!(scene.set_name(cube, "box"));
    assert_eq!(scene.name(cube), Some("box"));
}

#[test]
fn primitive_meshes_are_closed_triangle_lists() {
    let cuboid = Mesh::cuboid(2.0, 1.0, 1.0);
    assert_eq!(cuboid.face_count(), 12);
    assert_eq!(cuboid.indices.len() % 3, 0);

    let cylinder = Mesh::cylinder(1.0, 2.0, 8);
    assert_eq!(cylinder.face_count() % 8, 0);
    assert!(
        cylinder
            .indices
            .iter()
            .all(|&i| (i as usize) < cylinder.vertices.len())
    );
}

#[test]
fn child_world_adds_parent_translation() {
    let mut scene = Scene::new();
    let parent = scene.create_node("parent", translation(10.0, 0.0, 0.0));
    let child = scene.create_node("child", translation(5.0, 0.0, 0.0));
    scene.add_child(parent, child);
    assert_vector_eq(world_position(&scene, child), Vector3::new(15.0, 0.0, 0.0));
}

#[test]
fn destroying_a_parent_spares_nodes_removed_earlier() {
    let mut scene = Scene::new();
    let parent = scene.create_node("parent", Matrix4::identity());
    let kept = scene.create_node("kept", Matrix4::identity());
    let doomed = scene.create_node("doomed", Matrix4::identity());
    let grandchild = scene.create_node("grandchild", Matrix4::identity());
    scene.add_child(parent, kept);
    scene.add_child(parent, doomed);
    scene.add_child(doomed, grandchild);

    assert!(scene.remove_child(parent, kept));
    assert!(scene.destroy(parent));
    assert!(scene.contains(kept));
    assert!(!scene.contains(doomed));
    assert!(!scene.contains(grandchild));
    assert_eq!(scene.len(), 1);
}
