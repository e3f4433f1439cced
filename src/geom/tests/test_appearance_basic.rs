use std::sync::Arc;

use crate::appearance::{
    Appearance, Material, MaterialTargetDefinition, Texture, TextureTargetDefinition,
};
use crate::geom::Polygon;

fn material(id: &str, theme: &str, front: bool) -> MaterialTargetDefinition {
    MaterialTargetDefinition::new(
        "poly",
        Arc::new(Material::new(id).with_theme(theme).with_front(front)),
    )
}

fn texture(id: &str, theme: &str, front: bool) -> Arc<Texture> {
    Arc::new(
        Texture::new(id, format!("{id}.jpg"))
            .with_theme(theme)
            .with_front(front),
    )
}

#[test]
fn material_lookup_prefers_front_side() {
    let mut polygon = Polygon::new("poly", None);
    let target = polygon.appearance_target_mut();
    target.add_material_target_definition(material("back-only", "summer", false));
    target.add_material_target_definition(material("front", "winter", true));
    target.add_material_target_definition(material("back", "winter", false));

    assert_eq!(polygon.material_for_any_side("winter").map(Material::id), Some("front"));
    assert_eq!(polygon.material_for("winter", false).map(Material::id), Some("back"));
    assert_eq!(polygon.material_for_any_side("summer").map(Material::id), Some("back-only"));
    assert!(polygon.material_for("summer", true).is_none());
    assert!(polygon.material_for_any_side("autumn").is_none());
}

#[test]
fn texture_lookup_prefers_front_side() {
    let mut polygon = Polygon::new("poly", None);
    let target = polygon.appearance_target_mut();
    target.add_texture_target_definition(TextureTargetDefinition::new("poly", texture("back", "rgb", false)));
    target.add_texture_target_definition(TextureTargetDefinition::new("poly", texture("front", "rgb", true)));

    assert_eq!(polygon.texture_for_any_side("rgb").map(Texture::id), Some("front"));
    assert_eq!(polygon.texture_for("rgb", false).map(Texture::id), Some("back"));
    assert!(polygon.texture_for_any_side("ir").is_none());
}

#[test]
fn texture_for_theme_shares_the_appearance() {
    let shared = texture("shared", "rgb", true);
    let mut a = Polygon::new("a", None);
    let mut b = Polygon::new("b", None);
    a.appearance_target_mut()
        .add_texture_target_definition(TextureTargetDefinition::new("a", Arc::clone(&shared)));
    b.appearance_target_mut()
        .add_texture_target_definition(TextureTargetDefinition::new("b", Arc::clone(&shared)));

    let from_a = a.texture_for_theme("rgb", true).expect("texture on a");
    let from_b = b.texture_for_theme("rgb", true).expect("texture on b");
    assert!(Arc::ptr_eq(&from_a, &from_b));
    assert!(Arc::ptr_eq(&from_a, &shared));
    assert!(a.texture_for_theme("rgb", false).is_none());
}

#[test]
fn themes_are_listed_per_side() {
    let mut polygon = Polygon::new("poly", None);
    let target = polygon.appearance_target_mut();
    target.add_texture_target_definition(TextureTargetDefinition::new("poly", texture("t1", "rgb", true)));
    target.add_texture_target_definition(TextureTargetDefinition::new("poly", texture("t2", "ir", true)));
    target.add_material_target_definition(material("m1", "rgb", false));

    let target = polygon.appearance_target();
    assert_eq!(target.all_texture_themes(true), vec!["ir".to_string(), "rgb".to_string()]);
    assert!(target.all_texture_themes(false).is_empty());
    assert_eq!(target.all_material_themes(false), vec!["rgb".to_string()]);
}
