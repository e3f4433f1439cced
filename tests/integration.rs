use std::sync::Arc;

use citygml_polygon::appearance::{
    Material, MaterialTargetDefinition, Texture, TextureCoordinates, TextureTargetDefinition,
};
use citygml_polygon::geom::{
    BuildContext, BuildOptions, EarClipTesselator, GeomError, LinearRing, Point3, Polygon, TexCoord,
    finish_all,
};
use citygml_polygon::logger::{CityGmlLogger, LogLevel, RecordingLogger};

fn ring(id: &str, is_exterior: bool, points: &[[f64; 3]]) -> LinearRing {
    LinearRing::with_vertices(
        id,
        is_exterior,
        points.iter().copied().map(Point3::from_array).collect(),
    )
}

fn unit_square(id: &str) -> LinearRing {
    ring(
        id,
        true,
        &[[0.0, 0.0, 0.0], [1.0, 0.0, 0.0], [1.0, 1.0, 0.0], [0.0, 1.0, 0.0]],
    )
}

#[test]
fn unit_square_without_tesselation() {
    let mut polygon = Polygon::new("square", None);
    polygon.add_ring(unit_square("square-outer")).expect("add exterior");
    polygon
        .finish(false, &mut EarClipTesselator::new(), true, None)
        .expect("finish");

    assert_eq!(polygon.vertices().len(), 4);
    assert_eq!(polygon.indices().len(), 6);
    assert_eq!(polygon.indices().len() % 3, 0);
}

#[test]
fn square_with_hole_through_tesselation() {
    let recorder = Arc::new(RecordingLogger::new());
    let logger: Arc<dyn CityGmlLogger> = recorder.clone();

    let mut polygon = Polygon::new("courtyard", Some(Arc::clone(&logger)));
    polygon
        .add_ring(ring(
            "outer",
            true,
            &[[0.0, 0.0, 5.0], [10.0, 0.0, 5.0], [10.0, 10.0, 5.0], [0.0, 10.0, 5.0]],
        ))
        .unwrap();
    polygon
        .add_ring(ring(
            "inner",
            false,
            &[[4.0, 4.0, 5.0], [6.0, 4.0, 5.0], [6.0, 6.0, 5.0], [4.0, 6.0, 5.0]],
        ))
        .unwrap();

    let mut ctx = BuildContext::new().with_logger(logger);
    polygon.finish_with_context(&mut ctx).expect("tesselate");

    let tess_vertices = polygon.diagnostics().vertex_count;
    assert_eq!(polygon.vertices().len(), tess_vertices);
    assert!(!polygon.indices().is_empty());
    assert_eq!(polygon.indices().len() % 3, 0);
    assert!(polygon.indices().iter().all(|&i| (i as usize) < polygon.vertices().len()));

    // Vertex count drift is logged as an error; the ear clipper keeps the input buffer.
    let drift = polygon.diagnostics().has_vertex_count_drift();
    assert_eq!(recorder.count(LogLevel::Error), usize::from(drift));

    let mesh = polygon.to_mesh(None, true);
    mesh.validate().expect("valid mesh");
    assert_eq!(mesh.normals.as_ref().map(|n| n[0]), Some([0.0, 0.0, 1.0]));
}

#[test]
fn shared_polygon_is_finished_once() {
    let recorder = Arc::new(RecordingLogger::new());
    let logger: Arc<dyn CityGmlLogger> = recorder.clone();

    let mut polygon = Polygon::new("line", None);
    polygon
        .add_ring(ring("outer", true, &[[0.0, 0.0, 0.0], [1.0, 1.0, 1.0]]))
        .unwrap();

    let mut ctx = BuildContext::with_options(BuildOptions {
        tesselate: false,
        optimize: true,
    })
    .with_logger(logger);

    // Two parent geometries referencing the same polygon both finish it.
    polygon.finish_with_context(&mut ctx).unwrap();
    polygon.finish_with_context(&mut ctx).unwrap();

    assert_eq!(recorder.count(LogLevel::Warning), 1);
    assert!(polygon.diagnostics().degenerate);
    assert!(matches!(
        polygon.add_ring(unit_square("late")),
        Err(GeomError::InvalidState { .. })
    ));
}

#[test]
fn textured_wall_round_trip() {
    let facade = Arc::new(Texture::new("facade", "facade.jpg").with_theme("rgbTexture"));
    let paint = Arc::new(
        Material::new("paint")
            .with_theme("rgbTexture")
            .with_front(false)
            .with_diffuse([0.9, 0.1, 0.1]),
    );

    let mut polygons = Vec::new();
    for id in ["wall-1", "wall-2"] {
        let ring_id = format!("{id}-outer");
        let mut polygon = Polygon::new(id, None);
        polygon
            .add_ring(ring(
                &ring_id,
                true,
                &[
                    [0.0, 0.0, 0.0],
                    [4.0, 0.0, 0.0],
                    [4.0, 0.0, 3.0],
                    [0.0, 0.0, 3.0],
                    [0.0, 0.0, 0.0],
                ],
            ))
            .unwrap();
        let coords = vec![
            TexCoord::new(0.0, 0.0),
            TexCoord::new(1.0, 0.0),
            TexCoord::new(1.0, 1.0),
            TexCoord::new(0.0, 1.0),
            TexCoord::new(0.0, 0.0),
        ];
        let target = polygon.appearance_target_mut();
        target.add_texture_target_definition(
            TextureTargetDefinition::new(id, Arc::clone(&facade))
                .with_coordinates(TextureCoordinates::new(format!("{id}-uv"), ring_id, coords)),
        );
        target.add_material_target_definition(MaterialTargetDefinition::new(id, Arc::clone(&paint)));
        polygons.push(polygon);
    }

    let mut ctx = BuildContext::new();
    let failures = finish_all(&mut polygons, &mut ctx);
    assert!(failures.is_empty(), "{failures:?}");

    for polygon in &polygons {
        assert_eq!(polygon.vertices().len(), 4);
        assert_eq!(polygon.indices().len(), 6);

        let uvs = polygon.tex_coords_for_theme("rgbTexture", true);
        assert_eq!(uvs.len(), polygon.vertices().len());
        assert_eq!(uvs[3], TexCoord::new(0.0, 1.0));

        assert!(polygon.material_for("rgbTexture", true).is_none());
        let material = polygon.material_for_any_side("rgbTexture").expect("back material");
        assert!((material.diffuse[0] - 0.9).abs() < f64::EPSILON);

        let texture = polygon.texture_for_theme("rgbTexture", true).expect("texture");
        assert!(Arc::ptr_eq(&texture, &facade));
    }
}
