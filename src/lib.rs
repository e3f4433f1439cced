#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! Planar CityGML polygons turned into triangle meshes.
//!
//! A [`geom::Polygon`] collects an exterior ring and its holes, and
//! [`geom::Polygon::finish`] produces a flat vertex buffer with triangle
//! indices, either by a plain fan or through a [`geom::Tesselator`]. Texture
//! and material bindings live on the polygon's
//! [`appearance::AppearanceTarget`] and are resolved per theme and side.
//!
//! ```
//! use citygml_polygon::geom::{EarClipTesselator, LinearRing, Point3, Polygon};
//!
//! let mut polygon = Polygon::new("roof", None);
//! polygon
//!     .add_ring(LinearRing::with_vertices(
//!         "roof-outer",
//!         true,
//!         vec![
//!             Point3::new(0.0, 0.0, 0.0),
//!             Point3::new(1.0, 0.0, 0.0),
//!             Point3::new(1.0, 1.0, 0.0),
//!             Point3::new(0.0, 1.0, 0.0),
//!         ],
//!     ))
//!     .unwrap();
//! polygon.finish(true, &mut EarClipTesselator::new(), true, None).unwrap();
//! assert_eq!(polygon.indices().len(), 6);
//! ```

pub mod appearance;
pub mod geom;
pub mod logger;

pub use appearance::{Material, Texture};
pub use geom::{BuildContext, BuildOptions, GeomError, LinearRing, Polygon, PolygonMesh};
pub use logger::{CityGmlLogger, LogLevel};
