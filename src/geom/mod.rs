mod core;
mod diagnostics;
mod error;
mod mesh;
mod polygon;
mod ring;
mod tesselator;

pub use core::{Point3, TexCoord, Tolerance, Vec3};
pub use diagnostics::PolygonDiagnostics;
pub use error::{GeomError, GeomResult, TesselatorError};
pub use mesh::{BuildContext, BuildOptions, PolygonMesh};
pub use polygon::{Polygon, finish_all};
pub use ring::LinearRing;
pub use tesselator::{EarClipTesselator, TesselationDiagnostics, Tesselator};

#[cfg(test)]
mod tests;
