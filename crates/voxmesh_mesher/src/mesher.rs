//! The extractor interface.

use voxmesh_field::ScalarField;

use crate::lattice::Lattice;
use crate::mesh::Mesh;

/// Turns a field sampled on a lattice into a triangle mesh.
///
/// Implementations are plain values; one call owns all of its buffers and
/// nothing is kept between calls.
pub trait Mesher {
    /// Extracts the surface of `field` over `lattice`.
    fn generate<F: ScalarField + ?Sized>(&self, field: &F, lattice: &Lattice) -> Mesh;
}

impl<M: Mesher + ?Sized> Mesher for &M {
    #[inline]
    fn generate<F: ScalarField + ?Sized>(&self, field: &F, lattice: &Lattice) -> Mesh {
        (**self).generate(field, lattice)
    }
}
