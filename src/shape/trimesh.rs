use crate::bounding_volume::Aabb;
use crate::math::{Point, Real};
use crate::shape::Triangle;

/// Indicated an inconsistency while building a triangle mesh.
#[derive(thiserror::Error, Copy, Clone, Debug, PartialEq, Eq)]
pub enum TriMeshError {
    /// A triangle mesh must contain at least one triangle.
    #[error("A triangle mesh must contain at least one triangle.")]
    EmptyIndices,
    /// A triangle mesh must contain at least three vertices.
    #[error("A triangle mesh must contain at least three vertices.")]
    TooFewVertices,
    /// A triangle references a vertex that does not exist.
    #[error("the triangle {triangle} references the vertex {index} but the mesh only has {num_vertices} vertices.")]
    IndexOutOfBounds {
        /// The offending triangle.
        triangle: u32,
        /// The out-of-bounds vertex index.
        index: u32,
        /// The number of vertices of the mesh.
        num_vertices: u32,
    },
}

/// Visitor of the triangles of a mesh.
pub trait TriangleCallback {
    /// Called once for every visited triangle, given in the mesh local space.
    fn process_triangle(&mut self, triangle: &[Point<Real>; 3], part_id: i32, triangle_index: i32);
}

impl<F> TriangleCallback for F
where
    F: FnMut(&[Point<Real>; 3], i32, i32),
{
    fn process_triangle(&mut self, triangle: &[Point<Real>; 3], part_id: i32, triangle_index: i32) {
        self(triangle, part_id, triangle_index)
    }
}

/// A triangle mesh made of a single part.
#[cfg_attr(feature = "serde-serialize", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct TriMesh {
    vertices: Vec<Point<Real>>,
    indices: Vec<[u32; 3]>,
    aabb: Aabb,
}

impl TriMesh {
    /// Creates a new triangle mesh from a vertex buffer and an index buffer.
    pub fn try_new(vertices: Vec<Point<Real>>, indices: Vec<[u32; 3]>) -> Result<Self, TriMeshError> {
        if indices.is_empty() {
            return Err(TriMeshError::EmptyIndices);
        }

        if vertices.len() < 3 {
            return Err(TriMeshError::TooFewVertices);
        }

        let num_vertices = vertices.len() as u32;

        for (triangle, idx) in indices.iter().enumerate() {
            if let Some(index) = idx.iter().find(|i| **i >= num_vertices) {
                return Err(TriMeshError::IndexOutOfBounds {
                    triangle: triangle as u32,
                    index: *index,
                    num_vertices,
                });
            }
        }

        let aabb = Aabb::from_points(indices.iter().flatten().map(|i| vertices[*i as usize]));

        Ok(TriMesh {
            vertices,
            indices,
            aabb,
        })
    }

    /// The vertex buffer of this mesh.
    #[inline]
    pub fn vertices(&self) -> &[Point<Real>] {
        &self.vertices
    }

    /// The index buffer of this mesh.
    #[inline]
    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    /// The number of triangles of this mesh.
    #[inline]
    pub fn num_triangles(&self) -> usize {
        self.indices.len()
    }

    /// The local-space AABB of this mesh.
    #[inline]
    pub fn local_aabb(&self) -> &Aabb {
        &self.aabb
    }

    /// The vertices of the `i`-th triangle of this mesh.
    #[inline]
    pub fn triangle_vertices(&self, i: usize) -> [Point<Real>; 3] {
        let idx = self.indices[i];
        [
            self.vertices[idx[0] as usize],
            self.vertices[idx[1] as usize],
            self.vertices[idx[2] as usize],
        ]
    }

    /// The `i`-th triangle of this mesh.
    #[inline]
    pub fn triangle(&self, i: usize) -> Triangle {
        self.triangle_vertices(i).into()
    }

    /// An iterator through all the triangles of this mesh.
    pub fn triangles(&self) -> impl ExactSizeIterator<Item = Triangle> + '_ {
        (0..self.indices.len()).map(move |i| self.triangle(i))
    }

    /// Calls `callback` on every triangle whose AABB intersects `aabb`.
    ///
    /// `aabb` is expressed in the local space of this mesh.
    pub fn process_all_triangles(&self, callback: &mut dyn TriangleCallback, aabb: &Aabb) {
        if !self.aabb.intersects(aabb) {
            return;
        }

        for i in 0..self.indices.len() {
            let tri = self.triangle_vertices(i);

            if Aabb::from_points(tri).intersects(aabb) {
                callback.process_triangle(&tri, 0, i as i32);
            }
        }
    }
}
