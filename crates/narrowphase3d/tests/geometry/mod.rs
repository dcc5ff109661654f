mod convex_cast;
mod gjk_epa;
mod gjk_pair_detector;
mod penetration_depth;
mod persistent_manifold;
mod trimesh_cast;
mod voronoi_simplex;
