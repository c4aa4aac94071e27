use std::collections::{HashMap, HashSet, VecDeque};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use spade::handles::FixedFaceHandle;
use spade::{
    ConstrainedDelaunayTriangulation, InsertionError, Point2 as SpadePoint2, Triangulation,
};
use tracing::{debug, info};

use crate::error::{MeshError, PinError, Result};
use crate::math::polygon_2d::{
    point_in_polygon, point_to_polygon_dist, segments_cross, signed_area_2d,
};
use crate::math::{Point2, TOLERANCE};
use crate::topology::{SurfaceId, TopologyStore};

use super::compound::{merge_boundaries, resolve_compound};
use super::model::MeshModel;
use super::msh::write_msh2;
use super::{LineElement, Mesh2D, MeshingService, SessionState, TriangleElement};

/// Refuses to seed more interior points than this.
const MAX_SEEDS: f64 = 4.0e6;

type Cdt = ConstrainedDelaunayTriangulation<SpadePoint2<f64>>;

/// In-process mesher built on a constrained Delaunay triangulation.
///
/// Curves are split at their sample points; every meshing target (a
/// compound group or a lone surface) is triangulated with its boundary as
/// constraints and a staggered grid of interior points at the smallest
/// vertex size hint.
#[derive(Debug, Default)]
pub struct CdtMesher {
    state: SessionState,
    model: Option<MeshModel>,
    compounds: Vec<Vec<u32>>,
    mesh: Option<Mesh2D>,
}

impl CdtMesher {
    /// Creates an idle mesher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The generated mesh, once [`generate`](MeshingService::generate) has run.
    #[must_use]
    pub fn mesh(&self) -> Option<&Mesh2D> {
        self.mesh.as_ref()
    }

    /// The captured model, once entities have been built.
    #[must_use]
    pub fn model(&self) -> Option<&MeshModel> {
        self.model.as_ref()
    }

    fn loaded_model(&self) -> Result<&MeshModel> {
        self.model.as_ref().ok_or_else(|| {
            MeshError::InvalidState {
                state: "initialized",
                action: "use the model",
            }
            .into()
        })
    }
}

impl MeshingService for CdtMesher {
    fn initialize(&mut self) -> Result<()> {
        self.state.require(&[SessionState::Idle], "initialize")?;
        self.model = None;
        self.compounds.clear();
        self.mesh = None;
        self.state = SessionState::Initialized;
        Ok(())
    }

    fn build_entities(&mut self, store: &TopologyStore) -> Result<()> {
        self.state
            .require(&[SessionState::Initialized], "build entities")?;
        self.model = Some(MeshModel::from_store(store)?);
        self.state = SessionState::Built;
        Ok(())
    }

    fn set_compound(&mut self, surfaces: &[SurfaceId]) -> Result<()> {
        self.state.require(&[SessionState::Built], "set a compound")?;
        let tags = resolve_compound(self.loaded_model()?, &self.compounds, surfaces)?;
        self.compounds.push(tags);
        Ok(())
    }

    fn generate(&mut self, dim: u8) -> Result<()> {
        self.state
            .require(&[SessionState::Built, SessionState::Meshed], "generate")?;
        if !(1..=2).contains(&dim) {
            return Err(MeshError::UnsupportedDimension(dim).into());
        }
        let model = self.loaded_model()?;
        let mesh = mesh_model(model, &self.compounds, dim)?;
        info!(
            nodes = mesh.nodes.len(),
            lines = mesh.lines.len(),
            triangles = mesh.triangles.len(),
            "generated {dim}-D mesh"
        );
        self.mesh = Some(mesh);
        self.state = SessionState::Meshed;
        Ok(())
    }

    fn write(&mut self, path: &Path) -> Result<()> {
        self.state.require(&[SessionState::Meshed], "write")?;
        let model = self.loaded_model()?;
        let Some(mesh) = self.mesh.as_ref() else {
            return Err(MeshError::InvalidState {
                state: "built",
                action: "write",
            }
            .into());
        };
        let file = File::create(path).map_err(|e| PinError::io(path, e))?;
        let mut out = BufWriter::new(file);
        write_msh2(&mut out, model, mesh).map_err(|e| PinError::io(path, e))?;
        out.flush().map_err(|e| PinError::io(path, e))?;
        info!(path = %path.display(), "wrote mesh");
        Ok(())
    }

    fn finalize(&mut self) {
        self.model = None;
        self.compounds.clear();
        self.mesh = None;
        self.state = SessionState::Idle;
    }
}

/// Deduplicates nodes by exact coordinates.
#[derive(Default)]
struct NodeTable {
    index: HashMap<(u64, u64), usize>,
}

impl NodeTable {
    fn node(&mut self, p: Point2, nodes: &mut Vec<Point2>) -> usize {
        // `+ 0.0` folds -0.0 into 0.0.
        let key = ((p.x + 0.0).to_bits(), (p.y + 0.0).to_bits());
        *self.index.entry(key).or_insert_with(|| {
            nodes.push(p);
            nodes.len() - 1
        })
    }
}

fn mesh_model(model: &MeshModel, compounds: &[Vec<u32>], dim: u8) -> Result<Mesh2D> {
    let mut mesh = Mesh2D::default();
    let mut table = NodeTable::default();

    for curve in &model.curves {
        let ids: Vec<usize> = curve
            .samples
            .iter()
            .map(|&p| table.node(p, &mut mesh.nodes))
            .collect();
        for w in ids.windows(2) {
            if w[0] != w[1] {
                mesh.lines.push(LineElement {
                    nodes: [w[0], w[1]],
                    curve: curve.tag,
                });
            }
        }
    }

    if dim < 2 {
        return Ok(mesh);
    }

    let size = model.min_mesh_size();
    let mut targets: Vec<Vec<u32>> = compounds.to_vec();
    for s in &model.surfaces {
        if !compounds.iter().any(|c| c.contains(&s.tag)) {
            targets.push(vec![s.tag]);
        }
    }

    for target in &targets {
        let boundary = merge_boundaries(model, target)?;
        let polygons = boundary
            .iter()
            .map(|l| model.polygon(l))
            .collect::<Result<Vec<_>>>()?;
        let members = if target.len() > 1 {
            target
                .iter()
                .map(|&tag| member_polygon(model, tag).map(|p| (tag, p)))
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        let triangles = triangulate(&polygons, size)?;
        debug!(surfaces = ?target, triangles = triangles.len(), "meshed target");

        for [a, b, c] in triangles {
            let centroid = Point2::from((a.coords + b.coords + c.coords) / 3.0);
            let surface = members
                .iter()
                .find(|(_, poly)| point_in_polygon(&centroid, poly))
                .map_or(target[0], |(tag, _)| *tag);
            let nodes = [
                table.node(a, &mut mesh.nodes),
                table.node(b, &mut mesh.nodes),
                table.node(c, &mut mesh.nodes),
            ];
            mesh.triangles.push(TriangleElement { nodes, surface });
        }
    }

    Ok(mesh)
}

fn member_polygon(model: &MeshModel, surface: u32) -> Result<Vec<Point2>> {
    let s = model.surface(surface).ok_or(MeshError::UnknownSurface)?;
    let l = model
        .curve_loop(s.loop_tag)
        .ok_or(MeshError::UnknownSurface)?;
    model.polygon(&l.curves)
}

/// Triangulates the region bounded by `polygons` (even-odd fill).
///
/// Returns counter-clockwise triangles.
fn triangulate(polygons: &[Vec<Point2>], size: f64) -> Result<Vec<[Point2; 3]>> {
    if polygons.is_empty() {
        return Ok(Vec::new());
    }
    for poly in polygons {
        if signed_area_2d(poly).abs() < TOLERANCE {
            return Err(MeshError::Triangulation("degenerate region".into()).into());
        }
    }
    check_crossings(polygons)?;

    let mut cdt = Cdt::new();
    for poly in polygons {
        let pts: Vec<_> = poly.iter().map(|p| SpadePoint2::new(p.x, p.y)).collect();
        insert_constraint_loop(&mut cdt, &pts)?;
    }
    for seed in interior_seeds(polygons, size)? {
        cdt.insert(SpadePoint2::new(seed.x, seed.y))
            .map_err(|e: InsertionError| MeshError::Triangulation(format!("CDT insert: {e}")))?;
    }

    let interior = classify_interior_faces(&cdt);
    let mut triangles = Vec::with_capacity(interior.len());
    for face in cdt.inner_faces() {
        if !interior.contains(&face.fix().index()) {
            continue;
        }
        let [a, b, c] = face.vertices().map(|v| {
            let p = v.position();
            Point2::new(p.x, p.y)
        });
        if (b - a).perp(&(c - a)) < 0.0 {
            triangles.push([a, c, b]);
        } else {
            triangles.push([a, b, c]);
        }
    }
    Ok(triangles)
}

/// Rejects boundaries whose segments cross; the CDT cannot constrain them.
fn check_crossings(polygons: &[Vec<Point2>]) -> Result<()> {
    let segments: Vec<(Point2, Point2)> = polygons
        .iter()
        .flat_map(|poly| {
            let n = poly.len();
            (0..n).map(move |i| (poly[i], poly[(i + 1) % n]))
        })
        .collect();
    for (i, (a, b)) in segments.iter().enumerate() {
        for (c, d) in &segments[i + 1..] {
            if segments_cross(a, b, c, d) {
                return Err(MeshError::Triangulation(format!(
                    "boundary self-intersects near ({}, {})",
                    a.x, a.y
                ))
                .into());
            }
        }
    }
    Ok(())
}

/// Staggered grid points inside the region, kept half a cell off the boundary.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
fn interior_seeds(polygons: &[Vec<Point2>], size: f64) -> Result<Vec<Point2>> {
    if !size.is_finite() || size < TOLERANCE {
        return Ok(Vec::new());
    }
    let (mut min, mut max) = (
        Point2::new(f64::INFINITY, f64::INFINITY),
        Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
    );
    for p in polygons.iter().flatten() {
        min = Point2::new(min.x.min(p.x), min.y.min(p.y));
        max = Point2::new(max.x.max(p.x), max.y.max(p.y));
    }

    let dy = size * 3.0_f64.sqrt() / 2.0;
    let cols = ((max.x - min.x) / size).ceil();
    let rows = ((max.y - min.y) / dy).ceil();
    if cols * rows > MAX_SEEDS {
        return Err(MeshError::Triangulation(format!(
            "mesh size {size} is too small for the model extent"
        ))
        .into());
    }

    let mut seeds = Vec::new();
    for row in 0..=rows as usize {
        let y = min.y + row as f64 * dy;
        let shift = if row % 2 == 1 { 0.5 * size } else { 0.0 };
        for col in 0..=cols as usize {
            let p = Point2::new(min.x + shift + col as f64 * size, y);
            let inside = polygons
                .iter()
                .filter(|poly| point_in_polygon(&p, poly))
                .count()
                % 2
                == 1;
            if inside
                && polygons
                    .iter()
                    .all(|poly| point_to_polygon_dist(&p, poly) > 0.5 * size)
            {
                seeds.push(p);
            }
        }
    }
    Ok(seeds)
}

/// Adds `points` to the triangulation as one closed constrained ring.
fn insert_constraint_loop(cdt: &mut Cdt, points: &[SpadePoint2<f64>]) -> Result<()> {
    if points.len() < 3 {
        return Err(
            MeshError::Triangulation("constraint loop needs at least 3 points".into()).into(),
        );
    }

    let mut handles = Vec::with_capacity(points.len());
    for &pt in points {
        let h = cdt
            .insert(pt)
            .map_err(|e: InsertionError| MeshError::Triangulation(format!("CDT insert: {e}")))?;
        handles.push(h);
    }

    for i in 0..handles.len() {
        let from = handles[i];
        let to = handles[(i + 1) % handles.len()];
        if from != to {
            cdt.add_constraint(from, to);
        }
    }

    Ok(())
}

/// Indices of the inner faces enclosed by the constraint loops.
///
/// Breadth-first walk from the convex hull inward, counting constraint
/// crossings; faces reached through an odd count are inside.
fn classify_interior_faces(cdt: &Cdt) -> HashSet<usize> {
    let mut interior = HashSet::new();
    let mut depth_map: HashMap<usize, u32> = HashMap::new();
    let mut queue: VecDeque<(FixedFaceHandle<spade::handles::InnerTag>, u32)> = VecDeque::new();

    let outer_fix = cdt.outer_face().fix();

    for edge in cdt.directed_edges() {
        if edge.face().fix() == outer_fix {
            let rev_face = edge.rev().face();
            if let Some(inner) = rev_face.as_inner() {
                let idx = inner.fix().index();
                if depth_map.contains_key(&idx) {
                    continue;
                }
                let depth = u32::from(cdt.is_constraint_edge(edge.as_undirected().fix()));
                depth_map.insert(idx, depth);
                if depth % 2 == 1 {
                    interior.insert(idx);
                }
                queue.push_back((inner.fix(), depth));
            }
        }
    }

    while let Some((face_fix, depth)) = queue.pop_front() {
        let face = cdt.face(face_fix);
        for edge in face.adjacent_edges() {
            let neighbor = edge.rev().face();
            if let Some(inner_neighbor) = neighbor.as_inner() {
                let n_idx = inner_neighbor.fix().index();
                if depth_map.contains_key(&n_idx) {
                    continue;
                }
                let new_depth = if cdt.is_constraint_edge(edge.as_undirected().fix()) {
                    depth + 1
                } else {
                    depth
                };
                depth_map.insert(n_idx, new_depth);
                if new_depth % 2 == 1 {
                    interior.insert(n_idx);
                }
                queue.push_back((inner_neighbor.fix(), new_depth));
            }
        }
    }

    interior
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::pin::{BuildPinSection, DesignParameters, PinSection};
    use approx::assert_relative_eq;

    fn section(size: f64) -> (TopologyStore, PinSection) {
        let mut store = TopologyStore::new();
        let s = BuildPinSection::new(DesignParameters::default(), size)
            .execute(&mut store)
            .unwrap();
        (store, s)
    }

    fn meshed(size: f64) -> (CdtMesher, PinSection) {
        let (store, s) = section(size);
        let mut mesher = CdtMesher::new();
        mesher.initialize().unwrap();
        mesher.build_entities(&store).unwrap();
        mesher.set_compound(&s.fluid_surfaces()).unwrap();
        mesher.generate(2).unwrap();
        (mesher, s)
    }

    #[test]
    fn square_region_area() {
        let square = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let tris = triangulate(&[square], 0.25).unwrap();
        let area: f64 = tris
            .iter()
            .map(|[a, b, c]| (b - a).perp(&(c - a)) * 0.5)
            .sum();
        assert_relative_eq!(area, 1.0, epsilon = 1e-9);
        assert!(tris.len() > 2);
        assert!(tris.iter().all(|[a, b, c]| (b - a).perp(&(c - a)) > 0.0));
    }

    #[test]
    fn crossing_boundary_is_an_error() {
        let bowtie = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
        ];
        assert!(matches!(
            triangulate(&[bowtie], 0.25),
            Err(PinError::Mesh(MeshError::Triangulation(_)))
        ));
    }

    #[test]
    fn region_areas_match_boundaries() {
        let (mesher, _) = meshed(0.02);
        let model = mesher.model().unwrap();
        let mesh = mesher.mesh().unwrap();
        let total: f64 = model
            .surfaces
            .iter()
            .map(|s| mesh.surface_area(s.tag))
            .sum();
        let expected: f64 = model
            .loops
            .iter()
            .map(|l| signed_area_2d(&model.polygon(&l.curves).unwrap()).abs())
            .sum();
        assert_relative_eq!(total, expected, epsilon = 1e-9);

        let breeder_loop = model.curve_loop(4).unwrap();
        let breeder = signed_area_2d(&model.polygon(&breeder_loop.curves).unwrap()).abs();
        assert_relative_eq!(mesh.surface_area(4), breeder, epsilon = 1e-9);
    }

    #[test]
    fn every_curve_has_line_elements() {
        let (mesher, _) = meshed(0.05);
        let mesh = mesher.mesh().unwrap();
        for tag in 1..=11 {
            assert!(mesh.lines.iter().any(|l| l.curve == tag), "curve {tag} missing");
        }
    }

    #[test]
    fn shared_boundary_nodes_are_shared() {
        let (mesher, _) = meshed(0.05);
        let mesh = mesher.mesh().unwrap();
        let cap_nodes: HashSet<usize> = mesh
            .lines
            .iter()
            .filter(|l| l.curve == 7)
            .flat_map(|l| l.nodes)
            .collect();
        let breeder_nodes: HashSet<usize> = mesh
            .triangles
            .iter()
            .filter(|t| t.surface == 4)
            .flat_map(|t| t.nodes)
            .collect();
        let fluid_nodes: HashSet<usize> = mesh
            .triangles
            .iter()
            .filter(|t| t.surface != 4)
            .flat_map(|t| t.nodes)
            .collect();
        assert!(cap_nodes.is_subset(&breeder_nodes));
        assert!(cap_nodes.is_subset(&fluid_nodes));
    }

    #[test]
    fn calls_out_of_order_fail() {
        let (store, s) = section(0.05);
        let mut mesher = CdtMesher::new();
        assert!(mesher.build_entities(&store).is_err());
        mesher.initialize().unwrap();
        assert!(mesher.initialize().is_err());
        assert!(mesher.generate(2).is_err());
        mesher.build_entities(&store).unwrap();
        assert!(mesher.write(Path::new("unused.msh")).is_err());
        assert!(matches!(
            mesher.generate(3),
            Err(PinError::Mesh(MeshError::UnsupportedDimension(3)))
        ));
        mesher.set_compound(&s.fluid_surfaces()).unwrap();
        assert!(mesher.set_compound(&[s.rim_channel.surface]).is_err());
        mesher.finalize();
        assert!(mesher.mesh().is_none());
        assert!(mesher.initialize().is_ok());
    }

    #[test]
    fn foreign_surface_is_unknown() {
        let (store, _) = section(0.05);
        let mut mesher = CdtMesher::new();
        mesher.initialize().unwrap();
        mesher.build_entities(&store).unwrap();
        // The null key never names a stored surface.
        let err = mesher.set_compound(&[SurfaceId::default()]).unwrap_err();
        assert!(matches!(err, PinError::Mesh(MeshError::UnknownSurface)));
    }

    #[test]
    fn line_only_generation() {
        let (store, _) = section(0.05);
        let mut mesher = CdtMesher::new();
        mesher.initialize().unwrap();
        mesher.build_entities(&store).unwrap();
        mesher.generate(1).unwrap();
        let mesh = mesher.mesh().unwrap();
        assert!(mesh.triangles.is_empty());
        assert!(!mesh.lines.is_empty());
    }
}
