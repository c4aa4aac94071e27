use std::collections::HashMap;

use crate::error::{MeshError, Result, TopologyError};
use crate::math::Point2;
use crate::operations::query::SampleCurve;
use crate::topology::{CurveKind, Dimension, GroupMembers, SurfaceId, TopologyStore};

/// A vertex as seen by a meshing engine.
#[derive(Debug, Clone)]
pub struct ModelPoint {
    pub tag: u32,
    pub point: Point2,
    pub mesh_size: f64,
}

/// A curve with its vertex tags and its discretisation.
#[derive(Debug, Clone)]
pub struct ModelCurve {
    pub tag: u32,
    pub kind: CurveKind,
    pub vertex_tags: Vec<u32>,
    /// Sampled polyline from the first to the last vertex.
    pub samples: Vec<Point2>,
}

impl ModelCurve {
    /// Start vertex tag.
    #[must_use]
    pub fn start(&self) -> u32 {
        self.vertex_tags[0]
    }

    /// End vertex tag.
    #[must_use]
    pub fn end(&self) -> u32 {
        self.vertex_tags[self.vertex_tags.len() - 1]
    }
}

/// A loop as signed curve tags; negative means reversed.
#[derive(Debug, Clone)]
pub struct ModelLoop {
    pub tag: u32,
    pub curves: Vec<i64>,
}

/// A surface and the tag of its loop.
#[derive(Debug, Clone)]
pub struct ModelSurface {
    pub tag: u32,
    pub loop_tag: u32,
}

/// A physical group as tags.
#[derive(Debug, Clone)]
pub struct ModelGroup {
    pub tag: u32,
    pub dim: Dimension,
    pub name: String,
    pub members: Vec<u32>,
}

/// A tag-based snapshot of a [`TopologyStore`], owned by a meshing session.
///
/// Every curve is sampled exactly once here, so wherever two regions share a
/// curve they share its sample points bit for bit.
#[derive(Debug, Clone, Default)]
pub struct MeshModel {
    pub points: Vec<ModelPoint>,
    pub curves: Vec<ModelCurve>,
    pub loops: Vec<ModelLoop>,
    pub surfaces: Vec<ModelSurface>,
    pub groups: Vec<ModelGroup>,
    surface_tags: HashMap<SurfaceId, u32>,
}

impl MeshModel {
    /// Captures `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the store references a missing entity.
    pub fn from_store(store: &TopologyStore) -> Result<Self> {
        let points = store
            .vertices()
            .map(|(_, v)| ModelPoint {
                tag: v.tag,
                point: v.point,
                mesh_size: v.mesh_size,
            })
            .collect();

        let mut curves = Vec::with_capacity(store.curve_count());
        for (id, c) in store.curves() {
            let vertex_tags = c
                .vertices
                .iter()
                .map(|&v| store.vertex(v).map(|d| d.tag))
                .collect::<std::result::Result<Vec<_>, TopologyError>>()?;
            curves.push(ModelCurve {
                tag: c.tag,
                kind: c.kind,
                vertex_tags,
                samples: SampleCurve::new(id).execute(store)?,
            });
        }

        let mut loops = Vec::with_capacity(store.curve_loop_count());
        for (_, l) in store.curve_loops() {
            let curves = l
                .curves
                .iter()
                .map(|oc| store.curve(oc.curve).map(|c| oc.signed_tag(c)))
                .collect::<std::result::Result<Vec<_>, TopologyError>>()?;
            loops.push(ModelLoop { tag: l.tag, curves });
        }

        let mut surfaces = Vec::with_capacity(store.surface_count());
        let mut surface_tags = HashMap::new();
        for (id, s) in store.surfaces() {
            surfaces.push(ModelSurface {
                tag: s.tag,
                loop_tag: store.curve_loop(s.curve_loop)?.tag,
            });
            surface_tags.insert(id, s.tag);
        }

        let mut groups = Vec::with_capacity(store.group_count());
        for (_, g) in store.groups() {
            let members = match &g.members {
                GroupMembers::Curves(ids) => ids
                    .iter()
                    .map(|&c| store.curve(c).map(|d| d.tag))
                    .collect::<std::result::Result<Vec<_>, TopologyError>>()?,
                GroupMembers::Surfaces(ids) => ids
                    .iter()
                    .map(|&s| store.surface(s).map(|d| d.tag))
                    .collect::<std::result::Result<Vec<_>, TopologyError>>()?,
            };
            groups.push(ModelGroup {
                tag: g.tag,
                dim: g.dimension(),
                name: g.name.clone(),
                members,
            });
        }

        Ok(Self {
            points,
            curves,
            loops,
            surfaces,
            groups,
            surface_tags,
        })
    }

    /// Tag of a surface handle from the captured store.
    ///
    /// # Errors
    ///
    /// Returns [`MeshError::UnknownSurface`] for a handle not in the snapshot.
    pub fn surface_tag(&self, id: SurfaceId) -> Result<u32> {
        self.surface_tags
            .get(&id)
            .copied()
            .ok_or_else(|| MeshError::UnknownSurface.into())
    }

    /// Curve by tag.
    #[must_use]
    pub fn curve(&self, tag: u32) -> Option<&ModelCurve> {
        self.curves.iter().find(|c| c.tag == tag)
    }

    /// Loop by tag.
    #[must_use]
    pub fn curve_loop(&self, tag: u32) -> Option<&ModelLoop> {
        self.loops.iter().find(|l| l.tag == tag)
    }

    /// Surface by tag.
    #[must_use]
    pub fn surface(&self, tag: u32) -> Option<&ModelSurface> {
        self.surfaces.iter().find(|s| s.tag == tag)
    }

    /// Smallest mesh-size hint of any vertex.
    #[must_use]
    pub fn min_mesh_size(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.mesh_size)
            .fold(f64::INFINITY, f64::min)
    }

    /// Closed polygon traced by signed curve tags, without repeating the
    /// closing point.
    ///
    /// # Errors
    ///
    /// Returns an error if a tag names no curve.
    pub fn polygon(&self, signed_curves: &[i64]) -> Result<Vec<Point2>> {
        let mut polygon = Vec::new();
        for &signed in signed_curves {
            let curve = self.signed_curve(signed)?;
            let n = curve.samples.len();
            if signed > 0 {
                polygon.extend_from_slice(&curve.samples[..n - 1]);
            } else {
                polygon.extend(curve.samples[1..].iter().rev());
            }
        }
        Ok(polygon)
    }

    pub(crate) fn signed_curve(&self, signed: i64) -> Result<&ModelCurve> {
        u32::try_from(signed.unsigned_abs())
            .ok()
            .and_then(|tag| self.curve(tag))
            .ok_or_else(|| TopologyError::EntityNotFound(format!("curve {signed}")).into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::polygon_2d::signed_area_2d;
    use crate::pin::{BuildPinSection, DesignParameters};

    fn reference() -> (TopologyStore, crate::pin::PinSection) {
        let mut store = TopologyStore::new();
        let s = BuildPinSection::new(DesignParameters::default(), 0.05)
            .execute(&mut store)
            .unwrap();
        (store, s)
    }

    #[test]
    fn snapshot_mirrors_store() {
        let (store, s) = reference();
        let m = MeshModel::from_store(&store).unwrap();
        assert_eq!(m.points.len(), 10);
        assert_eq!(m.curves.len(), 11);
        assert_eq!(m.loops.len(), 4);
        assert_eq!(m.surfaces.len(), 4);
        assert_eq!(m.groups.len(), 5);
        assert_eq!(m.surface_tag(s.breeder.surface).unwrap(), 4);
        assert_eq!(m.curve_loop(2).unwrap().curves, vec![-9, 3, 10, 7]);
        assert_eq!(m.curve(3).unwrap().vertex_tags, vec![3, 4, 5]);
    }

    #[test]
    fn loops_trace_clockwise_polygons() {
        let (store, _) = reference();
        let m = MeshModel::from_store(&store).unwrap();
        for l in &m.loops {
            let poly = m.polygon(&l.curves).unwrap();
            assert!(signed_area_2d(&poly) < 0.0, "loop {} is not clockwise", l.tag);
        }
    }

    #[test]
    fn shared_curves_share_samples() {
        let (store, _) = reference();
        let m = MeshModel::from_store(&store).unwrap();
        let a = m.polygon(&[7]).unwrap();
        let mut b = m.polygon(&[-7]).unwrap();
        // Drop the start points (each polygon omits the other end).
        b.reverse();
        assert_eq!(a[1..], b[..b.len() - 1]);
    }
}
