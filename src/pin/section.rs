//! The breeder-pin cross-section.
//!
//! Ten vertices run clockwise around the perimeter:
//!
//! ```text
//!  P3 ────────── rim ────────── P5
//!  │ ╲                         ╱ │
//!  │  P10 ─────── cap ──────── P8 │
//!  │   │        breeder        │  │
//!  P2─P1 ──────── base ─────── P7─P6
//! ```
//!
//! P4 shapes the rim spline and P9 the cap spline.
//! The chords P3–P10 and P5–P8 split the flow channel around the breeder
//! into three fluid patches; the base chord P7–P1 closes the breeder.

use tracing::debug;

use crate::error::Result;
use crate::math::Point2;
use crate::operations::creation::{
    MakeCurveLoop, MakeLine, MakePhysicalGroup, MakeSpline, MakeSurface,
};
use crate::topology::{
    CurveId, CurveLoopId, GroupId, GroupMembers, OrientedCurve, SurfaceId, TopologyStore,
    VertexId,
};

use super::DesignParameters;

/// Physical group names, in creation order.
pub const GROUP_NAMES: [&str; 5] = ["outlet", "inlet", "noslip", "fluid", "breeder"];

/// Vertex handles of a built section.
#[derive(Debug, Clone, Copy)]
pub struct PinVertices {
    pub bore_apex: VertexId,
    pub inner_corner: VertexId,
    pub outer_top_corner: VertexId,
    pub outer_turning_point: VertexId,
    pub outer_top_bore_corner: VertexId,
    pub outer_bottom_bore_corner: VertexId,
    pub inner_wall_corner: VertexId,
    pub breeder_outer_corner: VertexId,
    pub bore_turning_point: VertexId,
    pub inner_breeder_corner: VertexId,
}

/// Curve handles of a built section.
#[derive(Debug, Clone, Copy)]
pub struct PinCurves {
    pub outlet: CurveId,
    pub axis: CurveId,
    pub outer_rim: CurveId,
    pub outer_wall: CurveId,
    pub inlet: CurveId,
    pub breeder_outer_wall: CurveId,
    pub breeder_cap: CurveId,
    pub breeder_inner_wall: CurveId,
    pub axis_chord: CurveId,
    pub rim_chord: CurveId,
    pub breeder_base: CurveId,
}

/// Handles for one region: its loop and the surface filling it.
#[derive(Debug, Clone, Copy)]
pub struct Region {
    pub curve_loop: CurveLoopId,
    pub surface: SurfaceId,
}

/// Physical group handles of a built section.
#[derive(Debug, Clone, Copy)]
pub struct PinGroups {
    pub outlet: GroupId,
    pub inlet: GroupId,
    pub noslip: GroupId,
    pub fluid: GroupId,
    pub breeder: GroupId,
}

/// Everything [`BuildPinSection`] created, by role.
#[derive(Debug, Clone, Copy)]
pub struct PinSection {
    pub vertices: PinVertices,
    pub curves: PinCurves,
    /// Fluid patch between the axis and the breeder's inner wall.
    pub axis_channel: Region,
    /// Fluid patch under the outer rim.
    pub rim_channel: Region,
    /// Fluid patch between the breeder and the outer wall.
    pub outer_channel: Region,
    pub breeder: Region,
    pub groups: PinGroups,
}

impl PinSection {
    /// The three fluid surfaces, meshed together as one compound target.
    #[must_use]
    pub fn fluid_surfaces(&self) -> [SurfaceId; 3] {
        [
            self.axis_channel.surface,
            self.rim_channel.surface,
            self.outer_channel.surface,
        ]
    }
}

/// Builds the cross-section of a pin into a fresh topology store.
///
/// Parameters are not re-checked here; run
/// [`DesignParameters::is_feasible`] first.
pub struct BuildPinSection {
    params: DesignParameters,
    mesh_size: f64,
}

impl BuildPinSection {
    /// Creates a new `BuildPinSection` operation.
    #[must_use]
    pub fn new(params: DesignParameters, mesh_size: f64) -> Self {
        Self { params, mesh_size }
    }

    /// Executes the operation.
    ///
    /// # Errors
    ///
    /// Returns an error if a loop fails to close. The layout is fixed, so
    /// that indicates a construction bug rather than bad input.
    pub fn execute(&self, store: &mut TopologyStore) -> Result<PinSection> {
        use OrientedCurve as O;

        let vertices = self.add_vertices(store);
        let curves = add_curves(store, &vertices)?;

        let c = &curves;
        let axis_channel = add_region(
            store,
            vec![
                O::forward(c.outlet),
                O::forward(c.axis),
                O::forward(c.axis_chord),
                O::forward(c.breeder_inner_wall),
            ],
        )?;
        let rim_channel = add_region(
            store,
            vec![
                O::reversed(c.axis_chord),
                O::forward(c.outer_rim),
                O::forward(c.rim_chord),
                O::forward(c.breeder_cap),
            ],
        )?;
        let outer_channel = add_region(
            store,
            vec![
                O::reversed(c.rim_chord),
                O::forward(c.outer_wall),
                O::forward(c.inlet),
                O::forward(c.breeder_outer_wall),
            ],
        )?;
        let breeder = add_region(
            store,
            vec![
                O::forward(c.breeder_base),
                O::reversed(c.breeder_inner_wall),
                O::reversed(c.breeder_cap),
                O::reversed(c.breeder_outer_wall),
            ],
        )?;

        let groups = PinGroups {
            outlet: MakePhysicalGroup::new("outlet", GroupMembers::Curves(vec![c.outlet]))
                .execute(store)?,
            inlet: MakePhysicalGroup::new("inlet", GroupMembers::Curves(vec![c.inlet]))
                .execute(store)?,
            noslip: MakePhysicalGroup::new(
                "noslip",
                GroupMembers::Curves(vec![
                    c.axis,
                    c.outer_rim,
                    c.outer_wall,
                    c.breeder_outer_wall,
                    c.breeder_cap,
                    c.breeder_inner_wall,
                ]),
            )
            .execute(store)?,
            fluid: MakePhysicalGroup::new(
                "fluid",
                GroupMembers::Surfaces(vec![
                    axis_channel.surface,
                    rim_channel.surface,
                    outer_channel.surface,
                ]),
            )
            .execute(store)?,
            breeder: MakePhysicalGroup::new("breeder", GroupMembers::Surfaces(vec![breeder.surface]))
                .execute(store)?,
        };

        debug!(
            vertices = store.vertex_count(),
            curves = store.curve_count(),
            loops = store.curve_loop_count(),
            surfaces = store.surface_count(),
            groups = store.group_count(),
            "built pin section"
        );

        Ok(PinSection {
            vertices,
            curves,
            axis_channel,
            rim_channel,
            outer_channel,
            breeder,
            groups,
        })
    }

    fn add_vertices(&self, store: &mut TopologyStore) -> PinVertices {
        let p = &self.params;
        let lc = self.mesh_size;
        let mut at = |x: f64, y: f64| store.add_vertex(Point2::new(x, y), lc);
        let wall_x = p.outer_bore - p.pin_radial_thickness;
        PinVertices {
            bore_apex: at(p.inner_bore, 0.0),
            inner_corner: at(0.0, 0.0),
            outer_top_corner: at(0.0, p.outer_length),
            outer_turning_point: at(p.outer_turning_point_x, p.outer_turning_point_y),
            outer_top_bore_corner: at(p.outer_bore, p.outer_length),
            outer_bottom_bore_corner: at(p.outer_bore, 0.0),
            inner_wall_corner: at(wall_x, 0.0),
            breeder_outer_corner: at(wall_x, p.breeder_outer_length),
            bore_turning_point: at(p.bore_turning_point_x, p.bore_turning_point_y),
            inner_breeder_corner: at(p.inner_bore, p.breeder_inner_length),
        }
    }
}

fn add_curves(store: &mut TopologyStore, v: &PinVertices) -> Result<PinCurves> {
    Ok(PinCurves {
        outlet: MakeLine::new(v.bore_apex, v.inner_corner).execute(store)?,
        axis: MakeLine::new(v.inner_corner, v.outer_top_corner).execute(store)?,
        outer_rim: MakeSpline::new(vec![
            v.outer_top_corner,
            v.outer_turning_point,
            v.outer_top_bore_corner,
        ])
        .execute(store)?,
        outer_wall: MakeLine::new(v.outer_top_bore_corner, v.outer_bottom_bore_corner)
            .execute(store)?,
        inlet: MakeLine::new(v.outer_bottom_bore_corner, v.inner_wall_corner).execute(store)?,
        breeder_outer_wall: MakeLine::new(v.inner_wall_corner, v.breeder_outer_corner)
            .execute(store)?,
        breeder_cap: MakeSpline::new(vec![
            v.breeder_outer_corner,
            v.bore_turning_point,
            v.inner_breeder_corner,
        ])
        .execute(store)?,
        breeder_inner_wall: MakeLine::new(v.inner_breeder_corner, v.bore_apex).execute(store)?,
        axis_chord: MakeLine::new(v.outer_top_corner, v.inner_breeder_corner).execute(store)?,
        rim_chord: MakeLine::new(v.outer_top_bore_corner, v.breeder_outer_corner)
            .execute(store)?,
        breeder_base: MakeLine::new(v.inner_wall_corner, v.bore_apex).execute(store)?,
    })
}

fn add_region(store: &mut TopologyStore, curves: Vec<OrientedCurve>) -> Result<Region> {
    let curve_loop = MakeCurveLoop::new(curves).execute(store)?;
    let surface = MakeSurface::new(curve_loop).execute(store)?;
    Ok(Region {
        curve_loop,
        surface,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::operations::query::TraceLoop;
    use crate::topology::Dimension;

    fn build(params: DesignParameters) -> (TopologyStore, PinSection) {
        let mut store = TopologyStore::new();
        let section = BuildPinSection::new(params, 0.01)
            .execute(&mut store)
            .unwrap();
        (store, section)
    }

    fn signed_tags(store: &TopologyStore, region: Region) -> Vec<i64> {
        let l = store.curve_loop(region.curve_loop).unwrap();
        l.curves
            .iter()
            .map(|oc| oc.signed_tag(store.curve(oc.curve).unwrap()))
            .collect()
    }

    #[test]
    fn reference_section_entity_counts() {
        let (store, _) = build(DesignParameters::default());
        assert_eq!(store.vertex_count(), 10);
        assert_eq!(store.curve_count(), 11);
        assert_eq!(store.curve_loop_count(), 4);
        assert_eq!(store.surface_count(), 4);
        assert_eq!(store.group_count(), 5);
    }

    #[test]
    fn group_names_and_dimensions() {
        let (store, _) = build(DesignParameters::default());
        let groups: Vec<(String, Dimension, u32)> = store
            .groups()
            .map(|(_, g)| (g.name.clone(), g.dimension(), g.tag))
            .collect();
        assert_eq!(
            groups,
            vec![
                ("outlet".to_string(), Dimension::Curve, 1),
                ("inlet".to_string(), Dimension::Curve, 2),
                ("noslip".to_string(), Dimension::Curve, 3),
                ("fluid".to_string(), Dimension::Surface, 4),
                ("breeder".to_string(), Dimension::Surface, 5),
            ]
        );
        let names: Vec<&str> = store.groups().map(|(_, g)| g.name.as_str()).collect();
        assert_eq!(names, GROUP_NAMES);
    }

    #[test]
    fn loops_use_expected_signed_tags() {
        let (store, s) = build(DesignParameters::default());
        assert_eq!(signed_tags(&store, s.axis_channel), vec![1, 2, 9, 8]);
        assert_eq!(signed_tags(&store, s.rim_channel), vec![-9, 3, 10, 7]);
        assert_eq!(signed_tags(&store, s.outer_channel), vec![-10, 4, 5, 6]);
        assert_eq!(signed_tags(&store, s.breeder), vec![11, -8, -7, -6]);
    }

    #[test]
    fn every_loop_closes() {
        let (store, _) = build(DesignParameters::default());
        for (_, l) in store.curve_loops() {
            let corners = TraceLoop::new(&l.curves).execute(&store).unwrap();
            assert_eq!(corners.len(), 4);
        }
    }

    #[test]
    fn vertex_positions_follow_parameters() {
        let p = DesignParameters::default();
        let (store, s) = build(p);
        let pos = |v| store.vertex(v).unwrap().point;
        assert_eq!(pos(s.vertices.bore_apex), Point2::new(0.05, 0.0));
        assert_eq!(pos(s.vertices.outer_turning_point), Point2::new(0.25, 1.01));
        assert_eq!(
            pos(s.vertices.breeder_outer_corner),
            Point2::new(p.outer_bore - p.pin_radial_thickness, 0.7)
        );
        let tags: Vec<u32> = store.vertices().map(|(_, v)| v.tag).collect();
        assert_eq!(tags, (1..=10).collect::<Vec<_>>());
        assert!(store.vertices().all(|(_, v)| (v.mesh_size - 0.01).abs() < f64::EPSILON));
    }

    #[test]
    fn boundary_parameters_still_build() {
        // Zero wall thickness collapses the base chord to a point.
        let p = DesignParameters {
            inner_bore: 0.5,
            outer_bore: 0.5,
            pin_radial_thickness: 0.0,
            bore_turning_point_x: 0.5,
            bore_turning_point_y: 0.0,
            breeder_inner_length: 0.9,
            breeder_outer_length: 0.9,
            ..DesignParameters::default()
        };
        assert!(p.is_feasible());
        let (store, _) = build(p);
        assert_eq!(store.curve_count(), 11);
        assert_eq!(store.group_count(), 5);
    }

    #[test]
    fn noslip_and_fluid_members() {
        let (store, s) = build(DesignParameters::default());
        let noslip = store.group(s.groups.noslip).unwrap();
        match &noslip.members {
            GroupMembers::Curves(c) => {
                let tags: Vec<u32> = c.iter().map(|&c| store.curve(c).unwrap().tag).collect();
                assert_eq!(tags, vec![2, 3, 4, 6, 7, 8]);
            }
            GroupMembers::Surfaces(_) => panic!("noslip must tag curves"),
        }
        let fluid = store.group(s.groups.fluid).unwrap();
        assert_eq!(fluid.members, GroupMembers::Surfaces(s.fluid_surfaces().to_vec()));
    }

    #[test]
    fn independent_builds_restart_tags() {
        let (a, _) = build(DesignParameters::default());
        let (b, _) = build(DesignParameters::default());
        let last = |s: &TopologyStore| s.curves().map(|(_, c)| c.tag).max();
        assert_eq!(last(&a), Some(11));
        assert_eq!(last(&b), Some(11));
    }
}
