use std::io::{self, Write};

use super::model::MeshModel;
use super::Mesh2D;
use crate::topology::Dimension;

const LINE: u8 = 1;
const TRIANGLE: u8 = 2;

/// Writes `mesh` as a gmsh MSH 2.2 ASCII file.
///
/// Elements are emitted once per physical group membership, with the group
/// tag and the elementary curve/surface tag as their two tags. Node ids are
/// one-based.
///
/// # Errors
///
/// Propagates write failures from `out`.
pub fn write_msh2<W: Write>(out: &mut W, model: &MeshModel, mesh: &Mesh2D) -> io::Result<()> {
    writeln!(out, "$MeshFormat")?;
    writeln!(out, "2.2 0 8")?;
    writeln!(out, "$EndMeshFormat")?;

    writeln!(out, "$PhysicalNames")?;
    writeln!(out, "{}", model.groups.len())?;
    for g in &model.groups {
        writeln!(out, "{} {} \"{}\"", g.dim.as_u8(), g.tag, g.name)?;
    }
    writeln!(out, "$EndPhysicalNames")?;

    writeln!(out, "$Nodes")?;
    writeln!(out, "{}", mesh.nodes.len())?;
    for (i, p) in mesh.nodes.iter().enumerate() {
        writeln!(out, "{} {} {} 0", i + 1, p.x, p.y)?;
    }
    writeln!(out, "$EndNodes")?;

    let mut elements: Vec<(u8, u32, u32, Vec<usize>)> = Vec::new();
    for g in &model.groups {
        match g.dim {
            Dimension::Curve => {
                for l in mesh.lines.iter().filter(|l| g.members.contains(&l.curve)) {
                    elements.push((LINE, g.tag, l.curve, l.nodes.to_vec()));
                }
            }
            Dimension::Surface => {
                for t in mesh
                    .triangles
                    .iter()
                    .filter(|t| g.members.contains(&t.surface))
                {
                    elements.push((TRIANGLE, g.tag, t.surface, t.nodes.to_vec()));
                }
            }
        }
    }

    writeln!(out, "$Elements")?;
    writeln!(out, "{}", elements.len())?;
    for (id, (kind, group, entity, nodes)) in elements.iter().enumerate() {
        write!(out, "{} {kind} 2 {group} {entity}", id + 1)?;
        for n in nodes {
            write!(out, " {}", n + 1)?;
        }
        writeln!(out)?;
    }
    writeln!(out, "$EndElements")?;
    Ok(())
}
