use std::collections::HashMap;

use crate::error::{MeshError, Result, TopologyError};

use super::model::MeshModel;
use crate::topology::SurfaceId;

/// Outer boundary loops of the union of `surfaces`, as signed curve tags.
///
/// A curve traversed forward by one member loop and backward by another is
/// interior to the union and dropped; what remains is chained end to start
/// into closed loops. A single simply connected union yields one loop.
///
/// # Errors
///
/// Returns an error if a surface or curve is unknown, or if the remaining
/// curves do not chain into closed loops.
pub fn merge_boundaries(model: &MeshModel, surfaces: &[u32]) -> Result<Vec<Vec<i64>>> {
    let mut oriented: Vec<i64> = Vec::new();
    for &tag in surfaces {
        let surface = model.surface(tag).ok_or(MeshError::UnknownSurface)?;
        let curve_loop = model.curve_loop(surface.loop_tag).ok_or_else(|| {
            TopologyError::EntityNotFound(format!("curve loop {}", surface.loop_tag))
        })?;
        oriented.extend_from_slice(&curve_loop.curves);
    }

    // Cancel opposite traversals pairwise.
    let mut kept: Vec<i64> = Vec::with_capacity(oriented.len());
    for signed in oriented {
        if let Some(pos) = kept.iter().position(|&k| k == -signed) {
            kept.remove(pos);
        } else {
            kept.push(signed);
        }
    }

    // Index the survivors by the vertex they start from.
    let mut by_start: HashMap<u32, Vec<i64>> = HashMap::new();
    for &signed in &kept {
        let (start, _) = endpoints(model, signed)?;
        by_start.entry(start).or_default().push(signed);
    }

    let mut loops = Vec::new();
    for &first in &kept {
        let (origin, _) = endpoints(model, first)?;
        let Some(bucket) = by_start.get_mut(&origin) else {
            continue;
        };
        let Some(pos) = bucket.iter().position(|&s| s == first) else {
            // Already consumed by an earlier loop.
            continue;
        };
        bucket.remove(pos);

        let mut chain = vec![first];
        let (_, mut at) = endpoints(model, first)?;
        while at != origin {
            let next = by_start
                .get_mut(&at)
                .and_then(Vec::pop)
                .ok_or_else(|| {
                    MeshError::Triangulation(format!(
                        "compound boundary is open at vertex {at}"
                    ))
                })?;
            chain.push(next);
            at = endpoints(model, next)?.1;
        }
        loops.push(chain);
    }

    Ok(loops)
}

/// Tags of `surfaces`, checked against the compounds already declared.
pub(crate) fn resolve_compound(
    model: &MeshModel,
    declared: &[Vec<u32>],
    surfaces: &[SurfaceId],
) -> Result<Vec<u32>> {
    if surfaces.is_empty() {
        return Err(MeshError::Triangulation("compound has no surfaces".into()).into());
    }
    let tags = surfaces
        .iter()
        .map(|&s| model.surface_tag(s))
        .collect::<Result<Vec<_>>>()?;
    if let Some(t) = tags.iter().find(|t| declared.iter().any(|c| c.contains(t))) {
        return Err(
            MeshError::Triangulation(format!("surface {t} already belongs to a compound")).into(),
        );
    }
    Ok(tags)
}

/// Start and end vertex tags of a signed curve traversal.
fn endpoints(model: &MeshModel, signed: i64) -> Result<(u32, u32)> {
    let curve = model.signed_curve(signed)?;
    if signed > 0 {
        Ok((curve.start(), curve.end()))
    } else {
        Ok((curve.end(), curve.start()))
    }
}
