//! MockKernel: deterministic test double implementing Kernel + KernelIntrospect.
//!
//! Tracks the bounding box of every solid and logs each operation, so
//! pipelines can be checked for call order and overall extent without a
//! real BREP kernel. A failure can be injected at any operation index.

use crate::traits::{Kernel, KernelIntrospect};
use crate::types::*;
use std::collections::HashMap;

/// One logged kernel call.
#[derive(Debug, Clone, PartialEq)]
pub enum KernelOp {
    Extrude {
        profile: Profile2D,
        z_base: f64,
        height: f64,
    },
    Loft {
        sections: Vec<(Profile2D, f64)>,
    },
    Union,
    Subtract,
    Fillet {
        edges: EdgeSelector,
        radius: f64,
    },
    Tessellate,
}

/// A synthetic solid: an axis-aligned box standing in for the real shape.
#[derive(Debug, Clone)]
struct MockSolid {
    bbox: BoundingBox,
    /// Fillets applied so far, in order.
    fillets: Vec<EdgeSelector>,
}

/// Deterministic test double for the geometry kernel.
pub struct MockKernel {
    next_handle: u64,
    solids: HashMap<u64, MockSolid>,
    log: Vec<KernelOp>,
    fail_at: Option<usize>,
}

impl MockKernel {
    pub fn new() -> Self {
        Self {
            next_handle: 1,
            solids: HashMap::new(),
            log: Vec::new(),
            fail_at: None,
        }
    }

    /// A kernel whose `index`-th operation (0-based, counting every
    /// logged call) fails.
    pub fn failing_at(index: usize) -> Self {
        Self {
            fail_at: Some(index),
            ..Self::new()
        }
    }

    /// Every operation issued so far, in order.
    pub fn log(&self) -> &[KernelOp] {
        &self.log
    }

    /// Number of logged operations matching `pred`.
    pub fn count(&self, pred: impl Fn(&KernelOp) -> bool) -> usize {
        self.log.iter().filter(|op| pred(op)).count()
    }

    fn record(&mut self, op: KernelOp) -> Result<(), KernelError> {
        let index = self.log.len();
        self.log.push(op);
        if self.fail_at == Some(index) {
            return Err(KernelError::Other {
                message: format!("injected failure at operation {}", index),
            });
        }
        Ok(())
    }

    fn store(&mut self, solid: MockSolid) -> KernelSolidHandle {
        let h = KernelSolidHandle(self.next_handle);
        self.next_handle += 1;
        self.solids.insert(h.id(), solid);
        h
    }

    fn get(&self, handle: &KernelSolidHandle) -> Result<&MockSolid, KernelError> {
        self.solids
            .get(&handle.id())
            .ok_or(KernelError::EntityNotFound {
                handle: handle.id(),
            })
    }

    /// Closed 12-triangle mesh of a box with shared corner vertices.
    fn tessellate_box(bbox: &BoundingBox) -> RenderMesh {
        let (lo, hi) = (bbox.min, bbox.max);
        let mut vertices = Vec::with_capacity(24);
        for i in 0..8 {
            let x = if i & 1 == 0 { lo[0] } else { hi[0] };
            let y = if i & 2 == 0 { lo[1] } else { hi[1] };
            let z = if i & 4 == 0 { lo[2] } else { hi[2] };
            vertices.extend_from_slice(&[x as f32, y as f32, z as f32]);
        }
        // Outward-facing quads as (a, b, c, d), counter-clockwise from outside.
        let quads: [([u32; 4], [f32; 3]); 6] = [
            ([0, 2, 3, 1], [0.0, 0.0, -1.0]),
            ([4, 5, 7, 6], [0.0, 0.0, 1.0]),
            ([0, 1, 5, 4], [0.0, -1.0, 0.0]),
            ([2, 6, 7, 3], [0.0, 1.0, 0.0]),
            ([0, 4, 6, 2], [-1.0, 0.0, 0.0]),
            ([1, 3, 7, 5], [1.0, 0.0, 0.0]),
        ];
        let mut indices = Vec::with_capacity(36);
        let mut face_ranges = Vec::with_capacity(6);
        for (face_index, ([a, b, c, d], _)) in quads.iter().enumerate() {
            let start_index = indices.len() as u32;
            indices.extend_from_slice(&[*a, *b, *c, *a, *c, *d]);
            face_ranges.push(FaceRange {
                face_index: face_index as u32,
                start_index,
                end_index: indices.len() as u32,
            });
        }
        // Corner vertices are shared, so normals are averaged per corner.
        let mut normals = vec![0.0f32; 24];
        for ([a, b, c, d], n) in &quads {
            for v in [a, b, c, d] {
                for k in 0..3 {
                    normals[*v as usize * 3 + k] += n[k] / 3.0_f32.sqrt();
                }
            }
        }
        RenderMesh {
            vertices,
            normals,
            indices,
            face_ranges,
        }
    }
}

impl Default for MockKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl Kernel for MockKernel {
    fn extrude_profile(
        &mut self,
        profile: &Profile2D,
        z_base: f64,
        height: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.record(KernelOp::Extrude {
            profile: *profile,
            z_base,
            height,
        })?;
        if !profile.is_valid() {
            return Err(KernelError::ProfileFailed {
                reason: format!("degenerate profile {:?}", profile),
            });
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(KernelError::ProfileFailed {
                reason: format!("extrusion height must be positive, got {}", height),
            });
        }
        Ok(self.store(MockSolid {
            bbox: BoundingBox::of_profile(profile, z_base, z_base + height),
            fillets: Vec::new(),
        }))
    }

    fn loft_profiles(
        &mut self,
        sections: &[(Profile2D, f64)],
    ) -> Result<KernelSolidHandle, KernelError> {
        self.record(KernelOp::Loft {
            sections: sections.to_vec(),
        })?;
        if sections.len() < 2 {
            return Err(KernelError::LoftFailed {
                reason: "loft needs at least two sections".to_string(),
            });
        }
        if sections.windows(2).any(|pair| pair[1].1 <= pair[0].1) {
            return Err(KernelError::LoftFailed {
                reason: "section heights must strictly increase".to_string(),
            });
        }
        let mut bbox: Option<BoundingBox> = None;
        for (profile, z) in sections {
            if !profile.is_valid() {
                return Err(KernelError::ProfileFailed {
                    reason: format!("degenerate profile {:?}", profile),
                });
            }
            let section = BoundingBox::of_profile(profile, *z, *z);
            bbox = Some(bbox.map_or(section, |b| b.union(&section)));
        }
        let bbox = bbox.ok_or_else(|| KernelError::LoftFailed {
            reason: "no sections".to_string(),
        })?;
        Ok(self.store(MockSolid {
            bbox,
            fillets: Vec::new(),
        }))
    }

    fn boolean_union(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.record(KernelOp::Union)?;
        let solid_a = self.get(a)?.clone();
        let solid_b = self.get(b)?;
        let merged = MockSolid {
            bbox: solid_a.bbox.union(&solid_b.bbox),
            fillets: solid_a.fillets,
        };
        Ok(self.store(merged))
    }

    fn boolean_subtract(
        &mut self,
        a: &KernelSolidHandle,
        b: &KernelSolidHandle,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.record(KernelOp::Subtract)?;
        // For mock: the result keeps A's extent
        let solid_a = self.get(a)?.clone();
        self.get(b)?;
        Ok(self.store(solid_a))
    }

    fn fillet_edges(
        &mut self,
        solid: &KernelSolidHandle,
        edges: EdgeSelector,
        radius: f64,
    ) -> Result<KernelSolidHandle, KernelError> {
        self.record(KernelOp::Fillet { edges, radius })?;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(KernelError::FilletFailed {
                reason: "radius must be positive".to_string(),
            });
        }
        let mut source = self.get(solid)?.clone();
        let [w, d, h] = source.bbox.size();
        let limit = match edges {
            EdgeSelector::Vertical => w.min(d) / 2.0,
            EdgeSelector::TopPerimeter => h.min(w.min(d) / 2.0),
        };
        if radius > limit || (edges == EdgeSelector::TopPerimeter && radius >= h) {
            return Err(KernelError::FilletFailed {
                reason: format!("radius {} exceeds available material ({})", radius, limit),
            });
        }
        if source.fillets.contains(&edges) {
            return Err(KernelError::FilletFailed {
                reason: format!("{} already rounded", edges),
            });
        }
        if edges == EdgeSelector::Vertical && source.fillets.contains(&EdgeSelector::TopPerimeter)
        {
            return Err(KernelError::FilletFailed {
                reason: "vertical edges must be rounded before the top perimeter".to_string(),
            });
        }
        source.fillets.push(edges);
        Ok(self.store(source))
    }

    fn tessellate(
        &mut self,
        solid: &KernelSolidHandle,
        _tolerance: f64,
    ) -> Result<RenderMesh, KernelError> {
        self.record(KernelOp::Tessellate)?;
        let s = self.get(solid)?;
        Ok(Self::tessellate_box(&s.bbox))
    }

    fn release(&mut self, solid: KernelSolidHandle) {
        self.solids.remove(&solid.id());
    }
}

impl KernelIntrospect for MockKernel {
    fn bounding_box(&self, solid: &KernelSolidHandle) -> Option<BoundingBox> {
        self.solids.get(&solid.id()).map(|s| s.bbox)
    }

    fn shell_count(&self, solid: &KernelSolidHandle) -> usize {
        usize::from(self.solids.contains_key(&solid.id()))
    }

    fn live_solids(&self) -> usize {
        self.solids.len()
    }
}
