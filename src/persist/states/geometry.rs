use glam::Vec3;

use crate::errors::Result;
use crate::persist::codec::{SceneReader, SceneWriter};
use crate::persist::controller::{BuildContext, ReadSession, WriteSession};
use crate::persist::states::NodeState;
use crate::persist::symbols::LiveRef;
use crate::scene::{Geometry, Universe};

/// State record for shared geometry components.
///
/// Geometry has no cross-references, so `build` is a no-op; everything is
/// carried as constructor parameters. All arrays are length-prefixed and
/// may be empty.
#[derive(Default)]
pub(crate) struct GeometryState {
    positions: Vec<Vec3>,
    normals: Vec<Vec3>,
    indices: Vec<u32>,
}

impl GeometryState {
    pub fn capture(geometry: &Geometry) -> Self {
        Self {
            positions: geometry.positions.clone(),
            normals: geometry.normals.clone(),
            indices: geometry.indices.clone(),
        }
    }

    pub fn blank() -> Self {
        Self::default()
    }
}

impl NodeState for GeometryState {
    fn write_params(&self, w: &mut SceneWriter<'_>, _sess: &mut WriteSession<'_>) -> Result<()> {
        w.write_len(self.positions.len())?;
        for &p in &self.positions {
            w.write_vec3(p)?;
        }
        w.write_len(self.normals.len())?;
        for &n in &self.normals {
            w.write_vec3(n)?;
        }
        w.write_len(self.indices.len())?;
        for &i in &self.indices {
            w.write_u32(i)?;
        }
        Ok(())
    }

    fn read_params(&mut self, r: &mut SceneReader<'_>, _sess: &mut ReadSession) -> Result<()> {
        let count = r.read_len()?;
        self.positions.reserve(count.min(1 << 16));
        for _ in 0..count {
            self.positions.push(r.read_vec3()?);
        }
        let count = r.read_len()?;
        self.normals.reserve(count.min(1 << 16));
        for _ in 0..count {
            self.normals.push(r.read_vec3()?);
        }
        let count = r.read_len()?;
        self.indices.reserve(count.min(1 << 16));
        for _ in 0..count {
            self.indices.push(r.read_u32()?);
        }
        Ok(())
    }

    fn create(&self, universe: &mut Universe) -> Result<LiveRef> {
        let geometry = Geometry::new(
            self.positions.clone(),
            self.normals.clone(),
            self.indices.clone(),
        );
        Ok(LiveRef::Geometry(universe.add_geometry(geometry)))
    }

    fn build(&self, _ctx: &mut BuildContext<'_>) -> Result<()> {
        Ok(())
    }
}
