use crate::block_state::BlockState;
use crate::error::{Error, Result};
use crate::vector::Vector;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

/// Dense block-state storage for one chunk volume.
///
/// Cells index into a shared palette, so a volume that is mostly one
/// material stays cheap to hold and serialize. A fresh volume is entirely
/// air.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VolumeData {
    size: Vector,
    palette: Vec<BlockState>,
    cells: Vec<u32>,
    #[serde(skip, default = "FxHashMap::default")]
    palette_index: FxHashMap<BlockState, u32>,
}

impl VolumeData {
    pub fn new(size: Vector) -> Self {
        let volume = size.volume().max(0) as usize;
        let air = BlockState::air();
        let mut palette_index = FxHashMap::default();
        palette_index.insert(air.clone(), 0);
        VolumeData {
            size,
            palette: vec![air],
            cells: vec![0; volume],
            palette_index,
        }
    }

    pub fn size(&self) -> Vector {
        self.size
    }

    pub fn get(&self, v: Vector) -> Result<&BlockState> {
        let index = self.cell_index(v)?;
        Ok(&self.palette[self.cells[index] as usize])
    }

    pub fn set(&mut self, v: Vector, state: BlockState) -> Result<()> {
        let index = self.cell_index(v)?;
        let palette_id = self.get_or_insert_in_palette(state);
        self.cells[index] = palette_id;
        Ok(())
    }

    /// Recompute the palette lookup table. Needed after deserialization,
    /// where the table is skipped.
    pub(crate) fn rebuild_palette_index(&mut self) {
        self.palette_index = FxHashMap::default();
        self.palette_index.reserve(self.palette.len());
        for (index, block) in self.palette.iter().enumerate() {
            self.palette_index.insert(block.clone(), index as u32);
        }
    }

    fn get_or_insert_in_palette(&mut self, block: BlockState) -> u32 {
        match self.palette_index.get(&block) {
            Some(&index) => index,
            None => {
                let index = self.palette.len() as u32;
                self.palette.push(block.clone());
                self.palette_index.insert(block, index);
                index
            }
        }
    }

    fn cell_index(&self, v: Vector) -> Result<usize> {
        let (x, y, z) = (v.x(), v.y(), v.z());
        if x < 0 || x >= self.size.x() || y < 0 || y >= self.size.y() || z < 0 || z >= self.size.z()
        {
            return Err(Error::IndexOutOfRange {
                x,
                y,
                z,
                size: self.size.to_string(),
            });
        }
        Ok((x + z * self.size.x() + y * self.size.x() * self.size.z()) as usize)
    }
}
