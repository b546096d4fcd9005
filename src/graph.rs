//! In-memory model of the compile-time dataflow graph: ops placed on the
//! logical grid, the buffers they own, and the pipes routing between buffers.
//!
//! The model is built from externally parsed configuration (the netlist,
//! pipegen and blob outputs of a compile) and is read-only afterwards.
//! Buffers and pipes reference each other by integer id only; the pipe table
//! is a general bipartite graph over buffers and may contain cycles, which
//! the traversal in [`crate::analyzer`] tolerates.

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::chip::DeviceId;

pub type BufferId = u64;
pub type PipeId = u64;
pub type EpochId = u32;

/// Logical (row, column) cell on the op grid.
pub type RcCoord = (u8, u8);

/// Pseudo-core that DRAM-resident buffers are attributed to. Not a real grid
/// cell; traversal never expands through it.
pub const DRAM_CORE: RcCoord = (255, 255);

#[derive(Clone, Debug, Deserialize)]
pub struct Buffer {
    pub id: BufferId,
    /// Owning core, or [`DRAM_CORE`] for device-external storage.
    pub core: RcCoord,
    /// Name of the op this buffer was generated for.
    pub op_name: String,
    #[serde(default)]
    pub dram_buf_flag: bool,
    #[serde(default)]
    pub dram_io_flag: bool,
    /// Set when the queue lives in host memory rather than device DRAM.
    #[serde(default)]
    pub dram_io_flag_is_remote: bool,
    #[serde(default)]
    pub dram_chan: u8,
    #[serde(default)]
    pub dram_addr: u64,
    pub q_slots: u32,
    pub size_tiles: u32,
    pub tile_size: u32,
}

impl Buffer {
    pub fn is_dram_resident(&self) -> bool {
        self.core == DRAM_CORE || self.dram_buf_flag || self.dram_io_flag
    }

    /// A queue in device DRAM with live read/write pointers.
    pub fn is_dram_queue(&self) -> bool {
        (self.dram_buf_flag || self.dram_io_flag) && !self.dram_io_flag_is_remote
    }

    pub fn is_host_queue(&self) -> bool {
        self.dram_io_flag_is_remote
    }

    pub fn slot_size_bytes(&self) -> u64 {
        self.size_tiles as u64 * self.tile_size as u64
    }

    pub fn queue_size_bytes(&self) -> u64 {
        self.slot_size_bytes() * self.q_slots as u64
    }
}

/// Static routing rule: every message entering through `inputs` leaves
/// through `outputs`. Many-to-many; a buffer may appear in any number of
/// pipes on either side.
#[derive(Clone, Debug, Deserialize)]
pub struct Pipe {
    pub id: PipeId,
    pub inputs: Vec<BufferId>,
    pub outputs: Vec<BufferId>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct Op {
    pub op_type: String,
    /// Grid origin (row, column).
    pub grid_loc: RcCoord,
    pub grid_rows: u8,
    pub grid_cols: u8,
    #[serde(default)]
    pub inputs: Vec<String>,
}

impl Op {
    pub fn contains(&self, rc: RcCoord) -> bool {
        let (r0, c0) = self.grid_loc;
        rc.0 >= r0 && rc.0 < r0 + self.grid_rows && rc.1 >= c0 && rc.1 < c0 + self.grid_cols
    }

    pub fn locations(&self) -> impl Iterator<Item = RcCoord> + '_ {
        let (r0, c0) = self.grid_loc;
        (0..self.grid_rows)
            .flat_map(move |r| (0..self.grid_cols).map(move |c| (r0 + r, c0 + c)))
    }
}

/// Binding of one stream in one phase to its L1 message buffer.
#[derive(Clone, Debug, Deserialize)]
pub struct StreamBinding {
    pub device: DeviceId,
    pub x: u8,
    pub y: u8,
    pub stream_id: u8,
    pub phase: u64,
    pub buf_addr: u64,
    pub buf_size: u64,
    pub msg_size: u64,
    #[serde(default)]
    pub pipe_id: Option<PipeId>,
}

/// The ops active in one epoch on one device, with their buffer and pipe
/// tables and the per-phase stream bindings.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Graph {
    pub name: String,
    pub epoch_id: EpochId,
    pub target_device: DeviceId,
    pub ops: BTreeMap<String, Op>,
    pub buffers: BTreeMap<BufferId, Buffer>,
    pub pipes: BTreeMap<PipeId, Pipe>,
    #[serde(default)]
    pub bindings: Vec<StreamBinding>,
}

impl Graph {
    pub fn buffer(&self, id: BufferId) -> Option<&Buffer> {
        self.buffers.get(&id)
    }

    pub fn pipe(&self, id: PipeId) -> Option<&Pipe> {
        self.pipes.get(&id)
    }

    /// Op occupying a grid cell, if any.
    pub fn op_at(&self, rc: RcCoord) -> Option<(&str, &Op)> {
        self.ops
            .iter()
            .find(|(_, op)| op.contains(rc))
            .map(|(name, op)| (name.as_str(), op))
    }

    pub fn core_of_buffer(&self, id: BufferId) -> Option<RcCoord> {
        self.buffer(id).map(|b| b.core)
    }

    pub fn buffers_on_core(&self, rc: RcCoord) -> Vec<BufferId> {
        self.buffers
            .values()
            .filter(|b| b.core == rc)
            .map(|b| b.id)
            .collect()
    }

    /// Pipes with `id` on their input side (the buffer feeds them).
    pub fn pipes_reading(&self, id: BufferId) -> impl Iterator<Item = &Pipe> {
        self.pipes.values().filter(move |p| p.inputs.contains(&id))
    }

    /// Pipes with `id` on their output side (they fill the buffer).
    pub fn pipes_writing(&self, id: BufferId) -> impl Iterator<Item = &Pipe> {
        self.pipes.values().filter(move |p| p.outputs.contains(&id))
    }

    /// L1 binding of a stream in a phase. `None` means the compile produced
    /// no binding; callers must treat that as missing data, never as zero.
    pub fn l1_binding(
        &self,
        device: DeviceId,
        x: u8,
        y: u8,
        stream_id: u8,
        phase: u64,
    ) -> Option<&StreamBinding> {
        self.bindings.iter().find(|b| {
            b.device == device
                && b.x == x
                && b.y == y
                && b.stream_id == stream_id
                && b.phase == phase
        })
    }

    pub fn dram_queue_buffers(&self) -> impl Iterator<Item = &Buffer> {
        self.buffers.values().filter(|b| b.is_dram_queue())
    }

    pub fn host_queue_buffers(&self) -> impl Iterator<Item = &Buffer> {
        self.buffers.values().filter(|b| b.is_host_queue())
    }
}

/// All epochs of one compiled run.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct Netlist {
    pub graphs: Vec<Graph>,
}

impl Netlist {
    pub fn epoch_ids(&self) -> Vec<EpochId> {
        let mut ids: Vec<EpochId> = self.graphs.iter().map(|g| g.epoch_id).collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }

    pub fn graph(&self, epoch_id: EpochId) -> Option<&Graph> {
        self.graphs.iter().find(|g| g.epoch_id == epoch_id)
    }

    /// Every (epoch, pipe) referencing a buffer, for cross-epoch lookups.
    pub fn pipes_touching(&self, id: BufferId) -> Vec<(EpochId, PipeId)> {
        let mut out = Vec::new();
        for graph in &self.graphs {
            for pipe in graph.pipes.values() {
                if pipe.inputs.contains(&id) || pipe.outputs.contains(&id) {
                    out.push((graph.epoch_id, pipe.id));
                }
            }
        }
        out
    }
}
