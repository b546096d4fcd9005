//! Correlation of live stream state with the dataflow graph: fan-in
//! traversal, the blocked-stream report, and queue summaries.

use std::collections::{BTreeMap, BTreeSet};

use crate::chip::coords::CoordinateMap;
use crate::chip::stream::{
    read_stream_regs, stream_kind, StreamKind, StreamLocation, StreamRegs,
};
use crate::chip::{AccessError, Arch, DeviceId, NocId, RegisterPort, STREAMS_PER_CORE};
use crate::graph::{Buffer, BufferId, Graph, RcCoord, DRAM_CORE};

/// Cap on fan-in traversal rounds. The pipe graph may legitimately contain
/// cycles; the visited set makes those converge, but a malformed graph must
/// still terminate with a partial result instead of spinning.
pub const TRAVERSAL_ITERATION_LIMIT: usize = 100;

#[derive(Debug, Clone, thiserror::Error)]
pub enum AnalyzerWarning {
    #[error(
        "fan-in traversal from {targets:?} stopped after {iterations} iterations; \
         result is partial"
    )]
    TraversalLimitExceeded {
        targets: Vec<RcCoord>,
        iterations: usize,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum AnalyzerError {
    #[error(transparent)]
    Access(#[from] AccessError),

    #[error("no stream-to-buffer binding for {loc} phase {phase}")]
    InsufficientData { loc: StreamLocation, phase: u64 },

    #[error("message id {message_id} out of range 1..={max}")]
    MessageIdOutOfRange { message_id: u64, max: u64 },

    #[error("no DRAM location for channel {channel} on {arch}")]
    UnknownDramChannel { arch: Arch, channel: u8 },
}

/// Everything upstream of a set of cores: the transitive input buffers and
/// the cores that own them.
#[derive(Debug, Default, Clone)]
pub struct FanIn {
    pub buffers: BTreeSet<BufferId>,
    pub cores: BTreeSet<RcCoord>,
    pub warnings: Vec<AnalyzerWarning>,
}

/// Walk the pipe graph against data-flow direction, breadth first, at core
/// granularity: once any buffer of a core is reached, all of that core's
/// buffers join the frontier, so an op's full input set is pulled in
/// together. DRAM pseudo-cores are never expanded.
pub fn fan_in(graph: &Graph, targets: &[RcCoord]) -> FanIn {
    let mut result = FanIn::default();

    let mut frontier: BTreeSet<BufferId> = targets
        .iter()
        .flat_map(|rc| graph.buffers_on_core(*rc))
        .collect();

    let mut iterations = 0;
    loop {
        if iterations >= TRAVERSAL_ITERATION_LIMIT {
            tracing::warn!(
                ?targets,
                iterations,
                "fan-in traversal hit iteration cap, reporting partial result"
            );
            result.warnings.push(AnalyzerWarning::TraversalLimitExceeded {
                targets: targets.to_vec(),
                iterations,
            });
            break;
        }
        iterations += 1;

        let mut direct: BTreeSet<BufferId> = BTreeSet::new();
        for pipe in graph.pipes.values() {
            if pipe.outputs.iter().any(|out| frontier.contains(out)) {
                direct.extend(pipe.inputs.iter().copied());
            }
        }

        let new: BTreeSet<BufferId> = direct
            .difference(&result.buffers)
            .copied()
            .collect();
        if new.is_empty() {
            break;
        }
        result.buffers.extend(new.iter().copied());

        let mut owner_cores = BTreeSet::new();
        for id in &new {
            if let Some(core) = graph.core_of_buffer(*id) {
                if core != DRAM_CORE {
                    owner_cores.insert(core);
                }
            }
        }
        result.cores.extend(owner_cores.iter().copied());

        frontier = owner_cores
            .iter()
            .flat_map(|rc| graph.buffers_on_core(*rc))
            .collect();
    }

    tracing::debug!(
        ?targets,
        buffers = result.buffers.len(),
        cores = result.cores.len(),
        "fan-in traversal complete"
    );

    result
}

/// A fresh decode of every requested stream on one core. Transient; a new
/// poll allocates a new value.
#[derive(Debug, Clone)]
pub struct CorePoll {
    pub device: DeviceId,
    pub noc0: (u8, u8),
    pub streams: Vec<StreamRegs>,
}

impl CorePoll {
    pub fn stream(&self, stream_id: u8) -> Option<&StreamRegs> {
        self.streams.iter().find(|s| s.loc.stream_id == stream_id)
    }

    fn has_empty_input(&self) -> bool {
        self.streams.iter().any(|s| {
            stream_kind(s.loc.stream_id) == StreamKind::Input
                && s.is_configured()
                && s.msgs_received.value == 0
        })
    }

    /// An output counts as delivered once its phase has drained: messages
    /// went out and none remain. An output stream still mid-phase has not
    /// produced anything downstream can use.
    fn has_delivered_output(&self) -> bool {
        self.streams.iter().any(|s| {
            stream_kind(s.loc.stream_id) == StreamKind::Output
                && s.is_active()
                && s.msgs_remaining.value == 0
        })
    }
}

/// Decode a subset of a core's streams.
pub fn poll_streams<P: RegisterPort + ?Sized>(
    port: &mut P,
    arch: Arch,
    device: DeviceId,
    x: u8,
    y: u8,
    stream_ids: impl IntoIterator<Item = u8>,
) -> Result<CorePoll, AccessError> {
    let mut streams = Vec::new();
    for stream_id in stream_ids {
        let loc = StreamLocation {
            device,
            x,
            y,
            stream_id,
        };
        streams.push(read_stream_regs(port, arch, loc)?);
    }

    Ok(CorePoll {
        device,
        noc0: (x, y),
        streams,
    })
}

/// Decode all 64 streams of one core.
pub fn poll_core<P: RegisterPort + ?Sized>(
    port: &mut P,
    arch: Arch,
    device: DeviceId,
    x: u8,
    y: u8,
) -> Result<CorePoll, AccessError> {
    tracing::trace!(device, x, y, "polling stream registers");
    poll_streams(port, arch, device, x, y, 0..STREAMS_PER_CORE)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamState {
    Active,
    Idle,
    Bad,
    Configured,
}

fn state_of(regs: &StreamRegs) -> StreamState {
    if regs.is_bad() {
        StreamState::Bad
    } else if regs.is_active() {
        StreamState::Active
    } else if regs.is_idle() {
        StreamState::Idle
    } else {
        StreamState::Configured
    }
}

/// One row of the blocked-stream report: an active stream plus everything a
/// reader needs to chase it upstream.
#[derive(Debug, Clone)]
pub struct StreamRow {
    pub noc0: (u8, u8),
    pub rc: RcCoord,
    pub op_name: Option<String>,
    pub stream_id: u8,
    pub kind: StreamKind,
    pub epoch: u64,
    pub phase: u64,
    pub msgs_remaining: u64,
    pub msgs_received: u64,
    pub fan_in_cores: Vec<RcCoord>,
    pub state: StreamState,
    /// Per-core hang signature: every upstream core has ready inputs but
    /// this core has produced nothing. Repeated on every row of the core;
    /// de-duplication is the presentation layer's concern.
    pub inputs_ready_no_output: bool,
}

#[derive(Debug, Default, Clone)]
pub struct BlockedStreamReport {
    pub rows: Vec<StreamRow>,
    /// Cores carrying the "inputs ready, no output" flag.
    pub flagged_cores: BTreeSet<RcCoord>,
    pub warnings: Vec<AnalyzerWarning>,
}

/// Build the blocked-stream report from a set of per-core polls. Pure over
/// its inputs; the polls are snapshots and the graph is read-only, so this
/// can be re-run or parallelized freely.
pub fn blocked_streams(
    graph: &Graph,
    coords: &CoordinateMap,
    polls: &[CorePoll],
) -> BlockedStreamReport {
    let mut report = BlockedStreamReport::default();

    // Index polls by grid cell; cores off the op grid cannot host ops and
    // are skipped rather than failing the whole report.
    let mut by_rc: BTreeMap<RcCoord, &CorePoll> = BTreeMap::new();
    for poll in polls {
        match coords.noc0_to_rc(poll.noc0.0, poll.noc0.1) {
            Ok(rc) => {
                by_rc.insert(rc, poll);
            }
            Err(err) => {
                tracing::trace!(x = poll.noc0.0, y = poll.noc0.1, %err, "skipping gridless core");
            }
        }
    }

    for (rc, poll) in &by_rc {
        let active: Vec<&StreamRegs> = poll.streams.iter().filter(|s| s.is_active()).collect();
        if active.is_empty() {
            continue;
        }

        let fan = fan_in(graph, &[*rc]);
        report.warnings.extend(fan.warnings.iter().cloned());

        // An unpolled fan-in core cannot contradict readiness; only an
        // observed empty input clears the flag.
        let inputs_ready = fan.cores.iter().all(|core| {
            by_rc
                .get(core)
                .map(|p| !p.has_empty_input())
                .unwrap_or(true)
        });
        let flagged = inputs_ready && !poll.has_delivered_output();
        if flagged {
            report.flagged_cores.insert(*rc);
        }

        let op_name = graph.op_at(*rc).map(|(name, _)| name.to_string());
        let fan_in_cores: Vec<RcCoord> = fan.cores.iter().copied().collect();

        for regs in active {
            report.rows.push(StreamRow {
                noc0: poll.noc0,
                rc: *rc,
                op_name: op_name.clone(),
                stream_id: regs.loc.stream_id,
                kind: stream_kind(regs.loc.stream_id),
                epoch: regs.epoch(),
                phase: regs.curr_phase.value,
                msgs_remaining: regs.msgs_remaining.value,
                msgs_received: regs.msgs_received.value,
                fan_in_cores: fan_in_cores.clone(),
                state: state_of(regs),
                inputs_ready_no_output: flagged,
            });
        }
    }

    report
}

/// Live occupancy of one DRAM queue.
#[derive(Debug, Clone)]
pub struct DramQueueStatus {
    pub buffer_id: BufferId,
    pub channel: u8,
    pub addr: u64,
    pub rd_ptr: u32,
    pub wr_ptr: u32,
    pub occupancy: i64,
    pub slots: u32,
    pub queue_size_bytes: u64,
}

fn queue_occupancy(rd_ptr: u32, wr_ptr: u32, slots: u32) -> i64 {
    if wr_ptr >= rd_ptr {
        (wr_ptr - rd_ptr) as i64
    } else {
        wr_ptr as i64 - (rd_ptr as i64 - slots as i64)
    }
}

/// Read the head/tail pointers of every DRAM queue in the graph and compute
/// occupancy. Pointers live in the first two words of the queue header.
pub fn dram_queue_summary<P: RegisterPort + ?Sized>(
    port: &mut P,
    arch: Arch,
    graph: &Graph,
) -> Result<Vec<DramQueueStatus>, AnalyzerError> {
    let device = graph.target_device;
    let mut out = Vec::new();

    for buffer in graph.dram_queue_buffers() {
        let (x, y) =
            arch.dram_channel_loc(buffer.dram_chan)
                .ok_or(AnalyzerError::UnknownDramChannel {
                    arch,
                    channel: buffer.dram_chan,
                })?;

        let rd_ptr = port.read32(device, NocId::Noc0, x, y, buffer.dram_addr)?;
        let wr_ptr = port.read32(device, NocId::Noc0, x, y, buffer.dram_addr + 4)?;

        out.push(DramQueueStatus {
            buffer_id: buffer.id,
            channel: buffer.dram_chan,
            addr: buffer.dram_addr,
            rd_ptr,
            wr_ptr,
            occupancy: queue_occupancy(rd_ptr, wr_ptr, buffer.q_slots),
            slots: buffer.q_slots,
            queue_size_bytes: buffer.queue_size_bytes(),
        });
    }

    Ok(out)
}

/// Host-resident queues whose address tags them as belonging to `device`.
/// Their pointers live in host memory, outside the register port's reach, so
/// only the static geometry is reported.
pub fn host_queues_for_device(graph: &Graph, device: DeviceId) -> Vec<&Buffer> {
    graph
        .host_queue_buffers()
        .filter(|b| (b.dram_addr >> 29) as DeviceId == device)
        .collect()
}

/// Fetch one message, as 32-bit words, from a stream's L1 buffer. The
/// stream's current phase selects the binding; a missing binding is reported
/// as insufficient data, never guessed at.
pub fn read_message<P: RegisterPort + ?Sized>(
    port: &mut P,
    graph: &Graph,
    loc: StreamLocation,
    message_id: u64,
) -> Result<Vec<u32>, AnalyzerError> {
    let phase_addr = crate::chip::stream_reg_addr(loc.stream_id, 11);
    let phase = (port.read32(loc.device, NocId::Noc0, loc.x, loc.y, phase_addr)? & 0xFFFFF) as u64;

    let binding = graph
        .l1_binding(loc.device, loc.x, loc.y, loc.stream_id, phase)
        .ok_or(AnalyzerError::InsufficientData { loc, phase })?;

    if binding.buf_addr == 0 || binding.buf_size == 0 || binding.msg_size == 0 {
        return Err(AnalyzerError::InsufficientData { loc, phase });
    }

    let max = binding.buf_size / binding.msg_size;
    if message_id == 0 || message_id > max {
        return Err(AnalyzerError::MessageIdOutOfRange { message_id, max });
    }

    let base = binding.buf_addr + (message_id - 1) * binding.msg_size;
    let words = binding.msg_size.div_ceil(4);

    let mut out = Vec::with_capacity(words as usize);
    for w in 0..words {
        out.push(port.read32(loc.device, NocId::Noc0, loc.x, loc.y, base + w * 4)?);
    }
    Ok(out)
}
