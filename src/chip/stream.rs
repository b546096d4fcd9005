//! Stream register file decode.
//!
//! Each tensix core carries up to 64 stream engines, each with its own 4KB
//! register window. The register file is moded: which fields exist depends on
//! four gate flags in register 10 (remote source, remote receiver, local
//! sources connected, and, under remote receiver, multicast enable). The
//! decode here reads the gates first and only then touches the fields they
//! legalize, so a [`StreamRegs`] can never hold a field the hardware did not
//! define for the current mode.

use num_derive::FromPrimitive;
use num_traits::FromPrimitive as _;

use super::{stream_reg_addr, AccessError, Arch, DeviceId, NocId, RegisterPort, STREAMS_PER_CORE};

/// Identity of one hardware stream engine. `x`/`y` are NOC0 coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StreamLocation {
    pub device: DeviceId,
    pub x: u8,
    pub y: u8,
    pub stream_id: u8,
}

impl StreamLocation {
    pub fn new(device: DeviceId, x: u8, y: u8, stream_id: u8) -> Option<Self> {
        if stream_id >= STREAMS_PER_CORE {
            return None;
        }
        Some(StreamLocation {
            device,
            x,
            y,
            stream_id,
        })
    }
}

impl std::fmt::Display for StreamLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "device {} core {}-{} stream {}",
            self.device, self.x, self.y, self.stream_id
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FieldFormat {
    Dec,
    Hex,
    Hex08,
}

/// Rendering hints for the presentation layer, keyed by field name. Anything
/// not listed renders as plain decimal.
const FIELD_FORMATS: &[(&str, FieldFormat)] = &[
    ("PHASE_AUTO_CFG_PTR", FieldFormat::Hex),
    ("NEXT_MSG_ADDR", FieldFormat::Hex),
    ("NEXT_MSG_SIZE", FieldFormat::Hex),
    ("BUF_START", FieldFormat::Hex),
    ("BUF_SIZE", FieldFormat::Hex),
    ("BUF_RD_PTR", FieldFormat::Hex),
    ("BUF_WR_PTR", FieldFormat::Hex),
    ("MSG_INFO_PTR", FieldFormat::Hex),
    ("MSG_INFO_WR_PTR", FieldFormat::Hex),
    ("REMOTE_DEST_BUF_START", FieldFormat::Hex),
    ("REMOTE_DEST_BUF_SIZE", FieldFormat::Hex),
    ("REMOTE_DEST_BUF_WR_PTR", FieldFormat::Hex),
    ("REMOTE_DEST_MSG_INFO_WR_PTR", FieldFormat::Hex),
    ("LOCAL_SRC_MASK", FieldFormat::Hex),
    ("SCRATCH_REG", FieldFormat::Hex08),
    ("DEBUG_STATUS", FieldFormat::Hex08),
];

fn field_format(name: &str) -> FieldFormat {
    for (n, f) in FIELD_FORMATS {
        if *n == name {
            return *f;
        }
    }
    FieldFormat::Dec
}

/// One decoded register field: where it came from and what it held.
#[derive(Clone, Copy, Debug)]
pub struct RegisterField {
    pub name: &'static str,
    pub reg_index: u32,
    pub offset: u32,
    pub width: u32,
    pub value: u64,
    pub format: FieldFormat,
}

impl RegisterField {
    pub fn bit(&self) -> bool {
        self.value != 0
    }

    pub fn render(&self) -> String {
        match self.format {
            FieldFormat::Dec => format!("{}", self.value),
            FieldFormat::Hex => format!("{:#x}", self.value),
            FieldFormat::Hex08 => format!("{:#010x}", self.value),
        }
    }
}

struct FieldReader<'a, P: RegisterPort + ?Sized> {
    port: &'a mut P,
    loc: StreamLocation,
}

impl<P: RegisterPort + ?Sized> FieldReader<'_, P> {
    fn word(&mut self, reg_index: u32) -> Result<u32, AccessError> {
        self.port.read32(
            self.loc.device,
            NocId::Noc0,
            self.loc.x,
            self.loc.y,
            stream_reg_addr(self.loc.stream_id, reg_index),
        )
    }

    fn field(
        &mut self,
        name: &'static str,
        reg_index: u32,
        offset: u32,
        width: u32,
    ) -> Result<RegisterField, AccessError> {
        let raw = self.word(reg_index)?;
        let mask = if width >= 32 {
            u32::MAX
        } else {
            (1u32 << width) - 1
        };

        Ok(RegisterField {
            name,
            reg_index,
            offset,
            width,
            value: ((raw >> offset) & mask) as u64,
            format: field_format(name),
        })
    }

    /// 64-bit field assembled from two consecutive registers, low word first.
    fn field64(&mut self, name: &'static str, reg_index: u32) -> Result<RegisterField, AccessError> {
        let lo = self.word(reg_index)? as u64;
        let hi = self.word(reg_index + 1)? as u64;

        Ok(RegisterField {
            name,
            reg_index,
            offset: 0,
            width: 64,
            value: (hi << 32) | lo,
            format: field_format(name),
        })
    }
}

/// Fields present when the stream receives from another core.
#[derive(Clone, Debug)]
pub struct RemoteSource {
    pub incoming_data_noc: RegisterField,
    pub x: RegisterField,
    pub y: RegisterField,
    pub stream_id: RegisterField,
    pub update_noc: RegisterField,
    pub phase: RegisterField,
    pub dest_index: RegisterField,
    pub is_mcast: RegisterField,
}

/// Multicast group fields, present only under `MCAST_EN`.
#[derive(Clone, Debug)]
pub struct Multicast {
    pub end_x: RegisterField,
    pub end_y: RegisterField,
    pub linked: RegisterField,
    pub vc: RegisterField,
    pub dest_num: RegisterField,
}

/// Fields present when the stream sends to another core.
#[derive(Clone, Debug)]
pub struct RemoteDest {
    pub x: RegisterField,
    pub y: RegisterField,
    pub stream_id: RegisterField,
    pub buf_start: RegisterField,
    pub buf_size: RegisterField,
    pub buf_wr_ptr: RegisterField,
    pub msg_info_wr_ptr: RegisterField,
    pub no_flow_ctrl: RegisterField,
    pub mcast_en: RegisterField,
    pub mcast: Option<Multicast>,
    /// Credit counters for the destination buffers; length is 1, or the
    /// architecture's multicast fan-out when `MCAST_EN` is set.
    pub buf_space_available: Vec<RegisterField>,
}

/// Arbitration fields of a stream gathering from other streams on its own core.
#[derive(Clone, Debug)]
pub struct LocalSources {
    pub src_mask: RegisterField,
    pub msg_arb_group_size: RegisterField,
    pub msg_src_in_order_fwd: RegisterField,
    pub in_order_fwd_num_msgs: RegisterField,
}

/// L1 buffer geometry of a stream backed by local memory.
#[derive(Clone, Debug)]
pub struct LocalBuffer {
    pub buf_start: RegisterField,
    pub buf_size: RegisterField,
    pub buf_rd_ptr: RegisterField,
    pub buf_wr_ptr: RegisterField,
    pub msg_info_ptr: RegisterField,
    pub msg_info_wr_ptr: RegisterField,
    pub buf_space_available: RegisterField,
    pub no_flow_ctrl: RegisterField,
    pub unicast_vc: RegisterField,
    pub reg_update_vc: RegisterField,
}

/// The two local-side modes are mutually exclusive in hardware; modeling them
/// as an enum keeps the "never both populated" invariant out of runtime checks.
#[derive(Clone, Debug)]
pub enum LocalRoute {
    Sources(LocalSources),
    Buffer(LocalBuffer),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum PhaseState {
    Start = 0,
    AutoConfig = 1,
    AutoConfigSent = 2,
    AdvanceWait = 3,
    PrevDataFlushWait = 4,
    FwdData = 5,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum SrcState {
    Idle = 0,
    Remote = 1,
    Local = 2,
    Endpoint = 3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum DestState {
    Idle = 0,
    Remote = 1,
    LocalRdyWait = 2,
    LocalHs = 3,
    Local = 4,
    Endpoint = 5,
    NoFwd = 6,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum SrcReadyState {
    Idle = 0,
    SendFirst = 1,
    WaitData = 2,
    SendSecond = 3,
    FwdData = 4,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, FromPrimitive)]
pub enum DestReadyState {
    Idle = 0,
    SendFirst = 1,
    WaitData = 2,
    SendSecond = 3,
    FwdData = 4,
}

/// DEBUG_STATUS[8] broken into its packed state machines (wormhole only).
#[derive(Clone, Debug)]
pub struct DebugState {
    pub phase_state: RegisterField,
    pub src_ready_state: RegisterField,
    pub dest_ready_state: RegisterField,
    pub src_side_phase_complete: RegisterField,
    pub dest_side_phase_complete: RegisterField,
    pub src_state: RegisterField,
    pub dest_state: RegisterField,
}

impl DebugState {
    pub fn phase_state(&self) -> Option<PhaseState> {
        PhaseState::from_u64(self.phase_state.value)
    }

    pub fn src_state(&self) -> Option<SrcState> {
        SrcState::from_u64(self.src_state.value)
    }

    pub fn dest_state(&self) -> Option<DestState> {
        DestState::from_u64(self.dest_state.value)
    }

    pub fn src_ready_state(&self) -> Option<SrcReadyState> {
        SrcReadyState::from_u64(self.src_ready_state.value)
    }

    pub fn dest_ready_state(&self) -> Option<DestReadyState> {
        DestReadyState::from_u64(self.dest_ready_state.value)
    }
}

/// One complete decode of a stream's register file. Immutable once built;
/// every poll builds a fresh one.
#[derive(Clone, Debug)]
pub struct StreamRegs {
    pub loc: StreamLocation,

    pub stream_id: RegisterField,
    pub phase_auto_cfg_ptr: RegisterField,
    pub curr_phase: RegisterField,
    pub msgs_remaining: RegisterField,
    pub msgs_received: RegisterField,
    pub next_msg_addr: RegisterField,
    pub next_msg_size: RegisterField,
    pub outgoing_data_noc: RegisterField,
    pub local_sources_connected: RegisterField,
    pub source_endpoint: RegisterField,
    pub remote_source: RegisterField,
    pub receiver_endpoint: RegisterField,
    pub local_receiver: RegisterField,
    pub remote_receiver: RegisterField,
    pub next_phase_src_change: RegisterField,
    pub next_phase_dst_change: RegisterField,

    pub source: Option<RemoteSource>,
    pub dest: Option<RemoteDest>,
    pub local: LocalRoute,

    pub scratch: [RegisterField; 6],
    pub debug_status: [RegisterField; 10],
    pub debug_state: Option<DebugState>,
}

/// Sentinel in DEBUG_STATUS[7] low bits for a stream with nothing to do.
const IDLE_SENTINEL: u64 = 0xC00;

/// Hang signatures in the low bits of DEBUG_STATUS[2].
const HANG_SENTINELS: [u64; 2] = [0x4, 0x2];

/// Bits of the phase counter below the epoch id.
const EPOCH_SHIFT: u32 = 10;

impl StreamRegs {
    pub fn is_configured(&self) -> bool {
        self.curr_phase.value > 0
    }

    pub fn is_active(&self) -> bool {
        self.is_configured() && self.msgs_received.value > 0
    }

    pub fn is_idle(&self) -> bool {
        self.debug_status[7].value & 0xFFF == IDLE_SENTINEL
    }

    pub fn is_bad(&self) -> bool {
        self.debug_status[1].value != 0
            || HANG_SENTINELS.contains(&(self.debug_status[2].value & 0x7))
    }

    /// Logical epoch the stream was configured in, taken from the high bits
    /// of the phase counter.
    pub fn epoch(&self) -> u64 {
        self.curr_phase.value >> EPOCH_SHIFT
    }

    /// All present fields, in decode order, rendered for display.
    pub fn render(&self) -> Vec<(String, String)> {
        let mut rows = Vec::new();

        let base = [
            &self.stream_id,
            &self.phase_auto_cfg_ptr,
            &self.curr_phase,
            &self.msgs_remaining,
            &self.msgs_received,
            &self.next_msg_addr,
            &self.next_msg_size,
            &self.outgoing_data_noc,
            &self.local_sources_connected,
            &self.source_endpoint,
            &self.remote_source,
            &self.receiver_endpoint,
            &self.local_receiver,
            &self.remote_receiver,
            &self.next_phase_src_change,
            &self.next_phase_dst_change,
        ];
        for field in base {
            rows.push((field.name.to_string(), field.render()));
        }

        if let Some(source) = &self.source {
            for field in [
                &source.incoming_data_noc,
                &source.x,
                &source.y,
                &source.stream_id,
                &source.update_noc,
                &source.phase,
                &source.dest_index,
                &source.is_mcast,
            ] {
                rows.push((field.name.to_string(), field.render()));
            }
        }

        if let Some(dest) = &self.dest {
            for field in [
                &dest.x,
                &dest.y,
                &dest.stream_id,
                &dest.buf_start,
                &dest.buf_size,
                &dest.buf_wr_ptr,
                &dest.msg_info_wr_ptr,
                &dest.no_flow_ctrl,
                &dest.mcast_en,
            ] {
                rows.push((field.name.to_string(), field.render()));
            }
            if let Some(mcast) = &dest.mcast {
                for field in [
                    &mcast.end_x,
                    &mcast.end_y,
                    &mcast.linked,
                    &mcast.vc,
                    &mcast.dest_num,
                ] {
                    rows.push((field.name.to_string(), field.render()));
                }
            }
            for (i, field) in dest.buf_space_available.iter().enumerate() {
                rows.push((format!("DEST_BUF_SPACE_AVAILABLE[{i}]"), field.render()));
            }
        }

        match &self.local {
            LocalRoute::Sources(sources) => {
                for field in [
                    &sources.src_mask,
                    &sources.msg_arb_group_size,
                    &sources.msg_src_in_order_fwd,
                    &sources.in_order_fwd_num_msgs,
                ] {
                    rows.push((field.name.to_string(), field.render()));
                }
            }
            LocalRoute::Buffer(buffer) => {
                for field in [
                    &buffer.buf_start,
                    &buffer.buf_size,
                    &buffer.buf_rd_ptr,
                    &buffer.buf_wr_ptr,
                    &buffer.msg_info_ptr,
                    &buffer.msg_info_wr_ptr,
                    &buffer.buf_space_available,
                    &buffer.no_flow_ctrl,
                    &buffer.unicast_vc,
                    &buffer.reg_update_vc,
                ] {
                    rows.push((field.name.to_string(), field.render()));
                }
            }
        }

        for (i, field) in self.scratch.iter().enumerate() {
            rows.push((format!("SCRATCH_REG{i}"), field.render()));
        }
        for (i, field) in self.debug_status.iter().enumerate() {
            rows.push((format!("DEBUG_STATUS[{i}]"), field.render()));
        }

        if let Some(state) = &self.debug_state {
            for field in [
                &state.phase_state,
                &state.src_ready_state,
                &state.dest_ready_state,
                &state.src_side_phase_complete,
                &state.dest_side_phase_complete,
                &state.src_state,
                &state.dest_state,
            ] {
                rows.push((field.name.to_string(), field.render()));
            }
        }

        rows
    }
}

/// Decode the full register file of one stream. The gate flags are read
/// first; every later read is legalized by a gate value already in hand, so
/// the decode never touches a register the current mode leaves undefined.
pub fn read_stream_regs<P: RegisterPort + ?Sized>(
    port: &mut P,
    arch: Arch,
    loc: StreamLocation,
) -> Result<StreamRegs, AccessError> {
    let mut r = FieldReader { port, loc };

    let stream_id = r.field("STREAM_ID", 224 + 5, 24, 6)?;
    let phase_auto_cfg_ptr = r.field("PHASE_AUTO_CFG_PTR", 12, 0, 24)?;
    let curr_phase = r.field("CURR_PHASE", 11, 0, 20)?;
    let msgs_remaining = r.field("CURR_PHASE_NUM_MSGS_REMAINING", 36, 12, 12)?;
    let msgs_received = r.field("NUM_MSGS_RECEIVED", 224 + 5, 0, 24)?;
    let next_msg_addr = r.field("NEXT_MSG_ADDR", 224 + 6, 0, 32)?;
    let next_msg_size = r.field("NEXT_MSG_SIZE", 224 + 7, 0, 32)?;

    let outgoing_data_noc = r.field("OUTGOING_DATA_NOC", 10, 1, 1)?;
    let local_sources_connected = r.field("LOCAL_SOURCES_CONNECTED", 10, 3, 1)?;
    let source_endpoint = r.field("SOURCE_ENDPOINT", 10, 4, 1)?;
    let remote_source = r.field("REMOTE_SOURCE", 10, 5, 1)?;
    let receiver_endpoint = r.field("RECEIVER_ENDPOINT", 10, 6, 1)?;
    let local_receiver = r.field("LOCAL_RECEIVER", 10, 7, 1)?;
    let remote_receiver = r.field("REMOTE_RECEIVER", 10, 8, 1)?;
    let next_phase_src_change = r.field("NEXT_PHASE_SRC_CHANGE", 10, 12, 1)?;
    let next_phase_dst_change = r.field("NEXT_PHASE_DST_CHANGE", 10, 13, 1)?;

    let source = if remote_source.bit() {
        Some(RemoteSource {
            incoming_data_noc: r.field("INCOMING_DATA_NOC", 10, 0, 1)?,
            x: r.field("REMOTE_SRC_X", 0, 0, 6)?,
            y: r.field("REMOTE_SRC_Y", 0, 6, 6)?,
            stream_id: r.field("REMOTE_SRC_STREAM_ID", 0, 12, 6)?,
            update_noc: r.field("REMOTE_SRC_UPDATE_NOC", 10, 2, 1)?,
            phase: r.field("REMOTE_SRC_PHASE", 1, 0, 20)?,
            dest_index: r.field("REMOTE_SRC_DEST_INDEX", 0, 18, 6)?,
            is_mcast: r.field("REMOTE_SRC_IS_MCAST", 10, 16, 1)?,
        })
    } else {
        None
    };

    let dest = if remote_receiver.bit() {
        let x = r.field("REMOTE_DEST_X", 2, 0, 6)?;
        let y = r.field("REMOTE_DEST_Y", 2, 6, 6)?;
        let dest_stream_id = r.field("REMOTE_DEST_STREAM_ID", 2, 12, 6)?;
        let buf_start = r.field("REMOTE_DEST_BUF_START", 3, 0, 16)?;
        let buf_size = r.field("REMOTE_DEST_BUF_SIZE", 4, 0, 16)?;
        let buf_wr_ptr = r.field("REMOTE_DEST_BUF_WR_PTR", 5, 0, 16)?;
        let msg_info_wr_ptr = r.field("REMOTE_DEST_MSG_INFO_WR_PTR", 9, 0, 16)?;
        let no_flow_ctrl = r.field("DEST_DATA_BUF_NO_FLOW_CTRL", 10, 15, 1)?;
        let mcast_en = r.field("MCAST_EN", 13, 12, 1)?;

        let (mcast, credit_count) = if mcast_en.bit() {
            let mcast = Multicast {
                end_x: r.field("MCAST_END_X", 13, 0, 6)?,
                end_y: r.field("MCAST_END_Y", 13, 6, 6)?,
                linked: r.field("MCAST_LINKED", 13, 13, 1)?,
                vc: r.field("MCAST_VC", 13, 14, 1)?,
                dest_num: r.field("MCAST_DEST_NUM", 14, 0, 16)?,
            };
            (Some(mcast), arch.mcast_credit_count())
        } else {
            (None, 1)
        };

        let mut buf_space_available = Vec::with_capacity(credit_count as usize);
        for i in 0..credit_count {
            buf_space_available.push(r.field("DEST_BUF_SPACE_AVAILABLE", 64 + i, 0, 32)?);
        }

        Some(RemoteDest {
            x,
            y,
            stream_id: dest_stream_id,
            buf_start,
            buf_size,
            buf_wr_ptr,
            msg_info_wr_ptr,
            no_flow_ctrl,
            mcast_en,
            mcast,
            buf_space_available,
        })
    } else {
        None
    };

    let local = if local_sources_connected.bit() {
        LocalRoute::Sources(LocalSources {
            src_mask: r.field64("LOCAL_SRC_MASK", 48)?,
            msg_arb_group_size: r.field("MSG_ARB_GROUP_SIZE", 15, 0, 3)?,
            msg_src_in_order_fwd: r.field("MSG_SRC_IN_ORDER_FWD", 15, 3, 1)?,
            in_order_fwd_num_msgs: r.field("MSG_SRC_IN_ORDER_FWD_NUM_MSGS", 16, 0, 24)?,
        })
    } else {
        LocalRoute::Buffer(LocalBuffer {
            buf_start: r.field("BUF_START", 6, 0, 16)?,
            buf_size: r.field("BUF_SIZE", 7, 0, 16)?,
            buf_rd_ptr: r.field("BUF_RD_PTR", 24, 0, 16)?,
            buf_wr_ptr: r.field("BUF_WR_PTR", 25, 0, 16)?,
            msg_info_ptr: r.field("MSG_INFO_PTR", 8, 0, 16)?,
            msg_info_wr_ptr: r.field("MSG_INFO_WR_PTR", 26, 0, 16)?,
            buf_space_available: r.field("BUF_SPACE_AVAILABLE", 28, 0, 16)?,
            no_flow_ctrl: r.field("DATA_BUF_NO_FLOW_CTRL", 10, 14, 1)?,
            unicast_vc: r.field("UNICAST_VC_REG", 10, 18, 3)?,
            reg_update_vc: r.field("REG_UPDATE_VC_REG", 10, 21, 3)?,
        })
    };

    let scratch = [
        r.field("SCRATCH_REG", 248, 0, 32)?,
        r.field("SCRATCH_REG", 249, 0, 32)?,
        r.field("SCRATCH_REG", 250, 0, 32)?,
        r.field("SCRATCH_REG", 251, 0, 32)?,
        r.field("SCRATCH_REG", 252, 0, 32)?,
        r.field("SCRATCH_REG", 253, 0, 32)?,
    ];

    let mut debug_status = Vec::with_capacity(10);
    for i in 0..10 {
        debug_status.push(r.field("DEBUG_STATUS", 224 + i, 0, 32)?);
    }
    let debug_status: [RegisterField; 10] = debug_status
        .try_into()
        .unwrap_or_else(|_| unreachable!("exactly 10 debug status registers"));

    let debug_state = if arch.has_debug_state() {
        Some(DebugState {
            phase_state: r.field("PHASE_STATE", 224 + 8, 0, 4)?,
            src_ready_state: r.field("SRC_READY_STATE", 224 + 8, 4, 3)?,
            dest_ready_state: r.field("DEST_READY_STATE", 224 + 8, 7, 3)?,
            src_side_phase_complete: r.field("SRC_SIDE_PHASE_COMPLETE", 224 + 8, 10, 1)?,
            dest_side_phase_complete: r.field("DEST_SIDE_PHASE_COMPLETE", 224 + 8, 11, 1)?,
            src_state: r.field("SRC_STATE", 224 + 8, 16, 4)?,
            dest_state: r.field("DEST_STATE", 224 + 8, 20, 3)?,
        })
    } else {
        None
    };

    Ok(StreamRegs {
        loc,
        stream_id,
        phase_auto_cfg_ptr,
        curr_phase,
        msgs_remaining,
        msgs_received,
        next_msg_addr,
        next_msg_size,
        outgoing_data_noc,
        local_sources_connected,
        source_endpoint,
        remote_source,
        receiver_endpoint,
        local_receiver,
        remote_receiver,
        next_phase_src_change,
        next_phase_dst_change,
        source,
        dest,
        local,
        scratch,
        debug_status,
        debug_state,
    })
}

/// Kernel operand role of a stream, by id range. Mirrors the firmware's
/// operand mapping scheme.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StreamKind {
    Unknown,
    Input,
    Param,
    Output,
    Intermediate,
    Relay,
}

impl std::fmt::Display for StreamKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            StreamKind::Unknown => "??",
            StreamKind::Input => "input",
            StreamKind::Param => "param",
            StreamKind::Output => "output",
            StreamKind::Intermediate => "intermediate",
            StreamKind::Relay => "op-relay",
        };
        write!(f, "{name}")
    }
}

pub fn stream_kind(stream_id: u8) -> StreamKind {
    match stream_id {
        0..=7 => StreamKind::Unknown,
        8..=15 => StreamKind::Input,
        16..=23 => StreamKind::Param,
        24..=31 => StreamKind::Output,
        32..=39 => StreamKind::Intermediate,
        _ => StreamKind::Relay,
    }
}
