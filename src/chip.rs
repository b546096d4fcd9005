use std::str::FromStr;

pub mod coords;
pub mod firmware;
pub mod grayskull;
pub mod stream;
pub mod wormhole;

/// Base of the per-stream register file. Stream `s` register `i` lives at
/// `STREAM_REG_BASE + s * 0x1000 + i * 4`.
pub const STREAM_REG_BASE: u64 = 0xFFB4_0000;

/// Base of the NOC register block. Traffic counters for `noc_id` start at
/// `NOC_REG_BASE + noc_id * 0x10000 + 0x200`.
pub const NOC_REG_BASE: u64 = 0xFFB2_0000;

/// Streams per tensix core.
pub const STREAMS_PER_CORE: u8 = 64;

pub type DeviceId = u32;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum NocId {
    Noc0 = 0,
    Noc1 = 1,
}

impl std::fmt::Display for NocId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "noc{}", *self as u8)
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown architecture '{0}'")]
pub struct UnknownArchitecture(pub String);

/// The closed set of modeled silicon families. Selected once per run; the
/// coordinate tables and stream register branch sets all key off this.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Arch {
    Grayskull,
    Wormhole,
}

impl FromStr for Arch {
    type Err = UnknownArchitecture;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grayskull" => Ok(Arch::Grayskull),
            "wormhole" => Ok(Arch::Wormhole),
            other => Err(UnknownArchitecture(other.to_string())),
        }
    }
}

impl std::fmt::Display for Arch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Arch::Grayskull => write!(f, "Grayskull"),
            Arch::Wormhole => write!(f, "Wormhole"),
        }
    }
}

impl Arch {
    pub fn grid_size(&self) -> (u8, u8) {
        match self {
            Arch::Grayskull => (grayskull::GRID_SIZE_X, grayskull::GRID_SIZE_Y),
            Arch::Wormhole => (wormhole::GRID_SIZE_X, wormhole::GRID_SIZE_Y),
        }
    }

    /// Length of the per-destination credit array decoded when a multicast
    /// sender is configured. One entry on grayskull, up to 31 on wormhole.
    pub fn mcast_credit_count(&self) -> u32 {
        match self {
            Arch::Grayskull => grayskull::MCAST_CREDIT_COUNT,
            Arch::Wormhole => wormhole::MCAST_CREDIT_COUNT,
        }
    }

    /// Whether DEBUG_STATUS[8] carries the packed stream state machines.
    pub fn has_debug_state(&self) -> bool {
        match self {
            Arch::Grayskull => false,
            Arch::Wormhole => true,
        }
    }

    /// NOC0 location of the DRAM endpoint serving a channel.
    pub fn dram_channel_loc(&self, channel: u8) -> Option<(u8, u8)> {
        let table = match self {
            Arch::Grayskull => grayskull::CHANNEL_TO_DRAM_LOC,
            Arch::Wormhole => wormhole::CHANNEL_TO_DRAM_LOC,
        };
        table.get(channel as usize).copied()
    }
}

/// Register transport failure. Every variant carries enough to reproduce the
/// failing access; a failed read is never treated as zero.
#[derive(Debug, Clone, thiserror::Error)]
pub enum AccessError {
    #[error("read failed on device {device} at {x}-{y} {noc} address {addr:#010x}")]
    Read {
        device: DeviceId,
        noc: NocId,
        x: u8,
        y: u8,
        addr: u64,
    },

    #[error("write failed on device {device} at {x}-{y} {noc} address {addr:#010x}")]
    Write {
        device: DeviceId,
        noc: NocId,
        x: u8,
        y: u8,
        addr: u64,
    },

    #[error(
        "readback mismatch on device {device} at {x}-{y} {noc} address {addr:#010x}: \
         wrote {wrote:#010x}, read {read:#010x}"
    )]
    ReadbackMismatch {
        device: DeviceId,
        noc: NocId,
        x: u8,
        y: u8,
        addr: u64,
        wrote: u32,
        read: u32,
    },
}

/// The register access channel the debugger runs over. Implemented outside
/// this crate (PCI stub process, simulator, test fake); the core only ever
/// performs blocking 32-bit round-trips through it.
pub trait RegisterPort {
    fn read32(
        &mut self,
        device: DeviceId,
        noc: NocId,
        x: u8,
        y: u8,
        addr: u64,
    ) -> Result<u32, AccessError>;

    fn write32(
        &mut self,
        device: DeviceId,
        noc: NocId,
        x: u8,
        y: u8,
        addr: u64,
        value: u32,
    ) -> Result<(), AccessError>;
}

impl<P: RegisterPort + ?Sized> RegisterPort for &mut P {
    fn read32(
        &mut self,
        device: DeviceId,
        noc: NocId,
        x: u8,
        y: u8,
        addr: u64,
    ) -> Result<u32, AccessError> {
        (**self).read32(device, noc, x, y, addr)
    }

    fn write32(
        &mut self,
        device: DeviceId,
        noc: NocId,
        x: u8,
        y: u8,
        addr: u64,
        value: u32,
    ) -> Result<(), AccessError> {
        (**self).write32(device, noc, x, y, addr, value)
    }
}

/// Write then read back, failing on mismatch. A silently dropped register
/// write would corrupt every later diagnosis in the session.
pub fn write32_verified<P: RegisterPort + ?Sized>(
    port: &mut P,
    device: DeviceId,
    noc: NocId,
    x: u8,
    y: u8,
    addr: u64,
    value: u32,
) -> Result<(), AccessError> {
    port.write32(device, noc, x, y, addr, value)?;
    let read = port.read32(device, noc, x, y, addr)?;
    if read != value {
        return Err(AccessError::ReadbackMismatch {
            device,
            noc,
            x,
            y,
            addr,
            wrote: value,
            read,
        });
    }
    Ok(())
}

pub fn stream_reg_addr(stream_id: u8, reg_index: u32) -> u64 {
    STREAM_REG_BASE + (stream_id as u64) * 0x1000 + (reg_index as u64) * 4
}

pub fn noc_counter_addr(noc: NocId, counter_index: u32) -> u64 {
    NOC_REG_BASE + (noc as u64) * 0x10000 + 0x200 + (counter_index as u64) * 4
}

/// NOC traffic counters worth sampling on a stuck core, by name.
pub const NOC_COUNTERS: &[(&str, u32)] = &[
    ("nonposted write reqs sent", 0xA),
    ("posted write reqs sent", 0xB),
    ("nonposted write words sent", 0x8),
    ("posted write words sent", 0x9),
    ("write acks received", 0x1),
    ("read reqs sent", 0x5),
    ("read words received", 0x3),
    ("read resps received", 0x2),
    ("nonposted write reqs received", 0x1A),
    ("posted write reqs received", 0x1B),
    ("nonposted write words received", 0x18),
    ("posted write words received", 0x19),
    ("write acks sent", 0x10),
    ("read reqs received", 0x15),
    ("read words sent", 0x13),
    ("read resps sent", 0x12),
    ("router port x out vc full credit out vc stall", 0x24),
    ("router port y out vc full credit out vc stall", 0x22),
    ("router port niu out vc full credit out vc stall", 0x20),
];

/// Snapshot every named traffic counter of one NOC on one core. The counter
/// block itself is always addressed through NOC0.
pub fn read_noc_counters<P: RegisterPort + ?Sized>(
    port: &mut P,
    device: DeviceId,
    x: u8,
    y: u8,
    noc: NocId,
) -> Result<Vec<(&'static str, u32)>, AccessError> {
    let mut out = Vec::with_capacity(NOC_COUNTERS.len());
    for (name, index) in NOC_COUNTERS {
        let value = port.read32(device, NocId::Noc0, x, y, noc_counter_addr(noc, *index))?;
        out.push((*name, value));
    }
    Ok(out)
}
