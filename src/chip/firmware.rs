//! Per-core RISC firmware status registers. The NCRISC and BRISC firmwares
//! publish a postcode to a fixed mailbox; the masked-value tables here turn a
//! raw postcode into the loop the firmware was last seen in.

use super::{AccessError, DeviceId, NocId, RegisterPort};

pub const NCRISC_STATUS_REG_ADDR: u64 = 0xFFB2_010C;
pub const BRISC_STATUS_REG_ADDR: u64 = 0xFFB3_010C;

const GSYNC_HUNG_SENTINEL: u32 = 0xB001_0000;
const NCRISC_DONE_SENTINEL: u32 = 0x1FFF_FFF1;

pub fn is_gsync_hung<P: RegisterPort + ?Sized>(
    port: &mut P,
    device: DeviceId,
    x: u8,
    y: u8,
) -> Result<bool, AccessError> {
    Ok(port.read32(device, NocId::Noc0, x, y, NCRISC_STATUS_REG_ADDR)? == GSYNC_HUNG_SENTINEL)
}

pub fn is_ncrisc_done<P: RegisterPort + ?Sized>(
    port: &mut P,
    device: DeviceId,
    x: u8,
    y: u8,
) -> Result<bool, AccessError> {
    Ok(port.read32(device, NocId::Noc0, x, y, NCRISC_STATUS_REG_ADDR)? == NCRISC_DONE_SENTINEL)
}

pub struct StatusDesc {
    pub values: &'static [u32],
    pub mask: u32,
    pub desc: &'static str,
    /// Verbosity level at which this entry is worth reporting.
    pub level: u8,
}

pub const NCRISC_STATUS_DESCS: &[StatusDesc] = &[
    StatusDesc {
        values: &[0xA830_0000, 0xA820_0000, 0xA810_0000],
        mask: 0xFFFF_F000,
        desc: "Prologue queue header load",
        level: 0,
    },
    StatusDesc {
        values: &[0x1111_1111],
        mask: 0xFFFF_FFFF,
        desc: "Main loop begin",
        level: 0,
    },
    StatusDesc {
        values: &[0xC000_0000],
        mask: 0xFFFF_FFFF,
        desc: "Load queue pointers",
        level: 0,
    },
    StatusDesc {
        values: &[0xD000_0000],
        mask: 0xFFFF_F000,
        desc: "Which stream id will read queue",
        level: 0,
    },
    StatusDesc {
        values: &[0xD100_0000],
        mask: 0xFFFF_FFFF,
        desc: "Queue has data to read",
        level: 0,
    },
    StatusDesc {
        values: &[0xD200_0000],
        mask: 0xFFFF_FFFF,
        desc: "Queue has l1 space",
        level: 0,
    },
    StatusDesc {
        values: &[0xD300_0000],
        mask: 0xFFFF_FFFF,
        desc: "Queue read in progress",
        level: 0,
    },
    StatusDesc {
        values: &[0xE000_0000],
        mask: 0xFFFF_F000,
        desc: "Which stream has data in l1 available to push",
        level: 0,
    },
    StatusDesc {
        values: &[0xE100_0000],
        mask: 0xFFFF_FFFF,
        desc: "Push in progress",
        level: 0,
    },
    StatusDesc {
        values: &[0xF000_0000],
        mask: 0xFFFF_F000,
        desc: "Which stream will write queue",
        level: 0,
    },
    StatusDesc {
        values: &[0xF030_0000],
        mask: 0xFFFF_FFFF,
        desc: "Waiting for stride to be ready before updating wr pointer",
        level: 0,
    },
    StatusDesc {
        values: &[0xF100_0000],
        mask: 0xFFFF_FFFF,
        desc: "Needs to write data to dram",
        level: 0,
    },
    StatusDesc {
        values: &[0xF200_0000],
        mask: 0xFFFF_FFFF,
        desc: "Ready to write data to dram",
        level: 0,
    },
    StatusDesc {
        values: &[0xF300_0000],
        mask: 0xFFFF_FFFF,
        desc: "Has data to write to dram",
        level: 0,
    },
    StatusDesc {
        values: &[0xF400_0000],
        mask: 0xFFFF_FFFF,
        desc: "Writing to dram",
        level: 0,
    },
    StatusDesc {
        values: &[0x2000_0000],
        mask: 0xFFFF_F000,
        desc: "Amount of written tiles that needs to be cleared",
        level: 0,
    },
    StatusDesc {
        values: &[0x2222_2222, 0x3333_3333, 0x4444_4444],
        mask: 0xFFFF_FFFF,
        desc: "Epilogue",
        level: 1,
    },
    StatusDesc {
        values: &[0x1000_0006, 0x1000_0001],
        mask: 0xFFFF_FFFF,
        desc: "Waiting for next epoch",
        level: 1,
    },
];

pub const BRISC_STATUS_DESCS: &[StatusDesc] = &[
    StatusDesc {
        values: &[0xB000_0000],
        mask: 0xFFFF_F000,
        desc: "Stream restart check",
        level: 0,
    },
    StatusDesc {
        values: &[0xC000_0000],
        mask: 0xFFFF_FFFF,
        desc: "Check whether unpack stream has data",
        level: 0,
    },
    StatusDesc {
        values: &[0xD000_0000],
        mask: 0xFFFF_FFFF,
        desc: "Clear unpack stream",
        level: 0,
    },
    StatusDesc {
        values: &[0xE000_0000],
        mask: 0xFFFF_FFFF,
        desc: "Check and push pack stream that has data (TM ops only)",
        level: 0,
    },
    StatusDesc {
        values: &[0xF000_0000],
        mask: 0xFFFF_FFFF,
        desc: "Reset intermediate streams",
        level: 0,
    },
    StatusDesc {
        values: &[0xF100_0000],
        mask: 0xFFFF_FFFF,
        desc: "Wait until all streams are idle",
        level: 0,
    },
    StatusDesc {
        values: &[0x2100_0000],
        mask: 0xFFFF_F000,
        desc: "Waiting for next epoch",
        level: 1,
    },
    StatusDesc {
        values: &[0x1000_0001],
        mask: 0xFFFF_FFFF,
        desc: "Waiting for next epoch",
        level: 1,
    },
];

fn desc_table(status_reg_addr: u64) -> Option<&'static [StatusDesc]> {
    match status_reg_addr {
        NCRISC_STATUS_REG_ADDR => Some(NCRISC_STATUS_DESCS),
        BRISC_STATUS_REG_ADDR => Some(BRISC_STATUS_DESCS),
        _ => None,
    }
}

/// Describe a raw postcode read from one of the RISC status mailboxes.
/// Returns the matching description and its verbosity level; `None` when the
/// address is not a known mailbox or the value matches no entry.
pub fn describe_status(status_reg_addr: u64, value: u32) -> Option<(&'static str, u8)> {
    for desc in desc_table(status_reg_addr)? {
        if desc.values.contains(&(value & desc.mask)) {
            return Some((desc.desc, desc.level));
        }
    }
    None
}

/// One core's postcode and its decoded meaning, if recognized.
pub struct CoreStatus {
    pub x: u8,
    pub y: u8,
    pub value: u32,
    pub desc: Option<&'static str>,
}

/// Read and describe a RISC status mailbox across a set of cores.
pub fn status_summary<P: RegisterPort + ?Sized>(
    port: &mut P,
    device: DeviceId,
    cores: &[(u8, u8)],
    status_reg_addr: u64,
    max_level: u8,
) -> Result<Vec<CoreStatus>, AccessError> {
    let mut rows = Vec::new();
    for (x, y) in cores.iter().copied() {
        let value = port.read32(device, NocId::Noc0, x, y, status_reg_addr)?;
        match describe_status(status_reg_addr, value) {
            Some((desc, level)) if level <= max_level => rows.push(CoreStatus {
                x,
                y,
                value,
                desc: Some(desc),
            }),
            Some(_) => {}
            None => rows.push(CoreStatus {
                x,
                y,
                value,
                desc: None,
            }),
        }
    }
    Ok(rows)
}
