#![allow(dead_code)]

use std::collections::{BTreeMap, BTreeSet};

use ttdbg::chip::{stream_reg_addr, AccessError, DeviceId, NocId, RegisterPort};

type Key = (DeviceId, u8, u8, u64);

/// In-memory register space. Unwritten addresses read as zero; addresses in
/// `failing` error on any access and addresses in `stuck` silently drop
/// writes, so transport faults and dead registers can both be simulated.
#[derive(Default)]
pub struct FakePort {
    pub mem: BTreeMap<Key, u32>,
    pub failing: BTreeSet<Key>,
    pub stuck: BTreeSet<Key>,
    /// Every (x, y, addr) successfully read, in order.
    pub reads: Vec<(u8, u8, u64)>,
}

impl FakePort {
    pub fn poke(&mut self, device: DeviceId, x: u8, y: u8, addr: u64, value: u32) {
        self.mem.insert((device, x, y, addr), value);
    }

    pub fn poke_stream_reg(
        &mut self,
        device: DeviceId,
        x: u8,
        y: u8,
        stream_id: u8,
        reg_index: u32,
        value: u32,
    ) {
        self.poke(device, x, y, stream_reg_addr(stream_id, reg_index), value);
    }

    pub fn was_read(&self, x: u8, y: u8, addr: u64) -> bool {
        self.reads.iter().any(|r| *r == (x, y, addr))
    }
}

impl RegisterPort for FakePort {
    fn read32(
        &mut self,
        device: DeviceId,
        noc: NocId,
        x: u8,
        y: u8,
        addr: u64,
    ) -> Result<u32, AccessError> {
        if self.failing.contains(&(device, x, y, addr)) {
            return Err(AccessError::Read {
                device,
                noc,
                x,
                y,
                addr,
            });
        }
        self.reads.push((x, y, addr));
        Ok(self.mem.get(&(device, x, y, addr)).copied().unwrap_or(0))
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
        if self.failing.contains(&(device, x, y, addr)) {
            return Err(AccessError::Write {
                device,
                noc,
                x,
                y,
                addr,
            });
        }
        if !self.stuck.contains(&(device, x, y, addr)) {
            self.mem.insert((device, x, y, addr), value);
        }
        Ok(())
    }
}
