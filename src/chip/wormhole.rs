//! Wormhole layout tables. The 10x12 grid loses NOC0 columns 0 and 5 to DRAM
//! and rows 0 and 6 to ethernet; neither has a logical op cell.

use super::coords::CoordError;

pub const GRID_SIZE_X: u8 = 10;
pub const GRID_SIZE_Y: u8 = 12;

pub const PHYS_X_TO_NOC_0_X: &[u8] = &[0, 9, 1, 8, 2, 7, 3, 6, 4, 5];
pub const PHYS_Y_TO_NOC_0_Y: &[u8] = &[0, 11, 1, 10, 2, 9, 3, 8, 4, 7, 5, 6];
pub const PHYS_X_TO_NOC_1_X: &[u8] = &[9, 0, 8, 1, 7, 2, 6, 3, 5, 4];
pub const PHYS_Y_TO_NOC_1_Y: &[u8] = &[11, 0, 10, 1, 9, 2, 8, 3, 7, 4, 6, 5];

pub const CHANNEL_TO_DRAM_LOC: &[(u8, u8)] = &[(0, 11), (5, 11), (5, 2), (5, 8), (5, 5), (0, 5)];

/// Multicast senders expose one credit register per possible destination.
pub const MCAST_CREDIT_COUNT: u32 = 31;

pub fn noc0_to_rc(noc0_x: u8, noc0_y: u8) -> Result<(u8, u8), CoordError> {
    if noc0_x == 0 || noc0_x == 5 || noc0_y == 0 || noc0_y == 6 {
        return Err(CoordError::NoGridCell {
            noc0_x,
            noc0_y,
        });
    }

    let row = if noc0_y > 6 { noc0_y - 2 } else { noc0_y - 1 };
    let col = if noc0_x > 5 { noc0_x - 2 } else { noc0_x - 1 };
    Ok((row, col))
}

pub fn rc_to_noc0(row: u8, col: u8) -> (u8, u8) {
    let mut noc0_y = row + 1;
    let mut noc0_x = col + 1;
    if noc0_x >= 5 {
        noc0_x += 1;
    }
    if noc0_y >= 6 {
        noc0_y += 1;
    }
    (noc0_x, noc0_y)
}
