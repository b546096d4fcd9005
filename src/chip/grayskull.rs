//! Grayskull layout tables. One tensix column of the 13x12 grid is routing
//! only (NOC0 x = 0); rows 0 and 6 carry the DRAM endpoints.

use super::coords::CoordError;

pub const GRID_SIZE_X: u8 = 13;
pub const GRID_SIZE_Y: u8 = 12;

pub const PHYS_X_TO_NOC_0_X: &[u8] = &[0, 12, 1, 11, 2, 10, 3, 9, 4, 8, 5, 7, 6];
pub const PHYS_Y_TO_NOC_0_Y: &[u8] = &[0, 11, 1, 10, 2, 9, 3, 8, 4, 7, 5, 6];
pub const PHYS_X_TO_NOC_1_X: &[u8] = &[12, 0, 11, 1, 10, 2, 9, 3, 8, 4, 7, 5, 6];
pub const PHYS_Y_TO_NOC_1_Y: &[u8] = &[11, 0, 10, 1, 9, 2, 8, 3, 7, 4, 6, 5];

pub const CHANNEL_TO_DRAM_LOC: &[(u8, u8)] = &[
    (1, 6),
    (4, 6),
    (7, 6),
    (10, 6),
    (1, 0),
    (4, 0),
    (7, 0),
    (10, 0),
];

/// Multicast senders expose a single destination credit register.
pub const MCAST_CREDIT_COUNT: u32 = 1;

pub fn noc0_to_rc(noc0_x: u8, noc0_y: u8) -> Result<(u8, u8), CoordError> {
    if noc0_x == 0 || noc0_y == 0 || noc0_y == 6 {
        return Err(CoordError::NoGridCell {
            noc0_x,
            noc0_y,
        });
    }

    let row = if noc0_y > 6 { noc0_y - 2 } else { noc0_y - 1 };
    let col = noc0_x - 1;
    Ok((row, col))
}

pub fn rc_to_noc0(row: u8, col: u8) -> (u8, u8) {
    let mut noc0_y = row + 1;
    let noc0_x = col + 1;
    if noc0_y >= 6 {
        noc0_y += 1;
    }
    (noc0_x, noc0_y)
}
