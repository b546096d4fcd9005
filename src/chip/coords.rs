//! Coordinate transforms between the four address spaces a core can be named
//! in: physical die position, NOC0, NOC1, and the logical row/column grid the
//! dataflow graph is placed on.
//!
//! The NOC mappings are table-driven per architecture; the tables here are
//! the forward (physical -> NOC) direction, with inverses generated once at
//! construction. Only the RC conversion is partial: routing-only rows and
//! columns have no grid cell.

use super::{grayskull, wormhole, Arch};

#[derive(Debug, Clone, thiserror::Error)]
pub enum CoordError {
    #[error("noc0 {noc0_x}-{noc0_y} has no row/column grid cell")]
    NoGridCell { noc0_x: u8, noc0_y: u8 },

    #[error("coordinate {x}-{y} is outside the {arch} grid")]
    OutOfGrid { arch: Arch, x: u8, y: u8 },
}

fn reverse_mapping(forward: &[u8]) -> Vec<u8> {
    let mut inverse = vec![0; forward.len()];
    for (from, to) in forward.iter().enumerate() {
        inverse[*to as usize] = from as u8;
    }
    inverse
}

/// Lookup tables for one chip family, built once at startup. Selecting the
/// wrong family silently produces wrong coordinates, so there is no default;
/// construction takes an explicit [`Arch`].
pub struct CoordinateMap {
    arch: Arch,

    phys_x_to_noc0_x: &'static [u8],
    phys_y_to_noc0_y: &'static [u8],
    phys_x_to_noc1_x: &'static [u8],
    phys_y_to_noc1_y: &'static [u8],

    noc0_x_to_phys_x: Vec<u8>,
    noc0_y_to_phys_y: Vec<u8>,
    noc1_x_to_phys_x: Vec<u8>,
    noc1_y_to_phys_y: Vec<u8>,
}

impl CoordinateMap {
    pub fn new(arch: Arch) -> Self {
        let (px0, py0, px1, py1) = match arch {
            Arch::Grayskull => (
                grayskull::PHYS_X_TO_NOC_0_X,
                grayskull::PHYS_Y_TO_NOC_0_Y,
                grayskull::PHYS_X_TO_NOC_1_X,
                grayskull::PHYS_Y_TO_NOC_1_Y,
            ),
            Arch::Wormhole => (
                wormhole::PHYS_X_TO_NOC_0_X,
                wormhole::PHYS_Y_TO_NOC_0_Y,
                wormhole::PHYS_X_TO_NOC_1_X,
                wormhole::PHYS_Y_TO_NOC_1_Y,
            ),
        };

        CoordinateMap {
            arch,
            phys_x_to_noc0_x: px0,
            phys_y_to_noc0_y: py0,
            phys_x_to_noc1_x: px1,
            phys_y_to_noc1_y: py1,
            noc0_x_to_phys_x: reverse_mapping(px0),
            noc0_y_to_phys_y: reverse_mapping(py0),
            noc1_x_to_phys_x: reverse_mapping(px1),
            noc1_y_to_phys_y: reverse_mapping(py1),
        }
    }

    pub fn arch(&self) -> Arch {
        self.arch
    }

    fn check(&self, x: u8, y: u8) -> Result<(), CoordError> {
        let (gx, gy) = self.arch.grid_size();
        if x >= gx || y >= gy {
            return Err(CoordError::OutOfGrid {
                arch: self.arch,
                x,
                y,
            });
        }
        Ok(())
    }

    pub fn phys_to_noc0(&self, phys_x: u8, phys_y: u8) -> Result<(u8, u8), CoordError> {
        self.check(phys_x, phys_y)?;
        Ok((
            self.phys_x_to_noc0_x[phys_x as usize],
            self.phys_y_to_noc0_y[phys_y as usize],
        ))
    }

    pub fn phys_to_noc1(&self, phys_x: u8, phys_y: u8) -> Result<(u8, u8), CoordError> {
        self.check(phys_x, phys_y)?;
        Ok((
            self.phys_x_to_noc1_x[phys_x as usize],
            self.phys_y_to_noc1_y[phys_y as usize],
        ))
    }

    pub fn noc0_to_phys(&self, noc0_x: u8, noc0_y: u8) -> Result<(u8, u8), CoordError> {
        self.check(noc0_x, noc0_y)?;
        Ok((
            self.noc0_x_to_phys_x[noc0_x as usize],
            self.noc0_y_to_phys_y[noc0_y as usize],
        ))
    }

    pub fn noc1_to_phys(&self, noc1_x: u8, noc1_y: u8) -> Result<(u8, u8), CoordError> {
        self.check(noc1_x, noc1_y)?;
        Ok((
            self.noc1_x_to_phys_x[noc1_x as usize],
            self.noc1_y_to_phys_y[noc1_y as usize],
        ))
    }

    pub fn noc0_to_noc1(&self, noc0_x: u8, noc0_y: u8) -> Result<(u8, u8), CoordError> {
        let (px, py) = self.noc0_to_phys(noc0_x, noc0_y)?;
        self.phys_to_noc1(px, py)
    }

    pub fn noc1_to_noc0(&self, noc1_x: u8, noc1_y: u8) -> Result<(u8, u8), CoordError> {
        let (px, py) = self.noc1_to_phys(noc1_x, noc1_y)?;
        self.phys_to_noc0(px, py)
    }

    /// Logical grid cell of a NOC0 coordinate. Fails with
    /// [`CoordError::NoGridCell`] on the routing-only rows and columns.
    pub fn noc0_to_rc(&self, noc0_x: u8, noc0_y: u8) -> Result<(u8, u8), CoordError> {
        self.check(noc0_x, noc0_y)?;
        match self.arch {
            Arch::Grayskull => grayskull::noc0_to_rc(noc0_x, noc0_y),
            Arch::Wormhole => wormhole::noc0_to_rc(noc0_x, noc0_y),
        }
    }

    pub fn rc_to_noc0(&self, row: u8, col: u8) -> Result<(u8, u8), CoordError> {
        let (x, y) = match self.arch {
            Arch::Grayskull => grayskull::rc_to_noc0(row, col),
            Arch::Wormhole => wormhole::rc_to_noc0(row, col),
        };
        self.check(x, y)?;
        Ok((x, y))
    }
}
