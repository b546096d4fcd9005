pub use chip::{
    coords::CoordinateMap, AccessError, Arch, DeviceId, NocId, RegisterPort, UnknownArchitecture,
};

pub mod analyzer;
pub mod chip;
pub mod graph;
