mod common;

use common::FakePort;
use ttdbg::chip::stream::{
    read_stream_regs, stream_kind, DestState, LocalRoute, PhaseState, SrcState, StreamKind,
    StreamLocation,
};
use ttdbg::chip::{
    noc_counter_addr, read_noc_counters, stream_reg_addr, write32_verified, AccessError, NocId,
};
use ttdbg::Arch;

#[ctor::ctor]
fn test_init() {
    tracing_subscriber::util::SubscriberInitExt::init(
        tracing_subscriber::layer::SubscriberExt::with(
            tracing_subscriber::layer::SubscriberExt::with(
                tracing_subscriber::registry(),
                tracing_subscriber::fmt::layer(),
            ),
            tracing_subscriber::filter::EnvFilter::from_default_env(),
        ),
    );
}

const X: u8 = 1;
const Y: u8 = 1;
const STREAM: u8 = 8;

fn loc() -> StreamLocation {
    StreamLocation::new(0, X, Y, STREAM).unwrap()
}

#[test]
fn register_addresses() {
    assert_eq!(stream_reg_addr(0, 0), 0xFFB4_0000);
    assert_eq!(stream_reg_addr(2, 3), 0xFFB4_0000 + 2 * 0x1000 + 12);
    assert_eq!(noc_counter_addr(NocId::Noc0, 0), 0xFFB2_0200);
    assert_eq!(noc_counter_addr(NocId::Noc1, 0xA), 0xFFB2_0000 + 0x10000 + 0x200 + 0x28);
}

#[test]
fn remote_source_with_local_sources() {
    let mut port = FakePort::default();
    // REMOTE_SOURCE and LOCAL_SOURCES_CONNECTED set.
    port.poke_stream_reg(0, X, Y, STREAM, 10, (1 << 5) | (1 << 3));
    port.poke_stream_reg(0, X, Y, STREAM, 0, 3 | (4 << 6) | (9 << 12) | (2 << 18));
    port.poke_stream_reg(0, X, Y, STREAM, 1, 0x155);
    port.poke_stream_reg(0, X, Y, STREAM, 11, 1034);
    port.poke_stream_reg(0, X, Y, STREAM, 229, 2 | ((STREAM as u32) << 24));
    port.poke_stream_reg(0, X, Y, STREAM, 48, 0xDEAD_BEEF);
    port.poke_stream_reg(0, X, Y, STREAM, 49, 0x1);

    let regs = read_stream_regs(&mut port, Arch::Wormhole, loc()).unwrap();

    let source = regs.source.as_ref().unwrap();
    assert_eq!(source.x.value, 3);
    assert_eq!(source.y.value, 4);
    assert_eq!(source.stream_id.value, 9);
    assert_eq!(source.dest_index.value, 2);
    assert_eq!(source.phase.value, 0x155);

    assert!(regs.dest.is_none());

    let sources = match &regs.local {
        LocalRoute::Sources(sources) => sources,
        LocalRoute::Buffer(_) => panic!("local sources connected, decoded buffer geometry"),
    };
    assert_eq!(sources.src_mask.value, 0x1_DEAD_BEEF);

    assert_eq!(regs.stream_id.value, STREAM as u64);
    assert!(regs.is_configured());
    assert!(regs.is_active());
    assert_eq!(regs.epoch(), 1);
    assert_eq!(regs.curr_phase.value, 1034);

    // Gated-off registers were never touched: no remote dest, no local buffer.
    assert!(!port.was_read(X, Y, stream_reg_addr(STREAM, 2)));
    assert!(!port.was_read(X, Y, stream_reg_addr(STREAM, 6)));
}

#[test]
fn local_buffer_mode() {
    let mut port = FakePort::default();
    port.poke_stream_reg(0, X, Y, STREAM, 6, 0x1234);
    port.poke_stream_reg(0, X, Y, STREAM, 7, 0x0800);
    port.poke_stream_reg(0, X, Y, STREAM, 24, 0x1250);

    let regs = read_stream_regs(&mut port, Arch::Wormhole, loc()).unwrap();

    let buffer = match &regs.local {
        LocalRoute::Buffer(buffer) => buffer,
        LocalRoute::Sources(_) => panic!("no local sources, decoded arbitration fields"),
    };
    assert_eq!(buffer.buf_start.value, 0x1234);
    assert_eq!(buffer.buf_size.value, 0x0800);
    assert_eq!(buffer.buf_rd_ptr.value, 0x1250);

    assert!(regs.source.is_none());
    assert!(regs.dest.is_none());
    assert!(!regs.is_configured());
    assert!(!regs.is_active());

    // LOCAL_SRC_MASK lives behind the gate that is off here.
    assert!(!port.was_read(X, Y, stream_reg_addr(STREAM, 48)));
    assert!(!port.was_read(X, Y, stream_reg_addr(STREAM, 0)));
}

fn mcast_port(mcast_en: bool) -> FakePort {
    let mut port = FakePort::default();
    port.poke_stream_reg(0, X, Y, STREAM, 10, 1 << 8);
    port.poke_stream_reg(0, X, Y, STREAM, 2, 7 | (8 << 6) | (25 << 12));
    if mcast_en {
        port.poke_stream_reg(0, X, Y, STREAM, 13, (1 << 12) | 2 | (3 << 6));
        port.poke_stream_reg(0, X, Y, STREAM, 14, 16);
    }
    port.poke_stream_reg(0, X, Y, STREAM, 64, 40);
    port.poke_stream_reg(0, X, Y, STREAM, 65, 41);
    port
}

#[test]
fn multicast_credit_count_follows_arch() {
    let mut port = mcast_port(true);
    let regs = read_stream_regs(&mut port, Arch::Wormhole, loc()).unwrap();
    let dest = regs.dest.as_ref().unwrap();
    assert_eq!(dest.x.value, 7);
    assert_eq!(dest.y.value, 8);
    assert_eq!(dest.stream_id.value, 25);
    let mcast = dest.mcast.as_ref().unwrap();
    assert_eq!(mcast.end_x.value, 2);
    assert_eq!(mcast.end_y.value, 3);
    assert_eq!(mcast.dest_num.value, 16);
    assert_eq!(dest.buf_space_available.len(), 31);
    assert_eq!(dest.buf_space_available[0].value, 40);
    assert_eq!(dest.buf_space_available[1].value, 41);

    let mut port = mcast_port(true);
    let regs = read_stream_regs(&mut port, Arch::Grayskull, loc()).unwrap();
    assert_eq!(regs.dest.as_ref().unwrap().buf_space_available.len(), 1);
}

#[test]
fn unicast_has_single_credit() {
    let mut port = mcast_port(false);
    let regs = read_stream_regs(&mut port, Arch::Wormhole, loc()).unwrap();
    let dest = regs.dest.as_ref().unwrap();
    assert!(dest.mcast.is_none());
    assert_eq!(dest.buf_space_available.len(), 1);
    assert_eq!(dest.buf_space_available[0].value, 40);
}

#[test]
fn idle_and_bad_classification() {
    let mut port = FakePort::default();
    port.poke_stream_reg(0, X, Y, STREAM, 231, 0x0012_3C00);
    let regs = read_stream_regs(&mut port, Arch::Wormhole, loc()).unwrap();
    assert!(regs.is_idle());
    assert!(!regs.is_bad());

    for (value, bad) in [(0x4u32, true), (0x2, true), (0x1, false), (0x0, false), (0x6, false)] {
        let mut port = FakePort::default();
        port.poke_stream_reg(0, X, Y, STREAM, 226, value);
        let regs = read_stream_regs(&mut port, Arch::Wormhole, loc()).unwrap();
        assert_eq!(regs.is_bad(), bad, "DEBUG_STATUS[2] = {value:#x}");
    }

    let mut port = FakePort::default();
    port.poke_stream_reg(0, X, Y, STREAM, 225, 0xFFFF_0000);
    let regs = read_stream_regs(&mut port, Arch::Wormhole, loc()).unwrap();
    assert!(regs.is_bad());
}

#[test]
fn debug_state_decode() {
    let mut port = FakePort::default();
    let word = 4 | (3 << 4) | (2 << 7) | (1 << 10) | (1 << 11) | (2 << 16) | (5 << 20);
    port.poke_stream_reg(0, X, Y, STREAM, 232, word);

    let regs = read_stream_regs(&mut port, Arch::Wormhole, loc()).unwrap();
    let state = regs.debug_state.as_ref().unwrap();
    assert_eq!(state.phase_state(), Some(PhaseState::PrevDataFlushWait));
    assert_eq!(state.src_state(), Some(SrcState::Local));
    assert_eq!(state.dest_state(), Some(DestState::Endpoint));
    assert!(state.src_side_phase_complete.bit());
    assert!(state.dest_side_phase_complete.bit());

    let mut port = FakePort::default();
    port.poke_stream_reg(0, X, Y, STREAM, 232, word);
    let regs = read_stream_regs(&mut port, Arch::Grayskull, loc()).unwrap();
    assert!(regs.debug_state.is_none());
}

#[test]
fn render_formats() {
    let mut port = FakePort::default();
    port.poke_stream_reg(0, X, Y, STREAM, 11, 1034);
    port.poke_stream_reg(0, X, Y, STREAM, 230, 0x8000);
    port.poke_stream_reg(0, X, Y, STREAM, 231, 0x0012_3C00);
    port.poke_stream_reg(0, X, Y, STREAM, 248, 0xABCD);

    let regs = read_stream_regs(&mut port, Arch::Wormhole, loc()).unwrap();
    let rows = regs.render();

    assert_eq!(rows[0].0, "STREAM_ID");
    let find = |name: &str| {
        rows.iter()
            .find(|(n, _)| n == name)
            .unwrap_or_else(|| panic!("no row {name}"))
            .1
            .clone()
    };
    assert_eq!(find("CURR_PHASE"), "1034");
    assert_eq!(find("NEXT_MSG_ADDR"), "0x8000");
    assert_eq!(find("DEBUG_STATUS[7]"), "0x00123c00");
    assert_eq!(find("SCRATCH_REG0"), "0x0000abcd");
}

#[test]
fn read_failure_propagates() {
    let mut port = FakePort::default();
    port.failing
        .insert((0, X, Y, stream_reg_addr(STREAM, 11)));
    let err = read_stream_regs(&mut port, Arch::Wormhole, loc()).unwrap_err();
    assert!(matches!(err, AccessError::Read { .. }));
}

#[test]
fn verified_write() {
    let mut port = FakePort::default();
    write32_verified(&mut port, 0, NocId::Noc0, X, Y, 0x100, 0xFACA).unwrap();
    assert_eq!(port.mem[&(0, X, Y, 0x100)], 0xFACA);

    port.stuck.insert((0, X, Y, 0x200));
    let err = write32_verified(&mut port, 0, NocId::Noc0, X, Y, 0x200, 0xFACA).unwrap_err();
    assert!(matches!(
        err,
        AccessError::ReadbackMismatch {
            wrote: 0xFACA,
            read: 0,
            ..
        }
    ));
}

#[test]
fn noc_counter_snapshot() {
    let mut port = FakePort::default();
    port.poke(0, X, Y, noc_counter_addr(NocId::Noc1, 0xA), 123);
    let counters = read_noc_counters(&mut port, 0, X, Y, NocId::Noc1).unwrap();
    assert_eq!(counters.len(), 19);
    let (_, value) = counters
        .iter()
        .find(|(name, _)| *name == "nonposted write reqs sent")
        .unwrap();
    assert_eq!(*value, 123);
}

#[test]
fn stream_kinds() {
    assert_eq!(stream_kind(0), StreamKind::Unknown);
    assert_eq!(stream_kind(8), StreamKind::Input);
    assert_eq!(stream_kind(16), StreamKind::Param);
    assert_eq!(stream_kind(24), StreamKind::Output);
    assert_eq!(stream_kind(32), StreamKind::Intermediate);
    assert_eq!(stream_kind(40), StreamKind::Relay);
    assert_eq!(stream_kind(63), StreamKind::Relay);
    assert!(StreamLocation::new(0, X, Y, 64).is_none());
}
