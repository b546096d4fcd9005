use std::collections::BTreeMap;

use ttdbg::graph::{Buffer, Graph, Netlist, Op, Pipe, DRAM_CORE};

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

fn sample_graph(epoch_id: u32) -> Graph {
    let mut ops = BTreeMap::new();
    ops.insert(
        "mm".to_string(),
        Op {
            op_type: "matmul".to_string(),
            grid_loc: (1, 2),
            grid_rows: 2,
            grid_cols: 3,
            inputs: vec!["src".to_string()],
        },
    );

    let mut buffers = BTreeMap::new();
    for (id, core) in [(1u64, (1, 2)), (2, (1, 3)), (3, (1, 2)), (4, DRAM_CORE)] {
        buffers.insert(
            id,
            Buffer {
                id,
                core,
                op_name: "mm".to_string(),
                dram_buf_flag: id == 4,
                dram_io_flag: false,
                dram_io_flag_is_remote: false,
                dram_chan: 0,
                dram_addr: 0,
                q_slots: 2,
                size_tiles: 4,
                tile_size: 0x880,
            },
        );
    }

    let mut pipes = BTreeMap::new();
    pipes.insert(
        10,
        Pipe {
            id: 10,
            inputs: vec![1, 2],
            outputs: vec![3],
        },
    );

    Graph {
        name: format!("graph_{epoch_id}"),
        epoch_id,
        target_device: 0,
        ops,
        buffers,
        pipes,
        bindings: Vec::new(),
    }
}

#[test]
fn op_grid_queries() {
    let graph = sample_graph(0);
    let (name, op) = graph.op_at((2, 4)).unwrap();
    assert_eq!(name, "mm");
    assert!(op.contains((1, 2)));
    assert!(!op.contains((3, 2)));
    assert!(graph.op_at((0, 0)).is_none());
    assert_eq!(op.locations().count(), 6);
    assert_eq!(op.locations().next(), Some((1, 2)));
}

#[test]
fn buffer_and_pipe_adjacency() {
    let graph = sample_graph(0);
    assert_eq!(graph.buffers_on_core((1, 2)), [1, 3]);
    assert_eq!(graph.core_of_buffer(2), Some((1, 3)));
    assert_eq!(graph.core_of_buffer(99), None);

    let reading: Vec<u64> = graph.pipes_reading(1).map(|p| p.id).collect();
    assert_eq!(reading, [10]);
    assert!(graph.pipes_reading(3).next().is_none());
    let writing: Vec<u64> = graph.pipes_writing(3).map(|p| p.id).collect();
    assert_eq!(writing, [10]);
}

#[test]
fn buffer_geometry() {
    let graph = sample_graph(0);
    let buf = graph.buffer(1).unwrap();
    assert_eq!(buf.slot_size_bytes(), 4 * 0x880);
    assert_eq!(buf.queue_size_bytes(), 2 * 4 * 0x880);
    assert!(!buf.is_dram_resident());
    assert!(graph.buffer(4).unwrap().is_dram_resident());
}

#[test]
fn netlist_lookup() {
    let netlist = Netlist {
        graphs: vec![sample_graph(1), sample_graph(0)],
    };
    assert_eq!(netlist.epoch_ids(), [0, 1]);
    assert_eq!(netlist.graph(1).unwrap().name, "graph_1");
    assert!(netlist.graph(7).is_none());

    let touching = netlist.pipes_touching(2);
    assert_eq!(touching, [(1, 10), (0, 10)]);
}
