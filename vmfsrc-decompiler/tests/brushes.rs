//! Whole-pipeline reconstruction over a hand-built map: a unit cube and a
//! brush that can't produce a closed solid.

use na::Vector3;

use vmfsrc_bsp::data::{BspData, DBrush, DBrushSide, DLeaf, DModel, DNode, DPlane};
use vmfsrc_decompiler::brush_source::BrushSource;
use vmfsrc_decompiler::config::DecompileConfig;
use vmfsrc_decompiler::side_face_map::SideFaceMapper;
use vmfsrc_decompiler::vmf::{DefaultTextureAxisSource, SequentialUids, VmfWriter};
use vmfsrc_decompiler::winding::WindingFactory;

/// Records writer calls as flat strings for assertions.
#[derive(Default)]
struct RecordingWriter {
    events: Vec<String>,
}

impl VmfWriter for RecordingWriter {
    fn start(&mut self, class: &str) {
        self.events.push(format!("start {}", class));
    }

    fn end(&mut self, class: &str) {
        self.events.push(format!("end {}", class));
    }

    fn put(&mut self, key: &str, value: &str) {
        self.events.push(format!("{} = {}", key, value));
    }
}

impl RecordingWriter {
    fn count(&self, event: &str) -> usize {
        self.events.iter().filter(|e| *e == event).count()
    }
}

fn plane(nx: f32, ny: f32, nz: f32, dist: f32) -> DPlane {
    DPlane {
        normal: Vector3::new(nx, ny, nz),
        dist,
        axis_type: 0,
    }
}

fn side(pnum: i32) -> DBrushSide {
    DBrushSide {
        pnum,
        texinfo: -1,
        dispinfo: -1,
        bevel: false,
    }
}

/// A 32-unit cube (brush 0) and an open five-sided box that can only yield
/// one bounded face (brush 1), both reachable from the worldspawn tree.
fn two_brush_map() -> BspData {
    let planes = vec![
        plane(1.0, 0.0, 0.0, 16.0),
        plane(-1.0, 0.0, 0.0, 16.0),
        plane(0.0, 1.0, 0.0, 16.0),
        plane(0.0, -1.0, 0.0, 16.0),
        plane(0.0, 0.0, 1.0, 16.0),
        plane(0.0, 0.0, -1.0, 16.0),
    ];

    let mut brush_sides: Vec<DBrushSide> = (0..6).map(side).collect();
    brush_sides.extend((0..5).map(side));

    let brushes = vec![
        DBrush {
            fst_side: 0,
            num_side: 6,
            contents: vmfsrc_bsp::data::brushes::CONTENTS_SOLID,
        },
        DBrush {
            fst_side: 6,
            num_side: 5,
            contents: vmfsrc_bsp::data::brushes::CONTENTS_SOLID,
        },
    ];

    BspData {
        planes: planes.into_boxed_slice(),
        brushes: brushes.into_boxed_slice(),
        brush_sides: brush_sides.into_boxed_slice(),
        nodes: vec![DNode {
            plane_num: 0,
            children: [-1, -2],
            fst_face: 0,
            num_face: 0,
        }]
        .into_boxed_slice(),
        leaves: vec![
            DLeaf {
                contents: 0,
                cluster: 0,
                area_flags: 0,
                fst_leaf_face: 0,
                num_leaf_faces: 0,
                fst_leaf_brush: 0,
                num_leaf_brushes: 1,
            },
            DLeaf {
                contents: 0,
                cluster: 0,
                area_flags: 0,
                fst_leaf_face: 0,
                num_leaf_faces: 0,
                fst_leaf_brush: 1,
                num_leaf_brushes: 1,
            },
        ]
        .into_boxed_slice(),
        leaf_brushes: vec![0, 1].into_boxed_slice(),
        models: vec![DModel {
            mins: Vector3::new(-16.0, -16.0, -16.0),
            maxs: Vector3::new(16.0, 16.0, 16.0),
            origin: Vector3::zeros(),
            head_node: 0,
            fst_face: 0,
            num_face: 0,
        }]
        .into_boxed_slice(),
        ..Default::default()
    }
}

#[test]
fn cube_emits_and_degenerate_brush_is_skipped() {
    let bsp = two_brush_map();
    let config = DecompileConfig::default();
    let mut factory = WindingFactory::new(32768);
    let side_face = SideFaceMapper::build(&bsp, &mut factory);
    let mut writer = RecordingWriter::default();
    let texsrc = DefaultTextureAxisSource;
    let mut uids = SequentialUids::new();

    let mut source = BrushSource::new(
        &bsp,
        &config,
        &mut factory,
        &side_face,
        &mut writer,
        &texsrc,
        &mut uids,
    );

    assert_eq!(source.world_brushes(), 2);

    source.write_brushes().unwrap();

    // only the cube makes it through
    let cube_id = source.brush_id_for_index(0);
    assert!(cube_id.is_some());
    assert_eq!(source.brush_id_for_index(1), None);

    // ids are only handed out for emitted sides
    for ibside in 0..6 {
        assert!(source.brush_side_id_for_index(ibside).is_some());
    }
    for ibside in 6..11 {
        assert_eq!(source.brush_side_id_for_index(ibside), None);
    }

    // side ids are unique
    let mut ids: Vec<i32> = (0..6)
        .map(|i| source.brush_side_id_for_index(i).unwrap())
        .collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 6);

    assert_eq!(writer.count("start solid"), 1);
    assert_eq!(writer.count("end solid"), 1);
    assert_eq!(writer.count("start side"), 6);
    assert_eq!(writer.count("end side"), 6);
    assert_eq!(writer.count("smoothing_groups = 0"), 6);
}

#[test]
fn cube_sides_are_bounded_squares() {
    let bsp = two_brush_map();
    let mut factory = WindingFactory::new(32768);

    for ibside in 0..6 {
        let w = factory
            .from_side(&bsp, 0, ibside)
            .unwrap()
            .remove_degenerated();

        assert_eq!(w.len(), 4, "side {}", ibside);
        assert!(!factory.is_huge(&w), "side {}", ibside);
        for v in w.iter() {
            assert!(v.iter().all(|c| c.abs() == 16.0), "side {}: {:?}", ibside, v);
        }
    }
}

#[test]
fn side_outside_its_brush_is_malformed() {
    let bsp = two_brush_map();
    let mut factory = WindingFactory::new(32768);

    // side 7 belongs to brush 1
    assert!(factory.from_side(&bsp, 0, 7).is_err());
}

#[test]
fn model_instances_are_translated() {
    let bsp = two_brush_map();
    let config = DecompileConfig::default();
    let mut factory = WindingFactory::new(32768);
    let side_face = SideFaceMapper::build(&bsp, &mut factory);
    let mut writer = RecordingWriter::default();
    let texsrc = DefaultTextureAxisSource;
    let mut uids = SequentialUids::new();

    let mut source = BrushSource::new(
        &bsp,
        &config,
        &mut factory,
        &side_face,
        &mut writer,
        &texsrc,
        &mut uids,
    );

    let origin = Vector3::new(0.0, 0.0, 128.0);
    assert!(source.write_model(0, Some(&origin), None).unwrap());

    // a model index past the table is only a warning
    assert!(!source.write_model(9, None, None).unwrap());

    // the +z face of the translated cube sits at z = 144
    let planes: Vec<&String> = writer
        .events
        .iter()
        .filter(|e| e.starts_with("plane = "))
        .collect();
    assert_eq!(planes.len(), 6);
    assert!(
        planes.iter().any(|p| p.contains("144")),
        "no translated plane in {:?}",
        planes
    );
}

#[test]
fn detail_brushes_are_left_to_the_entity_pass() {
    let mut bsp = two_brush_map();
    {
        let brushes = &mut bsp.brushes;
        brushes[0] = DBrush {
            contents: vmfsrc_bsp::data::brushes::CONTENTS_SOLID
                | vmfsrc_bsp::data::brushes::CONTENTS_DETAIL,
            ..brushes[0]
        };
    }

    let config = DecompileConfig::default();
    let mut factory = WindingFactory::new(32768);
    let side_face = SideFaceMapper::build(&bsp, &mut factory);
    let mut writer = RecordingWriter::default();
    let texsrc = DefaultTextureAxisSource;
    let mut uids = SequentialUids::new();

    let mut source = BrushSource::new(
        &bsp,
        &config,
        &mut factory,
        &side_face,
        &mut writer,
        &texsrc,
        &mut uids,
    );

    source.write_brushes().unwrap();

    assert_eq!(source.brush_id_for_index(0), None);
    assert_eq!(writer.count("start solid"), 0);
}
