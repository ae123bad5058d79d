//! Loader scenarios: idents, dialect headers and descriptor clamping.

mod helpers;

use helpers::FileBuilder;

use vmfsrc_bsp::app;
use vmfsrc_bsp::buffer::Endianness;
use vmfsrc_bsp::file::HEADER_SIZE;
use vmfsrc_bsp::{BspError, BspFile, LumpType};

#[test]
fn big_endian_map_loads() {
    let data = FileBuilder::new(19).map_rev(42).big_endian().build();

    let bsp = BspFile::from_bytes("console", data).unwrap();
    assert_eq!(bsp.byte_order(), Endianness::Big);
    assert_eq!(bsp.version(), 19);
    assert_eq!(bsp.revision(), 42);
    assert_eq!(bsp.lumps().len(), 64);
}

#[test]
fn little_endian_map_loads() {
    let data = FileBuilder::new(20)
        .map_rev(7)
        .lump(LumpType::Planes.index(), &[1, 2, 3, 4])
        .build();

    let bsp = BspFile::from_bytes("pc", data).unwrap();
    assert_eq!(bsp.byte_order(), Endianness::Little);
    assert_eq!(bsp.version(), 20);
    assert_eq!(bsp.revision(), 7);
    assert_eq!(bsp.get_lump(LumpType::Planes).buffer(), &[1, 2, 3, 4]);
    assert_eq!(bsp.app_id(), app::UNKNOWN);
}

#[test]
fn oversized_lump_offset_is_clamped() {
    let builder = FileBuilder::new(20);
    let mut data = builder.build();

    // descriptor 0: offset far past the end, length 1
    data[8..12].copy_from_slice(&0x7FFF_FFFFi32.to_le_bytes());
    data[12..16].copy_from_slice(&1i32.to_le_bytes());

    let bsp = BspFile::from_bytes("broken", data).unwrap();
    let lump = bsp.get_lump(LumpType::Entities);
    assert_eq!(lump.offset(), HEADER_SIZE as i32);
    assert_eq!(lump.length(), 0);
}

#[test]
fn negative_lump_offset_is_zeroed() {
    let mut data = FileBuilder::new(20).build();

    data[8..12].copy_from_slice(&(-20i32).to_le_bytes());
    data[12..16].copy_from_slice(&100i32.to_le_bytes());

    let bsp = BspFile::from_bytes("broken", data).unwrap();
    let lump = bsp.get_lump(LumpType::Entities);
    assert_eq!(lump.offset(), 0);
    assert_eq!(lump.length(), 0);
}

#[test]
fn overlong_lump_is_shortened() {
    let total;
    let mut data = {
        let b = FileBuilder::new(20).lump(LumpType::Planes.index(), &[0u8; 16]);
        let built = b.build();
        total = built.len() as i32;
        built
    };

    // descriptor 1: length runs past the end of the file
    let base = 8 + 16;
    data[base + 4..base + 8].copy_from_slice(&5000i32.to_le_bytes());

    let bsp = BspFile::from_bytes("broken", data).unwrap();
    let lump = bsp.get_lump(LumpType::Planes);
    assert_eq!(lump.offset(), HEADER_SIZE as i32);
    assert_eq!(lump.length(), total - HEADER_SIZE as i32);
}

#[test]
fn l4d2_descriptor_order_is_detected() {
    let data = FileBuilder::new(21)
        .l4d2_order()
        .lump(LumpType::Vertices.index(), b"vertdata")
        .build();

    let bsp = BspFile::from_bytes("l4d2", data).unwrap();
    assert_eq!(bsp.app_id(), app::LEFT_4_DEAD_2);
    assert_eq!(bsp.get_lump(LumpType::Vertices).buffer(), b"vertdata");
}

#[test]
fn dark_messiah_version_is_masked() {
    let mut data = FileBuilder::new(0).build();
    data[4..8].copy_from_slice(&0x0004_0014i32.to_le_bytes());

    let bsp = BspFile::from_bytes("darkmessiah", data).unwrap();
    assert_eq!(bsp.app_id(), app::DARK_MESSIAH);
    assert_eq!(bsp.version(), 0x14);
}

#[test]
fn contagion_consumes_an_extra_field() {
    // the extra int shifts everything behind it by four bytes
    let mut data = vec![0u8; HEADER_SIZE + 4];
    data[0..4].copy_from_slice(b"VBSP");
    data[4..8].copy_from_slice(&27i32.to_le_bytes());
    let rev_at = 8 + 4 + 16 * 64;
    data[rev_at..rev_at + 4].copy_from_slice(&99i32.to_le_bytes());

    let bsp = BspFile::from_bytes("contagion", data).unwrap();
    assert_eq!(bsp.app_id(), app::CONTAGION);
    assert_eq!(bsp.version(), 27);
    assert_eq!(bsp.revision(), 99);
}

#[test]
fn titanfall_header_has_128_lumps() {
    // ident, version, map revision, the fixed 127, then the directory
    let table_at = 16;
    let mut data = vec![0u8; table_at + 128 * 16];
    data[0..4].copy_from_slice(b"rBSP");
    data[4..8].copy_from_slice(&29i32.to_le_bytes());
    data[8..12].copy_from_slice(&12i32.to_le_bytes());
    data[12..16].copy_from_slice(&127i32.to_le_bytes());

    let bsp = BspFile::from_bytes("titanfall", data).unwrap();
    assert_eq!(bsp.app_id(), app::TITANFALL);
    assert_eq!(bsp.version(), 29);
    assert_eq!(bsp.revision(), 12);
    assert_eq!(bsp.lumps().len(), 128);
}

#[test]
fn ciphered_map_is_deciphered() {
    let plain = FileBuilder::new(20)
        .lump(LumpType::Planes.index(), &[9, 9, 9, 9])
        .build();

    // the key region holds zeros in the plaintext, so ciphering the whole
    // buffer leaves the key readable at its fixed location
    let mut key = [0u8; 32];
    for (i, k) in key.iter_mut().enumerate() {
        *k = (i * 11 + 1) as u8;
    }

    let mut ciphered = plain.clone();
    for (i, b) in ciphered.iter_mut().enumerate() {
        *b ^= key[i % 32];
    }
    assert_ne!(&ciphered[0..4], b"VBSP");

    let bsp = BspFile::from_bytes("ciphered", ciphered).unwrap();
    assert_eq!(bsp.app_id(), app::TACTICAL_INTERVENTION);
    assert_eq!(bsp.byte_order(), Endianness::Little);
    assert_eq!(bsp.version(), 20);
    assert_eq!(bsp.get_lump(LumpType::Planes).buffer(), &[9, 9, 9, 9]);
}

#[test]
fn tiny_buffer_is_an_invalid_header() {
    assert!(matches!(
        BspFile::from_bytes("tiny", vec![0x56, 0x42, 0x53]),
        Err(BspError::InvalidHeader)
    ));
}

#[test]
fn version_gated_lumps() {
    let data = FileBuilder::new(19).build();
    let bsp = BspFile::from_bytes("old", data).unwrap();

    assert!(bsp.can_read_lump(LumpType::Brushes));
    assert!(!bsp.can_read_lump(LumpType::LightingHdr));

    let data = FileBuilder::new(20).build();
    let bsp = BspFile::from_bytes("new", data).unwrap();
    assert!(bsp.can_read_lump(LumpType::LightingHdr));
}
