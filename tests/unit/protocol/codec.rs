use std::io::Cursor;

use super::*;

fn coded(w: i32, h: i32) -> PixelBuffer {
    let mut b = PixelBuffer::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            b.set_pixel(i64::from(x), i64::from(y), Color::pack(255 - x, x, y, x ^ y));
        }
    }
    b
}

fn sample_set() -> InstructionSet {
    InstructionSet::new(800, 600)
        .unwrap()
        .with_instruction(DrawInstruction::new(coded(3, 2), 400.0, 300.0, 0.0, 1.0, 1.0))
        .with_instruction(DrawInstruction::new(coded(1, 4), 100.5, -7.25, 0.45, 1.0, 1.0))
        .with_instruction(DrawInstruction::new(coded(2, 2), 512.0, 256.0, 0.0, 2.0, 2.0))
}

#[test]
fn image_layout_is_big_endian_row_major() {
    let mut img = PixelBuffer::new(2, 1).unwrap();
    img.set_pixel(0, 0, Color(0xFFFF_0000));
    img.set_pixel(1, 0, Color(0x0102_0304));

    let mut bytes = Vec::new();
    write_image(&mut bytes, &img).unwrap();
    assert_eq!(
        bytes,
        [
            0, 0, 0, 2, // width
            0, 0, 0, 1, // height
            0xFF, 0xFF, 0, 0, //
            1, 2, 3, 4,
        ]
    );

    let back = read_image(&mut bytes.as_slice(), &DecodeLimits::default()).unwrap();
    assert_eq!(back, img);
}

#[test]
fn instruction_floats_follow_the_image() {
    let inst = DrawInstruction::new(coded(1, 1), 1.0, -2.0, 0.5, 3.0, 0.25);
    let mut bytes = Vec::new();
    write_instruction(&mut bytes, &inst).unwrap();

    assert_eq!(bytes.len(), 12 + 20);
    assert_eq!(&bytes[12..16], &1.0f32.to_be_bytes());
    assert_eq!(&bytes[16..20], &(-2.0f32).to_be_bytes());
    assert_eq!(&bytes[28..32], &0.25f32.to_be_bytes());
}

#[test]
fn instruction_set_round_trips() {
    let set = sample_set();
    let mut bytes = Vec::new();
    write_instruction_set(&mut bytes, &set).unwrap();
    assert_eq!(&bytes[..12], &[0, 0, 3, 32, 0, 0, 2, 88, 0, 0, 0, 3]);

    let mut cursor = Cursor::new(bytes);
    let back = read_instruction_set(&mut cursor, &DecodeLimits::default()).unwrap();
    assert_eq!(back, set);
    assert_eq!(cursor.position() as usize, cursor.get_ref().len());
}

#[test]
fn truncated_stream_is_malformed_at_every_cut() {
    let mut bytes = Vec::new();
    write_instruction_set(&mut bytes, &sample_set()).unwrap();

    for cut in [0, 3, 11, 12, 20, 30, bytes.len() - 1] {
        let err = read_instruction_set(&mut &bytes[..cut], &DecodeLimits::default()).unwrap_err();
        assert!(matches!(err, SirenError::MalformedStream(_)), "cut {cut}: {err}");
    }
}

#[test]
fn declared_count_larger_than_payload_is_malformed() {
    let mut bytes = Vec::new();
    for v in [4i32, 4, 1_000_000] {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    let err = read_instruction_set(&mut bytes.as_slice(), &DecodeLimits::default()).unwrap_err();
    assert!(matches!(err, SirenError::MalformedStream(_)));
}

#[test]
fn negative_count_is_malformed() {
    let mut bytes = Vec::new();
    for v in [4i32, 4, -1] {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    let err = read_instruction_set(&mut bytes.as_slice(), &DecodeLimits::default()).unwrap_err();
    assert!(matches!(err, SirenError::MalformedStream(_)));
}

#[test]
fn non_positive_image_dimensions_are_rejected() {
    let mut bytes = Vec::new();
    for v in [0i32, 5] {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    let err = read_image(&mut bytes.as_slice(), &DecodeLimits::default()).unwrap_err();
    assert!(matches!(err, SirenError::InvalidDimension { .. }));
}

#[test]
fn oversized_declarations_are_rejected_before_allocation() {
    let mut bytes = Vec::new();
    for v in [i32::MAX, i32::MAX] {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    let err = read_image(&mut bytes.as_slice(), &DecodeLimits::default()).unwrap_err();
    assert!(matches!(err, SirenError::MalformedStream(_)));

    let tight = DecodeLimits {
        max_image_pixels: 4,
    };
    let mut ok = Vec::new();
    write_image(&mut ok, &coded(2, 2)).unwrap();
    assert!(read_image(&mut ok.as_slice(), &tight).is_ok());

    let mut big = Vec::new();
    write_image(&mut big, &coded(3, 2)).unwrap();
    assert!(read_image(&mut big.as_slice(), &tight).is_err());
}

#[test]
fn unbounded_limits_still_reject_unaddressable_sizes() {
    let mut bytes = Vec::new();
    for v in [i32::MAX, i32::MAX] {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    let err = read_image(&mut bytes.as_slice(), &DecodeLimits::UNBOUNDED).unwrap_err();
    assert!(matches!(err, SirenError::MalformedStream(_)), "{err}");
}

#[test]
fn large_declared_image_without_payload_is_malformed() {
    let mut bytes = Vec::new();
    for v in [50_000i32, 50_000] {
        bytes.extend_from_slice(&v.to_be_bytes());
    }
    bytes.extend_from_slice(&[0xFF; 64]);
    let err = read_image(&mut bytes.as_slice(), &DecodeLimits::UNBOUNDED).unwrap_err();
    assert!(matches!(err, SirenError::MalformedStream(_)), "{err}");
}

#[test]
fn images_larger_than_one_read_chunk_decode_intact() {
    let img = coded(200, 100);
    let mut bytes = Vec::new();
    write_image(&mut bytes, &img).unwrap();
    let back = read_image(&mut bytes.as_slice(), &DecodeLimits::UNBOUNDED).unwrap();
    assert_eq!(back, img);
}
