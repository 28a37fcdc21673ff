use super::*;

#[test]
fn new_buffer_is_zeroed_with_exact_len() {
    for (w, h) in [(1, 1), (3, 7), (16, 2)] {
        let buf = PixelBuffer::new(w, h).unwrap();
        assert_eq!(buf.len(), (w * h) as usize);
        for y in 0..i64::from(h) {
            for x in 0..i64::from(w) {
                assert_eq!(buf.get_pixel(x, y), Color::TRANSPARENT);
            }
        }
    }
}

#[test]
fn non_positive_dimensions_are_rejected() {
    for (w, h) in [(0, 1), (1, 0), (-3, 4), (4, -3)] {
        assert!(matches!(
            PixelBuffer::new(w, h),
            Err(SirenError::InvalidDimension { .. })
        ));
    }
}

#[test]
fn clear_fills_every_pixel() {
    let mut buf = PixelBuffer::new(5, 4).unwrap();
    buf.clear(Color(0xFF12_3456));
    assert!(buf.pixels().iter().all(|&c| c == Color(0xFF12_3456)));
}

#[test]
fn set_get_round_trip_and_out_of_bounds_is_noop() {
    let mut buf = PixelBuffer::new(4, 3).unwrap();
    buf.set_pixel(3, 2, Color(0x0102_0304));
    assert_eq!(buf.get_pixel(3, 2), Color(0x0102_0304));
    assert_eq!(buf.pixels()[3 + 2 * 4], Color(0x0102_0304));

    let before = buf.clone();
    for (x, y) in [(-1, 0), (4, 0), (0, 3), (0, -1), (100, 100)] {
        buf.set_pixel(x, y, Color(0xFFFF_FFFF));
        assert_eq!(buf.get_pixel(x, y), Color::TRANSPARENT);
    }
    assert_eq!(buf, before);
}

#[test]
fn x_past_width_does_not_wrap_into_next_row() {
    let mut buf = PixelBuffer::new(4, 4).unwrap();
    buf.set_pixel(4, 0, Color(0xFFFF_FFFF));
    assert_eq!(buf.get_pixel(0, 1), Color::TRANSPARENT);
}

#[test]
fn draw_pixel_overwrites_opaque_and_blends_translucent() {
    let mut buf = PixelBuffer::new(2, 1).unwrap();
    buf.clear(Color::pack(255, 0, 0, 200));

    buf.draw_pixel(0, 0, Color(0xFF00_FF00));
    assert_eq!(buf.get_pixel(0, 0), Color(0xFF00_FF00));

    buf.draw_pixel(1, 0, Color::pack(0, 255, 255, 255));
    assert_eq!(buf.get_pixel(1, 0), Color::pack(255, 0, 0, 200));

    buf.draw_pixel(9, 9, Color(0xFFFF_FFFF));
}

#[test]
fn draw_pixel_at_guards_index_range() {
    let mut buf = PixelBuffer::new(2, 2).unwrap();
    buf.draw_pixel_at(3, Color(0xFFAB_CDEF));
    assert_eq!(buf.get_pixel(1, 1), Color(0xFFAB_CDEF));

    let before = buf.clone();
    buf.draw_pixel_at(4, Color(0xFFFF_FFFF));
    buf.draw_pixel_at(usize::MAX, Color(0xFFFF_FFFF));
    assert_eq!(buf, before);
}

#[test]
fn rgba8_conversion_round_trips() {
    let rgba = [10u8, 20, 30, 40, 50, 60, 70, 255];
    let buf = PixelBuffer::from_rgba8(2, 1, &rgba).unwrap();
    assert_eq!(buf.get_pixel(1, 0), Color(0xFF32_3C46));
    assert_eq!(buf.to_rgba8(), rgba);

    assert!(PixelBuffer::from_rgba8(2, 1, &rgba[..7]).is_err());
    assert!(PixelBuffer::from_rgba8(3, 1, &rgba).is_err());
}
