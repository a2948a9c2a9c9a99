use super::*;

#[test]
fn map_range_matches_linear_remap() {
    assert_eq!(map_range(20.0, 20.0, 300.0, 40.0, 140.0), 40.0);
    assert_eq!(map_range(300.0, 20.0, 300.0, 40.0, 140.0), 140.0);
    // Unclamped outside the source range.
    assert!(map_range(-5.0, 1.0, 20.0, 26.0, 12.0) > 26.0);
    assert_eq!(map_range(3.0, 1.0, 1.0, 7.0, 9.0), 7.0);
}

#[test]
fn constrain_handles_nan() {
    assert_eq!(constrain(f64::NAN, 1.0, 20.0), 1.0);
    assert_eq!(constrain(-5.0, 1.0, 20.0), 1.0);
    assert_eq!(constrain(50.0, 1.0, 20.0), 20.0);
}

#[test]
fn unit_index_stays_in_bounds() {
    for len in [1usize, 2, 5] {
        for n in [0.0, 0.2, 0.5, 0.999, 1.0, 1.5, -0.3] {
            assert!(unit_index(n, len) < len);
        }
    }
    assert_eq!(unit_index(0.999, 5), 4);
    assert_eq!(unit_index(0.5, 2), 1);
    assert_eq!(unit_index(0.3, 0), 0);
}

#[test]
fn trunc_count_truncates_toward_zero() {
    assert_eq!(trunc_count(95.36), 95);
    assert_eq!(trunc_count(-2.0), 0);
    assert_eq!(trunc_count(f64::INFINITY), 0);
}

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn constrain_with_crossed_bounds_prefers_hi() {
    assert_eq!(constrain(5.0, 10.0, 2.0), 2.0);
}
