use super::*;

#[test]
fn transparent_or_invisible_source_keeps_dst() {
    let dst = [10, 20, 30, 40];
    assert_eq!(over(dst, [200, 200, 200, 200], 0), dst);
    assert_eq!(over(dst, [255, 255, 255, 0], 255), dst);
}

#[test]
fn opaque_source_replaces_dst() {
    assert_eq!(over([0, 0, 0, 255], [255, 0, 0, 255], 255), [255, 0, 0, 255]);
}

#[test]
fn empty_dst_returns_source() {
    let src = [100, 110, 120, 200];
    assert_eq!(over([0; 4], src, 255), src);
}

#[test]
fn half_opacity_scales_source() {
    assert_eq!(over([0; 4], [0, 0, 0, 255], 128), [0, 0, 0, 128]);
}

#[test]
fn fill_over_shadow_keeps_fill_color() {
    let mut acc = vec![0, 0, 0, 128, 0, 0, 0, 128];
    let fill = vec![0, 255, 0, 255, 0, 0, 0, 0];
    over_in_place(&mut acc, &fill, 255).unwrap();
    assert_eq!(acc, vec![0, 255, 0, 255, 0, 0, 0, 128]);
}

#[test]
fn mismatched_layers_are_internal_errors() {
    let mut acc = vec![0u8; 8];
    assert!(over_in_place(&mut acc, &[0u8; 4], 255).is_err());
    let mut odd = vec![0u8; 6];
    assert!(over_in_place(&mut odd, &[0u8; 6], 255).is_err());
}
