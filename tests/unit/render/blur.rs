use super::*;

fn canvas(w: u32, h: u32) -> Canvas {
    Canvas::new(w, h).unwrap()
}

#[test]
fn taps_sum_to_one() {
    for (radius, sigma) in [(1, 0.5), (3, 2.0), (8, 2.5)] {
        let k = GaussianKernel::new(radius, sigma).unwrap();
        assert_eq!(k.radius(), radius);
        assert_eq!(k.taps.iter().sum::<u32>(), 1 << 16);
        assert_eq!(k.taps.first(), k.taps.last());
    }
}

#[test]
fn zero_radius_is_identity() {
    let src = vec![1u8, 2, 3, 4, 5, 6, 7, 8];
    let k = GaussianKernel::new(0, 1.0).unwrap();
    assert_eq!(k.apply(canvas(1, 2), &src).unwrap(), src);
}

#[test]
fn flat_layer_is_unchanged() {
    let src = [10u8, 20, 30, 40].repeat(12);
    let k = GaussianKernel::new(3, 2.0).unwrap();
    assert_eq!(k.apply(canvas(4, 3), &src).unwrap(), src);
}

#[test]
fn single_pixel_spreads_symmetrically() {
    let mut src = vec![0u8; 5 * 5 * 4];
    let centre = (2 * 5 + 2) * 4;
    src[centre..centre + 4].copy_from_slice(&[255; 4]);

    let out = GaussianKernel::new(2, 1.2)
        .unwrap()
        .apply(canvas(5, 5), &src)
        .unwrap();
    let alpha = |x: usize, y: usize| out[(y * 5 + x) * 4 + 3];

    assert!(out.chunks_exact(4).filter(|px| px[3] != 0).count() > 1);
    assert_eq!(alpha(1, 2), alpha(3, 2));
    assert_eq!(alpha(2, 1), alpha(2, 3));
    assert_eq!(alpha(1, 2), alpha(2, 1));

    let total: i32 = out.chunks_exact(4).map(|px| i32::from(px[3])).sum();
    assert!((total - 255).abs() <= 4, "{total}");
}

#[test]
fn rejects_bad_inputs() {
    assert!(GaussianKernel::new(1, 0.0).is_err());
    assert!(GaussianKernel::new(1, f32::NAN).is_err());
    let k = GaussianKernel::new(1, 1.0).unwrap();
    assert!(k.apply(canvas(1, 2), &[0u8; 7]).is_err());
}
