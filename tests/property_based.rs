use proptest::prelude::*;
use sampling_lab::engine::params::{clamp_float, clamp_int, ALPHA, BETA, DOWNSAMPLING_FACTOR};
use sampling_lab::engine::{
    adjust_contrast, demonstrate_aliasing, downsample, process, unsharp_mask, upsample,
    PixelBuffer, RawParams,
};
use sampling_lab::ops::{Interpolation, ParamValue};

fn create_test_buffer(width: u32, height: u32, seed: u8) -> PixelBuffer {
    PixelBuffer::from_fn(width, height, |x, y| {
        [
            (x.wrapping_mul(37) as u8) ^ seed,
            (y.wrapping_mul(91) as u8).wrapping_add(seed),
            ((x + y) % 256) as u8,
        ]
    })
    .unwrap()
}

fn method_strategy() -> impl Strategy<Value = Interpolation> {
    prop_oneof![
        Just(Interpolation::Nearest),
        Just(Interpolation::Bilinear),
        Just(Interpolation::Bicubic),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn decimation_dimensions(w in 1u32..=80, h in 1u32..=80, factor in 2u32..=32, aa in any::<bool>()) {
        let src = create_test_buffer(w, h, 0);
        let out = downsample(&src, factor, aa);
        prop_assert_eq!(out.dimensions(), ((w / factor).max(1), (h / factor).max(1)));
    }

    #[test]
    fn decimation_without_antialias_picks_block_corner(
        w in 1u32..=80, h in 1u32..=80, factor in 2u32..=32, seed in any::<u8>()
    ) {
        let src = create_test_buffer(w, h, seed);
        let out = downsample(&src, factor, false);
        for y in 0..out.height() {
            for x in 0..out.width() {
                prop_assert_eq!(out.pixel(x, y), src.pixel(x * factor, y * factor));
            }
        }
    }

    #[test]
    fn antialiased_decimation_is_block_mean(
        w in 1u32..=48, h in 1u32..=48, factor in 2u32..=16, seed in any::<u8>()
    ) {
        let src = create_test_buffer(w, h, seed);
        let out = downsample(&src, factor, true);
        for y in 0..out.height() {
            for x in 0..out.width() {
                let (x0, y0) = (x * factor, y * factor);
                let (x1, y1) = ((x0 + factor).min(w), (y0 + factor).min(h));
                let n = f64::from((x1 - x0) * (y1 - y0));
                for c in 0..3 {
                    let mut sum = 0f64;
                    for sy in y0..y1 {
                        for sx in x0..x1 {
                            sum += f64::from(src.pixel(sx, sy)[c]);
                        }
                    }
                    let got = f64::from(out.pixel(x, y)[c]);
                    prop_assert!((got - sum / n).abs() <= 1.0, "channel {} got {} mean {}", c, got, sum / n);
                }
            }
        }
    }

    #[test]
    fn nearest_upsampling_replicates_blocks(
        w in 1u32..=24, h in 1u32..=24, scale in 2u32..=8, seed in any::<u8>()
    ) {
        let src = create_test_buffer(w, h, seed);
        let out = upsample(&src, scale, Interpolation::Nearest);
        prop_assert_eq!(out.dimensions(), (w * scale, h * scale));
        for y in 0..out.height() {
            for x in 0..out.width() {
                prop_assert_eq!(out.pixel(x, y), src.pixel(x / scale, y / scale));
            }
        }
    }

    #[test]
    fn upsampling_dimensions_for_every_method(
        w in 1u32..=16, h in 1u32..=16, scale in 2u32..=8, method in method_strategy()
    ) {
        let out = upsample(&create_test_buffer(w, h, 3), scale, method);
        prop_assert_eq!(out.dimensions(), (w * scale, h * scale));
    }

    #[test]
    fn uniform_buffers_stay_uniform(
        w in 1u32..=20, h in 1u32..=20, scale in 2u32..=8, method in method_strategy(), v in any::<u8>()
    ) {
        let src = PixelBuffer::filled(w, h, [v, v / 2, 255 - v]).unwrap();
        let out = upsample(&src, scale, method);
        prop_assert!(out.as_raw().chunks_exact(3).all(|px| px == [v, v / 2, 255 - v]));
    }

    #[test]
    fn aliasing_preserves_dimensions(
        w in 1u32..=64, h in 1u32..=64, factor in 2u32..=32, method in method_strategy()
    ) {
        let out = demonstrate_aliasing(&create_test_buffer(w, h, 9), factor, method);
        prop_assert_eq!(out.dimensions(), (w, h));
    }

    #[test]
    fn contrast_identity(w in 1u32..=32, h in 1u32..=32, seed in any::<u8>()) {
        let src = create_test_buffer(w, h, seed);
        prop_assert_eq!(adjust_contrast(&src, 1.0, 0), src);
    }

    #[test]
    fn contrast_matches_formula(alpha in 0.5f64..=3.0, beta in -100i32..=100, v in any::<u8>()) {
        let src = PixelBuffer::filled(2, 2, [v, v, v]).unwrap();
        let expected = ((f64::from(v) * alpha).round() as i64 + i64::from(beta)).clamp(0, 255) as u8;
        let out = adjust_contrast(&src, alpha, beta);
        prop_assert!(out.as_raw().iter().all(|&p| p == expected));
    }

    #[test]
    fn unsharp_zero_amount_identity(w in 1u32..=24, h in 1u32..=24, radius in 1u32..=15, seed in any::<u8>()) {
        let src = create_test_buffer(w, h, seed);
        prop_assert_eq!(unsharp_mask(&src, 0.0, radius), src);
    }

    #[test]
    fn integer_sanitizer_stays_in_bounds(raw in ".*", min in -50i64..=0, span in 0i64..=100, pick in 0i64..=100) {
        let max = min + span;
        let default = min + pick.min(span);
        let v = clamp_int(&raw, min, max, default);
        prop_assert!(v >= min && v <= max);
    }

    #[test]
    fn integer_sanitizer_clamps_numbers(n in any::<i64>()) {
        let v = clamp_int(&n.to_string(), 2, 32, 8);
        prop_assert_eq!(v, n.clamp(2, 32));
    }

    #[test]
    fn float_sanitizer_stays_in_bounds(raw in ".*") {
        let v = clamp_float(&raw, 0.0, 3.0, 1.0);
        prop_assert!((0.0..=3.0).contains(&v));
    }

    #[test]
    fn float_sanitizer_clamps_numbers(x in -1e6f64..1e6) {
        let v = clamp_float(&x.to_string(), 0.5, 3.0, 1.3);
        prop_assert_eq!(v, x.clamp(0.5, 3.0));
    }

    #[test]
    fn dispatched_contrast_reports_resolved_values(alpha in ".{0,8}", beta in ".{0,8}") {
        let src = create_test_buffer(4, 4, 1);
        let params = RawParams::new().with("alpha", alpha).with("beta", beta);
        let out = process(&src, "contrast", &params).unwrap();
        match out.metadata.get(ALPHA.name) {
            Some(ParamValue::Float(a)) => prop_assert!(a >= ALPHA.min && a <= ALPHA.max),
            other => prop_assert!(false, "unexpected alpha {:?}", other),
        }
        match out.metadata.get(BETA.name) {
            Some(ParamValue::Int(b)) => prop_assert!(b >= BETA.min && b <= BETA.max),
            other => prop_assert!(false, "unexpected beta {:?}", other),
        }
    }

    #[test]
    fn dispatched_downsampling_factor_in_range(factor in any::<i64>()) {
        let src = create_test_buffer(40, 40, 2);
        let params = RawParams::new().with("factor", factor.to_string());
        let out = process(&src, "downsampling", &params).unwrap();
        let expected = factor.clamp(DOWNSAMPLING_FACTOR.min, DOWNSAMPLING_FACTOR.max);
        prop_assert_eq!(out.metadata.get("factor"), Some(ParamValue::Int(expected)));
    }
}
