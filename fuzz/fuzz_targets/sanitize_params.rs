#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use sampling_lab::engine::params::{
    RawParams, ALIASING_FACTOR, ALPHA, AMOUNT, BETA, DOWNSAMPLING_FACTOR, RADIUS, SCALE,
};
use sampling_lab::ops::{Operation, OperationKind};

#[derive(Arbitrary, Debug)]
struct Input {
    kind: u8,
    fields: Vec<(String, String)>,
}

fuzz_target!(|input: Input| {
    let kind = OperationKind::ALL[input.kind as usize % OperationKind::ALL.len()];
    let params: RawParams = input.fields.into_iter().take(16).collect();

    // Sanitization never fails and always lands inside the declared bounds.
    match Operation::from_params(kind, &params) {
        Operation::Downsampling { factor, .. } => {
            assert!((DOWNSAMPLING_FACTOR.min..=DOWNSAMPLING_FACTOR.max).contains(&i64::from(factor)))
        }
        Operation::Upsampling { scale, .. } => {
            assert!((SCALE.min..=SCALE.max).contains(&i64::from(scale)))
        }
        Operation::Aliasing { factor, .. } => {
            assert!((ALIASING_FACTOR.min..=ALIASING_FACTOR.max).contains(&i64::from(factor)))
        }
        Operation::Sharpen { amount, radius } => {
            assert!((AMOUNT.min..=AMOUNT.max).contains(&amount));
            assert!((RADIUS.min..=RADIUS.max).contains(&i64::from(radius)));
        }
        Operation::Contrast { alpha, beta } => {
            assert!((ALPHA.min..=ALPHA.max).contains(&alpha));
            assert!((BETA.min..=BETA.max).contains(&i64::from(beta)));
        }
    }
});
