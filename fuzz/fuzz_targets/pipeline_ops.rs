#![no_main]

use arbitrary::{Arbitrary, Unstructured};
use libfuzzer_sys::fuzz_target;
use sampling_lab::engine::{apply, PixelBuffer};
use sampling_lab::ops::{Interpolation, Operation};

#[derive(Arbitrary, Debug)]
struct OperationSeed {
    kind: u8,
    a: i32,
    b: i32,
    flag: bool,
}

fn method(seed: i32) -> Interpolation {
    match seed.rem_euclid(3) {
        0 => Interpolation::Nearest,
        1 => Interpolation::Bilinear,
        _ => Interpolation::Bicubic,
    }
}

fn build_buffer(data: &[u8]) -> Option<PixelBuffer> {
    let width = data.first().copied().unwrap_or(0) as u32 % 48 + 1;
    let height = data.get(1).copied().unwrap_or(0) as u32 % 48 + 1;
    PixelBuffer::from_fn(width, height, |x, y| {
        let i = (y * width + x) as usize * 3;
        [
            data[i % data.len()],
            data[(i + 1) % data.len()],
            data[(i + 2) % data.len()],
        ]
    })
    .ok()
}

fn seeds_to_ops(seeds: Vec<OperationSeed>) -> Vec<Operation> {
    seeds
        .into_iter()
        .take(4)
        .map(|seed| match seed.kind % 5 {
            0 => Operation::Downsampling {
                factor: seed.a.clamp(2, 32) as u32,
                antialias: seed.flag,
            },
            1 => Operation::Upsampling {
                scale: seed.a.clamp(2, 8) as u32,
                method: method(seed.b),
            },
            2 => Operation::Aliasing {
                factor: seed.a.clamp(2, 32) as u32,
                method: method(seed.b),
            },
            3 => Operation::Sharpen {
                amount: f64::from(seed.a.clamp(0, 300)) / 100.0,
                radius: seed.b.clamp(1, 15) as u32,
            },
            _ => Operation::Contrast {
                alpha: f64::from(seed.a.clamp(50, 300)) / 100.0,
                beta: seed.b.clamp(-100, 100),
            },
        })
        .collect()
}

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    let mut unstructured = Unstructured::new(data);
    let seeds: Vec<OperationSeed> = match Vec::arbitrary(&mut unstructured) {
        Ok(v) => v,
        Err(_) => return,
    };

    let Some(mut buffer) = build_buffer(data) else {
        return;
    };
    for op in seeds_to_ops(seeds) {
        let (w, h) = op.output_dimensions(buffer.width(), buffer.height());
        // Keep chained upsampling bounded.
        if u64::from(w) * u64::from(h) > 4_000_000 {
            break;
        }
        buffer = apply(&op, &buffer);
        assert_eq!(buffer.dimensions(), (w, h));
    }
});
