#![no_main]

use libfuzzer_sys::fuzz_target;
use sampling_lab::inspect;

fuzz_target!(|data: &[u8]| {
    let _ = inspect(data);
});
