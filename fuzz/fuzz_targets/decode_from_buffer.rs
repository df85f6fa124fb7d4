#![no_main]

use libfuzzer_sys::fuzz_target;
use sampling_lab::engine::decode_image;

fuzz_target!(|data: &[u8]| {
    if data.is_empty() {
        return;
    }

    // Decode errors are expected; only panics that escape the panic policy
    // or inconsistent buffers are bugs.
    if let Ok((buffer, _)) = decode_image(data) {
        let (w, h) = buffer.dimensions();
        assert_eq!(buffer.as_raw().len(), w as usize * h as usize * 3);
    }
});
