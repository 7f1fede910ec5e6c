#![no_main]

use bcn_codec::{decode, decode_block, decode_strict, Format};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Just no panic
    let Some((&shape, data)) = data.split_first() else {
        return;
    };

    for format in Format::ALL {
        let blocks = data.len() / format.block_size();
        if blocks == 0 {
            continue;
        }
        let data = &data[..blocks * format.block_size()];

        // pick some grid that fits the data, or one that doesn't
        let width = (shape as usize % blocks + 1) as u32;
        let height = (blocks as u32 / width).max(1);

        _ = decode(data, width, height, format);
        _ = decode_strict(data, width, height, format);
        _ = decode_block(format, &data[..format.block_size()]);
    }
});
