#![no_main]

use libfuzzer_sys::fuzz_target;
use metascrub::formats::{ImageCodec, codec_for};
use metascrub::ImageFormat;

fuzz_target!(|data: &[u8]| {
    for format in ImageFormat::ALL {
        let codec = codec_for(format);
        let detected = codec.detect(data);
        match codec.strip(data) {
            Ok(output) => {
                assert!(detected);
                assert!(output.len() <= data.len());
            }
            Err(_) => {}
        }
    }
});
