#![no_main]

use libfuzzer_sys::fuzz_target;
use cryptoframe_core::{CertChainData, CertChainValidator, EncodingFormat, ResultCode};

// Arbitrary wire input must come back as a taxonomy code, never a panic.
fuzz_target!(|input: (u8, bool, Vec<u8>)| {
    let (count, pem, data) = input;
    let format = if pem { EncodingFormat::Pem } else { EncodingFormat::Der };
    let validator = match CertChainValidator::create("PKIX") {
        Ok(v) => v,
        Err(_) => return,
    };
    let code = ResultCode::of(&validator.validate(&CertChainData::new(data, count, format)));
    assert_ne!(code, ResultCode::Success);
});
