#![no_main]

use libfuzzer_sys::fuzz_target;
use cryptoframe_core::codec::decode_cert_chain;
use cryptoframe_core::EncodingFormat;

#[derive(Debug, Clone, arbitrary::Arbitrary)]
struct ChainInput {
    count: u8,
    pem: bool,
    data: Vec<u8>,
}

fuzz_target!(|input: ChainInput| {
    let format = if input.pem { EncodingFormat::Pem } else { EncodingFormat::Der };
    if let Ok(certs) = decode_cert_chain(&input.data, input.count, format) {
        assert!(certs.len() <= usize::from(input.count));
        let payload: usize = certs.iter().map(|c| c.len() + 2).sum();
        assert_eq!(payload, input.data.len());
    }
});
