use proptest::prelude::*;
use cryptoframe_core::types::DigestAlgorithm;
use cryptoframe_core::MessageDigest;

fn digest(alg: DigestAlgorithm, chunks: &[Vec<u8>]) -> Vec<u8> {
    let mut md = MessageDigest::create(alg.name()).unwrap();
    for chunk in chunks.iter().filter(|c| !c.is_empty()) {
        md.update_bytes(chunk).unwrap();
    }
    md.do_final().unwrap().to_vec()
}

fn any_algorithm() -> impl Strategy<Value = DigestAlgorithm> {
    prop::sample::select(DigestAlgorithm::ALL.to_vec())
}

proptest! {
    /// Output width always equals the advertised digest length.
    #[test]
    fn prop_digest_width(alg in any_algorithm(), data in prop::collection::vec(any::<u8>(), 0..512)) {
        let md = MessageDigest::create(alg.name()).unwrap();
        let out = digest(alg, &[data]);
        prop_assert_eq!(out.len() as u32, md.md_length());
        prop_assert_eq!(out.len() as u32, alg.output_len());
    }

    /// Same input, same digest.
    #[test]
    fn prop_digest_deterministic(alg in any_algorithm(), data in prop::collection::vec(any::<u8>(), 1..256)) {
        prop_assert_eq!(digest(alg, &[data.clone()]), digest(alg, &[data]));
    }

    /// Splitting the input across updates does not change the digest.
    #[test]
    fn prop_digest_chunking_invariant(
        alg in any_algorithm(),
        data in prop::collection::vec(any::<u8>(), 1..512),
        split in any::<prop::sample::Index>(),
    ) {
        let at = split.index(data.len());
        let (head, tail) = data.split_at(at);
        prop_assert_eq!(
            digest(alg, &[head.to_vec(), tail.to_vec()]),
            digest(alg, &[data.clone()])
        );
    }
}
