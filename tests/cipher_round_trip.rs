use std::any::Any;

use cryptoframe_core::{
    Blob, Cipher, CipherParams, CryptoError, CryptoMode, Key, ObjectBase, ResultCode, SymKeyGenerator,
};
use proptest::prelude::*;

fn key(algorithm: &str) -> Box<dyn Key> {
    SymKeyGenerator::create(algorithm).unwrap().generate_sym_key().unwrap()
}

fn converted(algorithm: &str, material: &[u8]) -> Box<dyn Key> {
    SymKeyGenerator::create(algorithm)
        .unwrap()
        .convert_sym_key(&Blob::new(material.to_vec()))
        .unwrap()
}

/// Runs `input` through `cipher` in `chunk`-sized updates plus a bare final.
fn run(cipher: &mut Cipher, input: &[u8], chunk: usize) -> Vec<u8> {
    let mut out = Vec::new();
    for piece in input.chunks(chunk) {
        out.extend_from_slice(cipher.update(&Blob::new(piece.to_vec())).unwrap().as_slice());
    }
    out.extend_from_slice(cipher.do_final(None).unwrap().as_slice());
    out
}

fn params_for(transformation: &str) -> CipherParams {
    match transformation.split('|').nth(1) {
        Some("ECB") => CipherParams::None,
        Some("GCM") => CipherParams::Gcm { iv: vec![9; 12], aad: vec![1, 2, 3], tag: vec![0; 16] },
        _ if transformation.starts_with("3DES") => CipherParams::Iv(vec![5; 8]),
        _ => CipherParams::Iv(vec![5; 16]),
    }
}

proptest! {
    /// Decrypting what was encrypted returns the plaintext, however the input is split.
    #[test]
    fn prop_round_trip(
        transformation in prop::sample::select(vec![
            "AES128|ECB|PKCS7",
            "AES128|CBC|PKCS5",
            "AES192|CTR|NoPadding",
            "AES256|OFB|NoPadding",
            "AES128|CFB|NoPadding",
            "AES256|CFB8|NoPadding",
            "AES192|CFB1|NoPadding",
            "3DES192|ECB|PKCS5",
            "3DES192|CBC|PKCS7",
            "3DES192|OFB|NoPadding",
            "3DES192|CFB|NoPadding",
        ]),
        plain in prop::collection::vec(any::<u8>(), 1..200),
        chunk in 1usize..40,
    ) {
        let algorithm = transformation.split('|').next().unwrap();
        let key = key(algorithm);
        let params = params_for(transformation);
        let mut cipher = Cipher::create(transformation).unwrap();

        cipher.init(CryptoMode::Encrypt, &*key, &params).unwrap();
        let sealed = run(&mut cipher, &plain, chunk);
        cipher.init(CryptoMode::Decrypt, &*key, &params).unwrap();
        let opened = run(&mut cipher, &sealed, chunk);
        prop_assert_eq!(opened, plain);
    }
}

#[test]
fn aes_128_ecb_known_answer() {
    let key = converted("AES128", &hex::decode("000102030405060708090a0b0c0d0e0f").unwrap());
    let plain = hex::decode("00112233445566778899aabbccddeeff").unwrap();
    let mut cipher = Cipher::create("AES128|ECB|NoPadding").unwrap();
    cipher.init(CryptoMode::Encrypt, &*key, &CipherParams::None).unwrap();
    let sealed = cipher.do_final(Some(&Blob::new(plain))).unwrap();
    assert_eq!(hex::encode(sealed.as_slice()), "69c4e0d86a7b0430d8cdb78070b4c55a");
}

#[test]
fn gcm_tag_travels_with_ciphertext() {
    let key = key("AES128");
    let mut cipher = Cipher::create("AES128|GCM|NoPadding").unwrap();
    let seal = CipherParams::Gcm { iv: vec![0; 12], aad: vec![0; 8], tag: vec![0; 16] };
    cipher.init(CryptoMode::Encrypt, &*key, &seal).unwrap();
    let head = cipher.update(&Blob::new(b"hello ".to_vec())).unwrap().to_vec();
    let tail = cipher.do_final(Some(&Blob::new(b"world".to_vec()))).unwrap().to_vec();
    let sealed = [head, tail].concat();
    assert_eq!(sealed.len(), 11 + 16);

    let (ct, tag) = sealed.split_at(11);
    let open = CipherParams::Gcm { iv: vec![0; 12], aad: vec![0; 8], tag: tag.to_vec() };
    cipher.init(CryptoMode::Decrypt, &*key, &open).unwrap();
    assert_eq!(cipher.do_final(Some(&Blob::new(ct.to_vec()))).unwrap().as_slice(), b"hello world");

    let wrong_aad = CipherParams::Gcm { iv: vec![0; 12], aad: vec![1; 8], tag: tag.to_vec() };
    cipher.init(CryptoMode::Decrypt, &*key, &wrong_aad).unwrap();
    let result = cipher.do_final(Some(&Blob::new(ct.to_vec())));
    assert_eq!(ResultCode::of(&result), ResultCode::CryptoOperationFailure);
}

#[test]
fn key_of_another_algorithm_is_rejected() {
    let key = key("AES256");
    let mut cipher = Cipher::create("AES128|CBC|PKCS7").unwrap();
    let result = cipher.init(CryptoMode::Encrypt, &*key, &CipherParams::Iv(vec![0; 16]));
    assert_eq!(ResultCode::of(&result), ResultCode::InvalidParams);
}

#[test]
fn foreign_key_class_is_rejected() {
    struct ForeignKey;
    impl ObjectBase for ForeignKey {
        fn class(&self) -> &'static str {
            "ForeignKey"
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
    }
    impl Key for ForeignKey {
        fn algorithm(&self) -> &str {
            "AES128"
        }
        fn format(&self) -> &str {
            "RAW"
        }
        fn encoded(&self) -> cryptoframe_core::Result<Blob> {
            Ok(Blob::new(vec![1; 16]))
        }
    }

    let mut cipher = Cipher::create("AES128|ECB|PKCS7").unwrap();
    assert!(matches!(
        cipher.init(CryptoMode::Encrypt, &ForeignKey, &CipherParams::None),
        Err(CryptoError::InvalidParams(_))
    ));
    assert!(matches!(cipher.do_final(None), Err(CryptoError::CryptoOperation(_))));
}

#[test]
fn pkcs7_padding_is_visible_to_an_unpadded_decrypt() {
    let key = key("3DES192");
    let iv = CipherParams::Iv(vec![0; 8]);
    let mut cipher = Cipher::create("3DES192|CBC|PKCS7").unwrap();
    cipher.init(CryptoMode::Encrypt, &*key, &iv).unwrap();
    let sealed = cipher.do_final(Some(&Blob::new(b"seven b".to_vec()))).unwrap().to_vec();
    assert_eq!(sealed.len(), 8);

    let mut cipher = Cipher::create("3DES192|CBC|NoPadding").unwrap();
    cipher.init(CryptoMode::Decrypt, &*key, &iv).unwrap();
    let raw = cipher.do_final(Some(&Blob::new(sealed))).unwrap();
    assert_eq!(&raw.as_slice()[..7], b"seven b");
    assert_eq!(raw.as_slice()[7], 1);
}
