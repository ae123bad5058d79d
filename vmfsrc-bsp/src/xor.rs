//! Whole-buffer XOR cipher used by Tactical Intervention maps.

/// Length of the rotating key, read from a fixed offset in the ciphered file.
pub const KEY_LEN: usize = 32;

/// Xor every byte with the rotating key. Symmetric, so this both enciphers
/// and deciphers.
pub fn xor_buffer(data: &mut [u8], key: &[u8; KEY_LEN]) {
    for (i, b) in data.iter_mut().enumerate() {
        *b ^= key[i % KEY_LEN];
    }
}

/// Xor a single 4-byte word as if it sat at offset 0 of a ciphered stream.
pub fn xor_word(word: [u8; 4], key: &[u8; KEY_LEN]) -> [u8; 4] {
    [
        word[0] ^ key[0],
        word[1] ^ key[1],
        word[2] ^ key[2],
        word[3] ^ key[3],
    ]
}

#[test]
fn cipher_is_symmetric() {
    let mut key = [0u8; KEY_LEN];
    for (i, k) in key.iter_mut().enumerate() {
        *k = (i * 7 + 3) as u8;
    }

    let plain: Vec<u8> = (0..100).map(|i| (i * 13) as u8).collect();
    let mut data = plain.clone();

    xor_buffer(&mut data, &key);
    assert_ne!(data, plain);

    xor_buffer(&mut data, &key);
    assert_eq!(data, plain);
}

#[test]
fn key_rotates_every_32_bytes() {
    let mut key = [0u8; KEY_LEN];
    key[0] = 0xFF;

    let mut data = vec![0u8; 64];
    xor_buffer(&mut data, &key);

    assert_eq!(data[0], 0xFF);
    assert_eq!(data[32], 0xFF);
    assert!(data[1..32].iter().all(|&b| b == 0));
}

#[test]
fn word_cipher_matches_buffer_cipher() {
    let mut key = [0u8; KEY_LEN];
    for (i, k) in key.iter_mut().enumerate() {
        *k = i as u8 ^ 0x5A;
    }

    let mut buf = vec![0xDE, 0xAD, 0xBE, 0xEF];
    let word = xor_word([0xDE, 0xAD, 0xBE, 0xEF], &key);
    xor_buffer(&mut buf, &key);
    assert_eq!(&buf[..], &word[..]);
}
