use uuid::Uuid;

const ALPHABET: &[u8; 57] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// 57^22 > 2^128, so every v4 uuid fits in 22 digits.
pub const SHORT_ID_LEN: usize = 22;

/// Random v4 uuid written in base57, most significant digit first and left-padded
/// with the zero digit.
pub fn short_id() -> String {
    encode(Uuid::new_v4().as_u128())
}

fn encode(mut value: u128) -> String {
    let base = ALPHABET.len() as u128;
    let mut digits = Vec::with_capacity(SHORT_ID_LEN);
    while value > 0 {
        digits.push(ALPHABET[(value % base) as usize]);
        value /= base;
    }
    digits.resize(SHORT_ID_LEN, ALPHABET[0]);
    digits.reverse();
    digits.into_iter().map(char::from).collect()
}
