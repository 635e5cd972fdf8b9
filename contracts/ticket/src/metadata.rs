use soroban_sdk::{Env, String};

/// Longest accepted base URI in bytes
pub const MAX_BASE_URI_LEN: usize = 200;

/// Decimal digits in u64::MAX
const MAX_ID_DIGITS: usize = 20;

/// `base_uri` followed by the decimal form of `token_id`
pub fn token_uri(env: &Env, base_uri: &String, token_id: u64) -> String {
    let base_len = base_uri.len() as usize;
    let mut buf = [0u8; MAX_BASE_URI_LEN + MAX_ID_DIGITS];

    base_uri.copy_into_slice(&mut buf[..base_len]);
    let digits = write_decimal(token_id, &mut buf[base_len..]);

    String::from_bytes(env, &buf[..base_len + digits])
}

/// Writes `value` as ASCII decimal into `out`, returns the digit count
fn write_decimal(mut value: u64, out: &mut [u8]) -> usize {
    let mut reversed = [0u8; MAX_ID_DIGITS];
    let mut len = 0;

    loop {
        reversed[len] = b'0' + (value % 10) as u8;
        len += 1;
        value /= 10;
        if value == 0 {
            break;
        }
    }

    for (i, byte) in out[..len].iter_mut().enumerate() {
        *byte = reversed[len - 1 - i];
    }
    len
}
