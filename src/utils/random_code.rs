use rand::Rng;

const PASSWORD_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789!@#$%";
const HEX_CHARSET: &[u8] = b"0123456789abcdef";

fn random_from(charset: &[u8], length: usize) -> String {
    let mut rng = rand::rng();
    (0..length)
        .map(|_| charset[rng.random_range(0..charset.len())] as char)
        .collect()
}

/// 4 位数字验证码，允许前导零
pub fn generate_otp_code() -> String {
    format!("{:04}", rand::rng().random_range(0..10_000))
}

pub fn generate_password(length: usize) -> String {
    random_from(PASSWORD_CHARSET, length)
}

pub fn generate_hex(length: usize) -> String {
    random_from(HEX_CHARSET, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_otp_code_shape() {
        for _ in 0..100 {
            let code = generate_otp_code();
            assert_eq!(code.len(), 4);
            assert!(code.chars().all(|c| c.is_ascii_digit()));
        }
    }

    #[test]
    fn test_hex_and_password() {
        let hex = generate_hex(6);
        assert_eq!(hex.len(), 6);
        assert!(hex.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(generate_password(16).len(), 16);
    }
}
