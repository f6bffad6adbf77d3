use super::algorithm::Algorithm;

/// Calculate the key tag for a DNSKEY record (RFC 4034 Appendix B)
pub fn calculate_key_tag(flags: u16, protocol: u8, algorithm: u8, public_key: &[u8]) -> u16 {
    // RSA/MD5 keys use the most significant 16 bits of the least
    // significant 24 bits of the modulus (Appendix B.1)
    if algorithm == Algorithm::RsaMd5.to_u8() {
        let len = public_key.len();
        if len >= 3 {
            return u16::from_be_bytes([public_key[len - 3], public_key[len - 2]]);
        }
        return 0;
    }

    // flags (2) + protocol (1) + algorithm (1) + public key, summed as
    // alternating high and low octets
    let header = [
        (flags >> 8) as u8,
        flags as u8,
        protocol,
        algorithm,
    ];
    // public keys here are not bounded by a 16-bit RDLENGTH
    let mut accumulator: u64 = 0;
    for (i, &byte) in header.iter().chain(public_key).enumerate() {
        if i % 2 == 0 {
            accumulator += u64::from(byte) << 8;
        } else {
            accumulator += u64::from(byte);
        }
    }

    accumulator += (accumulator >> 16) & 0xFFFF;
    (accumulator & 0xFFFF) as u16
}
