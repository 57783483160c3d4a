//! Brazilian tax identifiers (CPF for people, CNPJ for companies) and email shape checks.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// Strip the usual `.`, `-` and `/` punctuation so `529.982.247-25` and
/// `52998224725` name the same record.
pub fn normalize(document: &str) -> String {
    document.chars().filter(|c| c.is_ascii_digit()).collect()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn is_valid_cpf(cpf: &str) -> bool {
    let Some(digits) = digits_of(cpf, 11) else {
        return false;
    };

    let check = |len: usize| {
        let sum: u32 = digits[..len]
            .iter()
            .zip((2..=len as u32 + 1).rev())
            .map(|(d, w)| d * w)
            .sum();
        match (sum * 10) % 11 {
            10 => 0,
            r => r,
        }
    };

    check(9) == digits[9] && check(10) == digits[10]
}

pub fn is_valid_cnpj(cnpj: &str) -> bool {
    let Some(digits) = digits_of(cnpj, 14) else {
        return false;
    };

    const FIRST: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
    const SECOND: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

    let check = |weights: &[u32]| {
        let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
        match sum % 11 {
            r if r < 2 => 0,
            r => 11 - r,
        }
    };

    check(&FIRST) == digits[12] && check(&SECOND) == digits[13]
}

/// Digits of `document` when it has exactly `len` of them and they are not
/// all the same (`111.111.111-11` passes the checksum but is never issued).
fn digits_of(document: &str, len: usize) -> Option<Vec<u32>> {
    if document
        .chars()
        .any(|c| !c.is_ascii_digit() && !matches!(c, '.' | '-' | '/' | ' '))
    {
        return None;
    }

    let digits: Vec<u32> = document.chars().filter_map(|c| c.to_digit(10)).collect();
    if digits.len() != len || digits.iter().all(|d| *d == digits[0]) {
        return None;
    }
    Some(digits)
}
