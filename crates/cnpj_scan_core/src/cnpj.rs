//! CNPJ format checks and the lookup-service seam.
//!
//! The numeric root used throughout is `value / 10_000`, the rule the
//! existing lookup service and form validator apply. For a 14-digit CNPJ
//! this keeps the 8-digit root plus the first two branch digits.

use std::collections::BTreeSet;
use std::convert::Infallible;
use std::fmt;

use thiserror::Error;

pub const CNPJ_LEN: usize = 14;
const MAX_VALUE: u64 = 99_999_999_999_999;
const ROOT_DIVISOR: u64 = 10_000;

const FIRST_DIGIT_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const SECOND_DIGIT_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CnpjError {
    #[error("CNPJ must have 14 digits (got {found})")]
    InvalidLength { found: usize },
    #[error("CNPJ must contain digits only")]
    NonDigit,
    #[error("CNPJ value {0} is out of range")]
    OutOfRange(u64),
    #[error("CNPJ {cnpj} does not belong to headquarters {matriz}")]
    NotABranchOf { cnpj: Cnpj, matriz: Cnpj },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cnpj(u64);

impl Cnpj {
    /// Parses exactly 14 ASCII digits.
    pub fn parse(input: &str) -> Result<Self, CnpjError> {
        check_length(input)?;
        if !input.bytes().all(|b| b.is_ascii_digit()) {
            return Err(CnpjError::NonDigit);
        }
        let value = input.parse::<u64>().map_err(|_| CnpjError::NonDigit)?;
        Ok(Self(value))
    }

    /// Wraps a stored numeric CNPJ; leading zeros are implied.
    pub fn from_value(value: u64) -> Result<Self, CnpjError> {
        if value > MAX_VALUE {
            return Err(CnpjError::OutOfRange(value));
        }
        Ok(Self(value))
    }

    pub fn value(self) -> u64 {
        self.0
    }

    pub fn root_key(self) -> u64 {
        self.0 / ROOT_DIVISOR
    }

    pub fn same_root(self, other: Cnpj) -> bool {
        self.root_key() == other.root_key()
    }

    pub fn digits(self) -> [u8; CNPJ_LEN] {
        let mut out = [0u8; CNPJ_LEN];
        let mut rest = self.0;
        for slot in out.iter_mut().rev() {
            *slot = (rest % 10) as u8;
            rest /= 10;
        }
        out
    }

    /// Stand-in check used by the legacy web form: compares the last two
    /// digits against the two before them. This is NOT the real CNPJ check
    /// digit algorithm; see [`Cnpj::mod11_check_digits`].
    pub fn placeholder_check_digits(self) -> bool {
        let base = self.0 / 100;
        base % 100 == self.0 % 100
    }

    /// Weighted mod-11 check digits as defined by the Receita Federal.
    pub fn mod11_check_digits(self) -> bool {
        let digits = self.digits();
        let first = check_digit(&digits[..12], &FIRST_DIGIT_WEIGHTS);
        let second = check_digit(&digits[..13], &SECOND_DIGIT_WEIGHTS);
        digits[12] == first && digits[13] == second
    }

    /// `NN.NNN.NNN/NNNN-NN`
    pub fn formatted(self) -> String {
        let d: String = self.digits().iter().map(|d| char::from(b'0' + d)).collect();
        format!(
            "{}.{}.{}/{}-{}",
            &d[0..2],
            &d[2..5],
            &d[5..8],
            &d[8..12],
            &d[12..14]
        )
    }
}

impl fmt::Display for Cnpj {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:014}", self.0)
    }
}

fn check_digit(digits: &[u8], weights: &[u32]) -> u8 {
    let sum: u32 = digits
        .iter()
        .zip(weights)
        .map(|(d, w)| u32::from(*d) * w)
        .sum();
    let rest = sum % 11;
    if rest < 2 {
        0
    } else {
        (11 - rest) as u8
    }
}

/// Length-only check: exactly 14 characters.
pub fn check_length(input: &str) -> Result<(), CnpjError> {
    let found = input.chars().count();
    if found != CNPJ_LEN {
        return Err(CnpjError::InvalidLength { found });
    }
    Ok(())
}

/// Keeps digits only and truncates to 14, as the input mask does while typing.
pub fn strip_formatting(input: &str) -> String {
    input
        .chars()
        .filter(char::is_ascii_digit)
        .take(CNPJ_LEN)
        .collect()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormValidation {
    pub cnpj: Cnpj,
    /// Result of the legacy placeholder check; this is what the web form
    /// used to accept or reject on.
    pub placeholder_ok: bool,
    pub mod11_ok: bool,
}

/// Validates the registration form: length, optional headquarters root, and
/// both checksum variants.
pub fn validate_form(cnpj: &str, matriz: Option<&str>) -> Result<FormValidation, CnpjError> {
    let parsed = Cnpj::parse(cnpj)?;
    if let Some(matriz) = matriz.filter(|m| !m.is_empty()) {
        let matriz = Cnpj::parse(matriz)?;
        if !parsed.same_root(matriz) {
            return Err(CnpjError::NotABranchOf {
                cnpj: parsed,
                matriz,
            });
        }
    }
    Ok(FormValidation {
        cnpj: parsed,
        placeholder_ok: parsed.placeholder_check_digits(),
        mod11_ok: parsed.mod11_check_digits(),
    })
}

/// Read-only lookups against a store of registered companies.
pub trait CnpjRegistry {
    type Error;

    fn exists(&self, cnpj: Cnpj) -> Result<bool, Self::Error>;

    /// Every registered CNPJ sharing `cnpj`'s root key, including itself.
    fn branches(&self, cnpj: Cnpj) -> Result<Vec<Cnpj>, Self::Error>;
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryRegistry {
    entries: BTreeSet<Cnpj>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, cnpj: Cnpj) {
        self.entries.insert(cnpj);
    }
}

impl FromIterator<Cnpj> for InMemoryRegistry {
    fn from_iter<T: IntoIterator<Item = Cnpj>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl CnpjRegistry for InMemoryRegistry {
    type Error = Infallible;

    fn exists(&self, cnpj: Cnpj) -> Result<bool, Infallible> {
        Ok(self.entries.contains(&cnpj))
    }

    fn branches(&self, cnpj: Cnpj) -> Result<Vec<Cnpj>, Infallible> {
        Ok(self
            .entries
            .iter()
            .copied()
            .filter(|entry| entry.same_root(cnpj))
            .collect())
    }
}
