//! Country codes and the wildcard country scope.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`CountryCode`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum CountryCodeError {
    /// The input string is empty.
    #[error("country code cannot be empty")]
    Empty,
    /// The input is not exactly two characters long.
    #[error("country code must be exactly 2 letters (got {len})")]
    InvalidLength {
        /// Number of characters in the input.
        len: usize,
    },
    /// The input contains something other than ASCII letters.
    #[error("country code must contain only ASCII letters: {0:?}")]
    InvalidCharacter(String),
}

/// An ISO 3166-1 alpha-2 country code.
///
/// Parsing accepts either case and stores the code upper-cased.
///
/// ## Examples
///
/// ```
/// use shiprate_core::CountryCode;
///
/// let de = CountryCode::parse("de").unwrap();
/// assert_eq!(de.as_str(), "DE");
///
/// assert!(CountryCode::parse("").is_err());
/// assert!(CountryCode::parse("DEU").is_err());
/// assert!(CountryCode::parse("D1").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CountryCode([u8; 2]);

impl CountryCode {
    /// Parse a `CountryCode` from a string.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is empty, is not two characters long,
    /// or contains anything other than ASCII letters.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(CountryCodeError::Empty);
        }

        let len = s.chars().count();
        if len != 2 {
            return Err(CountryCodeError::InvalidLength { len });
        }

        match s.as_bytes() {
            [a, b] if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => {
                Ok(Self([a.to_ascii_uppercase(), b.to_ascii_uppercase()]))
            }
            _ => Err(CountryCodeError::InvalidCharacter(s.to_owned())),
        }
    }

    /// Build a code from two upper-case ASCII letters known at compile time.
    pub(crate) const fn from_ascii(bytes: [u8; 2]) -> Self {
        Self(bytes)
    }

    /// Returns the code as an upper-case string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Only ASCII letters are ever stored.
        core::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl fmt::Display for CountryCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for CountryCode {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryCode {
    type Error = CountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryCode> for String {
    fn from(code: CountryCode) -> Self {
        code.as_str().to_owned()
    }
}

impl AsRef<str> for CountryCode {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// The countries a price record applies to.
///
/// `Any` is the "Rest of World" wildcard: it applies to every destination
/// that has no record of its own. Its serialized form is the empty string;
/// `"*"` is accepted as an alias when parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum CountryScope {
    /// Any country not otherwise covered.
    Any,
    /// A single concrete country.
    Country(CountryCode),
}

impl CountryScope {
    /// Serialized form of the wildcard.
    pub const ANY_CODE: &'static str = "";

    /// Display label of the wildcard.
    pub const ANY_DISPLAY: &'static str = "Rest of World";

    /// Parse a scope; `""` and `"*"` denote the wildcard.
    ///
    /// # Errors
    ///
    /// Returns an error if the input is neither a wildcard nor a valid
    /// country code.
    pub fn parse(s: &str) -> Result<Self, CountryCodeError> {
        match s.trim() {
            "" | "*" => Ok(Self::Any),
            code => CountryCode::parse(code).map(Self::Country),
        }
    }

    /// Returns true for the wildcard scope.
    #[must_use]
    pub const fn is_any(&self) -> bool {
        matches!(self, Self::Any)
    }

    /// Returns the concrete country, if any.
    #[must_use]
    pub const fn country(&self) -> Option<CountryCode> {
        match self {
            Self::Any => None,
            Self::Country(code) => Some(*code),
        }
    }

    /// Returns true if a record with this scope is a candidate for `target`:
    /// either the scopes are equal or this scope is the wildcard.
    #[must_use]
    pub fn covers(&self, target: &Self) -> bool {
        self.is_any() || self == target
    }

    /// Serialized form: the country code, or `""` for the wildcard.
    #[must_use]
    pub fn code(&self) -> &str {
        match self {
            Self::Any => Self::ANY_CODE,
            Self::Country(code) => code.as_str(),
        }
    }
}

impl fmt::Display for CountryScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str(Self::ANY_DISPLAY),
            Self::Country(code) => write!(f, "{code}"),
        }
    }
}

impl From<CountryCode> for CountryScope {
    fn from(code: CountryCode) -> Self {
        Self::Country(code)
    }
}

impl std::str::FromStr for CountryScope {
    type Err = CountryCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for CountryScope {
    type Error = CountryCodeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<CountryScope> for String {
    fn from(scope: CountryScope) -> Self {
        scope.code().to_owned()
    }
}
