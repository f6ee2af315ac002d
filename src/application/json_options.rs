//! JSON text formatting flags.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Deserializer, Serialize, ser::Error as _};
use serde_json::ser::{PrettyFormatter, Serializer};

/// Bit-set of formatting flags applied when a document is written out.
///
/// Raw integers in `jsonOptions` are read with this crate's own layout
/// (`PRETTY_PRINT = 1`, `ESCAPE_SLASHES = 2`, `ESCAPE_UNICODE = 4`,
/// `PRESERVE_ZERO_FRACTION = 8`). Values from other JSON libraries, such as
/// 64 or 128, mean something else here; pass flag names instead. Unknown
/// bits are kept but have no effect.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct JsonOptions(u32);

impl JsonOptions {
    pub const NONE: Self = Self(0);
    pub const PRETTY_PRINT: Self = Self(1);
    /// Write `/` as `\/`.
    pub const ESCAPE_SLASHES: Self = Self(1 << 1);
    /// Write non-ASCII characters as `\uXXXX` escapes.
    pub const ESCAPE_UNICODE: Self = Self(1 << 2);
    /// Accepted for compatibility; floats already keep their fraction.
    pub const PRESERVE_ZERO_FRACTION: Self = Self(1 << 3);

    const NAMED: [(&'static str, Self); 4] = [
        ("PRETTY_PRINT", Self::PRETTY_PRINT),
        ("ESCAPE_SLASHES", Self::ESCAPE_SLASHES),
        ("ESCAPE_UNICODE", Self::ESCAPE_UNICODE),
        ("PRESERVE_ZERO_FRACTION", Self::PRESERVE_ZERO_FRACTION),
    ];

    pub const fn from_bits(bits: u32) -> Self {
        Self(bits)
    }

    pub const fn bits(self) -> u32 {
        self.0
    }

    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::NAMED
            .iter()
            .find(|(candidate, _)| candidate.eq_ignore_ascii_case(name))
            .map(|(_, flag)| *flag)
    }

    /// Flags for one render: the caller's flags, plus pretty printing when
    /// debug mode is on and it was asked for.
    pub fn for_render(requested: Self, debug: bool, debug_pretty_print: bool) -> Self {
        if debug && debug_pretty_print {
            requested | Self::PRETTY_PRINT
        } else {
            requested
        }
    }

    pub fn encode<T: Serialize + ?Sized>(self, value: &T) -> Result<String, serde_json::Error> {
        let text = if self.contains(Self::PRETTY_PRINT) {
            let mut buffer = Vec::new();
            let mut serializer =
                Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
            value.serialize(&mut serializer)?;
            String::from_utf8(buffer).map_err(serde_json::Error::custom)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(self.escape(text))
    }

    // `/` and non-ASCII characters only ever occur inside JSON strings, so
    // escaping the finished text is equivalent to escaping each string.
    fn escape(self, text: String) -> String {
        let slashes = self.contains(Self::ESCAPE_SLASHES);
        let unicode = self.contains(Self::ESCAPE_UNICODE);
        if !slashes && !unicode {
            return text;
        }

        let mut escaped = String::with_capacity(text.len());
        for ch in text.chars() {
            match ch {
                '/' if slashes => escaped.push_str("\\/"),
                ch if unicode && !ch.is_ascii() => {
                    let mut units = [0u16; 2];
                    for unit in ch.encode_utf16(&mut units) {
                        escaped.push_str(&format!("\\u{unit:04x}"));
                    }
                }
                ch => escaped.push(ch),
            }
        }
        escaped
    }
}

impl BitOr for JsonOptions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for JsonOptions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl FromIterator<JsonOptions> for JsonOptions {
    fn from_iter<I: IntoIterator<Item = JsonOptions>>(iter: I) -> Self {
        iter.into_iter().fold(Self::NONE, BitOr::bitor)
    }
}

impl fmt::Debug for JsonOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<_> = Self::NAMED
            .iter()
            .filter(|(_, flag)| self.contains(*flag))
            .map(|(name, _)| *name)
            .collect();
        write!(f, "JsonOptions({:#x}; {})", self.0, names.join(" | "))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
    Bits(u32),
    Name(String),
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawOptions {
    Toggle(bool),
    Flags(Vec<RawFlag>),
}

/// Accepts `false` or a list of flag names / raw integers.
impl<'de> Deserialize<'de> for JsonOptions {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match RawOptions::deserialize(deserializer)? {
            RawOptions::Toggle(false) => Ok(Self::NONE),
            RawOptions::Toggle(true) => Err(serde::de::Error::custom(
                "jsonOptions must be `false` or a list of flags",
            )),
            RawOptions::Flags(flags) => flags
                .into_iter()
                .map(|flag| match flag {
                    RawFlag::Bits(bits) => Ok(Self::from_bits(bits)),
                    RawFlag::Name(name) => Self::from_name(&name).ok_or_else(|| {
                        serde::de::Error::custom(format!("unknown json option `{name}`"))
                    }),
                })
                .collect(),
        }
    }
}
