use crate::constants::TAG_ATTRIBUTE_SEPARATOR;
use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Read/write/subscribe/static capability flags of a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TagAttribute(u8);

impl TagAttribute {
    pub const READ: TagAttribute = TagAttribute(1);
    pub const WRITE: TagAttribute = TagAttribute(2);
    pub const SUBSCRIBE: TagAttribute = TagAttribute(4);
    pub const STATIC: TagAttribute = TagAttribute(8);

    const ALL: [(TagAttribute, &'static str); 4] = [
        (Self::READ, "Read"),
        (Self::WRITE, "Write"),
        (Self::SUBSCRIBE, "Subscribe"),
        (Self::STATIC, "Static"),
    ];

    const KNOWN_BITS: u8 = 0b1111;

    /// Build from a raw mask; `None` when zero or when unknown bits are set.
    #[inline]
    pub fn from_bits(bits: u8) -> Option<Self> {
        if bits == 0 || bits & !Self::KNOWN_BITS != 0 {
            return None;
        }
        Some(TagAttribute(bits))
    }

    #[inline]
    pub fn bits(&self) -> u8 {
        self.0
    }

    #[inline]
    pub fn contains(&self, other: TagAttribute) -> bool {
        self.0 & other.0 == other.0
    }

    #[inline]
    pub fn is_static(&self) -> bool {
        self.contains(Self::STATIC)
    }

    /// Decode a human readable list such as `"Read, Write"`.
    ///
    /// Labels are matched case-insensitively. An empty list or any unknown
    /// label yields `None`; a successful decode is never zero.
    pub fn from_labels(labels: &str) -> Option<Self> {
        let mut bits = 0u8;
        let mut seen = false;
        for label in labels.split(TAG_ATTRIBUTE_SEPARATOR) {
            let label = label.trim();
            if label.is_empty() {
                continue;
            }
            let (flag, _) = Self::ALL
                .iter()
                .find(|(_, l)| l.eq_ignore_ascii_case(label))?;
            bits |= flag.0;
            seen = true;
        }
        if !seen {
            return None;
        }
        Self::from_bits(bits)
    }

    /// Labels of all flags set, in flag order.
    pub fn labels(&self) -> Vec<&'static str> {
        Self::ALL
            .iter()
            .filter(|(flag, _)| self.contains(*flag))
            .map(|(_, label)| *label)
            .collect()
    }
}

impl std::ops::BitOr for TagAttribute {
    type Output = TagAttribute;

    fn bitor(self, rhs: Self) -> Self::Output {
        TagAttribute(self.0 | rhs.0)
    }
}

impl Display for TagAttribute {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let sep = TAG_ATTRIBUTE_SEPARATOR.to_string();
        write!(f, "{}", self.labels().join(sep.as_str()))
    }
}

/// Tag data type as encoded by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum TagType {
    Int8 = 1,
    Uint8 = 2,
    Int16 = 3,
    Uint16 = 4,
    Int32 = 5,
    Uint32 = 6,
    Int64 = 7,
    Uint64 = 8,
    Float = 9,
    Double = 10,
    Bit = 11,
    Bool = 12,
    String = 13,
    Bytes = 14,
    Error = 15,
    Word = 16,
    Dword = 17,
    Lword = 18,
}

impl TagType {
    /// Types that may be configured on a tag (`Error` only appears on the wire).
    pub const CONFIGURABLE: [TagType; 17] = [
        TagType::Int8,
        TagType::Uint8,
        TagType::Int16,
        TagType::Uint16,
        TagType::Int32,
        TagType::Uint32,
        TagType::Int64,
        TagType::Uint64,
        TagType::Float,
        TagType::Double,
        TagType::Bit,
        TagType::Bool,
        TagType::String,
        TagType::Bytes,
        TagType::Word,
        TagType::Dword,
        TagType::Lword,
    ];

    const ALIASES: [(&'static str, TagType); 6] = [
        ("int", TagType::Int32),
        ("uint", TagType::Uint32),
        ("real", TagType::Float),
        ("float", TagType::Float),
        ("boolean", TagType::Bool),
        ("str", TagType::String),
    ];

    #[inline]
    pub fn code(&self) -> u8 {
        *self as u8
    }

    #[inline]
    pub fn label(&self) -> &'static str {
        match self {
            TagType::Int8 => "INT8",
            TagType::Uint8 => "UINT8",
            TagType::Int16 => "INT16",
            TagType::Uint16 => "UINT16",
            TagType::Int32 => "INT32",
            TagType::Uint32 => "UINT32",
            TagType::Int64 => "INT64",
            TagType::Uint64 => "UINT64",
            TagType::Float => "FLOAT",
            TagType::Double => "DOUBLE",
            TagType::Bit => "BIT",
            TagType::Bool => "BOOL",
            TagType::String => "STRING",
            TagType::Bytes => "BYTES",
            TagType::Error => "ERROR",
            TagType::Word => "WORD",
            TagType::Dword => "DWORD",
            TagType::Lword => "LWORD",
        }
    }

    /// Case-insensitive lookup over canonical labels and short aliases.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim();
        if label.is_empty() {
            return None;
        }
        Self::CONFIGURABLE
            .iter()
            .copied()
            .find(|t| t.label().eq_ignore_ascii_case(label))
            .or_else(|| {
                Self::ALIASES
                    .iter()
                    .find(|(alias, _)| alias.eq_ignore_ascii_case(label))
                    .map(|(_, t)| *t)
            })
    }
}

impl TryFrom<u8> for TagType {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, <Self as TryFrom<u8>>::Error> {
        Self::CONFIGURABLE
            .iter()
            .copied()
            .chain(std::iter::once(TagType::Error))
            .find(|t| t.code() == value)
            .ok_or_else(|| format!("unknown tag type code {value}"))
    }
}

impl Display for TagType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.label())
    }
}
