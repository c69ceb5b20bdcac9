//! Generic SQL type codes.

/// A vendor-neutral SQL type code.
///
/// Codes follow the numbering drivers commonly report in their type
/// metadata, so driver-reported types can be matched against the
/// static registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SqlTypeCode {
    Bit,
    Boolean,
    TinyInt,
    SmallInt,
    Integer,
    BigInt,
    Real,
    Float,
    Double,
    Numeric,
    Decimal,
    Char,
    VarChar,
    LongVarChar,
    Clob,
    NChar,
    NVarChar,
    LongNVarChar,
    NClob,
    Binary,
    VarBinary,
    LongVarBinary,
    Blob,
    Date,
    Time,
    Timestamp,
    TimeWithTimezone,
    TimestampWithTimezone,
    Array,
    Other,
}

impl SqlTypeCode {
    /// Returns the numeric code.
    #[must_use]
    pub const fn code(self) -> i32 {
        match self {
            Self::Bit => -7,
            Self::Boolean => 16,
            Self::TinyInt => -6,
            Self::SmallInt => 5,
            Self::Integer => 4,
            Self::BigInt => -5,
            Self::Real => 7,
            Self::Float => 6,
            Self::Double => 8,
            Self::Numeric => 2,
            Self::Decimal => 3,
            Self::Char => 1,
            Self::VarChar => 12,
            Self::LongVarChar => -1,
            Self::Clob => 2005,
            Self::NChar => -15,
            Self::NVarChar => -9,
            Self::LongNVarChar => -16,
            Self::NClob => 2011,
            Self::Binary => -2,
            Self::VarBinary => -3,
            Self::LongVarBinary => -4,
            Self::Blob => 2004,
            Self::Date => 91,
            Self::Time => 92,
            Self::Timestamp => 93,
            Self::TimeWithTimezone => 2013,
            Self::TimestampWithTimezone => 2014,
            Self::Array => 2003,
            Self::Other => 1111,
        }
    }

    /// Maps a numeric code back; unknown codes become [`SqlTypeCode::Other`].
    #[must_use]
    pub const fn from_code(code: i32) -> Self {
        match code {
            -7 => Self::Bit,
            16 => Self::Boolean,
            -6 => Self::TinyInt,
            5 => Self::SmallInt,
            4 => Self::Integer,
            -5 => Self::BigInt,
            7 => Self::Real,
            6 => Self::Float,
            8 => Self::Double,
            2 => Self::Numeric,
            3 => Self::Decimal,
            1 => Self::Char,
            12 => Self::VarChar,
            -1 => Self::LongVarChar,
            2005 => Self::Clob,
            -15 => Self::NChar,
            -9 => Self::NVarChar,
            -16 => Self::LongNVarChar,
            2011 => Self::NClob,
            -2 => Self::Binary,
            -3 => Self::VarBinary,
            -4 => Self::LongVarBinary,
            2004 => Self::Blob,
            91 => Self::Date,
            92 => Self::Time,
            93 => Self::Timestamp,
            2013 => Self::TimeWithTimezone,
            2014 => Self::TimestampWithTimezone,
            2003 => Self::Array,
            _ => Self::Other,
        }
    }

    /// Returns whether the code is a character type.
    #[must_use]
    pub const fn is_character(self) -> bool {
        matches!(
            self,
            Self::Char
                | Self::VarChar
                | Self::LongVarChar
                | Self::Clob
                | Self::NChar
                | Self::NVarChar
                | Self::LongNVarChar
                | Self::NClob
        )
    }
}
