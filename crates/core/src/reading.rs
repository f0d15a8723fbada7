/// One raw value for one entity, already classified at the ingestion edge.
///
/// The aggregator only ever sees this tagged form; anything that did not
/// parse to a finite number arrives as [`Reading::Invalid`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Reading {
    Number(f64),
    Invalid,
}

impl Reading {
    /// Classify a raw number. NaN and infinities are invalid.
    pub fn from_number(value: f64) -> Self {
        if value.is_finite() {
            Self::Number(value)
        } else {
            Self::Invalid
        }
    }

    /// Parse a numeric-like string such as `"48"`, `" 48.5 "` or `"48%"`.
    ///
    /// Total: anything unparsable becomes [`Reading::Invalid`].
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        let trimmed = trimmed.strip_suffix('%').unwrap_or(trimmed).trim_end();
        match trimmed.parse::<f64>() {
            Ok(v) => Self::from_number(v),
            Err(_) => Self::Invalid,
        }
    }

    /// The numeric value, if this reading is valid.
    pub fn value(self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(v),
            Self::Invalid => None,
        }
    }

    pub fn is_valid(self) -> bool {
        matches!(self, Self::Number(_))
    }
}

impl From<f64> for Reading {
    fn from(value: f64) -> Self {
        Self::from_number(value)
    }
}

impl From<Option<f64>> for Reading {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::Invalid, Self::from_number)
    }
}

/// One `(entity key, reading)` tuple from an inbound batch.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyedReading {
    pub key:     String,
    pub reading: Reading,
}

impl KeyedReading {
    pub fn new(key: impl Into<String>, reading: impl Into<Reading>) -> Self {
        Self {
            key:     key.into(),
            reading: reading.into(),
        }
    }
}

/// An ordered batch of readings, applied in arrival order.
pub type Batch = Vec<KeyedReading>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_plain_and_padded_numbers() {
        assert_eq!(Reading::parse("48"), Reading::Number(48.0));
        assert_eq!(Reading::parse("  48.5 "), Reading::Number(48.5));
        assert_eq!(Reading::parse("72 %"), Reading::Number(72.0));
    }

    #[test]
    fn parse_garbage_is_invalid() {
        assert_eq!(Reading::parse(""), Reading::Invalid);
        assert_eq!(Reading::parse("full"), Reading::Invalid);
        assert_eq!(Reading::parse("%"), Reading::Invalid);
        assert_eq!(Reading::parse("NaN"), Reading::Invalid);
        assert_eq!(Reading::parse("inf"), Reading::Invalid);
    }

    #[test]
    fn non_finite_numbers_are_invalid() {
        assert_eq!(Reading::from_number(f64::NAN), Reading::Invalid);
        assert_eq!(Reading::from(f64::NEG_INFINITY), Reading::Invalid);
        assert_eq!(Reading::from(None), Reading::Invalid);
        assert_eq!(Reading::from(Some(3.5)).value(), Some(3.5));
    }
}
