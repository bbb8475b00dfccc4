//! Comma-separated text records for model corpus data.
//!
//! Pair/frame records hold 24 values: the two oriented points followed by
//! the upper three rows of the local frame. Floats are written with the
//! shortest representation that parses back to the same value.

use std::str::FromStr;

use thiserror::Error;

use crate::feature::PairFrame;

/// Pair/frame records shorter than this are rejected outright.
pub const MIN_RECORD_LEN: usize = 12;

/// Separates sections in adjacent file formats; never valid inside a record.
pub const RESERVED_DELIMITER: char = ':';

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record is {len} characters long, expected at least {}", MIN_RECORD_LEN)]
    TooShort { len: usize },

    #[error("record contains the reserved delimiter ':'")]
    ReservedDelimiter,

    #[error("record has {found} fields, expected {expected}")]
    FieldCount { expected: usize, found: usize },

    #[error("field {index} ('{value}') is not a valid number")]
    InvalidNumber { index: usize, value: String },

    #[error("'{0}' is not a 'name,variant' model identifier")]
    InvalidModelId(String),
}

/// Structural checks applied to pair/frame records before parsing.
pub(crate) fn check_record(text: &str) -> Result<(), RecordError> {
    if text.len() < MIN_RECORD_LEN {
        return Err(RecordError::TooShort { len: text.len() });
    }
    if text.contains(RESERVED_DELIMITER) {
        return Err(RecordError::ReservedDelimiter);
    }
    Ok(())
}

/// Parse exactly `N` comma-separated values. One trailing comma is tolerated.
pub(crate) fn parse_fields<T, const N: usize>(text: &str) -> Result<[T; N], RecordError>
where
    T: FromStr + Copy + Default,
{
    let text = text.trim();
    let text = text.strip_suffix(',').unwrap_or(text);

    let found = text.split(',').count();
    if found != N {
        return Err(RecordError::FieldCount { expected: N, found });
    }

    let mut out = [T::default(); N];
    for (index, (slot, field)) in out.iter_mut().zip(text.split(',')).enumerate() {
        let field = field.trim();
        *slot = field.parse().map_err(|_| RecordError::InvalidNumber {
            index,
            value: field.to_string(),
        })?;
    }
    Ok(out)
}

/// Parse one pair/frame record per non-empty line.
///
/// Malformed lines are logged and skipped; the number skipped is returned
/// alongside the parsed samples.
pub fn read_pair_frames(text: &str) -> (Vec<PairFrame>, usize) {
    let mut samples = Vec::new();
    let mut skipped = 0;

    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        match line.parse::<PairFrame>() {
            Ok(sample) => samples.push(sample),
            Err(err) => {
                tracing::warn!(line = line_no + 1, %err, "Skipping malformed pair/frame record");
                skipped += 1;
            }
        }
    }

    (samples, skipped)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_fields_exact_count() {
        let values: [i32; 3] = parse_fields("4, -2,17").unwrap();
        assert_eq!(values, [4, -2, 17]);
    }

    #[test]
    fn test_parse_fields_trailing_comma() {
        let values: [f32; 2] = parse_fields("0.5,1.25,").unwrap();
        assert_eq!(values, [0.5, 1.25]);
    }

    #[test]
    fn test_parse_fields_wrong_count() {
        let err = parse_fields::<f32, 3>("1,2").unwrap_err();
        assert_eq!(err, RecordError::FieldCount { expected: 3, found: 2 });

        let err = parse_fields::<f32, 3>("1,2,3,4").unwrap_err();
        assert_eq!(err, RecordError::FieldCount { expected: 3, found: 4 });
    }

    #[test]
    fn test_parse_fields_invalid_number() {
        let err = parse_fields::<i32, 3>("1,x,3").unwrap_err();
        assert_eq!(
            err,
            RecordError::InvalidNumber {
                index: 1,
                value: "x".to_string()
            }
        );
    }

    #[test]
    fn test_check_record() {
        assert_eq!(
            check_record("1,2,3"),
            Err(RecordError::TooShort { len: 5 })
        );
        assert_eq!(
            check_record("1,2,3,4,5,6:7"),
            Err(RecordError::ReservedDelimiter)
        );
        assert!(check_record("1,2,3,4,5,6,7").is_ok());
    }

    #[test]
    fn test_read_pair_frames_skips_malformed_lines() {
        common::log_setup::setup_test_logging();

        let good: Vec<String> = (0..24).map(|i| (i as f32 * 0.5).to_string()).collect();
        let good = good.join(",");
        let text = format!("{good}\n\n1,2,3\nmodel:{good}\n{good},\n");

        let (samples, skipped) = read_pair_frames(&text);

        assert_eq!(samples.len(), 2);
        assert_eq!(skipped, 2);
        assert_eq!(samples[0], samples[1]);
        assert_eq!(samples[0].frame.upper_rows()[0], 6.0);
    }
}
