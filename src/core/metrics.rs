//! Aggregate and series helpers for dashboards
//!
//! Chart rendering is an external concern; everything here only shapes data
//! into `{label, value}` points or plain numbers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One point of a prepared data series
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeriesPoint {
    pub label: String,
    pub value: f64,
}

impl SeriesPoint {
    pub fn new(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value,
        }
    }
}

/// Integer percentage, clamped into [0, 100] at every boundary
///
/// A value of 0 doubles as the "not yet assessed" sentinel for recovery and
/// quality figures; callers render it as pending rather than as a score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
pub struct Percent(u8);

impl Percent {
    pub fn new(value: i64) -> Self {
        Self(value.clamp(0, 100) as u8)
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn as_f64(&self) -> f64 {
        f64::from(self.0)
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

impl From<u8> for Percent {
    fn from(value: u8) -> Self {
        Self::new(i64::from(value))
    }
}

impl Serialize for Percent {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_u8(self.0)
    }
}

impl<'de> Deserialize<'de> for Percent {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = i64::deserialize(deserializer)?;
        Ok(Percent::new(value))
    }
}

/// Count items per key, keeping first-seen key order
pub fn count_by<'a, T: 'a, F>(items: impl Iterator<Item = &'a T>, key: F) -> Vec<(String, usize)>
where
    F: Fn(&T) -> String,
{
    let mut counts: Vec<(String, usize)> = Vec::new();
    for item in items {
        let k = key(item);
        match counts.iter_mut().find(|(existing, _)| *existing == k) {
            Some((_, n)) => *n += 1,
            None => counts.push((k, 1)),
        }
    }
    counts
}

/// Number of distinct keys across the items
pub fn distinct_by<'a, T: 'a, F>(items: impl Iterator<Item = &'a T>, key: F) -> usize
where
    F: Fn(&T) -> String,
{
    count_by(items, key).len()
}

/// Part of a total as a percentage, 0.0 on an empty total
pub fn share(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 100.0).clamp(0.0, 100.0)
}

/// Arithmetic mean, None on empty input
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Turn count pairs into a chart-ready series
pub fn to_series(counts: &[(String, usize)]) -> Vec<SeriesPoint> {
    counts
        .iter()
        .map(|(label, n)| SeriesPoint::new(label.clone(), *n as f64))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_percent_clamps_both_ends() {
        assert_eq!(Percent::new(150).value(), 100);
        assert_eq!(Percent::new(-5).value(), 0);
        assert_eq!(Percent::new(65).value(), 65);
    }

    #[test]
    fn test_percent_display() {
        assert_eq!(Percent::new(85).to_string(), "85%");
    }

    #[test]
    fn test_percent_zero_sentinel() {
        assert!(Percent::new(0).is_zero());
        assert!(!Percent::new(1).is_zero());
    }

    #[test]
    fn test_percent_deserialize_clamps() {
        let p: Percent = serde_yml::from_str("120").unwrap();
        assert_eq!(p.value(), 100);
        let q: Percent = serde_yml::from_str("92").unwrap();
        assert_eq!(q.value(), 92);
    }

    #[test]
    fn test_count_by_keeps_first_seen_order() {
        let words = ["laptop", "phone", "laptop", "tablet", "phone", "laptop"];
        let counts = count_by(words.iter(), |w| w.to_string());
        assert_eq!(
            counts,
            vec![
                ("laptop".to_string(), 3),
                ("phone".to_string(), 2),
                ("tablet".to_string(), 1),
            ]
        );
    }

    #[test]
    fn test_distinct_by() {
        let words = ["apple", "apple", "samsung", "dell"];
        assert_eq!(distinct_by(words.iter(), |w| w.to_string()), 3);
    }

    #[test]
    fn test_share() {
        assert_eq!(share(1, 2), 50.0);
        assert_eq!(share(0, 5), 0.0);
        assert_eq!(share(3, 0), 0.0);
        assert_eq!(share(7, 7), 100.0);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[85.0, 92.0]), Some(88.5));
    }

    #[test]
    fn test_to_series() {
        let counts = vec![("Active".to_string(), 3), ("In Transit".to_string(), 1)];
        let series = to_series(&counts);
        assert_eq!(series[0], SeriesPoint::new("Active", 3.0));
        assert_eq!(series[1].value, 1.0);
    }
}
