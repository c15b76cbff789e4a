use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Chart range shortcut accepted by the time-series endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TimeRange {
    #[serde(rename = "1D")]
    OneDay,
    #[serde(rename = "1W")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "MAX")]
    Max,
}

impl TimeRange {
    /// Interval and output size a range expands to.
    pub fn window(&self) -> (&'static str, u32) {
        match self {
            TimeRange::OneDay => ("1h", 24),
            TimeRange::OneWeek => ("1day", 7),
            TimeRange::OneMonth => ("1day", 30),
            TimeRange::ThreeMonths => ("1day", 90),
            TimeRange::OneYear => ("1day", 365),
            TimeRange::Max => ("1day", 5000),
        }
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TimeRange::OneDay => "1D",
            TimeRange::OneWeek => "1W",
            TimeRange::OneMonth => "1M",
            TimeRange::ThreeMonths => "3M",
            TimeRange::OneYear => "1Y",
            TimeRange::Max => "MAX",
        };
        f.write_str(s)
    }
}

impl FromStr for TimeRange {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "1D" => Ok(TimeRange::OneDay),
            "1W" => Ok(TimeRange::OneWeek),
            "1M" => Ok(TimeRange::OneMonth),
            "3M" => Ok(TimeRange::ThreeMonths),
            "1Y" => Ok(TimeRange::OneYear),
            "MAX" => Ok(TimeRange::Max),
            _ => Err("range must be one of: 1D, 1W, 1M, 3M, 1Y, MAX.".to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_range_is_case_insensitive() {
        assert_eq!("1d".parse::<TimeRange>().unwrap().window(), ("1h", 24));
        assert_eq!("max".parse::<TimeRange>().unwrap().window(), ("1day", 5000));
        assert!("2Y".parse::<TimeRange>().is_err());
    }
}
