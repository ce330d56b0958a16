use serde::{Deserialize, Serialize};
use strum_macros::EnumIter;

/// Bar bucket size offered by the remote source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, Default)]
pub enum Timeframe {
    M1,
    M5,
    M15,
    M30,
    #[default]
    H1,
    H4,
    D1,
    W1,
    Mo1,
    Y1,
}

impl Timeframe {
    /// The remote endpoint keys timeframes by their minute count.
    pub fn minutes(&self) -> u32 {
        match self {
            Self::M1 => 1,
            Self::M5 => 5,
            Self::M15 => 15,
            Self::M30 => 30,
            Self::H1 => 60,
            Self::H4 => 240,
            Self::D1 => 1440,
            Self::W1 => 10_080,
            Self::Mo1 => 43_200,
            Self::Y1 => 525_600,
        }
    }
}

impl std::fmt::Display for Timeframe {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::M1 => write!(f, "1m"),
            Self::M5 => write!(f, "5m"),
            Self::M15 => write!(f, "15m"),
            Self::M30 => write!(f, "30m"),
            Self::H1 => write!(f, "1h"),
            Self::H4 => write!(f, "4h"),
            Self::D1 => write!(f, "1d"),
            Self::W1 => write!(f, "1w"),
            Self::Mo1 => write!(f, "1mo"),
            Self::Y1 => write!(f, "1y"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn minute_counts_match_the_source_contract() {
        assert_eq!(Timeframe::M1.minutes(), 1);
        assert_eq!(Timeframe::H4.minutes(), 240);
        assert_eq!(Timeframe::Y1.minutes(), 525_600);
    }

    #[test]
    fn labels_are_unique() {
        let labels: Vec<String> = Timeframe::iter().map(|tf| tf.to_string()).collect();
        let mut deduped = labels.clone();
        deduped.dedup();
        assert_eq!(labels.len(), 10);
        assert_eq!(labels, deduped);
    }
}
