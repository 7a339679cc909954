// ── Metric keys and visibility ──

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumCount, EnumIter, EnumString, IntoEnumIterator};

use crate::error::CoreError;

/// One of the four client-count categories reported per sample.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    AsRefStr,
    EnumCount,
    EnumIter,
    EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Metric {
    Dhcp,
    Dynamic,
    Hotspot,
    Guest,
}

impl Metric {
    /// Legend / KPI label.
    pub fn label(self) -> &'static str {
        match self {
            Self::Dhcp => "DHCP",
            Self::Dynamic => "Dynamic",
            Self::Hotspot => "Hotspot",
            Self::Guest => "Guest",
        }
    }

    /// This metric's entry in a `[dhcp, dynamic, hotspot, guest]` set.
    pub fn pick(self, counts: [u64; 4]) -> u64 {
        let [dhcp, dynamic, hotspot, guest] = counts;
        match self {
            Self::Dhcp => dhcp,
            Self::Dynamic => dynamic,
            Self::Hotspot => hotspot,
            Self::Guest => guest,
        }
    }
}

/// Independent per-metric toggles. Nothing forces at least one on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MetricVisibility {
    pub dhcp: bool,
    pub dynamic: bool,
    pub hotspot: bool,
    pub guest: bool,
}

impl MetricVisibility {
    pub const fn all() -> Self {
        Self {
            dhcp: true,
            dynamic: true,
            hotspot: true,
            guest: true,
        }
    }

    pub const fn none() -> Self {
        Self {
            dhcp: false,
            dynamic: false,
            hotspot: false,
            guest: false,
        }
    }

    /// Only the listed metrics visible.
    pub fn only(metrics: impl IntoIterator<Item = Metric>) -> Self {
        metrics
            .into_iter()
            .fold(Self::none(), |acc, m| acc.with(m, true))
    }

    pub fn is_visible(&self, metric: Metric) -> bool {
        match metric {
            Metric::Dhcp => self.dhcp,
            Metric::Dynamic => self.dynamic,
            Metric::Hotspot => self.hotspot,
            Metric::Guest => self.guest,
        }
    }

    /// Copy with one metric set.
    pub fn with(mut self, metric: Metric, visible: bool) -> Self {
        match metric {
            Metric::Dhcp => self.dhcp = visible,
            Metric::Dynamic => self.dynamic = visible,
            Metric::Hotspot => self.hotspot = visible,
            Metric::Guest => self.guest = visible,
        }
        self
    }

    /// Copy with one metric flipped. Callers merge single toggles here
    /// before handing the full map to the filter model.
    pub fn toggled(self, metric: Metric) -> Self {
        self.with(metric, !self.is_visible(metric))
    }

    /// Visible metrics in display order.
    pub fn visible(&self) -> impl Iterator<Item = Metric> + '_ {
        Metric::iter().filter(|m| self.is_visible(*m))
    }

    /// "All metrics", or the visible keys upper-cased and comma-joined.
    pub fn summary(&self) -> String {
        let active: Vec<Metric> = self.visible().collect();
        if active.len() == Metric::COUNT {
            return "All metrics".into();
        }
        active
            .iter()
            .map(|m| m.as_ref().to_ascii_uppercase())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Default for MetricVisibility {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for MetricVisibility {
    type Err = CoreError;

    /// Parse `"all"`, `"none"`, or a comma list such as `"dhcp,guest"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "all" => return Ok(Self::all()),
            "none" | "" => return Ok(Self::none()),
            _ => {}
        }
        s.split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(|part| {
                Metric::from_str(part).map_err(|_| CoreError::ValidationFailed {
                    message: format!(
                        "unknown metric '{part}' (expected dhcp, dynamic, hotspot, guest)"
                    ),
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Self::only)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn summary_labels() {
        assert_eq!(MetricVisibility::all().summary(), "All metrics");
        assert_eq!(MetricVisibility::none().summary(), "");
        let some = MetricVisibility::only([Metric::Guest, Metric::Dhcp]);
        assert_eq!(some.summary(), "DHCP, GUEST");
    }

    #[test]
    fn toggled_flips_one() {
        let v = MetricVisibility::all().toggled(Metric::Hotspot);
        assert!(!v.hotspot);
        assert!(v.dhcp && v.dynamic && v.guest);
        assert_eq!(v.toggled(Metric::Hotspot), MetricVisibility::all());
    }

    #[test]
    fn parses_lists() {
        let v: MetricVisibility = "DHCP, guest".parse().unwrap();
        assert_eq!(v, MetricVisibility::only([Metric::Dhcp, Metric::Guest]));
        assert_eq!("all".parse::<MetricVisibility>().unwrap(), MetricVisibility::all());
        assert!("dhcp,wifi".parse::<MetricVisibility>().is_err());
    }

    #[test]
    fn metric_round_trips_strings() {
        assert_eq!(Metric::Hotspot.to_string(), "hotspot");
        assert_eq!("Dynamic".parse::<Metric>().unwrap(), Metric::Dynamic);
    }
}
