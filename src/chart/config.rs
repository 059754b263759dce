//! Chart configuration shared by every renderer.

use crate::aggregator::Granularity;
use crate::utils::config::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};
use crate::utils::error::SelectionError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Metric shown by default (and the only one in the static chart)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    /// Packet counts
    #[default]
    Amount,
    /// Volume in MB
    Size,
}

impl DisplayMode {
    pub fn axis_title(self) -> &'static str {
        match self {
            DisplayMode::Amount => "Total Packets Sent",
            DisplayMode::Size => "Total Volume (MB)",
        }
    }

    pub fn button_label(self) -> &'static str {
        match self {
            DisplayMode::Amount => "Packets",
            DisplayMode::Size => "Volume (MB)",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DisplayMode::Amount => "amount",
            DisplayMode::Size => "size",
        }
    }
}

impl fmt::Display for DisplayMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DisplayMode {
    type Err = SelectionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "amount" => Ok(DisplayMode::Amount),
            "size" => Ok(DisplayMode::Size),
            other => Err(SelectionError::InvalidMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ChartConfig {
    /// Explicit title; `None` derives one from the granularity
    pub title: Option<String>,
    pub granularity: Granularity,
    pub mode: DisplayMode,
    pub width: usize,
    pub height: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            title: None,
            granularity: Granularity::Minute,
            mode: DisplayMode::Amount,
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
        }
    }
}

impl ChartConfig {
    pub fn new(granularity: Granularity) -> Self {
        Self {
            granularity,
            ..Self::default()
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_mode(mut self, mode: DisplayMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_size(mut self, width: usize, height: usize) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn title(&self) -> String {
        match &self.title {
            Some(title) => title.clone(),
            None => format!("Packet Totals Sent Per {}", self.granularity.label()),
        }
    }

    pub fn x_axis_title(&self) -> String {
        format!("Time ({})", self.granularity.label())
    }
}
