//! Dashboard view and cross-filter selection
//!
//! Two selectors: the active grouping axis and, per axis, a filter drawn from
//! the other axis. Switching the active view resets the filter that belonged
//! to the view being left.

use crate::constants::FILTER_ALL;
use super::MarketCapCategory;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ActiveView {
    /// One card per sector, segments are market cap brackets
    #[default]
    #[serde(alias = "sectors")]
    Sector,

    /// One card per market cap bracket, segments are sectors
    #[serde(alias = "market-cap", alias = "market_cap", alias = "marketcap")]
    MarketCap,
}

impl ActiveView {
    /// Parse from string
    pub fn from_str(s: &str) -> Result<Self, String> {
        match s.trim().to_lowercase().as_str() {
            "sector" | "sectors" => Ok(ActiveView::Sector),
            "marketcap" | "market-cap" | "market_cap" | "cap" => Ok(ActiveView::MarketCap),
            _ => Err(format!("Invalid view: '{}'. Valid values: sector, market-cap", s)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActiveView::Sector => "sector",
            ActiveView::MarketCap => "market-cap",
        }
    }
}

impl fmt::Display for ActiveView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A selector value: either the "all" sentinel or one concrete value
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Filter<T> {
    #[default]
    All,
    Only(T),
}

impl<T> Filter<T> {
    pub fn is_all(&self) -> bool {
        matches!(self, Filter::All)
    }

    pub fn as_option(&self) -> Option<&T> {
        match self {
            Filter::All => None,
            Filter::Only(value) => Some(value),
        }
    }
}

impl Filter<MarketCapCategory> {
    /// Parse "all" or a market cap bracket
    pub fn parse_market_cap(s: &str) -> Result<Self, String> {
        if s.trim().eq_ignore_ascii_case(FILTER_ALL) {
            return Ok(Filter::All);
        }
        MarketCapCategory::from_str(s).map(Filter::Only)
    }
}

impl Filter<String> {
    /// Parse "all" or a sector name (kept verbatim, trimmed)
    pub fn parse_sector(s: &str) -> Self {
        let trimmed = s.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case(FILTER_ALL) {
            Filter::All
        } else {
            Filter::Only(trimmed.to_string())
        }
    }
}

impl<T: fmt::Display> fmt::Display for Filter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Filter::All => write!(f, "{}", FILTER_ALL),
            Filter::Only(value) => write!(f, "{}", value),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MoversViewState {
    active_view: ActiveView,
    /// Narrows the sector view
    selected_market_cap: Filter<MarketCapCategory>,
    /// Narrows the market cap view
    selected_sector: Filter<String>,
}

impl MoversViewState {
    pub fn new(active_view: ActiveView) -> Self {
        Self {
            active_view,
            ..Self::default()
        }
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn selected_market_cap(&self) -> &Filter<MarketCapCategory> {
        &self.selected_market_cap
    }

    pub fn selected_sector(&self) -> &Filter<String> {
        &self.selected_sector
    }

    /// Switch view; returns true if the state changed
    ///
    /// Leaving the sector view resets the market cap filter, leaving the
    /// market cap view resets the sector filter.
    pub fn set_active_view(&mut self, view: ActiveView) -> bool {
        if self.active_view == view {
            return false;
        }

        match self.active_view {
            ActiveView::Sector => self.selected_market_cap = Filter::All,
            ActiveView::MarketCap => self.selected_sector = Filter::All,
        }
        self.active_view = view;
        true
    }

    /// Returns true if the state changed
    pub fn select_market_cap(&mut self, filter: Filter<MarketCapCategory>) -> bool {
        if self.selected_market_cap == filter {
            return false;
        }
        self.selected_market_cap = filter;
        true
    }

    /// Returns true if the state changed
    pub fn select_sector(&mut self, filter: Filter<String>) -> bool {
        if self.selected_sector == filter {
            return false;
        }
        self.selected_sector = filter;
        true
    }

    /// Segment key the active view is filtered by, if any
    pub fn active_filter(&self) -> Filter<String> {
        match self.active_view {
            ActiveView::Sector => match &self.selected_market_cap {
                Filter::All => Filter::All,
                Filter::Only(cap) => Filter::Only(cap.as_str().to_string()),
            },
            ActiveView::MarketCap => self.selected_sector.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_view_from_str() {
        assert_eq!(ActiveView::from_str("sector").unwrap(), ActiveView::Sector);
        assert_eq!(ActiveView::from_str("Market-Cap").unwrap(), ActiveView::MarketCap);
        assert_eq!(ActiveView::from_str("marketcap").unwrap(), ActiveView::MarketCap);
        assert!(ActiveView::from_str("heatmap").is_err());
    }

    #[test]
    fn test_view_serde() {
        assert_eq!(serde_json::to_string(&ActiveView::MarketCap).unwrap(), r#""marketCap""#);
        let view: ActiveView = serde_json::from_str(r#""market-cap""#).unwrap();
        assert_eq!(view, ActiveView::MarketCap);
    }

    #[test]
    fn test_switch_to_market_cap_resets_market_cap_filter() {
        let mut state = MoversViewState::new(ActiveView::Sector);
        state.select_market_cap(Filter::Only(MarketCapCategory::Large));
        state.select_sector(Filter::Only("Tech".to_string()));

        assert!(state.set_active_view(ActiveView::MarketCap));
        assert!(state.selected_market_cap().is_all());
        // The filter of the view being entered is left alone
        assert_eq!(state.selected_sector(), &Filter::Only("Tech".to_string()));
    }

    #[test]
    fn test_switch_to_sector_resets_sector_filter() {
        let mut state = MoversViewState::new(ActiveView::MarketCap);
        state.select_sector(Filter::Only("Energy".to_string()));

        assert!(state.set_active_view(ActiveView::Sector));
        assert!(state.selected_sector().is_all());
    }

    #[test]
    fn test_same_view_is_noop() {
        let mut state = MoversViewState::new(ActiveView::Sector);
        state.select_market_cap(Filter::Only(MarketCapCategory::Mid));
        assert!(!state.set_active_view(ActiveView::Sector));
        assert_eq!(state.selected_market_cap(), &Filter::Only(MarketCapCategory::Mid));
    }

    #[test]
    fn test_active_filter_key() {
        let mut state = MoversViewState::default();
        assert_eq!(state.active_filter(), Filter::All);

        state.select_market_cap(Filter::Only(MarketCapCategory::Small));
        assert_eq!(state.active_filter(), Filter::Only("small".to_string()));

        state.set_active_view(ActiveView::MarketCap);
        state.select_sector(Filter::parse_sector("Utilities"));
        assert_eq!(state.active_filter(), Filter::Only("Utilities".to_string()));
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!(Filter::parse_market_cap("ALL").unwrap(), Filter::All);
        assert_eq!(
            Filter::parse_market_cap("mega").unwrap(),
            Filter::Only(MarketCapCategory::Mega)
        );
        assert!(Filter::parse_market_cap("huge").is_err());
        assert_eq!(Filter::parse_sector(" all "), Filter::All);
        assert_eq!(Filter::parse_sector("Tech"), Filter::Only("Tech".to_string()));
    }
}
