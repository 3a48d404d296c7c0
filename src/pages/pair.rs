// Pair page model
// Derives the header values of a pair page (liquidity, volume, fees, rates,
// USD prices, warning state) and the bookmark entry saved when the pair is pinned

use serde::{Deserialize, Serialize};

use crate::storage::PinnedPair;

/// Symbols longer than this are shortened for the page header
const MAX_SYMBOL_CHARS: usize = 6;
const SHORT_SYMBOL_CHARS: usize = 5;

/// Share of swap volume paid to liquidity providers
const LP_FEE_RATE: f64 = 0.002;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenSnapshot {
    pub id: String,
    pub symbol: String,
    /// Token price denominated in ETH
    pub derived_eth: Option<f64>,
}

/// Pair data as delivered by the pair data context.
/// "Tracked" figures only count pairs whose tokens are on the reliability allow-list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PairSnapshot {
    pub id: String,
    pub token0: TokenSnapshot,
    pub token1: TokenSnapshot,
    pub reserve0: f64,
    pub reserve1: f64,
    #[serde(default)]
    pub reserve_usd: Option<f64>,
    #[serde(default)]
    pub tracked_reserve_usd: Option<f64>,
    #[serde(default)]
    pub liquidity_change_usd: Option<f64>,
    #[serde(default)]
    pub one_day_volume_usd: Option<f64>,
    #[serde(default)]
    pub one_day_volume_untracked: Option<f64>,
    #[serde(default)]
    pub volume_change_usd: Option<f64>,
    #[serde(default)]
    pub volume_change_untracked: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairOverview {
    pub address: String,
    pub token0_symbol: String,
    pub token1_symbol: String,
    /// token1 received per token0; `None` renders as "-"
    pub token0_rate: Option<f64>,
    /// token0 received per token1
    pub token1_rate: Option<f64>,
    pub token0_usd: Option<f64>,
    pub token1_usd: Option<f64>,
    /// Tracked reserve if known, else the untracked reserve
    pub liquidity: Option<f64>,
    pub using_tracked_liquidity: bool,
    pub liquidity_change: Option<f64>,
    /// 24h volume; untracked volume when the tracked figure is exactly zero
    pub volume: Option<f64>,
    pub using_untracked_volume: bool,
    pub volume_change: Option<f64>,
    pub fees: Option<f64>,
}

/// Shorten `symbol` to five characters plus an ellipsis if it is too long to display.
pub fn short_symbol(symbol: &str) -> String {
    if symbol.chars().count() > MAX_SYMBOL_CHARS {
        let head: String = symbol.chars().take(SHORT_SYMBOL_CHARS).collect();
        format!("{}...", head)
    } else {
        symbol.to_string()
    }
}

// Zero and NaN mean "not loaded yet"
fn present(value: f64) -> Option<f64> {
    if value == 0.0 || value.is_nan() {
        None
    } else {
        Some(value)
    }
}

fn usd_price(token: &TokenSnapshot, eth_price: Option<f64>) -> Option<f64> {
    let derived = token.derived_eth.and_then(present)?;
    let eth = eth_price.and_then(present)?;
    Some(derived * eth)
}

impl PairSnapshot {
    pub fn overview(&self, eth_price: Option<f64>) -> PairOverview {
        let reserves = present(self.reserve0).zip(present(self.reserve1));

        let tracked_reserve = self.tracked_reserve_usd.and_then(present);
        let liquidity = tracked_reserve.or_else(|| self.reserve_usd.and_then(present));

        // Exactly zero tracked volume switches to the untracked figure
        let using_untracked_volume = self.one_day_volume_usd == Some(0.0);
        let volume = if using_untracked_volume {
            self.one_day_volume_untracked
        } else {
            self.one_day_volume_usd.filter(|v| !v.is_nan())
        };
        let volume_change = if using_untracked_volume {
            self.volume_change_untracked
        } else {
            self.volume_change_usd
        };

        PairOverview {
            address: self.id.clone(),
            token0_symbol: short_symbol(&self.token0.symbol),
            token1_symbol: short_symbol(&self.token1.symbol),
            token0_rate: reserves.map(|(r0, r1)| r1 / r0),
            token1_rate: reserves.map(|(r0, r1)| r0 / r1),
            token0_usd: usd_price(&self.token0, eth_price),
            token1_usd: usd_price(&self.token1, eth_price),
            liquidity,
            using_tracked_liquidity: tracked_reserve.is_some(),
            liquidity_change: self.liquidity_change_usd,
            volume,
            using_untracked_volume,
            volume_change,
            fees: volume.map(|v| v * LP_FEE_RATE),
        }
    }

    /// Whether the unlisted-token warning is shown. `listed` is `None` until the
    /// allow-list has loaded, in which case no warning is shown.
    pub fn show_unlisted_warning(&self, listed: Option<&[String]>, dismissed: bool) -> bool {
        if dismissed {
            return false;
        }
        match listed {
            Some(listed) => {
                let is_listed = |id: &str| listed.iter().any(|l| l == id);
                !(is_listed(self.token0.id.as_str()) && is_listed(self.token1.id.as_str()))
            }
            None => false,
        }
    }

    /// Bookmark entry for this pair, with full (unshortened) symbols
    pub fn to_pinned(&self) -> PinnedPair {
        PinnedPair {
            address: self.id.clone(),
            token0_address: self.token0.id.clone(),
            token1_address: self.token1.id.clone(),
            token0_symbol: self.token0.symbol.clone(),
            token1_symbol: self.token1.symbol.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(reserve0: f64, reserve1: f64) -> PairSnapshot {
        PairSnapshot {
            id: "0xAA".to_string(),
            token0: TokenSnapshot {
                id: "0x1".to_string(),
                symbol: "WETH".to_string(),
                derived_eth: Some(1.0),
            },
            token1: TokenSnapshot {
                id: "0x2".to_string(),
                symbol: "LONGSYMBOL".to_string(),
                derived_eth: Some(0.5),
            },
            reserve0,
            reserve1,
            ..Default::default()
        }
    }

    #[test]
    fn test_short_symbol() {
        assert_eq!(short_symbol("WETH"), "WETH");
        assert_eq!(short_symbol("SIXSIX"), "SIXSIX");
        assert_eq!(short_symbol("SEVENSS"), "SEVEN...");
        assert_eq!(short_symbol(""), "");
    }

    #[test]
    fn test_overview_rates_and_prices() {
        let overview = snapshot(10.0, 20000.0).overview(Some(2000.0));

        assert_eq!(overview.address, "0xAA");
        assert_eq!(overview.token0_symbol, "WETH");
        assert_eq!(overview.token1_symbol, "LONGS...");
        assert_eq!(overview.token0_rate, Some(2000.0));
        assert_eq!(overview.token1_rate, Some(0.0005));
        assert_eq!(overview.token0_usd, Some(2000.0));
        assert_eq!(overview.token1_usd, Some(1000.0));
    }

    #[test]
    fn test_overview_without_reserves_or_price() {
        let overview = snapshot(0.0, 20000.0).overview(None);

        assert_eq!(overview.token0_rate, None);
        assert_eq!(overview.token1_rate, None);
        assert_eq!(overview.token0_usd, None);
        assert_eq!(overview.token1_usd, None);
    }

    #[test]
    fn test_tracked_figures_preferred() {
        let pair = PairSnapshot {
            reserve_usd: Some(900.0),
            tracked_reserve_usd: Some(800.0),
            liquidity_change_usd: Some(-1.5),
            one_day_volume_usd: Some(5000.0),
            one_day_volume_untracked: Some(7000.0),
            volume_change_usd: Some(12.0),
            volume_change_untracked: Some(30.0),
            ..snapshot(1.0, 1.0)
        };
        let overview = pair.overview(None);

        assert_eq!(overview.liquidity, Some(800.0));
        assert!(overview.using_tracked_liquidity);
        assert_eq!(overview.liquidity_change, Some(-1.5));
        assert_eq!(overview.volume, Some(5000.0));
        assert!(!overview.using_untracked_volume);
        assert_eq!(overview.volume_change, Some(12.0));
        assert_eq!(overview.fees, Some(10.0));
    }

    #[test]
    fn test_untracked_liquidity_fallback() {
        let pair = PairSnapshot {
            reserve_usd: Some(900.0),
            tracked_reserve_usd: Some(0.0),
            ..snapshot(1.0, 1.0)
        };
        let overview = pair.overview(None);

        assert_eq!(overview.liquidity, Some(900.0));
        assert!(!overview.using_tracked_liquidity);

        let overview = snapshot(1.0, 1.0).overview(None);
        assert_eq!(overview.liquidity, None);
        assert!(!overview.using_tracked_liquidity);
    }

    #[test]
    fn test_zero_tracked_volume_uses_untracked() {
        let pair = PairSnapshot {
            one_day_volume_usd: Some(0.0),
            one_day_volume_untracked: Some(1000.0),
            volume_change_usd: Some(12.0),
            volume_change_untracked: Some(30.0),
            ..snapshot(1.0, 1.0)
        };
        let overview = pair.overview(None);

        assert!(overview.using_untracked_volume);
        assert_eq!(overview.volume, Some(1000.0));
        assert_eq!(overview.volume_change, Some(30.0));
        assert_eq!(overview.fees, Some(2.0));
    }

    #[test]
    fn test_missing_volume_has_no_fees() {
        let pair = PairSnapshot {
            one_day_volume_untracked: Some(1000.0),
            ..snapshot(1.0, 1.0)
        };
        let overview = pair.overview(None);

        assert!(!overview.using_untracked_volume);
        assert_eq!(overview.volume, None);
        assert_eq!(overview.fees, None);
    }

    #[test]
    fn test_unlisted_warning() {
        let pair = snapshot(1.0, 1.0);
        let both = vec!["0x1".to_string(), "0x2".to_string()];
        let one = vec!["0x1".to_string()];

        assert!(!pair.show_unlisted_warning(Some(both.as_slice()), false));
        assert!(pair.show_unlisted_warning(Some(one.as_slice()), false));
        assert!(pair.show_unlisted_warning(Some(&[][..]), false));
        assert!(!pair.show_unlisted_warning(Some(one.as_slice()), true));
        assert!(!pair.show_unlisted_warning(None, false));
    }

    #[test]
    fn test_to_pinned_keeps_full_symbols() {
        let pinned = snapshot(1.0, 1.0).to_pinned();

        assert_eq!(pinned.address, "0xAA");
        assert_eq!(pinned.token0_address, "0x1");
        assert_eq!(pinned.token1_address, "0x2");
        assert_eq!(pinned.token1_symbol, "LONGSYMBOL");
    }
}
