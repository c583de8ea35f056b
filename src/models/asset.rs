use serde::{Deserialize, Serialize};

/// A tradable instrument the optimizer knows by its Yahoo-style code.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Asset {
    pub name: String,
    pub code: String,
}

impl Asset {
    pub fn new(name: &str, code: &str) -> Self {
        Self {
            name: name.to_string(),
            code: code.to_string(),
        }
    }
}

/// Which static list of instruments the selector offers
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum CatalogKind {
    Crypto,
    Extended,
}

impl CatalogKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "crypto" => Some(CatalogKind::Crypto),
            "extended" => Some(CatalogKind::Extended),
            _ => None,
        }
    }

    /// Minimum selection each catalog has historically enforced
    pub fn default_min_selection(&self) -> usize {
        match self {
            CatalogKind::Crypto => 2,
            CatalogKind::Extended => 4,
        }
    }
}

const CRYPTO_ASSETS: &[(&str, &str)] = &[
    ("Bitcoin", "BTC-USD"),
    ("Ethereum", "ETH-USD"),
    ("Cardano", "ADA-USD"),
    ("Tether", "USDT-USD"),
    ("Binance Coin", "BNB-USD"),
    ("XRP", "XRP-USD"),
    ("Solana", "SOL-USD"),
    ("Dogecoin", "DOGE-USD"),
    ("USD Coin", "USDC-USD"),
    ("Avalanche", "AVAX-USD"),
    ("Chainlink", "LINK-USD"),
    ("Bitcoin Cash", "BCH-USD"),
    ("Algorand", "ALGO-USD"),
    ("Litecoin", "LTC-USD"),
];

// Extra coins listed only by the extended catalog
const EXTRA_CRYPTO_ASSETS: &[(&str, &str)] = &[
    ("Polkadot", "DOT-USD"),
    ("Polygon", "MATIC-USD"),
    ("TRON", "TRX-USD"),
    ("Stellar", "XLM-USD"),
    ("Cosmos", "ATOM-USD"),
    ("Monero", "XMR-USD"),
];

const EQUITY_ASSETS: &[(&str, &str)] = &[
    ("Apple", "AAPL"),
    ("Microsoft", "MSFT"),
    ("Amazon", "AMZN"),
    ("Alphabet", "GOOGL"),
    ("Meta Platforms", "META"),
    ("Tesla", "TSLA"),
    ("NVIDIA", "NVDA"),
    ("Berkshire Hathaway", "BRK-B"),
    ("JPMorgan Chase", "JPM"),
    ("Johnson & Johnson", "JNJ"),
    ("Visa", "V"),
    ("Procter & Gamble", "PG"),
    ("Mastercard", "MA"),
    ("UnitedHealth", "UNH"),
    ("Home Depot", "HD"),
    ("Walt Disney", "DIS"),
    ("Coca-Cola", "KO"),
    ("PepsiCo", "PEP"),
    ("Netflix", "NFLX"),
    ("Intel", "INTC"),
];

/// Ordered list of selectable assets
#[derive(Debug, Clone, Serialize)]
pub struct AssetCatalog {
    pub kind: CatalogKind,
    pub assets: Vec<Asset>,
}

impl AssetCatalog {
    pub fn for_kind(kind: CatalogKind) -> Self {
        let pairs: Vec<&(&str, &str)> = match kind {
            CatalogKind::Crypto => CRYPTO_ASSETS.iter().collect(),
            CatalogKind::Extended => CRYPTO_ASSETS
                .iter()
                .chain(EXTRA_CRYPTO_ASSETS)
                .chain(EQUITY_ASSETS)
                .collect(),
        };

        Self {
            kind,
            assets: pairs
                .into_iter()
                .map(|(name, code)| Asset::new(name, code))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn find_by_code(&self, code: &str) -> Option<&Asset> {
        let code = code.trim();
        self.assets
            .iter()
            .find(|a| a.code.eq_ignore_ascii_case(code))
    }

    /// Case-insensitive substring match on name or code. An empty needle keeps everything.
    pub fn filter(&self, needle: &str) -> Vec<&Asset> {
        let needle = needle.trim().to_lowercase();
        if needle.is_empty() {
            return self.assets.iter().collect();
        }

        self.assets
            .iter()
            .filter(|a| {
                a.name.to_lowercase().contains(&needle) || a.code.to_lowercase().contains(&needle)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_catalog_lists_fourteen_coins() {
        let catalog = AssetCatalog::for_kind(CatalogKind::Crypto);
        assert_eq!(catalog.len(), 14);
        assert_eq!(catalog.assets[0], Asset::new("Bitcoin", "BTC-USD"));
        assert_eq!(catalog.assets[13], Asset::new("Litecoin", "LTC-USD"));
    }

    #[test]
    fn test_extended_catalog_has_twenty_coins_and_twenty_equities() {
        let catalog = AssetCatalog::for_kind(CatalogKind::Extended);
        let coins = catalog.assets.iter().filter(|a| a.code.ends_with("-USD")).count();
        assert_eq!(coins, 20);
        assert_eq!(catalog.len() - coins, 20);
    }

    #[test]
    fn test_find_by_code_ignores_case() {
        let catalog = AssetCatalog::for_kind(CatalogKind::Crypto);
        assert_eq!(catalog.find_by_code("eth-usd").map(|a| a.name.as_str()), Some("Ethereum"));
        assert!(catalog.find_by_code("AAPL").is_none());
    }

    #[test]
    fn test_filter_matches_name_or_code() {
        let catalog = AssetCatalog::for_kind(CatalogKind::Crypto);
        let names: Vec<_> = catalog.filter("bitcoin").iter().map(|a| a.code.clone()).collect();
        assert_eq!(names, vec!["BTC-USD", "BCH-USD"]);

        let by_code = catalog.filter("doge");
        assert_eq!(by_code.len(), 1);
        assert_eq!(catalog.filter("  ").len(), 14);
    }

    #[test]
    fn test_catalog_kind_defaults() {
        assert_eq!(CatalogKind::parse("Extended"), Some(CatalogKind::Extended));
        assert_eq!(CatalogKind::parse("bonds"), None);
        assert_eq!(CatalogKind::Crypto.default_min_selection(), 2);
        assert_eq!(CatalogKind::Extended.default_min_selection(), 4);
    }
}
