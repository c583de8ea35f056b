use serde::Serialize;

use crate::models::asset::{Asset, AssetCatalog};

pub const MIN_RANGE_DAYS: u32 = 180;
pub const MAX_RANGE_DAYS: u32 = 720;
pub const DEFAULT_RANGE_DAYS: u32 = 365;

/// Length of the historical window, always within [180, 720]
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct RangeDays(u32);

impl RangeDays {
    pub fn new(days: i64) -> Self {
        Self(days.clamp(MIN_RANGE_DAYS as i64, MAX_RANGE_DAYS as i64) as u32)
    }

    pub fn get(&self) -> u32 {
        self.0
    }
}

impl Default for RangeDays {
    fn default() -> Self {
        Self(DEFAULT_RANGE_DAYS)
    }
}

/// Chosen assets in the order they were picked, without duplicates
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct Selection {
    assets: Vec<Asset>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an asset unless it is already selected. Returns false for duplicates.
    pub fn insert(&mut self, asset: Asset) -> bool {
        if self.contains(&asset.code) {
            return false;
        }
        self.assets.push(asset);
        true
    }

    pub fn contains(&self, code: &str) -> bool {
        self.assets.iter().any(|a| a.code == code)
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    pub fn assets(&self) -> &[Asset] {
        &self.assets
    }

    pub fn codes(&self) -> Vec<&str> {
        self.assets.iter().map(|a| a.code.as_str()).collect()
    }

    /// Resolves codes against the catalog. Unknown codes are returned separately.
    pub fn from_codes<'a, I>(catalog: &AssetCatalog, codes: I) -> (Self, Vec<String>)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut selection = Self::new();
        let mut unknown = Vec::new();

        for code in codes {
            let code = code.trim();
            if code.is_empty() {
                continue;
            }
            match catalog.find_by_code(code) {
                Some(asset) => {
                    selection.insert(asset.clone());
                }
                None => unknown.push(code.to_string()),
            }
        }

        (selection, unknown)
    }
}

/// What the selector shows in the multi-select's closed state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionLabel {
    Placeholder,
    Chips(Vec<String>),
    Summary(usize),
}

/// Chips for up to `max_labels` assets, a count summary past that
pub fn selection_label(selection: &Selection, max_labels: usize) -> SelectionLabel {
    match selection.len() {
        0 => SelectionLabel::Placeholder,
        n if n > max_labels => SelectionLabel::Summary(n),
        _ => SelectionLabel::Chips(selection.assets().iter().map(|a| a.name.clone()).collect()),
    }
}

/// Everything the submit action forwards to the dispatcher
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectorInput {
    pub selection: Selection,
    pub range: RangeDays,
    pub include_all_assets: bool,
}
