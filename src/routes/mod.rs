pub(crate) mod catalog;
pub(crate) mod health;
pub(crate) mod params;
pub(crate) mod portfolio;
pub(crate) mod selector;
