pub mod asset;
pub mod notification;
pub mod optimization;
pub mod selection;
pub mod table;

pub use asset::{Asset, AssetCatalog, CatalogKind};
pub use notification::{Toast, ToastSeverity};
pub use optimization::{ChartSpec, DecodeError, OptimizationResult, RawOptimizationResponse, Row, RowCollection};
pub use selection::{RangeDays, Selection, SelectorInput};
pub use table::{SortOrder, SortSpec, TablePage, TableView};
