//! Sales-compliance reporting engine.
//!
//! Branch rows are loaded from a spreadsheet export (or a JSON snapshot of
//! one), grouped per client, aggregated into objective/result totals and
//! compliance percentages, classified into a discount tier and formatted for
//! display.
//!
//! ```
//! use compliance_report::{metrics, store::RecordStore, tier, types::BranchRecord};
//!
//! let store = RecordStore::new(vec![BranchRecord {
//!     client_name: "Acme".into(),
//!     obj_total: 1000.0,
//!     res_total: 1000.0,
//!     ..Default::default()
//! }]);
//! let m = metrics::aggregate_client(&store, "Acme");
//! assert_eq!(m.pct_total, 100.0);
//! assert_eq!(tier::classify(&m).tier, 20);
//! ```

pub mod config;
pub mod error;
pub mod format;
pub mod loader;
pub mod metrics;
pub mod output;
pub mod reports;
pub mod snapshot;
pub mod store;
pub mod tier;
pub mod types;
pub mod util;

pub use error::{ReportError, Result};
