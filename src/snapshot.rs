//! Static data table produced by the import step.
//!
//! A snapshot freezes the cleaned branch rows together with the client
//! directory so later reports do not need the spreadsheet export.

use crate::error::{ReportError, Result};
use crate::loader::{self, LoadReport};
use crate::store::RecordStore;
use crate::types::BranchRecord;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub generated_at: DateTime<Local>,
    pub total_branches: usize,
    pub total_clients: usize,
    pub clients: Vec<String>,
    pub records: Vec<BranchRecord>,
}

impl Snapshot {
    pub fn from_store(store: &RecordStore) -> Self {
        Self {
            generated_at: Local::now(),
            total_branches: store.len(),
            total_clients: store.distinct_clients().len(),
            clients: store.distinct_clients().to_vec(),
            records: store.all_records().to_vec(),
        }
    }

    /// The directory is rebuilt from the records; the stored `clients` list
    /// is informational. Records without a client name are dropped and
    /// counted as skipped.
    pub fn into_store(self) -> (RecordStore, LoadReport) {
        let total_rows = self.records.len();
        let records: Vec<BranchRecord> = self
            .records
            .into_iter()
            .filter(|r| !r.client_name.trim().is_empty())
            .collect();
        let store = RecordStore::new(records);
        let report = LoadReport {
            total_rows,
            kept_rows: store.len(),
            skipped_rows: total_rows - store.len(),
            clients: store.distinct_clients().len(),
            ..Default::default()
        };
        (store, report)
    }
}

pub fn write_snapshot(path: &Path, snapshot: &Snapshot) -> Result<()> {
    crate::output::write_json(path, snapshot)?;
    info!(
        path = %path.display(),
        branches = snapshot.total_branches,
        clients = snapshot.total_clients,
        "snapshot written"
    );
    Ok(())
}

pub fn load_snapshot(path: &Path) -> Result<Snapshot> {
    let text = std::fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    let snapshot: Snapshot = serde_json::from_str(&text)?;
    info!(
        path = %path.display(),
        generated_at = %snapshot.generated_at.format("%d/%m/%Y %H:%M"),
        branches = snapshot.records.len(),
        "snapshot loaded"
    );
    Ok(snapshot)
}

/// Load a record store from a CSV export or a JSON snapshot, chosen by
/// file extension. The load report says how many rows did not make it in.
pub fn open_source(path: &Path, client_marker: &str) -> Result<(RecordStore, LoadReport)> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("csv") => {
            let (records, report) = loader::load_and_clean(path, client_marker)?;
            Ok((RecordStore::new(records), report))
        }
        Some("json") => {
            let (store, report) = load_snapshot(path)?.into_store();
            if report.skipped_rows > 0 {
                warn!(
                    path = %path.display(),
                    rows = report.skipped_rows,
                    "snapshot records without a client name were dropped"
                );
            }
            Ok((store, report))
        }
        _ => Err(ReportError::UnsupportedSource(path.to_path_buf())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(client: &str, sucursal: &str, obj_total: f64) -> BranchRecord {
        BranchRecord {
            client_name: client.into(),
            sucursal: sucursal.into(),
            obj_total,
            ..Default::default()
        }
    }

    #[test]
    fn snapshot_survives_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.json");
        let store = RecordStore::new(vec![
            record("Beta", "Norte", 10.0),
            record("Acme", "Centro", 20.5),
        ]);
        let snap = Snapshot::from_store(&store);
        assert_eq!(snap.clients, vec!["Acme", "Beta"]);
        write_snapshot(&path, &snap).unwrap();

        let (restored, report) = open_source(&path, "C").unwrap();
        assert_eq!(report.kept_rows, 2);
        assert_eq!(report.skipped_rows, 0);
        assert_eq!(restored.all_records(), store.all_records());
        assert_eq!(restored.distinct_clients(), store.distinct_clients());
    }

    #[test]
    fn snapshot_uses_camel_case_fields() {
        let snap = Snapshot::from_store(&RecordStore::new(vec![record("Acme", "Centro", 1.0)]));
        let json = serde_json::to_value(&snap).unwrap();
        assert_eq!(json["records"][0]["clientName"], "Acme");
        assert_eq!(json["records"][0]["objTotal"], 1.0);
    }

    #[test]
    fn missing_numeric_fields_read_as_zero() {
        let snap: Snapshot = serde_json::from_str(
            r#"{
                "generated_at": "2026-10-16T09:30:00+00:00",
                "total_branches": 1,
                "total_clients": 1,
                "clients": ["Acme"],
                "records": [{"clientName": "Acme", "sucursal": "Centro", "objTotal": 500.0}]
            }"#,
        )
        .unwrap();
        let (store, _) = snap.into_store();
        let r = &store.all_records()[0];
        assert_eq!(r.obj_total, 500.0);
        assert_eq!(r.pedidos, 0.0);
        assert_eq!(r.res_total, 0.0);
        assert_eq!(r.asesor, "");
    }

    #[test]
    fn records_without_client_are_dropped() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("datos.json");
        let mut snap = Snapshot::from_store(&RecordStore::new(vec![record("Acme", "Centro", 1.0)]));
        snap.records.push(record("", "Huerfana", 9.0));
        snap.records.push(record("  ", "Blanca", 9.0));
        write_snapshot(&path, &snap).unwrap();

        let (store, report) = open_source(&path, "C").unwrap();
        assert_eq!(store.distinct_clients(), &["Acme"]);
        assert_eq!(store.len(), 1);
        assert_eq!(report.total_rows, 3);
        assert_eq!(report.skipped_rows, 2);
    }

    #[test]
    fn unknown_extension_is_rejected() {
        let err = open_source(Path::new("data.xlsx"), "C").unwrap_err();
        assert!(matches!(err, ReportError::UnsupportedSource(_)));
    }
}
