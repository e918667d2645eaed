use crate::error::{ReportError, Result};
use crate::types::{BranchRecord, RawRow};
use crate::util::{coerce_f64, coerce_zone};
use csv::{ReaderBuilder, StringRecord};
use std::collections::HashSet;
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

/// Default prefix that marks a spreadsheet row as a client branch.
pub const DEFAULT_CLIENT_MARKER: &str = "C";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub total_rows: usize,
    pub kept_rows: usize,
    /// Rows without the client marker or without a client name.
    pub skipped_rows: usize,
    /// Rows the CSV reader could not decode at all.
    pub parse_errors: usize,
    /// Numeric cells that held text and were replaced with 0.
    pub coerced_fields: usize,
    pub clients: usize,
}

pub fn load_and_clean(path: &Path, client_marker: &str) -> Result<(Vec<BranchRecord>, LoadReport)> {
    let file = std::fs::File::open(path).map_err(|e| ReportError::io(path, e))?;
    let (records, report) = load_from_reader(file, client_marker)?;
    info!(
        path = %path.display(),
        total = report.total_rows,
        kept = report.kept_rows,
        skipped = report.skipped_rows,
        undecodable = report.parse_errors,
        coerced = report.coerced_fields,
        "loaded branch rows"
    );
    if report.parse_errors > 0 {
        warn!(
            path = %path.display(),
            rows = report.parse_errors,
            "rows could not be decoded and are missing from every total"
        );
    }
    Ok((records, report))
}

pub fn load_from_reader<R: Read>(
    reader: R,
    client_marker: &str,
) -> Result<(Vec<BranchRecord>, LoadReport)> {
    let mut rdr = ReaderBuilder::new().flexible(true).from_reader(reader);
    // Fail early on an unreadable header instead of silently loading nothing.
    let headers = rdr.headers()?.clone();

    let mut report = LoadReport::default();
    let mut records: Vec<BranchRecord> = Vec::new();

    for result in rdr.records() {
        report.total_rows += 1;
        let row = match result.and_then(|record| decode_row(record, &headers)) {
            Ok(r) => r,
            Err(e) => {
                // Line 1 is the header.
                warn!(line = report.total_rows + 1, error = %e, "undecodable row skipped");
                report.parse_errors += 1;
                continue;
            }
        };
        match clean_row(row, client_marker, &mut report.coerced_fields) {
            Some(rec) => records.push(rec),
            None => report.skipped_rows += 1,
        }
    }

    report.kept_rows = records.len();
    report.clients = records
        .iter()
        .map(|r| r.client_name.as_str())
        .collect::<HashSet<_>>()
        .len();
    Ok((records, report))
}

/// Spreadsheet exports drop trailing empty cells. Pad the row to the header
/// width so columns we never read cannot fail deserialization.
fn decode_row(mut record: StringRecord, headers: &StringRecord) -> csv::Result<RawRow> {
    while record.len() < headers.len() {
        record.push_field("");
    }
    record.deserialize(Some(headers))
}

/// Keep only rows whose client number carries the marker and that name a
/// client. Numeric cells fall back to 0.
fn clean_row(row: RawRow, client_marker: &str, coerced: &mut usize) -> Option<BranchRecord> {
    let marker_ok = row
        .client_num
        .as_deref()
        .map(str::trim)
        .is_some_and(|n| !n.is_empty() && n.starts_with(client_marker));
    if !marker_ok {
        return None;
    }
    let client_name = row.client_name.as_deref().map(str::trim).unwrap_or("");
    if client_name.is_empty() {
        return None;
    }

    let mut num = |cell: &Option<String>| {
        let (v, bad) = coerce_f64(cell.as_deref());
        if bad {
            *coerced += 1;
        }
        v
    };
    let obj_refacc = num(&row.obj_refacc);
    let obj_bgo = num(&row.obj_bgo);
    let obj_acc = num(&row.obj_acc);
    let obj_total = num(&row.obj_total);
    let res_refacc = num(&row.res_refacc);
    let res_bgo = num(&row.res_bgo);
    let res_acc = num(&row.res_acc);
    let res_total = num(&row.res_total);
    let pedidos = num(&row.pedidos);

    let (zona, bad_zone) = coerce_zone(row.zona.as_deref());
    if bad_zone {
        *coerced += 1;
    }

    Some(BranchRecord {
        client_name: client_name.to_string(),
        sucursal: row.sucursal.unwrap_or_default().trim().to_string(),
        asesor: row.asesor.unwrap_or_default().trim().to_string(),
        zona,
        obj_refacc,
        obj_bgo,
        obj_acc,
        obj_total,
        res_refacc,
        res_bgo,
        res_acc,
        res_total,
        pedidos,
    })
}
