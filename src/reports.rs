use crate::format::{
    band, format_currency, format_percent, progress_width, BADGE_QUALIFIED, BADGE_STANDARD,
};
use crate::metrics::{aggregate, compliance_pct, reconcile, TotalMismatch};
use crate::store::RecordStore;
use crate::tier::{DiscountTier, TierRules};
use crate::types::{BranchDetailRow, BranchRecord, CategoryRow, ClientMetrics, DirectoryRow, KpiRow};
use serde::Serialize;
use tracing::warn;

pub const DISCOUNT_NOTE: &str =
    "A 35% discount requires reaching 100% of the objective in every category.";

/// Donut chart data: what was reached and what is still pending.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct CompletionRing {
    pub achieved: f64,
    pub pending: f64,
    pub center_label: String,
}

/// Everything a renderer needs to draw one client's dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct ClientReport {
    pub client: String,
    pub branches: usize,
    pub metrics: ClientMetrics,
    pub discount: DiscountTier,
    /// Badge colour: green when a tier rule was met, blue for the fallback.
    pub discount_color: String,
    pub kpis: Vec<KpiRow>,
    pub categories: Vec<CategoryRow>,
    pub ring: CompletionRing,
    pub detail: Vec<BranchDetailRow>,
    pub observations: Vec<TotalMismatch>,
    pub note: String,
}

/// The requested client, or the first one in the directory when none was
/// asked for. `None` only when the store is empty and nothing was requested.
pub fn select_client(store: &RecordStore, requested: Option<&str>) -> Option<String> {
    match requested {
        Some(name) => Some(name.to_string()),
        None => store.distinct_clients().first().cloned(),
    }
}

pub fn generate_client_report(store: &RecordStore, client: &str, rules: &TierRules) -> ClientReport {
    let records = store.records_for_client(client);
    if records.is_empty() {
        warn!(client, "no branches for client; reporting zeros");
    }
    let metrics = aggregate(records.iter().copied());
    let discount = rules.classify(&metrics);
    let discount_color = if rules.is_fallback(&discount) {
        BADGE_STANDARD
    } else {
        BADGE_QUALIFIED
    };
    let observations = reconcile(&metrics);
    for o in &observations {
        warn!(
            client,
            kind = ?o.kind,
            declared = o.declared,
            components = o.components,
            "declared total differs from refacc + bgo + acc"
        );
    }

    ClientReport {
        client: client.to_string(),
        branches: metrics.branches,
        kpis: generate_kpis(&metrics),
        categories: generate_categories(&metrics),
        ring: generate_ring(&metrics),
        detail: generate_branch_detail(&records),
        metrics,
        discount,
        discount_color: discount_color.to_string(),
        observations,
        note: DISCOUNT_NOTE.to_string(),
    }
}

pub fn generate_kpis(m: &ClientMetrics) -> Vec<KpiRow> {
    let kpi = |metric: &str, value: String| KpiRow {
        metric: metric.to_string(),
        value,
    };
    vec![
        kpi("Objective", format_currency(m.obj_total)),
        kpi("Result", format_currency(m.res_total)),
        kpi("Compliance", format_percent(m.pct_total)),
        // Orders are tracked as an amount in the source sheet.
        kpi("Orders", format_currency(m.pedidos)),
    ]
}

pub fn category_row(category: &str, objective: f64, result: f64, pct: f64) -> CategoryRow {
    let b = band(pct);
    CategoryRow {
        category: category.to_string(),
        objective: format_currency(objective),
        result: format_currency(result),
        compliance: format_percent(pct),
        band: b.label().to_string(),
        color: b.hex().to_string(),
        bar_width: progress_width(pct),
    }
}

pub fn generate_categories(m: &ClientMetrics) -> Vec<CategoryRow> {
    vec![
        category_row("REFACCIONES", m.obj_refacc, m.res_refacc, m.pct_refacc),
        category_row("BGO", m.obj_bgo, m.res_bgo, m.pct_bgo),
    ]
}

pub fn generate_ring(m: &ClientMetrics) -> CompletionRing {
    CompletionRing {
        achieved: m.res_total,
        pending: (m.obj_total - m.res_total).max(0.0),
        center_label: format_percent(m.pct_total),
    }
}

pub fn generate_branch_detail(records: &[&BranchRecord]) -> Vec<BranchDetailRow> {
    records
        .iter()
        .map(|r| BranchDetailRow {
            sucursal: r.sucursal.clone(),
            obj_refacc: format_currency(r.obj_refacc),
            res_refacc: format_currency(r.res_refacc),
            obj_bgo: format_currency(r.obj_bgo),
            res_bgo: format_currency(r.res_bgo),
            obj_total: format_currency(r.obj_total),
            res_total: format_currency(r.res_total),
            compliance: format_percent(compliance_pct(r.res_total, r.obj_total)),
        })
        .collect()
}

/// One row per client in directory order.
pub fn generate_directory(store: &RecordStore, rules: &TierRules) -> Vec<DirectoryRow> {
    store
        .distinct_clients()
        .iter()
        .map(|client| {
            let m = aggregate(store.records_for_client(client));
            let discount = rules.classify(&m);
            DirectoryRow {
                client: client.clone(),
                branches: m.branches,
                objective: format_currency(m.obj_total),
                result: format_currency(m.res_total),
                compliance: format_percent(m.pct_total),
                discount: format!("{}% ({})", discount.tier, discount.label),
            }
        })
        .collect()
}
