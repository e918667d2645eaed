//! Aggregation of branch records into per-client totals.
//!
//! Everything here is a pure function of its input. No rounding happens at
//! this stage; the formatter owns that.

use crate::store::RecordStore;
use crate::types::{BranchRecord, ClientMetrics};
use serde::Serialize;
use tracing::debug;

/// Declared totals and component sums may differ by this much before a
/// mismatch is reported. Source amounts carry two decimals.
pub const RECONCILE_TOLERANCE: f64 = 0.01;

/// `result / objective * 100`, or 0 when there is no positive objective.
pub fn compliance_pct(result: f64, objective: f64) -> f64 {
    if objective > 0.0 {
        let pct = result / objective * 100.0;
        if pct.is_finite() {
            pct
        } else {
            0.0
        }
    } else {
        0.0
    }
}

pub fn aggregate<'a, I>(records: I) -> ClientMetrics
where
    I: IntoIterator<Item = &'a BranchRecord>,
{
    let mut m = ClientMetrics::default();
    for r in records {
        m.branches += 1;
        m.obj_refacc += r.obj_refacc;
        m.obj_bgo += r.obj_bgo;
        m.obj_acc += r.obj_acc;
        m.obj_total += r.obj_total;
        m.res_refacc += r.res_refacc;
        m.res_bgo += r.res_bgo;
        m.res_acc += r.res_acc;
        m.res_total += r.res_total;
        m.pedidos += r.pedidos;
    }
    // Each axis against its own objective.
    m.pct_refacc = compliance_pct(m.res_refacc, m.obj_refacc);
    m.pct_bgo = compliance_pct(m.res_bgo, m.obj_bgo);
    m.pct_acc = compliance_pct(m.res_acc, m.obj_acc);
    m.pct_total = compliance_pct(m.res_total, m.obj_total);
    m
}

/// Metrics for the branches of `client`. An unknown client yields zeros.
pub fn aggregate_client(store: &RecordStore, client: &str) -> ClientMetrics {
    let metrics = aggregate(store.records_for_client(client));
    debug!(
        client,
        branches = metrics.branches,
        pct_total = metrics.pct_total,
        "aggregated client"
    );
    metrics
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TotalKind {
    Objective,
    Result,
}

/// The declared `Total` column disagrees with refacc + bgo + acc. This is a
/// data-quality observation only; totals are never recomputed from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TotalMismatch {
    pub kind: TotalKind,
    pub declared: f64,
    pub components: f64,
    pub difference: f64,
}

pub fn reconcile(m: &ClientMetrics) -> Vec<TotalMismatch> {
    let checks = [
        (TotalKind::Objective, m.obj_total, m.obj_refacc + m.obj_bgo + m.obj_acc),
        (TotalKind::Result, m.res_total, m.res_refacc + m.res_bgo + m.res_acc),
    ];
    checks
        .into_iter()
        .filter_map(|(kind, declared, components)| {
            let difference = declared - components;
            (difference.abs() > RECONCILE_TOLERANCE).then_some(TotalMismatch {
                kind,
                declared,
                components,
                difference,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn record(obj_total: f64, res_total: f64) -> BranchRecord {
        BranchRecord {
            client_name: "Acme".to_string(),
            obj_total,
            res_total,
            ..Default::default()
        }
    }

    #[test]
    fn empty_input_is_all_zero() {
        let m = aggregate(std::iter::empty::<&BranchRecord>());
        assert_eq!(m, ClientMetrics::default());
        assert_eq!(m.pct_total, 0.0);
    }

    #[test]
    fn sums_every_field() {
        let a = BranchRecord {
            client_name: "Acme".into(),
            obj_refacc: 100.0,
            obj_bgo: 50.0,
            obj_acc: 5.0,
            obj_total: 155.0,
            res_refacc: 80.0,
            res_bgo: 60.0,
            res_acc: 1.0,
            res_total: 141.0,
            pedidos: 3.0,
            ..Default::default()
        };
        let b = BranchRecord {
            obj_refacc: 10.0,
            res_bgo: 5.5,
            pedidos: 2.0,
            ..a.clone()
        };
        let m = aggregate([&a, &b]);
        assert_eq!(m.branches, 2);
        assert_eq!(m.obj_refacc, 110.0);
        assert_eq!(m.obj_bgo, 100.0);
        assert_eq!(m.obj_acc, 10.0);
        assert_eq!(m.obj_total, 310.0);
        assert_eq!(m.res_refacc, 160.0);
        assert_eq!(m.res_bgo, 65.5);
        assert_eq!(m.res_acc, 2.0);
        assert_eq!(m.res_total, 282.0);
        assert_eq!(m.pedidos, 5.0);
    }

    #[test]
    fn percentages_use_their_own_objective() {
        let r = BranchRecord {
            obj_refacc: 200.0,
            res_refacc: 100.0,
            obj_bgo: 0.0,
            res_bgo: 999.0,
            obj_total: 1000.0,
            res_total: 1500.0,
            ..Default::default()
        };
        let m = aggregate([&r]);
        assert_eq!(m.pct_refacc, 50.0);
        assert_eq!(m.pct_bgo, 0.0);
        assert_eq!(m.pct_total, 150.0);
    }

    #[test]
    fn zero_objective_never_divides() {
        assert_eq!(compliance_pct(500.0, 0.0), 0.0);
        assert_eq!(compliance_pct(0.0, 0.0), 0.0);
        assert_eq!(compliance_pct(500.0, -10.0), 0.0);
        assert_eq!(compliance_pct(1.0, 4.0), 25.0);
    }

    #[test]
    fn two_branch_scenario() {
        let m = aggregate([&record(1000.0, 1000.0), &record(500.0, 400.0)]);
        assert_eq!(m.obj_total, 1500.0);
        assert_eq!(m.res_total, 1400.0);
        assert!((m.pct_total - 93.333_333).abs() < 1e-4);
    }

    #[test]
    fn unknown_client_aggregates_to_zero() {
        let store = RecordStore::new(vec![record(10.0, 10.0)]);
        assert_eq!(aggregate_client(&store, "Nobody"), ClientMetrics::default());
        assert_eq!(aggregate_client(&store, "Acme").branches, 1);
    }

    #[test]
    fn reconcile_reports_independent_total_mismatch() {
        let r = BranchRecord {
            obj_refacc: 100.0,
            obj_bgo: 50.0,
            obj_total: 150.0,
            res_refacc: 10.0,
            res_bgo: 10.0,
            res_total: 30.0,
            ..Default::default()
        };
        let m = aggregate([&r]);
        let found = reconcile(&m);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].kind, TotalKind::Result);
        assert_eq!(found[0].difference, 10.0);
        // Totals stay as declared.
        assert_eq!(m.res_total, 30.0);
    }

    #[test]
    fn reconcile_tolerates_cent_rounding() {
        let r = BranchRecord {
            obj_refacc: 0.1,
            obj_bgo: 0.2,
            obj_total: 0.3,
            ..Default::default()
        };
        assert!(reconcile(&aggregate([&r])).is_empty());
    }
}
