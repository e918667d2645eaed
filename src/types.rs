use serde::{Deserialize, Serialize};
use tabled::Tabled;

/// One spreadsheet row as exported to CSV. Every cell is kept as text so the
/// loader can coerce it on its own terms.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRow {
    #[serde(rename = "CLIENT_NUM")]
    pub client_num: Option<String>,
    #[serde(rename = "clientName")]
    pub client_name: Option<String>,
    #[serde(rename = "sucursal")]
    pub sucursal: Option<String>,
    #[serde(rename = "asesor")]
    pub asesor: Option<String>,
    #[serde(rename = "zona")]
    pub zona: Option<String>,
    #[serde(rename = "objRefacc")]
    pub obj_refacc: Option<String>,
    #[serde(rename = "objBgo")]
    pub obj_bgo: Option<String>,
    #[serde(rename = "objAcc")]
    pub obj_acc: Option<String>,
    #[serde(rename = "objTotal")]
    pub obj_total: Option<String>,
    #[serde(rename = "resRefacc")]
    pub res_refacc: Option<String>,
    #[serde(rename = "resBgo")]
    pub res_bgo: Option<String>,
    #[serde(rename = "resAcc")]
    pub res_acc: Option<String>,
    #[serde(rename = "resTotal")]
    pub res_total: Option<String>,
    #[serde(rename = "pedidos")]
    pub pedidos: Option<String>,
}

/// A cleaned branch row. Numeric fields are always finite; anything that
/// failed coercion is already 0 here. Fields missing from a snapshot read
/// as 0 or empty.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BranchRecord {
    pub client_name: String,
    pub sucursal: String,
    pub asesor: String,
    pub zona: u32,
    pub obj_refacc: f64,
    pub obj_bgo: f64,
    pub obj_acc: f64,
    pub obj_total: f64,
    pub res_refacc: f64,
    pub res_bgo: f64,
    pub res_acc: f64,
    pub res_total: f64,
    pub pedidos: f64,
}

/// Sums and compliance percentages for one client's branches. The discount
/// tier is classified from these and travels as `ClientReport::discount`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ClientMetrics {
    pub branches: usize,
    pub obj_refacc: f64,
    pub obj_bgo: f64,
    pub obj_acc: f64,
    pub obj_total: f64,
    pub res_refacc: f64,
    pub res_bgo: f64,
    pub res_acc: f64,
    pub res_total: f64,
    pub pedidos: f64,
    pub pct_refacc: f64,
    pub pct_bgo: f64,
    pub pct_acc: f64,
    pub pct_total: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct BranchDetailRow {
    #[serde(rename = "Sucursal")]
    #[tabled(rename = "Sucursal")]
    pub sucursal: String,
    #[serde(rename = "Obj Refacc")]
    #[tabled(rename = "Obj Refacc")]
    pub obj_refacc: String,
    #[serde(rename = "Res Refacc")]
    #[tabled(rename = "Res Refacc")]
    pub res_refacc: String,
    #[serde(rename = "Obj BGO")]
    #[tabled(rename = "Obj BGO")]
    pub obj_bgo: String,
    #[serde(rename = "Res BGO")]
    #[tabled(rename = "Res BGO")]
    pub res_bgo: String,
    #[serde(rename = "Obj Total")]
    #[tabled(rename = "Obj Total")]
    pub obj_total: String,
    #[serde(rename = "Res Total")]
    #[tabled(rename = "Res Total")]
    pub res_total: String,
    #[serde(rename = "% Cumpl.")]
    #[tabled(rename = "% Cumpl.")]
    pub compliance: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct CategoryRow {
    #[serde(rename = "Category")]
    #[tabled(rename = "Category")]
    pub category: String,
    #[serde(rename = "Objective")]
    #[tabled(rename = "Objective")]
    pub objective: String,
    #[serde(rename = "Result")]
    #[tabled(rename = "Result")]
    pub result: String,
    #[serde(rename = "Compliance")]
    #[tabled(rename = "Compliance")]
    pub compliance: String,
    #[serde(rename = "Band")]
    #[tabled(rename = "Band")]
    pub band: String,
    #[serde(rename = "Color")]
    #[tabled(skip)]
    pub color: String,
    #[serde(rename = "BarWidth")]
    #[tabled(skip)]
    pub bar_width: f64,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct KpiRow {
    #[serde(rename = "Metric")]
    #[tabled(rename = "Metric")]
    pub metric: String,
    #[serde(rename = "Value")]
    #[tabled(rename = "Value")]
    pub value: String,
}

#[derive(Debug, Serialize, Tabled, Clone, PartialEq)]
pub struct DirectoryRow {
    #[serde(rename = "Client")]
    #[tabled(rename = "Client")]
    pub client: String,
    #[serde(rename = "Branches")]
    #[tabled(rename = "Branches")]
    pub branches: usize,
    #[serde(rename = "Objective")]
    #[tabled(rename = "Objective")]
    pub objective: String,
    #[serde(rename = "Result")]
    #[tabled(rename = "Result")]
    pub result: String,
    #[serde(rename = "Compliance")]
    #[tabled(rename = "Compliance")]
    pub compliance: String,
    #[serde(rename = "Discount")]
    #[tabled(rename = "Discount")]
    pub discount: String,
}
