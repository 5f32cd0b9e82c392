//! Join, per-network supplier counting, and region attachment.

use std::collections::BTreeMap;

use indexmap::IndexMap;
use tracing::{info, warn};

use crate::config::PipelineConfig;
use crate::normalize::{PracticeRecord, SupplierObservation};
use crate::types::{PcnCode, PracticeCode, RegionCode, SupplierName};

/// Supplier counts and region code for one network.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AggregatedNetwork {
    /// Network identifier.
    pub pcn_code: PcnCode,
    /// Region code attached from the first practice seen in the network.
    pub region_code: RegionCode,
    /// Count per supplier column. Every network carries the full column
    /// set (a wide pivot), zero-filled for suppliers absent locally.
    pub supplier_counts: IndexMap<SupplierName, u32>,
}

impl AggregatedNetwork {
    /// Count for one supplier column, zero when the column is unknown.
    pub fn count(&self, supplier: &str) -> u32 {
        self.supplier_counts.get(supplier).copied().unwrap_or(0)
    }

    /// Share of supplier `a` among practices on `a` or `b`, or `None`
    /// when neither supplier has a counted practice here. Undefined
    /// shares are rendered in the missing colour.
    pub fn supplier_fraction(&self, a: &str, b: &str) -> Option<f64> {
        let count_a = self.count(a);
        let denominator = count_a + self.count(b);
        if denominator == 0 {
            None
        } else {
            Some(f64::from(count_a) / f64::from(denominator))
        }
    }
}

/// Full aggregation result handed to the renderer and table writer.
#[derive(Clone, Debug)]
pub struct AggregateOutput {
    /// One entry per distinct network, ascending by `pcn_code`.
    pub networks: Vec<AggregatedNetwork>,
    /// Supplier column names in output order (ascending).
    pub suppliers: Vec<SupplierName>,
    /// Sum of the configured supplier A column over all networks.
    pub total_supplier_a: u32,
    /// Sum of the configured supplier B column over all networks.
    pub total_supplier_b: u32,
}

struct NetworkAccum {
    region_code: RegionCode,
    counts: BTreeMap<SupplierName, u32>,
}

/// Left-join practices to their resolved supplier, group by network, and
/// pivot supplier counts wide.
///
/// Practices without a resolved supplier still establish their network's
/// existence but contribute to no count. Region codes are expected to
/// agree within a network; on disagreement the first-seen value is kept
/// and a warning names the conflict.
pub fn aggregate(
    practices: &[PracticeRecord],
    supplier_by_practice: &IndexMap<PracticeCode, SupplierObservation>,
    config: &PipelineConfig,
) -> AggregateOutput {
    let mut groups: BTreeMap<PcnCode, NetworkAccum> = BTreeMap::new();
    let mut suppliers: Vec<SupplierName> = Vec::new();

    for practice in practices {
        let accum = groups
            .entry(practice.pcn_code.clone())
            .or_insert_with(|| NetworkAccum {
                region_code: practice.region_code.clone(),
                counts: BTreeMap::new(),
            });
        if accum.region_code != practice.region_code {
            warn!(
                pcn_code = %practice.pcn_code,
                kept = %accum.region_code,
                conflicting = %practice.region_code,
                "practices disagree on region code; keeping first-seen value"
            );
        }
        if let Some(observation) = supplier_by_practice.get(&practice.practice_code) {
            *accum.counts.entry(observation.supplier.clone()).or_insert(0) += 1;
            if !suppliers.contains(&observation.supplier) {
                suppliers.push(observation.supplier.clone());
            }
        }
    }
    suppliers.sort();

    let networks: Vec<AggregatedNetwork> = groups
        .into_iter()
        .map(|(pcn_code, accum)| {
            let supplier_counts: IndexMap<SupplierName, u32> = suppliers
                .iter()
                .map(|name| (name.clone(), accum.counts.get(name).copied().unwrap_or(0)))
                .collect();
            AggregatedNetwork {
                pcn_code,
                region_code: accum.region_code,
                supplier_counts,
            }
        })
        .collect();

    let column_total = |name: &str| -> u32 { networks.iter().map(|n| n.count(name)).sum() };
    let total_supplier_a = column_total(&config.supplier_a);
    let total_supplier_b = column_total(&config.supplier_b);

    info!(
        networks = networks.len(),
        supplier_columns = suppliers.len(),
        total_supplier_a,
        total_supplier_b,
        "aggregated supplier counts"
    );
    AggregateOutput {
        networks,
        suppliers,
        total_supplier_a,
        total_supplier_b,
    }
}
