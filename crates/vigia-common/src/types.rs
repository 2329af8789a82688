use serde::{Deserialize, Serialize};

/// One monitored branch gateway: the stored address plus the display
/// metadata rendered into incident reports.
///
/// Records come from the endpoint table owned by the ETL pipeline; the
/// monitor never mutates them. Addresses are expected unique within a
/// monitoring run, but duplicates must not produce duplicate alerts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    /// Dotted-quad address as stored (before any gateway offset).
    pub address: String,
    /// Branch display name (e.g., "Centro").
    pub branch_name: String,
    /// Numeric branch code, zero-padded to 6 digits in reports.
    pub branch_code: u32,
    /// Branch CNPJ, kept as the formatted string the table carries.
    pub tax_id: String,
}

/// Reachability conclusion for one address after repeated probes.
/// Produced fresh each cycle and discarded after aggregation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeVerdict {
    /// The address that was actually probed.
    pub address: String,
    pub reachable: bool,
}
