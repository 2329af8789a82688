use std::collections::BTreeSet;
use vigia_common::net::GatewayOffset;
use vigia_common::types::Endpoint;
use vigia_store::error::Result;
use vigia_store::EndpointSource;

/// Renders the incident line for one endpoint. The template is fixed: the
/// operations team greps their mailbox for it.
pub fn render_incident(endpoint: &Endpoint) -> String {
    format!(
        "Filial - {} - ({:06}) do CNPJ: {}, IP pingado: {}, favor verificar VPN/Internet",
        endpoint.branch_name, endpoint.branch_code, endpoint.tax_id, endpoint.address
    )
}

/// Resolves failing probe addresses back to endpoint metadata and renders
/// one incident line per matching record.
///
/// Addresses arrive deduplicated (the set) so a duplicated endpoint row
/// cannot alert twice; an address with no matching record is a stale
/// entry and is skipped silently, while one matching several records gets
/// a line per match. Lookup failures abort the batch so the caller can
/// skip the cycle.
pub fn aggregate(
    failing: &BTreeSet<String>,
    offset: GatewayOffset,
    source: &dyn EndpointSource,
) -> Result<Vec<String>> {
    let mut lines = Vec::new();
    for probe_address in failing {
        let stored = match offset.to_stored_address(probe_address) {
            Ok(stored) => stored,
            Err(e) => {
                tracing::warn!(address = %probe_address, error = %e, "failing address does not map back to a stored address, skipping");
                continue;
            }
        };
        let matches = source.find_by_address(&stored)?;
        if matches.is_empty() {
            tracing::debug!(address = %stored, "no endpoint metadata for failing address");
            continue;
        }
        for endpoint in matches {
            lines.push(render_incident(&endpoint));
        }
    }
    Ok(lines)
}
