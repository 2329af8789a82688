use crate::clock::Clock;
use std::collections::{BTreeSet, HashSet};
use std::sync::Arc;
use tokio::time::{sleep, Duration};
use vigia_alert::report;
use vigia_alert::throttle::{NotificationThrottle, ThrottleDecision};
use vigia_alert::window::ActiveWindow;
use vigia_common::net::GatewayOffset;
use vigia_common::types::ProbeVerdict;
use vigia_notify::{AlertMessage, Notifier};
use vigia_probe::prober::Prober;
use vigia_store::{EndpointFilter, EndpointSource};

/// What one cycle concluded, for logging and tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleOutcome {
    /// Distinct addresses probed.
    pub probed: usize,
    /// Rendered incident lines for this cycle.
    pub incidents: Vec<String>,
    pub decision: ThrottleDecision,
    /// Whether an email was handed to the notifier successfully.
    pub notified: bool,
}

/// The perpetual monitoring cycle: gate on the active window, probe every
/// gateway, aggregate failures, run the throttle, notify.
///
/// All collaborators are injected; nothing here touches globals. One
/// monitor owns one throttle; never run two monitors over the same
/// endpoint set.
pub struct Monitor {
    source: Arc<dyn EndpointSource>,
    prober: Prober,
    notifier: Arc<dyn Notifier>,
    clock: Arc<dyn Clock>,
    window: ActiveWindow,
    throttle: NotificationThrottle,
    offset: GatewayOffset,
    poll_interval: Duration,
    recipients: Vec<String>,
    notify_all_clear: bool,
}

impl Monitor {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Arc<dyn EndpointSource>,
        prober: Prober,
        notifier: Arc<dyn Notifier>,
        clock: Arc<dyn Clock>,
        window: ActiveWindow,
        throttle: NotificationThrottle,
        offset: GatewayOffset,
        poll_interval: Duration,
        recipients: Vec<String>,
        notify_all_clear: bool,
    ) -> Self {
        Self {
            source,
            prober,
            notifier,
            clock,
            window,
            throttle,
            offset,
            poll_interval,
            recipients,
            notify_all_clear,
        }
    }

    pub fn throttle(&self) -> &NotificationThrottle {
        &self.throttle
    }

    /// Runs until the process is terminated. A failing cycle is logged and
    /// retried after the normal interval; only shutdown stops the loop.
    pub async fn run(&mut self) {
        tracing::info!(
            poll_interval_secs = self.poll_interval.as_secs(),
            window_start = %self.window.start(),
            window_end = %self.window.end(),
            offset = %self.offset,
            "connectivity monitor started"
        );

        loop {
            let now = self.clock.now();
            if !self.window.is_permitted(now) {
                let wake = self.window.next_permitted_instant(now);
                tracing::info!(until = %wake, "outside the active window, sleeping");
                let pause = (wake - now).to_std().unwrap_or_default();
                sleep(pause).await;
                continue;
            }

            match self.run_cycle().await {
                Ok(outcome) => {
                    tracing::debug!(
                        probed = outcome.probed,
                        failing = outcome.incidents.len(),
                        notified = outcome.notified,
                        "cycle finished"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "monitoring cycle failed");
                }
            }

            sleep(self.poll_interval).await;
        }
    }

    /// One full probe → aggregate → throttle → notify pass.
    pub async fn run_cycle(&mut self) -> anyhow::Result<CycleOutcome> {
        let endpoints = self.source.list(&EndpointFilter::gateways())?;
        tracing::debug!(count = endpoints.len(), "probing endpoints");

        let mut seen = HashSet::new();
        let mut verdicts: Vec<ProbeVerdict> = Vec::new();
        for endpoint in &endpoints {
            // A duplicated row must not probe or alert twice.
            if !seen.insert(endpoint.address.clone()) {
                continue;
            }
            let probe_address = match self.offset.to_probe_address(&endpoint.address) {
                Ok(address) => address,
                Err(e) => {
                    tracing::warn!(address = %endpoint.address, error = %e, "skipping endpoint with malformed address");
                    continue;
                }
            };
            verdicts.push(self.prober.verdict(&probe_address).await);
        }

        let failing: BTreeSet<String> = verdicts
            .iter()
            .filter(|v| !v.reachable)
            .map(|v| v.address.clone())
            .collect();
        let incidents = report::aggregate(&failing, self.offset, self.source.as_ref())?;
        if !incidents.is_empty() {
            tracing::warn!(count = incidents.len(), "branches without connectivity");
        }

        let decision = self.throttle.observe(!incidents.is_empty());
        let notified = match decision {
            ThrottleDecision::Release => self.send_incident_report(&incidents).await,
            ThrottleDecision::AllClear if self.notify_all_clear => self.send_all_clear().await,
            _ => false,
        };

        Ok(CycleOutcome {
            probed: verdicts.len(),
            incidents,
            decision,
            notified,
        })
    }

    async fn send_incident_report(&self, incidents: &[String]) -> bool {
        self.dispatch(AlertMessage {
            subject: "Lojas sem conexão com a Matriz".to_string(),
            heading: "FILIAIS COM ERRO".to_string(),
            body_lines: incidents.to_vec(),
        })
        .await
    }

    async fn send_all_clear(&self) -> bool {
        self.dispatch(AlertMessage {
            subject: "Lojas com conexão na Matriz".to_string(),
            heading: "Nenhuma loja sem rede/sem VPN".to_string(),
            body_lines: Vec::new(),
        })
        .await
    }

    async fn dispatch(&self, message: AlertMessage) -> bool {
        match self.notifier.send(&message, &self.recipients).await {
            Ok(()) => {
                tracing::info!(subject = %message.subject, recipients = self.recipients.len(), "alert dispatched");
                true
            }
            Err(e) => {
                // The throttle already advanced; the alert counts as
                // attempted and is not retried this cycle.
                tracing::error!(error = %e, "alert delivery failed");
                false
            }
        }
    }
}
