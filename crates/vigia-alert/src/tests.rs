use crate::report::{aggregate, render_incident};
use crate::throttle::{NotificationThrottle, ResetPolicy, ThrottleDecision};
use crate::window::{ActiveWindow, WindowError};
use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use std::collections::BTreeSet;
use vigia_common::net::GatewayOffset;
use vigia_common::types::Endpoint;
use vigia_store::error::{Result, StoreError};
use vigia_store::{EndpointFilter, EndpointSource};

fn window() -> ActiveWindow {
    ActiveWindow::new(
        NaiveTime::from_hms_opt(9, 30, 0).unwrap(),
        NaiveTime::from_hms_opt(21, 55, 0).unwrap(),
    )
    .unwrap()
}

fn at(hour: u32, minute: u32) -> chrono::DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 10, 15, hour, minute, 0).unwrap()
}

// ── window ──

#[test]
fn window_permits_inside_the_interval() {
    assert!(window().is_permitted(at(10, 0)));
    assert!(window().is_permitted(at(15, 30)));
}

#[test]
fn window_denies_outside_the_interval() {
    assert!(!window().is_permitted(at(8, 0)));
    assert!(!window().is_permitted(at(22, 0)));
}

#[test]
fn window_boundaries_are_permitted() {
    assert!(window().is_permitted(at(9, 30)));
    assert!(window().is_permitted(at(21, 55)));
}

#[test]
fn next_instant_before_start_is_todays_start() {
    let next = window().next_permitted_instant(at(8, 0));
    assert_eq!(next, at(9, 30));
}

#[test]
fn next_instant_after_end_is_tomorrows_start() {
    let next = window().next_permitted_instant(at(22, 0));
    let tomorrow = NaiveDate::from_ymd_opt(2024, 10, 16)
        .unwrap()
        .and_hms_opt(9, 30, 0)
        .unwrap()
        .and_utc();
    assert_eq!(next, tomorrow);
}

#[test]
fn next_instant_is_never_in_the_past_and_always_permitted() {
    let w = window();
    for (h, m) in [(0, 0), (9, 29), (9, 30), (12, 0), (21, 55), (23, 59)] {
        let now = at(h, m);
        let next = w.next_permitted_instant(now);
        assert!(next >= now, "{h:02}:{m:02}");
        assert!(w.is_permitted(next), "{h:02}:{m:02}");
    }
}

#[test]
fn window_rejects_end_before_start() {
    let err = ActiveWindow::new(
        NaiveTime::from_hms_opt(21, 0, 0).unwrap(),
        NaiveTime::from_hms_opt(9, 0, 0).unwrap(),
    )
    .unwrap_err();
    assert!(matches!(err, WindowError::EndBeforeStart { .. }));
}

// ── throttle ──

#[test]
fn throttle_releases_on_the_25th_failing_cycle_only() {
    let mut throttle = NotificationThrottle::new(25, ResetPolicy::ClearCycle);
    for cycle in 1..=24 {
        assert_eq!(
            throttle.observe(true),
            ThrottleDecision::Suppress,
            "cycle {cycle} must not release"
        );
    }
    assert_eq!(throttle.consecutive_cycles(), 24);
    assert_eq!(throttle.observe(true), ThrottleDecision::Release);
    assert_eq!(throttle.consecutive_cycles(), 0);
}

#[test]
fn throttle_clear_cycle_resets_the_counter() {
    let mut throttle = NotificationThrottle::new(25, ResetPolicy::ClearCycle);
    for _ in 0..10 {
        throttle.observe(true);
    }
    assert_eq!(throttle.consecutive_cycles(), 10);
    throttle.observe(false);
    assert_eq!(throttle.consecutive_cycles(), 0);
}

#[test]
fn throttle_release_only_keeps_the_counter_across_clean_cycles() {
    let mut throttle = NotificationThrottle::new(25, ResetPolicy::ReleaseOnly);
    for _ in 0..10 {
        throttle.observe(true);
    }
    throttle.observe(false);
    assert_eq!(throttle.consecutive_cycles(), 10);
}

#[test]
fn throttle_signals_all_clear_once_on_recovery() {
    let mut throttle = NotificationThrottle::new(25, ResetPolicy::ClearCycle);
    throttle.observe(true);
    assert_eq!(throttle.observe(false), ThrottleDecision::AllClear);
    // Staying clear is silent.
    assert_eq!(throttle.observe(false), ThrottleDecision::Suppress);
}

#[test]
fn throttle_quiet_cycles_never_signal() {
    let mut throttle = NotificationThrottle::new(25, ResetPolicy::ClearCycle);
    for _ in 0..5 {
        assert_eq!(throttle.observe(false), ThrottleDecision::Suppress);
    }
}

#[test]
fn throttle_resume_at_continues_the_count() {
    let mut throttle = NotificationThrottle::resume_at(25, ResetPolicy::ClearCycle, 24);
    assert_eq!(throttle.observe(true), ThrottleDecision::Release);
    assert_eq!(throttle.consecutive_cycles(), 0);
}

// ── report ──

struct FixedLookup {
    endpoints: Vec<Endpoint>,
}

impl EndpointSource for FixedLookup {
    fn list(&self, _filter: &EndpointFilter) -> Result<Vec<Endpoint>> {
        Ok(self.endpoints.clone())
    }

    fn find_by_address(&self, address: &str) -> Result<Vec<Endpoint>> {
        Ok(self
            .endpoints
            .iter()
            .filter(|e| e.address == address)
            .cloned()
            .collect())
    }
}

struct BrokenLookup;

impl EndpointSource for BrokenLookup {
    fn list(&self, _filter: &EndpointFilter) -> Result<Vec<Endpoint>> {
        Err(StoreError::Unavailable("database file missing".into()))
    }

    fn find_by_address(&self, _address: &str) -> Result<Vec<Endpoint>> {
        Err(StoreError::Unavailable("database file missing".into()))
    }
}

fn centro() -> Endpoint {
    Endpoint {
        address: "10.0.0.5".into(),
        branch_name: "Centro".into(),
        branch_code: 7,
        tax_id: "12.345.678/0001-90".into(),
    }
}

#[test]
fn incident_line_matches_the_fixed_template() {
    assert_eq!(
        render_incident(&centro()),
        "Filial - Centro - (000007) do CNPJ: 12.345.678/0001-90, IP pingado: 10.0.0.5, favor verificar VPN/Internet"
    );
}

#[test]
fn aggregate_resolves_and_renders_one_line() {
    let lookup = FixedLookup {
        endpoints: vec![centro()],
    };
    let failing: BTreeSet<String> = ["10.0.0.5".to_string()].into();
    let lines = aggregate(&failing, GatewayOffset::Identity, &lookup).unwrap();
    assert_eq!(
        lines,
        vec![
            "Filial - Centro - (000007) do CNPJ: 12.345.678/0001-90, IP pingado: 10.0.0.5, favor verificar VPN/Internet"
                .to_string()
        ]
    );
}

#[test]
fn aggregate_inverse_transforms_the_probe_address() {
    let lookup = FixedLookup {
        endpoints: vec![centro()],
    };
    // Probed 10.0.0.6 under plus-one; the stored record is 10.0.0.5.
    let failing: BTreeSet<String> = ["10.0.0.6".to_string()].into();
    let lines = aggregate(&failing, GatewayOffset::PlusOne, &lookup).unwrap();
    assert_eq!(lines.len(), 1);
    assert!(lines[0].contains("IP pingado: 10.0.0.5"));
}

#[test]
fn aggregate_skips_unknown_addresses_silently() {
    let lookup = FixedLookup {
        endpoints: vec![centro()],
    };
    let failing: BTreeSet<String> = ["10.9.9.9".to_string()].into();
    let lines = aggregate(&failing, GatewayOffset::Identity, &lookup).unwrap();
    assert!(lines.is_empty());
}

#[test]
fn aggregate_emits_one_line_per_matching_record() {
    let mut anexo = centro();
    anexo.branch_name = "Centro Anexo".into();
    anexo.branch_code = 8;
    let lookup = FixedLookup {
        endpoints: vec![centro(), anexo],
    };
    let failing: BTreeSet<String> = ["10.0.0.5".to_string()].into();
    let lines = aggregate(&failing, GatewayOffset::Identity, &lookup).unwrap();
    assert_eq!(lines.len(), 2);
}

#[test]
fn aggregate_propagates_lookup_failure() {
    let failing: BTreeSet<String> = ["10.0.0.5".to_string()].into();
    assert!(aggregate(&failing, GatewayOffset::Identity, &BrokenLookup).is_err());
}
