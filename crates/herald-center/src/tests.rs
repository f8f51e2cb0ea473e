//! Unit tests for the notification center, its policy and configuration.

use std::sync::{Arc, Mutex};

use herald_types::{Notification, ObserverId, Target};

use crate::center::NotificationCenter;
use crate::config::{load_config, CenterConfig, Config, LoggingConfig, MissingNamePolicy, SoakConfig};
use crate::error::CenterError;
use crate::soak::run_soak;
use crate::Dispatch;

type Center = NotificationCenter<String, String, u8>;

/// Records `(callback, registration scope, posted payload)`; clones share
/// the record.
#[derive(Clone, Default)]
struct Log {
    calls: Arc<Mutex<Vec<(u8, Option<String>, Option<String>)>>>,
}

impl Dispatch<String, String, u8> for Log {
    fn dispatch(&self, target: &Target<String, u8>, notification: Notification<'_, String, String>) {
        self.calls.lock().unwrap().push((
            target.callback,
            target.payload_key.clone(),
            notification.payload.cloned(),
        ));
    }
}

fn s(value: &str) -> String {
    value.to_string()
}

// ── Missing-name policy ──────────────────────────────────────────────

#[test]
fn ignore_policy_turns_missing_names_into_noops() {
    let center: Center = NotificationCenter::new(Log::default());
    let obs = ObserverId::new();

    assert_eq!(center.missing_name_policy(), MissingNamePolicy::Ignore);
    assert!(!center.add_observer(obs, 1, None, None).unwrap());
    assert!(center.is_empty());

    center.add_observer(obs, 1, Some(s("chirp")), None).unwrap();
    assert_eq!(center.remove_observer(obs, None, None).unwrap(), 0);
    assert_eq!(center.len(), 1);
}

#[test]
fn reject_policy_reports_missing_names() {
    let config = CenterConfig {
        missing_name: MissingNamePolicy::Reject,
    };
    let center: Center = NotificationCenter::with_config(Log::default(), &config);
    let obs = ObserverId::new();

    assert!(matches!(
        center.add_observer(obs, 1, None, None),
        Err(CenterError::MissingEventName)
    ));
    assert!(matches!(
        center.remove_observer(obs, None, None),
        Err(CenterError::MissingEventName)
    ));
    assert!(center.add_observer(obs, 1, Some(s("chirp")), None).unwrap());
}

#[test]
fn missing_name_policy_parses_case_insensitively() {
    assert_eq!("Reject".parse::<MissingNamePolicy>().unwrap(), MissingNamePolicy::Reject);
    assert_eq!(" ignore ".parse::<MissingNamePolicy>().unwrap(), MissingNamePolicy::Ignore);
    assert!("drop".parse::<MissingNamePolicy>().is_err());
}

// ── Posting ──────────────────────────────────────────────────────────

#[test]
fn post_hands_over_posted_payload_and_registration_scope() {
    let log = Log::default();
    let center: Center = NotificationCenter::new(log.clone());
    let obs = ObserverId::new();

    center.add_observer(obs, 3, Some(s("chirp")), Some(s("obj"))).unwrap();
    assert_eq!(center.post(&s("chirp"), Some(&s("sent"))), 1);

    let calls = log.calls.lock().unwrap();
    assert_eq!(calls.as_slice(), &[(3, Some(s("obj")), Some(s("sent")))]);
}

#[test]
fn clones_share_one_registry() {
    let log = Log::default();
    let center: Center = NotificationCenter::new(log.clone());
    let other = center.clone();
    let obs = ObserverId::new();

    other.add_observer(obs, 1, Some(s("chirp")), None).unwrap();
    assert_eq!(center.post(&s("chirp"), None), 1);

    center.remove_observer_entirely(obs);
    assert!(other.is_empty());
    other.check_consistency().expect("registry should be consistent");
}

// ── Configuration ────────────────────────────────────────────────────

#[test]
fn config_defaults() {
    let config = Config::default();
    assert_eq!(config.center.missing_name, MissingNamePolicy::Ignore);
    assert_eq!(config.soak.runs, 1000);
    assert_eq!(config.soak.observers, 10);
    assert_eq!(config.soak.callbacks, 3);
    assert!(config.soak.seed.is_none());
    assert_eq!(config.logging.level, "info");
    assert!(!config.logging.json);
}

#[test]
fn config_parses_partial_toml() {
    let config: Config = toml::from_str(
        r#"
        [center]
        missing_name = "reject"

        [soak]
        runs = 25
        seed = 42
        "#,
    )
    .expect("config should parse");

    assert_eq!(config.center.missing_name, MissingNamePolicy::Reject);
    assert_eq!(config.soak.runs, 25);
    assert_eq!(config.soak.seed, Some(42));
    assert_eq!(config.soak.events, 10);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn load_config_without_path_uses_defaults() {
    let config = load_config(None).expect("defaults should load");
    assert_eq!(config.soak.payloads, 10);
}

#[test]
fn init_tracing_twice_is_harmless() {
    let config = LoggingConfig {
        level: s("not a valid filter ["),
        json: false,
    };
    crate::logging::init_tracing(&config);
    crate::logging::init_tracing(&config);
}

// ── Soak ─────────────────────────────────────────────────────────────

#[test]
fn seeded_soak_run_completes_and_is_reproducible() {
    let config = SoakConfig {
        runs: 60,
        seed: Some(7),
        ..SoakConfig::default()
    };

    let first = run_soak(&config).expect("soak run should pass its audits");
    let second = run_soak(&config).expect("soak run should pass its audits");

    assert_eq!(first.seed, 7);
    assert_eq!(first.adds, second.adds);
    assert_eq!(first.sweeps, second.sweeps);
    assert_eq!(first.dispatches, second.dispatches);
    assert_eq!(first.final_state.registrations, second.final_state.registrations);
}
