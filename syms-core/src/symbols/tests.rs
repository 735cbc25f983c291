use std::fs;
use std::path::Path;
use std::sync::Arc;

use syms_common::cache::CacheMarker;
use syms_common::config::Config;
use syms_common::model::{BuildParameters, DownloadPolicy, RefreshOutcome, TrustyTargets};

use super::SymbolCacheManager;
use crate::archive::ZipCodec;
use crate::testing::{zip_bytes, FakeDevice, FakeStore, FetchCall};

fn taimen() -> BuildParameters {
    BuildParameters::new("100", "taimen", "userdebug")
}

fn manager(store: &Arc<FakeStore>, device: &Arc<FakeDevice>) -> SymbolCacheManager {
    SymbolCacheManager::new(
        DownloadPolicy::Enabled,
        store.clone(),
        device.clone(),
        Arc::new(ZipCodec),
    )
}

fn symbols_zip() -> Vec<u8> {
    zip_bytes(&[
        ("system/lib/libc.so", b"libc".as_slice()),
        ("system/bin/app_process", b"zygote".as_slice()),
    ])
}

fn marker_params(dir: &Path) -> Option<BuildParameters> {
    CacheMarker::for_directory(dir).read()
}

#[test]
fn system_symbols_fetch_unpack_and_record() {
    let dir = tempfile::tempdir().unwrap();
    let symbols_dir = dir.path().join("symbols");
    let store = Arc::new(FakeStore::default().with_artifact(
        "taimen-userdebug",
        "taimen-symbols-100.zip",
        &symbols_zip(),
    ));
    let device = Arc::new(FakeDevice::first_party(taimen()));

    let outcome = manager(&store, &device)
        .refresh_system_symbols(&symbols_dir)
        .unwrap();

    assert_eq!(outcome, RefreshOutcome::Updated);
    assert_eq!(
        store.calls(),
        vec![FetchCall {
            build_id: "100".to_string(),
            target: "taimen-userdebug".to_string(),
            remote_file_name: "taimen-symbols-100.zip".to_string(),
            dest_name_override: None,
        }]
    );
    assert_eq!(fs::read(symbols_dir.join("system/lib/libc.so")).unwrap(), b"libc");
    assert!(!symbols_dir.join("taimen-symbols-100.zip").exists());
    assert_eq!(marker_params(&symbols_dir), Some(taimen()));
}

#[test]
fn system_symbols_second_call_hits_cache() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default().with_artifact(
        "taimen-userdebug",
        "taimen-symbols-100.zip",
        &symbols_zip(),
    ));
    let device = Arc::new(FakeDevice::first_party(taimen()));
    let manager = manager(&store, &device);

    assert_eq!(
        manager.refresh_system_symbols(dir.path()).unwrap(),
        RefreshOutcome::Updated
    );
    assert_eq!(
        manager.refresh_system_symbols(dir.path()).unwrap(),
        RefreshOutcome::AlreadyValid
    );
    assert_eq!(store.calls().len(), 1);
    assert!(dir.path().join("system/lib/libc.so").exists());
}

#[test]
fn disabled_policy_touches_nothing() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("keep.so"), b"old").unwrap();
    let store = Arc::new(FakeStore::default().with_artifact(
        "taimen-userdebug",
        "taimen-symbols-100.zip",
        &symbols_zip(),
    ));
    let device = Arc::new(FakeDevice::first_party(taimen()));
    let manager = SymbolCacheManager::new(
        DownloadPolicy::evaluate(true, true),
        store.clone(),
        device.clone(),
        Arc::new(ZipCodec),
    );

    let outcome = manager.refresh_system_symbols(dir.path()).unwrap();

    assert!(matches!(outcome, RefreshOutcome::Skipped(_)));
    assert!(store.calls().is_empty());
    assert_eq!(device.settings_queries(), 0);
    assert!(dir.path().join("keep.so").exists());
    assert_eq!(marker_params(dir.path()), None);
}

#[test]
fn sanitizer_is_appended_to_candidate_once() {
    let store = Arc::new(FakeStore::default());
    let device = Arc::new(FakeDevice::first_party(taimen()));
    let manager = manager(&store, &device).with_sanitizer(Some("hwasan".to_string()));

    assert_eq!(
        manager.system_symbols_candidate("taimen", "userdebug"),
        "taimen-userdebug_hwasan"
    );
    assert_eq!(
        manager.system_symbols_candidate("taimen_hwasan", "userdebug"),
        "taimen_hwasan-userdebug"
    );
}

#[test]
fn release_configuration_prefixes_build_type_but_not_marker() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default().with_artifact(
        "taimen-trunk_staging-userdebug",
        "taimen-symbols-100.zip",
        &symbols_zip(),
    ));
    let device = Arc::new(FakeDevice::first_party(taimen()));
    let manager =
        manager(&store, &device).with_release_configuration(Some("trunk_staging".to_string()));

    let outcome = manager.refresh_system_symbols(dir.path()).unwrap();

    assert_eq!(outcome, RefreshOutcome::Updated);
    assert_eq!(store.requested_targets(), vec!["taimen-trunk_staging-userdebug"]);
    assert_eq!(marker_params(dir.path()), Some(taimen()));
}

#[test]
fn missing_archive_does_not_advance_marker() {
    let dir = tempfile::tempdir().unwrap();
    let old = BuildParameters::new("99", "taimen", "userdebug");
    CacheMarker::for_directory(dir.path()).write(&old).unwrap();
    let store = Arc::new(FakeStore::default());
    let device = Arc::new(FakeDevice::first_party(taimen()));

    let outcome = manager(&store, &device)
        .refresh_system_symbols(dir.path())
        .unwrap();

    assert!(matches!(outcome, RefreshOutcome::FetchMissing(_)));
    assert_eq!(store.calls().len(), 1);
    assert!(!CacheMarker::for_directory(dir.path()).matches(&taimen()));
}

#[test]
fn valid_marker_survives_an_unreachable_store() {
    let dir = tempfile::tempdir().unwrap();
    CacheMarker::for_directory(dir.path()).write(&taimen()).unwrap();
    let store = Arc::new(FakeStore::default().failing_on("taimen-userdebug"));
    let device = Arc::new(FakeDevice::first_party(taimen()));

    let outcome = manager(&store, &device)
        .refresh_system_symbols(dir.path())
        .unwrap();

    assert_eq!(outcome, RefreshOutcome::AlreadyValid);
    assert!(store.calls().is_empty());
    assert!(CacheMarker::for_directory(dir.path()).matches(&taimen()));
}

#[test]
fn unknown_build_parameters_abort_without_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default());
    let device = Arc::new(FakeDevice {
        first_party: true,
        ..FakeDevice::default()
    });

    let outcome = manager(&store, &device)
        .refresh_system_symbols(dir.path())
        .unwrap();

    assert!(matches!(outcome, RefreshOutcome::ParametersUnavailable(_)));
    assert!(store.calls().is_empty());
}

#[test]
fn incomplete_build_parameters_abort_without_fetch() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default());
    let device = Arc::new(FakeDevice::first_party(BuildParameters::new(
        "100", "taimen", "",
    )));

    let outcome = manager(&store, &device)
        .refresh_system_symbols(dir.path())
        .unwrap();

    assert!(matches!(outcome, RefreshOutcome::ParametersUnavailable(_)));
    assert!(store.calls().is_empty());
}

#[test]
fn store_failure_is_propagated() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default().failing_on("taimen-userdebug"));
    let device = Arc::new(FakeDevice::first_party(taimen()));

    let result = manager(&store, &device).refresh_system_symbols(dir.path());

    assert!(result.is_err());
    assert_eq!(marker_params(dir.path()), None);
}

#[test]
fn repo_properties_fetched_once_for_identical_inputs() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default().with_artifact("kernel", "repo.prop", b"props"));
    let device = Arc::new(FakeDevice::default());
    let manager = manager(&store, &device);
    let candidates = vec!["kernel".to_string()];

    let first = manager
        .refresh_repo_properties(dir.path(), "555", "blueline", &candidates, "kernel")
        .unwrap();
    let second = manager
        .refresh_repo_properties(dir.path(), "555", "blueline", &candidates, "kernel")
        .unwrap();

    assert_eq!(first, RefreshOutcome::Updated);
    assert_eq!(second, RefreshOutcome::AlreadyValid);
    assert_eq!(store.calls().len(), 1);
    assert_eq!(
        fs::read(dir.path().join("blueline-555-repo.prop")).unwrap(),
        b"props"
    );
}

#[test]
fn repo_properties_miss_writes_no_marker() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default());
    let device = Arc::new(FakeDevice::default());

    let outcome = manager(&store, &device)
        .refresh_repo_properties(
            dir.path(),
            "555",
            "blueline",
            &["kernel".to_string(), "kernel_blueline".to_string()],
            "kernel",
        )
        .unwrap();

    assert!(matches!(outcome, RefreshOutcome::FetchMissing(_)));
    assert_eq!(store.requested_targets(), vec!["kernel", "kernel_blueline"]);
    assert_eq!(marker_params(dir.path()), None);
}

#[test]
fn kernel_repo_properties_try_plain_then_target_names() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default().with_artifact(
        "kernel_blueline",
        "repo.prop",
        b"props",
    ));
    let device = Arc::new(FakeDevice::default().with_kernel("555", "blueline"));

    let outcome = manager(&store, &device)
        .refresh_kernel_repo_properties(dir.path())
        .unwrap();

    assert_eq!(outcome, RefreshOutcome::Updated);
    let calls = store.calls();
    assert_eq!(store.requested_targets(), vec!["kernel", "kernel_blueline"]);
    assert!(calls.iter().all(|c| c.remote_file_name == "repo.prop"
        && c.dest_name_override.as_deref() == Some("blueline-555-repo.prop")));
    assert_eq!(
        marker_params(dir.path()),
        Some(BuildParameters::kernel("555", "blueline"))
    );
}

#[test]
fn kernel_repo_properties_with_sanitizer() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default());
    let device = Arc::new(FakeDevice::default().with_kernel("555", "blueline"));
    let manager = manager(&store, &device).with_sanitizer(Some("kasan".to_string()));

    manager.refresh_kernel_repo_properties(dir.path()).unwrap();

    assert_eq!(
        store.requested_targets(),
        vec!["kernel_kasan", "kernel_kasan_blueline"]
    );
}

#[test]
fn kernel_repo_properties_need_kernel_identity() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default());
    let device = Arc::new(FakeDevice {
        kernel_name: Some("blueline".to_string()),
        ..FakeDevice::default()
    });

    let outcome = manager(&store, &device)
        .refresh_kernel_repo_properties(dir.path())
        .unwrap();

    assert!(matches!(outcome, RefreshOutcome::ParametersUnavailable(_)));
    assert!(store.calls().is_empty());
}

#[test]
fn kernel_repo_properties_respect_policy() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default());
    let device = Arc::new(FakeDevice::default().with_kernel("555", "blueline"));
    let manager = SymbolCacheManager::new(
        DownloadPolicy::evaluate(false, false),
        store.clone(),
        device.clone(),
        Arc::new(ZipCodec),
    );

    let outcome = manager.refresh_kernel_repo_properties(dir.path()).unwrap();

    assert!(matches!(outcome, RefreshOutcome::Skipped(_)));
    assert!(store.calls().is_empty());
}

fn trusty_zip() -> Vec<u8> {
    zip_bytes(&[
        ("out/build-slider/keymaster.syms.elf", b"km".as_slice()),
        ("lk.elf", b"lk".as_slice()),
        ("out/build-slider/lk.elf", b"nested".as_slice()),
        ("out/build-slider/gatekeeper.syms.elf", b"gk".as_slice()),
    ])
}

#[test]
fn trusty_symbols_extract_app_and_lk() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default().with_artifact(
        "slider-fuzz-test-debug",
        "slider-fuzz-test-debug-42.syms.zip",
        &trusty_zip(),
    ));
    let device = Arc::new(FakeDevice::first_party(BuildParameters::new(
        "1", "oriole", "userdebug",
    )));
    let manager = manager(&store, &device);

    let outcome = manager
        .refresh_trusty_symbols(dir.path(), "keymaster", Some("42"))
        .unwrap();

    assert_eq!(outcome, RefreshOutcome::Updated);
    assert_eq!(fs::read(dir.path().join("keymaster.syms.elf")).unwrap(), b"km");
    assert_eq!(fs::read(dir.path().join("lk.elf")).unwrap(), b"lk");
    assert!(!dir.path().join("gatekeeper.syms.elf").exists());
    assert!(store.latest_calls().is_empty());
    assert_eq!(marker_params(dir.path()), None);

    manager
        .refresh_trusty_symbols(dir.path(), "keymaster", Some("42"))
        .unwrap();
    assert_eq!(store.calls().len(), 2);
}

#[test]
fn trusty_symbols_default_to_latest_build() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        FakeStore::default()
            .with_latest_build("77")
            .with_artifact(
                "cloudripper-fuzz-test-debug",
                "cloudripper-fuzz-test-debug-77.syms.zip",
                &trusty_zip(),
            ),
    );
    let device = Arc::new(FakeDevice::first_party(BuildParameters::new(
        "1", "panther", "userdebug",
    )));

    let outcome = manager(&store, &device)
        .refresh_trusty_symbols(dir.path(), "keymaster", None)
        .unwrap();

    assert_eq!(outcome, RefreshOutcome::Updated);
    assert_eq!(
        store.latest_calls(),
        vec![(
            "polygon-trusty-whitechapel-master".to_string(),
            "cloudripper-fuzz-test-debug".to_string()
        )]
    );
    assert_eq!(store.calls()[0].build_id, "77");
}

#[test]
fn trusty_symbols_for_unmapped_device_miss() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default());
    let device = Arc::new(FakeDevice::first_party(taimen()));

    let outcome = manager(&store, &device)
        .refresh_trusty_symbols(dir.path(), "keymaster", Some("42"))
        .unwrap();

    assert!(matches!(outcome, RefreshOutcome::FetchMissing(_)));
    assert_eq!(store.requested_targets(), vec![""]);
}

#[test]
fn trusty_table_is_configurable() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(FakeStore::default().with_artifact(
        "zuma-fuzz-test-debug",
        "zuma-fuzz-test-debug-5.syms.zip",
        &trusty_zip(),
    ));
    let device = Arc::new(FakeDevice::first_party(BuildParameters::new(
        "1", "husky", "userdebug",
    )));
    let manager = manager(&store, &device).with_trusty_targets(
        TrustyTargets::new("trusty-main").with_device("husky", "zuma-fuzz-test-debug"),
    );

    let outcome = manager
        .refresh_trusty_symbols(dir.path(), "gatekeeper", Some("5"))
        .unwrap();

    assert_eq!(outcome, RefreshOutcome::Updated);
    assert_eq!(fs::read(dir.path().join("gatekeeper.syms.elf")).unwrap(), b"gk");
}

#[test]
fn system_refresh_leaves_configured_kernel_cache_valid() {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().to_path_buf();
    let config = Config::from_lookup(|key| match key {
        "SYMBOLS_DIR" => Some(root.join("symbols").to_string_lossy().into_owned()),
        _ => None,
    })
    .unwrap();
    let store = Arc::new(
        FakeStore::default()
            .with_artifact("kernel", "repo.prop", b"props")
            .with_artifact("taimen-userdebug", "taimen-symbols-100.zip", &symbols_zip()),
    );
    let device = Arc::new(FakeDevice::first_party(taimen()).with_kernel("555", "taimen"));
    let manager = manager(&store, &device);

    assert_eq!(
        manager
            .refresh_kernel_repo_properties(config.kernel_symbols_dir())
            .unwrap(),
        RefreshOutcome::Updated
    );
    assert_eq!(
        manager.refresh_system_symbols(config.symbols_dir()).unwrap(),
        RefreshOutcome::Updated
    );
    assert_eq!(
        manager
            .refresh_kernel_repo_properties(config.kernel_symbols_dir())
            .unwrap(),
        RefreshOutcome::AlreadyValid
    );
    assert_eq!(
        store
            .calls()
            .iter()
            .filter(|c| c.remote_file_name == "repo.prop")
            .count(),
        1
    );
}
