//! End-to-end tests for selection reconciliation through the controller.
//!
//! These tests verify:
//! 1. Growth and shrink paths as seen by a host screen
//! 2. Resolution of persisted ids through the cache
//! 3. Host notification on every select
//! 4. Option/selection disjointness under arbitrary host activity

mod helpers;

use helpers::{applications, ids, init_tracing, Application, Recorder};
use select_core::{ReconcileStrategy, Selector};
use select_search::{
    ControllerState, MemorySource, SearchSelect, SearchSelectConfig,
};

fn controller(
    config: SearchSelectConfig,
) -> (SearchSelect<Application, MemorySource<Application>>, Recorder<Application>) {
    init_tracing();
    let recorder = Recorder::new();
    let source = MemorySource::new(applications()).with_init(true);
    let controller = SearchSelect::new(source, recorder.clone(), config).unwrap();
    (controller, recorder)
}

// ============================================================================
// Controller Flow Tests
// ============================================================================

#[tokio::test]
async fn test_group_member_selection_flow() {
    let (mut controller, recorder) = controller(SearchSelectConfig::new("Applications"));
    controller.init().await.unwrap();
    assert_eq!(controller.state(), ControllerState::Ready);
    assert_eq!(controller.placeholder(), "Search applications");

    // Capital letters sort before lowercase.
    assert_eq!(
        ids(&controller.options()),
        vec!["app-3", "app-1", "app-2", "app-4"]
    );

    // User picks "Web", the host appends the id to its model.
    controller.set_select_model(["app-2"]);
    let outcome = controller.select().await.unwrap();
    assert!(!outcome.rerun_search);
    assert!(controller.has_selection());
    assert_eq!(ids(&controller.options()), vec!["app-3", "app-1", "app-4"]);

    // A search that matches the selected item does not offer it again.
    controller.search("e").await.unwrap();
    assert_eq!(ids(&controller.options()), vec!["app-1"]);

    // Removing it restores it and the current search runs again.
    controller.set_select_model(Vec::<String>::new());
    let outcome = controller.select().await.unwrap();
    assert!(outcome.rerun_search);
    assert_eq!(outcome.removed, vec!["app-2".to_string()]);
    assert_eq!(ids(&controller.options()), vec!["app-1", "app-2"]);
    assert!(!controller.has_selection());

    assert_eq!(recorder.count(), 3);
    assert!(recorder.errors.lock().is_empty());
}

#[tokio::test]
async fn test_host_receives_full_entities() {
    let (controller, recorder) = controller(SearchSelectConfig::default());
    let mut controller = controller.with_select_model(["app-1"]);
    controller.init().await.unwrap();

    let event = recorder.last().unwrap();
    assert_eq!(event.selection.len(), 1);
    assert_eq!(event.selection[0].owner.as_deref(), Some("alice"));
    assert_eq!(event.selection, controller.selection());
}

#[tokio::test]
async fn test_unknown_persisted_id_is_ignored() {
    let (controller, recorder) = controller(SearchSelectConfig::default());
    let mut controller = controller.with_select_model(["deleted-app"]);

    controller.init().await.unwrap();

    assert!(controller.selection().is_empty());
    assert!(recorder.last().unwrap().selection.is_empty());
    assert_eq!(controller.options().len(), 4);
}

#[tokio::test]
async fn test_reselecting_same_ids_still_reruns_search() {
    let (mut controller, recorder) = controller(SearchSelectConfig::default());
    controller.init().await.unwrap();
    controller.set_select_model(["app-1"]);
    controller.select().await.unwrap();
    let issued = controller.search_count();

    let outcome = controller.select().await.unwrap();

    assert!(outcome.rerun_search);
    assert!(!outcome.changed());
    assert_eq!(controller.search_count(), issued + 1);
    assert_eq!(ids(&controller.selection()), vec!["app-1"]);
    assert_eq!(recorder.count(), 3);
}

#[tokio::test]
async fn test_every_select_matches_selector_state() {
    let (mut controller, recorder) = controller(
        SearchSelectConfig::default().with_strategy(ReconcileStrategy::ExplicitDiff),
    );
    controller.init().await.unwrap();

    for model in [
        vec!["app-1"],
        vec!["app-1", "app-3"],
        vec!["app-3", "app-4"],
        vec![],
        vec!["app-2"],
    ] {
        controller.set_select_model(model.iter().copied());
        controller.select().await.unwrap();

        let event = recorder.last().unwrap();
        assert_eq!(event.selection, controller.selection());
        let mut expected = model.clone();
        expected.sort_unstable();
        let mut got = ids(&event.selection);
        got.sort_unstable();
        assert_eq!(got, expected);
    }
}

// ============================================================================
// Property Tests
// ============================================================================

mod properties {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    enum HostAction {
        Search(String),
        Select(Vec<String>),
    }

    fn arb_action() -> impl Strategy<Value = HostAction> {
        prop_oneof![
            "[a-z]{0,2}".prop_map(HostAction::Search),
            proptest::collection::vec("app-[1-5]", 0..4).prop_map(HostAction::Select),
        ]
    }

    proptest! {
        #[test]
        fn prop_controller_views_disjoint(
            explicit in any::<bool>(),
            actions in proptest::collection::vec(arb_action(), 0..20),
        ) {
            let strategy = if explicit {
                ReconcileStrategy::ExplicitDiff
            } else {
                ReconcileStrategy::Cardinality
            };
            let runtime = tokio::runtime::Builder::new_current_thread().build().unwrap();
            let (mut controller, recorder) =
                controller(SearchSelectConfig::default().with_strategy(strategy));

            runtime.block_on(async {
                controller.init().await.unwrap();
                for action in actions {
                    match action {
                        HostAction::Search(term) => controller.search(term).await.unwrap(),
                        HostAction::Select(model) => {
                            controller.set_select_model(model);
                            controller.select().await.unwrap();
                        }
                    }
                    let selection = controller.selection();
                    for option in controller.options() {
                        assert!(!selection.iter().any(|s| s.id == option.id));
                    }
                }
            });

            let last = recorder.last().unwrap();
            prop_assert_eq!(last.selection, controller.selection());
        }

        #[test]
        fn prop_seen_ids_resolve_on_growth(
            pick in proptest::sample::subsequence(vec!["app-1", "app-2", "app-3", "app-4"], 1..4),
        ) {
            let mut selector = Selector::new();
            selector.update_options(applications());
            selector.update_options(Vec::new());

            let outcome = selector.reconcile(&pick);

            prop_assert_eq!(outcome.selection.len(), pick.len());
            for app in &outcome.selection {
                prop_assert_eq!(Some(app), selector.resolve(&app.id));
            }
        }
    }
}
