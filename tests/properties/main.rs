use proptest::prelude::*;

use skilllink::filter::{ALL_VALUE, Facet, FilterAction, FilterState, SkillLevel, reduce};
use skilllink::query::QueryBuilder;

fn facet() -> impl Strategy<Value = Facet> {
    prop_oneof![
        Just(Facet::Institute),
        Just(Facet::Branch),
        Just(Facet::Year)
    ]
}

fn facet_value() -> impl Strategy<Value = String> {
    prop_oneof![
        Just(ALL_VALUE.to_string()),
        "[A-D]",
        "[a-z ]{1,8}",
    ]
}

fn action() -> impl Strategy<Value = FilterAction> {
    prop_oneof![
        4 => (facet(), facet_value(), any::<bool>()).prop_map(|(facet, value, checked)| {
            FilterAction::Toggle { facet, value, checked }
        }),
        1 => "[a-z]{0,6}".prop_map(FilterAction::SetTerm),
        2 => ("[A-Z][a-z+#]{0,5}", 1u8..=5).prop_map(|(name, level)| FilterAction::SetSkill {
            name,
            level: SkillLevel::new(level).unwrap(),
        }),
        1 => "[A-Z][a-z+#]{0,5}".prop_map(FilterAction::RemoveSkill),
        1 => Just(FilterAction::Clear),
    ]
}

proptest! {
    #[test]
    fn test_facet_is_all_or_nonempty_distinct(actions in prop::collection::vec(action(), 0..40)) {
        let state = actions.into_iter().fold(FilterState::new(), reduce);
        for facet in Facet::ALL {
            let selection = state.facet(facet);
            let values = selection.values();
            prop_assert_eq!(selection.is_all(), values.is_empty());
            prop_assert!(!values.iter().any(|value| value == ALL_VALUE));
            for (i, value) in values.iter().enumerate() {
                prop_assert!(!values[i + 1..].contains(value));
            }
        }
    }

    #[test]
    fn test_query_build_deterministic(
        actions in prop::collection::vec(action(), 0..30),
        exclude in proptest::option::of("[0-9]{1,3}"),
    ) {
        let state = actions.into_iter().fold(FilterState::new(), reduce);
        let first = QueryBuilder::from_state(&state, exclude.as_deref());
        let second = QueryBuilder::from_state(&state.clone(), exclude.as_deref());
        prop_assert_eq!(first.to_query_string(), second.to_query_string());

        let params = first.params();
        prop_assert_eq!(params[0].0.as_str(), "q");
        prop_assert_eq!(first.contains("exclude_id"), exclude.is_some());
        prop_assert_eq!(first.contains("skills"), !state.skills.is_empty());
        for facet in Facet::ALL {
            let sent = first.get_all(facet.param_name());
            let selected: Vec<&str> = state.facet(facet).values().iter().map(String::as_str).collect();
            prop_assert_eq!(sent, selected);
        }
    }

    #[test]
    fn test_clear_resets_everything(actions in prop::collection::vec(action(), 0..30)) {
        let state = actions.into_iter().fold(FilterState::new(), reduce);
        let cleared = reduce(state, FilterAction::Clear);
        prop_assert!(cleared.is_default());
        prop_assert_eq!(
            QueryBuilder::from_state(&cleared, None).to_query_string(),
            QueryBuilder::from_state(&FilterState::new(), None).to_query_string()
        );
    }

    #[test]
    fn test_skill_levels_outside_range_rejected(level in 6u8..) {
        prop_assert!(SkillLevel::new(level).is_err());
        prop_assert!(SkillLevel::new(0).is_err());
    }
}
