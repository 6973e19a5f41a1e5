//! Integration tests for the scaffolding engine
//!
//! Covers the round lifecycle, template rotation and map-driven type and
//! intensity selection.

use std::sync::Arc;

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde_json::json;

use concept_map_scaffolding::analyzer::{ComplexityBucket, ConceptMap, ConceptMapAnalyzer};
use concept_map_scaffolding::classifier::ResponseType;
use concept_map_scaffolding::engine::{
    ConversationState, RoundPhase, RoundRequest, RoundStatus, ScaffoldingEngine, MAX_TURNS,
};
use concept_map_scaffolding::events::{EventKind, MemorySink};
use concept_map_scaffolding::prompts;
use concept_map_scaffolding::templates::{render_closing, TemplateSelector};
use concept_map_scaffolding::types::{Intensity, ScaffoldingType};

/// Map with `nodes` concepts chained by `edges` relationships.
fn chain_map(nodes: usize, edges: usize) -> ConceptMap {
    let concepts: Vec<String> = (0..nodes).map(|i| format!("concept {}", i)).collect();
    let relationships: Vec<serde_json::Value> = (0..edges)
        .map(|i| {
            json!({
                "source": format!("concept {}", i % nodes),
                "target": format!("concept {}", (i + 1) % nodes),
                "label": "relates to"
            })
        })
        .collect();
    ConceptMap::from_value(&json!({ "concepts": concepts, "relationships": relationships }))
}

fn amg_map() -> ConceptMap {
    ConceptMap::from_value(&json!({
        "concepts": [
            {"id": "c1", "label": "AMG"},
            {"id": "c2", "label": "Market Entry"}
        ],
        "relationships": [
            {"id": "r1", "source": "c1", "target": "c2", "label": "restricts"}
        ]
    }))
}

mod lifecycle {
    use super::*;

    #[test]
    fn test_round_lifecycle_scenario() {
        let sink = Arc::new(MemorySink::new());
        let engine = ScaffoldingEngine::new().with_sink(sink.clone());
        let mut rng = StdRng::seed_from_u64(2024);

        let started = engine
            .start_round(RoundRequest::new(1, amg_map()).with_type("conceptual"))
            .unwrap();
        assert_eq!(started.metrics.node_count, 2);
        assert_eq!(started.metrics.edge_count, 1);
        let mut state = started.state;
        assert_eq!(state.phase, RoundPhase::RoundActive);
        assert_eq!(state.turn, 0);

        let first = engine.process_learner_response(&mut state, "asdf", &mut rng);
        assert_eq!(first.response_type, Some(ResponseType::Gibberish));
        assert!(first.follow_up.is_some());
        assert_eq!(state.turn, 1);
        assert_eq!(state.used_template_indices.len(), 1);

        let second = engine.process_learner_response(
            &mut state,
            "I think AMG blocks entry via regulatory barriers",
            &mut rng,
        );
        assert_eq!(second.response_type, Some(ResponseType::ConcreteIdea));
        let follow_up = second.follow_up.unwrap();
        assert!(follow_up.contains("AMG"));
        assert!(follow_up.contains("barriers"));
        assert_eq!(state.turn, 2);
        assert_eq!(second.status, RoundStatus::Active);

        let third = engine.process_learner_response(&mut state, "I'm done", &mut rng);
        assert_eq!(third.response_type, Some(ResponseType::PrematureEnding));
        assert_eq!(third.status, RoundStatus::Concluded);
        assert_eq!(state.phase, RoundPhase::Concluded);
        assert!(!third.needs_follow_up);

        let conclusion = third.conclusion.unwrap();
        assert!(!conclusion.is_empty());
        let candidates: Vec<String> = prompts::closing_remarks(ScaffoldingType::Conceptual)
            .iter()
            .flat_map(|t| {
                prompts::SPECIFIC_APPROACHES
                    .iter()
                    .map(|a| render_closing(t, &state.map, a))
                    .collect::<Vec<_>>()
            })
            .collect();
        assert!(candidates.contains(&conclusion));
        assert_eq!(state.conclusion.as_deref(), Some(conclusion.as_str()));

        assert_eq!(state.history.len(), 3);
        assert_eq!(
            state.history.iter().map(|h| h.turn).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
        // One start, three turns, one conclusion.
        assert_eq!(sink.len(), 5);
    }

    #[test]
    fn test_round_ends_after_turn_budget() {
        let engine = ScaffoldingEngine::new();
        let mut rng = StdRng::seed_from_u64(9);
        let mut state = engine
            .start_round(RoundRequest::new(3, amg_map()).with_type("metacognitive"))
            .unwrap()
            .state;

        let mut statuses = Vec::new();
        while state.can_continue() {
            let output = engine.process_learner_response(&mut state, "I added a few more concepts", &mut rng);
            statuses.push(output.status);
        }
        assert_eq!(statuses.len(), MAX_TURNS as usize);
        assert_eq!(statuses.last(), Some(&RoundStatus::Concluded));
        assert!(statuses[..statuses.len() - 1]
            .iter()
            .all(|s| *s == RoundStatus::Active));
        assert!(state.conclusion.is_some());
    }

    #[test]
    fn test_state_survives_serialization_between_turns() {
        let engine = ScaffoldingEngine::new();
        let mut rng = StdRng::seed_from_u64(5);
        let state = engine
            .start_round(RoundRequest::new(1, amg_map()).with_type("strategic"))
            .unwrap()
            .state;

        let stored = serde_json::to_string(&state).unwrap();
        let mut restored: ConversationState = serde_json::from_str(&stored).unwrap();
        let output = engine.process_learner_response(&mut restored, "ok", &mut rng);
        assert_eq!(output.response_type, Some(ResponseType::MinimalInput));
        assert_eq!(restored.turn, 1);
        assert_eq!(restored.used_template_indices.len(), 2);
    }

    #[test]
    fn test_event_payloads() {
        let sink = Arc::new(MemorySink::new());
        let engine = ScaffoldingEngine::new().with_sink(sink.clone());
        let mut rng = StdRng::seed_from_u64(1);
        let mut state = engine
            .start_round(
                RoundRequest::new(2, amg_map())
                    .with_type("procedural")
                    .with_intensity("low"),
            )
            .unwrap()
            .state;
        engine.process_learner_response(&mut state, "that's all", &mut rng);

        let events = sink.events();
        match &events[0].kind {
            EventKind::RoundStarted {
                scaffolding_type,
                scaffolding_intensity,
                metrics,
                ..
            } => {
                assert_eq!(*scaffolding_type, ScaffoldingType::Procedural);
                assert_eq!(*scaffolding_intensity, Intensity::Low);
                assert_eq!(metrics.node_count, 2);
            }
            other => panic!("unexpected first event: {:?}", other),
        }
        match &events[1].kind {
            EventKind::LearnerTurn {
                user_response,
                agent_message,
                ..
            } => {
                assert_eq!(user_response, "that's all");
                assert!(!agent_message.is_empty());
            }
            other => panic!("unexpected second event: {:?}", other),
        }
        assert!(events.iter().all(|e| e.round == 2));
    }
}

mod templates {
    use super::*;
    use std::collections::BTreeSet;

    #[test]
    fn test_five_turns_from_large_bank_are_distinct() {
        let bank = prompts::opening_templates(ScaffoldingType::Strategic, Intensity::High);
        assert!(bank.len() >= 5);
        let mut used = BTreeSet::new();
        let indices: Vec<Option<usize>> = (0..5)
            .map(|turn| TemplateSelector::select(bank, &mut used, turn, ScaffoldingType::Strategic).index)
            .collect();
        let distinct: BTreeSet<_> = indices.iter().collect();
        assert_eq!(distinct.len(), 5);
    }

    #[test]
    fn test_small_bank_repeats_only_after_exhaustion() {
        let bank = ["first", "second"];
        let mut used = BTreeSet::new();
        let indices: Vec<Option<usize>> = (0..5)
            .map(|turn| TemplateSelector::select(&bank, &mut used, turn, ScaffoldingType::Conceptual).index)
            .collect();
        assert_eq!(indices, vec![Some(0), Some(1), Some(0), Some(1), Some(0)]);
    }

    #[test]
    fn test_empty_bank_falls_back() {
        let bank: [&str; 0] = [];
        let mut used = BTreeSet::new();
        let selection = TemplateSelector::select(&bank, &mut used, 0, ScaffoldingType::Procedural);
        assert_eq!(selection.index, None);
        assert_eq!(selection.prompt, prompts::fallback_prompt(ScaffoldingType::Procedural));
    }
}

mod map_driven {
    use super::*;

    #[test]
    fn test_sparse_map_is_high_conceptual() {
        let metrics = ConceptMapAnalyzer::new().analyze(&chain_map(4, 3));
        assert!((metrics.complexity_score - 3.6).abs() < 1e-9);
        assert_eq!(metrics.bucket, ComplexityBucket::Sparse);
        assert_eq!(metrics.intensity(), Intensity::High);
        assert_eq!(metrics.leaning_type(), ScaffoldingType::Conceptual);
    }

    #[test]
    fn test_developing_map_is_medium_strategic() {
        let metrics = ConceptMapAnalyzer::new().analyze(&chain_map(7, 6));
        assert!((metrics.complexity_score - 6.6).abs() < 1e-9);
        assert_eq!(metrics.intensity(), Intensity::Medium);
        assert_eq!(metrics.leaning_type(), ScaffoldingType::Strategic);
    }

    #[test]
    fn test_unassigned_round_uses_map_lean() {
        let engine = ScaffoldingEngine::new();
        let started = engine.start_round(RoundRequest::new(1, chain_map(20, 15))).unwrap();
        assert_eq!(started.output.scaffolding_type, Some(ScaffoldingType::Procedural));
        assert_eq!(started.output.scaffolding_intensity, Some(Intensity::Low));
    }

    #[test]
    fn test_malformed_map_starts_with_empty_context() {
        let engine = ScaffoldingEngine::new();
        let started = engine
            .start_round(RoundRequest::new(1, ConceptMap::from_json_str("{not json")).with_type("conceptual"))
            .unwrap();
        assert_eq!(started.metrics.node_count, 0);
        assert!(!started.output.prompts[0].is_empty());
    }
}
