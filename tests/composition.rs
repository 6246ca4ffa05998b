// Composition tests — the miner driven by a scripted completion backend.
//
// These exercise the full round loop and consolidation without any network
// calls: parse-failure isolation, round sequencing (each prompt enumerates
// exactly the previous round's surviving state), and consolidation
// cardinality validation.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use gleaner::llm::traits::{CallOptions, ChatMessage, CompletionBackend};
use gleaner::topics::miner::{MinerSettings, TopicMiner};

/// Backend that replays canned responses and records every prompt it saw.
struct ScriptedBackend {
    responses: Mutex<VecDeque<String>>,
    prompts: Mutex<Vec<Vec<ChatMessage>>>,
    options: Mutex<Vec<CallOptions>>,
}

impl ScriptedBackend {
    fn new(responses: &[&str]) -> Self {
        Self {
            responses: Mutex::new(responses.iter().map(|r| r.to_string()).collect()),
            prompts: Mutex::new(Vec::new()),
            options: Mutex::new(Vec::new()),
        }
    }

    fn system_prompt(&self, call: usize) -> String {
        self.prompts.lock().unwrap()[call][0].content.clone()
    }

    fn user_prompt(&self, call: usize) -> String {
        self.prompts.lock().unwrap()[call][1].content.clone()
    }
}

#[async_trait]
impl CompletionBackend for ScriptedBackend {
    async fn execute(&self, messages: &[ChatMessage], options: &CallOptions) -> String {
        self.prompts.lock().unwrap().push(messages.to_vec());
        self.options.lock().unwrap().push(options.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| "{}".to_string())
    }
}

fn settings(num_batches: usize, final_count: usize) -> MinerSettings {
    MinerSettings {
        batch_size: 2,
        num_batches,
        final_count,
        ..MinerSettings::default()
    }
}

fn batch(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

// ============================================================
// Round loop: scenario, isolation, sequencing
// ============================================================

#[tokio::test]
async fn three_round_scenario_through_the_miner() {
    let backend = ScriptedBackend::new(&[
        r#"{"add": ["A", "B"]}"#,
        r#"{"add": ["B", "C"], "remove": [{"topic": "A", "id": 1}]}"#,
        "not json",
    ]);
    let mut miner = TopicMiner::new(backend, settings(3, 20));
    let tweets = batch(&["t1", "t2"]);

    miner.run_round(&tweets, 0).await;
    assert_eq!(miner.registry().entries(), vec![("A", 1), ("B", 2)]);

    miner.run_round(&tweets, 1).await;
    assert_eq!(miner.registry().entries(), vec![("B", 2), ("C", 3)]);

    // Malformed round: registry unchanged, no panic, loop can continue
    miner.run_round(&tweets, 2).await;
    assert_eq!(miner.registry().entries(), vec![("B", 2), ("C", 3)]);
}

#[tokio::test]
async fn failure_description_from_client_is_isolated() {
    // The client contract degrades transport failures into a descriptive
    // string — the miner must treat it like any other unparsable reply.
    let backend = ScriptedBackend::new(&[
        r#"{"add": ["A"]}"#,
        "Completion call failed: Completion API returned 500: upstream error",
    ]);
    let mut miner = TopicMiner::new(backend, settings(2, 20));
    let tweets = batch(&["t1"]);

    miner.run_round(&tweets, 0).await;
    let before: Vec<(String, u64)> = miner
        .registry()
        .entries()
        .into_iter()
        .map(|(label, id)| (label.to_string(), id))
        .collect();

    miner.run_round(&tweets, 1).await;
    let after: Vec<(String, u64)> = miner
        .registry()
        .entries()
        .into_iter()
        .map(|(label, id)| (label.to_string(), id))
        .collect();
    assert_eq!(after, before);
}

#[tokio::test]
async fn round_prompt_enumerates_previous_rounds_surviving_state() {
    let backend = ScriptedBackend::new(&[
        r#"{"add": ["Alpha", "Beta"]}"#,
        r#"{"add": ["Gamma"], "remove": [{"topic": "Alpha", "id": 1}]}"#,
        "{}",
    ]);
    let mut miner = TopicMiner::new(backend, settings(3, 20));
    let tweets = batch(&["t1", "t2"]);

    miner.run_round(&tweets, 0).await;
    miner.run_round(&tweets, 1).await;
    miner.run_round(&tweets, 2).await;

    // Round 1's prompt saw an empty registry
    let first = miner.client().system_prompt(0);
    assert!(!first.contains("Alpha: 1"));

    // Round 2's prompt saw exactly round 1's result
    let second = miner.client().system_prompt(1);
    assert!(second.contains("Alpha: 1"));
    assert!(second.contains("Beta: 2"));
    assert!(second.contains("batch 2 of 3"));

    // Round 3's prompt saw round 2's mutations: Alpha gone, Gamma added
    let third = miner.client().system_prompt(2);
    assert!(!third.contains("Alpha: 1"));
    assert!(third.contains("Beta: 2"));
    assert!(third.contains("Gamma: 3"));

    // The batch text flows into the user message
    let user = miner.client().user_prompt(0);
    assert!(user.contains("t1"));
}

#[tokio::test]
async fn rounds_force_json_with_generous_budget() {
    let backend = ScriptedBackend::new(&[r#"{"add": ["A"]}"#]);
    let mut miner = TopicMiner::new(backend, settings(1, 20));
    miner.run_round(&batch(&["t1"]), 0).await;

    let options = miner.client().options.lock().unwrap();
    assert!(options[0].force_json);
    assert_eq!(options[0].max_tokens, 1000);
}

// ============================================================
// mine() — the sampling loop
// ============================================================

#[tokio::test]
async fn mine_runs_every_round_and_survives_bad_ones() {
    let backend = ScriptedBackend::new(&[
        r#"{"add": ["A"]}"#,
        "garbage",
        r#"{"add": ["B"]}"#,
    ]);
    let mut miner = TopicMiner::new(backend, settings(3, 20));
    let corpus = batch(&["t1", "t2", "t3", "t4"]);

    miner.mine(&corpus).await.unwrap();

    assert_eq!(miner.registry().entries(), vec![("A", 1), ("B", 2)]);
    assert_eq!(miner.client().prompts.lock().unwrap().len(), 3);
}

#[tokio::test]
async fn mine_rejects_empty_corpus() {
    let backend = ScriptedBackend::new(&[]);
    let mut miner = TopicMiner::new(backend, settings(3, 20));
    assert!(miner.mine(&[]).await.is_err());
}

// ============================================================
// Consolidation
// ============================================================

#[tokio::test]
async fn consolidation_returns_validated_list_verbatim() {
    let labels: Vec<String> = (0..45).map(|i| format!("נושא {i}")).collect();
    let add_all = serde_json::json!({ "add": labels }).to_string();

    let final_list: Vec<String> = (0..20).map(|i| format!("נושא סופי {i}")).collect();
    let final_reply = serde_json::json!({ "response": final_list }).to_string();

    let backend = ScriptedBackend::new(&[add_all.as_str(), final_reply.as_str()]);
    let mut miner = TopicMiner::new(backend, settings(1, 20));
    miner.run_round(&batch(&["t1"]), 0).await;
    assert_eq!(miner.registry().len(), 45);

    let topics = miner.finalize().await.unwrap();
    assert_eq!(topics, final_list);

    // The consolidation prompt carried every label, one per line, and used
    // the large output budget
    let user = miner.client().user_prompt(1);
    assert_eq!(user.lines().count(), 45);
    let options = miner.client().options.lock().unwrap();
    assert!(options[1].force_json);
    assert_eq!(options[1].max_tokens, 4000);
}

#[tokio::test]
async fn consolidation_with_wrong_cardinality_is_an_error() {
    let short_reply = serde_json::json!({ "response": ["only", "two"] }).to_string();
    let backend = ScriptedBackend::new(&[r#"{"add": ["A"]}"#, short_reply.as_str()]);
    let mut miner = TopicMiner::new(backend, settings(1, 20));
    miner.run_round(&batch(&["t1"]), 0).await;

    let err = miner.finalize().await.unwrap_err();
    assert!(err.to_string().contains("expected exactly 20"));
}

#[tokio::test]
async fn consolidation_failure_has_no_fallback() {
    let backend = ScriptedBackend::new(&[
        r#"{"add": ["A"]}"#,
        "Completion call failed: connection reset",
    ]);
    let mut miner = TopicMiner::new(backend, settings(1, 20));
    miner.run_round(&batch(&["t1"]), 0).await;

    assert!(miner.finalize().await.is_err());
}
