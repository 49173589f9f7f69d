//! Integration tests for quest_runtime.
//!
//! All tests use temporary directories for isolation.

use std::fs;

use tempfile::TempDir;

use quest_engine::scenario::load_scenarios;
use quest_engine::{ChecklistParams, GoalKind, QuestError, QuestTracker};

use quest_runtime::activity::Activity;
use quest_runtime::ledger::ActivityLedger;
use quest_runtime::proto_bridge::{activity_to_proto, proto_to_activity};
use quest_runtime::save_codec::{decode_save, encode_save, export_tracker};
use quest_runtime::{LoadDiagnostic, QuestConfig, QuestSession, SessionError};

fn config_in(dir: &TempDir, with_ledger: bool) -> QuestConfig {
    QuestConfig {
        save_file: dir.path().join("quest.json"),
        ledger_file: with_ledger.then(|| dir.path().join("quest.ledger")),
        ..QuestConfig::default()
    }
}

fn sample_session(config: QuestConfig) -> QuestSession {
    let mut session = QuestSession::new(config).expect("create session");
    session
        .create_goal(GoalKind::Simple, "Run", "Run a marathon", 20, None)
        .unwrap();
    session
        .create_goal(GoalKind::Eternal, "Read", "Read scriptures", 5, None)
        .unwrap();
    session
        .create_goal(
            GoalKind::Checklist,
            "Temple",
            "Attend the temple",
            10,
            Some(ChecklistParams {
                target_count: 3,
                bonus: 50,
            }),
        )
        .unwrap();
    session
}

// ─────────────────────────────────────────────────────────────
// Test 1: save_load_round_trip_for_golden_scenarios
// ─────────────────────────────────────────────────────────────

#[test]
fn save_load_round_trip_for_golden_scenarios() {
    let path = concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/../quest_engine/tests/golden/scenarios.json"
    );
    let scenarios = load_scenarios(&fs::read_to_string(path).expect("read scenarios"))
        .expect("parse scenarios");

    for scenario in &scenarios {
        // Every prefix of the script, so partial checklists are covered.
        for cut in 0..=scenario.events.len() {
            let mut partial = scenario.clone();
            partial.events.truncate(cut);
            let tracker = partial.run().unwrap();

            let json = encode_save(&export_tracker(&tracker), false).unwrap();
            let report = decode_save(&json).unwrap();
            assert!(report.is_clean());

            let restored = QuestTracker::from_state(report.state);
            assert_eq!(
                restored.goals(),
                tracker.goals(),
                "{} after {} events",
                scenario.name,
                cut
            );
            assert_eq!(restored.total_score(), tracker.total_score());
        }
    }
}

// ─────────────────────────────────────────────────────────────
// Test 2: session_save_then_load_restores_progress
// ─────────────────────────────────────────────────────────────

#[test]
fn session_save_then_load_restores_progress() {
    let dir = TempDir::new().unwrap();
    let mut session = sample_session(config_in(&dir, false));
    session.record_event(0).unwrap();
    session.record_event(2).unwrap();
    session.record_event(2).unwrap();
    let hash_before = session.current_hash();

    session.save_default().expect("save");

    let mut reloaded = QuestSession::new(config_in(&dir, false)).unwrap();
    let diagnostics = reloaded.load_default().expect("load");
    assert!(diagnostics.is_empty());
    assert_eq!(reloaded.total_score(), 40);
    assert_eq!(reloaded.current_hash(), hash_before);

    // Progress carries on from the saved counter.
    assert_eq!(reloaded.record_event(2).unwrap().award, 60);
    assert_eq!(reloaded.record_event(0).unwrap().award, 0);
}

// ─────────────────────────────────────────────────────────────
// Test 3: failed_load_leaves_tracker_untouched
// ─────────────────────────────────────────────────────────────

#[test]
fn failed_load_leaves_tracker_untouched() {
    let dir = TempDir::new().unwrap();
    let mut session = sample_session(config_in(&dir, false));
    session.record_event(1).unwrap();
    let before = session.tracker().clone();

    let missing = session.load(&dir.path().join("absent.json"));
    assert!(matches!(missing, Err(SessionError::Codec(_))));
    assert_eq!(session.tracker(), &before);

    let garbage = dir.path().join("garbage.json");
    fs::write(&garbage, b"{ not valid json !!!}").unwrap();
    assert!(session.load(&garbage).is_err());
    assert_eq!(session.tracker(), &before);
}

// ─────────────────────────────────────────────────────────────
// Test 4: bogus_records_are_skipped_on_load
// ─────────────────────────────────────────────────────────────

#[test]
fn bogus_records_are_skipped_on_load() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("hand_edited.json");
    fs::write(
        &path,
        r#"{
  "totalScore": 1500,
  "goals": [
    {"kind": "Simple", "name": "Run", "description": "Marathon",
     "pointsPerEvent": 20, "completed": true},
    {"kind": "Bogus", "name": "???", "description": "",
     "pointsPerEvent": 1, "completed": false},
    {"kind": "Checklist", "name": "Temple", "description": "Attend",
     "pointsPerEvent": 10, "completed": true,
     "targetCount": 3, "currentCount": 5, "bonus": 50},
    {"kind": "Eternal", "name": "Read", "description": "Scriptures",
     "pointsPerEvent": 5, "completed": false}
  ]
}"#,
    )
    .unwrap();

    let mut session = sample_session(config_in(&dir, false));
    let diagnostics = session.load(&path).unwrap();

    assert_eq!(session.total_score(), 1500);
    assert_eq!(session.level(), 1);
    let names: Vec<String> = session.list_goals().map(|g| g.name).collect();
    assert_eq!(names, vec!["Run", "Read"]);

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(
        diagnostics[0],
        LoadDiagnostic::UnknownGoalKind {
            position: 1,
            kind: "Bogus".to_string(),
        }
    );
    assert!(matches!(
        diagnostics[1],
        LoadDiagnostic::MalformedRecord { position: 2, .. }
    ));
}

// ─────────────────────────────────────────────────────────────
// Test 5: construction_and_selection_errors
// ─────────────────────────────────────────────────────────────

#[test]
fn construction_and_selection_errors() {
    let dir = TempDir::new().unwrap();
    let mut session = sample_session(config_in(&dir, true));
    let before = session.tracker().clone();

    let bad_points = session.create_goal(GoalKind::Simple, "x", "y", -1, None);
    assert!(matches!(
        bad_points,
        Err(SessionError::Quest(QuestError::InvalidConfiguration(_)))
    ));

    let bad_index = session.record_event(3);
    assert!(matches!(
        bad_index,
        Err(SessionError::Quest(QuestError::IndexOutOfRange { index: 3, len: 3 }))
    ));
    assert_eq!(session.tracker(), &before);

    // Nothing past the three goal creations reached the ledger.
    assert_eq!(session.ledger_entries().unwrap().len(), 3);
}

// ─────────────────────────────────────────────────────────────
// Test 6: ledger_records_session_activity
// ─────────────────────────────────────────────────────────────

#[test]
fn ledger_records_session_activity() {
    let dir = TempDir::new().unwrap();
    {
        let mut session = sample_session(config_in(&dir, true));
        session.record_event(2).unwrap();
        session.save_default().unwrap();
        session.load_default().unwrap();
    }

    // Reopening continues the sequence instead of restarting it.
    let mut session = QuestSession::new(config_in(&dir, true)).unwrap();
    session.load_default().unwrap();
    let entries = session.ledger_entries().unwrap();

    let sequences: Vec<u64> = entries.iter().map(|e| e.sequence).collect();
    assert_eq!(sequences, vec![1, 2, 3, 4, 5, 6]);

    assert_eq!(
        entries[2].activity,
        Activity::GoalAdded {
            index: 2,
            kind: GoalKind::Checklist,
            name: "Temple".to_string(),
        }
    );
    assert_eq!(
        entries[3].activity,
        Activity::EventRecorded {
            index: 2,
            goal_name: "Temple".to_string(),
            award: 10,
            total_score: 10,
            level: 0,
        }
    );
    assert_eq!(
        entries[5].activity,
        Activity::StateLoaded {
            total_score: 10,
            goal_count: 3,
            skipped: 0,
        }
    );
}

// ─────────────────────────────────────────────────────────────
// Test 7: ledger_sequence_and_corruption
// ─────────────────────────────────────────────────────────────

#[test]
fn ledger_sequence_and_corruption() {
    let dir = TempDir::new().unwrap();
    let log_path = dir.path().join("events.log");
    let activity = Activity::StateLoaded {
        total_score: 0,
        goal_count: 0,
        skipped: 0,
    };

    {
        let mut store = ActivityLedger::open(&log_path).expect("open store");
        assert!(store.append(&activity_to_proto(2, &activity)).is_err());
        for seq in 1..=5 {
            store.append(&activity_to_proto(seq, &activity)).expect("append");
        }
        assert_eq!(store.last_sequence(), 5);
    }

    let store = ActivityLedger::open(&log_path).expect("reopen store");
    let loaded = store.read_all().expect("load");
    assert_eq!(loaded.len(), 5);
    assert_eq!(proto_to_activity(&loaded[4]).unwrap().activity, activity);

    // Truncate into the last frame.
    let data = fs::read(&log_path).unwrap();
    fs::write(&log_path, &data[..data.len() - 3]).unwrap();

    match ActivityLedger::open(&log_path) {
        Ok(s) => assert!(s.read_all().is_err(), "corrupted ledger should fail to load"),
        Err(_) => {}
    }
}

// ─────────────────────────────────────────────────────────────
// Test 8: level_threshold_comes_from_config
// ─────────────────────────────────────────────────────────────

#[test]
fn level_threshold_comes_from_config() {
    let dir = TempDir::new().unwrap();
    let config_path = dir.path().join("quest.toml");
    fs::write(
        &config_path,
        format!(
            "level_threshold = 10\nsave_file = {:?}\npretty_saves = false\n",
            dir.path().join("hero.json")
        ),
    )
    .unwrap();

    let mut session = QuestSession::from_config_file(&config_path).unwrap();
    session
        .create_goal(GoalKind::Eternal, "Pushups", "Set of twenty", 4, None)
        .unwrap();
    for _ in 0..5 {
        session.record_event(0).unwrap();
    }
    assert_eq!(session.total_score(), 20);
    assert_eq!(session.level(), 2);

    session.save_default().unwrap();
    let saved = fs::read_to_string(dir.path().join("hero.json")).unwrap();
    assert!(saved.starts_with(r#"{"totalScore":20,"#));
}

// ─────────────────────────────────────────────────────────────
// Test 9: ledger_failure_does_not_fail_tracker_operations
// ─────────────────────────────────────────────────────────────

#[test]
fn ledger_failure_does_not_fail_tracker_operations() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, true);
    let ledger_path = config.ledger_file.clone().unwrap();
    let mut session = QuestSession::new(config).unwrap();

    // A directory where the ledger file should be makes every append fail.
    fs::create_dir(&ledger_path).unwrap();

    let index = session
        .create_goal(GoalKind::Simple, "Run", "Run a marathon", 20, None)
        .expect("goal added despite ledger failure");
    assert_eq!(index, 0);
    assert_eq!(session.tracker().len(), 1);

    let outcome = session.record_event(0).expect("event recorded despite ledger failure");
    assert_eq!(outcome.award, 20);
    assert!(outcome.completed_now);
    assert_eq!(session.total_score(), 20);

    let second = session
        .create_goal(GoalKind::Eternal, "Read", "Read scriptures", 5, None)
        .unwrap();
    assert_eq!(second, 1);
    assert_eq!(session.tracker().len(), 2);
}

// ─────────────────────────────────────────────────────────────
// Test 10: save_returns_hash_of_written_file
// ─────────────────────────────────────────────────────────────

#[test]
fn save_returns_hash_of_written_file() {
    use sha2::{Digest, Sha256};

    let dir = TempDir::new().unwrap();
    let config = config_in(&dir, false);
    assert!(config.pretty_saves);
    let save_path = config.save_file.clone();

    let mut session = sample_session(config);
    session.record_event(2).unwrap();
    let returned = session.save_default().unwrap();

    let file_hash: String = Sha256::digest(fs::read(&save_path).unwrap())
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect();
    assert_eq!(returned, file_hash);
}
