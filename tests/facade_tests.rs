//! Contract tests for the AI request façade against a mock
//! chat-completions server: success decoding, per-operation fallbacks,
//! local short-circuits and the stale-response guard.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use dayweaver::ai::facade::LatestOnly;
use dayweaver::ai::types::{
    AnalyzeTimeUsageInput, BreakdownInput, BurnoutInput, CreateScheduleInput, EfficiencyInput,
    MeetingPrepInput, RiskLevel, TaskSummary,
};
use dayweaver::ai::{AiConfig, Planner};
use dayweaver::error::AiError;
use dayweaver::models::{Priority, TaskStatus};

fn planner_for(server: &MockServer) -> Planner {
    Planner::new(AiConfig::new(server.uri(), "test-key", "test-model"))
}

/// Wraps an operation payload in a chat-completion envelope: the payload is
/// JSON text inside the assistant message content.
fn completion(payload: serde_json::Value) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": "test-model",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": payload.to_string() },
            "finish_reason": "stop"
        }]
    })
}

fn summary(name: &str, due: Option<&str>, priority: Priority, status: TaskStatus) -> TaskSummary {
    TaskSummary {
        name: name.into(),
        description: None,
        due_date: due.map(Into::into),
        priority: Some(priority),
        status,
        category: None,
    }
}

/// One overdue high-priority task plus nine on-time low-priority ones.
fn mixed_workload() -> Vec<TaskSummary> {
    let mut tasks = vec![summary(
        "overdue launch",
        Some("2025-01-01T09:00:00Z"),
        Priority::High,
        TaskStatus::Todo,
    )];
    for i in 0..9 {
        tasks.push(summary(
            &format!("routine {}", i),
            Some("2099-01-01T09:00:00Z"),
            Priority::Low,
            TaskStatus::Todo,
        ));
    }
    tasks
}

#[tokio::test]
async fn test_create_schedule_decodes_output() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "scheduleText": "08:00 study, 12:00 lunch, 13:00 deep work",
            "tasks": [
                { "name": "Morning study block", "category": "Study" },
                { "name": "Deep work session", "description": "No meetings." }
            ]
        }))))
        .expect(1)
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .create_schedule(CreateScheduleInput {
            schedule_description: "a focused study day".into(),
        })
        .await
        .unwrap();

    assert!(output.schedule_text.contains("deep work"));
    let tasks = output.tasks.unwrap();
    assert_eq!(tasks.len(), 2);
    assert_eq!(tasks[0].category.as_deref(), Some("Study"));
}

#[tokio::test]
async fn test_create_schedule_surfaces_service_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let result = planner
        .create_schedule(CreateScheduleInput {
            schedule_description: "anything".into(),
        })
        .await;

    assert!(matches!(result, Err(AiError::Api { status: 500, .. })));
}

#[tokio::test]
async fn test_create_schedule_rejects_malformed_payload() {
    let server = MockServer::start().await;
    // Valid HTTP, valid envelope, but the payload is not the schedule shape.
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(json!({ "unexpected": "shape" }))),
        )
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let result = planner
        .create_schedule(CreateScheduleInput {
            schedule_description: "anything".into(),
        })
        .await;

    assert!(matches!(result, Err(AiError::InvalidResponse(_))));
}

#[tokio::test]
async fn test_efficiency_empty_tasks_answers_locally() {
    let server = MockServer::start().await;
    // No request may reach the service for an empty task list.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({}))))
        .expect(0)
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .calculate_efficiency(EfficiencyInput {
            tasks: vec![],
            current_date: "2025-06-01".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.score, 0.0);
    assert!(output.message.contains("No tasks"));
}

#[tokio::test]
async fn test_efficiency_failure_uses_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("down"))
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .calculate_efficiency(EfficiencyInput {
            tasks: mixed_workload(),
            current_date: "2025-06-01".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.score, 50.0);
    assert!(output.improvement_suggestion.is_some());
}

#[tokio::test]
async fn test_efficiency_out_of_range_score_uses_placeholder() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "score": 150,
            "message": "suspiciously good"
        }))))
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .calculate_efficiency(EfficiencyInput {
            tasks: mixed_workload(),
            current_date: "2025-06-01".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.score, 50.0);
}

#[tokio::test]
async fn test_burnout_empty_tasks_answers_locally() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({}))))
        .expect(0)
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .predict_burnout(BurnoutInput {
            tasks: vec![],
            current_date: "2025-06-01".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.risk_level, RiskLevel::Low);
    assert_eq!(output.progress_value, 10.0);
}

#[tokio::test]
async fn test_burnout_failure_falls_back_to_medium_50() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .predict_burnout(BurnoutInput {
            tasks: mixed_workload(),
            current_date: "2025-06-01".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.risk_level, RiskLevel::Medium);
    assert_eq!(output.progress_value, 50.0);
    assert_eq!(
        output.contributing_factors.as_deref(),
        Some(&["AI analysis unavailable".to_string()][..])
    );
}

#[tokio::test]
async fn test_burnout_unknown_field_triggers_fallback() {
    let server = MockServer::start().await;
    // Unexpected fields fail strict validation at the boundary.
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "riskLevel": "low",
            "progressValue": 20,
            "message": "fine",
            "surprise": true
        }))))
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .predict_burnout(BurnoutInput {
            tasks: mixed_workload(),
            current_date: "2025-06-01".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.risk_level, RiskLevel::Medium);
    assert_eq!(output.progress_value, 50.0);
}

#[tokio::test]
async fn test_time_usage_failure_uses_default_table() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .analyze_time_usage(AnalyzeTimeUsageInput {
            tasks: mixed_workload(),
            current_date: "2025-06-01".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.weekly_usage.len(), 7);
    assert_eq!(output.weekly_usage[0].day, "Mon");
    for day in &output.weekly_usage {
        assert_eq!(day.study, 0.0);
        assert_eq!(day.work, 0.0);
        assert_eq!(day.chill, 2.0);
        assert_eq!(day.sleep, 8.0);
    }
}

#[tokio::test]
async fn test_time_usage_zero_fills_missing_days() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "weeklyUsage": [
                { "day": "Wed", "Study": 3.0, "Work": 4.0, "Personal": 1.0, "Chill": 2.0, "Sleep": 8.0 }
            ],
            "analysisSummary": "only midweek data"
        }))))
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .analyze_time_usage(AnalyzeTimeUsageInput {
            tasks: mixed_workload(),
            current_date: "2025-06-01".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.weekly_usage.len(), 7);
    let days: Vec<&str> = output.weekly_usage.iter().map(|d| d.day.as_str()).collect();
    assert_eq!(days, ["Mon", "Tue", "Wed", "Thu", "Fri", "Sat", "Sun"]);
    assert_eq!(output.weekly_usage[2].study, 3.0);
    assert_eq!(output.weekly_usage[0].study, 0.0);
    assert_eq!(output.weekly_usage[0].sleep, 0.0);
}

#[tokio::test]
async fn test_breakdown_failure_yields_empty_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .break_down_task(BreakdownInput {
            task: "Prepare slides by Friday".into(),
        })
        .await
        .unwrap();

    assert!(output.sub_tasks.is_empty());
}

#[tokio::test]
async fn test_breakdown_decodes_sub_tasks() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion(json!({
            "subTasks": [
                { "name": "Outline", "estimatedTime": "1hr" },
                { "name": "Draft slides", "estimatedTime": "2hr" }
            ]
        }))))
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .break_down_task(BreakdownInput {
            task: "Prepare slides by Friday".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.sub_tasks.len(), 2);
    assert_eq!(output.sub_tasks[1].estimated_time, "2hr");
}

#[tokio::test]
async fn test_meeting_prep_failure_keeps_tasks_unchanged() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500).set_body_string("down"))
        .mount(&server)
        .await;

    let planner = planner_for(&server);
    let output = planner
        .prepare_for_meeting(MeetingPrepInput {
            calendar_event: "Quarterly review, 14:00".into(),
            current_tasks: "- Finish deck (due 2025-06-02)".into(),
        })
        .await
        .unwrap();

    assert_eq!(output.adjusted_tasks, "- Finish deck (due 2025-06-02)");
    assert!(output.speaker_checklist.contains("Prepare speech notes"));
}

#[test]
fn test_latest_only_admits_only_newest_ticket() {
    let guard = LatestOnly::default();
    let first = guard.begin();
    assert!(guard.is_current(first));

    let second = guard.begin();
    assert!(!guard.is_current(first));
    assert!(guard.is_current(second));
}

#[tokio::test]
async fn test_stale_response_is_discarded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(completion(json!({ "subTasks": [] })))
                .set_delay(Duration::from_millis(500)),
        )
        .mount(&server)
        .await;

    let planner = Arc::new(planner_for(&server));

    let slow = {
        let planner = planner.clone();
        tokio::spawn(async move {
            planner
                .break_down_task(BreakdownInput {
                    task: "first request".into(),
                })
                .await
        })
    };
    // Let the first request get issued before superseding it.
    tokio::time::sleep(Duration::from_millis(100)).await;

    let newest = planner
        .break_down_task(BreakdownInput {
            task: "second request".into(),
        })
        .await;
    assert!(newest.is_ok());

    let superseded = slow.await.unwrap();
    assert!(matches!(superseded, Err(AiError::Stale)));
}
