use std::sync::atomic::{AtomicU64, Ordering};

use tracing::warn;

use crate::ai::client::AiClient;
use crate::ai::config::AiConfig;
use crate::ai::prompts;
use crate::ai::types::{
    AnalyzeTimeUsageOutput, BreakdownInput, BreakdownOutput, BurnoutInput, BurnoutOutput,
    CreateScheduleInput, CreateScheduleOutput, DailyTimeUsage, EfficiencyInput, EfficiencyOutput,
    MeetingPrepInput, MeetingPrepOutput, ReallocationInput, ReallocationOutput, RiskLevel,
    AnalyzeTimeUsageInput, WEEKDAYS,
};
use crate::error::{AiError, AiResult};

/// Serial-number guard admitting only the most recently issued request.
///
/// Closes the stale-response race: a response that completes after a newer
/// request of the same kind was issued is discarded, never applied.
#[derive(Debug, Default)]
pub struct LatestOnly {
    issued: AtomicU64,
}

impl LatestOnly {
    /// Issues a new ticket, superseding all earlier ones.
    pub fn begin(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Whether `ticket` is still the most recently issued one.
    pub fn is_current(&self, ticket: u64) -> bool {
        self.issued.load(Ordering::SeqCst) == ticket
    }
}

const OP_COUNT: usize = 7;

/// Request families; each keys its own staleness guard.
#[derive(Debug, Clone, Copy)]
enum Op {
    Schedule = 0,
    TimeUsage,
    Efficiency,
    Burnout,
    Breakdown,
    Reallocation,
    MeetingPrep,
}

const DEFAULT_CHECKLIST: &str =
    "1. Prepare speech notes.\n2. Practice presentation.\n3. Test equipment.";

/// The AI request façade.
///
/// One method per operation; inputs and outputs are the typed schemas in
/// [`crate::ai::types`]. Analytics-style operations resolve service failures
/// to deterministic fallback values; schedule creation surfaces its errors
/// because there is no safe default schedule.
pub struct Planner {
    client: AiClient,
    guards: [LatestOnly; OP_COUNT],
}

impl Planner {
    pub fn new(config: AiConfig) -> Planner {
        Planner {
            client: AiClient::new(config),
            guards: std::array::from_fn(|_| LatestOnly::default()),
        }
    }

    pub fn from_env() -> AiResult<Planner> {
        Ok(Planner::new(AiConfig::from_env()?))
    }

    fn begin(&self, op: Op) -> u64 {
        self.guards[op as usize].begin()
    }

    /// Applies the staleness rule: a result whose ticket was superseded is
    /// discarded regardless of outcome.
    fn settle<T>(&self, op: Op, ticket: u64, outcome: AiResult<T>) -> AiResult<T> {
        if !self.guards[op as usize].is_current(ticket) {
            return Err(AiError::Stale);
        }
        outcome
    }

    /// Creates a schedule from a natural-language description.
    ///
    /// The one operation without a fallback; failures reach the caller.
    pub async fn create_schedule(
        &self,
        input: CreateScheduleInput,
    ) -> AiResult<CreateScheduleOutput> {
        let ticket = self.begin(Op::Schedule);
        let outcome = self
            .client
            .complete_json(prompts::SCHEDULER_ROLE, &prompts::create_schedule(&input))
            .await;
        self.settle(Op::Schedule, ticket, outcome)
    }

    /// Estimates weekly time usage per life category.
    ///
    /// The output is normalized to exactly Mon..Sun; days the service missed
    /// come back zeroed. Failure falls back to a default table.
    pub async fn analyze_time_usage(
        &self,
        input: AnalyzeTimeUsageInput,
    ) -> AiResult<AnalyzeTimeUsageOutput> {
        let ticket = self.begin(Op::TimeUsage);
        let outcome = self
            .client
            .complete_json::<AnalyzeTimeUsageOutput>(
                prompts::ANALYST_ROLE,
                &prompts::analyze_time_usage(&input),
            )
            .await
            .map(normalize_weekly_usage);
        match self.settle(Op::TimeUsage, ticket, outcome) {
            Err(AiError::Stale) => Err(AiError::Stale),
            Err(err) => {
                warn!(%err, "time usage analysis failed, using default estimates");
                Ok(time_usage_fallback())
            }
            ok => ok,
        }
    }

    /// Scores how efficiently the task list is being worked through.
    ///
    /// An empty task list answers locally (score 0) without contacting the
    /// service. Failure falls back to a neutral placeholder score.
    pub async fn calculate_efficiency(&self, input: EfficiencyInput) -> AiResult<EfficiencyOutput> {
        if input.tasks.is_empty() {
            return Ok(EfficiencyOutput {
                score: 0.0,
                message: "No tasks available to calculate efficiency.".to_string(),
                positive_feedback: None,
                improvement_suggestion: None,
            });
        }
        let ticket = self.begin(Op::Efficiency);
        let outcome = self
            .client
            .complete_json::<EfficiencyOutput>(
                prompts::ANALYST_ROLE,
                &prompts::calculate_efficiency(&input),
            )
            .await
            .and_then(|out| {
                if (0.0..=100.0).contains(&out.score) {
                    Ok(out)
                } else {
                    Err(AiError::InvalidResponse(format!(
                        "score {} out of range",
                        out.score
                    )))
                }
            });
        match self.settle(Op::Efficiency, ticket, outcome) {
            Err(AiError::Stale) => Err(AiError::Stale),
            Err(err) => {
                warn!(%err, "efficiency scoring failed, using placeholder");
                Ok(EfficiencyOutput {
                    score: 50.0,
                    message: "Could not analyze efficiency score at this time.".to_string(),
                    positive_feedback: None,
                    improvement_suggestion: Some("Please try again later.".to_string()),
                })
            }
            ok => ok,
        }
    }

    /// Predicts burnout risk from the task load.
    ///
    /// An empty task list answers locally (low risk). Failure falls back to
    /// a medium-risk placeholder.
    pub async fn predict_burnout(&self, input: BurnoutInput) -> AiResult<BurnoutOutput> {
        if input.tasks.is_empty() {
            return Ok(BurnoutOutput {
                risk_level: RiskLevel::Low,
                progress_value: 10.0,
                message: "No tasks to analyze. Enjoy your free time, but remember to plan ahead!"
                    .to_string(),
                contributing_factors: None,
            });
        }
        let ticket = self.begin(Op::Burnout);
        let outcome = self
            .client
            .complete_json::<BurnoutOutput>(
                prompts::ANALYST_ROLE,
                &prompts::predict_burnout(&input),
            )
            .await
            .and_then(|out| {
                if (0.0..=100.0).contains(&out.progress_value) {
                    Ok(out)
                } else {
                    Err(AiError::InvalidResponse(format!(
                        "progress value {} out of range",
                        out.progress_value
                    )))
                }
            });
        match self.settle(Op::Burnout, ticket, outcome) {
            Err(AiError::Stale) => Err(AiError::Stale),
            Err(err) => {
                warn!(%err, "burnout prediction failed, using placeholder");
                Ok(BurnoutOutput {
                    risk_level: RiskLevel::Medium,
                    progress_value: 50.0,
                    message: "Could not analyze burnout risk at this time. Please ensure you \
                              are managing your workload effectively."
                        .to_string(),
                    contributing_factors: Some(vec!["AI analysis unavailable".to_string()]),
                })
            }
            ok => ok,
        }
    }

    /// Breaks a task into estimated sub-tasks. Failure yields an empty list.
    pub async fn break_down_task(&self, input: BreakdownInput) -> AiResult<BreakdownOutput> {
        let ticket = self.begin(Op::Breakdown);
        let outcome = self
            .client
            .complete_json(prompts::PLANNER_ROLE, &prompts::break_down_task(&input))
            .await;
        match self.settle(Op::Breakdown, ticket, outcome) {
            Err(AiError::Stale) => Err(AiError::Stale),
            Err(err) => {
                warn!(%err, "task breakdown failed, returning no sub-tasks");
                Ok(BreakdownOutput { sub_tasks: vec![] })
            }
            ok => ok,
        }
    }

    /// Reschedules tasks for a given reason. Failure yields an empty
    /// reschedule list so no due date moves without the service's say-so.
    pub async fn reallocate_tasks(&self, input: ReallocationInput) -> AiResult<ReallocationOutput> {
        let ticket = self.begin(Op::Reallocation);
        let outcome = self
            .client
            .complete_json(prompts::PLANNER_ROLE, &prompts::reallocate_tasks(&input))
            .await;
        match self.settle(Op::Reallocation, ticket, outcome) {
            Err(AiError::Stale) => Err(AiError::Stale),
            Err(err) => {
                warn!(%err, "reallocation failed, leaving due dates unchanged");
                Ok(ReallocationOutput {
                    rescheduled_tasks: vec![],
                    summary: "Rescheduling is unavailable right now; due dates were left \
                              unchanged."
                        .to_string(),
                })
            }
            ok => ok,
        }
    }

    /// Adjusts the day around a calendar event and produces reminders and a
    /// speaker checklist. Failure leaves the task list unchanged and falls
    /// back to a stock checklist.
    pub async fn prepare_for_meeting(&self, input: MeetingPrepInput) -> AiResult<MeetingPrepOutput> {
        let ticket = self.begin(Op::MeetingPrep);
        let prompt = prompts::prepare_for_meeting(&input);
        let outcome = self
            .client
            .complete_json(prompts::PLANNER_ROLE, &prompt)
            .await;
        match self.settle(Op::MeetingPrep, ticket, outcome) {
            Err(AiError::Stale) => Err(AiError::Stale),
            Err(err) => {
                warn!(%err, "meeting preparation failed, using stock checklist");
                Ok(MeetingPrepOutput {
                    adjusted_tasks: input.current_tasks,
                    reminders: "Reminders unavailable; review the event details manually."
                        .to_string(),
                    speaker_checklist: DEFAULT_CHECKLIST.to_string(),
                })
            }
            ok => ok,
        }
    }
}

/// Reorders the reported table to Mon..Sun, zero-filling missing days.
fn normalize_weekly_usage(mut out: AnalyzeTimeUsageOutput) -> AnalyzeTimeUsageOutput {
    let reported = std::mem::take(&mut out.weekly_usage);
    out.weekly_usage = WEEKDAYS
        .iter()
        .map(|day| {
            reported
                .iter()
                .find(|d| d.day == *day)
                .cloned()
                .unwrap_or_else(|| DailyTimeUsage::zeroed(day))
        })
        .collect();
    out
}

fn time_usage_fallback() -> AnalyzeTimeUsageOutput {
    AnalyzeTimeUsageOutput {
        weekly_usage: WEEKDAYS
            .iter()
            .map(|day| DailyTimeUsage {
                day: day.to_string(),
                study: 0.0,
                work: 0.0,
                personal: 0.0,
                chill: 2.0,
                sleep: 8.0,
            })
            .collect(),
        analysis_summary: Some("Analysis unavailable, showing default estimates.".to_string()),
    }
}
