//! Evaluation Engine - 预订准入规则级联
//!
//! 规则按固定顺序逐条检查，第一条命中的规则决定结果：
//!
//! ```text
//! 1. OperatingHours     闭店 / 不在 [open, close)          → REJECT
//! 2. AdvanceNotice      提前量不足 / 超出最大预订天数       → REJECT
//! 3. SameDay            24h 内且不接受当天预订 / 过截止点   → REJECT
//! 4. LargeParty         大桌需经理审批                      → PENDING
//!    Deposit            需确认订金                          → PENDING
//!    AutoAcceptLimit    超过自动接受人数                    → PENDING
//! 5. SlotFull           窗口内预订数 >= 上限                → WAITLIST
//!    WaitlistThreshold  当前利用率 >= 候位阈值              → WAITLIST
//!    PendingThreshold   当前利用率 >= 审核阈值              → PENDING
//!    OverCapacity       现有人数 + 本桌 > 总座位            → WAITLIST
//! 6. (none)                                                 → AUTO_CONFIRM
//! ```
//!
//! 阈值比较使用加入本桌之前的利用率；只有 OverCapacity 使用加入后的人数。
//!
//! 引擎是纯函数：输入快照 + 当前本地时间，不读写任何存储。

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use shared::models::{
    CapacityThresholds, DayHours, Reservation, ReservationSource, RestaurantSettings, Slot,
};

use super::capacity::{CapacitySnapshot, calculate_capacity};
use crate::utils::time::hours_between;

/// 准入决策
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Decision {
    AutoConfirm,
    Pending,
    Waitlist,
    Reject,
}

/// 级联中的单条规则
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Rule {
    OperatingHours,
    AdvanceNotice,
    SameDay,
    LargeParty,
    Deposit,
    AutoAcceptLimit,
    SlotFull,
    WaitlistThreshold,
    PendingThreshold,
    OverCapacity,
}

/// 规则求值顺序
pub const CASCADE: [Rule; 10] = [
    Rule::OperatingHours,
    Rule::AdvanceNotice,
    Rule::SameDay,
    Rule::LargeParty,
    Rule::Deposit,
    Rule::AutoAcceptLimit,
    Rule::SlotFull,
    Rule::WaitlistThreshold,
    Rule::PendingThreshold,
    Rule::OverCapacity,
];

/// 待评估的请求
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub slot: Slot,
    pub party_size: u32,
    pub source: ReservationSource,
}

/// 诊断信息（供 UI 展示，不参与其他流程的控制）
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationMetadata {
    pub current_capacity_percent: f64,
    pub reservations_in_slot: u32,
    pub total_guests: u32,
    pub hours_in_advance: f64,
    pub is_within_operating_hours: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_period: Option<String>,
}

/// 评估结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    pub decision: Decision,
    pub reason: String,
    /// 命中的规则；`None` 表示全部通过
    pub rule: Option<Rule>,
    pub capacity: CapacitySnapshot,
    pub metadata: EvaluationMetadata,
}

impl Evaluation {
    pub fn is_reject(&self) -> bool {
        self.decision == Decision::Reject
    }
}

/// 规则求值上下文（一次评估内所有派生量只计算一次）
#[derive(Debug, Clone)]
pub struct EvaluationContext<'a> {
    pub request: &'a EvaluationRequest,
    pub settings: &'a RestaurantSettings,
    pub now: NaiveDateTime,
    pub hours_in_advance: f64,
    pub day_hours: DayHours,
    pub is_within_operating_hours: bool,
    pub thresholds: CapacityThresholds,
    pub capacity: CapacitySnapshot,
}

impl<'a> EvaluationContext<'a> {
    pub fn new(
        request: &'a EvaluationRequest,
        settings: &'a RestaurantSettings,
        confirmed: &[Reservation],
        now: NaiveDateTime,
    ) -> Self {
        let slot = request.slot;
        let day_hours = settings.hours_for(slot.date);
        let is_within_operating_hours = match day_hours {
            DayHours::Open(window) => window.contains(slot.time),
            DayHours::Closed => false,
        };

        Self {
            request,
            settings,
            now,
            hours_in_advance: hours_between(now, slot.local_datetime()),
            day_hours,
            is_within_operating_hours,
            thresholds: settings.thresholds_for(slot.date),
            capacity: calculate_capacity(confirmed, slot, settings),
        }
    }

    fn metadata(&self) -> EvaluationMetadata {
        let service_period = self
            .settings
            .weekday_hours(self.request.slot.date)
            .and_then(|h| h.service_period_at(self.request.slot.time))
            .map(str::to_string);

        EvaluationMetadata {
            current_capacity_percent: self.capacity.utilization_percent(),
            reservations_in_slot: self.capacity.reservation_count,
            total_guests: self.capacity.total_guests,
            hours_in_advance: (self.hours_in_advance * 100.0).round() / 100.0,
            is_within_operating_hours: self.is_within_operating_hours,
            service_period,
        }
    }
}

impl Rule {
    /// 检查本条规则；命中返回 (决策, 原因)
    pub fn check(&self, ctx: &EvaluationContext<'_>) -> Option<(Decision, String)> {
        let settings = ctx.settings;
        let party_size = ctx.request.party_size;

        match self {
            Rule::OperatingHours => match ctx.day_hours {
                DayHours::Closed => Some((
                    Decision::Reject,
                    format!(
                        "Outside operating hours: restaurant is closed on {}",
                        ctx.request.slot.date_key()
                    ),
                )),
                DayHours::Open(window) if !ctx.is_within_operating_hours => Some((
                    Decision::Reject,
                    format!(
                        "Outside operating hours ({}-{})",
                        window.open.format("%H:%M"),
                        window.close.format("%H:%M")
                    ),
                )),
                DayHours::Open(_) => None,
            },

            Rule::AdvanceNotice => {
                if ctx.hours_in_advance < f64::from(settings.min_hours_in_advance) {
                    Some((
                        Decision::Reject,
                        format!(
                            "Reservations require at least {} hours notice",
                            settings.min_hours_in_advance
                        ),
                    ))
                } else if ctx.hours_in_advance > f64::from(settings.max_days_in_advance) * 24.0 {
                    Some((
                        Decision::Reject,
                        format!(
                            "Reservations can be made at most {} days in advance",
                            settings.max_days_in_advance
                        ),
                    ))
                } else {
                    None
                }
            }

            Rule::SameDay => {
                if ctx.hours_in_advance < 24.0 && !settings.allow_same_day_booking {
                    return Some((
                        Decision::Reject,
                        "Same-day reservations are not accepted".to_string(),
                    ));
                }
                let is_today = ctx.request.slot.date == ctx.now.date();
                if settings.allow_same_day_booking
                    && is_today
                    && settings.same_day_cutoff_hour < 24
                    && ctx.now.hour() >= settings.same_day_cutoff_hour
                {
                    return Some((
                        Decision::Reject,
                        format!(
                            "Same-day reservations close at {:02}:00",
                            settings.same_day_cutoff_hour
                        ),
                    ));
                }
                None
            }

            Rule::LargeParty => (settings.large_party_needs_approval
                && party_size >= settings.large_party_min_size)
                .then(|| {
                    (
                        Decision::Pending,
                        "Large party requires manager approval".to_string(),
                    )
                }),

            Rule::Deposit => (party_size >= settings.require_deposit_min_party_size).then(|| {
                (
                    Decision::Pending,
                    "Party size requires deposit confirmation".to_string(),
                )
            }),

            Rule::AutoAcceptLimit => (party_size > settings.auto_accept_max_party_size).then(|| {
                (
                    Decision::Pending,
                    "Party size exceeds auto-accept limit".to_string(),
                )
            }),

            Rule::SlotFull => (ctx.capacity.reservation_count >= settings.max_reservations_per_slot)
                .then(|| (Decision::Waitlist, "Time slot is full".to_string())),

            Rule::WaitlistThreshold => (ctx.capacity.utilization >= ctx.thresholds.auto_waitlist)
                .then(|| {
                    (
                        Decision::Waitlist,
                        "Restaurant is at capacity for this time".to_string(),
                    )
                }),

            Rule::PendingThreshold => (ctx.capacity.utilization >= ctx.thresholds.auto_pending)
                .then(|| {
                    (
                        Decision::Pending,
                        "High demand for this time, reservation requires review".to_string(),
                    )
                }),

            Rule::OverCapacity => ctx
                .capacity
                .would_exceed(party_size)
                .then(|| (Decision::Waitlist, "Would exceed capacity".to_string())),
        }
    }
}

/// 对请求运行完整级联
///
/// `confirmed` 为请求日期的已确认预订快照；`now` 为餐厅本地当前时间。
pub fn evaluate(
    request: &EvaluationRequest,
    settings: &RestaurantSettings,
    confirmed: &[Reservation],
    now: NaiveDateTime,
) -> Evaluation {
    let ctx = EvaluationContext::new(request, settings, confirmed, now);

    let (rule, decision, reason) = CASCADE
        .iter()
        .find_map(|rule| rule.check(&ctx).map(|(d, r)| (Some(*rule), d, r)))
        .unwrap_or_else(|| (None, Decision::AutoConfirm, "All requirements met".to_string()));

    tracing::debug!(
        slot = %request.slot,
        party_size = request.party_size,
        source = ?request.source,
        rule = ?rule,
        decision = ?decision,
        utilization = ctx.capacity.utilization,
        "Reservation evaluated"
    );

    Evaluation {
        decision,
        reason,
        rule,
        capacity: ctx.capacity,
        metadata: ctx.metadata(),
    }
}
