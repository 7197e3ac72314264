//! ReservationManager - 预订生命周期
//!
//! 唯一修改 Reservation / WaitlistEntry 状态的地方。评估引擎与转正选择
//! 都是纯函数，由这里在写事务内提供快照。
//!
//! # Create Flow
//!
//! ```text
//! create(input)
//!     ├─ 1. 校验 / 规范化输入（不进入事务）
//!     ├─ 2. Begin write transaction
//!     ├─ 3. 读取设置 + 当日 CONFIRMED 快照
//!     ├─ 4. evaluate()
//!     ├─ 5. REJECT → abort；WAITLIST → 写候位；其余 → 写预订
//!     ├─ 6. Commit
//!     └─ 7. 通知 + 历史（提交后，失败不影响结果）
//! ```
//!
//! # Cancel Flow
//!
//! 取消与该精确时段的候位转正在同一事务内提交。取消是唯一的转正触发点。

mod error;
pub use error::*;

use chrono::NaiveDate;
use redb::WriteTransaction;
use serde::Serialize;
use shared::models::{
    Reservation, ReservationCreate, ReservationSource, ReservationStatus, ReservationUpdate,
    RestaurantSettings, Slot, WaitlistEntry, WaitlistStatus,
};
use std::sync::Arc;

use super::capacity::exact_slot_covers;
use super::evaluation::{Decision, Evaluation, EvaluationRequest, evaluate};
use super::promotion::{PromotionOutcome, select_candidate};
use super::settings::SettingsProvider;
use super::storage::{BookingStorage, RESERVATION_SEQ, StorageError, WAITLIST_SEQ};
use crate::history::{ChangeType, HistoryActor, HistoryEntry, HistoryRecord, HistoryService};
use crate::notify::{Notification, NotificationKind, NotificationService};
use crate::utils::time::{Clock, parse_date, parse_time};
use crate::utils::validation::{
    GuestContact, normalize_contact, normalize_email, normalize_name, normalize_notes,
    normalize_phone, validate_party_size,
};
use crate::utils::{AppError, AppResult};

/// cancel token 冲突时的重试次数
const MAX_TOKEN_ATTEMPTS: usize = 5;

/// `create` 的结果；REJECT 是正常业务结果而不是错误
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum CreateOutcome {
    Reservation {
        reservation: Reservation,
        evaluation: Evaluation,
    },
    Waitlisted {
        entry: WaitlistEntry,
        evaluation: Evaluation,
    },
    Rejected {
        evaluation: Evaluation,
    },
}

impl CreateOutcome {
    pub fn evaluation(&self) -> &Evaluation {
        match self {
            CreateOutcome::Reservation { evaluation, .. }
            | CreateOutcome::Waitlisted { evaluation, .. }
            | CreateOutcome::Rejected { evaluation } => evaluation,
        }
    }

    pub fn decision(&self) -> Decision {
        self.evaluation().decision
    }
}

/// 取消结果（含同事务内的转正尝试）
#[derive(Debug, Clone, Serialize)]
pub struct CancelOutcome {
    pub reservation: Reservation,
    pub promotion: PromotionOutcome,
}

/// 员工状态变更结果；只有转为 CANCELLED 时才有转正尝试
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub reservation: Reservation,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub promotion: Option<PromotionOutcome>,
}

/// 提交后才派发的副作用
#[derive(Default)]
struct Effects {
    notifications: Vec<Notification>,
    history: Vec<HistoryRecord>,
}

impl Effects {
    fn notify(&mut self, notification: Option<Notification>) {
        self.notifications.extend(notification);
    }

    fn record(&mut self, record: HistoryRecord) {
        self.history.push(record);
    }
}

/// 已校验的创建请求
struct ValidatedCreate {
    contact: GuestContact,
    slot: Slot,
    party_size: u32,
    source: ReservationSource,
    notes: Option<String>,
}

fn validate_create(input: ReservationCreate) -> AppResult<ValidatedCreate> {
    let date = parse_date(&input.date)?;
    let time = parse_time(&input.time)?;
    validate_party_size(input.party_size)?;
    let contact = normalize_contact(&input.guest_name, input.guest_email, input.guest_phone)?;

    Ok(ValidatedCreate {
        contact,
        slot: Slot::new(date, time),
        party_size: input.party_size,
        source: input.source.unwrap_or_default(),
        notes: normalize_notes(input.notes)?,
    })
}

/// 把客人的修改应用到当前预订上（只校验，不改状态）
fn apply_update(current: &Reservation, patch: ReservationUpdate) -> AppResult<Reservation> {
    let mut next = current.clone();
    if let Some(name) = patch.guest_name {
        next.guest_name = normalize_name(&name)?;
    }
    if patch.guest_email.is_some() {
        next.guest_email = normalize_email(patch.guest_email)?;
    }
    if patch.guest_phone.is_some() {
        next.guest_phone = normalize_phone(patch.guest_phone)?;
    }
    if let Some(date) = patch.date {
        next.date = parse_date(&date)?;
    }
    if let Some(time) = patch.time {
        next.time = parse_time(&time)?;
    }
    if let Some(party_size) = patch.party_size {
        validate_party_size(party_size)?;
        next.party_size = party_size;
    }
    if patch.notes.is_some() {
        next.notes = normalize_notes(patch.notes)?;
    }
    Ok(next)
}

fn promotion_note(entry: &WaitlistEntry) -> String {
    match &entry.notes {
        Some(notes) => format!("Promoted from waitlist (entry #{}). {}", entry.id, notes),
        None => format!("Promoted from waitlist (entry #{})", entry.id),
    }
}

/// Reservation lifecycle manager
#[derive(Clone)]
pub struct ReservationManager {
    storage: BookingStorage,
    settings: SettingsProvider,
    clock: Arc<dyn Clock>,
    notifications: NotificationService,
    history: HistoryService,
}

impl std::fmt::Debug for ReservationManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReservationManager")
            .field("storage", &"<BookingStorage>")
            .field("restaurant_id", &self.settings.restaurant_id())
            .field("now", &self.clock.now_local())
            .finish()
    }
}

impl ReservationManager {
    pub fn new(
        storage: BookingStorage,
        settings: SettingsProvider,
        clock: Arc<dyn Clock>,
        notifications: NotificationService,
        history: HistoryService,
    ) -> Self {
        Self {
            storage,
            settings,
            clock,
            notifications,
            history,
        }
    }

    pub fn settings(&self) -> &SettingsProvider {
        &self.settings
    }

    pub fn storage(&self) -> &BookingStorage {
        &self.storage
    }

    fn dispatch(&self, effects: Effects) {
        for notification in effects.notifications {
            self.notifications.notify(Some(notification));
        }
        for record in effects.history {
            self.history.log(record);
        }
    }

    fn unique_token_txn(&self, txn: &WriteTransaction) -> ManagerResult<String> {
        for _ in 0..MAX_TOKEN_ATTEMPTS {
            let token = shared::util::new_cancel_token();
            if !self.storage.token_exists_txn(txn, &token)? {
                return Ok(token);
            }
            tracing::warn!("Cancel token collision, regenerating");
        }
        Err(AppError::internal("Failed to generate a unique cancel token").into())
    }

    // ========== Evaluation ==========

    /// 只评估不落库（前端可用性预检）
    pub fn check_availability(
        &self,
        date: &str,
        time: &str,
        party_size: u32,
    ) -> ManagerResult<Evaluation> {
        let slot = Slot::new(parse_date(date)?, parse_time(time)?);
        validate_party_size(party_size)?;

        let settings = self.settings.get()?;
        let mut confirmed = self.storage.list_reservations_by_date(slot.date)?;
        confirmed.retain(Reservation::holds_capacity);

        let request = EvaluationRequest {
            slot,
            party_size,
            source: ReservationSource::Web,
        };
        Ok(evaluate(&request, &settings, &confirmed, self.clock.now_local()))
    }

    // ========== Create ==========

    /// 创建预订：评估后写入预订或候位
    pub fn create(
        &self,
        input: ReservationCreate,
        actor: HistoryActor,
    ) -> ManagerResult<CreateOutcome> {
        let req = validate_create(input)?;
        let now_local = self.clock.now_local();
        let now = self.clock.now_millis();
        let mut effects = Effects::default();

        let txn = self.storage.begin_write()?;
        let settings = self.settings.get_txn(&txn)?;
        let confirmed = self.storage.find_confirmed_by_date_txn(&txn, req.slot.date)?;

        let request = EvaluationRequest {
            slot: req.slot,
            party_size: req.party_size,
            source: req.source,
        };
        let evaluation = evaluate(&request, &settings, &confirmed, now_local);

        let outcome = match evaluation.decision {
            Decision::Reject => {
                txn.abort().map_err(StorageError::from)?;
                tracing::info!(
                    slot = %req.slot,
                    party_size = req.party_size,
                    reason = %evaluation.reason,
                    "Reservation request rejected"
                );
                return Ok(CreateOutcome::Rejected { evaluation });
            }

            Decision::Waitlist => {
                let entry = WaitlistEntry {
                    id: self.storage.next_id_txn(&txn, WAITLIST_SEQ)?,
                    guest_name: req.contact.name,
                    guest_email: req.contact.email,
                    guest_phone: req.contact.phone,
                    date: req.slot.date,
                    time: req.slot.time,
                    party_size: req.party_size,
                    status: WaitlistStatus::Waiting,
                    notes: req.notes,
                    linked_reservation_id: None,
                    created_at: now,
                    promoted_at: None,
                    updated_at: now,
                };
                self.storage.store_waitlist_entry_txn(&txn, &entry)?;

                effects.notify(Notification::for_waitlist(&entry, Some(evaluation.reason.clone())));
                effects.record(
                    HistoryRecord::waitlist(entry.id, actor, ChangeType::Waitlisted)
                        .with_after(&entry)
                        .with_note(evaluation.reason.clone()),
                );
                CreateOutcome::Waitlisted { entry, evaluation }
            }

            Decision::AutoConfirm | Decision::Pending => {
                let status = if evaluation.decision == Decision::AutoConfirm {
                    ReservationStatus::Confirmed
                } else {
                    ReservationStatus::Pending
                };
                let reservation = Reservation {
                    id: self.storage.next_id_txn(&txn, RESERVATION_SEQ)?,
                    guest_name: req.contact.name,
                    guest_email: req.contact.email,
                    guest_phone: req.contact.phone,
                    date: req.slot.date,
                    time: req.slot.time,
                    party_size: req.party_size,
                    status,
                    source: req.source,
                    notes: req.notes,
                    cancel_token: self.unique_token_txn(&txn)?,
                    created_at: now,
                    updated_at: now,
                };
                self.storage.store_reservation_txn(&txn, &reservation)?;

                effects.record(
                    HistoryRecord::reservation(reservation.id, actor, ChangeType::Created)
                        .with_after(&reservation)
                        .with_note(evaluation.reason.clone()),
                );
                if status == ReservationStatus::Confirmed {
                    effects.record(
                        HistoryRecord::reservation(
                            reservation.id,
                            HistoryActor::System,
                            ChangeType::Confirmed,
                        )
                        .with_note("Auto-confirmed"),
                    );
                    effects.notify(Notification::for_reservation(
                        NotificationKind::Confirmation,
                        &reservation,
                        None,
                    ));
                } else {
                    effects.notify(Notification::for_reservation(
                        NotificationKind::Pending,
                        &reservation,
                        Some(evaluation.reason.clone()),
                    ));
                }
                CreateOutcome::Reservation {
                    reservation,
                    evaluation,
                }
            }
        };

        txn.commit().map_err(StorageError::from)?;

        match &outcome {
            CreateOutcome::Reservation { reservation, evaluation } => tracing::info!(
                reservation_id = reservation.id,
                slot = %reservation.slot(),
                party_size = reservation.party_size,
                status = ?reservation.status,
                reason = %evaluation.reason,
                "Reservation created"
            ),
            CreateOutcome::Waitlisted { entry, evaluation } => tracing::info!(
                waitlist_entry_id = entry.id,
                slot = %entry.slot(),
                party_size = entry.party_size,
                reason = %evaluation.reason,
                "Request added to waitlist"
            ),
            CreateOutcome::Rejected { .. } => {}
        }

        self.dispatch(effects);
        Ok(outcome)
    }

    // ========== Cancel ==========

    /// 员工取消
    pub fn cancel(&self, id: i64, actor: HistoryActor) -> ManagerResult<CancelOutcome> {
        let mut effects = Effects::default();
        let txn = self.storage.begin_write()?;
        let reservation = self
            .storage
            .get_reservation_txn(&txn, id)?
            .ok_or(ManagerError::ReservationNotFound(id))?;

        let (reservation, promotion) = self.cancel_in_txn(&txn, reservation, actor, &mut effects)?;
        txn.commit().map_err(StorageError::from)?;

        self.dispatch(effects);
        Ok(CancelOutcome {
            reservation,
            promotion,
        })
    }

    /// 客人凭 token 取消
    pub fn cancel_by_token(&self, token: &str) -> ManagerResult<CancelOutcome> {
        let mut effects = Effects::default();
        let txn = self.storage.begin_write()?;
        let reservation = self
            .storage
            .get_reservation_by_token_txn(&txn, token)?
            .ok_or(ManagerError::TokenNotFound)?;

        let (reservation, promotion) =
            self.cancel_in_txn(&txn, reservation, HistoryActor::Guest, &mut effects)?;
        txn.commit().map_err(StorageError::from)?;

        self.dispatch(effects);
        Ok(CancelOutcome {
            reservation,
            promotion,
        })
    }

    /// 置为 CANCELLED 并对原精确时段做一次转正尝试
    fn cancel_in_txn(
        &self,
        txn: &WriteTransaction,
        reservation: Reservation,
        actor: HistoryActor,
        effects: &mut Effects,
    ) -> ManagerResult<(Reservation, PromotionOutcome)> {
        match reservation.status {
            ReservationStatus::Cancelled => {
                return Err(ManagerError::AlreadyCancelled(reservation.id));
            }
            from if !from.can_transition_to(ReservationStatus::Cancelled) => {
                return Err(ManagerError::InvalidTransition {
                    from,
                    to: ReservationStatus::Cancelled,
                });
            }
            _ => {}
        }

        let before = reservation.clone();
        let mut cancelled = reservation;
        cancelled.status = ReservationStatus::Cancelled;
        cancelled.updated_at = self.clock.now_millis();
        self.storage.store_reservation_txn(txn, &cancelled)?;

        tracing::info!(
            reservation_id = cancelled.id,
            slot = %cancelled.slot(),
            actor = ?actor,
            previous_status = ?before.status,
            "Reservation cancelled"
        );
        effects.record(
            HistoryRecord::reservation(cancelled.id, actor, ChangeType::Cancelled)
                .with_before(&before)
                .with_after(&cancelled),
        );
        effects.notify(Notification::for_reservation(
            NotificationKind::Cancelled,
            &cancelled,
            None,
        ));

        let settings = self.settings.get_txn(txn)?;
        let promotion = self.promote_in_txn(txn, cancelled.slot(), &settings, effects)?;
        Ok((cancelled, promotion))
    }

    // ========== Guest self-service ==========

    /// 客人凭 token 修改；有任何改动时状态重置为 PENDING，等待重新审核
    pub fn update_by_token(
        &self,
        token: &str,
        patch: ReservationUpdate,
    ) -> ManagerResult<Reservation> {
        let mut effects = Effects::default();
        let txn = self.storage.begin_write()?;
        let current = self
            .storage
            .get_reservation_by_token_txn(&txn, token)?
            .ok_or(ManagerError::TokenNotFound)?;

        match current.status {
            ReservationStatus::Cancelled => {
                return Err(ManagerError::AlreadyCancelled(current.id));
            }
            from if from.is_terminal() => {
                return Err(ManagerError::InvalidTransition {
                    from,
                    to: ReservationStatus::Pending,
                });
            }
            _ => {}
        }

        let mut updated = apply_update(&current, patch)?;
        if updated == current {
            txn.abort().map_err(StorageError::from)?;
            tracing::debug!(reservation_id = current.id, "Guest update changed nothing");
            return Ok(current);
        }

        // 改了时段或人数：重新检查营业时间与预订窗口
        if updated.slot() != current.slot() || updated.party_size != current.party_size {
            let settings = self.settings.get_txn(&txn)?;
            let mut confirmed = self.storage.find_confirmed_by_date_txn(&txn, updated.date)?;
            confirmed.retain(|r| r.id != current.id);
            let request = EvaluationRequest {
                slot: updated.slot(),
                party_size: updated.party_size,
                source: current.source,
            };
            let evaluation = evaluate(&request, &settings, &confirmed, self.clock.now_local());
            if evaluation.is_reject() {
                txn.abort().map_err(StorageError::from)?;
                return Err(ManagerError::Rejected(evaluation.reason));
            }
        }

        updated.status = ReservationStatus::Pending;
        updated.updated_at = self.clock.now_millis();
        self.storage.store_reservation_txn(&txn, &updated)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            reservation_id = updated.id,
            slot = %updated.slot(),
            previous_status = ?current.status,
            "Reservation updated by guest, awaiting review"
        );
        effects.record(
            HistoryRecord::reservation(updated.id, HistoryActor::Guest, ChangeType::Updated)
                .with_before(&current)
                .with_after(&updated)
                .with_note("Guest edit, status reset to PENDING"),
        );
        effects.notify(Notification::for_reservation(
            NotificationKind::Updated,
            &updated,
            None,
        ));
        self.dispatch(effects);
        Ok(updated)
    }

    // ========== Staff status changes ==========

    /// 员工变更状态；转为 CANCELLED 时与 `cancel` 相同（含转正）
    pub fn update_status(
        &self,
        id: i64,
        status: ReservationStatus,
        actor: HistoryActor,
    ) -> ManagerResult<StatusChange> {
        let mut effects = Effects::default();
        let txn = self.storage.begin_write()?;
        let current = self
            .storage
            .get_reservation_txn(&txn, id)?
            .ok_or(ManagerError::ReservationNotFound(id))?;

        if status == ReservationStatus::Cancelled {
            let (reservation, promotion) = self.cancel_in_txn(&txn, current, actor, &mut effects)?;
            txn.commit().map_err(StorageError::from)?;
            self.dispatch(effects);
            return Ok(StatusChange {
                reservation,
                promotion: Some(promotion),
            });
        }

        if !current.status.can_transition_to(status) {
            return Err(ManagerError::InvalidTransition {
                from: current.status,
                to: status,
            });
        }

        let mut updated = current.clone();
        updated.status = status;
        updated.updated_at = self.clock.now_millis();
        self.storage.store_reservation_txn(&txn, &updated)?;
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(
            reservation_id = id,
            from = ?current.status,
            to = ?status,
            actor = ?actor,
            "Reservation status changed"
        );
        let change_type = if status == ReservationStatus::Confirmed {
            ChangeType::Confirmed
        } else {
            ChangeType::StatusChanged
        };
        effects.record(
            HistoryRecord::reservation(id, actor, change_type)
                .with_before(&current)
                .with_after(&updated),
        );
        if status == ReservationStatus::Confirmed {
            effects.notify(Notification::for_reservation(
                NotificationKind::Confirmation,
                &updated,
                None,
            ));
        }
        self.dispatch(effects);

        Ok(StatusChange {
            reservation: updated,
            promotion: None,
        })
    }

    // ========== Waitlist ==========

    /// 对某精确时段做一次转正尝试（独立事务）
    pub fn try_promote_next(&self, slot: Slot) -> ManagerResult<PromotionOutcome> {
        let mut effects = Effects::default();
        let txn = self.storage.begin_write()?;
        let settings = self.settings.get_txn(&txn)?;
        let outcome = self.promote_in_txn(&txn, slot, &settings, &mut effects)?;

        if outcome.promoted {
            txn.commit().map_err(StorageError::from)?;
            self.dispatch(effects);
        } else {
            txn.abort().map_err(StorageError::from)?;
        }
        Ok(outcome)
    }

    /// FIFO first-fit：最多转正一个候位
    fn promote_in_txn(
        &self,
        txn: &WriteTransaction,
        slot: Slot,
        settings: &RestaurantSettings,
        effects: &mut Effects,
    ) -> ManagerResult<PromotionOutcome> {
        let waiting = self.storage.find_waiting_txn(txn, slot)?;
        if waiting.is_empty() {
            return Ok(PromotionOutcome::none());
        }

        let confirmed = self.storage.find_confirmed_by_date_txn(txn, slot.date)?;
        let current_covers = exact_slot_covers(&confirmed, slot);
        let max_covers = settings.max_covers_per_slot();

        let Some(candidate) = select_candidate(&waiting, current_covers, max_covers).cloned() else {
            tracing::debug!(
                slot = %slot,
                waiting = waiting.len(),
                current_covers,
                max_covers,
                "No waitlist entry fits the freed slot"
            );
            return Ok(PromotionOutcome::none());
        };

        let now = self.clock.now_millis();
        let reservation = Reservation {
            id: self.storage.next_id_txn(txn, RESERVATION_SEQ)?,
            guest_name: candidate.guest_name.clone(),
            guest_email: candidate.guest_email.clone(),
            guest_phone: candidate.guest_phone.clone(),
            date: candidate.date,
            time: candidate.time,
            party_size: candidate.party_size,
            status: ReservationStatus::Confirmed,
            source: ReservationSource::InHouse,
            notes: Some(promotion_note(&candidate)),
            cancel_token: self.unique_token_txn(txn)?,
            created_at: now,
            updated_at: now,
        };
        self.storage.store_reservation_txn(txn, &reservation)?;

        let before = candidate.clone();
        let mut entry = candidate;
        entry.status = WaitlistStatus::Promoted;
        entry.linked_reservation_id = Some(reservation.id);
        entry.promoted_at = Some(now);
        entry.updated_at = now;
        self.storage.store_waitlist_entry_txn(txn, &entry)?;

        tracing::info!(
            waitlist_entry_id = entry.id,
            reservation_id = reservation.id,
            slot = %slot,
            party_size = entry.party_size,
            current_covers,
            max_covers,
            "Waitlist entry promoted"
        );
        effects.record(
            HistoryRecord::reservation(reservation.id, HistoryActor::System, ChangeType::Promoted)
                .with_after(&reservation)
                .with_note(format!("Promoted from waitlist entry #{}", entry.id)),
        );
        effects.record(
            HistoryRecord::waitlist(entry.id, HistoryActor::System, ChangeType::Promoted)
                .with_before(&before)
                .with_after(&entry)
                .with_note(format!("Promoted to reservation #{}", reservation.id)),
        );
        effects.notify(Notification::for_promotion(&entry, &reservation));

        Ok(PromotionOutcome::promoted(reservation, entry))
    }

    /// 把日期早于餐厅本地「今天」的 WAITING 候位标记为 EXPIRED
    pub fn expire_old_entries(&self) -> ManagerResult<usize> {
        let today = self.clock.today();
        let now = self.clock.now_millis();
        let mut effects = Effects::default();

        let txn = self.storage.begin_write()?;
        let stale = self.storage.find_waiting_before_txn(&txn, today)?;
        if stale.is_empty() {
            txn.abort().map_err(StorageError::from)?;
            return Ok(0);
        }

        for mut entry in stale.iter().cloned() {
            entry.status = WaitlistStatus::Expired;
            entry.updated_at = now;
            self.storage.store_waitlist_entry_txn(&txn, &entry)?;
            effects.record(
                HistoryRecord::waitlist(entry.id, HistoryActor::System, ChangeType::Expired)
                    .with_note(format!("Waitlist date {} has passed", entry.slot().date_key())),
            );
        }
        txn.commit().map_err(StorageError::from)?;

        tracing::info!(count = stale.len(), today = %today, "Expired stale waitlist entries");
        self.dispatch(effects);
        Ok(stale.len())
    }

    // ========== Queries ==========

    pub fn get(&self, id: i64) -> ManagerResult<Reservation> {
        self.storage
            .get_reservation(id)?
            .ok_or(ManagerError::ReservationNotFound(id))
    }

    pub fn get_by_token(&self, token: &str) -> ManagerResult<Reservation> {
        self.storage
            .get_reservation_by_token(token)?
            .ok_or(ManagerError::TokenNotFound)
    }

    pub fn list_by_date(&self, date: NaiveDate) -> ManagerResult<Vec<Reservation>> {
        Ok(self.storage.list_reservations_by_date(date)?)
    }

    pub fn get_waitlist_entry(&self, id: i64) -> ManagerResult<WaitlistEntry> {
        self.storage
            .get_waitlist_entry(id)?
            .ok_or(ManagerError::WaitlistEntryNotFound(id))
    }

    pub fn list_waitlist(&self, date: Option<NaiveDate>) -> ManagerResult<Vec<WaitlistEntry>> {
        Ok(self.storage.list_waitlist(date)?)
    }

    /// 已写入的历史（异步写入，刚发生的变更可能尚未出现）
    pub fn history(&self, reservation_id: i64) -> ManagerResult<Vec<HistoryEntry>> {
        Ok(self.history.query_reservation(reservation_id)?)
    }
}

#[cfg(test)]
mod tests;
