//! Recurrence Engine
//!
//! Occurrence computation for subscription schedules, and materialization of
//! recurring-transaction templates into concrete transactions once they come
//! due.

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use crate::commands::Api;
use crate::error::{ApiError, ApiResult, FieldError};
use crate::models::{
    Ends, Frequency, RecurringPatch, RecurringTransaction, SubscriptionTerms, Transaction,
    TransactionDraft, TransactionStatus,
};

/// Upper bound on occurrences materialized for one template in one run
const MAX_CATCH_UP: u32 = 366;

impl Frequency {
    /// `date` moved forward by `steps` units; month and year steps clamp to
    /// the last day of shorter months
    pub fn advance(self, date: NaiveDate, steps: u32) -> Option<NaiveDate> {
        match self {
            Frequency::Daily => date.checked_add_days(Days::new(u64::from(steps))),
            Frequency::Weekly => date.checked_add_days(Days::new(u64::from(steps) * 7)),
            Frequency::Monthly => date.checked_add_months(Months::new(steps)),
            Frequency::Yearly => date.checked_add_months(Months::new(steps.checked_mul(12)?)),
        }
    }
}

/// When a schedule stops producing occurrences
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleEnd {
    Never,
    AfterOccurrences(u32),
    OnDate(NaiveDate),
}

/// A validated subscription schedule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Schedule {
    pub frequency: Frequency,
    pub every: u32,
    /// Weekly only; empty means "same weekday as the start"
    pub weekdays: Vec<Weekday>,
    pub starts_on: NaiveDate,
    pub end: ScheduleEnd,
}

impl Schedule {
    /// Build from stored subscription columns
    ///
    /// Returns `None` when the terms carry no repetition. `fallback_start` is
    /// used when `starts_on` is absent (usually the transaction date).
    pub fn from_terms(terms: &SubscriptionTerms, fallback_start: NaiveDate) -> ApiResult<Option<Self>> {
        let Some(frequency) = terms.repeats else {
            return Ok(None);
        };
        let mut errors = Vec::new();

        let every = terms.repeats_every.unwrap_or(1);
        if every == 0 {
            errors.push(FieldError::new("repeats_every", "Must repeat at least every 1 period"));
        }

        let mut weekdays = Vec::new();
        if frequency == Frequency::Weekly {
            for name in terms.repeats_on.iter().flatten() {
                match name.parse::<Weekday>() {
                    Ok(day) => weekdays.push(day),
                    Err(_) => errors.push(FieldError::new(
                        "repeats_on",
                        format!("Unknown weekday {name:?}"),
                    )),
                }
            }
            weekdays.sort_by_key(Weekday::num_days_from_sunday);
            weekdays.dedup();
        }

        let end = match terms.ends.unwrap_or(Ends::Never) {
            Ends::Never => ScheduleEnd::Never,
            Ends::After => match terms.ends_after_occurrences {
                Some(count) if count > 0 => ScheduleEnd::AfterOccurrences(count),
                _ => {
                    errors.push(FieldError::new(
                        "ends_after_occurrences",
                        "Number of occurrences is required",
                    ));
                    ScheduleEnd::Never
                }
            },
            Ends::OnDate => match terms.ends_on_date {
                Some(date) => ScheduleEnd::OnDate(date),
                None => {
                    errors.push(FieldError::new("ends_on_date", "End date is required"));
                    ScheduleEnd::Never
                }
            },
        };

        if !errors.is_empty() {
            return Err(ApiError::Validation(errors));
        }
        Ok(Some(Self {
            frequency,
            every,
            weekdays,
            starts_on: terms.starts_on.unwrap_or(fallback_start),
            end,
        }))
    }

    /// Every occurrence in ascending order, honoring the end policy
    pub fn occurrences(&self) -> impl Iterator<Item = NaiveDate> + '_ {
        let limit = match self.end {
            ScheduleEnd::AfterOccurrences(count) => count as usize,
            _ => usize::MAX,
        };
        let last = match self.end {
            ScheduleEnd::OnDate(date) => Some(date),
            _ => None,
        };

        (0u32..)
            .map_while(move |period| self.period_dates(period))
            .flatten()
            .filter(move |date| *date >= self.starts_on)
            .take(limit)
            .take_while(move |date| last.map_or(true, |last| *date <= last))
    }

    /// Occurrences within `from..=to`
    pub fn occurrences_between(&self, from: NaiveDate, to: NaiveDate) -> Vec<NaiveDate> {
        self.occurrences()
            .skip_while(|date| *date < from)
            .take_while(|date| *date <= to)
            .collect()
    }

    /// First occurrence on or after `date`, if the schedule has not ended
    pub fn next_on_or_after(&self, date: NaiveDate) -> Option<NaiveDate> {
        self.occurrences().find(|occurrence| *occurrence >= date)
    }

    /// Candidate dates of the `period`-th repetition; `None` past the
    /// representable date range
    fn period_dates(&self, period: u32) -> Option<Vec<NaiveDate>> {
        let steps = period.checked_mul(self.every)?;
        if self.frequency != Frequency::Weekly || self.weekdays.is_empty() {
            return self.frequency.advance(self.starts_on, steps).map(|date| vec![date]);
        }

        let offset = u64::from(self.starts_on.weekday().num_days_from_sunday());
        let week_start = self
            .starts_on
            .checked_sub_days(Days::new(offset))?
            .checked_add_days(Days::new(u64::from(steps) * 7))?;
        self.weekdays
            .iter()
            .map(|day| week_start.checked_add_days(Days::new(u64::from(day.num_days_from_sunday()))))
            .collect()
    }
}

impl Transaction {
    /// The subscription schedule stored on this transaction, if any
    pub fn schedule(&self) -> ApiResult<Option<Schedule>> {
        Schedule::from_terms(&self.schedule, self.transaction_date)
    }
}

fn draft_for(template: &RecurringTransaction, date: NaiveDate) -> TransactionDraft {
    let mut draft = TransactionDraft::new(template.kind, template.amount, &template.description, date)
        .status(TransactionStatus::Completed);
    draft.from_account_id = template.from_account_id.clone();
    draft.to_account_id = template.to_account_id.clone();
    draft.category_id = template.category_id.clone();
    draft.recurring_transaction_id = Some(template.id.clone());
    draft
}

/// Create the transactions of every active template whose `next_date` has
/// come, then move each template forward
///
/// Missed periods are caught up one transaction per period. A template whose
/// next date lies past its `end_date` is deactivated.
pub async fn materialize_due(api: &Api, today: NaiveDate) -> ApiResult<Vec<Transaction>> {
    let mut created = Vec::new();
    for template in api.get_recurring_transactions().await? {
        if template.is_due(today) {
            materialize_template(api, &template, today, &mut created).await?;
        }
    }
    tracing::info!(count = created.len(), %today, "materialized recurring transactions");
    Ok(created)
}

async fn materialize_template(
    api: &Api,
    template: &RecurringTransaction,
    today: NaiveDate,
    created: &mut Vec<Transaction>,
) -> ApiResult<()> {
    // Periods are stepped from a fixed anchor so month-end clamping does not
    // carry over into later months
    let anchor = template.next_date;
    let mut next = anchor;
    let mut produced: u32 = 0;
    let mut failure = None;

    while next <= today && !template.is_expired(next) && produced < MAX_CATCH_UP {
        match api.create_transaction(&draft_for(template, next)).await {
            Ok(transaction) => created.push(transaction),
            Err(err) => {
                failure = Some(err);
                break;
            }
        }
        produced += 1;
        match template.frequency.advance(anchor, produced) {
            Some(date) => next = date,
            None => {
                failure = Some(ApiError::Validation(vec![FieldError::new(
                    "next_date",
                    "Next date is out of range",
                )]));
                break;
            }
        }
    }

    // Persist progress even when a later period failed
    if next != template.next_date {
        let patch = RecurringPatch {
            next_date: Some(next),
            is_active: template.is_expired(next).then_some(false),
            ..RecurringPatch::default()
        };
        api.update_recurring_transaction(&template.id, &patch).await?;
        tracing::debug!(template = %template.id, %next, produced, "advanced recurring template");
    }

    match failure {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
