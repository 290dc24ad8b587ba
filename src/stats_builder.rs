/// Statistics aggregation module.
///
/// Folds a conversation export into per-participant counters in one forward pass
/// over the chronologically sorted messages, then derives averages for every
/// participant on the roster.
use indexmap::IndexMap;

use crate::classify;
use crate::error::ReportError;
use crate::export::{ConversationExport, MessageRecord};
use crate::stats::{ParticipantStats, Report};
use crate::timefmt;

/// Which messages count towards `sharesCount`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SharePolarity {
    /// Count messages *without* a share payload (historical report behaviour).
    #[default]
    Legacy,
    /// Count messages that carry a share payload.
    Corrected,
}

impl SharePolarity {
    fn counts(self, message: &MessageRecord) -> bool {
        match self {
            SharePolarity::Legacy => !message.is_share(),
            SharePolarity::Corrected => message.is_share(),
        }
    }
}

/// What to do with a reaction whose actor has not been seen yet.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum UnknownActorPolicy {
    /// Create an empty accumulator for the actor.
    #[default]
    Create,
    /// Fail with `ReportError::UnknownActor`.
    Reject,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct AggregatorOptions {
    pub share_polarity: SharePolarity,
    pub unknown_actors: UnknownActorPolicy,
}

/// Running per-participant accumulators for one conversation.
pub struct StatsAggregator {
    options: AggregatorOptions,
    roster: Vec<String>,
    participants: IndexMap<String, ParticipantStats>,
    skipped: usize,
}

impl StatsAggregator {
    /// Creates an aggregator with one empty accumulator per roster name.
    pub fn new(roster: Vec<String>, options: AggregatorOptions) -> Self {
        let mut participants = IndexMap::new();
        for name in &roster {
            participants
                .entry(name.clone())
                .or_insert_with(ParticipantStats::default);
        }

        Self {
            options,
            roster,
            participants,
            skipped: 0,
        }
    }

    /// Sorts the messages, folds them and derives the roster averages.
    pub fn aggregate(mut self, messages: &[MessageRecord]) -> Result<Report, ReportError> {
        let sorted = sort_chronologically(messages);

        // The previous message is positional: a skipped notice still counts as
        // the message being replied to.
        let mut previous: Option<&MessageRecord> = None;
        for &message in &sorted {
            self.record(message, previous)?;
            previous = Some(message);
        }

        self.derive();

        tracing::info!(
            "Aggregated {} messages ({} skipped) from {} to {} across {} participants",
            sorted.len(),
            self.skipped,
            timefmt::format_timestamp_opt(sorted.first().map(|m| m.timestamp_ms)),
            timefmt::format_timestamp_opt(sorted.last().map(|m| m.timestamp_ms)),
            self.participants.len()
        );

        Ok(Report {
            participants: self.participants,
        })
    }

    fn record(
        &mut self,
        message: &MessageRecord,
        previous: Option<&MessageRecord>,
    ) -> Result<(), ReportError> {
        if message
            .content
            .as_deref()
            .is_some_and(classify::is_reaction_notice)
        {
            tracing::debug!(
                "Skipping reaction notice from {} at {}",
                message.sender_name,
                message.timestamp_ms
            );
            self.skipped += 1;
            return Ok(());
        }

        // The sender's accumulator must exist before reactions are attributed,
        // since participants may react to their own messages.
        // Entries are never removed, so the index stays valid.
        let sender_index = {
            let entry = self.participants.entry(message.sender_name.clone());
            let index = entry.index();
            entry.or_insert_with(ParticipantStats::default);
            index
        };

        for reaction in message.reactions() {
            self.actor_stats(&reaction.actor, message)?.like_count += 1;
        }

        let share_polarity = self.options.share_polarity;
        let stats = &mut self.participants[sender_index];

        stats.count += 1;
        if share_polarity.counts(message) {
            stats.shares_count += 1;
        }

        if let Some(text) = message.text() {
            stats.length_sum += classify::content_length(text);
            if classify::looks_english(text) {
                stats.english_count += 1;
            }
            if classify::has_smile(text) {
                stats.smile_count += 1;
            }
        }

        if let Some(prev) = previous {
            if prev.sender_name != message.sender_name {
                stats.reaction_time_count += 1;
                // Saturate instead of overflowing on extreme timestamps
                let gap = message.timestamp_ms.saturating_sub(prev.timestamp_ms);
                stats.reaction_time_sum_ms = stats.reaction_time_sum_ms.saturating_add(gap);
            }
        }

        Ok(())
    }

    fn actor_stats(
        &mut self,
        actor: &str,
        message: &MessageRecord,
    ) -> Result<&mut ParticipantStats, ReportError> {
        if !self.participants.contains_key(actor) {
            match self.options.unknown_actors {
                UnknownActorPolicy::Reject => {
                    return Err(ReportError::UnknownActor {
                        actor: actor.to_string(),
                        sender: message.sender_name.clone(),
                        timestamp_ms: message.timestamp_ms,
                    });
                }
                UnknownActorPolicy::Create => {
                    tracing::warn!(
                        "Reaction by unknown participant '{}', creating an empty entry",
                        actor
                    );
                }
            }
        }

        Ok(self
            .participants
            .entry(actor.to_string())
            .or_insert_with(ParticipantStats::default))
    }

    fn derive(&mut self) {
        for name in &self.roster {
            let Some(stats) = self.participants.get_mut(name) else {
                continue;
            };
            stats.derive_averages();
            if stats.count == 0 {
                tracing::warn!("{} sent no messages, averages are undefined", name);
            }
        }
    }
}

/// Stable ascending sort by timestamp; equal timestamps keep their input order.
pub fn sort_chronologically(messages: &[MessageRecord]) -> Vec<&MessageRecord> {
    let mut sorted: Vec<&MessageRecord> = messages.iter().collect();
    sorted.sort_by_key(|m| m.timestamp_ms);
    sorted
}

/// Builds the participant report for a whole export.
pub fn build_report(
    export: &ConversationExport,
    options: &AggregatorOptions,
) -> Result<Report, ReportError> {
    StatsAggregator::new(export.roster(), *options).aggregate(&export.messages)
}
