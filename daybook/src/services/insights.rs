//! Derived views over entries: mood summary, calendar marks, timeline and
//! writing streak.

use crate::config::{MAX_MOOD, MIN_MOOD};
use crate::database::{Entry, Repository};
use crate::error::Result;
use chrono::{Days, NaiveDate};
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};

/// Number of points shown in the recent moods list
const RECENT_MOODS: usize = 7;

/// Characters stripped from entry previews
const PREVIEW_MARKUP: [char; 4] = ['#', '*', '[', ']'];
const PREVIEW_LENGTH: usize = 100;

/// One mood data point
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodPoint {
    pub date: NaiveDate,
    pub mood: i64,
    pub mood_emoji: String,
    pub entry_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MoodSummary {
    /// Every mood point, oldest first
    pub points: Vec<MoodPoint>,
    /// Mean mood rounded to one decimal
    pub average: Option<f64>,
    /// Count per mood, index 0 is mood 1
    pub distribution: [usize; 5],
    /// Last seven points, newest first
    pub recent: Vec<MoodPoint>,
}

/// Entries sharing a date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TimelineDay {
    pub date: NaiveDate,
    pub entries: Vec<Entry>,
}

/// Summarize entries that carry both a mood and an emoji
pub fn summarize_moods(entries: &[Entry]) -> MoodSummary {
    let mut points: Vec<MoodPoint> = entries
        .iter()
        .filter_map(|e| match (e.mood, &e.mood_emoji) {
            (Some(mood), Some(emoji)) => Some(MoodPoint {
                date: e.date,
                mood,
                mood_emoji: emoji.clone(),
                entry_id: e.id.clone(),
            }),
            _ => None,
        })
        .collect();
    points.sort_by_key(|p| p.date);

    let average = (!points.is_empty()).then(|| {
        let sum: i64 = points.iter().map(|p| p.mood).sum();
        let mean = sum as f64 / points.len() as f64;
        (mean * 10.0).round() / 10.0
    });

    let mut distribution = [0usize; 5];
    for point in &points {
        if (MIN_MOOD..=MAX_MOOD).contains(&point.mood) {
            distribution[(point.mood - MIN_MOOD) as usize] += 1;
        }
    }

    let recent = points.iter().rev().take(RECENT_MOODS).cloned().collect();

    MoodSummary {
        points,
        average,
        distribution,
        recent,
    }
}

/// Entry count per date
pub fn mark_dates(entries: &[Entry]) -> BTreeMap<NaiveDate, usize> {
    let mut marked = BTreeMap::new();
    for entry in entries {
        *marked.entry(entry.date).or_insert(0) += 1;
    }
    marked
}

/// Group entries by date, newest date first, keeping their order within a day
pub fn group_by_date(entries: &[Entry]) -> Vec<TimelineDay> {
    let mut grouped: BTreeMap<NaiveDate, Vec<Entry>> = BTreeMap::new();
    for entry in entries {
        grouped.entry(entry.date).or_default().push(entry.clone());
    }

    grouped
        .into_iter()
        .rev()
        .map(|(date, entries)| TimelineDay { date, entries })
        .collect()
}

/// Consecutive days ending `today` with at least one entry
pub fn streak_ending(entries: &[Entry], today: NaiveDate) -> u32 {
    let dates: HashSet<NaiveDate> = entries.iter().map(|e| e.date).collect();

    let mut streak = 0;
    let mut day = today;
    while dates.contains(&day) {
        streak += 1;
        match day.checked_sub_days(Days::new(1)) {
            Some(previous) => day = previous,
            None => break,
        }
    }
    streak
}

/// "Today", "Yesterday" or a long date
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    if date == today {
        "Today".to_string()
    } else if today.checked_sub_days(Days::new(1)) == Some(date) {
        "Yesterday".to_string()
    } else {
        date.format("%B %-d, %Y").to_string()
    }
}

/// First hundred characters of content with markdown markers removed
pub fn preview(content: &str) -> String {
    content
        .chars()
        .filter(|c| !PREVIEW_MARKUP.contains(c))
        .take(PREVIEW_LENGTH)
        .collect()
}

/// Service computing entry insights
#[derive(Clone)]
pub struct InsightsService {
    repo: Repository,
}

impl InsightsService {
    pub fn new(repo: Repository) -> Self {
        Self { repo }
    }

    pub async fn mood_summary(&self) -> Result<MoodSummary> {
        Ok(summarize_moods(&self.repo.list_entries().await?))
    }

    pub async fn marked_dates(&self) -> Result<BTreeMap<NaiveDate, usize>> {
        Ok(mark_dates(&self.repo.list_entries().await?))
    }

    pub async fn timeline(&self) -> Result<Vec<TimelineDay>> {
        Ok(group_by_date(&self.repo.list_entries().await?))
    }

    pub async fn writing_streak(&self, today: NaiveDate) -> Result<u32> {
        Ok(streak_ending(&self.repo.list_entries().await?, today))
    }
}
