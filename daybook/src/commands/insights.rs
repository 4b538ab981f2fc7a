//! Calendar, timeline, mood, streak, stats and export commands

use crate::app::AppState;
use crate::database::mood_label;
use crate::error::Result;
use crate::services::insights::{date_label, preview};
use chrono::{DateTime, Local, TimeZone};

pub async fn calendar(state: &AppState) -> Result<()> {
    let marked = state.insights.marked_dates().await?;
    if marked.is_empty() {
        println!("No entries");
        return Ok(());
    }

    for (date, count) in marked {
        println!("{}  {}", date, count);
    }
    Ok(())
}

pub async fn timeline(state: &AppState) -> Result<()> {
    let today = Local::now().date_naive();

    for day in state.insights.timeline().await? {
        println!("{}", date_label(day.date, today));
        for entry in &day.entries {
            println!(
                "  {} {}  {}",
                entry.mood_emoji.as_deref().unwrap_or("-"),
                entry.title,
                preview(&entry.content)
            );
        }
        println!();
    }
    Ok(())
}

pub async fn mood(state: &AppState) -> Result<()> {
    let summary = state.insights.mood_summary().await?;

    let Some(average) = summary.average else {
        println!("No moods recorded yet");
        return Ok(());
    };

    println!("Average mood: {:.1}", average);
    println!();
    for (index, count) in summary.distribution.iter().enumerate() {
        let mood = index as i64 + 1;
        println!("{:<11} {}", mood_label(mood).unwrap_or_default(), count);
    }

    println!();
    println!("Recent:");
    for point in &summary.recent {
        println!("  {}  {}", point.date, point.mood_emoji);
    }
    Ok(())
}

pub async fn streak(state: &AppState) -> Result<()> {
    let days = state
        .insights
        .writing_streak(Local::now().date_naive())
        .await?;
    println!("{} day streak", days);
    Ok(())
}

pub async fn stats(state: &AppState) -> Result<()> {
    let stats = state.stats.get_stats().await?;
    let coins = state.stats.get_coin_breakdown().await?;

    println!("Games played:  {}", stats.games_played);
    println!("Games won:     {}", stats.games_won);
    println!("Highest score: {}", stats.highest_score);
    println!("Total score:   {}", stats.total_score);
    println!();
    println!(
        "Coins: {} ({} achievement, {} game)",
        coins.total, coins.achievement, coins.game
    );
    Ok(())
}

pub async fn export(state: &AppState, output: Option<String>) -> Result<()> {
    let now = Local::now();
    let content = state.export.all_entries_to_markdown(&now).await?;
    let file_name = output.unwrap_or_else(|| default_export_name(&now));

    let path = state.export.export_to_file(&content, &file_name).await?;
    println!("Exported to {}", path.display());
    Ok(())
}

fn default_export_name<Tz: TimeZone>(now: &DateTime<Tz>) -> String
where
    Tz::Offset: std::fmt::Display,
{
    format!("diary-export-{}.md", now.format("%Y-%m-%d"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn test_default_export_name() {
        let now = Utc.with_ymd_and_hms(2024, 7, 4, 9, 0, 0).unwrap();
        assert_eq!(default_export_name(&now), "diary-export-2024-07-04.md");
    }
}
