//! Entry, search, tag, template and media commands

use crate::app::AppState;
use crate::cli::{EntryCommand, MediaCommand, TagCommand, TemplateCommand};
use crate::database::{
    mood_emoji, mood_label, Entry, EntryUpdate, MediaKind, NewEntry, SearchFilters, Tag,
};
use crate::error::Result;
use chrono::{Local, NaiveDate};
use std::path::Path;
use tokio::io::AsyncReadExt;

pub async fn entry(state: &AppState, command: EntryCommand) -> Result<()> {
    match command {
        EntryCommand::New {
            title,
            content,
            date,
            mood,
            template,
            tags,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());

            let mut req = match template {
                Some(template_id) => {
                    let template = state.templates.get_template(&template_id).await?;
                    NewEntry::from_template(&template, date)
                }
                None => NewEntry::new("", "", date),
            };

            if let Some(title) = title {
                req.title = title;
            }
            match content {
                Some(content) => req.content = content,
                None if req.template_id.is_none() => req.content = read_stdin().await?,
                None => {}
            }
            req.mood = mood;

            let entry = state.entries.create_entry(req).await?;
            for name in &tags {
                let tag = state.tags.get_or_create_tag(name).await?;
                state.tags.add_tag_to_entry(&entry.id, &tag.id).await?;
            }

            println!("Created entry {}", entry.id);
        }
        EntryCommand::List { date } => {
            let entries = match date {
                Some(date) => state.entries.entries_by_date(date).await?,
                None => state.entries.list_entries().await?,
            };
            print_entries(&entries);
        }
        EntryCommand::Show { id } => {
            let entry = state.entries.get_entry(&id).await?;
            let tags = state.tags.tags_for_entry(&id).await?;
            let media = state.media.media_for_entry(&id).await?;

            println!("# {}", entry.title);
            println!("Date: {}", entry.date);
            if let Some(mood) = entry.mood {
                println!(
                    "Mood: {} {}",
                    entry.mood_emoji.as_deref().unwrap_or_default(),
                    mood_label(mood).unwrap_or_default()
                );
            }
            if !tags.is_empty() {
                println!("Tags: {}", tag_names(&tags));
            }
            println!();
            println!("{}", entry.content);

            if !media.is_empty() {
                println!();
                for item in media {
                    println!(
                        "[{}] {} {} ({} bytes)",
                        item.id, item.media_type, item.file_name, item.file_size
                    );
                }
            }
        }
        EntryCommand::Edit {
            id,
            title,
            content,
            date,
            mood,
            clear_mood,
        } => {
            let entry = state.entries.get_entry(&id).await?;
            let mut update = EntryUpdate::from(&entry);

            if let Some(title) = title {
                update.title = title;
            }
            if let Some(content) = content {
                update.content = content;
            }
            if let Some(date) = date {
                update.date = date;
            }
            if clear_mood {
                update.mood = None;
                update.mood_emoji = None;
            } else if let Some(mood) = mood {
                update.mood = Some(mood);
                update.mood_emoji = mood_emoji(mood).map(str::to_string);
            }

            let entry = state.entries.update_entry(update).await?;
            println!("Updated entry {}", entry.id);
        }
        EntryCommand::Delete { id } => {
            state.entries.delete_entry(&id).await?;
            println!("Deleted entry {}", id);
        }
    }
    Ok(())
}

pub async fn search(
    state: &AppState,
    query: Option<String>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    mood: Option<i64>,
    tags: Vec<String>,
) -> Result<()> {
    let mut tag_ids = Vec::with_capacity(tags.len());
    for name in &tags {
        tag_ids.push(state.tags.find_tag(name).await?.id);
    }

    // A single bound searches that one day
    let (start_date, end_date) = match (from, to) {
        (Some(from), None) => (Some(from), Some(from)),
        (None, Some(to)) => (Some(to), Some(to)),
        range => range,
    };

    let entries = state
        .search
        .search(&SearchFilters {
            query,
            start_date,
            end_date,
            tag_ids,
            mood,
        })
        .await?;

    print_entries(&entries);
    Ok(())
}

pub async fn tag(state: &AppState, command: TagCommand) -> Result<()> {
    match command {
        TagCommand::List => {
            for tag in state.tags.list_tags().await? {
                println!("{}  {}", tag.color, tag.name);
            }
        }
        TagCommand::Add { entry_id, name } => {
            state.entries.get_entry(&entry_id).await?;
            let tag = state.tags.get_or_create_tag(&name).await?;
            state.tags.add_tag_to_entry(&entry_id, &tag.id).await?;
            println!("Tagged {} with {}", entry_id, tag.name);
        }
        TagCommand::Remove { entry_id, name } => {
            let tag = state.tags.find_tag(&name).await?;
            state.tags.remove_tag_from_entry(&entry_id, &tag.id).await?;
            println!("Removed {} from {}", tag.name, entry_id);
        }
        TagCommand::Delete { name } => {
            let tag = state.tags.find_tag(&name).await?;
            state.tags.delete_tag(&tag.id).await?;
            println!("Deleted tag {}", tag.name);
        }
    }
    Ok(())
}

pub async fn template(state: &AppState, command: TemplateCommand) -> Result<()> {
    match command {
        TemplateCommand::List => {
            for template in state.templates.list_templates().await? {
                println!(
                    "{}  {} [{}]  {}",
                    template.id,
                    template.name,
                    template.category,
                    template.description.as_deref().unwrap_or_default()
                );
            }
        }
        TemplateCommand::Show { id } => {
            let template = state.templates.get_template(&id).await?;
            println!("{}", template.content);
        }
    }
    Ok(())
}

pub async fn media(state: &AppState, command: MediaCommand) -> Result<()> {
    match command {
        MediaCommand::Attach {
            entry_id,
            path,
            kind,
        } => {
            let kind = kind.unwrap_or_else(|| guess_media_kind(&path));
            let media = state.media.attach_file(&entry_id, kind, &path).await?;
            println!("Attached {} as {}", media.file_name, media.id);
        }
        MediaCommand::List { entry_id } => {
            for item in state.media.media_for_entry(&entry_id).await? {
                println!(
                    "{}  {}  {}  {}",
                    item.id, item.media_type, item.file_name, item.uri
                );
            }
        }
        MediaCommand::Delete { id } => {
            state.media.delete_media(&id).await?;
            println!("Deleted media {}", id);
        }
    }
    Ok(())
}

async fn read_stdin() -> Result<String> {
    let mut content = String::new();
    tokio::io::stdin().read_to_string(&mut content).await?;
    Ok(content.trim_end().to_string())
}

fn print_entries(entries: &[Entry]) {
    if entries.is_empty() {
        println!("No entries");
        return;
    }

    for entry in entries {
        println!(
            "{}  {}  {:<2} {}",
            entry.id,
            entry.date,
            entry.mood_emoji.as_deref().unwrap_or_default(),
            entry.title
        );
    }
}

fn tag_names(tags: &[Tag]) -> String {
    tags.iter()
        .map(|tag| tag.name.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Media kind from a file extension
fn guess_media_kind(path: &Path) -> MediaKind {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "jpg" | "jpeg" | "png" | "gif" | "webp" | "heic" | "bmp" => MediaKind::Image,
        "mp4" | "mov" | "m4v" | "webm" | "mkv" | "avi" => MediaKind::Video,
        "mp3" | "m4a" | "aac" | "wav" | "ogg" | "flac" => MediaKind::Audio,
        _ => MediaKind::File,
    }
}
