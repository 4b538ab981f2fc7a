//! Command line interface definition

use crate::config::DATA_DIR_ENV;
use crate::database::MediaKind;
use chrono::NaiveDate;
use clap::{value_parser, ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    /// Directory holding the diary database and media
    #[arg(long, global = true, env = DATA_DIR_ENV)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Clone)]
pub enum Command {
    /// Finish onboarding and choose a PIN
    Setup,
    /// Manipulate entries
    Entry {
        #[command(subcommand)]
        command: EntryCommand,
    },
    /// Search entries by text, date range, mood or tags
    Search {
        /// Text to find in titles and content
        query: Option<String>,

        /// First day of the date range (YYYY-MM-DD)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Last day of the date range (YYYY-MM-DD)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Only entries with this mood
        #[arg(long, value_parser = value_parser!(i64).range(1..=5))]
        mood: Option<i64>,

        /// Only entries carrying any of these tags
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// Days with entries
    Calendar,
    /// Entries grouped by day
    Timeline,
    /// Mood average, distribution and recent moods
    Mood,
    /// Consecutive days of writing up to today
    Streak,
    /// Manage tags
    Tag {
        #[command(subcommand)]
        command: TagCommand,
    },
    /// Browse entry templates
    Template {
        #[command(subcommand)]
        command: TemplateCommand,
    },
    /// Manage media attached to entries
    Media {
        #[command(subcommand)]
        command: MediaCommand,
    },
    /// Configure the writing reminder
    Reminder {
        #[command(subcommand)]
        command: ReminderCommand,
    },
    /// Show or change settings
    Settings {
        #[command(subcommand)]
        command: Option<SettingsCommand>,
    },
    /// Show or change the color theme
    Theme {
        /// light, dark, auto, nature, ocean or sunset
        name: Option<String>,

        /// System color scheme used to resolve `auto`
        #[arg(long, value_enum, default_value_t = SchemeArg::Light)]
        system: SchemeArg,
    },
    /// Game stats and coin balance
    Stats,
    /// Export every entry to a markdown file
    Export {
        /// File name inside the export directory
        #[arg(long, short)]
        output: Option<String>,
    },
    /// Manage the PIN
    Pin {
        #[command(subcommand)]
        command: PinCommand,
    },
    /// Turn biometric unlock on or off
    Biometric {
        #[arg(action = ArgAction::Set)]
        enabled: bool,
    },
    /// End the current session
    Logout,
}

#[derive(Subcommand, Clone)]
pub enum EntryCommand {
    /// Write a new entry; content is read from stdin unless given
    New {
        #[arg(long, short)]
        title: Option<String>,

        #[arg(long, short)]
        content: Option<String>,

        /// Day the entry is for (YYYY-MM-DD), defaults to today
        #[arg(long, short)]
        date: Option<NaiveDate>,

        /// Mood from 1 (very sad) to 5 (very happy)
        #[arg(long, short, value_parser = value_parser!(i64).range(1..=5))]
        mood: Option<i64>,

        /// Start from a template
        #[arg(long)]
        template: Option<String>,

        /// Tags to attach, created when missing
        #[arg(long = "tag")]
        tags: Vec<String>,
    },
    /// List entries
    List {
        /// Only entries for this day
        #[arg(long, short)]
        date: Option<NaiveDate>,
    },
    /// Show an entry with its tags and media
    Show { id: String },
    /// Change an entry
    Edit {
        id: String,

        #[arg(long, short)]
        title: Option<String>,

        #[arg(long, short)]
        content: Option<String>,

        #[arg(long, short)]
        date: Option<NaiveDate>,

        #[arg(long, short, value_parser = value_parser!(i64).range(1..=5), conflicts_with = "clear_mood")]
        mood: Option<i64>,

        /// Remove the mood
        #[arg(long)]
        clear_mood: bool,
    },
    /// Delete an entry with its tag links and media
    Delete { id: String },
}

#[derive(Subcommand, Clone)]
pub enum TagCommand {
    /// List tags
    List,
    /// Tag an entry, creating the tag when missing
    Add { entry_id: String, name: String },
    /// Remove a tag from an entry
    Remove { entry_id: String, name: String },
    /// Delete a tag everywhere
    Delete { name: String },
}

#[derive(Subcommand, Clone)]
pub enum TemplateCommand {
    /// List templates
    List,
    /// Print a template's content
    Show { id: String },
}

#[derive(Subcommand, Clone)]
pub enum MediaCommand {
    /// Copy a file into the diary and attach it to an entry
    Attach {
        entry_id: String,
        path: PathBuf,

        /// image, video, audio or file; guessed from the extension by default
        #[arg(long, short)]
        kind: Option<MediaKind>,
    },
    /// List media attached to an entry
    List { entry_id: String },
    /// Delete an attachment
    Delete { id: String },
}

#[derive(Subcommand, Clone)]
pub enum ReminderCommand {
    /// Show the reminder
    Show,
    /// Enable the reminder at a time on the given weekdays
    Set {
        /// Time of day, HH:mm
        time: String,

        /// Weekdays, 0 = Sunday .. 6 = Saturday; every day by default
        #[arg(long, value_delimiter = ',', value_parser = value_parser!(u8).range(0..=6))]
        days: Vec<u8>,
    },
    /// Disable the reminder
    Off,
    /// Stay running and deliver reminders until interrupted
    Watch,
}

#[derive(Subcommand, Clone)]
pub enum SettingsCommand {
    /// Print every stored setting
    Show,
    /// Store a raw setting value
    Set { key: String, value: String },
}

#[derive(Subcommand, Clone)]
pub enum PinCommand {
    /// Choose a PIN
    Set,
    /// Replace the PIN
    Change,
    /// Remove the PIN
    Remove,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemeArg {
    Light,
    Dark,
}
