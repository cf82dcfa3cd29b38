use std::fs;
use std::io::{self, Write};
use std::path::Path;

use chrono::{DateTime, Local, NaiveDate};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, Color, ContentArrangement, Table};
use rand::Rng;
use tracing::info;

use crate::analytics::{category_breakdown, summary_at, weekly_series};
use crate::chat::ChatSession;
use crate::config::Config;
use crate::errors::{InputError, Result, StoreError};
use crate::listing::{select, SortDirection, SortField, TaskFilter};
use crate::models::{
    parse_date, parse_time, Category, NewTask, Priority, Role, Task, TaskPatch, User, GUEST_ID,
};
use crate::responder::{random_quote, Responder};
use crate::storage::Store;

/// Everything a command needs: the store and the configured coach.
#[derive(Debug, Clone)]
pub struct Context {
    pub store: Store,
    pub responder: Responder,
}

impl Context {
    pub fn open(config: &Config) -> Result<Context> {
        Ok(Context {
            store: Store::open(config.data_dir())?,
            responder: Responder::new(config.fallback),
        })
    }

    /// Owner id of the current profile, or `guest`.
    pub fn owner(&self) -> Result<String> {
        Ok(self
            .store
            .load_user()?
            .map(|u| u.id)
            .unwrap_or_else(|| GUEST_ID.to_string()))
    }

    pub fn tasks(&self) -> Result<Vec<Task>> {
        Ok(self.store.list(&self.owner()?)?)
    }
}

/// Raw text fields of the add/edit forms.
#[derive(Debug, Clone, Default)]
pub struct TaskFields {
    pub title: Option<String>,
    pub category: Option<String>,
    pub priority: Option<String>,
    pub due: Option<String>,
    /// An empty string clears the slot on edit.
    pub time: Option<String>,
}

/// Validates the add form. Missing fields fall back to Personal, Medium,
/// due `today`, no time slot.
pub fn parse_new_task(fields: TaskFields, today: NaiveDate) -> std::result::Result<NewTask, InputError> {
    let title = fields.title.unwrap_or_default().trim().to_string();
    if title.is_empty() {
        return Err(InputError::EmptyTitle);
    }
    Ok(NewTask {
        title,
        category: fields.category.as_deref().map(str::parse::<Category>).transpose()?.unwrap_or_default(),
        priority: fields.priority.as_deref().map(str::parse::<Priority>).transpose()?.unwrap_or_default(),
        due_date: fields.due.as_deref().map(parse_date).transpose()?.unwrap_or(today),
        time_slot: parse_slot(fields.time.as_deref())?.flatten(),
    })
}

/// Validates the edit form into a patch.
pub fn parse_patch(fields: TaskFields) -> std::result::Result<TaskPatch, InputError> {
    let title = match fields.title {
        Some(t) if t.trim().is_empty() => return Err(InputError::EmptyTitle),
        Some(t) => Some(t.trim().to_string()),
        None => None,
    };
    Ok(TaskPatch {
        title,
        category: fields.category.as_deref().map(str::parse::<Category>).transpose()?,
        priority: fields.priority.as_deref().map(str::parse::<Priority>).transpose()?,
        due_date: fields.due.as_deref().map(parse_date).transpose()?,
        time_slot: parse_slot(fields.time.as_deref())?,
    })
}

fn parse_slot(raw: Option<&str>) -> std::result::Result<Option<Option<chrono::NaiveTime>>, InputError> {
    match raw.map(str::trim) {
        None => Ok(None),
        Some("") => Ok(Some(None)),
        Some(s) => parse_time(s).map(|t| Some(Some(t))),
    }
}

/// Adds a new task for the current owner.
pub fn cmd_add(ctx: &Context, fields: TaskFields, silent: bool) -> Result<Task> {
    let new = parse_new_task(fields, Local::now().date_naive())?;
    let task = ctx.store.create(&ctx.owner()?, new)?;
    if !silent {
        println!("Task added (id = {})", task.id);
    }
    Ok(task)
}

/// Flips a task between pending and done.
pub fn cmd_toggle(ctx: &Context, id: u64, silent: bool) -> Result<Task> {
    let task = ctx.store.toggle(&ctx.owner()?, id)?;
    if !silent {
        let state = if task.completed { "done" } else { "pending" };
        println!("Task {} marked as {}.", id, state);
    }
    Ok(task)
}

/// Edits an existing task's details.
pub fn cmd_edit(ctx: &Context, id: u64, fields: TaskFields, silent: bool) -> Result<Task> {
    let patch = parse_patch(fields)?;
    let task = if patch.is_empty() {
        ctx.store.get(&ctx.owner()?, id)?
    } else {
        ctx.store.update(&ctx.owner()?, id, patch)?
    };
    if !silent {
        println!("Task {} updated.", id);
    }
    Ok(task)
}

/// Removes a task by ID.
pub fn cmd_remove(ctx: &Context, id: u64, silent: bool) -> Result<Task> {
    let task = ctx.store.delete(&ctx.owner()?, id)?;
    if !silent {
        println!("Task {} removed.", id);
    }
    Ok(task)
}

/// Lists tasks in a formatted table.
pub fn cmd_list(ctx: &Context, filter: TaskFilter, field: SortField, direction: SortDirection) -> Result<()> {
    let tasks = select(&ctx.tasks()?, &filter, field, direction);
    if tasks.is_empty() {
        println!("No tasks found. Add your first habit!");
        return Ok(());
    }

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("ID").add_attribute(Attribute::Bold),
            Cell::new("Task").add_attribute(Attribute::Bold),
            Cell::new("Category").add_attribute(Attribute::Bold),
            Cell::new("Priority").add_attribute(Attribute::Bold),
            Cell::new("Due").add_attribute(Attribute::Bold),
            Cell::new("Time").add_attribute(Attribute::Bold),
            Cell::new("Status").add_attribute(Attribute::Bold),
        ]);

    for t in tasks {
        let (status, status_color) = if t.completed {
            ("Done", Color::Green)
        } else {
            ("Pending", Color::Yellow)
        };
        table.add_row(vec![
            Cell::new(t.id),
            Cell::new(&t.title),
            Cell::new(format!("{} {}", category_icon(t.category), t.category)),
            Cell::new(t.priority).fg(priority_color(t.priority)),
            Cell::new(t.due_date.format("%b %-d")),
            Cell::new(t.time_slot.map(|s| s.format("%H:%M").to_string()).unwrap_or_default()),
            Cell::new(status).fg(status_color),
        ]);
    }

    println!("{table}");
    Ok(())
}

pub fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Health => "🏃",
        Category::Study => "📚",
        Category::Work => "💼",
        Category::Personal => "🎯",
    }
}

fn priority_color(priority: Priority) -> Color {
    match priority {
        Priority::High => Color::Red,
        Priority::Medium => Color::Yellow,
        Priority::Low => Color::Green,
    }
}

/// Prints the dashboard: headline numbers, last seven days, categories.
pub fn cmd_stats<R: Rng + ?Sized>(ctx: &Context, rng: &mut R) -> Result<()> {
    let tasks = ctx.tasks()?;
    let today = Local::now().date_naive();
    let s = summary_at(&tasks, today);

    let greeting = match ctx.store.load_user()? {
        Some(u) => format!("Hey, {}!", u.first_name()),
        None => "Welcome to FITOX".to_string(),
    };
    println!("{}  ({})", greeting, today.format("%A, %B %-d"));
    println!("\"{}\"\n", random_quote(rng));

    let mut cards = Table::new();
    cards.load_preset(UTF8_FULL).set_header(vec![
        "Completed Today",
        "Pending",
        "Current Streak",
        "Total Done",
        "Completion Rate",
        "This Week",
    ]);
    cards.add_row(vec![
        s.completed_today.to_string(),
        s.pending_today.to_string(),
        format!("{} days", s.streak),
        s.total_completed.to_string(),
        format!("{}%", s.completion_rate),
        s.week_completed.to_string(),
    ]);
    println!("{cards}");

    let mut week = Table::new();
    week.load_preset(UTF8_FULL).set_header(vec!["Day", "Done", "Total", ""]);
    for day in weekly_series(&tasks, today) {
        week.add_row(vec![
            Cell::new(format!("{} {}", day.label, day.date.format("%d"))),
            Cell::new(day.completed),
            Cell::new(day.total),
            Cell::new("█".repeat(day.completed)).fg(Color::Green),
        ]);
    }
    println!("{week}");

    let breakdown = category_breakdown(&tasks);
    if !breakdown.is_empty() {
        let mut cats = Table::new();
        cats.load_preset(UTF8_FULL).set_header(vec!["Category", "Completed"]);
        for c in breakdown {
            cats.add_row(vec![
                format!("{} {}", category_icon(c.category), c.category),
                c.completed.to_string(),
            ]);
        }
        println!("{cats}");
    }
    Ok(())
}

/// Sends one message to the coach, prints and persists the exchange.
pub fn cmd_chat<R: Rng + ?Sized>(ctx: &Context, message: &str, rng: &mut R, silent: bool) -> Result<Option<String>> {
    let mut session = ChatSession::from_messages(ctx.store.load_chat()?);
    let reply = match session.send(message, &ctx.responder, rng) {
        Some((_, answer)) => answer.content.clone(),
        None => return Ok(None),
    };
    ctx.store.save_chat(session.messages())?;
    if !silent {
        println!("{reply}");
    }
    Ok(Some(reply))
}

/// Prints (or clears) the coach transcript.
pub fn cmd_history(ctx: &Context, clear: bool) -> Result<()> {
    if clear {
        ctx.store.clear_chat()?;
        println!("Chat history cleared.");
        return Ok(());
    }
    let messages = ctx.store.load_chat()?;
    if messages.is_empty() {
        println!("No messages yet. Ask the coach for motivation, habit tips or anything on your mind.");
        return Ok(());
    }
    for m in messages {
        let who = match m.role {
            Role::User => "You",
            Role::Assistant => "Coach",
        };
        println!("[{}] {}: {}\n", short_time(&m.timestamp), who, m.content);
    }
    Ok(())
}

fn short_time(rfc3339: &str) -> String {
    DateTime::parse_from_rfc3339(rfc3339)
        .map(|t| t.format("%-I:%M %p").to_string())
        .unwrap_or_else(|_| rfc3339.to_string())
}

pub fn cmd_quote<R: Rng + ?Sized>(rng: &mut R) {
    println!("{}", random_quote(rng));
}

/// Creates or replaces the local profile. The lower-cased email is the
/// owner id, so logging in again with the same email sees the same tasks.
pub fn cmd_login(ctx: &Context, name: String, email: String, profile_image: Option<String>, silent: bool) -> Result<User> {
    let (name, email) = (name.trim(), email.trim());
    if name.is_empty() {
        return Err(InputError::EmptyField("name").into());
    }
    if email.is_empty() {
        return Err(InputError::EmptyField("email").into());
    }
    let id = email.to_lowercase();
    let created_at = match ctx.store.load_user()? {
        Some(existing) if existing.id == id => existing.created_at,
        _ => Local::now().to_rfc3339(),
    };
    let user = User {
        id,
        name: name.to_string(),
        email: email.to_string(),
        profile_image,
        created_at,
    };
    ctx.store.save_user(&user)?;
    info!(user = %user.id, "logged in");
    if !silent {
        println!("Welcome, {}!", user.first_name());
    }
    Ok(user)
}

pub fn cmd_logout(ctx: &Context) -> Result<()> {
    ctx.store.clear_user()?;
    println!("Logged out. Tasks you add now belong to the guest profile.");
    Ok(())
}

/// Prints the profile card.
pub fn cmd_whoami(ctx: &Context) -> Result<()> {
    let tasks = ctx.tasks()?;
    let s = summary_at(&tasks, Local::now().date_naive());
    match ctx.store.load_user()? {
        Some(u) => {
            let since = DateTime::parse_from_rfc3339(&u.created_at)
                .map(|t| t.format("%B %Y").to_string())
                .unwrap_or_default();
            println!("{} <{}>", u.name, u.email);
            if !since.is_empty() {
                println!("Member since {since}");
            }
        }
        None => println!("Guest <guest@fitox.app>"),
    }
    println!(
        "{} tasks, {} done, {} day streak",
        s.total, s.total_completed, s.streak
    );
    Ok(())
}

/// Imports a JSON array of tasks in either the snake_case or the camelCase
/// schema. Returns the number of tasks added.
pub fn cmd_import(ctx: &Context, path: &Path, silent: bool) -> Result<usize> {
    let raw = fs::read_to_string(path).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let tasks: Vec<Task> = serde_json::from_str(&raw).map_err(|source| StoreError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let count = ctx.store.import(&ctx.owner()?, tasks)?;
    if !silent {
        println!("Imported {count} tasks.");
    }
    Ok(count)
}

/// Deletes all tasks, chat history and the profile.
pub fn cmd_reset(ctx: &Context, force: bool) -> Result<()> {
    if !force {
        print!("Are you sure you want to delete all tasks, chat history and your profile? This cannot be undone. [y/N] ");
        io::stdout().flush()?;
        let mut input = String::new();
        io::stdin().read_line(&mut input)?;
        if input.trim().to_lowercase() != "y" {
            println!("Aborted.");
            return Ok(());
        }
    }
    ctx.store.reset()?;
    println!("Data reset successfully.");
    Ok(())
}
