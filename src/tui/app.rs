use rand::rngs::StdRng;
use rand::SeedableRng;
use ratatui::widgets::TableState;

use crate::analytics::{self, DashboardSummary};
use crate::chat::ChatSession;
use crate::commands::{cmd_add, cmd_edit, cmd_remove, cmd_toggle, Context, TaskFields};
use crate::errors::Result;
use crate::listing::{select, SortDirection, SortField, TaskFilter};
use crate::models::{parse_date, parse_time, Category, Priority, Task, User};
use crate::responder::random_quote;

#[derive(PartialEq)]
pub enum InputMode {
    Normal,
    Editing,
    Adding,
    Chatting,
}

#[derive(PartialEq)]
pub enum ViewMode {
    Tasks,
    Dashboard,
    Coach,
}

pub enum InputField {
    None,
    Title,
    Due,
    Time,
}

/// State for the multi-step "Add Task" wizard.
#[derive(Default)]
pub struct AddState {
    pub fields: TaskFields,
    pub step: usize, // 0: Title, 1: Category, 2: Priority, 3: Due, 4: Time
}

pub struct App {
    ctx: Context,
    pub user: Option<User>,
    /// Every task of the current owner, unsorted.
    pub tasks: Vec<Task>,
    /// `tasks` after filter and sort; what the table shows.
    pub visible: Vec<Task>,
    pub state: TableState,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub input_field: InputField,
    pub input_buffer: String,
    pub target_id: Option<u64>,
    pub add_state: AddState,
    pub filter: TaskFilter,
    pub sort_field: SortField,
    pub sort_direction: SortDirection,
    pub chat: ChatSession,
    pub quote: &'static str,
    /// Last error or notice, shown in the help bar.
    pub status: Option<String>,
    rng: StdRng,
}

impl App {
    /// Creates a new App instance and loads initial data.
    pub fn new(ctx: Context) -> Result<App> {
        let mut rng = StdRng::from_entropy();
        let quote = random_quote(&mut rng);
        let chat = ChatSession::from_messages(ctx.store.load_chat()?);
        let user = ctx.store.load_user()?;

        let mut app = App {
            ctx,
            user,
            tasks: Vec::new(),
            visible: Vec::new(),
            state: TableState::default(),
            view_mode: ViewMode::Tasks,
            input_mode: InputMode::Normal,
            input_field: InputField::None,
            input_buffer: String::new(),
            target_id: None,
            add_state: AddState::default(),
            filter: TaskFilter::default(),
            sort_field: SortField::default(),
            sort_direction: SortDirection::default(),
            chat,
            quote,
            status: None,
            rng,
        };
        app.reload();
        Ok(app)
    }

    pub fn summary(&self) -> DashboardSummary {
        analytics::summary(&self.tasks)
    }

    fn selected_task(&self) -> Option<&Task> {
        self.state.selected().and_then(|i| self.visible.get(i))
    }

    /// Selects the next row in the task table.
    pub fn next(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.visible.len() => i + 1,
            _ => 0,
        };
        self.state.select(Some(i));
    }

    /// Selects the previous row in the task table.
    pub fn previous(&mut self) {
        if self.visible.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.visible.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Flips the selected task between pending and done.
    pub fn toggle_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.report(cmd_toggle(&self.ctx, id, true));
            self.reload();
        }
    }

    /// Deletes the currently selected task.
    pub fn delete_selected(&mut self) {
        if let Some(id) = self.selected_task().map(|t| t.id) {
            self.report(cmd_remove(&self.ctx, id, true));
            self.reload();
        }
    }

    /// Moves the selected task to the next category.
    pub fn cycle_category(&mut self) {
        if let Some(t) = self.selected_task() {
            let (id, next) = (t.id, t.category.next());
            self.apply_edit(id, TaskFields {
                category: Some(next.to_string()),
                ..TaskFields::default()
            });
        }
    }

    /// Moves the selected task to the next priority.
    pub fn cycle_priority(&mut self) {
        if let Some(t) = self.selected_task() {
            let (id, next) = (t.id, t.priority.next());
            self.apply_edit(id, TaskFields {
                priority: Some(next.to_string()),
                ..TaskFields::default()
            });
        }
    }

    /// Steps the category filter through All, Health, Study, Work, Personal.
    pub fn cycle_category_filter(&mut self) {
        self.filter.category = match self.filter.category {
            None => Some(Category::ALL[0]),
            Some(Category::Personal) => None,
            Some(c) => Some(c.next()),
        };
        self.reload();
    }

    /// Steps the priority filter through All, High, Medium, Low.
    pub fn cycle_priority_filter(&mut self) {
        self.filter.priority = match self.filter.priority {
            None => Some(Priority::High),
            Some(Priority::High) => Some(Priority::Medium),
            Some(Priority::Medium) => Some(Priority::Low),
            Some(Priority::Low) => None,
        };
        self.reload();
    }

    pub fn cycle_sort_field(&mut self) {
        self.sort_field = self.sort_field.next();
        self.sort_direction = SortDirection::Asc;
        self.reload();
    }

    pub fn flip_sort_direction(&mut self) {
        self.sort_direction = self.sort_direction.flip();
        self.reload();
    }

    /// Cycles Tasks, Dashboard and Coach.
    pub fn toggle_view(&mut self) {
        self.view_mode = match self.view_mode {
            ViewMode::Tasks => ViewMode::Dashboard,
            ViewMode::Dashboard => ViewMode::Coach,
            ViewMode::Coach => ViewMode::Tasks,
        };
        if self.view_mode == ViewMode::Dashboard {
            self.quote = random_quote(&mut self.rng);
        }
    }

    /// Reloads tasks from storage and refreshes the table rows.
    pub fn reload(&mut self) {
        match self.ctx.tasks() {
            Ok(tasks) => self.tasks = tasks,
            Err(e) => self.status = Some(e.to_string()),
        }
        self.visible = select(&self.tasks, &self.filter, self.sort_field, self.sort_direction);

        if self.visible.is_empty() {
            self.state.select(None);
        } else if let Some(i) = self.state.selected() {
            if i >= self.visible.len() {
                self.state.select(Some(self.visible.len() - 1));
            }
        } else {
            self.state.select(Some(0));
        }
    }

    /// Initiates the "Add Task" wizard.
    pub fn start_add(&mut self) {
        self.input_mode = InputMode::Adding;
        self.add_state = AddState::default();
        self.input_buffer.clear();
    }

    /// Starts typing a message to the coach.
    pub fn start_chat(&mut self) {
        self.input_mode = InputMode::Chatting;
        self.input_buffer.clear();
    }

    /// Initiates editing of a specific field for the selected task.
    pub fn start_edit(&mut self, field: InputField) {
        let Some(t) = self.selected_task() else {
            return;
        };
        let id = t.id;
        let prefill = match field {
            InputField::Title => t.title.clone(),
            InputField::Due => t.due_date.to_string(),
            InputField::Time => t
                .time_slot
                .map(|s| s.format("%H:%M").to_string())
                .unwrap_or_default(),
            InputField::None => String::new(),
        };
        self.target_id = Some(id);
        self.input_mode = InputMode::Editing;
        self.input_field = field;
        self.input_buffer = prefill;
    }

    pub fn cancel_input(&mut self) {
        self.input_mode = InputMode::Normal;
        self.input_field = InputField::None;
        self.target_id = None;
        self.input_buffer.clear();
    }

    /// Handles text input based on the current mode.
    pub fn handle_input(&mut self) {
        match self.input_mode {
            InputMode::Adding => self.handle_adding_input(),
            InputMode::Editing => self.handle_editing_input(),
            InputMode::Chatting => self.handle_chat_input(),
            InputMode::Normal => {}
        }
    }

    /// Handles input for the "Add Task" wizard.
    fn handle_adding_input(&mut self) {
        let value = std::mem::take(&mut self.input_buffer);
        let value = value.trim();
        let optional = if value.is_empty() { None } else { Some(value.to_string()) };

        // A bad value keeps the wizard on the same step with the text intact.
        if let Some(raw) = optional.as_deref() {
            let checked = match self.add_state.step {
                1 => raw.parse::<Category>().map(|_| ()),
                2 => raw.parse::<Priority>().map(|_| ()),
                3 => parse_date(raw).map(|_| ()),
                4 => parse_time(raw).map(|_| ()),
                _ => Ok(()),
            };
            if let Err(e) = checked {
                self.status = Some(e.to_string());
                self.input_buffer = raw.to_string();
                return;
            }
        }
        self.status = None;

        let fields = &mut self.add_state.fields;
        match self.add_state.step {
            0 => {
                if optional.is_none() {
                    return;
                }
                fields.title = optional;
            }
            1 => fields.category = optional,
            2 => fields.priority = optional,
            3 => fields.due = optional,
            _ => {
                fields.time = optional;
                let fields = std::mem::take(&mut self.add_state.fields);
                self.report(cmd_add(&self.ctx, fields, true));
                self.input_mode = InputMode::Normal;
                self.reload();
                return;
            }
        }
        self.add_state.step += 1;
    }

    /// Handles input for the "Edit Task" mode.
    fn handle_editing_input(&mut self) {
        if let Some(id) = self.target_id.take() {
            let value = std::mem::take(&mut self.input_buffer);
            let fields = match self.input_field {
                InputField::Title => TaskFields { title: Some(value), ..TaskFields::default() },
                InputField::Due => TaskFields { due: Some(value), ..TaskFields::default() },
                InputField::Time => TaskFields { time: Some(value), ..TaskFields::default() },
                InputField::None => TaskFields::default(),
            };
            self.apply_edit(id, fields);
        }
        self.input_mode = InputMode::Normal;
    }

    fn handle_chat_input(&mut self) {
        let message = std::mem::take(&mut self.input_buffer);
        if self
            .chat
            .send(&message, &self.ctx.responder, &mut self.rng)
            .is_some()
        {
            if let Err(e) = self.ctx.store.save_chat(self.chat.messages()) {
                self.status = Some(e.to_string());
            }
        }
        self.input_mode = InputMode::Normal;
    }

    fn apply_edit(&mut self, id: u64, fields: TaskFields) {
        self.report(cmd_edit(&self.ctx, id, fields, true));
        self.reload();
    }

    fn report<T>(&mut self, result: Result<T>) {
        self.status = result.err().map(|e| e.to_string());
    }
}
