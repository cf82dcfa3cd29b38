pub mod app;
pub mod ui;

use std::io;

use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use app::{App, InputField, InputMode, ViewMode};
use ui::ui;

use crate::commands::Context;
use crate::errors::Result;

/// Runs the interactive UI until `q`. Data errors at startup are returned
/// before the terminal is touched.
pub fn run_tui(ctx: Context) -> Result<()> {
    let mut app = App::new(ctx)?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res?;
    Ok(())
}

fn run_app<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match app.input_mode {
            InputMode::Normal => match key.code {
                KeyCode::Char('q') => return Ok(()),
                KeyCode::Char('v') | KeyCode::Tab => app.toggle_view(),
                KeyCode::Char('i') if app.view_mode == ViewMode::Coach => app.start_chat(),
                _ if app.view_mode != ViewMode::Tasks => {}
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Char(' ') => app.toggle_selected(),
                KeyCode::Char('d') | KeyCode::Delete => app.delete_selected(),
                KeyCode::Char('a') => app.start_add(),
                KeyCode::Char('n') => app.start_edit(InputField::Title),
                KeyCode::Char('t') => app.start_edit(InputField::Due),
                KeyCode::Char('s') => app.start_edit(InputField::Time),
                KeyCode::Char('g') => app.cycle_category(),
                KeyCode::Char('p') => app.cycle_priority(),
                KeyCode::Char('f') => app.cycle_category_filter(),
                KeyCode::Char('r') => app.cycle_priority_filter(),
                KeyCode::Char('o') => app.cycle_sort_field(),
                KeyCode::Char('O') => app.flip_sort_direction(),
                _ => {}
            },
            InputMode::Editing | InputMode::Adding | InputMode::Chatting => match key.code {
                KeyCode::Enter => app.handle_input(),
                KeyCode::Esc => app.cancel_input(),
                KeyCode::Char(c) => app.input_buffer.push(c),
                KeyCode::Backspace => {
                    app.input_buffer.pop();
                }
                _ => {}
            },
        }
    }
}
