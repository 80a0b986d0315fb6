use anyhow::{Context, Result};
use chrono::{DateTime, Local};
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, ListState, Paragraph, Wrap},
};
use std::io::stdout;
use tracing::info;

use crate::form::{Field, FormInput, JobForm, Submission};
use crate::list::render_job_list;
use crate::models::JobPosting;

const FORM_TITLE: &str = "Post a New Job";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Form,
    List,
}

/// Owns the job collection and passes it to the form and the list.
pub struct App {
    jobs: Vec<JobPosting>,
    form: JobForm,
    filter: Option<String>,
    focus: Pane,
    list_state: ListState,
    should_quit: bool,
}

impl App {
    pub fn new(filter: Option<String>, now: DateTime<Local>) -> Self {
        Self {
            jobs: Vec::new(),
            form: JobForm::new(now),
            filter,
            focus: Pane::Form,
            list_state: ListState::default(),
            should_quit: false,
        }
    }

    pub fn jobs(&self) -> &[JobPosting] {
        &self.jobs
    }

    pub fn form(&self) -> &JobForm {
        &self.form
    }

    pub fn focus(&self) -> Pane {
        self.focus
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    fn set_jobs(&mut self, jobs: Vec<JobPosting>) {
        self.jobs = jobs;
        if self.list_state.selected().is_none() && !self.jobs.is_empty() {
            self.list_state.select(Some(0));
        }
    }

    pub fn submit(&mut self, now: DateTime<Local>) -> Submission {
        let mut replaced = None;
        let outcome = self
            .form
            .submit(&self.jobs, now, |next| replaced = Some(next));
        if let Some(next) = replaced {
            self.set_jobs(next);
        }
        outcome
    }

    pub fn handle_key(&mut self, key: KeyEvent, now: DateTime<Local>) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) => {
                self.should_quit = true;
                return;
            }
            (KeyCode::Char('c'), m) if m.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
                return;
            }
            (KeyCode::F(2), _) => {
                self.focus = match self.focus {
                    Pane::Form => Pane::List,
                    Pane::List => Pane::Form,
                };
                return;
            }
            _ => {}
        }

        match self.focus {
            Pane::Form => {
                if self.form.handle_key(key, now) == FormInput::SubmitRequested {
                    self.submit(now);
                }
            }
            Pane::List => match key.code {
                KeyCode::Char('q') => self.should_quit = true,
                KeyCode::Down | KeyCode::Char('j') => self.next(),
                KeyCode::Up | KeyCode::Char('k') => self.prev(),
                _ => {}
            },
        }
    }

    fn next(&mut self) {
        if self.jobs.is_empty() {
            return;
        }
        let selected = match self.list_state.selected() {
            Some(i) if i + 1 < self.jobs.len() => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.list_state.select(Some(selected));
    }

    fn prev(&mut self) {
        if let Some(i) = self.list_state.selected() {
            self.list_state.select(Some(i.saturating_sub(1)));
        }
    }
}

pub fn run_ui(filter: Option<String>) -> Result<()> {
    let mut app = App::new(filter, Local::now());
    info!("starting job form");

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut terminal = setup_or_restore(
        || {
            stdout().execute(EnterAlternateScreen)?;
            Ok(Terminal::new(CrosstermBackend::new(stdout()))?)
        },
        || {
            let _ = stdout().execute(LeaveAlternateScreen);
            let _ = disable_raw_mode();
        },
    )?;

    let result = run_loop(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    stdout().execute(LeaveAlternateScreen)?;

    info!(jobs = app.jobs().len(), "job form closed");
    result
}

/// Run `setup`; if it fails, run `restore` before returning the error.
fn setup_or_restore<T>(
    setup: impl FnOnce() -> Result<T>,
    restore: impl FnOnce(),
) -> Result<T> {
    let result = setup();
    if result.is_err() {
        restore();
    }
    result
}

fn run_loop(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App) -> Result<()> {
    while !app.should_quit() {
        terminal.draw(|frame| draw(frame, app))?;

        if let Event::Key(key) = event::read()? {
            app.handle_key(key, Local::now());
        }
    }
    Ok(())
}

fn draw(frame: &mut Frame, app: &mut App) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    draw_form(frame, panes[0], app);

    let focused = app.focus() == Pane::List;
    render_job_list(
        frame,
        panes[1],
        &app.jobs,
        app.filter.as_deref(),
        &mut app.list_state,
        focused,
    );

    let help = match app.focus {
        Pane::Form => {
            " Tab/S-Tab:field  ←/→:date & type  Ctrl-S:submit  F2:list  Esc:quit"
        }
        Pane::List => " j/k:navigate  F2:form  q/Esc:quit",
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        rows[1],
    );
}

fn draw_form(frame: &mut Frame, area: Rect, app: &App) {
    // Borders of the error block.
    let inner_width = usize::from(area.width).saturating_sub(2).max(10);
    let error_lines: Vec<Line> = app
        .form
        .error_messages()
        .iter()
        .flat_map(|e| {
            textwrap::wrap(&format!("• {}", e), inner_width)
                .into_iter()
                .map(|l| Line::from(l.into_owned()))
                .collect::<Vec<_>>()
        })
        .collect();
    let error_height = if error_lines.is_empty() {
        0
    } else {
        error_lines.len() as u16 + 2
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(0), Constraint::Length(error_height)])
        .split(area);

    let border_style = if app.focus == Pane::Form {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let form = Paragraph::new(build_form(app))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(format!(" {} ", FORM_TITLE)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(form, chunks[0]);

    if !error_lines.is_empty() {
        let alert = Paragraph::new(error_lines)
            .style(Style::default().fg(Color::Red))
            .block(Block::default().borders(Borders::ALL).title(" Error "));
        frame.render_widget(alert, chunks[1]);
    }
}

fn build_form(app: &App) -> Text<'static> {
    let draft = app.form.draft();
    let focus = app.form.focus();
    let mut lines: Vec<Line> = Vec::new();

    for field in Field::ALL {
        let active = app.focus == Pane::Form && field == focus;
        let marker = if active { "> " } else { "  " };
        let label_style = if active {
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
        } else {
            Style::default().add_modifier(Modifier::BOLD)
        };

        if field == Field::Submit {
            lines.push(Line::from(""));
            lines.push(Line::from(Span::styled(
                format!("{}[ {} ]", marker, field.label()),
                label_style,
            )));
            continue;
        }

        let value = match field {
            Field::Title => draft.title.clone(),
            Field::DatePosted => format!("◀ {} ▶", draft.date.format("%Y-%m-%d")),
            Field::Company => draft.company.clone(),
            Field::JobType if draft.job_type.is_empty() => "◀ select ▶".to_string(),
            Field::JobType => format!("◀ {} ▶", draft.job_type),
            Field::Location => draft.location.clone(),
            Field::Description => draft.description.clone(),
            Field::Qualifications => draft.qualifications.clone(),
            Field::Submit => String::new(),
        };

        lines.push(Line::from(Span::styled(
            format!("{}{}", marker, field.label()),
            label_style,
        )));

        let editing_text = active && !matches!(field, Field::DatePosted | Field::JobType);
        let value_lines: Vec<&str> = value.split('\n').collect();
        let last = value_lines.len() - 1;
        for (i, l) in value_lines.iter().enumerate() {
            let cursor = if editing_text && i == last { "_" } else { "" };
            lines.push(Line::from(format!("    {}{}", l, cursor)));
        }
    }

    Text::from(lines)
}
