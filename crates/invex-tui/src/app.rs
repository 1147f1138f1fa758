use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use invex_core::controller::{self, Action, ExtractionModel};
use invex_core::export::ExportFormat;
use invex_core::view;
use invex_core::{AppState, Effect};
use ratatui::widgets::Block;

use crate::event::AppEvent;
use crate::layout::AppLayout;
use crate::theme::Theme;
use crate::widgets;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Insert,
}

/// Pane that receives selection keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Fields,
    Tables,
    Chat,
}

impl Focus {
    #[must_use]
    pub fn next(self) -> Self {
        match self {
            Self::Fields => Self::Tables,
            Self::Tables => Self::Chat,
            Self::Chat => Self::Fields,
        }
    }
}

/// What the prompt line is collecting while in insert mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Prompt {
    OpenFile,
    Question,
    Search,
    EditField {
        label: String,
    },
    EditCell {
        table: usize,
        row: usize,
        col: usize,
    },
}

impl Prompt {
    #[must_use]
    pub fn title(&self) -> String {
        match self {
            Self::OpenFile => " Open invoice (image or PDF path) ".to_owned(),
            Self::Question => " Ask the assistant ".to_owned(),
            Self::Search => " Search fields ".to_owned(),
            Self::EditField { label } => format!(" Edit {label} "),
            Self::EditCell { table, row, col } => {
                format!(" Edit table {} row {row} column {} ", table + 1, col + 1)
            }
        }
    }
}

fn export_for_key(c: char) -> Option<ExportFormat> {
    ('1'..='8')
        .zip(ExportFormat::ALL)
        .find_map(|(key, format)| (key == c).then_some(format))
}

pub struct App {
    state: AppState,
    input: String,
    cursor_position: usize,
    prompt: Option<Prompt>,
    focus: Focus,
    selected_field: usize,
    selected_row: usize,
    selected_col: usize,
    chat_scroll: usize,
    pending: Vec<Effect>,
    pub should_quit: bool,
}

impl App {
    #[must_use]
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            input: String::new(),
            cursor_position: 0,
            prompt: None,
            focus: Focus::Fields,
            selected_field: 0,
            selected_row: 0,
            selected_col: 0,
            chat_scroll: 0,
            pending: Vec::new(),
            should_quit: false,
        }
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    #[must_use]
    pub fn cursor_position(&self) -> usize {
        self.cursor_position
    }

    #[must_use]
    pub fn input_mode(&self) -> InputMode {
        if self.prompt.is_some() {
            InputMode::Insert
        } else {
            InputMode::Normal
        }
    }

    #[must_use]
    pub fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    #[must_use]
    pub fn focus(&self) -> Focus {
        self.focus
    }

    #[must_use]
    pub fn selected_field(&self) -> usize {
        self.selected_field
    }

    #[must_use]
    pub fn chat_scroll(&self) -> usize {
        self.chat_scroll
    }

    /// `(table, row, col)` of the selected body cell, if any.
    #[must_use]
    pub fn selected_cell(&self) -> Option<(usize, usize, usize)> {
        let (table, row) = *self.body_rows().get(self.selected_row)?;
        let width = self.state.tables.as_ref()?.tables()[table][row].len();
        if width == 0 {
            return None;
        }
        Some((table, row, self.selected_col.min(width - 1)))
    }

    /// Effects produced since the last call, in order.
    pub fn take_effects(&mut self) -> Vec<Effect> {
        std::mem::take(&mut self.pending)
    }

    pub fn dispatch(&mut self, action: Action) {
        let effects = controller::update(&mut self.state, action);
        self.pending.extend(effects);
        self.clamp_selection();
    }

    pub fn draw(&self, frame: &mut ratatui::Frame) {
        let view = view::render(&self.state);
        let theme = Theme::for_mode(view.theme);
        let layout = AppLayout::compute(frame.area());

        frame.render_widget(Block::default().style(theme.base), frame.area());
        widgets::header::render(&view, &theme, frame, layout.header);
        widgets::preview::render(&view, &theme, frame, layout.preview);
        widgets::fields::render(self, &view, &theme, frame, layout.fields);
        widgets::tables::render(self, &view, &theme, frame, layout.tables);
        widgets::chat::render(self, &view, &theme, frame, layout.chat);
        widgets::insights::render(&view, &theme, frame, layout.insights);
        widgets::progress::render(&view, &theme, frame, layout.progress);
        widgets::input::render(self, &theme, frame, layout.input);
        widgets::status::render(self, &view, &theme, frame, layout.status);
    }

    pub fn handle_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::Key(key) => self.handle_key(key),
            AppEvent::Tick | AppEvent::Resize(..) => {}
            AppEvent::MouseScroll(delta) => {
                if delta > 0 {
                    self.chat_scroll = self.chat_scroll.saturating_add(1);
                } else {
                    self.chat_scroll = self.chat_scroll.saturating_sub(1);
                }
            }
            AppEvent::Completion(completion) => {
                let effects = controller::apply(&mut self.state, completion);
                self.pending.extend(effects);
                self.clamp_selection();
            }
            AppEvent::Saved { file_name, result } => {
                controller::download_finished(
                    &mut self.state,
                    &file_name,
                    result.as_deref().map_err(String::clone),
                );
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }
        if self.prompt.is_some() {
            self.handle_insert_key(key);
        } else {
            self.handle_normal_key(key);
        }
    }

    fn handle_normal_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('o') => self.open_prompt(Prompt::OpenFile, String::new()),
            KeyCode::Char('d') => self.dispatch(Action::Extract(ExtractionModel::Dataset)),
            KeyCode::Char('a') => self.dispatch(Action::Extract(ExtractionModel::Ai)),
            KeyCode::Char('b') => self.dispatch(Action::ShowBoxes),
            KeyCode::Char('[') => self.dispatch(Action::PrevPage),
            KeyCode::Char(']') => self.dispatch(Action::NextPage),
            KeyCode::Char('?') => self.open_prompt(Prompt::Question, String::new()),
            KeyCode::Char('/') => self.open_prompt(Prompt::Search, String::new()),
            KeyCode::Tab => self.focus = self.focus.next(),
            KeyCode::Up | KeyCode::Char('k') => self.move_selection(false),
            KeyCode::Down | KeyCode::Char('j') => self.move_selection(true),
            KeyCode::Left | KeyCode::Char('h') if self.focus == Focus::Tables => {
                self.selected_col = self.selected_col.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') if self.focus == Focus::Tables => {
                self.selected_col = self.selected_col.saturating_add(1);
                self.clamp_selection();
            }
            KeyCode::Enter | KeyCode::Char('e') => self.begin_edit(),
            KeyCode::Char('t') => self.dispatch(Action::ExtractTablesPage),
            KeyCode::Char('T') => self.dispatch(Action::ExtractTablesAll),
            KeyCode::Char('c') => self.dispatch(Action::ExportTablesCsv),
            KeyCode::Char('s') => self.dispatch(Action::Summarize),
            KeyCode::Char('f') => self.dispatch(Action::DetectFraud),
            KeyCode::Char('m') => self.dispatch(Action::ToggleTheme),
            KeyCode::Char(c) => {
                if let Some(format) = export_for_key(c) {
                    self.dispatch(Action::Export(format));
                }
            }
            _ => {}
        }
    }

    fn byte_offset_of_char(&self, char_idx: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_idx)
            .map_or(self.input.len(), |(i, _)| i)
    }

    fn char_count(&self) -> usize {
        self.input.chars().count()
    }

    fn handle_insert_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => self.submit_input(),
            KeyCode::Esc => {
                self.prompt = None;
                self.input.clear();
                self.cursor_position = 0;
            }
            KeyCode::Backspace => {
                if self.cursor_position > 0 {
                    let byte_offset = self.byte_offset_of_char(self.cursor_position - 1);
                    self.input.remove(byte_offset);
                    self.cursor_position -= 1;
                }
            }
            KeyCode::Delete => {
                if self.cursor_position < self.char_count() {
                    let byte_offset = self.byte_offset_of_char(self.cursor_position);
                    self.input.remove(byte_offset);
                }
            }
            KeyCode::Left => {
                self.cursor_position = self.cursor_position.saturating_sub(1);
            }
            KeyCode::Right => {
                if self.cursor_position < self.char_count() {
                    self.cursor_position += 1;
                }
            }
            KeyCode::Home => self.cursor_position = 0,
            KeyCode::End => self.cursor_position = self.char_count(),
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.input.clear();
                self.cursor_position = 0;
            }
            KeyCode::Char(c) => {
                let byte_offset = self.byte_offset_of_char(self.cursor_position);
                self.input.insert(byte_offset, c);
                self.cursor_position += 1;
            }
            _ => {}
        }
    }

    fn open_prompt(&mut self, prompt: Prompt, initial: String) {
        self.cursor_position = initial.chars().count();
        self.input = initial;
        self.prompt = Some(prompt);
    }

    fn submit_input(&mut self) {
        let Some(prompt) = self.prompt.take() else {
            return;
        };
        let text = std::mem::take(&mut self.input);
        self.cursor_position = 0;

        let action = match prompt {
            Prompt::OpenFile => {
                let path = text.trim();
                if path.is_empty() {
                    return;
                }
                Action::SelectFile(PathBuf::from(path))
            }
            Prompt::Question => {
                self.chat_scroll = 0;
                Action::Ask(text)
            }
            Prompt::Search => Action::Search(text),
            Prompt::EditField { label } => Action::EditField { label, value: text },
            Prompt::EditCell { table, row, col } => Action::EditCell {
                table,
                row,
                col,
                value: text,
            },
        };
        self.dispatch(action);
    }

    fn begin_edit(&mut self) {
        match self.focus {
            Focus::Fields => {
                let Some(label) = self.state.fields.label_at(self.selected_field) else {
                    return;
                };
                let label = label.to_owned();
                let value = self.state.fields.get(&label).unwrap_or_default().to_owned();
                self.open_prompt(Prompt::EditField { label }, value);
            }
            Focus::Tables => {
                let Some((table, row, col)) = self.selected_cell() else {
                    return;
                };
                let value = self
                    .state
                    .tables
                    .as_ref()
                    .and_then(|t| t.cell(table, row, col))
                    .unwrap_or_default()
                    .to_owned();
                self.open_prompt(Prompt::EditCell { table, row, col }, value);
            }
            Focus::Chat => self.open_prompt(Prompt::Question, String::new()),
        }
    }

    fn move_selection(&mut self, down: bool) {
        let step = |n: usize| {
            if down {
                n.saturating_add(1)
            } else {
                n.saturating_sub(1)
            }
        };
        match self.focus {
            Focus::Fields => self.selected_field = step(self.selected_field),
            Focus::Tables => self.selected_row = step(self.selected_row),
            // Scroll offset counts up from the newest message.
            Focus::Chat => {
                self.chat_scroll = if down {
                    self.chat_scroll.saturating_sub(1)
                } else {
                    self.chat_scroll.saturating_add(1)
                };
            }
        }
        self.clamp_selection();
    }

    /// Body rows (header excluded) of every extracted table as `(table, row)`.
    fn body_rows(&self) -> Vec<(usize, usize)> {
        let Some(tables) = &self.state.tables else {
            return Vec::new();
        };
        tables
            .tables()
            .iter()
            .enumerate()
            .flat_map(|(t, table)| (1..table.len()).map(move |r| (t, r)))
            .collect()
    }

    fn clamp_selection(&mut self) {
        self.selected_field = self
            .selected_field
            .min(self.state.fields.len().saturating_sub(1));
        let rows = self.body_rows();
        self.selected_row = self.selected_row.min(rows.len().saturating_sub(1));
        if let (Some(&(table, row)), Some(tables)) = (rows.get(self.selected_row), &self.state.tables)
        {
            let width = tables.tables()[table][row].len();
            self.selected_col = self.selected_col.min(width.saturating_sub(1));
        }
    }
}
