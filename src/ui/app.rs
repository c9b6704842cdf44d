use std::mem;

use anyhow::{anyhow, Result};
use crossterm::event::KeyCode;
use log::{debug, error};
use open::that as open_link;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::{
    Block, Borders, Clear, List, ListItem, ListState, Paragraph, Row, Table, TableState, Tabs,
    Wrap,
};
use ratatui::Frame;

use crate::error::StoreError;
use crate::models::Bookmark;
use crate::store::{BookmarkStore, Mutation};

use super::forms::{BookmarkField, BookmarkForm, ConfirmDelete, IdAction, IdPrompt};
use super::helpers::{centered_rect, openable_url, surface_error};
use super::screens::{ListScreen, SearchScreen, Tab};

/// Height of the tab bar at the top of the window.
const TABS_HEIGHT: u16 = 3;
/// Footer space reserved for status messages and instructions.
const FOOTER_HEIGHT: u16 = 3;
/// Rows skipped by PageUp / PageDown.
const PAGE_STEP: isize = 5;

/// Fine-grained modes layered on top of whichever tab is showing. Only
/// `Normal` lets keys reach the tab itself.
enum Mode {
    Normal,
    Adding(BookmarkForm),
    Editing { id: u64, form: BookmarkForm },
    PromptingId(IdPrompt),
    ConfirmDelete(ConfirmDelete),
}

/// Holds the footer message text plus its severity.
struct StatusMessage {
    text: String,
    kind: StatusKind,
}

/// Severity levels shown in the footer.
#[derive(Debug, PartialEq, Eq)]
enum StatusKind {
    Info,
    Error,
}

impl StatusKind {
    fn style(&self) -> Style {
        match self {
            StatusKind::Info => Style::default().fg(Color::Green),
            StatusKind::Error => Style::default().fg(Color::Red),
        }
    }
}

/// Central application state shared across the TUI.
pub struct App {
    store: BookmarkStore,
    tab: Tab,
    list: ListScreen,
    search: SearchScreen,
    mode: Mode,
    status: Option<StatusMessage>,
}

impl App {
    pub fn new(store: BookmarkStore) -> Self {
        let list = ListScreen::new(store.list_all().to_vec());
        let status = StatusMessage {
            text: format!(
                "Loaded {} bookmarks from {}.",
                store.len(),
                store.path().display()
            ),
            kind: StatusKind::Info,
        };
        Self {
            store,
            tab: Tab::All,
            list,
            search: SearchScreen::default(),
            mode: Mode::Normal,
            status: Some(status),
        }
    }

    /// Route a key press to the active mode. Returns `true` when the user
    /// asked to quit.
    pub fn handle_key(&mut self, code: KeyCode) -> Result<bool> {
        let mut exit = false;
        let mode = mem::replace(&mut self.mode, Mode::Normal);

        self.mode = match mode {
            Mode::Normal => self.handle_normal_key(code, &mut exit)?,
            Mode::Adding(form) => self.handle_add(code, form)?,
            Mode::Editing { id, form } => self.handle_edit(code, id, form)?,
            Mode::PromptingId(prompt) => self.handle_id_prompt(code, prompt)?,
            Mode::ConfirmDelete(confirm) => self.handle_confirm_delete(code, confirm)?,
        };

        Ok(exit)
    }

    /// Control-key shortcuts. They only apply while no dialog is open.
    pub(crate) fn handle_ctrl(&mut self, ch: char) -> Result<()> {
        if !matches!(self.mode, Mode::Normal) {
            return Ok(());
        }

        match (ch, self.tab) {
            ('r', _) => self.reload(),
            ('t', Tab::Search) => {
                let mode = self.search.toggle_mode();
                self.set_status(format!("Search mode: {}.", mode.label()), StatusKind::Info);
                self.refresh_search();
            }
            ('e', Tab::Search) => self.mode = self.edit_mode_for(self.selected_bookmark()),
            ('d', Tab::Search) => self.mode = self.delete_mode_for(self.selected_bookmark()),
            _ => {}
        }
        Ok(())
    }

    fn handle_normal_key(&mut self, code: KeyCode, exit: &mut bool) -> Result<Mode> {
        match self.tab {
            Tab::All => match code {
                KeyCode::Char('q') | KeyCode::Esc => {
                    *exit = true;
                }
                KeyCode::Tab | KeyCode::BackTab | KeyCode::Char('/') | KeyCode::Char('f') => {
                    self.switch_tab();
                }
                KeyCode::Up => self.list.move_selection(-1),
                KeyCode::Down => self.list.move_selection(1),
                KeyCode::PageUp => self.list.move_selection(-PAGE_STEP),
                KeyCode::PageDown => self.list.move_selection(PAGE_STEP),
                KeyCode::Home => self.list.select_first(),
                KeyCode::End => self.list.select_last(),
                KeyCode::Enter | KeyCode::Char('o') => self.open_selected(),
                KeyCode::Char('+') | KeyCode::Char('a') => {
                    self.clear_status();
                    return Ok(Mode::Adding(BookmarkForm::default()));
                }
                KeyCode::Char('e') => return Ok(self.edit_mode_for(self.selected_bookmark())),
                KeyCode::Char('-') | KeyCode::Char('d') => {
                    return Ok(self.delete_mode_for(self.selected_bookmark()));
                }
                KeyCode::Char('E') => {
                    self.clear_status();
                    return Ok(Mode::PromptingId(IdPrompt::new(IdAction::Edit)));
                }
                KeyCode::Char('D') => {
                    self.clear_status();
                    return Ok(Mode::PromptingId(IdPrompt::new(IdAction::Delete)));
                }
                _ => {}
            },
            Tab::Search => match code {
                KeyCode::Esc => {
                    if self.search.has_query() {
                        self.search.query.clear();
                        self.clear_status();
                        self.refresh_search();
                    } else {
                        self.switch_tab();
                    }
                }
                KeyCode::Tab | KeyCode::BackTab => self.switch_tab(),
                KeyCode::Up => self.search.move_selection(-1),
                KeyCode::Down => self.search.move_selection(1),
                KeyCode::PageUp => self.search.move_selection(-PAGE_STEP),
                KeyCode::PageDown => self.search.move_selection(PAGE_STEP),
                KeyCode::Home => self.search.select_first(),
                KeyCode::End => self.search.select_last(),
                KeyCode::Enter => self.open_selected(),
                KeyCode::Backspace => {
                    self.search.query.pop();
                    self.refresh_search();
                }
                KeyCode::Char(ch) if !ch.is_control() => {
                    self.search.query.push(ch);
                    self.refresh_search();
                }
                _ => {}
            },
        }
        Ok(Mode::Normal)
    }

    fn handle_add(&mut self, code: KeyCode, mut form: BookmarkForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                debug!("Add bookmark cancelled");
                self.set_status("Add bookmark cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_new_bookmark(&form) {
                Ok(()) => keep_open = false,
                Err(err) => self.reject_form(&mut form, &err),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::Adding(form))
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_edit(&mut self, code: KeyCode, id: u64, mut form: BookmarkForm) -> Result<Mode> {
        let mut keep_open = true;
        match code {
            KeyCode::Esc => {
                debug!("Edit of bookmark {id} cancelled");
                self.set_status("Edit cancelled.", StatusKind::Info);
                keep_open = false;
            }
            KeyCode::Tab | KeyCode::Down => form.next_field(),
            KeyCode::BackTab | KeyCode::Up => form.previous_field(),
            KeyCode::Backspace => form.backspace(),
            KeyCode::Enter => match self.save_existing_bookmark(id, &form) {
                Ok(()) => keep_open = false,
                Err(err) => self.reject_form(&mut form, &err),
            },
            KeyCode::Char(ch) => {
                if form.push_char(ch) {
                    form.error = None;
                }
            }
            _ => {}
        }

        if keep_open {
            Ok(Mode::Editing { id, form })
        } else {
            Ok(Mode::Normal)
        }
    }

    fn handle_id_prompt(&mut self, code: KeyCode, mut prompt: IdPrompt) -> Result<Mode> {
        match code {
            KeyCode::Esc => {
                self.set_status("Cancelled.", StatusKind::Info);
                return Ok(Mode::Normal);
            }
            KeyCode::Backspace => prompt.backspace(),
            KeyCode::Enter => {
                let lookup = prompt.parse_id().and_then(|id| {
                    self.store
                        .get(id)
                        .cloned()
                        .ok_or_else(|| anyhow!("No bookmark found with ID {id}"))
                });
                match lookup {
                    Ok(bookmark) => {
                        self.clear_status();
                        return Ok(match prompt.action {
                            IdAction::Edit => Mode::Editing {
                                id: bookmark.id,
                                form: BookmarkForm::from_bookmark(&bookmark),
                            },
                            IdAction::Delete => Mode::ConfirmDelete(ConfirmDelete { bookmark }),
                        });
                    }
                    Err(err) => {
                        let message = surface_error(&err);
                        error!("{message}");
                        prompt.error = Some(message.clone());
                        self.set_status(message, StatusKind::Error);
                    }
                }
            }
            KeyCode::Char(ch) => {
                if prompt.push_char(ch) {
                    prompt.error = None;
                }
            }
            _ => {}
        }
        Ok(Mode::PromptingId(prompt))
    }

    fn handle_confirm_delete(&mut self, code: KeyCode, confirm: ConfirmDelete) -> Result<Mode> {
        match code {
            KeyCode::Esc | KeyCode::Char('n') | KeyCode::Char('N') => {
                debug!("Bookmark deletion cancelled by user");
                self.set_status("Deletion cancelled.", StatusKind::Info);
                Ok(Mode::Normal)
            }
            KeyCode::Enter | KeyCode::Char('y') | KeyCode::Char('Y') => {
                if let Err(err) = self.perform_delete(&confirm) {
                    self.set_status(surface_error(&err), StatusKind::Error);
                }
                Ok(Mode::Normal)
            }
            _ => Ok(Mode::ConfirmDelete(confirm)),
        }
    }

    pub(crate) fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(TABS_HEIGHT),
                Constraint::Min(0),
                Constraint::Length(FOOTER_HEIGHT),
            ])
            .split(area);

        self.draw_tabs(frame, chunks[0]);
        match self.tab {
            Tab::All => self.draw_list(frame, chunks[1]),
            Tab::Search => self.draw_search(frame, chunks[1]),
        }
        self.draw_footer(frame, chunks[2]);

        match &self.mode {
            Mode::Adding(form) => self.draw_form(frame, area, "Add Bookmark", form),
            Mode::Editing { id, form } => {
                self.draw_form(frame, area, &format!("Edit Bookmark {id}"), form)
            }
            Mode::PromptingId(prompt) => self.draw_id_prompt(frame, area, prompt),
            Mode::ConfirmDelete(confirm) => self.draw_confirm_delete(frame, area, confirm),
            Mode::Normal => {}
        }
    }

    fn draw_tabs(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("BookmarkMe · {}", self.store.path().display()));
        let tabs = Tabs::new(Tab::TITLES)
            .block(block)
            .select(self.tab.index())
            .highlight_style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            );
        frame.render_widget(tabs, area);
    }

    fn draw_list(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("{} bookmarks", self.list.bookmarks.len()));

        if self.list.bookmarks.is_empty() {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                "No bookmarks yet. Press + to add one.",
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(paragraph, area);
            return;
        }

        let header = Row::new(["ID", "Title", "Category", "URL"])
            .style(Style::default().add_modifier(Modifier::BOLD));
        let rows = self.list.bookmarks.iter().map(|bookmark| {
            Row::new([
                bookmark.id.to_string(),
                bookmark.title.clone(),
                bookmark.category.clone(),
                bookmark.url.clone(),
            ])
        });
        let table = Table::new(
            rows,
            [
                Constraint::Length(6),
                Constraint::Percentage(30),
                Constraint::Percentage(20),
                Constraint::Fill(1),
            ],
        )
        .header(header)
        .block(block)
        .row_highlight_style(
            Style::default()
                .bg(Color::DarkGray)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

        let mut state = TableState::default().with_selected(Some(self.list.selected));
        frame.render_stateful_widget(table, area, &mut state);
    }

    fn draw_search(&self, frame: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(0)])
            .split(area);

        let border_style = if self.search.error.is_some() {
            Style::default().fg(Color::Red)
        } else {
            Style::default()
        };
        let input_block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .title(format!("Search Query ({})", self.search.mode.label()));
        let input = Paragraph::new(Span::raw(self.search.query.clone())).block(input_block.clone());
        frame.render_widget(input, chunks[0]);

        let results_block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Results ({})", self.search.results.len()));

        let placeholder = if !self.search.has_query() {
            Some("Enter a search query.")
        } else if self.search.results.is_empty() {
            Some("No matching bookmarks found.")
        } else {
            None
        };

        if let Some(text) = placeholder {
            let paragraph = Paragraph::new(Line::from(Span::styled(
                text,
                Style::default().fg(Color::DarkGray),
            )))
            .block(results_block);
            frame.render_widget(paragraph, chunks[1]);
        } else {
            let items: Vec<ListItem> = self
                .search
                .results
                .iter()
                .map(|bookmark| ListItem::new(bookmark.to_string()))
                .collect();
            let list = List::new(items)
                .block(results_block)
                .highlight_style(
                    Style::default()
                        .bg(Color::DarkGray)
                        .add_modifier(Modifier::BOLD),
                )
                .highlight_symbol("> ");
            let mut state = ListState::default().with_selected(Some(self.search.selected));
            frame.render_stateful_widget(list, chunks[1], &mut state);
        }

        if matches!(self.mode, Mode::Normal) {
            let inner = input_block.inner(chunks[0]);
            let cursor_x = inner.x + self.search.query.chars().count() as u16;
            frame.set_cursor_position((cursor_x, inner.y));
        }
    }

    fn draw_footer(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default().borders(Borders::TOP);
        frame.render_widget(block.clone(), area);
        let inner = block.inner(area);

        let status_line = if let Some(status) = &self.status {
            Line::from(vec![Span::styled(status.text.clone(), status.kind.style())])
        } else {
            Line::from("")
        };

        let instructions = self.footer_instructions();

        let paragraph = Paragraph::new(vec![status_line, instructions]).wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn footer_instructions(&self) -> Line<'static> {
        let key_style = Style::default()
            .fg(Color::Cyan)
            .add_modifier(Modifier::BOLD);
        let hints: &[(&str, &str)] = match (&self.mode, self.tab) {
            (Mode::Adding(_) | Mode::Editing { .. }, _) => &[
                ("[Tab]", " Next Field   "),
                ("[Enter]", " Save   "),
                ("[Esc]", " Cancel"),
            ],
            (Mode::PromptingId(_), _) => &[
                ("[0-9]", " Bookmark ID   "),
                ("[Enter]", " Continue   "),
                ("[Esc]", " Cancel"),
            ],
            (Mode::ConfirmDelete(_), _) => &[("[Y]", " Delete   "), ("[N]", " Keep")],
            (Mode::Normal, Tab::All) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[+]", " Add   "),
                ("[e]", " Edit   "),
                ("[-]", " Delete   "),
                ("[E/D]", " By ID   "),
                ("[/]", " Search   "),
                ("[Ctrl-R]", " Reload   "),
                ("[q]", " Quit"),
            ],
            (Mode::Normal, Tab::Search) => &[
                ("[↑↓]", " Navigate   "),
                ("[Enter]", " Open   "),
                ("[Ctrl-E]", " Edit   "),
                ("[Ctrl-D]", " Delete   "),
                ("[Ctrl-T]", " Regex/Literal   "),
                ("[Tab]", " All Bookmarks   "),
                ("[Esc]", " Clear"),
            ],
        };

        let spans: Vec<Span<'static>> = hints
            .iter()
            .flat_map(|(key, label)| {
                [
                    Span::styled(key.to_string(), key_style),
                    Span::raw(label.to_string()),
                ]
            })
            .collect();
        Line::from(spans)
    }

    fn draw_form(&self, frame: &mut Frame, area: Rect, title: &str, form: &BookmarkForm) {
        let popup_area = centered_rect(70, 40, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title(title.to_string()).borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let fields = [
            BookmarkField::Title,
            BookmarkField::Category,
            BookmarkField::Url,
        ];
        let mut lines: Vec<Line> = fields.iter().map(|field| form.build_line(*field)).collect();
        lines.push(Line::from(""));

        if let Some(error) = &form.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to save • Tab to switch • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        let paragraph = Paragraph::new(lines);
        frame.render_widget(paragraph, inner);

        let prefix = format!("{}: ", form.active.label()).len() as u16;
        let cursor_x = inner.x + prefix + form.value_len(form.active) as u16;
        let cursor_y = inner.y + form.active.row();
        frame.set_cursor_position((cursor_x, cursor_y));
    }

    fn draw_id_prompt(&self, frame: &mut Frame, area: Rect, prompt: &IdPrompt) {
        let popup_area = centered_rect(50, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(prompt.action.title())
            .borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let mut lines = vec![
            Line::from(vec![
                Span::raw("Bookmark ID: "),
                Span::styled(prompt.input.clone(), Style::default().fg(Color::Yellow)),
            ]),
            Line::from(""),
        ];
        if let Some(error) = &prompt.error {
            lines.push(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
        } else {
            lines.push(Line::from(Span::styled(
                "Enter to continue • Esc to cancel",
                Style::default().fg(Color::Gray),
            )));
        }

        frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), inner);

        let cursor_x = inner.x + "Bookmark ID: ".len() as u16 + prompt.input.len() as u16;
        frame.set_cursor_position((cursor_x, inner.y));
    }

    fn draw_confirm_delete(&self, frame: &mut Frame, area: Rect, confirm: &ConfirmDelete) {
        let popup_area = centered_rect(60, 30, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default().title("Confirm").borders(Borders::ALL);
        frame.render_widget(block.clone(), popup_area);
        let inner = block.inner(popup_area);

        let bookmark = &confirm.bookmark;
        let lines = vec![
            Line::from(format!(
                "Are you sure you want to delete bookmark ID {}?",
                bookmark.id
            )),
            Line::from(format!("{} ({})", bookmark.title, bookmark.url)),
            Line::from(""),
            Line::from(Span::styled(
                "Press Y to confirm or N / Esc to cancel.",
                Style::default().fg(Color::Gray),
            )),
        ];

        let paragraph = Paragraph::new(lines)
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, inner);
    }

    fn set_status<S: Into<String>>(&mut self, text: S, kind: StatusKind) {
        self.status = Some(StatusMessage {
            text: text.into(),
            kind,
        });
    }

    fn clear_status(&mut self) {
        self.status = None;
    }

    /// Turn the save outcome of a mutation into a footer message. The change
    /// stays in memory either way.
    fn report_saved(&mut self, saved: Result<(), StoreError>, success: String) {
        match saved {
            Ok(()) => self.set_status(success, StatusKind::Info),
            Err(err) => {
                let err = anyhow::Error::from(err);
                self.set_status(
                    format!("Saved in memory only: {}", surface_error(&err)),
                    StatusKind::Error,
                );
            }
        }
    }

    fn reject_form(&mut self, form: &mut BookmarkForm, err: &anyhow::Error) {
        let message = surface_error(err);
        error!("{message}");
        form.error = Some(message.clone());
        self.set_status(message, StatusKind::Error);
    }

    fn save_new_bookmark(&mut self, form: &BookmarkForm) -> Result<()> {
        let (title, category, url) = form.parse_inputs()?;
        let Mutation { value, saved } = self.store.add(title, category, url)?;
        self.refresh_views(Some(value.id));
        self.report_saved(saved, format!("Bookmark added with ID {}.", value.id));
        Ok(())
    }

    fn save_existing_bookmark(&mut self, id: u64, form: &BookmarkForm) -> Result<()> {
        let (title, category, url) = form.parse_inputs()?;
        let Mutation { value: found, saved } = self.store.edit(id, title, category, url);
        if !found {
            return Err(anyhow!("No bookmark found with ID {id}"));
        }
        self.refresh_views(Some(id));
        self.report_saved(saved, format!("Bookmark {id} updated."));
        Ok(())
    }

    fn perform_delete(&mut self, confirm: &ConfirmDelete) -> Result<()> {
        let id = confirm.bookmark.id;
        let Mutation { value: found, saved } = self.store.delete(id);
        if !found {
            return Err(anyhow!("No bookmark found with ID {id}"));
        }
        self.refresh_views(None);
        self.report_saved(saved, format!("Bookmark {id} deleted."));
        Ok(())
    }

    fn reload(&mut self) {
        let count = self.store.reload();
        self.refresh_views(None);
        self.set_status(
            format!(
                "Reloaded {count} bookmarks from {}.",
                self.store.path().display()
            ),
            StatusKind::Info,
        );
    }

    /// Re-fetch every view from the store after a mutation.
    fn refresh_views(&mut self, focus_id: Option<u64>) {
        self.list
            .set_bookmarks(self.store.list_all().to_vec(), focus_id);
        self.refresh_search();
    }

    fn refresh_search(&mut self) {
        if self.search.refresh(&self.store).is_err() {
            let message = self.search.error.clone().unwrap_or_default();
            self.set_status(message, StatusKind::Error);
        }
    }

    fn switch_tab(&mut self) {
        self.tab = self.tab.next();
        self.clear_status();
    }

    fn selected_bookmark(&self) -> Option<Bookmark> {
        match self.tab {
            Tab::All => self.list.current().cloned(),
            Tab::Search => self.search.current().cloned(),
        }
    }

    fn edit_mode_for(&mut self, bookmark: Option<Bookmark>) -> Mode {
        match bookmark {
            Some(bookmark) => {
                self.clear_status();
                Mode::Editing {
                    id: bookmark.id,
                    form: BookmarkForm::from_bookmark(&bookmark),
                }
            }
            None => {
                self.set_status("Please select a bookmark first.", StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn delete_mode_for(&mut self, bookmark: Option<Bookmark>) -> Mode {
        match bookmark {
            Some(bookmark) => {
                self.clear_status();
                Mode::ConfirmDelete(ConfirmDelete { bookmark })
            }
            None => {
                self.set_status("Please select a bookmark first.", StatusKind::Error);
                Mode::Normal
            }
        }
    }

    fn open_selected(&mut self) {
        let Some(bookmark) = self.selected_bookmark() else {
            self.set_status("Please select a bookmark first.", StatusKind::Error);
            return;
        };

        match openable_url(&bookmark) {
            Err(err) => self.set_status(surface_error(&err), StatusKind::Error),
            Ok(url) => {
                if let Err(err) = open_link(url) {
                    error!("Failed to open {url}: {err}");
                    self.set_status(format!("Failed to open link: {err}"), StatusKind::Error);
                } else {
                    debug!("Opened {url}");
                    self.set_status(format!("Opened {}.", bookmark.title), StatusKind::Info);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use tempfile::{tempdir, TempDir};

    use super::*;

    fn app_in(dir: &TempDir) -> App {
        App::new(BookmarkStore::open(dir.path().join("bookmarks.json")))
    }

    fn type_text(app: &mut App, text: &str) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch)).unwrap();
        }
    }

    fn add_via_form(app: &mut App, title: &str, category: &str, url: &str) {
        app.handle_key(KeyCode::Char('+')).unwrap();
        type_text(app, title);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, category);
        app.handle_key(KeyCode::Tab).unwrap();
        type_text(app, url);
        app.handle_key(KeyCode::Enter).unwrap();
    }

    fn status_text(app: &App) -> &str {
        app.status.as_ref().map(|s| s.text.as_str()).unwrap_or("")
    }

    #[test]
    fn add_form_creates_and_focuses_bookmark() {
        let dir = tempdir().unwrap();
        let mut app = app_in(&dir);
        add_via_form(&mut app, "Go Docs", "Programming", "https://go.dev");
        add_via_form(&mut app, "Rust Book", "Programming", "https://doc.rust-lang.org/book/");

        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.list.bookmarks.len(), 2);
        assert_eq!(app.list.current().map(|b| b.id), Some(2));
        assert_eq!(status_text(&app), "Bookmark added with ID 2.");

        let reopened = BookmarkStore::open(dir.path().join("bookmarks.json"));
        assert_eq!(reopened.len(), 2);
    }

    #[test]
    fn add_form_without_url_stays_open_with_error() {
        let dir = tempdir().unwrap();
        let mut app = app_in(&dir);
        add_via_form(&mut app, "No link", "", "");

        match &app.mode {
            Mode::Adding(form) => assert_eq!(
                form.error.as_deref(),
                Some("Please provide at least a title and a URL.")
            ),
            _ => panic!("form should stay open"),
        }
        assert!(app.store.is_empty());
    }

    #[test]
    fn delete_requires_confirmation() {
        let dir = tempdir().unwrap();
        let mut app = app_in(&dir);
        add_via_form(&mut app, "a", "", "https://a");

        app.handle_key(KeyCode::Char('-')).unwrap();
        app.handle_key(KeyCode::Char('n')).unwrap();
        assert_eq!(app.store.len(), 1);
        assert_eq!(status_text(&app), "Deletion cancelled.");

        app.handle_key(KeyCode::Char('-')).unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert!(app.store.is_empty());
        assert!(app.list.bookmarks.is_empty());
    }

    #[test]
    fn edit_by_id_prefills_and_updates() {
        let dir = tempdir().unwrap();
        let mut app = app_in(&dir);
        add_via_form(&mut app, "old", "", "https://old");

        app.handle_key(KeyCode::Char('E')).unwrap();
        type_text(&mut app, "1");
        app.handle_key(KeyCode::Enter).unwrap();
        assert!(matches!(app.mode, Mode::Editing { id: 1, .. }));

        app.handle_key(KeyCode::Backspace).unwrap();
        app.handle_key(KeyCode::Backspace).unwrap();
        app.handle_key(KeyCode::Backspace).unwrap();
        type_text(&mut app, "new");
        app.handle_key(KeyCode::Enter).unwrap();

        assert_eq!(app.store.get(1).map(|b| b.title.as_str()), Some("new"));
    }

    #[test]
    fn id_prompt_reports_unknown_ids() {
        let dir = tempdir().unwrap();
        let mut app = app_in(&dir);

        app.handle_key(KeyCode::Char('D')).unwrap();
        type_text(&mut app, "9");
        app.handle_key(KeyCode::Enter).unwrap();

        assert!(matches!(app.mode, Mode::PromptingId(_)));
        assert_eq!(status_text(&app), "No bookmark found with ID 9");

        app.handle_key(KeyCode::Backspace).unwrap();
        app.handle_key(KeyCode::Enter).unwrap();
        assert_eq!(status_text(&app), "Please enter a valid Bookmark ID.");
    }

    #[test]
    fn search_tab_filters_live_and_reports_bad_patterns() {
        let dir = tempdir().unwrap();
        let mut app = app_in(&dir);
        add_via_form(&mut app, "Go Docs", "Programming", "https://go.dev");
        add_via_form(&mut app, "Rust Book", "Programming", "https://doc.rust-lang.org/book/");

        app.handle_key(KeyCode::Char('/')).unwrap();
        assert_eq!(app.tab, Tab::Search);
        type_text(&mut app, "rust");
        assert_eq!(app.search.results.len(), 1);

        type_text(&mut app, "(");
        assert_eq!(app.status.as_ref().map(|s| &s.kind), Some(&StatusKind::Error));
        assert_eq!(app.search.results.len(), 1);

        app.handle_ctrl('t').unwrap();
        assert!(app.search.results.is_empty());
        assert!(app.search.error.is_none());

        app.handle_key(KeyCode::Esc).unwrap();
        assert!(app.search.query.is_empty());
        app.handle_key(KeyCode::Esc).unwrap();
        assert_eq!(app.tab, Tab::All);
    }

    #[test]
    fn deleting_under_a_bad_pattern_leaves_no_stale_search_rows() {
        let dir = tempdir().unwrap();
        let mut app = app_in(&dir);
        add_via_form(&mut app, "Go Docs", "", "https://go.dev");
        add_via_form(&mut app, "Rust Docs", "", "https://doc.rust-lang.org");

        app.handle_key(KeyCode::Char('/')).unwrap();
        type_text(&mut app, "docs(");
        assert_eq!(app.search.results.len(), 2);

        app.handle_ctrl('d').unwrap();
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert_eq!(app.store.len(), 1);
        assert_eq!(app.search.results.len(), 1);

        app.handle_ctrl('d').unwrap();
        assert!(matches!(app.mode, Mode::ConfirmDelete(_)));
        app.handle_key(KeyCode::Char('y')).unwrap();
        assert!(app.store.is_empty());
        assert!(app.search.results.is_empty());
    }

    #[test]
    fn ctrl_reload_rereads_the_file() {
        let dir = tempdir().unwrap();
        let mut app = app_in(&dir);
        add_via_form(&mut app, "a", "", "https://a");

        std::fs::write(dir.path().join("bookmarks.json"), "[]").unwrap();
        app.handle_ctrl('r').unwrap();
        assert!(app.list.bookmarks.is_empty());
    }

    #[test]
    fn save_failures_surface_in_the_footer() {
        let dir = tempdir().unwrap();
        let mut app = App::new(BookmarkStore::empty(dir.path()));
        add_via_form(&mut app, "kept", "", "https://kept");

        assert_eq!(app.list.bookmarks.len(), 1);
        assert!(status_text(&app).starts_with("Saved in memory only:"));
    }

    #[test]
    fn quits_on_q_from_the_list() {
        let dir = tempdir().unwrap();
        let mut app = app_in(&dir);
        assert!(app.handle_key(KeyCode::Char('q')).unwrap());
    }

    #[test]
    fn renders_every_mode_without_panicking() {
        let dir = tempdir().unwrap();
        let mut app = app_in(&dir);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| app.draw(frame)).unwrap();

        add_via_form(&mut app, "Go Docs", "Programming", "https://go.dev");
        for key in [KeyCode::Char('+'), KeyCode::Esc, KeyCode::Char('-')] {
            app.handle_key(key).unwrap();
            terminal.draw(|frame| app.draw(frame)).unwrap();
        }
        app.handle_key(KeyCode::Esc).unwrap();
        app.handle_key(KeyCode::Char('/')).unwrap();
        type_text(&mut app, "go");
        terminal.draw(|frame| app.draw(frame)).unwrap();

        let rendered: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|cell| cell.symbol())
            .collect();
        assert!(rendered.contains("ID:1 | Title: Go Docs"));
    }
}
