use anyhow::{anyhow, Result};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Bookmark;

/// Form state for creating or editing a bookmark.
#[derive(Default, Clone)]
pub(crate) struct BookmarkForm {
    pub(crate) title: String,
    pub(crate) category: String,
    pub(crate) url: String,
    pub(crate) active: BookmarkField,
    pub(crate) error: Option<String>,
}

/// Enumerates the fields within the bookmark form to drive focus management.
#[derive(Copy, Clone, Default, PartialEq, Eq, Debug)]
pub(crate) enum BookmarkField {
    #[default]
    Title,
    Category,
    Url,
}

impl BookmarkField {
    /// Label rendered in front of the field value.
    pub(crate) fn label(self) -> &'static str {
        match self {
            BookmarkField::Title => "Title",
            BookmarkField::Category => "Category",
            BookmarkField::Url => "URL",
        }
    }

    fn placeholder(self) -> &'static str {
        match self {
            BookmarkField::Category => "<optional>",
            BookmarkField::Title | BookmarkField::Url => "<required>",
        }
    }

    /// Row offset of the field inside the form body.
    pub(crate) fn row(self) -> u16 {
        match self {
            BookmarkField::Title => 0,
            BookmarkField::Category => 1,
            BookmarkField::Url => 2,
        }
    }
}

impl BookmarkForm {
    /// Populate the form from an existing bookmark when entering edit mode.
    pub(crate) fn from_bookmark(bookmark: &Bookmark) -> Self {
        Self {
            title: bookmark.title.clone(),
            category: bookmark.category.clone(),
            url: bookmark.url.clone(),
            active: BookmarkField::Title,
            error: None,
        }
    }

    /// Cycle focus forward across the three fields.
    pub(crate) fn next_field(&mut self) {
        self.active = match self.active {
            BookmarkField::Title => BookmarkField::Category,
            BookmarkField::Category => BookmarkField::Url,
            BookmarkField::Url => BookmarkField::Title,
        };
    }

    /// Cycle focus backward across the three fields.
    pub(crate) fn previous_field(&mut self) {
        self.active = match self.active {
            BookmarkField::Title => BookmarkField::Url,
            BookmarkField::Category => BookmarkField::Title,
            BookmarkField::Url => BookmarkField::Category,
        };
    }

    /// Insert a character into the active field.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_control() {
            return false;
        }
        self.field_mut(self.active).push(ch);
        true
    }

    /// Remove a character from the active field.
    pub(crate) fn backspace(&mut self) {
        self.field_mut(self.active).pop();
    }

    /// Trim the inputs and insist on a title and a URL. The store itself
    /// accepts blanks, so this is the only place the rule is enforced.
    pub(crate) fn parse_inputs(&self) -> Result<(String, String, String)> {
        let title = self.title.trim();
        let url = self.url.trim();
        if title.is_empty() || url.is_empty() {
            return Err(anyhow!("Please provide at least a title and a URL."));
        }
        Ok((
            title.to_string(),
            self.category.trim().to_string(),
            url.to_string(),
        ))
    }

    /// Render a styled line for the modal form.
    pub(crate) fn build_line(&self, field: BookmarkField) -> Line<'static> {
        let value = self.field(field);
        let is_active = self.active == field;

        let display = if value.is_empty() {
            field.placeholder().to_string()
        } else {
            value.to_string()
        };

        let style = if is_active {
            Style::default().fg(Color::Yellow)
        } else if value.is_empty() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        Line::from(vec![
            Span::raw(format!("{}: ", field.label())),
            Span::styled(display, style),
        ])
    }

    /// Character length of the requested field.
    pub(crate) fn value_len(&self, field: BookmarkField) -> usize {
        self.field(field).chars().count()
    }

    fn field(&self, field: BookmarkField) -> &str {
        match field {
            BookmarkField::Title => &self.title,
            BookmarkField::Category => &self.category,
            BookmarkField::Url => &self.url,
        }
    }

    fn field_mut(&mut self, field: BookmarkField) -> &mut String {
        match field {
            BookmarkField::Title => &mut self.title,
            BookmarkField::Category => &mut self.category,
            BookmarkField::Url => &mut self.url,
        }
    }
}

/// What the id prompt will do once a valid id is entered.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub(crate) enum IdAction {
    Edit,
    Delete,
}

impl IdAction {
    pub(crate) fn title(self) -> &'static str {
        match self {
            IdAction::Edit => "Edit Bookmark",
            IdAction::Delete => "Delete Bookmark",
        }
    }
}

/// Small prompt that asks for a bookmark id before editing or deleting.
#[derive(Clone)]
pub(crate) struct IdPrompt {
    pub(crate) action: IdAction,
    pub(crate) input: String,
    pub(crate) error: Option<String>,
}

impl IdPrompt {
    pub(crate) fn new(action: IdAction) -> Self {
        Self {
            action,
            input: String::new(),
            error: None,
        }
    }

    /// Only digits are accepted, ids are never negative.
    pub(crate) fn push_char(&mut self, ch: char) -> bool {
        if ch.is_ascii_digit() {
            self.input.push(ch);
            true
        } else {
            false
        }
    }

    pub(crate) fn backspace(&mut self) {
        self.input.pop();
    }

    pub(crate) fn parse_id(&self) -> Result<u64> {
        self.input
            .trim()
            .parse::<u64>()
            .map_err(|_| anyhow!("Please enter a valid Bookmark ID."))
    }
}

/// State for confirming permanent bookmark deletion.
#[derive(Clone)]
pub(crate) struct ConfirmDelete {
    pub(crate) bookmark: Bookmark,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_inputs_requires_title_and_url() {
        let mut form = BookmarkForm::default();
        form.title = "  Rust Book ".to_string();
        assert!(form.parse_inputs().is_err());

        form.url = " https://doc.rust-lang.org/book/ ".to_string();
        let (title, category, url) = form.parse_inputs().unwrap();
        assert_eq!(title, "Rust Book");
        assert_eq!(category, "");
        assert_eq!(url, "https://doc.rust-lang.org/book/");
    }

    #[test]
    fn blank_title_is_rejected_even_with_url() {
        let form = BookmarkForm {
            title: "   ".to_string(),
            url: "https://x".to_string(),
            ..BookmarkForm::default()
        };
        let err = form.parse_inputs().unwrap_err();
        assert_eq!(err.to_string(), "Please provide at least a title and a URL.");
    }

    #[test]
    fn typing_goes_to_the_focused_field() {
        let mut form = BookmarkForm::default();
        for ch in "Go".chars() {
            form.push_char(ch);
        }
        form.next_field();
        form.push_char('P');
        form.next_field();
        form.push_char('u');
        form.backspace();
        form.push_char('x');

        assert_eq!(form.title, "Go");
        assert_eq!(form.category, "P");
        assert_eq!(form.url, "x");
        assert_eq!(form.value_len(BookmarkField::Url), 1);
    }

    #[test]
    fn focus_cycles_both_ways() {
        let mut form = BookmarkForm::default();
        form.previous_field();
        assert_eq!(form.active, BookmarkField::Url);
        form.next_field();
        assert_eq!(form.active, BookmarkField::Title);
    }

    #[test]
    fn control_characters_are_ignored() {
        let mut form = BookmarkForm::default();
        assert!(!form.push_char('\u{7}'));
        assert!(form.title.is_empty());
    }

    #[test]
    fn from_bookmark_copies_text_fields() {
        let form = BookmarkForm::from_bookmark(&Bookmark::new(4, "t", "c", "u"));
        assert_eq!(
            (form.title.as_str(), form.category.as_str(), form.url.as_str()),
            ("t", "c", "u")
        );
    }

    #[test]
    fn id_prompt_accepts_digits_only() {
        let mut prompt = IdPrompt::new(IdAction::Delete);
        assert!(!prompt.push_char('-'));
        assert!(!prompt.push_char('x'));
        assert!(prompt.push_char('1'));
        assert!(prompt.push_char('2'));
        assert_eq!(prompt.parse_id().unwrap(), 12);
    }

    #[test]
    fn empty_id_prompt_is_invalid() {
        let prompt = IdPrompt::new(IdAction::Edit);
        let err = prompt.parse_id().unwrap_err();
        assert_eq!(err.to_string(), "Please enter a valid Bookmark ID.");
    }
}
