use std::path::PathBuf;

use crossterm::event::KeyCode;
use ratatui::widgets::ListState;

use crate::media::Proposal;
use crate::mover::MoveItem;
use crate::naming::PathFormat;

#[derive(Debug, Clone)]
pub struct ReviewItem {
    pub proposal: Proposal,
    pub choice: usize,
    pub approved: bool,
}

impl ReviewItem {
    pub fn destination(&self, format: &PathFormat) -> PathBuf {
        self.proposal.candidates[self.choice].destination(format)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReviewExit {
    Confirmed,
    Aborted,
}

/// Review screen state. Knows nothing about the terminal so it can be driven from tests.
#[derive(Debug)]
pub struct ReviewApp {
    pub items: Vec<ReviewItem>,
    pub list_state: ListState,
    pub picker: Option<ListState>,
    pub show_help: bool,
    pub format: PathFormat,
    pub status_message: Option<String>,
}

impl ReviewApp {
    pub fn new(proposals: &[Proposal], format: PathFormat) -> Self {
        let items = proposals
            .iter()
            .map(|proposal| ReviewItem {
                proposal: proposal.clone(),
                choice: 0,
                approved: false,
            })
            .collect::<Vec<_>>();

        let mut list_state = ListState::default();
        if !items.is_empty() {
            list_state.select(Some(0));
        }

        Self {
            items,
            list_state,
            picker: None,
            show_help: false,
            format,
            status_message: None,
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.list_state.selected().filter(|&i| i < self.items.len())
    }

    pub fn approved_count(&self) -> usize {
        self.items.iter().filter(|item| item.approved).count()
    }

    pub fn next(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected() {
            Some(i) if i + 1 < self.items.len() => i + 1,
            _ => 0,
        };
        self.list_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.items.is_empty() {
            return;
        }
        let i = match self.selected() {
            Some(0) | None => self.items.len() - 1,
            Some(i) => i - 1,
        };
        self.list_state.select(Some(i));
    }

    pub fn set_selected_approval(&mut self, approved: bool) {
        if let Some(i) = self.selected() {
            self.items[i].approved = approved;
        }
    }

    pub fn toggle_selected(&mut self) {
        if let Some(i) = self.selected() {
            self.items[i].approved = !self.items[i].approved;
        }
    }

    pub fn accept_all(&mut self) {
        for item in &mut self.items {
            item.approved = true;
        }
        self.status_message = Some(format!("Accepted all {} moves", self.items.len()));
    }

    pub fn open_picker(&mut self) {
        if let Some(i) = self.selected() {
            let mut state = ListState::default();
            state.select(Some(self.items[i].choice));
            self.picker = Some(state);
        }
    }

    // Picker rows are the candidates followed by a final "Skip" row
    fn picker_rows(&self) -> usize {
        self.selected()
            .map(|i| self.items[i].proposal.candidates.len() + 1)
            .unwrap_or(0)
    }

    fn move_picker(&mut self, forward: bool) {
        let rows = self.picker_rows();
        if let Some(state) = self.picker.as_mut() {
            if rows == 0 {
                return;
            }
            let current = state.selected().unwrap_or(0);
            let next = if forward {
                (current + 1) % rows
            } else {
                (current + rows - 1) % rows
            };
            state.select(Some(next));
        }
    }

    fn confirm_picker(&mut self) {
        let Some(state) = self.picker.take() else {
            return;
        };
        let (Some(i), Some(row)) = (self.selected(), state.selected()) else {
            return;
        };

        let item = &mut self.items[i];
        if row < item.proposal.candidates.len() {
            item.choice = row;
            item.approved = true;
            self.status_message = Some(format!("Using {}", item.proposal.candidates[row].identity));
        } else {
            item.approved = false;
            self.status_message = Some("Skipped".to_string());
        }
    }

    /// Apply one key press. Returns `Some` when the review is over.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<ReviewExit> {
        if self.show_help {
            self.show_help = false;
            return None;
        }

        if self.picker.is_some() {
            match key {
                KeyCode::Down | KeyCode::Char('j') => self.move_picker(true),
                KeyCode::Up | KeyCode::Char('k') => self.move_picker(false),
                KeyCode::Enter => self.confirm_picker(),
                KeyCode::Esc | KeyCode::Char('q') => self.picker = None,
                _ => {}
            }
            return None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Some(ReviewExit::Aborted),
            KeyCode::Enter => return Some(ReviewExit::Confirmed),
            KeyCode::Down | KeyCode::Char('j') => self.next(),
            KeyCode::Up | KeyCode::Char('k') => self.previous(),
            KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('y') => {
                self.set_selected_approval(true);
                self.next();
            }
            KeyCode::Char('n') => {
                self.set_selected_approval(false);
                self.next();
            }
            KeyCode::Char('a') => self.accept_all(),
            KeyCode::Char('c') => self.open_picker(),
            KeyCode::Char('h') | KeyCode::Char('?') => self.show_help = true,
            _ => {}
        }
        None
    }

    /// Aborting declines everything.
    pub fn into_move_items(self, exit: ReviewExit) -> Vec<MoveItem> {
        let format = self.format;
        self.items
            .into_iter()
            .map(|item| MoveItem {
                source: item.proposal.media.path.clone(),
                destination: item.destination(&format),
                approved: item.approved && exit == ReviewExit::Confirmed,
            })
            .collect()
    }
}
