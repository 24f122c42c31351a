//! Full-screen batch review built on ratatui.

pub mod app;
pub mod events;
pub mod rendering;

use anyhow::Result;
use tracing::info;

use crate::media::Proposal;
use crate::mover::MoveItem;
use crate::naming::PathFormat;
use crate::review::Reviewer;

pub use app::{ReviewApp, ReviewExit};

#[derive(Debug, Default, Clone, Copy)]
pub struct TuiReviewer;

impl Reviewer for TuiReviewer {
    fn review(&mut self, proposals: &[Proposal], format: &PathFormat) -> Result<Vec<MoveItem>> {
        if proposals.is_empty() {
            return Ok(Vec::new());
        }

        let mut app = ReviewApp::new(proposals, format.clone());
        let exit = events::run_review(&mut app)?;
        if exit == ReviewExit::Aborted {
            info!("Review aborted, nothing will be moved");
        }
        Ok(app.into_move_items(exit))
    }
}
