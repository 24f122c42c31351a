use std::io::{self, BufRead, Stdin, StdinLock, Stdout, Write};

use anyhow::Result;

use crate::media::Proposal;
use crate::mover::MoveItem;
use crate::naming::PathFormat;

/// Decides which proposed moves happen.
///
/// Returns one `MoveItem` per proposal, in order; declined items carry
/// `approved = false`.
pub trait Reviewer {
    fn review(&mut self, proposals: &[Proposal], format: &PathFormat) -> Result<Vec<MoveItem>>;
}

/// Approves the top candidate of every proposal without asking.
#[derive(Debug, Default, Clone, Copy)]
pub struct AutoApprove;

impl Reviewer for AutoApprove {
    fn review(&mut self, proposals: &[Proposal], format: &PathFormat) -> Result<Vec<MoveItem>> {
        Ok(proposals
            .iter()
            .map(|p| MoveItem::new(p.media.path.clone(), p.top().destination(format)))
            .collect())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptStyle {
    /// Ask per file; a rejection offers the other candidates.
    Immediate,
    /// Show everything first, then accept all or go one by one.
    Batch,
}

/// Line-based prompts on any reader/writer pair.
pub struct ConsoleReviewer<R, W> {
    input: R,
    output: W,
    style: PromptStyle,
    eof: bool,
}

impl ConsoleReviewer<StdinLock<'static>, Stdout> {
    pub fn stdio(style: PromptStyle) -> Self {
        let stdin: Stdin = io::stdin();
        Self::new(stdin.lock(), io::stdout(), style)
    }
}

impl<R: BufRead, W: Write> ConsoleReviewer<R, W> {
    pub fn new(input: R, output: W, style: PromptStyle) -> Self {
        Self {
            input,
            output,
            style,
            eof: false,
        }
    }

    pub fn into_output(self) -> W {
        self.output
    }

    // None once input is exhausted; every later question counts as declined
    fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        if self.eof {
            return Ok(None);
        }
        write!(self.output, "{}", prompt)?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            self.eof = true;
            writeln!(self.output)?;
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn confirm(&mut self, item: &MoveItem) -> Result<bool> {
        let prompt = format!(
            "mv '{}' '{}' [Yn] ",
            item.source.display(),
            item.destination.display()
        );
        Ok(matches!(
            self.ask(&prompt)?.as_deref(),
            Some("" | "y" | "Y" | "yes")
        ))
    }

    // Ranked list plus skip; returns the chosen candidate index
    fn pick_candidate(&mut self, proposal: &Proposal, format: &PathFormat) -> Result<Option<usize>> {
        writeln!(self.output, "Candidates for '{}':", proposal.media.path.display())?;
        for (i, candidate) in proposal.candidates.iter().enumerate() {
            writeln!(
                self.output,
                "  {}) {}  ->  {}",
                i + 1,
                candidate.identity,
                candidate.destination(format).display()
            )?;
        }
        writeln!(self.output, "  s) skip")?;

        let count = proposal.candidates.len();
        loop {
            let answer = self.ask(&format!("Choice [1-{}/s] ", count))?;
            match answer.as_deref() {
                None | Some("" | "s" | "S") => return Ok(None),
                Some(choice) => match choice.parse::<usize>() {
                    Ok(n) if (1..=count).contains(&n) => return Ok(Some(n - 1)),
                    _ => writeln!(self.output, "Invalid choice '{}'", choice)?,
                },
            }
        }
    }

    fn review_immediate(&mut self, proposals: &[Proposal], format: &PathFormat) -> Result<Vec<MoveItem>> {
        let mut items = Vec::with_capacity(proposals.len());
        for proposal in proposals {
            let mut item = MoveItem::new(proposal.media.path.clone(), proposal.top().destination(format));
            if !self.confirm(&item)? {
                match self.pick_candidate(proposal, format)? {
                    Some(index) => item.destination = proposal.candidates[index].destination(format),
                    None => item.approved = false,
                }
            }
            items.push(item);
        }
        Ok(items)
    }

    fn review_batch(&mut self, proposals: &[Proposal], format: &PathFormat) -> Result<Vec<MoveItem>> {
        let mut items = AutoApprove.review(proposals, format)?;
        if items.is_empty() {
            return Ok(items);
        }

        for (i, item) in items.iter().enumerate() {
            writeln!(
                self.output,
                "{:>3}. mv '{}' '{}'",
                i + 1,
                item.source.display(),
                item.destination.display()
            )?;
        }

        // Anything but an explicit yes falls through to one question per move
        let answer = self.ask("Accept all? [y/N/e(ach)] ")?;
        if !matches!(
            answer.as_deref().map(str::to_lowercase).as_deref(),
            Some("y" | "yes" | "a" | "all")
        ) {
            for item in items.iter_mut() {
                item.approved = self.confirm(item)?;
            }
        }
        Ok(items)
    }
}

impl<R: BufRead, W: Write> Reviewer for ConsoleReviewer<R, W> {
    fn review(&mut self, proposals: &[Proposal], format: &PathFormat) -> Result<Vec<MoveItem>> {
        match self.style {
            PromptStyle::Immediate => self.review_immediate(proposals, format),
            PromptStyle::Batch => self.review_batch(proposals, format),
        }
    }
}
