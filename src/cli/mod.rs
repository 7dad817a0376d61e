//! Interactive chat session.
//!
//! A line-oriented loop over any `BufRead`/`Write` pair: free text is sent
//! to the agent, `stats` prints learning statistics, `exit` ends the
//! session. After each reply the user is asked whether it helped.

use std::io::{self, BufRead, Write};

use crate::agent::{AgentStats, SelfLearningAgent};
use crate::memory::interaction::Feedback;
use crate::utilities::printer::{Printer, PrinterColor};

const RULE: &str = "==================================================";
const GOODBYE: &str = "\nGoodbye! I'll remember our conversation.";
const FEEDBACK_PROMPT: &str = "\nWas this helpful? (y/n/skip): ";

/// Commands recognised at the `You:` prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    /// Print learning statistics.
    Stats,
    /// End the session.
    Exit,
}

impl std::fmt::Display for SessionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Stats => write!(f, "stats"),
            Self::Exit => write!(f, "exit"),
        }
    }
}

/// Parse a session command; anything else is a chat message.
pub fn parse_command(input: &str) -> Option<SessionCommand> {
    match input.trim().to_lowercase().as_str() {
        "stats" => Some(SessionCommand::Stats),
        "exit" => Some(SessionCommand::Exit),
        _ => None,
    }
}

/// Answer to the post-reply feedback prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackAnswer {
    Yes,
    No,
    Skip,
}

impl FeedbackAnswer {
    /// `y` and `n` (any case); everything else skips.
    pub fn parse(input: &str) -> Self {
        match input.trim().to_lowercase().as_str() {
            "y" => Self::Yes,
            "n" => Self::No,
            _ => Self::Skip,
        }
    }

    pub fn feedback(&self) -> Option<Feedback> {
        match self {
            Self::Yes => Some(Feedback::Positive),
            Self::No => Some(Feedback::Negative),
            Self::Skip => None,
        }
    }
}

/// Render statistics as the human-readable block shown by `stats`.
pub fn render_stats(stats: &AgentStats) -> String {
    let mut out = String::from("\n--- Learning Statistics ---\n");
    out.push_str(&format!("Total interactions: {}\n", stats.total_interactions));
    out.push_str(&format!("Knowledge items: {}\n", stats.knowledge_items));
    out.push_str(&format!("Positive feedback: {}\n", stats.positive_feedback));
    out.push_str("\nPersonality:");
    for (name, value) in stats.personality.iter() {
        let label = name.as_str();
        let mut chars = label.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
            None => String::new(),
        };
        out.push_str(&format!("\n  {}: {:.2}", capitalized, value));
    }
    out
}

/// Drives one interactive session.
pub struct Session<R, W> {
    input: R,
    output: W,
    printer: Printer,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(input: R, output: W, printer: Printer) -> Self {
        Self {
            input,
            output,
            printer,
        }
    }

    /// Consume the session and hand back the output sink.
    pub fn into_output(self) -> W {
        self.output
    }

    /// Read one line; `None` at end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn banner(&mut self) -> io::Result<()> {
        let lines = [
            (RULE, PrinterColor::BoldCyan),
            ("Recall: a self-learning assistant", PrinterColor::BoldWhite),
            (RULE, PrinterColor::BoldCyan),
            ("\nCommands:", PrinterColor::BoldWhite),
            ("  - Type your question to chat", PrinterColor::White),
            ("  - Type 'stats' to see learning statistics", PrinterColor::White),
            ("  - Type 'exit' to quit", PrinterColor::White),
            (RULE, PrinterColor::BoldCyan),
        ];
        for (text, color) in lines {
            self.printer.line(&mut self.output, text, color)?;
        }
        Ok(())
    }

    /// Run until `exit` or end of input.
    ///
    /// Agent errors are reported and the session continues; only I/O errors
    /// on the session's own streams end it early.
    pub fn run(&mut self, agent: &mut SelfLearningAgent) -> io::Result<()> {
        self.banner()?;

        loop {
            self.printer.prompt(&mut self.output, "\nYou: ")?;
            let Some(input) = self.read_line()? else {
                self.printer.line(&mut self.output, GOODBYE, PrinterColor::Cyan)?;
                return Ok(());
            };
            if input.is_empty() {
                continue;
            }

            match parse_command(&input) {
                Some(SessionCommand::Exit) => {
                    self.printer.line(&mut self.output, GOODBYE, PrinterColor::Cyan)?;
                    return Ok(());
                }
                Some(SessionCommand::Stats) => match agent.stats() {
                    Ok(stats) => {
                        self.printer
                            .line(&mut self.output, &render_stats(&stats), PrinterColor::Yellow)?
                    }
                    Err(e) => self.report_error(&e)?,
                },
                None => self.chat_turn(agent, &input)?,
            }
        }
    }

    fn chat_turn(&mut self, agent: &mut SelfLearningAgent, input: &str) -> io::Result<()> {
        let reply = match agent.chat(input) {
            Ok(reply) => reply,
            Err(e) => return self.report_error(&e),
        };
        self.printer.line(
            &mut self.output,
            &format!("\nAI: {}", reply.response),
            PrinterColor::Green,
        )?;

        self.printer.prompt(&mut self.output, FEEDBACK_PROMPT)?;
        let answer = self
            .read_line()?
            .map(|line| FeedbackAnswer::parse(&line))
            .unwrap_or(FeedbackAnswer::Skip);

        if let Some(feedback) = answer.feedback() {
            if let Err(e) = agent.feedback(reply.interaction_id, feedback) {
                return self.report_error(&e);
            }
            let ack = match feedback {
                Feedback::Positive => "Thanks! I'll remember that.",
                Feedback::Negative => "I'll try to improve.",
            };
            self.printer.line(&mut self.output, ack, PrinterColor::Cyan)?;
        }
        Ok(())
    }

    fn report_error(&mut self, error: &dyn std::error::Error) -> io::Result<()> {
        log::error!("Session error: {}", error);
        self.printer
            .line(&mut self.output, &format!("\nError: {error}"), PrinterColor::Red)?;
        self.printer
            .line(&mut self.output, "Let's try again...", PrinterColor::Red)
    }
}
