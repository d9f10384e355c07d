//! Interactive terminal surface
//!
//! Each line read is one submit in the active mode, unless it is a slash
//! command. The console keeps the mode toggle and the SMS recipient field;
//! everything else lives in the controller.

use crate::config::Credentials;
use crate::controller::ConversationController;
use crate::llm::CompletionService;
use crate::phone::{format_for_display, to_canonical, NATIONAL_DIGITS};
use crate::sms::MessagingService;
use crate::state_machine::{Message, Mode, Role};
use chrono::Local;
use std::io::{self, Write};
use tokio::io::{AsyncBufRead, AsyncBufReadExt};

const HELP: &str = "\
Commands:
  /chat            talk to the assistant
  /sms             send text messages
  /to <number>     set the SMS recipient, e.g. /to (555) 123-4567
  /clear           clear the conversation
  /dismiss         dismiss the current error
  /status          show configuration status
  /help            show this help
  /quit            exit
Anything else is sent in the current mode.";

#[derive(Debug, Clone, PartialEq, Eq)]
enum Command {
    SwitchMode(Mode),
    SetRecipient(String),
    Clear,
    Dismiss,
    Status,
    Help,
    Quit,
    Unknown(String),
    Send(String),
}

impl Command {
    fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        let Some(rest) = trimmed.strip_prefix('/') else {
            return Command::Send(line.to_string());
        };

        let (name, arg) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
        match name {
            "chat" => Command::SwitchMode(Mode::Chat),
            "sms" => Command::SwitchMode(Mode::Sms),
            "to" => Command::SetRecipient(arg.trim().to_string()),
            "clear" => Command::Clear,
            "dismiss" => Command::Dismiss,
            "status" => Command::Status,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            other => Command::Unknown(other.to_string()),
        }
    }
}

fn subtitle(mode: Mode) -> &'static str {
    match mode {
        Mode::Chat => "Chat with ChatGPT",
        Mode::Sms => "Send SMS messages",
    }
}

fn empty_hint(mode: Mode) -> &'static str {
    match mode {
        Mode::Chat => "Start a conversation: type a message below to start chatting with AI",
        Mode::Sms => "Ready to send SMS: enter a phone number with /to and type a message",
    }
}

pub fn render_message(message: &Message) -> String {
    let time = message.timestamp.with_timezone(&Local).format("%H:%M");
    let who = match (message.role, message.kind) {
        (Role::User, Mode::Chat) => "you",
        (Role::User, Mode::Sms) => "you (sms)",
        (Role::Assistant, Mode::Chat) => "assistant",
        (Role::Assistant, Mode::Sms) => "sms",
    };
    format!("[{time}] {who}: {}", message.content)
}

pub fn render_config_status(credentials: &Credentials) -> String {
    let status = credentials.status();
    let mut out = if credentials.is_complete() {
        String::from("Configuration complete")
    } else {
        String::from("Configuration Required")
    };
    out.push_str(&format!(
        "\n  {} of {} configured",
        credentials.configured_count(),
        status.len()
    ));
    for (key, present) in status {
        let mark = if present { "[x]" } else { "[ ]" };
        out.push_str(&format!(
            "\n  {mark} {} ({}): {}",
            key.display_name(),
            key.env_var(),
            key.description()
        ));
    }
    if !credentials.is_complete() {
        out.push_str("\n  Set the missing variables in your environment and restart.");
    }
    out
}

pub struct Console<C, M> {
    controller: ConversationController<C, M>,
    credentials: Credentials,
    app_name: String,
    mode: Mode,
    /// Recipient as displayed, e.g. `(555) 123-4567`
    recipient: String,
}

impl<C: CompletionService, M: MessagingService> Console<C, M> {
    pub fn new(
        controller: ConversationController<C, M>,
        app_name: impl Into<String>,
        credentials: Credentials,
    ) -> Self {
        Self {
            controller,
            credentials,
            app_name: app_name.into(),
            mode: Mode::Chat,
            recipient: String::new(),
        }
    }

    /// Run until end of input or `/quit`
    pub async fn run<R, W>(&mut self, mut input: R, out: &mut W) -> io::Result<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        writeln!(out, "{} - {}", self.app_name, subtitle(self.mode))?;
        if !self.credentials.is_complete() {
            writeln!(out, "{}", render_config_status(&self.credentials))?;
        }
        writeln!(out, "Type /help for commands.")?;

        let mut buf = Vec::new();
        loop {
            write!(out, "{}> ", self.mode.as_str())?;
            out.flush()?;

            buf.clear();
            if input.read_until(b'\n', &mut buf).await? == 0 {
                break;
            }
            // Pasted text in a legacy encoding must not end the session
            let line = String::from_utf8_lossy(&buf);
            let line = line.trim_end_matches(['\n', '\r']);
            if !self.handle(Command::parse(line), out).await? {
                break;
            }
        }
        Ok(())
    }

    /// Returns false when the console should exit
    async fn handle<W: Write>(&mut self, command: Command, out: &mut W) -> io::Result<bool> {
        match command {
            Command::Send(text) => self.send(&text, out).await?,
            Command::SwitchMode(mode) => {
                self.mode = mode;
                writeln!(out, "{}", subtitle(mode))?;
                if mode == Mode::Sms && !self.controller.messaging_ready() {
                    writeln!(out, "Twilio credentials are not configured; see /status")?;
                }
                if mode == Mode::Chat && !self.controller.completion_ready() {
                    writeln!(out, "OpenAI API key is not configured; see /status")?;
                }
                if self.controller.state().is_empty() {
                    writeln!(out, "{}", empty_hint(mode))?;
                }
            }
            Command::SetRecipient(raw) => {
                let digits: String = raw.chars().filter(char::is_ascii_digit).collect();
                let national = match digits.strip_prefix('1') {
                    Some(rest) if rest.len() == NATIONAL_DIGITS => rest,
                    _ => digits.as_str(),
                };
                if national.len() > NATIONAL_DIGITS {
                    writeln!(out, "Only the first {NATIONAL_DIGITS} digits are kept")?;
                }
                self.recipient = format_for_display(national);
                if self.recipient.is_empty() {
                    writeln!(out, "SMS recipient cleared")?;
                } else if let Some(canonical) = to_canonical(&self.recipient) {
                    writeln!(out, "Ready to send to: {canonical}")?;
                } else {
                    writeln!(out, "{}: please enter a valid US phone number", self.recipient)?;
                }
            }
            Command::Clear => {
                self.controller.clear();
                writeln!(out, "Conversation cleared")?;
            }
            Command::Dismiss => self.controller.dismiss_error(),
            Command::Status => writeln!(out, "{}", render_config_status(&self.credentials))?,
            Command::Help => writeln!(out, "{HELP}")?,
            Command::Quit => return Ok(false),
            Command::Unknown(name) => writeln!(out, "Unknown command /{name}. Type /help.")?,
        }
        Ok(true)
    }

    async fn send<W: Write>(&mut self, text: &str, out: &mut W) -> io::Result<()> {
        let destination = match self.mode {
            Mode::Chat => None,
            Mode::Sms => Some(self.recipient.clone()).filter(|r| !r.is_empty()),
        };

        let shown = self.controller.state().messages.len();
        if let Some(effect) = self.controller.begin(text, self.mode, destination.as_deref()) {
            let pending = match self.mode {
                Mode::Chat => "... waiting for reply",
                Mode::Sms => "... sending SMS",
            };
            writeln!(out, "{pending}")?;
            out.flush()?;
            self.controller.resolve(effect).await;
        }

        let state = self.controller.state();
        // The user's own line is already on screen
        for message in state.messages.iter().skip(shown).filter(|m| m.role == Role::Assistant) {
            writeln!(out, "{}", render_message(message))?;
        }
        if let Some(error) = &state.error {
            writeln!(out, "! {error}  (/dismiss to close)")?;
        }
        Ok(())
    }
}
