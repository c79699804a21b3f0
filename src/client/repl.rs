use anyhow::Result;
use dialoguer::Input;
use tokio::sync::mpsc;

use crate::extract::{OcrEngine, TesseractOcr};
use crate::ui::style as ui;

use super::attachments::{handle_attachment, AttachmentPick};
use super::dispatch::send_message;
use super::reminders::ReminderList;
use super::tasks::TaskList;
use super::transcript::Transcript;
use super::{GatewayApi, HttpGateway};

/// Slash commands understood by the prompt. Anything else is chat text.
#[derive(Debug, PartialEq, Eq)]
enum Command {
    Quit,
    Help,
    Reset,
    AddTask(String),
    ListTasks,
    ToggleTask(usize),
    Remind(String),
    ListReminders,
    DeleteReminder(usize),
    Attach(AttachmentPick, String),
    Chat(String),
}

impl Command {
    fn parse(line: &str) -> Command {
        let line = line.trim();
        let (head, rest) = match line.split_once(char::is_whitespace) {
            Some((head, rest)) => (head, rest.trim()),
            None => (line, ""),
        };

        match head {
            "/quit" | "/exit" => Command::Quit,
            "/help" => Command::Help,
            "/reset" => Command::Reset,
            "/task" => Command::AddTask(rest.to_string()),
            "/tasks" => Command::ListTasks,
            "/done" => match rest.parse::<usize>() {
                Ok(n) if n > 0 => Command::ToggleTask(n - 1),
                _ => Command::Help,
            },
            "/remind" => Command::Remind(rest.to_string()),
            "/reminders" => Command::ListReminders,
            "/delremind" => match rest.parse::<usize>() {
                Ok(n) if n > 0 => Command::DeleteReminder(n - 1),
                _ => Command::Help,
            },
            "/attach" => match rest.split_once(char::is_whitespace) {
                Some(("pdf", path)) => Command::Attach(AttachmentPick::Pdf, path.trim().to_string()),
                Some(("image", path)) => {
                    Command::Attach(AttachmentPick::Image, path.trim().to_string())
                }
                _ => Command::Help,
            },
            _ => Command::Chat(line.to_string()),
        }
    }
}

/// Interactive chat loop against a running gateway.
pub async fn run(gateway_url: &str) -> Result<()> {
    let gateway = HttpGateway::new(gateway_url);
    let ocr = TesseractOcr::english();
    run_loop(&gateway, &ocr).await
}

async fn run_loop(gateway: &dyn GatewayApi, ocr: &dyn OcrEngine) -> Result<()> {
    let mut transcript = Transcript::new();
    let mut tasks = TaskList::new();
    let mut reminders = ReminderList::new();
    let (alarm_tx, mut alarm_rx) = mpsc::unbounded_channel::<String>();
    let mut printed = 0usize;

    println!("{}", ui::header("Nova X"));
    println!("{}", ui::dim("Type a message, or /help for commands."));

    loop {
        // Alarms that fired while we were waiting on input.
        while let Ok(alarm) = alarm_rx.try_recv() {
            println!("{}", ui::accent(&alarm));
        }

        let line = tokio::task::spawn_blocking(|| {
            Input::<String>::new()
                .with_prompt("you")
                .allow_empty(true)
                .interact_text()
        })
        .await??;

        match Command::parse(&line) {
            Command::Quit => break,
            Command::Help => print_help(),
            Command::Reset => match gateway.reset().await {
                Ok(message) => println!("{} {}", ui::success("✓"), message),
                Err(e) => println!("{} {}", ui::yellow("!"), e),
            },
            Command::AddTask(text) => {
                if tasks.add(&text) {
                    println!("{} task added", ui::success("✓"));
                } else {
                    println!("{}", ui::yellow("usage: /task <text>"));
                }
            }
            Command::ListTasks => {
                if tasks.is_empty() {
                    println!("{}", ui::dim("no tasks"));
                }
                for (i, task) in tasks.tasks().iter().enumerate() {
                    let mark = if task.done { "x" } else { " " };
                    println!("  {}. [{mark}] {}", i + 1, task.text);
                }
            }
            Command::ToggleTask(index) => {
                if !tasks.toggle(index) {
                    println!("{}", ui::yellow("no such task"));
                }
            }
            Command::Remind(text) => match reminders.arm(&text, alarm_tx.clone()) {
                Some(fire_at) => println!(
                    "{} reminder set for {}",
                    ui::success("✓"),
                    ui::value(fire_at.format("%H:%M"))
                ),
                None => println!(
                    "{}",
                    ui::yellow("couldn't find a time — try \"/remind stretch at 5pm\"")
                ),
            },
            Command::ListReminders => {
                if reminders.is_empty() {
                    println!("{}", ui::dim("no reminders"));
                }
                for (i, reminder) in reminders.reminders().iter().enumerate() {
                    println!(
                        "  {}. {} ({})",
                        i + 1,
                        reminder.text,
                        ui::dim(reminder.fire_at.format("%H:%M"))
                    );
                }
            }
            Command::DeleteReminder(index) => match reminders.remove(index) {
                Some(text) => println!("{} removed: {text}", ui::success("✓")),
                None => println!("{}", ui::yellow("no such reminder")),
            },
            Command::Attach(pick, path) => match tokio::fs::read(&path).await {
                Ok(bytes) => {
                    let filename = std::path::Path::new(&path)
                        .file_name()
                        .map(|n| n.to_string_lossy().into_owned())
                        .unwrap_or_else(|| path.clone());
                    let _ =
                        handle_attachment(gateway, ocr, &mut transcript, pick, &filename, bytes)
                            .await;
                }
                Err(e) => println!("{} {path}: {e}", ui::yellow("!")),
            },
            Command::Chat(text) => {
                let _ = send_message(gateway, &mut transcript, &text).await;
            }
        }

        for bubble in &transcript.bubbles()[printed..] {
            println!("{}", Transcript::render(bubble));
        }
        printed = transcript.len();
    }

    Ok(())
}

fn print_help() {
    println!("{}", ui::header("commands"));
    println!("  /task <text>        add a task");
    println!("  /tasks              list tasks");
    println!("  /done <n>           toggle task n");
    println!("  /remind <text>      set a reminder (\"stretch at 5pm\")");
    println!("  /reminders          list reminders");
    println!("  /delremind <n>      delete reminder n");
    println!("  /attach pdf <path>  summarize a PDF");
    println!("  /attach image <path> summarize an image (OCR)");
    println!("  /reset              clear the assistant's memory");
    println!("  /quit               leave");
}
