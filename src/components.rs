use super::{
    dashboard::{AiSummary, Toast, ToastVariant},
    models::{Note, Priority, Task},
    store::AppStore,
};
use chrono::{DateTime, Utc};
use std::fmt::Write;

pub trait Component {
    /// Render the component to terminal text. By convention, the
    /// implementation should sanitize all string properties at render-time
    fn render(&self) -> String;
}

/// Strip control characters (escape sequences in particular) out of
/// user-supplied text before it reaches the terminal.
pub fn clean(s: &str) -> String {
    s.chars()
        .filter(|c| *c == '\n' || !c.is_control())
        .collect()
}

/// Roughly what `formatDistanceToNow` would say.
pub fn time_ago(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let secs = (now - then).num_seconds().max(0);
    let (n, unit) = match secs {
        0..=44 => return "less than a minute ago".to_string(),
        45..=89 => (1, "minute"),
        90..=2_699 => ((secs + 30) / 60, "minute"),
        2_700..=86_399 => ((secs + 1_800) / 3_600, "hour"),
        86_400..=2_591_999 => ((secs + 43_200) / 86_400, "day"),
        2_592_000..=31_535_999 => ((secs + 1_296_000) / 2_592_000, "month"),
        _ => ((secs + 15_768_000) / 31_536_000, "year"),
    };
    let n = n.max(1);
    if n == 1 {
        format!("about 1 {unit} ago")
    } else {
        format!("{n} {unit}s ago")
    }
}

fn indent(text: &str, by: &str) -> String {
    text.lines()
        .map(|l| format!("{by}{l}"))
        .collect::<Vec<String>>()
        .join("\n")
}

pub struct NoteCard<'a> {
    pub note: &'a Note,
    pub now: DateTime<Utc>,
}
impl Component for NoteCard<'_> {
    fn render(&self) -> String {
        format!(
            "{title}\n{content}\n    updated {ago} · {id}",
            title = clean(&self.note.title),
            content = indent(&clean(&self.note.content), "    "),
            ago = time_ago(self.note.updated_at, self.now),
            id = self.note.id,
        )
    }
}

pub struct NoteList<'a> {
    pub notes: &'a [Note],
    pub now: DateTime<Utc>,
}
impl Component for NoteList<'_> {
    fn render(&self) -> String {
        if self.notes.is_empty() {
            return "No notes yet. Create your first note to get started."
                .to_string();
        }
        let mut out = format!("Notes ({})\n", self.notes.len());
        for note in self.notes {
            let card = NoteCard {
                note,
                now: self.now,
            }
            .render();
            let _ = write!(out, "\n{card}\n");
        }
        out
    }
}

pub struct PriorityBadge(pub Priority);
impl Component for PriorityBadge {
    fn render(&self) -> String {
        match self.0 {
            Priority::High => "[HIGH]",
            Priority::Medium => "[MED] ",
            Priority::Low => "[LOW] ",
        }
        .to_string()
    }
}

pub struct TaskRow<'a> {
    pub task: &'a Task,
    pub now: DateTime<Utc>,
}
impl Component for TaskRow<'_> {
    fn render(&self) -> String {
        let check = if self.task.completed { "[x]" } else { "[ ]" };
        let mut out = format!(
            "{check} {badge} {title}",
            badge = PriorityBadge(self.task.priority).render(),
            title = clean(&self.task.title),
        );
        if !self.task.description.is_empty() {
            let _ = write!(
                out,
                "\n{}",
                indent(&clean(&self.task.description), "           ")
            );
        }
        let _ = write!(
            out,
            "\n           created {} · {}",
            time_ago(self.task.created_at, self.now),
            self.task.id
        );
        out
    }
}

pub struct TaskList<'a> {
    pub tasks: &'a [Task],
    pub now: DateTime<Utc>,
}
impl Component for TaskList<'_> {
    fn render(&self) -> String {
        if self.tasks.is_empty() {
            return "No tasks yet. Create your first task to get started."
                .to_string();
        }
        let (completed, pending): (Vec<&Task>, Vec<&Task>) =
            self.tasks.iter().partition(|t| t.completed);

        let mut out = String::new();
        for (heading, tasks) in [("Pending", pending), ("Completed", completed)]
        {
            if tasks.is_empty() {
                continue;
            }
            let _ = writeln!(out, "{heading} ({})", tasks.len());
            for task in tasks {
                let row = TaskRow {
                    task,
                    now: self.now,
                }
                .render();
                let _ = writeln!(out, "{row}");
            }
            out.push('\n');
        }
        out.trim_end().to_string()
    }
}

pub struct SummaryBlock<'a> {
    pub summary: &'a AiSummary,
    pub title: Option<&'a str>,
}
impl Component for SummaryBlock<'_> {
    fn render(&self) -> String {
        let heading = match self.title {
            Some(title) => format!("AI Summary: {}", clean(title)),
            None => "AI Summary".to_string(),
        };
        format!("{heading}\n{}", indent(&clean(&self.summary.summary), "    "))
    }
}

pub struct ToastView<'a> {
    pub toast: &'a Toast,
}
impl Component for ToastView<'_> {
    fn render(&self) -> String {
        let marker = match self.toast.variant {
            ToastVariant::Default => "✓",
            ToastVariant::Destructive => "✗",
        };
        format!(
            "{marker} {}: {}",
            self.toast.title,
            clean(&self.toast.description)
        )
    }
}

pub struct DashboardView<'a> {
    pub store: &'a AppStore,
    pub summary: Option<&'a AiSummary>,
    pub now: DateTime<Utc>,
}
impl Component for DashboardView<'_> {
    fn render(&self) -> String {
        if self.store.is_loading {
            return "Loading...".to_string();
        }
        let pending = self.store.tasks.iter().filter(|t| !t.completed).count();
        let mut out = format!(
            "My Workspace: {} notes, {} tasks ({} pending)\n\n",
            self.store.notes.len(),
            self.store.tasks.len(),
            pending
        );
        if let Some(summary) = self.summary {
            let title = self.store.note(summary.note_id).map(|n| n.title.as_str());
            let _ = write!(out, "{}\n\n", SummaryBlock { summary, title }.render());
        }
        let _ = write!(
            out,
            "{}\n\n{}",
            NoteList {
                notes: &self.store.notes,
                now: self.now
            }
            .render(),
            TaskList {
                tasks: &self.store.tasks,
                now: self.now
            }
            .render()
        );
        out
    }
}
