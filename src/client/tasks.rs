/// In-memory task list for the sidebar commands. Session-local: nothing is
/// persisted, so a restart starts from an empty list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
    pub text: String,
    pub done: bool,
}

#[derive(Debug, Default)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a task. Blank or whitespace-only text is rejected without
    /// changing the list.
    pub fn add(&mut self, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            return false;
        }
        self.tasks.push(Task {
            text: text.to_string(),
            done: false,
        });
        true
    }

    /// Flip a task's done flag. Out-of-range indices are ignored.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.tasks.get_mut(index) {
            Some(task) => {
                task.done = !task.done;
                true
            }
            None => false,
        }
    }

    /// Remove a task by position. Out-of-range indices are ignored.
    pub fn remove(&mut self, index: usize) -> Option<Task> {
        if index < self.tasks.len() {
            Some(self.tasks.remove(index))
        } else {
            None
        }
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_appends_undone_task() {
        let mut list = TaskList::new();
        assert!(list.add("buy milk"));
        assert_eq!(list.len(), 1);
        assert_eq!(list.tasks()[0].text, "buy milk");
        assert!(!list.tasks()[0].done);
    }

    #[test]
    fn blank_task_is_rejected() {
        let mut list = TaskList::new();
        assert!(!list.add("   "));
        assert!(!list.add(""));
        assert!(list.is_empty());
    }

    #[test]
    fn task_text_is_trimmed() {
        let mut list = TaskList::new();
        list.add("  call mom  ");
        assert_eq!(list.tasks()[0].text, "call mom");
    }

    #[test]
    fn toggle_flips_done_both_ways() {
        let mut list = TaskList::new();
        list.add("laundry");

        assert!(list.toggle(0));
        assert!(list.tasks()[0].done);

        assert!(list.toggle(0));
        assert!(!list.tasks()[0].done);
    }

    #[test]
    fn toggle_out_of_range_is_noop() {
        let mut list = TaskList::new();
        list.add("laundry");
        assert!(!list.toggle(5));
        assert!(!list.tasks()[0].done);
    }

    #[test]
    fn remove_shifts_later_tasks() {
        let mut list = TaskList::new();
        list.add("one");
        list.add("two");
        list.add("three");

        let removed = list.remove(1);
        assert_eq!(removed.map(|t| t.text), Some("two".to_string()));
        assert_eq!(list.len(), 2);
        assert_eq!(list.tasks()[1].text, "three");
    }

    #[test]
    fn remove_out_of_range_returns_none() {
        let mut list = TaskList::new();
        list.add("one");
        assert!(list.remove(3).is_none());
        assert_eq!(list.len(), 1);
    }
}
