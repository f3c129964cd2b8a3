use std::io::{self, BufRead, Write};

use chrono::Local;

use crate::models::{normalize_food_item, parse_calories, FoodEntry};
use crate::report;
use crate::store::LogStore;

/// Interactive menu session over the log store. Generic over its streams
/// so a whole session can run against in-memory buffers in tests.
pub struct Shell<R, W> {
    input: R,
    output: W,
    store: LogStore,
}

impl<R: BufRead, W: Write> Shell<R, W> {
    pub fn new(input: R, output: W, store: LogStore) -> Self {
        Self {
            input,
            output,
            store,
        }
    }

    /// Runs the menu loop until the user chooses Exit or input ends.
    /// Validation failures are handled by re-prompting; store I/O failures
    /// propagate to the caller.
    pub fn run(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        writeln!(self.output, "Welcome to the Diet Tracker!")?;

        loop {
            self.print_menu()?;
            let choice = match self.read_line()? {
                Some(line) => line,
                None => break,
            };

            match choice.as_str() {
                "1" => self.add_entry()?,
                "2" => self.view_log()?,
                "3" => {
                    writeln!(self.output, "\nGoodbye! Stay healthy!")?;
                    break;
                }
                other => {
                    writeln!(
                        self.output,
                        "\nInvalid choice '{}'. Please select 1, 2, or 3.",
                        other
                    )?;
                }
            }
        }

        Ok(())
    }

    fn print_menu(&mut self) -> io::Result<()> {
        writeln!(self.output, "\n--- Menu ---")?;
        writeln!(self.output, "1. Add new food entry")?;
        writeln!(self.output, "2. View log and totals")?;
        writeln!(self.output, "3. Exit")?;
        write!(self.output, "Enter your choice (1/2/3): ")?;
        self.output.flush()
    }

    fn add_entry(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        writeln!(self.output, "\n--- Add New Entry ---")?;

        // Entries are always stamped with today's date
        let date = Local::now().date_naive();
        writeln!(self.output, "Date: {}", date)?;

        let food_item = match self.prompt_food_item()? {
            Some(item) => item,
            None => return Ok(()),
        };
        let calories = match self.prompt_calories()? {
            Some(calories) => calories,
            None => return Ok(()),
        };

        let entry = FoodEntry::new(date, &food_item, i64::from(calories))?;
        self.store.append(&entry)?;

        writeln!(self.output, "\nEntry added: {}", entry)?;
        Ok(())
    }

    fn view_log(&mut self) -> Result<(), Box<dyn std::error::Error>> {
        writeln!(self.output, "\n--- Diet Log ---")?;

        let loaded = self.store.load_all()?;
        for skipped in &loaded.skipped {
            writeln!(
                self.output,
                "Warning: skipping corrupted line {} ({}): {}",
                skipped.line_number, skipped.reason, skipped.content
            )?;
        }

        let summary = report::summarize(&loaded.entries);
        if summary.is_empty() {
            writeln!(self.output, "The log is empty. Add some entries!")?;
            return Ok(());
        }

        writeln!(self.output, "\n{}", summary)?;
        Ok(())
    }

    /// Prompts until the input passes food-item validation. Returns `None`
    /// when the input stream ends.
    fn prompt_food_item(&mut self) -> io::Result<Option<String>> {
        loop {
            write!(self.output, "Enter the food item/meal: ")?;
            self.output.flush()?;
            let raw = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            match normalize_food_item(&raw) {
                Ok(item) => return Ok(Some(item)),
                Err(e) => writeln!(self.output, "Invalid input: {}", e)?,
            }
        }
    }

    /// Prompts until the input parses as a non-negative calorie count.
    /// Returns `None` when the input stream ends.
    fn prompt_calories(&mut self) -> io::Result<Option<u32>> {
        loop {
            write!(self.output, "Enter the calorie count: ")?;
            self.output.flush()?;
            let raw = match self.read_line()? {
                Some(line) => line,
                None => return Ok(None),
            };
            match parse_calories(&raw) {
                Ok(calories) => return Ok(Some(calories)),
                Err(e) => writeln!(self.output, "Invalid input: {}", e)?,
            }
        }
    }

    /// Reads one trimmed line; `None` on end of input.
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut buf = String::new();
        if self.input.read_line(&mut buf)? == 0 {
            return Ok(None);
        }
        Ok(Some(buf.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use tempfile::tempdir;

    fn run_session(input: &str, store: LogStore) -> String {
        let mut output = Vec::new();
        let mut shell = Shell::new(Cursor::new(input.to_string()), &mut output, store);
        shell.run().unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn test_exit_prints_farewell() {
        let temp_dir = tempdir().unwrap();
        let store = LogStore::new(temp_dir.path().join("log.txt"));

        let output = run_session("3\n", store);
        assert!(output.contains("Goodbye! Stay healthy!"));
    }

    #[test]
    fn test_invalid_choice_reprints_menu() {
        let temp_dir = tempdir().unwrap();
        let store = LogStore::new(temp_dir.path().join("log.txt"));

        let output = run_session("9\n3\n", store);
        assert!(output.contains("Invalid choice '9'. Please select 1, 2, or 3."));
        assert_eq!(output.matches("--- Menu ---").count(), 2);
    }

    #[test]
    fn test_end_of_input_ends_session() {
        let temp_dir = tempdir().unwrap();
        let store = LogStore::new(temp_dir.path().join("log.txt"));

        let output = run_session("", store);
        assert!(output.contains("--- Menu ---"));
        assert!(!output.contains("Goodbye"));
    }

    #[test]
    fn test_add_entry_appends_and_confirms() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("log.txt");

        let output = run_session("1\nbanana bread\n350\n3\n", LogStore::new(path.clone()));
        assert!(output.contains("Entry added:"));
        assert!(output.contains("Banana Bread (350 Cal)"));

        let report = LogStore::new(path).load_all().unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].food_item, "Banana Bread");
        assert_eq!(report.entries[0].calories, 350);
        assert_eq!(report.entries[0].date, Local::now().date_naive());
    }

    #[test]
    fn test_calorie_prompt_rejects_until_valid() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("log.txt");

        // Empty, then negative, then accepted
        let output = run_session("1\nApple\n\n-5\n12\n3\n", LogStore::new(path.clone()));
        assert_eq!(output.matches("Invalid input:").count(), 2);
        assert_eq!(output.matches("Enter the calorie count: ").count(), 3);

        let report = LogStore::new(path).load_all().unwrap();
        assert_eq!(report.entries.len(), 1);
        assert_eq!(report.entries[0].calories, 12);
    }

    #[test]
    fn test_food_prompt_rejects_empty_input() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("log.txt");

        let output = run_session("1\n\n   \napple\n50\n3\n", LogStore::new(path.clone()));
        assert_eq!(output.matches("Enter the food item/meal: ").count(), 3);

        let report = LogStore::new(path).load_all().unwrap();
        assert_eq!(report.entries[0].food_item, "Apple");
    }

    #[test]
    fn test_view_empty_log() {
        let temp_dir = tempdir().unwrap();
        let store = LogStore::new(temp_dir.path().join("log.txt"));

        let output = run_session("2\n3\n", store);
        assert!(output.contains("The log is empty. Add some entries!"));
    }

    #[test]
    fn test_view_log_renders_totals() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("log.txt");
        std::fs::write(
            &path,
            "2024-01-01,Apple,50\n2024-01-01,Egg,70\n2024-01-02,Rice,200\n",
        )
        .unwrap();

        let output = run_session("2\n3\n", LogStore::new(path));
        assert!(output.contains("2024-01-01 - Total: 120 Cal"));
        assert!(output.contains("2024-01-02 - Total: 200 Cal"));
        assert!(output.contains("Grand Total: 320 Cal"));
    }

    #[test]
    fn test_view_log_warns_about_corrupted_lines() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("log.txt");
        std::fs::write(&path, "2024-01-01,Apple,50\ngarbage line\n").unwrap();

        let output = run_session("2\n3\n", LogStore::new(path));
        assert!(output.contains("Warning: skipping corrupted line 2"));
        assert!(output.contains("garbage line"));
        assert!(output.contains("Grand Total: 50 Cal"));
    }

    #[test]
    fn test_add_then_view_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let path = temp_dir.path().join("log.txt");

        let output = run_session(
            "1\ntoast\n150\n1\ncoffee\n5\n2\n3\n",
            LogStore::new(path),
        );

        let today = Local::now().date_naive();
        assert!(output.contains(&format!("{} - Total: 155 Cal", today)));
        assert!(output.contains("  - Toast: 150 Cal"));
        assert!(output.contains("  - Coffee: 5 Cal"));
        assert!(output.contains("Grand Total: 155 Cal"));
    }
}
