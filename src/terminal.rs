//! Line-oriented terminal front end.
//!
//! A [`TerminalSurface`] prints each pair and keeps the edit buffer in
//! memory; [`run`] reads one command per line and drives the session.
//!
//! ```text
//! n, next          save, then show the next pair
//! p, prev          save, then show the previous pair
//! e <text>         replace the caption with <text>
//! a <text>         append <text> as a new line
//! c, clear         empty the caption
//! s, show          print the caption as currently edited
//! o <folder>       save, then open another folder
//! w, write         save without moving
//! q, quit          save and quit
//! q!               quit without saving
//! h, help          this list
//! ```

use crate::caption::SaveOutcome;
use crate::output;
use crate::session::{DirectoryPicker, DisplaySurface, PairView, Session, SessionError};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, warn};

const HELP: &str = "\
n, next          save, then show the next pair
p, prev          save, then show the previous pair
e <text>         replace the caption with <text>
a <text>         append <text> as a new line
c, clear         empty the caption
s, show          print the caption as currently edited
o <folder>       save, then open another folder
w, write         save without moving
q, quit          save and quit
q!               quit without saving
h, help          this list";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Previous,
    Replace(String),
    Append(String),
    Clear,
    Show,
    Open(PathBuf),
    Write,
    Quit,
    ForceQuit,
    Help,
}

/// Parse one input line. `None` for blank or unrecognised input.
pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim_end_matches(['\r', '\n']);
    let (word, rest) = match line.split_once(' ') {
        Some((word, rest)) => (word, rest),
        None => (line, ""),
    };
    let command = match word {
        "n" | "next" => Command::Next,
        "p" | "prev" | "previous" => Command::Previous,
        "e" | "edit" => Command::Replace(rest.to_string()),
        "a" | "append" => Command::Append(rest.to_string()),
        "c" | "clear" => Command::Clear,
        "s" | "show" => Command::Show,
        "o" | "open" if !rest.trim().is_empty() => Command::Open(PathBuf::from(rest.trim())),
        "w" | "write" => Command::Write,
        "q" | "quit" => Command::Quit,
        "q!" => Command::ForceQuit,
        "h" | "help" | "?" => Command::Help,
        _ => return None,
    };
    Some(command)
}

/// Display surface that writes to a terminal (or any writer).
pub struct TerminalSurface<W> {
    out: W,
    buffer: String,
}

impl<W: Write> TerminalSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            buffer: String::new(),
        }
    }

    pub fn output(&self) -> &W {
        &self.out
    }

    pub fn set_buffer(&mut self, text: String) {
        self.buffer = text;
    }

    /// Append `text` as a new line of the buffer.
    pub fn append_line(&mut self, text: &str) {
        if !self.buffer.is_empty() {
            self.buffer.push('\n');
        }
        self.buffer.push_str(text);
    }

    pub fn say(&mut self, message: &str) {
        self.emit(message.lines().map(str::to_string));
    }

    fn prompt(&mut self) {
        if let Err(err) = write!(self.out, "> ").and_then(|_| self.out.flush()) {
            warn!(%err, "terminal write failed");
        }
    }

    fn emit(&mut self, lines: impl IntoIterator<Item = String>) {
        let result = lines
            .into_iter()
            .try_for_each(|line| writeln!(self.out, "{}", line))
            .and_then(|_| self.out.flush());
        if let Err(err) = result {
            warn!(%err, "terminal write failed");
        }
    }
}

impl<W: Write> DisplaySurface for TerminalSurface<W> {
    fn show_pair(&mut self, view: &PairView) {
        self.buffer = view.caption.clone();
        self.emit(output::format_pair_view(view));
    }

    fn edit_buffer(&self) -> String {
        self.buffer.clone()
    }

    fn notify_error(&mut self, error: &SessionError) {
        self.emit([
            format!("error: {error}"),
            "your caption is still in the buffer".to_string(),
        ]);
    }
}

/// Asks for a folder on the terminal. An empty answer cancels.
pub struct PromptPicker<'a, R, W> {
    input: &'a mut R,
    out: W,
}

impl<'a, R: BufRead, W: Write> PromptPicker<'a, R, W> {
    pub fn new(input: &'a mut R, out: W) -> Self {
        Self { input, out }
    }
}

impl<R: BufRead, W: Write> DirectoryPicker for PromptPicker<'_, R, W> {
    fn pick_directory(&mut self) -> Option<PathBuf> {
        if let Err(err) = write!(self.out, "Folder (empty to cancel): ").and_then(|_| self.out.flush()) {
            warn!(%err, "terminal write failed");
        }
        let mut line = String::new();
        match self.input.read_line(&mut line) {
            Ok(_) => {
                let answer = line.trim();
                (!answer.is_empty()).then(|| PathBuf::from(answer))
            }
            Err(err) => {
                warn!(%err, "could not read folder selection");
                None
            }
        }
    }
}

/// Read commands from `input` until quit or end of input.
///
/// End of input saves the current caption, like `q`.
pub fn run<R: BufRead, W: Write>(
    session: &mut Session<TerminalSurface<W>>,
    input: &mut R,
) -> io::Result<()> {
    if session.position().is_none() {
        session
            .surface_mut()
            .say("No pairs loaded. Open a folder with `o <folder>`, `h` for help.");
    }

    let mut line = String::new();
    loop {
        session.surface_mut().prompt();
        line.clear();
        if input.read_line(&mut line)? == 0 {
            if let Err(err) = session.commit() {
                debug!(%err, "final save failed");
            }
            return Ok(());
        }
        if line.trim().is_empty() {
            continue;
        }
        let Some(command) = parse_command(&line) else {
            session.surface_mut().say("unknown command, `h` for help");
            continue;
        };

        let result = match command {
            Command::Next => session.go_next(),
            Command::Previous => session.go_previous(),
            Command::Replace(text) => {
                session.surface_mut().set_buffer(text);
                Ok(())
            }
            Command::Append(text) => {
                session.surface_mut().append_line(&text);
                Ok(())
            }
            Command::Clear => {
                session.surface_mut().set_buffer(String::new());
                Ok(())
            }
            Command::Show => {
                let caption = session.surface().edit_buffer();
                session.surface_mut().emit(output::format_caption(&caption));
                Ok(())
            }
            Command::Open(dir) => session.open_folder_at(&dir).map(|opened| {
                if !opened {
                    let message = format!("no .png images in {}", dir.display());
                    session.surface_mut().say(&message);
                }
            }),
            Command::Write => session.commit().map(|outcome| match outcome {
                SaveOutcome::Written(_) => session.surface_mut().say("saved"),
                SaveOutcome::Skipped => session.surface_mut().say("nothing to save"),
            }),
            Command::Quit => match session.commit() {
                Ok(_) => return Ok(()),
                Err(_) => {
                    session.surface_mut().say("not saved; `q!` quits anyway");
                    continue;
                }
            },
            Command::ForceQuit => return Ok(()),
            Command::Help => {
                session.surface_mut().say(HELP);
                Ok(())
            }
        };
        if let Err(err) = result {
            debug!(%err, "command failed");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::io::Cursor;

    fn run_script(dir: &std::path::Path, script: &str) -> String {
        let mut session = Session::new(TerminalSurface::new(Vec::new()));
        session.open_folder_at(dir).unwrap();
        run(&mut session, &mut Cursor::new(script.as_bytes())).unwrap();
        String::from_utf8_lossy(session.surface().output()).to_string()
    }

    #[test]
    fn parse_navigation_commands() {
        assert_eq!(parse_command("n\n"), Some(Command::Next));
        assert_eq!(parse_command("next"), Some(Command::Next));
        assert_eq!(parse_command("p\r\n"), Some(Command::Previous));
        assert_eq!(parse_command("q"), Some(Command::Quit));
        assert_eq!(parse_command("q!"), Some(Command::ForceQuit));
    }

    #[test]
    fn parse_edit_keeps_text_verbatim() {
        assert_eq!(
            parse_command("e  two spaces kept\n"),
            Some(Command::Replace(" two spaces kept".to_string()))
        );
        assert_eq!(parse_command("e"), Some(Command::Replace(String::new())));
        assert_eq!(
            parse_command("a more"),
            Some(Command::Append("more".to_string()))
        );
    }

    #[test]
    fn parse_open_requires_folder() {
        assert_eq!(
            parse_command("o /tmp/set \n"),
            Some(Command::Open(PathBuf::from("/tmp/set")))
        );
        assert_eq!(parse_command("o"), None);
    }

    #[test]
    fn parse_unknown_is_none() {
        assert_eq!(parse_command("jump 3"), None);
    }

    #[test]
    fn append_line_joins_with_newline() {
        let mut surface = TerminalSurface::new(Vec::new());
        surface.append_line("one");
        surface.append_line("two");
        assert_eq!(surface.edit_buffer(), "one\ntwo");
    }

    #[test]
    fn edit_then_next_saves_caption() {
        let tmp = folder_with(&[("a.png", ""), ("a.txt", "old"), ("b.png", "")]);
        let out = run_script(tmp.path(), "e new caption\nn\nq!\n");

        assert_eq!(read(&tmp, "a.txt"), "new caption");
        assert!(out.contains("001/002 a.png  [first]"));
        assert!(out.contains("002/002 b.png  [last]"));
    }

    #[test]
    fn quit_saves_current_caption() {
        let tmp = folder_with(&[("a.png", ""), ("a.txt", "old")]);
        run_script(tmp.path(), "a second line\nq\n");
        assert_eq!(read(&tmp, "a.txt"), "old\nsecond line");
    }

    #[test]
    fn force_quit_discards_edit() {
        let tmp = folder_with(&[("a.png", ""), ("a.txt", "old")]);
        run_script(tmp.path(), "e thrown away\nq!\n");
        assert_eq!(read(&tmp, "a.txt"), "old");
    }

    #[test]
    fn end_of_input_saves() {
        let tmp = folder_with(&[("a.png", ""), ("a.txt", "old")]);
        run_script(tmp.path(), "c\ne kept at eof");
        assert_eq!(read(&tmp, "a.txt"), "kept at eof");
    }

    #[test]
    fn write_reports_what_happened() {
        let tmp = folder_with(&[("a.png", ""), ("a.txt", "old"), ("b.png", "")]);
        let out = run_script(tmp.path(), "e fresh
w
n
w
q!
");

        assert_eq!(read(&tmp, "a.txt"), "fresh");
        assert!(!tmp.path().join("b.txt").exists());
        let replies: Vec<&str> = out
            .lines()
            .map(|line| line.trim_start_matches("> "))
            .filter(|line| *line == "saved" || *line == "nothing to save")
            .collect();
        assert_eq!(replies, ["saved", "nothing to save"]);
    }

    #[test]
    fn show_prints_edited_buffer() {
        let tmp = folder_with(&[("a.png", ""), ("a.txt", "old")]);
        let out = run_script(tmp.path(), "e shown text\ns\nq!\n");
        assert!(out.contains("        shown text"));
    }

    #[test]
    fn unknown_command_gets_hint() {
        let tmp = folder_with(&[("a.png", "")]);
        let out = run_script(tmp.path(), "frobnicate\nq!\n");
        assert!(out.contains("unknown command"));
    }

    #[test]
    fn open_folder_without_images_is_reported() {
        let tmp = folder_with(&[("a.png", "")]);
        let empty = folder_with(&[]);
        let script = format!("o {}\nq!\n", empty.path().display());
        let out = run_script(tmp.path(), &script);
        assert!(out.contains("no .png images in"));
    }

    #[test]
    fn failed_quit_stays_in_loop() {
        let tmp = folder_with(&[("a.png", ""), ("a.txt", "old")]);
        std::fs::remove_file(tmp.path().join("a.txt")).unwrap();
        std::fs::create_dir(tmp.path().join("a.txt")).unwrap();

        let out = run_script(tmp.path(), "e text\nq\nq!\n");
        assert!(out.contains("error: could not write caption"));
        assert!(out.contains("`q!` quits anyway"));
    }

    #[test]
    fn picker_reads_folder_line() {
        let mut input = Cursor::new(b"/some/folder\n".to_vec());
        let mut picker = PromptPicker::new(&mut input, Vec::new());
        assert_eq!(picker.pick_directory(), Some(PathBuf::from("/some/folder")));
    }

    #[test]
    fn picker_empty_answer_cancels() {
        let mut input = Cursor::new(b"\n".to_vec());
        let mut picker = PromptPicker::new(&mut input, Vec::new());
        assert_eq!(picker.pick_directory(), None);
    }
}
