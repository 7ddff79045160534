//! Terminal input handling for the Astral REPL.
//!
//! Wraps rustyline configuration and tab completion over the command
//! vocabulary, the names of things in the world, and developer commands.

use std::fs;
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use log::{info, warn};
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::history::DefaultHistory;
use rustyline::validate::{ValidationContext, ValidationResult, Validator};
use rustyline::{Context, Helper};

use crate::DEV_MODE;
use crate::nlp::{Vocabulary, WorldSnapshot};

/// Outcome of reading a line from the REPL input.
pub enum InputEvent {
    Line(String),
    Eof,
    Interrupted,
}

pub(crate) const DEV_COMMANDS: &[&str] = &[":parse", ":patterns", ":reload"];

type ReplEditor = rustyline::Editor<AstralHelper, DefaultHistory>;

#[derive(Default)]
struct AstralHelper {
    terms: Vec<String>,
}

impl Helper for AstralHelper {}

impl Completer for AstralHelper {
    type Candidate = Pair;

    fn complete(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> rustyline::Result<(usize, Vec<Self::Candidate>)> {
        let (start, prefix) = current_word(line, pos);
        if prefix.is_empty() {
            return Ok((start, Vec::new()));
        }
        Ok((start, matching_terms(&self.terms, &prefix)))
    }
}

impl Hinter for AstralHelper {
    type Hint = String;
}

impl Highlighter for AstralHelper {}

impl Validator for AstralHelper {
    fn validate(&self, ctx: &mut ValidationContext) -> rustyline::Result<ValidationResult> {
        let _ = ctx;
        Ok(ValidationResult::Valid(None))
    }
}

/// Start offset and text of the word under the cursor.
fn current_word(line: &str, pos: usize) -> (usize, String) {
    let slice = &line[..pos];
    let start = slice.rfind(char::is_whitespace).map_or(0, |i| i + 1);
    (start, slice[start..].to_string())
}

fn matching_terms(terms: &[String], prefix: &str) -> Vec<Pair> {
    let lower = prefix.to_lowercase();
    terms
        .iter()
        .filter(|term| term.starts_with(&lower))
        .map(|term| Pair {
            display: term.clone(),
            replacement: term.clone(),
        })
        .collect()
}

/// Completion candidates: multi-letter verbs and context words, single-word object names,
/// and developer commands.
pub fn completion_terms(vocabulary: &Vocabulary, world: &WorldSnapshot) -> Vec<String> {
    let mut terms: Vec<String> = vocabulary
        .all_verbs()
        .into_iter()
        .chain(
            vocabulary
                .entries()
                .flat_map(|entry| entry.context_words.iter().map(String::as_str)),
        )
        .filter(|word| word.len() > 1 && !word.contains(' '))
        .map(ToString::to_string)
        .collect();
    for object in world.objects.values() {
        terms.extend(
            object
                .name
                .iter()
                .chain(&object.synonyms)
                .filter(|name| !name.contains(' '))
                .map(|name| name.to_lowercase()),
        );
    }
    if DEV_MODE {
        terms.extend(DEV_COMMANDS.iter().map(ToString::to_string));
    }
    terms.sort_unstable();
    terms.dedup();
    terms
}

/// Helper responsible for managing the interactive input backend.
///
/// Prefers `rustyline` when an interactive terminal is available, falling back to
/// a basic stdin reader otherwise.
pub struct InputManager {
    backend: Backend,
}

impl InputManager {
    pub fn new(terms: Vec<String>) -> Self {
        let backend = if io::stdin().is_terminal() {
            match RustylineInput::new(terms) {
                Ok(editor) => {
                    info!("using rustyline-backed REPL input");
                    Backend::Rustyline(editor)
                },
                Err(err) => {
                    warn!("failed to initialize rustyline ({err}), falling back to basic stdin");
                    Backend::plain()
                },
            }
        } else {
            info!("stdin is not a TTY; using basic input mode");
            Backend::plain()
        };

        Self { backend }
    }

    /// Replace the completion candidates (after the world is reloaded).
    pub fn set_terms(&mut self, terms: Vec<String>) {
        if let Backend::Rustyline(input) = &mut self.backend {
            input.editor.set_helper(Some(AstralHelper { terms }));
        }
    }

    /// Read a line from the current backend. If the interactive backend reports an
    /// unrecoverable error, switch to the plain stdin backend and retry once.
    ///
    /// # Errors
    /// - if reading from stdin fails
    pub fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.backend.read_line(prompt) {
            Ok(event) => Ok(event),
            Err(err) => {
                if self.backend.is_rustyline() {
                    warn!("rustyline input failed: {err} -- switching to basic stdin");
                    self.backend = Backend::plain();
                    self.backend.read_line(prompt)
                } else {
                    Err(err)
                }
            },
        }
    }
}

enum Backend {
    Rustyline(RustylineInput),
    Plain(StdinInput),
}

impl Backend {
    fn plain() -> Self {
        Backend::Plain(StdinInput::default())
    }

    fn is_rustyline(&self) -> bool {
        matches!(self, Backend::Rustyline(_))
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self {
            Backend::Rustyline(editor) => editor.read_line(prompt),
            Backend::Plain(stdin) => stdin.read_line(prompt),
        }
    }
}

struct RustylineInput {
    editor: ReplEditor,
    history_path: Option<PathBuf>,
}

impl RustylineInput {
    fn new(terms: Vec<String>) -> io::Result<Self> {
        let mut editor = rustyline::Editor::<AstralHelper, _>::new().map_err(map_io_err)?;
        editor.set_helper(Some(AstralHelper { terms }));
        let history_path = history_file_path();

        if let Some(path) = history_path.as_ref() {
            if let Some(dir) = path.parent()
                && let Err(err) = fs::create_dir_all(dir)
            {
                warn!("failed to create history directory {}: {err}", dir.display());
            }

            if let Err(err) = editor.load_history(path) {
                match err {
                    ReadlineError::Io(ref io_err) if io_err.kind() == io::ErrorKind::NotFound => {
                        info!("no prior history found at {}, starting fresh", path.display());
                    },
                    other => {
                        warn!("failed to load history from {}: {other}", path.display());
                    },
                }
            }
        }

        Ok(Self { editor, history_path })
    }

    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        match self.editor.readline(prompt) {
            Ok(line) => {
                if !line.trim().is_empty() {
                    if let Err(err) = self.editor.add_history_entry(line.as_str()) {
                        warn!("failed to append to history: {err}");
                    }
                    if let Some(path) = self.history_path.as_ref()
                        && let Err(err) = self.editor.save_history(path)
                    {
                        warn!("failed to persist history to {}: {err}", path.display());
                    }
                }
                Ok(InputEvent::Line(line))
            },
            Err(err) => convert_readline_error(err),
        }
    }
}

#[derive(Default)]
struct StdinInput {
    buffer: String,
}

impl StdinInput {
    fn read_line(&mut self, prompt: &str) -> io::Result<InputEvent> {
        print!("{prompt}");
        io::stdout().flush()?;

        self.buffer.clear();
        let bytes = io::stdin().read_line(&mut self.buffer)?;
        if bytes == 0 {
            return Ok(InputEvent::Eof);
        }

        let line = self.buffer.trim_end_matches(['\n', '\r']);
        Ok(InputEvent::Line(line.to_string()))
    }
}

fn convert_readline_error(err: ReadlineError) -> io::Result<InputEvent> {
    match err {
        ReadlineError::Interrupted => Ok(InputEvent::Interrupted),
        ReadlineError::Eof => Ok(InputEvent::Eof),
        ReadlineError::Io(io_err) => Err(io_err),
        other => Err(io::Error::other(other)),
    }
}

fn map_io_err(err: ReadlineError) -> io::Error {
    match err {
        ReadlineError::Io(io_err) => io_err,
        other => io::Error::other(other),
    }
}

fn history_file_path() -> Option<PathBuf> {
    dirs::data_dir()
        .or_else(dirs::data_local_dir)
        .map(|base| build_history_path(&base))
}

fn build_history_path(base: &Path) -> PathBuf {
    base.join("astral_engine").join("history.txt")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn terms() -> Vec<String> {
        let vocabulary = Vocabulary::builtin().unwrap();
        let world = WorldSnapshot::new()
            .with_object("keycard", "Keycard", &["access card"])
            .with_object("wrench", "wrench", &["spanner"]);
        completion_terms(&vocabulary, &world)
    }

    #[test]
    fn converts_readline_ctrl_c_to_interrupt() {
        let result = convert_readline_error(ReadlineError::Interrupted).unwrap();
        assert!(matches!(result, InputEvent::Interrupted));
        let result = convert_readline_error(ReadlineError::Eof).unwrap();
        assert!(matches!(result, InputEvent::Eof));
    }

    #[test]
    fn history_path_appends_components() {
        let base = PathBuf::from("/tmp/astral-test");
        let path = build_history_path(&base);
        assert!(path.ends_with(Path::new("astral_engine/history.txt")));
    }

    #[test]
    fn completion_terms_include_verbs_and_objects() {
        let terms = terms();
        for expected in ["take", "inventory", "unlock", "keycard", "spanner", "ladder", "safe"] {
            assert!(terms.iter().any(|t| t == expected), "missing {expected}");
        }
    }

    #[test]
    fn completion_terms_skip_single_letters_and_phrases() {
        let terms = terms();
        assert!(!terms.iter().any(|t| t == "i"));
        assert!(!terms.iter().any(|t| t.contains(' ')));
    }

    #[test]
    fn dev_commands_follow_feature() {
        assert_eq!(terms().iter().any(|t| t == ":parse"), DEV_MODE);
    }

    #[test]
    fn completes_the_word_under_the_cursor() {
        let terms = terms();
        let (start, word) = current_word("take the wr", 11);
        assert_eq!(start, 9);
        assert_eq!(word, "wr");
        let pairs = matching_terms(&terms, &word);
        assert_eq!(pairs.len(), 1);
        assert_eq!(pairs[0].replacement, "wrench");
    }
}
