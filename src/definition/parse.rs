//! Definition file parsing and discovery

use crate::definition::schema::validate_table;
use crate::definition::types::{TargetDefinition, TargetTable};
use crate::error::{DefinitionError, DefinitionResult};
use regex::Regex;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

/// Definition file names to search for
const DEFINITION_FILE_NAMES: &[&str] = &["Runfile", "runfile"];

/// Target-scoped variable that overrides the working directory
pub const WORKDIR_VARIABLE: &str = ".CWD";

const DOC_MARKER: &str = "##";

static DEFAULT_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z_][A-Za-z0-9_]*)\s*\?=\s*(.*)$").expect("valid regex")
});

static TARGET_ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_.\-/]*)\s*:\s*(\.CWD|[A-Za-z_][A-Za-z0-9_]*)\s*=\s*(.*)$")
        .expect("valid regex")
});

static SPECIAL_TARGET: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\.[A-Za-z_]+)\s*:(.*)$").expect("valid regex"));

static DECLARATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([A-Za-z0-9_][A-Za-z0-9_.\-/]*)\s*:(.*)$").expect("valid regex")
});

static TARGET_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_][A-Za-z0-9_.\-/]*$").expect("valid regex"));

/// Find the definition file by searching current and parent directories
pub fn find_definition_file() -> DefinitionResult<PathBuf> {
    let cwd = env::current_dir().map_err(|e| DefinitionError::Read {
        path: PathBuf::from("."),
        error: e.to_string(),
    })?;
    find_definition_file_from(cwd)
}

/// Find the definition file starting from a specific directory
pub fn find_definition_file_from(start_dir: PathBuf) -> DefinitionResult<PathBuf> {
    let mut current_dir = start_dir;
    let mut searched_paths = Vec::new();

    loop {
        for file_name in DEFINITION_FILE_NAMES {
            let path = current_dir.join(file_name);
            searched_paths.push(path.display().to_string());

            if path.is_file() {
                return Ok(path);
            }
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => return Err(DefinitionError::NotFound(searched_paths.join(", "))),
        }
    }
}

/// Parse a definition file from a path
pub fn parse_definition_file(path: &Path) -> DefinitionResult<TargetTable> {
    let contents = fs::read_to_string(path).map_err(|e| DefinitionError::Read {
        path: path.to_path_buf(),
        error: e.to_string(),
    })?;

    parse_definition(&contents)
}

/// Parse a definition from a string and validate its references
pub fn parse_definition(source: &str) -> DefinitionResult<TargetTable> {
    let mut parser = Parser::default();
    for (index, raw) in source.lines().enumerate() {
        parser.line(index + 1, raw.strip_suffix('\r').unwrap_or(raw))?;
    }

    let table = parser.finish()?;
    validate_table(&table)?;
    Ok(table)
}

#[derive(Debug, Clone, Copy)]
enum Marker {
    Phony,
    BestEffort,
}

/// Line-by-line parser state
#[derive(Default)]
struct Parser {
    table: TargetTable,
    /// Target whose body is currently being collected
    open: Option<String>,
    markers: Vec<(Marker, String, usize)>,
    assignments: Vec<(String, String, String, usize)>,
}

impl Parser {
    fn line(&mut self, number: usize, line: &str) -> DefinitionResult<()> {
        if line.trim().is_empty() {
            self.open = None;
            return Ok(());
        }

        if line.trim_start().starts_with('#') {
            return Ok(());
        }

        if line.starts_with([' ', '\t']) {
            return self.body_line(number, line);
        }

        self.open = None;

        if let Some(caps) = DEFAULT_ASSIGNMENT.captures(line) {
            self.table
                .defaults
                .entry(caps[1].to_string())
                .or_insert_with(|| caps[2].trim_end().to_string());
            return Ok(());
        }

        if let Some(caps) = TARGET_ASSIGNMENT.captures(line) {
            self.assignments.push((
                caps[1].to_string(),
                caps[2].to_string(),
                caps[3].trim_end().to_string(),
                number,
            ));
            return Ok(());
        }

        if let Some(caps) = SPECIAL_TARGET.captures(line) {
            let marker = match &caps[1] {
                ".PHONY" => Marker::Phony,
                ".IGNORE" => Marker::BestEffort,
                other => {
                    return Err(parse_error(
                        number,
                        1,
                        format!("unsupported special target '{}'", other),
                    ))
                }
            };
            let offset = caps.get(2).map_or(0, |m| m.start());
            for (column, name) in words(line, offset) {
                check_name(number, column, name)?;
                self.markers.push((marker, name.to_string(), number));
            }
            return Ok(());
        }

        if let Some(caps) = DECLARATION.captures(line) {
            return self.declaration(number, line, &caps[1], caps.get(2).map_or(0, |m| m.start()));
        }

        Err(parse_error(
            number,
            1,
            format!("expected a target declaration, found '{}'", line.trim()),
        ))
    }

    fn body_line(&mut self, number: usize, line: &str) -> DefinitionResult<()> {
        let Some(name) = &self.open else {
            return Err(parse_error(
                number,
                1,
                "command line outside of a target".to_string(),
            ));
        };

        if let Some(target) = self.table.get_mut(name) {
            target.body.push(line.trim_start().to_string());
        }
        Ok(())
    }

    fn declaration(
        &mut self,
        number: usize,
        line: &str,
        name: &str,
        rest_offset: usize,
    ) -> DefinitionResult<()> {
        if let Some(existing) = self.table.get(name) {
            return Err(DefinitionError::DuplicateTarget {
                name: name.to_string(),
                line: number,
                first_line: existing.line,
            });
        }

        let rest = &line[rest_offset..];
        let (deps_end, docstring) = match rest.find(DOC_MARKER) {
            Some(pos) => {
                let doc = rest[pos + DOC_MARKER.len()..].trim();
                (rest_offset + pos, (!doc.is_empty()).then(|| doc.to_string()))
            }
            None => (line.len(), None),
        };

        let mut target = TargetDefinition::new(name, number);
        target.docstring = docstring;
        for (column, dep) in words(&line[..deps_end], rest_offset) {
            check_name(number, column, dep)?;
            target.dependencies.push(dep.to_string());
        }

        self.table.insert(target);
        self.open = Some(name.to_string());
        Ok(())
    }

    fn finish(mut self) -> DefinitionResult<TargetTable> {
        if self.table.is_empty() {
            return Err(DefinitionError::Empty);
        }

        for (marker, name, line) in self.markers {
            let target = self
                .table
                .get_mut(&name)
                .ok_or(DefinitionError::UnknownTarget { name, line })?;
            match marker {
                Marker::Phony => target.phony = true,
                Marker::BestEffort => target.best_effort = true,
            }
        }

        for (name, key, value, line) in self.assignments {
            let target = self
                .table
                .get_mut(&name)
                .ok_or(DefinitionError::UnknownTarget { name, line })?;
            if key == WORKDIR_VARIABLE {
                target.working_dir = Some(value);
            } else {
                target.variables.insert(key, value);
            }
        }

        Ok(self.table)
    }
}

/// Whitespace-separated words of `line` starting at byte `offset`, with
/// their 1-based columns
fn words(line: &str, offset: usize) -> impl Iterator<Item = (usize, &str)> {
    let mut rest = &line[offset..];
    let mut position = offset;
    std::iter::from_fn(move || {
        let skipped = rest.len() - rest.trim_start().len();
        rest = &rest[skipped..];
        position += skipped;
        if rest.is_empty() {
            return None;
        }
        let len = rest.find(char::is_whitespace).unwrap_or(rest.len());
        let word = &rest[..len];
        let column = line[..position].chars().count() + 1;
        rest = &rest[len..];
        position += len;
        Some((column, word))
    })
}

fn check_name(line: usize, column: usize, name: &str) -> DefinitionResult<()> {
    if TARGET_NAME.is_match(name) {
        Ok(())
    } else {
        Err(parse_error(
            line,
            column,
            format!("invalid target name '{}'", name),
        ))
    }
}

fn parse_error(line: usize, column: usize, message: String) -> DefinitionError {
    DefinitionError::Parse {
        line,
        column,
        message,
    }
}
