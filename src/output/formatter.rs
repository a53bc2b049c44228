use owo_colors::OwoColorize;
use std::io::IsTerminal;
use terminal_size::{terminal_size, Width};

use crate::catalog::SearchGroup;
use crate::grading::normalize::format_trimmed;
use crate::grading::{
    enrolled_credits, program_average, semester_average, subject_score, RequiredScores,
    ScoreScale, SubjectScore,
};
use crate::record::{Component, ComponentSlot, Program, Semester, Subject};

const INDEX_WIDTH: usize = 3;
const CODE_WIDTH: usize = 8;
const CREDITS_WIDTH: usize = 4;
const CELL_WIDTH: usize = 8;
const SCORE_WIDTH: usize = 6;
const TARGET_WIDTH: usize = 6;
const MIN_NAME_WIDTH: usize = 12;
const SEPARATOR: &str = "  ";

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes (unlimited)
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate a name to fit available width, accounting for Unicode
fn truncate_name(name: &str, max_width: usize) -> String {
    let chars: Vec<char> = name.chars().collect();
    if chars.len() <= max_width {
        name.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

fn pad_right(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Plain text of a component cell: the score, the required value in brackets,
/// or "-" when neither is known. Unreachable requirements get a "!" suffix.
pub fn component_cell_text(slot: &ComponentSlot, scale: &ScoreScale) -> String {
    if let Some(required) = slot.required_value() {
        if scale.is_reachable(required) {
            format!("[{}]", slot.required)
        } else {
            format!("[{}]!", slot.required)
        }
    } else if !slot.score.is_empty() {
        slot.score.clone()
    } else {
        "-".to_string()
    }
}

fn format_component_cell(slot: &ComponentSlot, scale: &ScoreScale, use_colors: bool) -> String {
    let padded = format!(
        "{:>width$}",
        component_cell_text(slot, scale),
        width = CELL_WIDTH
    );
    if !use_colors {
        return padded;
    }
    match slot.required_value() {
        Some(required) if !scale.is_reachable(required) => padded.red().bold().to_string(),
        Some(_) => padded.magenta().to_string(),
        None => padded,
    }
}

fn format_subject_score(score: &SubjectScore, use_colors: bool) -> String {
    let padded = format!("{:>width$}", score.to_string(), width = SCORE_WIDTH);
    if !use_colors {
        return padded;
    }
    match score {
        SubjectScore::InvalidWeights => padded.red().to_string(),
        SubjectScore::Override(_) => padded.cyan().bold().to_string(),
        SubjectScore::Computed(_) => padded.bold().to_string(),
        SubjectScore::Incomplete => padded,
    }
}

fn fixed_row_width() -> usize {
    INDEX_WIDTH
        + 1
        + CODE_WIDTH
        + SEPARATOR.len() * 4
        + CREDITS_WIDTH
        + (CELL_WIDTH + 1) * Component::ALL.len()
        + SCORE_WIDTH
        + 1
        + TARGET_WIDTH
}

fn name_width(subjects: &[Subject], term_width: Option<usize>) -> usize {
    let longest = subjects
        .iter()
        .map(|s| s.name.chars().count())
        .max()
        .unwrap_or(0)
        .max(MIN_NAME_WIDTH);

    match term_width {
        Some(width) if width > fixed_row_width() + MIN_NAME_WIDTH => {
            longest.min(width - fixed_row_width())
        }
        // Very narrow terminal, keep the minimum
        Some(_) => MIN_NAME_WIDTH,
        // No terminal (pipe), don't truncate
        None => longest,
    }
}

fn format_header(name_width: usize) -> String {
    let cells: Vec<String> = Component::ALL
        .iter()
        .map(|c| format!("{:>width$}", c.short_label(), width = CELL_WIDTH))
        .collect();
    format!(
        "{:>iw$} {}{}{}{}{:>cw$}{}{} {:>sw$} {:>tw$}",
        "#",
        pad_right("CODE", CODE_WIDTH),
        SEPARATOR,
        pad_right("NAME", name_width),
        SEPARATOR,
        "CR",
        SEPARATOR,
        cells.join(" "),
        "SCORE",
        "TARGET",
        iw = INDEX_WIDTH,
        cw = CREDITS_WIDTH,
        sw = SCORE_WIDTH,
        tw = TARGET_WIDTH,
    )
}

fn format_subject_row(
    idx: usize,
    subject: &Subject,
    name_width: usize,
    scale: &ScoreScale,
    use_colors: bool,
) -> String {
    // 1-based index, right-aligned with trailing dot
    let index_str = format!("{:>2}.", idx + 1);
    let cells: Vec<String> = subject
        .components
        .iter()
        .map(|(_, slot)| format_component_cell(slot, scale, use_colors))
        .collect();
    let score = format_subject_score(&subject_score(subject), use_colors);
    let target = format!("{:>width$}", subject.target, width = TARGET_WIDTH);
    let code = pad_right(&truncate_name(&subject.code, CODE_WIDTH), CODE_WIDTH);
    let name = pad_right(&truncate_name(&subject.name, name_width), name_width);
    let credits = format!("{:>width$}", subject.credits, width = CREDITS_WIDTH);

    if use_colors {
        format!(
            "{} {}{}{}{}{}{}{} {} {}",
            index_str.dimmed(),
            code.cyan(),
            SEPARATOR,
            name,
            SEPARATOR,
            credits,
            SEPARATOR,
            cells.join(" "),
            score,
            target.yellow()
        )
    } else {
        format!(
            "{} {}{}{}{}{}{}{} {} {}",
            index_str,
            code,
            SEPARATOR,
            name,
            SEPARATOR,
            credits,
            SEPARATOR,
            cells.join(" "),
            score,
            target
        )
    }
}

/// Format one semester as a table followed by its credit-weighted average.
///
/// Component cells show the entered score, or the required value in brackets
/// when a target is being solved for.
pub fn format_semester_table(semester: &Semester, scale: &ScoreScale, use_colors: bool) -> String {
    let title = if use_colors {
        semester.name.bold().to_string()
    } else {
        semester.name.clone()
    };

    if semester.subjects.is_empty() {
        return format!("{}\n  No subjects.", title);
    }

    let width = name_width(&semester.subjects, get_terminal_width());
    let mut lines = vec![title, format_header(width)];
    lines.extend(
        semester
            .subjects
            .iter()
            .enumerate()
            .map(|(idx, subject)| format_subject_row(idx, subject, width, scale, use_colors)),
    );

    let avg = semester_average(&semester.subjects);
    lines.push(format!(
        "  Average: {} ({} credits)",
        avg,
        format_trimmed(avg.total_credits)
    ));
    lines.join("\n")
}

/// Format the full program: every semester table, then program-wide totals.
pub fn format_program(program: &Program, scale: &ScoreScale, use_colors: bool) -> String {
    if program.semesters.is_empty() {
        return "No semesters found.".to_string();
    }

    let mut blocks: Vec<String> = program
        .semesters
        .iter()
        .map(|s| format_semester_table(s, scale, use_colors))
        .collect();

    let avg = program_average(program);
    let totals = format!(
        "Credits studied: {}\nCumulative average: {} ({} graded credits)",
        format_trimmed(enrolled_credits(program)),
        avg,
        format_trimmed(avg.total_credits)
    );
    blocks.push(if use_colors {
        totals.bold().to_string()
    } else {
        totals
    });
    blocks.join("\n\n")
}

/// Format the program as tab-separated values for scripting
/// Columns: semester, code, name, credits, progress, midterm, practice, final,
/// score, target (no headers, no colors)
pub fn format_tsv(program: &Program) -> String {
    program
        .semesters
        .iter()
        .flat_map(|semester| {
            semester.subjects.iter().map(move |subject| {
                let cells: Vec<&str> = subject
                    .components
                    .iter()
                    .map(|(_, slot)| slot.score.as_str())
                    .collect();
                format!(
                    "{}\t{}\t{}\t{}\t{}\t{}\t{}",
                    semester.name,
                    subject.code,
                    subject.name,
                    subject.credits,
                    cells.join("\t"),
                    subject_score(subject),
                    subject.target
                )
            })
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Format the solver result for one subject.
pub fn format_required(
    subject: &Subject,
    target: f64,
    required: &RequiredScores,
    scale: &ScoreScale,
    use_colors: bool,
) -> String {
    let heading = format!("{} (target {})", subject.display_name(), format_trimmed(target));
    let heading = if use_colors {
        heading.bold().to_string()
    } else {
        heading
    };

    if required.is_empty() {
        return format!("{}\n  Nothing left to solve: no missing component carries weight.", heading);
    }

    let mut lines = vec![heading];
    for component in required.components() {
        let value = required.get(*component).unwrap_or_default();
        let line = format!("  {:<9}{:>8}", component.label(), value);
        lines.push(if use_colors {
            line.magenta().to_string()
        } else {
            line
        });
    }

    if !required.is_reachable(scale) {
        let warning = format!(
            "  Unreachable: requires more than the maximum score of {}",
            format_trimmed(scale.max)
        );
        lines.push(if use_colors {
            warning.red().to_string()
        } else {
            warning
        });
    }
    lines.join("\n")
}

/// Format catalog search results grouped by category.
pub fn format_search_results(groups: &[SearchGroup<'_>], use_colors: bool) -> String {
    if groups.is_empty() {
        return "No courses found.".to_string();
    }

    groups
        .iter()
        .map(|group| {
            let title = if use_colors {
                group.category.bold().to_string()
            } else {
                group.category.to_string()
            };
            let mut lines = vec![title];
            for course in &group.courses {
                let code = pad_right(&course.code, CODE_WIDTH);
                let credits = format_trimmed(course.credits);
                if use_colors {
                    lines.push(format!("  {} {} ({} cr)", code.cyan(), course.name, credits));
                } else {
                    lines.push(format!("  {} {} ({} cr)", code, course.name, credits));
                }
            }
            lines.join("\n")
        })
        .collect::<Vec<_>>()
        .join("\n")
}
