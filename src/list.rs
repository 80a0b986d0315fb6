use ratatui::{
    prelude::*,
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::models::JobPosting;

pub const LIST_TITLE: &str = "Recently Created Job Postings";

const DESCRIPTION_LINES: usize = 2;

/// Lines for one posting in the list. `width` is the usable text width.
pub fn summary_lines(job: &JobPosting, width: usize) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(
            format!("#{} {}", job.id, job.title),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!(
            "{} · {} · {}",
            job.company.trim(),
            job.location.trim(),
            job.job_type
        )),
        Line::from(Span::styled(
            format!("Posted {}", job.date_posted.format("%Y-%m-%d")),
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let wrapped = textwrap::wrap(job.description.trim(), width.max(10));
    let truncated = wrapped.len() > DESCRIPTION_LINES;
    for (i, line) in wrapped.iter().take(DESCRIPTION_LINES).enumerate() {
        let text = if truncated && i == DESCRIPTION_LINES - 1 {
            format!("{}...", line)
        } else {
            line.to_string()
        };
        lines.push(Line::from(text));
    }

    lines.push(Line::from(""));
    lines
}

pub fn summary_item(job: &JobPosting, width: usize) -> ListItem<'static> {
    ListItem::new(Text::from(summary_lines(job, width)))
}

/// Render the collection in order, one item per posting. `filter` is taken
/// but not applied.
pub fn render_job_list(
    frame: &mut Frame,
    area: Rect,
    jobs: &[JobPosting],
    _filter: Option<&str>,
    list_state: &mut ListState,
    focused: bool,
) {
    let border_style = if focused {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(format!(" {} ({}) ", LIST_TITLE, jobs.len()));

    // Borders plus the highlight symbol.
    let width = usize::from(area.width).saturating_sub(4);

    let items: Vec<ListItem> = if jobs.is_empty() {
        vec![ListItem::new(Span::styled(
            "No jobs posted yet.",
            Style::default().fg(Color::DarkGray),
        ))]
    } else {
        jobs.iter().map(|job| summary_item(job, width)).collect()
    };

    let list = List::new(items)
        .block(block)
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, list_state);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::JobType;
    use chrono::{Local, TimeZone};
    use ratatui::backend::TestBackend;

    fn posting(id: usize, title: &str, description: &str) -> JobPosting {
        JobPosting {
            id,
            title: title.to_string(),
            date_posted: Local.with_ymd_and_hms(2026, 10, 17, 9, 30, 0).unwrap(),
            company: "  Acme Corp ".to_string(),
            job_type: JobType::Contract,
            location: "Remote".to_string(),
            description: description.to_string(),
            qualifications: "Rust".to_string(),
        }
    }

    fn line_text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut out = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                out.push_str(buffer[(x, y)].symbol());
            }
            out.push('\n');
        }
        out
    }

    #[test]
    fn test_summary_lines_layout() {
        let job = posting(4, "Platform Engineer", "Keep the lights on.");
        let lines: Vec<String> = summary_lines(&job, 40).iter().map(line_text).collect();

        assert_eq!(lines[0], "#4 Platform Engineer");
        assert_eq!(lines[1], "Acme Corp · Remote · Contract");
        assert_eq!(lines[2], "Posted 2026-10-17");
        assert_eq!(lines[3], "Keep the lights on.");
        assert_eq!(lines[4], "");
    }

    #[test]
    fn test_summary_truncates_long_description() {
        let description = "word ".repeat(40);
        let job = posting(1, "Platform Engineer", &description);
        let lines: Vec<String> = summary_lines(&job, 20).iter().map(line_text).collect();

        // Three header lines, two description lines, one spacer.
        assert_eq!(lines.len(), 6);
        assert!(lines[4].ends_with("..."));
    }

    #[test]
    fn test_render_lists_jobs_in_order() {
        let jobs = vec![
            posting(1, "First Posting Title", "a"),
            posting(2, "Second Posting Title", "b"),
        ];
        let mut terminal = Terminal::new(TestBackend::new(60, 20)).unwrap();
        let mut state = ListState::default();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_job_list(frame, area, &jobs, Some("ignored"), &mut state, false)
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("Recently Created Job Postings (2)"));
        let first = text.find("#1 First Posting Title").unwrap();
        let second = text.find("#2 Second Posting Title").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_render_empty_collection() {
        let mut terminal = Terminal::new(TestBackend::new(60, 10)).unwrap();
        let mut state = ListState::default();

        terminal
            .draw(|frame| {
                let area = frame.area();
                render_job_list(frame, area, &[], None, &mut state, true)
            })
            .unwrap();

        let text = buffer_text(&terminal);
        assert!(text.contains("No jobs posted yet."));
        assert!(text.contains("(0)"));
    }
}
