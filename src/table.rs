//! ratatui rendering of a paginated table.
//!
//! Everything drawn here comes from [`TableProps`]; the widgets hold no
//! state of their own apart from the row selection.

use consign::{Pagination, Resource, SortIndicator, TableProps, ViewState};
use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState, Wrap};

use crate::notify::{NotifyKind, StatusLine};

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

/// Render the bordered table with header, rows (or placeholder), error
/// banner and pagination footer.
pub fn render_table<R: Resource>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    props: &TableProps<'_, R>,
    selected: Option<usize>,
    focused_column: Option<usize>,
) {
    let mut block_title = vec![Span::raw(format!(" {title} "))];
    if props.loading {
        block_title.push(Span::styled(
            " Loading… ",
            Style::default().fg(Color::Black).bg(Color::Yellow),
        ));
    }
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(Line::from(block_title))
        .title_bottom(pagination_line(&props.pagination(), props));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let banner_height = u16::from(props.error().is_some());
    let [banner_area, body_area] =
        Layout::vertical([Constraint::Length(banner_height), Constraint::Min(1)]).areas(inner);

    if let Some(reason) = props.error() {
        let banner = Paragraph::new(format!(" ✗ {reason}"))
            .style(Style::default().fg(Color::White).bg(Color::Red));
        frame.render_widget(banner, banner_area);
    }

    if let Some(placeholder) = placeholder_text(props) {
        let paragraph = Paragraph::new(placeholder)
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, body_area);
        return;
    }

    let header = Row::new(props.columns.iter().enumerate().map(|(i, column)| {
        let mut style = Style::default().bold();
        if focused_column == Some(i) {
            style = style.underlined();
        }
        Cell::from(header_label(column.title, props.indicator(column))).style(style)
    }))
    .style(Style::default().fg(Color::Cyan));

    let rows = props
        .data
        .iter()
        .map(|item| Row::new(item.cells()));
    let widths = props.columns.iter().map(|c| Constraint::Length(c.width));

    // Stale rows are dimmed while a refresh is in flight.
    let row_style = if props.loading {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };

    let table = Table::new(rows, widths)
        .header(header)
        .style(row_style)
        .column_spacing(1)
        .row_highlight_style(Style::default().reversed())
        .highlight_symbol("› ");

    let mut state = TableState::default().with_selected(selected);
    frame.render_stateful_widget(table, body_area, &mut state);
}

/// Column title with its sort arrow.
pub fn header_label(title: &str, indicator: SortIndicator) -> String {
    match indicator {
        SortIndicator::Unsorted => title.to_string(),
        SortIndicator::Ascending => format!("{title} ▲"),
        SortIndicator::Descending => format!("{title} ▼"),
    }
}

/// Text shown instead of rows, if any.
fn placeholder_text<T>(props: &TableProps<'_, T>) -> Option<&'static str> {
    match &props.state {
        ViewState::Empty => Some("No data loaded"),
        ViewState::Loading { stale: false } => Some("Loading…"),
        ViewState::Errored(_) if props.data.is_empty() => Some("Nothing to show"),
        ViewState::Loaded if props.data.is_empty() => Some("No records match"),
        _ => None,
    }
}

/// `« ‹ 1 … 4 [5] 6 … 20 › »  41-50 of 200`
fn pagination_line<T>(pagination: &Pagination, props: &TableProps<'_, T>) -> Line<'static> {
    let enabled = Style::default().fg(Color::White);
    let disabled = Style::default().fg(Color::DarkGray);
    let pick = |on: bool| if on { enabled } else { disabled };

    let mut spans = vec![
        Span::raw(" "),
        Span::styled("«", pick(pagination.first_enabled)),
        Span::raw(" "),
        Span::styled("‹", pick(pagination.prev_enabled)),
        Span::raw(" "),
    ];
    for page in &pagination.pages {
        match page {
            Some(n) if *n == pagination.current => spans.push(Span::styled(
                format!("[{n}]"),
                Style::default().fg(Color::Cyan).bold(),
            )),
            Some(n) => spans.push(Span::styled(n.to_string(), enabled)),
            None => spans.push(Span::styled("…", disabled)),
        }
        spans.push(Span::raw(" "));
    }
    spans.push(Span::styled("›", pick(pagination.next_enabled)));
    spans.push(Span::raw(" "));
    spans.push(Span::styled("»", pick(pagination.last_enabled)));

    let range = match props.row_range() {
        Some((first, last)) => format!("  {first}-{last} of {} ", props.total_count),
        None => format!("  0 of {} ", props.total_count),
    };
    spans.push(Span::styled(range, disabled));
    Line::from(spans)
}

// ---------------------------------------------------------------------------
// Side panels
// ---------------------------------------------------------------------------

/// Label/value pairs of the selected record.
pub fn render_detail<R: Resource>(frame: &mut Frame, area: Rect, record: Option<&R>) {
    let lines: Vec<Line> = match record {
        Some(record) => {
            let fields = record.detail();
            let width = fields.iter().map(|(label, _)| label.len()).max().unwrap_or(0);
            fields
                .into_iter()
                .map(|(label, value)| {
                    Line::from(vec![
                        Span::styled(
                            format!(" {label:<width$} "),
                            Style::default().fg(Color::DarkGray),
                        ),
                        Span::raw(value),
                    ])
                })
                .collect()
        }
        None => vec![Line::styled(
            " No row selected",
            Style::default().fg(Color::DarkGray),
        )],
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Detail ");
    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

/// Most recent notifications, newest at the bottom.
pub fn render_status(frame: &mut Frame, area: Rect, status: &StatusLine) {
    let visible = usize::from(area.height.saturating_sub(2));
    let mut lines: Vec<Line> = status
        .lines()
        .rev()
        .take(visible)
        .map(|(kind, message)| {
            let color = match kind {
                NotifyKind::Success => Color::Green,
                NotifyKind::Info => Color::White,
                NotifyKind::Error => Color::Red,
            };
            Line::styled(format!(" {message}"), Style::default().fg(color))
        })
        .collect();
    lines.reverse();

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan))
        .title(" Status ");
    frame.render_widget(Paragraph::new(lines).block(block), area);
}
