//! Plain-text PDF output for endpoint reports.
//!
//! One Courier font, one line per fact, fixed lines per page. Lines longer than
//! the page are wrapped, never cut.

use chrono::{DateTime, Utc};
use log_engine::EndpointReport;
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, Stream};

const PAGE_WIDTH: i64 = 595;
const PAGE_HEIGHT: i64 = 842;
const MARGIN: i64 = 50;
const FONT_SIZE: i64 = 10;
const LEADING: i64 = 14;
const LINES_PER_PAGE: usize = 54;
/// Courier glyphs are 0.6 em wide: (595 - 2 * 50) / 6.
const LINE_CHARS: usize = 82;

/// Render lines of text into a PDF 1.4 document, wrapping and paginating as needed.
pub fn render_text(title: &str, lines: &[String]) -> Result<Vec<u8>, lopdf::Error> {
  let wrapped: Vec<String> = lines.iter().flat_map(|l| wrap(l)).collect();
  let mut pages: Vec<&[String]> = wrapped.chunks(LINES_PER_PAGE).collect();
  if pages.is_empty() {
    pages.push(&[]);
  }

  let mut doc = Document::with_version("1.4");
  let pages_id = doc.new_object_id();
  let font_id = doc.add_object(dictionary! {
    "Type" => "Font",
    "Subtype" => "Type1",
    "BaseFont" => "Courier",
    "Encoding" => "WinAnsiEncoding",
  });
  let resources_id = doc.add_object(dictionary! {
    "Font" => dictionary! { "F1" => font_id },
  });

  let mut kids: Vec<Object> = Vec::with_capacity(pages.len());
  for page in &pages {
    let content = Content {
      operations: page_operations(page),
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode()?));
    let page_id = doc.add_object(dictionary! {
      "Type" => "Page",
      "Parent" => pages_id,
      "Contents" => content_id,
    });
    kids.push(page_id.into());
  }

  let count = kids.len() as i64;
  doc.objects.insert(
    pages_id,
    Object::Dictionary(dictionary! {
      "Type" => "Pages",
      "Kids" => kids,
      "Count" => count,
      "Resources" => resources_id,
      "MediaBox" => vec![0.into(), 0.into(), PAGE_WIDTH.into(), PAGE_HEIGHT.into()],
    }),
  );
  let catalog_id = doc.add_object(dictionary! {
    "Type" => "Catalog",
    "Pages" => pages_id,
  });
  let info_id = doc.add_object(dictionary! {
    "Title" => Object::string_literal(win_ansi(title)),
    "Producer" => Object::string_literal("analyzer-api"),
  });
  doc.trailer.set("Root", catalog_id);
  doc.trailer.set("Info", info_id);

  let mut out = Vec::new();
  doc.save_to(&mut out)?;
  Ok(out)
}

fn page_operations(lines: &[String]) -> Vec<Operation> {
  let mut ops = vec![
    Operation::new("BT", vec![]),
    Operation::new("Tf", vec!["F1".into(), FONT_SIZE.into()]),
    Operation::new("TL", vec![LEADING.into()]),
    Operation::new("Td", vec![MARGIN.into(), (PAGE_HEIGHT - MARGIN).into()]),
  ];
  for line in lines {
    ops.push(Operation::new("Tj", vec![Object::string_literal(win_ansi(line))]));
    ops.push(Operation::new("T*", vec![]));
  }
  ops.push(Operation::new("ET", vec![]));
  ops
}

/// Split a line into page-width pieces. Breaks after whitespace when one falls in
/// the back half of the window; the pieces concatenate back to the input.
fn wrap(line: &str) -> Vec<String> {
  let chars: Vec<char> = line.chars().collect();
  if chars.len() <= LINE_CHARS {
    return vec![line.to_string()];
  }
  let mut out = Vec::new();
  let mut rest = &chars[..];
  while rest.len() > LINE_CHARS {
    let cut = rest[..LINE_CHARS]
      .iter()
      .rposition(|c| c.is_whitespace())
      .filter(|&i| i >= LINE_CHARS / 2)
      .map_or(LINE_CHARS, |i| i + 1);
    out.push(rest[..cut].iter().collect());
    rest = &rest[cut..];
  }
  if !rest.is_empty() {
    out.push(rest.iter().collect());
  }
  out
}

/// WinAnsi bytes for the standard Courier font. Latin-1 maps through; anything
/// else has no glyph and becomes `?`.
fn win_ansi(text: &str) -> Vec<u8> {
  text
    .chars()
    .map(|c| match c as u32 {
      code @ (0x20..=0x7e | 0xa0..=0xff) => code as u8,
      _ => b'?',
    })
    .collect()
}

/// Text lines describing one endpoint.
pub fn report_lines(report: &EndpointReport, generated_at: DateTime<Utc>) -> Vec<String> {
  let s = &report.statistic;
  let mut lines = vec![
    format!("Endpoint Report: {}", s.endpoint),
    format!("Generated: {}", generated_at.format("%Y-%m-%d %H:%M:%S UTC")),
    String::new(),
    "Summary".to_string(),
    format!("  Total requests:     {}", s.count),
    format!("  Success rate:       {:.1}%", s.success_rate),
    format!("  Drop frequency:     {:.1}%", s.drop_frequency),
    format!("  Avg response time:  {:.1} ms", s.avg_response_time),
    format!("  p50 / p95 / p99:    {:.1} / {:.1} / {:.1} ms", s.p50, s.p95, s.p99),
    format!(
      "  Min / max:          {:.1} / {:.1} ms",
      s.min_response_time, s.max_response_time
    ),
    format!("  Peak hour:          {:02}:00", s.peak_hour),
    format!("  Daily frequency:    {:.2} requests/day", s.daily_frequency),
    format!("  Unique users:       {}", s.unique_users),
  ];

  if !s.methods.is_empty() {
    lines.push(String::new());
    lines.push("Methods".to_string());
    for (method, count) in &s.methods {
      lines.push(format!("  {:<8} {}", method, count));
    }
  }

  lines.push(String::new());
  lines.push("Status codes".to_string());
  for (code, count) in &report.status_codes {
    lines.push(format!("  {:<8} {}", code, count));
  }

  let busiest = report.hourly_distribution.iter().copied().max().unwrap_or(0);
  if busiest > 0 {
    lines.push(String::new());
    lines.push("Requests by hour".to_string());
    for (hour, &count) in report.hourly_distribution.iter().enumerate() {
      if count == 0 {
        continue;
      }
      let bar = ((count * 40).div_ceil(busiest)) as usize;
      lines.push(format!("  {:02}:00  {:>6}  {}", hour, count, "#".repeat(bar)));
    }
  }

  if !report.daily_distribution.is_empty() {
    lines.push(String::new());
    lines.push("Requests by day".to_string());
    for day in &report.daily_distribution {
      lines.push(format!(
        "  {}  {:>6} requests, {} failed",
        day.date, day.count, day.failures
      ));
    }
  }

  if !report.top_clients.is_empty() {
    lines.push(String::new());
    lines.push("Top clients".to_string());
    for c in &report.top_clients {
      lines.push(format!("  {:<32} {}", c.client, c.count));
    }
  }

  if !report.recent_errors.is_empty() {
    lines.push(String::new());
    lines.push("Recent errors".to_string());
    for e in &report.recent_errors {
      let when = e
        .timestamp
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "-".to_string());
      lines.push(format!(
        "  {}  {}  {:.0} ms  {}",
        when,
        e.status_code,
        e.response_time,
        e.client_key().unwrap_or("-")
      ));
    }
  }

  lines
}

/// Render an endpoint report to PDF bytes.
pub fn render_endpoint_report(
  report: &EndpointReport,
  generated_at: DateTime<Utc>,
) -> Result<Vec<u8>, lopdf::Error> {
  let title = format!("Endpoint Report: {}", report.statistic.endpoint);
  render_text(&title, &report_lines(report, generated_at))
}

/// `endpoint-report-<slug>.pdf`, slug = endpoint with non-alphanumeric runs collapsed to `-`.
pub fn report_filename(endpoint: &str) -> String {
  let mut slug = String::with_capacity(endpoint.len());
  for ch in endpoint.chars() {
    if ch.is_ascii_alphanumeric() {
      slug.push(ch.to_ascii_lowercase());
    } else if !slug.is_empty() && !slug.ends_with('-') {
      slug.push('-');
    }
  }
  let slug = slug.trim_end_matches('-');
  let slug = if slug.is_empty() { "root" } else { slug };
  format!("endpoint-report-{}.pdf", slug)
}

#[cfg(test)]
mod tests {
  use super::*;
  use log_engine::{Engine, LogEntry};

  /// Text shown by each `Tj`, page by page, decoded from WinAnsi.
  fn shown_lines(pdf: &[u8]) -> Vec<String> {
    let doc = Document::load_mem(pdf).unwrap();
    let mut out = Vec::new();
    for (_, page_id) in doc.get_pages() {
      let content = Content::decode(&doc.get_page_content(page_id).unwrap()).unwrap();
      for op in content.operations {
        if op.operator != "Tj" {
          continue;
        }
        if let Some(Object::String(bytes, _)) = op.operands.first() {
          out.push(bytes.iter().map(|&b| b as char).collect());
        }
      }
    }
    out
  }

  fn title_of(pdf: &[u8]) -> String {
    let doc = Document::load_mem(pdf).unwrap();
    let info_id = doc.trailer.get(b"Info").unwrap().as_reference().unwrap();
    let info = doc.get_dictionary(info_id).unwrap();
    match info.get(b"Title").unwrap() {
      Object::String(bytes, _) => bytes.iter().map(|&b| b as char).collect(),
      other => panic!("unexpected title {:?}", other),
    }
  }

  fn report_for(endpoint: &str) -> EndpointReport {
    let engine = Engine::with_defaults();
    let entries = vec![
      LogEntry::new(endpoint, 200, 100.0),
      LogEntry::new(endpoint, 500, 300.0),
    ];
    engine.endpoint_report(&entries, endpoint).unwrap()
  }

  #[test]
  fn document_structure() {
    let pdf = render_text("t", &["hello".to_string()]).unwrap();
    assert!(pdf.starts_with(b"%PDF-1.4"));
    assert_eq!(Document::load_mem(&pdf).unwrap().get_pages().len(), 1);
    assert_eq!(shown_lines(&pdf), vec!["hello".to_string()]);
    assert_eq!(title_of(&pdf), "t");
  }

  #[test]
  fn empty_input_still_has_a_page() {
    let pdf = render_text("empty", &[]).unwrap();
    assert_eq!(Document::load_mem(&pdf).unwrap().get_pages().len(), 1);
  }

  #[test]
  fn long_reports_paginate() {
    let lines: Vec<String> = (0..120).map(|i| format!("line {}", i)).collect();
    let pdf = render_text("t", &lines).unwrap();
    assert_eq!(Document::load_mem(&pdf).unwrap().get_pages().len(), 3);
    assert_eq!(shown_lines(&pdf).len(), 120);
  }

  #[test]
  fn long_endpoint_is_wrapped_not_cut() {
    let endpoint = format!("/api/{}", "segment/".repeat(13));
    assert!(endpoint.len() > LINE_CHARS);
    let pdf = render_endpoint_report(&report_for(&endpoint), Utc::now()).unwrap();

    let shown = shown_lines(&pdf);
    assert!(shown.iter().all(|l| l.chars().count() <= LINE_CHARS));
    assert!(shown.concat().contains(&endpoint));
    assert_eq!(title_of(&pdf), format!("Endpoint Report: {}", endpoint));
  }

  #[test]
  fn wrap_prefers_whitespace_and_loses_nothing() {
    let line = format!("{} {}", "a".repeat(60), "b".repeat(60));
    let pieces = wrap(&line);
    assert_eq!(pieces.len(), 2);
    assert_eq!(pieces[0], format!("{} ", "a".repeat(60)));
    assert_eq!(pieces.concat(), line);

    let solid = "x".repeat(200);
    let pieces = wrap(&solid);
    assert_eq!(pieces.len(), 3);
    assert_eq!(pieces.concat(), solid);
    assert_eq!(wrap(""), vec![String::new()]);
  }

  #[test]
  fn latin1_text_keeps_its_glyphs() {
    assert_eq!(win_ansi("caf\u{e9}"), b"caf\xe9".to_vec());
    assert_eq!(win_ansi("a\u{2192}b"), b"a?b".to_vec());
    let pdf = render_text("t", &["f(x) \\ caf\u{e9}".to_string()]).unwrap();
    assert_eq!(shown_lines(&pdf), vec!["f(x) \\ caf\u{e9}".to_string()]);
  }

  #[test]
  fn filename_slugs() {
    assert_eq!(report_filename("/api/users/{id}"), "endpoint-report-api-users-id.pdf");
    assert_eq!(report_filename("/"), "endpoint-report-root.pdf");
  }

  #[test]
  fn report_lines_include_summary() {
    let lines = report_lines(&report_for("/a"), Utc::now());
    assert_eq!(lines[0], "Endpoint Report: /a");
    assert!(lines.iter().any(|l| l.contains("Success rate:       50.0%")));
    assert!(lines.iter().any(|l| l.starts_with("Recent errors")));
  }
}
